pub mod data_url;
pub mod image;
pub mod loading_state;
pub mod upload;

pub use image::AspectRatio;
pub use loading_state::{LoadingEvent, LoadingState};
pub use upload::{ImageFormat, SelectedFile, UploadError, UploadPolicy};
