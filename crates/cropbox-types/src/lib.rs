pub mod types;

pub use shared::AspectRatio;
pub use types::{CropRegion, CropSelection, DragHandle, MIN_CROP_SIZE};
