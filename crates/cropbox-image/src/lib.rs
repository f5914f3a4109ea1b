pub mod crop;
pub mod source;

pub use crop::{CropError, CroppedImage, ImageBlob, crop_image, crop_source, encode_png};
pub use source::{LoadError, SourceImage, decode_source, read_source};
