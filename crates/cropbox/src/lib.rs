//! Image upload-and-crop control for libcosmic applications.
//!
//! [`ImageCropper`] renders an upload area. Picking a PNG or JPEG opens a
//! modal dialog with an aspect-locked crop box, and confirming hands the
//! cropped PNG to the host through the `on_cropper_ok` callback.

pub mod cropper;
pub mod localize;
pub mod notice;
pub mod options;

pub use cropper::{CroppedPreview, ImageCropper, Job, Message, Output, perform};
pub use cropbox_image::ImageBlob;
pub use notice::{Notice, NoticeLevel};
pub use options::{CropperOptions, CropperStyle};
