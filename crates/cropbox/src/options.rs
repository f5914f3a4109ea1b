use cropbox_image::ImageBlob;
use shared::AspectRatio;
use std::fmt::{self, Debug, Formatter};

/// Size of the upload area, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropperStyle {
    pub width: f32,
    pub height: f32,
    pub padding: u16,
}

impl Default for CropperStyle {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 180.0,
            padding: 8,
        }
    }
}

/// Host-facing configuration of an [`ImageCropper`](crate::ImageCropper).
///
/// The callbacks map cropper events onto the host's own message type. Only
/// the confirm callback is required.
pub struct CropperOptions<M> {
    pub style: CropperStyle,
    pub empty_title: Option<String>,
    pub empty_btn_text: Option<String>,
    pub aspect_ratio: Option<f32>,
    pub show_guides: bool,
    pub(crate) on_cropper_ok: Box<dyn Fn(ImageBlob) -> M>,
    pub(crate) on_cropper_cancel: Option<Box<dyn Fn() -> M>>,
    pub(crate) on_image_del: Option<Box<dyn Fn() -> M>>,
}

impl<M> CropperOptions<M> {
    pub fn new(on_cropper_ok: impl Fn(ImageBlob) -> M + 'static) -> Self {
        Self {
            style: CropperStyle::default(),
            empty_title: None,
            empty_btn_text: None,
            aspect_ratio: None,
            show_guides: true,
            on_cropper_ok: Box::new(on_cropper_ok),
            on_cropper_cancel: None,
            on_image_del: None,
        }
    }

    pub fn style(mut self, style: CropperStyle) -> Self {
        self.style = style;
        self
    }

    pub fn empty_title(mut self, title: impl Into<String>) -> Self {
        self.empty_title = Some(title.into());
        self
    }

    pub fn empty_btn_text(mut self, text: impl Into<String>) -> Self {
        self.empty_btn_text = Some(text.into());
        self
    }

    pub fn aspect_ratio(mut self, ratio: f32) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    pub fn show_guides(mut self, show: bool) -> Self {
        self.show_guides = show;
        self
    }

    pub fn on_cropper_cancel(mut self, f: impl Fn() -> M + 'static) -> Self {
        self.on_cropper_cancel = Some(Box::new(f));
        self
    }

    pub fn on_image_del(mut self, f: impl Fn() -> M + 'static) -> Self {
        self.on_image_del = Some(Box::new(f));
        self
    }

    /// The crop box ratio in effect. Missing, zero, negative or non-finite
    /// values give 16:9.
    pub fn effective_ratio(&self) -> AspectRatio {
        AspectRatio::or_default(self.aspect_ratio)
    }
}

impl<M> Debug for CropperOptions<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropperOptions")
            .field("style", &self.style)
            .field("empty_title", &self.empty_title)
            .field("empty_btn_text", &self.empty_btn_text)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("show_guides", &self.show_guides)
            .field("on_cropper_cancel", &self.on_cropper_cancel.is_some())
            .field("on_image_del", &self.on_image_del.is_some())
            .finish()
    }
}
