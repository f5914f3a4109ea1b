use cosmic::widget::image::Handle;
use cropbox_types::CropRegion;
use image::{DynamicImage, GenericImageView};
use shared::{ImageFormat, data_url};
use std::{
    fmt::{self, Debug, Formatter},
    io::Cursor,
    sync::Arc,
};
use thiserror::Error;

use crate::source::SourceImage;

#[derive(Debug, Error)]
pub enum CropError {
    #[error("Invalid crop region")]
    InvalidCrop,
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Task cancelled")]
    Cancelled,
}

/// Encoded image bytes handed to the confirm callback.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub data: Arc<[u8]>,
    pub format: ImageFormat,
}

impl ImageBlob {
    pub fn new(data: Vec<u8>, format: ImageFormat) -> Self {
        Self {
            data: data.into(),
            format,
        }
    }

    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_data_url(&self) -> String {
        data_url::encode(self.mime(), &self.data)
    }
}

impl Debug for ImageBlob {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBlob")
            .field("mime", &self.mime())
            .field("len", &self.data.len())
            .finish()
    }
}

/// Result of a confirmed crop: the blob plus what the preview needs.
#[derive(Clone)]
pub struct CroppedImage {
    pub blob: ImageBlob,
    pub data_url: String,
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

impl Debug for CroppedImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CroppedImage")
            .field("blob", &self.blob)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

pub fn crop_image(img: &DynamicImage, region: CropRegion) -> Result<DynamicImage, CropError> {
    let (width, height) = img.dimensions();

    let region = region
        .clamp_to(width, height)
        .ok_or(CropError::InvalidCrop)?;

    Ok(img.crop_imm(region.x, region.y, region.width, region.height))
}

pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, CropError> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

fn crop_source_sync(source: &SourceImage, region: CropRegion) -> Result<CroppedImage, CropError> {
    let cropped = crop_image(&source.image, region)?;
    let bytes = encode_png(&cropped)?;

    let rgba = cropped.to_rgba8();
    let (width, height) = rgba.dimensions();
    let handle = Handle::from_rgba(width, height, rgba.into_raw());

    let blob = ImageBlob::new(bytes, ImageFormat::Png);

    tracing::debug!("cropped {width}x{height}, {} bytes", blob.len());

    Ok(CroppedImage {
        data_url: blob.to_data_url(),
        blob,
        handle,
        width,
        height,
    })
}

/// Crop and encode off the UI thread.
pub async fn crop_source(
    source: Arc<SourceImage>,
    region: CropRegion,
) -> Result<CroppedImage, CropError> {
    let (tx, rx) = tokio::sync::oneshot::channel();

    rayon::spawn(move || {
        let result = crop_source_sync(&source, region);
        let _ = tx.send(result);
    });

    rx.await.map_err(|_| CropError::Cancelled)?
}
