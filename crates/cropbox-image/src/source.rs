use cosmic::widget::image::Handle;
use image::DynamicImage;
use shared::{ImageFormat, SelectedFile, data_url};
use std::{
    fmt::{self, Debug, Formatter},
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("File reached the {limit} byte limit")]
    TooLarge { limit: u64 },
    #[error("Task cancelled")]
    Cancelled,
}

/// The raw image picked by the user, decoded and ready for the crop dialog.
#[derive(Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub format: ImageFormat,
    /// The file contents as a `data:` URL.
    pub data_url: String,
    pub image: Arc<DynamicImage>,
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

impl Debug for SourceImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl SourceImage {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Read and decode the selected file off the UI thread. At most
/// `max_bytes` are read; a file that has grown to the limit since it was
/// picked is rejected.
pub async fn read_source(file: SelectedFile, max_bytes: u64) -> Result<SourceImage, LoadError> {
    let (tx, rx) = tokio::sync::oneshot::channel();

    rayon::spawn(move || {
        let result = read_source_sync(&file.path, max_bytes);
        let _ = tx.send(result);
    });

    rx.await.map_err(|_| LoadError::Cancelled)?
}

fn read_source_sync(path: &Path, max_bytes: u64) -> Result<SourceImage, LoadError> {
    let mut bytes = Vec::new();
    std::fs::File::open(path)?
        .take(max_bytes)
        .read_to_end(&mut bytes)?;

    if bytes.len() as u64 >= max_bytes {
        return Err(LoadError::TooLarge { limit: max_bytes });
    }

    decode_source(path.to_path_buf(), &bytes)
}

/// Decode raw file contents. The format comes from the magic bytes, not the
/// file name, so a renamed GIF is still rejected.
pub fn decode_source(path: PathBuf, bytes: &[u8]) -> Result<SourceImage, LoadError> {
    let format = ImageFormat::sniff(bytes).ok_or_else(|| {
        LoadError::UnsupportedFormat(
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        )
    })?;

    let codec = match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
    };

    let img = image::load_from_memory_with_format(bytes, codec)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let handle = Handle::from_rgba(width, height, rgba.into_raw());

    tracing::debug!("decoded {} ({format}, {width}x{height})", path.display());

    Ok(SourceImage {
        data_url: data_url::encode(format.mime(), bytes),
        path,
        format,
        image: Arc::new(img),
        handle,
        width,
        height,
    })
}
