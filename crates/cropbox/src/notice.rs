use shared::UploadError;
use std::fmt;

use crate::fl;

/// Something the user should be told about. The host decides how to show
/// it; the demo turns each one into a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Confirm was pressed with no image loaded.
    NoImageSelected,
    /// The picked file is at or over the size limit.
    FileTooLarge { limit_mb: u64 },
    /// The picked file is neither PNG nor JPEG.
    UnsupportedType(String),
    /// The picked file could not be read or decoded.
    ReadFailed(String),
    /// Cropping or encoding the selection failed.
    CropFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::NoImageSelected | Notice::FileTooLarge { .. } | Notice::UnsupportedType(_) => {
                NoticeLevel::Warning
            }
            Notice::ReadFailed(_) | Notice::CropFailed(_) => NoticeLevel::Error,
        }
    }

    /// Localised text for display.
    pub fn text(&self) -> String {
        match self {
            Notice::NoImageSelected => fl!("notice-select-image"),
            Notice::FileTooLarge { limit_mb } => {
                fl!("notice-file-too-large", limit = limit_mb.to_string())
            }
            Notice::UnsupportedType(name) => {
                fl!("notice-unsupported-type", name = name.as_str())
            }
            Notice::ReadFailed(reason) => fl!("notice-read-failed", reason = reason.as_str()),
            Notice::CropFailed(reason) => fl!("notice-crop-failed", reason = reason.as_str()),
        }
    }
}

impl From<UploadError> for Notice {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::UnsupportedType(name) => Notice::UnsupportedType(name),
            UploadError::FileTooLarge { limit, .. } => Notice::FileTooLarge {
                limit_mb: limit / (1024 * 1024),
            },
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
