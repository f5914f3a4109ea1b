//! `data:` URLs for inline previews.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

const PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("Missing data: prefix")]
    MissingPrefix,
    #[error("Missing ',' separator")]
    MissingSeparator,
    #[error("Only base64 payloads are supported")]
    NotBase64,
    #[error("Invalid base64 payload: {0}")]
    Decode(String),
}

pub fn encode(mime: &str, bytes: &[u8]) -> String {
    let payload = STANDARD.encode(bytes);
    let mut url = String::with_capacity(PREFIX.len() + mime.len() + BASE64_MARKER.len() + 1 + payload.len());
    url.push_str(PREFIX);
    url.push_str(mime);
    url.push_str(BASE64_MARKER);
    url.push(',');
    url.push_str(&payload);
    url
}

/// Split a data URL into its media type and decoded payload.
pub fn decode(url: &str) -> Result<(String, Vec<u8>), DataUrlError> {
    let rest = url.strip_prefix(PREFIX).ok_or(DataUrlError::MissingPrefix)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingSeparator)?;
    let mime = header
        .strip_suffix(BASE64_MARKER)
        .ok_or(DataUrlError::NotBase64)?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|err| DataUrlError::Decode(err.to_string()))?;

    Ok((mime.to_string(), bytes))
}

pub fn mime_of(url: &str) -> Option<&str> {
    url.strip_prefix(PREFIX)?
        .split_once(',')
        .map(|(header, _)| header.split(';').next().unwrap_or(header))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        assert_eq!(encode("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_decode_restores_payload() {
        let url = encode("image/jpeg", &[0xFF, 0xD8, 0xFF, 0x00]);
        let (mime, bytes) = decode(&url).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF, 0x00]);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode("image/png;base64,AAAA"), Err(DataUrlError::MissingPrefix));
        assert_eq!(decode("data:image/png;base64"), Err(DataUrlError::MissingSeparator));
        assert_eq!(decode("data:text/plain,hello"), Err(DataUrlError::NotBase64));
        assert!(matches!(
            decode("data:image/png;base64,@@@"),
            Err(DataUrlError::Decode(_))
        ));
    }

    #[test]
    fn test_mime_of() {
        assert_eq!(mime_of("data:image/png;base64,AAAA"), Some("image/png"));
        assert_eq!(mime_of("#"), None);
    }
}
