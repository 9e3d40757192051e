//! `data:` URL helpers for image entries.

use crate::error::DataUrlError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A decoded data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// MIME type for image file names, `None` for anything that is not an image.
pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        "ico" => Some("image/x-icon"),
        _ => None,
    }
}

pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn decode(url: &str) -> Result<DataUrl, DataUrlError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or(DataUrlError::MissingPrefix)?;
    let (meta, payload) = rest.split_once(',').ok_or(DataUrlError::MissingPrefix)?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or(DataUrlError::NotBase64)?;

    Ok(DataUrl {
        mime: mime.to_string(),
        bytes: STANDARD.decode(payload.trim())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_name() {
        assert_eq!(mime_for_name("logo.PNG"), Some("image/png"));
        assert_eq!(mime_for_name("photo.jpeg"), Some("image/jpeg"));
        assert_eq!(mime_for_name("notes.txt"), None);
        assert_eq!(mime_for_name("Makefile"), None);
    }

    #[test]
    fn test_decode_encoded_url() {
        let url = encode("image/gif", b"GIF89a");
        assert!(url.starts_with("data:image/gif;base64,"));

        let decoded = decode(&url).unwrap();
        assert_eq!(decoded.mime, "image/gif");
        assert_eq!(decoded.bytes, b"GIF89a");
    }

    #[test]
    fn test_decode_rejects_malformed_urls() {
        assert!(matches!(decode("image/png;base64,AA=="), Err(DataUrlError::MissingPrefix)));
        assert!(matches!(decode("data:text/plain,hello"), Err(DataUrlError::NotBase64)));
        assert!(matches!(decode("data:image/png;base64,***"), Err(DataUrlError::Payload(_))));
    }
}
