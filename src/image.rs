use std::fs;
use std::path::Path;

use base64::Engine;

use crate::error::WizardError;

/// A reference image supplied by the user alongside the product brief.
/// Held as raw bytes; encoded as base64 only at the transport edge.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageData {
    pub fn load(path: &Path, max_bytes: u64) -> Result<Self, WizardError> {
        let meta = fs::metadata(path).map_err(|e| {
            WizardError::Validation(format!("Cannot read image {}: {}", path.display(), e))
        })?;
        if meta.len() > max_bytes {
            return Err(WizardError::Validation(format!(
                "Image is {} bytes, the limit is {} bytes",
                meta.len(),
                max_bytes
            )));
        }

        let data = fs::read(path).map_err(|e| {
            WizardError::Validation(format!("Cannot read image {}: {}", path.display(), e))
        })?;

        Ok(Self {
            mime_type: mime_for_extension(path),
            data,
        })
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

fn mime_for_extension(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        // jpg, jpeg, or anything unrecognized
        _ => "image/jpeg",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_within_bound() {
        let mut file = tempfile::NamedTempFile::with_suffix(".png").unwrap();
        file.write_all(&[0u8; 128]).unwrap();

        let image = ImageData::load(file.path(), 4 * 1024 * 1024).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data.len(), 128);
    }

    #[test]
    fn test_load_rejects_oversized() {
        let mut file = tempfile::NamedTempFile::with_suffix(".jpg").unwrap();
        file.write_all(&[0u8; 2048]).unwrap();

        let err = ImageData::load(file.path(), 1024).unwrap_err();
        assert!(matches!(err, WizardError::Validation(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err =
            ImageData::load(Path::new("/nonexistent/ref.jpg"), 1024).unwrap_err();
        assert!(matches!(err, WizardError::Validation(_)));
    }

    #[test]
    fn test_mime_defaults_to_jpeg() {
        assert_eq!(mime_for_extension(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for_extension(Path::new("photo.bin")), "image/jpeg");
        assert_eq!(mime_for_extension(Path::new("photo.WEBP")), "image/webp");
    }

    #[test]
    fn test_base64_roundtrip() {
        let image = ImageData {
            mime_type: "image/png".to_string(),
            data: vec![1, 2, 3, 4],
        };
        assert_eq!(image.to_base64(), "AQIDBA==");
    }
}
