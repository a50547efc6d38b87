//! Upload validation: only decodable PNG/JPEG images enter the pipeline.
//!
//! Content type is sniffed from magic bytes via `infer`; the claimed
//! filename extension is never trusted on its own. A file whose bytes do
//! not match a supported image format is rejected before any remote call.

use crate::error::{Error, Result};
use crate::models::ImageUpload;

/// MIME types accepted by the upload surface.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// Detect the image MIME type from magic bytes.
///
/// Returns None when the bytes do not match any format `infer` knows.
pub fn detect_image_type(data: &[u8]) -> Option<&'static str> {
    infer::get(data).map(|kind| kind.mime_type())
}

/// Lowercased extension of a filename, if it has one.
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Validate an upload against the input contract.
///
/// Rejects empty payloads and anything that is not PNG or JPEG by
/// content, regardless of what the filename claims.
pub fn validate_upload(upload: &ImageUpload) -> Result<()> {
    if upload.bytes.is_empty() {
        return Err(Error::Validation(format!(
            "{}: image data is empty",
            upload.filename
        )));
    }

    match detect_image_type(&upload.bytes) {
        Some(mime) if ALLOWED_IMAGE_TYPES.contains(&mime) => Ok(()),
        Some(mime) => Err(Error::Validation(format!(
            "{}: unsupported file type {} (allowed: PNG, JPEG)",
            upload.filename, mime
        ))),
        None => Err(Error::Validation(format!(
            "{}: not a recognizable image",
            upload.filename
        ))),
    }
}
