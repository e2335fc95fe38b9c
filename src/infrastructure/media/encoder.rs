use std::path::Path;

use base64::engine::general_purpose;
use base64::Engine as _;

use crate::domain::{MediaKind, MediaPayload};

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),
    #[error("cannot determine media type for: {0}")]
    UnknownExtension(String),
    #[error("failed to read media file: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode raw media bytes for transport. Only image and video content types
/// are accepted; there is no size cap here, the backend enforces its own.
pub fn encode_media(bytes: &[u8], mime_type: &str) -> Result<MediaPayload, MediaError> {
    if MediaKind::from_mime(mime_type).is_none() {
        return Err(MediaError::UnsupportedType(mime_type.to_string()));
    }

    Ok(MediaPayload {
        base64_data: general_purpose::STANDARD.encode(bytes),
        mime_type: mime_type.to_string(),
    })
}

/// Read a media file and encode it, deriving the MIME type from the
/// file extension.
pub async fn load_media(path: &Path) -> Result<MediaPayload, MediaError> {
    let mime_type = mime_from_extension(path)?;
    let bytes = tokio::fs::read(path).await?;

    tracing::debug!(
        path = %path.display(),
        mime_type = mime_type,
        bytes = bytes.len(),
        "Encoded media file"
    );

    encode_media(&bytes, mime_type)
}

fn mime_from_extension(path: &Path) -> Result<&'static str, MediaError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| MediaError::UnknownExtension(path.display().to_string()))?;

    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        "heic" => Ok("image/heic"),
        "mp4" => Ok("video/mp4"),
        "mov" => Ok("video/quicktime"),
        "webm" => Ok("video/webm"),
        "mkv" => Ok("video/x-matroska"),
        _ => Err(MediaError::UnknownExtension(path.display().to_string())),
    }
}
