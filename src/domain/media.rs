/// Broad category of user-submitted media, derived from its MIME type.
///
/// Only images and videos can be analyzed; everything else is rejected
/// before any encoding happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            m if m.starts_with("image/") => Some(Self::Image),
            m if m.starts_with("video/") => Some(Self::Video),
            _ => None,
        }
    }
}

/// Base64-encoded media ready for transport to the model backend.
///
/// Immutable once produced by the encoder; one payload per analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaPayload {
    pub base64_data: String,
    pub mime_type: String,
}

impl MediaPayload {
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_mime(&self.mime_type)
    }
}
