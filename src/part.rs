//! One MIME part of boot-time user-data.

use crate::content_type::ContentType;

/// A single part as delivered by the part processor. Transient; lives only
/// for the duration of one handler invocation.
#[derive(Debug, Clone)]
pub struct Part {
    /// Content type or lifecycle marker.
    pub content_type: ContentType,
    /// Filename from the part's Content-Disposition. Used as-is.
    pub filename: String,
    /// Raw payload bytes; meaning depends on `content_type`.
    pub payload: Vec<u8>,
}

impl Part {
    pub fn new(content_type: ContentType, filename: impl Into<String>, payload: Vec<u8>) -> Self {
        Part {
            content_type,
            filename: filename.into(),
            payload,
        }
    }
}
