//! Content types the part-handler declares to the boot-time part processor.
//!
//! The processor delivers two non-data markers (`__begin__` / `__end__`)
//! around the part sequence; everything else in the declared set carries a
//! payload to materialize.

use std::fmt;

/// Wire spelling of the sequence-start marker.
pub const BEGIN_MARKER: &str = "__begin__";
/// Wire spelling of the sequence-end marker.
pub const END_MARKER: &str = "__end__";

/// Content type of one user-data MIME part, including the lifecycle markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// Start-of-sequence marker; carries no data.
    Begin,
    /// End-of-sequence marker; carries no data.
    End,
    /// `text/plain` — payload written verbatim.
    TextPlain,
    /// `application/octet-stream` — payload is double base64-encoded binary.
    OctetStream,
    /// `text/x-url` — payload is a URL whose content is downloaded.
    UrlReference,
}

/// Data types advertised to the part processor. The lifecycle markers are
/// delivered unconditionally and are not part of the declared set.
pub const ACCEPTED_TYPES: &[ContentType] = &[
    ContentType::TextPlain,
    ContentType::OctetStream,
    ContentType::UrlReference,
];

impl ContentType {
    /// Parses the wire spelling. Returns `None` for anything outside the
    /// declared set plus markers; unknown types are not representable.
    pub fn parse(s: &str) -> Option<ContentType> {
        match s {
            BEGIN_MARKER => Some(ContentType::Begin),
            END_MARKER => Some(ContentType::End),
            "text/plain" => Some(ContentType::TextPlain),
            "application/octet-stream" => Some(ContentType::OctetStream),
            "text/x-url" => Some(ContentType::UrlReference),
            _ => None,
        }
    }

    /// Wire spelling of this content type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Begin => BEGIN_MARKER,
            ContentType::End => END_MARKER,
            ContentType::TextPlain => "text/plain",
            ContentType::OctetStream => "application/octet-stream",
            ContentType::UrlReference => "text/x-url",
        }
    }

    /// True for the begin/end markers, which carry no payload to handle.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, ContentType::Begin | ContentType::End)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
