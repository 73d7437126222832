//! Handler error taxonomy.
//!
//! Directory pre-existence is not an error and never reaches this type.
//! Everything else surfaces to the part processor, which logs and moves on
//! to the next part.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure handling one part.
#[derive(Debug, Error)]
pub enum PartError {
    /// Base directory could not be created for a reason other than already
    /// existing (e.g. permissions, read-only filesystem).
    #[error("failed to create base directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Target file could not be created or written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Octet-stream payload was not valid base64 at one of the two layers.
    #[error("malformed octet-stream payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// URL payload was not valid UTF-8.
    #[error("URL payload is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// URL payload did not parse as a URL.
    #[error("invalid URL payload: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transfer-level failure (connect, timeout, TLS, bad scheme).
    #[error("transfer failed: {0}")]
    Curl(#[from] curl::Error),

    /// Fetch completed but the server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },
}
