//! Octet-stream payload decoding.
//!
//! Binary payloads reach the handler base64-encoded twice: the provisioner
//! encodes the attachment when building the MIME body, then encodes the
//! whole user-data blob again for the instance-launch API. Two decode
//! passes recover the original bytes.

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine};

/// Reverses both encoding layers of an `application/octet-stream` payload.
pub fn decode_octet_stream(payload: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let inner = STANDARD.decode(payload)?;
    STANDARD.decode(inner)
}
