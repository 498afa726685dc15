//! Codec trait and implementations for request and response bodies.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The session layer doesn't care HOW bodies are serialized. It asks the
//! codec for bytes and for the `Content-Type` to announce them with.
//!
//! The backend only speaks JSON today, so [`JsonCodec`] is the one
//! implementation.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode request bodies and decode response bodies.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the decoded value
/// owns its data, so the response buffer can be dropped right after.
pub trait Codec: Send + Sync + 'static {
    /// The `Content-Type` header value for bodies this codec produces.
    fn content_type(&self) -> &'static str;

    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or
    /// don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use chimpvine_protocol::{Codec, JsonCodec, ProgressResponse};
///
/// let codec = JsonCodec;
/// let progress: ProgressResponse = codec.decode(br#"{"Level":7}"#).unwrap();
/// assert_eq!(progress.level, 7);
/// assert_eq!(codec.content_type(), "application/json");
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{NonceResponse, ReportResponse, UserInstance};

    #[test]
    fn test_decode_nonce_response() {
        let resp: NonceResponse = JsonCodec
            .decode(br#"{"success":true,"data":"abc123"}"#)
            .expect("should decode");
        assert!(resp.success);
        assert_eq!(resp.data, "abc123");
    }

    #[test]
    fn test_decode_html_page_is_decode_error() {
        // WordPress error pages come back as HTML even with a 200.
        let result: Result<ReportResponse, _> =
            JsonCodec.decode(b"<html><body>Critical error</body></html>");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_empty_body_is_decode_error() {
        let result: Result<ReportResponse, _> = JsonCodec.decode(b"");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let resp: ReportResponse = JsonCodec
            .decode(br#"{"status":"ok","userinstance":3,"extra":[1,2]}"#)
            .expect("unknown fields are ignored");
        assert_eq!(resp.userinstance, UserInstance(3));
    }

    #[test]
    fn test_encode_produces_compact_json() {
        let bytes = JsonCodec
            .encode(&UserInstance(9))
            .expect("should encode");
        assert_eq!(bytes, b"9");
    }
}
