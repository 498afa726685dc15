//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. When you see a
//! `ProtocolError`, the HTTP exchange itself worked; the problem is that a
//! body could not be produced or understood. Networking failures live in
//! `TransportError`, and "the server said no" lives in the session layer.

/// Errors that can occur while encoding requests or decoding responses.
///
/// `#[derive(thiserror::Error)]` generates the `std::error::Error`
/// implementation, and each `#[error("...")]` attribute is the message
/// printed when the error is displayed or logged.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of an outgoing report failed.
    ///
    /// The report types are plain structs of numbers and strings, so in
    /// practice this only shows up with a custom [`Codec`](crate::Codec).
    /// The inner `serde_json::Error` is kept so the log says which field
    /// was the problem.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// A response body did not match the expected shape.
    ///
    /// Common causes: an HTML error page served with a 200 status,
    /// a missing `userinstance`, a `Level` sent as a string, or a
    /// truncated body. The session layer pairs this with the raw body.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
