//! Unified error type for the Chimpvine client.

use chimpvine_protocol::ProtocolError;
use chimpvine_session::SessionError;
use chimpvine_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `chimpvine` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ChimpvineError {
    /// A transport-level error (DNS, refused connection, body read).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (origin, nonce, status, rejected report).
    #[error(transparent)]
    Session(#[from] SessionError),
}
