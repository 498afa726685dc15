//! Error types for the session layer.
//!
//! Every request the client makes can fail in one of a handful of ways,
//! and the game usually only wants to know *which kind* of failure it
//! was: was the embedding misconfigured, was the network down, did the
//! server say no? [`SessionError`] keeps the details for the log, and
//! [`FailureKind`] is the coarse answer the game can branch on.

use std::fmt;

use chimpvine_protocol::ProtocolError;
use chimpvine_transport::TransportError;

/// Coarse classification of a failure, used in logs and in the
/// [`SessionState::Failed`](crate::SessionState::Failed) state.
///
/// The variants follow the order in which a request can go wrong: first
/// we need an origin, then a response, then a 2xx status, then a body
/// that says yes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The origin could not be resolved; nothing was sent.
    Configuration,
    /// No response arrived (DNS, refused connection, client timeout).
    Transport,
    /// A response arrived with a non-2xx status.
    Protocol,
    /// A 2xx response whose body says no, or can't be understood.
    Application,
    /// The call was refused locally because a prior step hasn't happened.
    Precondition,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Transport => write!(f, "transport"),
            Self::Protocol => write!(f, "protocol"),
            Self::Application => write!(f, "application"),
            Self::Precondition => write!(f, "precondition"),
        }
    }
}

/// Errors that can occur while driving a session.
///
/// Every operation on [`SessionClient`](crate::SessionClient) logs its
/// failure before returning one of these, so callers that only care
/// about the happy path may drop the error.
///
/// Whenever the server sent a body, the variant keeps it. WordPress
/// tends to explain itself in the body (`rest_cookie_invalid_nonce`, an
/// HTML error page from a plugin), and that text is usually the fastest
/// way to find out what went wrong.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No usable server origin (empty embedding lookup, bad config file).
    #[error("configuration failed: {0}")]
    Configuration(String),

    /// The request never got a response.
    ///
    /// `#[error(transparent)]` forwards the message of the inner
    /// [`TransportError`] unchanged, and `#[from]` lets `?` convert it.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status. `body` is the raw
    /// response text, kept for diagnostics.
    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The server answered 2xx but refused the request in its body
    /// (e.g. `{"success": false}` from the nonce endpoint). The message
    /// includes the body the server sent.
    #[error("request rejected by server: {0}")]
    Rejected(String),

    /// A 2xx response whose body didn't have the expected shape.
    ///
    /// Typically an HTML page served with status 200, or a report
    /// response missing `userinstance`.
    #[error("unexpected response body ({source}): {body}")]
    Undecodable {
        body: String,
        #[source]
        source: ProtocolError,
    },

    /// A request body could not be encoded. Nothing was sent.
    #[error(transparent)]
    Codec(#[from] ProtocolError),

    /// An authenticated call was made before a nonce was obtained.
    #[error("no nonce: the session has not authenticated")]
    NotAuthenticated,

    /// The session's startup chain failed; reported through
    /// [`ReadySignal`](crate::ReadySignal).
    ///
    /// `kind` and `reason` are copied from the error that stopped the
    /// chain, since the original error was already handed to whoever
    /// called [`start`](crate::SessionClient::start).
    #[error("session halted ({kind}): {reason}")]
    Halted { kind: FailureKind, reason: String },

    /// The client was dropped before the session settled.
    #[error("session client dropped before the session settled")]
    Closed,
}

impl SessionError {
    /// Maps this error onto the failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Configuration(_) => FailureKind::Configuration,
            Self::Transport(_) => FailureKind::Transport,
            Self::Status { .. } => FailureKind::Protocol,
            Self::Rejected(_) | Self::Undecodable { .. } | Self::Codec(_) => {
                FailureKind::Application
            }
            Self::NotAuthenticated | Self::Closed => FailureKind::Precondition,
            Self::Halted { kind, .. } => *kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            SessionError::Configuration("x".into()).kind(),
            FailureKind::Configuration
        );
        assert_eq!(
            SessionError::Transport(TransportError::InvalidRequest("x".into()))
                .kind(),
            FailureKind::Transport
        );
        assert_eq!(
            SessionError::Status { status: 500, body: String::new() }.kind(),
            FailureKind::Protocol
        );
        assert_eq!(
            SessionError::Rejected("no".into()).kind(),
            FailureKind::Application
        );
        assert_eq!(
            SessionError::NotAuthenticated.kind(),
            FailureKind::Precondition
        );
        assert_eq!(
            SessionError::Halted {
                kind: FailureKind::Transport,
                reason: "down".into()
            }
            .kind(),
            FailureKind::Transport
        );
    }

    #[test]
    fn test_undecodable_message_includes_body() {
        let source = serde_json::from_str::<serde_json::Value>("<html>")
            .expect_err("not JSON");
        let err = SessionError::Undecodable {
            body: "<html>Briefly unavailable</html>".into(),
            source: ProtocolError::Decode(source),
        };

        assert_eq!(err.kind(), FailureKind::Application);
        assert!(err.to_string().contains("Briefly unavailable"));
    }

    #[test]
    fn test_status_message_includes_body() {
        let err = SessionError::Status {
            status: 403,
            body: "rest_cookie_invalid_nonce".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("rest_cookie_invalid_nonce"));
    }
}
