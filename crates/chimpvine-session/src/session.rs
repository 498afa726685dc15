//! Session types: configuration, game progress, and the lifecycle state.
//!
//! A "session" is one play-through of an embedded game against the
//! backend. It tracks:
//! - WHICH game it reports for (`SessionConfig::game_id`)
//! - WHAT the player has achieved (`GameProgress`)
//! - WHERE it is in the startup handshake (`SessionState`)

use std::fmt;
use std::path::Path;

use chimpvine_protocol::GameId;
use serde::{Deserialize, Serialize};

use crate::{FailureKind, SessionError};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration fixed when the client is constructed.
///
/// `#[serde(default)]` lets a config file name only the fields it cares
/// about; everything else falls back to [`SessionConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// The backend's identifier for this game.
    pub game_id: GameId,

    /// Skip every network call. The session reports ready immediately
    /// with default progress, for offline or standalone play.
    pub api_disabled: bool,

    /// Use `test_origin` instead of asking the [`OriginLookup`](crate::OriginLookup).
    pub testing: bool,

    /// Origin used in testing mode. Falls back to
    /// [`SessionConfig::DEFAULT_TEST_ORIGIN`] when unset or empty.
    pub test_origin: Option<String>,

    /// Refuse to send reports before a nonce is held, instead of sending
    /// them with an empty nonce and letting the server reject them.
    pub strict_auth: bool,
}

impl SessionConfig {
    /// Origin used in testing mode when none is configured.
    pub const DEFAULT_TEST_ORIGIN: &'static str = "http://localhost/wordpress";

    /// A default config for `game_id`.
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            ..Self::default()
        }
    }

    pub fn with_api_disabled(mut self, disabled: bool) -> Self {
        self.api_disabled = disabled;
        self
    }

    /// Switches on testing mode with the given origin.
    pub fn with_test_origin(mut self, origin: impl Into<String>) -> Self {
        self.testing = true;
        self.test_origin = Some(origin.into());
        self
    }

    pub fn with_strict_auth(mut self, strict: bool) -> Self {
        self.strict_auth = strict;
        self
    }

    /// The origin testing mode will use.
    pub fn effective_test_origin(&self) -> &str {
        match self.test_origin.as_deref() {
            Some(origin) if !origin.trim().is_empty() => origin,
            _ => Self::DEFAULT_TEST_ORIGIN,
        }
    }

    /// Parses a config from JSON.
    ///
    /// # Errors
    /// Returns [`SessionError::Configuration`] if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, SessionError> {
        serde_json::from_str(json).map_err(|e| {
            SessionError::Configuration(format!("invalid session config: {e}"))
        })
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    /// Returns [`SessionError::Configuration`] if the file can't be read
    /// or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SessionError::Configuration(format!(
                "cannot read {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&json)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_id: GameId(0),
            api_disabled: false,
            testing: false,
            test_origin: None,
            strict_auth: false,
        }
    }
}

// ---------------------------------------------------------------------------
// GameProgress
// ---------------------------------------------------------------------------

/// Player-facing state exchanged with the backend.
///
/// Game logic reads and writes these fields freely through
/// [`SessionClient::progress_mut`](crate::SessionClient::progress_mut).
/// The client itself only writes `level`, from a successful progress
/// fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProgress {
    pub level: i32,
    pub total_points: i32,
    pub points_earned: i32,
    /// Game-defined blob, sent verbatim as `LevelData`.
    pub level_data: String,
    pub is_level_completed: bool,
    pub sound_on: bool,
    pub music_on: bool,
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Why the startup chain stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub reason: String,
}

/// Where the session is in its startup handshake.
///
/// ```text
///   Idle ──(nonce ok)──→ Authenticated ──(progress ok)──→ Ready
///    │                        │
///    └──────(any failure)─────┴──────────────────────────→ Failed
/// ```
///
/// - **Idle**: origin resolved, nothing sent yet.
/// - **Authenticated**: a nonce is held; the progress fetch is running.
/// - **Ready**: progress is loaded. Carries the snapshot taken at that
///   moment.
/// - **Failed**: the chain stopped. There is no automatic retry; calling
///   [`start`](crate::SessionClient::start) again re-runs it.
///
/// A session with no usable origin starts out `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Authenticated,
    Ready(GameProgress),
    Failed(Failure),
}

impl SessionState {
    /// `true` once the chain has either succeeded or failed.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Authenticated => write!(f, "Authenticated"),
            Self::Ready(_) => write!(f, "Ready"),
            Self::Failed(failure) => write!(f, "Failed({})", failure.kind),
        }
    }
}
