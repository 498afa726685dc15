//! Game session client for the Chimpvine game-result API.
//!
//! This crate handles the lifecycle of one embedded game session:
//!
//! 1. **Origin**: finding out which backend to talk to ([`OriginLookup`])
//! 2. **Authentication**: obtaining a WordPress REST nonce
//! 3. **Progress**: loading the player's saved level, then signalling
//!    readiness ([`SessionClient::on_ready`], [`ReadySignal`])
//! 4. **Reports**: start-of-level and end-of-level telemetry, correlated
//!    by a server-issued [`UserInstance`](chimpvine_protocol::UserInstance)
//!
//! # How it fits in the stack
//!
//! ```text
//! Game logic (above)  ← reads/writes GameProgress, triggers reports
//!     ↕
//! Session Layer (this crate)  ← nonce, state machine, user instance
//!     ↕
//! Protocol + Transport (below)  ← wire types, HTTP
//! ```

#![allow(async_fn_in_trait)]

mod client;
mod error;
mod origin;
mod ready;
mod session;

pub use client::SessionClient;
pub use error::{FailureKind, SessionError};
pub use origin::{EnvOrigin, OriginLookup, StaticOrigin, ORIGIN_ENV_VAR};
pub use ready::ReadySignal;
pub use session::{Failure, GameProgress, SessionConfig, SessionState};
