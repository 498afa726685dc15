//! Wire protocol for the Chimpvine game-result API.
//!
//! This crate defines what the client and the WordPress backend exchange:
//!
//! - **Types** ([`StartReport`], [`EndReport`], [`NonceResponse`], etc.):
//!   the JSON bodies that travel on the wire.
//! - **Endpoints** ([`Endpoint`]): the four fixed routes and how their
//!   URLs are built from an origin.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how bodies are turned
//!   into bytes and back.
//! - **Timestamps** ([`local_timestamp`]): the local wall-clock format
//!   the backend stores.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw HTTP) and session
//! (nonce, progress, user instance). It doesn't know about state; it
//! only knows the shape of each request and response.
//!
//! ```text
//! Transport (HTTP) → Protocol (typed bodies) → Session (state machine)
//! ```

mod codec;
mod endpoint;
mod error;
mod timestamp;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use endpoint::{Endpoint, NONCE_HEADER};
pub use error::ProtocolError;
pub use timestamp::{format_timestamp, local_timestamp, TIMESTAMP_FORMAT};
pub use types::{
    EndReport, GameId, NonceResponse, ProgressResponse, ReportResponse,
    StartReport, UserInstance,
};
