//! # Chimpvine
//!
//! Session client for games embedded in a Chimpvine WordPress site.
//!
//! A session authenticates with a REST nonce, loads the player's saved
//! level, and then reports when each level starts and ends. Games build
//! a [`SessionClient`](chimpvine_session::SessionClient) with
//! [`SessionBuilder`] and drive it from their own game loop.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chimpvine::prelude::*;
//!
//! # async fn run() -> Result<(), ChimpvineError> {
//! chimpvine::logging::init();
//!
//! let mut client = SessionBuilder::new()
//!     .game_id(5)
//!     .build(&EnvOrigin::default());
//!
//! let progress = client.start().await?;
//! client.report_start(progress.level, true, false).await?;
//! // ... the level is played ...
//! client.report_end(40, 50, "", true).await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
pub mod logging;

pub use builder::SessionBuilder;
pub use error::ChimpvineError;

/// Re-exports everything a game needs.
pub mod prelude {
    pub use crate::{ChimpvineError, SessionBuilder};
    pub use chimpvine_protocol::{GameId, UserInstance};
    pub use chimpvine_session::{
        EnvOrigin, FailureKind, GameProgress, OriginLookup, ReadySignal,
        SessionClient, SessionConfig, SessionError, SessionState,
        StaticOrigin,
    };
    pub use chimpvine_transport::{HttpTransport, ReqwestTransport};
}
