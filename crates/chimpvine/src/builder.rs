//! `SessionBuilder`: configures and constructs a session client.
//!
//! This is the entry point for most games. It ties together the layers
//! (transport → protocol → session) and picks the defaults: JSON bodies
//! over a shared `reqwest` client.

use std::path::Path;

use chimpvine_protocol::GameId;
use chimpvine_session::{OriginLookup, SessionClient, SessionConfig};
use chimpvine_transport::{HttpTransport, ReqwestTransport};

use crate::ChimpvineError;

/// Builder for a [`SessionClient`].
///
/// # Example
///
/// ```rust,no_run
/// use chimpvine::prelude::*;
///
/// # async fn run() -> Result<(), ChimpvineError> {
/// let mut client = SessionBuilder::new()
///     .game_id(5)
///     .build(&EnvOrigin::default());
///
/// let progress = client.start().await?;
/// client.report_start(progress.level, true, true).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    config: SessionConfig,
    http: Option<reqwest::Client>,
}

impl SessionBuilder {
    /// Creates a builder with [`SessionConfig::default`].
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            http: None,
        }
    }

    /// Starts from a JSON config file.
    ///
    /// # Errors
    /// Returns a session configuration error if the file can't be read
    /// or parsed.
    pub fn from_config_file(
        path: impl AsRef<Path>,
    ) -> Result<Self, ChimpvineError> {
        let config = SessionConfig::from_json_file(path)?;
        Ok(Self::new().config(config))
    }

    /// Replaces the whole session configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the backend's identifier for this game.
    pub fn game_id(mut self, id: i32) -> Self {
        self.config.game_id = GameId(id);
        self
    }

    /// Skips every network call; the session is ready immediately.
    pub fn api_disabled(mut self, disabled: bool) -> Self {
        self.config.api_disabled = disabled;
        self
    }

    /// Switches on testing mode with a fixed origin.
    pub fn test_origin(mut self, origin: impl Into<String>) -> Self {
        self.config = self.config.with_test_origin(origin);
        self
    }

    /// Refuse to send reports before authentication has succeeded.
    pub fn strict_auth(mut self, strict: bool) -> Self {
        self.config.strict_auth = strict;
        self
    }

    /// Uses a preconfigured `reqwest` client (timeouts, proxies).
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// The configuration the client will be built with.
    pub fn session_config(&self) -> &SessionConfig {
        &self.config
    }

    /// Builds a client on the default `reqwest` transport.
    ///
    /// Resolves the origin through `lookup` unless testing mode is on.
    pub fn build<L>(mut self, lookup: &L) -> SessionClient<ReqwestTransport>
    where
        L: OriginLookup + ?Sized,
    {
        let transport = match self.http.take() {
            Some(client) => {
                tracing::debug!("using caller-supplied reqwest client");
                ReqwestTransport::with_client(client)
            }
            None => ReqwestTransport::new(),
        };
        self.build_with(transport, lookup)
    }

    /// Builds a client on a custom transport.
    pub fn build_with<T, L>(self, transport: T, lookup: &L) -> SessionClient<T>
    where
        T: HttpTransport,
        L: OriginLookup + ?Sized,
    {
        tracing::debug!(
            game_id = %self.config.game_id,
            api_disabled = self.config.api_disabled,
            testing = self.config.testing,
            strict_auth = self.config.strict_auth,
            "building session client"
        );
        SessionClient::new(self.config, transport, lookup)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
