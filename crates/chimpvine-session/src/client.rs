//! The session client: nonce handshake, progress fetch, and level reports.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Resolving the backend origin once, at construction
//! - Obtaining a REST nonce and, straight after, the saved progress
//! - Telling listeners when the session is ready
//! - Sending start-of-level and end-of-level reports, correlated by the
//!   server-issued [`UserInstance`]
//!
//! # Concurrency note
//!
//! `SessionClient` is NOT shared between tasks. Every operation takes
//! `&mut self`, so one owner drives the session and no two requests of
//! the same session can overlap. Other tasks that only need to know when
//! the session is ready use a [`ReadySignal`] instead of the client.

use chimpvine_protocol::{
    local_timestamp, Codec, EndReport, Endpoint, JsonCodec, NonceResponse,
    ProgressResponse, ReportResponse, StartReport, UserInstance, NONCE_HEADER,
};
use chimpvine_transport::{HttpRequest, HttpTransport, Method};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::watch;

use crate::origin::{normalize, OriginLookup};
use crate::{
    Failure, GameProgress, ReadySignal, SessionConfig, SessionError,
    SessionState,
};

type ReadyListener = Box<dyn FnMut(&GameProgress) + Send>;

/// Drives one game session against the backend.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ start() ──→ fetch_nonce() ──→ fetch_progress() ──→ [Ready]
///                                                                  │
///              report_start() ──→ report_end() ──→ report_start() ─┘ ...
/// ```
///
/// Reports are never sequenced automatically; the game calls them when a
/// level begins and ends.
pub struct SessionClient<T: HttpTransport, C: Codec = JsonCodec> {
    config: SessionConfig,
    transport: T,
    codec: C,

    /// Backend origin without a trailing slash. `None` if the lookup
    /// failed (or the API is disabled).
    origin: Option<String>,

    /// REST nonce. Set once by a successful nonce fetch, never refreshed.
    nonce: Option<String>,

    /// Correlation key from the most recent successful report.
    user_instance: UserInstance,

    progress: GameProgress,

    /// Current lifecycle state. Receivers live in [`ReadySignal`]s.
    state: watch::Sender<SessionState>,

    listeners: Vec<ReadyListener>,

    /// Raw body of the last successful report response.
    last_response: Option<String>,

    /// Message of the last failure, of any operation.
    last_error: Option<String>,
}

impl<T: HttpTransport> SessionClient<T, JsonCodec> {
    /// Creates a client that speaks JSON.
    ///
    /// See [`with_codec`](Self::with_codec) for how the origin is resolved.
    pub fn new<L>(config: SessionConfig, transport: T, lookup: &L) -> Self
    where
        L: OriginLookup + ?Sized,
    {
        Self::with_codec(config, transport, JsonCodec, lookup)
    }
}

impl<T: HttpTransport, C: Codec> SessionClient<T, C> {
    /// Creates a client and resolves the backend origin.
    ///
    /// In testing mode the configured test origin is used and `lookup` is
    /// not consulted. If no origin can be resolved the failure is logged
    /// and the session starts out `Failed`; construction itself never
    /// fails. With `api_disabled` no origin is resolved at all.
    pub fn with_codec<L>(
        config: SessionConfig,
        transport: T,
        codec: C,
        lookup: &L,
    ) -> Self
    where
        L: OriginLookup + ?Sized,
    {
        let (state, _) = watch::channel(SessionState::Idle);

        let mut client = Self {
            config,
            transport,
            codec,
            origin: None,
            nonce: None,
            user_instance: UserInstance::default(),
            progress: GameProgress::default(),
            state,
            listeners: Vec::new(),
            last_response: None,
            last_error: None,
        };

        if client.config.api_disabled {
            tracing::info!(
                game_id = %client.config.game_id,
                "api disabled, network calls will be skipped"
            );
            return client;
        }

        client.origin = if client.config.testing {
            normalize(Some(client.config.effective_test_origin().to_string()))
        } else {
            normalize(lookup.origin())
        };

        match &client.origin {
            Some(origin) => tracing::info!(
                %origin,
                game_id = %client.config.game_id,
                testing = client.config.testing,
                "session origin resolved"
            ),
            None => {
                let err = SessionError::Configuration(
                    "origin lookup returned nothing".into(),
                );
                tracing::error!(error = %err, "cannot resolve session origin");
                client.last_error = Some(err.to_string());
                client.state.send_replace(SessionState::Failed(Failure {
                    kind: err.kind(),
                    reason: err.to_string(),
                }));
            }
        }

        client
    }

    // =====================================================================
    // Notifications
    // =====================================================================

    /// Registers a listener called every time the session becomes ready.
    ///
    /// That is once per successful progress fetch, or once from
    /// [`start`](Self::start) when the API is disabled. Listeners
    /// registered after the fact are not called retroactively; use
    /// [`subscribe`](Self::subscribe) for that.
    pub fn on_ready<F>(&mut self, listener: F)
    where
        F: FnMut(&GameProgress) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Returns a signal that resolves when the startup chain settles.
    pub fn subscribe(&self) -> ReadySignal {
        ReadySignal::new(self.state.subscribe())
    }

    // =====================================================================
    // Startup chain
    // =====================================================================

    /// Runs the startup chain: nonce, then progress.
    ///
    /// With the API disabled this sends nothing, marks the session ready
    /// (listeners fire on the first call only) and returns the stored
    /// progress.
    ///
    /// # Errors
    /// Whatever stopped the chain. The failure has already been logged
    /// and the state set to `Failed`.
    pub async fn start(&mut self) -> Result<GameProgress, SessionError> {
        if self.config.api_disabled {
            if !self.is_ready() {
                self.mark_ready();
            }
            return Ok(self.progress.clone());
        }

        self.fetch_nonce().await?;
        Ok(self.progress.clone())
    }

    /// Requests a REST nonce, and on success fetches progress.
    ///
    /// The progress fetch only ever runs as the continuation of a nonce
    /// the server accepted. There is no retry. A session that is already
    /// ready stays ready while the nonce is renewed.
    pub async fn fetch_nonce(&mut self) -> Result<(), SessionError> {
        if self.config.api_disabled {
            return Ok(());
        }

        let nonce = match self.request_nonce().await {
            Ok(nonce) => nonce,
            Err(err) => return Err(self.fail_chain(Endpoint::Nonce, err)),
        };

        self.nonce = Some(nonce);
        let refreshing = self.state.borrow().is_ready();
        if !refreshing {
            self.state.send_replace(SessionState::Authenticated);
        }
        tracing::info!(refreshing, "nonce acquired");

        self.fetch_progress().await.map(|_| ())
    }

    async fn request_nonce(&self) -> Result<String, SessionError> {
        let (response, raw) = self
            .exchange::<NonceResponse>(Endpoint::Nonce, None, None)
            .await?;

        if response.success {
            Ok(response.data)
        } else {
            Err(SessionError::Rejected(format!(
                "nonce endpoint answered success=false: {raw}"
            )))
        }
    }

    /// Fetches saved progress and marks the session ready.
    ///
    /// May be called again later to refresh the level; listeners fire on
    /// every successful fetch.
    ///
    /// # Errors
    /// [`SessionError::NotAuthenticated`] without a nonce (nothing is
    /// sent), otherwise the request's failure. On failure the stored
    /// level is left unchanged.
    pub async fn fetch_progress(
        &mut self,
    ) -> Result<GameProgress, SessionError> {
        if self.config.api_disabled {
            return Ok(self.progress.clone());
        }

        let endpoint = Endpoint::Progress(self.config.game_id);
        let Some(nonce) = self.nonce.clone() else {
            return Err(
                self.record_failure(endpoint, SessionError::NotAuthenticated)
            );
        };

        match self
            .exchange::<ProgressResponse>(endpoint, None, Some(&nonce))
            .await
        {
            Ok((response, _)) => {
                self.progress.level = response.level;
                tracing::info!(level = response.level, "progress loaded");
                self.mark_ready();
                Ok(self.progress.clone())
            }
            Err(err) => Err(self.fail_chain(endpoint, err)),
        }
    }

    // =====================================================================
    // Reports
    // =====================================================================

    /// Reports that a level has started.
    ///
    /// `level` is the caller's level and is independent of
    /// [`GameProgress::level`]. On success the returned user instance is
    /// stored for the next end report.
    ///
    /// Without a nonce the report is sent with an empty one (the server
    /// rejects it) unless `strict_auth` is set, in which case it fails
    /// locally with [`SessionError::NotAuthenticated`].
    ///
    /// # Errors
    /// On any failure the stored user instance is left unchanged.
    pub async fn report_start(
        &mut self,
        level: i32,
        sound_on: bool,
        music_on: bool,
    ) -> Result<UserInstance, SessionError> {
        if self.config.api_disabled {
            return Ok(self.user_instance);
        }

        let endpoint = Endpoint::StartReport;
        let nonce = self.report_nonce(endpoint)?;
        let report = StartReport::new(
            self.config.game_id,
            level,
            local_timestamp(),
            sound_on,
            music_on,
        );

        tracing::debug!(level, sound_on, music_on, "reporting level start");
        self.submit_report(endpoint, &report, &nonce).await
    }

    /// Reports that a level has ended, correlated with the user instance
    /// from the most recent successful report.
    ///
    /// The response's user instance replaces the stored one.
    pub async fn report_end(
        &mut self,
        points_earned: i32,
        total_points: i32,
        level_data: impl Into<String>,
        is_level_completed: bool,
    ) -> Result<UserInstance, SessionError> {
        if self.config.api_disabled {
            return Ok(self.user_instance);
        }

        let endpoint = Endpoint::EndReport;
        let nonce = self.report_nonce(endpoint)?;

        if self.user_instance.is_unset() {
            tracing::warn!("end report without a prior start report");
        }

        let report = EndReport::new(
            self.user_instance,
            points_earned,
            total_points,
            local_timestamp(),
            is_level_completed,
            level_data,
        );

        tracing::debug!(
            user_instance = %self.user_instance,
            points_earned,
            total_points,
            is_level_completed,
            "reporting level end"
        );
        self.submit_report(endpoint, &report, &nonce).await
    }

    /// [`report_end`](Self::report_end) with the values currently held in
    /// [`GameProgress`].
    pub async fn report_end_from_progress(
        &mut self,
    ) -> Result<UserInstance, SessionError> {
        let progress = self.progress.clone();
        self.report_end(
            progress.points_earned,
            progress.total_points,
            progress.level_data,
            progress.is_level_completed,
        )
        .await
    }

    /// The nonce to send with a report.
    fn report_nonce(
        &mut self,
        endpoint: Endpoint,
    ) -> Result<String, SessionError> {
        if let Some(nonce) = &self.nonce {
            return Ok(nonce.clone());
        }

        if self.config.strict_auth {
            return Err(
                self.record_failure(endpoint, SessionError::NotAuthenticated)
            );
        }

        tracing::warn!(
            endpoint = endpoint.name(),
            "no nonce yet, sending with an empty nonce"
        );
        Ok(String::new())
    }

    async fn submit_report<R: Serialize>(
        &mut self,
        endpoint: Endpoint,
        report: &R,
        nonce: &str,
    ) -> Result<UserInstance, SessionError> {
        let outcome = match self.codec.encode(report) {
            Ok(body) => {
                self.exchange::<ReportResponse>(endpoint, Some(body), Some(nonce))
                    .await
            }
            Err(err) => Err(err.into()),
        };

        match outcome {
            Ok((response, raw)) => {
                self.user_instance = response.userinstance;
                self.last_response = Some(raw);
                tracing::info!(
                    endpoint = endpoint.name(),
                    user_instance = %self.user_instance,
                    status = %response.status,
                    "report accepted"
                );
                Ok(self.user_instance)
            }
            Err(err) => Err(self.record_failure(endpoint, err)),
        }
    }

    // =====================================================================
    // Plumbing
    // =====================================================================

    /// Sends one request to `endpoint` and decodes a 2xx body.
    ///
    /// Returns the decoded body and its raw text.
    async fn exchange<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: Option<Vec<u8>>,
        nonce: Option<&str>,
    ) -> Result<(R, String), SessionError> {
        let origin = self.origin.as_deref().ok_or_else(|| {
            SessionError::Configuration("no server origin".into())
        })?;
        let url = endpoint.url(origin);

        let mut request = match endpoint.method() {
            Method::Get => HttpRequest::get(url),
            Method::Post => HttpRequest::post(url, body.unwrap_or_default())
                .header("Content-Type", self.codec.content_type()),
        };
        if endpoint.requires_nonce() {
            request = request.header(NONCE_HEADER, nonce.unwrap_or_default());
        }

        tracing::debug!(
            endpoint = endpoint.name(),
            method = %request.method,
            url = %request.url,
            "calling backend"
        );

        let response = self.transport.send(request).await?;
        let raw = response.text().into_owned();

        if !response.is_success() {
            return Err(SessionError::Status {
                status: response.status,
                body: raw,
            });
        }

        match self.codec.decode(&response.body) {
            Ok(decoded) => Ok((decoded, raw)),
            Err(source) => Err(SessionError::Undecodable { body: raw, source }),
        }
    }

    /// Logs a failed operation and remembers it as the last error.
    fn record_failure(
        &mut self,
        endpoint: Endpoint,
        err: SessionError,
    ) -> SessionError {
        tracing::error!(
            endpoint = endpoint.name(),
            kind = %err.kind(),
            error = %err,
            "request failed"
        );
        self.last_error = Some(err.to_string());
        err
    }

    /// Like [`record_failure`](Self::record_failure), and also stops the
    /// startup chain. A session that is already ready stays ready.
    fn fail_chain(
        &mut self,
        endpoint: Endpoint,
        err: SessionError,
    ) -> SessionError {
        let err = self.record_failure(endpoint, err);
        let ready = self.state.borrow().is_ready();
        if !ready {
            self.state.send_replace(SessionState::Failed(Failure {
                kind: err.kind(),
                reason: err.to_string(),
            }));
        }
        err
    }

    fn mark_ready(&mut self) {
        let snapshot = self.progress.clone();
        self.state.send_replace(SessionState::Ready(snapshot.clone()));
        tracing::info!(level = snapshot.level, "session ready");
        for listener in &mut self.listeners {
            listener(&snapshot);
        }
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The resolved backend origin, if any.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    pub fn user_instance(&self) -> UserInstance {
        self.user_instance
    }

    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    /// Mutable access for game logic (points, level data, toggles).
    pub fn progress_mut(&mut self) -> &mut GameProgress {
        &mut self.progress
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

// =========================================================================
// Tests
// =========================================================================
