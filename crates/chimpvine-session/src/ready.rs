//! One-shot "session ready" signal.

use tokio::sync::watch;

use crate::{GameProgress, SessionError, SessionState};

/// Resolves once the session's startup chain has settled.
///
/// Obtained from [`SessionClient::subscribe`](crate::SessionClient::subscribe).
/// It holds its own receiver, so it can be moved into another task and
/// awaited while the client is busy.
#[derive(Debug, Clone)]
pub struct ReadySignal {
    rx: watch::Receiver<SessionState>,
}

impl ReadySignal {
    pub(crate) fn new(rx: watch::Receiver<SessionState>) -> Self {
        Self { rx }
    }

    /// Waits for `Ready` or `Failed`.
    ///
    /// Returns immediately if the session has already settled.
    ///
    /// # Errors
    /// - [`SessionError::Halted`] if the chain failed
    /// - [`SessionError::Closed`] if the client was dropped first
    pub async fn wait(&mut self) -> Result<GameProgress, SessionError> {
        let state = self
            .rx
            .wait_for(SessionState::is_settled)
            .await
            .map_err(|_| SessionError::Closed)?;

        match &*state {
            SessionState::Ready(progress) => Ok(progress.clone()),
            SessionState::Failed(failure) => Err(SessionError::Halted {
                kind: failure.kind,
                reason: failure.reason.clone(),
            }),
            // wait_for only hands back settled states.
            SessionState::Idle | SessionState::Authenticated => {
                Err(SessionError::Closed)
            }
        }
    }

    /// The state as of now, without waiting.
    pub fn current(&self) -> SessionState {
        self.rx.borrow().clone()
    }
}
