pub mod admin;
pub mod auth;
pub mod results;
pub mod vote;

use std::sync::Arc;

use client::{HttpBackend, SystemClock, VotingSession};

use crate::store::SessionStore;
use crate::ui::ConsoleNotifier;

/// Shared handles for a single command invocation.
pub struct Context {
    pub backend: Arc<HttpBackend>,
    pub store: SessionStore,
}

impl Context {
    /// Build and load a session over the HTTP backend.
    pub async fn session(&self) -> Arc<VotingSession> {
        VotingSession::connect(
            self.backend.clone(),
            self.backend.clone(),
            Arc::new(ConsoleNotifier),
            Arc::new(SystemClock),
        )
        .await
    }
}
