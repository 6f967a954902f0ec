use async_trait::async_trait;
use common::{NewTeam, NewVotingConfig, Team, UserProfile, VotingConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Permission denied")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    /// Uniqueness violation, e.g. a second vote by the same user.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Persistence contract the session relies on.
///
/// Object-safe so a session can hold `Arc<dyn Backend>`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// All teams, highest vote count first.
    async fn fetch_teams(&self) -> Result<Vec<Team>, BackendError>;

    /// The single active window. `Ok(None)` when no window is active.
    async fn fetch_active_config(&self) -> Result<Option<VotingConfig>, BackendError>;

    /// Profile linked to an identity. `Ok(None)` when it does not exist.
    async fn fetch_profile(&self, user_id: i32) -> Result<Option<UserProfile>, BackendError>;

    /// Record a vote. Fails with [`BackendError::Conflict`] if the user
    /// already has one. Team count and the has-voted flag are updated by the
    /// backend as part of the same write.
    async fn insert_vote(&self, user_id: i32, team_id: i32) -> Result<(), BackendError>;

    async fn insert_team(&self, team: NewTeam) -> Result<Team, BackendError>;

    async fn delete_team(&self, team_id: i32) -> Result<(), BackendError>;

    /// Store a window and make it the only active one.
    async fn create_voting_config(
        &self,
        window: NewVotingConfig,
    ) -> Result<VotingConfig, BackendError>;

    /// End the active window now. It stays the active config, so its results
    /// remain readable.
    async fn close_voting_config(&self) -> Result<VotingConfig, BackendError>;
}
