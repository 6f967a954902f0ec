use thiserror::Error;

use crate::backend::BackendError;
use crate::notify::Notification;

/// Why a vote was not recorded.
#[derive(Debug, Error)]
pub enum VoteError {
    #[error("Not signed in or profile not loaded")]
    AuthenticationRequired,

    #[error("Profile has already voted")]
    DuplicateVote,

    #[error("Voting window is not active")]
    WindowClosed,

    #[error("Backend read failed: {0}")]
    BackendRead(#[source] BackendError),

    #[error("Backend write failed: {0}")]
    BackendWrite(#[source] BackendError),
}

impl VoteError {
    /// True when the backend refused the write because a vote already exists.
    pub fn is_conflict(&self) -> bool {
        matches!(self, VoteError::BackendWrite(BackendError::Conflict(_)))
    }

    /// User-facing message. Backend detail stays in the logs.
    pub fn notification(&self) -> Notification {
        match self {
            VoteError::AuthenticationRequired => {
                Notification::error("You must be logged in to vote")
            }
            VoteError::DuplicateVote => Notification::error("You have already voted"),
            VoteError::WindowClosed => Notification::error("Voting is not currently active"),
            VoteError::BackendRead(_) => Notification::error("Failed to load voting data"),
            VoteError::BackendWrite(_) => Notification::error("Failed to cast vote"),
        }
    }
}
