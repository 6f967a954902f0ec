use async_trait::async_trait;

use crate::backend::BackendError;

/// Identity of the signed-in user as seen by the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Current identity, if any. Answered from local state without a round trip.
    fn current_user(&self) -> Option<AuthUser>;

    /// Drop the current identity. Afterwards `current_user()` is `None` even
    /// when the remote call failed.
    async fn sign_out(&self) -> Result<(), BackendError>;
}
