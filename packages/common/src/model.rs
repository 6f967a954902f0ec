use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A team competing for votes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Team {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ferris Fan Club")]
    pub team_name: String,
    #[schema(example = "We write Rust and we vote for Rust.")]
    pub description: Option<String>,
    /// Maintained by the backend. Only grows when a vote is inserted.
    #[schema(example = 7)]
    pub votes: i32,
    pub created_at: DateTime<Utc>,
}

/// The voting window. At most one config is active at a time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VotingConfig {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "2026-10-16T09:00:00Z")]
    pub start_time: DateTime<Utc>,
    #[schema(example = "2026-10-16T17:00:00Z")]
    pub end_time: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-identity profile. `has_voted` flips once and never reverts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserProfile {
    #[schema(example = 1)]
    pub id: i32,
    /// Identity this profile belongs to.
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub has_voted: bool,
    pub is_admin: bool,
}

/// A single ballot. The backend keeps `user_id` unique across all votes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Vote {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = 3)]
    pub team_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewTeam {
    /// Display name (1-256 characters after trimming).
    #[schema(example = "Ferris Fan Club")]
    pub team_name: String,
    /// Optional free-form description. Blank descriptions are stored as `null`.
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for casting a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CastVoteRequest {
    /// Must match the authenticated identity.
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = 3)]
    pub team_id: i32,
}

/// Request body for opening a new voting window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewVotingConfig {
    #[schema(example = "2026-10-16T09:00:00Z")]
    pub start_time: DateTime<Utc>,
    #[schema(example = "2026-10-16T17:00:00Z")]
    pub end_time: DateTime<Utc>,
}
