pub mod auth;
pub mod leaderboard;
pub mod model;
pub mod window;

pub use leaderboard::{RankBadge, Standing, VoteStats};
pub use model::{CastVoteRequest, NewTeam, NewVotingConfig, Team, UserProfile, Vote, VotingConfig};
pub use window::{TimeRemaining, WindowPhase};
