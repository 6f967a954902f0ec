//! Voting domain state for the team voting portal.
//!
//! [`VotingSession`] caches teams, the active voting window and the caller's
//! profile, answers window/eligibility questions synchronously, and runs vote
//! and admin operations against a [`Backend`].

pub mod auth;
pub mod backend;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod error;
pub mod http;
pub mod mock;
pub mod notify;
pub mod session;

pub use auth::{AuthProvider, AuthUser};
pub use backend::{Backend, BackendError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ClientConfig;
pub use countdown::Countdown;
pub use error::VoteError;
pub use http::{HttpBackend, StoredSession};
pub use notify::{Notification, Notifier, TracingNotifier, Variant};
pub use session::VotingSession;
