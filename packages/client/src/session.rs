//! Cached voting state and the operations that change it.
//!
//! The cache sits behind a `std::sync::RwLock` that is only taken for short,
//! synchronous sections, never across an `.await`. Predicates therefore stay
//! synchronous and cheap enough to call on every render or countdown tick.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use common::leaderboard::{self, Standing};
use common::window::{self, TimeRemaining, WindowPhase};
use common::{NewTeam, NewVotingConfig, Team, UserProfile, VoteStats, VotingConfig};
use tracing::instrument;

use crate::auth::{AuthProvider, AuthUser};
use crate::backend::{Backend, BackendError};
use crate::clock::Clock;
use crate::error::VoteError;
use crate::notify::{Notification, Notifier};

#[derive(Debug, Default)]
struct SessionState {
    teams: Vec<Team>,
    config: Option<VotingConfig>,
    profile: Option<UserProfile>,
    loading: bool,
}

pub struct VotingSession {
    backend: Arc<dyn Backend>,
    auth: Arc<dyn AuthProvider>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    state: RwLock<SessionState>,
}

impl VotingSession {
    /// Build a session with an empty cache. Nothing is fetched until
    /// [`Self::load`] runs; use [`Self::connect`] to do both.
    pub fn new(
        backend: Arc<dyn Backend>,
        auth: Arc<dyn AuthProvider>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backend,
            auth,
            notifier,
            clock,
            state: RwLock::new(SessionState {
                loading: true,
                ..Default::default()
            }),
        }
    }

    /// Build a session and run the initial load.
    pub async fn connect(
        backend: Arc<dyn Backend>,
        auth: Arc<dyn AuthProvider>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let session = Arc::new(Self::new(backend, auth, notifier, clock));
        session.load().await;
        session
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ---- loading ----

    /// Fetch teams and the active window concurrently, then the caller's
    /// profile. A failed fetch notifies and keeps the previous slice; the
    /// others still commit.
    #[instrument(skip(self))]
    pub async fn load(&self) {
        self.write().loading = true;

        tokio::join!(self.reload_teams(), self.reload_config());

        if let Some(user) = self.auth.current_user() {
            self.reload_profile(&user).await;
        } else {
            self.write().profile = None;
        }

        self.write().loading = false;
    }

    /// Re-run [`Self::load`] after sign-in or sign-out.
    pub async fn on_identity_changed(&self) {
        self.load().await;
    }

    /// Refresh all three slices concurrently.
    #[instrument(skip(self))]
    pub async fn refetch(&self) {
        let user = self.auth.current_user();
        tokio::join!(self.reload_teams(), self.reload_config(), async {
            if let Some(user) = &user {
                self.reload_profile(user).await;
            }
        });
    }

    async fn reload_teams(&self) {
        match self.backend.fetch_teams().await {
            Ok(teams) => {
                self.write().teams = teams;
            }
            Err(e) => self.read_failed(e, "Failed to fetch teams"),
        }
    }

    async fn reload_config(&self) {
        match self.backend.fetch_active_config().await {
            Ok(config) => {
                self.write().config = config;
            }
            Err(e) => self.read_failed(e, "Failed to fetch voting configuration"),
        }
    }

    async fn reload_profile(&self, user: &AuthUser) {
        match self.backend.fetch_profile(user.id).await {
            Ok(profile) => {
                self.write().profile = profile;
            }
            Err(e) => self.read_failed(e, "Failed to fetch user profile"),
        }
    }

    fn read_failed(&self, err: BackendError, message: &str) {
        let err = VoteError::BackendRead(err);
        tracing::warn!(error = %err, "{}", message);
        self.notifier.notify(Notification::error(message));
    }

    // ---- cached state ----

    pub fn teams(&self) -> Vec<Team> {
        self.read().teams.clone()
    }

    pub fn config(&self) -> Option<VotingConfig> {
        self.read().config.clone()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.read().profile.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.auth.current_user()
    }

    pub fn is_admin(&self) -> bool {
        self.read().profile.as_ref().is_some_and(|p| p.is_admin)
    }

    pub fn has_voted(&self) -> bool {
        self.read().profile.as_ref().is_some_and(|p| p.has_voted)
    }

    /// Teams ranked by votes. Equal counts keep their fetched order.
    pub fn leaderboard(&self) -> Vec<Standing> {
        leaderboard::standings(&self.read().teams)
    }

    pub fn stats(&self) -> VoteStats {
        VoteStats::from_teams(&self.read().teams)
    }

    // ---- window predicates ----

    pub fn is_voting_active(&self) -> bool {
        window::is_voting_active(self.read().config.as_ref(), self.now())
    }

    pub fn is_results_available(&self) -> bool {
        window::is_results_available(self.read().config.as_ref(), self.now())
    }

    pub fn time_remaining(&self) -> Option<TimeRemaining> {
        window::time_remaining(self.read().config.as_ref(), self.now())
    }

    /// Where the clock sits relative to the loaded window, ignoring the
    /// active flag.
    pub fn window_phase(&self) -> Option<WindowPhase> {
        let now = self.now();
        self.read().config.as_ref().map(|c| c.phase_at(now))
    }

    // ---- voting ----

    /// Cast the caller's vote for `team_id`.
    ///
    /// Guards run in order: signed in with a loaded profile, not yet voted,
    /// window active. A rejected guard makes no backend call. On success the
    /// teams and profile are reloaded once. Every outcome is notified.
    #[instrument(skip(self))]
    pub async fn try_cast_vote(&self, team_id: i32) -> Result<(), VoteError> {
        let result = self.cast_vote_inner(team_id).await;
        match &result {
            Ok(user) => {
                self.notifier
                    .notify(Notification::success("Your vote has been cast!"));
                tokio::join!(self.reload_teams(), self.reload_profile(user));
            }
            Err(err) => self.notifier.notify(err.notification()),
        }
        result.map(|_| ())
    }

    /// [`Self::try_cast_vote`] for callers that only need the outcome.
    pub async fn cast_vote(&self, team_id: i32) -> bool {
        self.try_cast_vote(team_id).await.is_ok()
    }

    async fn cast_vote_inner(&self, team_id: i32) -> Result<AuthUser, VoteError> {
        let user = self.auth.current_user();
        let profile = self.profile();
        let (Some(user), Some(profile)) = (user, profile) else {
            return Err(VoteError::AuthenticationRequired);
        };
        if profile.has_voted {
            return Err(VoteError::DuplicateVote);
        }
        if !self.is_voting_active() {
            return Err(VoteError::WindowClosed);
        }

        self.backend
            .insert_vote(user.id, team_id)
            .await
            .map_err(|e| {
                let err = VoteError::BackendWrite(e);
                if err.is_conflict() {
                    tracing::warn!(user_id = user.id, team_id, "Vote rejected: already on record");
                } else {
                    tracing::warn!(user_id = user.id, team_id, error = %err, "Vote insert failed");
                }
                err
            })?;

        tracing::info!(user_id = user.id, team_id, "Vote cast");
        Ok(user)
    }

    // ---- administration ----

    fn require_admin(&self) -> bool {
        if self.is_admin() {
            return true;
        }
        self.notifier
            .notify(Notification::error("Administrator access required"));
        false
    }

    /// Notify the outcome of an admin write and refetch on success.
    async fn finish_admin<T>(
        &self,
        result: Result<T, BackendError>,
        success: &str,
        failure: &str,
    ) -> bool {
        match result {
            Ok(_) => {
                self.notifier.notify(Notification::success(success));
                self.refetch().await;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "{}", failure);
                self.notifier.notify(Notification::error(failure));
                false
            }
        }
    }

    #[instrument(skip(self, description))]
    pub async fn add_team(&self, team_name: &str, description: Option<&str>) -> bool {
        if !self.require_admin() {
            return false;
        }
        let team_name = team_name.trim();
        if team_name.is_empty() {
            self.notifier
                .notify(Notification::error("Team name is required"));
            return false;
        }
        let team = NewTeam {
            team_name: team_name.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        };
        let result = self.backend.insert_team(team).await;
        self.finish_admin(result, "Team added successfully", "Failed to add team")
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_team(&self, team_id: i32) -> bool {
        if !self.require_admin() {
            return false;
        }
        let result = self.backend.delete_team(team_id).await;
        self.finish_admin(result, "Team deleted successfully", "Failed to delete team")
            .await
    }

    #[instrument(skip(self))]
    pub async fn open_voting_window(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> bool {
        if !self.require_admin() {
            return false;
        }
        let result = self
            .backend
            .create_voting_config(NewVotingConfig {
                start_time,
                end_time,
            })
            .await;
        self.finish_admin(result, "Voting window opened", "Failed to open voting window")
            .await
    }

    #[instrument(skip(self))]
    pub async fn close_voting_window(&self) -> bool {
        if !self.require_admin() {
            return false;
        }
        let result = self.backend.close_voting_config().await;
        self.finish_admin(result, "Voting window closed", "Failed to close voting window")
            .await
    }

    /// Sign out through the auth provider and reload without an identity.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) {
        if let Err(e) = self.auth.sign_out().await {
            tracing::warn!(error = %e, "Remote sign-out failed");
        }
        self.on_identity_changed().await;
    }
}
