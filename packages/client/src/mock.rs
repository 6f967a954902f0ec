//! In-memory [`Backend`], [`AuthProvider`] and [`Notifier`] for tests.
//!
//! `MockBackend` behaves like the real server where the session can observe
//! it: teams come back highest-votes first, a second vote by the same user is
//! a conflict, and a successful vote bumps the team count and the voter's
//! has-voted flag. Closing a window ends it at the mock's clock and keeps it
//! active. Individual operations can be made to fail, and every call is
//! counted.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{NewTeam, NewVotingConfig, Team, UserProfile, Vote, VotingConfig};

use crate::auth::{AuthProvider, AuthUser};
use crate::backend::{Backend, BackendError};
use crate::clock::{Clock, SystemClock};
use crate::notify::{Notification, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    FetchTeams,
    FetchActiveConfig,
    FetchProfile,
    InsertVote,
    InsertTeam,
    DeleteTeam,
    CreateVotingConfig,
    CloseVotingConfig,
}

#[derive(Debug, Default)]
struct MockState {
    teams: Vec<Team>,
    configs: Vec<VotingConfig>,
    profiles: Vec<UserProfile>,
    votes: Vec<Vote>,
    failing: HashSet<MockOp>,
    calls: HashMap<MockOp, usize>,
    next_id: i32,
}

impl MockState {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug)]
pub struct MockBackend {
    state: Mutex<MockState>,
    clock: Arc<dyn Clock>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose "now" follows `clock`, for tests that also drive the
    /// session clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::default(),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the call and return the injected failure, if any.
    fn enter(&self, op: MockOp) -> Result<MutexGuard<'_, MockState>, BackendError> {
        let mut state = self.lock();
        *state.calls.entry(op).or_default() += 1;
        if state.failing.contains(&op) {
            return Err(BackendError::Server(format!("injected {op:?} failure")));
        }
        Ok(state)
    }

    /// Add a team with a starting vote count and return its id.
    pub fn add_team(&self, name: &str, votes: i32) -> i32 {
        let mut state = self.lock();
        let id = state.next_id();
        state.teams.push(Team {
            id,
            team_name: name.to_string(),
            description: None,
            votes,
            created_at: self.clock.now(),
        });
        id
    }

    /// Add a profile for `user_id` and return it.
    pub fn add_profile(&self, user_id: i32, username: &str, is_admin: bool) -> UserProfile {
        let mut state = self.lock();
        let profile = UserProfile {
            id: state.next_id(),
            user_id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            has_voted: false,
            is_admin,
        };
        state.profiles.push(profile.clone());
        profile
    }

    /// Store an active window, deactivating any other.
    pub fn set_window(&self, start_time: DateTime<Utc>, end_time: DateTime<Utc>, is_active: bool) {
        let mut state = self.lock();
        for config in &mut state.configs {
            config.is_active = false;
        }
        let id = state.next_id();
        state.configs.push(VotingConfig {
            id,
            start_time,
            end_time,
            is_active,
            created_at: self.clock.now(),
        });
    }

    pub fn fail(&self, op: MockOp) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: MockOp) {
        self.lock().failing.remove(&op);
    }

    pub fn calls(&self, op: MockOp) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn votes(&self) -> Vec<Vote> {
        self.lock().votes.clone()
    }

    pub fn team(&self, id: i32) -> Option<Team> {
        self.lock().teams.iter().find(|t| t.id == id).cloned()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn fetch_teams(&self) -> Result<Vec<Team>, BackendError> {
        let state = self.enter(MockOp::FetchTeams)?;
        let mut teams = state.teams.clone();
        teams.sort_by(|a, b| b.votes.cmp(&a.votes).then(a.id.cmp(&b.id)));
        Ok(teams)
    }

    async fn fetch_active_config(&self) -> Result<Option<VotingConfig>, BackendError> {
        let state = self.enter(MockOp::FetchActiveConfig)?;
        Ok(state.configs.iter().rev().find(|c| c.is_active).cloned())
    }

    async fn fetch_profile(&self, user_id: i32) -> Result<Option<UserProfile>, BackendError> {
        let state = self.enter(MockOp::FetchProfile)?;
        Ok(state
            .profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn insert_vote(&self, user_id: i32, team_id: i32) -> Result<(), BackendError> {
        let mut state = self.enter(MockOp::InsertVote)?;
        if state.votes.iter().any(|v| v.user_id == user_id) {
            return Err(BackendError::Conflict("ALREADY_VOTED".to_string()));
        }
        let team = state
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or(BackendError::NotFound)?;
        team.votes += 1;

        if let Some(profile) = state.profiles.iter_mut().find(|p| p.user_id == user_id) {
            profile.has_voted = true;
        }
        let id = state.next_id();
        state.votes.push(Vote {
            id,
            user_id,
            team_id,
            created_at: self.clock.now(),
        });
        Ok(())
    }

    async fn insert_team(&self, team: NewTeam) -> Result<Team, BackendError> {
        let mut state = self.enter(MockOp::InsertTeam)?;
        let created = Team {
            id: state.next_id(),
            team_name: team.team_name,
            description: team.description,
            votes: 0,
            created_at: self.clock.now(),
        };
        state.teams.push(created.clone());
        Ok(created)
    }

    async fn delete_team(&self, team_id: i32) -> Result<(), BackendError> {
        let mut state = self.enter(MockOp::DeleteTeam)?;
        let before = state.teams.len();
        state.teams.retain(|t| t.id != team_id);
        if state.teams.len() == before {
            return Err(BackendError::NotFound);
        }
        state.votes.retain(|v| v.team_id != team_id);
        Ok(())
    }

    async fn create_voting_config(
        &self,
        window: NewVotingConfig,
    ) -> Result<VotingConfig, BackendError> {
        let mut state = self.enter(MockOp::CreateVotingConfig)?;
        if window.end_time < window.start_time {
            return Err(BackendError::Validation(
                "end_time must not be before start_time".to_string(),
            ));
        }
        for config in &mut state.configs {
            config.is_active = false;
        }
        let created = VotingConfig {
            id: state.next_id(),
            start_time: window.start_time,
            end_time: window.end_time,
            is_active: true,
            created_at: self.clock.now(),
        };
        state.configs.push(created.clone());
        Ok(created)
    }

    async fn close_voting_config(&self) -> Result<VotingConfig, BackendError> {
        let now = self.clock.now();
        let mut state = self.enter(MockOp::CloseVotingConfig)?;
        let config = state
            .configs
            .iter_mut()
            .rev()
            .find(|c| c.is_active)
            .ok_or(BackendError::NotFound)?;
        *config = config.clone().closed_at(now);
        Ok(config.clone())
    }
}

/// Auth provider whose identity is set directly by the test.
#[derive(Debug, Default)]
pub struct MockAuth {
    user: RwLock<Option<AuthUser>>,
}

impl MockAuth {
    pub fn signed_in(id: i32, username: &str) -> Self {
        Self {
            user: RwLock::new(Some(AuthUser {
                id,
                username: username.to_string(),
            })),
        }
    }

    pub fn set_user(&self, user: Option<AuthUser>) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    fn current_user(&self) -> Option<AuthUser> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.set_user(None);
        Ok(())
    }
}

/// Keeps every notification for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.description)
            .collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
