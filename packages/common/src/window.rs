//! Voting-window arithmetic.
//!
//! Everything here is a pure function of a [`VotingConfig`] and an injected
//! `now`, so callers can re-evaluate on every tick without keeping state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::VotingConfig;

pub const MILLIS_PER_DAY: i64 = 86_400_000;
pub const MILLIS_PER_HOUR: i64 = 3_600_000;
pub const MILLIS_PER_MINUTE: i64 = 60_000;
pub const MILLIS_PER_SECOND: i64 = 1_000;

/// Where the wall clock sits relative to a config's bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowPhase {
    BeforeStart,
    /// `start_time <= now <= end_time`, both bounds inclusive.
    Active,
    Ended,
}

/// Time left until the window closes, split into calendar-agnostic buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeRemaining {
    /// Decompose a millisecond delta. Returns `None` once the delta is no
    /// longer positive.
    pub fn from_millis(delta_ms: i64) -> Option<Self> {
        if delta_ms <= 0 {
            return None;
        }
        Some(Self {
            days: delta_ms / MILLIS_PER_DAY,
            hours: (delta_ms % MILLIS_PER_DAY) / MILLIS_PER_HOUR,
            minutes: (delta_ms % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE,
            seconds: (delta_ms % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND,
        })
    }

    /// Milliseconds represented by the buckets (sub-second remainder dropped).
    pub fn as_millis(&self) -> i64 {
        (((self.days * 24 + self.hours) * 60 + self.minutes) * 60 + self.seconds)
            * MILLIS_PER_SECOND
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

impl VotingConfig {
    pub fn phase_at(&self, now: DateTime<Utc>) -> WindowPhase {
        if now < self.start_time {
            WindowPhase::BeforeStart
        } else if now > self.end_time {
            WindowPhase::Ended
        } else {
            WindowPhase::Active
        }
    }

    /// True iff the config is flagged active and `now` lies within its bounds.
    pub fn accepts_votes_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.phase_at(now) == WindowPhase::Active
    }

    /// Results open strictly after the end time, whatever the active flag says.
    pub fn results_available_at(&self, now: DateTime<Utc>) -> bool {
        now > self.end_time
    }

    pub fn time_remaining_at(&self, now: DateTime<Utc>) -> Option<TimeRemaining> {
        TimeRemaining::from_millis((self.end_time - now).num_milliseconds())
    }

    /// End the window at `now`. Neither bound moves later, so a window that
    /// already ended keeps its bounds and one that has not started collapses
    /// to the instant `now`. The config stays active so its results remain
    /// readable.
    pub fn closed_at(mut self, now: DateTime<Utc>) -> Self {
        self.end_time = self.end_time.min(now);
        self.start_time = self.start_time.min(self.end_time);
        self
    }
}

pub fn is_voting_active(config: Option<&VotingConfig>, now: DateTime<Utc>) -> bool {
    config.is_some_and(|c| c.accepts_votes_at(now))
}

pub fn is_results_available(config: Option<&VotingConfig>, now: DateTime<Utc>) -> bool {
    config.is_some_and(|c| c.results_available_at(now))
}

pub fn time_remaining(config: Option<&VotingConfig>, now: DateTime<Utc>) -> Option<TimeRemaining> {
    config.and_then(|c| c.time_remaining_at(now))
}
