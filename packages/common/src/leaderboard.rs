use serde::{Deserialize, Serialize};

use crate::model::Team;

/// Podium badge shown next to the top three teams once results are out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankBadge {
    Winner,
    RunnerUp,
    SecondRunnerUp,
}

impl RankBadge {
    /// Badge for a 1-based rank, if it is on the podium.
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Self::Winner),
            2 => Some(Self::RunnerUp),
            3 => Some(Self::SecondRunnerUp),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Winner => "🥇 Winner",
            Self::RunnerUp => "🥈 Runner-up",
            Self::SecondRunnerUp => "🥉 2nd Runner-up",
        }
    }
}

/// One row of the leaderboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Standing {
    /// 1-based position after sorting. Ties are broken by array order.
    pub rank: usize,
    pub team: Team,
}

impl Standing {
    pub fn badge(&self) -> Option<RankBadge> {
        RankBadge::for_rank(self.rank)
    }
}

/// Aggregate numbers shown on the admin dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VoteStats {
    #[schema(example = 4)]
    pub total_teams: usize,
    #[schema(example = 42)]
    pub total_votes: i64,
    /// Zero when there are no teams.
    #[schema(example = 17)]
    pub highest_votes: i32,
}

impl VoteStats {
    pub fn from_teams(teams: &[Team]) -> Self {
        Self {
            total_teams: teams.len(),
            total_votes: total_votes(teams),
            highest_votes: teams.iter().map(|t| t.votes).max().unwrap_or(0),
        }
    }
}

/// Sort by vote count, highest first. Equal counts keep their relative order.
pub fn sort_by_votes(teams: &mut [Team]) {
    teams.sort_by(|a, b| b.votes.cmp(&a.votes));
}

/// Rank a team list. The input does not need to be sorted.
pub fn standings(teams: &[Team]) -> Vec<Standing> {
    let mut sorted = teams.to_vec();
    sort_by_votes(&mut sorted);
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, team)| Standing { rank: i + 1, team })
        .collect()
}

pub fn total_votes(teams: &[Team]) -> i64 {
    teams.iter().map(|t| i64::from(t.votes)).sum()
}

/// "vote" or "votes" for a count.
pub fn vote_label(votes: i32) -> &'static str {
    if votes == 1 { "vote" } else { "votes" }
}
