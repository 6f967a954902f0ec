//! Terminal rendering helpers.

use client::{Notification, Notifier, Variant};
use common::leaderboard::{Standing, vote_label};
use common::window::{TimeRemaining, WindowPhase};
use common::{Team, VoteStats};
use console::style;

/// Prints notifications as they arrive.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            Variant::Success => println!("{} {}", style("✓").green().bold(), notification.description),
            Variant::Destructive => {
                eprintln!("{} {}", style("✗").red().bold(), notification.description)
            }
        }
    }
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", style("error:").red().bold(), message);
}

pub fn heading(text: &str) {
    println!("{}", style(text).bold().underlined());
}

pub fn votes(count: i32) -> String {
    format!("{} {}", count, vote_label(count))
}

pub fn team_line(team: &Team) -> String {
    let mut line = format!(
        "{:>4}  {:<24} {}",
        style(format!("#{}", team.id)).dim(),
        team.team_name,
        votes(team.votes)
    );
    if let Some(description) = &team.description {
        line.push_str(&format!("\n      {}", style(description).dim()));
    }
    line
}

pub fn standing_line(standing: &Standing) -> String {
    let badge = standing
        .badge()
        .map(|b| format!("  {}", b.label()))
        .unwrap_or_default();
    format!(
        "{:>3}. {:<24} {}{}",
        standing.rank,
        standing.team.team_name,
        votes(standing.team.votes),
        badge
    )
}

pub fn phase_line(phase: Option<WindowPhase>, is_active: bool) -> String {
    match (phase, is_active) {
        (None, _) => "No voting window configured".to_string(),
        (Some(_), false) => "Voting window is inactive".to_string(),
        (Some(WindowPhase::BeforeStart), true) => "Voting has not started yet".to_string(),
        (Some(WindowPhase::Active), true) => "Voting is open".to_string(),
        (Some(WindowPhase::Ended), true) => "Voting has ended".to_string(),
    }
}

pub fn remaining_line(remaining: Option<TimeRemaining>) -> String {
    match remaining {
        Some(r) => format!("Time remaining: {r}"),
        None => "Voting closed".to_string(),
    }
}

pub fn stats_lines(stats: &VoteStats) -> Vec<String> {
    vec![
        format!("Total teams:   {}", stats.total_teams),
        format!("Total votes:   {}", stats.total_votes),
        format!("Highest votes: {}", stats.highest_votes),
    ]
}
