use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Duration, Utc};
use client::VotingSession;
use dialoguer::Confirm;

use super::Context;
use crate::ui;

/// Load a session and make sure the caller is an administrator.
async fn admin_session(ctx: &Context) -> Option<Arc<VotingSession>> {
    let session = ctx.session().await;
    if session.is_admin() {
        Some(session)
    } else {
        ui::heading("Access Denied");
        println!("You need administrator privileges to use this command.");
        None
    }
}

pub async fn add_team(ctx: &Context, name: &str, description: Option<&str>) -> Result<bool> {
    let Some(session) = admin_session(ctx).await else {
        return Ok(false);
    };
    Ok(session.add_team(name, description).await)
}

pub async fn delete_team(ctx: &Context, team_id: i32, yes: bool) -> Result<bool> {
    let Some(session) = admin_session(ctx).await else {
        return Ok(false);
    };

    if !yes {
        let name = session
            .teams()
            .into_iter()
            .find(|t| t.id == team_id)
            .map(|t| t.team_name)
            .unwrap_or_else(|| format!("team #{team_id}"));
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {name} and all of its votes?"))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("Cancelled");
            return Ok(false);
        }
    }

    Ok(session.delete_team(team_id).await)
}

pub async fn stats(ctx: &Context) -> Result<bool> {
    let Some(session) = admin_session(ctx).await else {
        return Ok(false);
    };

    ui::heading("Voting Statistics");
    for line in ui::stats_lines(&session.stats()) {
        println!("{line}");
    }
    let is_active = session.config().is_some_and(|c| c.is_active);
    println!("{}", ui::phase_line(session.window_phase(), is_active));
    Ok(true)
}

pub async fn open_window(
    ctx: &Context,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    hours: Option<i64>,
) -> Result<bool> {
    let start = start.unwrap_or_else(Utc::now);
    let end = match (end, hours) {
        (Some(end), _) => end,
        (None, Some(hours)) => start + Duration::hours(hours),
        (None, None) => anyhow::bail!("Either --end or --hours is required"),
    };

    let Some(session) = admin_session(ctx).await else {
        return Ok(false);
    };
    Ok(session.open_voting_window(start, end).await)
}

pub async fn close_window(ctx: &Context) -> Result<bool> {
    let Some(session) = admin_session(ctx).await else {
        return Ok(false);
    };
    Ok(session.close_voting_window().await)
}
