use anyhow::{Context as _, Result};
use client::Countdown;
use console::Term;
use dialoguer::Confirm;

use super::Context;
use crate::ui;

/// Vote page: teams plus window status.
pub async fn teams(ctx: &Context) -> Result<bool> {
    let session = ctx.session().await;

    ui::heading("Teams");
    let teams = session.teams();
    if teams.is_empty() {
        println!("No teams yet");
    }
    for team in &teams {
        println!("{}", ui::team_line(team));
    }
    println!();

    let is_active = session.config().is_some_and(|c| c.is_active);
    println!("{}", ui::phase_line(session.window_phase(), is_active));
    if session.is_voting_active() {
        println!("{}", ui::remaining_line(session.time_remaining()));
        if session.has_voted() {
            println!("You have already voted.");
        }
    }
    Ok(true)
}

pub async fn vote(ctx: &Context, team_id: i32, yes: bool) -> Result<bool> {
    let session = ctx.session().await;

    let Some(team) = session.teams().into_iter().find(|t| t.id == team_id) else {
        ui::print_error(&format!("No team with id {team_id}"));
        return Ok(false);
    };

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Cast your only vote for {}?", team.team_name))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("Cancelled");
            return Ok(false);
        }
    }

    Ok(session.cast_vote(team_id).await)
}

pub async fn countdown(ctx: &Context) -> Result<bool> {
    let session = ctx.session().await;
    if session.config().is_none() {
        println!("No voting window configured");
        return Ok(true);
    }

    let term = Term::stdout();
    let mut countdown = Countdown::start(session);
    term.write_line(&ui::remaining_line(countdown.current()))?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            tick = countdown.tick() => {
                let Some(remaining) = tick else { break };
                term.clear_last_lines(1)?;
                term.write_line(&ui::remaining_line(remaining))?;
                if remaining.is_none() {
                    break;
                }
            }
        }
    }
    Ok(true)
}
