use anyhow::Result;
use console::style;

use super::Context;
use crate::ui;

pub async fn results(ctx: &Context) -> Result<bool> {
    let session = ctx.session().await;

    if !session.is_results_available() {
        ui::heading("Results Not Yet Available");
        println!("Results are published once voting ends.");
        println!("Total votes so far: {}", session.stats().total_votes);
        if let Some(remaining) = session.time_remaining() {
            println!("Voting ends in {remaining}");
        }
        return Ok(true);
    }

    ui::heading("Final Results");
    let board = session.leaderboard();
    if board.is_empty() {
        println!("No teams took part");
    }
    for standing in &board {
        let line = ui::standing_line(standing);
        if standing.badge().is_some() {
            println!("{}", style(line).bold());
        } else {
            println!("{line}");
        }
    }
    println!();
    println!("Total votes: {}", session.stats().total_votes);
    Ok(true)
}
