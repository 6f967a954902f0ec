use anyhow::{Context as _, Result};
use client::{AuthProvider, BackendError};
use console::style;
use dialoguer::{Input, Password};

use super::Context;
use crate::ui;

/// Short explanation of an auth failure.
fn describe(err: &BackendError) -> String {
    match err {
        BackendError::Unauthorized => "Invalid username or password".to_string(),
        BackendError::Conflict(code) if code == "USERNAME_TAKEN" => {
            "Username is already taken".to_string()
        }
        BackendError::Conflict(code) if code == "EMAIL_TAKEN" => {
            "Email is already registered".to_string()
        }
        BackendError::Validation(message) => message.clone(),
        other => other.to_string(),
    }
}

fn prompt_username(username: Option<String>) -> Result<String> {
    match username {
        Some(u) => Ok(u),
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .context("Failed to read username"),
    }
}

pub async fn register(ctx: &Context, username: Option<String>, email: Option<String>) -> Result<bool> {
    let username = prompt_username(username)?;
    let email = match email {
        Some(e) => e,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .context("Failed to read email")?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .context("Failed to read password")?;

    if let Err(e) = ctx.backend.sign_up(&username, &email, &password).await {
        ui::print_error(&format!("Registration failed: {}", describe(&e)));
        return Ok(false);
    }

    let session = ctx.backend.sign_in(&username, &password).await?;
    ctx.store.save(&session)?;
    println!("Welcome, {}! You are signed in.", style(&session.username).bold());
    Ok(true)
}

pub async fn login(ctx: &Context, username: Option<String>) -> Result<bool> {
    let username = prompt_username(username)?;
    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")?;

    match ctx.backend.sign_in(&username, &password).await {
        Ok(session) => {
            ctx.store.save(&session)?;
            println!("Signed in as {}", style(&session.username).bold());
            Ok(true)
        }
        Err(e) => {
            ui::print_error(&format!("Login failed: {}", describe(&e)));
            Ok(false)
        }
    }
}

pub async fn logout(ctx: &Context) -> Result<bool> {
    if ctx.backend.current_user().is_none() {
        println!("Not signed in");
        return Ok(true);
    }
    let session = ctx.session().await;
    session.sign_out().await;
    ctx.store.clear()?;
    println!("Signed out");
    Ok(true)
}

/// Landing view.
pub async fn whoami(ctx: &Context) -> Result<bool> {
    let session = ctx.session().await;

    ui::heading("Team Voting Portal");
    match (session.current_user(), session.profile()) {
        (Some(user), Some(profile)) => {
            let role = if profile.is_admin { " (admin)" } else { "" };
            println!("Signed in as {}{}", style(&user.username).bold(), role);
            let voted = if profile.has_voted {
                style("You have voted").green()
            } else {
                style("You have not voted yet").yellow()
            };
            println!("{voted}");
        }
        (Some(user), None) => println!("Signed in as {} (no profile found)", user.username),
        (None, _) => println!("Not signed in. Run `voteportal login` or `voteportal register`."),
    }

    let config = session.config();
    println!(
        "{}",
        ui::phase_line(session.window_phase(), config.is_some_and(|c| c.is_active))
    );
    if session.is_voting_active() {
        println!("{}", ui::remaining_line(session.time_remaining()));
    }
    Ok(true)
}
