//! voteportal - terminal front end for the team voting portal.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use client::{ClientConfig, HttpBackend};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod store;
mod ui;

use store::SessionStore;

/// voteportal - vote for your favourite team
#[derive(Parser, Debug)]
#[command(name = "voteportal")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Client configuration file (without extension)
    #[arg(short, long, default_value = "config/client", env = "VOTEPORTAL_CLIENT_CONFIG")]
    config: String,

    /// Where the login token is kept
    #[arg(long, env = "VOTEPORTAL_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // === Account ===
    /// Create an account and sign in
    Register {
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,
    },

    /// Sign in with username and password
    Login { username: Option<String> },

    /// Sign out and forget the stored token
    Logout,

    /// Show who is signed in and the state of the vote
    Whoami,

    // === Voting ===
    /// List teams and the voting window
    #[command(alias = "ls")]
    Teams,

    /// Cast your vote
    Vote {
        /// Team ID (see `voteportal teams`)
        team_id: i32,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Live countdown until voting closes
    Countdown,

    /// Leaderboard once voting has ended
    Results,

    // === Administration ===
    /// Administrator commands
    #[command(subcommand)]
    Admin(AdminCommands),
}

#[derive(Subcommand, Debug)]
enum AdminCommands {
    /// Add a team
    AddTeam {
        /// Team name
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a team and its votes
    DeleteTeam {
        team_id: i32,

        #[arg(short, long)]
        yes: bool,
    },

    /// Vote totals
    Stats,

    /// Open a voting window, replacing the current one
    OpenWindow {
        /// RFC 3339 start time; defaults to now
        #[arg(long)]
        start: Option<DateTime<Utc>>,

        /// RFC 3339 end time
        #[arg(long, conflicts_with = "hours", required_unless_present = "hours")]
        end: Option<DateTime<Utc>>,

        /// Window length in hours from the start
        #[arg(long)]
        hours: Option<i64>,
    },

    /// End the voting window now; results open once it has ended
    CloseWindow,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            ui::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let config = ClientConfig::load(&cli.config).context("Failed to load client configuration")?;

    let store = match cli.session_file {
        Some(path) => SessionStore::at(path),
        None => SessionStore::default_location()?,
    };
    let backend = Arc::new(
        HttpBackend::new(&config)
            .context("Failed to build HTTP client")?
            .with_session(store.load()?),
    );
    let ctx = commands::Context { backend, store };

    match cli.command {
        Commands::Register { username, email } => commands::auth::register(&ctx, username, email).await,
        Commands::Login { username } => commands::auth::login(&ctx, username).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Teams => commands::vote::teams(&ctx).await,
        Commands::Vote { team_id, yes } => commands::vote::vote(&ctx, team_id, yes).await,
        Commands::Countdown => commands::vote::countdown(&ctx).await,
        Commands::Results => commands::results::results(&ctx).await,
        Commands::Admin(cmd) => match cmd {
            AdminCommands::AddTeam { name, description } => {
                commands::admin::add_team(&ctx, &name, description.as_deref()).await
            }
            AdminCommands::DeleteTeam { team_id, yes } => {
                commands::admin::delete_team(&ctx, team_id, yes).await
            }
            AdminCommands::Stats => commands::admin::stats(&ctx).await,
            AdminCommands::OpenWindow { start, end, hours } => {
                commands::admin::open_window(&ctx, start, end, hours).await
            }
            AdminCommands::CloseWindow => commands::admin::close_window(&ctx).await,
        },
    }
}
