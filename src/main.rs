use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, fmt::writer::BoxMakeWriter, prelude::*};

use leaguedesk::cli::{
    commands::{Cli, Commands},
    completions::write_completions,
    run::{self, CliContext, PasswordSource},
};
use leaguedesk::config::Settings;
use leaguedesk::tui;

const LOG_FILE: &str = "leaguedesk.log";

/// Sets up tracing. The TUI owns the terminal, so `log_file` redirects
/// output away from it.
fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<File>) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbosity {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let layer = match log_file {
        Some(file) => fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(BoxMakeWriter::new(Mutex::new(file))),
        None => fmt::layer()
            .with_target(false)
            .with_writer(BoxMakeWriter::new(std::io::stderr)),
    };

    tracing_subscriber::registry().with(layer).with(filter).init();
}

fn open_log_file(settings: &Settings) -> Option<File> {
    std::fs::create_dir_all(&settings.state_dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(settings.state_dir.join(LOG_FILE))
        .ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        write_completions(shell, &mut std::io::stdout());
        return Ok(());
    }

    let settings = Settings::resolve(&cli.api_url, cli.state_dir)?;

    let log_file = match cli.command {
        Commands::Browse => open_log_file(&settings),
        _ => None,
    };
    setup_logging(cli.verbose, cli.quiet, log_file);

    if let Commands::Browse = cli.command {
        // The TUI owns the terminal and runs its own runtime thread
        return tokio::task::block_in_place(|| tui::run(settings));
    }

    let ctx = CliContext::new(&settings, cli.quiet)?;

    match cli.command {
        Commands::Leaderboard => run::run_leaderboard(&ctx).await?,
        Commands::Matches { action } => run::run_matches(&ctx, action).await?,
        Commands::Teams { action } => run::run_teams(&ctx, action).await?,
        Commands::Players { search, action } => run::run_players(&ctx, &search, action).await?,
        Commands::Tournaments { action } => run::run_tournaments(&ctx, action).await?,
        Commands::Overview => run::run_overview(&ctx).await?,
        Commands::Signup {
            username,
            password,
            confirm_password,
            password_stdin,
        } => {
            let password = PasswordSource {
                given: password,
                env: "LEAGUEDESK_PASSWORD",
            };
            let confirm_password = PasswordSource {
                given: confirm_password,
                env: "LEAGUEDESK_CONFIRM_PASSWORD",
            };
            run::run_signup(&ctx, username, password, confirm_password, password_stdin).await?
        }
        Commands::Login {
            username,
            password,
            password_stdin,
        } => {
            let password = PasswordSource {
                given: password,
                env: "LEAGUEDESK_PASSWORD",
            };
            run::run_login(&ctx, username, password, password_stdin).await?
        }
        Commands::Logout => run::run_logout(&ctx),
        Commands::Whoami => run::run_whoami(&ctx),
        Commands::Browse | Commands::Completions { .. } => {}
    }

    Ok(())
}
