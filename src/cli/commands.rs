use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_API_URL;

#[derive(Parser, Debug)]
#[command(name = "leaguedesk")]
#[command(author, version, about = "Football league management client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the league API
    #[arg(long, env = "LEAGUEDESK_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Directory holding the saved session
    #[arg(long, env = "LEAGUEDESK_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive league browser
    Browse,

    /// Show current standings
    Leaderboard,

    /// Show the match schedule, or manage matches
    Matches {
        #[command(subcommand)]
        action: Option<MatchAction>,
    },

    /// Show teams, or manage them
    Teams {
        #[command(subcommand)]
        action: Option<TeamAction>,
    },

    /// Show players, or manage them
    Players {
        /// Only players whose name or team contains this text
        #[arg(short, long, default_value = "")]
        search: String,

        #[command(subcommand)]
        action: Option<PlayerAction>,
    },

    /// Show tournaments, or manage them
    Tournaments {
        #[command(subcommand)]
        action: Option<TournamentAction>,
    },

    /// Teams, fixtures and standings at a glance
    Overview,

    /// Create an account and sign in
    ///
    /// Pass passwords through LEAGUEDESK_PASSWORD and
    /// LEAGUEDESK_CONFIRM_PASSWORD, or --password-stdin. Values given as
    /// flags show up in the process list.
    Signup {
        #[arg(short, long)]
        username: String,

        /// Password; prefer LEAGUEDESK_PASSWORD or --password-stdin
        #[arg(short, long, env = "LEAGUEDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Repeat the password; prefer LEAGUEDESK_CONFIRM_PASSWORD
        #[arg(long, env = "LEAGUEDESK_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: Option<String>,

        /// Read the password, then its confirmation, one per line from stdin
        #[arg(long)]
        password_stdin: bool,
    },

    /// Sign in to an existing account
    ///
    /// Pass the password through LEAGUEDESK_PASSWORD or --password-stdin.
    /// A value given as a flag shows up in the process list.
    Login {
        #[arg(short, long)]
        username: String,

        /// Password; prefer LEAGUEDESK_PASSWORD or --password-stdin
        #[arg(short, long, env = "LEAGUEDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Read the password from the first line of stdin
        #[arg(long)]
        password_stdin: bool,
    },

    /// Forget the saved session
    Logout,

    /// Show who is signed in
    Whoami,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TeamAction {
    /// Register a new team
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        coach: String,

        /// Foundation year
        #[arg(long)]
        year: Option<i32>,

        #[arg(long, default_value = "1")]
        tournament: u64,
    },

    /// Remove a team by id
    Delete { team_id: u64 },

    /// Share of matches a team has won
    WinRate { team_id: u64 },
}

/// Player details shared by `players add` and `players update`
#[derive(Args, Debug, Clone)]
pub struct PlayerArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub age: u32,

    #[arg(long)]
    pub gender: String,

    #[arg(long)]
    pub position: String,

    /// Height in centimetres
    #[arg(long)]
    pub height: f64,

    /// Weight in kilograms
    #[arg(long)]
    pub weight: f64,

    #[arg(long)]
    pub jersey: u32,

    /// Id of the player's team
    #[arg(long)]
    pub team: u64,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlayerAction {
    /// Register a new player
    Add(PlayerArgs),

    /// Replace a player's details
    Update {
        player_id: u64,

        #[command(flatten)]
        details: PlayerArgs,
    },

    /// Remove a player by id
    Delete { player_id: u64 },
}

/// Tournament details shared by `tournaments add` and `tournaments update`
#[derive(Args, Debug, Clone)]
pub struct TournamentArgs {
    #[arg(long)]
    pub name: String,

    /// Format, e.g. League or Knockout
    #[arg(long = "type")]
    pub kind: String,

    #[arg(long)]
    pub host: String,

    #[arg(long)]
    pub teams: u32,

    #[arg(long)]
    pub matches: u32,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TournamentAction {
    /// Create a tournament
    Add(TournamentArgs),

    /// Replace a tournament's details
    Update {
        tournament_id: u64,

        #[command(flatten)]
        details: TournamentArgs,
    },

    /// Remove a tournament by id
    Delete { tournament_id: u64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum MatchAction {
    /// Schedule a match between two teams
    Create {
        #[arg(long)]
        team1: u64,

        #[arg(long)]
        team2: u64,

        /// Match date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        #[arg(long)]
        venue: String,

        #[arg(long, default_value = "1")]
        tournament: u64,
    },

    /// Record the final score of a match
    Result {
        match_id: u64,

        #[arg(long)]
        team1: u64,

        #[arg(long)]
        goals1: u32,

        #[arg(long)]
        team2: u64,

        #[arg(long)]
        goals2: u32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Fish,
    Zsh,
}

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::Zsh => clap_complete::Shell::Zsh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_player_search() {
        let cli = Cli::try_parse_from(["leaguedesk", "players", "--search", "arsen"]).unwrap();
        match cli.command {
            Commands::Players { search, action } => {
                assert_eq!(search, "arsen");
                assert!(action.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bare_teams_lists() {
        let cli = Cli::try_parse_from(["leaguedesk", "teams"]).unwrap();
        assert!(matches!(cli.command, Commands::Teams { action: None }));
    }

    #[test]
    fn parses_match_result() {
        let cli = Cli::try_parse_from([
            "leaguedesk", "matches", "result", "12", "--team1", "1", "--goals1", "2", "--team2",
            "3", "--goals2", "0",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Matches {
                action: Some(MatchAction::Result { match_id: 12, goals1: 2, .. })
            }
        ));
    }

    #[test]
    fn parses_player_update() {
        let cli = Cli::try_parse_from([
            "leaguedesk", "players", "update", "9", "--name", "Bob", "--age", "30", "--gender",
            "Male", "--position", "GK", "--height", "190", "--weight", "85.5", "--jersey", "1",
            "--team", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Players {
                action: Some(PlayerAction::Update { player_id, details }),
                ..
            } => {
                assert_eq!(player_id, 9);
                assert_eq!(details.weight, 85.5);
                assert_eq!(details.team, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_tournament_add_with_type_flag() {
        let cli = Cli::try_parse_from([
            "leaguedesk", "tournaments", "add", "--name", "Cup", "--type", "Knockout", "--host",
            "UK", "--teams", "8", "--matches", "7", "--start", "2025-01-01", "--end",
            "2025-02-01",
        ])
        .unwrap();
        match cli.command {
            Commands::Tournaments {
                action: Some(TournamentAction::Add(args)),
            } => assert_eq!(args.kind, "Knockout"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn login_accepts_password_from_stdin_flag() {
        let cli =
            Cli::try_parse_from(["leaguedesk", "login", "-u", "alice", "--password-stdin"]).unwrap();
        match cli.command {
            Commands::Login { password_stdin, .. } => assert!(password_stdin),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
