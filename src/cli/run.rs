use std::future::Future;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::cli::commands::{
    MatchAction, PlayerAction, PlayerArgs, TeamAction, TournamentAction, TournamentArgs,
};
use crate::cli::render;
use crate::config::Settings;
use crate::core::client::LeagueClient;
use crate::core::forms::{FormError, LoginForm, SignupForm, submit_login, submit_signup};
use crate::core::models::{
    LeaderboardEntry, Match, MatchResult, NewMatch, NewPlayer, NewTeam, NewTournament, Team,
};
use crate::core::page::{PageState, load_page};
use crate::core::search::filter_players;
use crate::core::session::SessionStore;
use crate::core::storage::FileStorage;

/// Everything a command needs: the session handle and a client bound to it
pub struct CliContext {
    pub session: SessionStore,
    pub client: LeagueClient,
    quiet: bool,
}

impl CliContext {
    pub fn new(settings: &Settings, quiet: bool) -> Result<Self> {
        let session = SessionStore::open(Arc::new(FileStorage::new(&settings.state_dir)));
        let client = LeagueClient::new(settings, session.clone())?;
        Ok(Self {
            session,
            client,
            quiet,
        })
    }

    /// Runs `fut` behind a spinner unless output is suppressed.
    async fn with_spinner<T>(&self, message: &str, fut: impl Future<Output = T>) -> Result<T> {
        if self.quiet {
            return Ok(fut.await);
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner.set_message(message.to_string());

        let out = fut.await;
        spinner.finish_and_clear();
        Ok(out)
    }
}

pub async fn run_leaderboard(ctx: &CliContext) -> Result<()> {
    let state = ctx
        .with_spinner(
            "Loading leaderboard...",
            load_page("leaderboard", ctx.client.leaderboard()),
        )
        .await?;

    if state.rows().is_empty() {
        println!("No standings available.");
    } else {
        print!("{}", render::leaderboard_table(state.rows()));
    }
    Ok(())
}

pub async fn run_matches(ctx: &CliContext, action: Option<MatchAction>) -> Result<()> {
    match action {
        None => {
            let state = ctx
                .with_spinner("Loading matches...", load_page("matches", ctx.client.matches()))
                .await?;
            if state.rows().is_empty() {
                println!("No matches scheduled.");
            }
            for m in state.rows() {
                println!("{}", render::match_card(m));
            }
        }
        Some(MatchAction::Create {
            team1,
            team2,
            date,
            venue,
            tournament,
        }) => {
            let new_match = NewMatch {
                team1_id: team1,
                team2_id: team2,
                match_date: date,
                venue,
                tournament_id: tournament,
            };
            let message = ctx.client.create_match(&new_match).await?;
            println!("{}", message.unwrap_or_else(|| "Match scheduled!".into()));
        }
        Some(MatchAction::Result {
            match_id,
            team1,
            goals1,
            team2,
            goals2,
        }) => {
            let result = MatchResult {
                team1_id: team1,
                team1_goals: goals1,
                team2_id: team2,
                team2_goals: goals2,
            };
            let message = ctx.client.record_result(match_id, &result).await?;
            println!("{}", message.unwrap_or_else(|| "Result recorded!".into()));
        }
    }
    Ok(())
}

pub async fn run_teams(ctx: &CliContext, action: Option<TeamAction>) -> Result<()> {
    match action {
        None => {
            let state = ctx
                .with_spinner("Loading teams...", load_page("teams", ctx.client.teams()))
                .await?;
            if state.rows().is_empty() {
                println!("No teams registered.");
            }
            for team in state.rows() {
                println!("{}", render::team_card(team));
            }
        }
        Some(TeamAction::Add {
            name,
            coach,
            year,
            tournament,
        }) => {
            let team = NewTeam {
                team_name: name,
                coach_name: coach,
                foundation_year: year,
                tournament_id: tournament,
            };
            let message = ctx.client.create_team(&team).await?;
            println!("{}", message.unwrap_or_else(|| "Team added!".into()));
        }
        Some(TeamAction::Delete { team_id }) => {
            let message = ctx.client.delete_team(team_id).await?;
            println!("{}", message.unwrap_or_else(|| "Team deleted!".into()));
        }
        Some(TeamAction::WinRate { team_id }) => {
            let pct = ctx.client.win_percentage(team_id).await?;
            println!("Team {}: {:.1}% wins", pct.team_id, pct.win_percentage);
        }
    }
    Ok(())
}

pub async fn run_players(
    ctx: &CliContext,
    search: &str,
    action: Option<PlayerAction>,
) -> Result<()> {
    let message = match action {
        None => return list_players(ctx, search).await,
        Some(PlayerAction::Add(details)) => ctx
            .client
            .create_player(&new_player(details))
            .await?
            .unwrap_or_else(|| "Player added!".into()),
        Some(PlayerAction::Update { player_id, details }) => ctx
            .client
            .update_player(player_id, &new_player(details))
            .await?
            .unwrap_or_else(|| "Player updated!".into()),
        Some(PlayerAction::Delete { player_id }) => ctx
            .client
            .delete_player(player_id)
            .await?
            .unwrap_or_else(|| "Player deleted!".into()),
    };
    println!("{message}");
    Ok(())
}

fn new_player(details: PlayerArgs) -> NewPlayer {
    NewPlayer {
        name: details.name,
        age: details.age,
        gender: details.gender,
        position: details.position,
        height_cm: details.height,
        weight_kg: details.weight,
        jersey_number: details.jersey,
        team_id: details.team,
    }
}

async fn list_players(ctx: &CliContext, search: &str) -> Result<()> {
    let state = ctx
        .with_spinner("Loading players...", load_page("players", ctx.client.players()))
        .await?;

    let found = filter_players(state.rows(), search);
    if found.is_empty() {
        println!("No players found matching your search.");
    }
    for player in found {
        print!("{}", render::player_card(player));
    }
    Ok(())
}

pub async fn run_tournaments(ctx: &CliContext, action: Option<TournamentAction>) -> Result<()> {
    let message = match action {
        None => return list_tournaments(ctx).await,
        Some(TournamentAction::Add(details)) => ctx
            .client
            .create_tournament(&new_tournament(details))
            .await?
            .unwrap_or_else(|| "Tournament added!".into()),
        Some(TournamentAction::Update {
            tournament_id,
            details,
        }) => ctx
            .client
            .update_tournament(tournament_id, &new_tournament(details))
            .await?
            .unwrap_or_else(|| "Tournament updated!".into()),
        Some(TournamentAction::Delete { tournament_id }) => ctx
            .client
            .delete_tournament(tournament_id)
            .await?
            .unwrap_or_else(|| "Tournament deleted!".into()),
    };
    println!("{message}");
    Ok(())
}

fn new_tournament(details: TournamentArgs) -> NewTournament {
    NewTournament {
        name: details.name,
        kind: details.kind,
        host_country: details.host,
        no_of_teams: details.teams,
        no_of_matches: details.matches,
        start_date: details.start,
        end_date: details.end,
    }
}

async fn list_tournaments(ctx: &CliContext) -> Result<()> {
    let state = ctx
        .with_spinner(
            "Loading tournaments...",
            load_page("tournaments", ctx.client.tournaments()),
        )
        .await?;

    if state.rows().is_empty() {
        println!("No tournaments found.");
    } else {
        print!("{}", render::tournament_table(state.rows()));
    }
    Ok(())
}

/// Loads teams, matches and standings side by side; each degrades on its own.
pub async fn run_overview(ctx: &CliContext) -> Result<()> {
    let (teams, matches, standings) = ctx
        .with_spinner("Loading league...", async {
            futures::join!(
                load_page("teams", ctx.client.teams()),
                load_page("matches", ctx.client.matches()),
                load_page("leaderboard", ctx.client.leaderboard()),
            )
        })
        .await?;

    println!("{}", overview_text(&teams, &matches, &standings));
    Ok(())
}

fn overview_text(
    teams: &PageState<Team>,
    matches: &PageState<Match>,
    standings: &PageState<LeaderboardEntry>,
) -> String {
    let played = matches.rows().iter().filter(|m| m.is_completed()).count();
    let mut lines = vec![
        format!("Teams:   {}", teams.rows().len()),
        format!(
            "Matches: {} ({played} completed)",
            matches.rows().len()
        ),
    ];
    if let Some(leader) = standings.rows().first() {
        lines.push(format!(
            "Leader:  {} ({} pts)",
            leader.team_name, leader.total_points
        ));
    }
    if let Some(next) = matches.rows().iter().find(|m| !m.is_completed()) {
        lines.push(format!(
            "Next:    {} vs {} on {}",
            next.team1_name,
            next.team2_name,
            next.display_date()
        ));
    }
    lines.join("\n")
}

/// Where a password comes from on the command line
#[derive(Debug)]
pub struct PasswordSource {
    /// From the flag or its environment variable
    pub given: Option<String>,
    /// Environment variable to suggest when nothing was given
    pub env: &'static str,
}

impl PasswordSource {
    /// Takes the next stdin line when `from_stdin` is set, otherwise the
    /// given value.
    pub fn resolve(self, from_stdin: bool, input: &mut dyn BufRead) -> Result<String> {
        if from_stdin {
            let mut line = String::new();
            input.read_line(&mut line)?;
            let secret = line.trim_end_matches(['\r', '\n']);
            if secret.is_empty() {
                bail!("No password on standard input");
            }
            return Ok(secret.to_string());
        }
        self.given
            .ok_or_else(|| anyhow!("Missing password: set {} or use --password-stdin", self.env))
    }
}

pub async fn run_signup(
    ctx: &CliContext,
    username: String,
    password: PasswordSource,
    confirm_password: PasswordSource,
    from_stdin: bool,
) -> Result<()> {
    let mut input = std::io::stdin().lock();
    let password = password.resolve(from_stdin, &mut input)?;
    let confirm_password = confirm_password.resolve(from_stdin, &mut input)?;

    let form = SignupForm {
        username,
        password,
        confirm_password,
    };

    match submit_signup(&form, &ctx.client, &ctx.session).await {
        Ok(session) => {
            println!("Signed up as {}", render::session_line(&session));
            Ok(())
        }
        Err(FormError::Invalid(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("{}: {message}", field.label());
            }
            Err(anyhow!("Signup details are invalid"))
        }
        Err(FormError::Rejected(message)) => Err(anyhow!(message)),
    }
}

pub async fn run_login(
    ctx: &CliContext,
    username: String,
    password: PasswordSource,
    from_stdin: bool,
) -> Result<()> {
    let password = password.resolve(from_stdin, &mut std::io::stdin().lock())?;
    let form = LoginForm { username, password };

    match submit_login(&form, &ctx.client, &ctx.session).await {
        Ok(session) => {
            println!("Signed in as {}", render::session_line(&session));
            Ok(())
        }
        Err(e) => Err(anyhow!(e.to_string())),
    }
}

pub fn run_logout(ctx: &CliContext) {
    let was_logged_in = ctx.session.is_logged_in();
    ctx.session.logout();
    if was_logged_in {
        println!("Signed out.");
    } else {
        info!("No active session");
        println!("Not signed in.");
    }
}

pub fn run_whoami(ctx: &CliContext) {
    match ctx.session.current() {
        Some(session) => println!("{}", render::session_line(&session)),
        None => println!("Not signed in."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeagueError;
    use std::io::Cursor;

    fn fixture(id: u64, status: &str) -> Match {
        Match {
            match_id: id,
            team1_name: "Reds".into(),
            team2_name: "Blues".into(),
            match_date: "2025-03-15".into(),
            venue: "Anfield".into(),
            status: status.into(),
        }
    }

    #[test]
    fn overview_survives_partial_failure() {
        let teams = PageState::settle("teams", Err(LeagueError::RequestFailed(500)));
        let matches = PageState::Ready(vec![fixture(1, "Completed"), fixture(2, "Scheduled")]);
        let standings: PageState<LeaderboardEntry> = PageState::Ready(vec![]);

        let text = overview_text(&teams, &matches, &standings);
        assert!(text.contains("Teams:   0"));
        assert!(text.contains("Matches: 2 (1 completed)"));
        assert!(text.contains("Next:    Reds vs Blues"));
        assert!(!text.contains("Leader"));
    }

    fn source(given: Option<&str>) -> PasswordSource {
        PasswordSource {
            given: given.map(str::to_string),
            env: "LEAGUEDESK_PASSWORD",
        }
    }

    #[test]
    fn stdin_supplies_password_then_confirmation() {
        let mut input = Cursor::new("secret1\nsecret2\r\n");

        let first = source(Some("ignored")).resolve(true, &mut input).unwrap();
        let second = source(None).resolve(true, &mut input).unwrap();

        assert_eq!(first, "secret1");
        assert_eq!(second, "secret2");
    }

    #[test]
    fn missing_password_points_at_the_environment() {
        let err = source(None).resolve(false, &mut Cursor::new("")).unwrap_err();
        assert!(err.to_string().contains("LEAGUEDESK_PASSWORD"));

        let given = source(Some("pw")).resolve(false, &mut Cursor::new("")).unwrap();
        assert_eq!(given, "pw");
    }

    #[test]
    fn empty_stdin_is_an_error() {
        assert!(source(None).resolve(true, &mut Cursor::new("")).is_err());
    }
}
