//! Plain-text rendering of league records for the one-shot commands.

use crate::core::models::{LeaderboardEntry, Match, Player, Team, Tournament};
use crate::core::session::Session;

const COMPLETED_BADGE: &str = "✔";
const PENDING_BADGE: &str = "•";
const LEADER_MARK: &str = "🏆";

/// Truncate a string to `max` chars, appending an ellipsis when cut.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

pub fn leaderboard_table(entries: &[LeaderboardEntry]) -> String {
    let mut out = format!(
        "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>3} {:>4}\n",
        "Pos", "Team", "MP", "W", "D", "L", "GF", "Pts"
    );
    // Server order is rank order
    for (index, entry) in entries.iter().enumerate() {
        let mut name = truncate_str(&entry.team_name, 22);
        if index == 0 {
            name = format!("{name} {LEADER_MARK}");
        }
        out.push_str(&format!(
            "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>3} {:>4}\n",
            index + 1,
            name,
            entry.matches_played,
            entry.wins,
            entry.draws,
            entry.losses,
            entry.goals_for,
            entry.total_points
        ));
    }
    out
}

pub fn status_badge(m: &Match) -> String {
    let mark = if m.is_completed() {
        COMPLETED_BADGE
    } else {
        PENDING_BADGE
    };
    format!("[{mark} {}]", m.status)
}

pub fn match_card(m: &Match) -> String {
    format!(
        "{}  @ {}\n  {} {} {}\n",
        m.display_date(),
        m.venue,
        m.team1_name,
        status_badge(m),
        m.team2_name
    )
}

pub fn team_card(team: &Team) -> String {
    let founded = team
        .foundation_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "({}) {}  [ID: {}]\n  Coach: {}\n  Est: {}\n",
        team.initial(),
        team.team_name,
        team.team_id,
        team.coach_name,
        founded
    )
}

pub fn player_card(player: &Player) -> String {
    format!(
        "#{:<3} {:<28} {:<12} Playing for {}\n",
        player.jersey_number,
        truncate_str(&player.name, 28),
        player.position,
        player.team_name
    )
}

pub fn tournament_table(tournaments: &[Tournament]) -> String {
    let mut out = format!(
        "{:>3}  {:<24} {:<12} {:<14} {:>5} {:>7}  {}\n",
        "ID", "Name", "Type", "Host", "Teams", "Matches", "Dates"
    );
    for t in tournaments {
        out.push_str(&format!(
            "{:>3}  {:<24} {:<12} {:<14} {:>5} {:>7}  {} → {}\n",
            t.tournament_id,
            truncate_str(&t.name, 24),
            truncate_str(&t.kind, 12),
            truncate_str(&t.host_country, 14),
            t.no_of_teams,
            t.no_of_matches,
            t.start_date,
            t.end_date
        ));
    }
    out
}

pub fn session_line(session: &Session) -> String {
    format!("{} ({}), id {}", session.username, session.role, session.id)
}
