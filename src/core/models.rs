use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{LeagueError, Result};

/// Status string the API uses for finished matches
pub const COMPLETED_STATUS: &str = "Completed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: u64,
    pub team_name: String,
    pub coach_name: String,
    #[serde(default)]
    pub foundation_year: Option<i32>,
    #[serde(default)]
    pub tournament_id: Option<u64>,
}

impl Team {
    /// First letter of the team name, used as a badge
    pub fn initial(&self) -> char {
        self.team_name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: u64,
    pub name: String,
    pub position: String,
    pub team_name: String,
    pub jersey_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: u64,
    pub team1_name: String,
    pub team2_name: String,
    /// ISO date or date-time as sent by the API
    pub match_date: String,
    pub venue: String,
    /// Free-form; only "Completed" is treated specially
    pub status: String,
}

impl Match {
    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED_STATUS
    }

    /// Date formatted like "Sat, Mar 15, 2025", or the raw string when it
    /// cannot be parsed.
    pub fn display_date(&self) -> String {
        parse_api_date(&self.match_date)
            .map(|date| date.format("%a, %b %-d, %Y").to_string())
            .unwrap_or_else(|| self.match_date.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub team_id: u64,
    pub team_name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub total_points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub tournament_id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub host_country: String,
    pub no_of_teams: u32,
    pub no_of_matches: u32,
    pub start_date: String,
    pub end_date: String,
}

/// Payload for `POST /teams`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTeam {
    pub team_name: String,
    pub coach_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foundation_year: Option<i32>,
    pub tournament_id: u64,
}

impl NewTeam {
    pub fn validate(&self) -> Result<()> {
        if self.team_name.trim().is_empty() || self.coach_name.trim().is_empty() {
            return Err(LeagueError::Invalid("Name and Coach are required.".into()));
        }
        Ok(())
    }
}

/// Payload for `POST /matches`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMatch {
    pub team1_id: u64,
    pub team2_id: u64,
    pub match_date: String,
    pub venue: String,
    pub tournament_id: u64,
}

impl NewMatch {
    pub fn validate(&self) -> Result<()> {
        if self.team1_id == self.team2_id {
            return Err(LeagueError::Invalid("A team cannot play itself.".into()));
        }
        if parse_api_date(&self.match_date).is_none() {
            return Err(LeagueError::Invalid(format!(
                "Invalid match date: {}",
                self.match_date
            )));
        }
        if self.venue.trim().is_empty() {
            return Err(LeagueError::Invalid("Venue is required.".into()));
        }
        Ok(())
    }
}

/// Payload for `POST /matches/{id}/result`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub team1_id: u64,
    pub team1_goals: u32,
    pub team2_id: u64,
    pub team2_goals: u32,
}

fn parse_api_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Payload for `POST /players` and `PUT /players/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPlayer {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub position: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub jersey_number: u32,
    pub team_id: u64,
}

impl NewPlayer {
    pub fn validate(&self) -> Result<()> {
        let blank = [&self.name, &self.gender, &self.position]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank {
            return Err(LeagueError::Invalid("All fields are required.".into()));
        }
        if self.age == 0 || self.height_cm <= 0.0 || self.weight_kg <= 0.0 {
            return Err(LeagueError::Invalid(
                "Age, Height and Weight must be positive numbers.".into(),
            ));
        }
        Ok(())
    }
}

/// Payload for `POST /tournaments` and `PUT /tournaments/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub host_country: String,
    pub no_of_teams: u32,
    pub no_of_matches: u32,
    pub start_date: String,
    pub end_date: String,
}

impl NewTournament {
    pub fn validate(&self) -> Result<()> {
        let blank = [&self.name, &self.kind, &self.host_country]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank {
            return Err(LeagueError::Invalid("All fields are required.".into()));
        }

        let date = |raw: &str| {
            parse_api_date(raw)
                .ok_or_else(|| LeagueError::Invalid(format!("Invalid tournament date: {raw}")))
        };
        let (start, end) = (date(&self.start_date)?, date(&self.end_date)?);
        if end < start {
            return Err(LeagueError::Invalid(
                "Tournament cannot end before it starts.".into(),
            ));
        }
        Ok(())
    }
}

/// Body of `GET /teams/{id}/win-percentage`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WinPercentage {
    pub team_id: u64,
    /// 0.0 to 100.0; a team with no matches reports 0
    #[serde(default)]
    pub win_percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(status: &str, date: &str) -> Match {
        Match {
            match_id: 1,
            team1_name: "Reds".into(),
            team2_name: "Blues".into(),
            match_date: date.into(),
            venue: "Anfield".into(),
            status: status.into(),
        }
    }

    #[test]
    fn only_exact_completed_status_counts() {
        assert!(fixture("Completed", "2025-03-15").is_completed());
        assert!(!fixture("Scheduled", "2025-03-15").is_completed());
        assert!(!fixture("completed", "2025-03-15").is_completed());
    }

    #[test]
    fn display_date_handles_api_shapes() {
        assert_eq!(fixture("", "2025-03-15").display_date(), "Sat, Mar 15, 2025");
        assert_eq!(
            fixture("", "2025-03-15T18:30:00.000Z").display_date(),
            "Sat, Mar 15, 2025"
        );
        assert_eq!(
            fixture("", "2025-03-15 18:30:00").display_date(),
            "Sat, Mar 15, 2025"
        );
        assert_eq!(fixture("", "next week").display_date(), "next week");
    }

    #[test]
    fn team_tolerates_missing_optional_fields() {
        let team: Team = serde_json::from_str(
            r#"{"team_id": 1, "team_name": "arsenal", "coach_name": "Mikel"}"#,
        )
        .unwrap();
        assert_eq!(team.foundation_year, None);
        assert_eq!(team.initial(), 'A');
    }

    #[test]
    fn tournament_reads_type_field() {
        let t: Tournament = serde_json::from_str(
            r#"{"tournament_id": 1, "name": "Cup", "type": "Knockout", "host_country": "UK",
                "no_of_teams": 8, "no_of_matches": 7, "start_date": "2025-01-01", "end_date": "2025-02-01"}"#,
        )
        .unwrap();
        assert_eq!(t.kind, "Knockout");
    }

    #[test]
    fn new_team_requires_name_and_coach() {
        let mut team = NewTeam {
            team_name: "Reds".into(),
            coach_name: " ".into(),
            foundation_year: None,
            tournament_id: 1,
        };
        assert!(team.validate().is_err());
        team.coach_name = "Jurgen".into();
        assert!(team.validate().is_ok());

        let body = serde_json::to_value(&team).unwrap();
        assert!(body.get("foundation_year").is_none());
    }

    #[test]
    fn new_match_rejects_same_team() {
        let m = NewMatch {
            team1_id: 4,
            team2_id: 4,
            match_date: "2025-03-15".into(),
            venue: "Home".into(),
            tournament_id: 1,
        };
        assert_eq!(
            m.validate().unwrap_err().user_message(""),
            "A team cannot play itself."
        );
    }

    fn player() -> NewPlayer {
        NewPlayer {
            name: "Bukayo Saka".into(),
            age: 23,
            gender: "Male".into(),
            position: "RW".into(),
            height_cm: 178.0,
            weight_kg: 72.0,
            jersey_number: 7,
            team_id: 1,
        }
    }

    #[test]
    fn new_player_requires_every_field() {
        assert!(player().validate().is_ok());

        let mut missing = player();
        missing.position = "".into();
        assert_eq!(
            missing.validate().unwrap_err().user_message(""),
            "All fields are required."
        );

        let mut weightless = player();
        weightless.weight_kg = 0.0;
        assert!(weightless.validate().is_err());
    }

    #[test]
    fn new_tournament_checks_dates() {
        let mut cup = NewTournament {
            name: "Cup".into(),
            kind: "Knockout".into(),
            host_country: "UK".into(),
            no_of_teams: 8,
            no_of_matches: 7,
            start_date: "2025-02-01".into(),
            end_date: "2025-01-01".into(),
        };
        assert_eq!(
            cup.validate().unwrap_err().user_message(""),
            "Tournament cannot end before it starts."
        );

        cup.end_date = "someday".into();
        assert!(cup.validate().is_err());

        cup.end_date = "2025-03-01".into();
        assert!(cup.validate().is_ok());
        assert_eq!(serde_json::to_value(&cup).unwrap()["type"], "Knockout");
    }

    #[test]
    fn win_percentage_defaults_to_zero() {
        let pct: WinPercentage = serde_json::from_str(r#"{"team_id": 3}"#).unwrap();
        assert_eq!(pct.win_percentage, 0.0);
    }
}
