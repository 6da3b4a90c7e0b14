use crate::core::models::Player;

/// Players whose name or team contains `term`, ignoring case.
/// An empty term keeps everyone.
pub fn filter_players<'a>(players: &'a [Player], term: &str) -> Vec<&'a Player> {
    let term = term.to_lowercase();
    players
        .iter()
        .filter(|player| {
            player.name.to_lowercase().contains(&term)
                || player.team_name.to_lowercase().contains(&term)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u64, name: &str, team: &str) -> Player {
        Player {
            player_id: id,
            name: name.into(),
            position: "FW".into(),
            team_name: team.into(),
            jersey_number: 9,
        }
    }

    #[test]
    fn matches_name_case_insensitively() {
        let players = vec![player(1, "Arsenal Jones", "Reds"), player(2, "Bob", "Blues")];
        let found = filter_players(&players, "arsen");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].player_id, 1);
    }

    #[test]
    fn matches_team_name_too() {
        let players = vec![player(1, "Arsenal Jones", "Reds"), player(2, "Bob", "Blues")];
        let found = filter_players(&players, "BLU");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Bob");
    }

    #[test]
    fn empty_term_keeps_everyone_in_order() {
        let players = vec![player(1, "A", "X"), player(2, "B", "Y")];
        let ids: Vec<u64> = filter_players(&players, "")
            .iter()
            .map(|p| p.player_id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn no_match_yields_nothing() {
        let players = vec![player(1, "A", "X")];
        assert!(filter_players(&players, "zzz").is_empty());
    }
}
