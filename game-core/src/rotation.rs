use game_types::{Player, PlayerId};

/// Pick the explainer for a turn: connected players in join order, cycled
/// by the 1-based turn counter. `None` when nobody is connected; callers
/// must skip the transition rather than guess.
pub fn next_explainer(players: &[Player], turn_number: u32) -> Option<PlayerId> {
    let connected: Vec<&Player> = players.iter().filter(|p| p.is_connected).collect();
    if connected.is_empty() {
        return None;
    }
    let index = (turn_number as usize - 1) % connected.len();
    Some(connected[index].id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(connected: &[bool]) -> Vec<Player> {
        connected
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let mut p = Player::new(format!("P{i}"), i == 0);
                p.is_connected = c;
                p
            })
            .collect()
    }

    #[test]
    fn test_cycles_through_all_connected_players() {
        let players = players(&[true, true, true]);
        let ids: Vec<_> = players.iter().map(|p| p.id).collect();

        let mut seen = Vec::new();
        for turn in 1..=3 {
            seen.push(next_explainer(&players, turn).unwrap());
        }
        assert_eq!(seen, ids); // join order, each exactly once

        // Then it repeats.
        assert_eq!(next_explainer(&players, 4), Some(ids[0]));
        assert_eq!(next_explainer(&players, 7), Some(ids[0]));
    }

    #[test]
    fn test_skips_disconnected_players() {
        let players = players(&[true, false, true]);
        let connected_ids = [players[0].id, players[2].id];

        for turn in 1..=10u32 {
            let picked = next_explainer(&players, turn).unwrap();
            assert!(connected_ids.contains(&picked));
            assert_eq!(picked, connected_ids[(turn as usize - 1) % 2]);
        }
    }

    #[test]
    fn test_no_connected_players() {
        let players = players(&[false, false]);
        assert_eq!(next_explainer(&players, 1), None);
        assert_eq!(next_explainer(&[], 1), None);
    }
}
