//! Win condition check (§4.10, bottom).
//!
//! Runs once per tick, after the connectivity audit and before the delta
//! encoder. If the room is down to a single non-defeated nation, that
//! nation wins outright. Otherwise any nation whose `territoryPercentage`
//! has reached `winConditionPercentage` wins, and every other
//! non-defeated nation is immediately defeated alongside it (§8 item 9,
//! "win uniqueness").

use territory_nations::NationRegistry;
use territory_types::{NationIdx, NationStatus};
use territory_world::OwnershipMatrix;
use tracing::info;

/// Evaluate the win condition for the room. Returns the winner, if any.
pub fn check_win(
    registry: &mut NationRegistry,
    matrix: &mut OwnershipMatrix,
    win_condition_percentage: f64,
) -> Option<NationIdx> {
    let survivors: Vec<NationIdx> = registry
        .iter()
        .filter(|(_, n)| n.status != NationStatus::Defeated)
        .map(|(idx, _)| idx)
        .collect();

    let winner = if survivors.len() == 1 {
        survivors.first().copied()
    } else {
        registry
            .iter()
            .find(|(_, n)| n.status == NationStatus::Active && n.territory_percentage >= win_condition_percentage)
            .map(|(idx, _)| idx)
    };

    let Some(winner) = winner else { return None };

    for idx in survivors {
        if let Some(n) = registry.get_mut(idx) {
            if idx == winner {
                n.status = NationStatus::Winner;
            } else if n.status != NationStatus::Defeated {
                n.status = NationStatus::Defeated;
                n.capital_cell = None;
                n.cities.clear();
                let _ = matrix;
            }
        }
    }
    // Defeated nations' territory is erased so the next tick's delta pass
    // sees the loss as an ordinary sub-stream, same as a succession defeat.
    let losers: Vec<NationIdx> = registry
        .iter()
        .filter(|(idx, n)| *idx != winner && n.status == NationStatus::Defeated)
        .map(|(idx, _)| idx)
        .collect();
    for idx in losers {
        registry.erase_territory(matrix, idx);
    }

    info!(nation = %winner, "win condition met");
    Some(winner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use territory_types::{Coord, ResourceBundle};
    use territory_world::{uniform_grassland_map, OwnershipMatrix};

    #[test]
    fn sole_survivor_wins() {
        let map = uniform_grassland_map(4, 4);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        let a = registry.register("a".to_owned(), Coord::new(0, 0), false, 10.0, ResourceBundle::zero());
        let b = registry.register("b".to_owned(), Coord::new(1, 1), false, 10.0, ResourceBundle::zero());
        registry.get_mut(b).unwrap().status = NationStatus::Defeated;

        let winner = check_win(&mut registry, &mut matrix, 50.0);

        assert_eq!(winner, Some(a));
        assert_eq!(registry.get(a).unwrap().status, NationStatus::Winner);
    }

    #[test]
    fn territory_share_triggers_win_and_defeats_rest() {
        let map = uniform_grassland_map(4, 4);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        let a = registry.register("a".to_owned(), Coord::new(0, 0), false, 10.0, ResourceBundle::zero());
        let b = registry.register("b".to_owned(), Coord::new(1, 1), false, 10.0, ResourceBundle::zero());
        registry.get_mut(a).unwrap().territory_percentage = 60.0;
        registry.get_mut(b).unwrap().territory_percentage = 40.0;

        let winner = check_win(&mut registry, &mut matrix, 50.0);

        assert_eq!(winner, Some(a));
        assert_eq!(registry.get(b).unwrap().status, NationStatus::Defeated);
    }

    #[test]
    fn no_nation_meets_threshold_no_winner() {
        let map = uniform_grassland_map(4, 4);
        let mut matrix = OwnershipMatrix::new(&map);
        let mut registry = NationRegistry::new();
        registry.register("a".to_owned(), Coord::new(0, 0), false, 10.0, ResourceBundle::zero());
        registry.register("b".to_owned(), Coord::new(1, 1), false, 10.0, ResourceBundle::zero());

        assert_eq!(check_win(&mut registry, &mut matrix, 50.0), None);
    }
}
