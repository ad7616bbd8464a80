//! Structure Defense Model (C6, §4.6).
//!
//! For an attacked cell, the defender's strongest applicable defense
//! post (tower beats town/capital; posts never stack) yields a troop-loss
//! multiplier and a speed multiplier consumed by [`crate::arrow`]'s cost
//! formula.

use territory_types::{Coord, Nation};

use crate::config::StructureConfig;

/// The strongest applicable defense effect at a contested cell, or
/// [`DefenseEffect::NONE`] if the defender has no post in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefenseEffect {
    /// Multiplies the defender's effective defense value.
    pub troop_loss_multiplier: f64,
    /// Multiplier applied to the attacker's effective speed (`<= 1.0`).
    pub speed_multiplier: f64,
}

impl DefenseEffect {
    /// No defense post in range: neutral multipliers.
    pub const NONE: Self = Self { troop_loss_multiplier: 1.0, speed_multiplier: 1.0 };
}

/// Scan `defender`'s cities and return the single strongest applicable
/// defense effect at `target`, by Euclidean distance (§4.6).
///
/// Tower beats town/capital when both are in range; only the strongest
/// effect ever applies.
#[must_use]
pub fn strongest_effect_at(defender: &Nation, target: Coord, config: &StructureConfig) -> DefenseEffect {
    let mut best: Option<(f64, DefenseEffect)> = None;
    for city in &defender.cities {
        if !city.kind.is_defense_post() {
            continue;
        }
        let post = if matches!(city.kind, territory_types::CityType::Tower) {
            &config.tower
        } else {
            &config.town
        };
        let distance = city.at.euclidean_distance(target);
        if distance > post.defense_radius {
            continue;
        }
        let effect = DefenseEffect {
            troop_loss_multiplier: post.troop_loss_multiplier,
            speed_multiplier: 1.0 - post.speed_reduction,
        };
        let stronger = best.is_none_or(|(_, current)| {
            effect.troop_loss_multiplier > current.troop_loss_multiplier
        });
        if stronger {
            best = Some((distance, effect));
        }
    }
    best.map_or(DefenseEffect::NONE, |(_, effect)| effect)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use territory_types::{City, CityType, NationStatus, ResourceBundle};

    fn nation_with_cities(cities: Vec<City>) -> Nation {
        Nation {
            owner: "defender".to_owned(),
            status: NationStatus::Active,
            is_bot: false,
            capital_cell: Some(Coord::new(0, 0)),
            cities,
            population: 100.0,
            max_population: 100.0,
            resources: ResourceBundle::zero(),
            arrow_orders: territory_types::ArrowOrders::default(),
            territory_delta_outbound: territory_types::TerritoryDelta::empty(),
            territory_percentage: 0.0,
        }
    }

    #[test]
    fn no_post_in_range_yields_no_effect() {
        let nation = nation_with_cities(vec![City {
            at: Coord::new(0, 0),
            kind: CityType::Capital,
            name: None,
        }]);
        let config = StructureConfig::default();
        let effect = strongest_effect_at(&nation, Coord::new(1000, 1000), &config);
        assert_eq!(effect, DefenseEffect::NONE);
    }

    #[test]
    fn tower_beats_town_when_both_in_range() {
        let nation = nation_with_cities(vec![
            City { at: Coord::new(20, 20), kind: CityType::Capital, name: None },
            City { at: Coord::new(21, 20), kind: CityType::Tower, name: None },
        ]);
        let config = StructureConfig::default();
        let effect = strongest_effect_at(&nation, Coord::new(20, 20), &config);
        assert!((effect.troop_loss_multiplier - config.tower.troop_loss_multiplier).abs() < f64::EPSILON);
    }

    #[test]
    fn production_structures_never_defend() {
        let nation = nation_with_cities(vec![City {
            at: Coord::new(5, 5),
            kind: CityType::Farm,
            name: None,
        }]);
        let config = StructureConfig::default();
        let effect = strongest_effect_at(&nation, Coord::new(5, 5), &config);
        assert_eq!(effect, DefenseEffect::NONE);
    }
}
