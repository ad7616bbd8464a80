//! Population growth and passive resource production (§4.10 step 2,
//! dataflow line "growth and resource production (C2, C7)").
//!
//! Runs once per non-defeated nation at the start of every tick, before
//! arrow processing, so the budget arrows draw against reflects this
//! tick's population.

use territory_types::{BonusBundle, Nation, Resource};

use crate::config::GrowthConfig;

/// Recompute `maxPopulation` from territory size and town count, grow
/// `population` toward it, and apply the nation's passive resource
/// bonuses (§4.7's `production`/`goldIncome`, fed into this tick's
/// treasury).
pub fn apply_growth(
    nation: &mut Nation,
    territory_size: usize,
    town_count: u32,
    town_population_bonus: f64,
    bonus: &BonusBundle,
    config: &GrowthConfig,
) {
    #[allow(clippy::cast_precision_loss)]
    let territory = territory_size as f64;
    let max_population = config.territory_population_k * territory.powf(0.6)
        + town_population_bonus * f64::from(town_count)
        + config.population_floor;
    nation.max_population = max_population;

    let headroom = if max_population > 0.0 { 1.0 - nation.population / max_population } else { 0.0 };
    let growth = config.growth_base_rate * headroom.max(0.0) * bonus.expansion_bonus.max(0.0);
    nation.population = (nation.population + growth).clamp(0.0, max_population);

    nation.resources.add(Resource::Gold, bonus.gold_income);
    nation.resources.add(Resource::Wood, bonus.production);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use territory_types::{NationStatus, ResourceBundle};

    fn nation(population: f64) -> Nation {
        Nation {
            owner: "alice".to_owned(),
            status: NationStatus::Active,
            is_bot: false,
            capital_cell: None,
            cities: Vec::new(),
            population,
            max_population: 1.0,
            resources: ResourceBundle::zero(),
            arrow_orders: territory_types::ArrowOrders::default(),
            territory_delta_outbound: territory_types::TerritoryDelta::empty(),
            territory_percentage: 0.0,
        }
    }

    #[test]
    fn population_grows_toward_cap_and_never_exceeds_it() {
        let mut n = nation(5.0);
        let config = GrowthConfig::default();
        let bonus = BonusBundle::neutral();
        let before_cap = n.population;
        apply_growth(&mut n, 100, 0, 50.0, &bonus, &config);
        assert!(n.population > before_cap);
        assert!(n.population <= n.max_population);
    }

    #[test]
    fn town_count_raises_the_population_cap() {
        let mut with_town = nation(5.0);
        let mut without_town = nation(5.0);
        let config = GrowthConfig::default();
        let bonus = BonusBundle::neutral();
        apply_growth(&mut with_town, 100, 2, 50.0, &bonus, &config);
        apply_growth(&mut without_town, 100, 0, 50.0, &bonus, &config);
        assert!(with_town.max_population > without_town.max_population);
    }

    #[test]
    fn bonus_income_feeds_treasury() {
        let mut n = nation(5.0);
        let config = GrowthConfig::default();
        let bonus = BonusBundle { gold_income: 3.0, production: 2.0, ..BonusBundle::neutral() };
        apply_growth(&mut n, 50, 0, 50.0, &bonus, &config);
        assert!((n.resources.gold - 3.0).abs() < f64::EPSILON);
        assert!((n.resources.wood - 2.0).abs() < f64::EPSILON);
    }
}
