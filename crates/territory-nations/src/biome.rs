//! Static biome-similarity table and terrain cost multipliers feeding the
//! arrow cost formula (§4.5, §9 Open Question 2).
//!
//! The similarity value between two biomes drives `lossMult` and
//! `speedMult` in [`crate::arrow`]. Exact same biome scores `1.0`; biomes
//! sharing a [`territory_types::BiomeFamily`] score `0.7`; everything else
//! falls back to `0.3`. These concrete tiers were left as an open
//! question by the design brief ("identical ~= 1.0; adjacent biome groups
//! ~= 0.6-0.8; unrelated ~= 0.3"); `0.7` and `0.3` were picked as the
//! midpoints of those ranges.

use territory_types::Biome;

/// Floor similarity value for biomes in unrelated families.
pub const MIN_SIMILARITY: f64 = 0.3;

/// Similarity value for biomes sharing a family but not identical.
const FAMILY_SIMILARITY: f64 = 0.7;

/// Similarity value for an exact biome match.
const IDENTICAL_SIMILARITY: f64 = 1.0;

/// Terrain-similarity factor between a source and target biome, in
/// `[MIN_SIMILARITY, 1.0]`.
#[must_use]
pub fn similarity(source: Biome, target: Biome) -> f64 {
    if source == target {
        IDENTICAL_SIMILARITY
    } else if source.family() == target.family() {
        FAMILY_SIMILARITY
    } else {
        MIN_SIMILARITY
    }
}

/// Cost multiplier applied for crossing into this biome's terrain,
/// beyond the similarity-derived `lossMult` (§4.5, "Apply per-biome
/// multipliers"). Crossing a river or mountain costs more regardless of
/// similarity to the source.
#[must_use]
pub const fn crossing_cost_mult(target: Biome, river_mult: f64, mountain_mult: f64) -> f64 {
    match target {
        Biome::River => river_mult,
        Biome::Mountain => mountain_mult,
        _ => 1.0,
    }
}

/// Terrain-dependent defense multiplier applied when attacking into this
/// biome (§4.5, "terrain-dependent defense multiplies cost when
/// attacking"). Harsh terrain favors the defender.
#[must_use]
pub const fn defense_mult(target: Biome) -> f64 {
    match target.family() {
        territory_types::BiomeFamily::Harsh => 1.3,
        territory_types::BiomeFamily::DenseForest => 1.15,
        territory_types::BiomeFamily::Water | territory_types::BiomeFamily::OpenPlain => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_biome_is_fully_similar() {
        assert!((similarity(Biome::Grassland, Biome::Grassland) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn same_family_biomes_score_mid_tier() {
        assert!((similarity(Biome::Grassland, Biome::Savanna) - FAMILY_SIMILARITY).abs() < f64::EPSILON);
    }

    #[test]
    fn unrelated_biomes_score_floor() {
        assert!((similarity(Biome::Grassland, Biome::Mountain) - MIN_SIMILARITY).abs() < f64::EPSILON);
    }

    #[test]
    fn river_and_mountain_crossing_cost_more() {
        assert!(crossing_cost_mult(Biome::River, 1.5, 2.0) > 1.0);
        assert!(crossing_cost_mult(Biome::Mountain, 1.5, 2.0) > 1.0);
        assert!((crossing_cost_mult(Biome::Grassland, 1.5, 2.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn harsh_terrain_favors_defender() {
        assert!(defense_mult(Biome::Mountain) > defense_mult(Biome::Grassland));
    }
}
