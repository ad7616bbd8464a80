//! Tick Driver (C10, §4.10).
//!
//! Drives one full tick for a single room, in order: drain commands,
//! grow population and passive resources (C2, C7), advance arrows and
//! the bot director (C5, C8), advance resource-node claims (C7), audit
//! connectivity (C4), check the win condition, encode deltas (C9), and
//! snapshot the ownership matrix for the next tick's diff.
//!
//! Every sub-phase below is infallible by construction: a command that
//! cannot apply degrades to a [`territory_types::RejectionReason`]
//! rather than a [`Result::Err`], and a nation that loses its capital
//! either succeeds to a new one or is defeated (see [`crate::connectivity`]).
//! The only thing that can actually fail at this layer is the clock
//! wrapping past `u64::MAX`.

use std::collections::BTreeSet;

use rand::Rng;
use territory_nations::bot::{due_for_order, synthesize_order};
use territory_nations::{ArrowOutcome, NationRegistry, hole_fill, process_attack_arrow, process_defend_arrow};
use territory_resources::{advance_claims, compute_all_bonuses, prune_unowned_in_progress};
use territory_types::{
    ArrowOrderView, BonusBundle, CityType, ClaimMap, Command, CommandOutcome, Coord, Nation, NationIdx,
    NationSnapshot, NationStatus, OutboundTick, RoomId, TerritoryDelta,
};
use territory_world::{Map, OwnershipMatrix};

use crate::clock::{ClockError, SimulationClock};
use crate::command::{FirstArrowTracker, apply_command};
use crate::config::SimulationConfig;
use crate::connectivity::run_connectivity_pass;
use crate::growth::apply_growth;
use crate::win::check_win;

/// Errors that can occur while driving a tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The room's clock could not advance.
    #[error(transparent)]
    Clock(#[from] ClockError),
}

/// One game room's complete mutable state (§5): everything `run_tick`
/// needs and nothing it doesn't. Owned exclusively by whatever drives
/// the tick loop (a room actor, a test harness).
pub struct Room {
    /// Stable room identity, carried through into every outbound tick.
    pub room_id: RoomId,
    /// Monotonic tick counter.
    pub clock: SimulationClock,
    /// Immutable terrain, supplied at room start.
    pub map: Map,
    /// Dense current/previous ownership grid (C1).
    pub matrix: OwnershipMatrix,
    /// Every nation, its territory set, and its border cache (C2, C3).
    pub registry: NationRegistry,
    /// Resource-node claim progress (C7).
    pub claims: ClaimMap,
    /// Room-wide tunables, read-only after room start (§5).
    pub config: SimulationConfig,
    /// First-arrow-free bookkeeping (§6).
    pub first_arrow: FirstArrowTracker,
}

impl Room {
    /// A fresh room over `map`, with no nations registered yet.
    #[must_use]
    pub fn new(room_id: RoomId, map: Map, config: SimulationConfig) -> Self {
        let matrix = OwnershipMatrix::new(&map);
        Self {
            room_id,
            clock: SimulationClock::new(),
            map,
            matrix,
            registry: NationRegistry::new(),
            claims: ClaimMap::new(),
            config,
            first_arrow: FirstArrowTracker::new(),
        }
    }
}

/// Everything produced by driving one tick: each inbound command's
/// resolution (in submission order), the winner if the tick produced
/// one, and the outbound payload to publish.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// The tick number just completed.
    pub tick: u64,
    /// Per-command resolutions, in submission order.
    pub command_outcomes: Vec<CommandOutcome>,
    /// The nation that won this tick, if the win condition was met.
    pub winner: Option<NationIdx>,
    /// The payload to publish to clients and persist.
    pub outbound: OutboundTick,
}

/// Drive one full tick for `room` (§4.10).
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter would overflow.
pub fn run_tick<R: Rng + ?Sized>(
    room: &mut Room,
    commands: Vec<Command>,
    rng: &mut R,
) -> Result<TickReport, TickError> {
    let tick = room.clock.advance()?;

    // 1. Integrate commands (§5, "atomic event between ticks").
    let mut command_outcomes = Vec::with_capacity(commands.len());
    let mut territory_changed = false;
    for command in commands {
        let founds_nation = matches!(command, Command::FoundNation { .. });
        let outcome = apply_command(
            &mut room.registry,
            &mut room.matrix,
            &room.map,
            &room.config.arrow_pricing,
            &mut room.first_arrow,
            tick,
            command,
        );
        if founds_nation && outcome == CommandOutcome::Accepted {
            territory_changed = true;
        }
        command_outcomes.push(outcome);
    }

    // 2. Grow population and apply passive resource production (C2, C7).
    let bonuses = compute_all_bonuses(&room.claims, &room.map, room.registry.len(), &room.config.resource);
    let active: Vec<NationIdx> =
        room.registry.iter().filter(|(_, n)| n.status == NationStatus::Active).map(|(idx, _)| idx).collect();
    for &idx in &active {
        grow_nation(room, idx, &bonuses);
    }

    // 3. Advance arrows and the bot director (C5, C6, C8).
    for &idx in &active {
        if advance_nation_arrows(room, idx, &bonuses, tick, rng) {
            territory_changed = true;
        }
        hole_fill(&mut room.registry, &mut room.matrix, &room.map, idx, &room.config.arrow);
    }

    // 4. Advance resource-node claims (C7).
    advance_claims(&mut room.claims, &room.matrix, &room.map, &room.config.resource);
    prune_unowned_in_progress(&mut room.claims, &room.matrix);

    // 5. Connectivity audit (C4): scheduled, or forced by this tick's
    //    territorial churn.
    if room.clock.connectivity_due(room.config.world.connectivity_check_interval_ticks) || territory_changed {
        run_connectivity_pass(&mut room.registry, &mut room.matrix, &room.map);
    }

    // 6. Win condition.
    let winner = check_win(&mut room.registry, &mut room.matrix, room.config.world.win_condition_percentage);

    // 7. Encode deltas (C9), before the matrix snapshot rolls `current`
    //    into `previous`.
    territory_deltas::encode_deltas(&mut room.registry, &room.matrix, &room.map);

    // 9. Assemble the outbound payload before clearing each nation's
    //    delta; step 8 (the matrix snapshot) doesn't touch nation state
    //    so its ordering relative to this one doesn't matter.
    let outbound = build_outbound(room, tick);
    room.matrix.snapshot();
    clear_outbound_deltas(&mut room.registry);

    Ok(TickReport { tick, command_outcomes, winner, outbound })
}

fn grow_nation(room: &mut Room, nation: NationIdx, bonuses: &[BonusBundle]) {
    let territory_size = room.registry.territory_of(nation).map_or(0, BTreeSet::len);
    let town_count = room.registry.get(nation).map_or(0, |n| {
        u32::try_from(n.cities.iter().filter(|c| c.kind == CityType::Town).count()).unwrap_or(u32::MAX)
    });
    let bonus = bonuses.get(usize::from(nation.get())).copied().unwrap_or_else(BonusBundle::neutral);
    let town_population_bonus = room.config.structure.town_population_bonus;
    if let Some(n) = room.registry.get_mut(nation) {
        apply_growth(n, territory_size, town_count, town_population_bonus, &bonus, &room.config.growth);
    }
}

/// Advance `nation`'s live attack and defend arrows, then let the bot
/// director fill an empty attack slot if due. Returns whether the
/// attack arrow actually converted territory this tick, the signal the
/// connectivity audit's "any cell changed hands" trigger uses.
fn advance_nation_arrows<R: Rng + ?Sized>(
    room: &mut Room,
    nation: NationIdx,
    bonuses: &[BonusBundle],
    tick: u64,
    rng: &mut R,
) -> bool {
    let mut churned = false;

    let mut attack = room.registry.get_mut(nation).and_then(|n| n.arrow_orders.attack.take());
    if let Some(arrow) = attack.as_mut() {
        let outcome = process_attack_arrow(
            &mut room.registry,
            &mut room.matrix,
            &room.map,
            nation,
            arrow,
            bonuses,
            tick,
            room.config.world.tick_rate_ms,
            &room.config.arrow,
            &room.config.cost,
            &room.config.structure,
        );
        match outcome {
            ArrowOutcome::Active { spent } => churned = spent > 0.0,
            ArrowOutcome::Retired { returned_power } => {
                if let Some(n) = room.registry.get_mut(nation) {
                    n.population += returned_power;
                }
                attack = None;
            }
        }
    }
    if let Some(n) = room.registry.get_mut(nation) {
        n.arrow_orders.attack = attack;
    }

    let mut defend = room.registry.get_mut(nation).and_then(|n| n.arrow_orders.defend.take());
    if let Some(arrow) = defend.as_mut() {
        let outcome = process_defend_arrow(arrow, &room.config.arrow);
        if let Some(n) = room.registry.get_mut(nation) {
            n.population += outcome.returned;
        }
        if outcome.retired {
            defend = None;
        }
    }
    if let Some(n) = room.registry.get_mut(nation) {
        n.arrow_orders.defend = defend;
    }

    let wants_bot_order = room.registry.get(nation).is_some_and(|n| due_for_order(n, tick, &room.config.bot));
    if wants_bot_order {
        let target_capital = nearest_enemy_capital(&room.registry, nation);
        if let Some(arrow) = synthesize_order(
            &mut room.registry,
            &room.matrix,
            &room.map,
            nation,
            target_capital,
            &room.config.bot,
            tick,
            rng,
        ) {
            if let Some(n) = room.registry.get_mut(nation) {
                n.arrow_orders.attack = Some(arrow);
            }
        }
    }

    churned
}

/// The nearest other active nation's capital to `nation`'s own, by
/// Manhattan distance (§4.8, bot targeting).
fn nearest_enemy_capital(registry: &NationRegistry, nation: NationIdx) -> Option<Coord> {
    let anchor = registry.get(nation)?.capital_cell?;
    registry
        .iter()
        .filter(|&(idx, n)| idx != nation && n.status == NationStatus::Active)
        .filter_map(|(_, n)| n.capital_cell)
        .min_by_key(|&capital| anchor.manhattan_distance(capital))
}

fn arrow_order_views(nation: &Nation) -> Vec<ArrowOrderView> {
    [nation.arrow_orders.attack.as_ref(), nation.arrow_orders.defend.as_ref()]
        .into_iter()
        .flatten()
        .map(|arrow| ArrowOrderView {
            id: arrow.id,
            kind: arrow.kind,
            path: arrow.path.clone(),
            current_index: arrow.current_index,
            remaining_power: arrow.remaining_power,
        })
        .collect()
}

fn build_outbound(room: &Room, tick: u64) -> OutboundTick {
    let nations = room
        .registry
        .iter()
        .map(|(_, n)| NationSnapshot {
            owner: n.owner.clone(),
            status: n.status,
            population: n.population,
            max_population: n.max_population,
            resources: n.resources.clone(),
            cities: n.cities.clone(),
            arrow_orders: arrow_order_views(n),
            territory_delta: n.territory_delta_outbound.clone(),
            territory_percentage: n.territory_percentage,
        })
        .collect();
    OutboundTick { room_id: room.room_id, tick, nations }
}

fn clear_outbound_deltas(registry: &mut NationRegistry) {
    let indices: Vec<NationIdx> = registry.iter().map(|(idx, _)| idx).collect();
    for idx in indices {
        if let Some(n) = registry.get_mut(idx) {
            n.territory_delta_outbound = TerritoryDelta::empty();
        }
    }
}
