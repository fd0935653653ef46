//! The search over every legal rest timeline.
//!
//! The rest is explored one hour at a time. Inside an hour the frontier is
//! expanded in waves with rayon: each state produces its same-hour successors
//! (convert a slot, create a unit of any tier, use the rod, use the vial) and
//! one successor in the next hour. Every successor is registered in the memo
//! set of its hour before it is kept, so each distinct [`StateKey`] is
//! explored exactly once no matter how many timelines converge on it.
//!
//! Hours only move forward, so a memo set can be dropped as soon as its hour
//! is closed. When the frontier reaches the last hour it is handed to the
//! end-of-rest resolver.

use std::collections::HashSet;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Mutex;

use ahash::{AHashSet, RandomState};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::constants::{cheapest_unit_cost, slot_point_value, Tier, ROD_SLOT_GAIN, VIAL_POINT_GAIN};
use crate::models::{RestParams, RestResult};
use crate::resolver::resolve_end_of_rest;
use crate::state::{RestState, StateKey};

const VISITED_SHARDS: usize = 64;

/// Concurrent set of explored state keys.
///
/// Keys are spread over independently locked shards, so tasks registering
/// different keys rarely contend. [`VisitedSet::insert`] is an atomic
/// insert-if-absent: of any number of racing callers with the same key,
/// exactly one gets `true`.
pub struct VisitedSet {
    hasher: RandomState,
    shards: Vec<Mutex<AHashSet<StateKey>>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        VisitedSet {
            hasher: RandomState::new(),
            shards: (0..VISITED_SHARDS).map(|_| Mutex::new(AHashSet::new())).collect(),
        }
    }

    fn shard(&self, key: &StateKey) -> &Mutex<AHashSet<StateKey>> {
        let mut hasher = self.hasher.build_hasher();
        key.hash(&mut hasher);
        &self.shards[hasher.finish() as usize % self.shards.len()]
    }

    /// Registers `key`, returning `true` if it was not present yet.
    pub fn insert(&self, key: StateKey) -> bool {
        self.shard(&key)
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key)
    }

    /// Keys registered so far.
    pub(crate) fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len())
            .sum()
    }
}

impl Default for VisitedSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters describing one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Distinct states explored (terminal states included)
    pub states_explored: usize,
    /// Distinct states that reached the end of the rest
    pub terminal_states: usize,
    /// Results emitted by the end-of-rest resolver, duplicates included
    pub results_emitted: usize,
    /// The search never started because no unit could possibly be made
    pub short_circuited: bool,
}

/// Results of a search together with its statistics.
#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    pub results: Vec<RestResult>,
    pub stats: SearchStats,
}

/// Optimistic check that a rest could produce at least one universal slot.
///
/// Counts every pact slot as convertible every hour, which over-estimates
/// what is really reachable. A `false` is therefore final, while a `true` may
/// still lead to a search that finds nothing.
///
/// # Example
///
/// ```
/// use coffeebreak::search::can_produce_at_least_one_unit;
///
/// assert!(can_produce_at_least_one_unit(2, 2, 5, 0, true, true, 4, 5));
/// assert!(!can_produce_at_least_one_unit(0, 0, 5, 0, false, false, 8, 5));
/// ```
#[allow(clippy::too_many_arguments)]
pub fn can_produce_at_least_one_unit(
    slots_total: u32,
    slot_tier: u32,
    points_total: u32,
    points_current: u32,
    rod_available: bool,
    vial_available: bool,
    hours: u32,
    minimum_points: u32,
) -> bool {
    let per_slot = slot_point_value(slot_tier) as u64;
    let hourly = (hours as u64)
        .saturating_mul(slots_total as u64)
        .saturating_mul(per_slot);
    let rod = if rod_available {
        (ROD_SLOT_GAIN as u64).saturating_mul(per_slot)
    } else {
        0
    };
    let vial = if vial_available {
        VIAL_POINT_GAIN.min(points_total.saturating_sub(points_current)) as u64
    } else {
        0
    };

    let reachable = (points_current as u64)
        .saturating_add(hourly)
        .saturating_add(rod)
        .saturating_add(vial);
    reachable >= minimum_points as u64 + cheapest_unit_cost() as u64
}

/// Every state reachable from `state` without advancing the clock.
fn same_hour_successors(state: &RestState, params: &RestParams) -> Vec<RestState> {
    let mut successors = Vec::with_capacity(8);
    successors.extend(state.convert_slot(params));
    successors.extend(Tier::DESCENDING.into_iter().filter_map(|tier| state.create_unit(tier)));
    successors.extend(state.use_rod(params));
    successors.extend(state.use_vial(params));
    successors
}

/// Explores every timeline of the rest and returns the raw results with
/// statistics.
///
/// Results are not deduplicated; see [`crate::reducer`].
pub fn run_search(params: &RestParams) -> SearchReport {
    if params.sleep_hours < 1 {
        debug!("rest shorter than an hour, nothing to explore");
        return SearchReport::default();
    }

    if !can_produce_at_least_one_unit(
        params.slots_total,
        params.slot_tier,
        params.points_total,
        params.points_current,
        params.rod_available,
        params.vial_available,
        params.sleep_hours,
        params.minimum_points,
    ) {
        warn!(
            minimum_points = params.minimum_points,
            "not enough resources to create a single spell slot"
        );
        return SearchReport {
            results: Vec::new(),
            stats: SearchStats {
                short_circuited: true,
                ..SearchStats::default()
            },
        };
    }

    let mut stats = SearchStats::default();
    let mut seen = VisitedSet::new();
    let initial = RestState::initial(params);
    seen.insert(initial.key());
    let mut frontier = vec![initial];

    while !frontier.is_empty() {
        let hour = frontier[0].hour;

        if hour >= params.sleep_hours {
            stats.states_explored += frontier.len();
            stats.terminal_states = frontier.len();
            let results: Vec<RestResult> = frontier
                .par_iter()
                .flat_map_iter(|state| resolve_end_of_rest(state, params))
                .collect();
            stats.results_emitted = results.len();
            info!(
                states = stats.states_explored,
                terminal = stats.terminal_states,
                results = stats.results_emitted,
                "rest search finished"
            );
            return SearchReport { results, stats };
        }

        let next_seen = VisitedSet::new();
        let mut next_frontier = Vec::new();
        let mut wave = frontier;

        while !wave.is_empty() {
            stats.states_explored += wave.len();
            let (same_hour, advanced): (Vec<Vec<RestState>>, Vec<Option<RestState>>) = wave
                .par_iter()
                .map(|state| {
                    let fresh: Vec<RestState> = same_hour_successors(state, params)
                        .into_iter()
                        .filter(|next| seen.insert(next.key()))
                        .collect();
                    let later = state.advance_hour(params);
                    let later = next_seen.insert(later.key()).then_some(later);
                    (fresh, later)
                })
                .unzip();

            wave = same_hour.into_iter().flatten().collect();
            next_frontier.extend(advanced.into_iter().flatten());
        }

        debug!(
            hour,
            memo = seen.len(),
            explored = stats.states_explored,
            next = next_frontier.len(),
            "hour closed"
        );
        seen = next_seen;
        frontier = next_frontier;
    }

    SearchReport {
        results: Vec::new(),
        stats,
    }
}

/// Calculates every outcome a rest can end in.
///
/// Returns an empty collection when the rest is shorter than an hour or when
/// no universal slot can possibly be created.
///
/// # Example
///
/// ```
/// use coffeebreak::models::RestParams;
/// use coffeebreak::search::calculate;
///
/// let params = RestParams {
///     slots_total: 2,
///     slots_current: 0,
///     slot_tier: 2,
///     points_total: 5,
///     points_current: 0,
///     rod_available: true,
///     vial_available: true,
///     sleep_hours: 4,
///     minimum_points: 5,
///     minimum_slots: 2,
/// };
///
/// let results = calculate(&params);
/// assert!(!results.is_empty());
/// assert!(results.iter().all(|r| r.remaining_points >= 5 && r.remaining_slots >= 2));
/// ```
pub fn calculate(params: &RestParams) -> Vec<RestResult> {
    run_search(params).results
}

/// Distinct outcome signatures in a collection of results.
pub fn distinct_outcomes(results: &[RestResult]) -> usize {
    results.iter().map(RestResult::signature).collect::<HashSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitCounts;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(points: u32) -> StateKey {
        StateKey {
            hour: 0,
            points,
            slots: 0,
            rod_used: false,
            vial_used: false,
            units: UnitCounts::default(),
        }
    }

    #[test]
    fn test_visited_set_insert_if_absent() {
        let set = VisitedSet::new();
        assert!(set.insert(key(1)));
        assert!(!set.insert(key(1)));
        assert!(set.insert(key(2)));
        assert!(!set.insert(key(2)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_visited_set_single_winner_under_race() {
        let set = VisitedSet::new();
        let winners = AtomicUsize::new(0);

        (0..1000).into_par_iter().for_each(|i| {
            if set.insert(key(i % 10)) {
                winners.fetch_add(1, Ordering::Relaxed);
            }
        });

        assert_eq!(winners.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn test_same_hour_successors_try_every_tier() {
        let params = RestParams {
            slots_total: 0,
            slots_current: 0,
            slot_tier: 1,
            points_total: 7,
            points_current: 7,
            rod_available: false,
            vial_available: false,
            sleep_hours: 1,
            minimum_points: 0,
            minimum_slots: 0,
        };
        let successors = same_hour_successors(&RestState::initial(&params), &params);

        assert_eq!(successors.len(), 5);
    }
}
