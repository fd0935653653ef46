//! Tests for the rest search.

use std::collections::HashSet;

use coffeebreak::constants::Tier;
use coffeebreak::models::{RestParams, RestResult, UnitCounts};
use coffeebreak::reducer::deduplicate;
use coffeebreak::resolver::resolve_end_of_rest;
use coffeebreak::search::{calculate, can_produce_at_least_one_unit, distinct_outcomes, run_search};
use coffeebreak::state::{RestState, StateKey};

fn depleted_params() -> RestParams {
    RestParams {
        slots_total: 2,
        slots_current: 0,
        slot_tier: 2,
        points_total: 5,
        points_current: 0,
        rod_available: true,
        vial_available: true,
        sleep_hours: 4,
        minimum_points: 5,
        minimum_slots: 2,
    }
}

fn signatures(results: &[RestResult]) -> HashSet<(UnitCounts, u32, u32)> {
    results.iter().map(RestResult::signature).collect()
}

/// Straightforward sequential search used as a reference.
fn reference_search(params: &RestParams) -> (HashSet<(UnitCounts, u32, u32)>, usize) {
    fn visit(
        state: RestState,
        params: &RestParams,
        seen: &mut HashSet<StateKey>,
        out: &mut HashSet<(UnitCounts, u32, u32)>,
    ) {
        if !seen.insert(state.key()) {
            return;
        }
        if state.hour >= params.sleep_hours {
            out.extend(resolve_end_of_rest(&state, params).iter().map(RestResult::signature));
            return;
        }
        let mut next: Vec<RestState> = Vec::new();
        next.extend(state.convert_slot(params));
        next.extend(Tier::DESCENDING.iter().filter_map(|&t| state.create_unit(t)));
        next.extend(state.use_rod(params));
        next.extend(state.use_vial(params));
        next.push(state.advance_hour(params));
        for n in next {
            visit(n, params, seen, out);
        }
    }

    let mut seen = HashSet::new();
    let mut out = HashSet::new();
    visit(RestState::initial(params), params, &mut seen, &mut out);
    (out, seen.len())
}

#[test]
fn test_depleted_character_finds_results_above_reserves() {
    let params = depleted_params();
    let results = calculate(&params);

    assert!(!results.is_empty(), "Should find at least one combination");
    for result in &results {
        assert!(result.remaining_points >= params.minimum_points);
        assert!(result.remaining_slots >= params.minimum_slots);
        assert!(result.units.any(), "Every result should produce a unit");
    }
}

#[test]
fn test_zero_hours_returns_nothing() {
    let params = RestParams {
        sleep_hours: 0,
        ..depleted_params()
    };

    assert!(calculate(&params).is_empty());
}

#[test]
fn test_abundant_resources_reach_tier_five() {
    let params = RestParams {
        slots_total: 2,
        slots_current: 2,
        slot_tier: 1,
        points_total: 5,
        points_current: 5,
        rod_available: false,
        vial_available: false,
        sleep_hours: 20,
        minimum_points: 0,
        minimum_slots: 0,
    };
    let results = calculate(&params);

    assert!(
        results.iter().any(|r| r.units.get(Tier::Five) >= 1),
        "Should afford at least one level 5 slot"
    );
}

#[test]
fn test_matches_sequential_reference() {
    let params = RestParams {
        sleep_hours: 2,
        minimum_points: 0,
        minimum_slots: 0,
        ..depleted_params()
    };
    let report = run_search(&params);
    let (expected, distinct_states) = reference_search(&params);

    assert_eq!(signatures(&report.results), expected);
    assert_eq!(
        report.stats.states_explored, distinct_states,
        "Each distinct state should be explored exactly once"
    );
}

#[test]
fn test_repeated_searches_agree() {
    let params = depleted_params();
    let first = deduplicate(calculate(&params));
    let second = deduplicate(calculate(&params));

    assert_eq!(first.len(), second.len());
    assert_eq!(signatures(&first), signatures(&second));
}

#[test]
fn test_hours_never_go_backwards() {
    let results = calculate(&depleted_params());

    for result in &results {
        let hours: Vec<u32> = result.actions().iter().map(|a| a.hour).collect();
        assert!(
            hours.windows(2).all(|w| w[0] <= w[1]),
            "Hours out of order: {:?}",
            hours
        );
    }
}

#[test]
fn test_trail_accounts_for_final_resources() {
    let params = depleted_params();
    let results = calculate(&params);

    for result in &results {
        let actions = result.actions();
        let points: i64 = actions.iter().map(|a| a.points_changed).sum();
        let slots: i64 = actions.iter().map(|a| a.slots_changed).sum();
        assert_eq!(params.points_current as i64 + points, result.remaining_points as i64);
        assert_eq!(params.slots_current as i64 + slots, result.remaining_slots as i64);
    }
}

#[test]
fn test_short_circuit_skips_search() {
    let params = RestParams {
        slots_total: 0,
        slots_current: 0,
        slot_tier: 0,
        points_total: 5,
        points_current: 0,
        rod_available: false,
        vial_available: false,
        sleep_hours: 8,
        minimum_points: 0,
        minimum_slots: 0,
    };
    let report = run_search(&params);

    assert!(report.results.is_empty());
    assert!(report.stats.short_circuited);
    assert_eq!(report.stats.states_explored, 0);
}

#[test]
fn test_feasibility_bound() {
    // 1 hour * 1 slot * level 1 = 1 point, plus 1 current = 2 = cost of a level 1 slot
    assert!(can_produce_at_least_one_unit(1, 1, 5, 1, false, false, 1, 0));
    // same, but a reserve of 1 point pushes the threshold to 3
    assert!(!can_produce_at_least_one_unit(1, 1, 5, 1, false, false, 1, 1));
    // the rod adds one slot's worth of points
    assert!(can_produce_at_least_one_unit(1, 1, 5, 1, true, false, 1, 1));
    // the vial only counts the room left below the maximum
    assert!(!can_produce_at_least_one_unit(0, 0, 2, 1, false, true, 1, 1));
    assert!(can_produce_at_least_one_unit(0, 0, 3, 1, false, true, 1, 1));
}

#[test]
fn test_reserves_can_be_dipped_mid_rest() {
    // Points must end at 5 and start at 5: any unit has to be paid for
    // mid-rest and the points won back before morning.
    let params = RestParams {
        slots_total: 1,
        slots_current: 1,
        slot_tier: 3,
        points_total: 5,
        points_current: 5,
        rod_available: false,
        vial_available: false,
        sleep_hours: 1,
        minimum_points: 5,
        minimum_slots: 1,
    };
    let results = calculate(&params);

    assert!(
        results.iter().any(|r| r.units.get(Tier::One) == 1),
        "Spending below the reserve and recovering should be allowed"
    );
    assert!(distinct_outcomes(&results) >= 1);
}

#[test]
fn test_stats_count_terminal_states() {
    let params = depleted_params();
    let report = run_search(&params);

    assert!(report.stats.terminal_states > 0);
    assert!(report.stats.states_explored >= report.stats.terminal_states);
    assert_eq!(report.stats.results_emitted, report.results.len());
}

#[test]
fn test_huge_slot_level_is_clamped_at_rest_end() {
    let params = RestParams {
        slots_total: 2,
        slots_current: 2,
        slot_tier: u32::MAX / 2 + 1,
        points_total: 10,
        points_current: 0,
        rod_available: false,
        vial_available: false,
        sleep_hours: 1,
        minimum_points: 0,
        minimum_slots: 0,
    };
    let results = calculate(&params);

    assert!(!results.is_empty());
    assert!(results.iter().all(|r| r.remaining_points <= params.points_total));
    // spending both slots at the end fills the pool exactly once
    assert!(results
        .iter()
        .any(|r| r.remaining_slots == 0 && r.units == UnitCounts::new(0, 1, 0, 0, 1)));
}
