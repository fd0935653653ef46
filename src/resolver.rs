//! End-of-rest bonus conversion.
//!
//! When a timeline reaches the end of the rest the pact slots come back one
//! last time. From there every possible number of slots can be traded for
//! sorcery points before the points are turned into universal slots, highest
//! tier first. Only outcomes that keep both reserves intact are reported.

use crate::models::{RestParams, RestResult};
use crate::state::RestState;

/// Resolves a state that has reached the end of the rest.
///
/// Returns one result per slot-spend level that satisfies the reserves and
/// produced at least one unit, from the largest spend down to none.
///
/// # Arguments
///
/// * `state` - A state whose hour has reached `params.sleep_hours`
/// * `params` - The rest being explored
pub fn resolve_end_of_rest(state: &RestState, params: &RestParams) -> Vec<RestResult> {
    let mut rested = state.clone();
    rested.restore_slots(params.slots_total);

    let Some(spendable) = rested.slots.checked_sub(params.minimum_slots) else {
        return Vec::new();
    };

    (0..=spendable)
        .rev()
        .filter_map(|spend| {
            let mut branch = rested.clone();
            if spend > 0 {
                branch.spend_slots_at_rest_end(spend, params);
            }
            branch.convert_points_greedily(params.minimum_points);

            let keeps_reserves =
                branch.points >= params.minimum_points && branch.slots >= params.minimum_slots;
            (keeps_reserves && branch.units.any()).then(|| branch.into_result())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Tier;
    use crate::models::ActionKind;

    fn params() -> RestParams {
        RestParams {
            slots_total: 2,
            slots_current: 0,
            slot_tier: 2,
            points_total: 10,
            points_current: 0,
            rod_available: false,
            vial_available: false,
            sleep_hours: 1,
            minimum_points: 0,
            minimum_slots: 0,
        }
    }

    fn terminal(points: u32) -> RestState {
        let p = params();
        let mut state = RestState::initial(&p);
        state.hour = p.sleep_hours;
        state.points = points;
        state
    }

    #[test]
    fn test_every_spend_level_is_tried() {
        let results = resolve_end_of_rest(&terminal(0), &params());

        // spend 2 -> 4 points, spend 1 -> 2 points, spend 0 -> nothing
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].units.get(Tier::Two), 1);
        assert_eq!(results[0].remaining_slots, 0);
        assert_eq!(results[1].units.get(Tier::One), 1);
        assert_eq!(results[1].remaining_slots, 1);
    }

    #[test]
    fn test_slots_restored_before_spending() {
        let results = resolve_end_of_rest(&terminal(0), &params());
        let actions = results[0].actions();

        assert!(actions.iter().any(|a| a.kind == ActionKind::RestoreSlots));
        assert!(actions.iter().any(|a| a.kind == ActionKind::EndOfRestConversion));
    }

    #[test]
    fn test_minimum_slots_limits_spending() {
        let mut p = params();
        p.minimum_slots = 2;
        let results = resolve_end_of_rest(&terminal(3), &p);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].remaining_slots, 2);
        assert_eq!(results[0].units.get(Tier::Two), 1);
    }

    #[test]
    fn test_nothing_reported_without_units() {
        let mut p = params();
        p.minimum_slots = 2;
        p.minimum_points = 5;
        let results = resolve_end_of_rest(&terminal(5), &p);

        assert!(results.is_empty());
    }
}
