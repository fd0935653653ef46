//! Snapshot of one timeline during a rest.
//!
//! A [`RestState`] is a value: every transition borrows the current state and
//! returns a brand new one, so sibling branches never observe each other's
//! changes. The action trail is a persistent list shared between a state and
//! all of its descendants, which keeps copies cheap however long the rest is.

use std::sync::Arc;

use crate::constants::{slot_point_value, Tier, ROD_SLOT_GAIN, VIAL_POINT_GAIN};
use crate::models::{Action, ActionKind, RestParams, RestResult, UnitCounts};

struct TrailNode {
    action: Action,
    len: usize,
    prev: Option<Arc<TrailNode>>,
}

/// Append-only, structurally shared log of actions.
///
/// Cloning is a reference count bump; pushing allocates one node and leaves
/// the original trail untouched.
///
/// ```
/// use coffeebreak::models::{Action, ActionKind};
/// use coffeebreak::state::ActionTrail;
///
/// let start = ActionTrail::default().push(Action::new(ActionKind::StartRest, 0, 0, 0));
/// let longer = start.push(Action::new(ActionKind::UseVial, 0, 0, 5));
///
/// assert_eq!(start.len(), 1);
/// assert_eq!(longer.len(), 2);
/// assert_eq!(longer.to_vec()[1].kind, ActionKind::UseVial);
/// ```
#[derive(Clone, Default)]
pub struct ActionTrail {
    head: Option<Arc<TrailNode>>,
}

impl ActionTrail {
    /// Returns a new trail with `action` appended.
    pub fn push(&self, action: Action) -> ActionTrail {
        let len = self.len() + 1;
        ActionTrail {
            head: Some(Arc::new(TrailNode {
                action,
                len,
                prev: self.head.clone(),
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |node| node.len)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Actions in the order they were recorded.
    pub fn to_vec(&self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(self.len());
        let mut cursor = self.head.as_deref();
        while let Some(node) = cursor {
            actions.push(node.action);
            cursor = node.prev.as_deref();
        }
        actions.reverse();
        actions
    }
}

impl std::fmt::Debug for ActionTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}

// Unlink iteratively so long trails cannot overflow the stack on drop.
impl Drop for ActionTrail {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.prev.take(),
                Err(_) => break,
            }
        }
    }
}

/// The resource signature used to recognise equivalent timelines.
///
/// Deliberately excludes the action trail: two timelines that reach the same
/// resources at the same hour are explored once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub hour: u32,
    pub points: u32,
    pub slots: u32,
    pub rod_used: bool,
    pub vial_used: bool,
    pub units: UnitCounts,
}

/// One point along one candidate timeline.
#[derive(Debug, Clone)]
pub struct RestState {
    /// Hours elapsed since the rest began
    pub hour: u32,
    /// Pact slots remaining
    pub slots: u32,
    /// Sorcery points remaining
    pub points: u32,
    /// The rod was used, or was never available
    pub rod_used: bool,
    /// The vial was used, or was never available
    pub vial_used: bool,
    /// Universal spell slots created so far
    pub units: UnitCounts,
    /// Everything done to reach this state
    pub trail: ActionTrail,
}

impl RestState {
    /// The state at the start of the rest.
    ///
    /// Items that are not available start out as already used.
    pub fn initial(params: &RestParams) -> Self {
        RestState {
            hour: 0,
            slots: params.slots_current.min(params.slots_total),
            points: params.points_current.min(params.points_total),
            rod_used: !params.rod_available,
            vial_used: !params.vial_available,
            units: UnitCounts::default(),
            trail: ActionTrail::default().push(Action::new(ActionKind::StartRest, 0, 0, 0)),
        }
    }

    pub fn key(&self) -> StateKey {
        StateKey {
            hour: self.hour,
            points: self.points,
            slots: self.slots,
            rod_used: self.rod_used,
            vial_used: self.vial_used,
            units: self.units,
        }
    }

    fn record(&mut self, kind: ActionKind, slots_changed: i64, points_changed: i64) {
        self.trail = self
            .trail
            .push(Action::new(kind, self.hour, slots_changed, points_changed));
    }

    /// Adds points up to the maximum and returns how many were actually gained.
    fn gain_points(&mut self, amount: u32, points_total: u32) -> u32 {
        let gained = amount.min(points_total.saturating_sub(self.points));
        self.points += gained;
        gained
    }

    /// Converts one pact slot into sorcery points.
    ///
    /// Applicable while a slot is left and the points are below their maximum.
    pub fn convert_slot(&self, params: &RestParams) -> Option<RestState> {
        if self.slots == 0 || self.points >= params.points_total {
            return None;
        }
        let mut next = self.clone();
        next.slots -= 1;
        let gained = next.gain_points(slot_point_value(params.slot_tier), params.points_total);
        next.record(ActionKind::ConvertSlotToPoints, -1, gained as i64);
        Some(next)
    }

    /// Spends sorcery points on one universal slot of `tier`.
    pub fn create_unit(&self, tier: Tier) -> Option<RestState> {
        let cost = tier.cost();
        if self.points < cost {
            return None;
        }
        let mut next = self.clone();
        next.points -= cost;
        next.units.increment(tier);
        next.record(ActionKind::CreateUnit(tier), 0, -(cost as i64));
        Some(next)
    }

    /// Uses the rod to recover pact slots.
    pub fn use_rod(&self, params: &RestParams) -> Option<RestState> {
        if self.rod_used || self.slots >= params.slots_total {
            return None;
        }
        let mut next = self.clone();
        next.rod_used = true;
        let gained = ROD_SLOT_GAIN.min(params.slots_total - next.slots);
        next.slots += gained;
        next.record(ActionKind::UseRod, gained as i64, 0);
        Some(next)
    }

    /// Uses the vial to recover sorcery points.
    pub fn use_vial(&self, params: &RestParams) -> Option<RestState> {
        if self.vial_used || self.points >= params.points_total {
            return None;
        }
        let mut next = self.clone();
        next.vial_used = true;
        let gained = next.gain_points(VIAL_POINT_GAIN, params.points_total);
        next.record(ActionKind::UseVial, 0, gained as i64);
        Some(next)
    }

    /// Moves to the next hour; pact slots come back in full.
    pub fn advance_hour(&self, params: &RestParams) -> RestState {
        let mut next = self.clone();
        next.restore_slots(params.slots_total);
        next.hour += 1;
        next
    }

    /// Refills pact slots to `slots_total`, recording the refill when any
    /// slot came back. Returns how many were restored.
    pub fn restore_slots(&mut self, slots_total: u32) -> u32 {
        let restored = slots_total.saturating_sub(self.slots);
        if restored > 0 {
            self.slots += restored;
            self.record(ActionKind::RestoreSlots, restored as i64, 0);
        }
        restored
    }

    /// Spends `count` pact slots for points at the end of the rest.
    pub(crate) fn spend_slots_at_rest_end(&mut self, count: u32, params: &RestParams) {
        let count = count.min(self.slots);
        self.slots -= count;
        let value = count.saturating_mul(slot_point_value(params.slot_tier));
        let gained = self.gain_points(value, params.points_total);
        self.record(ActionKind::EndOfRestConversion, -(count as i64), gained as i64);
    }

    /// Creates as many units as possible, highest tier first, never letting
    /// points fall below `floor`.
    pub(crate) fn convert_points_greedily(&mut self, floor: u32) {
        while let Some(tier) = Tier::DESCENDING
            .into_iter()
            .find(|tier| self.points >= floor.saturating_add(tier.cost()))
        {
            let cost = tier.cost();
            self.points -= cost;
            self.units.increment(tier);
            self.record(ActionKind::CreateUnit(tier), 0, -(cost as i64));
        }
    }

    /// Freezes this state into a result.
    pub fn into_result(self) -> RestResult {
        RestResult {
            units: self.units,
            remaining_points: self.points,
            remaining_slots: self.slots,
            trail: self.trail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RestParams {
        RestParams {
            slots_total: 2,
            slots_current: 1,
            slot_tier: 3,
            points_total: 5,
            points_current: 4,
            rod_available: true,
            vial_available: true,
            sleep_hours: 2,
            minimum_points: 0,
            minimum_slots: 0,
        }
    }

    #[test]
    fn test_convert_slot_clamps_points() {
        let p = params();
        let state = RestState::initial(&p);
        let next = state.convert_slot(&p).unwrap();

        assert_eq!(next.points, 5);
        assert_eq!(next.slots, 0);
        assert_eq!(next.trail.to_vec().last().unwrap().points_changed, 1);
        // the original is untouched
        assert_eq!(state.points, 4);
        assert_eq!(state.slots, 1);
    }

    #[test]
    fn test_advance_hour_records_restore_at_previous_hour() {
        let p = params();
        let next = RestState::initial(&p).advance_hour(&p);

        assert_eq!(next.hour, 1);
        assert_eq!(next.slots, 2);
        let actions = next.trail.to_vec();
        let last = actions.last().unwrap();
        assert_eq!(last.kind, ActionKind::RestoreSlots);
        assert_eq!(last.hour, 0);
    }

    #[test]
    fn test_greedy_conversion_respects_floor() {
        let mut state = RestState::initial(&params());
        state.points = 9;
        state.convert_points_greedily(1);

        // 9 - 7 = 2 would leave 2 >= 1, then nothing else fits above the floor
        assert_eq!(state.units.get(Tier::Five), 1);
        assert_eq!(state.units.total(), 1);
        assert_eq!(state.points, 2);
    }

    #[test]
    fn test_key_ignores_trail() {
        let p = params();
        let a = RestState::initial(&p);
        let mut b = a.clone();
        b.trail = b.trail.push(Action::new(ActionKind::UseVial, 0, 0, 0));

        assert_eq!(a.key(), b.key());
    }
}
