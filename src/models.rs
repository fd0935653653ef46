//! Data models for coffeebreak.
//!
//! This module contains the value types that flow in and out of the search:
//! the rest parameters, per-tier unit tallies, the actions recorded along a
//! timeline, the results and the sort keys used to rank them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::Tier;
use crate::error::{CoffeeError, Result};
use crate::state::ActionTrail;

/// Universal spell slots produced so far, one counter per tier.
///
/// # Example
///
/// ```
/// use coffeebreak::constants::Tier;
/// use coffeebreak::models::UnitCounts;
///
/// let mut units = UnitCounts::default();
/// units.increment(Tier::Three);
/// units.increment(Tier::One);
///
/// assert_eq!(units.get(Tier::Three), 1);
/// assert_eq!(units.total(), 2);
/// assert!(units.any());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitCounts {
    counts: [u32; 5],
}

impl UnitCounts {
    /// Builds a tally from counts listed tier 1 first.
    pub fn new(tier1: u32, tier2: u32, tier3: u32, tier4: u32, tier5: u32) -> Self {
        UnitCounts {
            counts: [tier1, tier2, tier3, tier4, tier5],
        }
    }

    pub fn get(&self, tier: Tier) -> u32 {
        self.counts[tier.index()]
    }

    pub fn increment(&mut self, tier: Tier) {
        self.counts[tier.index()] += 1;
    }

    /// Total units across all tiers.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Whether at least one unit of any tier was produced.
    pub fn any(&self) -> bool {
        self.counts.iter().any(|&c| c > 0)
    }

    /// Counts listed tier 1 first.
    pub fn as_array(&self) -> [u32; 5] {
        self.counts
    }

    /// `true` if `self` has at least as many units as `other` in every tier and
    /// strictly more in at least one.
    pub fn dominates(&self, other: &UnitCounts) -> bool {
        let mut strictly_better = false;
        for (mine, theirs) in self.counts.iter().zip(other.counts.iter()) {
            if mine < theirs {
                return false;
            }
            if mine > theirs {
                strictly_better = true;
            }
        }
        strictly_better
    }
}

/// What happened at one step of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    StartRest,
    ConvertSlotToPoints,
    CreateUnit(Tier),
    UseRod,
    UseVial,
    RestoreSlots,
    EndOfRestConversion,
}

/// One recorded step, with the signed change it made to each pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    /// Hour of the rest in which the action happened
    pub hour: u32,
    /// Change to pact slots (negative when spent)
    pub slots_changed: i64,
    /// Change to sorcery points (negative when spent)
    pub points_changed: i64,
}

impl Action {
    pub fn new(kind: ActionKind, hour: u32, slots_changed: i64, points_changed: i64) -> Self {
        Action {
            kind,
            hour,
            slots_changed,
            points_changed,
        }
    }
}

/// A finished timeline: what it produced and what it left over.
///
/// Two results are the same outcome when their unit tallies and remaining
/// pools match; the action trail does not take part in equality or hashing.
#[derive(Debug, Clone)]
pub struct RestResult {
    /// Universal spell slots created, per tier
    pub units: UnitCounts,
    /// Sorcery points left when the rest ends
    pub remaining_points: u32,
    /// Pact slots left when the rest ends
    pub remaining_slots: u32,
    /// How this outcome was reached
    pub trail: ActionTrail,
}

impl RestResult {
    /// The fields that identify an outcome.
    pub fn signature(&self) -> (UnitCounts, u32, u32) {
        (self.units, self.remaining_points, self.remaining_slots)
    }

    pub fn total_units(&self) -> u32 {
        self.units.total()
    }

    /// Number of recorded actions, including the start of the rest.
    pub fn action_count(&self) -> usize {
        self.trail.len()
    }

    /// The recorded actions in the order they happened.
    pub fn actions(&self) -> Vec<Action> {
        self.trail.to_vec()
    }
}

impl PartialEq for RestResult {
    fn eq(&self, other: &Self) -> bool {
        self.signature() == other.signature()
    }
}

impl Eq for RestResult {}

impl std::hash::Hash for RestResult {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.signature().hash(state);
    }
}

/// One criterion of the result ordering.
///
/// Tier keys rank more units first; [`SortKey::TotalUnits`] ranks fewer units
/// first, so leaner outcomes come before sprawling ones.
///
/// Serialized with the same spellings the command line accepts, so profiles
/// and JSON input read `"tier5"` or `"total"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortKey {
    Tier5,
    Tier4,
    Tier3,
    Tier2,
    Tier1,
    TotalUnits,
}

impl SortKey {
    /// Highest tiers first, then the leanest total, then the low tiers.
    pub const DEFAULT_ORDER: [SortKey; 6] = [
        SortKey::Tier5,
        SortKey::Tier4,
        SortKey::Tier3,
        SortKey::TotalUnits,
        SortKey::Tier2,
        SortKey::Tier1,
    ];
}

impl FromStr for SortKey {
    type Err = CoffeeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "5" | "l5" | "tier5" | "level5" => Ok(SortKey::Tier5),
            "4" | "l4" | "tier4" | "level4" => Ok(SortKey::Tier4),
            "3" | "l3" | "tier3" | "level3" => Ok(SortKey::Tier3),
            "2" | "l2" | "tier2" | "level2" => Ok(SortKey::Tier2),
            "1" | "l1" | "tier1" | "level1" => Ok(SortKey::Tier1),
            "total" | "total_units" | "totalunits" => Ok(SortKey::TotalUnits),
            other => Err(CoffeeError::UnknownSortKey(other.to_string())),
        }
    }
}

impl TryFrom<String> for SortKey {
    type Error = CoffeeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Tier5 => "tier5",
            SortKey::Tier4 => "tier4",
            SortKey::Tier3 => "tier3",
            SortKey::Tier2 => "tier2",
            SortKey::Tier1 => "tier1",
            SortKey::TotalUnits => "total",
        };
        f.write_str(name)
    }
}

/// Everything the search needs to know about one rest.
///
/// Front ends validate with [`RestParams::validate`]; the search itself
/// assumes the values are consistent.
///
/// # Example
///
/// ```
/// use coffeebreak::models::RestParams;
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
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestParams {
    /// Pact slots at full recovery
    pub slots_total: u32,
    /// Pact slots available when the rest begins
    pub slots_current: u32,
    /// Spell level of the pact slots (points gained per converted slot)
    pub slot_tier: u32,
    /// Sorcery point maximum
    pub points_total: u32,
    /// Sorcery points available when the rest begins
    pub points_current: u32,
    /// Whether the rod can be used this rest
    pub rod_available: bool,
    /// Whether the vial can be used this rest
    pub vial_available: bool,
    /// Length of the rest in hours
    pub sleep_hours: u32,
    /// Sorcery points that must remain when the rest ends
    pub minimum_points: u32,
    /// Pact slots that must remain when the rest ends
    pub minimum_slots: u32,
}

impl RestParams {
    /// Builds parameters from a character's derived stats.
    #[allow(clippy::too_many_arguments)]
    pub fn for_character(
        stats: &CharacterStats,
        slots_current: u32,
        points_current: u32,
        rod_available: bool,
        vial_available: bool,
        sleep_hours: u32,
        minimum_points: u32,
        minimum_slots: u32,
    ) -> Self {
        RestParams {
            slots_total: stats.slots_total,
            slots_current,
            slot_tier: stats.slot_tier,
            points_total: stats.points_total,
            points_current,
            rod_available,
            vial_available,
            sleep_hours,
            minimum_points,
            minimum_slots,
        }
    }

    /// Checks that current amounts and reserves fit inside their pools.
    pub fn validate(&self) -> Result<()> {
        if self.slots_current > self.slots_total {
            return Err(CoffeeError::InvalidInput(format!(
                "current pact slots ({}) exceed the total ({})",
                self.slots_current, self.slots_total
            )));
        }
        if self.points_current > self.points_total {
            return Err(CoffeeError::InvalidInput(format!(
                "current sorcery points ({}) exceed the total ({})",
                self.points_current, self.points_total
            )));
        }
        if self.minimum_slots > self.slots_total {
            return Err(CoffeeError::InvalidInput(format!(
                "minimum pact slots ({}) exceed the total ({})",
                self.minimum_slots, self.slots_total
            )));
        }
        if self.minimum_points > self.points_total {
            return Err(CoffeeError::InvalidInput(format!(
                "minimum sorcery points ({}) exceed the total ({})",
                self.minimum_points, self.points_total
            )));
        }
        Ok(())
    }
}

/// A multiclass character described by its two class levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub warlock_level: u32,
    pub sorcerer_level: u32,
}

/// Resource pools derived from a character's levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    /// Number of pact slots
    pub slots_total: u32,
    /// Spell level of the pact slots
    pub slot_tier: u32,
    /// Sorcery point maximum
    pub points_total: u32,
}

// ============================================================================
// CSV Row Structures
// ============================================================================

/// CSV row of the warlock level table.
#[derive(Debug, Clone, Deserialize)]
pub struct WarlockRow {
    /// Warlock class level
    pub level: u32,
    /// Number of pact slots at this level
    pub pact_slots: u32,
    /// Spell level of those slots
    pub slot_level: u32,
}

/// CSV row of the sorcerer level table.
#[derive(Debug, Clone, Deserialize)]
pub struct SorcererRow {
    /// Sorcerer class level
    pub level: u32,
    /// Sorcery point maximum at this level
    pub sorcery_points: u32,
}
