//! The fixed conversion table.
//!
//! Every rule the search knows about lives here: what a universal spell slot
//! of each tier costs in sorcery points, what one pact slot is worth, and what
//! the two once-per-rest recovery items give back.

use serde::{Deserialize, Serialize};

use crate::error::{CoffeeError, Result};

/// Sorcery point cost of a universal spell slot, indexed by `tier - 1`.
pub const UNIT_COSTS: [u32; 5] = [2, 3, 5, 6, 7];

/// Pact slots restored by the rod.
pub const ROD_SLOT_GAIN: u32 = 1;

/// Sorcery points restored by the vial.
pub const VIAL_POINT_GAIN: u32 = 5;

/// Tier (spell level) of a universal spell slot.
///
/// Using an enum rather than a bare integer means the search can never ask
/// for the cost of a tier that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl Tier {
    /// All tiers, most expensive first. Both the search and the greedy
    /// end-of-rest conversion walk tiers in this order.
    pub const DESCENDING: [Tier; 5] = [Tier::Five, Tier::Four, Tier::Three, Tier::Two, Tier::One];

    /// Spell level of this tier (1-5).
    pub fn level(self) -> u32 {
        self as u32
    }

    /// Zero-based index into per-tier arrays.
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Sorcery points needed to create one slot of this tier.
    ///
    /// ```
    /// use coffeebreak::constants::Tier;
    ///
    /// assert_eq!(Tier::One.cost(), 2);
    /// assert_eq!(Tier::Five.cost(), 7);
    /// ```
    pub fn cost(self) -> u32 {
        UNIT_COSTS[self.index()]
    }
}

impl TryFrom<u32> for Tier {
    type Error = CoffeeError;

    fn try_from(level: u32) -> Result<Self> {
        match level {
            1 => Ok(Tier::One),
            2 => Ok(Tier::Two),
            3 => Ok(Tier::Three),
            4 => Ok(Tier::Four),
            5 => Ok(Tier::Five),
            other => Err(CoffeeError::InvalidTier(other)),
        }
    }
}

/// Looks up the point cost of a tier given as a raw spell level.
///
/// # Errors
///
/// Returns [`CoffeeError::InvalidTier`] for anything outside 1..=5.
pub fn unit_cost(level: u32) -> Result<u32> {
    Tier::try_from(level).map(Tier::cost)
}

/// Sorcery points gained by converting one pact slot of the given slot level.
pub fn slot_point_value(slot_tier: u32) -> u32 {
    slot_tier
}

/// Cost of the cheapest unit; the threshold every feasibility check compares against.
pub fn cheapest_unit_cost() -> u32 {
    Tier::One.cost()
}
