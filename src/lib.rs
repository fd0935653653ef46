//! # Coffeebreak
//!
//! A command-line tool and library that explores every way a warlock/sorcerer
//! multiclass can turn a rest into universal spell slots.
//!
//! The character has two pools: pact slots, which come back every hour, and
//! sorcery points, which only grow when something is converted into them.
//! During a rest the character may:
//!
//! - Convert a pact slot into sorcery points
//! - Spend sorcery points on a spell slot of level 1 to 5
//! - Use a rod (once) to recover a pact slot
//! - Use a vial (once) to recover sorcery points
//!
//! At the end of the rest pact slots recover a final time and may be traded
//! in once more before leftover points are turned into slots greedily. The
//! search reports every distinct outcome that keeps the requested reserves.
//!
//! ## Modules
//!
//! - [`constants`] - The conversion table
//! - [`models`] - Rest parameters, results, actions and sort keys
//! - [`state`] - Timeline snapshots and their transitions
//! - [`search`] - Concurrent, memoized exploration of every timeline
//! - [`resolver`] - End-of-rest bonus conversion
//! - [`reducer`] - Deduplication, Pareto filtering and sorting
//! - [`data`] - Class level tables
//! - [`profile`] - Saved characters
//! - [`display`] - Output formatting
//!
//! ## Example Usage
//!
//! ```
//! use coffeebreak::{
//!     models::{RestParams, SortKey},
//!     reducer::reduce,
//!     search::calculate,
//! };
//!
//! let params = RestParams {
//!     slots_total: 2,
//!     slots_current: 0,
//!     slot_tier: 2,
//!     points_total: 5,
//!     points_current: 0,
//!     rod_available: true,
//!     vial_available: true,
//!     sleep_hours: 4,
//!     minimum_points: 5,
//!     minimum_slots: 2,
//! };
//!
//! let results = calculate(&params);
//! let best = reduce(results, true, &SortKey::DEFAULT_ORDER);
//! assert!(!best.is_empty());
//! ```

pub mod constants;
pub mod data;
pub mod display;
pub mod error;
pub mod models;
pub mod profile;
pub mod reducer;
pub mod resolver;
pub mod search;
pub mod state;
pub mod wasm;

pub use error::{CoffeeError, Result};
