//! Error types shared by the library and its front ends.

use thiserror::Error;

/// Everything that can go wrong outside the search itself.
///
/// The search never fails: an impossible rest simply yields no results.
#[derive(Debug, Error)]
pub enum CoffeeError {
    /// A unit tier outside 1..=5 was requested.
    #[error("invalid spell slot tier: {0} (expected 1-5)")]
    InvalidTier(u32),

    /// A class level that the level tables do not cover.
    #[error("no {class} level table entry for level {level}")]
    UnknownLevel { class: &'static str, level: u32 },

    /// Rest parameters that break a documented precondition.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoffeeError>;
