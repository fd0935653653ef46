//! Display and formatting utilities for coffeebreak.
//!
//! This module turns results and their action trails into readable text for
//! the command line.

use std::time::Duration;

use crate::constants::Tier;
use crate::models::{Action, ActionKind, RestResult, UnitCounts};

/// Formats a duration as a short human-readable string.
///
/// # Example
///
/// ```
/// use coffeebreak::display::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Describes one recorded action.
///
/// # Example
///
/// ```
/// use coffeebreak::constants::Tier;
/// use coffeebreak::display::describe_action;
/// use coffeebreak::models::{Action, ActionKind};
///
/// let action = Action::new(ActionKind::CreateUnit(Tier::Three), 2, 0, -5);
/// assert_eq!(
///     describe_action(&action),
///     "Hour 2: created a level 3 spell slot for 5 sorcery point(s)"
/// );
/// ```
pub fn describe_action(action: &Action) -> String {
    let hour = action.hour;
    match action.kind {
        ActionKind::StartRest => "Start of rest".to_string(),
        ActionKind::ConvertSlotToPoints => format!(
            "Hour {}: converted 1 pact slot into {} sorcery point(s)",
            hour, action.points_changed
        ),
        ActionKind::CreateUnit(tier) => format!(
            "Hour {}: created a level {} spell slot for {} sorcery point(s)",
            hour,
            tier.level(),
            -action.points_changed
        ),
        ActionKind::UseRod => format!(
            "Hour {}: used the rod to recover {} pact slot(s)",
            hour, action.slots_changed
        ),
        ActionKind::UseVial => format!(
            "Hour {}: used the vial to recover {} sorcery point(s)",
            hour, action.points_changed
        ),
        ActionKind::RestoreSlots => format!(
            "Hour {}: {} pact slot(s) recovered",
            hour, action.slots_changed
        ),
        ActionKind::EndOfRestConversion => format!(
            "End of rest: converted {} pact slot(s) into {} sorcery point(s)",
            -action.slots_changed, action.points_changed
        ),
    }
}

/// Lists the non-zero tiers of a tally, highest first.
///
/// # Example
///
/// ```
/// use coffeebreak::display::format_units;
/// use coffeebreak::models::UnitCounts;
///
/// assert_eq!(format_units(&UnitCounts::new(2, 0, 1, 0, 0)), "L3 x1, L1 x2");
/// assert_eq!(format_units(&UnitCounts::default()), "none");
/// ```
pub fn format_units(units: &UnitCounts) -> String {
    let parts: Vec<String> = Tier::DESCENDING
        .iter()
        .filter(|&&tier| units.get(tier) > 0)
        .map(|&tier| format!("L{} x{}", tier.level(), units.get(tier)))
        .collect();

    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

/// Formats one result, optionally followed by its derivation.
pub fn format_result(index: usize, result: &RestResult, with_actions: bool) -> String {
    let mut out = format!(
        "Option {}: {} (total {}) | {} sorcery point(s), {} pact slot(s) left",
        index,
        format_units(&result.units),
        result.total_units(),
        result.remaining_points,
        result.remaining_slots
    );
    if with_actions {
        for action in result.actions() {
            out.push_str("\n    ");
            out.push_str(&describe_action(&action));
        }
    }
    out
}

/// Prints the top `limit` results to stdout.
///
/// # Arguments
///
/// * `results` - Results, already reduced and sorted
/// * `found` - How many raw results the search produced
/// * `elapsed` - Time the search took
/// * `limit` - Maximum number of results to print
/// * `with_actions` - Whether to print each result's action trail
pub fn display_results(
    results: &[RestResult],
    found: usize,
    elapsed: Duration,
    limit: usize,
    with_actions: bool,
) {
    println!();
    println!("+================================================================+");
    println!("|                 COFFEE BREAK REST COMBINATIONS                 |");
    println!("+================================================================+");
    println!();
    println!(
        "Found {} combination(s) in {}, {} after reduction.",
        found,
        format_duration(elapsed),
        results.len()
    );
    println!("----------------------------------------------------------------");

    for (i, result) in results.iter().take(limit).enumerate() {
        println!("{}", format_result(i + 1, result, with_actions));
        if with_actions {
            println!();
        }
    }

    if results.len() > limit {
        println!("... {} more (use --show to see more)", results.len() - limit);
    }
    println!();
}
