//! WebAssembly bindings for coffeebreak.
//!
//! This module provides JavaScript-accessible functions that take and return
//! JSON strings.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::data::LevelTables;
use crate::display::{describe_action, format_units};
use crate::models::{Character, CharacterStats, RestParams, RestResult, SortKey};
use crate::reducer::reduce;
use crate::search::{distinct_outcomes, run_search};

/// JavaScript-friendly rest input.
///
/// Either both class levels or all three explicit stats must be present.
/// Explicit stats override the values looked up from the levels one by one.
#[derive(Debug, Clone, Deserialize)]
pub struct JsRestInput {
    #[serde(default)]
    pub warlock_level: Option<u32>,
    #[serde(default)]
    pub sorcerer_level: Option<u32>,
    #[serde(default)]
    pub slots_total: Option<u32>,
    #[serde(default)]
    pub slot_tier: Option<u32>,
    #[serde(default)]
    pub points_total: Option<u32>,
    pub slots_current: u32,
    pub points_current: u32,
    #[serde(default)]
    pub rod: bool,
    #[serde(default)]
    pub vial: bool,
    pub hours: u32,
    #[serde(default)]
    pub minimum_points: u32,
    #[serde(default)]
    pub minimum_slots: u32,
    #[serde(default = "default_optimal_only")]
    pub optimal_only: bool,
    #[serde(default)]
    pub sort: Option<Vec<SortKey>>,
    #[serde(default)]
    pub limit: Option<usize>,
}

fn default_optimal_only() -> bool {
    true
}

/// JavaScript-friendly result.
#[derive(Debug, Clone, Serialize)]
pub struct JsRestResult {
    pub level1: u32,
    pub level2: u32,
    pub level3: u32,
    pub level4: u32,
    pub level5: u32,
    pub total: u32,
    pub summary: String,
    pub remaining_points: u32,
    pub remaining_slots: u32,
    pub actions: Vec<String>,
}

/// JavaScript-friendly calculation output.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsRestOutput {
    pub success: bool,
    pub error: Option<String>,
    pub raw_count: usize,
    pub unique_count: usize,
    pub shown_count: usize,
    pub elapsed_ms: f64,
    pub results: Vec<JsRestResult>,
}

impl From<&RestResult> for JsRestResult {
    fn from(result: &RestResult) -> Self {
        let [level1, level2, level3, level4, level5] = result.units.as_array();
        JsRestResult {
            level1,
            level2,
            level3,
            level4,
            level5,
            total: result.total_units(),
            summary: format_units(&result.units),
            remaining_points: result.remaining_points,
            remaining_slots: result.remaining_slots,
            actions: result.actions().iter().map(describe_action).collect(),
        }
    }
}

fn failure(message: String) -> String {
    serde_json::to_string(&JsRestOutput {
        success: false,
        error: Some(message),
        ..JsRestOutput::default()
    })
    .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn log(message: &str) {
    tracing::debug!("{}", message);
}

/// Table stats from the class levels, with any explicit field taking precedence.
fn resolve_stats(input: &JsRestInput) -> Result<CharacterStats, String> {
    let table_stats = match (input.warlock_level, input.sorcerer_level) {
        (Some(warlock_level), Some(sorcerer_level)) => {
            let tables = LevelTables::embedded().map_err(|e| e.to_string())?;
            let character = Character {
                warlock_level,
                sorcerer_level,
            };
            Some(character.stats(&tables).map_err(|e| e.to_string())?)
        }
        _ => None,
    };

    match (
        input.slots_total.or(table_stats.map(|s| s.slots_total)),
        input.slot_tier.or(table_stats.map(|s| s.slot_tier)),
        input.points_total.or(table_stats.map(|s| s.points_total)),
    ) {
        (Some(slots_total), Some(slot_tier), Some(points_total)) => Ok(CharacterStats {
            slots_total,
            slot_tier,
            points_total,
        }),
        _ => Err("Provide warlock_level and sorcerer_level, \
                  or all of slots_total, slot_tier and points_total."
            .to_string()),
    }
}

/// Calculates every rest outcome for the given input.
///
/// Takes a JSON string input and returns a JSON string result.
#[wasm_bindgen]
pub fn calculate_rest(input_json: &str) -> String {
    let input: JsRestInput = match serde_json::from_str(input_json) {
        Ok(i) => i,
        Err(e) => return failure(format!("Invalid input: {}", e)),
    };

    let stats = match resolve_stats(&input) {
        Ok(s) => s,
        Err(e) => return failure(e),
    };

    let params = RestParams::for_character(
        &stats,
        input.slots_current,
        input.points_current,
        input.rod,
        input.vial,
        input.hours,
        input.minimum_points,
        input.minimum_slots,
    );
    if let Err(e) = params.validate() {
        return failure(e.to_string());
    }

    let started = now_ms();
    let report = run_search(&params);
    let raw_count = report.results.len();
    let unique_count = distinct_outcomes(&report.results);
    let keys = input.sort.unwrap_or_else(|| SortKey::DEFAULT_ORDER.to_vec());
    let reduced = reduce(report.results, input.optimal_only, &keys);
    let elapsed_ms = now_ms() - started;

    log(&format!(
        "coffeebreak: {} states, {} results ({} unique) in {:.0}ms",
        report.stats.states_explored, raw_count, unique_count, elapsed_ms
    ));

    let limit = input.limit.unwrap_or(reduced.len());
    let results: Vec<JsRestResult> = reduced.iter().take(limit).map(JsRestResult::from).collect();

    serde_json::to_string(&JsRestOutput {
        success: true,
        error: None,
        raw_count,
        unique_count,
        shown_count: results.len(),
        elapsed_ms,
        results,
    })
    .unwrap_or_default()
}

/// Returns the pact slots, slot level and sorcery points of a character.
///
/// Input: `{"warlock_level": 5, "sorcerer_level": 7}`.
#[wasm_bindgen]
pub fn character_stats(input_json: &str) -> String {
    let character: Character = match serde_json::from_str(input_json) {
        Ok(c) => c,
        Err(e) => return failure(format!("Invalid input: {}", e)),
    };

    let stats = LevelTables::embedded().and_then(|tables| character.stats(&tables));
    match stats {
        Ok(stats) => serde_json::to_string(&stats).unwrap_or_default(),
        Err(e) => failure(e.to_string()),
    }
}

/// Get the version of the calculator.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
