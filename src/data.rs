//! Level tables for coffeebreak.
//!
//! A character's pact slots, pact slot level and sorcery point maximum come
//! from two small CSV tables, one per class. The tables ship under `data/`
//! and are embedded into the binary, but they can also be loaded from any
//! directory so house rules can override them.

use csv::ReaderBuilder;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CoffeeError, Result};
use crate::models::{Character, CharacterStats, SorcererRow, WarlockRow};

const WARLOCK_CSV: &str = include_str!("../data/warlock.csv");
const SORCERER_CSV: &str = include_str!("../data/sorcerer.csv");

/// Warlock and sorcerer progression, keyed by class level.
#[derive(Debug, Clone)]
pub struct LevelTables {
    warlock: BTreeMap<u32, WarlockRow>,
    sorcerer: BTreeMap<u32, SorcererRow>,
}

/// Reads warlock rows from CSV.
///
/// # CSV Format
///
/// Expected columns: `level, pact_slots, slot_level`
pub fn read_warlock_table<R: Read>(reader: R) -> Result<Vec<WarlockRow>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: WarlockRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Reads sorcerer rows from CSV.
///
/// # CSV Format
///
/// Expected columns: `level, sorcery_points`
pub fn read_sorcerer_table<R: Read>(reader: R) -> Result<Vec<SorcererRow>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: SorcererRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

impl LevelTables {
    pub fn new(warlock: Vec<WarlockRow>, sorcerer: Vec<SorcererRow>) -> Self {
        LevelTables {
            warlock: warlock.into_iter().map(|row| (row.level, row)).collect(),
            sorcerer: sorcerer.into_iter().map(|row| (row.level, row)).collect(),
        }
    }

    /// The tables compiled into the crate.
    ///
    /// ```
    /// use coffeebreak::data::LevelTables;
    ///
    /// let tables = LevelTables::embedded().unwrap();
    /// assert_eq!(tables.total_slots(5).unwrap(), 2);
    /// assert_eq!(tables.slot_tier(5).unwrap(), 3);
    /// assert_eq!(tables.total_points(7).unwrap(), 7);
    /// ```
    pub fn embedded() -> Result<Self> {
        Ok(Self::new(
            read_warlock_table(WARLOCK_CSV.as_bytes())?,
            read_sorcerer_table(SORCERER_CSV.as_bytes())?,
        ))
    }

    /// Loads `warlock.csv` and `sorcerer.csv` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let warlock = read_warlock_table(File::open(dir.join("warlock.csv"))?)?;
        let sorcerer = read_sorcerer_table(File::open(dir.join("sorcerer.csv"))?)?;
        Ok(Self::new(warlock, sorcerer))
    }

    fn warlock_row(&self, level: u32) -> Result<&WarlockRow> {
        self.warlock.get(&level).ok_or(CoffeeError::UnknownLevel {
            class: "warlock",
            level,
        })
    }

    /// Number of pact slots at a warlock level.
    pub fn total_slots(&self, warlock_level: u32) -> Result<u32> {
        self.warlock_row(warlock_level).map(|row| row.pact_slots)
    }

    /// Spell level of the pact slots at a warlock level.
    pub fn slot_tier(&self, warlock_level: u32) -> Result<u32> {
        self.warlock_row(warlock_level).map(|row| row.slot_level)
    }

    /// Sorcery point maximum at a sorcerer level.
    pub fn total_points(&self, sorcerer_level: u32) -> Result<u32> {
        self.sorcerer
            .get(&sorcerer_level)
            .map(|row| row.sorcery_points)
            .ok_or(CoffeeError::UnknownLevel {
                class: "sorcerer",
                level: sorcerer_level,
            })
    }

    /// Highest level covered for each class, as `(warlock, sorcerer)`.
    pub fn max_levels(&self) -> (u32, u32) {
        (
            self.warlock.keys().next_back().copied().unwrap_or(0),
            self.sorcerer.keys().next_back().copied().unwrap_or(0),
        )
    }
}

impl Character {
    /// Looks up this character's resource pools.
    ///
    /// Levels above the highest table entry use that entry.
    ///
    /// # Errors
    ///
    /// [`CoffeeError::UnknownLevel`] if either level is missing from the tables.
    pub fn stats(&self, tables: &LevelTables) -> Result<CharacterStats> {
        let (max_warlock, max_sorcerer) = tables.max_levels();
        let warlock_level = self.warlock_level.min(max_warlock);
        let sorcerer_level = self.sorcerer_level.min(max_sorcerer);
        Ok(CharacterStats {
            slots_total: tables.total_slots(warlock_level)?,
            slot_tier: tables.slot_tier(warlock_level)?,
            points_total: tables.total_points(sorcerer_level)?,
        })
    }
}
