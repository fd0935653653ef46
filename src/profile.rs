//! Saved characters.
//!
//! Profiles let a player store their class levels, the recovery items they
//! own and their preferred result ordering once, then reuse them for every
//! rest. The store is a single pretty-printed JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoffeeError, Result};
use crate::models::{Character, SortKey};

/// One saved character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub name: String,
    pub warlock_level: u32,
    pub sorcerer_level: u32,
    #[serde(default)]
    pub has_rod: bool,
    #[serde(default)]
    pub has_vial: bool,
    /// Preferred ordering of results; the default order when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<Vec<SortKey>>,
}

impl CharacterProfile {
    pub fn character(&self) -> Character {
        Character {
            warlock_level: self.warlock_level,
            sorcerer_level: self.sorcerer_level,
        }
    }

    pub fn sort_keys(&self) -> Vec<SortKey> {
        self.sort_order
            .clone()
            .unwrap_or_else(|| SortKey::DEFAULT_ORDER.to_vec())
    }
}

/// All saved characters plus the one used by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStore {
    #[serde(default)]
    pub characters: Vec<CharacterProfile>,
    /// Name of the active character
    #[serde(default)]
    pub active: Option<String>,
}

impl ProfileStore {
    /// Loads the store from `path`; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no profile store yet");
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Writes the store to `path` as indented JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        debug!(path = %path.display(), characters = self.characters.len(), "profile store saved");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CharacterProfile> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// Adds a character or replaces the one with the same name.
    pub fn upsert(&mut self, profile: CharacterProfile) {
        match self.characters.iter_mut().find(|c| c.name == profile.name) {
            Some(existing) => *existing = profile,
            None => self.characters.push(profile),
        }
    }

    /// Removes a character, clearing it as active if needed.
    pub fn remove(&mut self, name: &str) -> Option<CharacterProfile> {
        let position = self.characters.iter().position(|c| c.name == name)?;
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        Some(self.characters.remove(position))
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        if self.get(name).is_none() {
            return Err(CoffeeError::ProfileNotFound(name.to_string()));
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    pub fn active_profile(&self) -> Option<&CharacterProfile> {
        self.active.as_deref().and_then(|name| self.get(name))
    }
}
