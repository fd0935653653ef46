//! Tests for saved character profiles.

use coffeebreak::models::SortKey;
use coffeebreak::profile::{CharacterProfile, ProfileStore};
use coffeebreak::CoffeeError;

fn profile(name: &str, warlock_level: u32, sorcerer_level: u32) -> CharacterProfile {
    CharacterProfile {
        name: name.to_string(),
        warlock_level,
        sorcerer_level,
        has_rod: true,
        has_vial: false,
        sort_order: None,
    }
}

#[test]
fn test_missing_file_is_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::load(&dir.path().join("profiles.json")).unwrap();

    assert!(store.characters.is_empty());
    assert!(store.active_profile().is_none());
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.json");

    let mut store = ProfileStore::default();
    store.upsert(profile("Ilyra", 5, 7));
    store.upsert(CharacterProfile {
        sort_order: Some(vec![SortKey::TotalUnits, SortKey::Tier1]),
        ..profile("Voss", 3, 2)
    });
    store.set_active("Voss").unwrap();
    store.save(&path).unwrap();

    let loaded = ProfileStore::load(&path).unwrap();
    assert_eq!(loaded, store);
    assert_eq!(
        loaded.active_profile().unwrap().sort_keys(),
        vec![SortKey::TotalUnits, SortKey::Tier1]
    );
}

#[test]
fn test_upsert_replaces_by_name() {
    let mut store = ProfileStore::default();
    store.upsert(profile("Ilyra", 5, 7));
    store.upsert(profile("Ilyra", 6, 8));

    assert_eq!(store.characters.len(), 1);
    assert_eq!(store.get("Ilyra").unwrap().warlock_level, 6);
}

#[test]
fn test_set_active_requires_existing_profile() {
    let mut store = ProfileStore::default();

    assert!(matches!(
        store.set_active("Nobody"),
        Err(CoffeeError::ProfileNotFound(_))
    ));
}

#[test]
fn test_remove_clears_active() {
    let mut store = ProfileStore::default();
    store.upsert(profile("Ilyra", 5, 7));
    store.set_active("Ilyra").unwrap();

    let removed = store.remove("Ilyra").unwrap();
    assert_eq!(removed.name, "Ilyra");
    assert!(store.active.is_none());
    assert!(store.remove("Ilyra").is_none());
}

#[test]
fn test_defaults_for_missing_fields() {
    let json = r#"{"characters":[{"name":"Ilyra","warlock_level":5,"sorcerer_level":7}]}"#;
    let store: ProfileStore = serde_json::from_str(json).unwrap();
    let ilyra = store.get("Ilyra").unwrap();

    assert!(!ilyra.has_rod);
    assert!(!ilyra.has_vial);
    assert_eq!(ilyra.sort_keys(), SortKey::DEFAULT_ORDER.to_vec());
    assert_eq!(ilyra.character().sorcerer_level, 7);
}

#[test]
fn test_sort_order_saved_with_readable_keys() {
    let profile = CharacterProfile {
        sort_order: Some(vec![SortKey::Tier5, SortKey::TotalUnits]),
        ..profile("Voss", 3, 2)
    };
    let json = serde_json::to_string(&profile).unwrap();

    assert!(json.contains(r#""sort_order":["tier5","total"]"#));
}
