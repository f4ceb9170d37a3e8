//! Tests for TypedStore
//!
//! These tests verify:
//! - Typed round trips with the JSON and bincode codecs
//! - Missing keys, shape mismatches and unencodable values
//! - Async typed calls match the blocking ones and share the lane ordering
//! - Typed reads through a read-only view

#[path = "../common/mod.rs"]
mod common;

use std::collections::{BTreeMap, HashMap};

use common::{setup_memory_store, setup_temp_store};
use larder::{BincodeCodec, ErrorKind, JsonCodec, StorageError, TypedStore};
use serde::{Deserialize, Serialize};

// =============================================================================
// Fixtures
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SaveGame {
    player: String,
    level: u32,
    health: f32,
    inventory: Vec<Item>,
    flags: HashMap<String, bool>,
    checkpoint: Option<(i32, i32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Item {
    Potion { strength: u8 },
    Key(String),
    Coin,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Settings {
    volume: u8,
    fullscreen: bool,
}

fn sample_save() -> SaveGame {
    let mut flags = HashMap::new();
    flags.insert("met_wizard".to_string(), true);
    flags.insert("opened_gate".to_string(), false);

    SaveGame {
        player: "Ada".to_string(),
        level: 7,
        health: 0.75,
        inventory: vec![
            Item::Potion { strength: 3 },
            Item::Key("crypt".to_string()),
            Item::Coin,
        ],
        flags,
        checkpoint: Some((-12, 40)),
    }
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn test_json_round_trip() {
    let (_temp, store) = setup_temp_store();
    let typed = TypedStore::new(store);
    let game = sample_save();

    typed.save(&game, "saves/slot1").unwrap();

    let loaded: SaveGame = typed.fetch("saves/slot1").unwrap();
    assert_eq!(loaded, game);
}

#[test]
fn test_json_bytes_are_plain_json() {
    let (_temp, store) = setup_temp_store();
    let typed = TypedStore::new(store.clone());

    typed.save(&Settings { volume: 80, fullscreen: true }, "settings").unwrap();

    let raw = store.fetch("settings").unwrap();
    assert_eq!(raw, br#"{"volume":80,"fullscreen":true}"#);
}

#[test]
fn test_pretty_json_round_trip() {
    let (_temp, store) = setup_temp_store();
    let typed = TypedStore::with_codec(store.clone(), JsonCodec::pretty());

    typed.save(&Settings { volume: 5, fullscreen: false }, "settings").unwrap();

    let raw = String::from_utf8(store.fetch("settings").unwrap()).unwrap();
    assert!(raw.contains('\n'));
    let loaded: Settings = typed.fetch("settings").unwrap();
    assert_eq!(loaded, Settings { volume: 5, fullscreen: false });
}

#[test]
fn test_bincode_round_trip() {
    let (_temp, store) = setup_temp_store();
    let typed = TypedStore::with_codec(store, BincodeCodec);
    let game = sample_save();

    typed.save(&game, "saves/slot1").unwrap();

    let loaded: SaveGame = typed.fetch("saves/slot1").unwrap();
    assert_eq!(loaded, game);
}

#[test]
fn test_unsized_values() {
    let (_temp, store) = setup_temp_store();
    let typed = TypedStore::new(store);

    typed.save("just a string", "note").unwrap();
    typed.save(&[1u32, 2, 3][..], "numbers").unwrap();

    assert_eq!(typed.fetch::<String>("note").unwrap(), "just a string");
    assert_eq!(typed.fetch::<Vec<u32>>("numbers").unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_overwrite_with_new_value() {
    let (_temp, store) = setup_temp_store();
    let typed = TypedStore::new(store);

    typed.save(&1u64, "counter").unwrap();
    typed.save(&2u64, "counter").unwrap();

    assert_eq!(typed.fetch::<u64>("counter").unwrap(), 2);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_fetch_missing_propagates_not_found() {
    let (_temp, store) = setup_temp_store();
    let typed = TypedStore::new(store);

    let err = typed.fetch::<Settings>("nope").unwrap_err();

    assert!(matches!(err, StorageError::NotFound(ref key) if key == "nope"));
}

#[test]
fn test_shape_mismatch_is_decode_failed() {
    let (_temp, store) = setup_temp_store();
    let typed = TypedStore::new(store);
    typed.save(&Settings { volume: 1, fullscreen: true }, "settings").unwrap();

    let err = typed.fetch::<SaveGame>("settings").unwrap_err();

    assert!(matches!(err, StorageError::DecodeFailed { ref key, .. } if key == "settings"));
}

#[test]
fn test_garbage_bytes_are_decode_failed() {
    let (_temp, store) = setup_temp_store();
    store.save("settings", b"\xff\x00not json").unwrap();
    let typed = TypedStore::new(store);

    assert_eq!(
        typed.fetch::<Settings>("settings").unwrap_err().kind(),
        ErrorKind::DecodeFailed
    );
}

#[test]
fn test_unencodable_value_is_encode_failed() {
    let (_temp, store) = setup_temp_store();
    let typed = TypedStore::new(store.clone());

    // JSON object keys must be strings
    let mut map = BTreeMap::new();
    map.insert(vec![1u8, 2], "value");

    let err = typed.save(&map, "map").unwrap_err();

    assert!(matches!(err, StorageError::EncodeFailed { ref key, .. } if key == "map"));
    assert!(!store.contains("map").unwrap());
}

#[test]
fn test_write_failure_propagates() {
    let (fs, store) = setup_memory_store();
    let typed = TypedStore::new(store);
    fs.set_read_only(true);

    let err = typed.save(&Settings { volume: 1, fullscreen: false }, "settings").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::WriteFailed);
}

// =============================================================================
// Async
// =============================================================================

#[test]
fn test_async_round_trip() {
    let (_temp, store) = setup_temp_store();
    let typed = TypedStore::new(store);
    let game = sample_save();

    typed.save_async(&game, "slot").wait().unwrap();

    let loaded: SaveGame = typed.fetch_async("slot").wait().unwrap();
    assert_eq!(loaded, game);
}

#[test]
fn test_async_error_parity() {
    let (_temp, store) = setup_temp_store();
    let typed = TypedStore::new(store.clone());
    store.save("garbage", b"{{{").unwrap();

    let mut map = BTreeMap::new();
    map.insert(vec![0u8], 0);

    assert_eq!(
        typed.save_async(&map, "map").wait().unwrap_err().kind(),
        typed.save(&map, "map").unwrap_err().kind()
    );
    assert_eq!(
        typed.fetch_async::<Settings>("nope").wait().unwrap_err().kind(),
        typed.fetch::<Settings>("nope").unwrap_err().kind()
    );
    assert_eq!(
        typed.fetch_async::<Settings>("garbage").wait().unwrap_err().kind(),
        ErrorKind::DecodeFailed
    );
}

#[test]
fn test_async_typed_and_raw_share_ordering() {
    let (_temp, store) = setup_temp_store();
    let typed = TypedStore::new(store.clone());

    let first = typed.save_async(&Settings { volume: 1, fullscreen: false }, "settings");
    let second = store.save_async("settings", br#"{"volume":2,"fullscreen":true}"#.to_vec());
    let read = typed.fetch_async::<Settings>("settings");

    first.wait().unwrap();
    second.wait().unwrap();
    assert_eq!(read.wait().unwrap(), Settings { volume: 2, fullscreen: true });
}

#[test]
fn test_async_bincode() {
    let (_fs, store) = setup_memory_store();
    let typed = TypedStore::with_codec(store, BincodeCodec);

    typed.save_async(&vec![Item::Coin, Item::Key("k".into())], "items").wait().unwrap();

    let items: Vec<Item> = typed.fetch_async("items").wait().unwrap();
    assert_eq!(items, vec![Item::Coin, Item::Key("k".into())]);
}

// =============================================================================
// Read-Only View
// =============================================================================

#[test]
fn test_typed_read_only_view() {
    let (_temp, store) = setup_temp_store();
    TypedStore::new(store.clone())
        .save(&Settings { volume: 9, fullscreen: true }, "settings")
        .unwrap();

    let reader = TypedStore::new(store.read_only());

    let loaded: Settings = reader.fetch("settings").unwrap();
    assert_eq!(loaded, Settings { volume: 9, fullscreen: true });
    assert!(reader.contains("settings").unwrap());
}
