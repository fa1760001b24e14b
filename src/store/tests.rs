// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde_json::json;
use tempfile::TempDir;

use super::*;

fn exercise(store: &mut dyn Store) {
    assert_eq!(store.get("telescopeForm").unwrap(), None);
    assert!(!store.contains("telescopeForm").unwrap());

    store
        .set("telescopeForm", json!({"fwhm": "0.15"}))
        .unwrap();
    store.set("telescopeParams", json!({"a": [1, 2]})).unwrap();
    assert_eq!(
        store.get("telescopeForm").unwrap(),
        Some(json!({"fwhm": "0.15"}))
    );
    assert!(store.contains("telescopeParams").unwrap());

    store.remove("telescopeForm").unwrap();
    assert_eq!(store.get("telescopeForm").unwrap(), None);
    // Removing twice is fine.
    store.remove("telescopeForm").unwrap();

    store.clear().unwrap();
    assert_eq!(store.get("telescopeParams").unwrap(), None);
}

#[test]
fn test_memory_store() {
    exercise(&mut MemoryStore::new());
}

#[test]
fn test_file_store() {
    let tmp = TempDir::new().expect("couldn't make tmp dir");
    let mut store = JsonFileStore::open(tmp.path().join("session.json")).unwrap();
    exercise(&mut store);
}

#[test]
fn test_file_store_persists_across_opens() {
    let tmp = TempDir::new().expect("couldn't make tmp dir");
    let path = tmp.path().join("nested").join("session.json");
    {
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("sourceForm", json!({"redshift": "0"})).unwrap();
        store.set("etcCoordinator", json!({"a": 1})).unwrap();
        store.remove("etcCoordinator").unwrap();
    }
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(
        store.get("sourceForm").unwrap(),
        Some(json!({"redshift": "0"}))
    );
    assert_eq!(store.get("etcCoordinator").unwrap(), None);
}

#[test]
fn test_corrupt_file_store() {
    let tmp = TempDir::new().expect("couldn't make tmp dir");
    let path = tmp.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();
    let result = JsonFileStore::open(&path);
    assert!(matches!(result, Err(StoreError::Corrupt { .. })));
}

#[test]
fn test_typed_load_and_save() {
    let mut store = MemoryStore::new();
    save(&mut store, "counts", &vec![1_u32, 2, 3]).unwrap();
    let counts: Option<Vec<u32>> = load(&store, "counts").unwrap();
    assert_eq!(counts, Some(vec![1, 2, 3]));

    let missing: Option<Vec<u32>> = load(&store, "nothing").unwrap();
    assert!(missing.is_none());

    store.set("counts", json!("not a list")).unwrap();
    let result: Result<Option<Vec<u32>>, _> = load(&store, "counts");
    assert!(matches!(result, Err(StoreError::Decode { .. })));
}

#[test]
fn test_stores_in_a_directory() {
    let tmp = TempDir::new().expect("couldn't make tmp dir");
    {
        let mut stores = Stores::open_dir(tmp.path()).unwrap();
        stores
            .get_mut(StoreKind::Durable)
            .set("transitParams", json!({"light_curve": []}))
            .unwrap();
        stores
            .get_mut(StoreKind::Session)
            .set("transitForm", json!({}))
            .unwrap();
    }
    assert!(tmp.path().join("durable.json").exists());
    assert!(tmp.path().join("session.json").exists());

    let stores = Stores::open_dir(tmp.path()).unwrap();
    assert!(stores
        .get(StoreKind::Durable)
        .contains("transitParams")
        .unwrap());
    assert!(!stores
        .get(StoreKind::Session)
        .contains("transitParams")
        .unwrap());
}
