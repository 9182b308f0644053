use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tempfile::TempDir;
use treesync_fs::{ConfigStore, Error, NormalizedPath};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Sample {
    name: String,
    sizes: BTreeMap<String, u64>,
}

fn sample() -> Sample {
    let mut sizes = BTreeMap::new();
    sizes.insert("a.txt".to_string(), 5);
    sizes.insert("sub/b.txt".to_string(), 12);
    Sample {
        name: "demo".to_string(),
        sizes,
    }
}

#[test]
fn test_json_save_then_load() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("data.json"));
    let store = ConfigStore::new();

    store.save(&path, &sample()).unwrap();
    let loaded: Sample = store.load(&path).unwrap();

    assert_eq!(loaded, sample());
}

#[test]
fn test_toml_save_then_load() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("data.toml"));
    let store = ConfigStore::new();

    store.save(&path, &sample()).unwrap();
    let loaded: Sample = store.load(&path).unwrap();

    assert_eq!(loaded, sample());
}

#[test]
fn test_load_optional_missing() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("absent.json"));
    let loaded: Option<Sample> = ConfigStore::new().load_optional(&path).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_invalid_json_reports_parse_error() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("broken.json");
    std::fs::write(&file, "{ not json").unwrap();

    let result: Result<Sample, _> = ConfigStore::new().load(&NormalizedPath::new(&file));
    assert!(matches!(result, Err(Error::ConfigParse { .. })));
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("data.ini"));
    let result = ConfigStore::new().save(&path, &sample());
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}
