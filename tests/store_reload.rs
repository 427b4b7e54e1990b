use extapi::schema::{self, LoadError};
use extapi::store::ApiStore;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn write_fixture_copy(dir: &TempDir) -> PathBuf {
    let target = dir.path().join("extension_api.json");
    std::fs::copy(fixture_path("mini_api.json"), &target).unwrap();
    target
}

#[test]
fn missing_document_is_not_found() {
    let err = schema::load_document(Path::new("/nonexistent/extension_api.json")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
}

#[test]
fn undecodable_documents_are_malformed() {
    let dir = TempDir::new().unwrap();
    let junk = dir.path().join("junk.json");
    std::fs::write(&junk, "{not json").unwrap();
    assert!(matches!(
        schema::load_document(&junk).unwrap_err(),
        LoadError::Malformed(_)
    ));

    // present and valid JSON, but not record-shaped
    let array = dir.path().join("array.json");
    std::fs::write(&array, "[1, 2, 3]").unwrap();
    assert!(matches!(
        schema::load_document(&array).unwrap_err(),
        LoadError::Malformed(_)
    ));
}

#[test]
fn missing_optional_collections_are_tolerated() {
    let dir = TempDir::new().unwrap();
    let sparse = dir.path().join("sparse.json");
    std::fs::write(&sparse, "{}").unwrap();
    let doc = schema::load_document(&sparse).unwrap();
    assert_eq!(doc.version_string(), "unknown");
    assert!(doc.classes.is_empty());

    let store = ApiStore::open(&sparse).unwrap();
    let api = store.snapshot();
    assert_eq!(api.info().classes, 0);
    assert!(api.route("layout de Color").action() == "help");
}

#[test]
fn version_falls_back_to_legacy_fields() {
    let dir = TempDir::new().unwrap();
    let legacy = dir.path().join("legacy.json");
    std::fs::write(&legacy, r#"{"version": {"string": "4.1.legacy"}}"#).unwrap();
    let doc = schema::load_document(&legacy).unwrap();
    assert_eq!(doc.version_string(), "4.1.legacy");
}

#[test]
fn reload_swaps_snapshots_atomically() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture_copy(&dir);
    let store = ApiStore::open(&path).unwrap();

    let before = store.snapshot();
    assert_eq!(before.info().classes, 3);

    // rewrite the document with a different catalog
    std::fs::write(
        &path,
        r#"{"header": {"version_full_name": "v2"}, "classes": [{"name": "Only"}]}"#,
    )
    .unwrap();
    store.reload().unwrap();

    let after = store.snapshot();
    assert_eq!(after.version(), "v2");
    assert_eq!(after.info().classes, 1);

    // the old snapshot is untouched by the swap
    assert_eq!(before.info().classes, 3);
    assert_eq!(before.version(), "Test Engine v4.4.test.custom_build");
}

#[test]
fn maybe_reload_is_gated_on_mtime() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture_copy(&dir);
    let store = ApiStore::open(&path).unwrap();

    // unchanged document: no rebuild
    assert!(!store.maybe_reload().unwrap());

    // push the mtime forward explicitly; coarse clocks would otherwise
    // make this race against the copy above
    std::fs::write(&path, r#"{"header": {"version_full_name": "v3"}}"#).unwrap();
    let future = SystemTime::now() + Duration::from_secs(5);
    let file = std::fs::File::options().append(true).open(&path).unwrap();
    file.set_modified(future).unwrap();
    drop(file);

    assert!(store.maybe_reload().unwrap());
    assert_eq!(store.snapshot().version(), "v3");
    assert!(!store.maybe_reload().unwrap());
}

#[test]
fn failed_reload_keeps_the_previous_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture_copy(&dir);
    let store = ApiStore::open(&path).unwrap();

    std::fs::write(&path, "{broken").unwrap();
    assert!(matches!(store.reload(), Err(LoadError::Malformed(_))));
    assert_eq!(store.snapshot().info().classes, 3);

    std::fs::remove_file(&path).unwrap();
    assert!(matches!(store.maybe_reload(), Err(LoadError::NotFound(_))));
    assert_eq!(store.snapshot().info().classes, 3);
}
