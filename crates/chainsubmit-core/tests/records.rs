//! Fixture tests: CSV file → records → prepared contract arguments.

use chainsubmit_core::{load_records_from_path, partition, prepare_item, BatchSize};

fn fixture_path(name: &str) -> std::path::PathBuf {
    let mut p = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests/fixtures");
    p.push(name);
    p
}

#[test]
fn fixture_rows_prepare_into_sha256_digests() {
    let set = load_records_from_path(fixture_path("records.csv")).expect("fixture must load");
    assert_eq!(set.len(), 2);
    assert_eq!(set.dropped, 1);

    let batches = partition(set.data_items(), BatchSize::new(1));
    assert_eq!(batches.len(), 2);

    let first = prepare_item(&batches[0].items[0]).unwrap();
    let second = prepare_item(&batches[1].items[0]).unwrap();

    // Same CIDs in rotated columns; the leading '.' on row 3 is tolerated.
    assert_eq!(first.property_hash, second.property_hash);
    assert_eq!(first.data_group_hash, second.data_hash);
    assert_eq!(
        hex::encode(first.data_hash),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_records_from_path(fixture_path("does-not-exist.csv")).unwrap_err();
    assert!(err.to_string().starts_with("IO error"), "{err}");
}
