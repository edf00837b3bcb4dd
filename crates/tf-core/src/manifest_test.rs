use super::*;
use tempfile::tempdir;

fn entry(name: &str, rows: usize) -> ManifestEntry {
    ManifestEntry {
        batch_name: name.to_string(),
        rows_in_batch: rows,
        raw_path: format!("data/bronze/raw_{}", name),
        checksum: "abc123".to_string(),
        commit_id: String::new(),
        recorded_at: Utc::now(),
    }
}

#[test]
fn test_ensure_writes_header_only_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bronze").join("manifest.csv");

    Manifest::ensure(&path).unwrap();
    Manifest::ensure(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "batch_name,rows_in_batch,raw_path,checksum,commit_id,recorded_at\n"
    );
}

#[test]
fn test_append_preserves_arrival_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manifest.csv");

    for (i, name) in ["batch_01.csv", "batch_02.csv", "batch_03.csv"]
        .iter()
        .enumerate()
    {
        Manifest::append(&path, &entry(name, i + 10)).unwrap();
    }

    let entries = Manifest::load(&path).unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.batch_name.as_str()).collect();
    assert_eq!(names, vec!["batch_01.csv", "batch_02.csv", "batch_03.csv"]);
    assert_eq!(entries[2].rows_in_batch, 12);
    assert_eq!(entries[0].checksum, "abc123");
    assert!(entries[0].commit_id.is_empty());
}

#[test]
fn test_append_never_rewrites_existing_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manifest.csv");

    Manifest::append(&path, &entry("batch_01.csv", 1)).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();
    Manifest::append(&path, &entry("batch_02.csv", 2)).unwrap();
    let after = std::fs::read_to_string(&path).unwrap();

    assert!(after.starts_with(&before));
}

#[test]
fn test_load_missing_manifest_is_empty() {
    let dir = tempdir().unwrap();
    assert!(Manifest::load(&dir.path().join("none.csv"))
        .unwrap()
        .is_empty());
}
