use super::*;
use tempfile::tempdir;

fn sample() -> Table {
    Table::from_reader("id,name\n1,a\n2,b\n3,c\n".as_bytes()).unwrap()
}

#[test]
fn test_from_reader_parses_header_and_rows() {
    let table = sample();
    assert_eq!(table.headers(), &["id".to_string(), "name".to_string()]);
    assert_eq!(table.len(), 3);
    assert_eq!(table.column("name").unwrap(), vec!["a", "b", "c"]);
}

#[test]
fn test_short_rows_are_padded() {
    let table = Table::from_reader("a,b,c\n1,2\n".as_bytes()).unwrap();
    assert_eq!(table.rows()[0], vec!["1", "2", ""]);
}

#[test]
fn test_missing_column_is_schema_error() {
    let err = sample().require_column("target").unwrap_err();
    assert!(err.is_schema_error());
    assert!(err.to_string().contains("target"));
}

#[test]
fn test_null_tokens() {
    assert!(is_null(""));
    assert!(is_null("  "));
    assert!(is_null("NaN"));
    assert!(is_null("null"));
    assert!(!is_null("0"));
    assert!(!is_null("A"));
}

#[test]
fn test_parse_number() {
    assert_eq!(parse_number(" 12.5 "), Some(12.5));
    assert_eq!(parse_number("1e3"), Some(1000.0));
    assert_eq!(parse_number("abc"), None);
    assert_eq!(parse_number("NaN"), None);
    assert_eq!(parse_number(""), None);
}

#[test]
fn test_partition_by_mask() {
    let (kept, dropped) = sample().partition(&[true, false, true]);
    assert_eq!(kept.column("id").unwrap(), vec!["1", "3"]);
    assert_eq!(dropped.column("id").unwrap(), vec!["2"]);
    assert_eq!(kept.headers(), dropped.headers());
}

#[test]
fn test_project_keeps_only_present_columns_in_order() {
    let projected = sample().project(&["name", "missing", "id"]);
    assert_eq!(projected.headers(), &["name".to_string(), "id".to_string()]);
    assert_eq!(projected.rows()[0], vec!["a", "1"]);
}

#[test]
fn test_set_column_appends_and_replaces() {
    let mut table = sample();
    table.set_column("flag", vec!["x".into(), "y".into(), "z".into()]);
    assert_eq!(table.column("flag").unwrap(), vec!["x", "y", "z"]);
    table.set_column("name", vec!["q".into(), "r".into(), "s".into()]);
    assert_eq!(table.column("name").unwrap(), vec!["q", "r", "s"]);
    assert_eq!(table.headers().len(), 3);
}

#[test]
fn test_write_then_read_preserves_quoted_cells() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("t.csv");
    let mut table = Table::new(vec!["id".into(), "note".into()]);
    table.push_row(vec!["1".into(), "has, comma".into()]);
    table.write_csv(&path).unwrap();
    let read = Table::read_csv(&path).unwrap();
    assert_eq!(read, table);
}

#[test]
fn test_append_creates_file_with_header_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("master.csv");

    sample().append_csv(&path).unwrap();
    sample().append_csv(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("id,name").count(), 1);
    assert_eq!(Table::read_csv(&path).unwrap().len(), 6);
}

#[test]
fn test_append_aligns_to_existing_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("master.csv");
    std::fs::write(&path, "id,name\n1,a\n").unwrap();

    let reordered = Table::from_reader("name,extra,id\nb,zzz,2\n".as_bytes()).unwrap();
    assert_eq!(reordered.append_csv(&path).unwrap(), 1);

    let master = Table::read_csv(&path).unwrap();
    assert_eq!(master.headers(), &["id".to_string(), "name".to_string()]);
    assert_eq!(master.rows()[1], vec!["2", "b"]);
}

#[test]
fn test_read_header_of_missing_or_empty_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    assert_eq!(read_header(&path).unwrap(), None);
    std::fs::write(&path, "").unwrap();
    assert_eq!(read_header(&path).unwrap(), None);
}

#[test]
fn test_count_data_lines_excludes_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lines.csv");
    std::fs::write(&path, "a,b\n1,2\n3,4\n").unwrap();
    assert_eq!(count_data_lines(&path).unwrap(), 2);
}
