use super::*;

fn silver() -> Table {
    Table::from_reader(
        "id,feature_num,feature_cat,target,timestamp
1,10,B,0,2024-01-01T00:00:00
2,20,A,1,2024-01-06 00:01:00
3,30,C,1,2024-01-07 00:02:00
"
        .as_bytes(),
    )
    .unwrap()
}

#[test]
fn test_derived_columns_are_appended() {
    let out = transform_table(&silver()).unwrap();
    assert_eq!(out.len(), 3);
    for col in ["day_of_week", "feature_cat_code", "feature_num_scaled"] {
        assert!(out.has_column(col), "missing {}", col);
    }
}

#[test]
fn test_timestamp_is_canonicalized() {
    let out = transform_table(&silver()).unwrap();
    assert_eq!(out.column("timestamp").unwrap()[0], "2024-01-01 00:00:00");
}

#[test]
fn test_day_of_week_starts_monday() {
    // 2024-01-01 is a Monday
    let out = transform_table(&silver()).unwrap();
    assert_eq!(out.column("day_of_week").unwrap(), vec!["0", "5", "6"]);
}

#[test]
fn test_category_codes_follow_sorted_order() {
    let out = transform_table(&silver()).unwrap();
    assert_eq!(out.column("feature_cat_code").unwrap(), vec!["1", "0", "2"]);
}

#[test]
fn test_min_max_scaling() {
    let out = transform_table(&silver()).unwrap();
    assert_eq!(
        out.column("feature_num_scaled").unwrap(),
        vec!["0", "0.5", "1"]
    );
}

#[test]
fn test_constant_feature_scales_to_zero() {
    let table = Table::from_reader(
        "id,feature_num,feature_cat,target,timestamp\n1,5,A,0,2024-01-01 00:00:00\n2,5,A,1,2024-01-01 00:01:00\n"
            .as_bytes(),
    )
    .unwrap();
    let out = transform_table(&table).unwrap();
    assert_eq!(out.column("feature_num_scaled").unwrap(), vec!["0", "0"]);
}

#[test]
fn test_unparseable_timestamp_and_null_category() {
    let table = Table::from_reader(
        "id,feature_num,feature_cat,target,timestamp\n1,5,,0,garbage\n".as_bytes(),
    )
    .unwrap();
    let out = transform_table(&table).unwrap();
    assert_eq!(out.column("day_of_week").unwrap(), vec!["-1"]);
    assert_eq!(out.column("feature_cat_code").unwrap(), vec!["-1"]);
    assert_eq!(out.column("timestamp").unwrap(), vec!["garbage"]);
}

#[test]
fn test_empty_table_transforms() {
    let table = Table::new(
        ["id", "feature_num", "feature_cat", "target", "timestamp"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
    );
    let out = transform_table(&table).unwrap();
    assert!(out.is_empty());
    assert_eq!(out.headers().len(), 8);
}
