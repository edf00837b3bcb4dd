use super::*;
use std::collections::HashSet;

fn transformed(rows: usize) -> Table {
    let mut table = Table::new(
        [
            "id",
            "feature_num",
            "feature_cat",
            "target",
            "timestamp",
            "day_of_week",
            "feature_cat_code",
            "feature_num_scaled",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
    );
    for i in 0..rows {
        table.push_row(vec![
            (i + 1).to_string(),
            "50".into(),
            "A".into(),
            (i % 2).to_string(),
            "2024-01-01 00:00:00".into(),
            "0".into(),
            "0".into(),
            "0.5".into(),
        ]);
    }
    table
}

fn id_set(table: &Table) -> HashSet<String> {
    table
        .column("id")
        .unwrap()
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn test_gold_projects_allow_listed_columns() {
    let split = build(&transformed(10), 0.2, 42);
    assert_eq!(split.gold.headers(), &GOLD_COLUMNS.map(String::from));
    assert_eq!(split.gold.len(), 10);
}

#[test]
fn test_missing_columns_are_skipped() {
    let table = Table::from_reader("id,target,extra\n1,0,x\n".as_bytes()).unwrap();
    let split = build(&table, 0.0, 1);
    assert_eq!(
        split.gold.headers(),
        &["id".to_string(), "target".to_string()]
    );
}

#[test]
fn test_train_and_test_partition_gold() {
    for (rows, fraction) in [(100, 0.2), (7, 0.3), (1, 0.5), (0, 0.2), (10, 1.0)] {
        let split = build(&transformed(rows), fraction, 42);
        assert_eq!(split.train.len() + split.test.len(), split.gold.len());

        let train = id_set(&split.train);
        let test = id_set(&split.test);
        assert!(train.is_disjoint(&test));
        let union: HashSet<String> = train.union(&test).cloned().collect();
        assert_eq!(union, id_set(&split.gold));
    }
}

#[test]
fn test_test_size_is_rounded_fraction() {
    assert_eq!(build(&transformed(100), 0.2, 42).test.len(), 20);
    assert_eq!(build(&transformed(7), 0.3, 42).test.len(), 2);
    assert_eq!(build(&transformed(5), 0.0, 42).test.len(), 0);
}

#[test]
fn test_half_row_fractions_round_to_even() {
    let split = build(&transformed(5), 0.5, 42);
    assert_eq!(split.test.len(), 2);
    assert_eq!(split.train.len(), 3);

    assert_eq!(build(&transformed(7), 0.5, 42).test.len(), 4);
    assert_eq!(build(&transformed(1), 0.5, 42).test.len(), 0);
}

#[test]
fn test_split_is_reproducible_for_a_seed() {
    let table = transformed(50);
    assert_eq!(build(&table, 0.2, 7), build(&table, 0.2, 7));
}

#[test]
fn test_train_keeps_gold_order() {
    let split = build(&transformed(20), 0.25, 3);
    let ids: Vec<usize> = split
        .train
        .column("id")
        .unwrap()
        .into_iter()
        .map(|v| v.parse().unwrap())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}
