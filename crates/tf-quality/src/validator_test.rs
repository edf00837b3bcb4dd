use super::*;

fn bronze() -> Table {
    Table::from_reader(
        "id,feature_num,feature_cat,target,timestamp
1,10.0,A,0,2024-01-01 00:00:00
2,,B,1,2024-01-01 00:01:00
3,1000,C,1,2024-01-01 00:02:00
4,55.5,A,2,2024-01-01 00:03:00
5,20.0,B,1,2024-01-01 00:04:00
5,21.0,B,0,2024-01-01 00:05:00
6,30.0,C,0,2024-01-01 00:06:00
7,31.0,A,1,2024-01-01 02:00:00
"
        .as_bytes(),
    )
    .unwrap()
}

fn validator() -> SilverValidator {
    SilverValidator::standard(&Params::default(), None)
}

#[test]
fn test_standard_rules_reject_bad_rows() {
    let report = validator().validate(&bronze()).unwrap();
    assert_eq!(
        report.mask,
        vec![true, false, false, false, false, false, true, false]
    );
    assert_eq!(report.accepted_count(), 2);
    assert_eq!(report.rejected_count(), 6);
}

#[test]
fn test_report_counts_per_rule() {
    let report = validator().validate(&bronze()).unwrap();
    let count = |name: &str| {
        report
            .rule_rejections
            .iter()
            .find(|o| o.rule == name)
            .map(|o| o.rejected)
            .unwrap()
    };
    assert_eq!(count("not_null"), 1);
    assert_eq!(count("target_allowed_values"), 1);
    assert_eq!(count("id_unique"), 2);
    assert_eq!(count("feature_num_range"), 1);
    assert_eq!(count("continuity"), 1);
}

#[test]
fn test_missing_required_column_is_fatal() {
    let table = Table::from_reader("id,feature_num\n1,2\n".as_bytes()).unwrap();
    let err = validator().validate(&table).unwrap_err();
    assert!(err.is_schema_error());
    assert!(err.to_string().contains("feature_cat"));
}

#[test]
fn test_validation_is_deterministic() {
    let table = bronze();
    let first = validator().validate(&table).unwrap();
    let second = validator().validate(&table).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_accepted_rows_pass_again() {
    let table = bronze();
    let report = validator().validate(&table).unwrap();
    let (kept, dropped) = table.partition(&report.mask);
    assert_eq!(kept.len() + dropped.len(), table.len());

    let again = validator().validate(&kept).unwrap();
    assert!(again.mask.iter().all(|&ok| ok));
}

#[test]
fn test_contract_only_adds_rejections() {
    let contract = ColumnContract::from_yaml(
        "columns:\n  - name: feature_cat\n    tests:\n      - accepted_values:\n          values: [B, C]\n",
    )
    .unwrap();
    let table = bronze();
    let base = validator().validate(&table).unwrap();
    let with_contract = SilverValidator::standard(&Params::default(), Some(&contract))
        .validate(&table)
        .unwrap();

    for (b, c) in base.mask.iter().zip(&with_contract.mask) {
        assert!(!c || *b);
    }
    // row 1 (feature_cat = A) is now rejected
    assert!(!with_contract.mask[0]);
    assert!(with_contract.mask[6]);
}

#[test]
fn test_broken_contract_is_ignored() {
    let contract =
        ColumnContract::from_yaml("columns:\n  - name: ghost\n    tests: [not_null]\n").unwrap();
    let table = bronze();
    let base = validator().validate(&table).unwrap();
    let with_contract = SilverValidator::standard(&Params::default(), Some(&contract))
        .validate(&table)
        .unwrap();
    assert_eq!(base.mask, with_contract.mask);
}

struct ShortRule;

impl RowRule for ShortRule {
    fn name(&self) -> &str {
        "short"
    }

    fn evaluate(&self, _table: &Table) -> QualityResult<Vec<bool>> {
        Ok(vec![true])
    }
}

#[test]
fn test_wrong_mask_length_is_an_error() {
    let v = SilverValidator::new(vec!["id".into()]).with_rule(Box::new(ShortRule));
    let err = v.validate(&bronze()).unwrap_err();
    assert!(matches!(err, QualityError::MaskLength { expected: 8, .. }));
}

#[test]
fn test_validate_rows_helper() {
    let mask = validate_rows(&bronze(), &Params::default().required_columns).unwrap();
    assert_eq!(mask.iter().filter(|&&ok| ok).count(), 2);
}

#[test]
fn test_validate_rows_accepts_distinct_large_ids() {
    let table = Table::from_reader(
        "id,feature_num,feature_cat,target,timestamp
9007199254740992,10.0,A,0,2024-01-01 00:00:00
9007199254740993,11.0,B,1,2024-01-01 00:01:00
"
        .as_bytes(),
    )
    .unwrap();
    let mask = validate_rows(&table, &Params::default().required_columns).unwrap();
    assert_eq!(mask, vec![true, true]);
}

#[test]
fn test_empty_table_validates() {
    let table = Table::new(Params::default().required_columns);
    let report = validator().validate(&table).unwrap();
    assert!(report.mask.is_empty());
}
