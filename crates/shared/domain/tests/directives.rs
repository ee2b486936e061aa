use mqf_domain::model::{parse_property, split_csv};
use mqf_domain::{ConfigModel, ErrorKind};
use proptest::prelude::*;

#[test]
fn csv_directives_are_trimmed_and_deduplicated() {
    let cfg = ConfigModel::builder("mq1")
        .create_csv(" c1, c2 ,,c1 ")
        .assign_csv("a1")
        .build()
        .expect("valid config");

    assert_eq!(cfg.create_targets(), Some(&["c1".to_owned(), "c2".to_owned()][..]));
    assert_eq!(cfg.assign_targets(), &["a1".to_owned()]);
}

#[test]
fn zero_counts_are_invalid() {
    let err = ConfigModel::builder("mq1").replicas(0).build().expect_err("zero replicas");
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
}

proptest! {
    #[test]
    fn split_never_yields_blank_segments(input in "[a-z0-9, ]{0,40}") {
        for segment in split_csv(&input) {
            prop_assert!(!segment.is_empty());
            prop_assert_eq!(segment.trim(), segment.as_str());
        }
    }

    #[test]
    fn split_preserves_order(names in proptest::collection::vec("[a-z][a-z0-9]{0,6}", 0..8)) {
        let joined = names.join(",");
        prop_assert_eq!(split_csv(&joined), names);
    }

    #[test]
    fn property_parsing_splits_on_first_equals(key in "[a-z][a-z.]{0,10}", value in "[a-z0-9=:/]{0,12}") {
        let (k, v) = parse_property(&format!("{key}={value}")).expect("well formed");
        prop_assert_eq!(k, key);
        prop_assert_eq!(v, value);
    }
}
