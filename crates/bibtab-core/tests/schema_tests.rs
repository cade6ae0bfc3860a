//! Schema table checks

use bibtab_core::{Schema, COLUMNS};
use rstest::rstest;

#[rstest]
#[case("article")]
#[case("book")]
#[case("booklet")]
#[case("conference")]
#[case("inbook")]
#[case("incollection")]
#[case("inproceedings")]
#[case("manual")]
#[case("mastersthesis")]
#[case("misc")]
#[case("phdthesis")]
#[case("proceedings")]
#[case("techreport")]
#[case("unpublished")]
fn test_standard_type_is_known(#[case] entry_type: &str) {
    let schema = Schema::standard();
    assert!(schema.is_known(entry_type));

    let required = schema.required_fields(entry_type);
    let optional = schema.optional_fields(entry_type);
    assert!(
        required.iter().all(|f| !optional.contains(f)),
        "{entry_type}: required and optional overlap"
    );
    for field in required.iter().chain(optional) {
        assert!(COLUMNS.contains(&field.as_str()), "{entry_type}: no column for {field}");
    }
}

#[rstest]
#[case("online")]
#[case("ARTICLE")]
#[case("")]
fn test_unknown_types(#[case] entry_type: &str) {
    let schema = Schema::standard();
    assert!(!schema.is_known(entry_type));
    assert!(schema.required_fields(entry_type).is_empty());
    assert!(schema.optional_fields(entry_type).is_empty());
}

#[rstest]
#[case("article", &["author", "title", "journal", "year"])]
#[case("misc", &[])]
#[case("booklet", &["title"])]
#[case("techreport", &["author", "title", "institution", "year"])]
fn test_required_fields(#[case] entry_type: &str, #[case] expected: &[&str]) {
    assert_eq!(Schema::standard().required_fields(entry_type), expected);
}

#[test]
fn test_standard_has_fourteen_types() {
    assert_eq!(Schema::standard().entry_types().count(), 14);
}

#[test]
fn test_custom_schema() {
    let schema = Schema::new().with_type("Dataset", &["title", "url"], &["url", "year"]);

    assert!(schema.is_known("dataset"));
    assert_eq!(schema.required_fields("dataset"), ["title", "url"]);
    assert_eq!(schema.optional_fields("dataset"), ["year"]);
    assert!(!schema.is_known("article"));
}
