//! Monetary matching properties

mod common;

use common::{bill, bill_with_line, document};
use record_search::models::LineItem;
use record_search::search::monetary::{extract_monetary_tokens, matches_monetary_string};
use record_search::search::{matches_monetary_query, matches_query, ClassifiedQuery};

fn matches(query: &str, record: &record_search::SearchRecord) -> bool {
    matches_query(record, &ClassifiedQuery::classify(query))
}

#[test]
fn test_prefix_ladder_by_digit_count() {
    // one digit: leading digit agrees
    assert!(matches_monetary_string("5", 5068.0));
    assert!(!matches_monetary_string("5", 4068.0));

    // two digits: exact, or followed by a zero
    assert!(matches_monetary_string("12", 120.0));
    assert!(matches_monetary_string("12", 1205.0));
    assert!(!matches_monetary_string("12", 123.0));

    // three digits: prefix
    assert!(matches_monetary_string("506", 5068.0));
    assert!(!matches_monetary_string("507", 5068.0));

    // four or more digits: prefix
    assert!(matches_monetary_string("1530", 15309.0));
    assert!(!matches_monetary_string("1531", 15309.0));
}

#[test]
fn test_decimal_queries_are_restrictive() {
    assert!(matches_monetary_string("800.00", 800.0));
    assert!(!matches_monetary_string("800.00", 8000.0));
    assert!(matches_monetary_string("800.5", 800.55));
    assert!(!matches_monetary_string("800.5", 801.5));
}

#[test]
fn test_decimal_query_matches_digits_past_the_point() {
    assert!(matches_monetary_string("15.3", 1530.0));
    assert!(matches("$15.3", &bill("b1", 1530.0)));
    assert!(!matches("$15.4", &bill("b2", 1530.0)));
}

#[test]
fn test_comma_typed_query_matches_grouped_rendering() {
    assert!(matches_monetary_string("15,3", 15309.0));
    assert!(!matches_monetary_string("15,4", 15309.0));
}

#[test]
fn test_range_membership_is_inclusive() {
    let query = ClassifiedQuery::classify("100-200");
    assert!(matches_monetary_query(&bill("a", 150.0), &query));
    assert!(matches_monetary_query(&bill("b", 100.0), &query));
    assert!(matches_monetary_query(&bill("c", 200.0), &query));
    assert!(!matches_monetary_query(&bill("d", 250.0), &query));

    let reversed = extract_monetary_tokens("$200 to $100");
    let range = reversed.range.unwrap();
    assert_eq!((range.min, range.max), (100.0, 200.0));
}

#[test]
fn test_explicit_query_ignores_text_records() {
    let doc = document("d1", "Invoice 1530 summary");
    assert!(!matches("$1530", &doc));
    // the same digits without `$` fall back to text
    assert!(matches("1530", &doc));
}

#[test]
fn test_line_items_participate() {
    let record = bill_with_line(
        "b1",
        9000.0,
        LineItem::new("Rebar", 0.85, 4365.0).with_type("Material"),
    );
    assert!(matches("$4365", &record));
    assert!(matches("$0.85", &record));
    assert!(matches("rebar 99999", &record));
    assert!(!matches("$99999", &record));
}

#[test]
fn test_tolerance_match() {
    assert!(matches("$1530.01", &bill("b1", 1530.0)));
    assert!(!matches("$1530.50", &bill("b2", 1530.0)));
}
