//! End-to-end search tests over the bundled sample corpus

mod common;

use common::{bundled_corpus, document, now, shared};
use record_search::models::EntityType;
use record_search::search::{
    run_search_at, FacetKey, FacetSelections, GroupBy, QueryMode, SearchConfig, SearchResponse,
    UNSPECIFIED_GROUP,
};

fn search(query: &str, selections: &FacetSelections) -> SearchResponse {
    let corpus = bundled_corpus();
    run_search_at(
        &corpus.records,
        query,
        selections,
        &SearchConfig::default(),
        now(),
    )
}

#[test]
fn test_empty_query_orders_by_recency() {
    let response = search("", &FacetSelections::new());

    assert_eq!(response.mode, QueryMode::Empty);
    assert_eq!(response.total_results, 14);
    assert_eq!(
        response.ids(),
        vec![
            "pay-001",
            "doc-001",
            "bill-001",
            "inv-001",
            "doc-002",
            "po-001",
            "rcpt-001",
            "doc-003",
            "inv-002",
            "person-002",
            "person-001",
            "org-002",
            "org-001",
            "org-003",
        ]
    );
    assert!(response.results.iter().all(|hit| hit.score == 0));
}

#[test]
fn test_title_match_ranks_first() {
    let response = search("foundation", &FacetSelections::new());

    assert_eq!(response.mode, QueryMode::Plain);
    assert_eq!(response.ids().first(), Some(&"doc-001"));
    assert!(response.ids().contains(&"org-001"));
    assert!(response.results[0].score > response.results[1].score);
}

#[test]
fn test_explicit_prefix_matches_larger_bill() {
    let response = search("$1530", &FacetSelections::new());

    assert_eq!(response.mode, QueryMode::ExplicitMonetary);
    assert_eq!(response.ids(), vec!["inv-002", "pay-001", "bill-001"]);
    assert!(response.results[0].score > response.results[1].score);
}

#[test]
fn test_explicit_non_prefix_matches_nothing() {
    let response = search("$1531", &FacetSelections::new());
    assert_eq!(response.total_results, 0);
    assert!(response.grouped_results.is_empty());
}

#[test]
fn test_lone_dollar_lists_financial_records() {
    let response = search("$", &FacetSelections::new());

    assert_eq!(
        response.ids(),
        vec!["pay-001", "bill-001", "inv-001", "po-001", "rcpt-001", "inv-002"]
    );
    assert!(response
        .records()
        .all(|record| record.entity_type().is_financial()));
}

#[test]
fn test_range_query_uses_membership() {
    let response = search("100-200", &FacetSelections::new());

    let mut ids = response.ids();
    ids.sort();
    assert_eq!(ids, vec!["bill-001", "rcpt-001"]);
}

#[test]
fn test_hybrid_query_matches_line_item_amount() {
    let response = search("pump 1809", &FacetSelections::new());

    assert_eq!(response.mode, QueryMode::Hybrid);
    assert_eq!(response.ids(), vec!["bill-001"]);
}

#[test]
fn test_facets_or_within_and_across() {
    let either = FacetSelections::new()
        .with(FacetKey::EntityType, "bill")
        .with(FacetKey::EntityType, "invoice");
    let mut ids = search("", &either).ids().into_iter().map(String::from).collect::<Vec<_>>();
    ids.sort();
    assert_eq!(ids, vec!["bill-001", "inv-001", "inv-002"]);

    let narrowed = either.with(FacetKey::Status, "Paid");
    assert_eq!(search("", &narrowed).ids(), vec!["inv-002"]);
}

#[test]
fn test_undefined_facet_value_does_not_exclude() {
    // documents have no trade focus, so only organizations are constrained
    let selections = FacetSelections::new().with(FacetKey::TradeFocus, "Concrete");
    let response = search("", &selections);

    assert!(response.ids().contains(&"org-001"));
    assert!(!response.ids().contains(&"org-002"));
    assert!(response.ids().contains(&"doc-001"));
}

#[test]
fn test_blank_project_is_excluded_by_project_selection() {
    let records = shared(vec![
        document("d1", "Pour log").with_project("Harbor"),
        document("d2", "Pour log").with_project("Elm"),
        document("d3", "Pour log"),
    ]);
    let selections = FacetSelections::new().with(FacetKey::Project, "Harbor");
    let response = run_search_at(&records, "", &selections, &SearchConfig::default(), now());
    assert_eq!(response.ids(), vec!["d1"]);

    // organizations carry no project and drop out of a project filter
    let harbor = FacetSelections::new().with(FacetKey::Project, "Harbor View Residences");
    assert_eq!(
        search("", &harbor).ids(),
        vec!["pay-001", "doc-001", "bill-001", "inv-001", "po-001", "doc-003", "person-001"]
    );
}

#[test]
fn test_facet_counts_follow_filtered_results() {
    let response = search("", &FacetSelections::new());
    let types = &response.facets[&FacetKey::EntityType];

    assert_eq!(types[0].value, "document");
    assert_eq!(types[0].count, 3);
    assert_eq!(types[1].value, "organization");
    assert_eq!(types[1].count, 3);

    let filtered = search("$1530", &FacetSelections::new());
    let total: usize = filtered.facets[&FacetKey::EntityType]
        .iter()
        .map(|c| c.count)
        .sum();
    assert_eq!(total, filtered.total_results);
}

#[test]
fn test_grouping_totals_and_limits() {
    let response = search("", &FacetSelections::new());

    let full: usize = response
        .full_grouped_results
        .iter()
        .map(|g| g.items.len())
        .sum();
    assert_eq!(full, response.total_results);
    assert!(response.grouped_results.iter().all(|g| g.items.len() <= 3));

    let order: Vec<EntityType> = response
        .full_grouped_results
        .iter()
        .map(|g| g.entity_type)
        .collect();
    assert_eq!(
        order,
        vec![
            EntityType::Document,
            EntityType::Invoice,
            EntityType::PurchaseOrder,
            EntityType::Bill,
            EntityType::Receipt,
            EntityType::Payment,
            EntityType::Person,
            EntityType::Organization,
        ]
    );
}

#[test]
fn test_group_by_project_sorts_keys() {
    let selections = FacetSelections::new().with(FacetKey::GroupBy, GroupBy::Project.to_string());
    let response = search("", &selections);

    let keys: Vec<&str> = response
        .full_grouped_results
        .iter()
        .map(|g| g.key.as_str())
        .collect();
    assert_eq!(
        keys,
        vec!["Harbor View Residences", "Maple Street Remodel", UNSPECIFIED_GROUP]
    );
    // groupBy configures the view and never filters
    assert_eq!(response.total_results, 14);
}

#[test]
fn test_search_is_deterministic() {
    let first = search("concrete", &FacetSelections::new());
    let second = search("concrete", &FacetSelections::new());
    assert_eq!(first, second);
}

#[test]
fn test_response_serializes_camel_case() {
    let response = search("$1530", &FacetSelections::new());
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["mode"], "explicitMonetary");
    assert_eq!(json["totalResults"], 3);
    assert!(json["groupedResults"].is_array());
    assert_eq!(json["results"][0]["record"]["entityType"], "invoice");
}
