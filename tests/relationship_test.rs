//! Relationship discovery over the bundled sample corpus

mod common;

use common::bundled_corpus;
use record_search::relationships::{RelationshipConfig, RelationshipEngine, RelationshipKind};

#[tokio::test]
async fn test_person_relations_ranked_by_strength_then_recency() {
    let corpus = bundled_corpus();
    let engine = RelationshipEngine::default();
    let dana = corpus.get("person-001").unwrap();

    let related = engine.related_records(dana, &corpus.records, None).await;
    let ids: Vec<&str> = related.iter().map(|r| r.record.id.as_str()).collect();

    assert_eq!(
        ids,
        vec![
            "org-001", "doc-001", "doc-003", "pay-001", "bill-001", "inv-001", "po-001",
        ]
    );
    assert_eq!(related[0].relationships[0].kind, RelationshipKind::Affiliation);

    let report = &related[1];
    let kinds: Vec<RelationshipKind> = report.relationships.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![RelationshipKind::Authorship, RelationshipKind::SharedProject]
    );
    assert_eq!(report.strength, 0.8);
}

#[tokio::test]
async fn test_organization_counterparties() {
    let corpus = bundled_corpus();
    let engine = RelationshipEngine::default();
    let reyes = corpus.get("org-001").unwrap();

    let related = engine.related_records(reyes, &corpus.records, Some(10)).await;
    let ids: Vec<&str> = related.iter().map(|r| r.record.id.as_str()).collect();

    assert_eq!(ids, vec!["person-001", "pay-001", "bill-001"]);
    assert!(related[1..]
        .iter()
        .all(|r| r.relationships[0].kind == RelationshipKind::Counterparty));
}

#[tokio::test]
async fn test_min_strength_and_limit() {
    let corpus = bundled_corpus();
    let engine = RelationshipEngine::new(RelationshipConfig {
        min_strength: 0.75,
        ..RelationshipConfig::default()
    });
    let dana = corpus.get("person-001").unwrap();

    let related = engine.related_records(dana, &corpus.records, None).await;
    assert_eq!(related.len(), 3);
    assert!(related.iter().all(|r| r.strength >= 0.75));

    let top = engine.related_records(dana, &corpus.records, Some(1)).await;
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].record.id, "org-001");
}

#[tokio::test]
async fn test_relationship_serializes() {
    let corpus = bundled_corpus();
    let engine = RelationshipEngine::default();
    let permit = corpus.get("doc-002").unwrap();
    let sam = corpus.get("person-002").unwrap();

    let relationships = engine.relate(permit, sam).await;
    let json = serde_json::to_value(&relationships).unwrap();

    assert_eq!(json[0]["kind"], "authorship");
    assert_eq!(json[0]["sourceId"], "doc-002");
    assert_eq!(json[0]["targetId"], "person-002");
}
