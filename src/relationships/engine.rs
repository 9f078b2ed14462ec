use crate::models::SearchRecord;
use crate::relationships::models::{RelatedRecord, Relationship, RelationshipConfig};
use crate::relationships::strategy::{
    AffiliationStrategy, AuthorshipStrategy, CounterpartyStrategy, RelationshipStrategy,
    SharedClientStrategy, SharedProjectStrategy,
};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Applies every enabled strategy to record pairs
pub struct RelationshipEngine {
    config: RelationshipConfig,

    strategies: Vec<Box<dyn RelationshipStrategy>>,
}

impl RelationshipEngine {
    pub fn new(config: RelationshipConfig) -> Self {
        let strategies = Self::create_strategies(&config);
        Self { config, strategies }
    }

    fn create_strategies(config: &RelationshipConfig) -> Vec<Box<dyn RelationshipStrategy>> {
        let mut strategies: Vec<Box<dyn RelationshipStrategy>> = Vec::new();

        if config.enable_affiliation {
            strategies.push(Box::new(AffiliationStrategy));
        }

        if config.enable_counterparty {
            strategies.push(Box::new(CounterpartyStrategy));
        }

        if config.enable_authorship {
            strategies.push(Box::new(AuthorshipStrategy));
        }

        if config.enable_shared_project {
            strategies.push(Box::new(SharedProjectStrategy));
        }

        if config.enable_shared_client {
            strategies.push(Box::new(SharedClientStrategy));
        }

        strategies
    }

    pub fn config(&self) -> &RelationshipConfig {
        &self.config
    }

    /// Names of the active strategies, in evaluation order
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Every relationship from `source` to `target` at or above the minimum strength
    pub async fn relate(&self, source: &SearchRecord, target: &SearchRecord) -> Vec<Relationship> {
        if source.id == target.id {
            return Vec::new();
        }

        let mut found = Vec::new();
        for strategy in &self.strategies {
            if let Some(relationship) = strategy.relate(source, target, &self.config).await {
                if relationship.strength >= self.config.min_strength {
                    found.push(relationship);
                }
            }
        }
        found
    }

    /// Records related to `record`, strongest first, newest first on ties
    pub async fn related_records(
        &self,
        record: &SearchRecord,
        corpus: &[Arc<SearchRecord>],
        limit: Option<usize>,
    ) -> Vec<RelatedRecord> {
        let limit = limit.unwrap_or(self.config.max_related);

        let mut related = Vec::new();
        for candidate in corpus {
            let mut relationships = self.relate(record, candidate).await;
            if relationships.is_empty() {
                continue;
            }
            relationships.sort_by(|a, b| {
                b.strength.partial_cmp(&a.strength).unwrap_or(Ordering::Equal)
            });
            let strength = relationships[0].strength;
            related.push(RelatedRecord {
                record: Arc::clone(candidate),
                strength,
                relationships,
            });
        }

        related.sort_by(|a, b| {
            b.strength
                .partial_cmp(&a.strength)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.record.updated_at.cmp(&a.record.updated_at))
        });
        related.truncate(limit);

        debug!(
            record_id = %record.id,
            related = related.len(),
            "Related records resolved"
        );

        related
    }
}

impl Default for RelationshipEngine {
    fn default() -> Self {
        Self::new(RelationshipConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrganizationDetails, PersonDetails, RecordDetails};
    use crate::relationships::models::RelationshipKind;
    use chrono::{TimeZone, Utc};

    fn org(id: &str, title: &str, day: u32) -> Arc<SearchRecord> {
        Arc::new(SearchRecord::new(
            id,
            title,
            Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            RecordDetails::Organization(OrganizationDetails::default()),
        ))
    }

    fn person(org: &str) -> SearchRecord {
        SearchRecord::new(
            "p1",
            "Sam Ortiz",
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            RecordDetails::Person(PersonDetails {
                associated_organization: Some(org.to_string()),
                ..PersonDetails::default()
            }),
        )
        .with_project("Harbor")
    }

    #[test]
    fn test_disabled_strategies_are_not_created() {
        let engine = RelationshipEngine::new(RelationshipConfig {
            enable_shared_client: false,
            enable_counterparty: false,
            ..RelationshipConfig::default()
        });
        assert_eq!(
            engine.strategy_names(),
            vec!["affiliation", "authorship", "shared_project"]
        );
    }

    #[tokio::test]
    async fn test_record_never_relates_to_itself() {
        let engine = RelationshipEngine::default();
        let p = person("Ortiz Framing");
        assert!(engine.relate(&p, &p).await.is_empty());
    }

    #[tokio::test]
    async fn test_min_strength_filters() {
        let engine = RelationshipEngine::new(RelationshipConfig {
            min_strength: 0.7,
            ..RelationshipConfig::default()
        });
        let p = person("Nobody");
        let other = (*org("o1", "Ortiz Framing", 2)).clone().with_project("Harbor");
        assert!(engine.relate(&p, &other).await.is_empty());
    }

    #[tokio::test]
    async fn test_related_records_ordering() {
        let engine = RelationshipEngine::default();
        let employer = org("o1", "Ortiz Framing", 2);
        let older = Arc::new((*org("o2", "Harbor Partners", 3)).clone().with_project("Harbor"));
        let newer = Arc::new((*org("o3", "Harbor Trust", 9)).clone().with_project("Harbor"));
        let unrelated = org("o4", "Elsewhere", 10);
        let corpus = vec![older, unrelated, employer, newer];

        let related = engine
            .related_records(&person("Ortiz Framing"), &corpus, None)
            .await;
        let ids: Vec<_> = related.iter().map(|r| r.record.id.as_str()).collect();
        assert_eq!(ids, vec!["o1", "o3", "o2"]);
        assert_eq!(related[0].relationships[0].kind, RelationshipKind::Affiliation);

        let limited = engine
            .related_records(&person("Ortiz Framing"), &corpus, Some(1))
            .await;
        assert_eq!(limited.len(), 1);
    }
}
