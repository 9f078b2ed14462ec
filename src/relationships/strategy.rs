use crate::models::{RecordDetails, SearchRecord};
use crate::relationships::models::{Relationship, RelationshipConfig, RelationshipKind};
use async_trait::async_trait;

/// Trait for relationship strategies
#[async_trait]
pub trait RelationshipStrategy: Send + Sync {
    /// Relationship from `source` to `target`, if any
    async fn relate(
        &self,
        source: &SearchRecord,
        target: &SearchRecord,
        config: &RelationshipConfig,
    ) -> Option<Relationship>;

    /// Get strategy name
    fn name(&self) -> &str;

    /// Get relationship kind this strategy produces
    fn kind(&self) -> RelationshipKind;
}

fn same_name(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}

/// Same non-empty project
pub struct SharedProjectStrategy;

#[async_trait]
impl RelationshipStrategy for SharedProjectStrategy {
    async fn relate(
        &self,
        source: &SearchRecord,
        target: &SearchRecord,
        config: &RelationshipConfig,
    ) -> Option<Relationship> {
        if !config.enable_shared_project || !same_name(&source.project, &target.project) {
            return None;
        }
        Some(Relationship::new(
            source,
            target,
            RelationshipKind::SharedProject,
            0.6,
            format!("Both belong to project {}", source.project.trim()),
        ))
    }

    fn name(&self) -> &str {
        "shared_project"
    }

    fn kind(&self) -> RelationshipKind {
        RelationshipKind::SharedProject
    }
}

/// Same non-empty client
pub struct SharedClientStrategy;

#[async_trait]
impl RelationshipStrategy for SharedClientStrategy {
    async fn relate(
        &self,
        source: &SearchRecord,
        target: &SearchRecord,
        config: &RelationshipConfig,
    ) -> Option<Relationship> {
        if !config.enable_shared_client || !same_name(&source.client, &target.client) {
            return None;
        }
        Some(Relationship::new(
            source,
            target,
            RelationshipKind::SharedClient,
            0.5,
            format!("Both reference client {}", source.client.trim()),
        ))
    }

    fn name(&self) -> &str {
        "shared_client"
    }

    fn kind(&self) -> RelationshipKind {
        RelationshipKind::SharedClient
    }
}

/// Person whose associated organization is the organization's title
pub struct AffiliationStrategy;

impl AffiliationStrategy {
    fn works_for(person: &SearchRecord, organization: &SearchRecord) -> bool {
        match (&person.details, &organization.details) {
            (RecordDetails::Person(p), RecordDetails::Organization(_)) => p
                .associated_organization
                .as_deref()
                .is_some_and(|org| same_name(org, &organization.title)),
            _ => false,
        }
    }
}

#[async_trait]
impl RelationshipStrategy for AffiliationStrategy {
    async fn relate(
        &self,
        source: &SearchRecord,
        target: &SearchRecord,
        config: &RelationshipConfig,
    ) -> Option<Relationship> {
        if !config.enable_affiliation {
            return None;
        }
        let reason = if Self::works_for(source, target) {
            format!("{} works for {}", source.title, target.title)
        } else if Self::works_for(target, source) {
            format!("{} employs {}", source.title, target.title)
        } else {
            return None;
        };
        Some(Relationship::new(
            source,
            target,
            RelationshipKind::Affiliation,
            0.9,
            reason,
        ))
    }

    fn name(&self) -> &str {
        "affiliation"
    }

    fn kind(&self) -> RelationshipKind {
        RelationshipKind::Affiliation
    }
}

/// Document whose author is the person's name
pub struct AuthorshipStrategy;

impl AuthorshipStrategy {
    fn authored(document: &SearchRecord, person: &SearchRecord) -> bool {
        match (&document.details, &person.details) {
            (RecordDetails::Document(doc), RecordDetails::Person(_)) => {
                same_name(&doc.author, &person.title)
            }
            _ => false,
        }
    }
}

#[async_trait]
impl RelationshipStrategy for AuthorshipStrategy {
    async fn relate(
        &self,
        source: &SearchRecord,
        target: &SearchRecord,
        config: &RelationshipConfig,
    ) -> Option<Relationship> {
        if !config.enable_authorship {
            return None;
        }
        let reason = if Self::authored(source, target) {
            format!("Written by {}", target.title)
        } else if Self::authored(target, source) {
            format!("{} wrote {}", source.title, target.title)
        } else {
            return None;
        };
        Some(Relationship::new(
            source,
            target,
            RelationshipKind::Authorship,
            0.8,
            reason,
        ))
    }

    fn name(&self) -> &str {
        "authorship"
    }

    fn kind(&self) -> RelationshipKind {
        RelationshipKind::Authorship
    }
}

/// Financial record whose client is the organization's title
pub struct CounterpartyStrategy;

impl CounterpartyStrategy {
    fn billed_to(financial: &SearchRecord, organization: &SearchRecord) -> bool {
        financial.financial().is_some()
            && matches!(organization.details, RecordDetails::Organization(_))
            && same_name(&financial.client, &organization.title)
    }
}

#[async_trait]
impl RelationshipStrategy for CounterpartyStrategy {
    async fn relate(
        &self,
        source: &SearchRecord,
        target: &SearchRecord,
        config: &RelationshipConfig,
    ) -> Option<Relationship> {
        if !config.enable_counterparty {
            return None;
        }
        let reason = if Self::billed_to(source, target) {
            format!("{} {} is with {}", source.entity_type(), source.title, target.title)
        } else if Self::billed_to(target, source) {
            format!("{} is the counterparty on {}", source.title, target.title)
        } else {
            return None;
        };
        Some(Relationship::new(
            source,
            target,
            RelationshipKind::Counterparty,
            0.85,
            reason,
        ))
    }

    fn name(&self) -> &str {
        "counterparty"
    }

    fn kind(&self) -> RelationshipKind {
        RelationshipKind::Counterparty
    }
}
