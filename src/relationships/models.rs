use crate::models::SearchRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumString};
use validator::Validate;

/// A directed link between two records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub source_id: String,

    pub target_id: String,

    pub kind: RelationshipKind,

    /// 0.0 - 1.0, higher = closer
    pub strength: f64,

    /// Human-readable explanation
    pub reason: String,
}

impl Relationship {
    pub fn new(
        source: &SearchRecord,
        target: &SearchRecord,
        kind: RelationshipKind,
        strength: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source.id.clone(),
            target_id: target.id.clone(),
            kind,
            strength: strength.clamp(0.0, 1.0),
            reason: reason.into(),
        }
    }
}

/// Type of relationship detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelationshipKind {
    /// Both records belong to the same project
    SharedProject,

    /// Both records reference the same client
    SharedClient,

    /// Person works for organization
    Affiliation,

    /// Person authored document
    Authorship,

    /// Financial record is addressed to organization
    Counterparty,
}

/// A candidate record with every relationship found to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedRecord {
    pub record: Arc<SearchRecord>,

    /// Strongest single relationship
    pub strength: f64,

    pub relationships: Vec<Relationship>,
}

/// Configuration for relationship discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RelationshipConfig {
    pub enable_shared_project: bool,

    pub enable_shared_client: bool,

    pub enable_affiliation: bool,

    pub enable_authorship: bool,

    pub enable_counterparty: bool,

    /// Relationships weaker than this are dropped
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_strength: f64,

    /// Default cap for `related_records`
    #[validate(range(min = 1, max = 1_000))]
    pub max_related: usize,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            enable_shared_project: true,
            enable_shared_client: true,
            enable_affiliation: true,
            enable_authorship: true,
            enable_counterparty: true,
            min_strength: 0.5,
            max_related: 10,
        }
    }
}
