//! Relationship discovery between records
//!
//! This module provides:
//! - Pairwise relationship strategies (shared project/client, affiliation, authorship, counterparty)
//! - An engine that ranks a record's related records by strength

pub mod engine;
pub mod models;
pub mod strategy;

pub use engine::RelationshipEngine;
pub use models::{RelatedRecord, Relationship, RelationshipConfig, RelationshipKind};
pub use strategy::{
    AffiliationStrategy, AuthorshipStrategy, CounterpartyStrategy, RelationshipStrategy,
    SharedClientStrategy, SharedProjectStrategy,
};
