//! Record Search
//!
//! In-memory search over business records: query classification with
//! monetary-aware matching, weighted relevance ranking, facet aggregation,
//! grouping for compact views, HTML highlighting and relationship discovery.

pub mod config;
pub mod error;
pub mod highlight;
pub mod models;
pub mod relationships;
pub mod search;

pub use config::Config;
pub use error::{AppError, Result};
pub use highlight::{highlight_for_query, Highlighter};
pub use models::{EntityType, SearchRecord};
pub use relationships::{RelationshipConfig, RelationshipEngine};
pub use search::{
    FacetKey, FacetSelections, GroupBy, SearchConfig, SearchResponse, SearchService, SearchSession,
};
