//! In-memory record search
//!
//! This module decides whether records match a query, ranks them, counts
//! facets over the survivors and partitions them for display:
//!
//! - **Classification**: a query is plain text, hybrid (digits without `$`)
//!   or explicit monetary (leading `$`), decided once per query
//! - **Monetary parsing**: amounts, ranges and a digit-count prefix ladder
//! - **Matching**: haystack tokens, monetary fields, facet selections
//! - **Scoring**: title/summary/haystack weights and tiered monetary scores
//! - **Facets & grouping**: post-filter counts, entity-type priority order,
//!   per-group caps for compact views
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │        SearchSession (latest request wins)      │
//! ├─────────────────────────────────────────────────┤
//! │        SearchService (corpus cache, delay)      │
//! └─────────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────────┐
//! │                 run_search                       │
//! ├─────────────────────────────────────────────────┤
//! │  classify → match → rank → facets → groups      │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use record_search::search::{FacetKey, FacetSelections, SearchConfig, SearchService, StaticSource};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = SearchService::new(Arc::new(StaticSource::bundled()?), SearchConfig::default())?;
//!
//!     let selections = FacetSelections::new().with(FacetKey::Status, "Open");
//!     let response = service.search("$1530", &selections).await;
//!     println!("Found {} records", response.total_results);
//!
//!     Ok(())
//! }
//! ```

mod config;
mod corpus;
mod error;
mod facets;
mod grouping;
mod matcher;
pub mod monetary;
mod query;
mod scoring;
mod service;

pub use config::{GroupLimits, SearchConfig, SearchConfigBuilder};
pub use corpus::{
    parse_corpus, Corpus, CorpusCache, CorpusSource, JsonFileSource, StaticSource, BUNDLED_CORPUS,
};
pub use error::{SearchError, SearchResult};
pub use facets::{
    compute_facets, date_bucket, get_facet_value, value_band, FacetCount, FacetKey,
    FacetSelections, Facets, GroupBy,
};
pub use grouping::{group_results, limit_groups, ResultGroup, HARD_GROUP_LIMIT, UNSPECIFIED_GROUP};
pub use matcher::{
    amount_fields, matches_monetary_query, matches_query, matches_selections, matches_text,
    AmountField,
};
pub use query::{ClassifiedQuery, QueryMode};
pub use scoring::{monetary_score, rank_records, score_record, text_score, ScoredRecord};
pub use service::{
    run_search, run_search_at, SearchHit, SearchOutcome, SearchResponse, SearchService,
    SearchSession,
};
