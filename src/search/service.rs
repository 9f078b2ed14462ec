//! Search pipeline, service and session

use crate::highlight::Highlighter;
use crate::models::SearchRecord;
use crate::search::config::SearchConfig;
use crate::search::corpus::{Corpus, CorpusCache, CorpusSource};
use crate::search::error::SearchResult;
use crate::search::facets::{compute_facets, FacetSelections, Facets};
use crate::search::grouping::{group_results, limit_groups, ResultGroup};
use crate::search::matcher::{matches_query, matches_selections};
use crate::search::query::{ClassifiedQuery, QueryMode};
use crate::search::scoring::rank_records;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// A ranked result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub record: Arc<SearchRecord>,
    pub score: u32,
}

/// Everything the view layer needs for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,

    pub mode: QueryMode,

    pub total_results: usize,

    /// Filtered results, best first
    pub results: Vec<SearchHit>,

    /// Facet counts over the filtered results
    pub facets: Facets,

    /// Groups capped for the compact view
    pub grouped_results: Vec<ResultGroup>,

    /// Groups without caps
    pub full_grouped_results: Vec<ResultGroup>,
}

impl SearchResponse {
    pub fn records(&self) -> impl Iterator<Item = &Arc<SearchRecord>> {
        self.results.iter().map(|hit| &hit.record)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.results.iter().map(|hit| hit.record.id.as_str()).collect()
    }
}

/// Run one search against `records` at the current time
pub fn run_search(
    records: &[Arc<SearchRecord>],
    query: &str,
    selections: &FacetSelections,
    config: &SearchConfig,
) -> SearchResponse {
    run_search_at(records, query, selections, config, Utc::now())
}

/// Run one search with an explicit "now" for date facets
pub fn run_search_at(
    records: &[Arc<SearchRecord>],
    query: &str,
    selections: &FacetSelections,
    config: &SearchConfig,
    now: DateTime<Utc>,
) -> SearchResponse {
    let classified = ClassifiedQuery::classify(query);

    let filtered: Vec<Arc<SearchRecord>> = records
        .iter()
        .filter(|record| {
            matches_query(record, &classified) && matches_selections(record, selections, now)
        })
        .cloned()
        .collect();

    let ranked = rank_records(filtered, &classified);
    let ordered: Vec<Arc<SearchRecord>> = ranked.iter().map(|s| Arc::clone(&s.record)).collect();

    let facets = compute_facets(&ordered, now);
    let full_grouped_results = group_results(&ordered, selections.group_by());
    let grouped_results = limit_groups(&full_grouped_results, &config.group_limits);

    SearchResponse {
        query: query.to_string(),
        mode: classified.mode,
        total_results: ordered.len(),
        results: ranked
            .into_iter()
            .map(|s| SearchHit {
                record: s.record,
                score: s.score,
            })
            .collect(),
        facets,
        grouped_results,
        full_grouped_results,
    }
}

/// Search over a lazily-loaded corpus with simulated latency
pub struct SearchService {
    corpus: CorpusCache,
    config: SearchConfig,
}

impl SearchService {
    /// Create a new search service
    pub fn new(source: Arc<dyn CorpusSource>, config: SearchConfig) -> SearchResult<Self> {
        config.validate_all()?;
        Ok(Self {
            corpus: CorpusCache::new(source),
            config,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Loaded corpus, loading on first use
    pub async fn corpus(&self) -> Arc<Corpus> {
        self.corpus.get().await
    }

    /// Drop the cached corpus
    pub async fn reset(&self) {
        self.corpus.reset().await;
    }

    pub async fn search(&self, query: &str, selections: &FacetSelections) -> SearchResponse {
        let start = Instant::now();
        let corpus = self.corpus.get().await;

        let delay = self.config.delay_for(query);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let response = run_search(&corpus.records, query, selections, &self.config);

        info!(
            query = %query,
            mode = %response.mode,
            total_results = response.total_results,
            groups = response.full_grouped_results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Search completed"
        );

        response
    }
}

/// Outcome of a session search
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// Latest request; its response is now the visible state
    Applied(Arc<SearchResponse>),
    /// Superseded by a later request; the response was dropped
    Stale { token: u64 },
}

impl SearchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SearchOutcome::Applied(_))
    }
}

/// Tracks overlapping requests and applies only the latest one.
///
/// Every request takes a monotonically increasing token. Starting a request
/// marks the previous request's cancellation flag, so its eventual completion
/// is discarded instead of overwriting newer state.
///
/// The session also owns the highlighter used to render its results; the
/// highlight cache is dropped whenever the session returns to an empty search.
pub struct SearchSession {
    service: Arc<SearchService>,
    highlighter: Arc<Highlighter>,
    sequence: AtomicU64,
    current_cancel: Mutex<Option<Arc<AtomicBool>>>,
    visible: Mutex<Option<(u64, Arc<SearchResponse>)>>,
}

impl SearchSession {
    pub fn new(service: Arc<SearchService>) -> Self {
        Self {
            service,
            highlighter: Arc::new(Highlighter::default()),
            sequence: AtomicU64::new(0),
            current_cancel: Mutex::new(None),
            visible: Mutex::new(None),
        }
    }

    /// Share a highlighter configured elsewhere
    pub fn with_highlighter(mut self, highlighter: Arc<Highlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub async fn search(&self, query: &str, selections: &FacetSelections) -> SearchOutcome {
        let token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let cancelled = Arc::new(AtomicBool::new(false));
        if let Some(previous) = self.current_cancel.lock().replace(Arc::clone(&cancelled)) {
            previous.store(true, Ordering::SeqCst);
        }

        let response = self.service.search(query, selections).await;

        if cancelled.load(Ordering::SeqCst) || token != self.latest_token() {
            debug!(token, query = %query, "Discarding stale search response");
            return SearchOutcome::Stale { token };
        }

        if response.mode == QueryMode::Empty {
            self.highlighter.clear();
        }

        let response = Arc::new(response);
        *self.visible.lock() = Some((token, Arc::clone(&response)));
        SearchOutcome::Applied(response)
    }

    /// Token of the most recently issued request
    pub fn latest_token(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Response currently shown, if any
    pub fn visible(&self) -> Option<Arc<SearchResponse>> {
        self.visible.lock().as_ref().map(|(_, r)| Arc::clone(r))
    }

    /// Token of the response currently shown
    pub fn visible_token(&self) -> Option<u64> {
        self.visible.lock().as_ref().map(|(token, _)| *token)
    }

    /// Forget visible state and memoized highlights
    pub fn clear(&self) {
        self.visible.lock().take();
        self.highlighter.clear();
    }

    pub fn service(&self) -> &Arc<SearchService> {
        &self.service
    }

    pub fn highlighter(&self) -> &Arc<Highlighter> {
        &self.highlighter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentDetails, RecordDetails};
    use crate::search::corpus::StaticSource;
    use crate::search::facets::FacetKey;
    use chrono::TimeZone;

    fn doc(id: &str, title: &str, status: &str) -> Arc<SearchRecord> {
        Arc::new(
            SearchRecord::new(
                id,
                title,
                Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
                RecordDetails::Document(DocumentDetails {
                    document_type: "Report".to_string(),
                    author: String::new(),
                }),
            )
            .with_status(status),
        )
    }

    #[test]
    fn test_pipeline_counts_are_consistent() {
        let records = vec![
            doc("d1", "Foundation Inspection Report", "Final"),
            doc("d2", "Foundation pour log", "Draft"),
            doc("d3", "Plumbing Permit", "Final"),
        ];
        let selections = FacetSelections::new().with(FacetKey::Status, "Final");
        let response = run_search(&records, "foundation", &selections, &SearchConfig::default());

        assert_eq!(response.total_results, 1);
        assert_eq!(response.ids(), vec!["d1"]);
        assert_eq!(response.mode, QueryMode::Plain);
        let status = &response.facets[&FacetKey::Status];
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].count, 1);
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let records = vec![doc("d1", "Plumbing Permit", "Final")];
        let response = run_search(&records, "", &FacetSelections::new(), &SearchConfig::default());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["totalResults"], 1);
        assert!(json["fullGroupedResults"].is_array());
        assert_eq!(json["results"][0]["record"]["entityType"], "document");
    }

    #[tokio::test]
    async fn test_service_rejects_invalid_config() {
        let config = SearchConfig::builder().delay_ms(1_000_000).build();
        let result = SearchService::new(Arc::new(StaticSource::new(Vec::new())), config);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_session_applies_sequential_requests() {
        let service = SearchService::new(
            Arc::new(StaticSource::new(Vec::new())),
            SearchConfig::builder().no_delay().build(),
        )
        .unwrap();
        let session = SearchSession::new(Arc::new(service));

        assert!(session.search("a", &FacetSelections::new()).await.is_applied());
        assert!(session.search("b", &FacetSelections::new()).await.is_applied());
        assert_eq!(session.visible_token(), Some(2));
        assert_eq!(session.visible().map(|r| r.query.clone()), Some("b".to_string()));

        session.clear();
        assert!(session.visible().is_none());
    }
}
