//! Corpus sources and the lazily-loaded corpus cache

use crate::models::{normalize_records, NormalizationReport, SearchRecord};
use crate::search::error::{SearchError, SearchResult};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Sample corpus compiled into the binary
pub const BUNDLED_CORPUS: &str = include_str!("../../data/sample_corpus.json");

/// Supplies raw, un-normalized records
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Fetch every raw record
    async fn load(&self) -> SearchResult<Vec<Value>>;

    /// Get source name
    fn name(&self) -> &str;
}

/// Reads a JSON array of records from disk
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CorpusSource for JsonFileSource {
    async fn load(&self) -> SearchResult<Vec<Value>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SearchError::CorpusLoadFailed {
                source_name: self.path.display().to_string(),
                message: e.to_string(),
            })?;
        parse_corpus(&raw)
    }

    fn name(&self) -> &str {
        "json_file"
    }
}

/// In-memory records, such as the bundled sample or test fixtures
pub struct StaticSource {
    records: Vec<Value>,
}

impl StaticSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }

    /// Source over [`BUNDLED_CORPUS`]
    pub fn bundled() -> SearchResult<Self> {
        Ok(Self::new(parse_corpus(BUNDLED_CORPUS)?))
    }
}

#[async_trait]
impl CorpusSource for StaticSource {
    async fn load(&self) -> SearchResult<Vec<Value>> {
        Ok(self.records.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Accepts a bare array or an object with a `records` array
pub fn parse_corpus(raw: &str) -> SearchResult<Vec<Value>> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(records) => Ok(records),
        Value::Object(mut object) => match object.remove("records") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(SearchError::InvalidCorpus(
                "expected an array or an object with a `records` array".to_string(),
            )),
        },
        _ => Err(SearchError::InvalidCorpus(
            "expected an array of records".to_string(),
        )),
    }
}

/// Normalized, immutable corpus
#[derive(Debug, Default)]
pub struct Corpus {
    pub records: Vec<Arc<SearchRecord>>,
    pub report: NormalizationReport,
}

impl Corpus {
    pub fn from_raw(raw: Vec<Value>) -> Self {
        let (records, report) = normalize_records(raw);
        Self {
            records: records.into_iter().map(Arc::new).collect(),
            report,
        }
    }

    pub fn from_records(records: Vec<SearchRecord>) -> Self {
        let accepted = records.len();
        Self {
            records: records.into_iter().map(Arc::new).collect(),
            report: NormalizationReport {
                accepted,
                ..NormalizationReport::default()
            },
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<SearchRecord>> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// Owned, lazily-initialized corpus.
///
/// The first caller loads; concurrent callers wait on the same lock and reuse
/// the result. A failed load is logged and cached as an empty corpus.
pub struct CorpusCache {
    source: Arc<dyn CorpusSource>,
    slot: Mutex<Option<Arc<Corpus>>>,
    loads: AtomicUsize,
}

impl CorpusCache {
    pub fn new(source: Arc<dyn CorpusSource>) -> Self {
        Self {
            source,
            slot: Mutex::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    /// Cached corpus, loading it on first use
    pub async fn get(&self) -> Arc<Corpus> {
        let mut slot = self.slot.lock().await;
        if let Some(corpus) = slot.as_ref() {
            return Arc::clone(corpus);
        }

        self.loads.fetch_add(1, Ordering::Relaxed);
        let corpus = match self.source.load().await {
            Ok(raw) => {
                let corpus = Corpus::from_raw(raw);
                info!(
                    source = self.source.name(),
                    records = corpus.len(),
                    skipped = corpus.report.skipped,
                    duplicates = corpus.report.duplicates,
                    "Corpus loaded"
                );
                corpus
            }
            Err(e) => {
                error!(
                    source = self.source.name(),
                    error = %e,
                    "Corpus load failed, continuing with an empty corpus"
                );
                Corpus::default()
            }
        };

        let corpus = Arc::new(corpus);
        *slot = Some(Arc::clone(&corpus));
        corpus
    }

    /// Drop the cached corpus so the next `get` reloads
    pub async fn reset(&self) {
        self.slot.lock().await.take();
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Number of times the source has been asked to load
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingSource;

    #[async_trait]
    impl CorpusSource for FailingSource {
        async fn load(&self) -> SearchResult<Vec<Value>> {
            Err(SearchError::CorpusLoadFailed {
                source_name: "failing".to_string(),
                message: "unreachable".to_string(),
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn one_record() -> Vec<Value> {
        vec![json!({
            "id": "doc-1",
            "entityType": "document",
            "title": "Plumbing Permit",
            "updatedAt": "2024-03-02T08:00:00Z"
        })]
    }

    #[tokio::test]
    async fn test_loads_once_and_caches() {
        let cache = CorpusCache::new(Arc::new(StaticSource::new(one_record())));
        assert!(!cache.is_loaded().await);

        let first = cache.get().await;
        let second = cache.get().await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
        assert_eq!(cache.load_count(), 1);
    }

    #[tokio::test]
    async fn test_reset_forces_reload() {
        let cache = CorpusCache::new(Arc::new(StaticSource::new(one_record())));
        let first = cache.get().await;
        cache.reset().await;
        let second = cache.get().await;
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_yields_empty_corpus() {
        let cache = CorpusCache::new(Arc::new(FailingSource));
        let corpus = cache.get().await;
        assert!(corpus.is_empty());
        assert!(cache.is_loaded().await);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_load() {
        let cache = Arc::new(CorpusCache::new(Arc::new(StaticSource::new(one_record()))));
        let (a, b) = tokio::join!(cache.get(), cache.get());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn test_parse_corpus_shapes() {
        assert_eq!(parse_corpus("[]").unwrap().len(), 0);
        assert_eq!(parse_corpus(r#"{"records": [{}]}"#).unwrap().len(), 1);
        assert!(matches!(
            parse_corpus(r#"{"items": []}"#),
            Err(SearchError::InvalidCorpus(_))
        ));
        assert!(matches!(
            parse_corpus("not json"),
            Err(SearchError::SerializationError(_))
        ));
    }

    #[test]
    fn test_bundled_corpus_normalizes() {
        let source = StaticSource::bundled().unwrap();
        let corpus = Corpus::from_raw(source.records.clone());
        assert!(corpus.len() >= 10);
        assert_eq!(corpus.report.skipped, 0);
    }
}
