//! Bounded memoization for highlight output

use crate::highlight::modes::{highlight_with_mode, HighlightMode};
use crate::search::ClassifiedQuery;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use validator::Validate;

/// Highlight cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HighlightConfig {
    /// Entries kept before the oldest is evicted
    #[validate(range(min = 1, max = 100_000))]
    pub cache_capacity: usize,

    /// Characters of the text included verbatim in the cache key
    #[validate(range(min = 1, max = 1_024))]
    pub cache_prefix_chars: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 500,
            cache_prefix_chars: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    mode: HighlightMode,
    text_len: usize,
    query: String,
    prefix: String,
    /// Hash of the full text, so texts sharing a prefix and length never collide
    digest: u64,
}

impl CacheKey {
    fn new(mode: HighlightMode, text: &str, query: &str, prefix_chars: usize) -> Self {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        Self {
            mode,
            text_len: text.len(),
            query: query.to_string(),
            prefix: text.chars().take(prefix_chars).collect(),
            digest: hasher.finish(),
        }
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, String>,
    order: VecDeque<CacheKey>,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// FIFO-evicting highlight cache
pub struct HighlightCache {
    config: HighlightConfig,
    state: Mutex<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl HighlightCache {
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            config,
            state: Mutex::new(CacheState::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached markup, computing and inserting it on a miss
    pub fn get_or_insert_with<F>(&self, mode: HighlightMode, text: &str, query: &str, compute: F) -> String
    where
        F: FnOnce() -> String,
    {
        let key = CacheKey::new(mode, text, query, self.config.cache_prefix_chars);

        if let Some(hit) = self.state.lock().entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit.clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let value = compute();

        let mut state = self.state.lock();
        if !state.entries.contains_key(&key) {
            state.order.push_back(key.clone());
        }
        state.entries.insert(key, value.clone());
        while state.entries.len() > self.config.cache_capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
        }

        value
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        let dropped = state.entries.len();
        state.entries.clear();
        state.order.clear();
        debug!(dropped, "Highlight cache cleared");
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Query-aware highlighter backed by a [`HighlightCache`]
pub struct Highlighter {
    cache: HighlightCache,
}

impl Highlighter {
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            cache: HighlightCache::new(config),
        }
    }

    /// Highlight `text` in the mode `query` classifies into
    pub fn highlight(&self, text: &str, query: &str) -> String {
        let classified = ClassifiedQuery::classify(query);
        match HighlightMode::for_query(&classified) {
            Some(mode) => self.cache.get_or_insert_with(mode, text, query.trim(), || {
                highlight_with_mode(text, &classified, Some(mode))
            }),
            None => highlight_with_mode(text, &classified, None),
        }
    }

    /// Drop all memoized output, e.g. when returning to an empty search
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &HighlightCache {
        &self.cache
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(HighlightConfig::default())
    }
}
