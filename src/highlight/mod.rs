//! Highlight overlay for displayed text
//!
//! This module provides:
//! - Word, amount and mixed highlight modes chosen the same way queries are matched
//! - Span collection over unescaped text, with already-marked ranges left untouched
//! - HTML escaping at render time, so markup is never injected from record text
//! - A bounded, FIFO-evicting memoization cache

pub mod cache;
pub mod modes;
pub mod spans;

pub use cache::{CacheStats, HighlightCache, HighlightConfig, Highlighter};
pub use modes::{
    collect_monetary_spans, collect_spans, collect_text_spans, highlight_for_query,
    highlight_hybrid, highlight_monetary, highlight_spans, highlight_terms, highlight_text,
    highlight_with_mode, is_boolean_query, HighlightMode,
};
pub use spans::{
    escape_html, parse_marked, render, unescape_html, HighlightSpan, MarkKind, MarkedText, SpanSet,
};
