//! Query classification
//!
//! A query is classified exactly once; matching, scoring and highlighting all
//! read the same [`ClassifiedQuery`] so they can never disagree on the regime.

use crate::search::monetary::{
    extract_monetary_tokens, has_monetary_potential, parse_monetary_query, MonetaryTokens,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Matching regime of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum QueryMode {
    /// Blank query: everything matches, sorted by recency
    Empty,
    /// Leading `$`: numeric fields only
    ExplicitMonetary,
    /// Digits without `$`: text first, monetary fallback
    Hybrid,
    /// Text only
    Plain,
}

/// A query with its regime and pre-computed token views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedQuery {
    /// Query as typed
    pub raw: String,

    pub mode: QueryMode,

    /// Case-folded whole query, used for phrase bonuses
    pub phrase: String,

    /// Case-folded whitespace tokens
    pub text_tokens: Vec<String>,

    /// Monetary view; empty for plain queries
    pub monetary: MonetaryTokens,
}

impl ClassifiedQuery {
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        let phrase = trimmed.to_lowercase();
        let text_tokens: Vec<String> = phrase.split_whitespace().map(str::to_string).collect();

        if trimmed.is_empty() {
            return Self {
                raw: raw.to_string(),
                mode: QueryMode::Empty,
                phrase,
                text_tokens,
                monetary: MonetaryTokens::default(),
            };
        }

        let parsed = parse_monetary_query(trimmed);
        let (mode, monetary) = if parsed.is_explicit {
            (
                QueryMode::ExplicitMonetary,
                extract_monetary_tokens(&parsed.text),
            )
        } else if has_monetary_potential(trimmed) {
            (QueryMode::Hybrid, extract_monetary_tokens(trimmed))
        } else {
            (QueryMode::Plain, MonetaryTokens::default())
        };

        Self {
            raw: raw.to_string(),
            mode,
            phrase,
            text_tokens,
            monetary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mode == QueryMode::Empty
    }

    pub fn is_explicit(&self) -> bool {
        self.mode == QueryMode::ExplicitMonetary
    }

    /// Whether monetary scoring applies at all.
    ///
    /// True for explicit queries and for any query with a digit in some
    /// token, even when no token parses as an amount (`inv-204`).
    pub fn has_monetary_potential(&self) -> bool {
        matches!(self.mode, QueryMode::ExplicitMonetary | QueryMode::Hybrid)
    }
}
