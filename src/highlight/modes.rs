//! The three highlight modes
//!
//! Mode selection mirrors matching: a `$` query highlights amounts only, a
//! query with digits highlights amounts and words, anything else highlights
//! words.

use crate::highlight::spans::{parse_marked, render, HighlightSpan, MarkKind, SpanSet};
use crate::search::monetary::rules::comma_amount;
use crate::search::monetary::{
    is_close_match, is_in_range, matches_monetary_string, DEFAULT_TOLERANCE,
};
use crate::search::{ClassifiedQuery, QueryMode};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$?\d+(?:,\d{3})*(?:\.\d+)?")
        .unwrap_or_else(|e| panic!("invalid amount pattern: {e}"))
});

const BOOLEAN_OPERATORS: [&str; 3] = ["AND", "OR", "NOT"];

/// Highlight strategy for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum HighlightMode {
    Plain,
    Monetary,
    Hybrid,
}

impl HighlightMode {
    /// `None` for a blank query
    pub fn for_query(query: &ClassifiedQuery) -> Option<Self> {
        match query.mode {
            QueryMode::Empty => None,
            QueryMode::ExplicitMonetary => Some(HighlightMode::Monetary),
            QueryMode::Hybrid => Some(HighlightMode::Hybrid),
            QueryMode::Plain => Some(HighlightMode::Plain),
        }
    }
}

/// Whether the query uses `AND`, `OR` or `NOT` as standalone words
pub fn is_boolean_query(query: &str) -> bool {
    query
        .split_whitespace()
        .any(|word| BOOLEAN_OPERATORS.contains(&word))
}

/// Terms to highlight, duplicates removed, longest first.
///
/// Operators are stripped in any case once the query is detected as boolean;
/// otherwise `and`, `or` and `not` are ordinary words.
pub fn highlight_terms(query: &str) -> Vec<String> {
    let boolean = is_boolean_query(query);
    let is_operator =
        |word: &str| BOOLEAN_OPERATORS.iter().any(|op| op.eq_ignore_ascii_case(word));

    let mut terms: Vec<String> = query
        .split_whitespace()
        .filter(|word| !(boolean && is_operator(*word)))
        .map(|word| word.trim_matches(|c| matches!(c, '"' | '(' | ')')).to_lowercase())
        .filter(|word| !word.is_empty())
        .collect();

    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    terms.dedup();
    terms
}

/// Claim every case-insensitive occurrence of each term
pub fn collect_text_spans(text: &str, terms: &[String], claimed: &mut SpanSet) {
    for term in terms {
        let Ok(re) = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        else {
            continue;
        };
        for m in re.find_iter(text) {
            claimed.claim(m.start(), m.end(), MarkKind::Text);
        }
    }
}

/// An amount written in the text
#[derive(Debug, Clone, PartialEq)]
struct AmountOccurrence {
    start: usize,
    end: usize,
    value: f64,
}

fn find_amounts(text: &str) -> Vec<AmountOccurrence> {
    AMOUNT_RE
        .find_iter(text)
        .filter_map(|m| {
            let digits: String = m
                .as_str()
                .chars()
                .filter(|c| *c != '$' && *c != ',')
                .collect();
            let value = digits.parse::<f64>().ok()?;
            Some(AmountOccurrence {
                start: m.start(),
                end: m.end(),
                value,
            })
        })
        .collect()
}

/// Claim amount spans in priority order.
///
/// Comma-pattern prefixes first. Exact amounts next, unless a comma pattern
/// fired. Partial ladder matches next, unless the query is explicit and an
/// exact or comma match fired. Range members last. A stage "fires" when it
/// finds a match, whether or not the range was still free, so re-highlighting
/// marked output makes the same decisions.
pub fn collect_monetary_spans(text: &str, query: &ClassifiedQuery, claimed: &mut SpanSet) {
    let tokens = &query.monetary;
    let occurrences = find_amounts(text);
    if occurrences.is_empty() {
        return;
    }

    let mut comma_fired = false;
    for amount in tokens
        .amounts
        .iter()
        .filter(|a| a.raw.contains(',') && !a.raw.contains('.'))
    {
        for occ in &occurrences {
            if comma_amount(occ.value).starts_with(&amount.raw) {
                comma_fired = true;
                let kind = if is_close_match(amount.value, occ.value, DEFAULT_TOLERANCE) {
                    MarkKind::MonetaryExact
                } else {
                    MarkKind::MonetaryPartial
                };
                claimed.claim(occ.start, occ.end, kind);
            }
        }
    }

    let mut exact_fired = false;
    if !comma_fired {
        for amount in &tokens.amounts {
            for occ in &occurrences {
                if is_close_match(amount.value, occ.value, DEFAULT_TOLERANCE) {
                    exact_fired = true;
                    claimed.claim(occ.start, occ.end, MarkKind::MonetaryExact);
                }
            }
        }
    }

    if !(query.is_explicit() && (exact_fired || comma_fired)) {
        for amount in &tokens.amounts {
            for occ in &occurrences {
                if matches_monetary_string(&amount.raw, occ.value) {
                    claimed.claim(occ.start, occ.end, MarkKind::MonetaryPartial);
                }
            }
        }
    }

    if let Some(range) = &tokens.range {
        for occ in &occurrences {
            if is_in_range(occ.value, range) {
                claimed.claim(occ.start, occ.end, MarkKind::MonetaryExact);
            }
        }
    }
}

/// Spans for `text` under `mode`, on top of any already-marked spans
pub fn collect_spans(
    text: &str,
    existing: Vec<HighlightSpan>,
    query: &ClassifiedQuery,
    mode: HighlightMode,
) -> Vec<HighlightSpan> {
    let mut claimed = SpanSet::with_claimed(existing);

    match mode {
        HighlightMode::Plain => {
            collect_text_spans(text, &highlight_terms(&query.raw), &mut claimed);
        }
        HighlightMode::Monetary => {
            collect_monetary_spans(text, query, &mut claimed);
        }
        HighlightMode::Hybrid => {
            collect_monetary_spans(text, query, &mut claimed);
            collect_text_spans(text, &highlight_terms(&query.raw), &mut claimed);
        }
    }

    claimed.into_sorted()
}

/// Plain text and spans for a query, as an alternative to markup
pub fn highlight_spans(text: &str, query: &str) -> (String, Vec<HighlightSpan>) {
    let marked = parse_marked(text);
    let classified = ClassifiedQuery::classify(query);
    let spans = match HighlightMode::for_query(&classified) {
        Some(mode) => collect_spans(&marked.text, marked.spans, &classified, mode),
        None => marked.spans,
    };
    (marked.text, spans)
}

/// Highlight with a known mode; blank queries only re-render existing marks
pub fn highlight_with_mode(text: &str, query: &ClassifiedQuery, mode: Option<HighlightMode>) -> String {
    let marked = parse_marked(text);
    let spans = match mode {
        Some(mode) => collect_spans(&marked.text, marked.spans, query, mode),
        None => marked.spans,
    };
    render(&marked.text, &spans)
}

/// Word highlighting
pub fn highlight_text(text: &str, query: &str) -> String {
    let classified = ClassifiedQuery::classify(query);
    highlight_with_mode(text, &classified, Some(HighlightMode::Plain))
}

/// Amount highlighting for `$` queries
pub fn highlight_monetary(text: &str, query: &str) -> String {
    let classified = ClassifiedQuery::classify(query);
    highlight_with_mode(text, &classified, Some(HighlightMode::Monetary))
}

/// Amount then word highlighting for digit queries without `$`
pub fn highlight_hybrid(text: &str, query: &str) -> String {
    let classified = ClassifiedQuery::classify(query);
    highlight_with_mode(text, &classified, Some(HighlightMode::Hybrid))
}

/// Highlight using the mode the query classifies into
pub fn highlight_for_query(text: &str, query: &str) -> String {
    let classified = ClassifiedQuery::classify(query);
    let mode = HighlightMode::for_query(&classified);
    highlight_with_mode(text, &classified, mode)
}
