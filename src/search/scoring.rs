//! Relevance scoring and result ordering

use crate::models::SearchRecord;
use crate::search::matcher::{amount_fields, AmountField};
use crate::search::monetary::{
    is_close_match, is_in_range, matches_monetary_string, AmountRange, DEFAULT_TOLERANCE,
    LOOSE_TOLERANCE,
};
use crate::search::query::{ClassifiedQuery, QueryMode};
use std::cmp::Reverse;
use std::sync::Arc;

const TITLE_CONTAINS_QUERY: u32 = 100;
const TITLE_PHRASE_BONUS: u32 = 50;
const TITLE_TOKEN: u32 = 20;
const SUMMARY_CONTAINS_QUERY: u32 = 25;
const SUMMARY_TOKEN: u32 = 10;
const HAYSTACK_TOKEN: u32 = 5;

const LINE_ITEM_TEXT_BONUS: u32 = 50;
const TITLE_TEXT_BONUS: u32 = 10;
const SUMMARY_TEXT_BONUS: u32 = 5;

/// Score ceilings for one amount field
struct FieldWeights {
    /// Exact, within 0.01, within 1.00
    tiers: [u32; 3],
    range_ceiling: u32,
    prefix_bonus: u32,
}

const fn weights(field: AmountField) -> FieldWeights {
    match field {
        AmountField::Total => FieldWeights {
            tiers: [1000, 800, 600],
            range_ceiling: 800,
            prefix_bonus: 750,
        },
        AmountField::LineItemTotal => FieldWeights {
            tiers: [900, 700, 500],
            range_ceiling: 700,
            prefix_bonus: 650,
        },
        AmountField::UnitPrice => FieldWeights {
            tiers: [800, 600, 400],
            range_ceiling: 600,
            prefix_bonus: 550,
        },
    }
}

/// A record with its relevance score
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: Arc<SearchRecord>,
    pub score: u32,
}

/// Score one record under the query's regime
pub fn score_record(record: &SearchRecord, query: &ClassifiedQuery) -> u32 {
    match query.mode {
        QueryMode::Empty => 0,
        QueryMode::ExplicitMonetary => monetary_score(record, query),
        QueryMode::Hybrid => match text_score(record, query) {
            0 => monetary_score(record, query),
            score => score,
        },
        QueryMode::Plain => text_score(record, query),
    }
}

/// Title, summary and haystack hits
pub fn text_score(record: &SearchRecord, query: &ClassifiedQuery) -> u32 {
    if query.phrase.is_empty() {
        return 0;
    }

    let title = record.title.to_lowercase();
    let summary = record.summary.to_lowercase();
    let haystack = record.haystack();
    let mut score = 0;

    if title.contains(&query.phrase) {
        score += TITLE_CONTAINS_QUERY + TITLE_PHRASE_BONUS;
    }
    if summary.contains(&query.phrase) {
        score += SUMMARY_CONTAINS_QUERY;
    }

    for token in &query.text_tokens {
        if title.contains(token.as_str()) {
            score += TITLE_TOKEN;
        }
        if summary.contains(token.as_str()) {
            score += SUMMARY_TOKEN;
        }
        if haystack.contains(token.as_str()) {
            score += HAYSTACK_TOKEN;
        }
    }

    score
}

/// Best numeric tier plus best prefix bonus plus residual text bonuses.
///
/// Zero for non-financial records and for plain queries.
pub fn monetary_score(record: &SearchRecord, query: &ClassifiedQuery) -> u32 {
    let Some(financial) = record.financial() else {
        return 0;
    };
    if !query.has_monetary_potential() {
        return 0;
    }

    let fields = amount_fields(financial);
    let tokens = &query.monetary;

    if let Some(range) = &tokens.range {
        return fields
            .iter()
            .map(|(field, value)| range_score(*value, range, weights(*field).range_ceiling))
            .max()
            .unwrap_or(0);
    }

    let mut numeric = 0;
    let mut prefix = 0;
    for amount in &tokens.amounts {
        for (field, value) in &fields {
            let field_weights = weights(*field);
            numeric = numeric.max(tier_score(amount.value, *value, &field_weights.tiers));
            if matches_monetary_string(&amount.raw, *value) {
                prefix = prefix.max(field_weights.prefix_bonus);
            }
        }
    }

    let mut text_bonus = 0;
    if !query.is_explicit() {
        let title = record.title.to_lowercase();
        let summary = record.summary.to_lowercase();
        for token in &tokens.text_tokens {
            for item in &financial.line_items {
                let item_text = format!("{} {}", item.title, item.line_item_type).to_lowercase();
                if item_text.contains(token.as_str()) {
                    text_bonus += LINE_ITEM_TEXT_BONUS;
                }
            }
            if title.contains(token.as_str()) {
                text_bonus += TITLE_TEXT_BONUS;
            }
            if summary.contains(token.as_str()) {
                text_bonus += SUMMARY_TEXT_BONUS;
            }
        }
    }

    numeric + prefix + text_bonus
}

fn tier_score(query: f64, value: f64, tiers: &[u32; 3]) -> u32 {
    if is_close_match(query, value, 0.0) {
        tiers[0]
    } else if is_close_match(query, value, DEFAULT_TOLERANCE) {
        tiers[1]
    } else if is_close_match(query, value, LOOSE_TOLERANCE) {
        tiers[2]
    } else {
        0
    }
}

/// Linear falloff from the ceiling at the midpoint to half of it at the edges
fn range_score(value: f64, range: &AmountRange, ceiling: u32) -> u32 {
    if !is_in_range(value, range) {
        return 0;
    }
    let half = range.half_width();
    if half <= 0.0 {
        return ceiling;
    }
    let distance = (value - range.midpoint()).abs() / half;
    (ceiling as f64 * (1.0 - 0.5 * distance)).round() as u32
}

/// Score and order records: score descending, then most recently updated.
///
/// An empty query skips scoring and orders purely by recency.
pub fn rank_records(records: Vec<Arc<SearchRecord>>, query: &ClassifiedQuery) -> Vec<ScoredRecord> {
    let mut scored: Vec<ScoredRecord> = records
        .into_iter()
        .map(|record| {
            let score = if query.is_empty() {
                0
            } else {
                score_record(&record, query)
            };
            ScoredRecord { record, score }
        })
        .collect();

    scored.sort_by_key(|s| (Reverse(s.score), Reverse(s.record.updated_at)));
    scored
}
