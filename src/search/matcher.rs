//! Per-record match decisions

use crate::models::{FinancialDetails, SearchRecord};
use crate::search::facets::{get_facet_value, FacetSelections};
use crate::search::monetary::{
    is_close_match, is_in_range, matches_monetary_string, DEFAULT_TOLERANCE,
};
use crate::search::query::{ClassifiedQuery, QueryMode};
use chrono::{DateTime, Utc};

/// Which numeric field of a financial record an amount came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    Total,
    LineItemTotal,
    UnitPrice,
}

/// Every amount a financial record exposes to monetary matching
pub fn amount_fields(financial: &FinancialDetails) -> Vec<(AmountField, f64)> {
    let mut fields = Vec::with_capacity(1 + financial.line_items.len() * 2);
    fields.push((AmountField::Total, financial.total_value));
    for item in &financial.line_items {
        fields.push((AmountField::LineItemTotal, item.line_item_total));
        fields.push((AmountField::UnitPrice, item.unit_price));
    }
    fields
}

/// Whether the record passes the query under its classified regime
pub fn matches_query(record: &SearchRecord, query: &ClassifiedQuery) -> bool {
    match query.mode {
        QueryMode::Empty => true,
        QueryMode::ExplicitMonetary => matches_monetary_query(record, query),
        QueryMode::Hybrid => matches_text(record, query) || matches_monetary_query(record, query),
        QueryMode::Plain => matches_text(record, query),
    }
}

/// Every case-folded token appears somewhere in the haystack
pub fn matches_text(record: &SearchRecord, query: &ClassifiedQuery) -> bool {
    if query.text_tokens.is_empty() {
        return true;
    }
    let haystack = record.haystack();
    query
        .text_tokens
        .iter()
        .all(|token| haystack.contains(token.as_str()))
}

/// Monetary match against totals, line-item totals and unit prices.
///
/// Only financial records qualify. A range query is decided by range
/// membership alone. Discrete amounts try tolerance equality first, then the
/// string ladder. Non-explicit queries may also match when every residual
/// text token appears in one line item's title and type.
pub fn matches_monetary_query(record: &SearchRecord, query: &ClassifiedQuery) -> bool {
    let Some(financial) = record.financial() else {
        return false;
    };
    let tokens = &query.monetary;

    if query.is_explicit() && tokens.is_empty() {
        return true;
    }

    let fields = amount_fields(financial);

    if let Some(range) = &tokens.range {
        return fields.iter().any(|(_, value)| is_in_range(*value, range));
    }

    let close = tokens.amounts.iter().any(|amount| {
        fields
            .iter()
            .any(|(_, value)| is_close_match(amount.value, *value, DEFAULT_TOLERANCE))
    });
    if close {
        return true;
    }

    let prefix = tokens.amounts.iter().any(|amount| {
        fields
            .iter()
            .any(|(_, value)| matches_monetary_string(&amount.raw, *value))
    });
    if prefix {
        return true;
    }

    !query.is_explicit()
        && !tokens.text_tokens.is_empty()
        && financial.line_items.iter().any(|item| {
            let text = format!("{} {}", item.title, item.line_item_type).to_lowercase();
            tokens
                .text_tokens
                .iter()
                .all(|token| text.contains(token.as_str()))
        })
}

/// AND across active keys, OR within a key.
///
/// A key whose value is undefined for this record does not constrain it; a
/// blank project, status or client is defined and matches no selection.
pub fn matches_selections(
    record: &SearchRecord,
    selections: &FacetSelections,
    now: DateTime<Utc>,
) -> bool {
    selections.active_filters().all(|(key, values)| {
        match get_facet_value(record, key, now) {
            Some(value) => values.contains(&value),
            None => true,
        }
    })
}
