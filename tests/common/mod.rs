//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use record_search::models::{
    DocumentDetails, FinancialDetails, LineItem, RecordDetails, SearchRecord,
};
use record_search::search::{parse_corpus, Corpus, BUNDLED_CORPUS};
use std::sync::Arc;

/// Fixed clock for date-bucket facets
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// The bundled sample corpus, normalized
pub fn bundled_corpus() -> Corpus {
    Corpus::from_raw(parse_corpus(BUNDLED_CORPUS).unwrap())
}

pub fn bill(id: &str, total: f64) -> SearchRecord {
    SearchRecord::new(
        id,
        format!("Bill {}", id),
        now(),
        RecordDetails::Bill(FinancialDetails::new(
            total,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )),
    )
}

pub fn bill_with_line(id: &str, total: f64, item: LineItem) -> SearchRecord {
    SearchRecord::new(
        id,
        format!("Bill {}", id),
        now(),
        RecordDetails::Bill(
            FinancialDetails::new(total, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
                .with_line_item(item),
        ),
    )
}

pub fn document(id: &str, title: &str) -> SearchRecord {
    SearchRecord::new(
        id,
        title,
        now(),
        RecordDetails::Document(DocumentDetails {
            document_type: "Report".to_string(),
            author: "Ana Silva".to_string(),
        }),
    )
}

pub fn shared(records: Vec<SearchRecord>) -> Vec<Arc<SearchRecord>> {
    records.into_iter().map(Arc::new).collect()
}
