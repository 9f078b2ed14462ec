//! Raw record normalization
//!
//! Corpus sources hand over loosely-shaped JSON. Normalization repairs what it
//! can (missing tags/metadata, non-scalar metadata values, stray tag types)
//! and skips what it cannot, so one malformed record never poisons a load.

use crate::models::SearchRecord;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Statistics from one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub accepted: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub dropped_metadata: usize,
}

/// Normalize a batch of raw JSON records into typed records.
///
/// Records that cannot be discriminated or deserialized are skipped with a
/// warning. Later records reusing an already-seen `id` are skipped too.
pub fn normalize_records(raw: Vec<Value>) -> (Vec<SearchRecord>, NormalizationReport) {
    let mut report = NormalizationReport::default();
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(raw.len());

    for (position, value) in raw.into_iter().enumerate() {
        let Value::Object(mut object) = value else {
            warn!(position, "Skipping corpus entry that is not a JSON object");
            report.skipped += 1;
            continue;
        };

        report.dropped_metadata += scrub_metadata(&mut object);
        scrub_tags(&mut object);

        match serde_json::from_value::<SearchRecord>(Value::Object(object)) {
            Ok(record) => {
                if !seen.insert(record.id.clone()) {
                    warn!(id = %record.id, "Skipping duplicate record id");
                    report.duplicates += 1;
                    continue;
                }
                records.push(record);
                report.accepted += 1;
            }
            Err(e) => {
                warn!(position, error = %e, "Skipping malformed record");
                report.skipped += 1;
            }
        }
    }

    debug!(
        accepted = report.accepted,
        skipped = report.skipped,
        duplicates = report.duplicates,
        dropped_metadata = report.dropped_metadata,
        "Normalized corpus"
    );

    (records, report)
}

/// Keep only scalar metadata entries; returns how many were dropped
fn scrub_metadata(object: &mut Map<String, Value>) -> usize {
    match object.get_mut("metadata") {
        Some(Value::Object(metadata)) => {
            let before = metadata.len();
            metadata.retain(|_, v| !matches!(v, Value::Array(_) | Value::Object(_)));
            before - metadata.len()
        }
        Some(Value::Null) | None => {
            object.remove("metadata");
            0
        }
        Some(_) => {
            object.remove("metadata");
            1
        }
    }
}

/// Keep only string tags; a non-array `tags` field is discarded
fn scrub_tags(object: &mut Map<String, Value>) {
    match object.get_mut("tags") {
        Some(Value::Array(tags)) => {
            tags.retain(|t| matches!(t, Value::String(s) if !s.trim().is_empty()));
        }
        Some(_) => {
            object.remove("tags");
        }
        None => {}
    }
}
