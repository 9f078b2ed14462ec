//! Facet keys, selections and aggregation

use crate::models::{RecordDetails, SearchRecord};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Facet dimensions, in sidebar order
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FacetKey {
    EntityType,
    Project,
    Status,
    Client,
    DocumentType,
    DateRange,
    ValueRange,
    /// Associated organization, people only
    Organization,
    /// Trade focus, organizations only
    TradeFocus,
    /// Display grouping; configures the view rather than filtering
    GroupBy,
}

impl FacetKey {
    /// Keys that filter records
    pub fn filter_keys() -> impl Iterator<Item = FacetKey> {
        FacetKey::iter().filter(|k| *k != FacetKey::GroupBy)
    }
}

/// Grouping dimension selected through the `groupBy` facet
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum GroupBy {
    #[default]
    None,
    Type,
    Project,
    Status,
    Client,
}

/// One value of a facet and how many filtered records carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Facet key to value counts
pub type Facets = BTreeMap<FacetKey, Vec<FacetCount>>;

/// Selected values per facet key.
///
/// AND across keys, OR within a key. `groupBy` holds at most one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetSelections {
    selected: BTreeMap<FacetKey, BTreeSet<String>>,
}

impl FacetSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FacetSelections::select`]
    pub fn with(mut self, key: FacetKey, value: impl Into<String>) -> Self {
        self.select(key, value);
        self
    }

    /// Add a value; for `groupBy` the value replaces any previous one
    pub fn select(&mut self, key: FacetKey, value: impl Into<String>) {
        let values = self.selected.entry(key).or_default();
        if key == FacetKey::GroupBy {
            values.clear();
        }
        values.insert(value.into());
    }

    /// Flip a value on or off
    pub fn toggle(&mut self, key: FacetKey, value: &str) {
        if self.is_selected(key, value) {
            self.deselect(key, value);
        } else {
            self.select(key, value.to_string());
        }
    }

    pub fn deselect(&mut self, key: FacetKey, value: &str) {
        if let Some(values) = self.selected.get_mut(&key) {
            values.remove(value);
            if values.is_empty() {
                self.selected.remove(&key);
            }
        }
    }

    pub fn clear_key(&mut self, key: FacetKey) {
        self.selected.remove(&key);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, key: FacetKey, value: &str) -> bool {
        self.selected
            .get(&key)
            .is_some_and(|values| values.contains(value))
    }

    pub fn values(&self, key: FacetKey) -> Option<&BTreeSet<String>> {
        self.selected.get(&key).filter(|values| !values.is_empty())
    }

    /// Active filter keys with their value sets; `groupBy` excluded
    pub fn active_filters(&self) -> impl Iterator<Item = (FacetKey, &BTreeSet<String>)> {
        self.selected
            .iter()
            .filter(|(key, values)| **key != FacetKey::GroupBy && !values.is_empty())
            .map(|(key, values)| (*key, values))
    }

    /// Selected grouping; unknown names fall back to `None`
    pub fn group_by(&self) -> GroupBy {
        self.values(FacetKey::GroupBy)
            .and_then(|values| values.iter().next())
            .and_then(|name| name.parse().ok())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.values().all(BTreeSet::is_empty)
    }
}

/// Issued-date buckets, upper bound in days
const DATE_BUCKETS: [(i64, &str); 6] = [
    (7, "Last 7 days"),
    (30, "Last 30 days"),
    (90, "Last 3 months"),
    (180, "Last 6 months"),
    (365, "Last year"),
    (730, "Last 2 years"),
];

const DATE_BUCKET_OLDER: &str = "Older";

pub fn date_bucket(issued: NaiveDate, now: DateTime<Utc>) -> &'static str {
    let age_days = (now.date_naive() - issued).num_days();
    DATE_BUCKETS
        .iter()
        .find(|(limit, _)| age_days <= *limit)
        .map(|(_, label)| *label)
        .unwrap_or(DATE_BUCKET_OLDER)
}

pub fn value_band(total: f64) -> &'static str {
    if total < 10_000.0 {
        "Under $10K"
    } else if total < 50_000.0 {
        "$10K - $50K"
    } else if total < 100_000.0 {
        "$50K - $100K"
    } else {
        "$100K+"
    }
}

/// Project a record onto a facet dimension.
///
/// Project, status and client are projected verbatim, so a blank value is
/// still a value and fails any selection on that key. `None` means the
/// dimension does not apply to this record: it is skipped by selection
/// filtering and not counted during aggregation.
pub fn get_facet_value(record: &SearchRecord, key: FacetKey, now: DateTime<Utc>) -> Option<String> {
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

    match key {
        FacetKey::EntityType => Some(record.entity_type().to_string()),
        FacetKey::Project => Some(record.project.clone()),
        FacetKey::Status => Some(record.status.clone()),
        FacetKey::Client => Some(record.client.clone()),
        FacetKey::DocumentType => match &record.details {
            RecordDetails::Document(doc) => non_empty(&doc.document_type),
            _ => None,
        },
        FacetKey::DateRange => record
            .financial()
            .map(|f| date_bucket(f.issued_date, now).to_string()),
        FacetKey::ValueRange => record
            .financial()
            .map(|f| value_band(f.total_value).to_string()),
        FacetKey::Organization => match &record.details {
            RecordDetails::Person(person) => person
                .associated_organization
                .as_deref()
                .and_then(non_empty),
            _ => None,
        },
        FacetKey::TradeFocus => match &record.details {
            RecordDetails::Organization(org) => org.trade_focus.as_deref().and_then(non_empty),
            _ => None,
        },
        FacetKey::GroupBy => None,
    }
}

/// Count facet values over an already-filtered record set.
///
/// Blank values are not offered as facet entries.
pub fn compute_facets(records: &[Arc<SearchRecord>], now: DateTime<Utc>) -> Facets {
    let mut facets = Facets::new();

    for key in FacetKey::filter_keys() {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in records {
            if let Some(value) = get_facet_value(record, key, now).filter(|v| !v.is_empty()) {
                *counts.entry(value).or_insert(0) += 1;
            }
        }

        let mut values: Vec<FacetCount> = counts
            .into_iter()
            .map(|(value, count)| FacetCount { value, count })
            .collect();
        values.sort_by(|a, b| {
            Reverse(a.count)
                .cmp(&Reverse(b.count))
                .then_with(|| a.value.cmp(&b.value))
        });
        facets.insert(key, values);
    }

    facets.insert(
        FacetKey::GroupBy,
        GroupBy::iter()
            .map(|g| FacetCount {
                value: g.to_string(),
                count: records.len(),
            })
            .collect(),
    );

    facets
}
