//! Result grouping and per-group limiting

use crate::models::{EntityType, SearchRecord};
use crate::search::config::GroupLimits;
use crate::search::facets::GroupBy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Arc;

/// Fallback cap when neither a per-type nor a default limit is configured
pub const HARD_GROUP_LIMIT: usize = 5;

/// Label for records whose grouping field is blank
pub const UNSPECIFIED_GROUP: &str = "Unspecified";

/// A partition of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultGroup {
    pub key: String,
    /// Most frequent member type; used for labelling
    pub entity_type: EntityType,
    pub items: Vec<Arc<SearchRecord>>,
}

/// Partition ordered results, preserving their order inside each group
pub fn group_results(records: &[Arc<SearchRecord>], group_by: GroupBy) -> Vec<ResultGroup> {
    let mut buckets: Vec<(String, Vec<Arc<SearchRecord>>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = group_key(record, group_by);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            buckets.push((key, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(Arc::clone(record));
    }

    let mut groups: Vec<ResultGroup> = buckets
        .into_iter()
        .filter_map(|(key, items)| {
            let entity_type = dominant_entity_type(&items)?;
            Some(ResultGroup {
                key,
                entity_type,
                items,
            })
        })
        .collect();

    match group_by {
        GroupBy::None | GroupBy::Type => groups.sort_by(|a, b| compare_type_keys(&a.key, &b.key)),
        GroupBy::Project | GroupBy::Status | GroupBy::Client => {
            groups.sort_by(|a, b| a.key.cmp(&b.key))
        }
    }

    groups
}

/// Truncate each group for the compact view and drop groups left empty
pub fn limit_groups(groups: &[ResultGroup], limits: &GroupLimits) -> Vec<ResultGroup> {
    groups
        .iter()
        .filter_map(|group| {
            let cap = limits.limit_for(group.entity_type);
            let items: Vec<Arc<SearchRecord>> = group.items.iter().take(cap).cloned().collect();
            (!items.is_empty()).then(|| ResultGroup {
                key: group.key.clone(),
                entity_type: group.entity_type,
                items,
            })
        })
        .collect()
}

fn group_key(record: &SearchRecord, group_by: GroupBy) -> String {
    let literal = match group_by {
        GroupBy::None | GroupBy::Type => return record.entity_type().to_string(),
        GroupBy::Project => &record.project,
        GroupBy::Status => &record.status,
        GroupBy::Client => &record.client,
    };
    if literal.is_empty() {
        UNSPECIFIED_GROUP.to_string()
    } else {
        literal.clone()
    }
}

/// Canonical priority for known type names, unknown names after by name
fn compare_type_keys(a: &str, b: &str) -> std::cmp::Ordering {
    let rank = |key: &str| EntityType::from_str(key).map(|t| t.priority()).unwrap_or(usize::MAX);
    rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
}

/// Most frequent type; ties go to the type seen first
fn dominant_entity_type(items: &[Arc<SearchRecord>]) -> Option<EntityType> {
    let mut counts: BTreeMap<EntityType, (usize, usize)> = BTreeMap::new();
    for (position, record) in items.iter().enumerate() {
        let entry = counts.entry(record.entity_type()).or_insert((0, position));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then_with(|| first_b.cmp(first_a))
        })
        .map(|(entity_type, _)| entity_type)
}
