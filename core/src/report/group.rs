//! Group-by and reduction helpers shared by every aggregate view.

use crate::record::CampaignRecord;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Partition rows by key. Keys come back in their natural order,
/// which for the categorical enums is declaration order.
pub fn group_by<'a, K: Ord>(
    records: &'a [CampaignRecord],
    key: impl Fn(&CampaignRecord) -> K,
) -> BTreeMap<K, Vec<&'a CampaignRecord>> {
    let mut groups: BTreeMap<K, Vec<&'a CampaignRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(key(r)).or_default().push(r);
    }
    groups
}

pub fn sum(rows: &[&CampaignRecord], field: impl Fn(&CampaignRecord) -> f64) -> f64 {
    rows.iter().map(|r| field(r)).sum()
}

/// Arithmetic mean; 0 for an empty group.
pub fn mean(rows: &[&CampaignRecord], field: impl Fn(&CampaignRecord) -> f64) -> f64 {
    if rows.is_empty() {
        0.0
    } else {
        sum(rows, field) / rows.len() as f64
    }
}

/// `num / den`, or 0 when the denominator is 0.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// `(actual - budget) / budget × 100`, or 0 when the budget is 0.
pub fn variance_pct(actual: f64, budget: f64) -> f64 {
    ratio(actual - budget, budget) * 100.0
}

/// Stable sort, largest key first.
pub fn sort_desc_by<T>(rows: &mut [T], key: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
}

pub fn all_rows(records: &[CampaignRecord]) -> Vec<&CampaignRecord> {
    records.iter().collect()
}
