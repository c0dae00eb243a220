//! Revenue by industry and by account tier.

use super::group::{group_by, mean, sort_desc_by, sum};
use crate::{
    record::CampaignRecord,
    types::{AccountTier, Industry},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SegmentRow<K> {
    pub segment: K,
    pub campaigns: usize,
    pub total_revenue: f64,
    pub avg_revenue: f64,
    pub avg_margin_pct: f64,
    pub avg_cpm: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Segments {
    /// Sorted by total revenue, largest first.
    pub by_industry: Vec<SegmentRow<Industry>>,
    /// Sorted by total revenue, largest first.
    pub by_tier: Vec<SegmentRow<AccountTier>>,
}

impl Segments {
    /// Share of total revenue per tier, in percent, in `by_tier` order.
    pub fn tier_shares(&self) -> Vec<(AccountTier, f64)> {
        let total: f64 = self.by_tier.iter().map(|r| r.total_revenue).sum();
        self.by_tier
            .iter()
            .map(|r| (r.segment, super::group::ratio(r.total_revenue, total) * 100.0))
            .collect()
    }
}

pub fn compute(records: &[CampaignRecord]) -> Segments {
    Segments {
        by_industry: breakdown(records, |r| r.industry),
        by_tier: breakdown(records, |r| r.account_tier),
    }
}

fn breakdown<K: Ord + Copy>(
    records: &[CampaignRecord],
    key: impl Fn(&CampaignRecord) -> K,
) -> Vec<SegmentRow<K>> {
    let mut rows: Vec<SegmentRow<K>> = group_by(records, key)
        .into_iter()
        .map(|(segment, rows)| SegmentRow {
            segment,
            campaigns: rows.len(),
            total_revenue: sum(&rows, |r| r.actual_revenue),
            avg_revenue: mean(&rows, |r| r.actual_revenue),
            avg_margin_pct: mean(&rows, |r| r.margin_pct),
            avg_cpm: mean(&rows, |r| r.cpm),
        })
        .collect();
    sort_desc_by(&mut rows, |r| r.total_revenue);
    rows
}
