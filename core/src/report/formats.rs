//! Ad format performance, ranked by average CPM.

use super::group::{group_by, mean, sort_desc_by, sum};
use crate::{record::CampaignRecord, types::AdFormat};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FormatRow {
    pub ad_format: AdFormat,
    pub campaigns: usize,
    pub avg_cpm: f64,
    /// Mean of per-row CTR, as a fraction.
    pub avg_ctr: f64,
    pub total_revenue: f64,
    pub avg_margin_pct: f64,
    /// Mean delivery rate, as a fraction.
    pub avg_delivery_rate: f64,
}

pub fn compute(records: &[CampaignRecord]) -> Vec<FormatRow> {
    let mut rows: Vec<FormatRow> = group_by(records, |r| r.ad_format)
        .into_iter()
        .map(|(ad_format, rows)| FormatRow {
            ad_format,
            campaigns: rows.len(),
            avg_cpm: mean(&rows, |r| r.cpm),
            avg_ctr: mean(&rows, |r| r.ctr),
            total_revenue: sum(&rows, |r| r.actual_revenue),
            avg_margin_pct: mean(&rows, |r| r.margin_pct),
            avg_delivery_rate: mean(&rows, |r| r.delivery_rate),
        })
        .collect();
    sort_desc_by(&mut rows, |r| r.avg_cpm);
    rows
}
