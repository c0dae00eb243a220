//! KPI dashboard metrics: rates, scale counts and platform performance.

use super::group::{all_rows, group_by, mean, ratio, sort_desc_by, sum};
use super::overview::distinct;
use crate::{
    record::CampaignRecord,
    types::{DealStatus, PaymentStatus, Platform},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PlatformRow {
    pub platform: Platform,
    pub campaigns: usize,
    pub revenue: f64,
    pub avg_ctr: f64,
    pub avg_cpm: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DealStatusCount {
    pub deal_status: DealStatus,
    pub campaigns: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Kpis {
    /// Total clicks over total impressions, as a fraction.
    pub overall_ctr: f64,
    pub revenue_per_campaign: f64,
    /// Fraction of rows that are Closed Won.
    pub win_rate: f64,
    /// Fraction of rows whose payment is Overdue.
    pub overdue_rate: f64,
    pub avg_delivery_rate: f64,
    pub avg_margin_pct: f64,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub campaigns: usize,
    pub unique_advertisers: usize,
    /// Sorted by revenue, largest first.
    pub platforms: Vec<PlatformRow>,
    /// Sorted by count, largest first.
    pub deal_status_counts: Vec<DealStatusCount>,
}

impl Kpis {
    /// Share of total revenue per platform, in percent, in `platforms` order.
    pub fn platform_shares(&self) -> Vec<(Platform, f64)> {
        let total: f64 = self.platforms.iter().map(|p| p.revenue).sum();
        self.platforms
            .iter()
            .map(|p| (p.platform, ratio(p.revenue, total) * 100.0))
            .collect()
    }
}

pub fn compute(records: &[CampaignRecord]) -> Kpis {
    let rows = all_rows(records);
    let n = records.len() as f64;
    let total_impressions: u64 = records.iter().map(|r| r.impressions).sum();
    let total_clicks: u64 = records.iter().map(|r| r.clicks).sum();

    let won = records.iter().filter(|r| r.deal_status == DealStatus::ClosedWon).count();
    let overdue = records
        .iter()
        .filter(|r| r.payment_status == PaymentStatus::Overdue)
        .count();

    let mut platforms: Vec<PlatformRow> = group_by(records, |r| r.platform)
        .into_iter()
        .map(|(platform, rows)| PlatformRow {
            platform,
            campaigns: rows.len(),
            revenue: sum(&rows, |r| r.actual_revenue),
            avg_ctr: mean(&rows, |r| r.ctr),
            avg_cpm: mean(&rows, |r| r.cpm),
        })
        .collect();
    sort_desc_by(&mut platforms, |p| p.revenue);

    let mut deal_status_counts: Vec<DealStatusCount> = group_by(records, |r| r.deal_status)
        .into_iter()
        .map(|(deal_status, rows)| DealStatusCount { deal_status, campaigns: rows.len() })
        .collect();
    sort_desc_by(&mut deal_status_counts, |d| d.campaigns as f64);

    Kpis {
        overall_ctr: ratio(total_clicks as f64, total_impressions as f64),
        revenue_per_campaign: mean(&rows, |r| r.actual_revenue),
        win_rate: ratio(won as f64, n),
        overdue_rate: ratio(overdue as f64, n),
        avg_delivery_rate: mean(&rows, |r| r.delivery_rate),
        avg_margin_pct: mean(&rows, |r| r.margin_pct),
        total_impressions,
        total_clicks,
        campaigns: records.len(),
        unique_advertisers: distinct(records, |r| r.advertiser.label()),
        platforms,
        deal_status_counts,
    }
}
