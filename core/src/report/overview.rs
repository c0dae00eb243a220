//! Revenue performance overview: headline totals plus the quarterly split.

use super::group::{all_rows, group_by, mean, sum, variance_pct};
use crate::{record::CampaignRecord, types::Quarter};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize)]
pub struct QuarterRow {
    pub quarter: Quarter,
    pub campaigns: usize,
    pub booked: f64,
    pub actual: f64,
    pub budget: f64,
    pub variance_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub campaigns: usize,
    pub advertisers: usize,
    pub industries: usize,
    pub ad_formats: usize,
    pub total_booked: f64,
    pub total_actual: f64,
    pub total_budget: f64,
    pub total_gross_margin: f64,
    pub avg_margin_pct: f64,
    pub avg_cpm: f64,
    /// Total actual minus total budget.
    pub budget_variance: f64,
    pub budget_variance_pct: f64,
    /// Quarters present in the table, in calendar order.
    pub quarters: Vec<QuarterRow>,
}

pub fn compute(records: &[CampaignRecord]) -> Overview {
    let rows = all_rows(records);
    let total_actual = sum(&rows, |r| r.actual_revenue);
    let total_budget = sum(&rows, |r| r.budget);

    let quarters = group_by(records, |r| r.quarter)
        .into_iter()
        .map(|(quarter, rows)| {
            let actual = sum(&rows, |r| r.actual_revenue);
            let budget = sum(&rows, |r| r.budget);
            QuarterRow {
                quarter,
                campaigns: rows.len(),
                booked: sum(&rows, |r| r.booked_revenue),
                actual,
                budget,
                variance_pct: variance_pct(actual, budget),
            }
        })
        .collect();

    Overview {
        campaigns: records.len(),
        advertisers: distinct(records, |r| r.advertiser.label()),
        industries: distinct(records, |r| r.industry.label()),
        ad_formats: distinct(records, |r| r.ad_format.label()),
        total_booked: sum(&rows, |r| r.booked_revenue),
        total_actual,
        total_budget,
        total_gross_margin: sum(&rows, |r| r.gross_margin),
        avg_margin_pct: mean(&rows, |r| r.margin_pct),
        avg_cpm: mean(&rows, |r| r.cpm),
        budget_variance: total_actual - total_budget,
        budget_variance_pct: variance_pct(total_actual, total_budget),
        quarters,
    }
}

pub(crate) fn distinct(records: &[CampaignRecord], key: impl Fn(&CampaignRecord) -> &'static str) -> usize {
    records.iter().map(key).collect::<HashSet<_>>().len()
}
