//! Budget variance and the single-quarter monthly forecast view.
//!
//! Per-row variance is actual minus budget; every percentage is taken
//! against budget and is 0 when the budget is 0.

use super::group::{group_by, mean, sort_desc_by, sum, variance_pct};
use crate::{
    record::CampaignRecord,
    types::{Industry, Month, Quarter, SalesRep},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct QuarterIndustryVariance {
    pub quarter: Quarter,
    pub industry: Industry,
    pub total_actual: f64,
    pub total_budget: f64,
    pub variance_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepVariance {
    pub sales_rep: SalesRep,
    pub campaigns: usize,
    pub total_actual: f64,
    pub total_budget: f64,
    pub avg_margin_pct: f64,
    pub variance_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRevenue {
    pub month: Month,
    pub campaigns: usize,
    pub actual_revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VarianceView {
    pub rows_over_budget: usize,
    pub rows_under_budget: usize,
    /// Mean of the per-row variance percentages.
    pub mean_row_variance_pct: f64,
    /// Ordered by quarter, then industry.
    pub by_quarter_industry: Vec<QuarterIndustryVariance>,
    /// Sorted by total actual revenue, largest first.
    pub by_rep: Vec<RepVariance>,
    pub forecast_quarter: Quarter,
    /// Always the three months of `forecast_quarter`, in calendar order.
    pub forecast_months: Vec<MonthlyRevenue>,
}

impl VarianceView {
    /// Rep with the highest variance percentage.
    pub fn top_variance_rep(&self) -> Option<&RepVariance> {
        self.by_rep
            .iter()
            .fold(None, |best: Option<&RepVariance>, r| match best {
                Some(b) if b.variance_pct >= r.variance_pct => Some(b),
                _ => Some(r),
            })
    }
}

pub fn compute(records: &[CampaignRecord], forecast_quarter: Quarter) -> VarianceView {
    let by_quarter_industry = group_by(records, |r| (r.quarter, r.industry))
        .into_iter()
        .map(|((quarter, industry), rows)| {
            let total_actual = sum(&rows, |r| r.actual_revenue);
            let total_budget = sum(&rows, |r| r.budget);
            QuarterIndustryVariance {
                quarter,
                industry,
                total_actual,
                total_budget,
                variance_pct: variance_pct(total_actual, total_budget),
            }
        })
        .collect();

    let mut by_rep: Vec<RepVariance> = group_by(records, |r| r.sales_rep)
        .into_iter()
        .map(|(sales_rep, rows)| {
            let total_actual = sum(&rows, |r| r.actual_revenue);
            let total_budget = sum(&rows, |r| r.budget);
            RepVariance {
                sales_rep,
                campaigns: rows.len(),
                total_actual,
                total_budget,
                avg_margin_pct: mean(&rows, |r| r.margin_pct),
                variance_pct: variance_pct(total_actual, total_budget),
            }
        })
        .collect();
    sort_desc_by(&mut by_rep, |r| r.total_actual);

    let in_quarter: Vec<&CampaignRecord> =
        records.iter().filter(|r| r.quarter == forecast_quarter).collect();
    let forecast_months = forecast_quarter
        .months()
        .into_iter()
        .map(|month| {
            let rows: Vec<&CampaignRecord> =
                in_quarter.iter().copied().filter(|r| r.month == month).collect();
            MonthlyRevenue {
                month,
                campaigns: rows.len(),
                actual_revenue: sum(&rows, |r| r.actual_revenue),
            }
        })
        .collect();

    let all: Vec<&CampaignRecord> = records.iter().collect();
    VarianceView {
        rows_over_budget: records.iter().filter(|r| r.budget_variance() > 0.0).count(),
        rows_under_budget: records.iter().filter(|r| r.budget_variance() < 0.0).count(),
        mean_row_variance_pct: mean(&all, |r| r.variance_pct()),
        by_quarter_industry,
        by_rep,
        forecast_quarter,
        forecast_months,
    }
}
