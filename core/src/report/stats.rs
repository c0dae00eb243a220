//! Statistical analysis: tier revenue t-test and the metric correlation matrix.
//!
//! RULE: degenerate inputs (too few rows, zero variance) produce an
//! undefined result, never a panic or an error.

use crate::{record::CampaignRecord, types::AccountTier};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

pub const SIGNIFICANCE_ALPHA: f64 = 0.05;

/// Numeric columns entering the correlation matrix, in display order.
pub const CORRELATION_COLUMNS: [(&str, fn(&CampaignRecord) -> f64); 10] = [
    ("impressions", |r| r.impressions as f64),
    ("clicks", |r| r.clicks as f64),
    ("ctr", |r| r.ctr),
    ("cpm", |r| r.cpm),
    ("booked_revenue", |r| r.booked_revenue),
    ("actual_revenue", |r| r.actual_revenue),
    ("delivery_rate", |r| r.delivery_rate),
    ("cost_of_sale", |r| r.cost_of_sale),
    ("gross_margin", |r| r.gross_margin),
    ("margin_pct", |r| r.margin_pct),
];

const REVENUE_COLUMN: &str = "actual_revenue";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTestResult {
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    /// Two-sided.
    pub p_value: f64,
}

/// Student's two-sample t-test with pooled variance.
/// `None` when either sample has fewer than two values or both are constant.
pub fn students_t_test(a: &[f64], b: &[f64]) -> Option<TTestResult> {
    if a.len() < 2 || b.len() < 2 {
        return None;
    }
    let (n_a, n_b) = (a.len() as f64, b.len() as f64);
    let (mean_a, mean_b) = (mean(a), mean(b));
    let df = n_a + n_b - 2.0;
    let pooled = ((n_a - 1.0) * sample_variance(a, mean_a) + (n_b - 1.0) * sample_variance(b, mean_b)) / df;
    let std_err = (pooled * (1.0 / n_a + 1.0 / n_b)).sqrt();
    if !(std_err > 0.0) {
        return None;
    }

    let t = (mean_a - mean_b) / std_err;
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    let p = (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0);
    Some(TTestResult { t_statistic: t, degrees_of_freedom: df, p_value: p })
}

#[derive(Debug, Clone, Serialize)]
pub struct TierRevenueTest {
    pub tier_a: AccountTier,
    pub tier_b: AccountTier,
    pub n_a: usize,
    pub n_b: usize,
    pub mean_a: f64,
    pub mean_b: f64,
    /// `None` when the test is not computable on this table.
    pub result: Option<TTestResult>,
    pub alpha: f64,
}

impl TierRevenueTest {
    pub fn significant(&self) -> Option<bool> {
        self.result.map(|r| r.p_value < self.alpha)
    }
}

/// Compare actual revenue between two account tiers.
pub fn tier_revenue_test(
    records: &[CampaignRecord],
    tier_a: AccountTier,
    tier_b: AccountTier,
) -> TierRevenueTest {
    let revenue_of = |tier: AccountTier| -> Vec<f64> {
        records
            .iter()
            .filter(|r| r.account_tier == tier)
            .map(|r| r.actual_revenue)
            .collect()
    };
    let a = revenue_of(tier_a);
    let b = revenue_of(tier_b);
    TierRevenueTest {
        tier_a,
        tier_b,
        n_a: a.len(),
        n_b: b.len(),
        mean_a: mean(&a),
        mean_b: mean(&b),
        result: students_t_test(&a, &b),
        alpha: SIGNIFICANCE_ALPHA,
    }
}

// ── Correlation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<&'static str>,
    /// Row-major; `None` where either column has zero variance.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == row)?;
        let j = self.columns.iter().position(|c| *c == col)?;
        self.values[i][j]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCorrelation {
    pub column: &'static str,
    pub r: f64,
}

/// Pearson correlation between two equally long samples.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let (mx, my) = (mean(x), mean(y));
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

pub fn correlation_matrix(records: &[CampaignRecord]) -> CorrelationMatrix {
    let series: Vec<Vec<f64>> = CORRELATION_COLUMNS
        .iter()
        .map(|(_, field)| records.iter().map(|r| field(r)).collect())
        .collect();

    let k = series.len();
    let mut values = vec![vec![None; k]; k];
    for i in 0..k {
        for j in i..k {
            let r = if i == j {
                // Exactly 1 on the diagonal unless the column is constant.
                pearson(&series[i], &series[j]).map(|_| 1.0)
            } else {
                pearson(&series[i], &series[j])
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: CORRELATION_COLUMNS.iter().map(|(name, _)| *name).collect(),
        values,
    }
}

/// Correlations of every other column against actual revenue, strongest
/// positive first. Undefined coefficients are dropped.
pub fn revenue_correlations(matrix: &CorrelationMatrix) -> Vec<RankedCorrelation> {
    let mut ranked: Vec<RankedCorrelation> = matrix
        .columns
        .iter()
        .copied()
        .filter(|c| *c != REVENUE_COLUMN)
        .filter_map(|c| {
            matrix
                .get(c, REVENUE_COLUMN)
                .map(|r| RankedCorrelation { column: c, r })
        })
        .collect();
    super::group::sort_desc_by(&mut ranked, |c| c.r);
    ranked
}

#[derive(Debug, Clone, Serialize)]
pub struct StatisticalTests {
    pub tier_revenue: TierRevenueTest,
    pub correlations: CorrelationMatrix,
    pub revenue_correlations: Vec<RankedCorrelation>,
}

pub fn compute(records: &[CampaignRecord]) -> StatisticalTests {
    let correlations = correlation_matrix(records);
    StatisticalTests {
        tier_revenue: tier_revenue_test(records, AccountTier::Enterprise, AccountTier::Growth),
        revenue_correlations: revenue_correlations(&correlations),
        correlations,
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

fn sample_variance(xs: &[f64], mean: f64) -> f64 {
    xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() as f64 - 1.0)
}
