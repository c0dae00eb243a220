//! Key findings and recommendations, filled in from the computed views.

use super::{
    formats::FormatRow, kpi::Kpis, overview::Overview, segments::Segments,
    stats::StatisticalTests, variance::VarianceView,
};
use crate::render::money;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Narrative {
    pub findings: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn compose(
    overview: &Overview,
    segments: &Segments,
    formats: &[FormatRow],
    variance: &VarianceView,
    kpis: &Kpis,
    stats: &StatisticalTests,
) -> Narrative {
    let overdue_pct = kpis.overdue_rate * 100.0;
    let mut findings = vec![format!(
        "Total actual revenue of ${} across {} campaigns with {:.1}% avg gross margin",
        money(overview.total_actual, 0),
        overview.campaigns,
        overview.avg_margin_pct
    )];

    if let Some(top) = formats.first() {
        findings.push(format!(
            "{} commands highest CPM (${:.2}) - premium inventory drives revenue",
            top.ad_format, top.avg_cpm
        ));
    }
    if let Some(top) = segments.by_industry.first() {
        findings.push(format!(
            "{} is the top revenue-generating industry (${})",
            top.segment,
            money(top.total_revenue, 0)
        ));
    }

    let test = &stats.tier_revenue;
    findings.push(match (test.result, test.significant()) {
        (Some(r), Some(true)) => format!(
            "{} accounts generate significantly {} revenue than {} tier (p = {:.4})",
            test.tier_a,
            if test.mean_a >= test.mean_b { "higher" } else { "lower" },
            test.tier_b,
            r.p_value
        ),
        (Some(r), _) => format!(
            "No significant revenue difference between {} and {} tiers (p = {:.4})",
            test.tier_a, test.tier_b, r.p_value
        ),
        (None, _) => format!(
            "Too few {} / {} campaigns to test the revenue difference",
            test.tier_a, test.tier_b
        ),
    });

    if let Some(peak) = overview
        .quarters
        .iter()
        .max_by(|a, b| a.actual.total_cmp(&b.actual))
    {
        findings.push(format!(
            "{} is the peak revenue quarter (${}), driven by seasonal advertising spend",
            peak.quarter,
            money(peak.actual, 0)
        ));
    }
    if let Some(rep) = variance.top_variance_rep() {
        findings.push(format!(
            "{} leads budget attainment at {:+.1}% variance",
            rep.sales_rep, rep.variance_pct
        ));
    }
    findings.push(format!(
        "{overdue_pct:.1}% of payments are overdue - collections process needs attention"
    ));

    let recommendations = vec![
        "Increase allocation of premium ad formats (Homepage Takeover, Sponsored Stream) - highest CPM and CTR".to_string(),
        "Expand Enterprise account acquisition - higher revenue per campaign with strong margins".to_string(),
        format!(
            "Invest in {} capacity planning - seasonal demand spike requires proactive inventory management",
            variance.forecast_quarter
        ),
        format!("Implement payment collection automation to reduce the {overdue_pct:.1}% overdue rate"),
        "Develop industry-specific pricing strategies - verticals show different margin profiles".to_string(),
        "Use sales rep variance analysis for performance coaching and quota setting".to_string(),
    ];

    Narrative { findings, recommendations }
}
