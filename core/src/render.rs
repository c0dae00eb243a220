//! Console rendering of the metrics report.
//!
//! Column widths follow the section tables; money gets thousands separators.

use crate::report::MetricsReport;
use std::fmt;

const HEAVY_RULE: usize = 60;

/// Format `value` with `decimals` places and comma thousands separators.
pub fn money(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}", "=".repeat(HEAVY_RULE))?;
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "=".repeat(HEAVY_RULE))
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(HEAVY_RULE))?;
        writeln!(f, "AD SALES REVENUE ANALYTICS")?;
        writeln!(f, "{}", "=".repeat(HEAVY_RULE))?;
        let o = &self.overview;
        writeln!(f)?;
        writeln!(f, "Dataset: {} campaigns across {} advertisers", o.campaigns, o.advertisers)?;
        writeln!(f, "Industries: {} | Ad Formats: {}", o.industries, o.ad_formats)?;

        write_overview(f, self)?;
        write_segments(f, self)?;
        write_formats(f, self)?;
        write_variance(f, self)?;
        write_kpis(f, self)?;
        write_statistics(f, self)?;
        write_narrative(f, self)
    }
}

fn write_overview(f: &mut fmt::Formatter<'_>, report: &MetricsReport) -> fmt::Result {
    let o = &report.overview;
    section(f, "1. REVENUE PERFORMANCE OVERVIEW")?;
    writeln!(f)?;
    writeln!(f, "Total Booked Revenue:  ${:>14}", money(o.total_booked, 2))?;
    writeln!(f, "Total Actual Revenue:  ${:>14}", money(o.total_actual, 2))?;
    writeln!(f, "Total Budget:          ${:>14}", money(o.total_budget, 2))?;
    writeln!(f, "Total Gross Margin:    ${:>14}", money(o.total_gross_margin, 2))?;
    writeln!(f, "Avg Margin %:          {:>14.1}%", o.avg_margin_pct)?;
    writeln!(f, "Avg CPM:               ${:>14.2}", o.avg_cpm)?;
    writeln!(
        f,
        "Budget Variance:       ${:>14} ({:+.1}%)",
        money(o.budget_variance, 2),
        o.budget_variance_pct
    )?;

    writeln!(f)?;
    writeln!(f, "Quarterly Revenue Summary:")?;
    writeln!(
        f,
        "{:<10} {:>10} {:>14} {:>14} {:>14} {:>12}",
        "Quarter", "Campaigns", "Booked", "Actual", "Budget", "Variance %"
    )?;
    writeln!(f, "{}", "-".repeat(79))?;
    for q in &o.quarters {
        writeln!(
            f,
            "{:<10} {:>10} ${:>13} ${:>13} ${:>13} {:>+11.1}%",
            q.quarter.label(),
            q.campaigns,
            money(q.booked, 0),
            money(q.actual, 0),
            money(q.budget, 0),
            q.variance_pct
        )?;
    }
    Ok(())
}

fn write_segments(f: &mut fmt::Formatter<'_>, report: &MetricsReport) -> fmt::Result {
    let s = &report.segments;
    section(f, "2. REVENUE BY INDUSTRY & ACCOUNT TIER")?;
    writeln!(f)?;
    writeln!(
        f,
        "{:<15} {:>10} {:>14} {:>12} {:>10} {:>10}",
        "Industry", "Campaigns", "Total Rev", "Avg Rev", "Margin %", "Avg CPM"
    )?;
    writeln!(f, "{}", "-".repeat(75))?;
    for row in &s.by_industry {
        writeln!(
            f,
            "{:<15} {:>10} ${:>13} ${:>11} {:>9.1}% ${:>9.2}",
            row.segment.label(),
            row.campaigns,
            money(row.total_revenue, 0),
            money(row.avg_revenue, 0),
            row.avg_margin_pct,
            row.avg_cpm
        )?;
    }

    writeln!(f)?;
    writeln!(f, "Revenue by Account Tier:")?;
    for (row, (_, share)) in s.by_tier.iter().zip(s.tier_shares()) {
        writeln!(
            f,
            "  {:<12} {:>5} campaigns  ${:>14}  ({:>4.1}% share)  Margin: {:.1}%  Avg CPM: ${:.2}",
            row.segment.label(),
            row.campaigns,
            money(row.total_revenue, 2),
            share,
            row.avg_margin_pct,
            row.avg_cpm
        )?;
    }
    Ok(())
}

fn write_formats(f: &mut fmt::Formatter<'_>, report: &MetricsReport) -> fmt::Result {
    section(f, "3. AD FORMAT PERFORMANCE & CPM ANALYSIS")?;
    writeln!(f)?;
    writeln!(
        f,
        "{:<20} {:>8} {:>8} {:>14} {:>10} {:>10}",
        "Ad Format", "CPM", "CTR", "Revenue", "Margin %", "Delivery"
    )?;
    writeln!(f, "{}", "-".repeat(75))?;
    for row in &report.formats {
        writeln!(
            f,
            "{:<20} ${:>7.2} {:>7.2}% ${:>13} {:>9.1}% {:>9.1}%",
            row.ad_format.label(),
            row.avg_cpm,
            row.avg_ctr * 100.0,
            money(row.total_revenue, 0),
            row.avg_margin_pct,
            row.avg_delivery_rate * 100.0
        )?;
    }
    Ok(())
}

fn write_variance(f: &mut fmt::Formatter<'_>, report: &MetricsReport) -> fmt::Result {
    let v = &report.variance;
    section(f, "4. BUDGET VARIANCE & FORECASTING ANALYSIS")?;
    writeln!(f)?;
    writeln!(
        f,
        "Campaigns over budget: {} | under budget: {} | mean campaign variance: {:+.1}%",
        v.rows_over_budget, v.rows_under_budget, v.mean_row_variance_pct
    )?;

    writeln!(f)?;
    writeln!(f, "Variance by Quarter & Industry:")?;
    writeln!(
        f,
        "{:<10} {:<15} {:>14} {:>14} {:>8}",
        "Quarter", "Industry", "Actual", "Budget", "Var %"
    )?;
    writeln!(f, "{}", "-".repeat(65))?;
    for row in &v.by_quarter_industry {
        writeln!(
            f,
            "{:<10} {:<15} ${:>13} ${:>13} {:>+7.1}%",
            row.quarter.label(),
            row.industry.label(),
            money(row.total_actual, 0),
            money(row.total_budget, 0),
            row.variance_pct
        )?;
    }

    writeln!(f)?;
    writeln!(f, "Sales Rep Performance:")?;
    writeln!(
        f,
        "{:<12} {:>10} {:>14} {:>14} {:>8} {:>8}",
        "Rep", "Campaigns", "Actual Rev", "Budget", "Var %", "Margin"
    )?;
    writeln!(f, "{}", "-".repeat(70))?;
    for row in &v.by_rep {
        writeln!(
            f,
            "{:<12} {:>10} ${:>13} ${:>13} {:>+7.1}% {:>7.1}%",
            row.sales_rep.label(),
            row.campaigns,
            money(row.total_actual, 0),
            money(row.total_budget, 0),
            row.variance_pct,
            row.avg_margin_pct
        )?;
    }

    writeln!(f)?;
    writeln!(f, "{} Monthly Revenue:", v.forecast_quarter)?;
    for m in &v.forecast_months {
        writeln!(
            f,
            "  {}: ${:>14}  ({} campaigns)",
            m.month,
            money(m.actual_revenue, 2),
            m.campaigns
        )?;
    }
    Ok(())
}

fn write_kpis(f: &mut fmt::Formatter<'_>, report: &MetricsReport) -> fmt::Result {
    let k = &report.kpis;
    section(f, "5. KPI DASHBOARD METRICS")?;
    writeln!(f)?;
    writeln!(f, "Financial KPIs:")?;
    writeln!(f, "  Revenue per Campaign:    ${:>10}", money(k.revenue_per_campaign, 2))?;
    writeln!(f, "  Overall CTR:             {:>10.2}%", k.overall_ctr * 100.0)?;
    writeln!(f, "  Avg Delivery Rate:       {:>10.1}%", k.avg_delivery_rate * 100.0)?;
    writeln!(f, "  Avg Gross Margin:        {:>10.1}%", k.avg_margin_pct)?;
    writeln!(f, "  Win Rate:                {:>10.1}%", k.win_rate * 100.0)?;
    writeln!(f, "  Overdue Payments:        {:>10.1}%", k.overdue_rate * 100.0)?;

    writeln!(f)?;
    writeln!(f, "Scale Metrics:")?;
    writeln!(f, "  Total Impressions:       {:>14}", money(k.total_impressions as f64, 0))?;
    writeln!(f, "  Total Clicks:            {:>14}", money(k.total_clicks as f64, 0))?;
    writeln!(f, "  Total Campaigns:         {:>14}", money(k.campaigns as f64, 0))?;
    writeln!(f, "  Unique Advertisers:      {:>14}", k.unique_advertisers)?;

    writeln!(f)?;
    writeln!(f, "Platform Performance:")?;
    for (p, (_, share)) in k.platforms.iter().zip(k.platform_shares()) {
        writeln!(
            f,
            "  {:<18} Rev: ${:>12} ({:>4.1}%)  CTR: {:.2}%  CPM: ${:.2}",
            p.platform.label(),
            money(p.revenue, 0),
            share,
            p.avg_ctr * 100.0,
            p.avg_cpm
        )?;
    }

    writeln!(f)?;
    writeln!(f, "Deal Status:")?;
    for d in &k.deal_status_counts {
        writeln!(f, "  {:<18} {:>6}", d.deal_status.label(), d.campaigns)?;
    }
    Ok(())
}

fn write_statistics(f: &mut fmt::Formatter<'_>, report: &MetricsReport) -> fmt::Result {
    let s = &report.statistics;
    let t = &s.tier_revenue;
    section(f, "6. STATISTICAL ANALYSIS")?;
    writeln!(f)?;
    writeln!(f, "T-Test: {} vs {} Tier Revenue", t.tier_a, t.tier_b)?;
    writeln!(f, "  {:<15} ${} (n = {})", format!("{} Avg:", t.tier_a), money(t.mean_a, 2), t.n_a)?;
    writeln!(f, "  {:<15} ${} (n = {})", format!("{} Avg:", t.tier_b), money(t.mean_b, 2), t.n_b)?;
    match t.result {
        Some(r) => {
            writeln!(f, "  t-statistic:    {:.4}", r.t_statistic)?;
            writeln!(f, "  p-value:        {:.6}", r.p_value)?;
            let verdict = if r.p_value < t.alpha {
                format!("Yes (p < {})", t.alpha)
            } else {
                "No".to_string()
            };
            writeln!(f, "  Significant:    {verdict}")?;
        }
        None => writeln!(f, "  Not computable: each tier needs at least two campaigns with varying revenue")?,
    }

    writeln!(f)?;
    writeln!(f, "Key Correlations with Actual Revenue:")?;
    for c in &s.revenue_correlations {
        writeln!(f, "  {:<20} r = {:>6.3}", c.column, c.r)?;
    }
    Ok(())
}

fn write_narrative(f: &mut fmt::Formatter<'_>, report: &MetricsReport) -> fmt::Result {
    let n = &report.narrative;
    section(f, "7. KEY FINDINGS & RECOMMENDATIONS")?;
    writeln!(f)?;
    writeln!(f, "FINDINGS:")?;
    for (i, line) in n.findings.iter().enumerate() {
        writeln!(f, "{}. {line}", i + 1)?;
    }
    writeln!(f)?;
    writeln!(f, "RECOMMENDATIONS:")?;
    for (i, line) in n.recommendations.iter().enumerate() {
        writeln!(f, "{}. {line}", i + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::money;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(1234567.891, 2), "1,234,567.89");
        assert_eq!(money(999.0, 0), "999");
        assert_eq!(money(1000.0, 0), "1,000");
        assert_eq!(money(-45210.5, 1), "-45,210.5");
        assert_eq!(money(0.0, 2), "0.00");
        assert_eq!(money(-0.001, 2), "0.00");
    }
}
