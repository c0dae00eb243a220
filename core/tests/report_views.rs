//! Aggregate views computed by the reporter.

use adsales_core::{
    config::GenerationProfile,
    error::AdSalesError,
    generator::DatasetSynthesizer,
    record::CampaignRecord,
    report::{analyze, MetricsReport},
    types::{
        AccountTier, AdFormat, Advertiser, DealStatus, Industry, Month, PaymentStatus, Platform,
        Quarter, SalesRep,
    },
};

fn generated(seed: u64, rows: usize) -> Vec<CampaignRecord> {
    DatasetSynthesizer::new(GenerationProfile::default(), seed).unwrap().generate(rows)
}

fn report_for(records: &[CampaignRecord]) -> MetricsReport {
    analyze(records, Quarter::Q4).expect("analysis")
}

/// A hand-built row; callers override what they test.
fn row(campaign_id: u64) -> CampaignRecord {
    CampaignRecord {
        campaign_id,
        advertiser: Advertiser::Toyota,
        industry: Industry::Automotive,
        account_tier: AccountTier::Growth,
        sales_rep: SalesRep::PriyaS,
        ad_format: AdFormat::DisplayBanner,
        platform: Platform::Desktop,
        quarter: Quarter::Q2,
        month: Month::May,
        impressions: 100_000,
        clicks: 1_000,
        ctr: 0.01,
        cpm: 20.0,
        booked_revenue: 2_000.0,
        budget: 2_000.0,
        actual_revenue: 1_800.0,
        delivery_rate: 0.9,
        cost_of_sale: 600.0,
        gross_margin: 1_200.0,
        margin_pct: 66.7,
        deal_status: DealStatus::ClosedWon,
        payment_status: PaymentStatus::Received,
    }
}

#[test]
fn empty_table_is_an_error() {
    assert!(matches!(analyze(&[], Quarter::Q4), Err(AdSalesError::EmptyTable)));
}

#[test]
fn hundred_row_table_end_to_end() {
    let records = generated(42, 100);
    let report = report_for(&records);

    assert_eq!(report.overview.campaigns, 100);
    assert_eq!(report.kpis.campaigns, 100);
    assert!(report.overview.industries <= Industry::ALL.len());
    for row in &report.segments.by_industry {
        assert!(Industry::ALL.contains(&row.segment));
    }
    assert!((0.0..=1.0).contains(&report.kpis.win_rate));
    assert!((0.0..=1.0).contains(&report.kpis.overdue_rate));
    assert_eq!(
        report.statistics.correlations.get("actual_revenue", "actual_revenue"),
        Some(1.0)
    );
}

#[test]
fn quarterly_rows_sum_to_totals() {
    let records = generated(42, 1_200);
    let o = report_for(&records).overview;

    let quarters: Vec<Quarter> = o.quarters.iter().map(|q| q.quarter).collect();
    let mut sorted = quarters.clone();
    sorted.sort();
    assert_eq!(quarters, sorted, "quarters are listed in calendar order");

    let booked: f64 = o.quarters.iter().map(|q| q.booked).sum();
    let actual: f64 = o.quarters.iter().map(|q| q.actual).sum();
    let campaigns: usize = o.quarters.iter().map(|q| q.campaigns).sum();
    assert!((booked - o.total_booked).abs() < 0.01);
    assert!((actual - o.total_actual).abs() < 0.01);
    assert_eq!(campaigns, o.campaigns);
}

#[test]
fn segment_and_format_orderings() {
    let report = report_for(&generated(9, 800));

    let industry_rev: Vec<f64> = report.segments.by_industry.iter().map(|r| r.total_revenue).collect();
    assert!(industry_rev.windows(2).all(|w| w[0] >= w[1]));

    let cpms: Vec<f64> = report.formats.iter().map(|r| r.avg_cpm).collect();
    assert!(cpms.windows(2).all(|w| w[0] >= w[1]));

    let rep_rev: Vec<f64> = report.variance.by_rep.iter().map(|r| r.total_actual).collect();
    assert!(rep_rev.windows(2).all(|w| w[0] >= w[1]));

    let shares: f64 = report.segments.tier_shares().iter().map(|(_, s)| s).sum();
    assert!((shares - 100.0).abs() < 1e-6);
}

#[test]
fn single_zero_revenue_row_does_not_fail() {
    let mut r = row(1);
    r.actual_revenue = 0.0;
    r.cost_of_sale = 0.0;
    r.gross_margin = 0.0;
    r.margin_pct = 0.0;
    r.budget = 0.0;

    let report = report_for(&[r]);
    assert_eq!(report.overview.budget_variance_pct, 0.0);
    assert!(report.statistics.tier_revenue.result.is_none());
    assert!(report.statistics.revenue_correlations.is_empty());
    assert!(!report.narrative.findings.is_empty());
}

#[test]
fn forecast_months_cover_the_chosen_quarter() {
    let mut a = row(1);
    a.quarter = Quarter::Q3;
    a.month = Month::Aug;
    let mut b = row(2);
    b.quarter = Quarter::Q3;
    b.month = Month::Aug;
    b.actual_revenue = 200.0;

    let view = analyze(&[a, b, row(3)], Quarter::Q3).unwrap().variance;
    let months: Vec<Month> = view.forecast_months.iter().map(|m| m.month).collect();
    assert_eq!(months, vec![Month::Jul, Month::Aug, Month::Sep]);

    assert_eq!(view.forecast_months[0].campaigns, 0);
    assert_eq!(view.forecast_months[0].actual_revenue, 0.0);
    assert_eq!(view.forecast_months[1].campaigns, 2);
    assert!((view.forecast_months[1].actual_revenue - 2_000.0).abs() < 1e-9);
}

#[test]
fn variance_counts_split_over_and_under() {
    let mut over = row(1);
    over.actual_revenue = 2_500.0;
    let under = row(2); // 1,800 against 2,000
    let mut even = row(3);
    even.actual_revenue = 2_000.0;

    let view = report_for(&[over, under, even]).variance;
    assert_eq!(view.rows_over_budget, 1);
    assert_eq!(view.rows_under_budget, 1);
    // (+25.0 - 10.0 + 0.0) / 3
    assert!((view.mean_row_variance_pct - 5.0).abs() < 1e-9);
}

#[test]
fn kpis_match_hand_counts() {
    let mut a = row(1);
    a.deal_status = DealStatus::InFlight;
    a.payment_status = PaymentStatus::Pending;
    let mut b = row(2);
    b.payment_status = PaymentStatus::Overdue;
    let c = row(3);
    let mut d = row(4);
    d.advertiser = Advertiser::Nike;
    d.industry = Industry::Retail;

    let k = report_for(&[a, b, c, d]).kpis;
    assert_eq!(k.win_rate, 0.75);
    assert_eq!(k.overdue_rate, 0.25);
    assert_eq!(k.unique_advertisers, 2);
    assert_eq!(k.total_impressions, 400_000);
    assert_eq!(k.total_clicks, 4_000);
    assert!((k.overall_ctr - 0.01).abs() < 1e-12);
    assert_eq!(k.deal_status_counts[0].deal_status, DealStatus::ClosedWon);
    assert_eq!(k.deal_status_counts[0].campaigns, 3);
}

#[test]
fn tier_test_runs_on_generated_data() {
    let stats = report_for(&generated(42, 600)).statistics;
    let t = &stats.tier_revenue;
    assert_eq!(t.tier_a, AccountTier::Enterprise);
    assert_eq!(t.tier_b, AccountTier::Growth);
    let result = t.result.expect("both tiers are populated");
    assert!((0.0..=1.0).contains(&result.p_value));
    assert_eq!(result.degrees_of_freedom, (t.n_a + t.n_b - 2) as f64);

    let r: Vec<f64> = stats.revenue_correlations.iter().map(|c| c.r).collect();
    assert!(r.windows(2).all(|w| w[0] >= w[1]));
    assert!(stats.revenue_correlations.iter().all(|c| c.column != "actual_revenue"));
}

#[test]
fn console_report_has_every_section() {
    let text = report_for(&generated(42, 200)).to_string();
    for heading in [
        "1. REVENUE PERFORMANCE OVERVIEW",
        "2. REVENUE BY INDUSTRY & ACCOUNT TIER",
        "3. AD FORMAT PERFORMANCE & CPM ANALYSIS",
        "4. BUDGET VARIANCE & FORECASTING ANALYSIS",
        "5. KPI DASHBOARD METRICS",
        "6. STATISTICAL ANALYSIS",
        "7. KEY FINDINGS & RECOMMENDATIONS",
    ] {
        assert!(text.contains(heading), "missing section {heading}");
    }
    assert!(text.contains("Q4 2025 Monthly Revenue:"));
}
