//! Metrics reporter: turns the campaign table into aggregate views,
//! console text, charts and a JSON summary.
//!
//! SECTION ORDER (matches console output and chart numbering):
//!   1. Overview           (overview.rs)
//!   2. Industry & tier    (segments.rs)
//!   3. Ad formats         (formats.rs)
//!   4. Budget variance    (variance.rs)
//!   5. KPIs               (kpi.rs)
//!   6. Statistics         (stats.rs)
//!   7. Findings           (narrative.rs)
//!
//! RULE: every view is computed from the record slice alone.
//! No view reads another view's output, except the narrative.

pub mod formats;
pub mod group;
pub mod kpi;
pub mod narrative;
pub mod overview;
pub mod segments;
pub mod stats;
pub mod variance;

use crate::{
    charts,
    config::ReportConfig,
    dataset,
    error::{AdSalesError, AdSalesResult},
    record::CampaignRecord,
    types::Quarter,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "report_summary.json";

#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub overview: overview::Overview,
    pub segments: segments::Segments,
    pub formats: Vec<formats::FormatRow>,
    pub variance: variance::VarianceView,
    pub kpis: kpi::Kpis,
    pub statistics: stats::StatisticalTests,
    pub narrative: narrative::Narrative,
}

/// Compute every view. An empty table is a data error.
pub fn analyze(records: &[CampaignRecord], forecast_quarter: Quarter) -> AdSalesResult<MetricsReport> {
    if records.is_empty() {
        return Err(AdSalesError::EmptyTable);
    }

    let overview = overview::compute(records);
    let segments = segments::compute(records);
    let formats = formats::compute(records);
    let variance = variance::compute(records, forecast_quarter);
    let kpis = kpi::compute(records);
    let statistics = stats::compute(records);
    let narrative = narrative::compose(&overview, &segments, &formats, &variance, &kpis, &statistics);

    Ok(MetricsReport {
        overview,
        segments,
        formats,
        variance,
        kpis,
        statistics,
        narrative,
    })
}

/// What a report run produced.
#[derive(Debug)]
pub struct ReportOutcome {
    pub report: MetricsReport,
    pub charts: Vec<PathBuf>,
    pub summary_path: Option<PathBuf>,
}

#[derive(Serialize)]
struct ReportSummary<'a> {
    generated_at: String,
    input_path: &'a Path,
    #[serde(flatten)]
    report: &'a MetricsReport,
}

/// Load the table, compute every view, and write charts and summary.
pub fn run(config: &ReportConfig) -> AdSalesResult<ReportOutcome> {
    config.validate()?;

    let records = dataset::read_csv(&config.input_path)?;
    log::info!("Loaded {} campaigns from {}", records.len(), config.input_path.display());

    let report = analyze(&records, config.forecast_quarter)?;

    if config.render_charts || config.write_summary {
        fs::create_dir_all(&config.output_dir)?;
    }

    let charts = if config.render_charts {
        charts::render_all(&report, &config.output_dir, config.chart_size)?
    } else {
        log::debug!("Chart rendering disabled");
        Vec::new()
    };

    let summary_path = if config.write_summary {
        let path = config.output_dir.join(SUMMARY_FILE);
        write_summary(&path, &config.input_path, &report)?;
        log::info!("Saved summary: {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok(ReportOutcome { report, charts, summary_path })
}

fn write_summary(path: &Path, input_path: &Path, report: &MetricsReport) -> AdSalesResult<()> {
    let summary = ReportSummary {
        generated_at: chrono::Utc::now().to_rfc3339(),
        input_path,
        report,
    };
    let json = serde_json::to_string_pretty(&summary)?;
    fs::write(path, json)?;
    Ok(())
}
