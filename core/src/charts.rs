//! SVG dashboards for the metrics report.
//!
//! RULE: charts read only the computed report. No chart touches records.
//! File names are numbered in console section order.

use crate::{
    error::{AdSalesError, AdSalesResult},
    report::MetricsReport,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::path::{Path, PathBuf};

pub const QUARTERLY_CHART: &str = "01_quarterly_budget_vs_actual.svg";
pub const SEGMENT_CHART: &str = "02_revenue_by_industry_tier.svg";
pub const FORMAT_CHART: &str = "03_ad_format_performance.svg";
pub const REP_VARIANCE_CHART: &str = "04_budget_variance_by_rep.svg";
pub const KPI_CHART: &str = "05_kpi_dashboard.svg";
pub const CORRELATION_CHART: &str = "06_correlation_matrix.svg";

type DrawResult = Result<(), Box<dyn Error>>;
type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const NAVY: RGBColor = RGBColor(31, 78, 121);
const SKY: RGBColor = RGBColor(158, 202, 225);
const TEAL: RGBColor = RGBColor(42, 157, 143);
const AMBER: RGBColor = RGBColor(233, 196, 106);
const GAIN: RGBColor = RGBColor(46, 139, 87);
const LOSS: RGBColor = RGBColor(200, 60, 60);
const TILE: RGBColor = RGBColor(240, 244, 248);
const UNDEFINED_CELL: RGBColor = RGBColor(220, 220, 220);

/// Render every chart into `dir`, returning the written paths in order.
pub fn render_all(report: &MetricsReport, dir: &Path, size: (u32, u32)) -> AdSalesResult<Vec<PathBuf>> {
    let jobs: [(&'static str, fn(&MetricsReport, &Path, (u32, u32)) -> DrawResult); 6] = [
        (QUARTERLY_CHART, quarterly_budget_vs_actual),
        (SEGMENT_CHART, revenue_by_industry_tier),
        (FORMAT_CHART, ad_format_performance),
        (REP_VARIANCE_CHART, budget_variance_by_rep),
        (KPI_CHART, kpi_dashboard),
        (CORRELATION_CHART, correlation_matrix),
    ];

    let mut written = Vec::with_capacity(jobs.len());
    for (name, draw) in jobs {
        let path = dir.join(name);
        draw(report, &path, size).map_err(|e| AdSalesError::Chart {
            chart: name,
            message: e.to_string(),
        })?;
        log::info!("Saved: {}", path.display());
        written.push(path);
    }
    Ok(written)
}

// ── Charts ───────────────────────────────────────────────────────────────────

fn quarterly_budget_vs_actual(report: &MetricsReport, path: &Path, size: (u32, u32)) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let quarters = &report.overview.quarters;
    let labels: Vec<String> = quarters.iter().map(|q| q.quarter.label().to_string()).collect();
    let peak = quarters.iter().map(|q| q.budget.max(q.actual)).fold(0.0, f64::max) / 1e6;
    let n = quarters.len() as i32;

    let mut chart = ChartBuilder::on(&root)
        .caption("Quarterly Revenue: Budget vs Actual", (FONT, 26))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..headroom(peak))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .y_desc("Revenue ($M)")
        .x_label_formatter(&|v| segment_label(&labels, v))
        .y_label_formatter(&|y| format!("{y:.1}"))
        .draw()?;

    let segment_px = segment_width(&chart.plotting_area().dim_in_pixel(), quarters.len());
    let (outer, inner) = (segment_px / 8, segment_px / 2);

    chart
        .draw_series(
            quarters
                .iter()
                .enumerate()
                .map(|(i, q)| bar(i as i32, q.budget / 1e6, SKY, (outer, inner))),
        )?
        .label("Budget")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], SKY.filled()));
    chart
        .draw_series(
            quarters
                .iter()
                .enumerate()
                .map(|(i, q)| bar(i as i32, q.actual / 1e6, NAVY, (inner, outer))),
        )?
        .label("Actual")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], NAVY.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn revenue_by_industry_tier(report: &MetricsReport, path: &Path, size: (u32, u32)) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));

    let segments = &report.segments;
    bar_panel(
        &panels[0],
        "Revenue by Industry",
        "Revenue ($M)",
        &segments
            .by_industry
            .iter()
            .map(|r| (r.segment.label().to_string(), r.total_revenue / 1e6))
            .collect::<Vec<_>>(),
        |_| NAVY,
        |v| format!("${v:.1}M"),
    )?;
    bar_panel(
        &panels[1],
        "Revenue Share by Account Tier",
        "Share of Revenue (%)",
        &segments
            .tier_shares()
            .into_iter()
            .map(|(tier, share)| (tier.label().to_string(), share))
            .collect::<Vec<_>>(),
        |_| TEAL,
        |v| format!("{v:.1}%"),
    )?;

    root.present()?;
    Ok(())
}

fn ad_format_performance(report: &MetricsReport, path: &Path, size: (u32, u32)) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));

    let formats = &report.formats;
    bar_panel(
        &panels[0],
        "Average CPM by Ad Format",
        "CPM ($)",
        &formats
            .iter()
            .map(|r| (r.ad_format.label().to_string(), r.avg_cpm))
            .collect::<Vec<_>>(),
        |_| AMBER,
        |v| format!("${v:.2}"),
    )?;
    bar_panel(
        &panels[1],
        "Average CTR by Ad Format",
        "CTR (%)",
        &formats
            .iter()
            .map(|r| (r.ad_format.label().to_string(), r.avg_ctr * 100.0))
            .collect::<Vec<_>>(),
        |_| TEAL,
        |v| format!("{v:.2}%"),
    )?;

    root.present()?;
    Ok(())
}

fn budget_variance_by_rep(report: &MetricsReport, path: &Path, size: (u32, u32)) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let reps = &report.variance.by_rep;
    let labels: Vec<String> = reps.iter().map(|r| r.sales_rep.label().to_string()).collect();
    let n = reps.len() as i32;
    let low = reps.iter().map(|r| r.variance_pct).fold(0.0, f64::min);
    let high = reps.iter().map(|r| r.variance_pct).fold(0.0, f64::max);
    let pad = ((high - low) * 0.15).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Budget Variance by Sales Rep", (FONT, 26))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), (low - pad)..(high + pad))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .y_desc("Variance vs Budget (%)")
        .x_label_formatter(&|v| segment_label(&labels, v))
        .y_label_formatter(&|y| format!("{y:+.0}%"))
        .draw()?;

    let margin = segment_width(&chart.plotting_area().dim_in_pixel(), reps.len()) / 6;
    chart.draw_series(reps.iter().enumerate().map(|(i, r)| {
        let color = if r.variance_pct >= 0.0 { GAIN } else { LOSS };
        bar(i as i32, r.variance_pct, color, (margin, margin))
    }))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(SegmentValue::Exact(0), 0.0), (SegmentValue::Exact(n), 0.0)],
        &BLACK,
    )))?;

    root.present()?;
    Ok(())
}

/// Headline KPI tiles over platform revenue share and deal-status counts.
fn kpi_dashboard(report: &MetricsReport, path: &Path, size: (u32, u32)) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled("KPI Dashboard", (FONT, 28))?;
    let (tiles_area, panels_area) = body.split_vertically(body.dim_in_pixel().1 * 2 / 5);

    let k = &report.kpis;
    let tiles = [
        ("Revenue / Campaign", format!("${}", crate::render::money(k.revenue_per_campaign, 0))),
        ("Overall CTR", format!("{:.2}%", k.overall_ctr * 100.0)),
        ("Avg Delivery Rate", format!("{:.1}%", k.avg_delivery_rate * 100.0)),
        ("Avg Gross Margin", format!("{:.1}%", k.avg_margin_pct)),
        ("Win Rate", format!("{:.1}%", k.win_rate * 100.0)),
        ("Overdue Payments", format!("{:.1}%", k.overdue_rate * 100.0)),
    ];

    let centered = Pos::new(HPos::Center, VPos::Center);
    for (area, (name, value)) in tiles_area.split_evenly((2, 3)).iter().zip(tiles.iter()) {
        let tile = area.margin(5, 5, 8, 8);
        tile.fill(&TILE)?;
        let (w, h) = tile.dim_in_pixel();
        let (cx, cy) = ((w / 2) as i32, (h / 2) as i32);
        tile.draw(&Text::new(
            value.as_str(),
            (cx, cy - 8),
            TextStyle::from((FONT, 22).into_font()).color(&NAVY).pos(centered),
        ))?;
        tile.draw(&Text::new(
            *name,
            (cx, cy + 16),
            TextStyle::from((FONT, 12).into_font()).color(&BLACK).pos(centered),
        ))?;
    }

    let panels = panels_area.split_evenly((1, 2));
    bar_panel(
        &panels[0],
        "Revenue Share by Platform",
        "Share of Revenue (%)",
        &k.platform_shares()
            .into_iter()
            .map(|(platform, share)| (platform.label().to_string(), share))
            .collect::<Vec<_>>(),
        |_| NAVY,
        |v| format!("{v:.1}%"),
    )?;
    bar_panel(
        &panels[1],
        "Campaigns by Deal Status",
        "Campaigns",
        &k.deal_status_counts
            .iter()
            .map(|d| (d.deal_status.label().to_string(), d.campaigns as f64))
            .collect::<Vec<_>>(),
        |_| AMBER,
        |v| format!("{v:.0}"),
    )?;

    root.present()?;
    Ok(())
}

fn correlation_matrix(report: &MetricsReport, path: &Path, size: (u32, u32)) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let matrix = &report.statistics.correlations;
    let labels: Vec<String> = matrix.columns.iter().map(|c| c.to_string()).collect();
    let k = labels.len() as i32;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Matrix: Key Metrics", (FONT, 26))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(120)
        .build_cartesian_2d((0..k).into_segmented(), (0..k).into_segmented())?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(labels.len())
        .y_labels(labels.len())
        .x_label_formatter(&|v| segment_label(&labels, v))
        .y_label_formatter(&|v| segment_label(&labels, v))
        .x_label_style((FONT, 11))
        .y_label_style((FONT, 11))
        .draw()?;

    let cells = || {
        matrix
            .values
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, r)| (i as i32, j as i32, *r)))
    };

    chart.draw_series(cells().map(|(i, j, r)| {
        let fill = r.map(diverging).unwrap_or(UNDEFINED_CELL);
        Rectangle::new(
            [
                (SegmentValue::Exact(j), SegmentValue::Exact(i)),
                (SegmentValue::Exact(j + 1), SegmentValue::Exact(i + 1)),
            ],
            fill.filled(),
        )
    }))?;

    let centered = Pos::new(HPos::Center, VPos::Center);
    chart.draw_series(cells().map(|(i, j, r)| {
        let text = r.map(|r| format!("{r:.2}")).unwrap_or_else(|| "n/a".into());
        Text::new(
            text,
            (SegmentValue::CenterOf(j), SegmentValue::CenterOf(i)),
            TextStyle::from((FONT, 12).into_font()).color(&BLACK).pos(centered),
        )
    }))?;

    root.present()?;
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn bar_panel(
    area: &Area<'_>,
    title: &str,
    y_desc: &str,
    bars: &[(String, f64)],
    color: impl Fn(f64) -> RGBColor,
    value_label: impl Fn(f64) -> String,
) -> DrawResult {
    let labels: Vec<String> = bars.iter().map(|(l, _)| l.clone()).collect();
    let peak = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let n = bars.len() as i32;

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..headroom(peak))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .y_desc(y_desc)
        .x_label_formatter(&|v| segment_label(&labels, v))
        .x_label_style((FONT, 11))
        .y_label_formatter(&|y| format!("{y:.1}"))
        .draw()?;

    let margin = segment_width(&chart.plotting_area().dim_in_pixel(), bars.len()) / 6;
    chart.draw_series(
        bars.iter()
            .enumerate()
            .map(|(i, (_, v))| bar(i as i32, *v, color(*v), (margin, margin))),
    )?;

    let above = Pos::new(HPos::Center, VPos::Bottom);
    chart.draw_series(bars.iter().enumerate().map(|(i, (_, v))| {
        Text::new(
            value_label(*v),
            (SegmentValue::CenterOf(i as i32), *v),
            TextStyle::from((FONT, 12).into_font()).color(&BLACK).pos(above),
        )
    }))?;
    Ok(())
}

/// A bar filling segment `i` from zero to `value`, inset by `(left, right)` pixels.
fn bar(i: i32, value: f64, color: RGBColor, (left, right): (u32, u32)) -> Rectangle<(SegmentValue<i32>, f64)> {
    let mut rect = Rectangle::new(
        [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), value)],
        color.filled(),
    );
    rect.set_margin(0, 0, left, right);
    rect
}

fn segment_label(labels: &[String], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn segment_width(plot_px: &(u32, u32), segments: usize) -> u32 {
    plot_px.0 / segments.max(1) as u32
}

/// Upper axis bound leaving room above the tallest bar.
fn headroom(peak: f64) -> f64 {
    if peak > 0.0 {
        peak * 1.15
    } else {
        1.0
    }
}

/// Blue for -1, white for 0, red for +1.
fn diverging(r: f64) -> RGBColor {
    let r = r.clamp(-1.0, 1.0);
    let fade = |c: u8, t: f64| (255.0 - (255.0 - c as f64) * t).round() as u8;
    if r >= 0.0 {
        RGBColor(fade(178, r), fade(24, r), fade(43, r))
    } else {
        RGBColor(fade(33, -r), fade(102, -r), fade(172, -r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diverging_scale_endpoints() {
        assert_eq!(diverging(0.0), RGBColor(255, 255, 255));
        assert_eq!(diverging(1.0), RGBColor(178, 24, 43));
        assert_eq!(diverging(-1.0), RGBColor(33, 102, 172));
    }

    #[test]
    fn segment_labels_only_at_centers() {
        let labels = vec!["Q1 2025".to_string(), "Q2 2025".to_string()];
        assert_eq!(segment_label(&labels, &SegmentValue::CenterOf(1)), "Q2 2025");
        assert_eq!(segment_label(&labels, &SegmentValue::CenterOf(2)), "");
        assert_eq!(segment_label(&labels, &SegmentValue::Exact(0)), "");
    }

    #[test]
    fn headroom_never_collapses_the_axis() {
        assert_eq!(headroom(0.0), 1.0);
        assert!((headroom(10.0) - 11.5).abs() < 1e-9);
    }
}
