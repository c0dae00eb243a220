//! adsales: command-line runner for the ad-sales dataset and metrics report.
//!
//! Usage:
//!   adsales generate --rows 2400 --seed 42 --output data/ad_sales_data.csv
//!   adsales report --input data/ad_sales_data.csv --out-dir dashboards
//!   adsales run --seed 7 --forecast-quarter "Q3 2025"

use adsales_core::{
    config::{self, GenerationProfile, GeneratorConfig, ReportConfig},
    generator, report,
    types::Quarter,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "adsales")]
#[command(about = "Synthetic ad-sales campaign data and revenue analytics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the synthetic campaign table
    Generate {
        #[command(flatten)]
        generation: GenerationArgs,

        /// Where to write the CSV table
        #[arg(short, long, env = "ADSALES_DATA", default_value = config::DEFAULT_DATA_PATH)]
        output: PathBuf,
    },
    /// Analyze an existing campaign table
    Report {
        #[command(flatten)]
        reporting: ReportArgs,

        /// CSV table to analyze
        #[arg(short, long, env = "ADSALES_DATA", default_value = config::DEFAULT_DATA_PATH)]
        input: PathBuf,
    },
    /// Generate the table, then analyze it
    Run {
        #[command(flatten)]
        generation: GenerationArgs,

        #[command(flatten)]
        reporting: ReportArgs,

        /// CSV table written by generation and read by the report
        #[arg(long, env = "ADSALES_DATA", default_value = config::DEFAULT_DATA_PATH)]
        data: PathBuf,
    },
}

#[derive(Args)]
struct GenerationArgs {
    /// Number of campaign rows
    #[arg(long, env = "ADSALES_ROWS", default_value_t = config::DEFAULT_ROWS)]
    rows: usize,

    /// Master seed; equal seeds give byte-identical tables
    #[arg(long, env = "ADSALES_SEED", default_value_t = config::DEFAULT_SEED)]
    seed: u64,

    /// Draw the master seed from entropy; takes precedence over --seed and ADSALES_SEED
    #[arg(long)]
    unseeded: bool,

    /// JSON generation profile overriding the built-in distributions
    #[arg(long, env = "ADSALES_PROFILE")]
    profile: Option<PathBuf>,
}

impl GenerationArgs {
    fn master_seed(&self) -> Option<u64> {
        (!self.unseeded).then_some(self.seed)
    }
}

#[derive(Args)]
struct ReportArgs {
    /// Directory for charts and the JSON summary
    #[arg(long, env = "ADSALES_OUT_DIR", default_value = config::DEFAULT_OUTPUT_DIR)]
    out_dir: PathBuf,

    /// Quarter broken down month by month, e.g. "Q4 2025"
    #[arg(long, env = "ADSALES_FORECAST_QUARTER", default_value = "Q4 2025", value_parser = quarter_arg)]
    forecast_quarter: Quarter,

    /// Skip SVG chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Skip the JSON summary
    #[arg(long)]
    no_summary: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { generation, output } => cmd_generate(&generation, output),
        Commands::Report { reporting, input } => cmd_report(&reporting, input),
        Commands::Run { generation, reporting, data } => {
            cmd_generate(&generation, data.clone())?;
            println!();
            cmd_report(&reporting, data)
        }
    }
}

fn cmd_generate(args: &GenerationArgs, output_path: PathBuf) -> Result<()> {
    let profile = match &args.profile {
        Some(path) => load_profile(path)?,
        None => GenerationProfile::default(),
    };
    let config = GeneratorConfig {
        rows: args.rows,
        seed: args.master_seed(),
        output_path,
        profile,
    };

    let summary = generator::run(&config)
        .with_context(|| format!("generating {}", config.output_path.display()))?;
    println!("{summary}");
    Ok(())
}

fn cmd_report(args: &ReportArgs, input_path: PathBuf) -> Result<()> {
    let config = ReportConfig {
        input_path,
        output_dir: args.out_dir.clone(),
        forecast_quarter: args.forecast_quarter,
        render_charts: !args.no_charts,
        write_summary: !args.no_summary,
        ..ReportConfig::default()
    };

    let outcome = report::run(&config)
        .with_context(|| format!("reporting on {}", config.input_path.display()))?;

    println!("{}", outcome.report);
    if !outcome.charts.is_empty() {
        println!();
        for chart in &outcome.charts {
            println!("Saved: {}", chart.display());
        }
    }
    if let Some(path) = &outcome.summary_path {
        println!("Summary: {}", path.display());
    }
    Ok(())
}

fn load_profile(path: &Path) -> Result<GenerationProfile> {
    let profile = GenerationProfile::load(path)
        .with_context(|| format!("loading generation profile {}", path.display()))?;
    log::info!("Using generation profile {}", path.display());
    Ok(profile)
}

fn quarter_arg(s: &str) -> std::result::Result<Quarter, String> {
    config::parse_quarter(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generation(cli: Cli) -> GenerationArgs {
        match cli.command {
            Commands::Generate { generation, .. } | Commands::Run { generation, .. } => generation,
            Commands::Report { .. } => panic!("not a generation command"),
        }
    }

    #[test]
    fn unseeded_overrides_an_explicit_seed() {
        let cli = Cli::try_parse_from(["adsales", "generate", "--seed", "7", "--unseeded"]).unwrap();
        assert_eq!(generation(cli).master_seed(), None);
    }

    #[test]
    fn seed_flag_is_used_when_seeded() {
        let cli = Cli::try_parse_from(["adsales", "run", "--seed", "7"]).unwrap();
        assert_eq!(generation(cli).master_seed(), Some(7));
    }

    #[test]
    fn forecast_quarter_rejects_unknown_labels() {
        assert!(Cli::try_parse_from(["adsales", "report", "--forecast-quarter", "Q5 2025"]).is_err());
    }
}
