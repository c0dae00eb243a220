//! Run configuration for both pipelines.
//!
//! RULE: components never read ambient state. The runner builds a
//! GeneratorConfig or ReportConfig and passes it in explicitly.

use crate::{
    error::{AdSalesError, AdSalesResult},
    record::{CPM_BOUNDS, CTR_BOUNDS, DELIVERY_RATE_BOUNDS, IMPRESSIONS_BOUNDS},
    types::{AccountTier, AdFormat, DealStatus, PaymentStatus, Platform, Quarter},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_ROWS: usize = 2400;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_DATA_PATH: &str = "data/ad_sales_data.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "dashboards";

// ── Distribution parameters ───────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Gaussian {
    pub mean: f64,
    pub std_dev: f64,
}

/// Parameters of the underlying normal of a log-normal draw.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LogNormalParams {
    pub mu: f64,
    pub sigma: f64,
}

/// Inclusive clip bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClipRange {
    pub min: f64,
    pub max: f64,
}

impl ClipRange {
    pub fn clip(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImpressionsProfile {
    pub distribution: LogNormalParams,
    pub range: ClipRange,
}

impl Default for ImpressionsProfile {
    fn default() -> Self {
        Self {
            distribution: LogNormalParams { mu: 12.0, sigma: 0.8 },
            range: ClipRange { min: 50_000.0, max: 10_000_000.0 },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CtrProfile {
    pub base: Gaussian,
    pub range: ClipRange,
    /// Additive boost per ad format; formats not listed get none.
    pub format_boost: BTreeMap<AdFormat, f64>,
}

impl Default for CtrProfile {
    fn default() -> Self {
        Self {
            base: Gaussian { mean: 0.015, std_dev: 0.005 },
            range: ClipRange { min: 0.002, max: 0.06 },
            format_boost: BTreeMap::from([
                (AdFormat::VideoPreRoll, 0.008),
                (AdFormat::HomepageTakeover, 0.012),
                (AdFormat::SponsoredStream, 0.010),
                (AdFormat::InteractiveOverlay, 0.006),
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CpmProfile {
    pub base: Gaussian,
    pub range: ClipRange,
    pub format_adjust: BTreeMap<AdFormat, f64>,
    pub tier_adjust: BTreeMap<AccountTier, f64>,
    pub quarter_adjust: BTreeMap<Quarter, f64>,
}

impl Default for CpmProfile {
    fn default() -> Self {
        Self {
            base: Gaussian { mean: 18.0, std_dev: 5.0 },
            range: ClipRange { min: 5.0, max: 55.0 },
            format_adjust: BTreeMap::from([
                (AdFormat::HomepageTakeover, 15.0),
                (AdFormat::VideoPreRoll, 8.0),
                (AdFormat::SponsoredStream, 10.0),
            ]),
            tier_adjust: BTreeMap::from([(AccountTier::Enterprise, 3.0)]),
            quarter_adjust: BTreeMap::from([(Quarter::Q4, 5.0)]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FinanceProfile {
    pub budget_variance: Gaussian,
    /// Keeps `1 + variance` strictly positive.
    pub budget_variance_range: ClipRange,
    pub delivery_rate: Gaussian,
    pub delivery_rate_range: ClipRange,
    pub cost_fraction: Gaussian,
    pub cost_fraction_range: ClipRange,
}

impl Default for FinanceProfile {
    fn default() -> Self {
        Self {
            budget_variance: Gaussian { mean: 0.0, std_dev: 0.12 },
            budget_variance_range: ClipRange { min: -0.9, max: 0.9 },
            delivery_rate: Gaussian { mean: 0.92, std_dev: 0.08 },
            delivery_rate_range: ClipRange { min: 0.60, max: 1.05 },
            cost_fraction: Gaussian { mean: 0.35, std_dev: 0.10 },
            cost_fraction_range: ClipRange { min: 0.15, max: 0.65 },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoryWeights {
    pub account_tier: BTreeMap<AccountTier, f64>,
    pub ad_format: BTreeMap<AdFormat, f64>,
    pub platform: BTreeMap<Platform, f64>,
    pub quarter: BTreeMap<Quarter, f64>,
    pub deal_status: BTreeMap<DealStatus, f64>,
    /// Used only for rows that are not In Flight.
    pub payment_status: BTreeMap<PaymentStatus, f64>,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            account_tier: BTreeMap::from([
                (AccountTier::Enterprise, 0.30),
                (AccountTier::MidMarket, 0.45),
                (AccountTier::Growth, 0.25),
            ]),
            ad_format: BTreeMap::from([
                (AdFormat::VideoPreRoll, 0.30),
                (AdFormat::DisplayBanner, 0.20),
                (AdFormat::HomepageTakeover, 0.10),
                (AdFormat::SponsoredStream, 0.20),
                (AdFormat::InteractiveOverlay, 0.10),
                (AdFormat::AudioAd, 0.10),
            ]),
            platform: BTreeMap::from([
                (Platform::Desktop, 0.25),
                (Platform::Mobile, 0.35),
                (Platform::Ctv, 0.15),
                (Platform::MultiPlatform, 0.25),
            ]),
            quarter: BTreeMap::from([
                (Quarter::Q1, 0.20),
                (Quarter::Q2, 0.25),
                (Quarter::Q3, 0.25),
                (Quarter::Q4, 0.30),
            ]),
            deal_status: BTreeMap::from([
                (DealStatus::ClosedWon, 0.60),
                (DealStatus::InFlight, 0.25),
                (DealStatus::RenewalPending, 0.15),
            ]),
            payment_status: BTreeMap::from([
                (PaymentStatus::Received, 0.55),
                (PaymentStatus::Invoiced, 0.30),
                (PaymentStatus::Overdue, 0.15),
            ]),
        }
    }
}

/// Every tunable distribution of the synthesizer.
/// `Default` reproduces the reference dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationProfile {
    pub weights: CategoryWeights,
    pub impressions: ImpressionsProfile,
    pub ctr: CtrProfile,
    pub cpm: CpmProfile,
    pub finance: FinanceProfile,
}

impl GenerationProfile {
    /// Load a profile from JSON. Missing fields keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let profile: GenerationProfile = serde_json::from_str(&content)?;
        Ok(profile)
    }

    pub fn validate(&self) -> AdSalesResult<()> {
        let w = &self.weights;
        check_weights("account_tier", w.account_tier.values())?;
        check_weights("ad_format", w.ad_format.values())?;
        check_weights("platform", w.platform.values())?;
        check_weights("quarter", w.quarter.values())?;
        check_weights("deal_status", w.deal_status.values())?;
        check_weights("payment_status", w.payment_status.values())?;
        if w.payment_status.contains_key(&PaymentStatus::Pending) {
            return Err(AdSalesError::Config(
                "payment_status weights must not include Pending; it is reserved for In Flight deals"
                    .into(),
            ));
        }

        check_std_dev("impressions.distribution", self.impressions.distribution.sigma)?;
        check_std_dev("ctr.base", self.ctr.base.std_dev)?;
        check_std_dev("cpm.base", self.cpm.base.std_dev)?;
        check_std_dev("finance.budget_variance", self.finance.budget_variance.std_dev)?;
        check_std_dev("finance.delivery_rate", self.finance.delivery_rate.std_dev)?;
        check_std_dev("finance.cost_fraction", self.finance.cost_fraction.std_dev)?;

        check_range("impressions.range", &self.impressions.range)?;
        check_range("ctr.range", &self.ctr.range)?;
        check_range("cpm.range", &self.cpm.range)?;
        check_range("finance.delivery_rate_range", &self.finance.delivery_rate_range)?;
        check_range("finance.cost_fraction_range", &self.finance.cost_fraction_range)?;
        check_range("finance.budget_variance_range", &self.finance.budget_variance_range)?;

        let (imp_lo, imp_hi) = IMPRESSIONS_BOUNDS;
        check_within("impressions.range", &self.impressions.range, (imp_lo as f64, imp_hi as f64))?;
        check_within("ctr.range", &self.ctr.range, CTR_BOUNDS)?;
        check_within("cpm.range", &self.cpm.range, CPM_BOUNDS)?;
        check_within("finance.delivery_rate_range", &self.finance.delivery_rate_range, DELIVERY_RATE_BOUNDS)?;
        let variance = &self.finance.budget_variance_range;
        if variance.min <= -1.0 || variance.max >= 1.0 {
            return Err(AdSalesError::Config(
                "finance.budget_variance_range must lie strictly inside (-1, 1)".into(),
            ));
        }
        Ok(())
    }
}

fn check_weights<'a>(name: &str, weights: impl Iterator<Item = &'a f64>) -> AdSalesResult<()> {
    let mut total = 0.0;
    for w in weights {
        if !w.is_finite() || *w < 0.0 {
            return Err(AdSalesError::Config(format!("{name} weight {w} must be non-negative")));
        }
        total += w;
    }
    if total <= 0.0 {
        return Err(AdSalesError::Config(format!("{name} weights must have a positive sum")));
    }
    Ok(())
}

fn check_std_dev(name: &str, value: f64) -> AdSalesResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AdSalesError::Config(format!(
            "{name} standard deviation {value} must be finite and non-negative"
        )));
    }
    Ok(())
}

fn check_range(name: &str, range: &ClipRange) -> AdSalesResult<()> {
    if !(range.min.is_finite() && range.max.is_finite()) || range.min > range.max {
        return Err(AdSalesError::Config(format!(
            "{name} [{}, {}] is not an ordered finite range",
            range.min, range.max
        )));
    }
    Ok(())
}

/// Profiles may narrow the stored-row bounds but never widen them.
fn check_within(name: &str, range: &ClipRange, (lo, hi): (f64, f64)) -> AdSalesResult<()> {
    if range.min < lo || range.max > hi {
        return Err(AdSalesError::Config(format!(
            "{name} [{}, {}] must lie within [{lo}, {hi}]",
            range.min, range.max
        )));
    }
    Ok(())
}

// ── Pipeline configs ───────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub rows: usize,
    /// `None` draws a master seed from entropy; the seed is logged.
    pub seed: Option<u64>,
    pub output_path: PathBuf,
    pub profile: GenerationProfile,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            seed: Some(DEFAULT_SEED),
            output_path: PathBuf::from(DEFAULT_DATA_PATH),
            profile: GenerationProfile::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> AdSalesResult<()> {
        if self.rows == 0 {
            return Err(AdSalesError::Config("row count must be at least 1".into()));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(AdSalesError::Config("output path must not be empty".into()));
        }
        self.profile.validate()
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    /// Chart size in pixels (width, height).
    pub chart_size: (u32, u32),
    /// Quarter used for the monthly forecast breakdown.
    pub forecast_quarter: Quarter,
    pub render_charts: bool,
    pub write_summary: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_DATA_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            chart_size: (1200, 600),
            forecast_quarter: Quarter::Q4,
            render_charts: true,
            write_summary: true,
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> AdSalesResult<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(AdSalesError::Config("input path must not be empty".into()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(AdSalesError::Config("output directory must not be empty".into()));
        }
        if self.chart_size.0 < 200 || self.chart_size.1 < 200 {
            return Err(AdSalesError::Config(format!(
                "chart size {}x{} is too small",
                self.chart_size.0, self.chart_size.1
            )));
        }
        Ok(())
    }
}

/// Parse a quarter label such as "Q4 2025".
pub fn parse_quarter(label: &str) -> AdSalesResult<Quarter> {
    Quarter::from_label(label.trim())
        .ok_or_else(|| AdSalesError::Config(format!("unknown quarter '{label}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        GenerationProfile::default().validate().unwrap();
        GeneratorConfig::default().validate().unwrap();
        ReportConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_rows_is_a_config_error() {
        let cfg = GeneratorConfig { rows: 0, ..GeneratorConfig::default() };
        assert!(matches!(cfg.validate(), Err(AdSalesError::Config(_))));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "cpm": { "base": { "mean": 25.0, "std_dev": 2.0 } } }"#;
        let profile: GenerationProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.cpm.base.mean, 25.0);
        assert_eq!(profile.cpm.range, CpmProfile::default().range);
        assert_eq!(profile.weights, CategoryWeights::default());
    }

    #[test]
    fn weight_maps_use_file_labels() {
        let json = r#"{ "weights": { "platform": { "CTV": 1.0, "Multi-Platform": 0.0 } } }"#;
        let profile: GenerationProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.weights.platform.get(&Platform::Ctv), Some(&1.0));
        profile.validate().unwrap();
    }

    #[test]
    fn pending_payment_weight_is_rejected() {
        let mut profile = GenerationProfile::default();
        profile.weights.payment_status.insert(PaymentStatus::Pending, 0.1);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut profile = GenerationProfile::default();
        profile.cpm.range = ClipRange { min: 50.0, max: 10.0 };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn widened_range_is_rejected() {
        let mut profile = GenerationProfile::default();
        profile.cpm.range = ClipRange { min: 5.0, max: 80.0 };
        assert!(profile.validate().is_err());
        profile.cpm.range = ClipRange { min: 10.0, max: 40.0 };
        profile.validate().unwrap();
    }

    #[test]
    fn quarter_labels_parse() {
        assert_eq!(parse_quarter("Q2 2025").unwrap(), Quarter::Q2);
        assert!(parse_quarter("Q5 2025").is_err());
    }
}
