//! Dataset synthesizer: fabricates campaign records.
//!
//! GENERATION ORDER (fixed, documented, never reordered):
//!   1. advertiser → industry (fixed map, not sampled)
//!   2. tier, rep, format, platform, quarter, month-in-quarter
//!   3. impressions
//!   4. ctr (format boost) → clicks
//!   5. cpm (format, tier and quarter adjustments)
//!   6. booked revenue → budget
//!   7. delivery rate → actual revenue
//!   8. cost fraction → cost of sale → gross margin → margin %
//!   9. deal status → payment status
//!
//! RULES:
//!   - One record is built completely before the next one starts.
//!   - Each field group draws only from its own stream (see rng.rs).
//!   - In Flight deals are always Pending; Pending is never sampled.

use crate::{
    config::{GenerationProfile, GeneratorConfig},
    dataset,
    error::AdSalesResult,
    record::{margin_pct, round_to, CampaignRecord},
    rng::{RngBank, StreamRng, StreamSlot},
    types::{
        AccountTier, AdFormat, Advertiser, CampaignId, DealStatus, Industry, PaymentStatus,
        Platform, Quarter, SalesRep, FIRST_CAMPAIGN_ID,
    },
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Weight tables flattened into pick order once per run.
struct WeightTables {
    account_tier: Vec<(AccountTier, f64)>,
    ad_format: Vec<(AdFormat, f64)>,
    platform: Vec<(Platform, f64)>,
    quarter: Vec<(Quarter, f64)>,
    deal_status: Vec<(DealStatus, f64)>,
    payment_status: Vec<(PaymentStatus, f64)>,
}

impl WeightTables {
    fn from_profile(profile: &GenerationProfile) -> Self {
        fn flatten<T: Copy>(map: &BTreeMap<T, f64>) -> Vec<(T, f64)> {
            map.iter().map(|(k, w)| (*k, *w)).collect()
        }
        let w = &profile.weights;
        Self {
            account_tier: flatten(&w.account_tier),
            ad_format: flatten(&w.ad_format),
            platform: flatten(&w.platform),
            quarter: flatten(&w.quarter),
            deal_status: flatten(&w.deal_status),
            payment_status: flatten(&w.payment_status),
        }
    }
}

pub struct DatasetSynthesizer {
    profile: GenerationProfile,
    tables: WeightTables,
    identity: StreamRng,
    delivery: StreamRng,
    pricing: StreamRng,
    finance: StreamRng,
    status: StreamRng,
    next_id: CampaignId,
}

impl DatasetSynthesizer {
    /// Rejects a profile that fails validation, so every weight table
    /// the streams draw from is non-empty with a positive total.
    pub fn new(profile: GenerationProfile, master_seed: u64) -> AdSalesResult<Self> {
        profile.validate()?;
        let bank = RngBank::new(master_seed);
        log::debug!("Seeding synthesizer streams from master seed {}", bank.master_seed());
        Ok(Self {
            tables: WeightTables::from_profile(&profile),
            profile,
            identity: bank.for_stream(StreamSlot::Identity),
            delivery: bank.for_stream(StreamSlot::Delivery),
            pricing: bank.for_stream(StreamSlot::Pricing),
            finance: bank.for_stream(StreamSlot::Finance),
            status: bank.for_stream(StreamSlot::Status),
            next_id: FIRST_CAMPAIGN_ID,
        })
    }

    pub fn generate(&mut self, n: usize) -> Vec<CampaignRecord> {
        let records: Vec<CampaignRecord> = (0..n).map(|_| self.build_record()).collect();
        for stream in [&self.identity, &self.delivery, &self.pricing, &self.finance, &self.status] {
            log::trace!("stream '{}' advanced for {n} rows", stream.name);
        }
        records
    }

    /// Build the next record, applying the dependency chain in order.
    pub fn build_record(&mut self) -> CampaignRecord {
        let campaign_id = self.next_id;
        self.next_id += 1;

        // 1–2: identity and delivery context.
        let advertiser = self.identity.pick(Advertiser::ALL);
        let industry = advertiser.industry();
        let account_tier = self.identity.pick_weighted(&self.tables.account_tier);
        let sales_rep = self.identity.pick(SalesRep::ALL);
        let ad_format = self.identity.pick_weighted(&self.tables.ad_format);
        let platform = self.identity.pick_weighted(&self.tables.platform);
        let quarter = self.identity.pick_weighted(&self.tables.quarter);
        let month = self.identity.pick(&quarter.months());

        // 3–4: volume.
        let imp = &self.profile.impressions;
        let raw = self.delivery.log_normal(imp.distribution.mu, imp.distribution.sigma);
        let impressions = imp.range.clip(raw.trunc()) as u64;

        let ctr_p = &self.profile.ctr;
        let boost = ctr_p.format_boost.get(&ad_format).copied().unwrap_or(0.0);
        let ctr_raw = self.delivery.normal(ctr_p.base.mean, ctr_p.base.std_dev) + boost;
        let ctr = round_to(ctr_p.range.clip(ctr_raw), 4);
        let clicks = (impressions as f64 * ctr).floor() as u64;

        // 5: pricing.
        let cpm_p = &self.profile.cpm;
        let adjust = cpm_p.format_adjust.get(&ad_format).copied().unwrap_or(0.0)
            + cpm_p.tier_adjust.get(&account_tier).copied().unwrap_or(0.0)
            + cpm_p.quarter_adjust.get(&quarter).copied().unwrap_or(0.0);
        let cpm_raw = self.pricing.normal(cpm_p.base.mean, cpm_p.base.std_dev) + adjust;
        let cpm = round_to(cpm_p.range.clip(cpm_raw), 2);

        // 6–8: financial chain.
        let fin = &self.profile.finance;
        let booked_revenue = round_to(impressions as f64 * cpm / 1000.0, 2);

        let variance = fin.budget_variance_range.clip(
            self.finance.normal(fin.budget_variance.mean, fin.budget_variance.std_dev),
        );
        let budget = round_to(booked_revenue / (1.0 + variance), 2);

        let delivery_rate = round_to(
            fin.delivery_rate_range
                .clip(self.finance.normal(fin.delivery_rate.mean, fin.delivery_rate.std_dev)),
            3,
        );
        let actual_revenue = round_to(booked_revenue * delivery_rate, 2);

        let cost_fraction = round_to(
            fin.cost_fraction_range
                .clip(self.finance.normal(fin.cost_fraction.mean, fin.cost_fraction.std_dev)),
            3,
        );
        let cost_of_sale = round_to(actual_revenue * cost_fraction, 2);
        let gross_margin = round_to(actual_revenue - cost_of_sale, 2);
        let margin_pct = margin_pct(gross_margin, actual_revenue);

        // 9: status.
        let deal_status = self.status.pick_weighted(&self.tables.deal_status);
        let payment_status = if deal_status == DealStatus::InFlight {
            PaymentStatus::Pending
        } else {
            self.status.pick_weighted(&self.tables.payment_status)
        };

        CampaignRecord {
            campaign_id,
            advertiser,
            industry,
            account_tier,
            sales_rep,
            ad_format,
            platform,
            quarter,
            month,
            impressions,
            clicks,
            ctr,
            cpm,
            booked_revenue,
            budget,
            actual_revenue,
            delivery_rate,
            cost_of_sale,
            gross_margin,
            margin_pct,
            deal_status,
            payment_status,
        }
    }
}

// ── Run entry point ──────────────────────────────────────────────────────────

/// What a generation run produced, for logging and the console.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub rows: usize,
    pub seed: u64,
    pub output_path: PathBuf,
    pub industry_counts: Vec<(Industry, usize)>,
    pub format_counts: Vec<(AdFormat, usize)>,
    pub total_booked: f64,
    pub total_actual: f64,
    pub total_budget: f64,
    pub avg_margin_pct: f64,
    pub avg_cpm: f64,
}

impl GenerationSummary {
    pub fn from_records(records: &[CampaignRecord], seed: u64, output_path: PathBuf) -> Self {
        let n = records.len().max(1) as f64;
        Self {
            rows: records.len(),
            seed,
            output_path,
            industry_counts: value_counts(records.iter().map(|r| r.industry)),
            format_counts: value_counts(records.iter().map(|r| r.ad_format)),
            total_booked: records.iter().map(|r| r.booked_revenue).sum(),
            total_actual: records.iter().map(|r| r.actual_revenue).sum(),
            total_budget: records.iter().map(|r| r.budget).sum(),
            avg_margin_pct: records.iter().map(|r| r.margin_pct).sum::<f64>() / n,
            avg_cpm: records.iter().map(|r| r.cpm).sum::<f64>() / n,
        }
    }
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::render::money;
        writeln!(f, "Dataset created: {} campaigns (seed {})", self.rows, self.seed)?;
        writeln!(f, "  written to: {}", self.output_path.display())?;
        writeln!(f)?;
        writeln!(f, "Industries:")?;
        for (industry, count) in &self.industry_counts {
            writeln!(f, "  {:<15} {count:>6}", industry.label())?;
        }
        writeln!(f)?;
        writeln!(f, "Ad Formats:")?;
        for (format, count) in &self.format_counts {
            writeln!(f, "  {:<20} {count:>6}", format.label())?;
        }
        writeln!(f)?;
        writeln!(f, "Total Booked Revenue: ${}", money(self.total_booked, 2))?;
        writeln!(f, "Total Actual Revenue: ${}", money(self.total_actual, 2))?;
        writeln!(f, "Total Budget:         ${}", money(self.total_budget, 2))?;
        writeln!(f, "Avg Margin %:         {:.1}%", self.avg_margin_pct)?;
        write!(f, "Avg CPM:              ${:.2}", self.avg_cpm)
    }
}

/// Counts per value, most frequent first; ties keep declaration order.
fn value_counts<T: Ord + Copy>(values: impl Iterator<Item = T>) -> Vec<(T, usize)> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut out: Vec<(T, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Validate the config, generate the table, and write it atomically.
pub fn run(config: &GeneratorConfig) -> AdSalesResult<GenerationSummary> {
    config.validate()?;

    let seed = match config.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            log::info!("No seed supplied; drew master seed {seed} (pass --seed {seed} to reproduce)");
            seed
        }
    };

    log::info!("Generating {} campaign records (seed {seed})", config.rows);
    let mut synth = DatasetSynthesizer::new(config.profile.clone(), seed)?;
    let records = synth.generate(config.rows);

    dataset::write_csv(&config.output_path, &records)?;
    log::info!("Wrote {} rows to {}", records.len(), config.output_path.display());

    Ok(GenerationSummary::from_records(&records, seed, config.output_path.clone()))
}
