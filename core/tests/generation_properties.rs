//! Row-level properties every synthesized table must satisfy,
//! whatever the seed.

use adsales_core::{
    config::GenerationProfile,
    generator::DatasetSynthesizer,
    record::{margin_pct, round_to, CampaignRecord, CPM_BOUNDS, CTR_BOUNDS, IMPRESSIONS_BOUNDS},
    types::{AccountTier, AdFormat, DealStatus, PaymentStatus, Quarter},
};
use std::collections::{BTreeMap, HashSet};

fn table(seed: u64, rows: usize) -> Vec<CampaignRecord> {
    DatasetSynthesizer::new(GenerationProfile::default(), seed).unwrap().generate(rows)
}

#[test]
fn every_row_passes_record_validation() {
    for seed in [1, 42, 9_999] {
        for record in table(seed, 800) {
            record.validate().unwrap_or_else(|e| panic!("seed {seed}: {e}"));
        }
    }
}

#[test]
fn volume_and_price_stay_within_bounds() {
    for r in table(42, 2_400) {
        assert!((IMPRESSIONS_BOUNDS.0..=IMPRESSIONS_BOUNDS.1).contains(&r.impressions));
        assert!(r.ctr >= CTR_BOUNDS.0 && r.ctr <= CTR_BOUNDS.1, "ctr {}", r.ctr);
        assert!(r.cpm >= CPM_BOUNDS.0 && r.cpm <= CPM_BOUNDS.1, "cpm {}", r.cpm);
        assert!(r.clicks <= r.impressions);
        assert_eq!(r.clicks, (r.impressions as f64 * r.ctr).floor() as u64);
    }
}

#[test]
fn financial_chain_is_consistent() {
    for r in table(42, 2_400) {
        assert_eq!(r.booked_revenue, round_to(r.impressions as f64 * r.cpm / 1000.0, 2));
        assert_eq!(r.actual_revenue, round_to(r.booked_revenue * r.delivery_rate, 2));
        assert!((r.gross_margin - (r.actual_revenue - r.cost_of_sale)).abs() < 0.011);
        assert_eq!(r.margin_pct, margin_pct(r.gross_margin, r.actual_revenue));
        assert!(r.budget > 0.0, "budget must stay positive, row {}", r.campaign_id);

        // budget = booked / (1 + v) with v clipped to [-0.9, 0.9]
        let implied = r.booked_revenue / r.budget - 1.0;
        assert!(implied > -0.9 - 1e-3 && implied < 0.9 + 1e-3, "implied variance {implied}");
    }
}

#[test]
fn months_belong_to_their_quarter() {
    for r in table(3, 1_000) {
        assert!(r.quarter.contains(r.month), "{} is not in {}", r.month, r.quarter);
    }
}

#[test]
fn pending_payment_iff_in_flight() {
    for r in table(11, 1_500) {
        assert_eq!(
            r.deal_status == DealStatus::InFlight,
            r.payment_status == PaymentStatus::Pending,
            "row {}: {} / {}",
            r.campaign_id,
            r.deal_status,
            r.payment_status
        );
    }
}

#[test]
fn industry_follows_advertiser() {
    for r in table(5, 500) {
        assert_eq!(r.industry, r.advertiser.industry());
    }
}

#[test]
fn ids_are_unique_and_sequential() {
    let rows = table(8, 300);
    let ids: HashSet<_> = rows.iter().map(|r| r.campaign_id).collect();
    assert_eq!(ids.len(), rows.len());
    assert_eq!(rows.first().map(|r| r.campaign_id), Some(5001));
    assert_eq!(rows.last().map(|r| r.campaign_id), Some(5300));
}

#[test]
fn category_mix_tracks_weights() {
    let rows = table(42, 2_400);
    let mut tiers: BTreeMap<AccountTier, usize> = BTreeMap::new();
    let mut quarters: BTreeMap<Quarter, usize> = BTreeMap::new();
    for r in &rows {
        *tiers.entry(r.account_tier).or_default() += 1;
        *quarters.entry(r.quarter).or_default() += 1;
    }
    let share = |n: usize| n as f64 / rows.len() as f64;

    // Mid-Market is weighted 0.45; allow generous sampling noise.
    assert!((share(tiers[&AccountTier::MidMarket]) - 0.45).abs() < 0.05);
    assert!((share(quarters[&Quarter::Q4]) - 0.30).abs() < 0.05);
}

#[test]
fn premium_formats_price_higher_on_average() {
    let rows = table(42, 2_400);
    let avg_cpm = |format: AdFormat| {
        let cpms: Vec<f64> = rows.iter().filter(|r| r.ad_format == format).map(|r| r.cpm).collect();
        cpms.iter().sum::<f64>() / cpms.len() as f64
    };
    assert!(avg_cpm(AdFormat::HomepageTakeover) > avg_cpm(AdFormat::DisplayBanner));
    assert!(avg_cpm(AdFormat::VideoPreRoll) > avg_cpm(AdFormat::AudioAd));
}

#[test]
fn overridden_profile_is_honored() {
    let mut profile = GenerationProfile::default();
    profile.weights.deal_status = BTreeMap::from([(DealStatus::InFlight, 1.0)]);
    profile.validate().unwrap();

    let rows = DatasetSynthesizer::new(profile, 42).unwrap().generate(100);
    assert!(rows.iter().all(|r| r.payment_status == PaymentStatus::Pending));
}
