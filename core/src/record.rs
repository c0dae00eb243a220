//! The campaign record: one row of the dataset.

use crate::{
    error::{AdSalesError, AdSalesResult},
    types::{
        AccountTier, AdFormat, Advertiser, CampaignId, DealStatus, Industry, Month, PaymentStatus,
        Platform, Quarter, SalesRep,
    },
};
use serde::{Deserialize, Serialize};

/// Column names in file order. The struct below must match this order.
pub const COLUMNS: [&str; 22] = [
    "campaign_id",
    "advertiser",
    "industry",
    "account_tier",
    "sales_rep",
    "ad_format",
    "platform",
    "quarter",
    "month",
    "impressions",
    "clicks",
    "ctr",
    "cpm",
    "booked_revenue",
    "budget",
    "actual_revenue",
    "delivery_rate",
    "cost_of_sale",
    "gross_margin",
    "margin_pct",
    "deal_status",
    "payment_status",
];

/// Hard bounds every stored row must satisfy, independent of the
/// generation profile that produced it.
pub const IMPRESSIONS_BOUNDS: (u64, u64) = (50_000, 10_000_000);
pub const CTR_BOUNDS: (f64, f64) = (0.002, 0.06);
pub const CPM_BOUNDS: (f64, f64) = (5.0, 55.0);
pub const DELIVERY_RATE_BOUNDS: (f64, f64) = (0.60, 1.05);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub campaign_id: CampaignId,
    pub advertiser: Advertiser,
    pub industry: Industry,
    pub account_tier: AccountTier,
    pub sales_rep: SalesRep,
    pub ad_format: AdFormat,
    pub platform: Platform,
    pub quarter: Quarter,
    pub month: Month,
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub cpm: f64,
    pub booked_revenue: f64,
    pub budget: f64,
    pub actual_revenue: f64,
    pub delivery_rate: f64,
    pub cost_of_sale: f64,
    pub gross_margin: f64,
    pub margin_pct: f64,
    pub deal_status: DealStatus,
    pub payment_status: PaymentStatus,
}

impl CampaignRecord {
    /// Actual minus budget.
    pub fn budget_variance(&self) -> f64 {
        self.actual_revenue - self.budget
    }

    /// Variance as a percentage of budget, rounded to 1 dp; 0 when budget is 0.
    pub fn variance_pct(&self) -> f64 {
        if self.budget == 0.0 {
            0.0
        } else {
            round_to(self.budget_variance() / self.budget * 100.0, 1)
        }
    }

    /// Check the structural invariants of a stored row.
    /// Used by the loader so bad files fail with the offending column named.
    pub fn validate(&self) -> AdSalesResult<()> {
        let out_of_range = |column: &'static str, value: String| AdSalesError::OutOfRange {
            column,
            campaign_id: self.campaign_id,
            value,
        };

        if self.impressions < IMPRESSIONS_BOUNDS.0 || self.impressions > IMPRESSIONS_BOUNDS.1 {
            return Err(out_of_range("impressions", self.impressions.to_string()));
        }
        if self.clicks > self.impressions {
            return Err(out_of_range("clicks", self.clicks.to_string()));
        }
        if !within(self.ctr, CTR_BOUNDS) {
            return Err(out_of_range("ctr", self.ctr.to_string()));
        }
        if !within(self.cpm, CPM_BOUNDS) {
            return Err(out_of_range("cpm", self.cpm.to_string()));
        }
        if !within(self.delivery_rate, DELIVERY_RATE_BOUNDS) {
            return Err(out_of_range("delivery_rate", self.delivery_rate.to_string()));
        }
        if self.advertiser.industry() != self.industry {
            return Err(out_of_range("industry", self.industry.to_string()));
        }
        if !self.quarter.contains(self.month) {
            return Err(out_of_range("month", self.month.to_string()));
        }
        if self.deal_status == DealStatus::InFlight && self.payment_status != PaymentStatus::Pending {
            return Err(out_of_range("payment_status", self.payment_status.to_string()));
        }
        for (column, value) in [
            ("booked_revenue", self.booked_revenue),
            ("budget", self.budget),
            ("actual_revenue", self.actual_revenue),
            ("cost_of_sale", self.cost_of_sale),
            ("gross_margin", self.gross_margin),
            ("margin_pct", self.margin_pct),
        ] {
            if !value.is_finite() {
                return Err(out_of_range(column, value.to_string()));
            }
        }
        Ok(())
    }
}

/// Margin percentage of actual revenue, rounded to 1 dp; 0 when actual is 0.
pub fn margin_pct(gross_margin: f64, actual_revenue: f64) -> f64 {
    if actual_revenue > 0.0 {
        round_to(gross_margin / actual_revenue * 100.0, 1)
    } else {
        0.0
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn within(value: f64, (lo, hi): (f64, f64)) -> bool {
    value.is_finite() && value >= lo && value <= hi
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A valid, hand-built record for unit tests.
    pub fn sample_record(campaign_id: CampaignId) -> CampaignRecord {
        CampaignRecord {
            campaign_id,
            advertiser: Advertiser::Nike,
            industry: Industry::Retail,
            account_tier: AccountTier::Enterprise,
            sales_rep: SalesRep::SarahK,
            ad_format: AdFormat::VideoPreRoll,
            platform: Platform::Mobile,
            quarter: Quarter::Q4,
            month: Month::Nov,
            impressions: 200_000,
            clicks: 4_000,
            ctr: 0.02,
            cpm: 30.0,
            booked_revenue: 6_000.0,
            budget: 5_500.0,
            actual_revenue: 5_400.0,
            delivery_rate: 0.9,
            cost_of_sale: 1_890.0,
            gross_margin: 3_510.0,
            margin_pct: 65.0,
            deal_status: DealStatus::ClosedWon,
            payment_status: PaymentStatus::Received,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::sample_record;
    use super::*;

    #[test]
    fn margin_pct_guards_zero_actual() {
        assert_eq!(margin_pct(0.0, 0.0), 0.0);
        assert_eq!(margin_pct(3_510.0, 5_400.0), 65.0);
    }

    #[test]
    fn variance_pct_guards_zero_budget() {
        let mut r = sample_record(1);
        r.budget = 0.0;
        assert_eq!(r.variance_pct(), 0.0);
    }

    #[test]
    fn validate_names_the_offending_column() {
        let mut r = sample_record(7);
        r.clicks = r.impressions + 1;
        match r.validate() {
            Err(AdSalesError::OutOfRange { column, campaign_id, .. }) => {
                assert_eq!(column, "clicks");
                assert_eq!(campaign_id, 7);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn month_outside_quarter_is_rejected() {
        let mut r = sample_record(1);
        r.month = Month::Feb;
        assert!(r.validate().is_err());
    }

    #[test]
    fn in_flight_must_be_pending() {
        let mut r = sample_record(1);
        r.deal_status = DealStatus::InFlight;
        assert!(r.validate().is_err());
        r.payment_status = PaymentStatus::Pending;
        r.validate().unwrap();
    }
}
