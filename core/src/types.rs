//! Shared categorical types used by both the synthesizer and the reporter.
//!
//! RULE: every categorical column in the dataset is one of these enums.
//! The serde name of each variant is the exact string written to the file,
//! so an unknown value is rejected at load time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable, unique identifier for a campaign row.
pub type CampaignId = u64;

/// First campaign id handed out by the synthesizer.
pub const FIRST_CAMPAIGN_ID: CampaignId = 5001;

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_label(s: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.label() == s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.label())
            }
        }
    };
}

categorical! {
    pub enum Advertiser {
        Nike => "Nike",
        Samsung => "Samsung",
        CocaCola => "Coca-Cola",
        Toyota => "Toyota",
        Netflix => "Netflix",
        Spotify => "Spotify",
        Adobe => "Adobe",
        Microsoft => "Microsoft",
        PepsiCo => "PepsiCo",
        ProcterGamble => "Procter & Gamble",
        Unilever => "Unilever",
        Meta => "Meta",
        Apple => "Apple",
        Disney => "Disney",
        WarnerBros => "Warner Bros",
        Sony => "Sony",
        EaGames => "EA Games",
        RiotGames => "Riot Games",
        RedBull => "Red Bull",
        Intel => "Intel",
    }
}

impl Advertiser {
    /// Industry is a fixed function of the advertiser, never sampled.
    pub fn industry(&self) -> Industry {
        match self {
            Self::Nike => Industry::Retail,
            Self::Samsung
            | Self::Adobe
            | Self::Microsoft
            | Self::Meta
            | Self::Apple
            | Self::Sony
            | Self::Intel => Industry::Technology,
            Self::CocaCola
            | Self::PepsiCo
            | Self::ProcterGamble
            | Self::Unilever
            | Self::RedBull => Industry::Cpg,
            Self::Toyota => Industry::Automotive,
            Self::Netflix | Self::Spotify | Self::Disney | Self::WarnerBros => {
                Industry::Entertainment
            }
            Self::EaGames | Self::RiotGames => Industry::Gaming,
        }
    }
}

categorical! {
    pub enum Industry {
        Retail => "Retail",
        Technology => "Technology",
        Cpg => "CPG",
        Automotive => "Automotive",
        Entertainment => "Entertainment",
        Gaming => "Gaming",
    }
}

categorical! {
    pub enum AccountTier {
        Enterprise => "Enterprise",
        MidMarket => "Mid-Market",
        Growth => "Growth",
    }
}

categorical! {
    pub enum SalesRep {
        SarahK => "Sarah K.",
        JamesL => "James L.",
        MariaG => "Maria G.",
        DavidR => "David R.",
        PriyaS => "Priya S.",
        AlexT => "Alex T.",
    }
}

categorical! {
    pub enum AdFormat {
        VideoPreRoll => "Video Pre-Roll",
        DisplayBanner => "Display Banner",
        HomepageTakeover => "Homepage Takeover",
        SponsoredStream => "Sponsored Stream",
        InteractiveOverlay => "Interactive Overlay",
        AudioAd => "Audio Ad",
    }
}

categorical! {
    pub enum Platform {
        Desktop => "Desktop",
        Mobile => "Mobile",
        Ctv => "CTV",
        MultiPlatform => "Multi-Platform",
    }
}

categorical! {
    pub enum Quarter {
        Q1 => "Q1 2025",
        Q2 => "Q2 2025",
        Q3 => "Q3 2025",
        Q4 => "Q4 2025",
    }
}

impl Quarter {
    /// The three months of this quarter, in calendar order.
    pub fn months(&self) -> [Month; 3] {
        match self {
            Self::Q1 => [Month::Jan, Month::Feb, Month::Mar],
            Self::Q2 => [Month::Apr, Month::May, Month::Jun],
            Self::Q3 => [Month::Jul, Month::Aug, Month::Sep],
            Self::Q4 => [Month::Oct, Month::Nov, Month::Dec],
        }
    }

    pub fn contains(&self, month: Month) -> bool {
        self.months().contains(&month)
    }
}

categorical! {
    pub enum Month {
        Jan => "Jan",
        Feb => "Feb",
        Mar => "Mar",
        Apr => "Apr",
        May => "May",
        Jun => "Jun",
        Jul => "Jul",
        Aug => "Aug",
        Sep => "Sep",
        Oct => "Oct",
        Nov => "Nov",
        Dec => "Dec",
    }
}

categorical! {
    pub enum DealStatus {
        ClosedWon => "Closed Won",
        InFlight => "In Flight",
        RenewalPending => "Renewal Pending",
    }
}

categorical! {
    pub enum PaymentStatus {
        Pending => "Pending",
        Received => "Received",
        Invoiced => "Invoiced",
        Overdue => "Overdue",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_advertiser_maps_to_a_known_industry() {
        for adv in Advertiser::ALL {
            assert!(Industry::ALL.contains(&adv.industry()), "{adv} has no industry");
        }
        assert_eq!(Advertiser::ALL.len(), 20);
    }

    #[test]
    fn labels_round_trip() {
        for q in Quarter::ALL {
            assert_eq!(Quarter::from_label(q.label()), Some(*q));
        }
        assert_eq!(AdFormat::from_label("Audio Ad"), Some(AdFormat::AudioAd));
        assert_eq!(AdFormat::from_label("Radio"), None);
    }

    #[test]
    fn quarter_months_are_disjoint() {
        let mut seen = Vec::new();
        for q in Quarter::ALL {
            for m in q.months() {
                assert!(!seen.contains(&m), "{m} appears in two quarters");
                seen.push(m);
            }
        }
        assert_eq!(seen.len(), 12);
    }
}
