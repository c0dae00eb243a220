//! Seeded random streams for the dataset synthesizer.
//!
//! RULE: Nothing in the synthesizer may call any platform RNG.
//! Every draw comes from a StreamRng derived from the run's master seed.
//!
//! Stream seeds are (master_seed XOR slot * golden-ratio constant), so
//! a new slot leaves the existing streams untouched and a change in one
//! field group's draws never shifts another group's values.

use rand::SeedableRng;
use rand_distr::{Distribution, LogNormal, Normal};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for one group of campaign fields.
pub struct StreamRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StreamRng {
    /// Create a stream RNG from the master seed and a stable
    /// stream index. The index must never change once assigned.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Gaussian draw. A zero standard deviation returns the mean.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.inner),
            Err(_) => mean,
        }
    }

    /// Log-normal draw; `mu` and `sigma` are the parameters of the
    /// underlying normal distribution.
    pub fn log_normal(&mut self, mu: f64, sigma: f64) -> f64 {
        match LogNormal::new(mu, sigma) {
            Ok(dist) => dist.sample(&mut self.inner),
            Err(_) => mu.exp(),
        }
    }

    /// Uniform choice from a non-empty slice.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.next_u64_below(items.len() as u64) as usize]
    }

    /// Weighted choice from a non-empty slice. Weights need not sum to 1;
    /// they are normalised by their total. Falls back to the last item on
    /// rounding drift.
    pub fn pick_weighted<T: Copy>(&mut self, items: &[(T, f64)]) -> T {
        let total: f64 = items.iter().map(|(_, w)| *w).sum();
        let roll = self.next_f64() * total;
        let mut cumulative = 0.0;
        for (item, weight) in items {
            cumulative += weight;
            if roll < cumulative {
                return *item;
            }
        }
        items[items.len() - 1].0
    }
}

/// All stream RNGs for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_stream(&self, slot: StreamSlot) -> StreamRng {
        StreamRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries. Only append.
/// Reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Identity = 0, // advertiser, tier, rep, format, platform, quarter, month
    Delivery = 1, // impressions, ctr
    Pricing = 2,  // cpm
    Finance = 3,  // budget variance, delivery rate, cost fraction
    Status = 4,   // deal and payment status
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Delivery => "delivery",
            Self::Pricing => "pricing",
            Self::Finance => "finance",
            Self::Status => "status",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RngBank::new(7).for_stream(StreamSlot::Pricing);
        let mut b = RngBank::new(7).for_stream(StreamSlot::Pricing);
        for _ in 0..50 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn streams_are_independent() {
        let bank = RngBank::new(7);
        let mut a = bank.for_stream(StreamSlot::Identity);
        let mut b = bank.for_stream(StreamSlot::Finance);
        let xs: Vec<u64> = (0..8).map(|_| a.next_u64_below(1_000_000)).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.next_u64_below(1_000_000)).collect();
        assert_ne!(xs, ys, "different slots must not share a sequence");
    }

    #[test]
    fn weighted_pick_respects_zero_weight() {
        let mut rng = RngBank::new(1).for_stream(StreamSlot::Status);
        let items = [("never", 0.0), ("always", 2.5)];
        for _ in 0..500 {
            assert_eq!(rng.pick_weighted(&items), "always");
        }
    }

    #[test]
    fn weighted_pick_tracks_weights() {
        let mut rng = RngBank::new(99).for_stream(StreamSlot::Identity);
        let items = [(0u8, 0.30), (1u8, 0.45), (2u8, 0.25)];
        let mut counts = [0usize; 3];
        for _ in 0..20_000 {
            counts[rng.pick_weighted(&items) as usize] += 1;
        }
        let share = counts[1] as f64 / 20_000.0;
        assert!((share - 0.45).abs() < 0.02, "share {share:.3} too far from 0.45");
    }

    #[test]
    fn zero_std_dev_returns_mean() {
        let mut rng = RngBank::new(3).for_stream(StreamSlot::Finance);
        assert_eq!(rng.normal(0.92, 0.0), 0.92);
    }
}
