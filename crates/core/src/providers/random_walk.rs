use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::traits::PriceWalk;
use crate::models::stock::Stock;

/// Uniform random walk: every step is drawn from
/// `[-max_change, +max_change]` at cent resolution.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    rng: StdRng,
    /// Largest step, in cents
    max_cents: i64,
}

impl RandomWalk {
    /// `max_change` is taken by magnitude and saturates at `i64::MAX` cents.
    pub fn new(rng: StdRng, max_change: Decimal) -> Self {
        let max_cents = max_change
            .abs()
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.round().to_i64())
            .unwrap_or(i64::MAX);
        Self { rng, max_cents }
    }

    /// Reproducible walk for tests and replays.
    pub fn seeded(seed: u64, max_change: Decimal) -> Self {
        Self::new(StdRng::seed_from_u64(seed), max_change)
    }

    /// Walk seeded from the operating system.
    pub fn from_entropy(max_change: Decimal) -> Self {
        Self::new(StdRng::from_os_rng(), max_change)
    }

    pub fn max_change(&self) -> Decimal {
        Decimal::new(self.max_cents, 2)
    }
}

impl PriceWalk for RandomWalk {
    fn name(&self) -> &str {
        "RandomWalk"
    }

    fn next_change(&mut self, _stock: &Stock) -> Decimal {
        if self.max_cents == 0 {
            return Decimal::ZERO;
        }
        let cents = self.rng.random_range(-self.max_cents..=self.max_cents);
        Decimal::new(cents, 2)
    }
}
