use rust_decimal::Decimal;
use tracing::debug;

use crate::models::market::Market;
use crate::models::stock::Stock;
use crate::providers::traits::PriceWalk;

/// Drives market price updates through an injected [`PriceWalk`].
pub struct PriceService {
    walk: Box<dyn PriceWalk>,
    ticks: u64,
}

impl PriceService {
    pub fn new(walk: Box<dyn PriceWalk>) -> Self {
        Self { walk, ticks: 0 }
    }

    /// Move every stock in the market by one step.
    pub fn update_market(&mut self, market: &mut Market) {
        let before: Vec<Decimal> = market.stocks().iter().map(Stock::price).collect();
        market.update_all(self.walk.as_mut());
        self.ticks += 1;

        for (stock, old) in market.stocks().iter().zip(before) {
            debug!(
                walk = self.walk.name(),
                tick = self.ticks,
                symbol = %stock.symbol(),
                %old,
                new = %stock.price(),
                "price moved"
            );
        }
    }

    /// Number of updates applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn walk_name(&self) -> &str {
        self.walk.name()
    }
}

impl std::fmt::Debug for PriceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceService")
            .field("walk", &self.walk.name())
            .field("ticks", &self.ticks)
            .finish()
    }
}
