use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::stock::Stock;
use crate::errors::CoreError;
use crate::providers::traits::PriceWalk;

/// Default lowest price any stock can fall to.
pub const DEFAULT_PRICE_FLOOR: Decimal = Decimal::ONE;

/// The ordered list of tradable stocks and their live prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "MarketRecord")]
pub struct Market {
    stocks: Vec<Stock>,
    price_floor: Decimal,
}

/// Wire shape of a [`Market`]; deserialization goes through [`Market::new`].
#[derive(Deserialize)]
struct MarketRecord {
    stocks: Vec<Stock>,
    price_floor: Decimal,
}

impl From<MarketRecord> for Market {
    fn from(record: MarketRecord) -> Self {
        Market::new(record.stocks, record.price_floor)
    }
}

impl Market {
    /// Build a market from a listing. Initial prices below the floor are
    /// raised to it so the floor holds from the start.
    pub fn new(stocks: Vec<Stock>, price_floor: Decimal) -> Self {
        let stocks = stocks
            .into_iter()
            .map(|mut s| {
                s.raise_to(price_floor);
                s
            })
            .collect();
        Self {
            stocks,
            price_floor,
        }
    }

    /// The four-stock listing the simulator opens with.
    pub fn default_listing() -> Self {
        Self::new(
            vec![
                Stock::new("AAPL", "Apple Inc.", Decimal::new(150_00, 2)),
                Stock::new("GOOGL", "Alphabet Inc.", Decimal::new(2800_00, 2)),
                Stock::new("TSLA", "Tesla Inc.", Decimal::new(700_00, 2)),
                Stock::new("AMZN", "Amazon.com Inc.", Decimal::new(3300_00, 2)),
            ],
            DEFAULT_PRICE_FLOOR,
        )
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn price_floor(&self) -> Decimal {
        self.price_floor
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    /// Case-insensitive exact symbol lookup.
    pub fn find_by_symbol(&self, symbol: &str) -> Result<&Stock, CoreError> {
        self.stocks
            .iter()
            .find(|s| s.matches(symbol))
            .ok_or_else(|| CoreError::StockNotFound(symbol.trim().to_string()))
    }

    /// Current price for a symbol, if it is listed.
    pub fn price_of(&self, symbol: &str) -> Option<Decimal> {
        self.find_by_symbol(symbol).ok().map(Stock::price)
    }

    /// Move every stock by one step of `walk`, then clamp to the floor.
    pub fn update_all(&mut self, walk: &mut dyn PriceWalk) {
        let floor = self.price_floor;
        for stock in &mut self.stocks {
            let change = walk.next_change(stock);
            stock.apply_change(change, floor);
        }
    }
}

impl Default for Market {
    fn default() -> Self {
        Self::default_listing()
    }
}
