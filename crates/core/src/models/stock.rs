use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical form of a ticker symbol: trimmed and uppercased.
///
/// Every symbol comparison in the crate goes through this.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// A tradable security with its live price.
///
/// **Equality** is based solely on `symbol`, NOT on `name` or `price`,
/// so a stock keeps its identity while the market moves it around.
/// Fields are read-only outside this module; only the market moves prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StockRecord")]
pub struct Stock {
    /// Ticker symbol, normalized (e.g., "AAPL", "TSLA")
    symbol: String,

    /// Human-readable name (e.g., "Apple Inc.")
    name: String,

    /// Current price per share
    price: Decimal,
}

/// Wire shape of a [`Stock`]; deserialization goes through [`Stock::new`].
#[derive(Deserialize)]
struct StockRecord {
    symbol: String,
    name: String,
    price: Decimal,
}

impl From<StockRecord> for Stock {
    fn from(record: StockRecord) -> Self {
        Stock::new(record.symbol, record.name, record.price)
    }
}

impl PartialEq for Stock {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Stock {}

impl Stock {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        let symbol: String = symbol.into();
        Self {
            symbol: normalize_symbol(&symbol),
            name: name.into(),
            price,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Case-insensitive symbol match.
    pub fn matches(&self, symbol: &str) -> bool {
        self.symbol == normalize_symbol(symbol)
    }

    /// Apply a price change, rounded to cents and clamped to `floor`.
    pub(crate) fn apply_change(&mut self, change: Decimal, floor: Decimal) {
        let moved = self.price.saturating_add(change).round_dp(2);
        self.price = moved.max(floor);
    }

    /// Raise the price to `floor` if it sits below it.
    pub(crate) fn raise_to(&mut self, floor: Decimal) {
        self.price = self.price.max(floor);
    }
}

impl std::fmt::Display for Stock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) - ${:.2}", self.symbol, self.name, self.price)
    }
}
