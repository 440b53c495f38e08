use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Value of a portfolio against one market snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    /// Cash balance
    pub balance: Decimal,

    /// Per-symbol breakdown, sorted by symbol
    pub holdings: Vec<HoldingValuation>,

    /// Sum of all `holdings[..].value`
    pub holdings_value: Decimal,

    /// `balance + holdings_value`
    pub total_value: Decimal,

    /// Held symbols the market no longer lists. They are left out of
    /// `holdings_value` and `total_value`.
    pub unpriced_symbols: Vec<String>,
}

/// Value of a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub symbol: String,
    pub quantity: u64,
    /// Market price at valuation time
    pub unit_price: Decimal,
    /// `quantity × unit_price`
    pub value: Decimal,
}
