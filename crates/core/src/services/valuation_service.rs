use rust_decimal::Decimal;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::market::Market;
use crate::models::portfolio::Portfolio;
use crate::models::valuation::{HoldingValuation, PortfolioValuation};

/// Values a portfolio against the current market prices.
///
/// Holdings whose symbol the market no longer lists are left out of the
/// totals and reported in `unpriced_symbols` instead.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Fails with `ValidationError` if a value exceeds what a `Decimal`
    /// can hold.
    pub fn value(
        &self,
        portfolio: &Portfolio,
        market: &Market,
    ) -> Result<PortfolioValuation, CoreError> {
        let mut holdings = Vec::with_capacity(portfolio.holdings().len());
        let mut unpriced_symbols = Vec::new();
        let mut holdings_value = Decimal::ZERO;

        // BTreeMap iteration keeps the breakdown sorted by symbol
        for (symbol, &quantity) in portfolio.holdings() {
            match market.price_of(symbol) {
                Some(unit_price) => {
                    let value = unit_price
                        .checked_mul(Decimal::from(quantity))
                        .ok_or_else(|| overflow(format!("{quantity} shares of {symbol}")))?;
                    holdings_value = holdings_value
                        .checked_add(value)
                        .ok_or_else(|| overflow("holdings value".into()))?;
                    holdings.push(HoldingValuation {
                        symbol: symbol.clone(),
                        quantity,
                        unit_price,
                        value,
                    });
                }
                None => {
                    debug!(%symbol, quantity, "held symbol not listed, excluded from valuation");
                    unpriced_symbols.push(symbol.clone());
                }
            }
        }

        let total_value = portfolio
            .balance()
            .checked_add(holdings_value)
            .ok_or_else(|| overflow("total portfolio value".into()))?;

        Ok(PortfolioValuation {
            balance: portfolio.balance(),
            holdings,
            holdings_value,
            total_value,
            unpriced_symbols,
        })
    }
}

fn overflow(what: String) -> CoreError {
    CoreError::ValidationError(format!("Valuation of {what} overflows"))
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
