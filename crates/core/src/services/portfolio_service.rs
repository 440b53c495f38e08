use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;
use crate::models::stock::{normalize_symbol, Stock};
use crate::models::transaction::{Transaction, TransactionKind};

/// Executes buys and sells against a portfolio and checks its invariants.
///
/// Pure business logic: no I/O. Every operation computes and checks
/// everything it needs before touching the portfolio, so a rejected trade
/// leaves balance, holdings and history exactly as they were.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Buy `quantity` shares of `stock` at its current price.
    pub fn buy(
        &self,
        portfolio: &mut Portfolio,
        stock: &Stock,
        quantity: u64,
    ) -> Result<Transaction, CoreError> {
        Self::validate_quantity(quantity)?;
        let cost = Self::trade_total(stock, quantity)?;

        if cost > portfolio.balance {
            warn!(
                symbol = %stock.symbol(),
                quantity,
                %cost,
                balance = %portfolio.balance,
                "buy rejected: insufficient funds"
            );
            return Err(CoreError::InsufficientFunds {
                symbol: stock.symbol().to_string(),
                cost,
                balance: portfolio.balance,
            });
        }

        let held = self.holding(portfolio, stock.symbol());
        let new_held = held.checked_add(quantity).ok_or_else(|| {
            CoreError::ValidationError(format!(
                "Holding {held} + {quantity} shares of {} overflows",
                stock.symbol()
            ))
        })?;

        // Commit: nothing below can fail
        portfolio.balance -= cost;
        portfolio.holdings.insert(stock.symbol().to_string(), new_held);
        let transaction =
            Transaction::new(TransactionKind::Buy, stock.symbol(), stock.price(), quantity, cost);
        portfolio.history.push(transaction.clone());

        info!(
            symbol = %stock.symbol(),
            quantity,
            price = %stock.price(),
            %cost,
            balance = %portfolio.balance,
            "bought shares"
        );
        Ok(transaction)
    }

    /// Sell `quantity` shares of `stock` at its current price.
    pub fn sell(
        &self,
        portfolio: &mut Portfolio,
        stock: &Stock,
        quantity: u64,
    ) -> Result<Transaction, CoreError> {
        Self::validate_quantity(quantity)?;

        let held = self.holding(portfolio, stock.symbol());
        if quantity > held {
            warn!(
                symbol = %stock.symbol(),
                requested = quantity,
                held,
                "sell rejected: insufficient shares"
            );
            return Err(CoreError::InsufficientShares {
                symbol: stock.symbol().to_string(),
                requested: quantity,
                held,
            });
        }

        let proceeds = Self::trade_total(stock, quantity)?;
        let new_balance = portfolio.balance.checked_add(proceeds).ok_or_else(|| {
            CoreError::ValidationError(format!(
                "Balance {} + proceeds {proceeds} overflows",
                portfolio.balance
            ))
        })?;

        // Commit
        portfolio.balance = new_balance;
        let remaining = held - quantity;
        if remaining == 0 {
            portfolio.holdings.remove(stock.symbol());
        } else {
            portfolio.holdings.insert(stock.symbol().to_string(), remaining);
        }
        let transaction = Transaction::new(
            TransactionKind::Sell,
            stock.symbol(),
            stock.price(),
            quantity,
            proceeds,
        );
        portfolio.history.push(transaction.clone());

        info!(
            symbol = %stock.symbol(),
            quantity,
            price = %stock.price(),
            %proceeds,
            balance = %portfolio.balance,
            "sold shares"
        );
        Ok(transaction)
    }

    /// Shares held of `symbol` (case-insensitive). Zero when not held.
    pub fn holding(&self, portfolio: &Portfolio, symbol: &str) -> u64 {
        portfolio
            .holdings
            .get(&normalize_symbol(symbol))
            .copied()
            .unwrap_or(0)
    }

    /// Verify that balance, holdings and ledger are mutually consistent:
    /// - balance is not negative
    /// - no holding is zero
    /// - opening balance minus buys plus sells (since the ledger start)
    ///   equals the balance
    pub fn reconcile(&self, portfolio: &Portfolio) -> Result<(), CoreError> {
        if portfolio.balance < Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Balance {} is negative",
                portfolio.balance
            )));
        }

        if let Some((symbol, _)) = portfolio.holdings.iter().find(|(_, qty)| **qty == 0) {
            return Err(CoreError::ValidationError(format!(
                "Holding for {symbol} is stored as zero"
            )));
        }

        let ledger = portfolio
            .history
            .get(portfolio.ledger_start..)
            .unwrap_or(&[]);
        let expected = ledger
            .iter()
            .fold(portfolio.opening_balance, |acc, t| match t.kind() {
                TransactionKind::Buy => acc - t.total(),
                TransactionKind::Sell => acc + t.total(),
            });

        if expected != portfolio.balance {
            return Err(CoreError::ValidationError(format!(
                "Ledger implies balance {expected} but portfolio holds {}",
                portfolio.balance
            )));
        }

        Ok(())
    }

    fn validate_quantity(quantity: u64) -> Result<(), CoreError> {
        if quantity == 0 {
            return Err(CoreError::ValidationError(
                "Trade quantity must be positive".into(),
            ));
        }
        Ok(())
    }

    /// `price × quantity`, without overflow. The price must be positive.
    fn trade_total(stock: &Stock, quantity: u64) -> Result<Decimal, CoreError> {
        if stock.price() <= Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Price {} of {} must be positive",
                stock.price(),
                stock.symbol()
            )));
        }
        stock
            .price()
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| {
                CoreError::ValidationError(format!(
                    "Trade value of {quantity} shares of {} at {} overflows",
                    stock.symbol(),
                    stock.price()
                ))
            })
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
