use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::stock::normalize_symbol;
use super::transaction::Transaction;
use crate::errors::CoreError;

/// The persisted subset of a portfolio: cash plus share counts.
/// Transaction history is deliberately not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub balance: Decimal,
    pub holdings: BTreeMap<String, u64>,
}

impl Snapshot {
    /// Check that the snapshot describes a valid portfolio.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.balance < Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Snapshot balance {} is negative",
                self.balance
            )));
        }

        let mut seen = BTreeSet::new();
        for (symbol, qty) in &self.holdings {
            let normalized = normalize_symbol(symbol);
            if normalized.is_empty() {
                return Err(CoreError::ValidationError(
                    "Snapshot contains an empty symbol".into(),
                ));
            }
            if *qty == 0 {
                return Err(CoreError::ValidationError(format!(
                    "Snapshot holds zero shares of {normalized}"
                )));
            }
            if !seen.insert(normalized) {
                return Err(CoreError::ValidationError(format!(
                    "Snapshot lists {} more than once",
                    symbol.trim()
                )));
            }
        }
        Ok(())
    }
}

/// Cash, holdings and trade history of the single trader.
///
/// Fields are only mutated by `PortfolioService` (buy/sell) and
/// [`Portfolio::restore`]; everything else reads through accessors.
#[derive(Debug, Clone, Serialize)]
pub struct Portfolio {
    /// Cash available for trading
    pub(crate) balance: Decimal,

    /// Symbol → shares owned. Never contains a zero entry.
    pub(crate) holdings: BTreeMap<String, u64>,

    /// Every executed trade, oldest first
    pub(crate) history: Vec<Transaction>,

    /// Balance the ledger reconciles from
    pub(crate) opening_balance: Decimal,

    /// Index of the first history entry that counts towards `balance`.
    /// Moves to the end of history on restore.
    pub(crate) ledger_start: usize,
}

impl Portfolio {
    pub fn new(starting_balance: Decimal) -> Result<Self, CoreError> {
        if starting_balance < Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Starting balance {starting_balance} must not be negative"
            )));
        }
        Ok(Self {
            balance: starting_balance,
            holdings: BTreeMap::new(),
            history: Vec::new(),
            opening_balance: starting_balance,
            ledger_start: 0,
        })
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn holdings(&self) -> &BTreeMap<String, u64> {
        &self.holdings
    }

    /// Trade history in execution order. May be empty.
    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    pub fn opening_balance(&self) -> Decimal {
        self.opening_balance
    }

    pub fn ledger_start(&self) -> usize {
        self.ledger_start
    }

    /// Externalize balance and holdings.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            balance: self.balance,
            holdings: self.holdings.clone(),
        }
    }

    /// Replace balance and holdings wholesale. The snapshot is validated
    /// first; on error nothing changes. Session history is kept, but the
    /// ledger restarts from the restored balance.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), CoreError> {
        snapshot.validate()?;
        let holdings = snapshot
            .holdings
            .into_iter()
            .map(|(symbol, qty)| (normalize_symbol(&symbol), qty))
            .collect();
        self.balance = snapshot.balance;
        self.holdings = holdings;
        self.opening_balance = snapshot.balance;
        self.ledger_start = self.history.len();
        Ok(())
    }
}
