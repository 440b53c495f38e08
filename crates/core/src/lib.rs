pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use models::{
    market::Market,
    portfolio::{Portfolio, Snapshot},
    settings::Settings,
    stock::Stock,
    transaction::Transaction,
    valuation::PortfolioValuation,
};
use providers::{random_walk::RandomWalk, traits::PriceWalk};
use rust_decimal::Decimal;
use serde::Serialize;
use services::{
    portfolio_service::PortfolioService, price_service::PriceService,
    valuation_service::ValuationService,
};
use std::collections::BTreeMap;
use std::path::Path;
use storage::manager::StorageManager;
use tracing::{info, warn};

use errors::CoreError;

/// Main entry point for the stock-sim core library.
/// Owns the market, the portfolio and the services that operate on them;
/// a front-end drives one of these instead of any global state.
#[must_use]
pub struct TradingSimulator {
    settings: Settings,
    market: Market,
    portfolio: Portfolio,
    portfolio_service: PortfolioService,
    price_service: PriceService,
    valuation_service: ValuationService,
    /// Tracks whether any trade has happened since the last save/load.
    dirty: bool,
}

/// Serializable view used by [`TradingSimulator::to_json`].
#[derive(Serialize)]
struct SimulatorView<'a> {
    portfolio: &'a Portfolio,
    valuation: PortfolioValuation,
}

impl std::fmt::Debug for TradingSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingSimulator")
            .field("stocks", &self.market.len())
            .field("balance", &self.portfolio.balance())
            .field("holdings", &self.portfolio.holdings().len())
            .field("transactions", &self.portfolio.history().len())
            .field("price_service", &self.price_service)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl TradingSimulator {
    /// Start a simulator on the default listing, with prices driven by an
    /// entropy-seeded random walk.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        let walk = RandomWalk::from_entropy(settings.max_price_change);
        let market = Market::new(Market::default_listing().stocks().to_vec(), settings.price_floor);
        Self::with_parts(settings, market, Box::new(walk))
    }

    /// Start a simulator with an explicit market and price walk.
    pub fn with_parts(
        settings: Settings,
        market: Market,
        walk: Box<dyn PriceWalk>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let portfolio = Portfolio::new(settings.starting_balance)?;
        info!(
            balance = %settings.starting_balance,
            stocks = market.len(),
            walk = walk.name(),
            "simulator started"
        );
        Ok(Self {
            settings,
            market,
            portfolio,
            portfolio_service: PortfolioService::new(),
            price_service: PriceService::new(walk),
            valuation_service: ValuationService::new(),
            dirty: false,
        })
    }

    // ── Market ──────────────────────────────────────────────────────

    /// Move every market price by one step of the price walk.
    pub fn tick(&mut self) {
        self.price_service.update_market(&mut self.market);
    }

    #[must_use]
    pub fn market(&self) -> &Market {
        &self.market
    }

    /// Look up a listed stock (case-insensitive).
    pub fn find_stock(&self, symbol: &str) -> Result<&Stock, CoreError> {
        self.market.find_by_symbol(symbol)
    }

    /// Number of price updates applied so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.price_service.ticks()
    }

    // ── Trading ─────────────────────────────────────────────────────

    /// Buy shares of a listed stock at its current price.
    pub fn buy(&mut self, symbol: &str, quantity: u64) -> Result<Transaction, CoreError> {
        let stock = self.market.find_by_symbol(symbol)?;
        let transaction = self
            .portfolio_service
            .buy(&mut self.portfolio, stock, quantity)?;
        self.dirty = true;
        Ok(transaction)
    }

    /// Sell shares of a listed stock at its current price.
    pub fn sell(&mut self, symbol: &str, quantity: u64) -> Result<Transaction, CoreError> {
        let stock = self.market.find_by_symbol(symbol)?;
        let transaction = self
            .portfolio_service
            .sell(&mut self.portfolio, stock, quantity)?;
        self.dirty = true;
        Ok(transaction)
    }

    // ── Portfolio Views ─────────────────────────────────────────────

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.portfolio.balance()
    }

    #[must_use]
    pub fn holdings(&self) -> &BTreeMap<String, u64> {
        self.portfolio.holdings()
    }

    /// Shares held of `symbol` (case-insensitive), zero if none.
    #[must_use]
    pub fn holding(&self, symbol: &str) -> u64 {
        self.portfolio_service.holding(&self.portfolio, symbol)
    }

    /// Balance plus current market value of every listed holding.
    pub fn valuation(&self) -> Result<PortfolioValuation, CoreError> {
        self.valuation_service.value(&self.portfolio, &self.market)
    }

    /// All trades of this session, oldest first.
    #[must_use]
    pub fn transaction_log(&self) -> &[Transaction] {
        self.portfolio.history()
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.portfolio.history().len()
    }

    /// Check balance, holdings and ledger consistency.
    pub fn reconcile(&self) -> Result<(), CoreError> {
        self.portfolio_service.reconcile(&self.portfolio)
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Snapshots ───────────────────────────────────────────────────

    /// Balance and holdings as snapshot text. Clears the unsaved-changes flag.
    pub fn save_to_string(&mut self) -> String {
        let text = StorageManager::save_to_string(&self.portfolio);
        self.dirty = false;
        text
    }

    /// Replace balance and holdings from snapshot text. On error the
    /// portfolio is left untouched.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), CoreError> {
        let snapshot = StorageManager::load_from_str(text)?;
        self.apply_snapshot(snapshot)
    }

    /// Write the snapshot to `path`, overwriting it.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.portfolio, path)?;
        self.dirty = false;
        Ok(())
    }

    /// Replace balance and holdings from the snapshot at `path`.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let snapshot = StorageManager::load_from_file(path)?;
        self.apply_snapshot(snapshot)
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) -> Result<(), CoreError> {
        self.portfolio.restore(snapshot).inspect_err(|e| {
            warn!(error = %e, "snapshot rejected");
        })?;
        info!(
            balance = %self.portfolio.balance(),
            holdings = self.portfolio.holdings().len(),
            "portfolio loaded"
        );
        self.dirty = false;
        Ok(())
    }

    /// Save to the configured snapshot path.
    pub fn save(&mut self) -> Result<(), CoreError> {
        let path = self.settings.snapshot_path.clone();
        self.save_to_file(path)
    }

    /// Load from the configured snapshot path.
    pub fn load(&mut self) -> Result<(), CoreError> {
        let path = self.settings.snapshot_path.clone();
        self.load_from_file(path)
    }

    /// Returns `true` if a trade happened since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Export the transaction history as a JSON array.
    pub fn export_history_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self.portfolio.history()).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize history to JSON: {e}"))
        })
    }

    /// Export the transaction history as CSV.
    /// Columns: id, kind, symbol, unit_price, quantity, total, executed_at
    #[must_use]
    pub fn export_history_to_csv(&self) -> String {
        let mut csv = String::from("id,kind,symbol,unit_price,quantity,total,executed_at\n");
        for t in self.portfolio.history() {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                t.id(),
                t.kind(),
                t.symbol(),
                t.unit_price(),
                t.quantity(),
                t.total(),
                t.executed_at().to_rfc3339(),
            ));
        }
        csv
    }

    /// Full portfolio (balance, holdings, history) and current valuation as JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        let view = SimulatorView {
            portfolio: &self.portfolio,
            valuation: self.valuation()?,
        };
        Ok(serde_json::to_string_pretty(&view)?)
    }
}
