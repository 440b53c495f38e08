use rust_decimal::Decimal;
use thiserror::Error;

/// Unified error type for the entire stock-sim-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Trading ─────────────────────────────────────────────────────
    #[error("Insufficient funds to buy {symbol}: cost {cost:.2}, balance {balance:.2}")]
    InsufficientFunds {
        symbol: String,
        cost: Decimal,
        balance: Decimal,
    },

    #[error("Insufficient shares to sell {requested} {symbol}: only {held} held")]
    InsufficientShares {
        symbol: String,
        requested: u64,
        held: u64,
    },

    // ── Market ──────────────────────────────────────────────────────
    #[error("Stock not found: {0}")]
    StockNotFound(String),

    // ── Snapshot / File ─────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // ── Input / Invariants ──────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}
