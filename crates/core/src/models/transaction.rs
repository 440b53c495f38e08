use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Buy,
    Sell,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Buy => write!(f, "BUY"),
            TransactionKind::Sell => write!(f, "SELL"),
        }
    }
}

/// One executed buy or sell. Immutable once created: fields are private
/// and only readable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    kind: TransactionKind,
    symbol: String,
    /// Price per share at execution time
    unit_price: Decimal,
    quantity: u64,
    /// `unit_price × quantity`
    total: Decimal,
    executed_at: DateTime<Utc>,
}

impl Transaction {
    pub(crate) fn new(
        kind: TransactionKind,
        symbol: impl Into<String>,
        unit_price: Decimal,
        quantity: u64,
        total: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            symbol: symbol.into(),
            unit_price,
            quantity,
            total,
            executed_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} shares of {} at ${:.2} | Total: ${:.2}",
            self.kind, self.quantity, self.symbol, self.unit_price, self.total
        )
    }
}
