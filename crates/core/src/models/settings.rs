use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::errors::CoreError;

/// Simulator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Cash the portfolio opens with.
    pub starting_balance: Decimal,

    /// Lowest price any stock can be moved to.
    pub price_floor: Decimal,

    /// Largest absolute price move per stock per tick.
    pub max_price_change: Decimal,

    /// Where `save()` / `load()` keep the snapshot.
    pub snapshot_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_balance: Decimal::new(10_000_00, 2),
            price_floor: Decimal::ONE,
            max_price_change: Decimal::new(5_00, 2),
            snapshot_path: "portfolio.txt".to_string(),
        }
    }
}

impl Settings {
    /// Defaults overridden by `SIM_STARTING_BALANCE`, `SIM_PRICE_FLOOR`,
    /// `SIM_MAX_PRICE_CHANGE` and `SIM_SNAPSHOT_PATH`. Missing or
    /// unparsable values keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let decimal_var = |name: &str, fallback: Decimal| {
            env::var(name)
                .ok()
                .and_then(|v| Decimal::from_str(v.trim()).ok())
                .unwrap_or(fallback)
        };

        Self {
            starting_balance: decimal_var("SIM_STARTING_BALANCE", defaults.starting_balance),
            price_floor: decimal_var("SIM_PRICE_FLOOR", defaults.price_floor),
            max_price_change: decimal_var("SIM_MAX_PRICE_CHANGE", defaults.max_price_change),
            snapshot_path: env::var("SIM_SNAPSHOT_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(defaults.snapshot_path),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.starting_balance < Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Starting balance {} must not be negative",
                self.starting_balance
            )));
        }
        if self.price_floor <= Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Price floor {} must be positive",
                self.price_floor
            )));
        }
        if self.max_price_change < Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Max price change {} must not be negative",
                self.max_price_change
            )));
        }
        if self.snapshot_path.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Snapshot path must not be empty".into(),
            ));
        }
        Ok(())
    }
}
