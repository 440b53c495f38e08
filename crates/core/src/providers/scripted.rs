use rust_decimal::Decimal;

use super::traits::PriceWalk;
use crate::models::stock::Stock;

/// Replays a fixed list of changes in order, wrapping around at the end.
/// An empty script never moves prices.
#[derive(Debug, Clone, Default)]
pub struct ScriptedWalk {
    steps: Vec<Decimal>,
    cursor: usize,
}

impl ScriptedWalk {
    pub fn new(steps: Vec<Decimal>) -> Self {
        Self { steps, cursor: 0 }
    }

    /// A walk that never moves prices.
    pub fn flat() -> Self {
        Self::default()
    }
}

impl PriceWalk for ScriptedWalk {
    fn name(&self) -> &str {
        "ScriptedWalk"
    }

    fn next_change(&mut self, _stock: &Stock) -> Decimal {
        if self.steps.is_empty() {
            return Decimal::ZERO;
        }
        let step = self.steps[self.cursor % self.steps.len()];
        self.cursor = (self.cursor + 1) % self.steps.len();
        step
    }
}
