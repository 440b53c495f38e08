use rust_decimal::Decimal;

use crate::models::stock::Stock;

/// Source of market price movements.
///
/// The market asks for one change per stock per tick; implementations
/// decide how large it is. Swapping the implementation (seeded, scripted,
/// live entropy) changes nothing else in the simulator.
pub trait PriceWalk: Send {
    /// Human-readable name of this walk (for logs).
    fn name(&self) -> &str;

    /// Signed price change to apply to `stock`. The market rounds the
    /// result to cents and clamps it to its floor.
    fn next_change(&mut self, stock: &Stock) -> Decimal;
}
