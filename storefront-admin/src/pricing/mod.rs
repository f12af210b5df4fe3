//! Pricing Engine
//!
//! Pure functions deriving cash/transfer prices for catalog entries and
//! per-order totals. No state of its own; every call takes the current
//! `PriceConfig`.

mod calculator;
mod order_calculator;

pub use calculator::*;
pub use order_calculator::*;
