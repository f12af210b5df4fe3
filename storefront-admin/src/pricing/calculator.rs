//! Item Price Calculator
//!
//! Cash and transfer prices for a single catalog entry.
//! Uses rust_decimal for the surcharge multiplication, stores whole CUP as u64.

use rust_decimal::prelude::*;
use shared::models::{CartItem, CartItemKind, ItemPrice, Novel, PriceConfig};

/// Amounts are whole currency units, no subdivision is modeled
const DECIMAL_PLACES: u32 = 0;

/// Convert Decimal back to u64, rounded half-up to whole units.
/// Amounts beyond u64 saturate.
#[inline]
fn to_units(value: Decimal) -> u64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(u64::MAX)
}

/// Sum of whole-unit amounts, saturating at `u64::MAX`
pub fn sum_units(amounts: impl IntoIterator<Item = u64>) -> u64 {
    amounts.into_iter().fold(0, u64::saturating_add)
}

/// Apply the transfer surcharge to a cash amount
///
/// `transfer = round(cash × (1 + percentage / 100))`, rounding half-up.
pub fn apply_transfer_fee(cash: u64, transfer_fee_percentage: u32) -> u64 {
    if transfer_fee_percentage == 0 {
        return cash;
    }
    let cash = Decimal::from(cash);
    let multiplier =
        (Decimal::ONE_HUNDRED + Decimal::from(transfer_fee_percentage)) / Decimal::ONE_HUNDRED;
    to_units(cash * multiplier)
}

/// Cash price of a cart item before any surcharge
pub fn base_price(kind: &CartItemKind, config: &PriceConfig) -> u64 {
    match kind {
        CartItemKind::Movie => config.movie_price,
        CartItemKind::Series { .. } => {
            kind.billable_seasons().saturating_mul(config.series_price_per_season)
        }
    }
}

/// Price a movie or series under the given configuration
///
/// - movie: `cash = movie_price`
/// - series: `cash = max(1, seasons) × series_price_per_season`
pub fn price_for_item(item: &CartItem, config: &PriceConfig) -> ItemPrice {
    let cash = base_price(&item.kind, config);
    ItemPrice {
        cash,
        transfer: apply_transfer_fee(cash, config.transfer_fee_percentage),
    }
}

/// Novel price computed purely from chapters and the current configuration
pub fn computed_novel_price(chapters: u32, config: &PriceConfig) -> ItemPrice {
    let cash = u64::from(chapters).saturating_mul(config.novel_price_per_chapter);
    ItemPrice {
        cash,
        transfer: apply_transfer_fee(cash, config.transfer_fee_percentage),
    }
}

/// Price a novel
///
/// A stored cash price (snapshot or manual override) wins over
/// `chapters × novel_price_per_chapter`. A stored transfer price wins over the
/// surcharge computed from the cash price.
pub fn price_for_novel(novel: &Novel, config: &PriceConfig) -> ItemPrice {
    let cash = novel
        .cash_cost
        .unwrap_or_else(|| computed_novel_price(novel.chapters, config).cash);
    let transfer = novel
        .transfer_cost
        .unwrap_or_else(|| apply_transfer_fee(cash, config.transfer_fee_percentage));
    ItemPrice { cash, transfer }
}
