//! Order-Level Price Calculator
//!
//! Aggregate per-order totals split by payment method:
//! - cash items contribute their cash price
//! - transfer items contribute their transfer price (surcharge included)
//! - the surcharge portion is reported separately as `transfer_fee`

use shared::models::{CartItem, OrderTotals, PaymentType, PriceConfig};

use super::calculator::price_for_item;

/// Calculate order totals
///
/// # Arguments
/// * `items` - Cart items, each carrying its own payment type
/// * `config` - Current price configuration
/// * `delivery_cost` - Flat cost of the chosen delivery zone
///
/// # Invariants
/// - `grand_total == cash_total + transfer_total + delivery_cost`
/// - `transfer_fee == transfer_total - Σ cash price of transfer items`
///
/// Sums saturate at `u64::MAX` instead of wrapping.
pub fn aggregate_order(items: &[CartItem], config: &PriceConfig, delivery_cost: u64) -> OrderTotals {
    let mut cash_total = 0u64;
    let mut transfer_total = 0u64;
    let mut transfer_base = 0u64;

    for item in items {
        let price = price_for_item(item, config);
        match item.payment_type {
            PaymentType::Cash => cash_total = cash_total.saturating_add(price.cash),
            PaymentType::Transfer => {
                transfer_total = transfer_total.saturating_add(price.transfer);
                transfer_base = transfer_base.saturating_add(price.cash);
            }
        }
    }

    OrderTotals {
        cash_total,
        transfer_total,
        transfer_fee: transfer_total.saturating_sub(transfer_base),
        delivery_cost,
        grand_total: cash_total
            .saturating_add(transfer_total)
            .saturating_add(delivery_cost),
    }
}

/// Amount actually charged for one item under its payment type
pub fn charged_price(item: &CartItem, config: &PriceConfig) -> u64 {
    let price = price_for_item(item, config);
    match item.payment_type {
        PaymentType::Cash => price.cash,
        PaymentType::Transfer => price.transfer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PriceConfig {
        PriceConfig {
            movie_price: 80,
            series_price_per_season: 300,
            transfer_fee_percentage: 10,
            novel_price_per_chapter: 5,
        }
    }

    #[test]
    fn test_empty_order_is_all_zero() {
        let totals = aggregate_order(&[], &config(), 0);
        assert_eq!(totals, OrderTotals::default());
    }

    #[test]
    fn test_cash_only_series() {
        // 3 seasons * 300, cash -> 900
        let items = vec![CartItem::series(1, "Dark", vec![1, 2, 3], PaymentType::Cash)];
        let totals = aggregate_order(&items, &config(), 0);
        assert_eq!(totals.cash_total, 900);
        assert_eq!(totals.transfer_total, 0);
        assert_eq!(totals.transfer_fee, 0);
        assert_eq!(totals.grand_total, 900);
    }

    #[test]
    fn test_mixed_payment_split() {
        let items = vec![
            CartItem::movie(1, "Dune", PaymentType::Cash),
            CartItem::movie(2, "Alien", PaymentType::Transfer),
            CartItem::series(3, "Lost", vec![1, 2], PaymentType::Transfer),
        ];
        let totals = aggregate_order(&items, &config(), 150);

        assert_eq!(totals.cash_total, 80);
        // 88 + 660
        assert_eq!(totals.transfer_total, 748);
        // 748 - (80 + 600)
        assert_eq!(totals.transfer_fee, 68);
        assert_eq!(totals.delivery_cost, 150);
        assert_eq!(totals.grand_total, 80 + 748 + 150);
        assert_eq!(totals.subtotal(), 828);
    }

    #[test]
    fn test_oversized_totals_saturate() {
        let cfg = PriceConfig {
            movie_price: u64::MAX / 2,
            ..config()
        };
        let items = vec![
            CartItem::movie(1, "Dune", PaymentType::Cash),
            CartItem::movie(2, "Alien", PaymentType::Cash),
            CartItem::movie(3, "Heat", PaymentType::Cash),
            CartItem::movie(4, "Tron", PaymentType::Transfer),
        ];
        let totals = aggregate_order(&items, &cfg, u64::MAX);
        assert_eq!(totals.cash_total, u64::MAX);
        assert_eq!(totals.grand_total, u64::MAX);
        assert!(totals.transfer_total >= u64::MAX / 2);
    }

    #[test]
    fn test_total_decomposition_holds() {
        let cfg = PriceConfig {
            movie_price: 90,
            series_price_per_season: 350,
            transfer_fee_percentage: 15,
            novel_price_per_chapter: 5,
        };
        let items: Vec<CartItem> = (0..12)
            .map(|i| {
                let payment = if i % 3 == 0 { PaymentType::Cash } else { PaymentType::Transfer };
                if i % 2 == 0 {
                    CartItem::movie(i, format!("movie {i}"), payment)
                } else {
                    CartItem::series(i, format!("series {i}"), (1..=(i as u32 % 4)).collect(), payment)
                }
            })
            .collect();

        for delivery in [0u64, 100, 800] {
            let totals = aggregate_order(&items, &cfg, delivery);
            assert_eq!(
                totals.grand_total,
                totals.cash_total + totals.transfer_total + totals.delivery_cost
            );
            let transfer_base: u64 = items
                .iter()
                .filter(|i| i.is_transfer())
                .map(|i| price_for_item(i, &cfg).cash)
                .sum();
            assert_eq!(totals.transfer_fee, totals.transfer_total - transfer_base);
        }
    }

    #[test]
    fn test_charged_price_follows_payment_type() {
        let cash = CartItem::movie(1, "Dune", PaymentType::Cash);
        let transfer = CartItem::movie(1, "Dune", PaymentType::Transfer);
        assert_eq!(charged_price(&cash, &config()), 80);
        assert_eq!(charged_price(&transfer, &config()), 88);
    }
}
