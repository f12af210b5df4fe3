//! Order assembly
//!
//! # Flow
//!
//! ```text
//! build_order(customer, items, zone_id, pricing, zones, now)
//!     ├─ 1. Validate every field, collecting all failures
//!     ├─ 2. Resolve delivery cost (unknown zone -> 0)
//!     ├─ 3. Price each line, aggregate totals
//!     ├─ 4. Order id (TVC-<time>-<random>)
//!     └─ 5. Render summary text
//! ```
//!
//! No side effects: sending the order is the caller's business.

use chrono::{DateTime, Utc};
use shared::models::{
    CartItem, CustomerInfo, DeliveryZone, OrderData, OrderLine, OrderZone, PLACEHOLDER_ZONE_ID,
    PriceConfig,
};
use shared::util::order_id;
use thiserror::Error;

use super::summary::render_order_summary;
use crate::pricing::{aggregate_order, charged_price, price_for_item};
use crate::store::AdminState;

/// One failed checkout check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderValidationError {
    #[error("full name is required")]
    MissingFullName,

    #[error("phone is required")]
    MissingPhone,

    #[error("address is required")]
    MissingAddress,

    #[error("a delivery zone must be selected")]
    DeliveryZoneNotSelected,

    #[error("delivery zone {0} is not available")]
    DeliveryZoneUnavailable(i64),
}

impl OrderValidationError {
    /// Form field the failure refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingFullName => "fullName",
            Self::MissingPhone => "phone",
            Self::MissingAddress => "address",
            Self::DeliveryZoneNotSelected | Self::DeliveryZoneUnavailable(_) => "deliveryZone",
        }
    }
}

/// All failed checks, in form order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("order rejected: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
pub struct OrderRejected(pub Vec<OrderValidationError>);

impl OrderRejected {
    pub fn errors(&self) -> &[OrderValidationError] {
        &self.0
    }

    pub fn contains(&self, error: OrderValidationError) -> bool {
        self.0.contains(&error)
    }
}

impl From<OrderRejected> for shared::AppError {
    fn from(err: OrderRejected) -> Self {
        shared::AppError::validation(err.to_string())
    }
}

pub fn validate_checkout(
    customer: &CustomerInfo,
    delivery_zone_id: i64,
    zones: &[DeliveryZone],
) -> Result<(), OrderRejected> {
    let mut errors = Vec::new();
    if customer.full_name.trim().is_empty() {
        errors.push(OrderValidationError::MissingFullName);
    }
    if customer.phone.trim().is_empty() {
        errors.push(OrderValidationError::MissingPhone);
    }
    if customer.address.trim().is_empty() {
        errors.push(OrderValidationError::MissingAddress);
    }
    if delivery_zone_id == PLACEHOLDER_ZONE_ID {
        errors.push(OrderValidationError::DeliveryZoneNotSelected);
    } else if zones.iter().any(|z| z.id == delivery_zone_id && !z.active) {
        errors.push(OrderValidationError::DeliveryZoneUnavailable(delivery_zone_id));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(OrderRejected(errors))
    }
}

pub fn build_order(
    customer: &CustomerInfo,
    items: &[CartItem],
    delivery_zone_id: i64,
    pricing: &PriceConfig,
    zones: &[DeliveryZone],
    now: DateTime<Utc>,
) -> Result<OrderData, OrderRejected> {
    validate_checkout(customer, delivery_zone_id, zones)?;

    let zone = zones.iter().find(|z| z.id == delivery_zone_id);
    let delivery_cost = zone.map_or(0, |z| z.cost);
    if zone.is_none() {
        tracing::warn!(zone_id = delivery_zone_id, "Delivery zone not found, charging no delivery");
    }

    let lines = items
        .iter()
        .map(|item| OrderLine {
            item: item.clone(),
            price: price_for_item(item, pricing),
            charged: charged_price(item, pricing),
        })
        .collect();

    let mut order = OrderData {
        order_id: order_id(now.timestamp_millis()),
        customer_info: CustomerInfo {
            full_name: customer.full_name.trim().to_string(),
            phone: customer.phone.trim().to_string(),
            address: customer.address.trim().to_string(),
        },
        delivery_zone: zone.map(|z| OrderZone {
            id: z.id,
            name: z.name.clone(),
            full_path: z.full_path.clone(),
        }),
        delivery_zone_id,
        items: lines,
        totals: aggregate_order(items, pricing, delivery_cost),
        transfer_fee_percentage: pricing.transfer_fee_percentage,
        created_at: now,
        summary: String::new(),
    };
    order.summary = render_order_summary(&order);

    tracing::debug!(
        order_id = %order.order_id,
        items = order.items.len(),
        grand_total = order.totals.grand_total,
        "Order assembled"
    );
    Ok(order)
}

/// Build an order against the store's current configuration
pub fn build_order_from_state(
    state: &AdminState,
    customer: &CustomerInfo,
    items: &[CartItem],
    delivery_zone_id: i64,
    now: DateTime<Utc>,
) -> Result<OrderData, OrderRejected> {
    build_order(customer, items, delivery_zone_id, state.pricing(), state.zones(), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::default_config;
    use shared::models::PaymentType;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            full_name: "Ana Pérez".into(),
            phone: "+53 5555 1234".into(),
            address: "Calle 4 #12".into(),
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_empty_name_rejected() {
        let config = default_config(0);
        let items = vec![CartItem::movie(1, "Dune", PaymentType::Cash)];
        let form = CustomerInfo {
            full_name: "   ".into(),
            ..customer()
        };
        let err = build_order(&form, &items, 2, &config.pricing, &config.delivery_zones, now()).unwrap_err();
        assert_eq!(err.errors(), &[OrderValidationError::MissingFullName]);
    }

    #[test]
    fn test_all_failures_reported_together() {
        let config = default_config(0);
        let err = build_order(
            &CustomerInfo::default(),
            &[],
            PLACEHOLDER_ZONE_ID,
            &config.pricing,
            &config.delivery_zones,
            now(),
        )
        .unwrap_err();
        assert_eq!(
            err.errors(),
            &[
                OrderValidationError::MissingFullName,
                OrderValidationError::MissingPhone,
                OrderValidationError::MissingAddress,
                OrderValidationError::DeliveryZoneNotSelected,
            ]
        );
        assert_eq!(err.errors()[3].field(), "deliveryZone");
    }

    #[test]
    fn test_inactive_zone_rejected() {
        let mut config = default_config(0);
        config.delivery_zones[1].active = false;
        let zone_id = config.delivery_zones[1].id;
        let err = build_order(&customer(), &[], zone_id, &config.pricing, &config.delivery_zones, now())
            .unwrap_err();
        assert!(err.contains(OrderValidationError::DeliveryZoneUnavailable(zone_id)));
    }

    #[test]
    fn test_unknown_zone_costs_nothing() {
        let config = default_config(0);
        let items = vec![CartItem::movie(1, "Dune", PaymentType::Cash)];
        let order = build_order(&customer(), &items, 404, &config.pricing, &config.delivery_zones, now()).unwrap();
        assert!(order.delivery_zone.is_none());
        assert_eq!(order.totals.delivery_cost, 0);
        assert_eq!(order.totals.grand_total, 80);
        assert!(order.summary.contains("Entrega (Zona desconocida): +$0 CUP"));
    }

    #[test]
    fn test_order_totals_and_summary() {
        let config = default_config(0);
        let items = vec![
            CartItem::movie(1, "Dune", PaymentType::Cash),
            CartItem::series(2, "Lost", vec![2, 1], PaymentType::Transfer),
        ];
        // Zone 2: Nuevo Vista Alegre, 150
        let order = build_order(&customer(), &items, 2, &config.pricing, &config.delivery_zones, now()).unwrap();

        assert!(order.order_id.starts_with("TVC-LOYW3V28-"));
        assert_eq!(order.totals.cash_total, 80);
        assert_eq!(order.totals.transfer_total, 660);
        assert_eq!(order.totals.transfer_fee, 60);
        assert_eq!(order.totals.grand_total, 890);
        assert_eq!(order.items[1].charged, 660);

        let text = &order.summary;
        assert!(text.starts_with("🎬 *PEDIDO - TV A LA CARTA*\n\n📋 *ID de Orden:* TVC-"));
        assert!(text.contains("• Nombre: Ana Pérez\n"));
        assert!(text.contains("📺 *Lost*\n  📺 Temporadas: 1, 2\n  📋 Tipo: Serie\n  💳 Pago: Transferencia (+10%)\n  💰 Precio: $660 CUP"));
        assert!(text.contains("• *Subtotal Contenido: $740 CUP*\n"));
        assert!(text.contains("• Recargo transferencia (10%): +$60 CUP\n"));
        assert!(text.contains("🚚 Entrega (Nuevo Vista Alegre): +$150 CUP\n"));
        assert!(text.contains("🎯 *TOTAL FINAL: $890 CUP*"));
        assert!(text.contains("Santiago de Cuba → Santiago de Cuba → Nuevo Vista Alegre\n"));
        assert!(text.contains("⏰ *Fecha:* 14/11/2023, 22:13:20\n"));
        assert!(text.ends_with("🌟 *¡Gracias por elegir TV a la Carta!*"));
    }

    #[test]
    fn test_cash_only_order_has_no_surcharge_line() {
        let config = default_config(0);
        let items = vec![CartItem::series(3, "Dark", vec![1, 2, 3], PaymentType::Cash)];
        let order = build_order(&customer(), &items, 2, &config.pricing, &config.delivery_zones, now()).unwrap();
        assert_eq!(order.totals.cash_total, 900);
        assert!(!order.summary.contains("Recargo"));
        assert!(!order.summary.contains("🏦 Transferencia"));
    }

    #[test]
    fn test_build_from_state_uses_current_pricing() {
        let mut config = default_config(0);
        config.pricing.movie_price = 100;
        let state = AdminState::new(config, 50);
        let items = vec![CartItem::movie(1, "Dune", PaymentType::Transfer)];
        let order = build_order_from_state(&state, &customer(), &items, 2, now()).unwrap();
        assert_eq!(order.totals.transfer_total, 110);
        assert_eq!(order.transfer_fee_percentage, 10);
    }
}
