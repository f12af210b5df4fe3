//! Order summary text
//!
//! Fixed-structure message meant to be pasted into a chat. Section order:
//! header, order id, customer, items, cost summary, delivery zone, date.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use shared::models::{CartItemKind, OrderData, OrderLine, PaymentType};

const UNKNOWN_ZONE: &str = "Zona desconocida";

/// Thousands-grouped amount (`1,018`)
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `d/m/yyyy, H:MM:SS`
pub fn format_es_datetime(at: DateTime<Utc>) -> String {
    at.format("%-d/%-m/%Y, %-H:%M:%S").to_string()
}

fn render_line(line: &OrderLine, fee_pct: u32) -> String {
    let (emoji, kind, seasons) = match &line.item.kind {
        CartItemKind::Movie => ("🎬", "Película", String::new()),
        CartItemKind::Series { selected_seasons } => {
            let seasons = if selected_seasons.is_empty() {
                String::new()
            } else {
                let mut sorted = selected_seasons.clone();
                sorted.sort_unstable();
                let list: Vec<String> = sorted.iter().map(u32::to_string).collect();
                format!("\n  📺 Temporadas: {}", list.join(", "))
            };
            ("📺", "Serie", seasons)
        }
    };
    let payment = match line.item.payment_type {
        PaymentType::Cash => "Efectivo".to_string(),
        PaymentType::Transfer => format!("Transferencia (+{fee_pct}%)"),
    };
    format!(
        "{emoji} *{}*{seasons}\n  📋 Tipo: {kind}\n  💳 Pago: {payment}\n  💰 Precio: ${} CUP",
        line.item.title,
        format_amount(line.charged)
    )
}

pub fn render_order_summary(order: &OrderData) -> String {
    let totals = &order.totals;
    let fee_pct = order.transfer_fee_percentage;
    let items: Vec<String> = order.items.iter().map(|line| render_line(line, fee_pct)).collect();
    let zone_name = order.delivery_zone.as_ref().map_or(UNKNOWN_ZONE, |z| z.name.as_str());
    let zone_path = order
        .delivery_zone
        .as_ref()
        .map_or(UNKNOWN_ZONE.to_string(), |z| z.full_path.replace(" > ", " → "));

    let mut text = String::new();
    // Writing into a String cannot fail
    let _ = write!(text, "🎬 *PEDIDO - TV A LA CARTA*\n\n");
    let _ = write!(text, "📋 *ID de Orden:* {}\n\n", order.order_id);

    text.push_str("👤 *DATOS DEL CLIENTE:*\n");
    let _ = writeln!(text, "• Nombre: {}", order.customer_info.full_name.trim());
    let _ = writeln!(text, "• Teléfono: {}", order.customer_info.phone.trim());
    let _ = write!(text, "• Dirección: {}\n\n", order.customer_info.address.trim());

    let _ = write!(text, "🎯 *PRODUCTOS SOLICITADOS:*\n{}\n\n", items.join("\n\n"));

    text.push_str("💰 *RESUMEN DE COSTOS:*\n");
    if totals.cash_total > 0 {
        let _ = writeln!(text, "💵 Efectivo: ${} CUP", format_amount(totals.cash_total));
    }
    if totals.transfer_total > 0 {
        let _ = writeln!(text, "🏦 Transferencia: ${} CUP", format_amount(totals.transfer_total));
    }
    let _ = writeln!(text, "• *Subtotal Contenido: ${} CUP*", format_amount(totals.subtotal()));
    if order.has_transfer_items() {
        let _ = writeln!(
            text,
            "• Recargo transferencia ({fee_pct}%): +${} CUP",
            format_amount(totals.transfer_fee)
        );
    }
    let _ = writeln!(
        text,
        "🚚 Entrega ({zone_name}): +${} CUP",
        format_amount(totals.delivery_cost)
    );
    let _ = write!(text, "\n🎯 *TOTAL FINAL: ${} CUP*\n\n", format_amount(totals.grand_total));

    text.push_str("📍 *ZONA DE ENTREGA:*\n");
    let _ = writeln!(text, "{zone_path}");
    let _ = write!(
        text,
        "💰 Costo de entrega: ${} CUP\n\n",
        format_amount(totals.delivery_cost)
    );

    let _ = writeln!(text, "⏰ *Fecha:* {}", format_es_datetime(order.created_at));
    text.push_str("🌟 *¡Gracias por elegir TV a la Carta!*");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1018), "1,018");
        assert_eq!(format_amount(1234567), "1,234,567");
    }

    #[test]
    fn test_es_datetime_layout() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(format_es_datetime(at), "14/11/2023, 22:13:20");
    }
}
