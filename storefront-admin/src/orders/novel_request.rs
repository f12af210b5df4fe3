//! Novel catalog messages
//!
//! - [`build_novel_request`] - request for the novels a customer picked,
//!   split into cash and transfer sections
//! - [`render_catalog`] - full listing of the active catalog with totals

use std::fmt::Write;

use chrono::{DateTime, Utc};
use shared::models::{ItemPrice, Novel, NovelSelection, PaymentType, PriceConfig};
use thiserror::Error;

use super::summary::{format_amount, format_es_datetime};
use crate::pricing::{price_for_novel, sum_units};

const RULE: &str = "═══════════════════════════════════";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NovelRequestError {
    #[error("select at least one novel")]
    EmptySelection,

    #[error("novel {0} is not in the catalog")]
    UnknownNovel(i64),
}

fn write_novel_header(text: &mut String, index: usize, novel: &Novel) {
    let _ = writeln!(text, "{}. {}", index + 1, novel.title);
    let _ = writeln!(text, "   📺 Género: {}", novel.genre);
    let _ = writeln!(text, "   📊 Capítulos: {}", novel.chapters);
    let _ = writeln!(text, "   📅 Año: {}", novel.year);
}

fn chapters(novels: &[(&Novel, ItemPrice)]) -> u64 {
    sum_units(novels.iter().map(|(n, _)| u64::from(n.chapters)))
}

pub fn build_novel_request(
    selections: &[NovelSelection],
    catalog: &[Novel],
    pricing: &PriceConfig,
    now: DateTime<Utc>,
) -> Result<String, NovelRequestError> {
    if selections.is_empty() {
        return Err(NovelRequestError::EmptySelection);
    }

    let mut cash = Vec::new();
    let mut transfer = Vec::new();
    for selection in selections {
        let novel = catalog
            .iter()
            .find(|n| n.id == selection.novel_id)
            .ok_or(NovelRequestError::UnknownNovel(selection.novel_id))?;
        let price = price_for_novel(novel, pricing);
        match selection.payment_type {
            PaymentType::Cash => cash.push((novel, price)),
            PaymentType::Transfer => transfer.push((novel, price)),
        }
    }

    let fee_pct = pricing.transfer_fee_percentage;
    let cash_total = sum_units(cash.iter().map(|(_, p)| p.cash));
    let transfer_base = sum_units(transfer.iter().map(|(_, p)| p.cash));
    let transfer_total = sum_units(transfer.iter().map(|(_, p)| p.transfer));

    let mut text =
        String::from("Estoy interesado en el catálogo de novelas\nQuiero encargar los títulos o el título:\n\n");

    if !cash.is_empty() {
        let _ = writeln!(text, "💵 PAGO EN EFECTIVO:\n{RULE}");
        for (i, (novel, price)) in cash.iter().enumerate() {
            write_novel_header(&mut text, i, novel);
            let _ = write!(text, "   💰 Costo: ${} CUP\n\n", format_amount(price.cash));
        }
        let _ = writeln!(text, "💰 Subtotal Efectivo: ${} CUP", format_amount(cash_total));
        let _ = write!(text, "📊 Total capítulos: {}\n\n", chapters(&cash));
    }

    if !transfer.is_empty() {
        let _ = writeln!(text, "🏦 PAGO POR TRANSFERENCIA BANCARIA (+{fee_pct}%):\n{RULE}");
        for (i, (novel, price)) in transfer.iter().enumerate() {
            write_novel_header(&mut text, i, novel);
            let _ = writeln!(text, "   💰 Costo base: ${} CUP", format_amount(price.cash));
            let _ = writeln!(text, "   💳 Recargo ({fee_pct}%): +${} CUP", format_amount(price.surcharge()));
            let _ = write!(text, "   💰 Costo total: ${} CUP\n\n", format_amount(price.transfer));
        }
        let _ = writeln!(text, "💰 Subtotal base transferencia: ${} CUP", format_amount(transfer_base));
        let _ = writeln!(
            text,
            "💳 Recargo total ({fee_pct}%): +${} CUP",
            format_amount(transfer_total.saturating_sub(transfer_base))
        );
        let _ = writeln!(text, "💰 Subtotal Transferencia: ${} CUP", format_amount(transfer_total));
        let _ = write!(text, "📊 Total capítulos: {}\n\n", chapters(&transfer));
    }

    let _ = writeln!(text, "📊 RESUMEN FINAL:\n{RULE}");
    let _ = writeln!(text, "• Total de novelas: {}", cash.len() + transfer.len());
    let _ = writeln!(text, "• Total de capítulos: {}", chapters(&cash).saturating_add(chapters(&transfer)));
    if cash_total > 0 {
        let _ = writeln!(text, "• Efectivo: ${} CUP ({} novelas)", format_amount(cash_total), cash.len());
    }
    if transfer_total > 0 {
        let _ = writeln!(
            text,
            "• Transferencia: ${} CUP ({} novelas)",
            format_amount(transfer_total),
            transfer.len()
        );
    }
    let _ = write!(text, "• TOTAL A PAGAR: ${} CUP\n\n", format_amount(cash_total.saturating_add(transfer_total)));
    text.push_str("📱 Enviado desde TV a la Carta\n");
    let _ = write!(text, "📅 Fecha: {}", format_es_datetime(now));

    Ok(text)
}

pub fn render_catalog(catalog: &[Novel], pricing: &PriceConfig, now: DateTime<Utc>) -> String {
    let novels: Vec<(&Novel, ItemPrice)> = catalog
        .iter()
        .filter(|n| n.active)
        .map(|n| (n, price_for_novel(n, pricing)))
        .collect();
    let fee_pct = pricing.transfer_fee_percentage;

    let mut text = String::from("📚 CATÁLOGO DE NOVELAS DISPONIBLES\nTV a la Carta - Novelas Completas\n\n");
    text.push_str("💰 Precios variables según novela\n\n");
    let _ = write!(text, "{RULE}\n\n");

    let _ = write!(text, "💵 PRECIOS EN EFECTIVO:\n{RULE}\n\n");
    for (i, (novel, price)) in novels.iter().enumerate() {
        write_novel_header(&mut text, i, novel);
        let _ = write!(text, "   💰 Costo en efectivo: ${} CUP\n\n", format_amount(price.cash));
    }

    let _ = write!(text, "\n🏦 PRECIOS CON TRANSFERENCIA BANCARIA (+{fee_pct}%):\n{RULE}\n\n");
    for (i, (novel, price)) in novels.iter().enumerate() {
        write_novel_header(&mut text, i, novel);
        let _ = writeln!(text, "   💰 Costo base: ${} CUP", format_amount(price.cash));
        let _ = writeln!(text, "   💳 Recargo ({fee_pct}%): +${} CUP", format_amount(price.surcharge()));
        let _ = write!(text, "   💰 Costo con transferencia: ${} CUP\n\n", format_amount(price.transfer));
    }

    let total_cash = sum_units(novels.iter().map(|(_, p)| p.cash));
    let total_transfer = sum_units(novels.iter().map(|(_, p)| p.transfer));

    let _ = write!(text, "\n📊 RESUMEN DE COSTOS:\n{RULE}\n\n");
    let _ = writeln!(text, "📊 Total de novelas: {}", novels.len());
    let _ = write!(text, "📊 Total de capítulos: {}\n\n", format_amount(chapters(&novels)));
    let _ = write!(
        text,
        "💵 CATÁLOGO COMPLETO EN EFECTIVO:\n   💰 Costo total: ${} CUP\n\n",
        format_amount(total_cash)
    );
    text.push_str("🏦 CATÁLOGO COMPLETO CON TRANSFERENCIA:\n");
    let _ = writeln!(text, "   💰 Costo base: ${} CUP", format_amount(total_cash));
    let _ = writeln!(
        text,
        "   💳 Recargo total ({fee_pct}%): +${} CUP",
        format_amount(total_transfer.saturating_sub(total_cash))
    );
    let _ = write!(
        text,
        "   💰 Costo total con transferencia: ${} CUP\n\n",
        format_amount(total_transfer)
    );

    let _ = writeln!(text, "{RULE}\n💡 INFORMACIÓN IMPORTANTE:");
    text.push_str("• Los precios en efectivo no tienen recargo adicional\n");
    let _ = writeln!(text, "• Las transferencias bancarias tienen un {fee_pct}% de recargo");
    text.push_str("• Puedes seleccionar novelas individuales o el catálogo completo\n");
    text.push_str("• Todos los precios están en pesos cubanos (CUP)\n\n");
    text.push_str("🌟 ¡Disfruta de las mejores novelas!\n");
    let _ = write!(text, "\n📅 Generado el: {}", format_es_datetime(now));
    text
}
