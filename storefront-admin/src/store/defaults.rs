//! Built-in default configuration
//!
//! Used when the persistence collaborator holds nothing usable and by
//! `ResetToDefaults`.

use shared::models::{ConfigSnapshot, DeliveryZone, Novel, NovelStatus, PriceConfig};
use shared::models::zone::default_full_path;

use crate::pricing::computed_novel_price;

const DEFAULT_ZONES: &[(&str, u64)] = &[
    ("Nuevo Vista Alegre", 150),
    ("Vista Alegre", 300),
    ("Reparto Sueño", 250),
    ("San Pedrito", 150),
    ("Altamira", 300),
    ("El Caney", 800),
    ("Quintero", 200),
    ("Marimon", 100),
];

const DEFAULT_NOVELS: &[(&str, &str, u32, i32, &str)] = &[
    ("Corazón Salvaje", "Drama/Romance", 185, 2009, "Una apasionante historia de amor y venganza"),
    ("La Usurpadora", "Drama/Melodrama", 98, 1998, "La historia de dos mujeres idénticas con destinos opuestos"),
    ("María la del Barrio", "Drama/Romance", 73, 1995, "Una joven humilde que conquista el corazón de un millonario"),
    ("Marimar", "Drama/Romance", 63, 1994, "La transformación de una joven de la playa en una mujer sofisticada"),
    ("Rosalinda", "Drama/Romance", 80, 1999, "Una historia de amor que supera las diferencias sociales"),
];

/// 默认配置 (占位区域 + 示例区域 + 示例小说目录)
pub fn default_config(now: i64) -> ConfigSnapshot {
    let pricing = PriceConfig::default();

    let mut delivery_zones = vec![DeliveryZone::placeholder(now)];
    delivery_zones.extend(DEFAULT_ZONES.iter().enumerate().map(|(i, (name, cost))| {
        DeliveryZone {
            id: i as i64 + 2,
            name: (*name).to_string(),
            full_path: default_full_path(name),
            cost: *cost,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }));

    let novelas = DEFAULT_NOVELS
        .iter()
        .enumerate()
        .map(|(i, (title, genre, chapters, year, description))| {
            let price = computed_novel_price(*chapters, &pricing);
            Novel {
                id: i as i64 + 1,
                title: (*title).to_string(),
                genre: (*genre).to_string(),
                chapters: *chapters,
                year: *year,
                description: Some((*description).to_string()),
                country: None,
                status: NovelStatus::Finalizada,
                active: true,
                cash_cost: Some(price.cash),
                transfer_cost: Some(price.transfer),
                created_at: now,
                updated_at: now,
            }
        })
        .collect();

    ConfigSnapshot {
        pricing,
        novelas,
        delivery_zones,
    }
}
