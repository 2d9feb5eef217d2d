//! Item records, one per row of every item table

use crate::ids::{tag, ItemKey, CRATE_SLOT};
use crate::raw::{comment_at, icon_at, name_at, row, CombatRow, ItemTable, Xdt};
use crate::reference::{
    error_icon, icon_path, label, timer_seconds, GENDERS, ITEM_ICON_PREFIXES, ITEM_TYPES,
    RARITIES, WEAPON_RANGES, WEAPON_SLOT, WEAPON_TYPES,
};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ItemRecord {
    pub id: ItemKey,
    pub item_id: i64,
    pub slot_id: u8,
    pub slot: &'static str,
    pub weapon_type_id: i64,
    pub weapon_type: &'static str,
    /// Slot name, or the weapon type for weapons
    pub display_type: &'static str,
    pub tradeable: bool,
    pub sellable: bool,
    pub price: i64,
    pub sell_price: i64,
    pub max_stack: i64,
    pub rarity_id: i64,
    pub rarity: &'static str,
    pub gender_id: i64,
    pub gender: &'static str,
    pub required_level: i64,
    pub content_level: i64,
    pub single_damage: i64,
    pub multi_damage: i64,
    pub fire_initial_time: f64,
    pub fire_deliver_time: f64,
    pub fire_delay_time: f64,
    pub fire_duration_time: f64,
    pub rate_of_fire: f64,
    pub range_value: i64,
    pub range: &'static str,
    pub cone_angle: i64,
    pub target_count: i64,
    pub defense: i64,
    pub vehicle_class: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub obtainable: bool,
}

impl ItemRecord {
    /// `"{slot:02}::{id:04}::{name}"`
    pub fn tag(&self) -> String {
        tag(self.id, &self.name)
    }

    pub fn is_crate(&self) -> bool {
        self.id.is_crate()
    }
}

/// Combat stats of items without a combat row (general items and crates)
fn flat_stats() -> CombatRow {
    CombatRow {
        rarity: 1,
        ..CombatRow::default()
    }
}

/// Leading number of a crate name such as `"12Lv Mystery Box"`
fn crate_level(name: &str) -> Option<i64> {
    name.split("Lv").next()?.trim().parse().ok()
}

fn build_table(table: &ItemTable, items: &mut IndexMap<ItemKey, ItemRecord>) {
    let slot = table.slot;
    let slot_index = i64::from(slot);
    let context = crate::reference::ITEM_TABLES
        .get(usize::from(slot))
        .copied()
        .unwrap_or("items");

    for (i, raw) in table.rows.iter().enumerate().skip(1) {
        let stats = match &table.combat {
            Some(combat) => combat.get(i).cloned().unwrap_or_else(flat_stats),
            None => flat_stats(),
        };

        let name = name_at(&table.strings, raw.name, context);
        let (description, content_level) = if slot == CRATE_SLOT {
            let description = row(&table.strings, raw.name, context)
                .map(|r| r.comment.clone())
                .unwrap_or_default();
            (description, crate_level(&name).unwrap_or(stats.required_level))
        } else {
            (comment_at(&table.strings, raw.comment, context), stats.required_level)
        };

        let icon = icon_at(&table.icons, raw.icon, context)
            .map(|n| icon_path(label(ITEM_ICON_PREFIXES, slot_index, "item slot"), n))
            .unwrap_or_else(error_icon);

        let weapon_type = label(WEAPON_TYPES, raw.weapon_type, "weapon type");
        let slot_name = label(ITEM_TYPES, slot_index, "item slot");
        let fire_delay_time = timer_seconds(stats.delay_time);

        let key = ItemKey::new(slot, raw.id);
        items.insert(
            key,
            ItemRecord {
                id: key,
                item_id: raw.id,
                slot_id: slot,
                slot: slot_name,
                weapon_type_id: raw.weapon_type,
                weapon_type,
                display_type: if slot == WEAPON_SLOT {
                    weapon_type
                } else {
                    slot_name
                },
                tradeable: raw.tradeable == 1,
                sellable: raw.sellable == 1,
                price: raw.price,
                sell_price: raw.sell_price,
                max_stack: raw.max_stack,
                rarity_id: stats.rarity,
                rarity: label(RARITIES, stats.rarity, "rarity"),
                gender_id: stats.gender,
                gender: label(GENDERS, stats.gender, "gender"),
                required_level: stats.required_level,
                content_level,
                single_damage: stats.single_damage,
                multi_damage: stats.multi_damage,
                fire_initial_time: timer_seconds(stats.initial_time),
                fire_deliver_time: timer_seconds(stats.deliver_time),
                fire_delay_time,
                fire_duration_time: timer_seconds(stats.duration_time),
                rate_of_fire: if fire_delay_time > 0.0 {
                    1.0 / fire_delay_time
                } else {
                    0.0
                },
                range_value: stats.range,
                range: label(WEAPON_RANGES, raw.weapon_type, "weapon range"),
                cone_angle: stats.angle,
                target_count: stats.target_count,
                defense: stats.defense,
                vehicle_class: stats.vehicle_class,
                name,
                description,
                icon,
                obtainable: false,
            },
        );
    }
}

/// Every item of every slot, in slot then row order
pub fn build(xdt: &Xdt) -> IndexMap<ItemKey, ItemRecord> {
    let mut items = IndexMap::new();
    for table in &xdt.items {
        build_table(table, &mut items);
    }
    items
}
