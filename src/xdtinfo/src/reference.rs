//! Fixed enumeration tables and unit conventions of the game data
//!
//! Raw tables store categories as small integers; these tables give them
//! display names. Lookups outside a table log a warning and read as
//! [`UNKNOWN`].

use tracing::warn;

pub const UNKNOWN: &str = "Unknown";

/// Instance id of the open world
pub const WORLD_INSTANCE_ID: i64 = 0;

/// Placement key offsets that make NPC/mob/group ids disjoint
pub const NPC_ID_OFFSET: i64 = 1;
pub const MOB_ID_OFFSET: i64 = 10000;
pub const MOB_GROUP_ID_OFFSET: i64 = 20000;

/// World units per zone tile
pub const TILE_WIDTH: i64 = 51200;

/// Seconds per raw timer unit
pub const TIMER_SCALE: f64 = 0.1;

/// Base added to a mob's power to give its attack power
pub const ATTACK_POWER_BASE: i64 = 450;

/// Slot of general (non-equipment) items
pub const GENERAL_SLOT: u8 = 7;

/// Slot of weapons; the only slot whose display type is the weapon type
pub const WEAPON_SLOT: u8 = 0;

/// Number of rarity tiers a crate rolls between
pub const RARITY_TIERS: i64 = 4;

pub const ITEM_TYPES: &[&str] = &[
    "Weapon", "Body", "Legs", "Shoes", "Hat", "Glasses", "Backpack", "General", "None", "CRATE",
    "Vehicle",
];

/// Item table name per slot; slot 8 has no table
pub const ITEM_TABLES: &[&str] = &[
    "m_pWeaponItemTable",
    "m_pShirtsItemTable",
    "m_pPantsItemTable",
    "m_pShoesItemTable",
    "m_pHatItemTable",
    "m_pGlassItemTable",
    "m_pBackItemTable",
    "m_pGeneralItemTable",
    "",
    "m_pChestItemTable",
    "m_pVehicleItemTable",
];

pub const ITEM_ICON_PREFIXES: &[&str] = &[
    "wpnicon",
    "cosicon",
    "cosicon",
    "cosicon",
    "cosicon",
    "cosicon",
    "cosicon",
    "generalitemicon",
    "error",
    "generalitemicon",
    "vehicle",
];

pub const WEAPON_TYPES: &[&str] = &[
    "None",
    "Melee",
    "Pistol",
    "Shattergun",
    "Rifle",
    "Rocket",
    "Thrown",
];

pub const WEAPON_RANGES: &[&str] = &[
    "None", "Short", "Medium", "Medium", "Medium", "Long", "Medium",
];

/// Icon prefix by NPC icon type (taken modulo the table length)
pub const NPC_ICON_PREFIXES: &[&str] = &[
    "error", "error", "error", "error", "npcicon", "error", "error", "error", "mobicon", "error",
    "hnpcicon",
];

pub const RARITIES: &[&str] = &["Any", "Common", "Uncommon", "Rare", "Ultra Rare", "Amazing!"];

pub const GENDERS: &[&str] = &["Any", "Male", "Female"];

pub const NPC_TYPES: &[(i64, &str)] = &[
    (0, "Monster"),
    (1, "Normal"),
    (2, "Vendor"),
    (3, "Quest"),
    (4, "VendorQuest"),
    (5, "Warp"),
    (6, "Defense"),
    (7, "NanoCreateMachine"),
    (8, "NanoTuneMachine"),
    (9, "NanoManager"),
    (10, "Xcom"),
    (11, "IXcom"),
    (12, "Bank"),
    (13, "StartEcom"),
    (14, "EndEcom"),
    (15, "SCAMPER"),
    (16, "MonkeySkyway"),
    (17, "RXcom"),
    (18, "Guide1"),
    (19, "Guide2"),
    (20, "Guide3"),
    (21, "Guide4"),
    (22, "Guide5"),
    (23, "GuideStarter"),
    (24, "Offer"),
    (25, "NoReaction"),
    (26, "Combi"),
    (27, "Enchant"),
    (100, "Invisible"),
    (101, "InvisibleWarp"),
    (105, "InvisibleNoClick"),
    (110, "NonCheck"),
    (111, "Location"),
];

/// NPC category of hostile mobs
pub const MOB_CATEGORY: i64 = 0;

pub const MISSION_TYPES: &[&str] = &["None", "Guide", "Nano", "Normal"];

pub const TASK_TYPES: &[&str] = &[
    "None",
    "Talk",
    "GoToLocation",
    "UseItems",
    "Delivery",
    "Defeat",
    "EscortDefense",
];

/// Task type whose waypoint NPC must be talked to
pub const TASK_TALK: i64 = 1;
/// Task type with an NPC to escort
pub const TASK_ESCORT: i64 = 6;

pub const DIFFICULTIES: &[&str] = &["Easy", "Normal", "Hard"];

pub const GUIDES: &[&str] = &["None", "Edd", "Dexter", "Mojo Jojo", "Ben", "Computress"];

pub const MESSAGE_TYPES: &[(i64, &str)] = &[(2, "PopUp"), (4, "Email"), (6, "PopUpAndEmail")];

/// Nano styles, shared by mob color types
pub const NANO_TYPES: &[&str] = &["Adaptium", "Blastons", "Cosmix"];

pub const EVENT_TYPES: &[(i64, &str)] = &[
    (0, "None"),
    (1, "Knishmas"),
    (2, "Halloween"),
    (3, "Easter"),
];

pub const TRANSPORT_MOVE_TYPES: &[&str] = &["None", "SCAMPER", "MonkeySkyway", "Slider"];

pub const MOVE_SCAMPER: i64 = 1;
pub const MOVE_SKYWAY: i64 = 2;

/// Name at `index` in a positional label table
pub fn label(table: &'static [&'static str], index: i64, what: &str) -> &'static str {
    match usize::try_from(index).ok().and_then(|i| table.get(i)) {
        Some(name) => name,
        None => {
            warn!(what, index, "Unknown label index");
            UNKNOWN
        }
    }
}

/// Name for `id` in a sparse label table, or `fallback` when absent
pub fn sparse_label(
    table: &'static [(i64, &'static str)],
    id: i64,
    fallback: &'static str,
) -> &'static str {
    table
        .iter()
        .find(|(k, _)| *k == id)
        .map(|(_, name)| *name)
        .unwrap_or(fallback)
}

pub fn npc_category(id: i64) -> &'static str {
    sparse_label(NPC_TYPES, id, UNKNOWN)
}

pub fn event_name(id: i64) -> &'static str {
    sparse_label(EVENT_TYPES, id, "Custom Event")
}

pub fn message_type(id: i64) -> &'static str {
    sparse_label(MESSAGE_TYPES, id, "None")
}

/// `icons/{prefix}_{number:02}.png`
pub fn icon_path(prefix: &str, number: i64) -> String {
    format!("icons/{prefix}_{number:02}.png")
}

/// Path used when an icon row cannot be resolved
pub fn error_icon() -> String {
    icon_path("error", 0)
}

/// Raw timer units to seconds
pub fn timer_seconds(raw: i64) -> f64 {
    raw as f64 * TIMER_SCALE
}

/// Human readable duration, e.g. `"1 hour, 2 minutes and 3.50 seconds"`.
///
/// Zero-valued units are dropped; fractional seconds keep two decimals.
pub fn precise_delta(seconds: f64) -> String {
    const UNITS: &[(&str, f64)] = &[("day", 86400.0), ("hour", 3600.0), ("minute", 60.0)];

    let mut remaining = seconds.max(0.0);
    let mut parts = Vec::new();

    for (unit, size) in UNITS {
        let count = (remaining / size).floor();
        if count >= 1.0 {
            parts.push(plural(count as i64, unit));
            remaining -= count * size;
        }
    }

    // Float residue from the subtractions above
    let rounded = (remaining * 100.0).round() / 100.0;
    if rounded > 0.0 || parts.is_empty() {
        if rounded.fract() == 0.0 {
            parts.push(plural(rounded as i64, "second"));
        } else {
            parts.push(format!("{rounded:.2} seconds"));
        }
    }

    match parts.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
