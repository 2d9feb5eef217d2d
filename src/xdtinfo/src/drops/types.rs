//! Drop table row definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The drop tables of `drops.json`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DropTable {
    CrateDropChances,
    CrateDropTypes,
    MiscDropChances,
    MiscDropTypes,
    MobDrops,
    Mobs,
    Events,
    RarityWeights,
    ItemSets,
    ItemReferences,
    Crates,
    Racing,
    NanoCapsules,
    CodeItems,
}

impl DropTable {
    pub const ALL: [DropTable; 14] = [
        DropTable::CrateDropChances,
        DropTable::CrateDropTypes,
        DropTable::MiscDropChances,
        DropTable::MiscDropTypes,
        DropTable::MobDrops,
        DropTable::Mobs,
        DropTable::Events,
        DropTable::RarityWeights,
        DropTable::ItemSets,
        DropTable::ItemReferences,
        DropTable::Crates,
        DropTable::Racing,
        DropTable::NanoCapsules,
        DropTable::CodeItems,
    ];

    /// Table name in `drops.json`
    pub fn name(self) -> &'static str {
        match self {
            DropTable::CrateDropChances => "CrateDropChances",
            DropTable::CrateDropTypes => "CrateDropTypes",
            DropTable::MiscDropChances => "MiscDropChances",
            DropTable::MiscDropTypes => "MiscDropTypes",
            DropTable::MobDrops => "MobDrops",
            DropTable::Mobs => "Mobs",
            DropTable::Events => "Events",
            DropTable::RarityWeights => "RarityWeights",
            DropTable::ItemSets => "ItemSets",
            DropTable::ItemReferences => "ItemReferences",
            DropTable::Crates => "Crates",
            DropTable::Racing => "Racing",
            DropTable::NanoCapsules => "NanoCapsules",
            DropTable::CodeItems => "CodeItems",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Field holding each row's key
    pub fn key_field(self) -> &'static str {
        match self {
            DropTable::CrateDropChances => "CrateDropChanceID",
            DropTable::CrateDropTypes => "CrateDropTypeID",
            DropTable::MiscDropChances => "MiscDropChanceID",
            DropTable::MiscDropTypes => "MiscDropTypeID",
            DropTable::MobDrops => "MobDropID",
            DropTable::Mobs => "MobID",
            DropTable::Events => "EventID",
            DropTable::RarityWeights => "RarityWeightID",
            DropTable::ItemSets => "ItemSetID",
            DropTable::ItemReferences => "ItemReferenceID",
            DropTable::Crates => "CrateID",
            DropTable::Racing => "EPID",
            DropTable::NanoCapsules => "Nano",
            DropTable::CodeItems => "Code",
        }
    }

    /// References from rows of this table at or below this value are "none"
    pub fn lower_bound(self) -> i64 {
        match self {
            DropTable::Crates => 0,
            _ => -1,
        }
    }
}

impl fmt::Display for DropTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key of a drop table row; only code items are keyed by text
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum RowKey {
    Id(i64),
    Code(String),
}

impl RowKey {
    pub fn id(&self) -> Option<i64> {
        match self {
            RowKey::Id(id) => Some(*id),
            RowKey::Code(_) => None,
        }
    }
}

/// A typed drop table row
pub trait DropRow {
    const TABLE: DropTable;

    fn key(&self) -> RowKey;

    /// `(field, referenced id)` for every foreign key value in the row
    fn references(&self) -> Vec<(&'static str, i64)> {
        Vec::new()
    }
}

macro_rules! id_key {
    ($row:ty, $table:ident, $field:ident) => {
        id_key!($row, $table, $field, |_row: &$row| Vec::new());
    };
    ($row:ty, $table:ident, $field:ident, $refs:expr) => {
        impl DropRow for $row {
            const TABLE: DropTable = DropTable::$table;

            fn key(&self) -> RowKey {
                RowKey::Id(self.$field)
            }

            fn references(&self) -> Vec<(&'static str, i64)> {
                let refs: fn(&$row) -> Vec<(&'static str, i64)> = $refs;
                refs(self)
            }
        }
    };
}

fn each(field: &'static str, ids: &[i64]) -> Vec<(&'static str, i64)> {
    ids.iter().map(|&id| (field, id)).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CrateDropChance {
    #[serde(rename = "CrateDropChanceID")]
    pub id: i64,
    pub drop_chance: i64,
    pub drop_chance_total: i64,
    pub crate_type_drop_weights: Vec<i64>,
}
id_key!(CrateDropChance, CrateDropChances, id);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrateDropType {
    #[serde(rename = "CrateDropTypeID")]
    pub id: i64,
    #[serde(rename = "CrateIDs")]
    pub crate_ids: Vec<i64>,
}
id_key!(CrateDropType, CrateDropTypes, id, |row| each(
    "CrateIDs",
    &row.crate_ids
));

/// Odds of the bonus drops that accompany a kill
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MiscDropChance {
    #[serde(rename = "MiscDropChanceID")]
    pub id: i64,
    pub potion_drop_chance: i64,
    pub potion_drop_chance_total: i64,
    pub boost_drop_chance: i64,
    pub boost_drop_chance_total: i64,
    pub taro_drop_chance: i64,
    pub taro_drop_chance_total: i64,
    #[serde(rename = "FMDropChance")]
    pub fm_drop_chance: i64,
    #[serde(rename = "FMDropChanceTotal")]
    pub fm_drop_chance_total: i64,
}
id_key!(MiscDropChance, MiscDropChances, id);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MiscDropType {
    #[serde(rename = "MiscDropTypeID")]
    pub id: i64,
    pub potion_amount: i64,
    pub boost_amount: i64,
    pub taro_amount: i64,
    #[serde(rename = "FMAmount")]
    pub fm_amount: i64,
}
id_key!(MiscDropType, MiscDropTypes, id);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MobDrop {
    #[serde(rename = "MobDropID")]
    pub id: i64,
    #[serde(rename = "CrateDropChanceID")]
    pub crate_drop_chance: i64,
    #[serde(rename = "CrateDropTypeID")]
    pub crate_drop_type: i64,
    #[serde(rename = "MiscDropChanceID")]
    pub misc_drop_chance: i64,
    #[serde(rename = "MiscDropTypeID")]
    pub misc_drop_type: i64,
}
id_key!(MobDrop, MobDrops, id, |row| vec![
    ("CrateDropChanceID", row.crate_drop_chance),
    ("CrateDropTypeID", row.crate_drop_type),
    ("MiscDropChanceID", row.misc_drop_chance),
    ("MiscDropTypeID", row.misc_drop_type),
]);

/// Mob type to drop assignment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MobLink {
    #[serde(rename = "MobID")]
    pub mob: i64,
    #[serde(rename = "MobDropID")]
    pub mob_drop: i64,
}
id_key!(MobLink, Mobs, mob, |row| vec![("MobDropID", row.mob_drop)]);

/// Event to drop assignment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLink {
    #[serde(rename = "EventID")]
    pub event: i64,
    #[serde(rename = "MobDropID")]
    pub mob_drop: i64,
}
id_key!(EventLink, Events, event, |row| vec![("MobDropID", row.mob_drop)]);

/// Weights of rarity tiers 1..=4
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RarityWeight {
    #[serde(rename = "RarityWeightID")]
    pub id: i64,
    #[serde(rename = "Weights")]
    pub weights: Vec<i64>,
}
id_key!(RarityWeight, RarityWeights, id);

/// Weighted candidate list of a crate.
///
/// Override maps are keyed by item reference id rendered as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemSet {
    #[serde(rename = "ItemSetID")]
    pub id: i64,
    #[serde(default)]
    pub ignore_rarity: bool,
    #[serde(default)]
    pub ignore_gender: bool,
    pub default_item_weight: i64,
    #[serde(default)]
    pub alter_rarity_map: HashMap<String, i64>,
    #[serde(default)]
    pub alter_gender_map: HashMap<String, i64>,
    #[serde(default)]
    pub alter_item_weight_map: HashMap<String, i64>,
    #[serde(rename = "ItemReferenceIDs")]
    pub item_references: Vec<i64>,
}
id_key!(ItemSet, ItemSets, id, |row| each(
    "ItemReferenceIDs",
    &row.item_references
));

/// Points at an item by `(slot, id)`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemReference {
    #[serde(rename = "ItemReferenceID")]
    pub id: i64,
    #[serde(rename = "ItemID")]
    pub item: i64,
    #[serde(rename = "Type")]
    pub slot: i64,
}
id_key!(ItemReference, ItemReferences, id);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrateRow {
    #[serde(rename = "CrateID")]
    pub id: i64,
    #[serde(rename = "ItemSetID")]
    pub item_set: i64,
    #[serde(rename = "RarityWeightID")]
    pub rarity_weight: i64,
}
id_key!(CrateRow, Crates, id, |row| vec![
    ("ItemSetID", row.item_set),
    ("RarityWeightID", row.rarity_weight),
]);

/// Infected zone scoring and star rewards, keyed by zone (EP) id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Racing {
    #[serde(rename = "EPID")]
    pub id: i64,
    pub rank_scores: Vec<i64>,
    /// Reward crate per rank, best rank first
    pub rewards: Vec<i64>,
    pub score_cap: i64,
    pub time_limit: i64,
    pub total_pods: i64,
    pub scale_factor: f64,
    pub pod_factor: f64,
    pub time_factor: f64,
}
id_key!(Racing, Racing, id, |row| each("Rewards", &row.rewards));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NanoCapsule {
    #[serde(rename = "Nano")]
    pub nano: i64,
    #[serde(rename = "CrateID")]
    pub crate_id: i64,
}
id_key!(NanoCapsule, NanoCapsules, nano, |row| vec![("CrateID", row.crate_id)]);

/// Redeemable code and the items it grants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeItem {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "ItemReferenceIDs")]
    pub item_references: Vec<i64>,
}

impl DropRow for CodeItem {
    const TABLE: DropTable = DropTable::CodeItems;

    fn key(&self) -> RowKey {
        RowKey::Code(self.code.clone())
    }

    fn references(&self) -> Vec<(&'static str, i64)> {
        each("ItemReferenceIDs", &self.item_references)
    }
}
