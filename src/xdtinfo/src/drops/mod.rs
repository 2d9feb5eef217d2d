//! Drop tables from the server's `drops.json` and the reverse reference index
//!
//! Loot is described by a small relational schema: mobs and events point at
//! mob drops, mob drops at crate drop types and chances, crate drop types at
//! crates, crates at item sets and rarity weights, item sets at item
//! references. Every table is keyed by its true key column, and
//! [`ReferenceIndex`] answers "which rows point at this row" for any of the
//! declared foreign keys in [`FOREIGN_KEYS`].

mod db;
mod index;
mod types;

pub use db::DropTables;
pub use index::{foreign_key_target, ForeignKey, ReferenceIndex, FOREIGN_KEYS};
pub use types::{
    CodeItem, CrateDropChance, CrateDropType, CrateRow, DropRow, DropTable, EventLink,
    ItemReference, ItemSet, MiscDropChance, MiscDropType, MobDrop, MobLink, NanoCapsule, Racing,
    RarityWeight, RowKey,
};
