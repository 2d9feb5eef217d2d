//! Reverse foreign-key index over the drop tables

use super::types::{DropRow, DropTable, RowKey};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// A declared foreign key: `table.field` points at rows of `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: DropTable,
    pub field: &'static str,
    pub target: DropTable,
}

const fn fk(table: DropTable, field: &'static str, target: DropTable) -> ForeignKey {
    ForeignKey {
        table,
        field,
        target,
    }
}

/// Every foreign key between drop tables
pub const FOREIGN_KEYS: &[ForeignKey] = &[
    fk(DropTable::CrateDropTypes, "CrateIDs", DropTable::Crates),
    fk(DropTable::MobDrops, "CrateDropChanceID", DropTable::CrateDropChances),
    fk(DropTable::MobDrops, "CrateDropTypeID", DropTable::CrateDropTypes),
    fk(DropTable::MobDrops, "MiscDropChanceID", DropTable::MiscDropChances),
    fk(DropTable::MobDrops, "MiscDropTypeID", DropTable::MiscDropTypes),
    fk(DropTable::Events, "MobDropID", DropTable::MobDrops),
    fk(DropTable::Mobs, "MobDropID", DropTable::MobDrops),
    fk(DropTable::ItemSets, "ItemReferenceIDs", DropTable::ItemReferences),
    fk(DropTable::Crates, "ItemSetID", DropTable::ItemSets),
    fk(DropTable::Crates, "RarityWeightID", DropTable::RarityWeights),
    fk(DropTable::Racing, "Rewards", DropTable::Crates),
    fk(DropTable::NanoCapsules, "CrateID", DropTable::Crates),
    fk(DropTable::CodeItems, "ItemReferenceIDs", DropTable::ItemReferences),
];

/// Target table of `table.field`, if it is a declared foreign key
pub fn foreign_key_target(table: DropTable, field: &str) -> Option<DropTable> {
    FOREIGN_KEYS
        .iter()
        .find(|fk| fk.table == table && fk.field == field)
        .map(|fk| fk.target)
}

/// Map from `(target table, target id)` to the rows referencing it
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    refs: HashMap<(DropTable, i64), BTreeSet<(DropTable, RowKey)>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every foreign key of `rows`
    pub fn add_table<K, R: DropRow>(&mut self, rows: &IndexMap<K, R>) {
        let lower_bound = R::TABLE.lower_bound();

        for row in rows.values() {
            for (field, id) in row.references() {
                let Some(target) = foreign_key_target(R::TABLE, field) else {
                    debug!(table = %R::TABLE, field, "Field is not a declared foreign key");
                    continue;
                };
                if id <= lower_bound {
                    continue;
                }
                self.refs
                    .entry((target, id))
                    .or_default()
                    .insert((R::TABLE, row.key()));
            }
        }
    }

    /// All rows referencing `(target, id)`, ordered by table then key
    pub fn referrers(&self, target: DropTable, id: i64) -> impl Iterator<Item = &(DropTable, RowKey)> {
        self.refs.get(&(target, id)).into_iter().flatten()
    }

    /// Ids of the rows in `from` referencing `(target, id)`
    pub fn referrers_in(
        &self,
        target: DropTable,
        id: i64,
        from: DropTable,
    ) -> impl Iterator<Item = i64> + '_ {
        self.referrers(target, id)
            .filter(move |(table, _)| *table == from)
            .filter_map(|(_, key)| key.id())
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}
