//! Drop tables re-keyed by their true keys

use super::index::ReferenceIndex;
use super::types::{
    CodeItem, CrateDropChance, CrateDropType, CrateRow, DropRow, DropTable, EventLink, ItemReference,
    ItemSet, MiscDropChance, MiscDropType, MobDrop, MobLink, NanoCapsule, Racing, RarityWeight,
    RowKey,
};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Every table of `drops.json`, each keyed by its row key
#[derive(Debug, Clone, Default)]
pub struct DropTables {
    pub crate_drop_chances: IndexMap<i64, CrateDropChance>,
    pub crate_drop_types: IndexMap<i64, CrateDropType>,
    pub misc_drop_chances: IndexMap<i64, MiscDropChance>,
    pub misc_drop_types: IndexMap<i64, MiscDropType>,
    pub mob_drops: IndexMap<i64, MobDrop>,
    pub mobs: IndexMap<i64, MobLink>,
    pub events: IndexMap<i64, EventLink>,
    pub rarity_weights: IndexMap<i64, RarityWeight>,
    pub item_sets: IndexMap<i64, ItemSet>,
    pub item_references: IndexMap<i64, ItemReference>,
    pub crates: IndexMap<i64, CrateRow>,
    pub racing: IndexMap<i64, Racing>,
    pub nano_capsules: IndexMap<i64, NanoCapsule>,
    pub code_items: IndexMap<String, CodeItem>,
}

fn keyed<R>(root: &Value) -> Result<IndexMap<i64, R>>
where
    R: DropRow + DeserializeOwned,
{
    Ok(load::<R>(root)?
        .into_iter()
        .filter_map(|row| match row.key() {
            RowKey::Id(id) => Some((id, row)),
            RowKey::Code(_) => None,
        })
        .collect())
}

fn load<R>(root: &Value) -> Result<Vec<R>>
where
    R: DropRow + DeserializeOwned,
{
    let name = R::TABLE.name();
    let Some(table) = root.get(name) else {
        warn!(table = name, "Drop table absent, treating as empty");
        return Ok(Vec::new());
    };

    // Rows are stored under arbitrary string keys; the real key is a field
    IndexMap::<String, R>::deserialize(table)
        .map(|rows| rows.into_values().collect())
        .map_err(|e| Error::shape(format!("drops.{name}"), e))
}

impl DropTables {
    /// Parse `drops.json`
    pub fn from_value(root: &Value) -> Result<Self> {
        if let Some(obj) = root.as_object() {
            for name in obj.keys() {
                if DropTable::from_name(name).is_none() {
                    debug!(table = %name, "Ignoring unknown drop table");
                }
            }
        }

        let tables = Self {
            crate_drop_chances: keyed(root)?,
            crate_drop_types: keyed(root)?,
            misc_drop_chances: keyed(root)?,
            misc_drop_types: keyed(root)?,
            mob_drops: keyed(root)?,
            mobs: keyed(root)?,
            events: keyed(root)?,
            rarity_weights: keyed(root)?,
            item_sets: keyed(root)?,
            item_references: keyed(root)?,
            crates: keyed(root)?,
            racing: keyed(root)?,
            nano_capsules: keyed(root)?,
            code_items: load::<CodeItem>(root)?
                .into_iter()
                .map(|row| (row.code.clone(), row))
                .collect(),
        };

        info!(
            crates = tables.crates.len(),
            item_sets = tables.item_sets.len(),
            mob_drops = tables.mob_drops.len(),
            "Loaded drop tables"
        );
        Ok(tables)
    }

    /// Build the reverse foreign-key index over every table
    pub fn reference_index(&self) -> ReferenceIndex {
        let mut index = ReferenceIndex::new();
        index.add_table(&self.crate_drop_chances);
        index.add_table(&self.crate_drop_types);
        index.add_table(&self.misc_drop_chances);
        index.add_table(&self.misc_drop_types);
        index.add_table(&self.mob_drops);
        index.add_table(&self.mobs);
        index.add_table(&self.events);
        index.add_table(&self.rarity_weights);
        index.add_table(&self.item_sets);
        index.add_table(&self.item_references);
        index.add_table(&self.crates);
        index.add_table(&self.racing);
        index.add_table(&self.nano_capsules);
        index.add_table(&self.code_items);
        debug!(targets = index.len(), "Built drop reference index");
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rekeyed_by_true_key() {
        let tables = DropTables::from_value(&json!({
            "Racing": {"0": {
                "EPID": 5, "RankScores": [], "Rewards": [], "ScoreCap": 1, "TimeLimit": 1,
                "TotalPods": 1, "ScaleFactor": 1.0, "PodFactor": 1.0, "TimeFactor": 1.0
            }},
            "NanoCapsules": {"0": {"Nano": 9, "CrateID": 3}},
            "CodeItems": {"0": {"Code": "HELLO", "ItemReferenceIDs": [1]}}
        }))
        .unwrap();

        assert!(tables.racing.contains_key(&5));
        assert_eq!(tables.nano_capsules[&9].crate_id, 3);
        assert!(tables.code_items.contains_key("HELLO"));
        assert!(tables.crates.is_empty());
    }

    #[test]
    fn test_unknown_tables_ignored() {
        let tables = DropTables::from_value(&json!({"Mystery": {"0": {"x": 1}}})).unwrap();
        assert!(tables.mob_drops.is_empty());
    }

    #[test]
    fn test_malformed_row_names_table() {
        let err = DropTables::from_value(&json!({"Crates": {"0": {"CrateID": 1}}})).unwrap_err();
        assert!(matches!(err, Error::SchemaShape { ref table, .. } if table == "drops.Crates"));
    }

    #[test]
    fn test_chain_walk() {
        let tables = DropTables::from_value(&json!({
            "Crates": {"0": {"CrateID": 10, "ItemSetID": 1, "RarityWeightID": 1}},
            "CrateDropTypes": {"0": {"CrateDropTypeID": 2, "CrateIDs": [10, 11]}},
            "MobDrops": {"0": {
                "MobDropID": 3, "CrateDropChanceID": 1, "CrateDropTypeID": 2,
                "MiscDropChanceID": 1, "MiscDropTypeID": 1
            }},
            "Mobs": {"0": {"MobID": 500, "MobDropID": 3}},
            "Events": {"0": {"EventID": 2, "MobDropID": 3}}
        }))
        .unwrap();
        let index = tables.reference_index();

        let types: Vec<_> = index
            .referrers_in(DropTable::Crates, 10, DropTable::CrateDropTypes)
            .collect();
        assert_eq!(types, vec![2]);

        let drops: Vec<_> = index
            .referrers_in(DropTable::CrateDropTypes, 2, DropTable::MobDrops)
            .collect();
        assert_eq!(drops, vec![3]);

        let owners: Vec<_> = index.referrers(DropTable::MobDrops, 3).cloned().collect();
        assert_eq!(
            owners,
            vec![
                (DropTable::Mobs, RowKey::Id(500)),
                (DropTable::Events, RowKey::Id(2)),
            ]
        );
    }
}
