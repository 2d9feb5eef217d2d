//! Redeemable codes

use super::items::ItemRecord;
use crate::drops::DropTables;
use crate::ids::ItemKey;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct CodeRecord {
    pub code: String,
    pub items: Vec<ItemKey>,
}

/// Items granted by every code; references to unknown items are skipped
pub fn build(drops: &DropTables, items: &IndexMap<ItemKey, ItemRecord>) -> IndexMap<String, CodeRecord> {
    let mut codes = IndexMap::new();

    for code in drops.code_items.values() {
        let granted = code
            .item_references
            .iter()
            .filter_map(|id| {
                let Some(reference) = drops.item_references.get(id) else {
                    warn!(code = %code.code, reference = id, "Code grants a missing item reference");
                    return None;
                };
                ItemKey::from_raw(reference.slot, reference.item)
            })
            .filter(|key| items.contains_key(key))
            .collect();

        codes.insert(
            code.code.clone(),
            CodeRecord {
                code: code.code.clone(),
                items: granted,
            },
        );
    }

    codes
}
