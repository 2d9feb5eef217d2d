//! Vendor listings grouped by selling NPC template

use super::items::ItemRecord;
use crate::ids::{ActorTypeId, ItemKey};
use crate::raw::{VendorRow, Xdt};
use crate::reference::{label, ITEM_TYPES};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct VendorListing {
    pub item: ItemKey,
    pub item_type_id: i64,
    pub item_type: &'static str,
    pub name: String,
    pub price: i64,
    pub sort: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VendorRecord {
    pub npc_type_id: ActorTypeId,
    pub listings: IndexMap<ItemKey, VendorListing>,
    pub in_game: bool,
}

fn listing(row: &VendorRow, items: &IndexMap<ItemKey, ItemRecord>) -> Option<VendorListing> {
    let key = ItemKey::from_raw(row.item_type, row.item)?;
    let Some(item) = items.get(&key) else {
        warn!(npc = row.npc, item = %key, "Vendor lists an unknown item");
        return None;
    };

    Some(VendorListing {
        item: key,
        item_type_id: row.item_type,
        item_type: label(ITEM_TYPES, row.item_type, "item slot"),
        name: item.name.clone(),
        price: if item.price > 0 {
            item.price
        } else {
            row.sell_cost
        },
        sort: row.sort,
    })
}

/// Listings per vendor in `(npc, sort rank)` order
pub fn build(xdt: &Xdt, items: &IndexMap<ItemKey, ItemRecord>) -> IndexMap<ActorTypeId, VendorRecord> {
    let mut rows: Vec<&VendorRow> = xdt.vendor.iter().skip(1).collect();
    rows.sort_by_key(|r| (r.npc, r.sort));

    let mut vendors: IndexMap<ActorTypeId, VendorRecord> = IndexMap::new();
    for row in rows {
        let vendor = vendors.entry(row.npc).or_insert_with(|| VendorRecord {
            npc_type_id: row.npc,
            listings: IndexMap::new(),
            in_game: false,
        });
        if let Some(listing) = listing(row, items) {
            vendor.listings.insert(listing.item, listing);
        }
    }

    vendors
}
