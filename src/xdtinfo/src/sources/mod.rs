//! Item sources: every way a player can obtain each item
//!
//! Sources are gathered per kind in a fixed order, then pushed through crate
//! memberships so items inside crates inherit the crate's sources.

pub mod crates;
pub mod direct;
pub mod kills;
pub mod resolve;
pub mod types;

pub use resolve::{merge_kills, resolve_items, ResolvedSources};
pub use types::{
    Bounds, CodeSource, CollectibleSource, Contribution, Diagnostic, EventSource, KillSource, Membership,
    MiscDrops, MissionRewardSource, NpcSpot, Source, SourceKind, SourceRecord, SpecialZoneSource, VendorSource,
};

use crate::drops::{DropTables, ReferenceIndex};
use crate::entities::Entities;
use crate::grouping::SpawnIndex;
use crate::ids::ItemKey;
use std::collections::HashMap;
use tracing::debug;

/// Sources an item has before crate nesting is applied, in kind order
pub fn own_sources(
    entities: &Entities,
    spawns: &SpawnIndex,
    drops: &DropTables,
    references: &ReferenceIndex,
) -> HashMap<ItemKey, Vec<SourceRecord>> {
    let (kills, events) = kills::collect(entities, spawns, drops, references);
    let gathered = [
        direct::codes(entities),
        direct::vendors(entities, spawns),
        direct::collectibles(entities, spawns),
        direct::special_zones(entities, spawns),
        kills,
        events,
        direct::mission_rewards(entities, spawns),
    ];

    let mut own: HashMap<ItemKey, Vec<SourceRecord>> = HashMap::new();
    for keyed in gathered {
        if let Some((_, first)) = keyed.first() {
            debug!(kind = %first.kind, count = keyed.len(), "Collected sources");
        }
        for (item, record) in keyed {
            own.entry(item).or_default().push(record);
        }
    }
    own
}

/// Resolve the sources of every known item
pub fn resolve(
    entities: &Entities,
    spawns: &SpawnIndex,
    drops: &DropTables,
    references: &ReferenceIndex,
) -> ResolvedSources {
    let own = own_sources(entities, spawns, drops, references);
    let memberships = crates::memberships(entities, drops);
    resolve_items(entities.items.keys().copied(), &own, &memberships)
}
