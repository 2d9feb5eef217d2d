//! Sources that hand out an item without any roll
//!
//! Code grants, vendors and mission rewards are keyed by the item they give.
//! Eggs and infected zone star rewards give crates, so they are keyed by the
//! crate's item key.

use super::types::{
    CodeSource, CollectibleSource, MissionRewardSource, NpcSpot, Source, SourceKind, SourceRecord,
    SpecialZoneSource, VendorSource,
};
use crate::entities::{ActorInstanceRecord, Entities};
use crate::grouping::SpawnIndex;
use crate::ids::{ActorTypeId, ItemKey};
use crate::reference::WORLD_INSTANCE_ID;
use std::sync::Arc;
use tracing::warn;

pub type Keyed = Vec<(ItemKey, SourceRecord)>;

impl NpcSpot {
    pub fn of(npc: &ActorInstanceRecord) -> Self {
        Self {
            npc_id: npc.id.clone(),
            npc_type_id: npc.type_id,
            npc_name: npc.type_name.clone(),
            npc_icon: npc.type_icon.clone(),
            x: npc.x,
            y: npc.y,
            z: npc.z,
            instance_id: npc.instance_id,
            area: npc.area.clone(),
        }
    }
}

/// Every placement of an NPC template, spawn group by spawn group
fn placed_npcs<'a>(
    spawns: &'a SpawnIndex,
    entities: &'a Entities,
    type_id: ActorTypeId,
) -> impl Iterator<Item = &'a ActorInstanceRecord> {
    spawns
        .npc_groups(entities, type_id)
        .into_iter()
        .flat_map(|g| g.members)
}

pub fn codes(entities: &Entities) -> Keyed {
    let mut found = Keyed::new();
    for code in entities.codes.values() {
        for &item in &code.items {
            let source = Source::Code(CodeSource {
                code: code.code.clone(),
            });
            found.push((item, SourceRecord::new(SourceKind::Code, source)));
        }
    }
    found
}

/// One source per placed vendor NPC per listing
pub fn vendors(entities: &Entities, spawns: &SpawnIndex) -> Keyed {
    let mut found = Keyed::new();
    for vendor in entities.vendors.values() {
        for npc in placed_npcs(spawns, entities, vendor.npc_type_id) {
            for listing in vendor.listings.values() {
                let source = Source::Vendor(VendorSource {
                    npc: NpcSpot::of(npc),
                    price: listing.price,
                });
                found.push((listing.item, SourceRecord::new(SourceKind::Vendor, source)));
            }
        }
    }
    found
}

/// One source per placed egg whose type drops a crate
pub fn collectibles(entities: &Entities, spawns: &SpawnIndex) -> Keyed {
    let mut found = Keyed::new();
    for egg_type in entities.egg_types.values() {
        let Some(crate_item) = egg_type.crate_item else {
            continue;
        };
        let eggs = spawns
            .egg_groups(entities, egg_type.id)
            .into_iter()
            .flat_map(|g| g.members);
        for egg in eggs {
            let source = Source::Collectible(CollectibleSource {
                egg_id: egg.id.clone(),
                egg_type_id: egg_type.id,
                egg_name: egg_type.name.clone(),
                egg_comment: egg_type.comment.clone(),
                egg_extra_comment: egg_type.extra_comment.clone(),
                x: egg.x,
                y: egg.y,
                z: egg.z,
                instance_id: egg.instance_id,
                area: egg.area.clone(),
            });
            found.push((crate_item, SourceRecord::new(SourceKind::Collectible, source)));
        }
    }
    found
}

/// One source per star reward per open-world NPC warping into the zone
pub fn special_zones(entities: &Entities, spawns: &SpawnIndex) -> Keyed {
    let mut found = Keyed::new();
    for zone in entities.special_zones.values() {
        for (&stars, reward) in &zone.star_rewards {
            for warp_id in &zone.entry_transitions {
                let Some(warp) = entities.transitions.get(warp_id) else {
                    warn!(zone = zone.id, warp = warp_id, "Infected zone entry warp is missing");
                    continue;
                };
                let Some(npc_type) = warp.npc_type_id else {
                    continue;
                };
                let npcs = placed_npcs(spawns, entities, npc_type)
                    .filter(|npc| npc.instance_id == WORLD_INSTANCE_ID);
                for npc in npcs {
                    let source = Source::SpecialZone(SpecialZoneSource {
                        npc: NpcSpot::of(npc),
                        special_zone_id: zone.id,
                        zone_instance_id: zone.instance_id,
                        zone_name: zone.name.clone(),
                        stars,
                        min_score: reward.rank_score,
                    });
                    found.push((reward.item, SourceRecord::new(SourceKind::SpecialZone, source)));
                }
            }
        }
    }
    found
}

/// One source per placed start NPC per reward item
pub fn mission_rewards(entities: &Entities, spawns: &SpawnIndex) -> Keyed {
    let mut found = Keyed::new();
    for mission in entities.missions.values() {
        if mission.rewards.items.is_empty() {
            continue;
        }
        let Some(start) = mission.start_npc_id() else {
            continue;
        };
        for npc in placed_npcs(spawns, entities, start) {
            let source = Arc::new(Source::MissionReward(MissionRewardSource {
                npc: NpcSpot::of(npc),
                mission_id: mission.id,
                mission_name: mission.name.clone(),
                mission_type: mission.mission_type,
                difficulty: mission.difficulty,
                level: mission.level,
                required_missions: mission.required_missions.clone(),
                item_selection_needed: mission.rewards.item_selection_needed,
                taros: mission.rewards.taros,
                fusion_matter: mission.rewards.fusion_matter,
            }));
            for &item in &mission.rewards.items {
                let record = SourceRecord {
                    kind: SourceKind::MissionReward,
                    source: Arc::clone(&source),
                    odds: None,
                };
                found.push((item, record));
            }
        }
    }
    found
}
