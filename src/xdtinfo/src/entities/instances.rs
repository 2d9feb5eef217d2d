//! Instances (zones) and the warps leading into them

use super::items::ItemRecord;
use super::missions::{mission_name, TaskLookup};
use crate::area::AreaIndex;
use crate::ids::{present, ActorTypeId, InstanceId, ItemKey, MissionId, WarpId};
use crate::raw::{string_at, NameStringRow, Xdt};
use crate::reference::TILE_WIDTH;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// A warp into an instance
#[derive(Debug, Clone, Serialize)]
pub struct TransitionRecord {
    pub id: WarpId,
    pub destination_id: InstanceId,
    pub destination: String,
    pub price: i64,
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub area: String,
    pub npc_type_id: Option<ActorTypeId>,
    pub required_task_id: Option<i64>,
    pub required_task_objective: String,
    pub required_mission_id: Option<MissionId>,
    pub required_mission: String,
    pub required_level: i64,
    pub required_item: Option<ItemKey>,
    pub in_game: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneRecord {
    pub id: InstanceId,
    pub name: String,
    pub zone_x: i64,
    pub zone_y: i64,
    /// Area at the centre of the zone's map tile
    pub area: String,
    pub special_zone_id: Option<i64>,
    pub max_score: i64,
    pub entry_transitions: Vec<WarpId>,
    pub in_game: bool,
}

/// Instance name; instances without a name row are unnamed
fn instance_name(names: &[NameStringRow], id: InstanceId) -> String {
    usize::try_from(id)
        .ok()
        .and_then(|i| names.get(i))
        .map(|n| n.text.clone())
        .unwrap_or_default()
}

pub fn build_transitions(
    xdt: &Xdt,
    items: &IndexMap<ItemKey, ItemRecord>,
    areas: &AreaIndex,
) -> IndexMap<WarpId, TransitionRecord> {
    let instance = &xdt.instance;
    let tasks = TaskLookup::new(&xdt.mission.rows);
    let mut transitions = IndexMap::new();

    for warp in instance.warps.iter().skip(1) {
        let task = tasks.get(warp.required_task);
        let required_item = present(warp.required_item)
            .and_then(|id| ItemKey::from_raw(warp.required_item_type, id))
            .filter(|key| {
                let known = items.contains_key(key);
                if !known {
                    warn!(warp = warp.id, item = %key, "Warp requires an unknown item");
                }
                known
            });

        transitions.insert(
            warp.id,
            TransitionRecord {
                id: warp.id,
                destination_id: warp.to_instance,
                destination: instance_name(&instance.names, warp.to_instance),
                price: warp.cost,
                x: warp.x,
                y: warp.y,
                z: warp.z,
                area: areas.tag_at(warp.x, warp.y),
                npc_type_id: present(warp.npc),
                required_task_id: present(warp.required_task),
                required_task_objective: task
                    .map(|t| string_at(&xdt.mission.strings, t.objective, "m_pMissionStringData"))
                    .unwrap_or_default(),
                required_mission_id: task.and_then(|t| present(t.mission_id)),
                required_mission: task.map(|t| mission_name(xdt, t.name)).unwrap_or_default(),
                required_level: warp.required_level,
                required_item,
                in_game: false,
            },
        );
    }

    transitions
}

pub fn build_zones(
    xdt: &Xdt,
    transitions: &IndexMap<WarpId, TransitionRecord>,
    areas: &AreaIndex,
) -> IndexMap<InstanceId, ZoneRecord> {
    let instance = &xdt.instance;
    let mut zones = IndexMap::new();

    for raw in instance.rows.iter().skip(1) {
        let centre_x = raw.zone_x * TILE_WIDTH + TILE_WIDTH / 2;
        let centre_y = raw.zone_y * TILE_WIDTH + TILE_WIDTH / 2;

        zones.insert(
            raw.id,
            ZoneRecord {
                id: raw.id,
                name: instance_name(&instance.names, raw.id),
                zone_x: raw.zone_x,
                zone_y: raw.zone_y,
                area: areas.tag_at(centre_x, centre_y),
                special_zone_id: present(raw.special_zone),
                max_score: raw.max_score,
                entry_transitions: transitions
                    .values()
                    .filter(|t| t.destination_id == raw.id)
                    .map(|t| t.id)
                    .collect(),
                in_game: false,
            },
        );
    }

    zones
}
