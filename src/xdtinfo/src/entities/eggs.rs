//! Collectible ("egg") templates and placements

use super::actors::SkillSummary;
use super::items::ItemRecord;
use super::{placement_key, Placed};
use crate::area::AreaIndex;
use crate::ids::{present, CrateId, EggTypeId, InstanceId, ItemKey};
use crate::raw::{row, Eggs, Xdt};
use crate::reference::precise_delta;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct EggTypeRecord {
    pub id: EggTypeId,
    pub name: String,
    pub comment: String,
    pub extra_comment: String,
    pub crate_id: Option<CrateId>,
    /// Item key of the reward crate, when the crate is a known item
    pub crate_item: Option<ItemKey>,
    pub effect: SkillSummary,
    pub effect_duration: i64,
    pub respawn_seconds: i64,
    pub respawn_time: String,
    pub in_game: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EggRecord {
    pub id: String,
    pub type_id: EggTypeId,
    pub type_name: String,
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub instance_id: InstanceId,
    pub area: String,
}

/// Egg templates declared in `eggs.json`, keyed by their own id
pub fn build_types(
    xdt: &Xdt,
    eggs: &Eggs,
    items: &IndexMap<ItemKey, ItemRecord>,
) -> IndexMap<EggTypeId, EggTypeRecord> {
    let mut types = IndexMap::new();

    for egg_type in eggs.types.values() {
        let text = row(&xdt.shiny_strings, egg_type.id, "m_pShinyStringData");
        let crate_id = present(egg_type.crate_id);
        let crate_item = crate_id.map(ItemKey::of_crate).filter(|key| {
            let known = items.contains_key(key);
            if !known {
                warn!(egg_type = egg_type.id, item = %key, "Egg reward crate is not an item");
            }
            known
        });

        types.insert(
            egg_type.id,
            EggTypeRecord {
                id: egg_type.id,
                name: text.map(|t| t.name.clone()).unwrap_or_default(),
                comment: text.map(|t| t.comment.clone()).unwrap_or_default(),
                extra_comment: text.map(|t| t.comment1.clone()).unwrap_or_default(),
                crate_id,
                crate_item,
                effect: SkillSummary::resolve(xdt, egg_type.effect, None),
                effect_duration: egg_type.duration,
                respawn_seconds: egg_type.regen,
                respawn_time: precise_delta(egg_type.regen as f64),
                in_game: false,
            },
        );
    }

    types
}

/// Egg placements grouped by template; eggs of undeclared types are dropped
pub fn build_eggs(
    eggs: &Eggs,
    types: &IndexMap<EggTypeId, EggTypeRecord>,
    areas: &AreaIndex,
) -> Placed<EggRecord> {
    let mut placed: Placed<EggRecord> = IndexMap::new();

    for (key, egg) in &eggs.eggs {
        let Some(egg_type) = types.get(&egg.egg_type) else {
            continue;
        };
        let Some(id) = placement_key(key, 0, "eggs") else {
            continue;
        };

        placed.entry(egg.egg_type).or_default().insert(
            id.clone(),
            EggRecord {
                id,
                type_id: egg.egg_type,
                type_name: egg_type.name.clone(),
                x: egg.x,
                y: egg.y,
                z: egg.z,
                instance_id: egg.instance,
                area: areas.tag_at(egg.x, egg.y),
            },
        );
    }

    placed
}
