//! Placements grouped by template, instance and area
//!
//! Kill sources are emitted per spawn group and vendor/mission sources per
//! placed NPC, so both read from [`SpawnIndex`]. [`AreaContents`] is the
//! inverse view: what can be found inside each area rectangle.

use crate::area::{Area, AreaIndex};
use crate::entities::{Entities, Placed};
use crate::ids::{ActorTypeId, EggTypeId, InstanceId, WarpId};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::info;

/// Template id -> instance id -> area tag -> placement ids
pub type Grouped = IndexMap<i64, IndexMap<InstanceId, IndexMap<String, Vec<String>>>>;

/// Placements sharing a template, an instance and an area
#[derive(Debug)]
pub struct SpawnGroup<'a, T> {
    pub instance_id: InstanceId,
    pub area: &'a str,
    pub members: Vec<&'a T>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SpawnIndex {
    pub npcs: Grouped,
    pub mobs: Grouped,
    pub eggs: Grouped,
}

trait Placement {
    fn instance_id(&self) -> InstanceId;
    fn area(&self) -> &str;
}

impl Placement for crate::entities::ActorInstanceRecord {
    fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    fn area(&self) -> &str {
        &self.area
    }
}

impl Placement for crate::entities::EggRecord {
    fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    fn area(&self) -> &str {
        &self.area
    }
}

fn group<T: Placement>(placed: &Placed<T>) -> Grouped {
    let mut grouped = Grouped::new();
    for (&type_id, placements) in placed {
        let by_instance = grouped.entry(type_id).or_default();
        for (id, p) in placements {
            by_instance
                .entry(p.instance_id())
                .or_default()
                .entry(p.area().to_string())
                .or_default()
                .push(id.clone());
        }
    }
    grouped
}

fn groups_of<'a, T>(grouped: &'a Grouped, placed: &'a Placed<T>, type_id: i64) -> Vec<SpawnGroup<'a, T>> {
    let (Some(by_instance), Some(records)) = (grouped.get(&type_id), placed.get(&type_id)) else {
        return Vec::new();
    };

    by_instance
        .iter()
        .flat_map(|(&instance_id, by_area)| {
            by_area.iter().map(move |(area, ids)| SpawnGroup {
                instance_id,
                area: area.as_str(),
                members: ids.iter().filter_map(|id| records.get(id)).collect(),
            })
        })
        .collect()
}

impl SpawnIndex {
    pub fn build(entities: &Entities) -> Self {
        let index = Self {
            npcs: group(&entities.npcs),
            mobs: group(&entities.mobs),
            eggs: group(&entities.eggs),
        };
        info!(
            npc_types = index.npcs.len(),
            mob_types = index.mobs.len(),
            egg_types = index.eggs.len(),
            "Grouped placements"
        );
        index
    }

    pub fn npc_groups<'a>(
        &'a self,
        entities: &'a Entities,
        type_id: ActorTypeId,
    ) -> Vec<SpawnGroup<'a, crate::entities::ActorInstanceRecord>> {
        groups_of(&self.npcs, &entities.npcs, type_id)
    }

    pub fn mob_groups<'a>(
        &'a self,
        entities: &'a Entities,
        type_id: ActorTypeId,
    ) -> Vec<SpawnGroup<'a, crate::entities::ActorInstanceRecord>> {
        groups_of(&self.mobs, &entities.mobs, type_id)
    }

    pub fn egg_groups<'a>(
        &'a self,
        entities: &'a Entities,
        type_id: EggTypeId,
    ) -> Vec<SpawnGroup<'a, crate::entities::EggRecord>> {
        groups_of(&self.eggs, &entities.eggs, type_id)
    }
}

/// Everything found inside one area rectangle
#[derive(Debug, Clone, Serialize)]
pub struct AreaContents {
    #[serde(flatten)]
    pub area: Area,
    pub npc_types: IndexSet<ActorTypeId>,
    pub npcs: Vec<String>,
    pub mob_types: IndexSet<ActorTypeId>,
    pub mobs: Vec<String>,
    pub egg_types: IndexSet<EggTypeId>,
    pub eggs: Vec<String>,
    /// Placed NPCs that run a shop
    pub vendors: Vec<String>,
    /// Placed NPCs that offer transportation
    pub transport: Vec<String>,
    pub instance_warps: IndexSet<WarpId>,
    pub infected_zone: Option<i64>,
}

impl AreaContents {
    fn empty(area: &Area) -> Self {
        Self {
            area: area.clone(),
            npc_types: IndexSet::new(),
            npcs: Vec::new(),
            mob_types: IndexSet::new(),
            mobs: Vec::new(),
            egg_types: IndexSet::new(),
            eggs: Vec::new(),
            vendors: Vec::new(),
            transport: Vec::new(),
            instance_warps: IndexSet::new(),
            infected_zone: None,
        }
    }
}

/// Area tag -> contents of each of its rectangles, in area order
pub type AreaContentsMap = IndexMap<String, Vec<AreaContents>>;

fn rect_at<'a>(
    contents: &'a mut AreaContentsMap,
    areas: &AreaIndex,
    x: i64,
    y: i64,
) -> Option<&'a mut AreaContents> {
    let (group, rect) = areas.locate_index(x, y)?;
    contents
        .get_index_mut(group)
        .and_then(|(_, rects)| rects.get_mut(rect))
}

/// Fill every area rectangle with the placements standing inside it.
/// Placements outside every rectangle are ignored.
pub fn area_contents(entities: &Entities, areas: &AreaIndex) -> AreaContentsMap {
    let mut contents: AreaContentsMap = areas
        .groups()
        .iter()
        .map(|(tag, rects)| (tag.clone(), rects.iter().map(AreaContents::empty).collect()))
        .collect();

    for (&type_id, placements) in &entities.npcs {
        for (id, npc) in placements {
            let Some(c) = rect_at(&mut contents, areas, npc.x, npc.y) else { continue };
            c.npcs.push(id.clone());
            c.npc_types.insert(type_id);
            if entities.vendors.contains_key(&type_id) {
                c.vendors.push(id.clone());
            }
            if entities.transport.contains_key(&type_id) {
                c.transport.push(id.clone());
            }
        }
    }

    for (&type_id, placements) in &entities.mobs {
        for (id, mob) in placements {
            let Some(c) = rect_at(&mut contents, areas, mob.x, mob.y) else { continue };
            c.mobs.push(id.clone());
            c.mob_types.insert(type_id);
        }
    }

    for (&type_id, placements) in &entities.eggs {
        for (id, egg) in placements {
            let Some(c) = rect_at(&mut contents, areas, egg.x, egg.y) else { continue };
            c.eggs.push(id.clone());
            c.egg_types.insert(type_id);
        }
    }

    for warp in entities.transitions.values() {
        let Some(placements) = warp.npc_type_id.and_then(|t| entities.npcs.get(&t)) else {
            continue;
        };
        let zone = entities
            .special_zones
            .values()
            .filter(|z| z.entry_transitions.contains(&warp.id))
            .last()
            .map(|z| z.id);

        for npc in placements.values() {
            let Some(c) = rect_at(&mut contents, areas, npc.x, npc.y) else { continue };
            c.instance_warps.insert(warp.id);
            if zone.is_some() {
                c.infected_zone = zone;
            }
        }
    }

    contents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::VendorRecord;
    use crate::testutil::{actor, areas, egg, special_zone, transition};

    fn place<T>(placed: &mut Placed<T>, type_id: i64, id: &str, record: T) {
        placed.entry(type_id).or_default().insert(id.to_string(), record);
    }

    fn entities(areas: &AreaIndex) -> Entities {
        let mut e = Entities::default();
        place(&mut e.mobs, 2, "10001", actor("10001", 2, (500, 500, 0), areas));
        place(&mut e.mobs, 2, "10002", actor("10002", 2, (900, 900, 0), areas));
        place(&mut e.mobs, 2, "10003", actor("10003", 2, (500, 500, 7), areas));
        place(&mut e.mobs, 2, "10004", actor("10004", 2, (25000, 500, 0), areas));
        place(&mut e.npcs, 5, "1", actor("1", 5, (100, 100, 0), areas));
        place(&mut e.npcs, 5, "2", actor("2", 5, (99999, 99999, 0), areas));
        place(&mut e.eggs, 3, "30001", egg("30001", 3, (21000, 100, 0), areas));
        e.vendors.insert(
            5,
            VendorRecord {
                npc_type_id: 5,
                listings: IndexMap::new(),
                in_game: false,
            },
        );
        e
    }

    #[test]
    fn test_spawn_groups_split_by_instance_and_area() {
        let areas = areas();
        let e = entities(&areas);
        let index = SpawnIndex::build(&e);

        let groups = index.mob_groups(&e, 2);
        let shape: Vec<(i64, &str, usize)> = groups
            .iter()
            .map(|g| (g.instance_id, g.area, g.members.len()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (0, "Sector V - Downtown", 2),
                (0, "Peach Creek - Suburbs", 1),
                (7, "Sector V - Downtown", 1),
            ]
        );
        assert!(index.mob_groups(&e, 99).is_empty());
    }

    #[test]
    fn test_area_contents_skip_unknown() {
        let areas = areas();
        let e = entities(&areas);
        let contents = area_contents(&e, &areas);

        let sector = &contents["Sector V - Downtown"][0];
        assert_eq!(sector.npcs, vec!["1"]);
        assert_eq!(sector.vendors, vec!["1"]);
        assert_eq!(sector.mobs, vec!["10001", "10002", "10003"]);
        assert!(sector.mob_types.contains(&2));

        let peach = &contents["Peach Creek - Suburbs"][0];
        assert_eq!(peach.eggs, vec!["30001"]);
        assert_eq!(peach.mobs, vec!["10004"]);
        assert!(peach.npcs.is_empty());
    }

    #[test]
    fn test_warps_mark_infected_zone() {
        let areas = areas();
        let mut e = entities(&areas);
        e.transitions.insert(11, transition(11, Some(5), None));
        e.transitions.insert(12, transition(12, Some(77), None));
        e.special_zones.insert(8, special_zone(8, 40, &[11], &[]));

        let contents = area_contents(&e, &areas);
        let sector = &contents["Sector V - Downtown"][0];
        assert_eq!(sector.instance_warps.iter().copied().collect::<Vec<_>>(), vec![11]);
        assert_eq!(sector.infected_zone, Some(8));
    }
}
