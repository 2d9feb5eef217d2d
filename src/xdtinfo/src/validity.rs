//! Which entities a player can actually reach
//!
//! Placement data decides which templates are live. Everything else is valid
//! when the things it depends on are: a mission needs its NPCs, a warp needs
//! its NPC and its mission, a zone needs a valid warp into it, and an item
//! needs at least one valid source. Results are written to the `in_game` and
//! `obtainable` flags; nothing is removed.

use crate::entities::{Entities, MissionRecord, NpcRef};
use crate::ids::{ActorTypeId, EggTypeId, MissionId, WarpId};
use crate::raw::{Eggs, Mobs, Npcs};
use crate::reference::{TASK_ESCORT, TASK_TALK};
use crate::sources::{ResolvedSources, Source};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

/// Templates that appear in the placement data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveSet {
    pub npc_types: HashSet<ActorTypeId>,
    pub mob_types: HashSet<ActorTypeId>,
    pub egg_types: HashSet<EggTypeId>,
}

impl LiveSet {
    pub fn from_placements(npcs: &Npcs, mobs: &Mobs, eggs: &Eggs) -> Self {
        let mob_types = mobs
            .mobs
            .values()
            .chain(mobs.groups.values())
            .flat_map(|m| std::iter::once(m.npc_type).chain(m.followers.iter().map(|f| f.npc_type)))
            .collect();

        Self {
            npc_types: npcs.npcs.values().map(|n| n.npc_type).collect(),
            mob_types,
            egg_types: eggs.types.values().map(|t| t.id).collect(),
        }
    }

    /// Whether an NPC or mob template is placed anywhere
    pub fn actor_live(&self, id: ActorTypeId) -> bool {
        self.npc_types.contains(&id) || self.mob_types.contains(&id)
    }
}

/// In-game count against total for one kind of entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Count {
    pub in_game: usize,
    pub total: usize,
}

impl Count {
    fn of<'a>(flags: impl IntoIterator<Item = &'a bool>) -> Self {
        flags.into_iter().fold(Count::default(), |c, &f| Count {
            in_game: c.in_game + usize::from(f),
            total: c.total + 1,
        })
    }
}

/// Counts per entity kind, in a fixed order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValiditySummary(pub IndexMap<&'static str, Count>);

impl ValiditySummary {
    pub fn of(entities: &Entities) -> Self {
        let mut counts = IndexMap::new();
        counts.insert("items", Count::of(entities.items.values().map(|i| &i.obtainable)));
        counts.insert("npc_types", Count::of(entities.npc_types.values().map(|t| &t.common.in_game)));
        counts.insert("mob_types", Count::of(entities.mob_types.values().map(|t| &t.common.in_game)));
        counts.insert("egg_types", Count::of(entities.egg_types.values().map(|t| &t.in_game)));
        counts.insert("missions", Count::of(entities.missions.values().map(|m| &m.in_game)));
        counts.insert("transitions", Count::of(entities.transitions.values().map(|t| &t.in_game)));
        counts.insert("zones", Count::of(entities.zones.values().map(|z| &z.in_game)));
        counts.insert("special_zones", Count::of(entities.special_zones.values().map(|z| &z.in_game)));
        counts.insert("vendors", Count::of(entities.vendors.values().map(|v| &v.in_game)));
        counts.insert("transport", Count::of(entities.transport.values().map(|t| &t.in_game)));
        Self(counts)
    }
}

/// Validity decided for every dependent entity, before any flag is written
struct Verdicts {
    missions: HashSet<MissionId>,
    transitions: HashSet<WarpId>,
    zones: HashSet<i64>,
    special_zones: HashSet<i64>,
    vendors: HashSet<ActorTypeId>,
    transport: HashSet<ActorTypeId>,
}

fn mission_valid(mission: &MissionRecord, entities: &Entities, live: &LiveSet) -> bool {
    let actors = entities.actors();
    // Absent and unknown references do not block a mission
    let ok = |npc: Option<&NpcRef>| npc.map_or(true, |n| !actors.contains(n.id) || live.actor_live(n.id));

    let mut task_npcs = mission.tasks.values().filter_map(|t| match t.type_id {
        TASK_TALK => Some(t.waypoint_npc.as_ref()),
        TASK_ESCORT => Some(t.escort_npc.as_ref()),
        _ => None,
    });

    ok(mission.start_npc.as_ref()) && ok(mission.end_npc.as_ref()) && task_npcs.all(ok)
}

fn decide(entities: &Entities, live: &LiveSet) -> Verdicts {
    let missions: HashSet<MissionId> = entities
        .missions
        .values()
        .filter(|m| mission_valid(m, entities, live))
        .map(|m| m.id)
        .collect();

    let transitions: HashSet<WarpId> = entities
        .transitions
        .values()
        .filter(|t| t.npc_type_id.is_some_and(|npc| live.actor_live(npc)))
        .filter(|t| t.required_mission_id.map_or(true, |m| missions.contains(&m)))
        .map(|t| t.id)
        .collect();

    let entered = |entries: &[WarpId]| entries.iter().any(|w| transitions.contains(w));
    let zones = entities
        .zones
        .iter()
        .filter(|(_, z)| entered(&z.entry_transitions))
        .map(|(&id, _)| id)
        .collect();
    let special_zones = entities
        .special_zones
        .values()
        .filter(|z| entered(&z.entry_transitions))
        .map(|z| z.id)
        .collect();

    let vendors = entities
        .vendors
        .values()
        .filter(|v| live.npc_types.contains(&v.npc_type_id))
        .map(|v| v.npc_type_id)
        .collect();
    let transport = entities
        .transport
        .values()
        .filter(|t| live.actor_live(t.npc_type_id))
        .map(|t| t.npc_type_id)
        .collect();

    Verdicts {
        missions,
        transitions,
        zones,
        special_zones,
        vendors,
        transport,
    }
}

fn source_valid(source: &Source, verdicts: &Verdicts, live: &LiveSet) -> bool {
    match source {
        Source::Code(_) | Source::Event(_) => true,
        Source::Vendor(v) => verdicts.vendors.contains(&v.npc.npc_type_id),
        Source::Collectible(c) => live.egg_types.contains(&c.egg_type_id),
        Source::SpecialZone(z) => verdicts.special_zones.contains(&z.special_zone_id),
        Source::Kill(k) => live.mob_types.contains(&k.mob_type_id),
        // Also covers rewards reached through a crate
        Source::MissionReward(m) => verdicts.missions.contains(&m.mission_id),
    }
}

/// Write `in_game` and `obtainable` flags onto every record.
///
/// Flags are computed from the live set and sources only, so running the
/// pass again leaves them unchanged.
pub fn propagate(entities: &mut Entities, live: &LiveSet, sources: &ResolvedSources) -> ValiditySummary {
    let verdicts = decide(entities, live);

    for t in entities.npc_types.values_mut() {
        t.common.in_game = live.npc_types.contains(&t.common.id);
    }
    for t in entities.mob_types.values_mut() {
        t.common.in_game = live.mob_types.contains(&t.common.id);
    }
    for t in entities.egg_types.values_mut() {
        t.in_game = live.egg_types.contains(&t.id);
    }
    for m in entities.missions.values_mut() {
        m.in_game = verdicts.missions.contains(&m.id);
    }
    for t in entities.transitions.values_mut() {
        t.in_game = verdicts.transitions.contains(&t.id);
    }
    for (id, z) in entities.zones.iter_mut() {
        z.in_game = verdicts.zones.contains(id);
    }
    for z in entities.special_zones.values_mut() {
        z.in_game = verdicts.special_zones.contains(&z.id);
    }
    for v in entities.vendors.values_mut() {
        v.in_game = verdicts.vendors.contains(&v.npc_type_id);
    }
    for t in entities.transport.values_mut() {
        t.in_game = verdicts.transport.contains(&t.npc_type_id);
    }
    for (key, item) in entities.items.iter_mut() {
        item.obtainable = sources
            .sources_of(key)
            .iter()
            .any(|r| source_valid(&r.source, &verdicts, live));
    }

    let summary = ValiditySummary::of(entities);
    for (kind, count) in &summary.0 {
        info!(kind, in_game = count.in_game, total = count.total, "Validity");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drops::DropTables;
    use crate::entities::{actors, items, missions, ActorLookup};
    use crate::grouping::SpawnIndex;
    use crate::ids::ItemKey;
    use crate::raw::{MissionRow, RewardRow};
    use crate::sources;
    use crate::testutil::{actor, areas, eggs_json, mobs_json, npcs_json, special_zone, transition, XdtBuilder};

    fn task(mission: i64, task: i64) -> MissionRow {
        MissionRow {
            mission_id: mission,
            task_id: task,
            mission_type: 3,
            name: 1,
            task_type: 1,
            objective: 1,
            required_nanos: vec![0],
            required_missions: vec![0],
            barker_texts: vec![0, 0, 0, 0],
            ..MissionRow::default()
        }
    }

    /// Mission 10 is started by Buddy (1), ended by Ace (2) and rewards the
    /// Blaster; only Buddy is placed unless `place_ace`
    fn entities(place_ace: bool) -> Entities {
        let xdt = XdtBuilder::new()
            .npc(1, "Buddy", 1)
            .npc(2, "Ace", 1)
            .weapon(5, "Blaster", 2, 0, 4)
            .mission_string(1, "Save Buddy")
            .task(MissionRow {
                start_npc: 1,
                ..task(10, 100)
            })
            .task(MissionRow {
                end_npc: 2,
                reward: 1,
                ..task(10, 101)
            })
            .reward(
                1,
                RewardRow {
                    taros: 0,
                    fusion_matter: 0,
                    item_types: vec![0],
                    item_ids: vec![5],
                    choice: 0,
                },
            )
            .parse();

        let areas = areas();
        let items = items::build(&xdt);
        let (npc_types, mob_types) = actors::build_types(&xdt);
        let missions = missions::build(
            &xdt,
            ActorLookup {
                npcs: &npc_types,
                mobs: &mob_types,
            },
            &items,
        );
        let mut e = Entities {
            items,
            npc_types,
            mob_types,
            missions,
            ..Entities::default()
        };
        e.npcs.entry(1).or_default().insert("1".into(), actor("1", 1, (100, 100, 0), &areas));
        if place_ace {
            e.npcs.entry(2).or_default().insert("2".into(), actor("2", 2, (200, 200, 0), &areas));
        }
        e
    }

    fn live_set(e: &Entities) -> LiveSet {
        LiveSet {
            npc_types: e.npcs.keys().copied().collect(),
            ..LiveSet::default()
        }
    }

    fn run(e: &mut Entities) -> ValiditySummary {
        let drops = DropTables::default();
        let spawns = SpawnIndex::build(e);
        let resolved = sources::resolve(e, &spawns, &drops, &drops.reference_index());
        let live = live_set(e);
        propagate(e, &live, &resolved)
    }

    #[test]
    fn test_live_set_from_placements() {
        let npcs = Npcs::from_value(&npcs_json(&[(0, 4, 0, 0, 0)])).unwrap();
        let mobs = Mobs::from_value(&mobs_json(&[(0, 6, 0, 0, 0)], &[(0, 7, 0, 0, 0, &[(8, 10, 10)])])).unwrap();
        let eggs = Eggs::from_value(&eggs_json(&[(3, 0, 0)], &[])).unwrap();
        let live = LiveSet::from_placements(&npcs, &mobs, &eggs);

        assert_eq!(live.npc_types, HashSet::from([4]));
        assert_eq!(live.mob_types, HashSet::from([6, 7, 8]));
        assert_eq!(live.egg_types, HashSet::from([3]));
        assert!(live.actor_live(8));
        assert!(!live.actor_live(3));
    }

    #[test]
    fn test_unplaced_end_npc_excludes_reward() {
        let blaster = ItemKey::new(0, 5);

        let mut e = entities(false);
        run(&mut e);
        assert!(!e.missions[&10].in_game);
        assert!(!e.items[&blaster].obtainable);
        assert!(e.npc_types[&1].common.in_game);
        assert!(!e.npc_types[&2].common.in_game);

        let mut e = entities(true);
        run(&mut e);
        assert!(e.missions[&10].in_game);
        assert!(e.items[&blaster].obtainable);
    }

    #[test]
    fn test_warps_need_npc_and_mission() {
        let mut e = entities(false);
        e.transitions.insert(1, transition(1, Some(1), None));
        e.transitions.insert(2, transition(2, Some(1), Some(10)));
        e.transitions.insert(3, transition(3, Some(9), None));
        e.special_zones.insert(8, special_zone(8, 40, &[2, 3], &[]));
        run(&mut e);

        assert!(e.transitions[&1].in_game);
        assert!(!e.transitions[&2].in_game);
        assert!(!e.transitions[&3].in_game);
        assert!(!e.special_zones[&8].in_game);

        let mut e = entities(true);
        e.transitions.insert(2, transition(2, Some(1), Some(10)));
        e.special_zones.insert(8, special_zone(8, 40, &[2], &[]));
        run(&mut e);
        assert!(e.special_zones[&8].in_game);
    }

    #[test]
    fn test_escort_npc_must_be_placed() {
        let escort = |e: &mut Entities, id: i64| {
            let task = e.missions[&10].tasks.values_mut().next().unwrap();
            task.type_id = TASK_ESCORT;
            task.escort_npc = Some(NpcRef {
                id,
                name: String::new(),
                icon: String::new(),
            });
        };

        let mut e = entities(true);
        escort(&mut e, 2);
        e.missions[&10].end_npc = None;
        e.npcs.shift_remove(&2);
        run(&mut e);
        assert!(!e.missions[&10].in_game);

        // Unknown templates do not block
        let mut e = entities(true);
        escort(&mut e, 3);
        run(&mut e);
        assert!(e.missions[&10].in_game);
    }

    #[test]
    fn test_propagation_is_idempotent() {
        let mut e = entities(false);
        e.transitions.insert(1, transition(1, Some(1), None));
        let first = run(&mut e);
        let flags = |e: &Entities| {
            (
                e.items.values().map(|i| i.obtainable).collect::<Vec<_>>(),
                e.missions.values().map(|m| m.in_game).collect::<Vec<_>>(),
                e.transitions.values().map(|t| t.in_game).collect::<Vec<_>>(),
            )
        };
        let before = flags(&e);
        let second = run(&mut e);
        assert_eq!(first, second);
        assert_eq!(before, flags(&e));
        assert_eq!(second.0["missions"], Count { in_game: 0, total: 1 });
    }
}
