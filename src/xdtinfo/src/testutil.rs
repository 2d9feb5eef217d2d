//! Fixture builders shared by unit tests
//!
//! [`XdtBuilder`] starts from a bundle where every positional table holds only
//! its placeholder row `0`, then adds rows through small helpers. Helpers that
//! address rows by id pad the table with default rows up to that id.

use crate::area::AreaIndex;
use crate::entities::{ActorInstanceRecord, EggRecord, SpecialZoneRecord, StarReward, TransitionRecord};
use crate::ids::{ItemKey, CRATE_SLOT};
use crate::raw::{
    AreaRow, CombatRow, IconRow, InstanceRow, ItemRow, ItemTable, LocationNameRow, LocationRow, MissionRow,
    NameStringRow, NanoRow, NpcRow, QuestItemRow, RewardRow, TextRow, TransportRow, TuneRow,
    VendorRow, WarpRow, Xdt,
};
use crate::reference::{GENERAL_SLOT, ITEM_TABLES};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Set `list[index]`, growing the list with defaults
fn put<T: Default>(list: &mut Vec<T>, index: i64, value: T) {
    let index = usize::try_from(index).expect("fixture index is non-negative");
    if list.len() <= index {
        list.resize_with(index + 1, T::default);
    }
    list[index] = value;
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).expect("fixture row serializes")
}

pub struct XdtBuilder {
    pub xdt: Xdt,
}

impl XdtBuilder {
    pub fn new() -> Self {
        let mut xdt = Xdt::default();

        for (slot, table) in ITEM_TABLES.iter().enumerate() {
            if table.is_empty() {
                continue;
            }
            let slot = u8::try_from(slot).expect("slot fits");
            let has_combat = slot != GENERAL_SLOT && slot != CRATE_SLOT;
            xdt.items.push(ItemTable {
                slot,
                rows: vec![ItemRow::default()],
                combat: has_combat.then(|| vec![CombatRow::default()]),
                strings: vec![TextRow::default()],
                icons: vec![IconRow::default()],
            });
        }

        let npc = &mut xdt.npc;
        npc.rows.push(NpcRow::default());
        npc.strings.push(TextRow::default());
        npc.icons.push(IconRow::default());
        npc.barkers.push(TextRow::default());
        npc.services.push(Default::default());

        let skill = &mut xdt.skill;
        skill.rows.push(Default::default());
        skill.strings.push(TextRow::default());
        skill.icons.push(IconRow::default());

        let mission = &mut xdt.mission;
        mission.rows.push(MissionRow::default());
        mission.strings.push(NameStringRow::default());
        mission.journals.push(Default::default());
        mission.rewards.push(RewardRow::default());

        xdt.quest_item.rows.push(QuestItemRow::default());
        xdt.quest_item.strings.push(TextRow::default());

        let instance = &mut xdt.instance;
        instance.rows.push(InstanceRow::default());
        instance.warps.push(WarpRow::default());
        instance.names.push(NameStringRow::default());

        let nano = &mut xdt.nano;
        nano.rows.push(NanoRow::default());
        nano.strings.push(TextRow::default());
        nano.icons.push(IconRow::default());
        nano.tunes.push(TuneRow::default());
        nano.tune_strings.push(TextRow::default());
        nano.tune_icons.push(IconRow::default());

        xdt.vendor.push(VendorRow::default());
        xdt.shiny_strings.push(TextRow::default());

        let transport = &mut xdt.transport;
        transport.rows.push(TransportRow::default());
        transport.warp_locations.push(LocationRow::default());
        transport.warp_names.push(LocationNameRow::default());
        transport.broomstick_locations.push(LocationRow::default());
        transport.broomstick_names.push(LocationNameRow::default());
        transport.icons.push(IconRow::default());

        xdt.combining.push(Default::default());

        Self { xdt }
    }

    /// The bundle as `xdt.json` would hold it
    pub fn build(&self) -> Value {
        let xdt = &self.xdt;
        let mut root = Map::new();

        for table in &xdt.items {
            let data: Vec<Value> = table
                .rows
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    let mut merged = to_value(row);
                    let stats = table.combat.as_ref().and_then(|c| c.get(i));
                    if let (Some(obj), Some(stats)) = (merged.as_object_mut(), stats) {
                        if let Value::Object(extra) = to_value(stats) {
                            obj.extend(extra);
                        }
                    }
                    merged
                })
                .collect();
            root.insert(
                ITEM_TABLES[usize::from(table.slot)].to_string(),
                json!({
                    "m_pItemData": data,
                    "m_pItemStringData": table.strings,
                    "m_pItemIconData": table.icons,
                }),
            );
        }

        let tables = json!({
            "m_pNpcTable": {
                "m_pNpcData": xdt.npc.rows,
                "m_pNpcStringData": xdt.npc.strings,
                "m_pNpcIconData": xdt.npc.icons,
                "m_pNpcBarkerData": xdt.npc.barkers,
                "m_pNpcServiceData": xdt.npc.services,
            },
            "m_pSkillTable": {
                "m_pSkillData": xdt.skill.rows,
                "m_pSkillStringData": xdt.skill.strings,
                "m_pSkillIconData": xdt.skill.icons,
            },
            "m_pMissionTable": {
                "m_pMissionData": xdt.mission.rows,
                "m_pMissionStringData": xdt.mission.strings,
                "m_pJournalData": xdt.mission.journals,
                "m_pRewardData": xdt.mission.rewards,
            },
            "m_pQuestItemTable": {
                "m_pItemData": xdt.quest_item.rows,
                "m_pItemStringData": xdt.quest_item.strings,
            },
            "m_pInstanceTable": {
                "m_pInstanceData": xdt.instance.rows,
                "m_pWarpData": xdt.instance.warps,
                "m_pWarpNameData": xdt.instance.names,
            },
            "m_pNanoTable": {
                "m_pNanoData": xdt.nano.rows,
                "m_pNanoStringData": xdt.nano.strings,
                "m_pNanoIconData": xdt.nano.icons,
                "m_pNanoTuneData": xdt.nano.tunes,
                "m_pNanoTuneStringData": xdt.nano.tune_strings,
                "m_pNanoTuneIconData": xdt.nano.tune_icons,
            },
            "m_pVendorTable": {"m_pItemData": xdt.vendor},
            "m_pShinyTable": {"m_pShinyStringData": xdt.shiny_strings},
            "m_pTransportationTable": {
                "m_pTransportationData": xdt.transport.rows,
                "m_pTransportationWarpLocation": xdt.transport.warp_locations,
                "m_pTransportationWarpString": xdt.transport.warp_names,
                "m_pBroomstickLocation": xdt.transport.broomstick_locations,
                "m_pBroomstickString": xdt.transport.broomstick_names,
                "m_pTransIcon": xdt.transport.icons,
            },
            "m_pCombiningTable": {"m_pCombiningData": xdt.combining},
        });
        if let Value::Object(tables) = tables {
            root.extend(tables);
        }

        Value::Object(root)
    }

    /// Round-trip through JSON so fixtures exercise the real parser
    pub fn parse(&self) -> Xdt {
        Xdt::from_value(&self.build()).expect("fixture bundle parses")
    }

    fn item_table_mut(&mut self, slot: u8) -> &mut ItemTable {
        self.xdt
            .items
            .iter_mut()
            .find(|t| t.slot == slot)
            .expect("slot has an item table")
    }

    /// An item whose icon number equals its id
    pub fn item(mut self, slot: u8, id: i64, name: &str, rarity: i64) -> Self {
        let table = self.item_table_mut(slot);
        table.strings.push(TextRow {
            name: name.to_string(),
            ..TextRow::default()
        });
        table.icons.push(IconRow {
            icon_type: 0,
            number: id,
        });
        table.rows.push(ItemRow {
            id,
            icon: table.icons.len() as i64 - 1,
            name: table.strings.len() as i64 - 1,
            tradeable: 1,
            sellable: 1,
            max_stack: 1,
            ..ItemRow::default()
        });
        if let Some(combat) = table.combat.as_mut() {
            combat.push(CombatRow {
                rarity,
                ..CombatRow::default()
            });
        }
        self
    }

    pub fn weapon(self, id: i64, name: &str, weapon_type: i64, gender: i64, delay: i64) -> Self {
        let mut builder = self.item(0, id, name, 1);
        let table = builder.item_table_mut(0);
        if let Some(row) = table.rows.last_mut() {
            row.weapon_type = weapon_type;
        }
        if let Some(stats) = table.combat.as_mut().and_then(|c| c.last_mut()) {
            stats.gender = gender;
            stats.delay_time = delay;
        }
        builder
    }

    pub fn item_rows_mut(&mut self, slot: u8) -> &mut Vec<ItemRow> {
        &mut self.item_table_mut(slot).rows
    }

    /// Combat row of the last item added to `slot`
    pub fn last_combat_mut(&mut self, slot: u8) -> &mut CombatRow {
        self.item_table_mut(slot)
            .combat
            .as_mut()
            .and_then(|c| c.last_mut())
            .expect("slot has combat rows")
    }

    fn actor(mut self, row: NpcRow, name: &str, icon_type: i64) -> Self {
        let npc = &mut self.xdt.npc;
        npc.strings.push(TextRow {
            name: name.to_string(),
            ..TextRow::default()
        });
        npc.icons.push(IconRow {
            icon_type,
            number: row.id,
        });

        let id = row.id;
        while (npc.rows.len() as i64) < id {
            npc.rows.push(NpcRow {
                category: 1,
                ..NpcRow::default()
            });
        }
        let row = NpcRow {
            name: npc.strings.len() as i64 - 1,
            icon: npc.icons.len() as i64 - 1,
            scale: 1.0,
            ..row
        };
        put(&mut npc.rows, id, row);
        self
    }

    /// A non-hostile template at row `id`
    pub fn npc(self, id: i64, name: &str, category: i64) -> Self {
        self.actor(
            NpcRow {
                id,
                category,
                ..NpcRow::default()
            },
            name,
            4,
        )
    }

    /// A hostile template at row `id`
    pub fn mob(self, id: i64, name: &str, level: i64, hp: i64) -> Self {
        self.actor(
            NpcRow {
                id,
                category: 0,
                level,
                hp,
                ..NpcRow::default()
            },
            name,
            8,
        )
    }

    pub fn npc_rows_mut(&mut self) -> &mut Vec<NpcRow> {
        &mut self.xdt.npc.rows
    }

    /// Egg text at row `id`
    pub fn shiny(mut self, id: i64, name: &str, comment: &str) -> Self {
        put(
            &mut self.xdt.shiny_strings,
            id,
            TextRow {
                name: name.to_string(),
                comment: comment.to_string(),
                ..TextRow::default()
            },
        );
        self
    }

    pub fn mission_string(mut self, index: i64, text: &str) -> Self {
        put(
            &mut self.xdt.mission.strings,
            index,
            NameStringRow {
                text: text.to_string(),
            },
        );
        self
    }

    pub fn task(mut self, row: MissionRow) -> Self {
        self.xdt.mission.rows.push(row);
        self
    }

    pub fn reward(mut self, index: i64, row: RewardRow) -> Self {
        put(&mut self.xdt.mission.rewards, index, row);
        self
    }

    pub fn quest_item(mut self, id: i64, name: &str) -> Self {
        let quest = &mut self.xdt.quest_item;
        quest.strings.push(TextRow {
            name: name.to_string(),
            ..TextRow::default()
        });
        let name = quest.strings.len() as i64 - 1;
        put(&mut quest.rows, id, QuestItemRow { name });
        self
    }

    pub fn instance_name(mut self, id: i64, text: &str) -> Self {
        put(
            &mut self.xdt.instance.names,
            id,
            NameStringRow {
                text: text.to_string(),
            },
        );
        self
    }

    pub fn instance(mut self, row: InstanceRow) -> Self {
        self.xdt.instance.rows.push(row);
        self
    }

    pub fn warp(mut self, row: WarpRow) -> Self {
        self.xdt.instance.warps.push(row);
        self
    }

    /// A nano at row `id` whose icon number equals its id
    pub fn nano(mut self, id: i64, name: &str, comment1: &str, style: i64, powers: &[i64]) -> Self {
        let nano = &mut self.xdt.nano;
        nano.strings.push(TextRow {
            name: name.to_string(),
            comment1: comment1.to_string(),
            ..TextRow::default()
        });
        nano.icons.push(IconRow {
            icon_type: 0,
            number: id,
        });
        let row = NanoRow {
            id,
            name: nano.strings.len() as i64 - 1,
            style,
            powers: powers.to_vec(),
            icon: nano.icons.len() as i64 - 1,
        };
        put(&mut nano.rows, id, row);
        self
    }

    pub fn tune(mut self, row: TuneRow) -> Self {
        self.xdt.nano.tunes.push(row);
        self
    }

    pub fn vendor(mut self, row: VendorRow) -> Self {
        self.xdt.vendor.push(row);
        self
    }

    fn location(
        locations: &mut Vec<LocationRow>,
        names: &mut Vec<LocationNameRow>,
        icons: &mut Vec<IconRow>,
        id: i64,
        name: &str,
        (x, y, z): (i64, i64, i64),
    ) {
        icons.push(IconRow {
            icon_type: 0,
            number: id,
        });
        let icon = icons.len() as i64 - 1;
        put(locations, id, LocationRow { x, y, z, icon });
        put(
            names,
            id,
            LocationNameRow {
                name: name.to_string(),
            },
        );
    }

    /// SCAMPER stop at row `id`; its icon number equals its id
    pub fn warp_location(mut self, id: i64, name: &str, at: (i64, i64, i64)) -> Self {
        let t = &mut self.xdt.transport;
        Self::location(&mut t.warp_locations, &mut t.warp_names, &mut t.icons, id, name, at);
        self
    }

    /// Skyway or slider stop at row `id`; its icon number equals its id
    pub fn broomstick_location(mut self, id: i64, name: &str, at: (i64, i64, i64)) -> Self {
        let t = &mut self.xdt.transport;
        Self::location(
            &mut t.broomstick_locations,
            &mut t.broomstick_names,
            &mut t.icons,
            id,
            name,
            at,
        );
        self
    }

    pub fn transport(mut self, row: TransportRow) -> Self {
        self.xdt.transport.rows.push(row);
        self
    }
}

/// `NPCs.json` from `(key, type, x, y, instance)`
pub fn npcs_json(npcs: &[(i64, i64, i64, i64, i64)]) -> Value {
    let placements: Map<String, Value> = npcs
        .iter()
        .map(|&(key, npc_type, x, y, instance)| {
            (
                key.to_string(),
                json!({"iNPCType": npc_type, "iX": x, "iY": y, "iZ": 0, "iAngle": 0, "iMapNum": instance}),
            )
        })
        .collect();
    json!({ "NPCs": placements })
}

/// `mobs.json` from single mobs `(key, type, x, y, instance)` and groups
/// with `(type, offset x, offset y)` followers
pub fn mobs_json(
    mobs: &[(i64, i64, i64, i64, i64)],
    groups: &[(i64, i64, i64, i64, i64, &[(i64, i64, i64)])],
) -> Value {
    let singles: Map<String, Value> = mobs
        .iter()
        .map(|&(key, npc_type, x, y, instance)| {
            (
                key.to_string(),
                json!({"iNPCType": npc_type, "iX": x, "iY": y, "iZ": 0, "iMapNum": instance}),
            )
        })
        .collect();
    let leaders: Map<String, Value> = groups
        .iter()
        .map(|&(key, npc_type, x, y, instance, followers)| {
            let followers: Vec<Value> = followers
                .iter()
                .map(|&(f_type, dx, dy)| json!({"iNPCType": f_type, "iOffsetX": dx, "iOffsetY": dy}))
                .collect();
            (
                key.to_string(),
                json!({
                    "iNPCType": npc_type, "iX": x, "iY": y, "iZ": 0, "iMapNum": instance,
                    "aFollowers": followers
                }),
            )
        })
        .collect();
    json!({ "mobs": singles, "groups": leaders })
}

/// `eggs.json` from types `(id, effect, crate)` and eggs
/// `(key, type, x, y, instance)`; every type lasts 30s and respawns after 60s
pub fn eggs_json(types: &[(i64, i64, i64)], eggs: &[(i64, i64, i64, i64, i64)]) -> Value {
    let egg_types: Map<String, Value> = types
        .iter()
        .enumerate()
        .map(|(i, &(id, effect, crate_id))| {
            (
                i.to_string(),
                json!({"Id": id, "EffectId": effect, "DropCrateId": crate_id, "Duration": 30, "Regen": 60}),
            )
        })
        .collect();
    let placed: Map<String, Value> = eggs
        .iter()
        .map(|&(key, egg_type, x, y, instance)| {
            (
                key.to_string(),
                json!({"iType": egg_type, "iX": x, "iY": y, "iZ": 0, "iMapNum": instance}),
            )
        })
        .collect();
    json!({ "EggTypes": egg_types, "Eggs": placed })
}

// ============================================================================
// Entity records for tests that start after the constructors
// ============================================================================

/// Sector V over world x 0..=10000 and Peach Creek over x 20000..=30000,
/// both spanning y 0..=10000
pub fn areas() -> AreaIndex {
    let rows: Vec<AreaRow> = serde_json::from_value(json!([
        {"DongName": "Sector V", "ZoneName": "Downtown",
         "Area": {"x": 0.0, "y": 0.0, "width": 100.0, "height": 100.0}},
        {"DongName": "Peach Creek", "ZoneName": "Suburbs",
         "Area": {"x": 200.0, "y": 0.0, "width": 100.0, "height": 100.0}}
    ]))
    .expect("area fixture parses");
    AreaIndex::from_rows(&rows)
}

/// A placed NPC or mob at `(x, y, instance)`
pub fn actor(id: &str, type_id: i64, (x, y, instance_id): (i64, i64, i64), areas: &AreaIndex) -> ActorInstanceRecord {
    ActorInstanceRecord {
        id: id.to_string(),
        type_id,
        type_name: format!("Actor {type_id}"),
        type_icon: String::new(),
        follows: None,
        hp: None,
        x,
        y,
        z: 0,
        angle: 0,
        instance_id,
        area: areas.tag_at(x, y),
    }
}

/// A placed egg at `(x, y, instance)`
pub fn egg(id: &str, type_id: i64, (x, y, instance_id): (i64, i64, i64), areas: &AreaIndex) -> EggRecord {
    EggRecord {
        id: id.to_string(),
        type_id,
        type_name: format!("Egg {type_id}"),
        x,
        y,
        z: 0,
        instance_id,
        area: areas.tag_at(x, y),
    }
}

pub fn transition(id: i64, npc_type_id: Option<i64>, required_mission_id: Option<i64>) -> TransitionRecord {
    TransitionRecord {
        id,
        destination_id: 40,
        destination: "Lair".to_string(),
        price: 0,
        x: 0,
        y: 0,
        z: 0,
        area: String::new(),
        npc_type_id,
        required_task_id: None,
        required_task_objective: String::new(),
        required_mission_id,
        required_mission: String::new(),
        required_level: 0,
        required_item: None,
        in_game: false,
    }
}

/// An infected zone with star rewards `(stars, crate, rank score)`
pub fn special_zone(
    id: i64,
    instance_id: i64,
    entry_transitions: &[i64],
    rewards: &[(i64, i64, i64)],
) -> SpecialZoneRecord {
    SpecialZoneRecord {
        id,
        instance_id,
        name: format!("Zone {id}"),
        zone_x: 0,
        zone_y: 0,
        area: String::new(),
        original_score_cap: 0,
        score_cap: 0,
        time_limit_seconds: 0,
        time_limit: String::new(),
        total_pods: 0,
        scale_factor: 0.0,
        pod_factor: 0.0,
        time_factor: 0.0,
        score_function: String::new(),
        fm_reward_function: String::new(),
        star_rewards: rewards
            .iter()
            .map(|&(stars, crate_id, rank_score)| {
                (
                    stars,
                    StarReward {
                        crate_id,
                        item: ItemKey::of_crate(crate_id),
                        rank_score,
                    },
                )
            })
            .collect(),
        entry_transitions: entry_transitions.to_vec(),
        in_game: false,
    }
}
