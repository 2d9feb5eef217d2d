//! NPC and mob templates and their placements
//!
//! Both come from the same NPC table; a template is a mob iff its category is
//! [`MOB_CATEGORY`]. Placements are keyed by disjoint string ids: NPC keys are
//! offset by [`NPC_ID_OFFSET`], mobs by [`MOB_ID_OFFSET`], group leaders by
//! [`MOB_GROUP_ID_OFFSET`], and followers are named after their leader.

use super::{placement_key, Placed};
use crate::area::AreaIndex;
use crate::ids::{tag, ActorTypeId, InstanceId, MissionId};
use crate::raw::{
    comment_at, icon_at, name_at, row, string_at, MobPlacement, Mobs, NpcRow, Npcs, Xdt,
};
use crate::reference::{
    error_icon, icon_path, label, npc_category, precise_delta, timer_seconds, ATTACK_POWER_BASE,
    MOB_CATEGORY, MOB_GROUP_ID_OFFSET, MOB_ID_OFFSET, NANO_TYPES, NPC_ICON_PREFIXES,
    NPC_ID_OFFSET,
};
use indexmap::IndexMap;
use serde::Serialize;

/// Fields shared by NPC and mob templates
#[derive(Debug, Clone, Serialize)]
pub struct ActorCommon {
    pub id: ActorTypeId,
    pub name: String,
    pub comment: String,
    pub icon: String,
    pub category_id: i64,
    pub category: &'static str,
    pub height: i64,
    pub scale: f64,
    pub in_game: bool,
}

/// A skill as referenced by a template or nano power
#[derive(Debug, Clone, Default, Serialize)]
pub struct SkillSummary {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<i64>,
    pub range: i64,
    pub angle: i64,
    pub area: i64,
    pub name: String,
    pub icon: String,
}

impl SkillSummary {
    /// Resolve skill `id` through the skill table
    pub fn resolve(xdt: &Xdt, id: i64, probability: Option<i64>) -> Self {
        let skills = &xdt.skill;
        let Some(skill) = row(&skills.rows, id, "m_pSkillData") else {
            return Self {
                id,
                probability,
                icon: error_icon(),
                ..Self::default()
            };
        };

        Self {
            id,
            probability,
            range: skill.range,
            angle: skill.angle,
            area: skill.area,
            name: name_at(&skills.strings, skill.name, "m_pSkillStringData"),
            icon: icon_at(&skills.icons, skill.icon, "m_pSkillIconData")
                .map(|n| icon_path("skillicon", n))
                .unwrap_or_else(error_icon),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MobTypeRecord {
    #[serde(flatten)]
    pub common: ActorCommon,
    pub level: i64,
    pub color_type_id: i64,
    pub color_type: &'static str,
    pub standard_hp: i64,
    pub respawn_seconds: f64,
    pub respawn_time: String,
    pub walk_speed: i64,
    pub run_speed: i64,
    pub sight_range: i64,
    pub idle_range: i64,
    pub combat_range: i64,
    pub attack_range: i64,
    pub radius: i64,
    pub power: i64,
    pub attack_power: i64,
    pub accuracy: i64,
    pub protection: i64,
    /// Raw timer units
    pub fire_initial_time: i64,
    pub fire_deliver_time: i64,
    pub fire_delay_time: i64,
    pub fire_duration_time: i64,
    pub eruption: SkillSummary,
    pub corruption: SkillSummary,
    pub active_skill: SkillSummary,
    pub support_skill: SkillSummary,
    pub passive_buff: SkillSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct NpcTypeRecord {
    #[serde(flatten)]
    pub common: ActorCommon,
    pub hnpc_type_id: i64,
    pub barker_number: i64,
    pub barkers: Vec<String>,
    pub barker_type: i64,
    /// `"{mission:04}::{name}"` to the line this NPC barks for it
    pub mission_barkers: IndexMap<String, String>,
    pub service_number: i64,
    pub service: String,
}

/// One placed NPC, mob, group leader or follower
#[derive(Debug, Clone, Serialize)]
pub struct ActorInstanceRecord {
    pub id: String,
    pub type_id: ActorTypeId,
    pub type_name: String,
    pub type_icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follows: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hp: Option<i64>,
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub angle: i64,
    pub instance_id: InstanceId,
    pub area: String,
}

/// Read-only view over both template maps
#[derive(Debug, Clone, Copy)]
pub struct ActorLookup<'a> {
    pub npcs: &'a IndexMap<ActorTypeId, NpcTypeRecord>,
    pub mobs: &'a IndexMap<ActorTypeId, MobTypeRecord>,
}

impl<'a> ActorLookup<'a> {
    pub fn get(&self, id: ActorTypeId) -> Option<&'a ActorCommon> {
        self.npcs
            .get(&id)
            .map(|n| &n.common)
            .or_else(|| self.mobs.get(&id).map(|m| &m.common))
    }

    pub fn contains(&self, id: ActorTypeId) -> bool {
        self.get(id).is_some()
    }

    /// Name of a template, empty when unknown
    pub fn name(&self, id: ActorTypeId) -> String {
        self.get(id).map(|c| c.name.clone()).unwrap_or_default()
    }
}

fn common(xdt: &Xdt, id: ActorTypeId, raw: &NpcRow) -> ActorCommon {
    let npc = &xdt.npc;
    let icon = row(&npc.icons, raw.icon, "m_pNpcIconData")
        .map(|icon| {
            let prefixes = NPC_ICON_PREFIXES.len() as i64;
            let prefix = label(NPC_ICON_PREFIXES, icon.icon_type.max(0) % prefixes, "icon type");
            icon_path(prefix, icon.number)
        })
        .unwrap_or_else(error_icon);

    ActorCommon {
        id,
        name: name_at(&npc.strings, raw.name, "m_pNpcStringData"),
        comment: comment_at(&npc.strings, raw.comment, "m_pNpcStringData"),
        icon,
        category_id: raw.category,
        category: npc_category(raw.category),
        height: raw.height,
        scale: raw.scale,
        in_game: false,
    }
}

/// Mission-specific barker lines for an NPC whose barker type is 1..=4
fn mission_barkers(xdt: &Xdt, barker_type: i64) -> IndexMap<String, String> {
    let mut barkers = IndexMap::new();
    let Some(slot) = usize::try_from(barker_type - 1).ok().filter(|s| *s < 4) else {
        return barkers;
    };

    let missions = &xdt.mission;
    for task in missions.rows.iter().skip(1) {
        let Some(&text) = task.barker_texts.get(slot) else {
            continue;
        };
        if text <= 0 {
            continue;
        }
        let name = string_at(&missions.strings, task.name, "m_pMissionStringData");
        barkers.insert(
            mission_tag(task.mission_id, &name),
            string_at(&missions.strings, text, "m_pMissionStringData"),
        );
    }
    barkers
}

fn mob_type(xdt: &Xdt, common: ActorCommon, raw: &NpcRow) -> MobTypeRecord {
    let respawn_seconds = timer_seconds(raw.regen_time);
    MobTypeRecord {
        common,
        level: raw.level,
        color_type_id: raw.style,
        color_type: label(NANO_TYPES, raw.style, "mob color type"),
        standard_hp: raw.hp,
        respawn_seconds,
        respawn_time: precise_delta(respawn_seconds),
        walk_speed: raw.walk_speed,
        run_speed: raw.run_speed,
        sight_range: raw.sight_range,
        idle_range: raw.idle_range,
        combat_range: raw.combat_range,
        attack_range: raw.attack_range,
        radius: raw.radius,
        power: raw.power,
        attack_power: ATTACK_POWER_BASE + raw.power,
        accuracy: raw.accuracy,
        protection: raw.protection,
        fire_initial_time: raw.initial_time,
        fire_deliver_time: raw.deliver_time,
        fire_delay_time: raw.delay_time,
        fire_duration_time: raw.duration_time,
        eruption: SkillSummary::resolve(xdt, raw.eruption, Some(raw.eruption_prob)),
        corruption: SkillSummary::resolve(xdt, raw.corruption, Some(raw.corruption_prob)),
        active_skill: SkillSummary::resolve(xdt, raw.active_skill, Some(raw.active_skill_prob)),
        support_skill: SkillSummary::resolve(xdt, raw.support_skill, None),
        passive_buff: SkillSummary::resolve(xdt, raw.passive_buff, None),
    }
}

fn npc_type(xdt: &Xdt, common: ActorCommon, raw: &NpcRow) -> NpcTypeRecord {
    let barkers = row(&xdt.npc.barkers, raw.barker_number, "m_pNpcBarkerData")
        .map(|b| {
            vec![
                b.name.clone(),
                b.comment.clone(),
                b.comment1.clone(),
                b.comment2.clone(),
            ]
        })
        .unwrap_or_default();

    NpcTypeRecord {
        common,
        hnpc_type_id: raw.hnpc,
        barker_number: raw.barker_number,
        barkers,
        barker_type: raw.barker_type,
        mission_barkers: mission_barkers(xdt, raw.barker_type),
        service_number: raw.service_number,
        service: row(&xdt.npc.services, raw.service_number, "m_pNpcServiceData")
            .map(|s| s.service.clone())
            .unwrap_or_default(),
    }
}

/// Split the NPC table into NPC and mob templates
pub fn build_types(
    xdt: &Xdt,
) -> (
    IndexMap<ActorTypeId, NpcTypeRecord>,
    IndexMap<ActorTypeId, MobTypeRecord>,
) {
    let mut npcs = IndexMap::new();
    let mut mobs = IndexMap::new();

    for (index, raw) in xdt.npc.rows.iter().enumerate().skip(1) {
        // Templates are addressed by row position
        let id = index as ActorTypeId;
        let common = common(xdt, id, raw);
        if raw.category == MOB_CATEGORY {
            mobs.insert(id, mob_type(xdt, common, raw));
        } else {
            npcs.insert(id, npc_type(xdt, common, raw));
        }
    }

    (npcs, mobs)
}

/// NPC placements grouped by template
pub fn build_npcs(
    npcs: &Npcs,
    types: &IndexMap<ActorTypeId, NpcTypeRecord>,
    areas: &AreaIndex,
) -> Placed<ActorInstanceRecord> {
    let mut placed: Placed<ActorInstanceRecord> = IndexMap::new();

    for (key, npc) in &npcs.npcs {
        let Some(template) = types.get(&npc.npc_type) else {
            continue;
        };
        let Some(id) = placement_key(key, NPC_ID_OFFSET, "NPCs") else {
            continue;
        };

        placed.entry(npc.npc_type).or_default().insert(
            id.clone(),
            ActorInstanceRecord {
                id,
                type_id: npc.npc_type,
                type_name: template.common.name.clone(),
                type_icon: template.common.icon.clone(),
                follows: None,
                hp: None,
                x: npc.x,
                y: npc.y,
                z: npc.z,
                angle: npc.angle,
                instance_id: npc.instance,
                area: areas.tag_at(npc.x, npc.y),
            },
        );
    }

    placed
}

fn place_mob(
    placed: &mut Placed<ActorInstanceRecord>,
    id: String,
    mob: &MobPlacement,
    types: &IndexMap<ActorTypeId, MobTypeRecord>,
    areas: &AreaIndex,
) {
    let Some(template) = types.get(&mob.npc_type) else {
        return;
    };
    let area = areas.tag_at(mob.x, mob.y);

    placed.entry(mob.npc_type).or_default().insert(
        id.clone(),
        ActorInstanceRecord {
            id: id.clone(),
            type_id: mob.npc_type,
            type_name: template.common.name.clone(),
            type_icon: template.common.icon.clone(),
            follows: None,
            hp: Some(mob.hp.unwrap_or(template.standard_hp)),
            x: mob.x,
            y: mob.y,
            z: mob.z,
            angle: mob.angle,
            instance_id: mob.instance,
            area: area.clone(),
        },
    );

    for (n, follower) in mob.followers.iter().enumerate() {
        let Some(follower_type) = types.get(&follower.npc_type) else {
            continue;
        };
        let follower_id = format!("{id}:follower_{}", n + 1);

        // Followers share their leader's instance, height, facing and area
        placed.entry(follower.npc_type).or_default().insert(
            follower_id.clone(),
            ActorInstanceRecord {
                id: follower_id,
                type_id: follower.npc_type,
                type_name: follower_type.common.name.clone(),
                type_icon: follower_type.common.icon.clone(),
                follows: Some(id.clone()),
                hp: Some(follower.hp.unwrap_or(follower_type.standard_hp)),
                x: mob.x + follower.offset_x,
                y: mob.y + follower.offset_y,
                z: mob.z,
                angle: mob.angle,
                instance_id: mob.instance,
                area: area.clone(),
            },
        );
    }
}

/// Mob, group leader and follower placements grouped by template
pub fn build_mobs(
    mobs: &Mobs,
    types: &IndexMap<ActorTypeId, MobTypeRecord>,
    areas: &AreaIndex,
) -> Placed<ActorInstanceRecord> {
    let mut placed = IndexMap::new();

    for (offset, file_section, table) in [
        (MOB_ID_OFFSET, "mobs.mobs", &mobs.mobs),
        (MOB_GROUP_ID_OFFSET, "mobs.groups", &mobs.groups),
    ] {
        for (key, mob) in table {
            if !types.contains_key(&mob.npc_type) {
                continue;
            }
            if let Some(id) = placement_key(key, offset, file_section) {
                place_mob(&mut placed, id, mob, types, areas);
            }
        }
    }

    placed
}

/// `"{mission:04}::{name}"`
pub fn mission_tag(id: MissionId, name: &str) -> String {
    tag(format!("{id:04}"), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{AreaRect, AreaRow};
    use crate::testutil::{mobs_json, npcs_json, XdtBuilder};

    fn xdt() -> Xdt {
        Xdt::from_value(
            &XdtBuilder::new()
                .npc(1, "Buddy", 1)
                .mob(2, "Spawn", 5, 300)
                .mob(3, "Minion", 2, 100)
                .build(),
        )
        .unwrap()
    }

    fn areas() -> AreaIndex {
        AreaIndex::from_rows(&[AreaRow {
            area_name: "Park".into(),
            zone_name: "Peach Creek".into(),
            rect: AreaRect {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 100.0,
            },
        }])
    }

    #[test]
    fn test_category_splits_npcs_and_mobs() {
        let (npcs, mobs) = build_types(&xdt());
        assert!(npcs.contains_key(&1));
        assert!(mobs.contains_key(&2));
        assert_eq!(mobs[&2].attack_power, ATTACK_POWER_BASE + mobs[&2].power);
        assert_eq!(npcs[&1].common.category, "Normal");
        assert_eq!(mobs[&2].common.category, "Monster");
    }

    #[test]
    fn test_npc_ids_offset() {
        let (npc_types, _) = build_types(&xdt());
        let npcs = Npcs::from_value(&npcs_json(&[(5, 1, 100, 100, 0)])).unwrap();
        let placed = build_npcs(&npcs, &npc_types, &areas());
        let buddy = &placed[&1]["6"];
        assert_eq!(buddy.type_name, "Buddy");
        assert_eq!(buddy.area, "Park - Peach Creek");
        assert_eq!(buddy.hp, None);
    }

    #[test]
    fn test_followers_inherit_leader() {
        let (_, mob_types) = build_types(&xdt());
        let mobs = Mobs::from_value(&mobs_json(
            &[(0, 2, 19000, 19000, 0)],
            &[(4, 2, 50, 60, 3, &[(3, 20, -10)])],
        ))
        .unwrap();
        let placed = build_mobs(&mobs, &mob_types, &areas());

        assert_eq!(placed[&2]["10000"].area, "Unknown - Unknown");
        assert_eq!(placed[&2]["10000"].hp, Some(300));

        let leader = &placed[&2]["20004"];
        assert_eq!(leader.instance_id, 3);

        let follower = &placed[&3]["20004:follower_1"];
        assert_eq!(follower.follows.as_deref(), Some("20004"));
        assert_eq!((follower.x, follower.y), (70, 50));
        assert_eq!(follower.instance_id, 3);
        assert_eq!(follower.area, leader.area);
        assert_eq!(follower.hp, Some(100));
    }

    #[test]
    fn test_lookup_spans_both_maps() {
        let (npcs, mobs) = build_types(&xdt());
        let lookup = ActorLookup {
            npcs: &npcs,
            mobs: &mobs,
        };
        assert_eq!(lookup.name(1), "Buddy");
        assert_eq!(lookup.name(3), "Minion");
        assert!(!lookup.contains(42));
    }
}
