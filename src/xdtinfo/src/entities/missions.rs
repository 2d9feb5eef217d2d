//! Missions and their tasks
//!
//! The mission table has one row per task; mission-level fields repeat on
//! every row and are read from the mission's first task (lowest task id).
//! Start and end NPCs come from the last task naming one, rewards from the
//! last task granting one. Task-level fields, including the three message
//! blocks, are read from the task's own row.

use super::actors::ActorLookup;
use super::items::ItemRecord;
use crate::ids::{present, tag, ActorTypeId, InstanceId, ItemKey, MissionId};
use crate::raw::{name_at, row, string_at, MissionRow, Xdt};
use crate::reference::{
    label, message_type, precise_delta, DIFFICULTIES, GUIDES, MISSION_TYPES, TASK_TYPES,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

const STRINGS: &str = "m_pMissionStringData";

/// An NPC template referenced by a mission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NpcRef {
    pub id: ActorTypeId,
    pub name: String,
    pub icon: String,
}

impl NpcRef {
    /// `None` for a sentinel id. Unknown templates keep their id with empty
    /// name and icon.
    pub fn resolve(actors: ActorLookup<'_>, id: i64) -> Option<Self> {
        let id = present(id)?;
        Some(match actors.get(id) {
            Some(common) => Self {
                id,
                name: common.name.clone(),
                icon: common.icon.clone(),
            },
            None => {
                warn!(npc = id, "Mission references unknown NPC template");
                Self {
                    id,
                    name: String::new(),
                    icon: String::new(),
                }
            }
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct JournalText {
    pub mission_summary: String,
    pub mission_description: String,
    pub complete_summary: String,
    pub complete_description: String,
    pub task_description: String,
}

/// What the player is told when a task starts, ends or fails
#[derive(Debug, Clone, Serialize)]
pub struct MessageBlock {
    pub type_id: i64,
    pub message_type: &'static str,
    pub text: String,
    pub send_npc: Option<NpcRef>,
    pub dialog_bubble: String,
    pub dialog_bubble_npc: Option<NpcRef>,
    pub journal: JournalText,
}

#[derive(Debug, Clone, Serialize)]
pub struct KillRequirement {
    pub kill_count: i64,
    pub quest_item_id: i64,
    pub quest_item: String,
    pub quest_item_needed: i64,
    pub quest_item_drop_percent: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub id: i64,
    pub type_id: i64,
    pub task_type: &'static str,
    pub objective_id: i64,
    pub objective: String,
    pub required_instance_id: Option<InstanceId>,
    pub required_instance: String,
    pub time_limit_seconds: i64,
    pub time_limit: String,
    pub escort_npc: Option<NpcRef>,
    pub waypoint_npc: Option<NpcRef>,
    pub on_start: MessageBlock,
    pub on_end: MessageBlock,
    pub on_fail: MessageBlock,
    pub on_end_next_task_id: Option<i64>,
    pub on_end_next_objective: String,
    pub on_fail_next_task_id: Option<i64>,
    pub on_fail_next_objective: String,
    /// `"{mob:04}::{name}"` to what must be killed and collected
    pub kill_requirements: IndexMap<String, KillRequirement>,
    /// `"{quest item:04}::{name}"` to count change
    pub quest_items_on_start: IndexMap<String, i64>,
    pub quest_items_on_end: IndexMap<String, i64>,
    pub quest_items_on_fail: IndexMap<String, i64>,
    pub quest_items_deleted: Vec<String>,
    /// Guide name to e-mail text
    pub guide_emails: IndexMap<&'static str, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MissionRewards {
    pub items: Vec<ItemKey>,
    pub item_selection_needed: bool,
    pub fusion_matter: i64,
    pub taros: i64,
    pub nano_reward_id: Option<i64>,
    pub nano_reward: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionRecord {
    pub id: MissionId,
    pub type_id: i64,
    pub mission_type: &'static str,
    pub name: String,
    pub difficulty_id: i64,
    pub difficulty: &'static str,
    pub start_npc: Option<NpcRef>,
    pub end_npc: Option<NpcRef>,
    pub journal_npc: Option<NpcRef>,
    pub level: i64,
    pub required_nano_id: Option<i64>,
    pub required_nano: String,
    pub required_guide_id: i64,
    pub required_guide: &'static str,
    /// Prerequisite mission id to its name
    pub required_missions: IndexMap<MissionId, String>,
    /// `"{npc:04}::{name}"` to the line the NPC barks during this mission
    pub barkers: IndexMap<String, String>,
    pub tasks: IndexMap<i64, TaskRecord>,
    pub rewards: MissionRewards,
    pub in_game: bool,
}

impl MissionRecord {
    pub fn start_npc_id(&self) -> Option<ActorTypeId> {
        self.start_npc.as_ref().map(|n| n.id)
    }

    pub fn end_npc_id(&self) -> Option<ActorTypeId> {
        self.end_npc.as_ref().map(|n| n.id)
    }
}

/// Task rows by task id. Unknown ids read the placeholder row.
pub(crate) struct TaskLookup<'a> {
    by_id: HashMap<i64, &'a MissionRow>,
    placeholder: Option<&'a MissionRow>,
}

impl<'a> TaskLookup<'a> {
    pub(crate) fn new(rows: &'a [MissionRow]) -> Self {
        Self {
            by_id: rows.iter().map(|r| (r.task_id, r)).collect(),
            placeholder: rows.first(),
        }
    }

    pub(crate) fn get(&self, task_id: i64) -> Option<&'a MissionRow> {
        self.by_id.get(&task_id).copied().or(self.placeholder)
    }
}

/// Mission name with line breaks flattened
pub(crate) fn mission_name(xdt: &Xdt, string_id: i64) -> String {
    string_at(&xdt.mission.strings, string_id, STRINGS).replace('\n', " ")
}

/// Raw ids of one message block
struct RawMessage {
    type_id: i64,
    text: i64,
    send_npc: i64,
    bubble: i64,
    bubble_npc: i64,
    journal: i64,
}

impl RawMessage {
    fn on_start(r: &MissionRow) -> Self {
        Self {
            type_id: r.start_message_type,
            text: r.start_message_text,
            send_npc: r.start_send_npc,
            bubble: r.start_dialog_bubble,
            bubble_npc: r.start_dialog_bubble_npc,
            journal: r.start_journal,
        }
    }

    fn on_end(r: &MissionRow) -> Self {
        Self {
            type_id: r.end_message_type,
            text: r.end_message_text,
            send_npc: r.end_send_npc,
            bubble: r.end_dialog_bubble,
            bubble_npc: r.end_dialog_bubble_npc,
            journal: r.end_journal,
        }
    }

    fn on_fail(r: &MissionRow) -> Self {
        Self {
            type_id: r.fail_message_type,
            text: r.fail_message_text,
            send_npc: r.fail_send_npc,
            bubble: r.fail_dialog_bubble,
            bubble_npc: r.fail_dialog_bubble_npc,
            journal: r.fail_journal,
        }
    }
}

fn at(list: &[i64], i: usize) -> i64 {
    list.get(i).copied().unwrap_or(0)
}

struct MissionBuilder<'a> {
    xdt: &'a Xdt,
    actors: ActorLookup<'a>,
    items: &'a IndexMap<ItemKey, ItemRecord>,
    tasks: TaskLookup<'a>,
    grouped: IndexMap<MissionId, Vec<&'a MissionRow>>,
    /// `(npc tag, barker slot)` of every NPC with mission barkers
    barker_slots: Vec<(String, usize)>,
}

impl<'a> MissionBuilder<'a> {
    fn new(
        xdt: &'a Xdt,
        actors: ActorLookup<'a>,
        items: &'a IndexMap<ItemKey, ItemRecord>,
    ) -> Self {
        let mut sorted: Vec<&MissionRow> = xdt.mission.rows.iter().skip(1).collect();
        sorted.sort_by_key(|r| (r.mission_id, r.task_id));

        let mut grouped: IndexMap<MissionId, Vec<&MissionRow>> = IndexMap::new();
        for task in sorted {
            grouped.entry(task.mission_id).or_default().push(task);
        }

        let npc = &xdt.npc;
        let barker_slots = npc
            .rows
            .iter()
            .filter(|raw| raw.name > 0 && (1..=4).contains(&raw.barker_type))
            .filter_map(|raw| {
                let slot = usize::try_from(raw.barker_type - 1).ok()?;
                let name = name_at(&npc.strings, raw.name, "m_pNpcStringData");
                Some((tag(format!("{:04}", raw.id), &name), slot))
            })
            .collect();

        Self {
            xdt,
            actors,
            items,
            tasks: TaskLookup::new(&xdt.mission.rows),
            grouped,
            barker_slots,
        }
    }

    fn text(&self, id: i64) -> String {
        string_at(&self.xdt.mission.strings, id, STRINGS)
    }

    /// Journal row `id`, or the placeholder row when out of range
    fn journal(&self, id: i64) -> JournalText {
        let journals = &self.xdt.mission.journals;
        let Some(j) = usize::try_from(id)
            .ok()
            .and_then(|i| journals.get(i))
            .or(journals.first())
        else {
            return JournalText::default();
        };

        JournalText {
            mission_summary: self.text(j.mission_summary),
            mission_description: self.text(j.mission_description),
            complete_summary: self.text(j.complete_summary),
            complete_description: self.text(j.complete_description),
            task_description: self.text(j.task_description),
        }
    }

    fn message(&self, raw: RawMessage) -> MessageBlock {
        MessageBlock {
            type_id: raw.type_id,
            message_type: message_type(raw.type_id),
            text: self.text(raw.text),
            send_npc: NpcRef::resolve(self.actors, raw.send_npc),
            dialog_bubble: self.text(raw.bubble),
            dialog_bubble_npc: NpcRef::resolve(self.actors, raw.bubble_npc),
            journal: self.journal(raw.journal),
        }
    }

    /// Objective text of the task a transition leads to
    fn next_objective(&self, task_id: i64) -> String {
        self.tasks
            .get(task_id)
            .map(|t| self.text(t.objective))
            .unwrap_or_default()
    }

    /// Name of a quest item; empty for sentinels and unknown ids
    fn quest_item_name(&self, id: i64) -> Option<String> {
        let quest = &self.xdt.quest_item;
        let item = usize::try_from(id)
            .ok()
            .filter(|&i| i > 0)
            .and_then(|i| quest.rows.get(i))?;
        Some(name_at(&quest.strings, item.name, "m_pQuestItemStringData"))
    }

    fn quest_item_tag(&self, id: i64) -> Option<String> {
        self.quest_item_name(id)
            .map(|name| tag(format!("{id:04}"), &name))
    }

    fn quest_item_changes(&self, ids: &[i64], counts: &[i64]) -> IndexMap<String, i64> {
        ids.iter()
            .enumerate()
            .filter_map(|(i, &id)| Some((self.quest_item_tag(id)?, at(counts, i))))
            .collect()
    }

    fn kill_requirements(&self, task: &MissionRow) -> IndexMap<String, KillRequirement> {
        let mut kills = IndexMap::new();
        for (i, &mob) in task.kill_targets.iter().enumerate() {
            if mob <= 0 {
                continue;
            }
            let item_id = at(&task.kill_items, i);
            kills.insert(
                tag(format!("{mob:04}"), &self.actors.name(mob)),
                KillRequirement {
                    kill_count: at(&task.kill_counts, i),
                    quest_item_id: item_id,
                    quest_item: self.quest_item_name(item_id).unwrap_or_default(),
                    quest_item_needed: at(&task.kill_item_counts, i),
                    quest_item_drop_percent: at(&task.kill_item_drop_rates, i),
                },
            );
        }
        kills
    }

    fn task(&self, task: &MissionRow) -> TaskRecord {
        let required_instance_id = present(task.required_instance);
        TaskRecord {
            id: task.task_id,
            type_id: task.task_type,
            task_type: label(TASK_TYPES, task.task_type, "task type"),
            objective_id: task.objective,
            objective: self.text(task.objective),
            required_instance_id,
            required_instance: required_instance_id
                .map(|id| string_at(&self.xdt.instance.names, id, "m_pWarpNameData"))
                .unwrap_or_default(),
            time_limit_seconds: task.time_limit,
            time_limit: precise_delta(task.time_limit as f64),
            escort_npc: NpcRef::resolve(self.actors, task.escort_npc),
            waypoint_npc: NpcRef::resolve(self.actors, task.waypoint_npc),
            on_start: self.message(RawMessage::on_start(task)),
            on_end: self.message(RawMessage::on_end(task)),
            on_fail: self.message(RawMessage::on_fail(task)),
            on_end_next_task_id: present(task.end_next_task),
            on_end_next_objective: self.next_objective(task.end_next_task),
            on_fail_next_task_id: present(task.fail_next_task),
            on_fail_next_objective: self.next_objective(task.fail_next_task),
            kill_requirements: self.kill_requirements(task),
            quest_items_on_start: self.quest_item_changes(&task.start_items, &task.start_item_counts),
            quest_items_on_end: self.quest_item_changes(&task.end_items, &task.end_item_counts),
            quest_items_on_fail: self.quest_item_changes(&task.fail_items, &task.fail_item_counts),
            quest_items_deleted: task
                .deleted_items
                .iter()
                .filter_map(|&id| self.quest_item_tag(id))
                .collect(),
            guide_emails: GUIDES[1..]
                .iter()
                .zip(&task.guide_emails)
                .filter(|&(_, &email)| email > 0)
                .map(|(&guide, &email)| (guide, self.text(email)))
                .collect(),
        }
    }

    /// `"{name} - {type}"` of a nano, or `"None"`
    fn nano_label(&self, id: i64) -> (Option<i64>, String) {
        let Some(id) = present(id) else {
            return (None, "None".to_string());
        };
        let nano = &self.xdt.nano;
        let text = row(&nano.rows, id, "m_pNanoData")
            .and_then(|n| row(&nano.strings, n.name, "m_pNanoStringData"))
            .map(|t| format!("{} - {}", t.name, t.comment1))
            .unwrap_or_default();
        (Some(id), text)
    }

    fn reward_items(&self, types: &[i64], ids: &[i64]) -> Vec<ItemKey> {
        types
            .iter()
            .zip(ids)
            .filter(|&(_, &id)| id > 0)
            .filter_map(|(&slot, &id)| {
                let key = ItemKey::from_raw(slot, id)?;
                if self.items.contains_key(&key) {
                    Some(key)
                } else {
                    warn!(item = %key, "Mission reward is not an item");
                    None
                }
            })
            .collect()
    }

    fn mission(&self, id: MissionId, tasks: &[&MissionRow]) -> Option<MissionRecord> {
        let first = *tasks.first()?;
        let (required_nano_id, required_nano) =
            self.nano_label(first.required_nanos.first().copied().unwrap_or(0));
        let (nano_reward_id, nano_reward) = self.nano_label(first.nano_reward);

        let mut record = MissionRecord {
            id,
            type_id: first.mission_type,
            mission_type: label(MISSION_TYPES, first.mission_type, "mission type"),
            name: mission_name(self.xdt, first.name),
            difficulty_id: first.difficulty,
            difficulty: label(DIFFICULTIES, first.difficulty, "difficulty"),
            start_npc: None,
            end_npc: None,
            journal_npc: NpcRef::resolve(self.actors, first.journal_npc),
            level: first.level,
            required_nano_id,
            required_nano,
            required_guide_id: first.required_guide,
            required_guide: label(GUIDES, first.required_guide, "guide"),
            required_missions: first
                .required_missions
                .iter()
                .filter(|&&m| m > 0)
                .map(|&m| (m, self.first_task_name(m)))
                .collect(),
            barkers: IndexMap::new(),
            tasks: IndexMap::new(),
            rewards: MissionRewards {
                nano_reward_id,
                nano_reward,
                ..MissionRewards::default()
            },
            in_game: false,
        };

        for task in tasks {
            if let Some(npc) = NpcRef::resolve(self.actors, task.start_npc) {
                record.start_npc = Some(npc);
            }
            if let Some(npc) = NpcRef::resolve(self.actors, task.end_npc) {
                record.end_npc = Some(npc);
            }

            if let Some(reward) = present(task.reward)
                .and_then(|r| row(&self.xdt.mission.rewards, r, "m_pRewardData"))
            {
                let rewards = &mut record.rewards;
                rewards.taros = reward.taros;
                rewards.fusion_matter = reward.fusion_matter;
                rewards.items = self.reward_items(&reward.item_types, &reward.item_ids);
                rewards.item_selection_needed = reward.choice > 0;
            }

            for (npc, slot) in &self.barker_slots {
                let text = at(&task.barker_texts, *slot);
                if text > 0 {
                    record.barkers.insert(npc.clone(), self.text(text));
                }
            }

            record.tasks.insert(task.task_id, self.task(task));
        }

        Some(record)
    }

    fn first_task_name(&self, mission: MissionId) -> String {
        match self.grouped.get(&mission).and_then(|tasks| tasks.first()) {
            Some(task) => mission_name(self.xdt, task.name),
            None => {
                warn!(mission, "Prerequisite mission has no tasks");
                String::new()
            }
        }
    }
}

/// Missions in id order, tasks in task id order
pub fn build(
    xdt: &Xdt,
    actors: ActorLookup<'_>,
    items: &IndexMap<ItemKey, ItemRecord>,
) -> IndexMap<MissionId, MissionRecord> {
    let builder = MissionBuilder::new(xdt, actors, items);
    builder
        .grouped
        .iter()
        .filter_map(|(&id, tasks)| Some((id, builder.mission(id, tasks)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{actors, items};
    use crate::raw::{QuestItemRow, RewardRow};
    use crate::testutil::XdtBuilder;

    fn derive(builder: XdtBuilder) -> IndexMap<MissionId, MissionRecord> {
        let xdt = builder.parse();
        let items = items::build(&xdt);
        let (npcs, mobs) = actors::build_types(&xdt);
        let lookup = ActorLookup {
            npcs: &npcs,
            mobs: &mobs,
        };
        build(&xdt, lookup, &items)
    }

    fn base() -> XdtBuilder {
        XdtBuilder::new()
            .npc(1, "Buddy", 1)
            .npc(2, "Ace", 1)
            .mob(3, "Minion", 2, 100)
            .weapon(5, "Blaster", 2, 0, 4)
            .mission_string(1, "Save\nBuddy")
            .mission_string(2, "Talk to Ace")
            .mission_string(3, "Hi there")
    }

    fn task(mission: i64, task: i64) -> MissionRow {
        MissionRow {
            mission_id: mission,
            task_id: task,
            mission_type: 3,
            name: 1,
            task_type: 1,
            objective: 2,
            required_nanos: vec![0],
            required_missions: vec![0],
            barker_texts: vec![0, 0, 0, 0],
            ..MissionRow::default()
        }
    }

    #[test]
    fn test_npcs_and_rewards_from_last_present_task() {
        let missions = derive(
            base()
                .task(MissionRow {
                    start_npc: 2,
                    ..task(10, 102)
                })
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
                        taros: 50,
                        fusion_matter: 10,
                        item_types: vec![0, 0],
                        item_ids: vec![5, 0],
                        choice: 0,
                    },
                ),
        );

        let mission = &missions[&10];
        assert_eq!(mission.name, "Save Buddy");
        assert_eq!(mission.mission_type, "Normal");
        assert_eq!(mission.start_npc_id(), Some(2));
        assert_eq!(mission.end_npc.as_ref().map(|n| n.name.as_str()), Some("Ace"));
        assert_eq!(mission.rewards.taros, 50);
        assert_eq!(mission.rewards.items, vec![ItemKey::new(0, 5)]);
        assert_eq!(mission.rewards.nano_reward, "None");
        assert_eq!(
            mission.tasks.keys().copied().collect::<Vec<_>>(),
            vec![100, 101, 102]
        );
    }

    #[test]
    fn test_message_blocks_resolve_independently() {
        let missions = derive(base().task(MissionRow {
            start_send_npc: 1,
            start_message_type: 4,
            start_message_text: 3,
            end_dialog_bubble_npc: 42,
            fail_journal: 99,
            end_next_task: 7,
            ..task(10, 100)
        }));

        let task = &missions[&10].tasks[&100];
        assert_eq!(task.on_start.message_type, "Email");
        assert_eq!(task.on_start.text, "Hi there");
        assert_eq!(task.on_start.send_npc.as_ref().map(|n| n.id), Some(1));
        assert!(task.on_end.send_npc.is_none());

        let unknown = task.on_end.dialog_bubble_npc.as_ref().unwrap();
        assert_eq!(unknown.id, 42);
        assert!(unknown.name.is_empty());

        assert!(task.on_fail.journal.task_description.is_empty());
        assert_eq!(task.on_end_next_task_id, Some(7));
        assert!(task.on_end_next_objective.is_empty());
        assert_eq!(task.on_fail_next_task_id, None);
    }

    #[test]
    fn test_quest_items_kills_and_guides() {
        let missions = derive(
            base()
                .quest_item(1, "Key")
                .task(MissionRow {
                    start_items: vec![1, 7, 0],
                    start_item_counts: vec![2, 1, 1],
                    deleted_items: vec![1],
                    kill_targets: vec![3, 0],
                    kill_counts: vec![5, 0],
                    kill_items: vec![1, 0],
                    guide_emails: vec![0, 3],
                    time_limit: 90,
                    ..task(10, 100)
                }),
        );

        let task = &missions[&10].tasks[&100];
        assert_eq!(task.quest_items_on_start.len(), 1);
        assert_eq!(task.quest_items_on_start["0001::Key"], 2);
        assert_eq!(task.quest_items_deleted, vec!["0001::Key".to_string()]);

        let kill = &task.kill_requirements["0003::Minion"];
        assert_eq!(kill.kill_count, 5);
        assert_eq!(kill.quest_item, "Key");

        assert_eq!(task.guide_emails.len(), 1);
        assert_eq!(task.guide_emails["Dexter"], "Hi there");
        assert_eq!(task.time_limit, "1 minute and 30 seconds");
    }

    #[test]
    fn test_prerequisites_and_next_objective() {
        let missions = derive(
            base()
                .task(task(10, 100))
                .task(MissionRow {
                    name: 3,
                    required_missions: vec![10, 0],
                    end_next_task: 100,
                    ..task(11, 110)
                }),
        );

        let later = &missions[&11];
        assert_eq!(later.required_missions.len(), 1);
        assert_eq!(later.required_missions[&10], "Save Buddy");
        assert_eq!(later.tasks[&110].on_end_next_objective, "Talk to Ace");
    }

    #[test]
    fn test_mission_barkers_merge_across_tasks() {
        let mut builder = base();
        builder.npc_rows_mut()[1].barker_type = 2;
        let missions = derive(
            builder
                .task(MissionRow {
                    barker_texts: vec![0, 2, 0, 0],
                    ..task(10, 100)
                })
                .task(MissionRow {
                    barker_texts: vec![0, 3, 0, 0],
                    ..task(10, 101)
                }),
        );

        let barkers = &missions[&10].barkers;
        assert_eq!(barkers.len(), 1);
        assert_eq!(barkers["0001::Buddy"], "Hi there");
    }

    #[test]
    fn test_unnamed_quest_item_keeps_id() {
        let mut builder = base();
        builder.xdt.quest_item.rows.push(QuestItemRow { name: 0 });
        let missions = derive(builder.task(MissionRow {
            end_items: vec![0, 1],
            end_item_counts: vec![1, -1],
            ..task(10, 100)
        }));
        let changes = &missions[&10].tasks[&100].quest_items_on_end;
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["0001"], -1);
    }
}
