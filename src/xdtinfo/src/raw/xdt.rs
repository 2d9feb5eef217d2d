//! Rows of the `xdt.json` tables bundle

use super::{rows, IconRow, NameStringRow, TextRow};
use crate::ids::CRATE_SLOT;
use crate::reference::{GENERAL_SLOT, ITEM_TABLES};
use crate::Result;
use serde::Deserialize;
use serde_json::Value;

#[cfg(test)]
use serde::Serialize;

// ============================================================================
// Items
// ============================================================================

/// Fields shared by every item table
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct ItemRow {
    #[serde(rename = "m_iItemNumber")]
    pub id: i64,
    #[serde(rename = "m_iTargetMode", default)]
    pub weapon_type: i64,
    #[serde(rename = "m_iIcon")]
    pub icon: i64,
    #[serde(rename = "m_iItemName")]
    pub name: i64,
    #[serde(rename = "m_iComment", default)]
    pub comment: i64,
    #[serde(rename = "m_iTradeAble")]
    pub tradeable: i64,
    #[serde(rename = "m_iSellAble")]
    pub sellable: i64,
    #[serde(rename = "m_iItemPrice")]
    pub price: i64,
    #[serde(rename = "m_iItemSellPrice")]
    pub sell_price: i64,
    #[serde(rename = "m_iStackNumber")]
    pub max_stack: i64,
}

/// Combat and gating fields; required for every slot except general items
/// and crates
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct CombatRow {
    #[serde(rename = "m_iRarity")]
    pub rarity: i64,
    #[serde(rename = "m_iReqSex")]
    pub gender: i64,
    #[serde(rename = "m_iMinReqLev")]
    pub required_level: i64,
    #[serde(rename = "m_iPointRat")]
    pub single_damage: i64,
    #[serde(rename = "m_iGroupRat")]
    pub multi_damage: i64,
    #[serde(rename = "m_iInitalTime")]
    pub initial_time: i64,
    #[serde(rename = "m_iDeliverTime")]
    pub deliver_time: i64,
    #[serde(rename = "m_iDelayTime")]
    pub delay_time: i64,
    #[serde(rename = "m_iDurationTime")]
    pub duration_time: i64,
    #[serde(rename = "m_iAtkRange")]
    pub range: i64,
    #[serde(rename = "m_iAtkAngle")]
    pub angle: i64,
    #[serde(rename = "m_iTargetNumber")]
    pub target_count: i64,
    #[serde(rename = "m_iDefenseRat")]
    pub defense: i64,
    #[serde(rename = "m_iUp_runSpeed")]
    pub vehicle_class: i64,
}

/// One item slot's table
#[derive(Debug, Clone, Default)]
pub struct ItemTable {
    pub slot: u8,
    pub rows: Vec<ItemRow>,
    /// Parallel to `rows`; `None` for slots without combat stats
    pub combat: Option<Vec<CombatRow>>,
    pub strings: Vec<TextRow>,
    pub icons: Vec<IconRow>,
}

impl ItemTable {
    fn load(root: &Value, slot: u8, table: &str) -> Result<Self> {
        let has_combat = slot != GENERAL_SLOT && slot != CRATE_SLOT;
        Ok(Self {
            slot,
            rows: rows(root, table, "m_pItemData")?,
            combat: if has_combat {
                Some(rows(root, table, "m_pItemData")?)
            } else {
                None
            },
            strings: rows(root, table, "m_pItemStringData")?,
            icons: rows(root, table, "m_pItemIconData")?,
        })
    }
}

// ============================================================================
// NPCs, mobs and skills
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct NpcRow {
    #[serde(rename = "m_iNpcNumber")]
    pub id: i64,
    #[serde(rename = "m_iNpcName")]
    pub name: i64,
    #[serde(rename = "m_iComment")]
    pub comment: i64,
    #[serde(rename = "m_iIcon1")]
    pub icon: i64,
    #[serde(rename = "m_iNpcType")]
    pub category: i64,
    #[serde(rename = "m_iHeight")]
    pub height: i64,
    #[serde(rename = "m_fScale")]
    pub scale: f64,
    #[serde(rename = "m_iNpcLevel")]
    pub level: i64,
    #[serde(rename = "m_iNpcStyle")]
    pub style: i64,
    #[serde(rename = "m_iHP")]
    pub hp: i64,
    #[serde(rename = "m_iRegenTime")]
    pub regen_time: i64,
    #[serde(rename = "m_iWalkSpeed")]
    pub walk_speed: i64,
    #[serde(rename = "m_iRunSpeed")]
    pub run_speed: i64,
    #[serde(rename = "m_iSightRange")]
    pub sight_range: i64,
    #[serde(rename = "m_iIdleRange")]
    pub idle_range: i64,
    #[serde(rename = "m_iCombatRange")]
    pub combat_range: i64,
    #[serde(rename = "m_iAtkRange")]
    pub attack_range: i64,
    #[serde(rename = "m_iRadius")]
    pub radius: i64,
    #[serde(rename = "m_iPower")]
    pub power: i64,
    #[serde(rename = "m_iAccuracy")]
    pub accuracy: i64,
    #[serde(rename = "m_iProtection")]
    pub protection: i64,
    #[serde(rename = "m_iInitalTime")]
    pub initial_time: i64,
    #[serde(rename = "m_iDeliverTime")]
    pub deliver_time: i64,
    #[serde(rename = "m_iDelayTime")]
    pub delay_time: i64,
    #[serde(rename = "m_iDurationTime")]
    pub duration_time: i64,
    #[serde(rename = "m_iMegaType")]
    pub eruption: i64,
    #[serde(rename = "m_iMegaTypeProb")]
    pub eruption_prob: i64,
    #[serde(rename = "m_iCorruptionType")]
    pub corruption: i64,
    #[serde(rename = "m_iCorruptionTypeProb")]
    pub corruption_prob: i64,
    #[serde(rename = "m_iActiveSkill1")]
    pub active_skill: i64,
    #[serde(rename = "m_iActiveSkill1Prob")]
    pub active_skill_prob: i64,
    #[serde(rename = "m_iSupportSkill")]
    pub support_skill: i64,
    #[serde(rename = "m_iPassiveBuff")]
    pub passive_buff: i64,
    #[serde(rename = "m_iHNpcNum")]
    pub hnpc: i64,
    #[serde(rename = "m_iBarkerNumber")]
    pub barker_number: i64,
    #[serde(rename = "m_iBarkerType")]
    pub barker_type: i64,
    #[serde(rename = "m_iServiceNumber")]
    pub service_number: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct ServiceRow {
    #[serde(rename = "m_strService", default)]
    pub service: String,
}

#[derive(Debug, Clone, Default)]
pub struct NpcTable {
    pub rows: Vec<NpcRow>,
    pub strings: Vec<TextRow>,
    pub icons: Vec<IconRow>,
    pub barkers: Vec<TextRow>,
    pub services: Vec<ServiceRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct SkillRow {
    #[serde(rename = "m_iSkillNumber")]
    pub name: i64,
    #[serde(rename = "m_iIcon")]
    pub icon: i64,
    #[serde(rename = "m_iEffectRange")]
    pub range: i64,
    #[serde(rename = "m_iEffectAngle")]
    pub angle: i64,
    #[serde(rename = "m_iEffectArea")]
    pub area: i64,
    #[serde(rename = "m_iCoolTime", default)]
    pub cool_time: i64,
    #[serde(rename = "m_iTargetNumber", default)]
    pub target_count: i64,
}

#[derive(Debug, Clone, Default)]
pub struct SkillTable {
    pub rows: Vec<SkillRow>,
    pub strings: Vec<TextRow>,
    pub icons: Vec<IconRow>,
}

// ============================================================================
// Missions
// ============================================================================

/// One mission task row; mission-level fields repeat on every task
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct MissionRow {
    #[serde(rename = "m_iHMissionID")]
    pub mission_id: i64,
    #[serde(rename = "m_iHTaskID")]
    pub task_id: i64,
    #[serde(rename = "m_iHMissionType")]
    pub mission_type: i64,
    #[serde(rename = "m_iHMissionName")]
    pub name: i64,
    #[serde(rename = "m_iHDifficultyType")]
    pub difficulty: i64,
    #[serde(rename = "m_iHJournalNPCID")]
    pub journal_npc: i64,
    #[serde(rename = "m_iCTRReqLvMin")]
    pub level: i64,
    #[serde(rename = "m_iCSTRReqNano")]
    pub required_nanos: Vec<i64>,
    #[serde(rename = "m_iSTNanoID")]
    pub nano_reward: i64,
    #[serde(rename = "m_iCSTReqGuide")]
    pub required_guide: i64,
    #[serde(rename = "m_iCSTReqMission")]
    pub required_missions: Vec<i64>,

    #[serde(rename = "m_iHTaskType")]
    pub task_type: i64,
    #[serde(rename = "m_iHCurrentObjective")]
    pub objective: i64,
    #[serde(rename = "m_iHNPCID")]
    pub start_npc: i64,
    #[serde(rename = "m_iHTerminatorNPCID")]
    pub end_npc: i64,
    #[serde(rename = "m_iHBarkerTextID")]
    pub barker_texts: Vec<i64>,
    #[serde(rename = "m_iCSUDEFNPCID")]
    pub escort_npc: i64,
    #[serde(rename = "m_iSTGrantWayPoint")]
    pub waypoint_npc: i64,
    #[serde(rename = "m_iRequireInstanceID")]
    pub required_instance: i64,
    #[serde(rename = "m_iSTGrantTimer")]
    pub time_limit: i64,
    #[serde(rename = "m_iSUReward")]
    pub reward: i64,
    #[serde(rename = "m_iSUOutgoingTask")]
    pub end_next_task: i64,
    #[serde(rename = "m_iFOutgoingTask")]
    pub fail_next_task: i64,

    #[serde(rename = "m_iSTMessageType")]
    pub start_message_type: i64,
    #[serde(rename = "m_iSTMessageTextID")]
    pub start_message_text: i64,
    #[serde(rename = "m_iSTMessageSendNPC")]
    pub start_send_npc: i64,
    #[serde(rename = "m_iSTDialogBubble")]
    pub start_dialog_bubble: i64,
    #[serde(rename = "m_iSTDialogBubbleNPCID")]
    pub start_dialog_bubble_npc: i64,
    #[serde(rename = "m_iSTJournalIDAdd")]
    pub start_journal: i64,

    #[serde(rename = "m_iSUMessageType")]
    pub end_message_type: i64,
    #[serde(rename = "m_iSUMessagetextID")]
    pub end_message_text: i64,
    #[serde(rename = "m_iSUMessageSendNPC")]
    pub end_send_npc: i64,
    #[serde(rename = "m_iSUDialogBubble")]
    pub end_dialog_bubble: i64,
    #[serde(rename = "m_iSUDialogBubbleNPCID")]
    pub end_dialog_bubble_npc: i64,
    #[serde(rename = "m_iSUJournaliDAdd")]
    pub end_journal: i64,

    #[serde(rename = "m_iFMessageType")]
    pub fail_message_type: i64,
    #[serde(rename = "m_iFMessageTextID")]
    pub fail_message_text: i64,
    #[serde(rename = "m_iFMessageSendNPC")]
    pub fail_send_npc: i64,
    #[serde(rename = "m_iFDialogBubble")]
    pub fail_dialog_bubble: i64,
    #[serde(rename = "m_iFDialogBubbleNPCID")]
    pub fail_dialog_bubble_npc: i64,
    #[serde(rename = "m_iFJournalIDAdd")]
    pub fail_journal: i64,

    #[serde(rename = "m_iCSUEnemyID", default)]
    pub kill_targets: Vec<i64>,
    #[serde(rename = "m_iCSUNumToKill", default)]
    pub kill_counts: Vec<i64>,
    #[serde(rename = "m_iCSUItemID", default)]
    pub kill_items: Vec<i64>,
    #[serde(rename = "m_iCSUItemNumNeeded", default)]
    pub kill_item_counts: Vec<i64>,
    #[serde(rename = "m_iSTItemDropRate", default)]
    pub kill_item_drop_rates: Vec<i64>,
    #[serde(rename = "m_iSTItemID", default)]
    pub start_items: Vec<i64>,
    #[serde(rename = "m_iSTItemNumNeeded", default)]
    pub start_item_counts: Vec<i64>,
    #[serde(rename = "m_iSUItem", default)]
    pub end_items: Vec<i64>,
    #[serde(rename = "m_iSUInstancename", default)]
    pub end_item_counts: Vec<i64>,
    #[serde(rename = "m_iFItemID", default)]
    pub fail_items: Vec<i64>,
    #[serde(rename = "m_iFItemNumNeeded", default)]
    pub fail_item_counts: Vec<i64>,
    #[serde(rename = "m_iDelItemID", default)]
    pub deleted_items: Vec<i64>,
    #[serde(rename = "m_iMentorEmailID", default)]
    pub guide_emails: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct JournalRow {
    #[serde(rename = "m_iMissionSummary")]
    pub mission_summary: i64,
    #[serde(rename = "m_iDetaileMissionDesc")]
    pub mission_description: i64,
    #[serde(rename = "m_iMissionCompleteSummary")]
    pub complete_summary: i64,
    #[serde(rename = "m_iDetaileMissionCompleteSummary")]
    pub complete_description: i64,
    #[serde(rename = "m_iDetailedTaskDesc")]
    pub task_description: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct RewardRow {
    #[serde(rename = "m_iCash")]
    pub taros: i64,
    #[serde(rename = "m_iFusionMatter")]
    pub fusion_matter: i64,
    #[serde(rename = "m_iMissionRewarItemType")]
    pub item_types: Vec<i64>,
    #[serde(rename = "m_iMissionRewardItemID")]
    pub item_ids: Vec<i64>,
    #[serde(rename = "m_iBox1Choice")]
    pub choice: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MissionTable {
    pub rows: Vec<MissionRow>,
    pub strings: Vec<NameStringRow>,
    pub journals: Vec<JournalRow>,
    pub rewards: Vec<RewardRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct QuestItemRow {
    #[serde(rename = "m_iItemName")]
    pub name: i64,
}

#[derive(Debug, Clone, Default)]
pub struct QuestItemTable {
    pub rows: Vec<QuestItemRow>,
    pub strings: Vec<TextRow>,
}

// ============================================================================
// Instances and warps
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct InstanceRow {
    #[serde(rename = "m_iInstanceNameID")]
    pub id: i64,
    #[serde(rename = "m_iZoneX")]
    pub zone_x: i64,
    #[serde(rename = "m_iZoneY")]
    pub zone_y: i64,
    #[serde(rename = "m_iIsEP")]
    pub special_zone: i64,
    #[serde(rename = "m_ScoreMax")]
    pub max_score: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct WarpRow {
    #[serde(rename = "m_iWarpNumber")]
    pub id: i64,
    #[serde(rename = "m_iToMapNum")]
    pub to_instance: i64,
    #[serde(rename = "m_iNpcNumber")]
    pub npc: i64,
    #[serde(rename = "m_iLimit_TaskID")]
    pub required_task: i64,
    #[serde(rename = "m_iLimit_UseItemType")]
    pub required_item_type: i64,
    #[serde(rename = "m_iLimit_UseItemID")]
    pub required_item: i64,
    #[serde(rename = "m_iLimit_Level")]
    pub required_level: i64,
    #[serde(rename = "m_iCost")]
    pub cost: i64,
    #[serde(rename = "m_iToX")]
    pub x: i64,
    #[serde(rename = "m_iToY")]
    pub y: i64,
    #[serde(rename = "m_iToZ")]
    pub z: i64,
}

#[derive(Debug, Clone, Default)]
pub struct InstanceTable {
    pub rows: Vec<InstanceRow>,
    pub warps: Vec<WarpRow>,
    pub names: Vec<NameStringRow>,
}

// ============================================================================
// Nanos
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct NanoRow {
    #[serde(rename = "m_iNanoNumber")]
    pub id: i64,
    #[serde(rename = "m_iNanoName")]
    pub name: i64,
    #[serde(rename = "m_iStyle")]
    pub style: i64,
    #[serde(rename = "m_iTune")]
    pub powers: Vec<i64>,
    #[serde(rename = "m_iIcon1")]
    pub icon: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct TuneRow {
    #[serde(rename = "m_iTuneNumber")]
    pub id: i64,
    #[serde(rename = "m_iTuneName")]
    pub name: i64,
    #[serde(rename = "m_iComment")]
    pub comment: i64,
    #[serde(rename = "m_iReqItemID")]
    pub item: i64,
    #[serde(rename = "m_iReqItemCount")]
    pub item_count: i64,
    #[serde(rename = "m_iSkillID")]
    pub skill: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NanoTable {
    pub rows: Vec<NanoRow>,
    pub strings: Vec<TextRow>,
    pub icons: Vec<IconRow>,
    pub tunes: Vec<TuneRow>,
    pub tune_strings: Vec<TextRow>,
    pub tune_icons: Vec<IconRow>,
}

// ============================================================================
// Vendors, transportation, combining
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct VendorRow {
    #[serde(rename = "m_iNpcNumber")]
    pub npc: i64,
    #[serde(rename = "m_iItemType")]
    pub item_type: i64,
    #[serde(rename = "m_iitemID")]
    pub item: i64,
    #[serde(rename = "m_iSortNumber")]
    pub sort: i64,
    #[serde(rename = "m_iSellCost")]
    pub sell_cost: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct TransportRow {
    #[serde(rename = "m_iVehicleID")]
    pub id: i64,
    #[serde(rename = "m_iNPCID")]
    pub npc: i64,
    #[serde(rename = "m_iMoveType")]
    pub move_type: i64,
    #[serde(rename = "m_iStartLocation")]
    pub start: i64,
    #[serde(rename = "m_iEndLocation")]
    pub end: i64,
    #[serde(rename = "m_iRouteNum")]
    pub route: i64,
    #[serde(rename = "m_iSpeed")]
    pub speed: i64,
    #[serde(rename = "m_iCost")]
    pub cost: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct LocationRow {
    #[serde(rename = "m_iXpos")]
    pub x: i64,
    #[serde(rename = "m_iYpos")]
    pub y: i64,
    #[serde(rename = "m_iZpos")]
    pub z: i64,
    #[serde(rename = "m_iIcon")]
    pub icon: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct LocationNameRow {
    #[serde(rename = "m_pstrLocationName", default)]
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransportTable {
    pub rows: Vec<TransportRow>,
    pub warp_locations: Vec<LocationRow>,
    pub warp_names: Vec<LocationNameRow>,
    pub broomstick_locations: Vec<LocationRow>,
    pub broomstick_names: Vec<LocationNameRow>,
    pub icons: Vec<IconRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct CombiningRow {
    #[serde(rename = "m_iLevelGap")]
    pub level_gap: i64,
    #[serde(rename = "m_fSameGrade")]
    pub same_rarity: f64,
    #[serde(rename = "m_fOneGrade")]
    pub one_rarity_diff: f64,
    #[serde(rename = "m_fTwoGrade")]
    pub two_rarity_diff: f64,
    #[serde(rename = "m_fThreeGrade")]
    pub three_rarity_diff: f64,
    #[serde(rename = "m_iLookConstant")]
    pub looks_multiplier: i64,
    #[serde(rename = "m_iStatConstant")]
    pub stats_multiplier: i64,
}

// ============================================================================
// Bundle
// ============================================================================

/// Every `xdt` table the derivation reads
#[derive(Debug, Clone, Default)]
pub struct Xdt {
    /// Item tables by slot; the unused slot 8 is absent
    pub items: Vec<ItemTable>,
    pub npc: NpcTable,
    pub skill: SkillTable,
    pub mission: MissionTable,
    pub quest_item: QuestItemTable,
    pub instance: InstanceTable,
    pub nano: NanoTable,
    pub vendor: Vec<VendorRow>,
    pub shiny_strings: Vec<TextRow>,
    pub transport: TransportTable,
    pub combining: Vec<CombiningRow>,
}

impl Xdt {
    /// Parse the bundle; any missing table or malformed row is fatal
    pub fn from_value(root: &Value) -> Result<Self> {
        let mut items = Vec::new();
        for (slot, table) in ITEM_TABLES.iter().enumerate() {
            if table.is_empty() {
                continue;
            }
            let slot = u8::try_from(slot).unwrap_or(u8::MAX);
            items.push(ItemTable::load(root, slot, table)?);
        }

        const NPC: &str = "m_pNpcTable";
        const SKILL: &str = "m_pSkillTable";
        const MISSION: &str = "m_pMissionTable";
        const QUEST: &str = "m_pQuestItemTable";
        const INSTANCE: &str = "m_pInstanceTable";
        const NANO: &str = "m_pNanoTable";
        const TRANSPORT: &str = "m_pTransportationTable";

        Ok(Self {
            items,
            npc: NpcTable {
                rows: rows(root, NPC, "m_pNpcData")?,
                strings: rows(root, NPC, "m_pNpcStringData")?,
                icons: rows(root, NPC, "m_pNpcIconData")?,
                barkers: rows(root, NPC, "m_pNpcBarkerData")?,
                services: rows(root, NPC, "m_pNpcServiceData")?,
            },
            skill: SkillTable {
                rows: rows(root, SKILL, "m_pSkillData")?,
                strings: rows(root, SKILL, "m_pSkillStringData")?,
                icons: rows(root, SKILL, "m_pSkillIconData")?,
            },
            mission: MissionTable {
                rows: rows(root, MISSION, "m_pMissionData")?,
                strings: rows(root, MISSION, "m_pMissionStringData")?,
                journals: rows(root, MISSION, "m_pJournalData")?,
                rewards: rows(root, MISSION, "m_pRewardData")?,
            },
            quest_item: QuestItemTable {
                rows: rows(root, QUEST, "m_pItemData")?,
                strings: rows(root, QUEST, "m_pItemStringData")?,
            },
            instance: InstanceTable {
                rows: rows(root, INSTANCE, "m_pInstanceData")?,
                warps: rows(root, INSTANCE, "m_pWarpData")?,
                names: rows(root, INSTANCE, "m_pWarpNameData")?,
            },
            nano: NanoTable {
                rows: rows(root, NANO, "m_pNanoData")?,
                strings: rows(root, NANO, "m_pNanoStringData")?,
                icons: rows(root, NANO, "m_pNanoIconData")?,
                tunes: rows(root, NANO, "m_pNanoTuneData")?,
                tune_strings: rows(root, NANO, "m_pNanoTuneStringData")?,
                tune_icons: rows(root, NANO, "m_pNanoTuneIconData")?,
            },
            vendor: rows(root, "m_pVendorTable", "m_pItemData")?,
            shiny_strings: rows(root, "m_pShinyTable", "m_pShinyStringData")?,
            transport: TransportTable {
                rows: rows(root, TRANSPORT, "m_pTransportationData")?,
                warp_locations: rows(root, TRANSPORT, "m_pTransportationWarpLocation")?,
                warp_names: rows(root, TRANSPORT, "m_pTransportationWarpString")?,
                broomstick_locations: rows(root, TRANSPORT, "m_pBroomstickLocation")?,
                broomstick_names: rows(root, TRANSPORT, "m_pBroomstickString")?,
                icons: rows(root, TRANSPORT, "m_pTransIcon")?,
            },
            combining: rows(root, "m_pCombiningTable", "m_pCombiningData")?,
        })
    }

    /// Item table for `slot`
    pub fn item_table(&self, slot: u8) -> Option<&ItemTable> {
        self.items.iter().find(|t| t.slot == slot)
    }
}
