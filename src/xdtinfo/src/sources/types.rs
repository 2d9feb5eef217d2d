//! Source records and their kind-specific payloads

use crate::ids::{tag, ActorTypeId, CrateId, EggTypeId, InstanceId, ItemKey, MissionId};
use crate::odds::{GenderedOdds, Odds};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SourceKind {
    Code,
    Vendor,
    Collectible,
    SpecialZone,
    Kill,
    Event,
    MissionReward,
    MissionRewardCrate,
}

impl SourceKind {
    pub const ALL: [SourceKind; 8] = [
        SourceKind::Code,
        SourceKind::Vendor,
        SourceKind::Collectible,
        SourceKind::SpecialZone,
        SourceKind::Kill,
        SourceKind::Event,
        SourceKind::MissionReward,
        SourceKind::MissionRewardCrate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Code => "Code",
            SourceKind::Vendor => "Vendor",
            SourceKind::Collectible => "Collectible",
            SourceKind::SpecialZone => "SpecialZone",
            SourceKind::Kill => "Kill",
            SourceKind::Event => "Event",
            SourceKind::MissionReward => "MissionReward",
            SourceKind::MissionRewardCrate => "MissionRewardCrate",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a placed NPC stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NpcSpot {
    pub npc_id: String,
    pub npc_type_id: ActorTypeId,
    pub npc_name: String,
    pub npc_icon: String,
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub instance_id: InstanceId,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSource {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorSource {
    #[serde(flatten)]
    pub npc: NpcSpot,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectibleSource {
    pub egg_id: String,
    pub egg_type_id: EggTypeId,
    pub egg_name: String,
    pub egg_comment: String,
    pub egg_extra_comment: String,
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub instance_id: InstanceId,
    pub area: String,
}

/// A star reward of an infected zone, entered through a world NPC
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialZoneSource {
    #[serde(flatten)]
    pub npc: NpcSpot,
    pub special_zone_id: i64,
    pub zone_instance_id: InstanceId,
    pub zone_name: String,
    pub stars: i64,
    pub min_score: i64,
}

/// Axis-aligned box around the placements of a spawn group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Bounds {
    pub min_x: i64,
    pub min_y: i64,
    pub min_z: i64,
    pub max_x: i64,
    pub max_y: i64,
    pub max_z: i64,
}

impl Bounds {
    /// Smallest box holding every point, `None` without points
    pub fn around(points: impl IntoIterator<Item = (i64, i64, i64)>) -> Option<Self> {
        points.into_iter().fold(None, |acc, (x, y, z)| {
            Some(match acc {
                None => Bounds {
                    min_x: x,
                    min_y: y,
                    min_z: z,
                    max_x: x,
                    max_y: y,
                    max_z: z,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    min_z: b.min_z.min(z),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                    max_z: b.max_z.max(z),
                },
            })
        })
    }
}

/// Currency and consumable drops that come with a kill or event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiscDrops {
    pub potion_amount: i64,
    pub potion_odds: Odds,
    pub boost_amount: i64,
    pub boost_odds: Odds,
    pub taro_amount: i64,
    pub taro_odds: Odds,
    pub fm_amount: i64,
    pub fm_odds: Odds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KillSource {
    pub mob_type_id: ActorTypeId,
    pub mob_name: String,
    pub mob_icon: String,
    pub mob_level: i64,
    pub instance_id: InstanceId,
    pub area: String,
    pub bounds: Bounds,
    pub mob_drop_id: i64,
    #[serde(flatten)]
    pub misc: MiscDrops,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSource {
    pub event_id: i64,
    pub event_name: &'static str,
    pub mob_drop_id: i64,
    #[serde(flatten)]
    pub misc: MiscDrops,
}

/// A mission reward, handed out by the mission's start NPC placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionRewardSource {
    #[serde(flatten)]
    pub npc: NpcSpot,
    pub mission_id: MissionId,
    pub mission_name: String,
    pub mission_type: &'static str,
    pub difficulty: &'static str,
    pub level: i64,
    pub required_missions: IndexMap<MissionId, String>,
    pub item_selection_needed: bool,
    pub taros: i64,
    pub fusion_matter: i64,
}

/// Kind-specific metadata of a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Source {
    Code(CodeSource),
    Vendor(VendorSource),
    Collectible(CollectibleSource),
    SpecialZone(SpecialZoneSource),
    Kill(KillSource),
    Event(EventSource),
    MissionReward(MissionRewardSource),
}

impl Source {
    /// `"id::name"` of the thing handing the item out; codes are bare
    pub fn tag(&self) -> String {
        match self {
            Source::Code(s) => s.code.clone(),
            Source::Vendor(s) => tag(s.npc.npc_type_id, &s.npc.npc_name),
            Source::Collectible(s) => tag(s.egg_type_id, &s.egg_name),
            Source::SpecialZone(s) => tag(s.special_zone_id, &s.zone_name),
            Source::Kill(s) => tag(s.mob_type_id, &s.mob_name),
            Source::Event(s) => tag(s.event_id, s.event_name),
            Source::MissionReward(s) => tag(s.mission_id, &s.mission_name),
        }
    }
}

/// One way to obtain an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    pub kind: SourceKind,
    /// Shared between every item the source hands out
    pub source: Arc<Source>,
    /// Absent when the item is always granted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odds: Option<GenderedOdds>,
}

impl SourceRecord {
    pub fn new(kind: SourceKind, source: Source) -> Self {
        Self {
            kind,
            source: Arc::new(source),
            odds: None,
        }
    }

    pub fn with_odds(mut self, odds: GenderedOdds) -> Self {
        self.odds = Some(odds);
        self
    }

    /// Probability for a male character, `1` when deterministic
    pub fn male_odds(&self) -> Odds {
        self.odds.as_ref().map_or_else(Odds::one, |o| o.male.clone())
    }

    /// The same source reached through a container opened with odds `via`
    pub fn through(&self, via: &GenderedOdds) -> Self {
        let kind = match self.kind {
            SourceKind::MissionReward => SourceKind::MissionRewardCrate,
            other => other,
        };
        let odds = match &self.odds {
            Some(own) => via.scale(own),
            None => via.clone(),
        };
        Self {
            kind,
            source: Arc::clone(&self.source),
            odds: Some(odds),
        }
    }

    /// What this source contributes in the reverse view
    pub fn contribution(&self) -> Contribution {
        let (price, stars, min_score) = match self.source.as_ref() {
            Source::Vendor(v) => (Some(v.price), None, None),
            Source::SpecialZone(z) => (None, Some(z.stars), Some(z.min_score)),
            _ => (None, None, None),
        };
        Contribution {
            odds: self.odds.clone(),
            price,
            stars,
            min_score,
        }
    }
}

/// Per-item entry of the reverse `source -> items` view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contribution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odds: Option<GenderedOdds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<i64>,
}

/// Problems found while resolving sources that do not abort the build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    /// `item` sits in a crate that, through nesting, contains itself
    ContainerCycle { item: ItemKey, path: Vec<ItemKey> },
}

/// A crate that holds an item, with the odds of drawing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub crate_id: CrateId,
    pub odds: GenderedOdds,
}
