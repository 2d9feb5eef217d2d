//! Server placement data (`NPCs.json`, `mobs.json`, `eggs.json`, `paths.json`)

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[cfg(test)]
use serde::Serialize;

fn parse<T: DeserializeOwned>(root: &Value, file: &str) -> Result<T> {
    T::deserialize(root).map_err(|e| Error::shape(file, e))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct NpcPlacement {
    #[serde(rename = "iNPCType")]
    pub npc_type: i64,
    #[serde(rename = "iX")]
    pub x: i64,
    #[serde(rename = "iY")]
    pub y: i64,
    #[serde(rename = "iZ")]
    pub z: i64,
    #[serde(rename = "iAngle", default)]
    pub angle: i64,
    #[serde(rename = "iMapNum", default)]
    pub instance: i64,
}

/// `NPCs.json`, keyed by placement number
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Npcs {
    #[serde(rename = "NPCs", default)]
    pub npcs: IndexMap<String, NpcPlacement>,
}

impl Npcs {
    pub fn from_value(root: &Value) -> Result<Self> {
        parse(root, "NPCs")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct Follower {
    #[serde(rename = "iNPCType")]
    pub npc_type: i64,
    #[serde(rename = "iOffsetX")]
    pub offset_x: i64,
    #[serde(rename = "iOffsetY")]
    pub offset_y: i64,
    #[serde(rename = "iHP", default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct MobPlacement {
    #[serde(rename = "iNPCType")]
    pub npc_type: i64,
    #[serde(rename = "iX")]
    pub x: i64,
    #[serde(rename = "iY")]
    pub y: i64,
    #[serde(rename = "iZ")]
    pub z: i64,
    #[serde(rename = "iAngle", default)]
    pub angle: i64,
    #[serde(rename = "iMapNum", default)]
    pub instance: i64,
    #[serde(rename = "iHP", default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i64>,
    #[serde(rename = "aFollowers", default)]
    pub followers: Vec<Follower>,
}

/// `mobs.json`: single mobs and group leaders with their followers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mobs {
    #[serde(default)]
    pub mobs: IndexMap<String, MobPlacement>,
    #[serde(default)]
    pub groups: IndexMap<String, MobPlacement>,
}

impl Mobs {
    pub fn from_value(root: &Value) -> Result<Self> {
        parse(root, "mobs")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct EggType {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "EffectId")]
    pub effect: i64,
    #[serde(rename = "DropCrateId")]
    pub crate_id: i64,
    #[serde(rename = "Duration")]
    pub duration: i64,
    #[serde(rename = "Regen")]
    pub regen: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct EggPlacement {
    #[serde(rename = "iType")]
    pub egg_type: i64,
    #[serde(rename = "iX")]
    pub x: i64,
    #[serde(rename = "iY")]
    pub y: i64,
    #[serde(rename = "iZ")]
    pub z: i64,
    #[serde(rename = "iMapNum", default)]
    pub instance: i64,
}

/// `eggs.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Eggs {
    #[serde(rename = "EggTypes", default)]
    pub types: IndexMap<String, EggType>,
    #[serde(rename = "Eggs", default)]
    pub eggs: IndexMap<String, EggPlacement>,
}

impl Eggs {
    pub fn from_value(root: &Value) -> Result<Self> {
        parse(root, "eggs")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct PathPoint {
    #[serde(rename = "iX")]
    pub x: i64,
    #[serde(rename = "iY")]
    pub y: i64,
    #[serde(rename = "iZ")]
    pub z: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct SkywayPath {
    #[serde(rename = "iRouteID")]
    pub route: i64,
    #[serde(rename = "iMonkeySpeed")]
    pub speed: i64,
    #[serde(rename = "aPoints", default)]
    pub points: Vec<PathPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct SliderPoint {
    #[serde(rename = "iX")]
    pub x: i64,
    #[serde(rename = "iY")]
    pub y: i64,
    #[serde(rename = "iZ")]
    pub z: i64,
    #[serde(rename = "bStop", default)]
    pub stop: bool,
}

/// `paths.json`: skyway routes and the shared slider loop
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paths {
    #[serde(default)]
    pub skyway: IndexMap<String, SkywayPath>,
    #[serde(default)]
    pub slider: IndexMap<String, SliderPoint>,
}

impl Paths {
    pub fn from_value(root: &Value) -> Result<Self> {
        parse(root, "paths")
    }

    pub fn skyway_route(&self, route: i64) -> Option<&SkywayPath> {
        self.skyway.values().find(|p| p.route == route)
    }
}
