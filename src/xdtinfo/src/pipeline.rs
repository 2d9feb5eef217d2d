//! One derivation run, stage by stage
//!
//! Each stage takes only the outputs of earlier stages it reads, so stages
//! can be run and tested on their own. [`derive`] chains them.

use crate::area::AreaIndex;
use crate::drops::{DropTables, ReferenceIndex};
use crate::entities::Entities;
use crate::grouping::{area_contents, AreaContentsMap, SpawnIndex};
use crate::patch::patched;
use crate::raw::{self, Eggs, Mobs, Npcs, Paths, Xdt};
use crate::sources::{self, ResolvedSources};
use crate::validity::{self, LiveSet, ValiditySummary};
use crate::Result;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Server data files, by stem, in load order
pub const SERVER_FILES: [&str; 5] = ["NPCs", "mobs", "eggs", "drops", "paths"];

/// Parsed server data files of one build
#[derive(Debug, Clone, Default)]
pub struct ServerData {
    pub npcs: Value,
    pub mobs: Value,
    pub eggs: Value,
    pub drops: Value,
    pub paths: Value,
}

impl ServerData {
    pub fn file(&self, stem: &str) -> Option<&Value> {
        match stem {
            "NPCs" => Some(&self.npcs),
            "mobs" => Some(&self.mobs),
            "eggs" => Some(&self.eggs),
            "drops" => Some(&self.drops),
            "paths" => Some(&self.paths),
            _ => None,
        }
    }

    pub fn file_mut(&mut self, stem: &str) -> Option<&mut Value> {
        match stem {
            "NPCs" => Some(&mut self.npcs),
            "mobs" => Some(&mut self.mobs),
            "eggs" => Some(&mut self.eggs),
            "drops" => Some(&mut self.drops),
            "paths" => Some(&mut self.paths),
            _ => None,
        }
    }

    /// A copy with every patch applied in order
    pub fn patched(&self, patches: &[ServerPatch]) -> ServerData {
        let mut out = self.clone();
        for stem in SERVER_FILES {
            let overlays: Vec<Value> = patches
                .iter()
                .filter_map(|p| p.files.get(stem).cloned())
                .collect();
            if overlays.is_empty() {
                continue;
            }
            if let (Some(base), Some(target)) = (self.file(stem), out.file_mut(stem)) {
                debug!(file = stem, patches = overlays.len(), "Patching server data");
                *target = patched(base, &overlays);
            }
        }
        out
    }
}

/// Overlays of one named patch, by file stem
#[derive(Debug, Clone, Default)]
pub struct ServerPatch {
    pub name: String,
    pub files: IndexMap<String, Value>,
}

/// Everything one build is derived from
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub areas: Value,
    pub xdt: Value,
    pub server: ServerData,
    pub patches: Vec<ServerPatch>,
}

/// Typed raw tables of one build
#[derive(Debug, Clone)]
pub struct Tables {
    pub xdt: Xdt,
    pub npcs: Npcs,
    pub mobs: Mobs,
    pub eggs: Eggs,
    pub paths: Paths,
    pub drops: DropTables,
    pub references: ReferenceIndex,
}

impl Tables {
    pub fn parse(xdt: &Value, server: &ServerData) -> Result<Self> {
        let drops = DropTables::from_value(&server.drops)?;
        let references = drops.reference_index();
        Ok(Self {
            xdt: Xdt::from_value(xdt)?,
            npcs: Npcs::from_value(&server.npcs)?,
            mobs: Mobs::from_value(&server.mobs)?,
            eggs: Eggs::from_value(&server.eggs)?,
            paths: Paths::from_value(&server.paths)?,
            drops,
            references,
        })
    }
}

/// The derived knowledge base of one build
#[derive(Debug, Clone)]
pub struct DerivedInfo {
    pub entities: Entities,
    pub spawns: SpawnIndex,
    pub area_contents: AreaContentsMap,
    pub sources: ResolvedSources,
    pub validity: ValiditySummary,
}

fn table<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

impl DerivedInfo {
    /// Every output table by file stem
    pub fn to_tables(&self) -> Result<IndexMap<&'static str, Value>> {
        let e = &self.entities;
        let mut out = IndexMap::new();
        out.insert("item_info", table(&e.items)?);
        out.insert("npc_type_info", table(&e.npc_types)?);
        out.insert("mob_type_info", table(&e.mob_types)?);
        out.insert("npc_info", table(&e.npcs)?);
        out.insert("mob_info", table(&e.mobs)?);
        out.insert("spawn_info", table(&self.spawns)?);
        out.insert("egg_type_info", table(&e.egg_types)?);
        out.insert("egg_info", table(&e.eggs)?);
        out.insert("mission_info", table(&e.missions)?);
        out.insert("instance_info", table(&e.zones)?);
        out.insert("warp_info", table(&e.transitions)?);
        out.insert("infected_zone_info", table(&e.special_zones)?);
        out.insert("nano_info", table(&e.nanos)?);
        out.insert("nano_power_info", table(&e.nano_powers)?);
        out.insert("vendor_info", table(&e.vendors)?);
        out.insert("code_item_info", table(&e.codes)?);
        out.insert("transportation_info", table(&e.transport)?);
        out.insert("transport_route_info", table(&e.transport_routes)?);
        out.insert("combination_info", table(&e.combinations)?);
        out.insert("area_info", table(&self.area_contents)?);
        out.insert("item_source_info", table(&self.sources.by_item)?);
        out.insert("source_item_info", table(&self.sources.by_source)?);
        out.insert("diagnostics", table(&self.sources.diagnostics)?);
        out.insert("validity_summary", table(&self.validity)?);
        Ok(out)
    }
}

/// Run every stage over one build's raw inputs
pub fn derive(inputs: &RawInputs) -> Result<DerivedInfo> {
    let server = inputs.server.patched(&inputs.patches);
    let tables = Tables::parse(&inputs.xdt, &server)?;
    let areas = AreaIndex::from_rows(&raw::areas(&inputs.areas)?);
    info!(areas = areas.len(), patches = inputs.patches.len(), "Parsed raw tables");

    let mut entities = Entities::build(&tables, &areas);
    let spawns = SpawnIndex::build(&entities);
    let area_contents = area_contents(&entities, &areas);
    let sources = sources::resolve(&entities, &spawns, &tables.drops, &tables.references);

    let live = LiveSet::from_placements(&tables.npcs, &tables.mobs, &tables.eggs);
    let validity = validity::propagate(&mut entities, &live, &sources);

    Ok(DerivedInfo {
        entities,
        spawns,
        area_contents,
        sources,
        validity,
    })
}
