//! Enriched per-entity records
//!
//! Every constructor reads typed raw tables, joins them by positional index
//! or id and emits insertion-ordered maps keyed by the entity's id. Row `0`
//! of every positional table is a placeholder and never becomes a record.
//! A reference that does not resolve is logged and left absent; it never
//! aborts the build.

pub mod actors;
pub mod codes;
pub mod combinations;
pub mod eggs;
pub mod infected_zones;
pub mod instances;
pub mod items;
pub mod missions;
pub mod nanos;
pub mod transport;
pub mod vendors;

pub use actors::{ActorCommon, ActorInstanceRecord, ActorLookup, MobTypeRecord, NpcTypeRecord, SkillSummary};
pub use codes::CodeRecord;
pub use combinations::CombinationRecord;
pub use eggs::{EggRecord, EggTypeRecord};
pub use infected_zones::{SpecialZoneRecord, StarReward};
pub use instances::{TransitionRecord, ZoneRecord};
pub use items::ItemRecord;
pub use missions::{MessageBlock, MissionRecord, MissionRewards, NpcRef, TaskRecord};
pub use nanos::{NanoPowerRecord, NanoRecord};
pub use transport::{Destination, Location, RoutePoint, TransportRecord, TransportRoute};
pub use vendors::{VendorListing, VendorRecord};

use crate::area::AreaIndex;
use crate::ids::{ActorTypeId, EggTypeId, InstanceId, ItemKey, MissionId, WarpId};
use crate::pipeline::Tables;
use indexmap::IndexMap;
use tracing::{info, warn};

/// Placements grouped by template id, then keyed by placement id
pub type Placed<T> = IndexMap<i64, IndexMap<String, T>>;

/// Placement id from a numeric server key plus the kind's offset
pub(crate) fn placement_key(key: &str, offset: i64, file: &str) -> Option<String> {
    match key.trim().parse::<i64>() {
        Ok(n) => Some((n + offset).to_string()),
        Err(_) => {
            warn!(file, key, "Skipping placement with non-numeric key");
            None
        }
    }
}

/// Every entity table of one build
#[derive(Debug, Clone, Default)]
pub struct Entities {
    pub items: IndexMap<ItemKey, ItemRecord>,
    pub npc_types: IndexMap<ActorTypeId, NpcTypeRecord>,
    pub mob_types: IndexMap<ActorTypeId, MobTypeRecord>,
    pub npcs: Placed<ActorInstanceRecord>,
    pub mobs: Placed<ActorInstanceRecord>,
    pub egg_types: IndexMap<EggTypeId, EggTypeRecord>,
    pub eggs: Placed<EggRecord>,
    pub missions: IndexMap<MissionId, MissionRecord>,
    pub transitions: IndexMap<WarpId, TransitionRecord>,
    pub zones: IndexMap<InstanceId, ZoneRecord>,
    pub special_zones: IndexMap<i64, SpecialZoneRecord>,
    pub nano_powers: IndexMap<i64, NanoPowerRecord>,
    pub nanos: IndexMap<i64, NanoRecord>,
    pub vendors: IndexMap<ActorTypeId, VendorRecord>,
    pub codes: IndexMap<String, CodeRecord>,
    pub transport_routes: IndexMap<i64, TransportRoute>,
    pub transport: IndexMap<ActorTypeId, TransportRecord>,
    pub combinations: IndexMap<i64, CombinationRecord>,
}

impl Entities {
    /// Run every constructor in dependency order
    pub fn build(tables: &Tables, areas: &AreaIndex) -> Self {
        let xdt = &tables.xdt;

        let items = items::build(xdt);
        let (npc_types, mob_types) = actors::build_types(xdt);
        let npcs = actors::build_npcs(&tables.npcs, &npc_types, areas);
        let mobs = actors::build_mobs(&tables.mobs, &mob_types, areas);
        info!(
            items = items.len(),
            npc_types = npc_types.len(),
            mob_types = mob_types.len(),
            "Built item and actor templates"
        );

        let egg_types = eggs::build_types(xdt, &tables.eggs, &items);
        let eggs = eggs::build_eggs(&tables.eggs, &egg_types, areas);

        let lookup = ActorLookup {
            npcs: &npc_types,
            mobs: &mob_types,
        };
        let missions = missions::build(xdt, lookup, &items);

        let transitions = instances::build_transitions(xdt, &items, areas);
        let zones = instances::build_zones(xdt, &transitions, areas);
        let special_zones = infected_zones::build(&zones, &tables.drops.racing);
        info!(
            missions = missions.len(),
            zones = zones.len(),
            special_zones = special_zones.len(),
            "Built missions and zones"
        );

        let transport_routes = transport::build_routes(xdt, &tables.paths, areas);
        let transport = transport::build(&transport_routes);

        Self {
            nano_powers: nanos::build_powers(xdt),
            nanos: nanos::build(xdt),
            vendors: vendors::build(xdt, &items),
            codes: codes::build(&tables.drops, &items),
            combinations: combinations::build(xdt),
            items,
            npc_types,
            mob_types,
            npcs,
            mobs,
            egg_types,
            eggs,
            missions,
            transitions,
            zones,
            special_zones,
            transport_routes,
            transport,
        }
    }

    pub fn actors(&self) -> ActorLookup<'_> {
        ActorLookup {
            npcs: &self.npc_types,
            mobs: &self.mob_types,
        }
    }

    /// Display name of an item, empty when unknown
    pub fn item_name(&self, key: &ItemKey) -> &str {
        self.items.get(key).map(|i| i.name.as_str()).unwrap_or_default()
    }
}
