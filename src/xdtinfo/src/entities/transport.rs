//! Transportation routes and the NPCs offering them
//!
//! SCAMPER routes use warp locations; skyway and slider routes use broomstick
//! locations. Skyway routes follow a path from `paths.json` between their
//! stops, slider routes share the single slider loop.

use crate::area::AreaIndex;
use crate::ids::ActorTypeId;
use crate::raw::{icon_at, row, LocationNameRow, LocationRow, Paths, TransportRow, Xdt};
use crate::reference::{
    error_icon, icon_path, label, MOVE_SCAMPER, MOVE_SKYWAY, TRANSPORT_MOVE_TYPES,
};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePoint {
    pub stop: bool,
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub area: String,
}

/// One row of the transportation table
#[derive(Debug, Clone, Serialize)]
pub struct TransportRoute {
    pub id: i64,
    pub npc_type_id: ActorTypeId,
    pub move_type_id: i64,
    pub move_type: &'static str,
    pub cost: i64,
    pub speed_class: i64,
    pub route_id: i64,
    pub route: Vec<RoutePoint>,
    pub start: Location,
    pub end: Location,
}

#[derive(Debug, Clone, Serialize)]
pub struct Destination {
    #[serde(flatten)]
    pub location: Location,
    pub cost: i64,
    pub speed_class: i64,
    pub route_id: i64,
    pub route: Vec<RoutePoint>,
}

/// Every route offered by one NPC template, keyed by end location
#[derive(Debug, Clone, Serialize)]
pub struct TransportRecord {
    pub npc_type_id: ActorTypeId,
    pub move_type_id: i64,
    pub move_type: &'static str,
    pub start: Location,
    pub destinations: IndexMap<i64, Destination>,
    pub in_game: bool,
}

struct Stops<'a> {
    locations: &'a [LocationRow],
    names: &'a [LocationNameRow],
    table: &'static str,
}

impl Stops<'_> {
    fn location(&self, xdt: &Xdt, id: i64, areas: &AreaIndex) -> Option<Location> {
        let raw = row(self.locations, id, self.table)?;
        let name = usize::try_from(id)
            .ok()
            .and_then(|i| self.names.get(i))
            .map(|n| n.name.clone())
            .unwrap_or_default();
        let icon = icon_at(&xdt.transport.icons, raw.icon, "m_pTransIcon")
            .map(|n| icon_path("transport", n))
            .unwrap_or_else(error_icon);

        Some(Location {
            id,
            name,
            icon,
            x: raw.x,
            y: raw.y,
            z: raw.z,
            area: areas.tag_at(raw.x, raw.y),
        })
    }
}

fn point(stop: bool, x: i64, y: i64, z: i64, areas: &AreaIndex) -> RoutePoint {
    RoutePoint {
        stop,
        x,
        y,
        z,
        area: areas.tag_at(x, y),
    }
}

fn route(
    raw: &TransportRow,
    start: &Location,
    end: &Location,
    paths: &Paths,
    areas: &AreaIndex,
) -> (i64, Vec<RoutePoint>) {
    match raw.move_type {
        MOVE_SCAMPER => (raw.speed, Vec::new()),
        MOVE_SKYWAY => {
            let Some(path) = paths.skyway_route(raw.route) else {
                warn!(vehicle = raw.id, route = raw.route, "Skyway route has no path");
                return (raw.speed, Vec::new());
            };
            let mut points = vec![point(true, start.x, start.y, start.z, areas)];
            points.extend(path.points.iter().map(|p| point(false, p.x, p.y, p.z, areas)));
            points.push(point(true, end.x, end.y, end.z, areas));
            (path.speed, points)
        }
        _ => (
            raw.speed,
            paths
                .slider
                .values()
                .map(|p| point(p.stop, p.x, p.y, p.z, areas))
                .collect(),
        ),
    }
}

pub fn build_routes(xdt: &Xdt, paths: &Paths, areas: &AreaIndex) -> IndexMap<i64, TransportRoute> {
    let transport = &xdt.transport;
    let mut routes = IndexMap::new();

    for raw in transport.rows.iter().skip(1) {
        let stops = if raw.move_type == MOVE_SCAMPER {
            Stops {
                locations: &transport.warp_locations,
                names: &transport.warp_names,
                table: "m_pTransportationWarpLocation",
            }
        } else {
            Stops {
                locations: &transport.broomstick_locations,
                names: &transport.broomstick_names,
                table: "m_pBroomstickLocation",
            }
        };

        let (Some(start), Some(end)) = (
            stops.location(xdt, raw.start, areas),
            stops.location(xdt, raw.end, areas),
        ) else {
            continue;
        };
        let (speed_class, points) = route(raw, &start, &end, paths, areas);

        routes.insert(
            raw.id,
            TransportRoute {
                id: raw.id,
                npc_type_id: raw.npc,
                move_type_id: raw.move_type,
                move_type: label(TRANSPORT_MOVE_TYPES, raw.move_type, "move type"),
                cost: raw.cost,
                speed_class,
                route_id: raw.route,
                route: points,
                start,
                end,
            },
        );
    }

    routes
}

/// Routes grouped by NPC template in template id order. An NPC's start
/// location and move type are those of its first route.
pub fn build(routes: &IndexMap<i64, TransportRoute>) -> IndexMap<ActorTypeId, TransportRecord> {
    let mut sorted: Vec<&TransportRoute> = routes.values().collect();
    sorted.sort_by_key(|r| r.npc_type_id);

    let mut grouped: IndexMap<ActorTypeId, TransportRecord> = IndexMap::new();
    for r in sorted {
        let record = grouped.entry(r.npc_type_id).or_insert_with(|| TransportRecord {
            npc_type_id: r.npc_type_id,
            move_type_id: r.move_type_id,
            move_type: r.move_type,
            start: r.start.clone(),
            destinations: IndexMap::new(),
            in_game: false,
        });
        record.destinations.insert(
            r.end.id,
            Destination {
                location: r.end.clone(),
                cost: r.cost,
                speed_class: r.speed_class,
                route_id: r.route_id,
                route: r.route.clone(),
            },
        );
    }

    grouped
}
