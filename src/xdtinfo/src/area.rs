//! Named world areas and coordinate lookup

use crate::raw::AreaRow;
use crate::reference::UNKNOWN;
use indexmap::IndexMap;
use serde::Serialize;

/// Raw area rectangles are stored in map units; placements use world units
const AREA_SCALE: f64 = 100.0;

/// One rectangle of a named area, in world units
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub name: String,
    pub zone: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Area {
    /// `"{area} - {zone}"`
    pub fn tag(&self) -> String {
        area_tag(&self.name, &self.zone)
    }

    /// Bounds are inclusive on every side
    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.x <= x && x <= self.x + self.width && self.y <= y && y <= self.y + self.height
    }

    fn unknown() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            zone: UNKNOWN.to_string(),
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        }
    }
}

pub fn area_tag(name: &str, zone: &str) -> String {
    format!("{name} - {zone}")
}

/// Area rectangles grouped by tag, in first-seen order.
///
/// There are a few hundred rectangles, so lookups scan linearly.
#[derive(Debug, Clone)]
pub struct AreaIndex {
    groups: IndexMap<String, Vec<Area>>,
    unknown: Area,
}

impl Default for AreaIndex {
    fn default() -> Self {
        Self {
            groups: IndexMap::new(),
            unknown: Area::unknown(),
        }
    }
}

impl AreaIndex {
    pub fn from_rows(rows: &[AreaRow]) -> Self {
        let mut index = Self::default();
        for row in rows {
            // Truncation toward zero matches the placement grid
            let area = Area {
                name: row.area_name.clone(),
                zone: row.zone_name.clone(),
                x: (row.rect.x * AREA_SCALE) as i64,
                y: (row.rect.y * AREA_SCALE) as i64,
                width: (row.rect.width * AREA_SCALE) as i64,
                height: (row.rect.height * AREA_SCALE) as i64,
            };
            index.groups.entry(area.tag()).or_default().push(area);
        }
        index
    }

    /// First rectangle containing the point, or the unknown area
    pub fn locate(&self, x: i64, y: i64) -> &Area {
        self.locate_index(x, y)
            .and_then(|(group, i)| self.groups.get_index(group).map(|(_, areas)| &areas[i]))
            .unwrap_or(&self.unknown)
    }

    /// Tag of the area containing the point
    pub fn tag_at(&self, x: i64, y: i64) -> String {
        self.locate(x, y).tag()
    }

    /// `(group position, rectangle position)` of the first match
    pub fn locate_index(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        self.groups.values().enumerate().find_map(|(g, areas)| {
            areas
                .iter()
                .position(|area| area.contains(x, y))
                .map(|i| (g, i))
        })
    }

    pub fn groups(&self) -> &IndexMap<String, Vec<Area>> {
        &self.groups
    }

    /// The tag given to points outside every area
    pub fn unknown_tag(&self) -> String {
        self.unknown.tag()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
