//! Typed rows for every consumed input table
//!
//! Positional tables keep the extractor's layout: row `0` is a placeholder and
//! other rows are addressed by index. Text, icon and string tables are shared
//! between several bundles and use the same row types.

mod server;
mod xdt;

pub use server::{
    EggPlacement, EggType, Eggs, Follower, MobPlacement, Mobs, NpcPlacement, Npcs, Paths,
    PathPoint, SkywayPath, SliderPoint,
};
pub use xdt::{
    CombatRow, CombiningRow, InstanceRow, InstanceTable, ItemRow, ItemTable, JournalRow,
    LocationNameRow, LocationRow, MissionRow, MissionTable, NanoRow, NanoTable, NpcRow, NpcTable,
    QuestItemRow, QuestItemTable, RewardRow, ServiceRow, SkillRow, SkillTable, TransportRow,
    TransportTable, TuneRow, VendorRow, WarpRow, Xdt,
};

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[cfg(test)]
use serde::Serialize;

/// Name/comment strings row
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct TextRow {
    #[serde(rename = "m_strName", default)]
    pub name: String,
    #[serde(rename = "m_strComment", default)]
    pub comment: String,
    #[serde(rename = "m_strComment1", default)]
    pub comment1: String,
    #[serde(rename = "m_strComment2", default)]
    pub comment2: String,
}

/// Mission/instance string row
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct NameStringRow {
    #[serde(rename = "m_pstrNameString", default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct IconRow {
    #[serde(rename = "m_iIconType", default)]
    pub icon_type: i64,
    #[serde(rename = "m_iIconNumber")]
    pub number: i64,
}

/// One world-zone rectangle from `areas.json`
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct AreaRow {
    #[serde(rename = "DongName")]
    pub area_name: String,
    #[serde(rename = "ZoneName")]
    pub zone_name: String,
    #[serde(rename = "Area")]
    pub rect: AreaRect,
}

/// Rectangle in map units (world units / 100)
#[derive(Debug, Clone, Copy, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct AreaRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Parse the `areas.json` list
pub fn areas(root: &Value) -> Result<Vec<AreaRow>> {
    Vec::<AreaRow>::deserialize(root).map_err(|e| Error::shape("areas", e))
}

/// Look up `table` in `root`
pub(crate) fn section<'a>(root: &'a Value, table: &str) -> Result<&'a Value> {
    root.get(table)
        .ok_or_else(|| Error::MissingTable(table.to_string()))
}

/// Deserialize the row list `root[table][list]`
pub(crate) fn rows<T: DeserializeOwned>(root: &Value, table: &str, list: &str) -> Result<Vec<T>> {
    let value = section(section(root, table)?, list)
        .map_err(|_| Error::MissingTable(format!("{table}.{list}")))?;
    Vec::<T>::deserialize(value).map_err(|e| Error::shape(format!("{table}.{list}"), e))
}

/// Row `index` of a positional table, warning when it does not exist
pub fn row<'a, T>(list: &'a [T], index: i64, table: &str) -> Option<&'a T> {
    let found = usize::try_from(index).ok().and_then(|i| list.get(i));
    if found.is_none() {
        warn!(table, index, "Row index out of range");
    }
    found
}

/// `m_strName` of a text row, empty when the row is missing
pub fn name_at(list: &[TextRow], index: i64, table: &str) -> String {
    row(list, index, table)
        .map(|r| r.name.clone())
        .unwrap_or_default()
}

/// `m_strComment` of a text row, empty when the row is missing
pub fn comment_at(list: &[TextRow], index: i64, table: &str) -> String {
    row(list, index, table)
        .map(|r| r.comment.clone())
        .unwrap_or_default()
}

/// `m_pstrNameString` of a string row, empty when the row is missing
pub fn string_at(list: &[NameStringRow], index: i64, table: &str) -> String {
    row(list, index, table)
        .map(|r| r.text.clone())
        .unwrap_or_default()
}

/// Icon number at `index`, `None` (with a warning) when missing
pub fn icon_at(list: &[IconRow], index: i64, table: &str) -> Option<i64> {
    row(list, index, table).map(|r| r.number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_reports_table_on_bad_shape() {
        let root = json!({"m_pShinyTable": {"m_pShinyStringData": [{"m_strName": 5}]}});
        let err = rows::<TextRow>(&root, "m_pShinyTable", "m_pShinyStringData").unwrap_err();
        match err {
            Error::SchemaShape { table, .. } => {
                assert_eq!(table, "m_pShinyTable.m_pShinyStringData")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rows_missing_table() {
        let root = json!({});
        let err = rows::<TextRow>(&root, "m_pShinyTable", "m_pShinyStringData").unwrap_err();
        assert!(matches!(err, Error::MissingTable(name) if name == "m_pShinyTable"));
    }

    #[test]
    fn test_text_defaults() {
        let row: TextRow = serde_json::from_value(json!({"m_strName": "Buddy"})).unwrap();
        assert_eq!(row.name, "Buddy");
        assert!(row.comment.is_empty());
    }

    #[test]
    fn test_positional_lookup_out_of_range() {
        let list = vec![TextRow::default()];
        assert!(row(&list, 3, "strings").is_none());
        assert!(row(&list, -1, "strings").is_none());
        assert_eq!(name_at(&list, 9, "strings"), "");
    }

    #[test]
    fn test_area_rows() {
        let root = json!([{
            "DongName": "Sector V",
            "ZoneName": "Downtown",
            "Area": {"x": 1.5, "y": 2.0, "width": 10.0, "height": 4.25}
        }]);
        let areas = areas(&root).unwrap();
        assert_eq!(areas[0].area_name, "Sector V");
        assert_eq!(areas[0].rect.height, 4.25);
    }
}
