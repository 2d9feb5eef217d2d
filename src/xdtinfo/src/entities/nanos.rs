//! Nanos and their powers

use super::actors::SkillSummary;
use crate::ids::ItemKey;
use crate::raw::{comment_at, icon_at, name_at, row, Xdt};
use crate::reference::{error_icon, icon_path, label, GENERAL_SLOT, NANO_TYPES};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct NanoPowerRecord {
    pub id: i64,
    pub name: String,
    pub type_name: String,
    pub comment: String,
    pub icon: String,
    /// General item consumed to tune the power
    pub power_item: ItemKey,
    pub power_item_count: i64,
    pub skill: SkillSummary,
    pub skill_cool_time: i64,
    pub skill_target_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NanoRecord {
    pub id: i64,
    pub name: String,
    pub comment: String,
    pub nano_type_id: i64,
    pub nano_type: &'static str,
    /// Power ids, see [`NanoPowerRecord`]
    pub powers: Vec<i64>,
    pub icon: String,
}

pub fn build_powers(xdt: &Xdt) -> IndexMap<i64, NanoPowerRecord> {
    let nano = &xdt.nano;
    let mut powers = IndexMap::new();

    for tune in nano.tunes.iter().skip(1) {
        let text = row(&nano.tune_strings, tune.name, "m_pNanoTuneStringData");
        let skill = row(&xdt.skill.rows, tune.skill, "m_pSkillData");

        // Power icons are numbered through the tune icon table
        let icon = skill
            .and_then(|s| icon_at(&nano.tune_icons, s.icon, "m_pNanoTuneIconData"))
            .map(|n| icon_path("skillicon", n))
            .unwrap_or_else(error_icon);

        powers.insert(
            tune.id,
            NanoPowerRecord {
                id: tune.id,
                name: text.map(|t| t.name.clone()).unwrap_or_default(),
                type_name: text.map(|t| t.comment1.clone()).unwrap_or_default(),
                comment: comment_at(&nano.tune_strings, tune.comment, "m_pNanoTuneStringData"),
                icon,
                power_item: ItemKey::new(GENERAL_SLOT, tune.item),
                power_item_count: tune.item_count,
                skill: SkillSummary::resolve(xdt, tune.skill, None),
                skill_cool_time: skill.map(|s| s.cool_time).unwrap_or_default(),
                skill_target_count: skill.map(|s| s.target_count).unwrap_or_default(),
            },
        );
    }

    powers
}

pub fn build(xdt: &Xdt) -> IndexMap<i64, NanoRecord> {
    let nano = &xdt.nano;
    let mut nanos = IndexMap::new();

    for raw in nano.rows.iter().skip(1) {
        nanos.insert(
            raw.id,
            NanoRecord {
                id: raw.id,
                name: name_at(&nano.strings, raw.name, "m_pNanoStringData"),
                comment: comment_at(&nano.strings, raw.name, "m_pNanoStringData"),
                nano_type_id: raw.style,
                nano_type: label(NANO_TYPES, raw.style, "nano type"),
                powers: raw.powers.iter().copied().filter(|&p| p > 0).collect(),
                icon: icon_at(&nano.icons, raw.icon, "m_pNanoIconData")
                    .map(|n| icon_path("nanoicon", n))
                    .unwrap_or_else(error_icon),
            },
        );
    }

    nanos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::TuneRow;
    use crate::testutil::XdtBuilder;

    #[test]
    fn test_nano_powers_and_icons() {
        let xdt = XdtBuilder::new()
            .nano(1, "Buttercup", "Fighter", 2, &[3, 0])
            .tune(TuneRow {
                id: 3,
                item: 12,
                item_count: 2,
                ..TuneRow::default()
            })
            .parse();

        let nanos = build(&xdt);
        let buttercup = &nanos[&1];
        assert_eq!(buttercup.name, "Buttercup");
        assert_eq!(buttercup.nano_type, "Cosmix");
        assert_eq!(buttercup.powers, vec![3]);
        assert_eq!(buttercup.icon, "icons/nanoicon_01.png");

        let powers = build_powers(&xdt);
        assert_eq!(powers[&3].power_item, ItemKey::new(7, 12));
        assert_eq!(powers[&3].power_item_count, 2);
    }
}
