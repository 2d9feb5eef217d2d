//! Item combination odds by level gap

use crate::raw::Xdt;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CombinationRecord {
    pub level_gap: i64,
    pub same_rarity: f64,
    pub one_rarity_diff: f64,
    pub two_rarity_diff: f64,
    pub three_rarity_diff: f64,
    pub looks_price_multiplier: i64,
    pub stats_price_multiplier: i64,
}

pub fn build(xdt: &Xdt) -> IndexMap<i64, CombinationRecord> {
    xdt.combining
        .iter()
        .skip(1)
        .map(|raw| {
            (
                raw.level_gap,
                CombinationRecord {
                    level_gap: raw.level_gap,
                    same_rarity: raw.same_rarity,
                    one_rarity_diff: raw.one_rarity_diff,
                    two_rarity_diff: raw.two_rarity_diff,
                    three_rarity_diff: raw.three_rarity_diff,
                    looks_price_multiplier: raw.looks_multiplier,
                    stats_price_multiplier: raw.stats_multiplier,
                },
            )
        })
        .collect()
}
