//! Infected zones: instances with a racing score table

use super::instances::ZoneRecord;
use crate::drops::Racing;
use crate::ids::{CrateId, InstanceId, ItemKey, WarpId};
use crate::reference::precise_delta;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// Best star count; rewards are listed best rank first
const MAX_STARS: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct StarReward {
    pub crate_id: CrateId,
    pub item: ItemKey,
    pub rank_score: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpecialZoneRecord {
    pub id: i64,
    pub instance_id: InstanceId,
    pub name: String,
    pub zone_x: i64,
    pub zone_y: i64,
    pub area: String,
    pub original_score_cap: i64,
    pub score_cap: i64,
    pub time_limit_seconds: i64,
    pub time_limit: String,
    pub total_pods: i64,
    pub scale_factor: f64,
    pub pod_factor: f64,
    pub time_factor: f64,
    pub score_function: String,
    pub fm_reward_function: String,
    /// Star count to reward crate
    pub star_rewards: IndexMap<i64, StarReward>,
    pub entry_transitions: Vec<WarpId>,
    pub in_game: bool,
}

impl SpecialZoneRecord {
    /// Lowest rank score that still earns `crate_id`
    pub fn min_score_for(&self, crate_id: CrateId) -> Option<i64> {
        self.star_rewards
            .values()
            .filter(|r| r.crate_id == crate_id)
            .map(|r| r.rank_score)
            .min()
    }
}

fn score_function(racing: &Racing) -> String {
    format!(
        "min({}, floor(exp({:?} + {:?} * PodsCollected / {} - {:?} * TimeElapsedSeconds / {})))",
        racing.score_cap,
        racing.scale_factor,
        racing.pod_factor,
        racing.total_pods,
        racing.time_factor,
        racing.time_limit,
    )
}

fn fm_reward_function(racing: &Racing) -> String {
    format!(
        "floor((1 + exp({:?} - 1) * {:?} * PodsCollected) / {})",
        racing.scale_factor, racing.pod_factor, racing.total_pods,
    )
}

fn star_rewards(racing: &Racing) -> IndexMap<i64, StarReward> {
    let mut stars = IndexMap::new();
    for (rank, (&rank_score, &crate_id)) in (0..).zip(racing.rank_scores.iter().zip(&racing.rewards)) {
        if crate_id <= 0 {
            continue;
        }
        stars.insert(
            MAX_STARS - rank,
            StarReward {
                crate_id,
                item: ItemKey::of_crate(crate_id),
                rank_score,
            },
        );
    }
    stars
}

/// One record per zone flagged as special, joined with its racing row
pub fn build(
    zones: &IndexMap<InstanceId, ZoneRecord>,
    racing: &IndexMap<i64, Racing>,
) -> IndexMap<i64, SpecialZoneRecord> {
    let mut special = IndexMap::new();

    for zone in zones.values() {
        let Some(id) = zone.special_zone_id else {
            continue;
        };
        let Some(race) = racing.get(&id) else {
            warn!(zone = zone.id, special_zone = id, "Special zone has no racing row");
            continue;
        };

        special.insert(
            id,
            SpecialZoneRecord {
                id,
                instance_id: zone.id,
                name: zone.name.clone(),
                zone_x: zone.zone_x,
                zone_y: zone.zone_y,
                area: zone.area.clone(),
                original_score_cap: zone.max_score,
                score_cap: race.score_cap,
                time_limit_seconds: race.time_limit,
                time_limit: precise_delta(race.time_limit as f64),
                total_pods: race.total_pods,
                scale_factor: race.scale_factor,
                pod_factor: race.pod_factor,
                time_factor: race.time_factor,
                score_function: score_function(race),
                fm_reward_function: fm_reward_function(race),
                star_rewards: star_rewards(race),
                entry_transitions: zone.entry_transitions.clone(),
                in_game: false,
            },
        );
    }

    special
}
