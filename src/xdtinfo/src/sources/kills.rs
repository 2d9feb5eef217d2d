//! Crates dropped by killing mobs or by event triggers
//!
//! A crate is reached backwards through the reference index:
//! crate -> crate drop types listing it -> mob drops using those types ->
//! mobs and events using those mob drops.

use super::direct::Keyed;
use super::types::{Bounds, EventSource, KillSource, MiscDrops, Source, SourceKind, SourceRecord};
use crate::drops::{DropTable, DropTables, MiscDropChance, MobDrop, ReferenceIndex};
use crate::entities::Entities;
use crate::grouping::SpawnIndex;
use crate::ids::{CrateId, ItemKey};
use crate::odds::{GenderedOdds, Odds};
use crate::reference::event_name;
use tracing::{debug, warn};

/// `num / den`; a zero denominator yields zero and is logged
fn ratio(num: i64, den: i64, what: &'static str, row: i64) -> Odds {
    Odds::checked(num, den).unwrap_or_else(|| {
        warn!(what, row, "Zero denominator, using probability 0");
        Odds::zero()
    })
}

/// Odds that one roll of `mob_drop` yields `crate_id`
pub fn crate_odds(drops: &DropTables, mob_drop: &MobDrop, crate_id: CrateId) -> Odds {
    let Some(chance) = drops.crate_drop_chances.get(&mob_drop.crate_drop_chance) else {
        warn!(
            mob_drop = mob_drop.id,
            chance = mob_drop.crate_drop_chance,
            "Mob drop references a missing crate drop chance"
        );
        return Odds::zero();
    };
    let Some(types) = drops.crate_drop_types.get(&mob_drop.crate_drop_type) else {
        warn!(
            mob_drop = mob_drop.id,
            types = mob_drop.crate_drop_type,
            "Mob drop references a missing crate drop type"
        );
        return Odds::zero();
    };

    // Weights only count where they pair with a listed crate
    let listed = || types.crate_ids.iter().zip(&chance.crate_type_drop_weights);
    let total: i64 = listed().map(|(_, &w)| w).sum();
    let relevant: i64 = listed()
        .filter(|&(&id, _)| id == crate_id)
        .map(|(_, &w)| w)
        .sum();

    ratio(chance.drop_chance, chance.drop_chance_total, "crate drop chance", chance.id)
        * ratio(relevant, total, "crate type weights", chance.id)
}

fn misc_odds(
    chance: Option<&MiscDropChance>,
    pick: fn(&MiscDropChance) -> (i64, i64),
    what: &'static str,
) -> Odds {
    chance.map_or_else(Odds::zero, |c| {
        let (num, den) = pick(c);
        ratio(num, den, what, c.id)
    })
}

/// Currency and consumable drops of `mob_drop`
pub fn misc_drops(drops: &DropTables, mob_drop: &MobDrop) -> MiscDrops {
    let chance = drops.misc_drop_chances.get(&mob_drop.misc_drop_chance);
    let amount = drops.misc_drop_types.get(&mob_drop.misc_drop_type);
    if chance.is_none() || amount.is_none() {
        debug!(mob_drop = mob_drop.id, "Mob drop has no misc drops");
    }

    MiscDrops {
        potion_amount: amount.map_or(0, |a| a.potion_amount),
        potion_odds: misc_odds(chance, |c| (c.potion_drop_chance, c.potion_drop_chance_total), "potion"),
        boost_amount: amount.map_or(0, |a| a.boost_amount),
        boost_odds: misc_odds(chance, |c| (c.boost_drop_chance, c.boost_drop_chance_total), "boost"),
        taro_amount: amount.map_or(0, |a| a.taro_amount),
        taro_odds: misc_odds(chance, |c| (c.taro_drop_chance, c.taro_drop_chance_total), "taro"),
        fm_amount: amount.map_or(0, |a| a.fm_amount),
        fm_odds: misc_odds(chance, |c| (c.fm_drop_chance, c.fm_drop_chance_total), "fusion matter"),
    }
}

/// Kill and event sources of every crate, keyed by the crate's item key
pub fn collect(
    entities: &Entities,
    spawns: &SpawnIndex,
    drops: &DropTables,
    references: &ReferenceIndex,
) -> (Keyed, Keyed) {
    let mut kills = Keyed::new();
    let mut events = Keyed::new();

    for &crate_id in drops.crates.keys() {
        let crate_item = ItemKey::of_crate(crate_id);

        for type_id in references.referrers_in(DropTable::Crates, crate_id, DropTable::CrateDropTypes) {
            for drop_id in references.referrers_in(DropTable::CrateDropTypes, type_id, DropTable::MobDrops) {
                let Some(mob_drop) = drops.mob_drops.get(&drop_id) else {
                    warn!(mob_drop = drop_id, "Referenced mob drop is missing");
                    continue;
                };
                let odds = GenderedOdds::uniform(crate_odds(drops, mob_drop, crate_id));
                let misc = misc_drops(drops, mob_drop);

                for mob_id in references.referrers_in(DropTable::MobDrops, drop_id, DropTable::Mobs) {
                    let Some(mob) = entities.mob_types.get(&mob_id) else {
                        debug!(mob = mob_id, "Drop table names an unknown mob");
                        continue;
                    };
                    for group in spawns.mob_groups(entities, mob_id) {
                        let Some(bounds) = Bounds::around(group.members.iter().map(|m| (m.x, m.y, m.z)))
                        else {
                            continue;
                        };
                        let source = Source::Kill(KillSource {
                            mob_type_id: mob_id,
                            mob_name: mob.common.name.clone(),
                            mob_icon: mob.common.icon.clone(),
                            mob_level: mob.level,
                            instance_id: group.instance_id,
                            area: group.area.to_string(),
                            bounds,
                            mob_drop_id: drop_id,
                            misc: misc.clone(),
                        });
                        let record = SourceRecord::new(SourceKind::Kill, source).with_odds(odds.clone());
                        kills.push((crate_item, record));
                    }
                }

                for event_id in references.referrers_in(DropTable::MobDrops, drop_id, DropTable::Events) {
                    let source = Source::Event(EventSource {
                        event_id,
                        event_name: event_name(event_id),
                        mob_drop_id: drop_id,
                        misc: misc.clone(),
                    });
                    let record = SourceRecord::new(SourceKind::Event, source).with_odds(odds.clone());
                    events.push((crate_item, record));
                }
            }
        }
    }

    (kills, events)
}
