//! Crate contents and the odds of drawing each item
//!
//! Opening a crate first rolls a rarity tier from the crate's rarity weights,
//! then picks one item of that tier by item weight. Which items belong to a
//! tier depends on the character's gender, so odds are computed for both.
//! Tiers without any candidate for either gender are dropped from the roll.

use super::types::Membership;
use crate::drops::{DropTables, ItemSet};
use crate::entities::Entities;
use crate::ids::ItemKey;
use crate::odds::{GenderedOdds, Odds};
use crate::reference::RARITY_TIERS;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use tracing::{debug, info, warn};

const MALE: i64 = 1;
const FEMALE: i64 = 2;

/// Gender and rarity of the item behind an item reference; `0` means any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemTraits {
    pub gender: i64,
    pub rarity: i64,
}

struct Candidate {
    reference: i64,
    weight: i64,
    gender: i64,
    rarity: i64,
}

impl Candidate {
    fn eligible(&self, set: &ItemSet, gender: i64, tier: i64) -> bool {
        let gender_ok = set.ignore_gender || self.gender == 0 || self.gender == gender;
        let rarity_ok = set.ignore_rarity || self.rarity == 0 || self.rarity == tier;
        gender_ok && rarity_ok
    }
}

/// Weights of every candidate in one tier for one gender
fn tier_weights(set: &ItemSet, candidates: &[Candidate], gender: i64, tier: i64) -> Vec<i64> {
    candidates
        .iter()
        .map(|c| if c.eligible(set, gender, tier) { c.weight } else { 0 })
        .collect()
}

/// Odds of drawing each item reference of `set`.
///
/// `traits` resolves an item reference to its item's gender and rarity;
/// references it cannot resolve are left out of the roll.
pub fn item_set_odds(
    set: &ItemSet,
    rarity_weights: &[i64],
    traits: impl Fn(i64) -> Option<ItemTraits>,
) -> IndexMap<i64, GenderedOdds> {
    let references: IndexSet<i64> = set.item_references.iter().copied().collect();
    let candidates: Vec<Candidate> = references
        .iter()
        .filter_map(|&reference| {
            let own = traits(reference)?;
            let key = reference.to_string();
            Some(Candidate {
                reference,
                weight: set
                    .alter_item_weight_map
                    .get(&key)
                    .copied()
                    .unwrap_or(set.default_item_weight),
                gender: set.alter_gender_map.get(&key).copied().unwrap_or(own.gender),
                rarity: set.alter_rarity_map.get(&key).copied().unwrap_or(own.rarity),
            })
        })
        .collect();

    // (tier weight, male weights, female weights) per tier
    let tiers: Vec<(i64, Vec<i64>, Vec<i64>)> = rarity_weights
        .iter()
        .zip(1..=RARITY_TIERS)
        .map(|(&w, tier)| {
            (
                w,
                tier_weights(set, &candidates, MALE, tier),
                tier_weights(set, &candidates, FEMALE, tier),
            )
        })
        .collect();

    let total: i64 = tiers
        .iter()
        .filter(|(_, male, female)| male.iter().sum::<i64>() > 0 || female.iter().sum::<i64>() > 0)
        .map(|(w, _, _)| w)
        .sum();

    let mut odds: IndexMap<i64, GenderedOdds> = candidates
        .iter()
        .map(|c| (c.reference, GenderedOdds::uniform(Odds::zero())))
        .collect();
    if total == 0 {
        debug!(item_set = set.id, "Item set has no weighted tier");
        return odds;
    }

    for (w, male, female) in &tiers {
        let tier_odds = Odds::ratio_or_zero(*w, total);
        let male_sum = male.iter().sum::<i64>().max(1);
        let female_sum = female.iter().sum::<i64>().max(1);
        for (i, c) in candidates.iter().enumerate() {
            let Some(entry) = odds.get_mut(&c.reference) else {
                continue;
            };
            entry.male += &(&tier_odds * &Odds::ratio_or_zero(male[i], male_sum));
            entry.female += &(&tier_odds * &Odds::ratio_or_zero(female[i], female_sum));
        }
    }

    odds
}

/// Every crate holding each item, in crate order
pub fn memberships(entities: &Entities, drops: &DropTables) -> HashMap<ItemKey, Vec<Membership>> {
    let mut found: HashMap<ItemKey, Vec<Membership>> = HashMap::new();

    let resolve = |reference: i64| -> Option<ItemKey> {
        let Some(row) = drops.item_references.get(&reference) else {
            warn!(reference, "Item set lists a missing item reference");
            return None;
        };
        ItemKey::from_raw(row.slot, row.item)
    };

    for row in drops.crates.values() {
        let Some(set) = drops.item_sets.get(&row.item_set) else {
            warn!(crate_id = row.id, item_set = row.item_set, "Crate references a missing item set");
            continue;
        };
        let Some(weights) = drops.rarity_weights.get(&row.rarity_weight) else {
            warn!(
                crate_id = row.id,
                rarity_weight = row.rarity_weight,
                "Crate references missing rarity weights"
            );
            continue;
        };

        let odds = item_set_odds(set, &weights.weights, |reference| {
            let key = resolve(reference)?;
            Some(entities.items.get(&key).map_or_else(ItemTraits::default, |item| ItemTraits {
                gender: item.gender_id,
                rarity: item.rarity_id,
            }))
        });

        for (reference, odds) in odds {
            let Some(key) = resolve(reference) else {
                continue;
            };
            found.entry(key).or_default().push(Membership {
                crate_id: row.id,
                odds,
            });
        }
    }

    info!(items = found.len(), crates = drops.crates.len(), "Resolved crate contents");
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(refs: &[i64]) -> ItemSet {
        ItemSet {
            id: 1,
            default_item_weight: 1,
            item_references: refs.to_vec(),
            ..ItemSet::default()
        }
    }

    fn traits(table: &[(i64, i64)]) -> impl Fn(i64) -> Option<ItemTraits> + '_ {
        move |reference| {
            let i = usize::try_from(reference).ok()?;
            table.get(i).map(|&(gender, rarity)| ItemTraits { gender, rarity })
        }
    }

    fn ratio(n: i64, d: i64) -> Odds {
        Odds::ratio_or_zero(n, d)
    }

    #[test]
    fn test_gendered_tiers() {
        // 0: male common, 1: any common, 2: female uncommon
        let table = [(1, 1), (0, 1), (2, 2)];
        let odds = item_set_odds(&set(&[0, 1, 2]), &[3, 1, 0, 0], traits(&table));

        assert_eq!(odds[&0], GenderedOdds::new(ratio(3, 8), Odds::zero()));
        assert_eq!(odds[&1], GenderedOdds::new(ratio(3, 8), ratio(3, 4)));
        assert_eq!(odds[&2], GenderedOdds::new(Odds::zero(), ratio(1, 4)));
    }

    #[test]
    fn test_overrides_and_ignore_flags() {
        let table = [(1, 1), (2, 1)];
        let mut s = set(&[0, 1]);
        s.alter_item_weight_map.insert("1".into(), 3);
        s.ignore_gender = true;
        let odds = item_set_odds(&s, &[1, 0, 0, 0], traits(&table));
        assert_eq!(odds[&0], GenderedOdds::uniform(ratio(1, 4)));
        assert_eq!(odds[&1], GenderedOdds::uniform(ratio(3, 4)));

        let mut s = set(&[0, 1]);
        s.alter_rarity_map.insert("1".into(), 2);
        s.alter_gender_map.insert("0".into(), 0);
        let odds = item_set_odds(&s, &[1, 1, 0, 0], traits(&table));
        assert_eq!(odds[&0], GenderedOdds::uniform(ratio(1, 2)));
        assert_eq!(odds[&1], GenderedOdds::new(Odds::zero(), ratio(1, 2)));
    }

    #[test]
    fn test_unresolved_references_left_out() {
        let table = [(0, 0)];
        let odds = item_set_odds(&set(&[0, 7]), &[1, 0, 0, 0], traits(&table));
        assert_eq!(odds.len(), 1);
        assert_eq!(odds[&0], GenderedOdds::one());
    }

    #[test]
    fn test_no_weighted_tier_is_zero() {
        let table = [(0, 1)];
        let odds = item_set_odds(&set(&[0]), &[0, 5, 0, 0], traits(&table));
        assert!(odds[&0].male.is_zero());
    }

    proptest! {
        #[test]
        fn prop_weights_normalize_per_gender(
            items in prop::collection::vec((0i64..=2, 0i64..=4, 1i64..50), 1..8),
            rarity in prop::collection::vec(0i64..20, 4),
        ) {
            let table: Vec<(i64, i64)> = items.iter().map(|&(g, r, _)| (g, r)).collect();
            let refs: Vec<i64> = (0..items.len() as i64).collect();
            let mut s = set(&refs);
            for (i, &(_, _, w)) in items.iter().enumerate() {
                s.alter_item_weight_map.insert(i.to_string(), w);
            }
            let odds = item_set_odds(&s, &rarity, traits(&table));

            let has = |gender: i64, tier: i64| {
                items.iter().any(|&(g, r, _)| (g == 0 || g == gender) && (r == 0 || r == tier))
            };
            let tiers = || rarity.iter().zip(1i64..);
            let total: i64 = tiers().filter(|&(_, t)| has(MALE, t) || has(FEMALE, t)).map(|(w, _)| w).sum();
            let expected = |gender: i64| -> Odds {
                tiers()
                    .filter(|&(_, t)| has(gender, t))
                    .map(|(&w, _)| ratio(w, total))
                    .sum()
            };

            let male: Odds = odds.values().map(|o| &o.male).sum();
            let female: Odds = odds.values().map(|o| &o.female).sum();
            prop_assert_eq!(male, expected(MALE));
            prop_assert_eq!(female, expected(FEMALE));
        }

        #[test]
        fn prop_unisex_sets_sum_to_one(
            items in prop::collection::vec((0i64..=4, 1i64..50), 1..8),
            rarity in prop::collection::vec(1i64..20, 4),
        ) {
            let table: Vec<(i64, i64)> = items.iter().map(|&(r, _)| (0, r)).collect();
            let refs: Vec<i64> = (0..items.len() as i64).collect();
            let mut s = set(&refs);
            for (i, &(_, w)) in items.iter().enumerate() {
                s.alter_item_weight_map.insert(i.to_string(), w);
            }
            let odds = item_set_odds(&s, &rarity, traits(&table));

            let male: Odds = odds.values().map(|o| &o.male).sum();
            let female: Odds = odds.values().map(|o| &o.female).sum();
            prop_assert!(male.is_one());
            prop_assert_eq!(male, female);
        }
    }
}
