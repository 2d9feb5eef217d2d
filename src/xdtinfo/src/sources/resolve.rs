//! Recursive resolution through nested crates
//!
//! An item's sources are its own sources plus, for every crate holding it,
//! the crate's sources scaled by the odds of drawing the item from that
//! crate. Crates may sit inside other crates to any depth.

use super::types::{Contribution, Diagnostic, Membership, Source, SourceKind, SourceRecord};
use crate::ids::{ActorTypeId, InstanceId, ItemKey};
use crate::odds::GenderedOdds;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{error, info};

use super::types::Bounds;

/// Item -> how to get it, plus the reverse `kind -> source -> item` view
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedSources {
    pub by_item: IndexMap<ItemKey, Vec<SourceRecord>>,
    pub by_source: IndexMap<SourceKind, IndexMap<String, IndexMap<ItemKey, Contribution>>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolvedSources {
    pub fn sources_of(&self, item: &ItemKey) -> &[SourceRecord] {
        self.by_item.get(item).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Crates on the way from an item back to itself
type Cycle = Vec<ItemKey>;

struct Resolver<'a> {
    own: &'a HashMap<ItemKey, Vec<SourceRecord>>,
    memberships: &'a HashMap<ItemKey, Vec<Membership>>,
    memo: HashMap<ItemKey, Vec<SourceRecord>>,
    path: Vec<ItemKey>,
}

impl Resolver<'_> {
    fn sources_of(&mut self, key: ItemKey) -> Result<Vec<SourceRecord>, Cycle> {
        if let Some(done) = self.memo.get(&key) {
            return Ok(done.clone());
        }
        if let Some(start) = self.path.iter().position(|k| *k == key) {
            let mut cycle = self.path[start..].to_vec();
            cycle.push(key);
            return Err(cycle);
        }

        self.path.push(key);
        let expanded = self.expand(key);
        self.path.pop();

        let found = expanded?;
        self.memo.insert(key, found.clone());
        Ok(found)
    }

    fn expand(&mut self, key: ItemKey) -> Result<Vec<SourceRecord>, Cycle> {
        let mut found = self.own.get(&key).cloned().unwrap_or_default();
        let memberships = self.memberships;
        for membership in memberships.get(&key).map(Vec::as_slice).unwrap_or_default() {
            let outer = self.sources_of(ItemKey::of_crate(membership.crate_id))?;
            found.extend(outer.iter().map(|r| r.through(&membership.odds)));
        }
        Ok(found)
    }
}

type KillKey = (ActorTypeId, InstanceId, Bounds);

fn kill_key(record: &SourceRecord) -> Option<KillKey> {
    match (record.kind, record.source.as_ref()) {
        (SourceKind::Kill, Source::Kill(k)) => Some((k.mob_type_id, k.instance_id, k.bounds)),
        _ => None,
    }
}

/// Sum kill sources of the same spawn group; the first occurrence keeps its
/// position and payload
pub fn merge_kills(records: Vec<SourceRecord>) -> Vec<SourceRecord> {
    let mut merged: Vec<SourceRecord> = Vec::with_capacity(records.len());
    let mut seen: HashMap<KillKey, usize> = HashMap::new();

    for record in records {
        if let Some(key) = kill_key(&record) {
            if let Some(&at) = seen.get(&key) {
                let existing = &mut merged[at];
                let sum = existing.odds.take().unwrap_or_else(GenderedOdds::one)
                    + record.odds.unwrap_or_else(GenderedOdds::one);
                existing.odds = Some(sum);
                continue;
            }
            seen.insert(key, merged.len());
        }
        merged.push(record);
    }

    merged
}

/// Resolve every item in `items`, in order
pub fn resolve_items(
    items: impl IntoIterator<Item = ItemKey>,
    own: &HashMap<ItemKey, Vec<SourceRecord>>,
    memberships: &HashMap<ItemKey, Vec<Membership>>,
) -> ResolvedSources {
    let mut resolver = Resolver {
        own,
        memberships,
        memo: HashMap::new(),
        path: Vec::new(),
    };
    let mut resolved = ResolvedSources::default();

    for item in items {
        match resolver.sources_of(item) {
            Ok(found) if found.is_empty() => {}
            Ok(found) => {
                resolved.by_item.insert(item, merge_kills(found));
            }
            Err(path) => {
                let rendered: Vec<String> = path.iter().map(ItemKey::to_string).collect();
                error!(item = %item, path = %rendered.join(" -> "), "Crate contains itself, item left without sources");
                resolved.diagnostics.push(Diagnostic::ContainerCycle { item, path });
            }
        }
    }

    for (item, records) in &resolved.by_item {
        for record in records {
            resolved
                .by_source
                .entry(record.kind)
                .or_default()
                .entry(record.source.tag())
                .or_default()
                .insert(*item, record.contribution());
        }
    }
    resolved.by_source.sort_keys();

    info!(
        items = resolved.by_item.len(),
        cycles = resolved.diagnostics.len(),
        "Resolved item sources"
    );
    resolved
}
