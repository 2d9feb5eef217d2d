//! Identifier types shared by every derived table
//!
//! Raw tables use `0` (and sometimes `-1`) to mean "no reference". Derived
//! records never carry those sentinels: an absent reference is `None`.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Separator used in composite string identifiers (`"09::0042"`)
pub const SEP: &str = "::";

/// Item slot that holds reward containers ("crates")
pub const CRATE_SLOT: u8 = 9;

/// Template id of an NPC or mob
pub type ActorTypeId = i64;
/// Egg (collectible) template id
pub type EggTypeId = i64;
/// Mission id
pub type MissionId = i64;
/// Instance (zone) id, `0` is the open world
pub type InstanceId = i64;
/// Warp (transition) id
pub type WarpId = i64;
/// Reward container id
pub type CrateId = i64;

/// Convert a raw reference to `Some(id)` unless it is a "no reference" sentinel.
pub fn present(id: i64) -> Option<i64> {
    (id > 0).then_some(id)
}

/// Composite item identifier: the item table slot plus the id inside it.
///
/// The same numeric id exists in several slots (a weapon 12 and a hat 12 are
/// different items), so the slot is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub slot: u8,
    pub id: i64,
}

impl ItemKey {
    pub fn new(slot: u8, id: i64) -> Self {
        Self { slot, id }
    }

    /// The item key under which a crate appears in the item tables
    pub fn of_crate(crate_id: CrateId) -> Self {
        Self::new(CRATE_SLOT, crate_id)
    }

    pub fn is_crate(&self) -> bool {
        self.slot == CRATE_SLOT
    }

    /// Build a key from raw `(type, id)` columns, rejecting slots that do not fit.
    pub fn from_raw(slot: i64, id: i64) -> Option<Self> {
        u8::try_from(slot).ok().map(|slot| Self::new(slot, id))
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{}{:04}", self.slot, SEP, self.id)
    }
}

/// Error returned when parsing an [`ItemKey`] from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid item key: {0:?}")]
pub struct ParseItemKeyError(pub String);

impl FromStr for ItemKey {
    type Err = ParseItemKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseItemKeyError(s.to_string());
        let (slot, id) = s.split_once(SEP).ok_or_else(err)?;
        let slot = slot.trim().parse::<u8>().map_err(|_| err())?;
        let id = id.trim().parse::<i64>().map_err(|_| err())?;
        Ok(Self::new(slot, id))
    }
}

impl Serialize for ItemKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Join an id and a display name into a tag (`"42::Name"`)
pub fn tag(id: impl fmt::Display, name: &str) -> String {
    if name.is_empty() {
        id.to_string()
    } else {
        format!("{id}{SEP}{name}")
    }
}
