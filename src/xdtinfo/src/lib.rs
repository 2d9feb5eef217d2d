//! Derived-info compiler for extracted game content
//!
//! Takes the normalized tables produced by the extraction stage (the `xdt`
//! bundle, world areas and the server's placement and drop data) and compiles
//! them into cross-referenced records:
//!
//! - enriched per-entity tables (items, NPCs, mobs, eggs, missions, zones...)
//! - spatial lookups from world coordinates to named areas
//! - a forward and reverse item/source graph with exact drop probabilities
//! - "in game" / "obtainable" flags propagated from live placement data
//!
//! # Pipeline
//!
//! ```text
//! RawInputs ─► Tables ─► Entities ─► SpawnIndex ─► ResolvedSources ─► validity
//!               │  (raw, drops)        (grouping)    (sources)
//!               └─► AreaIndex (area)
//! ```
//!
//! [`derive`] runs every stage in order. Each stage is also callable on its own
//! with exactly the outputs it reads.

pub mod area;
pub mod drops;
pub mod entities;
pub mod grouping;
pub mod ids;
pub mod odds;
pub mod patch;
pub mod pipeline;
pub mod raw;
pub mod reference;
pub mod sources;
pub mod validity;

#[cfg(test)]
mod testutil;

pub use area::{Area, AreaIndex};
pub use drops::{DropTable, DropTables, ReferenceIndex, RowKey};
pub use entities::Entities;
pub use grouping::{AreaContents, SpawnIndex};
pub use ids::{ItemKey, ParseItemKeyError};
pub use odds::{GenderedOdds, Odds};
pub use pipeline::{derive, DerivedInfo, RawInputs, ServerData, ServerPatch, SERVER_FILES};
pub use sources::{Diagnostic, ResolvedSources, Source, SourceKind, SourceRecord};
pub use validity::{LiveSet, ValiditySummary};

/// Errors from deriving a build
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A raw row is missing an expected field or has the wrong type
    #[error("Malformed table {table}: {source}")]
    SchemaShape {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing table: {0}")]
    MissingTable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn shape(table: impl Into<String>, source: serde_json::Error) -> Self {
        Error::SchemaShape {
            table: table.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
