//! Command handlers for xdtinfo CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod derive;
pub mod sources;
pub mod validity;

use crate::file_io;
use anyhow::{Context, Result};
use std::path::Path;
use xdtinfo::DerivedInfo;

/// Load and derive one build in memory
pub fn derive_one(build_dir: &Path, server_data_dir: &Path, patches: &[String]) -> Result<DerivedInfo> {
    let inputs = file_io::load_inputs(build_dir, server_data_dir, patches)?;
    xdtinfo::derive(&inputs).with_context(|| format!("Failed to derive {}", build_dir.display()))
}
