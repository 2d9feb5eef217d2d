//! Reading build inputs and writing derived tables

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use xdtinfo::{RawInputs, ServerData, ServerPatch, SERVER_FILES};

/// Read and parse one JSON file
pub fn load_json(path: &Path) -> Result<Value> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

/// Load `NPCs.json`, `mobs.json`, `eggs.json`, `drops.json` and `paths.json`
pub fn load_server_data(dir: &Path) -> Result<ServerData> {
    let mut data = ServerData::default();
    for stem in SERVER_FILES {
        let value = load_json(&dir.join(format!("{stem}.json")))?;
        if let Some(slot) = data.file_mut(stem) {
            *slot = value;
        }
    }
    Ok(data)
}

/// Load `patch/<name>/<file>.json` overlays; files a patch lacks are skipped
pub fn load_patches(dir: &Path, names: &[String]) -> Result<Vec<ServerPatch>> {
    let mut patches = Vec::with_capacity(names.len());
    for name in names {
        let patch_dir = dir.join("patch").join(name);
        if !patch_dir.is_dir() {
            warn!(patch = %name, dir = %patch_dir.display(), "Patch directory not found");
        }

        let mut files = IndexMap::new();
        for stem in SERVER_FILES {
            let path = patch_dir.join(format!("{stem}.json"));
            if path.is_file() {
                files.insert(stem.to_string(), load_json(&path)?);
            }
        }
        debug!(patch = %name, files = files.len(), "Loaded patch");
        patches.push(ServerPatch {
            name: name.clone(),
            files,
        });
    }
    Ok(patches)
}

/// Everything needed to derive the build in `build_dir`
pub fn load_inputs(build_dir: &Path, server_data_dir: &Path, patches: &[String]) -> Result<RawInputs> {
    Ok(RawInputs {
        areas: load_json(&build_dir.join("areas.json"))?,
        xdt: load_json(&build_dir.join("xdt.json"))?,
        server: load_server_data(server_data_dir)?,
        patches: load_patches(server_data_dir, patches)?,
    })
}

/// Write each table as pretty JSON to `<dir>/<name>.json`
pub fn write_tables(dir: &Path, tables: &IndexMap<&'static str, Value>) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    for (name, value) in tables {
        let path = dir.join(format!("{name}.json"));
        let json = serde_json::to_string_pretty(value).context("Failed to serialize table")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Immediate subdirectories, sorted by name
pub fn build_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("Failed to list {}", root.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
