//! Build configuration for the derive command
//!
//! ```yaml
//! config:
//!   beta-20100104:
//!     server-data:
//!       repository: /OpenFusion/tabledata
//!       patches: ["1013"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub config: BTreeMap<String, BuildConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    #[serde(rename = "server-data")]
    pub server_data: ServerDataConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerDataConfig {
    /// Path of the checkout under the server data root
    pub repository: String,
    #[serde(default)]
    pub patches: Vec<String>,
}

impl ServerDataConfig {
    /// Directory of this build's server data under `root`
    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(self.repository.trim_matches('/'))
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Settings of one build, if configured
    pub fn build(&self, name: &str) -> Option<&BuildConfig> {
        self.config.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(
            &path,
            "config:\n  beta:\n    server-data:\n      repository: /OpenFusion/tabledata/\n      patches: [\"1013\"]\n  \
             retro:\n    server-data:\n      repository: retro\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        let beta = &config.build("beta").unwrap().server_data;
        assert_eq!(beta.patches, vec!["1013"]);
        assert_eq!(beta.dir(Path::new("/data")), PathBuf::from("/data/OpenFusion/tabledata"));
        assert!(config.build("retro").unwrap().server_data.patches.is_empty());
        assert!(config.build("missing").is_none());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.yml"));
    }
}
