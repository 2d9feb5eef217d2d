//! Batch derivation of every configured build

use crate::config::Config;
use crate::file_io;
use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One build to derive
#[derive(Debug, Clone)]
pub struct Job {
    pub name: String,
    pub dir: PathBuf,
    pub server_data: PathBuf,
    pub patches: Vec<String>,
}

/// Builds under `output_root` that have a config entry, optionally limited to `only`
pub fn plan(config: &Config, output_root: &Path, server_data_root: &Path, only: &[String]) -> Result<Vec<Job>> {
    let mut jobs = Vec::new();
    for dir in file_io::build_dirs(output_root)? {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !only.is_empty() && !only.contains(&name) {
            continue;
        }
        let Some(build) = config.build(&name) else {
            warn!(build = %name, "Build has no config entry, skipping");
            continue;
        };
        jobs.push(Job {
            server_data: build.server_data.dir(server_data_root),
            patches: build.server_data.patches.clone(),
            name,
            dir,
        });
    }
    Ok(jobs)
}

/// Derive one build and write its tables to `<build>/info`
pub fn run(job: &Job) -> Result<()> {
    let derived = super::derive_one(&job.dir, &job.server_data, &job.patches)?;
    let tables = derived.to_tables()?;
    file_io::write_tables(&job.dir.join("info"), &tables)?;
    info!(build = %job.name, tables = tables.len(), "Wrote derived info");
    Ok(())
}

pub fn handle(config_path: &Path, output_root: &Path, server_data_root: &Path, only: &[String]) -> Result<()> {
    let config = Config::load(config_path)?;
    let jobs = plan(&config, output_root, server_data_root, only)?;
    if jobs.is_empty() {
        println!("No configured builds found under {}", output_root.display());
        return Ok(());
    }

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let results: Vec<(&str, Result<()>)> = jobs
        .par_iter()
        .map(|job| {
            pb.set_message(job.name.clone());
            let result = run(job);
            pb.inc(1);
            (job.name.as_str(), result)
        })
        .collect();

    pb.finish_with_message("Done");

    let mut failed = 0;
    for (name, result) in &results {
        if let Err(e) = result {
            eprintln!("Build {} failed: {:#}", name, e);
            failed += 1;
        }
    }
    eprintln!("Derived: {}, Failed: {}", results.len() - failed, failed);

    if failed > 0 {
        bail!("{} of {} builds failed", failed, results.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup() -> (tempfile::TempDir, PathBuf) {
        let root = tempfile::tempdir().unwrap();
        let output = root.path().join("out");
        for build in ["beta", "retro", "stray"] {
            fs::create_dir_all(output.join(build)).unwrap();
        }
        let config = root.path().join("config.yml");
        fs::write(
            &config,
            "config:\n  beta:\n    server-data:\n      repository: /tabledata\n      patches: [\"1013\"]\n  \
             retro:\n    server-data:\n      repository: retro\n",
        )
        .unwrap();
        (root, config)
    }

    #[test]
    fn test_plan_skips_unconfigured_builds() {
        let (root, config_path) = setup();
        let config = Config::load(&config_path).unwrap();
        let server = root.path().join("server");

        let jobs = plan(&config, &root.path().join("out"), &server, &[]).unwrap();
        let names: Vec<&str> = jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["beta", "retro"]);
        assert_eq!(jobs[0].server_data, server.join("tabledata"));
        assert_eq!(jobs[0].patches, vec!["1013"]);

        let only = plan(&config, &root.path().join("out"), &server, &["retro".to_string()]).unwrap();
        assert_eq!(only.len(), 1);
    }

    #[test]
    fn test_failed_builds_fail_the_batch() {
        let (root, config_path) = setup();
        // Neither build has inputs, so both fail without stopping each other
        let err = handle(&config_path, &root.path().join("out"), &root.path().join("server"), &[]).unwrap_err();
        assert_eq!(err.to_string(), "2 of 2 builds failed");
        assert!(!root.path().join("out/beta/info").exists());
    }
}
