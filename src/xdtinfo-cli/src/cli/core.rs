//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xdtinfo")]
#[command(about = "Derived info compiler for extracted game tables", long_about = None)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive info for every build under the output root
    #[command(visible_alias = "d")]
    Derive {
        /// YAML file mapping build names to their server data
        config: PathBuf,

        /// Directory holding one directory per build (with areas.json and xdt.json)
        output_root: PathBuf,

        /// Directory the server data repositories are checked out under
        server_data_root: PathBuf,

        /// Only derive these builds (repeatable)
        #[arg(short, long = "build")]
        builds: Vec<String>,
    },

    /// Show every way to obtain an item (sorted by probability, highest first)
    #[command(visible_alias = "s")]
    Sources {
        /// Build directory with areas.json and xdt.json
        build_dir: PathBuf,

        /// Server data directory with NPCs.json, mobs.json, eggs.json, drops.json and paths.json
        server_data_dir: PathBuf,

        /// Item name or "slot::id" key (e.g. "Blaster", "00::0005")
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Server data patch to apply, in order (repeatable)
        #[arg(short, long = "patch")]
        patches: Vec<String>,
    },

    /// Count in-game entities per kind
    #[command(visible_alias = "v")]
    Validity {
        /// Build directory with areas.json and xdt.json
        build_dir: PathBuf,

        /// Server data directory
        server_data_dir: PathBuf,

        /// Server data patch to apply, in order (repeatable)
        #[arg(short, long = "patch")]
        patches: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_query_and_patches() {
        let cli = Cli::parse_from([
            "xdtinfo", "sources", "build", "server", "Mystery", "Box", "--patch", "1013", "-p", "academy",
        ]);
        let Commands::Sources { query, patches, .. } = cli.command else {
            panic!("expected sources command");
        };
        assert_eq!(query, vec!["Mystery", "Box"]);
        assert_eq!(patches, vec!["1013", "academy"]);
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["xdtinfo", "validity", "build", "server", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
