mod cli;
mod commands;
mod config;
mod file_io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::*;

fn init_tracing(verbose: bool) {
    let default = if verbose { "xdtinfo=debug,xdtinfo_cli=debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Derive {
            config,
            output_root,
            server_data_root,
            builds,
        } => {
            commands::derive::handle(&config, &output_root, &server_data_root, &builds)?;
        }

        Commands::Sources {
            build_dir,
            server_data_dir,
            query,
            patches,
        } => {
            commands::sources::handle(&build_dir, &server_data_dir, &query.join(" "), &patches)?;
        }

        Commands::Validity {
            build_dir,
            server_data_dir,
            patches,
        } => {
            commands::validity::handle(&build_dir, &server_data_dir, &patches)?;
        }
    }

    Ok(())
}
