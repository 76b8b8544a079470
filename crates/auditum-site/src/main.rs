//! Auditum site CLI - builds the Auditum documentation and marketing website.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod site;

#[derive(Parser)]
#[command(name = "auditum-site")]
#[command(about = "Build tooling for the Auditum website")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to site.toml config file
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Path to the landing page features file
    #[arg(short, long, default_value = "features.toml")]
    features: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter site into the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Validate the configuration and referenced files without writing output
    Check,

    /// Print the route table
    Routes,

    /// Build the static site
    Build {
        /// Output directory
        #[arg(short, long, default_value = "build")]
        output: PathBuf,

        /// Feature blocks per row on the landing page
        #[arg(long, default_value = "3")]
        columns: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes)?;
        }
        Commands::Check => {
            commands::check::run(&cli.config, &cli.features)?;
        }
        Commands::Routes => {
            commands::routes::run(&cli.config)?;
        }
        Commands::Build { output, columns } => {
            commands::build::run(&cli.config, &cli.features, output, columns)?;
        }
    }

    Ok(())
}
