//! cloudharness - resolve and deploy cloud catalog addons from the command line
//!
//! The binary is a thin front end over the library: it loads an addon
//! manifest, resolves the dependency graph against the catalog, and either
//! prints the deployment plan or submits it to a project.

mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Resolve and deploy cloud catalog addons
#[derive(Parser, Debug)]
#[command(name = "cloudharness")]
#[command(about = "Resolve and deploy cloud catalog addons and their dependencies", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// Path to a harness configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve an addon manifest and print the deployment order
    Plan {
        /// Path to the addon manifest YAML
        manifest: PathBuf,
    },
    /// Resolve an addon manifest and deploy it into a project
    Deploy {
        /// Path to the addon manifest YAML
        manifest: PathBuf,
        /// Target project ID
        #[arg(long)]
        project_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    cli::init_logging(args.debug);

    match args.command {
        Command::Plan { manifest } => {
            cli::handle_plan_command(&manifest, args.config.as_deref()).await
        }
        Command::Deploy {
            manifest,
            project_id,
        } => cli::handle_deploy_command(&manifest, &project_id, args.config.as_deref()).await,
    }
}
