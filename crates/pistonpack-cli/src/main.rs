//! pistonpack CLI - Multi-target plugin build tool
//!
//! Commands:
//! - `pistonpack build <target>` - Build one target platform
//! - `pistonpack build-all` - Build every enabled target
//! - `pistonpack targets` - List registered targets
//! - `pistonpack check` - Validate the plugin manifest

use clap::{Parser, Subcommand};

mod build;
mod check;
mod targets;

#[derive(Parser)]
#[command(name = "pistonpack")]
#[command(author, version, about = "Build tool for Piston Core plugins", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one target platform, even if it is disabled
    Build {
        /// Target id (e.g., spigot, fabric)
        target: String,

        /// Path to the build configuration
        #[arg(short, long, default_value = pistonpack_build::CONFIG_FILE)]
        config: String,
    },

    /// Build every enabled target, continuing past failures
    BuildAll {
        /// Path to the build configuration
        #[arg(short, long, default_value = pistonpack_build::CONFIG_FILE)]
        config: String,
    },

    /// List registered targets
    Targets,

    /// Validate the plugin manifest
    Check {
        /// Path to the plugin manifest
        #[arg(short, long, default_value = pistonpack_build::MANIFEST_FILE)]
        manifest: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { target, config } => {
            build::run_target(&config, &target)?;
        }
        Commands::BuildAll { config } => {
            build::run_all(&config)?;
        }
        Commands::Targets => {
            targets::run();
        }
        Commands::Check { manifest } => {
            check::run(&manifest)?;
        }
    }

    Ok(())
}
