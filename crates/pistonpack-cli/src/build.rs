//! Build command implementation.
//!
//! Maps "build target T" and "build all" onto the orchestrator and turns
//! the aggregated results into output and an exit status: zero when every
//! attempted target succeeded, non-zero otherwise.

use anyhow::{Context, Result};
use pistonpack_build::{BuildConfig, BuildResult, Orchestrator};

/// Run the build command for a single target.
pub fn run_target(config_path: &str, target: &str) -> Result<()> {
    let orchestrator = load_orchestrator(config_path)?;

    println!("Building target: {target}");
    let result = orchestrator
        .build_target(target)
        .with_context(|| format!("No such target: {target}"))?;

    print_result(&result);

    if !result.is_success() {
        anyhow::bail!("target {target} failed");
    }

    Ok(())
}

/// Run the build command for every enabled target.
pub fn run_all(config_path: &str) -> Result<()> {
    let orchestrator = load_orchestrator(config_path)?;

    println!("Building all enabled targets");
    let results = orchestrator.build_all();

    for result in &results {
        print_result(result);
    }

    let failed = results.iter().filter(|result| !result.is_success()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} targets failed", results.len());
    }

    println!("\n✓ All targets built");
    Ok(())
}

fn load_orchestrator(config_path: &str) -> Result<Orchestrator> {
    let config = BuildConfig::from_file(config_path)
        .with_context(|| format!("Failed to load build configuration: {config_path}"))?;

    Ok(Orchestrator::new(config))
}

fn print_result(result: &BuildResult) {
    match &result.outcome {
        Ok(artifact) => {
            println!(
                "✓ {}: {} ({} bytes, {} entries)",
                result.target_id,
                artifact.archive_path.display(),
                artifact.size_bytes,
                artifact.file_count
            );
            println!("  sha256: {}", artifact.checksum);
        }
        Err(err) => {
            println!("✗ {}: {err}", result.target_id);
        }
    }
}
