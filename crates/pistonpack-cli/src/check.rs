//! Check command implementation.

use anyhow::Result;
use pistonpack_build::Manifest;

/// Load and validate the plugin manifest.
pub fn run(manifest_path: &str) -> Result<()> {
    println!("Checking manifest: {manifest_path}");

    let manifest = Manifest::load(manifest_path)?;

    println!("✓ Plugin: {} v{}", manifest.name, manifest.version);
    println!("✓ Description: {}", manifest.description);
    if manifest.authors.is_empty() {
        println!("✓ Authors: (none)");
    } else {
        println!("✓ Authors: {}", manifest.authors.join(", "));
    }
    println!("\nManifest is valid!");

    Ok(())
}
