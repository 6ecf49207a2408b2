//! Targets command implementation.

use pistonpack_build::TargetRegistry;

/// List registered targets with their build-all status.
pub fn run() {
    let registry = TargetRegistry::builtin();

    println!("Registered targets:");
    for spec in registry.iter() {
        let status = if spec.enabled { "enabled" } else { "disabled" };
        println!("  {:<10} {:<10} {}", spec.id, spec.display_name, status);
    }
}
