//! Version command implementation.

use crate::error::Result;
use crate::sync::SyncTarget;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    targets: Vec<&'a str>,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build = if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    };
    let targets: Vec<&str> = SyncTarget::ALL.iter().map(SyncTarget::name).collect();

    if json {
        let output = VersionOutput {
            version,
            build,
            targets,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("taskr version {version} ({build})");
    println!("sync targets: {}", targets.join(", "));
    Ok(())
}
