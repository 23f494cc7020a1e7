use crate::parser::read_dump_file;
use crate::source::parse_dump_name;
use crate::trace::build_index;
use crate::utils::config::CACHE_SCHEMA_VERSION;
use anyhow::{Context, Result};
use chrono::DateTime;
use std::path::Path;

/// Decode every record of a dump and print what it contains
pub fn validate_dump_file(file_path: &Path) -> Result<()> {
    println!("Validating dump: {}", file_path.display());

    let events = read_dump_file(file_path)
        .with_context(|| format!("Invalid dump {}", file_path.display()))?;
    let relocations = events.iter().filter(|e| e.is_relocation()).count();
    let index = build_index(events);
    let stats = index.stats();

    println!("✓ Valid watchdog dump");
    if let Some((version, timestamp)) = file_path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(parse_dump_name)
    {
        println!("  Version: {}", version);
        let recorded = i64::try_from(timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        if let Some(recorded) = recorded {
            println!("  Recorded: {}", recorded.to_rfc3339());
        }
    }
    println!("  Events: {}", stats.events);
    println!("  Relocations: {}", relocations);
    println!("  Processes: {}", stats.processes);
    println!("  Files: {}", stats.files);
    println!("  Functions: {}", stats.functions);
    println!("  Addresses: {}", stats.addresses);

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("watchdog-analyzer v{}", env!("CARGO_PKG_VERSION"));
    println!("Trace cache schema: v{}", CACHE_SCHEMA_VERSION);
    println!();
    println!("Browse allocation histories and leaks recorded by the memory watchdog.");
}
