//! JSON trace cache and view export.
//!
//! The cache stores a built trace index next to its dump so later runs can
//! skip the build. It is wrapped in a small versioned envelope.

use super::validate_path;
use crate::trace::{EventHistory, TraceIndex};
use crate::tree::Branch;
use crate::utils::config::{CACHE_SCHEMA_VERSION, TRACE_EXTENSION};
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Envelope written to disk
#[derive(Debug, Serialize)]
struct CacheOut<'a> {
    version: &'a str,
    source: String,
    generated_at: String,
    trace: &'a Branch<EventHistory>,
}

/// Envelope read back; the trace is decoded only once the version matches
#[derive(Debug, Deserialize)]
struct CacheIn {
    version: String,
    #[serde(default)]
    source: String,
    trace: serde_json::Value,
}

/// Cache file path for a dump: same name, `.trace` extension
pub fn cache_path_for(dump_path: &Path) -> PathBuf {
    dump_path.with_extension(TRACE_EXTENSION)
}

/// Write the index to the cache if it was freshly built
///
/// **Public** - main entry point for cache output
///
/// # Returns
/// `true` if a file was written, `false` if the index was already persisted
///
/// # Errors
/// * `OutputError::Io` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn save_trace(
    index: &mut TraceIndex,
    source: &Path,
    output_path: impl AsRef<Path>,
) -> Result<bool, OutputError> {
    let output_path = output_path.as_ref();

    if !index.is_dirty() {
        debug!("Trace unchanged, not saving: {}", output_path.display());
        return Ok(false);
    }

    info!("Saving trace: '{}' ...", output_path.display());

    let envelope = CacheOut {
        version: CACHE_SCHEMA_VERSION,
        source: source.display().to_string(),
        generated_at: Utc::now().to_rfc3339(),
        trace: index.root(),
    };
    write_json(&envelope, output_path)?;
    index.mark_saved();

    info!(
        "Trace written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(true)
}

/// Load a cached index
///
/// # Errors
/// * `OutputError::Io` - File read error
/// * `OutputError::SerializationFailed` - JSON parse error
/// * `OutputError::IncompatibleVersion` - written by another cache schema
/// * `OutputError::InvalidShape` - tree is not a valid trace index
pub fn load_trace(input_path: impl AsRef<Path>) -> Result<TraceIndex, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading trace from: {}", input_path.display());

    let file = File::open(input_path)?;
    let envelope: CacheIn = serde_json::from_reader(BufReader::new(file))?;

    if envelope.version != CACHE_SCHEMA_VERSION {
        return Err(OutputError::IncompatibleVersion {
            found: envelope.version,
            expected: CACHE_SCHEMA_VERSION.to_string(),
        });
    }

    let root: Branch<EventHistory> = serde_json::from_value(envelope.trace)?;
    let index = TraceIndex::from_loaded(root)?;

    debug!(
        "Trace loaded: version {}, source '{}'",
        envelope.version, envelope.source
    );

    Ok(index)
}

/// Export a (filtered) tree as pretty JSON
pub fn write_tree(
    tree: &Branch<EventHistory>,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Exporting view to: {}", output_path.display());
    write_json(tree, output_path)
}

fn write_json<T: Serialize + ?Sized>(value: &T, output_path: &Path) -> Result<(), OutputError> {
    validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    Ok(())
}

/// Calculate file size in bytes
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
