//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Locates the dump (given directly or newest in a directory)
//! 2. Loads the cached trace, or builds it from the dump
//! 3. Saves the cache if the trace was rebuilt
//! 4. Filters the requested view
//! 5. Renders the tree, plus optional export and summary

use super::models::AnalyzeArgs;
use crate::aggregator::{get_leaks, render_summary, select_view, summarize_leaks};
use crate::output::{build_display_tree, cache_path_for, load_trace, save_trace, write_tree};
use crate::source::Dump;
use crate::trace::TraceIndex;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Dump cannot be located
/// * Dump contains a malformed record
/// * Cache or export cannot be written
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();
    validate_args(&args)?;

    info!("Step 1/5: Locating dump...");
    let dump = locate_dump(&args)?;
    if let Some(recorded_at) = dump.recorded_at() {
        info!(
            "Dump version {} recorded at {}",
            dump.version(),
            recorded_at.to_rfc3339()
        );
    }

    info!("Step 2/5: Loading trace...");
    let mut index = load_or_build(&dump, args.no_cache)?;
    let stats = index.stats();
    debug!(
        "Trace: {} processes, {} files, {} functions, {} addresses, {} events",
        stats.processes, stats.files, stats.functions, stats.addresses, stats.events
    );

    if args.no_save {
        info!("Step 3/5: Skipping cache save (--no-save)");
    } else {
        info!("Step 3/5: Saving cache...");
        let cache_path = cache_path_for(dump.path());
        save_trace(&mut index, dump.path(), &cache_path)
            .with_context(|| format!("Failed to save trace cache {}", cache_path.display()))?;
    }

    info!("Step 4/5: Selecting view: {}", args.view.title());
    let tree = select_view(&index, args.view);

    info!("Step 5/5: Writing output...");
    if let Some(export_path) = &args.export {
        write_tree(&tree, export_path).context("Failed to export view")?;
        info!("✓ View exported to: {}", export_path.display());
    }

    println!("{}", build_display_tree(args.view.title(), &tree).render(args.depth));

    if args.summary {
        let summary = summarize_leaks(&get_leaks(&index));
        println!("\n{}", render_summary(&summary, args.top));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Find the dump named by the arguments
///
/// **Private** - internal helper for execute_analyze
fn locate_dump(args: &AnalyzeArgs) -> Result<Dump> {
    match (&args.path, &args.scan) {
        (Some(path), _) => {
            Dump::open(path).with_context(|| format!("Cannot use dump {}", path.display()))
        }
        (None, Some(dir)) => Dump::scan_directory(dir)
            .with_context(|| format!("Cannot find a dump in {}", dir.display())),
        (None, None) => anyhow::bail!("Either a dump path or --scan <dir> is required"),
    }
}

/// Load the cached trace for a dump, rebuilding it when the cache is
/// missing, disabled, or unusable
///
/// **Public** - also used by integration tests
pub fn load_or_build(dump: &Dump, no_cache: bool) -> Result<TraceIndex> {
    let cache_path = cache_path_for(dump.path());

    if no_cache {
        debug!("Cache disabled, building from dump");
    } else if cache_path.is_file() {
        match load_trace(&cache_path) {
            Ok(index) => {
                info!("✓ Loaded cached trace: {}", cache_path.display());
                return Ok(index);
            }
            Err(e) => warn!(
                "Ignoring cached trace {}: {}; rebuilding",
                cache_path.display(),
                e
            ),
        }
    }

    TraceIndex::from_dump(dump.path())
        .with_context(|| format!("Failed to build trace from {}", dump.path().display()))
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    match (&args.path, &args.scan) {
        (None, None) => anyhow::bail!("Either a dump path or --scan <dir> is required"),
        (Some(_), Some(_)) => anyhow::bail!("A dump path and --scan cannot be used together"),
        _ => {}
    }

    if args.depth == 0 {
        anyhow::bail!("depth must be greater than 0");
    }

    if args.top == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if let Some(export) = &args.export {
        if export.as_os_str().is_empty() {
            anyhow::bail!("Export path cannot be empty");
        }
    }

    Ok(())
}
