//! Configuration and constants for the CLI.

/// Current cache schema version
pub const CACHE_SCHEMA_VERSION: &str = "1.0.0";

/// Dump file names written by the watchdog: `.watchdog-<version>-<timestamp>.jsonl`
pub const DUMP_FILE_PATTERN: &str = r"^\.watchdog-([0-9]+)-([0-9]+)\.jsonl$";

/// Extension of the cached trace written next to a dump
pub const TRACE_EXTENSION: &str = "trace";

/// Depth of the trace index: pid, file, func, address
pub const TRACE_DEPTH: usize = 4;

// Labels shown in front of keys at each level of the trace index
pub const LEVEL_LABELS: [&str; TRACE_DEPTH] = ["PID", "file", "func", "address"];

/// Default number of levels expanded by the tree view
pub const DEFAULT_VIEW_DEPTH: usize = 4;

/// Default number of rows in the leak summary table
pub const DEFAULT_SUMMARY_ROWS: usize = 20;
