//! Locating watchdog dump files.
//!
//! The watchdog names its dumps `.watchdog-<version>-<timestamp>.jsonl`.
//! A dump can be given directly or picked as the newest one in a directory.

use crate::utils::config::DUMP_FILE_PATTERN;
use crate::utils::error::LocateError;
use chrono::{DateTime, Utc};
use log::{debug, info};
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A dump file with the version and timestamp from its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump {
    path: PathBuf,
    version: u64,
    timestamp: u64,
}

fn dump_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(DUMP_FILE_PATTERN).expect("dump file pattern is valid"))
}

/// Extract `(version, timestamp)` from a dump file name
pub fn parse_dump_name(name: &str) -> Option<(u64, u64)> {
    let captures = dump_pattern().captures(name)?;
    let version = captures.get(1)?.as_str().parse().ok()?;
    let timestamp = captures.get(2)?.as_str().parse().ok()?;
    Some((version, timestamp))
}

impl Dump {
    /// Use a dump file given directly
    ///
    /// # Errors
    /// * `LocateError::NotFound` - path does not exist
    /// * `LocateError::NotAFile` - path is not a regular file
    /// * `LocateError::UnrecognizedName` - name does not match the dump pattern
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LocateError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LocateError::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(LocateError::NotAFile(path.to_path_buf()));
        }

        let (version, timestamp) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(parse_dump_name)
            .ok_or_else(|| LocateError::UnrecognizedName(path.to_path_buf()))?;

        Ok(Self {
            path: path.to_path_buf(),
            version,
            timestamp,
        })
    }

    /// Pick the dump with the most recent timestamp in a directory
    ///
    /// Entries whose names do not match the dump pattern are ignored.
    ///
    /// # Errors
    /// * `LocateError::NotFound` / `LocateError::NotADirectory` - bad directory
    /// * `LocateError::NoDumps` - no matching file found
    pub fn scan_directory(dir: impl AsRef<Path>) -> Result<Self, LocateError> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Err(LocateError::NotFound(dir.to_path_buf()));
        }
        if !dir.is_dir() {
            return Err(LocateError::NotADirectory(dir.to_path_buf()));
        }

        info!("Scanning directory: '{}' ...", dir.display());

        let mut newest: Option<Dump> = None;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let Some((version, timestamp)) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(parse_dump_name)
            else {
                continue;
            };
            if !path.is_file() {
                continue;
            }

            debug!("Found dump candidate: {}", path.display());
            let candidate = Dump {
                path,
                version,
                timestamp,
            };
            let is_newer = newest
                .as_ref()
                .map_or(true, |best| candidate.sort_key() > best.sort_key());
            if is_newer {
                newest = Some(candidate);
            }
        }

        let dump = newest.ok_or_else(|| LocateError::NoDumps(dir.to_path_buf()))?;
        info!("Detected dump: '{}'", dump);
        Ok(dump)
    }

    fn sort_key(&self) -> (u64, u64) {
        (self.timestamp, self.version)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Timestamp from the file name as a UTC time, if it is in range
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        let seconds = i64::try_from(self.timestamp).ok()?;
        DateTime::from_timestamp(seconds, 0)
    }
}

impl fmt::Display for Dump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_dump_name() {
        assert_eq!(parse_dump_name(".watchdog-2-1700000000.jsonl"), Some((2, 1700000000)));
        assert_eq!(parse_dump_name("watchdog-2-1700000000.jsonl"), None);
        assert_eq!(parse_dump_name(".watchdog-2-1700000000.jsonl.bak"), None);
        assert_eq!(parse_dump_name(".watchdog-x-1.jsonl"), None);
    }

    #[test]
    fn test_open_valid_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".watchdog-1-1700000000.jsonl");
        fs::write(&path, "").unwrap();

        let dump = Dump::open(&path).unwrap();
        assert_eq!(dump.version(), 1);
        assert_eq!(dump.timestamp(), 1_700_000_000);
        assert_eq!(dump.path(), path.as_path());
        assert_eq!(
            dump.recorded_at().map(|t| t.to_rfc3339()),
            Some("2023-11-14T22:13:20+00:00".to_string())
        );
    }

    #[test]
    fn test_open_rejects_bad_paths() {
        let dir = tempfile::tempdir().unwrap();

        let missing = Dump::open(dir.path().join(".watchdog-1-1.jsonl"));
        assert!(matches!(missing, Err(LocateError::NotFound(_))));

        assert!(matches!(Dump::open(dir.path()), Err(LocateError::NotAFile(_))));

        let other = dir.path().join("dump.jsonl");
        fs::write(&other, "").unwrap();
        assert!(matches!(Dump::open(&other), Err(LocateError::UnrecognizedName(_))));
    }

    #[test]
    fn test_scan_picks_newest_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            ".watchdog-3-100.jsonl",
            ".watchdog-1-300.jsonl",
            ".watchdog-2-200.jsonl",
            "notes.txt",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let dump = Dump::scan_directory(dir.path()).unwrap();
        assert_eq!(dump.timestamp(), 300);
        assert_eq!(dump.version(), 1);
    }

    #[test]
    fn test_scan_without_dumps() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        assert!(matches!(
            Dump::scan_directory(dir.path()),
            Err(LocateError::NoDumps(_))
        ));
    }

    #[test]
    fn test_scan_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(".watchdog-1-1.jsonl");
        fs::write(&file, "").unwrap();

        assert!(matches!(
            Dump::scan_directory(&file),
            Err(LocateError::NotADirectory(_))
        ));
    }
}
