use std::fs;
use std::path::Path;
use watchdog_analyzer::commands::{execute_analyze, load_or_build, AnalyzeArgs};
use watchdog_analyzer::output::{cache_path_for, load_trace};
use watchdog_analyzer::source::Dump;

const FIXTURE: &str = include_str!("fixtures/.watchdog-1-1700000000.jsonl");

fn write_dump(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, FIXTURE).unwrap();
    path
}

#[test]
fn test_analyze_writes_cache_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let dump_path = write_dump(dir.path(), ".watchdog-1-1700000000.jsonl");
    let export = dir.path().join("out/leaks.json");

    let args = AnalyzeArgs {
        path: Some(dump_path.clone()),
        view: watchdog_analyzer::aggregator::View::Leaks,
        summary: true,
        export: Some(export.clone()),
        ..Default::default()
    };
    execute_analyze(args).unwrap();

    let cached = load_trace(cache_path_for(&dump_path)).unwrap();
    assert_eq!(cached.stats().events, 5);

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert!(exported["42"]["main.c"]["load"]["0x20"].is_array());
    assert!(exported["42"]["main.c"].get("main").is_none());
}

#[test]
fn test_analyze_no_save_leaves_no_cache() {
    let dir = tempfile::tempdir().unwrap();
    let dump_path = write_dump(dir.path(), ".watchdog-1-1700000000.jsonl");

    let args = AnalyzeArgs {
        scan: Some(dir.path().to_path_buf()),
        no_save: true,
        ..Default::default()
    };
    execute_analyze(args).unwrap();

    assert!(!cache_path_for(&dump_path).exists());
}

#[test]
fn test_stale_cache_is_rebuilt() {
    let dir = tempfile::tempdir().unwrap();
    let dump_path = write_dump(dir.path(), ".watchdog-1-1700000000.jsonl");
    fs::write(
        cache_path_for(&dump_path),
        r#"{"version": "0.1.0", "trace": {}}"#,
    )
    .unwrap();

    let dump = Dump::open(&dump_path).unwrap();
    let index = load_or_build(&dump, false).unwrap();

    assert!(index.is_dirty());
    assert_eq!(index.stats().events, 5);
}

#[test]
fn test_valid_cache_is_reused() {
    let dir = tempfile::tempdir().unwrap();
    let dump_path = write_dump(dir.path(), ".watchdog-1-1700000000.jsonl");
    let dump = Dump::open(&dump_path).unwrap();

    let mut built = load_or_build(&dump, false).unwrap();
    watchdog_analyzer::output::save_trace(&mut built, dump.path(), cache_path_for(dump.path()))
        .unwrap();

    let reused = load_or_build(&dump, false).unwrap();
    assert!(!reused.is_dirty());
    assert_eq!(reused.root(), built.root());

    let rebuilt = load_or_build(&dump, true).unwrap();
    assert!(rebuilt.is_dirty());
}

#[test]
fn test_malformed_dump_fails() {
    let dir = tempfile::tempdir().unwrap();
    let dump_path = dir.path().join(".watchdog-1-5.jsonl");
    fs::write(&dump_path, "{\"pid\": 1}\n").unwrap();

    let args = AnalyzeArgs {
        path: Some(dump_path),
        ..Default::default()
    };
    assert!(execute_analyze(args).is_err());
}
