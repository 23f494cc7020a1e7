//! Watchdog record parsing.
//!
//! This module handles:
//! - The schema of a single allocation record
//! - Decoding and validating JSONL dumps

pub mod event;
pub mod reader;

// Re-export main types
pub use event::{decode_record, Address, Event, Key, Relocation};
pub use reader::{read_dump_file, read_events, EventReader};
