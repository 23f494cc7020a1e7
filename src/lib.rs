//! watchdog-analyzer
//!
//! Offline analysis of memory watchdog dumps: every allocation, free and
//! relocation of an instrumented process, recorded one JSON object per line.
//!
//! The dump is folded into a `pid → file → func → address → history` index
//! that follows blocks across relocations. Views over the index are produced
//! by a generic tree filter; the leak view keeps the addresses whose most
//! recent event still holds memory.
//!
//! ## Getting Started
//!
//! ```bash
//! watchdog-analyzer analyze --scan /tmp --view leaks --summary
//! watchdog-analyzer --help
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod source;
pub mod trace;
pub mod tree;
pub mod utils;
