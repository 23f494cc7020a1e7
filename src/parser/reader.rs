//! Line-by-line reader for watchdog JSONL dumps.

use super::event::{decode_record, Event};
use crate::utils::error::ParseError;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Iterator over the records of a JSONL stream
///
/// Yields one `Result` per non-blank line. Line numbers in errors are
/// 1-based and count blank lines too.
pub struct EventReader<R> {
    lines: std::io::Lines<R>,
    line_number: usize,
}

impl<R: BufRead> EventReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<Event, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(ParseError::Io(e))),
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }
            return Some(decode_record(&line, self.line_number));
        }
    }
}

/// Decode every record of a stream, stopping at the first bad one
///
/// **Public** - main entry point for reading dumps
///
/// # Errors
/// * `ParseError::Io` - the stream could not be read
/// * `ParseError::MalformedRecord` - a line failed to decode
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<Event>, ParseError> {
    let events = EventReader::new(reader).collect::<Result<Vec<_>, _>>()?;
    debug!("Decoded {} records", events.len());
    Ok(events)
}

/// Open and decode a dump file
pub fn read_dump_file(path: impl AsRef<Path>) -> Result<Vec<Event>, ParseError> {
    let path = path.as_ref();
    debug!("Reading dump: {}", path.display());
    let file = File::open(path)?;
    read_events(BufReader::new(file))
}
