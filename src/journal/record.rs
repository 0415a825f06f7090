//! History record format.
//!
//! One accepted request per line, oldest first:
//!
//! ```text
//! Join,<student>,<unit>
//! Leave,<student>,<unit>
//! SwitchUc,<student>,<current unit>,<next unit>
//! SwitchClass,<student>,<unit>,<current class>,<next class>
//! ```
//!
//! The undo flag is not part of the record: a replayed undo is an ordinary
//! request. Writing a record is `Request`'s `Display`; parsing lives here
//! so that errors can carry the line number.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use super::RequestLog;
use crate::error::{RecordError, RecordErrorKind, Result};
use crate::models::Request;

impl FromStr for Request {
    type Err = RecordError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        parse_record(line, 0)
    }
}

fn parse_record(line: &str, line_no: usize) -> std::result::Result<Request, RecordError> {
    let fail = |kind| RecordError {
        line: line_no,
        kind,
    };
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
    let tag = fields[0];
    let expected = match tag {
        "Join" | "Leave" => 3,
        "SwitchUc" => 4,
        "SwitchClass" => 5,
        other => return Err(fail(RecordErrorKind::UnknownTag(other.to_string()))),
    };
    if fields.len() != expected {
        return Err(fail(RecordErrorKind::FieldCount {
            tag: tag.to_string(),
            expected,
            found: fields.len(),
        }));
    }
    if let Some(position) = fields.iter().position(|f| f.trim().is_empty()) {
        return Err(fail(RecordErrorKind::EmptyField(position)));
    }

    let f = |i: usize| fields[i].trim();
    Ok(match tag {
        "Join" => Request::join(f(1), f(2)),
        "Leave" => Request::leave(f(1), f(2)),
        "SwitchUc" => Request::switch_unit(f(1), f(2), f(3)),
        _ => Request::switch_class(f(1), f(2), f(3), f(4)),
    })
}

/// Reads history records into a replay queue, oldest first.
///
/// Blank lines are skipped.
pub fn read_history<R: BufRead>(reader: R) -> Result<VecDeque<Request>> {
    let mut queue = VecDeque::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        queue.push_back(parse_record(&line, index + 1)?);
    }
    Ok(queue)
}

/// Writes the log's history, oldest first.
pub fn write_history<W: Write>(mut writer: W, log: &RequestLog) -> Result<()> {
    for request in log.history() {
        writeln!(writer, "{request}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Loads a history file. A missing file is an empty history.
pub fn load_history_file(path: impl AsRef<Path>) -> Result<VecDeque<Request>> {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => read_history(BufReader::new(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no history file, starting fresh");
            Ok(VecDeque::new())
        }
        Err(err) => Err(err.into()),
    }
}

/// Writes the log's history to a file, replacing it.
pub fn save_history_file(path: impl AsRef<Path>, log: &RequestLog) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_history(BufWriter::new(file), log)
}
