//! Line-oriented text format of the mirror file.
//!
//! ```text
//! **MINDSYNC-1197537175369949199**
//! message body, any number of lines
//! **MINDSYNC-1197537175369949200<<<1197537175369940000**
//! body of a remind
//! ```
//!
//! Records are framed by title lines only. Nothing is escaped, so a body line
//! that is itself a title line splits the record on the next load.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::app::{MindsyncError, Result};
use crate::domain::Item;
use crate::store::order::sorted_for_persist;

pub const TITLE_PREFIX: &str = "**MINDSYNC-";
pub const TITLE_SUFFIX: &str = "**";
pub const REMIND_SEPARATOR: &str = "<<<";

/// Splits a title line into `(id, remind_of)`, or `None` for a body line.
pub fn parse_title(line: &str) -> Option<(String, Option<String>)> {
    let payload = line.strip_prefix(TITLE_PREFIX)?.strip_suffix(TITLE_SUFFIX)?;
    let mut parts = payload.split(REMIND_SEPARATOR);
    let id = parts.next().unwrap_or_default().to_string();
    let remind_of = parts.next().map(String::from);
    Some((id, remind_of))
}

pub fn title_line(item: &Item) -> String {
    match &item.remind_of {
        Some(remind) => format!(
            "{}{}{}{}{}",
            TITLE_PREFIX, item.id, REMIND_SEPARATOR, remind, TITLE_SUFFIX
        ),
        None => format!("{}{}{}", TITLE_PREFIX, item.id, TITLE_SUFFIX),
    }
}

/// Record being accumulated until the next title line.
struct Pending {
    id: String,
    remind_of: Option<String>,
    lines: Vec<String>,
}

impl Pending {
    fn finish(self) -> Item {
        Item {
            id: self.id,
            message: Some(self.lines.join("\n")),
            remind_of: self.remind_of,
            ..Item::default()
        }
    }
}

/// Reads every record of a mirror file. Later records win over earlier ones
/// with the same id; text before the first title line is dropped.
pub fn decode<R: BufRead>(mut reader: R) -> Result<HashMap<String, Item>> {
    let mut items = HashMap::new();
    let mut pending: Option<Pending> = None;
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        let line = std::str::from_utf8(&buf).map_err(|e| MindsyncError::StoreFormat {
            line: line_no,
            reason: e.to_string(),
        })?;

        match parse_title(line) {
            Some((id, remind_of)) => {
                if let Some(done) = pending.take() {
                    let item = done.finish();
                    items.insert(item.id.clone(), item);
                }
                pending = Some(Pending {
                    id,
                    remind_of,
                    lines: Vec::new(),
                });
            }
            None => {
                if let Some(record) = pending.as_mut() {
                    record.lines.push(line.to_string());
                }
            }
        }
    }

    if let Some(done) = pending {
        let item = done.finish();
        items.insert(item.id.clone(), item);
    }

    tracing::debug!("Decoded {} items from {} lines", items.len(), line_no);
    Ok(items)
}

/// Writes items in persist order. Each message is followed by exactly one
/// newline, which [`decode`] consumes again.
pub fn encode<W: Write>(items: Vec<Item>, mut writer: W) -> Result<()> {
    for item in sorted_for_persist(items) {
        writeln!(writer, "{}", title_line(&item))?;
        writeln!(writer, "{}", item.message.as_deref().unwrap_or(""))?;
    }
    writer.flush()?;
    Ok(())
}
