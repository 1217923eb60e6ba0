//! Append-only log of save actions.
//!
//! One comma-joined line per save: `obsid,label,notes,new_tag`. The log is
//! independent of the table file and never rewritten; its only consumer is
//! the last-obsid lookup used for cross-session resume. Fields are not
//! escaped, so a note containing a comma makes the line ambiguous — known
//! limitation, kept as-is until the desired escaping is settled.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Append one save action to the log, creating the file (and its parent
/// directory) on first use.
pub fn append(
    path: &Path,
    obsid: i64,
    label: &str,
    notes: &str,
    new_tag: &str,
) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().append(true).create(true).open(path)?;
    writeln!(file, "{},{},{},{}", obsid, label, notes, new_tag)?;
    Ok(())
}

/// The obsid field of the most recent log line, or None when the log is
/// absent or empty.
pub fn last_entry(path: &Path) -> io::Result<Option<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    Ok(content
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| line.split(',').next())
        .map(String::from))
}
