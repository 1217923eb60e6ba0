//! Observation record type.
//!
//! One record per CSV row. The three label-tool columns (`tag`, `label`,
//! `notes`) have defined defaults when the source table lacks them; every
//! other column is carried through untouched so a rewrite never loses data.

use serde_json::{Map, Value};

pub const OBSID_COLUMN: &str = "obsid";
pub const TAG_COLUMN: &str = "tag";
pub const LABEL_COLUMN: &str = "label";
pub const NOTES_COLUMN: &str = "notes";

/// Tag value meaning "never saved"
pub const UNSET_TAG: &str = "0";

/// Delimiter joining individual notes into the stored `notes` field
pub const NOTES_DELIMITER: &str = ";";

#[derive(Debug, Clone)]
pub struct StarRecord {
    /// Integer observation identifier, unique across the table
    pub obsid: i64,
    /// Per-observation save counter, string-encoded; "0" until first save
    pub tag: String,
    /// Free-text classification label
    pub label: String,
    /// Annotations joined by [`NOTES_DELIMITER`]
    pub notes: String,
    /// Passthrough columns from the source CSV, in header order
    pub extra: Vec<(String, String)>,
}

impl StarRecord {
    /// Split the stored notes field into individual annotations,
    /// trimming whitespace and dropping empty segments.
    pub fn notes_list(&self) -> Vec<String> {
        self.notes
            .split(NOTES_DELIMITER)
            .map(|note| note.trim())
            .filter(|note| !note.is_empty())
            .map(String::from)
            .collect()
    }

    /// Next value of the save counter. "0" is treated as unset, so the
    /// counter starts at "1"; any other value increments by one.
    pub fn next_tag(&self) -> String {
        let current: i64 = self.tag.trim().parse().unwrap_or(0);
        (current + 1).to_string()
    }

    /// Value of a column by name, checking the fixed fields first.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            OBSID_COLUMN => Some(self.obsid.to_string()),
            TAG_COLUMN => Some(self.tag.clone()),
            LABEL_COLUMN => Some(self.label.clone()),
            NOTES_COLUMN => Some(self.notes.clone()),
            _ => self
                .extra
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone()),
        }
    }

    /// Full row as a JSON object, keyed by the given header order.
    /// All values are strings, matching what a CSV round-trip produces.
    pub fn to_json(&self, headers: &[String]) -> Value {
        let mut map = Map::new();
        for header in headers {
            map.insert(
                header.clone(),
                Value::String(self.field(header).unwrap_or_default()),
            );
        }
        Value::Object(map)
    }
}
