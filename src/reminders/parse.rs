//! Decoding of bulk query output.
//!
//! `get {p1, p2} of every reminder` prints every value of every matching
//! reminder as one comma-separated line with no record delimiter. Date values
//! print as `date Monday, April 22, 2024 at 6:00:00 PM`, carrying their own
//! commas. [`split_fields`] walks the line once, treating commas inside a
//! date literal as text; records are then rebuilt from the known property
//! count.
//!
//! Commas in free text (a name or body) are indistinguishable from field
//! separators and shift every later record in the batch. Records are not
//! re-aligned after that happens.

use std::collections::BTreeMap;

use tracing::warn;

/// One decoded record: property name to raw value text.
pub type RawRecord = BTreeMap<String, String>;

/// Value text AppleScript prints for an unset property.
pub const MISSING_VALUE: &str = "missing value";

const DATE_TOKEN: &str = "date";

/// Whether the field ends with an `AM`/`PM` meridian whose `M` was just read.
fn ends_with_meridian(field: &str) -> bool {
    let Some(head) = field
        .strip_suffix("AM")
        .or_else(|| field.strip_suffix("PM"))
        .or_else(|| field.strip_suffix("am"))
        .or_else(|| field.strip_suffix("pm"))
    else {
        return false;
    };
    head.chars()
        .next_back()
        .is_some_and(|c| c.is_whitespace() || c.is_ascii_digit())
}

fn finish_field(field: &str, was_date: bool) -> String {
    let trimmed = field.trim();
    if was_date {
        if let Some(rest) = trimmed.strip_prefix(DATE_TOKEN) {
            return rest.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Split a flattened value line into trimmed fields.
///
/// A field whose text starts with the `date` token is a date literal: commas
/// are kept until its trailing meridian `M` has been read, and the `date`
/// prefix is dropped from the value.
#[must_use]
pub fn split_fields(raw: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_date = false;
    let mut was_date = false;

    for ch in raw.chars() {
        if ch == ',' && !in_date {
            fields.push(finish_field(&current, was_date));
            current.clear();
            was_date = false;
            continue;
        }

        current.push(ch);

        if in_date {
            if matches!(ch, 'M' | 'm') && ends_with_meridian(&current) {
                in_date = false;
            }
        } else if ch.is_whitespace() && current.trim() == DATE_TOKEN {
            in_date = true;
            was_date = true;
        }
    }

    if in_date {
        warn!(field = current.trim(), "date literal without meridian, kept to end of output");
    }
    fields.push(finish_field(&current, was_date));
    fields
}

fn assemble<S: AsRef<str>>(fields: Vec<String>, properties: &[S]) -> Vec<RawRecord> {
    let width = properties.len();
    if width == 0 || fields.len() < width {
        if !fields.is_empty() && width > 0 {
            warn!(fields = fields.len(), properties = width, "too few fields for one record");
        }
        return Vec::new();
    }

    let remainder = fields.len() % width;
    if remainder != 0 {
        warn!(
            fields = fields.len(),
            properties = width,
            discarded = remainder,
            "field count is not a multiple of the property count"
        );
    }

    fields
        .chunks_exact(width)
        .map(|chunk| {
            properties
                .iter()
                .map(|p| p.as_ref().to_string())
                .zip(chunk.iter().cloned())
                .collect()
        })
        .collect()
}

/// Rebuild records from a flattened text line.
///
/// Exactly `properties.len()` fields make one record. Otherwise fields are
/// taken `properties.len()` at a time, in order; a trailing partial record
/// is dropped.
#[must_use]
pub fn parse_records<S: AsRef<str>>(raw: &str, properties: &[S]) -> Vec<RawRecord> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    assemble(split_fields(raw), properties)
}

fn flatten_into(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Array(items) => items.iter().for_each(|v| flatten_into(v, out)),
        serde_json::Value::Object(map) => map.values().for_each(|v| flatten_into(v, out)),
        serde_json::Value::Null => out.push(MISSING_VALUE.to_string()),
        serde_json::Value::String(s) => out.push(s.trim().to_string()),
        other => out.push(other.to_string()),
    }
}

/// Rebuild records from structured output, flattened in order.
#[must_use]
pub fn parse_structured<S: AsRef<str>>(value: &serde_json::Value, properties: &[S]) -> Vec<RawRecord> {
    let mut fields = Vec::new();
    flatten_into(value, &mut fields);
    assemble(fields, properties)
}

/// Extract the id from `make new reminder` output (`reminder id <id> ...`).
#[must_use]
pub fn parse_reminder_id(output: &str) -> Option<String> {
    let (_, rest) = output.split_once("reminder id ")?;
    let id = rest
        .split_whitespace()
        .next()?
        .trim_matches('"')
        .to_string();
    (!id.is_empty()).then_some(id)
}

/// Split `get name of lists` output into list names.
#[must_use]
pub fn parse_list_names(output: &str) -> Vec<String> {
    output
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
