//! Typed property payloads for Reminders commands.

use chrono::{NaiveDate, NaiveDateTime};

use super::date::{OsaDate, is_osa_date};

/// One property value in a create/update payload.
#[derive(Debug, Clone, PartialEq)]
pub enum OsaValue {
    /// AppleScript `missing value`.
    Missing,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl OsaValue {
    /// Render as AppleScript source.
    ///
    /// Text that already matches the date literal grammar is emitted as a
    /// date; any other text is quoted with `\` and `"` escaped.
    #[must_use]
    pub fn to_script(&self) -> String {
        match self {
            Self::Missing => "missing value".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Real(x) => x.to_string(),
            Self::Date(dt) => format!("date \"{}\"", OsaDate::from_datetime(*dt)),
            Self::Text(s) if is_osa_date(s) => format!("date \"{}\"", s.trim()),
            Self::Text(s) => quote(s),
        }
    }
}

/// Quote a string literal for AppleScript.
#[must_use]
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

impl From<bool> for OsaValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OsaValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u8> for OsaValue {
    fn from(value: u8) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for OsaValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for OsaValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OsaValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for OsaValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDate> for OsaValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value.and_time(chrono::NaiveTime::MIN))
    }
}

impl<T: Into<OsaValue>> From<Option<T>> for OsaValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Ordered property name → value payload.
///
/// Insertion order is kept so generated commands are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, OsaValue)>,
}

impl Properties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any earlier value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OsaValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OsaValue>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OsaValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OsaValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as an AppleScript record body: `name:"x", priority:5`.
    #[must_use]
    pub fn to_script(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{name}:{}", value.to_script()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_value_formatting_table() {
        assert_eq!(OsaValue::Missing.to_script(), "missing value");
        assert_eq!(OsaValue::from(None::<String>).to_script(), "missing value");
        assert_eq!(OsaValue::from(true).to_script(), "true");
        assert_eq!(OsaValue::from(false).to_script(), "false");
        assert_eq!(OsaValue::from(9_i64).to_script(), "9");
        assert_eq!(OsaValue::from(2.5).to_script(), "2.5");
        assert_eq!(OsaValue::from("Buy milk").to_script(), "\"Buy milk\"");
    }

    #[test]
    fn test_text_quotes_are_escaped() {
        assert_eq!(
            OsaValue::from(r#"say "hi" \o/"#).to_script(),
            r#""say \"hi\" \\o/""#
        );
    }

    #[test]
    fn test_dates_render_as_date_literals() {
        let dt = NaiveDate::from_ymd_opt(2024, 4, 22)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(
            OsaValue::from(dt).to_script(),
            "date \"Monday, April 22, 2024 at 06:00:00 PM\""
        );
        assert_eq!(
            OsaValue::from("April 22, 2024 at 6:00:00 PM").to_script(),
            "date \"April 22, 2024 at 6:00:00 PM\""
        );
    }

    #[test]
    fn test_properties_keep_order_and_replace() {
        let props = Properties::new()
            .with("name", "Buy milk")
            .with("priority", 5_i64)
            .with("name", "Buy oat milk");

        assert_eq!(props.len(), 2);
        assert_eq!(props.to_script(), "name:\"Buy oat milk\", priority:5");
    }
}
