//! AppleScript date literals.
//!
//! Grammar: `[Weekday, ]Month Day, Year[ at HH:MM[:SS][ AM/PM]]`.
//!
//! Encoding always produces the full form,
//! `Monday, April 22, 2024 at 06:00:00 PM`; a date without a time of day
//! encodes as midnight. Decoding a literal back into a structured value is
//! not supported: the host renders literals in the user's locale, and
//! [`OsaDate::to_datetime`] reports that instead of guessing.

use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

static RE_OSA_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
        (?:[A-Za-z]+,\s*)?
        [A-Za-z]+\s+\d{1,2},\s+\d{4}
        (?:\s+at\s+\d{1,2}:\d{2}(?::\d{2})?(?:\s*[APap][Mm])?)?
        $",
    )
    .expect("valid date literal regex")
});

/// Whether `value` matches the AppleScript date literal grammar.
#[must_use]
pub fn is_osa_date(value: &str) -> bool {
    RE_OSA_DATE.is_match(value.trim())
}

/// A validated AppleScript date literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsaDate(String);

/// Decoding literals into dates is not implemented.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("decoding AppleScript date literals is unsupported: {literal}")]
pub struct UnsupportedDecode {
    pub literal: String,
}

impl OsaDate {
    /// Wrap an existing literal, if it matches the grammar.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        is_osa_date(value).then(|| Self(value.trim().to_string()))
    }

    /// Encode a date and time of day.
    #[must_use]
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self(dt.format("%A, %B %-d, %Y at %I:%M:%S %p").to_string())
    }

    /// Encode a calendar date at midnight.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_datetime(date.and_time(chrono::NaiveTime::MIN))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode back into a date and time.
    ///
    /// # Errors
    ///
    /// Always fails with [`UnsupportedDecode`].
    pub fn to_datetime(&self) -> Result<NaiveDateTime, UnsupportedDecode> {
        Err(UnsupportedDecode {
            literal: self.0.clone(),
        })
    }
}

impl fmt::Display for OsaDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
