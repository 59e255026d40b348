use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime, PrimitiveDateTime};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Canonical `YYYY-MM-DD` key of a calendar day.
///
/// Built from the date's own calendar fields. Date-times are never shifted to UTC first,
/// so any moment of the same local day maps to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(#[serde(with = "iso_date")] Date);

impl DateKey {
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    pub fn date(self) -> Date {
        self.0
    }

    pub fn parse(raw: &str) -> Result<Self, time::error::Parse> {
        Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).map(Self)
    }
}

impl From<Date> for DateKey {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl From<PrimitiveDateTime> for DateKey {
    fn from(dt: PrimitiveDateTime) -> Self {
        Self(dt.date())
    }
}

impl From<OffsetDateTime> for DateKey {
    // keyed in the value's own offset, not UTC
    fn from(dt: OffsetDateTime) -> Self {
        Self(dt.date())
    }
}

impl FromStr for DateKey {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}
