use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt::{self, Debug, Display};
use time::{
    Date as TimeDate, Month,
    format_description::BorrowedFormatItem,
    macros::format_description,
};

const ISO_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

///
/// Date
///
/// Calendar date with day granularity.
/// Parsing truncates any time-of-day component, so `2020-01-05 13:45:00`
/// and `2020-01-05` produce the same value.
///

#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Date(TimeDate);

impl Date {
    #[must_use]
    pub fn new_checked(y: i32, m: u8, d: u8) -> Option<Self> {
        let month = Month::try_from(m).ok()?;
        let date = TimeDate::from_calendar_date(y, month, d).ok()?;

        Some(Self(date))
    }

    /// Returns the year component (e.g. 2025)
    #[must_use]
    pub const fn year(self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1–12)
    #[must_use]
    pub fn month(self) -> u8 {
        self.0.month().into()
    }

    /// Returns the day-of-month component (1–31)
    #[must_use]
    pub const fn day(self) -> u8 {
        self.0.day()
    }

    /// Parse an ISO `YYYY-MM-DD` string, or a datetime whose date part is
    /// followed by a space or `T`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let date_part = s.trim().split([' ', 'T']).next()?;

        TimeDate::parse(date_part, ISO_FORMAT).ok().map(Self)
    }
}

impl Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date({self})")
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.format(ISO_FORMAT).map_err(|_| fmt::Error)?;

        f.write_str(&text)
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Self::parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: '{raw}'")))
    }
}

///
/// TESTS
///
