use std::fmt;
use std::iter;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};

use crate::{CalendarError, CalendarResult};

const LOCAL_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Reduces a stored date or timestamp to the calendar day it names.
///
/// Accepts a plain `YYYY-MM-DD` date, an RFC 3339 timestamp or a local
/// date-time. Timestamps keep the day as written in their own offset, so
/// `2024-03-25T23:30:00-05:00` is the 25th and never shifts to the 26th.
pub fn parse_calendar_day(s: &str) -> CalendarResult<NaiveDate> {
    let raw = s.trim();
    if raw.is_empty() {
        return Err(CalendarError::MissingDate);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            LOCAL_DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|dt| dt.date())
        })
        .ok_or_else(|| CalendarError::InvalidDate(raw.to_string()))
}

/// Number of days in `month` of `year`, taken from the day before the first
/// of the following month. `None` when the month is not a calendar month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1)?;

    let (next_year, next_month) = match month {
        12 => (year + 1, 1),
        _ => (year, month + 1),
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

/// Column of the first day of the month in a grid whose column 0 is
/// `week_start`.
pub fn first_weekday_offset(year: i32, month: u32, week_start: WeekStart) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|first| week_start.offset(first.weekday()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn offset(self, weekday: Weekday) -> u32 {
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday(),
            WeekStart::Monday => weekday.num_days_from_monday(),
        }
    }

    /// The seven weekdays in grid column order.
    pub fn weekdays(self) -> impl Iterator<Item = Weekday> {
        let first = match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        };
        iter::successors(Some(first), |day| Some(day.succ())).take(7)
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            other => Err(format!("expected `sunday` or `monday`, got `{other}`")),
        }
    }
}

/// A year and month; the unit the calendar grid is drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
    days: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let days = days_in_month(year, month)?;
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { first, days })
    }

    pub fn containing(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn first_weekday_offset(&self, week_start: WeekStart) -> u32 {
        week_start.offset(self.first.weekday())
    }

    /// The following month. Stays put at the last month chrono can represent.
    #[must_use]
    pub fn succ(self) -> Self {
        let (year, month) = match self.month() {
            12 => (self.year() + 1, 1),
            month => (self.year(), month + 1),
        };
        Self::new(year, month).unwrap_or(self)
    }

    /// The preceding month. Stays put at the first month chrono can represent.
    #[must_use]
    pub fn pred(self) -> Self {
        let (year, month) = match self.month() {
            1 => (self.year() - 1, 12),
            month => (self.year(), month - 1),
        };
        Self::new(year, month).unwrap_or(self)
    }

    /// Human readable heading, e.g. `March 2024`.
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidMonth(s.to_string());

        let (year, month) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;

        Self::new(year, month).ok_or_else(invalid)
    }
}
