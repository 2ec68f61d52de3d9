// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Plain calendar value types.
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`DaySplit`] | A timestamp split into whole days and second-of-day |
//! | [`CivilDate`] | Proleptic Gregorian `(year, month, day)` |
//! | [`DateTime`] | [`CivilDate`] plus `(hour, min, sec, ms)` |
//! | [`Weekday`] | Day of week, Sunday = 0 |
//! | [`Month`] | Month of year, January = 1 |
//! | [`NameCase`] | Rendering variant for month and weekday names |

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Signed seconds split into whole days and a non-negative second-of-day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DaySplit {
    pub days: i64,
    /// Always in `[0, 86399]`.
    pub sec_of_day: i64,
}

/// A proleptic Gregorian calendar date.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CivilDate {
    pub year: i64,
    pub month: i32,
    pub day: i32,
}

impl CivilDate {
    #[inline]
    pub const fn new(year: i64, month: i32, day: i32) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Civil date and wall time, without leap seconds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DateTime {
    pub year: i64,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub min: i32,
    pub sec: i32,
    pub ms: i32,
}

impl DateTime {
    /// Build from all seven fields. No validation is performed.
    #[inline]
    pub const fn new(
        year: i64,
        month: i32,
        day: i32,
        hour: i32,
        min: i32,
        sec: i32,
        ms: i32,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            min,
            sec,
            ms,
        }
    }

    /// Midnight of the given date.
    #[inline]
    pub const fn from_date(date: CivilDate) -> Self {
        Self::new(date.year, date.month, date.day, 0, 0, 0, 0)
    }

    #[inline]
    pub const fn date(&self) -> CivilDate {
        CivilDate::new(self.year, self.month, self.day)
    }
}

impl From<CivilDate> for DateTime {
    fn from(date: CivilDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            self.year, self.month, self.day, self.hour, self.min, self.sec, self.ms
        )
    }
}

/// Name rendering variants for months and weekdays.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NameCase {
    /// `"SUN"`, `"JAN"`.
    Uppercase,
    /// `"Sun"`, `"Jan"`.
    Short,
    /// `"Sunday"`, `"January"`.
    Full,
}

const WEEKDAY_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const WEEKDAY_UPPER: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
const WEEKDAY_FULL: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTH_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTH_UPPER: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const MONTH_FULL: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Day of week; the discriminant is the `0..=6` encoding used by
/// [`weekday_of_ts`](crate::weekday_of_ts).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Weekday {
    Sun = 0,
    Mon = 1,
    Tue = 2,
    Wed = 3,
    Thu = 4,
    Fri = 5,
    Sat = 6,
}

impl Weekday {
    const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Map any integer onto a weekday with floor-mod 7.
    #[inline]
    pub const fn from_index(index: i64) -> Self {
        Self::ALL[crate::floor_math::floor_mod(index, 7) as usize]
    }

    #[inline]
    pub const fn index(self) -> i64 {
        self as i64
    }

    /// ISO 8601 numbering, Monday = 1 … Sunday = 7.
    #[inline]
    pub const fn iso_number(self) -> i64 {
        match self {
            Weekday::Sun => 7,
            other => other as i64,
        }
    }

    #[inline]
    pub const fn is_weekend(self) -> bool {
        matches!(self, Weekday::Sat | Weekday::Sun)
    }

    pub const fn name(self, case: NameCase) -> &'static str {
        let i = self as usize;
        match case {
            NameCase::Uppercase => WEEKDAY_UPPER[i],
            NameCase::Short => WEEKDAY_SHORT[i],
            NameCase::Full => WEEKDAY_FULL[i],
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name(NameCase::Full))
    }
}

/// Month of year, January = 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Month {
    Jan = 1,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// `None` unless `number ∈ 1..=12`.
    #[inline]
    pub const fn from_number(number: i32) -> Option<Self> {
        if number >= 1 && number <= 12 {
            Some(Self::ALL[(number - 1) as usize])
        } else {
            None
        }
    }

    #[inline]
    pub const fn number(self) -> i32 {
        self as i32
    }

    pub const fn name(self, case: NameCase) -> &'static str {
        let i = self as usize - 1;
        match case {
            NameCase::Uppercase => MONTH_UPPER[i],
            NameCase::Short => MONTH_SHORT[i],
            NameCase::Full => MONTH_FULL[i],
        }
    }

    /// Case-insensitive lookup of an English short or full month name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|m| {
            m.name(NameCase::Short).eq_ignore_ascii_case(name)
                || m.name(NameCase::Full).eq_ignore_ascii_case(name)
        })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name(NameCase::Full))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_from_index_wraps() {
        assert_eq!(Weekday::from_index(0), Weekday::Sun);
        assert_eq!(Weekday::from_index(-1), Weekday::Sat);
        assert_eq!(Weekday::from_index(11), Weekday::Thu);
        assert_eq!(Weekday::Sun.iso_number(), 7);
        assert_eq!(Weekday::Mon.iso_number(), 1);
    }

    #[test]
    fn test_names() {
        assert_eq!(Weekday::Wed.name(NameCase::Uppercase), "WED");
        assert_eq!(Weekday::Wed.name(NameCase::Short), "Wed");
        assert_eq!(Weekday::Wed.name(NameCase::Full), "Wednesday");
        assert_eq!(Month::Sep.name(NameCase::Uppercase), "SEP");
        assert_eq!(Month::Sep.name(NameCase::Full), "September");
    }

    #[test]
    fn test_month_lookup() {
        assert_eq!(Month::from_name("jan"), Some(Month::Jan));
        assert_eq!(Month::from_name("DECEMBER"), Some(Month::Dec));
        assert_eq!(Month::from_name("Sept"), None);
        assert_eq!(Month::from_number(13), None);
        assert_eq!(Month::from_number(2).map(Month::number), Some(2));
    }

    #[test]
    fn test_display() {
        let dt = DateTime::new(2024, 2, 29, 12, 34, 56, 7);
        assert_eq!(dt.to_string(), "2024-02-29T12:34:56.007");
        assert_eq!(dt.date().to_string(), "2024-02-29");
    }
}
