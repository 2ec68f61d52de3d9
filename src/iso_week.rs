// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! ISO 8601 week dates (`2024-W09-4`).
//!
//! Week 1 of an ISO year is the week containing that year's first Thursday;
//! weeks run Monday (1) to Sunday (7). A date's ISO year is the civil year
//! of the Thursday in its week, so late-December dates can belong to the
//! next ISO year and early-January dates to the previous one.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::civil::{to_date_time, weekday_of_date};
use crate::constants::DAYS_PER_WEEK;
use crate::error::{TimeError, TimeResult};
use crate::fast_date::{date_from_days, days_from_date};
use crate::types::CivilDate;
use crate::validation::is_valid_date;

/// An ISO week-numbering date.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IsoWeekDate {
    /// ISO week-numbering year.
    pub year: i64,
    /// `1..=53`.
    pub week: i32,
    /// `1` = Monday … `7` = Sunday.
    pub weekday: i32,
}

impl IsoWeekDate {
    #[inline]
    pub const fn new(year: i64, week: i32, weekday: i32) -> Self {
        Self { year, week, weekday }
    }

    pub fn is_valid(&self) -> bool {
        is_valid_iso_week_date(self.year, self.week, self.weekday)
    }
}

impl fmt::Display for IsoWeekDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}-{}", self.year, self.week, self.weekday)
    }
}

/// ISO weekday number (Monday = 1 … Sunday = 7) of a civil date.
#[inline]
pub const fn iso_weekday_of_date(year: i64, month: i32, day: i32) -> i32 {
    weekday_of_date(year, month, day).iso_number() as i32
}

/// Unix day of the Thursday of ISO week 1 of `iso_year`.
const fn first_thursday(iso_year: i64) -> i64 {
    let jan4 = days_from_date(iso_year, 1, 4);
    jan4 + 4 - iso_weekday_of_date(iso_year, 1, 4) as i64
}

/// ISO week date of a civil date.
///
/// ```
/// use tempcal::{to_iso_week_date, IsoWeekDate};
///
/// assert_eq!(to_iso_week_date(2024, 2, 29), IsoWeekDate::new(2024, 9, 4));
/// assert_eq!(to_iso_week_date(2021, 1, 3), IsoWeekDate::new(2020, 53, 7));
/// ```
pub const fn to_iso_week_date(year: i64, month: i32, day: i32) -> IsoWeekDate {
    let weekday = iso_weekday_of_date(year, month, day);
    let thursday = days_from_date(year, month, day) + 4 - weekday as i64;
    let iso_year = date_from_days(thursday).year;
    let week = (thursday - first_thursday(iso_year)) / DAYS_PER_WEEK + 1;
    IsoWeekDate::new(iso_year, week as i32, weekday)
}

#[inline]
pub const fn iso_week_date_of_ts(ts: i64) -> IsoWeekDate {
    let dt = to_date_time(ts);
    to_iso_week_date(dt.year, dt.month, dt.day)
}

/// `52` or `53`.
#[inline]
pub const fn iso_weeks_in_year(iso_year: i64) -> i32 {
    to_iso_week_date(iso_year, 12, 28).week
}

pub const fn is_valid_iso_week_date(iso_year: i64, week: i32, weekday: i32) -> bool {
    weekday >= 1 && weekday <= 7 && week >= 1 && week <= iso_weeks_in_year(iso_year)
}

/// Civil date of an ISO week date.
pub fn iso_week_date_to_date(iso: &IsoWeekDate) -> TimeResult<CivilDate> {
    if !iso.is_valid() {
        return Err(TimeError::InvalidIsoWeekDate);
    }
    let thursday = first_thursday(iso.year) + (iso.week as i64 - 1) * DAYS_PER_WEEK;
    let date = date_from_days(thursday + iso.weekday as i64 - 4);
    debug_assert!(is_valid_date(date.year, date.month, date.day));
    Ok(date)
}

/// Render `YYYY-Www-D` (`extended`) or `YYYYWwwD`; without the weekday,
/// `YYYY-Www` / `YYYYWww`.
pub fn format_iso_week_date(
    iso: &IsoWeekDate,
    extended: bool,
    include_weekday: bool,
) -> TimeResult<String> {
    if !iso.is_valid() {
        return Err(TimeError::InvalidIsoWeekDate);
    }
    let sep = if extended { "-" } else { "" };
    let mut out = format!("{}{sep}W{:02}", iso.year, iso.week);
    if include_weekday {
        out.push_str(sep);
        out.push_str(&iso.weekday.to_string());
    }
    Ok(out)
}

static ISO_WEEK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?\d+)(-?)[Ww](\d{2})(?:(-?)(\d))?$").expect("valid ISO week pattern")
});

/// Parse `2024-W09-4`, `2024W094`, `2024-W09` or `2024W09`.
///
/// Separators must be used consistently; a missing weekday means Monday.
pub fn parse_iso_week_date(input: &str) -> TimeResult<IsoWeekDate> {
    let malformed = || TimeError::MalformedInput(input.to_owned());
    let caps = ISO_WEEK_RE.captures(input.trim()).ok_or_else(malformed)?;

    let year: i64 = caps[1].parse().map_err(|_| malformed())?;
    let extended = !caps[2].is_empty();
    let week: i32 = caps[3].parse().map_err(|_| malformed())?;
    let weekday = match caps.get(5) {
        Some(d) => {
            let dashed = caps.get(4).is_some_and(|m| !m.as_str().is_empty());
            if dashed != extended {
                return Err(malformed());
            }
            d.as_str().parse().map_err(|_| malformed())?
        }
        None => 1,
    };

    let iso = IsoWeekDate::new(year, week, weekday);
    if !iso.is_valid() {
        return Err(TimeError::InvalidIsoWeekDate);
    }
    Ok(iso)
}
