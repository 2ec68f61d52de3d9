// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! `strftime`-style rendering with repeat-count specifiers.
//!
//! A specifier is `%` followed by a run of one repeated character; the
//! character *and* the run length select the field, so `%M` (minute),
//! `%MM` (month) and `%MMM` (`"FEB"`) are three different specifiers.
//! `%%` emits a literal `%`. Unrecognised specifiers emit nothing.
//!
//! Fields are taken from the timestamp as given: `utc_offset_sec` is only
//! consulted by `%z`. Shift the instant with
//! [`to_local`](crate::to_local) first to render local wall time.
//!
//! | Specifier | Output | Example |
//! |-----------|--------|---------|
//! | `%a` `%A` `%www` `%WWW` | weekday | `Thu` `Thursday` `Thu` `THU` |
//! | `%b` `%h` `%B` `%MMM` | month | `Feb` `Feb` `February` `FEB` |
//! | `%Y` `%YY` `%YYYY` `%y` `%C` | year | `2024` `24` `2024` `24` `20` |
//! | `%YYYYYY` | year with `M`/`K` grouping | `292M277K026` |
//! | `%m` `%MM` `%d` `%DD` `%e` `%j` | month, day | `02` `02` `29` `29` `29` `060` |
//! | `%H` `%HH` `%hh` `%k` `%I` `%l` | hour | `12` `12` `12` `12` `12` `12` |
//! | `%M` `%mm` `%S` `%ss` `%SS` | minute, second | `34` `34` `56` `56` `56` |
//! | `%ssss` | millisecond of second | `000` |
//! | `%s` | Unix seconds | `1709210096` |
//! | `%p` `%P` | meridiem | `PM` `pm` |
//! | `%F` `%D` `%T` `%R` `%r` `%c` | composites | `2024-02-29` … |
//! | `%u` `%w` | weekday number | `4` `4` |
//! | `%G` `%g` `%V` | ISO week-numbering year and week | `2024` `24` `09` |
//! | `%U` `%W` | Sunday / Monday based week of year | `08` `09` |
//! | `%z` `%Z` | offset, zone name | `+0000` `UTC` |
//! | `%n` `%t` | newline, tab | |

use std::fmt::{self, Write};

use crate::civil::{to_date_time, to_date_time_ms, weekday_of_date};
use crate::constants::MS_PER_SEC;
use crate::floor_math::floor_div;
use crate::fast_date::days_from_date;
use crate::iso_week::to_iso_week_date;
use crate::time_zone::format_offset_compact;
use crate::types::{DateTime, Month, NameCase, Weekday};
use crate::units::hour_24_to_12;

/// Everything a specifier may need, derived once per call.
struct Fields {
    ts: i64,
    dt: DateTime,
    weekday: Weekday,
    /// Zero-based day of year.
    yday: i64,
    utc_offset_sec: i64,
}

impl Fields {
    fn new(ts: i64, dt: DateTime, utc_offset_sec: i64) -> Self {
        let yday = days_from_date(dt.year, dt.month, dt.day) - days_from_date(dt.year, 1, 1);
        Self {
            ts,
            weekday: weekday_of_date(dt.year, dt.month, dt.day),
            yday,
            dt,
            utc_offset_sec,
        }
    }

    fn month_name(&self, case: NameCase) -> &'static str {
        Month::from_number(self.dt.month).map_or("", |m| m.name(case))
    }

    fn meridiem(&self, upper: bool) -> &'static str {
        match (self.dt.hour < 12, upper) {
            (true, true) => "AM",
            (false, true) => "PM",
            (true, false) => "am",
            (false, false) => "pm",
        }
    }
}

/// Render `ts` (Unix seconds) through `pattern`.
///
/// ```
/// use tempcal::format;
///
/// let ts = 1_709_210_096; // 2024-02-29T12:34:56Z
/// assert_eq!(format("%Y-%m-%d %H:%M:%S", ts, 0), "2024-02-29 12:34:56");
/// assert_eq!(format("%WWW %DD %MMM %YY", ts, 0), "THU 29 FEB 24");
/// assert_eq!(format("%z", ts, -5 * 3_600), "-0500");
/// ```
pub fn format(pattern: &str, ts: i64, utc_offset_sec: i64) -> String {
    render(pattern, &Fields::new(ts, to_date_time(ts), utc_offset_sec))
}

/// Render `ts_ms` (Unix milliseconds) through `pattern`; `%s` yields whole
/// seconds and `%ssss` the millisecond field.
pub fn format_ms(pattern: &str, ts_ms: i64, utc_offset_sec: i64) -> String {
    let ts = floor_div(ts_ms, MS_PER_SEC);
    render(pattern, &Fields::new(ts, to_date_time_ms(ts_ms), utc_offset_sec))
}

fn render(pattern: &str, fields: &Fields) -> String {
    Rendered { pattern, fields }.to_string()
}

/// A pattern bound to its fields; expanded on `Display`.
struct Rendered<'a> {
    pattern: &'a str,
    fields: &'a Fields,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.pattern.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.write_char(c)?;
                continue;
            }
            let Some(spec) = chars.next() else {
                break;
            };
            if spec == '%' {
                out.write_char('%')?;
                continue;
            }
            let mut repeat = 1;
            while chars.next_if_eq(&spec).is_some() {
                repeat += 1;
            }
            expand(spec, repeat, self.fields, out)?;
        }
        Ok(())
    }
}

/// Write `value` with at least `digits` digits after the sign, as C's
/// `%.Nd` does (`-1` at 4 digits is `-0001`).
fn push_padded<W: Write>(out: &mut W, value: i64, digits: usize) -> fmt::Result {
    if value < 0 {
        out.write_char('-')?;
    }
    write!(out, "{:0digits$}", value.unsigned_abs())
}

fn push_year_mega<W: Write>(out: &mut W, year: i64) -> fmt::Result {
    let mega = year / 1_000_000;
    let kilo = (year - mega * 1_000_000) / 1_000;
    let rest = (year - mega * 1_000_000 - kilo * 1_000).unsigned_abs();
    match (mega != 0, kilo != 0) {
        (true, true) => write!(out, "{mega}M{}K{rest:03}", kilo.unsigned_abs()),
        (true, false) => write!(out, "{mega}M{rest:03}"),
        (false, true) => write!(out, "{kilo}K{rest:03}"),
        (false, false) => push_padded(out, year, 4),
    }
}

fn push_iso_date<W: Write>(out: &mut W, year: i64, month: i32, day: i32) -> fmt::Result {
    if year > 9_999 {
        out.write_char('+')?;
    }
    push_padded(out, year, 4)?;
    write!(out, "-{month:02}-{day:02}")
}

/// Signed integer zero-padded to a minimum digit count after the sign.
pub(crate) struct Padded(pub i64, pub usize);

impl fmt::Display for Padded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        push_padded(f, self.0, self.1)
    }
}

/// `YYYY-MM-DD`; years outside `0..=9999` carry an explicit sign.
pub(crate) struct IsoDate(pub i64, pub i32, pub i32);

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        push_iso_date(f, self.0, self.1, self.2)
    }
}

/// Week of year where week 1 starts on the first `first_weekday` of January.
fn week_of_year(fields: &Fields, first_weekday: Weekday) -> i64 {
    let shifted = (fields.weekday.index() - first_weekday.index()).rem_euclid(7);
    (fields.yday + 7 - shifted) / 7
}

fn expand<W: Write>(spec: char, repeat: usize, f: &Fields, out: &mut W) -> fmt::Result {
    let dt = &f.dt;
    match (spec, repeat) {
        ('a', 1) | ('w', 3) => out.write_str(f.weekday.name(NameCase::Short)),
        ('A', 1) => out.write_str(f.weekday.name(NameCase::Full)),
        ('W', 3) => out.write_str(f.weekday.name(NameCase::Uppercase)),
        ('b', 1) | ('h', 1) => out.write_str(f.month_name(NameCase::Short)),
        ('B', 1) => out.write_str(f.month_name(NameCase::Full)),
        ('M', 3) => out.write_str(f.month_name(NameCase::Uppercase)),
        ('c', 1) => write!(
            out,
            "{} {} {:2} {:02}:{:02}:{:02} {}",
            f.weekday.name(NameCase::Short),
            f.month_name(NameCase::Short),
            dt.day,
            dt.hour,
            dt.min,
            dt.sec,
            dt.year
        ),
        ('C', 1) => write!(out, "{}", dt.year / 100),
        ('d', 1) | ('D', 2) => write!(out, "{:02}", dt.day),
        ('D', 1) => {
            write!(out, "{:02}/{:02}/", dt.month, dt.day)?;
            push_padded(out, dt.year % 100, 2)
        }
        ('e', 1) => write!(out, "{:2}", dt.day),
        ('F', 1) => push_iso_date(out, dt.year, dt.month, dt.day),
        ('G', 1) => write!(out, "{}", to_iso_week_date(dt.year, dt.month, dt.day).year),
        ('g', 1) => push_padded(out, to_iso_week_date(dt.year, dt.month, dt.day).year % 100, 2),
        ('V', 1) => write!(out, "{:02}", to_iso_week_date(dt.year, dt.month, dt.day).week),
        ('U', 1) => write!(out, "{:02}", week_of_year(f, Weekday::Sun)),
        ('W', 1) => write!(out, "{:02}", week_of_year(f, Weekday::Mon)),
        ('H', 1) | ('H', 2) | ('h', 2) => write!(out, "{:02}", dt.hour),
        ('I', 1) => write!(out, "{:02}", hour_24_to_12(dt.hour)),
        ('k', 1) => write!(out, "{:2}", dt.hour),
        ('l', 1) => write!(out, "{:2}", hour_24_to_12(dt.hour)),
        ('j', 1) => write!(out, "{:03}", f.yday + 1),
        ('m', 1) | ('M', 2) => write!(out, "{:02}", dt.month),
        ('M', 1) | ('m', 2) => write!(out, "{:02}", dt.min),
        ('S', 1) | ('S', 2) | ('s', 2) => write!(out, "{:02}", dt.sec),
        ('s', 1) => write!(out, "{}", f.ts),
        ('s', 4) => write!(out, "{:03}", dt.ms),
        ('n', _) => out.write_char('\n'),
        ('t', 1) => out.write_char('\t'),
        ('p', _) => out.write_str(f.meridiem(true)),
        ('P', _) => out.write_str(f.meridiem(false)),
        ('r', 1) => write!(
            out,
            "{:02}:{:02}:{:02} {}",
            hour_24_to_12(dt.hour),
            dt.min,
            dt.sec,
            f.meridiem(true)
        ),
        ('R', 1) => write!(out, "{:02}:{:02}", dt.hour, dt.min),
        ('T', 1) => write!(out, "{:02}:{:02}:{:02}", dt.hour, dt.min, dt.sec),
        ('u', 1) => write!(out, "{}", f.weekday.iso_number()),
        ('w', 1) => write!(out, "{}", f.weekday.index()),
        ('y', 1) => write!(out, "{}", dt.year % 100),
        ('Y', 1) => write!(out, "{}", dt.year),
        ('Y', 2) => push_padded(out, dt.year % 100, 2),
        ('Y', 4) => push_padded(out, dt.year % 10_000, 4),
        ('Y', 6) => push_year_mega(out, dt.year),
        ('z', 1) => out.write_str(&format_offset_compact(f.utc_offset_sec)),
        ('Z', 1) => out.write_str("UTC"),
        _ => Ok(()),
    }
}
