//! Date/time normalization for free-form phrases
//!
//! Both resolvers are best-effort: the pipeline has nobody to ask for
//! clarification, so they always produce a usable value. The `try_*`
//! variants expose the failure; the plain variants log it and default.

use crate::error::SoftFailure;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use famcal_domain::EventTime;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::warn;

/// Weekdays in prompt-table order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sept?(?:ember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

// ── Date patterns ───────────────────────────────────────────────────────

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})[-/](\d{1,2})[-/](\d{1,2})(?:$|\D)").unwrap());

static SLASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}|\d{2}))?\b").unwrap());

static RELATIVE_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(day after tomorrow|today|tonight|tomorrow|yesterday)\b").unwrap()
});

static IN_FUTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bin\s+(\d{1,4}|an?|one|two|three|four|five|six|seven|eight|nine|ten)\s+(days?|weeks?)\b")
        .unwrap()
});

static NEXT_WEEK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bnext\s+week\b").unwrap());

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s*(\d{{4}}))?"
    ))
    .unwrap()
});

static DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTHS})\b\.?(?:,?\s*(\d{{4}}))?"
    ))
    .unwrap()
});

static WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:(?:this|next|coming)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues|tue|wed|thurs|thur|thu|fri|sat|sun)\b",
    )
    .unwrap()
});

static ORDINAL_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());

// ── Time patterns ───────────────────────────────────────────────────────

static RANGE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+to\s+|\s+-\s+").unwrap());

static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})(?:[:.](\d{2}))?\s*(a\.?m\.?|p\.?m\.?)?").unwrap()
});

// ── Weekdays ────────────────────────────────────────────────────────────

/// Nearest occurrence of `weekday` strictly after `today`
///
/// If today already is that weekday the result is one week ahead, never today.
pub fn weekday_date(weekday: Weekday, today: NaiveDate) -> NaiveDate {
    let diff = weekday.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64;
    let ahead = match diff.rem_euclid(7) {
        0 => 7,
        n => n,
    };
    today + Duration::days(ahead)
}

/// English name of a weekday ("Monday")
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a full or abbreviated weekday name
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tues" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thurs" | "thur" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

// ── Dates ───────────────────────────────────────────────────────────────

/// Resolve a date phrase relative to `today`, defaulting to `today`
///
/// Never fails; an unparseable phrase is logged at warning level.
pub fn resolve_date(text: &str, today: NaiveDate) -> NaiveDate {
    try_resolve_date(text, today).unwrap_or_else(|failure| {
        warn!(
            "Could not resolve date '{}' ({}), defaulting to today",
            text.trim(),
            failure
        );
        today
    })
}

/// Resolve a date phrase relative to `today`
///
/// Recognizes, in priority order: ISO dates (a trailing time such as
/// `T09:00:00` is ignored), today/tomorrow/yesterday,
/// "in N days|weeks", "next week", month-name dates ("Jan 21",
/// "15 January 2026"), slash dates (M/D[/Y]), weekday names (optionally
/// prefixed with this/next/coming) and a bare ordinal ("the 17th").
/// Weekday names resolve to the nearest strictly-future occurrence, the
/// same rule the prompt's weekday table uses. Dates without a year take
/// the year of `today`.
pub fn try_resolve_date(text: &str, today: NaiveDate) -> Result<NaiveDate, SoftFailure> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return Err(SoftFailure::Empty);
    }

    if let Some(caps) = ISO_DATE.captures(&lowered) {
        return ymd(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?, &lowered);
    }

    if let Some(caps) = RELATIVE_DAY.captures(&lowered) {
        let offset = match &caps[1] {
            "day after tomorrow" => 2,
            "tomorrow" => 1,
            "yesterday" => -1,
            _ => 0,
        };
        return Ok(today + Duration::days(offset));
    }

    if let Some(caps) = IN_FUTURE.captures(&lowered) {
        let count = count_word(&caps[1]).ok_or_else(|| SoftFailure::Unrecognized(lowered.clone()))?;
        let days = if caps[2].starts_with("week") { count * 7 } else { count };
        return Ok(today + Duration::days(days));
    }

    if NEXT_WEEK.is_match(&lowered) {
        return Ok(today + Duration::days(7));
    }

    if let Some(caps) = MONTH_DAY.captures(&lowered) {
        let month = month_number(&caps[1]).ok_or_else(|| SoftFailure::Unrecognized(lowered.clone()))?;
        let year = optional_year(&caps, 3, today)?;
        return ymd(year, month as i64, number(&caps, 2)?, &lowered);
    }

    if let Some(caps) = DAY_MONTH.captures(&lowered) {
        let month = month_number(&caps[2]).ok_or_else(|| SoftFailure::Unrecognized(lowered.clone()))?;
        let year = optional_year(&caps, 3, today)?;
        return ymd(year, month as i64, number(&caps, 1)?, &lowered);
    }

    if let Some(caps) = SLASH_DATE.captures(&lowered) {
        let year = optional_year(&caps, 3, today)?;
        return ymd(year, number(&caps, 1)?, number(&caps, 2)?, &lowered);
    }

    if let Some(caps) = WEEKDAY.captures(&lowered) {
        if let Some(weekday) = parse_weekday(&caps[1]) {
            return Ok(weekday_date(weekday, today));
        }
    }

    if let Some(caps) = ORDINAL_DAY.captures(&lowered) {
        return next_day_of_month(number(&caps, 1)?, today, &lowered);
    }

    Err(SoftFailure::Unrecognized(text.trim().to_string()))
}

fn number(caps: &Captures<'_>, idx: usize) -> Result<i64, SoftFailure> {
    caps.get(idx)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| SoftFailure::Unrecognized(caps[0].to_string()))
}

fn optional_year(caps: &Captures<'_>, idx: usize, today: NaiveDate) -> Result<i64, SoftFailure> {
    match caps.get(idx) {
        None => Ok(today.year() as i64),
        Some(m) if m.as_str().len() == 2 => Ok(2000 + number(caps, idx)?),
        Some(_) => number(caps, idx),
    }
}

fn ymd(year: i64, month: i64, day: i64, source: &str) -> Result<NaiveDate, SoftFailure> {
    let invalid = || SoftFailure::InvalidDate(source.to_string());
    let year = i32::try_from(year).map_err(|_| invalid())?;
    let month = u32::try_from(month).map_err(|_| invalid())?;
    let day = u32::try_from(day).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// The next date (today included) whose day of month is `day`
fn next_day_of_month(day: i64, today: NaiveDate, source: &str) -> Result<NaiveDate, SoftFailure> {
    if day >= today.day() as i64 {
        return ymd(today.year() as i64, today.month() as i64, day, source);
    }
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    ymd(year as i64, month as i64, day, source)
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn count_word(word: &str) -> Option<i64> {
    match word {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        digits => digits.parse().ok(),
    }
}

// ── Times ───────────────────────────────────────────────────────────────

/// Resolve a time phrase to `HHMM`, defaulting to 09:00
///
/// Never fails; an unparseable phrase is logged at warning level.
pub fn resolve_time(text: &str) -> EventTime {
    try_resolve_time(text).unwrap_or_else(|failure| {
        warn!(
            "Could not resolve time '{}' ({}), defaulting to {}",
            text.trim(),
            failure,
            EventTime::DEFAULT
        );
        EventTime::DEFAULT
    })
}

/// Resolve a time phrase to `HHMM`
///
/// Only the first endpoint of a range ("6 to 8pm", "10:00 - 11:00") is
/// used. Text already in `HHMM` (or `HH:MM`) form is taken as-is, which
/// makes the resolver idempotent on its own output. Otherwise the first
/// `H[:MM][am|pm]` (or `H.MM`) is converted from 12-hour form when a suffix is present.
pub fn try_resolve_time(text: &str) -> Result<EventTime, SoftFailure> {
    let lowered = text.trim().to_lowercase();
    let first = if lowered.contains(" to ") || lowered.contains(" - ") {
        RANGE_SEPARATOR.split(&lowered).next().unwrap_or_default().trim()
    } else {
        lowered.as_str()
    };
    if first.is_empty() {
        return Err(SoftFailure::Empty);
    }

    let compact = first.replace(':', "");
    if compact.len() == 4 && compact.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(time) = compact.parse::<EventTime>() {
            return Ok(time);
        }
    }

    let caps = CLOCK_TIME
        .captures(first)
        .ok_or_else(|| SoftFailure::Unrecognized(first.to_string()))?;
    let mut hour: u32 = caps[1]
        .parse()
        .map_err(|_| SoftFailure::Unrecognized(first.to_string()))?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| SoftFailure::Unrecognized(first.to_string()))?,
        None => 0,
    };

    if let Some(suffix) = caps.get(3) {
        let pm = suffix.as_str().starts_with('p');
        if pm && hour != 12 {
            hour += 12;
        } else if !pm && hour == 12 {
            hour = 0;
        }
    }

    EventTime::new(hour, minute).map_err(|_| SoftFailure::OutOfRange(first.to_string()))
}
