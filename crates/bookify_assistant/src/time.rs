// --- File: crates/bookify_assistant/src/time.rs ---
//! Resolves natural-language time phrases into concrete slots.
//!
//! A phrase like "tomorrow at 2 PM" or "next friday 16:30" is resolved
//! against a reference instant in the configured time zone. Day words and
//! weekday names always resolve strictly into the future: "next monday"
//! spoken on a Monday means the Monday seven days out, never today.
//!
//! A bare hour without an AM/PM marker ("tomorrow at 2") is resolved to
//! whichever of the two candidate readings lies closer to the reference
//! instant, and the result is flagged ambiguous so callers can mention the
//! assumption in their reply.

use std::ops::Range;

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Weekday,
};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("could not find a time in \"{0}\", try something like \"tomorrow at 2 PM\"")]
    NoTime(String),
    #[error("\"{0}\" is not a valid clock time")]
    BadClock(String),
    #[error("\"{0}\" is not a valid calendar date")]
    BadDate(String),
    #[error("\"{0}\" does not exist in the configured time zone")]
    NonexistentLocal(String),
}

/// A resolved, timezone-aware slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlot {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// True when the phrase carried a bare hour and the AM/PM reading was
    /// guessed rather than stated.
    pub ambiguous: bool,
}

static TIME_12H: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(a\.?m\.?|p\.?m\.?)\b").unwrap());
static TIME_24H: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\b").unwrap());
static BARE_HOUR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2})\b").unwrap());
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());
static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}))?\b").unwrap());
static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b")
        .unwrap()
});
static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\b")
        .unwrap()
});
static WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:next\s+|this\s+|coming\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .unwrap()
});

/// An owned snapshot of a regex match, so the haystack can be edited after
/// capturing.
struct OwnedMatch {
    span: Range<usize>,
    groups: Vec<Option<String>>,
}

impl OwnedMatch {
    fn capture(re: &Regex, hay: &str) -> Option<OwnedMatch> {
        let caps = re.captures(hay)?;
        let span = caps.get(0)?.range();
        let groups = (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
            .collect();
        Some(OwnedMatch { span, groups })
    }

    fn group(&self, i: usize) -> Option<&str> {
        self.groups.get(i - 1).and_then(|g| g.as_deref())
    }

    fn consume(self, rest: &mut String) {
        rest.replace_range(self.span, " ");
    }
}

fn parse_num<T: std::str::FromStr>(text: Option<&str>, phrase: &str) -> Result<T, TimeParseError> {
    text.ok_or_else(|| TimeParseError::BadClock(phrase.into()))?
        .parse()
        .map_err(|_| TimeParseError::BadClock(phrase.into()))
}

/// Resolve `phrase` against `now`, producing a slot of the given duration.
pub fn resolve(
    phrase: &str,
    now: DateTime<Tz>,
    duration: Duration,
) -> Result<ResolvedSlot, TimeParseError> {
    let mut rest = phrase.to_lowercase();

    let mut clock: Option<NaiveTime> = None;
    if let Some(m) = OwnedMatch::capture(&TIME_12H, &rest) {
        let hour: u32 = parse_num(m.group(1), phrase)?;
        let minute: u32 = match m.group(2) {
            Some(text) => parse_num(Some(text), phrase)?,
            None => 0,
        };
        if !(1..=12).contains(&hour) || minute > 59 {
            return Err(TimeParseError::BadClock(phrase.into()));
        }
        let pm = m.group(3).is_some_and(|marker| marker.starts_with('p'));
        let hour24 = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        clock = NaiveTime::from_hms_opt(hour24, minute, 0);
        m.consume(&mut rest);
    } else if let Some(m) = OwnedMatch::capture(&TIME_24H, &rest) {
        let hour: u32 = parse_num(m.group(1), phrase)?;
        let minute: u32 = parse_num(m.group(2), phrase)?;
        if hour > 23 || minute > 59 {
            return Err(TimeParseError::BadClock(phrase.into()));
        }
        clock = NaiveTime::from_hms_opt(hour, minute, 0);
        m.consume(&mut rest);
    }

    let date = resolve_date(&mut rest, phrase, now)?;

    let mut ambiguous = false;
    if clock.is_none() {
        if let Some((reading, span, guessed)) = bare_hour_reading(&rest, date, now)? {
            clock = Some(reading);
            ambiguous = guessed;
            rest.replace_range(span, " ");
        }
    }

    let clock = clock.ok_or_else(|| TimeParseError::NoTime(phrase.into()))?;
    let date = date.unwrap_or_else(|| now.date_naive());

    let start = now
        .timezone()
        .from_local_datetime(&date.and_time(clock))
        .earliest()
        .ok_or_else(|| TimeParseError::NonexistentLocal(phrase.into()))?;
    Ok(ResolvedSlot { start, end: start + duration, ambiguous })
}

/// Resolve a date-only phrase ("tomorrow", "next friday", "March 14") to a
/// calendar date. A phrase with no recognizable date is an error; "today"
/// must be said explicitly.
pub fn resolve_day(phrase: &str, now: DateTime<Tz>) -> Result<NaiveDate, TimeParseError> {
    let mut rest = phrase.to_lowercase();
    resolve_date(&mut rest, phrase, now)?.ok_or_else(|| TimeParseError::BadDate(phrase.into()))
}

/// The first standalone 0..=23 in `rest`, read as an hour. A bare 1..=12
/// could mean either half of the day, so the candidate closer to `now` wins
/// and the reading is flagged as a guess.
fn bare_hour_reading(
    rest: &str,
    date: Option<NaiveDate>,
    now: DateTime<Tz>,
) -> Result<Option<(NaiveTime, Range<usize>, bool)>, TimeParseError> {
    for m in BARE_HOUR.find_iter(rest) {
        let hour: u32 = match m.as_str().parse() {
            Ok(h) => h,
            Err(_) => continue,
        };
        if hour > 23 {
            continue;
        }
        if hour == 0 || hour > 12 {
            let reading = NaiveTime::from_hms_opt(hour, 0, 0)
                .ok_or_else(|| TimeParseError::BadClock(rest.into()))?;
            return Ok(Some((reading, m.range(), false)));
        }
        let base = date.unwrap_or_else(|| now.date_naive());
        let am = NaiveTime::from_hms_opt(hour % 12, 0, 0)
            .ok_or_else(|| TimeParseError::BadClock(rest.into()))?;
        let pm = NaiveTime::from_hms_opt(hour % 12 + 12, 0, 0)
            .ok_or_else(|| TimeParseError::BadClock(rest.into()))?;
        return Ok(Some((nearer_reading(base, am, pm, now)?, m.range(), true)));
    }
    Ok(None)
}

fn nearer_reading(
    date: NaiveDate,
    am: NaiveTime,
    pm: NaiveTime,
    now: DateTime<Tz>,
) -> Result<NaiveTime, TimeParseError> {
    let tz = now.timezone();
    let to_instant = |t: NaiveTime| {
        tz.from_local_datetime(&date.and_time(t))
            .earliest()
            .ok_or_else(|| TimeParseError::NonexistentLocal(t.to_string()))
    };
    let am_dist = (to_instant(am)? - now).num_seconds().abs();
    let pm_dist = (to_instant(pm)? - now).num_seconds().abs();
    Ok(if am_dist <= pm_dist { am } else { pm })
}

fn resolve_date(
    rest: &mut String,
    phrase: &str,
    now: DateTime<Tz>,
) -> Result<Option<NaiveDate>, TimeParseError> {
    let today = now.date_naive();

    for (keyword, offset) in [
        ("day after tomorrow", 2),
        ("overmorrow", 2),
        ("tomorrow", 1),
        ("tonight", 0),
        ("today", 0),
        ("next week", 7),
    ] {
        if let Some(pos) = rest.find(keyword) {
            rest.replace_range(pos..pos + keyword.len(), " ");
            return Ok(Some(today + Duration::days(offset)));
        }
    }

    if let Some(m) = OwnedMatch::capture(&WEEKDAY, rest) {
        let target = weekday_from_name(m.group(1).unwrap_or("sunday"));
        let mut ahead = i64::from(target.num_days_from_monday())
            - i64::from(today.weekday().num_days_from_monday());
        // Strictly future: the same weekday spoken today means next week.
        if ahead <= 0 {
            ahead += 7;
        }
        m.consume(rest);
        return Ok(Some(today + Duration::days(ahead)));
    }

    if let Some(m) = OwnedMatch::capture(&ISO_DATE, rest) {
        let date = ymd(m.group(1), m.group(2), m.group(3))
            .ok_or_else(|| TimeParseError::BadDate(phrase.into()))?;
        m.consume(rest);
        return Ok(Some(date));
    }

    for (re, month_idx, day_idx) in [(&MONTH_DAY, 1, 2), (&DAY_MONTH, 2, 1)] {
        if let Some(m) = OwnedMatch::capture(re, rest) {
            let month = month_from_name(m.group(month_idx).unwrap_or(""));
            let day: u32 = parse_num(m.group(day_idx), phrase)
                .map_err(|_| TimeParseError::BadDate(phrase.into()))?;
            let date = next_occurrence(today, month, day)
                .ok_or_else(|| TimeParseError::BadDate(phrase.into()))?;
            m.consume(rest);
            return Ok(Some(date));
        }
    }

    if let Some(m) = OwnedMatch::capture(&SLASH_DATE, rest) {
        let a: u32 = parse_num(m.group(1), phrase)
            .map_err(|_| TimeParseError::BadDate(phrase.into()))?;
        let b: u32 = parse_num(m.group(2), phrase)
            .map_err(|_| TimeParseError::BadDate(phrase.into()))?;
        // Day-first where unambiguous, month-first otherwise.
        let (day, month) = if a > 12 { (a, b) } else { (b, a) };
        let date = match m.group(3) {
            Some(year) => {
                let year: i32 = year
                    .parse()
                    .map_err(|_| TimeParseError::BadDate(phrase.into()))?;
                NaiveDate::from_ymd_opt(year, month, day)
                    .ok_or_else(|| TimeParseError::BadDate(phrase.into()))?
            }
            None => next_occurrence(today, month, day)
                .ok_or_else(|| TimeParseError::BadDate(phrase.into()))?,
        };
        m.consume(rest);
        return Ok(Some(date));
    }

    Ok(None)
}

/// The next calendar occurrence of `month`/`day` on or after `today`.
fn next_occurrence(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

fn ymd(year: Option<&str>, month: Option<&str>, day: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year?.parse().ok()?, month?.parse().ok()?, day?.parse().ok()?)
}

fn weekday_from_name(name: &str) -> Weekday {
    match &name.to_lowercase()[..3] {
        "mon" => Weekday::Mon,
        "tue" => Weekday::Tue,
        "wed" => Weekday::Wed,
        "thu" => Weekday::Thu,
        "fri" => Weekday::Fri,
        "sat" => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

fn month_from_name(name: &str) -> u32 {
    match name.to_lowercase().get(..3).unwrap_or("") {
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
        _ => 12,
    }
}

/// `true` when both instants fall on the same local date and hour.
///
/// Used to match a spoken phrase ("my 2 PM tomorrow") against an existing
/// appointment without requiring minute precision.
pub fn same_date_and_hour(a: DateTime<Tz>, b: DateTime<Tz>) -> bool {
    a.date_naive() == b.date_naive() && a.hour() == b.hour()
}
