// File: ./src/analyzer/dates.rs
use crate::analyzer::{Clock, compile};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDateTime {
    /// Absolute instant, computed in the clock's timezone.
    pub date: DateTime<Utc>,
    pub has_time: bool,
    /// False when the date was inferred from an ambiguous form (abbreviated weekday).
    pub is_confirmed: bool,
    pub original: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTime<'a> {
    pub hours: u32,
    pub minutes: u32,
    pub original: &'a str,
}

/// A calendar day picked by one of the resolvers, before time-of-day is applied.
struct DateMatch {
    day: NaiveDate,
    confident: bool,
    original: String,
}

type Resolver = fn(&str, &Clock) -> Option<DateMatch>;

// Earlier resolvers win even when a later one would also match
// ("15 mar" is a Tuesday, not March 15th).
const RESOLVERS: [Resolver; 4] = [
    resolve_relative_day,
    resolve_weekday,
    resolve_numeric_date,
    resolve_month_name_date,
];

const MONTHS: [&str; 12] = [
    "gennaio",
    "febbraio",
    "marzo",
    "aprile",
    "maggio",
    "giugno",
    "luglio",
    "agosto",
    "settembre",
    "ottobre",
    "novembre",
    "dicembre",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "lunedì",
    "martedì",
    "mercoledì",
    "giovedì",
    "venerdì",
    "sabato",
    "domenica",
];

static RELATIVE_DAYS: Lazy<Vec<(Regex, i64, &'static str)>> = Lazy::new(|| {
    vec![
        (compile(r"(?i)\boggi\b"), 0, "oggi"),
        (compile(r"(?i)\bdomani\b"), 1, "domani"),
        (compile(r"(?i)\bdopodomani\b"), 2, "dopodomani"),
    ]
});

struct WeekdayForm {
    regex: Regex,
    weekday: Weekday,
    name: &'static str,
    abbreviated: bool,
}

static WEEKDAY_FORMS: Lazy<Vec<WeekdayForm>> = Lazy::new(|| {
    let table: [(&str, Weekday, bool); 22] = [
        ("lunedì", Weekday::Mon, false),
        ("lunedi", Weekday::Mon, false),
        ("lun", Weekday::Mon, true),
        ("martedì", Weekday::Tue, false),
        ("martedi", Weekday::Tue, false),
        ("mart", Weekday::Tue, true),
        ("mar", Weekday::Tue, true),
        ("mercoledì", Weekday::Wed, false),
        ("mercoledi", Weekday::Wed, false),
        ("merc", Weekday::Wed, true),
        ("mer", Weekday::Wed, true),
        ("giovedì", Weekday::Thu, false),
        ("giovedi", Weekday::Thu, false),
        ("giov", Weekday::Thu, true),
        ("gio", Weekday::Thu, true),
        ("venerdì", Weekday::Fri, false),
        ("venerdi", Weekday::Fri, false),
        ("ven", Weekday::Fri, true),
        ("sabato", Weekday::Sat, false),
        ("sab", Weekday::Sat, true),
        ("domenica", Weekday::Sun, false),
        ("dom", Weekday::Sun, true),
    ];
    table
        .iter()
        .map(|(name, weekday, abbreviated)| WeekdayForm {
            regex: compile(&format!(r"(?i)\b{}\b", name)),
            weekday: *weekday,
            name,
            abbreviated: *abbreviated,
        })
        .collect()
});

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| compile(r"\b(\d{1,2})[/\-](\d{1,2})(?:[/\-](\d{2,4}))?\b"));

static MONTH_NAME_DATE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b(\d{1,2})\s+(gennaio|febbraio|marzo|aprile|maggio|giugno|luglio|agosto|settembre|ottobre|novembre|dicembre|gen|feb|mar|apr|mag|giu|lug|ago|set|ott|nov|dic)(?:\s+(\d{4}))?\b",
    )
});

static TIME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        compile(r"(?i)\b(?:alle|ore|h\.?)\s*(\d{1,2})(?:[:.](\d{2}))?\b"),
        compile(r"\b(\d{1,2})[:.](\d{2})\b"),
        compile(r"(?i)\b(?:alle|ore)\s*(\d{1,2})\b"),
    ]
});

fn resolve_relative_day(text: &str, clock: &Clock) -> Option<DateMatch> {
    RELATIVE_DAYS
        .iter()
        .find(|(re, _, _)| re.is_match(text))
        .map(|(_, offset, word)| DateMatch {
            day: clock.today() + Duration::days(*offset),
            confident: true,
            original: word.to_string(),
        })
}

fn resolve_weekday(text: &str, clock: &Clock) -> Option<DateMatch> {
    let form = WEEKDAY_FORMS.iter().find(|f| f.regex.is_match(text))?;
    Some(DateMatch {
        day: next_weekday(clock.today(), form.weekday),
        confident: !form.abbreviated,
        original: form.name.to_string(),
    })
}

fn resolve_numeric_date(text: &str, clock: &Clock) -> Option<DateMatch> {
    let caps = NUMERIC_DATE.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year = match caps.get(3) {
        Some(y) => {
            let y: i32 = y.as_str().parse().ok()?;
            if y < 100 { y + 2000 } else { y }
        }
        None => clock.today().year(),
    };
    Some(DateMatch {
        day: NaiveDate::from_ymd_opt(year, month, day)?,
        confident: true,
        original: caps[0].to_string(),
    })
}

fn resolve_month_name_date(text: &str, clock: &Clock) -> Option<DateMatch> {
    let caps = MONTH_NAME_DATE.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2].to_lowercase())?;
    let year = match caps.get(3) {
        Some(y) => y.as_str().parse().ok()?,
        None => clock.today().year(),
    };
    Some(DateMatch {
        day: NaiveDate::from_ymd_opt(year, month, day)?,
        confident: true,
        original: caps[0].to_string(),
    })
}

/// Month number (1-12) for a full or three-letter Italian month name.
fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == name || (name.chars().count() == 3 && m.starts_with(name)))
        .map(|idx| idx as u32 + 1)
}

/// Next occurrence of `target` strictly after `from`.
fn next_weekday(from: NaiveDate, target: Weekday) -> NaiveDate {
    let mut d = from + Duration::days(1);
    while d.weekday() != target {
        d += Duration::days(1);
    }
    d
}

/// Extracts a time of day (`alle 15`, `ore 9:30`, `h14`, `15:30`, `15.30`).
/// Patterns are tried in order; a match with out-of-range values falls through to
/// the next pattern.
pub fn parse_time(text: &str) -> Option<ParsedTime<'_>> {
    for pattern in TIME_PATTERNS.iter() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let Ok(hours) = caps[1].parse::<u32>() else {
            continue;
        };
        let minutes = match caps.get(2) {
            Some(m) => match m.as_str().parse::<u32>() {
                Ok(v) => v,
                Err(_) => continue,
            },
            None => 0,
        };
        if hours <= 23 && minutes <= 59 {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            return Some(ParsedTime {
                hours,
                minutes,
                original: whole,
            });
        }
    }
    None
}

/// Resolves the first date reference in `text`, then applies a time of day if one
/// is present anywhere in the same text.
pub fn parse_italian_date(text: &str, clock: &Clock) -> Option<ParsedDateTime> {
    let low_text = text.trim().to_lowercase();
    let found = RESOLVERS
        .iter()
        .find_map(|resolve| resolve(&low_text, clock))?;

    let mut local = found.day.and_hms_opt(0, 0, 0)?;
    let mut has_time = false;
    if let Some(t) = parse_time(text)
        && let Some(with_time) = found.day.and_hms_opt(t.hours, t.minutes, 0)
    {
        local = with_time;
        has_time = true;
    }

    Some(ParsedDateTime {
        date: clock.to_utc(local),
        has_time,
        is_confirmed: found.confident,
        original: found.original,
    })
}

/// Parses every sentence-like segment and then the whole text, keeping the first
/// result for each distinct instant.
pub fn extract_all_dates(text: &str, clock: &Clock) -> Vec<ParsedDateTime> {
    let mut results: Vec<ParsedDateTime> = Vec::new();

    let segments = text.split([',', '.', '\n', ';']);
    for candidate in segments
        .filter_map(|s| parse_italian_date(s, clock))
        .chain(parse_italian_date(text, clock))
    {
        if !results.iter().any(|r| r.date == candidate.date) {
            results.push(candidate);
        }
    }

    results
}

// --- ITALIAN FORMATTING ---

fn month_name(month: u32) -> &'static str {
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// "6 gennaio 2025"
pub fn format_date_it(instant: DateTime<Utc>, tz: Tz) -> String {
    let local = instant.with_timezone(&tz);
    format!(
        "{} {} {}",
        local.day(),
        month_name(local.month()),
        local.year()
    )
}

/// "6 gennaio 2025 alle 15:30"
pub fn format_date_time_it(instant: DateTime<Utc>, tz: Tz) -> String {
    format!(
        "{} alle {}",
        format_date_it(instant, tz),
        format_time_it(instant, tz)
    )
}

/// "15:30"
pub fn format_time_it(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}

/// "lunedì 6 gennaio 2025"
pub fn format_long_date_it(instant: DateTime<Utc>, tz: Tz) -> String {
    let local = instant.with_timezone(&tz);
    let weekday = WEEKDAY_NAMES[local.weekday().num_days_from_monday() as usize];
    format!("{} {}", weekday, format_date_it(instant, tz))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_number_accepts_full_and_short_names() {
        assert_eq!(month_number("gennaio"), Some(1));
        assert_eq!(month_number("dic"), Some(12));
        assert_eq!(month_number("set"), Some(9));
        assert_eq!(month_number("ma"), None);
        assert_eq!(month_number("marz"), None);
    }

    #[test]
    fn test_next_weekday_is_strictly_after() {
        // 2025-01-06 is a Monday
        let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(
            next_weekday(monday, Weekday::Mon),
            NaiveDate::from_ymd_opt(2025, 1, 13).unwrap()
        );
        assert_eq!(
            next_weekday(monday, Weekday::Wed),
            NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()
        );
    }
}
