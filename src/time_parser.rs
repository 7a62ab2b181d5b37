//! Lenient time-of-day parsing for hand-entered FileMaker TIME values.
//!
//! Accepts `H:MM`, `H.MM`, optional seconds and an optional `am`/`pm` suffix,
//! found anywhere in the input:
//!
//! ```
//! use chrono::NaiveTime;
//! use fmp_importer::time_parser::parse_time;
//!
//! assert_eq!(parse_time("3.3pm"), NaiveTime::from_hms_opt(15, 3, 0));
//! assert_eq!(parse_time("undefined"), None);
//! ```

use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<hours>[0-9]{1,2})[.:](?P<minutes>[0-9]{1,2})(?:[.:](?P<seconds>[0-9]{1,2}))? ?(?P<meridiem>(?i:[ap]m))?",
    )
    .unwrap()
});

/// Parse the first time-like substring of `value`.
///
/// `pm` adds twelve hours below noon; `am` leaves the hour untouched, so
/// "12:15 am" stays 12:15. Hours past 23 wrap to midnight. Returns `None` when
/// nothing matches or the minutes/seconds are out of range.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let captures = TIME_PATTERN.captures(value)?;

    let mut hours: u32 = captures["hours"].parse().ok()?;
    let minutes: u32 = captures["minutes"].parse().ok()?;
    let seconds: u32 = match captures.name("seconds") {
        Some(seconds) => seconds.as_str().parse().ok()?,
        None => 0,
    };

    let is_pm = captures
        .name("meridiem")
        .is_some_and(|meridiem| meridiem.as_str().eq_ignore_ascii_case("pm"));
    if is_pm && hours < 12 {
        hours += 12;
    }
    if hours > 23 {
        hours = 0;
    }

    NaiveTime::from_hms_opt(hours, minutes, seconds)
}
