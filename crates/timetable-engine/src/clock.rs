//! Clock-time parsing and formatting.
//!
//! A [`ClockTime`] is an integer number of minutes since midnight. Strings
//! are strictly a boundary format: catalog data arrives as `"9:00AM"` /
//! `"14:30"` style text, gets parsed once, and every computation downstream
//! works on minutes.
//!
//! # Design Principle
//!
//! Catalog exports are messy, and one bad time field must not throw a whole
//! dataset out. [`parse_clock`] therefore never fails: input matching neither
//! the 12-hour nor the 24-hour pattern falls back to a best-effort colon
//! split, but the result is flagged [`ParsedClock::lenient`] and logged so
//! the recovery is observable rather than silent.

use serde::Serialize;

/// Minutes since midnight, in `[0, 1440)`.
///
/// Values outside that range are out of contract — callers clip before
/// constructing (see the interval projector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ClockTime(u16);

impl ClockTime {
    pub const fn from_minutes(minutes: u16) -> Self {
        ClockTime(minutes)
    }

    pub const fn minutes(self) -> u16 {
        self.0
    }

    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    pub const fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// The result of parsing a clock-time string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedClock {
    /// Minutes since midnight.
    pub time: ClockTime,
    /// True when the input matched neither the 12-hour nor the 24-hour
    /// pattern and the lenient fallback produced the value.
    pub lenient: bool,
}

/// Parse a clock-time string into minutes since midnight.
///
/// # Accepted Formats
///
/// - 12-hour with AM/PM suffix: `"9AM"`, `"9:30AM"`, `"930AM"`, `"12PM"`.
///   Hour 12 AM maps to minute 0; hour 12 PM stays at 720; PM hours 1–11
///   add 720.
/// - 24-hour: `"09:00"`, `"14:30"`.
///
/// Anything else is recovered by splitting on `:` and reading the first two
/// pieces as integers (non-numeric pieces read as 0), with the result
/// clamped into `[0, 1439]`. The recovery is reported via
/// [`ParsedClock::lenient`] and a `log::warn!`.
pub fn parse_clock(text: &str) -> ParsedClock {
    let s = text.trim().to_ascii_uppercase();

    if let Some(time) = parse_12h(&s).or_else(|| parse_24h(&s)) {
        return ParsedClock {
            time,
            lenient: false,
        };
    }

    // Best-effort fallback: "9" → 540, "9:xx" → 540, "" → 0. The pieces are
    // unbounded, so the arithmetic is done wide and the result clamped into
    // ClockTime's valid range ("25:00" reads as 23:59, not 1500 minutes).
    let mut pieces = s.split(':');
    let hours: u32 = pieces.next().and_then(|p| p.trim().parse().ok()).unwrap_or(0);
    let minutes: u32 = pieces.next().and_then(|p| p.trim().parse().ok()).unwrap_or(0);
    let time = ClockTime((hours * 60 + minutes).min(1439) as u16);
    log::warn!("lenient clock parse: {text:?} read as {time}");

    ParsedClock {
        time,
        lenient: true,
    }
}

/// Parse `"9AM"`, `"9:30AM"`, `"930AM"`. None if the shape does not match.
fn parse_12h(s: &str) -> Option<ClockTime> {
    let (digits, is_pm) = if let Some(rest) = s.strip_suffix("PM") {
        (rest.trim_end(), true)
    } else if let Some(rest) = s.strip_suffix("AM") {
        (rest.trim_end(), false)
    } else {
        return None;
    };

    let (hour, minute): (u16, u16) = if let Some((h, m)) = digits.split_once(':') {
        (h.parse().ok()?, m.parse().ok()?)
    } else if digits.len() <= 2 {
        (digits.parse().ok()?, 0)
    } else if digits.len() <= 4 && digits.bytes().all(|b| b.is_ascii_digit()) {
        // No separator: the last two digits are the minutes.
        let (h, m) = digits.split_at(digits.len() - 2);
        (h.parse().ok()?, m.parse().ok()?)
    } else {
        return None;
    };

    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }

    let hour24 = match (hour, is_pm) {
        (12, true) => 12,
        (12, false) => 0,
        (h, true) => h + 12,
        (h, false) => h,
    };

    Some(ClockTime(hour24 * 60 + minute))
}

/// Parse 24-hour `"HH:MM"`. None if the shape does not match.
fn parse_24h(s: &str) -> Option<ClockTime> {
    let (h, m) = s.split_once(':')?;
    let hour: u16 = h.parse().ok()?;
    let minute: u16 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(ClockTime(hour * 60 + minute))
}

/// Render a clock time in 12-hour form: no leading zero on the hour, `:00`
/// minutes omitted — `0 → "12AM"`, `570 → "9:30AM"`, `720 → "12PM"`.
pub fn format_12h(time: ClockTime) -> String {
    let h24 = time.hour();
    let minute = time.minute();
    let suffix = if h24 < 12 { "AM" } else { "PM" };
    let mut h12 = h24 % 12;
    if h12 == 0 {
        h12 = 12;
    }
    if minute == 0 {
        format!("{h12}{suffix}")
    } else {
        format!("{h12}:{minute:02}{suffix}")
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
