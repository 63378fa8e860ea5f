//! Pickup time handling.
//!
//! The booking flow hands over pickup times as "HH:MM" strings, or the
//! literal "now" when the customer wants a car immediately. Surcharges only
//! care about the clock time, so no date is attached.

use std::fmt;

use chrono::{NaiveTime, Timelike};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse a clock time from "HH:MM" format.
///
/// # Examples
///
/// ```
/// use fare_engine::domain::parse_hhmm;
///
/// assert!(parse_hhmm("00:00").is_ok());
/// assert!(parse_hhmm("23:59").is_ok());
///
/// assert!(parse_hhmm("2300").is_err());
/// assert!(parse_hhmm("9:30").is_err());
/// assert!(parse_hhmm("24:00").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    let bytes = s.as_bytes();
    if bytes.len() != 5 {
        return Err(TimeError::new("expected HH:MM format"));
    }

    if bytes[2] != b':' {
        return Err(TimeError::new("expected colon at position 2"));
    }

    let hour =
        parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }

    let minute =
        parse_two_digits(&bytes[3..5]).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))
}

fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    let [d1, d2] = bytes else {
        return None;
    };
    let d1 = (*d1 as char).to_digit(10)?;
    let d2 = (*d2 as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// When the customer wants to be picked up.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupTime {
    /// As soon as possible; the clock time is not known at quote time.
    Now,
    /// A specific clock time.
    At(NaiveTime),
}

impl PickupTime {
    /// Parse `"now"` (any case) or an "HH:MM" time.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("now") {
            return Ok(PickupTime::Now);
        }
        parse_hhmm(s).map(PickupTime::At)
    }

    /// The clock time, if one was given.
    pub fn clock(&self) -> Option<NaiveTime> {
        match self {
            PickupTime::Now => None,
            PickupTime::At(t) => Some(*t),
        }
    }
}

impl fmt::Debug for PickupTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PickupTime({self})")
    }
}

impl fmt::Display for PickupTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickupTime::Now => f.write_str("now"),
            PickupTime::At(t) => write!(f, "{:02}:{:02}", t.hour(), t.minute()),
        }
    }
}

/// A half-open range of clock times, `[start, end)`.
///
/// When `start` is later than `end` the window wraps past midnight, so
/// `22:00..06:00` contains both 23:30 and 05:59 but not 06:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl ClockWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Check whether the window contains a clock time.
    ///
    /// An empty window (`start == end`) contains nothing.
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= t && t < self.end
        } else {
            t >= self.start || t < self.end
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_time()(hour in 0u32..24, minute in 0u32..60) -> String {
            format!("{:02}:{:02}", hour, minute)
        }
    }

    prop_compose! {
        fn clock()(hour in 0u32..24, minute in 0u32..60) -> NaiveTime {
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
        }
    }

    proptest! {
        #[test]
        fn parse_display_roundtrip(s in valid_time()) {
            let parsed = PickupTime::parse(&s).unwrap();
            prop_assert_eq!(parsed.to_string(), s);
        }

        #[test]
        fn invalid_hour_rejected(hour in 24u32..100, minute in 0u32..60) {
            let s = format!("{:02}:{:02}", hour, minute);
            prop_assert!(parse_hhmm(&s).is_err());
        }

        #[test]
        fn invalid_minute_rejected(hour in 0u32..24, minute in 60u32..100) {
            let s = format!("{:02}:{:02}", hour, minute);
            prop_assert!(parse_hhmm(&s).is_err());
        }

        /// A wrapping window and its complement partition the day
        #[test]
        fn window_and_complement_partition(start in clock(), end in clock(), t in clock()) {
            prop_assume!(start != end);
            let window = ClockWindow::new(start, end);
            let complement = ClockWindow::new(end, start);
            prop_assert!(window.contains(t) != complement.contains(t));
        }
    }
}
