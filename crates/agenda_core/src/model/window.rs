//! Time window value type.
//!
//! # Responsibility
//! - Validate `start < end` once, at construction.
//! - Provide the single overlap rule shared by conflict and availability
//!   checks.
//!
//! # Invariants
//! - A `TimeWindow` value always satisfies `start < end`.
//! - Both bounds fall in years `0000..=9999`, the range stored as
//!   fixed-width sortable text.
//! - Windows are half-open: `[start, end)`. Adjacent windows do not overlap.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// Rejected window bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRangeError {
    /// `start >= end`.
    Inverted {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// Bound outside years `0000..=9999`.
    OutOfRange { instant: NaiveDateTime },
}

impl Display for TimeRangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inverted { start, end } => write!(
                f,
                "start time must be before end time (start={start}, end={end})"
            ),
            Self::OutOfRange { instant } => write!(
                f,
                "instant {instant} is outside the supported years {MIN_YEAR:04}..={MAX_YEAR}"
            ),
        }
    }
}

impl Error for TimeRangeError {}

/// Half-open interval `[start, end)` between two local date-time instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow", into = "RawWindow")]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Serialize, Deserialize)]
struct RawWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<RawWindow> for TimeWindow {
    type Error = TimeRangeError;

    fn try_from(value: RawWindow) -> Result<Self, Self::Error> {
        TimeWindow::new(value.start, value.end)
    }
}

impl From<TimeWindow> for RawWindow {
    fn from(value: TimeWindow) -> Self {
        Self {
            start: value.start,
            end: value.end,
        }
    }
}

impl TimeWindow {
    /// Creates a window, rejecting empty, inverted or out-of-range bounds.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, TimeRangeError> {
        for instant in [start, end] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&instant.year()) {
                return Err(TimeRangeError::OutOfRange { instant });
            }
        }
        if start >= end {
            return Err(TimeRangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window covering one full calendar day, `[date 00:00, date+1 00:00)`.
    ///
    /// On 9999-12-31 the end is clamped to the last nanosecond of the day.
    pub fn for_day(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN);
        let end = date
            .succ_opt()
            .filter(|next| next.year() <= MAX_YEAR)
            .map(|next| next.and_time(NaiveTime::MIN))
            .or_else(|| {
                NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
                    .map(|last| date.and_time(last))
            })
            .unwrap_or(NaiveDateTime::MAX);
        Self { start, end }
    }

    /// Window covering the inclusive date range `from..=to`.
    pub fn for_days(from: NaiveDate, to: NaiveDate) -> Result<Self, TimeRangeError> {
        let start = Self::for_day(from).start;
        let end = Self::for_day(to).end;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Returns whether two windows share any instant.
    ///
    /// `[s1, e1)` and `[s2, e2)` overlap iff `s1 < e2 && e1 > s2`.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Returns whether the window ends on a later calendar date than it starts.
    pub fn spans_midnight(&self) -> bool {
        self.end > Self::for_day(self.start.date()).end
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::{TimeRangeError, TimeWindow};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn new_rejects_inverted_and_empty_windows() {
        assert!(TimeWindow::new(at(10, 11, 0), at(10, 10, 0)).is_err());
        let err = TimeWindow::new(at(10, 10, 0), at(10, 10, 0)).unwrap_err();
        assert!(matches!(err, TimeRangeError::Inverted { start, end } if start == end));
    }

    #[test]
    fn new_rejects_bounds_past_year_9999() {
        let last_day = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        let start = last_day.and_hms_opt(23, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(10000, 1, 1)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap();

        assert_eq!(
            TimeWindow::new(start, end).unwrap_err(),
            TimeRangeError::OutOfRange { instant: end }
        );
        assert!(TimeWindow::new(start, last_day.and_hms_opt(23, 30, 0).unwrap()).is_ok());
    }

    #[test]
    fn last_supported_day_window_stays_in_range() {
        let last_day = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        let day = TimeWindow::for_day(last_day);

        assert_eq!(day.end().date(), last_day);
        assert!(TimeWindow::new(day.start(), day.end()).is_ok());
        assert!(TimeWindow::for_days(last_day, last_day).is_ok());
    }

    #[test]
    fn overlapping_windows_conflict() {
        let existing = TimeWindow::new(at(10, 10, 0), at(10, 11, 0)).unwrap();
        let proposed = TimeWindow::new(at(10, 10, 30), at(10, 11, 30)).unwrap();
        assert!(existing.overlaps(&proposed));
        assert!(proposed.overlaps(&existing));
    }

    #[test]
    fn adjacent_windows_do_not_conflict() {
        let existing = TimeWindow::new(at(10, 10, 0), at(10, 11, 0)).unwrap();
        let proposed = TimeWindow::new(at(10, 11, 0), at(10, 12, 0)).unwrap();
        assert!(!existing.overlaps(&proposed));
        assert!(!proposed.overlaps(&existing));
    }

    #[test]
    fn contained_window_conflicts() {
        let outer = TimeWindow::new(at(10, 9, 0), at(10, 17, 0)).unwrap();
        let inner = TimeWindow::new(at(10, 12, 0), at(10, 12, 15)).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn day_window_covers_midnight_to_midnight() {
        let day = TimeWindow::for_day(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(day.start(), at(10, 0, 0));
        assert_eq!(day.end(), at(11, 0, 0));
        assert!(!day.spans_midnight());
    }

    #[test]
    fn late_evening_window_spans_midnight() {
        let window = TimeWindow::new(at(10, 23, 0), at(11, 1, 0)).unwrap();
        assert!(window.spans_midnight());
        assert!(window.overlaps(&TimeWindow::for_day(
            NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()
        )));
    }

    #[test]
    fn deserialization_enforces_ordering() {
        let raw = r#"{"start":"2024-01-10T11:00:00","end":"2024-01-10T10:00:00"}"#;
        assert!(serde_json::from_str::<TimeWindow>(raw).is_err());
    }
}
