use chrono::{DateTime, Utc};
use thiserror::Error;

/// Half-open time window `[start, end)` a facility can be booked for.
/// Construction guarantees `end > start`, so a slot never has a
/// non-positive duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeSlot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("slot must end after it starts: start={start}, end={end}")]
pub struct InvalidTimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, InvalidTimeSlot> {
        if end > start {
            Ok(Self { start, end })
        } else {
            Err(InvalidTimeSlot { start, end })
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Two half-open windows share an instant unless one ends before (or
    /// exactly when) the other starts.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }

    /// Whole minutes between start and end. Seconds beyond the last full
    /// minute are dropped, matching how the billing arithmetic counts time.
    pub fn duration_minutes(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_minutes()
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_minutes() as f64 / 60.0
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
