use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Half-open `[start, end)` range of time, typically the visible range of a
/// calendar view that instances are requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Error, Debug, PartialEq)]
#[error("Provided timespan start: {0} and end: {1} is invalid. The start must be before the end.")]
pub struct InvalidTimeSpanError(pub DateTime<Utc>, pub DateTime<Utc>);

impl TimeSpan {
    pub fn create(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, InvalidTimeSpanError> {
        if start >= end {
            return Err(InvalidTimeSpanError(start, end));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn greater_than(&self, duration: Duration) -> bool {
        self.duration() > duration
    }

    /// Whether an instance lasting from `start` to `end` should be shown in
    /// this span: it either starts inside the span or is still running when
    /// the span begins.
    pub fn intersects(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        if start >= self.start {
            start < self.end
        } else {
            end > self.start
        }
    }
}
