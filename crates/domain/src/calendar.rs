use chrono_tz::{Tz, UTC};

/// Settings that decide how recurring events are laid out in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarSettings {
    /// Recurring events keep their wall-clock time in this timezone
    pub timezone: Tz,
}

impl CalendarSettings {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn set_timezone(&mut self, timezone: &str) -> bool {
        match timezone.parse::<Tz>() {
            Ok(tzid) => {
                self.timezone = tzid;
                true
            }
            Err(_) => false,
        }
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self { timezone: UTC }
    }
}
