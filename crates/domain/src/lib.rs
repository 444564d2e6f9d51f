mod calendar;
pub mod date;
mod event;
mod event_instance;
pub mod occurrence;
mod shared;
mod timespan;

pub use calendar::CalendarSettings;
pub use event::CalendarEvent;
pub use event_instance::{expand_events, occurrence_id, resolve_event_id, EventInstance};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use shared::metadata::Metadata;
pub use shared::recurrence::{
    InvalidWeekDayError, MalformedRuleError, RRuleFrequency, RecurrenceRule, WeekDay,
};
pub use timespan::{InvalidTimeSpanError, TimeSpan};

pub use chrono::Weekday;
pub use chrono_tz::Tz;
