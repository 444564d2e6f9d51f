use crate::{
    calendar::CalendarSettings,
    date::{end_of_day, start_of_day},
    event_instance::EventInstance,
    occurrence,
    shared::{
        entity::{Entity, ID},
        metadata::Metadata,
        recurrence::{MalformedRuleError, RecurrenceRule},
    },
    timespan::TimeSpan,
};
use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// The stored calendar item (a calendar event or a meeting). A recurring
/// event is stored once and only its `EventInstance`s are derived per query.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: ID,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
    /// Stored as written, e.g. `FREQ=WEEKLY;COUNT=10`, and parsed on every expansion
    pub recurrence_rule: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub metadata: Metadata,
    pub created: i64,
    pub updated: i64,
}

impl Entity for CalendarEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl CalendarEvent {
    pub fn recurrence(&self) -> Result<Option<RecurrenceRule>, MalformedRuleError> {
        RecurrenceRule::parse_optional(self.recurrence_rule.as_deref())
    }

    /// Stores the rule in its canonical string form, `None` stops the event from repeating
    pub fn set_recurrence(&mut self, rule: Option<&RecurrenceRule>) {
        self.recurrence_rule = rule.map(|rule| rule.to_string());
    }

    /// Timed events must end after they start. All-day events are only
    /// required not to end before they start.
    pub fn has_valid_times(&self) -> bool {
        if self.all_day {
            self.end_time >= self.start_time
        } else {
            self.end_time > self.start_time
        }
    }

    /// Stretches an all-day event to cover whole days in `tz`, from 00:00:00
    /// on its first day to 23:59:59 on its last. An end at exactly midnight
    /// is read as the end of the previous day.
    ///
    /// This is the responsibility of whoever stores the event, expansion
    /// never changes the stored times. Returns false if the bounds cannot be
    /// represented.
    pub fn normalize_all_day_bounds(&mut self, tz: &Tz) -> bool {
        if !self.all_day {
            return true;
        }
        let local_start = self.start_time.with_timezone(tz);
        let local_end = self.end_time.with_timezone(tz);
        let first_day = local_start.date_naive();
        let mut last_day = local_end.date_naive();
        if local_end.num_seconds_from_midnight() == 0 && local_end.nanosecond() == 0 {
            last_day = last_day.pred_opt().unwrap_or(last_day).max(first_day);
        }

        match (start_of_day(tz, first_day), end_of_day(tz, last_day)) {
            (Some(start), Some(end)) => {
                self.start_time = start;
                self.end_time = end;
                true
            }
            _ => false,
        }
    }

    /// Expands this event into the instances that should be shown in `timespan`.
    ///
    /// A missing rule gives the event itself. A rule that cannot be parsed is
    /// logged and the event is shown as if it did not repeat.
    pub fn expand(&self, timespan: &TimeSpan, settings: &CalendarSettings) -> Vec<EventInstance> {
        let rule = match self.recurrence() {
            Ok(rule) => rule,
            Err(e) => {
                warn!(
                    event_id = %self.id,
                    rule = ?self.recurrence_rule,
                    "Malformed recurrence rule, showing the event without recurrence: {}",
                    e
                );
                None
            }
        };

        match rule {
            Some(rule) => {
                occurrence::generate(&rule, self.start_time, self.end_time, &settings.timezone)
                    .into_iter()
                    .filter(|occurrence| timespan.intersects(occurrence.start, occurrence.end))
                    .map(|occurrence| EventInstance::from_occurrence(self, &occurrence))
                    .collect()
            }
            None => {
                if timespan.intersects(self.start_time, self.end_time) {
                    vec![EventInstance::from_master(self)]
                } else {
                    vec![]
                }
            }
        }
    }
}
