use chrono::{DateTime, Utc};
use onboarding_calendar_domain::{CalendarEvent, Metadata, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventDTO {
    pub id: ID,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
    pub recurrence_rule: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub metadata: Metadata,
    pub created: i64,
    pub updated: i64,
}

impl CalendarEventDTO {
    pub fn new(event: CalendarEvent) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            start_time: event.start_time,
            end_time: event.end_time,
            all_day: event.all_day,
            recurrence_rule: event.recurrence_rule,
            color: event.color,
            location: event.location,
            metadata: event.metadata,
            created: event.created,
            updated: event.updated,
        }
    }
}
