use crate::dtos::CalendarEventDTO;
use chrono::{DateTime, Utc};
use onboarding_calendar_domain::{CalendarEvent, EventInstance, Metadata, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventResponse {
    pub event: CalendarEventDTO,
}

impl CalendarEventResponse {
    pub fn new(event: CalendarEvent) -> Self {
        Self {
            event: CalendarEventDTO::new(event),
        }
    }
}

/// Window that instances are requested for, `startTime` inclusive and
/// `endTime` exclusive. `timezone` is an IANA name, the server default
/// is used when it is missing.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstancesQueryParams {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub timezone: Option<String>,
}

pub mod create_event {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        #[serde(default)]
        pub description: Option<String>,
        pub start_time: DateTime<Utc>,
        pub end_time: DateTime<Utc>,
        #[serde(default)]
        pub all_day: Option<bool>,
        #[serde(default)]
        pub recurrence_rule: Option<String>,
        #[serde(default)]
        pub color: Option<String>,
        #[serde(default)]
        pub location: Option<String>,
        #[serde(default)]
        pub metadata: Option<Metadata>,
    }

    pub type APIResponse = CalendarEventResponse;
}

pub mod delete_event {
    use super::*;

    /// `event_id` may also be the id of one of the event's instances
    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: String,
    }

    pub type APIResponse = CalendarEventResponse;
}

pub mod get_event_instances {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type QueryParams = InstancesQueryParams;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub event: CalendarEventDTO,
        pub instances: Vec<EventInstance>,
    }

    impl APIResponse {
        pub fn new(event: CalendarEvent, instances: Vec<EventInstance>) -> Self {
            Self {
                event: CalendarEventDTO::new(event),
                instances,
            }
        }
    }
}

pub mod get_events_instances {
    use super::*;

    pub type QueryParams = InstancesQueryParams;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub instances: Vec<EventInstance>,
    }

    impl APIResponse {
        pub fn new(instances: Vec<EventInstance>) -> Self {
            Self { instances }
        }
    }
}

pub mod get_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type APIResponse = CalendarEventResponse;
}

pub mod update_event {
    use super::*;

    /// Only the given fields are changed. An empty `recurrenceRule` stops
    /// the event from repeating.
    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub start_time: Option<DateTime<Utc>>,
        #[serde(default)]
        pub end_time: Option<DateTime<Utc>>,
        #[serde(default)]
        pub all_day: Option<bool>,
        #[serde(default)]
        pub recurrence_rule: Option<String>,
        #[serde(default)]
        pub color: Option<String>,
        #[serde(default)]
        pub location: Option<String>,
        #[serde(default)]
        pub metadata: Option<Metadata>,
    }

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type APIResponse = CalendarEventResponse;
}
