use crate::{APIResponse, BaseClient, ID};
use chrono::{DateTime, Utc};
use onboarding_calendar_api_structs::*;
use onboarding_calendar_domain::Metadata;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct CalendarEventClient {
    base: Arc<BaseClient>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateEventInput {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: Option<bool>,
    pub recurrence_rule: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEventInput {
    pub event_id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
    /// `Some("")` stops the event from repeating
    pub recurrence_rule: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone)]
pub struct GetEventInstancesInput {
    pub event_id: ID,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GetEventsInstancesInput {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub timezone: Option<String>,
}

impl CalendarEventClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// `event_id` may also be the id of one of the event's instances
    pub async fn delete<T: Into<String>>(
        &self,
        event_id: T,
    ) -> APIResponse<delete_event::APIResponse> {
        self.base
            .delete(format!("events/{}", event_id.into()), StatusCode::OK)
            .await
    }

    pub async fn get(&self, event_id: ID) -> APIResponse<get_event::APIResponse> {
        self.base
            .get(format!("events/{}", event_id), StatusCode::OK)
            .await
    }

    pub async fn get_instances(
        &self,
        input: GetEventInstancesInput,
    ) -> APIResponse<get_event_instances::APIResponse> {
        let query = InstancesQueryParams {
            start_time: input.start_time,
            end_time: input.end_time,
            timezone: input.timezone,
        };
        self.base
            .get_with_query(
                format!("events/{}/instances", input.event_id),
                &query,
                StatusCode::OK,
            )
            .await
    }

    pub async fn get_all_instances(
        &self,
        input: GetEventsInstancesInput,
    ) -> APIResponse<get_events_instances::APIResponse> {
        let query = InstancesQueryParams {
            start_time: input.start_time,
            end_time: input.end_time,
            timezone: input.timezone,
        };
        self.base
            .get_with_query("events/instances".into(), &query, StatusCode::OK)
            .await
    }

    pub async fn create(&self, input: CreateEventInput) -> APIResponse<create_event::APIResponse> {
        let body = create_event::RequestBody {
            title: input.title,
            description: input.description,
            start_time: input.start_time,
            end_time: input.end_time,
            all_day: input.all_day,
            recurrence_rule: input.recurrence_rule,
            color: input.color,
            location: input.location,
            metadata: input.metadata,
        };

        self.base
            .post(body, "events".into(), StatusCode::CREATED)
            .await
    }

    pub async fn update(&self, input: UpdateEventInput) -> APIResponse<update_event::APIResponse> {
        let event_id = input.event_id;
        let body = update_event::RequestBody {
            title: input.title,
            description: input.description,
            start_time: input.start_time,
            end_time: input.end_time,
            all_day: input.all_day,
            recurrence_rule: input.recurrence_rule,
            color: input.color,
            location: input.location,
            metadata: input.metadata,
        };
        self.base
            .put(body, format!("events/{}", event_id), StatusCode::OK)
            .await
    }
}
