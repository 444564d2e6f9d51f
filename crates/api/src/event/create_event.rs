use super::validate_recurrence_rule;
use crate::error::CalendarError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use onboarding_calendar_api_structs::create_event::*;
use onboarding_calendar_domain::{CalendarEvent, Metadata};
use onboarding_calendar_infra::CalendarContext;

fn handle_error(e: UseCaseErrors) -> CalendarError {
    match e {
        UseCaseErrors::InvalidRecurrenceRule(reason) => CalendarError::BadClientData(format!(
            "Invalid recurrence rule specified for the event: {}",
            reason
        )),
        UseCaseErrors::InvalidTimes => CalendarError::BadClientData(
            "The provided startTime and endTime is invalid, the event must end after it starts"
                .into(),
        ),
        UseCaseErrors::StorageError => CalendarError::InternalError,
    }
}

pub async fn create_event_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<CalendarContext>,
) -> Result<HttpResponse, CalendarError> {
    let body = body.0;
    let usecase = CreateEventUseCase {
        title: body.title,
        description: body.description,
        start_time: body.start_time,
        end_time: body.end_time,
        all_day: body.all_day.unwrap_or(false),
        recurrence_rule: body.recurrence_rule,
        color: body.color,
        location: body.location,
        metadata: body.metadata.unwrap_or_default(),
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Created().json(APIResponse::new(event)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
    pub recurrence_rule: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub metadata: Metadata,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    InvalidRecurrenceRule(String),
    InvalidTimes,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateEventUseCase {
    type Response = CalendarEvent;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "CreateEvent";

    async fn execute(&mut self, ctx: &CalendarContext) -> Result<Self::Response, Self::Errors> {
        let rule = validate_recurrence_rule(self.recurrence_rule.as_deref(), ctx)
            .map_err(UseCaseErrors::InvalidRecurrenceRule)?;

        let now = ctx.sys.get_timestamp_millis();
        let mut e = CalendarEvent {
            id: Default::default(),
            title: self.title.clone(),
            description: self.description.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            all_day: self.all_day,
            recurrence_rule: None,
            color: self.color.clone(),
            location: self.location.clone(),
            metadata: self.metadata.clone(),
            created: now,
            updated: now,
        };
        e.set_recurrence(rule.as_ref());

        if !e.normalize_all_day_bounds(&ctx.config.default_timezone) || !e.has_valid_times() {
            return Err(UseCaseErrors::InvalidTimes);
        }

        ctx.repos
            .events
            .insert(&e)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        Ok(e)
    }
}
