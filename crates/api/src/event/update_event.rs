use super::validate_recurrence_rule;
use crate::{
    error::CalendarError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use onboarding_calendar_api_structs::update_event::*;
use onboarding_calendar_domain::{CalendarEvent, Metadata, ID};
use onboarding_calendar_infra::CalendarContext;

fn handle_error(e: UseCaseErrors) -> CalendarError {
    match e {
        UseCaseErrors::NotFound(event_id) => CalendarError::NotFound(format!(
            "The calendar event with id: {}, was not found.",
            event_id
        )),
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

pub async fn update_event_controller(
    body: web::Json<RequestBody>,
    path_params: web::Path<PathParams>,
    ctx: web::Data<CalendarContext>,
) -> Result<HttpResponse, CalendarError> {
    let body = body.0;
    let usecase = UpdateEventUseCase {
        event_id: path_params.event_id,
        title: body.title,
        description: body.description,
        start_time: body.start_time,
        end_time: body.end_time,
        all_day: body.all_day,
        recurrence_rule: body.recurrence_rule,
        color: body.color,
        location: body.location,
        metadata: body.metadata,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(handle_error)
}

#[derive(Debug, Default)]
pub struct UpdateEventUseCase {
    pub event_id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
    pub recurrence_rule: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    NotFound(ID),
    InvalidRecurrenceRule(String),
    InvalidTimes,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateEventUseCase {
    type Response = CalendarEvent;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "UpdateEvent";

    async fn execute(&mut self, ctx: &CalendarContext) -> Result<Self::Response, Self::Errors> {
        let UpdateEventUseCase {
            event_id,
            title,
            description,
            start_time,
            end_time,
            all_day,
            recurrence_rule,
            color,
            location,
            metadata,
        } = self;

        let mut e = match ctx.repos.events.find(event_id).await {
            Some(event) => event,
            None => return Err(UseCaseErrors::NotFound(*event_id)),
        };

        if let Some(rule) = recurrence_rule {
            let rule = validate_recurrence_rule(Some(rule.as_str()), ctx)
                .map_err(UseCaseErrors::InvalidRecurrenceRule)?;
            e.set_recurrence(rule.as_ref());
        }

        if let Some(title) = title.take() {
            e.title = title;
        }
        if description.is_some() {
            e.description = description.take();
        }
        if color.is_some() {
            e.color = color.take();
        }
        if location.is_some() {
            e.location = location.take();
        }
        if let Some(metadata) = metadata.take() {
            e.metadata = metadata;
        }

        if let Some(start_time) = start_time {
            e.start_time = *start_time;
        }
        if let Some(end_time) = end_time {
            e.end_time = *end_time;
        }
        if let Some(all_day) = all_day {
            e.all_day = *all_day;
        }
        if !e.normalize_all_day_bounds(&ctx.config.default_timezone) || !e.has_valid_times() {
            return Err(UseCaseErrors::InvalidTimes);
        }

        e.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .events
            .save(&e)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        Ok(e)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, TimeZone};
    use onboarding_calendar_infra::{setup_context, StaticTimeSys};
    use std::sync::Arc;

    async fn setup() -> (CalendarContext, CalendarEvent) {
        let mut ctx = setup_context().await;
        ctx.sys = Arc::new(StaticTimeSys(2_000));
        let start_time = Utc.with_ymd_and_hms(2021, 3, 1, 9, 0, 0).unwrap();
        let event = CalendarEvent {
            id: Default::default(),
            title: "Daily standup".into(),
            description: Some("Team sync".into()),
            start_time,
            end_time: start_time + Duration::minutes(15),
            all_day: false,
            recurrence_rule: Some("FREQ=DAILY;COUNT=5".into()),
            color: None,
            location: None,
            metadata: Default::default(),
            created: 1_000,
            updated: 1_000,
        };
        ctx.repos.events.insert(&event).await.unwrap();
        (ctx, event)
    }

    #[actix_web::test]
    async fn updates_only_given_fields() {
        let (ctx, event) = setup().await;

        let mut usecase = UpdateEventUseCase {
            event_id: event.id,
            title: Some("Standup".into()),
            color: Some("#00ff00".into()),
            ..Default::default()
        };
        let updated = usecase.execute(&ctx).await.expect("To update event");

        assert_eq!(updated.title, "Standup");
        assert_eq!(updated.color.as_deref(), Some("#00ff00"));
        assert_eq!(updated.description, event.description);
        assert_eq!(updated.recurrence_rule, event.recurrence_rule);
        assert_eq!(updated.created, 1_000);
        assert_eq!(updated.updated, 2_000);
        assert_eq!(ctx.repos.events.find(&event.id).await, Some(updated));
    }

    #[actix_web::test]
    async fn empty_rule_stops_recurrence() {
        let (ctx, event) = setup().await;

        let mut usecase = UpdateEventUseCase {
            event_id: event.id,
            recurrence_rule: Some("".into()),
            ..Default::default()
        };
        let updated = usecase.execute(&ctx).await.expect("To update event");

        assert_eq!(updated.recurrence_rule, None);
    }

    #[actix_web::test]
    async fn rejects_invalid_changes() {
        let (ctx, event) = setup().await;

        let mut usecase = UpdateEventUseCase {
            event_id: event.id,
            recurrence_rule: Some("FREQ=YEARLY;BYDAY=MO".into()),
            ..Default::default()
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseErrors::InvalidRecurrenceRule(_))
        ));

        let mut usecase = UpdateEventUseCase {
            event_id: event.id,
            end_time: Some(event.start_time - Duration::hours(1)),
            ..Default::default()
        };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseErrors::InvalidTimes
        );

        let unknown_id = ID::default();
        let mut usecase = UpdateEventUseCase {
            event_id: unknown_id,
            ..Default::default()
        };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseErrors::NotFound(unknown_id)
        );

        assert_eq!(ctx.repos.events.find(&event.id).await, Some(event));
    }
}
