use super::{parse_instances_query, InstancesQueryError};
use crate::{
    error::CalendarError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use onboarding_calendar_api_structs::get_events_instances::*;
use onboarding_calendar_domain::{expand_events, EventInstance};
use onboarding_calendar_infra::CalendarContext;

fn handle_error(e: UseCaseErrors) -> CalendarError {
    match e {
        UseCaseErrors::InvalidQuery(e) => e.into(),
        UseCaseErrors::StorageError => CalendarError::InternalError,
    }
}

pub async fn get_events_instances_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<CalendarContext>,
) -> Result<HttpResponse, CalendarError> {
    let usecase = GetEventsInstancesUseCase {
        query: query_params.0,
    };

    execute(usecase, &ctx)
        .await
        .map(|instances| HttpResponse::Ok().json(APIResponse::new(instances)))
        .map_err(handle_error)
}

/// Every instance of every stored event in the requested window, as one
/// list ordered by start time.
#[derive(Debug)]
pub struct GetEventsInstancesUseCase {
    pub query: QueryParams,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    InvalidQuery(InstancesQueryError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventsInstancesUseCase {
    type Response = Vec<EventInstance>;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetEventsInstances";

    async fn execute(&mut self, ctx: &CalendarContext) -> Result<Self::Response, Self::Errors> {
        let (timespan, settings) =
            parse_instances_query(&self.query, ctx).map_err(UseCaseErrors::InvalidQuery)?;

        let events = ctx
            .repos
            .events
            .find_all()
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        Ok(expand_events(&events, &timespan, &settings))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use onboarding_calendar_domain::CalendarEvent;
    use onboarding_calendar_infra::setup_context;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    async fn insert_event(
        ctx: &CalendarContext,
        title: &str,
        start_time: DateTime<Utc>,
        rule: Option<&str>,
    ) -> CalendarEvent {
        let event = CalendarEvent {
            id: Default::default(),
            title: title.into(),
            description: None,
            start_time,
            end_time: start_time + Duration::hours(1),
            all_day: false,
            recurrence_rule: rule.map(String::from),
            color: None,
            location: None,
            metadata: Default::default(),
            created: 0,
            updated: 0,
        };
        ctx.repos.events.insert(&event).await.unwrap();
        event
    }

    #[actix_web::test]
    async fn merges_instances_of_all_events_by_start_time() {
        let mut ctx = setup_context().await;
        ctx.config.default_timezone = chrono_tz::UTC;
        let weekly = insert_event(
            &ctx,
            "Weekly 1:1",
            utc(2021, 3, 1, 10),
            Some("FREQ=WEEKLY;COUNT=3"),
        )
        .await;
        let single = insert_event(&ctx, "Welcome lunch", utc(2021, 3, 3, 12), None).await;
        let daily = insert_event(
            &ctx,
            "Standup",
            utc(2021, 3, 1, 9),
            Some("FREQ=DAILY;COUNT=2"),
        )
        .await;
        let broken = insert_event(
            &ctx,
            "Imported",
            utc(2021, 3, 2, 15),
            Some("FREQ=SOMETIMES"),
        )
        .await;

        let mut usecase = GetEventsInstancesUseCase {
            query: QueryParams {
                start_time: utc(2021, 3, 1, 0),
                end_time: utc(2021, 3, 15, 0),
                timezone: None,
            },
        };
        let instances = usecase.execute(&ctx).await.expect("To expand events");

        let summary = instances
            .iter()
            .map(|instance| (instance.original_id, instance.start_time))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                (daily.id, utc(2021, 3, 1, 9)),
                (weekly.id, utc(2021, 3, 1, 10)),
                (daily.id, utc(2021, 3, 2, 9)),
                (broken.id, utc(2021, 3, 2, 15)),
                (single.id, utc(2021, 3, 3, 12)),
                (weekly.id, utc(2021, 3, 8, 10)),
            ]
        );
        assert!(instances
            .iter()
            .filter(|instance| instance.original_id == broken.id)
            .all(|instance| !instance.is_recurring_instance));
    }

    #[actix_web::test]
    async fn no_events_gives_no_instances() {
        let ctx = setup_context().await;

        let mut usecase = GetEventsInstancesUseCase {
            query: QueryParams {
                start_time: utc(2021, 3, 1, 0),
                end_time: utc(2021, 4, 1, 0),
                timezone: Some("Europe/Oslo".into()),
            },
        };
        assert_eq!(usecase.execute(&ctx).await, Ok(vec![]));
    }
}
