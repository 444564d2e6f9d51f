use super::{parse_instances_query, InstancesQueryError};
use crate::{
    error::CalendarError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use onboarding_calendar_api_structs::get_event_instances::*;
use onboarding_calendar_domain::{CalendarEvent, EventInstance, ID};
use onboarding_calendar_infra::CalendarContext;

fn handle_error(e: UseCaseErrors) -> CalendarError {
    match e {
        UseCaseErrors::InvalidQuery(e) => e.into(),
        UseCaseErrors::NotFound(event_id) => CalendarError::NotFound(format!(
            "The calendar event with id: {}, was not found.",
            event_id
        )),
    }
}

pub async fn get_event_instances_controller(
    path_params: web::Path<PathParams>,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<CalendarContext>,
) -> Result<HttpResponse, CalendarError> {
    let usecase = GetEventInstancesUseCase {
        event_id: path_params.event_id,
        query: query_params.0,
    };

    execute(usecase, &ctx)
        .await
        .map(|usecase_res| {
            HttpResponse::Ok().json(APIResponse::new(usecase_res.event, usecase_res.instances))
        })
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetEventInstancesUseCase {
    pub event_id: ID,
    pub query: QueryParams,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    NotFound(ID),
    InvalidQuery(InstancesQueryError),
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub event: CalendarEvent,
    pub instances: Vec<EventInstance>,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventInstancesUseCase {
    type Response = UseCaseResponse;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetEventInstances";

    async fn execute(&mut self, ctx: &CalendarContext) -> Result<Self::Response, Self::Errors> {
        let (timespan, settings) =
            parse_instances_query(&self.query, ctx).map_err(UseCaseErrors::InvalidQuery)?;

        match ctx.repos.events.find(&self.event_id).await {
            Some(event) => {
                let instances = event.expand(&timespan, &settings);
                Ok(UseCaseResponse { event, instances })
            }
            None => Err(UseCaseErrors::NotFound(self.event_id)),
        }
    }
}
