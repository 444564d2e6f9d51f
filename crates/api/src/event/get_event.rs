use crate::{
    error::CalendarError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use onboarding_calendar_api_structs::get_event::*;
use onboarding_calendar_domain::{CalendarEvent, ID};
use onboarding_calendar_infra::CalendarContext;

fn handle_error(e: UseCaseErrors) -> CalendarError {
    match e {
        UseCaseErrors::NotFound(event_id) => CalendarError::NotFound(format!(
            "The calendar event with id: {}, was not found.",
            event_id
        )),
    }
}

pub async fn get_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<CalendarContext>,
) -> Result<HttpResponse, CalendarError> {
    let usecase = GetEventUseCase {
        event_id: path_params.event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|calendar_event| HttpResponse::Ok().json(APIResponse::new(calendar_event)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetEventUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    NotFound(ID),
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventUseCase {
    type Response = CalendarEvent;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetEvent";

    async fn execute(&mut self, ctx: &CalendarContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos
            .events
            .find(&self.event_id)
            .await
            .ok_or(UseCaseErrors::NotFound(self.event_id))
    }
}
