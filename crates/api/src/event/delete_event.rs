use crate::{
    error::CalendarError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use onboarding_calendar_api_structs::delete_event::*;
use onboarding_calendar_domain::{resolve_event_id, CalendarEvent};
use onboarding_calendar_infra::CalendarContext;

fn handle_error(e: UseCaseErrors) -> CalendarError {
    match e {
        UseCaseErrors::NotFound(event_id) => CalendarError::NotFound(format!(
            "The calendar event with id: {}, was not found.",
            event_id
        )),
    }
}

pub async fn delete_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<CalendarContext>,
) -> Result<HttpResponse, CalendarError> {
    let usecase = DeleteEventUseCase {
        event_id: path_params.into_inner().event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(handle_error)
}

/// Deletes a stored event. `event_id` may also be the id of one of its
/// instances, in which case the whole series is deleted.
#[derive(Debug)]
pub struct DeleteEventUseCase {
    pub event_id: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    NotFound(String),
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteEventUseCase {
    type Response = CalendarEvent;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "DeleteEvent";

    async fn execute(&mut self, ctx: &CalendarContext) -> Result<Self::Response, Self::Errors> {
        let event_id = resolve_event_id(&self.event_id)
            .ok_or_else(|| UseCaseErrors::NotFound(self.event_id.clone()))?;

        ctx.repos
            .events
            .delete(&event_id)
            .await
            .ok_or_else(|| UseCaseErrors::NotFound(self.event_id.clone()))
    }
}
