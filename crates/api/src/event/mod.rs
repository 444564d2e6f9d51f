mod create_event;
mod delete_event;
mod get_event;
mod get_event_instances;
mod get_events_instances;
mod update_event;

use crate::error::CalendarError;
use actix_web::web;
use create_event::create_event_controller;
use delete_event::delete_event_controller;
use get_event::get_event_controller;
use get_event_instances::get_event_instances_controller;
use get_events_instances::get_events_instances_controller;
use onboarding_calendar_api_structs::InstancesQueryParams;
use onboarding_calendar_domain::{CalendarSettings, RecurrenceRule, TimeSpan};
use onboarding_calendar_infra::CalendarContext;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/events", web::post().to(create_event_controller));

    // Must be registered before `/events/{event_id}` to not be read as an event id
    cfg.route(
        "/events/instances",
        web::get().to(get_events_instances_controller),
    );

    cfg.route("/events/{event_id}", web::get().to(get_event_controller));
    cfg.route(
        "/events/{event_id}",
        web::put().to(update_event::update_event_controller),
    );
    cfg.route(
        "/events/{event_id}",
        web::delete().to(delete_event_controller),
    );

    cfg.route(
        "/events/{event_id}/instances",
        web::get().to(get_event_instances_controller),
    );
}

/// Rules are stored only after they pass the same parser used when
/// expanding, so stored events never fall back to showing a single instance.
fn validate_recurrence_rule(
    rule: Option<&str>,
    ctx: &CalendarContext,
) -> Result<Option<RecurrenceRule>, String> {
    let rule = RecurrenceRule::parse_optional(rule).map_err(|e| e.to_string())?;
    if let Some(count) = rule.as_ref().and_then(|rule| rule.count()) {
        if count > ctx.config.max_recurrence_count {
            return Err(format!(
                "COUNT={} is more than the allowed {} occurrences",
                count, ctx.config.max_recurrence_count
            ));
        }
    }
    Ok(rule)
}

#[derive(Debug, PartialEq)]
pub enum InstancesQueryError {
    InvalidTimespan,
    TimespanTooLong,
    UnknownTimezone(String),
}

impl From<InstancesQueryError> for CalendarError {
    fn from(e: InstancesQueryError) -> Self {
        match e {
            InstancesQueryError::InvalidTimespan => {
                Self::BadClientData("The provided startTime and endTime is invalid".into())
            }
            InstancesQueryError::TimespanTooLong => Self::BadClientData(
                "The provided startTime and endTime is longer than allowed".into(),
            ),
            InstancesQueryError::UnknownTimezone(timezone) => {
                Self::BadClientData(format!("The timezone: {}, is not known", timezone))
            }
        }
    }
}

fn parse_instances_query(
    query: &InstancesQueryParams,
    ctx: &CalendarContext,
) -> Result<(TimeSpan, CalendarSettings), InstancesQueryError> {
    let timespan = TimeSpan::create(query.start_time, query.end_time)
        .map_err(|_| InstancesQueryError::InvalidTimespan)?;
    if timespan.greater_than(ctx.config.event_instances_query_duration_limit) {
        return Err(InstancesQueryError::TimespanTooLong);
    }

    let mut settings = CalendarSettings::new(ctx.config.default_timezone);
    if let Some(timezone) = &query.timezone {
        if !settings.set_timezone(timezone) {
            return Err(InstancesQueryError::UnknownTimezone(timezone.clone()));
        }
    }

    Ok((timespan, settings))
}
