mod base;
mod event;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
use event::CalendarEventClient;
pub use event::{
    CreateEventInput, GetEventInstancesInput, GetEventsInstancesInput, UpdateEventInput,
};
pub use onboarding_calendar_api_structs::dtos::*;
use status::StatusClient;
use std::sync::Arc;

// Domain
pub use onboarding_calendar_api_structs::dtos::CalendarEventDTO as CalendarEvent;
pub use onboarding_calendar_domain::{EventInstance, Metadata, Tz, ID};

/// Onboarding Calendar Server SDK
///
/// The SDK contains methods for interacting with the calendar server API.
#[derive(Clone)]
pub struct CalendarSDK {
    pub event: CalendarEventClient,
    pub status: StatusClient,
}

impl CalendarSDK {
    /// `address` is the root of the API, e.g. `http://localhost:5000/api/v1`
    pub fn new<T: Into<String>>(address: T) -> Self {
        let base = Arc::new(BaseClient::new(address.into()));
        let event = CalendarEventClient::new(base.clone());
        let status = StatusClient::new(base);

        Self { event, status }
    }
}
