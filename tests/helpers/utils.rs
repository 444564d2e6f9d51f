use chrono::{DateTime, Duration, TimeZone, Utc};
use onboarding_calendar_sdk::{CreateEventInput, EventInstance};

pub fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// One hour long event
pub fn event_input(title: &str, start_time: DateTime<Utc>, rule: Option<&str>) -> CreateEventInput {
    CreateEventInput {
        title: title.into(),
        start_time,
        end_time: start_time + Duration::hours(1),
        recurrence_rule: rule.map(String::from),
        ..Default::default()
    }
}

pub fn start_times(instances: &[EventInstance]) -> Vec<DateTime<Utc>> {
    instances
        .iter()
        .map(|instance| instance.start_time)
        .collect()
}
