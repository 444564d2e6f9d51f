use crate::{
    calendar::CalendarSettings, occurrence::Occurrence, timespan::TimeSpan, CalendarEvent,
    Metadata, ID,
};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Occurrence of a `CalendarEvent`
///
/// Instances are never stored. They are rebuilt on every query and always
/// get the same `id` for the same occurrence, so clients can diff them.
/// Deleting an instance means deleting the event behind `original_id`,
/// which removes every other instance of the series too.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInstance {
    pub id: String,
    pub original_id: ID,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
    pub is_recurring_instance: bool,
    pub color: Option<String>,
    pub location: Option<String>,
    pub metadata: Metadata,
}

impl EventInstance {
    /// The event itself, used when it does not repeat
    pub(crate) fn from_master(event: &CalendarEvent) -> Self {
        Self::build(
            event,
            event.id.to_string(),
            event.start_time,
            event.end_time,
            false,
        )
    }

    pub(crate) fn from_occurrence(event: &CalendarEvent, occurrence: &Occurrence) -> Self {
        Self::build(
            event,
            occurrence_id(&event.id, occurrence.index),
            occurrence.start,
            occurrence.end,
            occurrence.index > 0,
        )
    }

    fn build(
        event: &CalendarEvent,
        id: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        is_recurring_instance: bool,
    ) -> Self {
        Self {
            id,
            original_id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            start_time,
            end_time,
            all_day: event.all_day,
            is_recurring_instance,
            color: event.color.clone(),
            location: event.location.clone(),
            metadata: event.metadata.clone(),
        }
    }
}

pub fn occurrence_id(event_id: &ID, index: usize) -> String {
    format!("{}-{}", event_id, index)
}

/// Finds the stored event an id refers to. Accepts both event ids and
/// instance ids of the form `{event_id}-{index}`.
pub fn resolve_event_id(id: &str) -> Option<ID> {
    if let Ok(event_id) = id.parse::<ID>() {
        return Some(event_id);
    }
    let (event_id, index) = id.rsplit_once('-')?;
    index.parse::<usize>().ok()?;
    event_id.parse::<ID>().ok()
}

/// Expands every event into the instances shown in `timespan`, ordered by
/// start time. Instances starting at the same time are ordered by id.
pub fn expand_events<'a, I>(
    events: I,
    timespan: &TimeSpan,
    settings: &CalendarSettings,
) -> Vec<EventInstance>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    events
        .into_iter()
        .map(|event| event.expand(timespan, settings))
        .kmerge_by(|a, b| (a.start_time, &a.id) < (b.start_time, &b.id))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event::test::{build_event, utc};

    fn span(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeSpan {
        TimeSpan::create(start, end).unwrap()
    }

    #[test]
    fn merges_instances_of_several_events_by_start_time() {
        let daily = build_event(Some("FREQ=DAILY;COUNT=3"), utc(2021, 3, 1, 9));
        let weekly = build_event(Some("FREQ=WEEKLY;COUNT=2"), utc(2021, 3, 2, 8));
        let single = build_event(None, utc(2021, 3, 1, 12));
        let broken = build_event(Some("FREQ=SOMETIMES"), utc(2021, 3, 3, 7));

        let instances = expand_events(
            &[daily.clone(), weekly.clone(), single.clone(), broken.clone()],
            &span(utc(2021, 3, 1, 0), utc(2021, 3, 15, 0)),
            &Default::default(),
        );

        let found = instances
            .iter()
            .map(|i| (i.original_id, i.start_time))
            .collect::<Vec<_>>();
        assert_eq!(
            found,
            vec![
                (daily.id, utc(2021, 3, 1, 9)),
                (single.id, utc(2021, 3, 1, 12)),
                (weekly.id, utc(2021, 3, 2, 8)),
                (daily.id, utc(2021, 3, 2, 9)),
                (broken.id, utc(2021, 3, 3, 7)),
                (daily.id, utc(2021, 3, 3, 9)),
                (weekly.id, utc(2021, 3, 9, 8)),
            ]
        );
    }

    #[test]
    fn orders_simultaneous_instances_by_id() {
        let first = build_event(Some("FREQ=DAILY;COUNT=2"), utc(2021, 3, 1, 9));
        let second = build_event(Some("FREQ=DAILY;COUNT=2"), utc(2021, 3, 1, 9));
        let timespan = span(utc(2021, 3, 1, 0), utc(2021, 3, 8, 0));

        let instances = expand_events(
            &[first.clone(), second.clone()],
            &timespan,
            &Default::default(),
        );
        let reversed = expand_events(&[second, first], &timespan, &Default::default());

        assert_eq!(instances.len(), 4);
        assert_eq!(instances, reversed);
        assert!(instances
            .windows(2)
            .all(|w| (w[0].start_time, &w[0].id) < (w[1].start_time, &w[1].id)));
    }

    #[test]
    fn no_events_gives_no_instances() {
        let events: Vec<CalendarEvent> = Vec::new();
        let instances = expand_events(
            &events,
            &span(utc(2021, 3, 1, 0), utc(2021, 3, 8, 0)),
            &Default::default(),
        );
        assert!(instances.is_empty());
    }

    #[test]
    fn resolves_event_ids_from_instance_ids() {
        let event_id = ID::new();
        assert_eq!(resolve_event_id(&event_id.to_string()), Some(event_id));
        assert_eq!(resolve_event_id(&occurrence_id(&event_id, 0)), Some(event_id));
        assert_eq!(resolve_event_id(&occurrence_id(&event_id, 42)), Some(event_id));
        assert_eq!(resolve_event_id(&format!("{}-x", event_id)), None);
        assert_eq!(resolve_event_id("1234-5"), None);
        assert_eq!(resolve_event_id(""), None);
    }

    #[test]
    fn every_instance_resolves_to_its_event() {
        let event = build_event(Some("FREQ=WEEKLY;COUNT=4"), utc(2021, 3, 1, 9));
        let instances = event.expand(
            &span(utc(2021, 3, 1, 0), utc(2021, 4, 1, 0)),
            &Default::default(),
        );
        assert_eq!(instances.len(), 4);
        for instance in instances {
            assert_eq!(resolve_event_id(&instance.id), Some(event.id));
        }
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let event = build_event(Some("FREQ=DAILY;COUNT=2"), utc(2021, 3, 1, 9));
        let instances = event.expand(
            &span(utc(2021, 3, 2, 0), utc(2021, 3, 3, 0)),
            &Default::default(),
        );
        let json = serde_json::to_value(&instances[0]).unwrap();

        assert_eq!(json["id"], format!("{}-1", event.id));
        assert_eq!(json["originalId"], event.id.to_string());
        assert_eq!(json["isRecurringInstance"], true);
        assert_eq!(json["allDay"], false);
        assert_eq!(json["startTime"], "2021-03-02T09:00:00Z");
        assert_eq!(json["endTime"], "2021-03-02T10:00:00Z");
    }
}
