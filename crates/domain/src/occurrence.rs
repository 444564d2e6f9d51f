use crate::date::{add_months, localize};
use crate::shared::recurrence::{RRuleFrequency, RecurrenceRule, WeekDay};
use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Occurrences starting later than this after the first one are never
/// generated, whatever the rule says.
pub const SAFETY_HORIZON_MONTHS: u32 = 12 * 10;

/// One point of a recurring series, `index` 0 being the series' own start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub index: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Wall-clock start times of a series in the calendar timezone.
struct LocalStarts<'a> {
    rule: &'a RecurrenceRule,
    anchor: NaiveDateTime,
    previous: Option<NaiveDateTime>,
    index: u32,
}

impl<'a> LocalStarts<'a> {
    fn new(rule: &'a RecurrenceRule, anchor: NaiveDateTime) -> Self {
        Self {
            rule,
            anchor,
            previous: None,
            index: 0,
        }
    }

    fn step(&self, previous: NaiveDateTime) -> Option<NaiveDateTime> {
        let index = self.index;
        match self.rule.freq() {
            RRuleFrequency::Daily => self
                .anchor
                .checked_add_signed(Duration::days(i64::from(index))),
            RRuleFrequency::Weekly => match self.rule.byweekday() {
                None => self
                    .anchor
                    .checked_add_signed(Duration::weeks(i64::from(index))),
                Some(weekdays) => next_matching_weekday(previous, weekdays),
            },
            // Month and year offsets are taken from the anchor, so a clamped
            // Feb 28 does not drag every later occurrence to the 28th.
            RRuleFrequency::Monthly => shift_months(self.anchor, index),
            RRuleFrequency::Yearly => shift_months(self.anchor, index.checked_mul(12)?),
        }
    }
}

impl Iterator for LocalStarts<'_> {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let next = match self.previous {
            None => self.anchor,
            Some(previous) => self.step(previous)?,
        };
        self.previous = Some(next);
        self.index = self.index.checked_add(1)?;
        Some(next)
    }
}

fn shift_months(local: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    add_months(local.date(), months).map(|date| date.and_time(local.time()))
}

fn next_matching_weekday(previous: NaiveDateTime, weekdays: &[WeekDay]) -> Option<NaiveDateTime> {
    (1..=7)
        .filter_map(|days| previous.checked_add_signed(Duration::days(days)))
        .find(|candidate| weekdays.contains(&WeekDay::new(candidate.weekday())))
}

/// Generates the whole series described by `rule` for an event lasting from
/// `start` to `end`, in ascending order.
///
/// Every occurrence keeps the wall-clock time of `start` in `tz` and the
/// duration of the event. Generation stops after `rule.max_occurrences()`
/// occurrences or at the safety horizon, whichever comes first.
pub fn generate(
    rule: &RecurrenceRule,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tz: &Tz,
) -> Vec<Occurrence> {
    let duration = end - start;
    let anchor = start.with_timezone(tz).naive_local();
    let horizon = shift_months(anchor, SAFETY_HORIZON_MONTHS).unwrap_or(anchor);

    LocalStarts::new(rule, anchor)
        .take(rule.max_occurrences() as usize)
        .take_while(|local| *local <= horizon)
        .enumerate()
        .filter_map(|(index, local)| {
            let occurrence_start = if index == 0 {
                start
            } else {
                localize(tz, local)?
            };
            Some(Occurrence {
                index,
                start: occurrence_start,
                end: occurrence_start.checked_add_signed(duration)?,
            })
        })
        .collect()
}
