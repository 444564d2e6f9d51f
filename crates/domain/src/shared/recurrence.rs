use chrono::Weekday;
use itertools::Itertools;
use serde::{de::Visitor, Deserialize, Serialize};
use std::{cmp::Ordering, fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RRuleFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RRuleFrequency {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

impl Display for RRuleFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RRuleFrequency {
    type Err = MalformedRuleError;

    fn from_str(freq: &str) -> Result<Self, Self::Err> {
        match freq.to_uppercase().as_str() {
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            "YEARLY" => Ok(Self::Yearly),
            _ => Err(MalformedRuleError::UnsupportedFrequency(freq.to_string())),
        }
    }
}

/// Weekday tag of a `BYDAY` list. Ordered with Monday first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WeekDay(Weekday);

impl WeekDay {
    pub fn new(weekday: Weekday) -> Self {
        Self(weekday)
    }
}

impl Ord for WeekDay {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .num_days_from_monday()
            .cmp(&other.0.num_days_from_monday())
    }
}

impl PartialOrd for WeekDay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for WeekDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(weekday_to_str(self.0))
    }
}

fn str_to_weekday(d: &str) -> Result<Weekday, InvalidWeekDayError> {
    match d.to_uppercase().as_str() {
        "MO" => Ok(Weekday::Mon),
        "TU" => Ok(Weekday::Tue),
        "WE" => Ok(Weekday::Wed),
        "TH" => Ok(Weekday::Thu),
        "FR" => Ok(Weekday::Fri),
        "SA" => Ok(Weekday::Sat),
        "SU" => Ok(Weekday::Sun),
        _ => Err(InvalidWeekDayError::InvalidWeekdayIdentifier(d.to_string())),
    }
}

fn weekday_to_str(wday: Weekday) -> &'static str {
    match wday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidWeekDayError {
    #[error("Invalid weekday specified: {0}")]
    InvalidWeekdayIdentifier(String),
    #[error("Ordinal weekdays are not supported: {0}")]
    OrdinalNotSupported(String),
    #[error("Malformed weekday: {0}")]
    Malformed(String),
}

impl FromStr for WeekDay {
    type Err = InvalidWeekDayError;

    fn from_str(day: &str) -> Result<Self, Self::Err> {
        if !day.is_ascii() || day.len() < 2 {
            return Err(InvalidWeekDayError::Malformed(day.to_string()));
        }
        if day.len() == 2 {
            // MO, TU, ...
            return str_to_weekday(day).map(Self);
        }
        // 1MO, -1FR, ... are valid rrule syntax, just not something we expand
        let (nth, wday) = day.split_at(day.len() - 2);
        if nth.parse::<isize>().is_ok() && str_to_weekday(wday).is_ok() {
            Err(InvalidWeekDayError::OrdinalNotSupported(day.to_string()))
        } else {
            Err(InvalidWeekDayError::Malformed(day.to_string()))
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedRuleError {
    #[error("The recurrence rule has no FREQ part")]
    MissingFrequency,
    #[error("Unsupported frequency: {0}")]
    UnsupportedFrequency(String),
    #[error("Malformed rule part: `{0}`, expected KEY=VALUE")]
    MalformedPart(String),
    #[error("Unsupported rule part: {0}")]
    UnsupportedPart(String),
    #[error("The rule part {0} is given more than once")]
    DuplicatePart(String),
    #[error(transparent)]
    InvalidWeekDay(#[from] InvalidWeekDayError),
    #[error("BYDAY must list at least one weekday")]
    EmptyWeekDays,
    #[error("BYDAY can only be used with FREQ=WEEKLY, not FREQ={0}")]
    WeekDaysRequireWeekly(RRuleFrequency),
    #[error("COUNT must be a positive integer, got: {0}")]
    InvalidCount(String),
}

/// Parsed form of a stored recurrence rule string such as
/// `FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR;COUNT=10`.
///
/// Only the presets used by the calendar and meetings features are
/// understood: a frequency, an optional weekday set for weekly rules and an
/// optional count. There is no `UNTIL`, so a rule without `COUNT` yields a
/// single occurrence instead of an unbounded series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecurrenceRule {
    freq: RRuleFrequency,
    byweekday: Option<Vec<WeekDay>>,
    count: Option<u32>,
}

impl RecurrenceRule {
    pub fn new(freq: RRuleFrequency) -> Self {
        Self {
            freq,
            byweekday: None,
            count: None,
        }
    }

    /// Monday to Friday, every week
    pub fn business_days() -> Self {
        Self {
            freq: RRuleFrequency::Weekly,
            byweekday: Some(
                [
                    Weekday::Mon,
                    Weekday::Tue,
                    Weekday::Wed,
                    Weekday::Thu,
                    Weekday::Fri,
                ]
                .iter()
                .copied()
                .map(WeekDay::new)
                .collect(),
            ),
            count: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Result<Self, MalformedRuleError> {
        if count == 0 {
            return Err(MalformedRuleError::InvalidCount(count.to_string()));
        }
        self.count = Some(count);
        Ok(self)
    }

    /// Sorted and deduplicated, so `BYDAY=FR,MO,FR` and `BYDAY=MO,FR` are the same rule
    pub fn with_weekdays<I>(mut self, weekdays: I) -> Result<Self, MalformedRuleError>
    where
        I: IntoIterator<Item = WeekDay>,
    {
        if self.freq != RRuleFrequency::Weekly {
            return Err(MalformedRuleError::WeekDaysRequireWeekly(self.freq));
        }
        let weekdays = weekdays.into_iter().sorted().dedup().collect::<Vec<_>>();
        if weekdays.is_empty() {
            return Err(MalformedRuleError::EmptyWeekDays);
        }
        self.byweekday = Some(weekdays);
        Ok(self)
    }

    pub fn freq(&self) -> RRuleFrequency {
        self.freq
    }

    pub fn byweekday(&self) -> Option<&[WeekDay]> {
        self.byweekday.as_deref()
    }

    pub fn count(&self) -> Option<u32> {
        self.count
    }

    /// Upper bound on generated occurrences. A missing `COUNT` counts as 1.
    pub fn max_occurrences(&self) -> u32 {
        self.count.unwrap_or(1)
    }

    /// Parses the nullable rule column of an event. `None` and blank strings
    /// mean the event does not repeat.
    pub fn parse_optional(rule: Option<&str>) -> Result<Option<Self>, MalformedRuleError> {
        match rule.map(str::trim) {
            None | Some("") => Ok(None),
            Some(rule) => rule.parse().map(Some),
        }
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, key: &str) -> Result<(), MalformedRuleError> {
    if slot.is_some() {
        return Err(MalformedRuleError::DuplicatePart(key.to_string()));
    }
    *slot = Some(value);
    Ok(())
}

impl FromStr for RecurrenceRule {
    type Err = MalformedRuleError;

    fn from_str(rule: &str) -> Result<Self, Self::Err> {
        let rule = rule.trim();
        let rule = match rule.get(..6) {
            Some(prefix) if prefix.eq_ignore_ascii_case("RRULE:") => &rule[6..],
            _ => rule,
        };

        let mut freq = None;
        let mut byweekday = None;
        let mut count = None;
        for part in rule.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| MalformedRuleError::MalformedPart(part.to_string()))?;
            let key = key.trim().to_uppercase();
            let value = value.trim();
            match key.as_str() {
                "FREQ" => set_once(&mut freq, value.parse::<RRuleFrequency>()?, &key)?,
                "BYDAY" => {
                    let weekdays = value
                        .split(',')
                        .map(str::trim)
                        .filter(|d| !d.is_empty())
                        .map(str::parse::<WeekDay>)
                        .collect::<Result<Vec<_>, _>>()?;
                    set_once(&mut byweekday, weekdays, &key)?
                }
                "COUNT" => {
                    let n = value
                        .parse::<u32>()
                        .map_err(|_| MalformedRuleError::InvalidCount(value.to_string()))?;
                    set_once(&mut count, n, &key)?
                }
                _ => return Err(MalformedRuleError::UnsupportedPart(key.clone())),
            }
        }

        let mut parsed = Self::new(freq.ok_or(MalformedRuleError::MissingFrequency)?);
        if let Some(weekdays) = byweekday {
            parsed = parsed.with_weekdays(weekdays)?;
        }
        if let Some(count) = count {
            parsed = parsed.with_count(count)?;
        }
        Ok(parsed)
    }
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FREQ={}", self.freq)?;
        if let Some(weekdays) = &self.byweekday {
            write!(f, ";BYDAY={}", weekdays.iter().join(","))?;
        }
        if let Some(count) = self.count {
            write!(f, ";COUNT={}", count)?;
        }
        Ok(())
    }
}

impl Serialize for RecurrenceRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RecurrenceRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RecurrenceRuleVisitor;

        impl<'de> Visitor<'de> for RecurrenceRuleVisitor {
            type Value = RecurrenceRule;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A recurrence rule like FREQ=WEEKLY;COUNT=10")
            }

            fn visit_str<E>(self, value: &str) -> Result<RecurrenceRule, E>
            where
                E: serde::de::Error,
            {
                value.parse::<RecurrenceRule>().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(RecurrenceRuleVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rule(s: &str) -> Result<RecurrenceRule, MalformedRuleError> {
        s.parse::<RecurrenceRule>()
    }

    #[test]
    fn parses_valid_weekday_str_correctly() {
        assert_eq!("mo".parse::<WeekDay>().unwrap(), WeekDay::new(Weekday::Mon));
        assert_eq!("SU".parse::<WeekDay>().unwrap(), WeekDay::new(Weekday::Sun));
        assert_eq!("We".parse::<WeekDay>().unwrap(), WeekDay::new(Weekday::Wed));
    }

    #[test]
    fn parses_invalid_weekday_str_correctly() {
        assert!("".parse::<WeekDay>().is_err());
        assert!("m".parse::<WeekDay>().is_err());
        assert!("mon".parse::<WeekDay>().is_err());
        assert!("-1!?".parse::<WeekDay>().is_err());
        assert!("xx".parse::<WeekDay>().is_err());
        assert!("mø".parse::<WeekDay>().is_err());
        assert_eq!(
            "1mo".parse::<WeekDay>(),
            Err(InvalidWeekDayError::OrdinalNotSupported("1mo".into()))
        );
        assert_eq!(
            "-1FR".parse::<WeekDay>(),
            Err(InvalidWeekDayError::OrdinalNotSupported("-1FR".into()))
        );
    }

    #[test]
    fn serializes_weekday() {
        assert_eq!(WeekDay::new(Weekday::Mon).to_string(), "MO");
        assert_eq!(WeekDay::new(Weekday::Tue).to_string(), "TU");
        assert_eq!(WeekDay::new(Weekday::Sun).to_string(), "SU");
    }

    #[test]
    fn parses_every_preset() {
        assert_eq!(
            rule("FREQ=DAILY").unwrap(),
            RecurrenceRule::new(RRuleFrequency::Daily)
        );
        assert_eq!(
            rule("FREQ=WEEKLY").unwrap(),
            RecurrenceRule::new(RRuleFrequency::Weekly)
        );
        assert_eq!(
            rule("FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR").unwrap(),
            RecurrenceRule::business_days()
        );
        assert_eq!(
            rule("FREQ=MONTHLY").unwrap(),
            RecurrenceRule::new(RRuleFrequency::Monthly)
        );
        assert_eq!(
            rule("FREQ=YEARLY;COUNT=3").unwrap(),
            RecurrenceRule::new(RRuleFrequency::Yearly)
                .with_count(3)
                .unwrap()
        );
        assert_eq!(
            rule("FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR;COUNT=10").unwrap(),
            RecurrenceRule::business_days().with_count(10).unwrap()
        );
    }

    #[test]
    fn missing_count_means_a_single_occurrence() {
        let parsed = rule("FREQ=DAILY").unwrap();
        assert_eq!(parsed.count(), None);
        assert_eq!(parsed.max_occurrences(), 1);
        assert_eq!(rule("FREQ=DAILY;COUNT=7").unwrap().max_occurrences(), 7);
    }

    #[test]
    fn is_lenient_about_formatting() {
        let expected = RecurrenceRule::business_days().with_count(10).unwrap();
        assert_eq!(rule("freq=weekly;byday=mo,tu,we,th,fr;count=10").unwrap(), expected);
        assert_eq!(
            rule(" FREQ = WEEKLY ; BYDAY = FR, TH,WE ,TU,MO ; COUNT = 10 ;").unwrap(),
            expected
        );
        assert_eq!(rule("RRULE:FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR;COUNT=10").unwrap(), expected);
        assert_eq!(rule("COUNT=10;BYDAY=MO,TU,WE,TH,FR;FREQ=WEEKLY").unwrap(), expected);
    }

    #[test]
    fn rejects_unsupported_rules() {
        assert_eq!(
            rule("FREQ=BIWEEKLY"),
            Err(MalformedRuleError::UnsupportedFrequency("BIWEEKLY".into()))
        );
        assert_eq!(
            rule("FREQ=HOURLY;COUNT=3"),
            Err(MalformedRuleError::UnsupportedFrequency("HOURLY".into()))
        );
        assert_eq!(rule("COUNT=3"), Err(MalformedRuleError::MissingFrequency));
        assert_eq!(rule(""), Err(MalformedRuleError::MissingFrequency));
        assert_eq!(
            rule("FREQ=DAILY;UNTIL=20210101T000000Z"),
            Err(MalformedRuleError::UnsupportedPart("UNTIL".into()))
        );
        assert_eq!(
            rule("FREQ=DAILY;INTERVAL=2"),
            Err(MalformedRuleError::UnsupportedPart("INTERVAL".into()))
        );
        assert_eq!(
            rule("FREQ=DAILY;COUNT"),
            Err(MalformedRuleError::MalformedPart("COUNT".into()))
        );
        assert_eq!(
            rule("FREQ=DAILY;FREQ=WEEKLY"),
            Err(MalformedRuleError::DuplicatePart("FREQ".into()))
        );
    }

    #[test]
    fn rejects_invalid_counts() {
        assert_eq!(
            rule("FREQ=DAILY;COUNT=0"),
            Err(MalformedRuleError::InvalidCount("0".into()))
        );
        assert_eq!(
            rule("FREQ=DAILY;COUNT=-4"),
            Err(MalformedRuleError::InvalidCount("-4".into()))
        );
        assert_eq!(
            rule("FREQ=DAILY;COUNT=ten"),
            Err(MalformedRuleError::InvalidCount("ten".into()))
        );
    }

    #[test]
    fn rejects_invalid_weekday_sets() {
        assert_eq!(
            rule("FREQ=DAILY;BYDAY=MO"),
            Err(MalformedRuleError::WeekDaysRequireWeekly(
                RRuleFrequency::Daily
            ))
        );
        assert_eq!(
            rule("FREQ=WEEKLY;BYDAY="),
            Err(MalformedRuleError::EmptyWeekDays)
        );
        assert_eq!(
            rule("FREQ=WEEKLY;BYDAY=MO,XY"),
            Err(MalformedRuleError::InvalidWeekDay(
                InvalidWeekDayError::InvalidWeekdayIdentifier("XY".into())
            ))
        );
        assert!(rule("FREQ=MONTHLY;BYDAY=1MO").is_err());
    }

    #[test]
    fn formats_to_canonical_form() {
        assert_eq!(
            rule("count=4;byday=we,mo,we;freq=weekly").unwrap().to_string(),
            "FREQ=WEEKLY;BYDAY=MO,WE;COUNT=4"
        );
        assert_eq!(rule("FREQ=MONTHLY").unwrap().to_string(), "FREQ=MONTHLY");
        assert_eq!(
            RecurrenceRule::business_days().to_string(),
            "FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR"
        );
    }

    #[test]
    fn parses_optional_rules() {
        assert_eq!(RecurrenceRule::parse_optional(None), Ok(None));
        assert_eq!(RecurrenceRule::parse_optional(Some("  ")), Ok(None));
        assert_eq!(
            RecurrenceRule::parse_optional(Some("FREQ=DAILY;COUNT=2")),
            Ok(Some(
                RecurrenceRule::new(RRuleFrequency::Daily)
                    .with_count(2)
                    .unwrap()
            ))
        );
        assert!(RecurrenceRule::parse_optional(Some("FREQ=BIWEEKLY")).is_err());
    }

    #[test]
    fn serializes_as_rule_string() {
        let parsed = rule("FREQ=WEEKLY;BYDAY=MO;COUNT=2").unwrap();
        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, "\"FREQ=WEEKLY;BYDAY=MO;COUNT=2\"");
        assert_eq!(serde_json::from_str::<RecurrenceRule>(&json).unwrap(), parsed);
        assert!(serde_json::from_str::<RecurrenceRule>("\"FREQ=BIWEEKLY\"").is_err());
    }
}
