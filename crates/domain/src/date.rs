use chrono::prelude::*;
use chrono::{Duration, LocalResult, Offset};
use chrono_tz::Tz;

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Moves `date` forward by `months` calendar months. When the day does not
/// exist in the target month it is clamped to the last day of that month,
/// so Jan 31 + 1 month is Feb 28 (or Feb 29 in a leap year).
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let zero_based = date.month0().checked_add(months)?;
    let year = date.year().checked_add(i32::try_from(zero_based / 12).ok()?)?;
    let month = zero_based % 12 + 1;
    let day = date.day().min(get_month_length(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

const MAX_GAP_HOURS: i64 = 48;

/// Maps a wall-clock time in `tz` to an instant.
///
/// Ambiguous times (clocks turned back) resolve to the earliest instant.
/// Times inside a gap (clocks turned forward) are read with the offset in
/// effect before the gap, so 02:30 on a spring-forward night becomes 03:30.
pub fn localize(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            // Offset of the last valid local time before the gap, which may be a day long
            let offset = (1..=MAX_GAP_HOURS)
                .filter_map(|hours| local.checked_sub_signed(Duration::hours(hours)))
                .find_map(|before_gap| tz.from_local_datetime(&before_gap).earliest())?
                .offset()
                .fix();
            let utc = local.checked_sub_signed(Duration::seconds(i64::from(
                offset.local_minus_utc(),
            )))?;
            Some(Utc.from_utc_datetime(&utc))
        }
    }
}

/// First instant of the calendar day `date` in `tz`.
pub fn start_of_day(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    localize(tz, date.and_hms_opt(0, 0, 0)?)
}

/// Last whole second (23:59:59) of the calendar day `date` in `tz`.
pub fn end_of_day(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    localize(tz, date.and_hms_opt(23, 59, 59)?)
}
