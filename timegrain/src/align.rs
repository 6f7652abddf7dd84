//! Snapping instants onto the bucket grid of a grain.

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::granularity::{GrainClass, MINUTES_PER_DAY, MINUTES_PER_HOUR};

const SECONDS_PER_DAY: i64 = 86_400;

/// Returns the start of the bucket containing `instant`.
///
/// Day grains step back from UTC midnight by whole days counted from the Unix
/// epoch, hour grains step back from the top of the hour by the hour of day,
/// and minute grains step back by the minute of the hour. The result is never
/// later than `instant` and less than one grain before it.
pub fn align_to_bucket_start(instant: DateTime<Utc>, grain_minutes: u32) -> DateTime<Utc> {
    let grain_minutes = grain_minutes.max(1);
    let minute_start = instant
        - Duration::seconds(i64::from(instant.second()))
        - Duration::nanoseconds(i64::from(instant.nanosecond()));

    match GrainClass::of(grain_minutes) {
        GrainClass::Day => {
            let day_start = minute_start
                - Duration::hours(i64::from(minute_start.hour()))
                - Duration::minutes(i64::from(minute_start.minute()));
            let step = i64::from(grain_minutes / MINUTES_PER_DAY);
            let day_index = day_start.timestamp().div_euclid(SECONDS_PER_DAY);
            day_start - Duration::days(day_index.rem_euclid(step))
        }
        GrainClass::Hour => {
            let hour_start = minute_start - Duration::minutes(i64::from(minute_start.minute()));
            let step = grain_minutes / MINUTES_PER_HOUR;
            hour_start - Duration::hours(i64::from(hour_start.hour() % step))
        }
        GrainClass::Minute => {
            minute_start - Duration::minutes(i64::from(minute_start.minute() % grain_minutes))
        }
    }
}
