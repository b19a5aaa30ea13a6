//! Reduces the 3-hour forecast grid to one sample per day.

use chrono::{NaiveDateTime, Timelike};

use crate::model::{DailySample, ForecastEntry, ForecastTimeline};

/// Upstream timelines cover five days, so at most five noon slots exist.
pub const MAX_DAILY_SAMPLES: usize = 5;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Pick the noon entry of each day, in timeline order, capped at
/// [`MAX_DAILY_SAMPLES`]. Short timelines yield fewer samples.
pub fn sample(timeline: &ForecastTimeline) -> Vec<DailySample> {
    timeline
        .entries
        .iter()
        .filter_map(noon_sample)
        .take(MAX_DAILY_SAMPLES)
        .collect()
}

fn noon_sample(entry: &ForecastEntry) -> Option<DailySample> {
    let at = NaiveDateTime::parse_from_str(&entry.timestamp_text, TIMESTAMP_FORMAT).ok()?;
    if (at.hour(), at.minute(), at.second()) != (12, 0, 0) {
        return None;
    }

    Some(DailySample {
        date: at.date(),
        timestamp: entry.timestamp,
        condition: entry.reading.condition.clone(),
        temperature: round_half_up(entry.reading.temperature),
    })
}

/// Nearest whole degree; halves round towards positive infinity (-2.5 -> -2).
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
