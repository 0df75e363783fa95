use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{HeliostackError, Result};

/// Format accepted in configs and ephemeris tables.
const PARSE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Sortable, filename-safe form used in persisted image names.
const FILE_FORMAT: &str = "%Y-%m-%d_%Hh%Mm";

/// A sampling instant, minute precision.
///
/// Selects the image to fetch and the epoch at which the ephemeris is
/// evaluated for that image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn parse(s: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(s.trim(), PARSE_FORMAT)
            .map(Timestamp)
            .map_err(|_| HeliostackError::Time(s.to_string()))
    }

    /// Filename stamp, e.g. `2025-10-17_00h30m`. Lexicographic order matches
    /// chronological order.
    pub fn file_stamp(&self) -> String {
        self.0.format(FILE_FORMAT).to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(PARSE_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Timestamp::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Inclusive sampling instants from `start` to `end` every `interval_hours`.
///
/// Fractional hours are allowed; the interval is rounded to whole minutes.
pub fn time_range(start: Timestamp, end: Timestamp, interval_hours: f64) -> Result<Vec<Timestamp>> {
    if !interval_hours.is_finite() || interval_hours <= 0.0 {
        return Err(HeliostackError::Pipeline(format!(
            "sampling interval must be positive, got {interval_hours}"
        )));
    }
    let step = Duration::minutes((interval_hours * 60.0).round() as i64);
    if step.num_minutes() == 0 {
        return Err(HeliostackError::Pipeline(format!(
            "sampling interval {interval_hours}h is below minute resolution"
        )));
    }

    let mut out = Vec::new();
    let mut current = start.0;
    while current <= end.0 {
        out.push(Timestamp(current));
        current += step;
    }
    Ok(out)
}
