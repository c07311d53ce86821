use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use uuid::Uuid;

use crate::errors::{CareError, CareResult};

/// A time of day on the 24-hour clock, rendered as zero-padded `HH:MM`.
///
/// There is no date or timezone component: an alarm at `07:30` matches
/// 07:30 local time every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    pub fn new(hour: u8, minute: u8) -> CareResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(CareError::Validation(format!(
                "{}:{} is not a valid time of day",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Truncates any clock value to its hour and minute.
    pub fn of<T: Timelike>(time: &T) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for AlarmTime {
    type Err = CareError;

    fn from_str(s: &str) -> CareResult<Self> {
        let invalid = || CareError::Validation(format!("Expected a HH:MM time, got {:?}", s));

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(hour) || !two_digits(minute) {
            return Err(invalid());
        }
        let hour = hour.parse::<u8>().map_err(|_| invalid())?;
        let minute = minute.parse::<u8>().map_err(|_| invalid())?;

        AlarmTime::new(hour, minute)
    }
}

impl Serialize for AlarmTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AlarmTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// A daily reminder kept on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: String,
    pub title: String,
    pub time: AlarmTime,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Alarm {
    /// Builds a new active alarm with a fresh identifier.
    pub fn new(title: impl Into<String>, time: AlarmTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            time,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_due(&self, now: AlarmTime) -> bool {
        self.is_active && self.time == now
    }
}
