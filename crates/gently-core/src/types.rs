//! # Domain Types
//!
//! Core alarm types used throughout Gently Alarms.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Alarm       │   │    AlarmId      │   │   AlarmTime     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id: AlarmId    │──▶│  u32, never 0   │   │  NaiveTime      │       │
//! │  │  time:AlarmTime │──▶│  store-assigned │   │  "HH:MM:SS"     │       │
//! │  │  enabled: bool  │   │  stable         │   │  whole seconds  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Form
//! ```json
//! {"id": 1, "time": "07:30:00", "enabled": true}
//! ```
//! `AlarmId` and `AlarmTime` both go through their validating constructors
//! during deserialization, so a record read from storage is always
//! well-formed.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::{parse_time, validate_alarm_id, ValidationResult};

// =============================================================================
// Alarm Id
// =============================================================================

/// Identifier of an alarm, unique within a store.
///
/// Always a positive integer. Allocated by the store through
/// [`crate::ids::next_available_id`] and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct AlarmId(u32);

impl AlarmId {
    /// The first id handed out by an empty store.
    pub const FIRST: AlarmId = AlarmId(1);

    /// Creates an id, rejecting zero.
    pub fn new(value: u32) -> ValidationResult<Self> {
        validate_alarm_id(i64::from(value)).map(AlarmId)
    }

    /// Returns the raw integer.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for AlarmId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        validate_alarm_id(value).map(AlarmId)
    }
}

impl From<AlarmId> for u32 {
    fn from(id: AlarmId) -> Self {
        id.0
    }
}

impl FromStr for AlarmId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| ValidationError::MalformedId {
                value: s.to_string(),
            })?;
        AlarmId::try_from(value)
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// =============================================================================
// Alarm Time
// =============================================================================

/// Time of day an alarm fires, to the second.
///
/// ## Canonical Form
/// `HH:MM:SS`, 24-hour, zero padded. This is both the persisted form and
/// the form that goes into the wire line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AlarmTime(NaiveTime);

impl AlarmTime {
    /// Creates a time from hour, minute and second.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> ValidationResult<Self> {
        NaiveTime::from_hms_opt(hour, minute, second)
            .map(AlarmTime)
            .ok_or_else(|| ValidationError::InvalidTime {
                value: format!("{hour}:{minute}:{second}"),
                reason: "out of range".to_string(),
            })
    }
}

impl FromStr for AlarmTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s).map(AlarmTime)
    }
}

impl TryFrom<String> for AlarmTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlarmTime> for String {
    fn from(time: AlarmTime) -> Self {
        time.to_string()
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

// =============================================================================
// Alarm
// =============================================================================

/// A scheduled alarm.
///
/// ## Invariants
/// - `id` is unique within the owning store and never reassigned
/// - `time` is always a valid time of day (enforced by `AlarmTime`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: AlarmId,
    pub time: AlarmTime,
    pub enabled: bool,
}

impl Alarm {
    pub fn new(id: AlarmId, time: AlarmTime, enabled: bool) -> Self {
        Alarm { id, time, enabled }
    }

    /// Returns a copy with a different enabled flag. The id is kept.
    pub fn with_enabled(&self, enabled: bool) -> Self {
        Alarm {
            enabled,
            ..self.clone()
        }
    }

    /// Returns a copy with a different time. The id is kept.
    pub fn with_time(&self, time: AlarmTime) -> Self {
        Alarm {
            time,
            ..self.clone()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alarm_id_rejects_zero() {
        assert!(AlarmId::new(0).is_err());
        assert_eq!(AlarmId::new(7).unwrap().get(), 7);
        assert_eq!(AlarmId::FIRST.get(), 1);
    }

    #[test]
    fn test_alarm_id_from_str() {
        assert_eq!("12".parse::<AlarmId>().unwrap().get(), 12);
        assert!("0".parse::<AlarmId>().is_err());
        assert!("-3".parse::<AlarmId>().is_err());
        assert!("abc".parse::<AlarmId>().is_err());
    }

    #[test]
    fn test_alarm_time_display_is_zero_padded() {
        let t = AlarmTime::from_hms(7, 5, 0).unwrap();
        assert_eq!(t.to_string(), "07:05:00");
    }

    #[test]
    fn test_alarm_time_from_hms_out_of_range() {
        assert!(AlarmTime::from_hms(24, 0, 0).is_err());
        assert!(AlarmTime::from_hms(0, 60, 0).is_err());
    }

    #[test]
    fn test_alarm_serde_shape() {
        let alarm = Alarm::new(AlarmId::new(3).unwrap(), "21:15:30".parse().unwrap(), false);
        let json = serde_json::to_value(&alarm).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "time": "21:15:30", "enabled": false})
        );

        let back: Alarm = serde_json::from_value(json).unwrap();
        assert_eq!(back, alarm);
    }

    #[test]
    fn test_alarm_deserialize_rejects_invalid_fields() {
        let bad_time = serde_json::json!({"id": 1, "time": "7:00", "enabled": true});
        assert!(serde_json::from_value::<Alarm>(bad_time).is_err());

        let zero_id = serde_json::json!({"id": 0, "time": "07:00:00", "enabled": true});
        assert!(serde_json::from_value::<Alarm>(zero_id).is_err());

        let negative_id = serde_json::json!({"id": -1, "time": "07:00:00", "enabled": true});
        assert!(serde_json::from_value::<Alarm>(negative_id).is_err());
    }

    #[test]
    fn test_edits_keep_id() {
        let alarm = Alarm::new(AlarmId::new(4).unwrap(), "06:00:00".parse().unwrap(), true);
        let disabled = alarm.with_enabled(false);
        assert_eq!(disabled.id, alarm.id);
        assert!(!disabled.enabled);

        let moved = alarm.with_time("06:30:00".parse().unwrap());
        assert_eq!(moved.id, alarm.id);
        assert_eq!(moved.time.to_string(), "06:30:00");
    }
}
