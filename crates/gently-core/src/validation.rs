//! # Validation Module
//!
//! Input validation for alarm fields.
//!
//! ## Where Input Comes From
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Entry Points                            │
//! │                                                                         │
//! │  CLI arguments        "gently add 07:30:00"                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Persisted JSON       [{"id":1,"time":"07:30:00","enabled":true}]      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  THIS MODULE          parse_time / validate_alarm_id /                 │
//! │                       validate_unique_ids                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AlarmTime / AlarmId  (always well-formed once constructed)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gently_core::validation::{parse_time, validate_alarm_id};
//!
//! assert!(parse_time("06:45:00").is_ok());
//! assert!(parse_time("6:45").is_err());
//! assert!(validate_alarm_id(0).is_err());
//! ```

use std::collections::HashSet;

use chrono::NaiveTime;

use crate::error::ValidationError;
use crate::types::Alarm;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Time Validators
// =============================================================================

/// Parses a strict `HH:MM:SS` 24-hour time.
///
/// ## Rules
/// - Exactly 8 ASCII characters
/// - `:` at positions 2 and 5, digits everywhere else
/// - Hour 00-23, minute 00-59, second 00-59
///
/// chrono's own parser accepts single-digit fields and fractional seconds,
/// so the shape is checked by hand before the range check.
pub fn parse_time(value: &str) -> ValidationResult<NaiveTime> {
    let invalid = |reason: &str| ValidationError::InvalidTime {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let bytes = value.as_bytes();
    if bytes.len() != 8 {
        return Err(invalid("expected HH:MM:SS"));
    }

    for (i, b) in bytes.iter().enumerate() {
        let ok = match i {
            2 | 5 => *b == b':',
            _ => b.is_ascii_digit(),
        };
        if !ok {
            return Err(invalid("expected HH:MM:SS"));
        }
    }

    let field = |start: usize| -> u32 {
        u32::from(bytes[start] - b'0') * 10 + u32::from(bytes[start + 1] - b'0')
    };
    let (hour, minute, second) = (field(0), field(3), field(6));

    if hour > 23 {
        return Err(invalid("hour must be 00-23"));
    }
    if minute > 59 {
        return Err(invalid("minute must be 00-59"));
    }
    if second > 59 {
        return Err(invalid("second must be 00-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| invalid("out of range"))
}

// =============================================================================
// Id Validators
// =============================================================================

/// Validates a raw alarm id.
///
/// Accepts `i64` so negative values coming from JSON or the command line are
/// reported instead of wrapping.
pub fn validate_alarm_id(value: i64) -> ValidationResult<u32> {
    match u32::try_from(value) {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidId { value }),
    }
}

/// Checks that no two alarms share an id.
pub fn validate_unique_ids(alarms: &[Alarm]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(alarms.len());
    for alarm in alarms {
        if !seen.insert(alarm.id) {
            return Err(ValidationError::DuplicateId {
                id: alarm.id.get(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlarmId, AlarmTime};

    #[test]
    fn test_parse_time_accepts_canonical_form() {
        let t = parse_time("07:05:09").unwrap();
        assert_eq!(t, NaiveTime::from_hms_opt(7, 5, 9).unwrap());
        assert!(parse_time("00:00:00").is_ok());
        assert!(parse_time("23:59:59").is_ok());
    }

    #[test]
    fn test_parse_time_rejects_bad_shapes() {
        for bad in ["7:00:00", "07:00", "07:00:00.5", "07-00-00", "0a:00:00", "", " 07:00:00"] {
            assert!(parse_time(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_time_rejects_out_of_range() {
        let err = parse_time("24:00:00").unwrap_err();
        assert!(err.to_string().contains("hour"));
        assert!(parse_time("12:60:00").is_err());
        assert!(parse_time("12:00:60").is_err());
    }

    #[test]
    fn test_validate_alarm_id() {
        assert_eq!(validate_alarm_id(1).unwrap(), 1);
        assert!(validate_alarm_id(0).is_err());
        assert!(validate_alarm_id(-4).is_err());
        assert!(validate_alarm_id(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_validate_unique_ids() {
        let time: AlarmTime = "06:00:00".parse().unwrap();
        let a = Alarm::new(AlarmId::new(1).unwrap(), time, true);
        let b = Alarm::new(AlarmId::new(2).unwrap(), time, false);

        assert!(validate_unique_ids(&[a.clone(), b]).is_ok());
        assert_eq!(
            validate_unique_ids(&[a.clone(), a]),
            Err(ValidationError::DuplicateId { id: 1 })
        );
    }
}
