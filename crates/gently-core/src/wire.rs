//! # Wire Encoding
//!
//! Byte payloads written to the Gently peripheral's GATT characteristics.
//!
//! ## Upsert Payload (characteristic `...def1`)
//! ```text
//! Alarm { id: 1, time: 07:00:00, enabled: true }
//!      │
//!      ▼  upsert_line
//! "1,07:00:00,1"
//!      │
//!      ▼  UTF-8 → base64 (standard alphabet, padded)
//! "MSwwNzowMDowMCwx"
//!      │
//!      ▼  UTF-8 bytes of the base64 text
//! [0x4D, 0x53, 0x77, ...]   ← characteristic value
//! ```
//!
//! The firmware decodes the base64 text itself, so the payload is the base64
//! *text* and not the raw line. This must stay bit-for-bit stable.
//!
//! ## Delete Payload (characteristic `...def2`)
//! ```text
//! AlarmId(3) → "3" → [0x33]
//! ```
//! No base64 layer. The peripheral tells the two apart by characteristic.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{CoreError, CoreResult};
use crate::types::{Alarm, AlarmId, AlarmTime};

/// Builds the text line `"{id},{HH:MM:SS},{1|0}"`.
pub fn upsert_line(alarm: &Alarm) -> String {
    let flag = if alarm.enabled { '1' } else { '0' };
    format!("{},{},{}", alarm.id, alarm.time, flag)
}

/// Encodes an alarm for the upsert characteristic.
pub fn encode_upsert(alarm: &Alarm) -> Vec<u8> {
    STANDARD.encode(upsert_line(alarm).as_bytes()).into_bytes()
}

/// Encodes an alarm id for the delete characteristic.
pub fn encode_delete(id: AlarmId) -> Vec<u8> {
    id.to_string().into_bytes()
}

/// Decodes an upsert payload back into an alarm.
///
/// The peripheral never sends these back. Used by `gently push --dry-run`
/// and by tests.
pub fn decode_upsert_line(payload: &[u8]) -> CoreResult<Alarm> {
    let raw = STANDARD
        .decode(payload)
        .map_err(|e| CoreError::MalformedPayload(format!("base64: {e}")))?;
    let line = String::from_utf8(raw)
        .map_err(|e| CoreError::MalformedPayload(format!("utf-8: {e}")))?;

    let mut fields = line.split(',');
    let (Some(id), Some(time), Some(flag), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(CoreError::MalformedPayload(format!(
            "expected 3 fields in '{line}'"
        )));
    };

    let id: AlarmId = id.parse()?;
    let time: AlarmTime = time.parse()?;
    let enabled = match flag {
        "1" => true,
        "0" => false,
        other => {
            return Err(CoreError::MalformedPayload(format!(
                "enabled flag must be 0 or 1, got '{other}'"
            )))
        }
    };

    Ok(Alarm::new(id, time, enabled))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn alarm(id: u32, time: &str, enabled: bool) -> Alarm {
        Alarm::new(AlarmId::new(id).unwrap(), time.parse().unwrap(), enabled)
    }

    #[test]
    fn test_upsert_line_format() {
        assert_eq!(upsert_line(&alarm(1, "07:00:00", true)), "1,07:00:00,1");
        assert_eq!(upsert_line(&alarm(12, "23:59:59", false)), "12,23:59:59,0");
    }

    #[test]
    fn test_encode_upsert_known_vectors() {
        assert_eq!(
            encode_upsert(&alarm(1, "07:00:00", true)),
            b"MSwwNzowMDowMCwx".to_vec()
        );
        // padded
        assert_eq!(
            encode_upsert(&alarm(12, "23:59:59", false)),
            b"MTIsMjM6NTk6NTksMA==".to_vec()
        );
    }

    #[test]
    fn test_encode_upsert_is_deterministic() {
        let a = alarm(5, "05:30:15", true);
        assert_eq!(encode_upsert(&a), encode_upsert(&a.clone()));
    }

    #[test]
    fn test_base64_layer_decodes_to_line() {
        let a = alarm(8, "18:45:00", false);
        let raw = STANDARD.decode(encode_upsert(&a)).unwrap();
        assert_eq!(String::from_utf8(raw).unwrap(), upsert_line(&a));
        assert_eq!(decode_upsert_line(&encode_upsert(&a)).unwrap(), a);
    }

    #[test]
    fn test_encode_delete_is_plain_decimal() {
        assert_eq!(encode_delete(AlarmId::new(3).unwrap()), b"3".to_vec());
        assert_eq!(encode_delete(AlarmId::new(120).unwrap()), b"120".to_vec());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_upsert_line(b"not base64!").is_err());
        let two_fields = STANDARD.encode("1,07:00:00");
        assert!(decode_upsert_line(two_fields.as_bytes()).is_err());
        let bad_flag = STANDARD.encode("1,07:00:00,yes");
        assert!(decode_upsert_line(bad_flag.as_bytes()).is_err());
    }
}
