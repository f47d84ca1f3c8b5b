//! # Error Types
//!
//! Domain-specific error types for gently-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gently-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  gently-store errors (separate crate)                                  │
//! │  └── StoreError       - Persistence failures                           │
//! │                                                                         │
//! │  gently-sync errors (separate crate)                                   │
//! │  └── SyncError        - Peripheral session failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → CLI (anyhow)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Every positive `u32` is already in use.
    ///
    /// ## When This Occurs
    /// - A store already holding `u32::MAX` alarms
    #[error("No alarm id available")]
    IdSpaceExhausted,

    /// A payload could not be decoded back into an alarm.
    ///
    /// ## When This Occurs
    /// - `wire::decode_upsert_line` given bytes that are not base64
    /// - The decoded line does not have three comma-separated fields
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when a time string or id coming from a user, a file or the wire
/// does not satisfy the alarm invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Time is not a strict `HH:MM:SS` 24-hour value.
    ///
    /// ## Examples
    /// ```text
    /// "7:00:00"   → too short (hour must be two digits)
    /// "24:00:00"  → hour out of range
    /// "07-00-00"  → wrong separator
    /// ```
    #[error("Invalid alarm time '{value}': {reason}")]
    InvalidTime { value: String, reason: String },

    /// Alarm ids are positive integers.
    #[error("Invalid alarm id {value}: must be a positive integer")]
    InvalidId { value: i64 },

    /// Id text is not an integer at all.
    #[error("Invalid alarm id '{value}': not a number")]
    MalformedId { value: String },

    /// Two records in one collection share an id.
    #[error("Duplicate alarm id {id}")]
    DuplicateId { id: u32 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
