//! # Id Allocation
//!
//! Alarm ids are the smallest positive integer not currently in use.
//!
//! ```text
//! in use: {1, 2, 4}   → next: 3
//! in use: {2, 3}      → next: 1
//! in use: {}          → next: 1
//! ```
//!
//! Freed ids are recycled. The peripheral keys its own alarm table by id.

use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};
use crate::types::AlarmId;

/// Returns the smallest positive id not present in `in_use`.
///
/// Deterministic for a given set of ids; order and duplicates in the input
/// do not matter.
pub fn next_available_id<I>(in_use: I) -> CoreResult<AlarmId>
where
    I: IntoIterator<Item = AlarmId>,
{
    let used: HashSet<u32> = in_use.into_iter().map(AlarmId::get).collect();

    let free = (1..=u32::MAX)
        .find(|candidate| !used.contains(candidate))
        .ok_or(CoreError::IdSpaceExhausted)?;

    Ok(AlarmId::new(free)?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<AlarmId> {
        raw.iter().map(|&id| AlarmId::new(id).unwrap()).collect()
    }

    #[test]
    fn test_empty_set_starts_at_one() {
        assert_eq!(next_available_id(Vec::new()).unwrap(), AlarmId::FIRST);
    }

    #[test]
    fn test_fills_first_gap() {
        assert_eq!(next_available_id(ids(&[1, 2, 4])).unwrap().get(), 3);
        assert_eq!(next_available_id(ids(&[2, 3])).unwrap().get(), 1);
    }

    #[test]
    fn test_contiguous_set_appends() {
        assert_eq!(next_available_id(ids(&[1, 2, 3])).unwrap().get(), 4);
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = next_available_id(ids(&[5, 1, 3, 2])).unwrap();
        let b = next_available_id(ids(&[1, 2, 3, 5])).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get(), 4);
    }
}
