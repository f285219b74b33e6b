//! Completion carry-over across series regeneration.
//!
//! Regenerating a series destroys its members; the whole point of this map
//! is that user progress survives the round trip. State is captured keyed
//! by series position before the old members are deleted and reapplied to
//! whichever new occurrence lands on the same position.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::models::Occurrence;

/// The unit of user progress on one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionState {
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl CompletionState {
    pub fn of(occurrence: &Occurrence) -> Self {
        Self {
            completed: occurrence.completed,
            completed_at: occurrence.completed_at,
        }
    }
}

/// Per-position completion snapshot of a series about to be regenerated.
///
/// A member that was never stamped with a position (a plain repeating
/// occurrence being split into a series for the first time) is recorded
/// under a separate "original" slot, which answers for position 0.
#[derive(Debug, Clone, Default)]
pub struct CompletionStateMap {
    by_position: HashMap<u32, CompletionState>,
    original: Option<CompletionState>,
}

impl CompletionStateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the completion state of every given series member.
    pub fn capture(members: &[Occurrence]) -> Self {
        let mut map = Self::new();
        for member in members {
            match member.series_position {
                Some(position) => {
                    map.by_position.insert(position, CompletionState::of(member));
                }
                None => {
                    map.original = Some(CompletionState::of(member));
                }
            }
        }
        map
    }

    /// Carried-over state for the given position, if any was captured.
    /// The original slot stands in for position 0 only.
    pub fn state_for(&self, position: u32) -> Option<CompletionState> {
        if let Some(state) = self.by_position.get(&position) {
            return Some(*state);
        }
        if position == 0 {
            return self.original;
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty() && self.original.is_none()
    }

    pub fn len(&self) -> usize {
        self.by_position.len() + usize::from(self.original.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Occurrence;
    use chrono::Utc;

    fn member_at(position: Option<u32>, completed: bool) -> Occurrence {
        Occurrence {
            completed,
            completed_at: completed.then(Utc::now),
            series_position: position,
            ..Default::default()
        }
    }

    #[test]
    fn test_capture_keys_by_position() {
        let members = vec![
            member_at(Some(0), false),
            member_at(Some(1), true),
            member_at(Some(2), false),
        ];

        let map = CompletionStateMap::capture(&members);

        assert_eq!(map.len(), 3);
        assert!(!map.state_for(0).unwrap().completed);
        assert!(map.state_for(1).unwrap().completed);
        assert!(map.state_for(1).unwrap().completed_at.is_some());
        assert!(!map.state_for(2).unwrap().completed);
        assert!(map.state_for(3).is_none());
    }

    #[test]
    fn test_unpositioned_member_lands_in_original_slot() {
        let members = vec![member_at(None, true)];

        let map = CompletionStateMap::capture(&members);

        assert!(map.state_for(0).unwrap().completed);
        assert!(map.state_for(1).is_none());
    }

    #[test]
    fn test_position_key_wins_over_original_slot() {
        let members = vec![member_at(None, true), member_at(Some(0), false)];

        let map = CompletionStateMap::capture(&members);

        assert!(!map.state_for(0).unwrap().completed);
    }

    #[test]
    fn test_empty_capture() {
        let map = CompletionStateMap::capture(&[]);
        assert!(map.is_empty());
        assert!(map.state_for(0).is_none());
    }
}
