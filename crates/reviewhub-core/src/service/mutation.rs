//! Mutation state: `idle -> pending -> idle`, one slot per write kind.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::domain::ReviewId;
use crate::error::{DomainError, DomainResult, WriteAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
}

/// Where the UI should go after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ReviewList,
    ReviewDetail(ReviewId),
}

/// Result of a successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome<T> {
    pub value: T,
    pub navigate_to: Route,
}

/// Tracks which write kinds are in flight.
#[derive(Debug, Default)]
pub struct MutationTracker {
    pending: Mutex<HashSet<WriteAction>>,
}

impl MutationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, action: WriteAction) -> MutationStatus {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.contains(&action) {
            MutationStatus::Pending
        } else {
            MutationStatus::Idle
        }
    }

    /// Move `action` to pending. Fails while the same kind is already pending;
    /// the slot returns to idle when the guard is dropped.
    pub fn begin(&self, action: WriteAction) -> DomainResult<PendingMutation<'_>> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if !pending.insert(action) {
            return Err(DomainError::MutationInFlight(action));
        }
        Ok(PendingMutation {
            tracker: self,
            action,
        })
    }
}

/// Guard for a pending mutation.
#[derive(Debug)]
pub struct PendingMutation<'a> {
    tracker: &'a MutationTracker,
    action: WriteAction,
}

impl Drop for PendingMutation<'_> {
    fn drop(&mut self) {
        self.tracker
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_blocks_same_kind_only() {
        let tracker = MutationTracker::new();
        let guard = tracker.begin(WriteAction::CreateReview).unwrap();
        assert_eq!(tracker.status(WriteAction::CreateReview), MutationStatus::Pending);

        assert_eq!(
            tracker.begin(WriteAction::CreateReview).unwrap_err(),
            DomainError::MutationInFlight(WriteAction::CreateReview)
        );
        assert!(tracker.begin(WriteAction::CreateComment).is_ok());

        drop(guard);
        assert_eq!(tracker.status(WriteAction::CreateReview), MutationStatus::Idle);
        assert!(tracker.begin(WriteAction::CreateReview).is_ok());
    }
}
