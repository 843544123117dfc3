//! In-process record of which device channels the broker session is
//! subscribed to.
//!
//! The set grows monotonically for the lifetime of a session: channels are
//! never removed once subscribed, even when the device disappears from the
//! roster. The only removal is the rollback of a claim whose subscribe
//! request failed, so the next reconciliation cycle can retry it.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use hearth_domain::id::ChannelId;

/// Deduplicated set of subscribed channels, shared between the
/// reconciliation loop and message dispatch.
///
/// All operations take the lock only for the duration of the membership
/// check or mutation; callers must not hold it across network calls.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    inner: Mutex<HashSet<ChannelId>>,
}

impl SubscriptionSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `channel` is already subscribed (or claimed).
    #[must_use]
    pub fn contains(&self, channel: &ChannelId) -> bool {
        self.lock().contains(channel)
    }

    /// Claim `channel`, returning `true` when the caller won the claim.
    ///
    /// Check-and-insert happens under one lock acquisition, so two
    /// concurrent reconciliation passes over the same new channel produce
    /// exactly one winner; the loser skips the subscribe request entirely.
    pub fn add(&self, channel: &ChannelId) -> bool {
        self.lock().insert(channel.clone())
    }

    /// Release a claim whose subscribe request failed.
    pub fn remove(&self, channel: &ChannelId) {
        self.lock().remove(channel);
    }

    /// Point-in-time copy of the subscribed channels.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ChannelId> {
        self.lock().iter().cloned().collect()
    }

    /// Number of subscribed channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no channel is subscribed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<ChannelId>> {
        // A poisoned lock only means a panic elsewhere; the set itself
        // stays valid.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn should_claim_channel_only_once() {
        let set = SubscriptionSet::new();
        let channel = ChannelId::new("home/7/dev-123");

        assert!(set.add(&channel));
        assert!(!set.add(&channel));
        assert!(set.contains(&channel));
    }

    #[test]
    fn should_allow_reclaim_after_remove() {
        let set = SubscriptionSet::new();
        let channel = ChannelId::new("home/7/dev-123");

        assert!(set.add(&channel));
        set.remove(&channel);
        assert!(!set.contains(&channel));
        assert!(set.add(&channel));
    }

    #[test]
    fn should_snapshot_current_membership() {
        let set = SubscriptionSet::new();
        set.add(&ChannelId::new("a"));
        set.add(&ChannelId::new("b"));

        let mut snapshot = set.snapshot();
        snapshot.sort();
        assert_eq!(snapshot, vec![ChannelId::new("a"), ChannelId::new("b")]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn should_grant_claim_to_exactly_one_thread() {
        let set = Arc::new(SubscriptionSet::new());
        let channel = ChannelId::new("home/7/dev-123");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let set = Arc::clone(&set);
                let channel = channel.clone();
                std::thread::spawn(move || set.add(&channel))
            })
            .collect();

        let claims = handles
            .into_iter()
            .map(std::thread::JoinHandle::join)
            .filter(|result| matches!(result, Ok(true)))
            .count();
        assert_eq!(claims, 1);
        assert_eq!(set.len(), 1);
    }
}
