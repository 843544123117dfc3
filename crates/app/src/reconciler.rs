//! Subscription reconciler — keeps the broker subscription list in sync
//! with the device roster.
//!
//! On a fixed cadence the reconciler fetches the roster and issues a
//! subscribe request for every channel not yet in the
//! [`SubscriptionSet`]. Channels are never unsubscribed: a device removed
//! from the roster keeps its stale subscription until the session ends,
//! which is harmless and cheaper than tracking removals.

use std::sync::Arc;
use std::time::Duration;

use hearth_domain::error::HearthError;
use hearth_domain::id::UserId;
use tokio_util::sync::CancellationToken;

use crate::ports::{DeviceRepository, TopicSubscriber};
use crate::subscription::SubscriptionSet;

/// Default cadence of roster reconciliation.
pub const RECONCILE_INTERVAL: Duration = Duration::from_secs(10);

/// Periodic task that grows the subscription set toward the roster.
pub struct SubscriptionReconciler<D, S> {
    devices: D,
    subscriber: S,
    subscriptions: Arc<SubscriptionSet>,
    account_id: UserId,
    interval: Duration,
}

impl<D, S> SubscriptionReconciler<D, S>
where
    D: DeviceRepository,
    S: TopicSubscriber,
{
    /// Create a reconciler scoped to the devices of `account_id`.
    pub fn new(
        devices: D,
        subscriber: S,
        subscriptions: Arc<SubscriptionSet>,
        account_id: UserId,
    ) -> Self {
        Self {
            devices,
            subscriber,
            subscriptions,
            account_id,
            interval: RECONCILE_INTERVAL,
        }
    }

    /// Override the reconciliation cadence.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run one reconciliation pass, returning how many new channels were
    /// subscribed.
    ///
    /// Each unclaimed channel is claimed in the set before the subscribe
    /// request goes out, so concurrent passes cannot double-subscribe.
    /// A failed subscribe releases the claim and the next pass retries;
    /// other channels in the same pass are unaffected.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the roster fetch fails.
    pub async fn reconcile_once(&self) -> Result<usize, HearthError> {
        let roster = self.devices.find_by_user(self.account_id).await?;
        let mut subscribed = 0;
        for device in roster {
            if !self.subscriptions.add(&device.channel) {
                continue;
            }
            match self.subscriber.subscribe(&device.channel).await {
                Ok(()) => {
                    tracing::info!(channel = %device.channel, "subscribed to device channel");
                    subscribed += 1;
                }
                Err(err) => {
                    self.subscriptions.remove(&device.channel);
                    tracing::warn!(
                        channel = %device.channel,
                        error = %err,
                        "subscribe failed, retrying next cycle"
                    );
                }
            }
        }
        Ok(subscribed)
    }

    /// Reconcile on a fixed interval until `cancel` fires.
    ///
    /// Roster fetch failures do not stop the loop; they are logged and the
    /// next tick retries at the normal cadence.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("subscription reconciler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.reconcile_once().await {
                        tracing::warn!(error = %err, "device roster fetch failed");
                    }
                }
            }
        }
    }
}
