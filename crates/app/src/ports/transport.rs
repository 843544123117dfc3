//! Transport port — subscribe requests against the pub/sub broker.

use std::future::Future;

use hearth_domain::error::HearthError;
use hearth_domain::id::ChannelId;

/// Issues subscribe requests for device channels.
///
/// Implemented by the broker session; consumed by the subscription
/// reconciler. There is deliberately no unsubscribe: stale subscriptions
/// are harmless and the set only grows within a session.
pub trait TopicSubscriber {
    /// Ask the broker to deliver messages published on `channel`.
    fn subscribe(
        &self,
        channel: &ChannelId,
    ) -> impl Future<Output = Result<(), HearthError>> + Send;
}

impl<T: TopicSubscriber + Send + Sync> TopicSubscriber for std::sync::Arc<T> {
    fn subscribe(
        &self,
        channel: &ChannelId,
    ) -> impl Future<Output = Result<(), HearthError>> + Send {
        (**self).subscribe(channel)
    }
}
