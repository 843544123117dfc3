//! Telemetry service — decodes inbound device messages, persists them,
//! and forwards them to the downstream queue.
//!
//! Every error on this path is meant to be logged and dropped by the
//! caller; ingestion is fire-and-forget with at-most-once semantics.

use hearth_domain::error::{HearthError, NotFoundError};
use hearth_domain::id::{ChannelId, DeviceId};
use hearth_domain::telemetry::{TelemetryMap, TelemetryRecord};

use crate::ports::{DeviceRepository, TelemetryPublisher, TelemetryRepository};

/// Application service for the telemetry ingestion path.
pub struct TelemetryService<D, T, P> {
    devices: D,
    telemetry: T,
    publisher: P,
}

impl<D, T, P> TelemetryService<D, T, P>
where
    D: DeviceRepository,
    T: TelemetryRepository,
    P: TelemetryPublisher,
{
    /// Create a new service backed by the given ports.
    pub fn new(devices: D, telemetry: T, publisher: P) -> Self {
        Self {
            devices,
            telemetry,
            publisher,
        }
    }

    /// Turn one raw channel+payload pair into a persisted, forwarded
    /// record.
    ///
    /// Steps: resolve the channel to a device, decode the payload as a
    /// JSON object, persist the record, then re-encode and publish it
    /// downstream. Persistence success is not rolled back when the
    /// downstream publish fails; the stored record stays.
    ///
    /// # Errors
    ///
    /// - [`HearthError::NotFound`] when no device owns `channel`
    /// - [`HearthError::MalformedPayload`] when the payload is not a JSON
    ///   object
    /// - [`HearthError::Storage`] when persisting fails
    /// - [`HearthError::Publish`] when the downstream publish fails
    #[tracing::instrument(skip(self, payload), fields(channel = %channel))]
    pub async fn ingest(
        &self,
        channel: &ChannelId,
        payload: &[u8],
    ) -> Result<TelemetryRecord, HearthError> {
        let device = self.devices.find_by_channel(channel).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: channel.to_string(),
            }
        })?;

        let data: TelemetryMap = serde_json::from_slice(payload)?;
        let record = TelemetryRecord {
            device_id: device.device_id,
            home_id: device.home_id,
            data,
        };

        self.telemetry.append(&record).await?;
        tracing::debug!(device_id = %record.device_id, "telemetry record stored");

        let encoded = serde_json::to_vec(&record).map_err(HearthError::publish)?;
        self.publisher.publish(&encoded).await?;

        Ok(record)
    }

    /// All stored records for a device, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn device_history(
        &self,
        device_id: &DeviceId,
    ) -> Result<Vec<TelemetryRecord>, HearthError> {
        self.telemetry.find_by_device(device_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    use hearth_domain::device::Device;
    use hearth_domain::id::{HomeId, UserId};

    use super::*;

    // ── In-memory device repo ──────────────────────────────────────

    #[derive(Default, Clone)]
    struct InMemoryDeviceRepo {
        store: Arc<Mutex<Vec<Device>>>,
    }

    impl InMemoryDeviceRepo {
        fn with(devices: Vec<Device>) -> Self {
            Self {
                store: Arc::new(Mutex::new(devices)),
            }
        }
    }

    impl DeviceRepository for InMemoryDeviceRepo {
        fn add(&self, device: &Device) -> impl Future<Output = Result<(), HearthError>> + Send {
            self.store.lock().unwrap().push(device.clone());
            async { Ok(()) }
        }

        fn update(&self, device: &Device) -> impl Future<Output = Result<(), HearthError>> + Send {
            let mut store = self.store.lock().unwrap();
            if let Some(existing) = store
                .iter_mut()
                .find(|candidate| candidate.device_id == device.device_id)
            {
                *existing = device.clone();
            }
            async { Ok(()) }
        }

        fn find_by_id(
            &self,
            id: &DeviceId,
        ) -> impl Future<Output = Result<Option<Device>, HearthError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store
                .iter()
                .find(|device| device.device_id == *id)
                .cloned();
            async { Ok(result) }
        }

        fn find_by_channel(
            &self,
            channel: &ChannelId,
        ) -> impl Future<Output = Result<Option<Device>, HearthError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store
                .iter()
                .find(|device| device.channel == *channel)
                .cloned();
            async { Ok(result) }
        }

        fn find_by_user(
            &self,
            user_id: UserId,
        ) -> impl Future<Output = Result<Vec<Device>, HearthError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<_> = store
                .iter()
                .filter(|device| device.user_id == user_id)
                .cloned()
                .collect();
            async { Ok(result) }
        }
    }

    // ── In-memory telemetry repo ───────────────────────────────────

    #[derive(Default, Clone)]
    struct InMemoryTelemetryRepo {
        store: Arc<Mutex<Vec<TelemetryRecord>>>,
        fail: bool,
    }

    impl TelemetryRepository for InMemoryTelemetryRepo {
        fn append(
            &self,
            record: &TelemetryRecord,
        ) -> impl Future<Output = Result<(), HearthError>> + Send {
            let result = if self.fail {
                Err(HearthError::storage(std::io::Error::other("insert failed")))
            } else {
                self.store.lock().unwrap().push(record.clone());
                Ok(())
            };
            async { result }
        }

        fn find_by_device(
            &self,
            device_id: &DeviceId,
        ) -> impl Future<Output = Result<Vec<TelemetryRecord>, HearthError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<_> = store
                .iter()
                .filter(|record| record.device_id == *device_id)
                .cloned()
                .collect();
            async { Ok(result) }
        }
    }

    // ── Spy publisher ──────────────────────────────────────────────

    #[derive(Default, Clone)]
    struct SpyPublisher {
        published: Arc<Mutex<Vec<Vec<u8>>>>,
        fail: bool,
    }

    impl TelemetryPublisher for SpyPublisher {
        fn publish(&self, payload: &[u8]) -> impl Future<Output = Result<(), HearthError>> + Send {
            let result = if self.fail {
                Err(HearthError::publish(std::io::Error::other("queue gone")))
            } else {
                self.published.lock().unwrap().push(payload.to_vec());
                Ok(())
            };
            async { result }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn known_device() -> Device {
        Device::builder()
            .device_id("dev-123")
            .channel("home/7/dev-123")
            .user_id(UserId::new(1))
            .home_id(HomeId::new(7))
            .build()
            .unwrap()
    }

    fn make_service(
        devices: Vec<Device>,
        records: InMemoryTelemetryRepo,
        publisher: SpyPublisher,
    ) -> TelemetryService<InMemoryDeviceRepo, InMemoryTelemetryRepo, SpyPublisher> {
        TelemetryService::new(InMemoryDeviceRepo::with(devices), records, publisher)
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_persist_and_forward_well_formed_payload() {
        let records = InMemoryTelemetryRepo::default();
        let publisher = SpyPublisher::default();
        let svc = make_service(
            vec![known_device()],
            records.clone(),
            publisher.clone(),
        );

        let record = svc
            .ingest(&ChannelId::new("home/7/dev-123"), br#"{"temp": 21.5}"#)
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"device_id":"dev-123","home_id":7,"data":{"temp":21.5}}"#
        );

        let stored = records.store.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], record);

        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(
            published[0],
            br#"{"device_id":"dev-123","home_id":7,"data":{"temp":21.5}}"#
        );
    }

    #[tokio::test]
    async fn should_drop_message_when_channel_unknown() {
        let records = InMemoryTelemetryRepo::default();
        let publisher = SpyPublisher::default();
        let svc = make_service(vec![], records.clone(), publisher.clone());

        let result = svc
            .ingest(&ChannelId::new("home/0/ghost"), br#"{"temp": 21.5}"#)
            .await;

        assert!(matches!(result, Err(HearthError::NotFound(_))));
        assert!(records.store.lock().unwrap().is_empty());
        assert!(publisher.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reject_payload_that_is_not_a_json_object() {
        let records = InMemoryTelemetryRepo::default();
        let publisher = SpyPublisher::default();
        let svc = make_service(
            vec![known_device()],
            records.clone(),
            publisher.clone(),
        );

        for payload in [&b"not json"[..], b"42", b"[1, 2]"] {
            let result = svc.ingest(&ChannelId::new("home/7/dev-123"), payload).await;
            assert!(matches!(result, Err(HearthError::MalformedPayload(_))));
        }

        assert!(records.store.lock().unwrap().is_empty());
        assert!(publisher.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_not_publish_when_persistence_fails() {
        let records = InMemoryTelemetryRepo {
            fail: true,
            ..InMemoryTelemetryRepo::default()
        };
        let publisher = SpyPublisher::default();
        let svc = make_service(
            vec![known_device()],
            records.clone(),
            publisher.clone(),
        );

        let result = svc
            .ingest(&ChannelId::new("home/7/dev-123"), br#"{"temp": 21.5}"#)
            .await;

        assert!(matches!(result, Err(HearthError::Storage(_))));
        assert!(publisher.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_keep_stored_record_when_publish_fails() {
        let records = InMemoryTelemetryRepo::default();
        let publisher = SpyPublisher {
            fail: true,
            ..SpyPublisher::default()
        };
        let svc = make_service(
            vec![known_device()],
            records.clone(),
            publisher.clone(),
        );

        let result = svc
            .ingest(&ChannelId::new("home/7/dev-123"), br#"{"temp": 21.5}"#)
            .await;
        assert!(matches!(result, Err(HearthError::Publish(_))));

        // No compensating delete: the record must remain retrievable.
        let history = svc
            .device_history(&DeviceId::new("dev-123"))
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].home_id, Some(HomeId::new(7)));
    }

    #[tokio::test]
    async fn should_copy_home_assignment_at_receipt_time() {
        let mut unassigned = known_device();
        unassigned.home_id = None;
        let records = InMemoryTelemetryRepo::default();
        let svc = make_service(
            vec![unassigned],
            records.clone(),
            SpyPublisher::default(),
        );

        let record = svc
            .ingest(&ChannelId::new("home/7/dev-123"), br#"{"on": true}"#)
            .await
            .unwrap();

        assert_eq!(record.home_id, None);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"device_id":"dev-123","home_id":null,"data":{"on":true}}"#
        );
    }

    #[tokio::test]
    async fn should_return_device_history_oldest_first() {
        let records = InMemoryTelemetryRepo::default();
        let svc = make_service(
            vec![known_device()],
            records.clone(),
            SpyPublisher::default(),
        );
        let channel = ChannelId::new("home/7/dev-123");

        svc.ingest(&channel, br#"{"temp": 20}"#).await.unwrap();
        svc.ingest(&channel, br#"{"temp": 21}"#).await.unwrap();

        let history = svc
            .device_history(&DeviceId::new("dev-123"))
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(
            serde_json::to_string(&history[0].data).unwrap(),
            r#"{"temp":20}"#
        );
    }
}
