//! Device — a piece of hardware reporting telemetry on its own channel.

use serde::{Deserialize, Serialize};

use crate::error::{HearthError, ValidationError};
use crate::id::{ChannelId, DeviceId, HomeId, UserId};
use crate::time::{self, Timestamp};

/// A registered device.
///
/// The `channel` maps to exactly one device at any time; reassigning
/// `home_id` is the only mutation the ingestion flows permit after
/// registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub device_id: DeviceId,
    pub channel: ChannelId,
    pub production_date: Timestamp,
    pub warranty: String,
    pub location: String,
    pub is_active: bool,
    pub user_id: UserId,
    pub home_id: Option<HomeId>,
    pub created_at: Timestamp,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::Validation`] when `device_id` or `channel`
    /// is empty.
    pub fn validate(&self) -> Result<(), HearthError> {
        if self.device_id.is_empty() {
            return Err(ValidationError::EmptyDeviceId.into());
        }
        if self.channel.is_empty() {
            return Err(ValidationError::EmptyChannel.into());
        }
        Ok(())
    }

    /// Attach the device to a home.
    pub fn assign_home(&mut self, home_id: HomeId) {
        self.home_id = Some(home_id);
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    device_id: Option<DeviceId>,
    channel: Option<ChannelId>,
    production_date: Option<Timestamp>,
    warranty: Option<String>,
    location: Option<String>,
    is_active: Option<bool>,
    user_id: Option<UserId>,
    home_id: Option<HomeId>,
    created_at: Option<Timestamp>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn device_id(mut self, device_id: impl Into<DeviceId>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    #[must_use]
    pub fn channel(mut self, channel: impl Into<ChannelId>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    #[must_use]
    pub fn production_date(mut self, production_date: Timestamp) -> Self {
        self.production_date = Some(production_date);
        self
    }

    #[must_use]
    pub fn warranty(mut self, warranty: impl Into<String>) -> Self {
        self.warranty = Some(warranty.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    #[must_use]
    pub fn home_id(mut self, home_id: HomeId) -> Self {
        self.home_id = Some(home_id);
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// New devices default to active with `created_at` and
    /// `production_date` stamped now.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::Validation`] if `device_id` or `channel` is
    /// missing or empty.
    pub fn build(self) -> Result<Device, HearthError> {
        let device = Device {
            device_id: self.device_id.unwrap_or_else(|| DeviceId::new("")),
            channel: self.channel.unwrap_or_else(|| ChannelId::new("")),
            production_date: self.production_date.unwrap_or_else(time::now),
            warranty: self.warranty.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
            user_id: self.user_id.unwrap_or_default(),
            home_id: self.home_id,
            created_at: self.created_at.unwrap_or_else(time::now),
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_valid_device_when_id_and_channel_provided() {
        let device = Device::builder()
            .device_id("dev-123")
            .channel("home/7/dev-123")
            .user_id(UserId::new(1))
            .build()
            .unwrap();

        assert_eq!(device.device_id.as_str(), "dev-123");
        assert_eq!(device.channel.as_str(), "home/7/dev-123");
        assert!(device.is_active);
        assert!(device.home_id.is_none());
    }

    #[test]
    fn should_return_validation_error_when_device_id_missing() {
        let result = Device::builder().channel("some/topic").build();
        assert!(matches!(
            result,
            Err(HearthError::Validation(ValidationError::EmptyDeviceId))
        ));
    }

    #[test]
    fn should_return_validation_error_when_channel_missing() {
        let result = Device::builder().device_id("dev-123").build();
        assert!(matches!(
            result,
            Err(HearthError::Validation(ValidationError::EmptyChannel))
        ));
    }

    #[test]
    fn should_assign_home_to_unassigned_device() {
        let mut device = Device::builder()
            .device_id("dev-123")
            .channel("home/7/dev-123")
            .build()
            .unwrap();

        device.assign_home(HomeId::new(7));
        assert_eq!(device.home_id, Some(HomeId::new(7)));
    }

    #[test]
    fn should_roundtrip_device_through_serde_json() {
        let device = Device::builder()
            .device_id("dev-123")
            .channel("home/7/dev-123")
            .location("kitchen")
            .home_id(HomeId::new(7))
            .build()
            .unwrap();

        let json = serde_json::to_string(&device).unwrap();
        let parsed: Device = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.device_id, device.device_id);
        assert_eq!(parsed.home_id, device.home_id);
        assert_eq!(parsed.location, device.location);
    }
}
