//! Device service — use-cases for registering and managing devices.

use hearth_domain::device::Device;
use hearth_domain::error::{HearthError, NotFoundError};
use hearth_domain::id::{DeviceId, HomeId, UserId};

use crate::ports::DeviceRepository;

/// Application service for device operations.
pub struct DeviceService<R> {
    repo: R,
}

impl<R: DeviceRepository> DeviceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register a new device after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, device), fields(device_id = %device.device_id))]
    pub async fn register_device(&self, device: Device) -> Result<Device, HearthError> {
        device.validate()?;
        self.repo.add(&device).await?;
        Ok(device)
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: &DeviceId) -> Result<Device, HearthError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Attach an existing device to a home.
    ///
    /// Reassigning the home is the only mutation permitted after
    /// registration.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::NotFound`] when the device does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn assign_home(
        &self,
        id: &DeviceId,
        home_id: HomeId,
    ) -> Result<Device, HearthError> {
        let mut device = self.get_device(id).await?;
        device.assign_home(home_id);
        self.repo.update(&device).await?;
        Ok(device)
    }

    /// List every device registered by the user.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn devices_for_user(&self, user_id: UserId) -> Result<Vec<Device>, HearthError> {
        self.repo.find_by_user(user_id).await
    }
}
