//! Storage port — repository traits for persistence.
//!
//! One trait per aggregate. Lookups return `Ok(None)` when nothing
//! matches; services decide whether that becomes a `NotFound`.

use std::future::Future;

use hearth_domain::device::Device;
use hearth_domain::error::HearthError;
use hearth_domain::home::{Home, HomeMember, NewHome};
use hearth_domain::id::{ChannelId, DeviceId, HomeId, UserId};
use hearth_domain::telemetry::TelemetryRecord;
use hearth_domain::user::{NewUser, Role, User};

/// Repository for [`User`] accounts.
pub trait UserRepository {
    /// Persist a new account and return it with its assigned identifier.
    fn add(&self, user: &NewUser) -> impl Future<Output = Result<User, HearthError>> + Send;

    /// Look up an account by its unique username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, HearthError>> + Send;
}

/// Repository for access-control [`Role`]s.
pub trait RoleRepository {
    /// Look up a role by its unique name.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Role>, HearthError>> + Send;
}

/// Repository for [`Home`]s and their memberships.
pub trait HomeRepository {
    /// Persist a new home and return it with its assigned identifier.
    fn add(&self, home: &NewHome) -> impl Future<Output = Result<Home, HearthError>> + Send;

    /// List every home the user belongs to.
    fn find_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Home>, HearthError>> + Send;

    /// Record a user's membership in a home with the given role.
    fn add_member(
        &self,
        member: HomeMember,
    ) -> impl Future<Output = Result<(), HearthError>> + Send;

    /// The role a user holds in a home, if they are a member.
    fn member_role(
        &self,
        home_id: HomeId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Role>, HearthError>> + Send;
}

/// Repository for [`Device`]s.
pub trait DeviceRepository {
    /// Persist a new device.
    fn add(&self, device: &Device) -> impl Future<Output = Result<(), HearthError>> + Send;

    /// Persist changes to an existing device.
    fn update(&self, device: &Device) -> impl Future<Output = Result<(), HearthError>> + Send;

    /// Look up a device by its stable identifier.
    fn find_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, HearthError>> + Send;

    /// Look up the device owning a transport channel.
    fn find_by_channel(
        &self,
        channel: &ChannelId,
    ) -> impl Future<Output = Result<Option<Device>, HearthError>> + Send;

    /// List every device registered by the user.
    fn find_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Device>, HearthError>> + Send;
}

/// Repository for persisted [`TelemetryRecord`]s.
pub trait TelemetryRepository {
    /// Append one immutable record.
    fn append(
        &self,
        record: &TelemetryRecord,
    ) -> impl Future<Output = Result<(), HearthError>> + Send;

    /// All records reported by a device, oldest first.
    fn find_by_device(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Vec<TelemetryRecord>, HearthError>> + Send;
}
