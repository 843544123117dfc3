//! Shared application state for axum handlers.

use std::sync::Arc;

use hearth_app::ports::{
    DeviceRepository, HomeRepository, RoleRepository, TelemetryRepository, UserRepository,
};
use hearth_app::services::device_service::DeviceService;
use hearth_app::services::home_service::HomeService;
use hearth_app::services::user_service::UserService;

use crate::auth::AuthConfig;

/// Application state shared across all axum handlers.
///
/// Generic over the repository types to avoid dynamic dispatch. `Clone` is
/// implemented manually so the underlying types themselves do not need to
/// be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<UR, RR, HR, DR, TR> {
    /// Account registration and lookup.
    pub user_service: Arc<UserService<UR>>,
    /// Homes and their memberships.
    pub home_service: Arc<HomeService<HR, RR>>,
    /// Device registration and assignment.
    pub device_service: Arc<DeviceService<DR>>,
    /// Telemetry history, read by the analytics endpoint.
    pub telemetry_repo: Arc<TR>,
    /// Token keys and lifetime.
    pub auth: Arc<AuthConfig>,
}

impl<UR, RR, HR, DR, TR> Clone for AppState<UR, RR, HR, DR, TR> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            home_service: Arc::clone(&self.home_service),
            device_service: Arc::clone(&self.device_service),
            telemetry_repo: Arc::clone(&self.telemetry_repo),
            auth: Arc::clone(&self.auth),
        }
    }
}

impl<UR, RR, HR, DR, TR> AppState<UR, RR, HR, DR, TR>
where
    UR: UserRepository + Send + Sync + 'static,
    RR: RoleRepository + Send + Sync + 'static,
    HR: HomeRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: TelemetryRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        user_service: UserService<UR>,
        home_service: HomeService<HR, RR>,
        device_service: DeviceService<DR>,
        telemetry_repo: TR,
        auth: AuthConfig,
    ) -> Self {
        Self {
            user_service: Arc::new(user_service),
            home_service: Arc::new(home_service),
            device_service: Arc::new(device_service),
            telemetry_repo: Arc::new(telemetry_repo),
            auth: Arc::new(auth),
        }
    }
}
