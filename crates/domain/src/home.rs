//! Home — a household grouping devices and member accounts.

use serde::{Deserialize, Serialize};

use crate::error::{HearthError, ValidationError};
use crate::id::{HomeId, RoleId, UserId};
use crate::time::Timestamp;

/// A household. Devices may be assigned to it; users join it with a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Home {
    pub id: HomeId,
    pub name: String,
    pub owner: UserId,
    pub created_at: Timestamp,
}

/// Creation data for a home that does not yet have an identifier.
#[derive(Debug, Clone)]
pub struct NewHome {
    pub name: String,
    pub owner: UserId,
}

impl NewHome {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), HearthError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Membership of a user in a home, carrying the granted role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeMember {
    pub home_id: HomeId,
    pub user_id: UserId,
    pub role_id: RoleId,
}
