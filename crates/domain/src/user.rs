//! User accounts and the access-control roles they hold within homes.

use serde::{Deserialize, Serialize};

use crate::error::{HearthError, ValidationError};
use crate::id::{RoleId, UserId};

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Credential digest produced by the request layer, never clear text.
    pub password_hash: String,
    pub email: String,
}

/// Registration data for an account that does not yet have an identifier.
///
/// The storage gateway assigns the identifier and returns the full
/// [`User`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
}

impl NewUser {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::Validation`] when `username` or
    /// `password_hash` is empty.
    pub fn validate(&self) -> Result<(), HearthError> {
        if self.username.is_empty() {
            return Err(ValidationError::EmptyUsername.into());
        }
        if self.password_hash.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }
        Ok(())
    }
}

/// An access-control role granted to a user within a home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

impl Role {
    /// Full control over a home; required for analytics access.
    pub const OWNER: &'static str = "owner";
    /// Regular member of a home.
    pub const MEMBER: &'static str = "member";
    /// Read-only visitor.
    pub const GUEST: &'static str = "guest";

    /// Whether this role grants owner-level access.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.name == Self::OWNER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_validate_new_user_when_fields_present() {
        let user = NewUser {
            username: "alice".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            email: "alice@example.com".to_string(),
        };
        assert!(user.validate().is_ok());
    }

    #[test]
    fn should_return_validation_error_when_username_is_empty() {
        let user = NewUser {
            username: String::new(),
            password_hash: "hash".to_string(),
            email: String::new(),
        };
        assert!(matches!(
            user.validate(),
            Err(HearthError::Validation(ValidationError::EmptyUsername))
        ));
    }

    #[test]
    fn should_return_validation_error_when_password_hash_is_empty() {
        let user = NewUser {
            username: "bob".to_string(),
            password_hash: String::new(),
            email: String::new(),
        };
        assert!(matches!(
            user.validate(),
            Err(HearthError::Validation(ValidationError::EmptyPassword))
        ));
    }

    #[test]
    fn should_recognize_owner_role() {
        let owner = Role {
            id: RoleId::new(1),
            name: Role::OWNER.to_string(),
        };
        let guest = Role {
            id: RoleId::new(3),
            name: Role::GUEST.to_string(),
        };
        assert!(owner.is_owner());
        assert!(!guest.is_owner());
    }
}
