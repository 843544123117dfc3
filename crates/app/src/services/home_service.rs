//! Home service — use-cases for homes and their memberships.

use hearth_domain::error::{HearthError, NotFoundError};
use hearth_domain::home::{Home, HomeMember, NewHome};
use hearth_domain::id::{HomeId, UserId};
use hearth_domain::user::Role;

use crate::ports::{HomeRepository, RoleRepository};

/// Application service for home operations.
pub struct HomeService<H, R> {
    homes: H,
    roles: R,
}

impl<H: HomeRepository, R: RoleRepository> HomeService<H, R> {
    /// Create a new service backed by the given repositories.
    pub fn new(homes: H, roles: R) -> Self {
        Self { homes, roles }
    }

    /// Create a home and enroll its creator as the `owner` member.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::Validation`] if invariants fail,
    /// [`HearthError::NotFound`] if the `owner` role is not seeded, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, home), fields(home_name = %home.name))]
    pub async fn create_home(&self, home: NewHome) -> Result<Home, HearthError> {
        home.validate()?;
        let owner_role = self.role_by_name(Role::OWNER).await?;
        let created = self.homes.add(&home).await?;
        self.homes
            .add_member(HomeMember {
                home_id: created.id,
                user_id: created.owner,
                role_id: owner_role.id,
            })
            .await?;
        Ok(created)
    }

    /// Attach an existing user to a home with a named role.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::NotFound`] when `role_name` is unknown, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn add_member(
        &self,
        home_id: HomeId,
        user_id: UserId,
        role_name: &str,
    ) -> Result<(), HearthError> {
        let role = self.role_by_name(role_name).await?;
        self.homes
            .add_member(HomeMember {
                home_id,
                user_id,
                role_id: role.id,
            })
            .await
    }

    /// List every home the user belongs to.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn homes_for_user(&self, user_id: UserId) -> Result<Vec<Home>, HearthError> {
        self.homes.find_by_user(user_id).await
    }

    /// The role a user holds in a home, or `None` for non-members.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn member_role(
        &self,
        home_id: HomeId,
        user_id: UserId,
    ) -> Result<Option<Role>, HearthError> {
        self.homes.member_role(home_id, user_id).await
    }

    async fn role_by_name(&self, name: &str) -> Result<Role, HearthError> {
        self.roles.find_by_name(name).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Role",
                id: name.to_string(),
            }
            .into()
        })
    }
}
