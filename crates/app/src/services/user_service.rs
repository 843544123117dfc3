//! User service — account registration and lookup.

use hearth_domain::error::{HearthError, NotFoundError};
use hearth_domain::user::{NewUser, User};

use crate::ports::UserRepository;

/// Application service for account operations.
///
/// Credential hashing and token issuance stay in the request layer; this
/// service only sees the finished hash.
pub struct UserService<R> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register a new account after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, user), fields(username = %user.username))]
    pub async fn register(&self, user: NewUser) -> Result<User, HearthError> {
        user.validate()?;
        self.repo.add(&user).await
    }

    /// Look up an account by username, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::NotFound`] when no account with `username`
    /// exists, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> Result<User, HearthError> {
        self.repo.find_by_username(username).await?.ok_or_else(|| {
            NotFoundError {
                entity: "User",
                id: username.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    use hearth_domain::error::ValidationError;
    use hearth_domain::id::UserId;

    use super::*;

    struct InMemoryUserRepo {
        store: Mutex<HashMap<String, User>>,
    }

    impl Default for InMemoryUserRepo {
        fn default() -> Self {
            Self {
                store: Mutex::new(HashMap::new()),
            }
        }
    }

    impl UserRepository for InMemoryUserRepo {
        fn add(&self, user: &NewUser) -> impl Future<Output = Result<User, HearthError>> + Send {
            let mut store = self.store.lock().unwrap();
            let stored = User {
                id: UserId::new(store.len() as i64 + 1),
                username: user.username.clone(),
                password_hash: user.password_hash.clone(),
                email: user.email.clone(),
            };
            store.insert(stored.username.clone(), stored.clone());
            async { Ok(stored) }
        }

        fn find_by_username(
            &self,
            username: &str,
        ) -> impl Future<Output = Result<Option<User>, HearthError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.get(username).cloned();
            async { Ok(result) }
        }
    }

    fn make_service() -> UserService<InMemoryUserRepo> {
        UserService::new(InMemoryUserRepo::default())
    }

    fn valid_user() -> NewUser {
        NewUser {
            username: "alice".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn should_register_user_when_valid() {
        let svc = make_service();

        let created = svc.register(valid_user()).await.unwrap();
        assert_eq!(created.username, "alice");
        assert_eq!(created.id, UserId::new(1));

        let fetched = svc.get_by_username("alice").await.unwrap();
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn should_reject_register_when_username_is_empty() {
        let svc = make_service();
        let mut user = valid_user();
        user.username = String::new();

        let result = svc.register(user).await;
        assert!(matches!(
            result,
            Err(HearthError::Validation(ValidationError::EmptyUsername))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_when_username_unknown() {
        let svc = make_service();
        let result = svc.get_by_username("nobody").await;
        assert!(matches!(result, Err(HearthError::NotFound(_))));
    }
}
