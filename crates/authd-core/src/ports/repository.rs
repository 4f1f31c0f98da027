use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::User;
use crate::error::RepoError;

/// Credential store contract - implemented by any storage backend.
///
/// Lookups return `None` for a missing record; `create` and `update` surface
/// unique-key violations as [`RepoError::Duplicate`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new record.
    async fn create(&self, user: User) -> Result<User, RepoError>;

    /// Find a user by their unique ID.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their username.
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Full-record update keyed by id.
    async fn update(&self, user: User) -> Result<User, RepoError>;

    /// Remove a record by id.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}
