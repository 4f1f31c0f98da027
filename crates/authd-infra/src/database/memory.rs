//! In-memory credential store - used in tests and as fallback when no
//! database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use authd_core::domain::User;
use authd_core::error::RepoError;
use authd_core::ports::UserRepository;

/// HashMap-backed user repository with the same uniqueness guarantees as the
/// real store.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Duplicate(format!(
                "email {} already exists",
                user.email
            )));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Duplicate(format!(
                "username {} already exists",
                user.username
            )));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.users.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, username: &str) -> User {
        User::new(
            email.to_string(),
            username.to_string(),
            "Ada".to_string(),
            "Lovelace".to_string(),
            "$argon2id$stub".to_string(),
        )
    }

    #[tokio::test]
    async fn create_and_lookup() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("ada@example.com", "ada")).await.unwrap();

        assert!(repo.get_by_id(created.id).await.unwrap().is_some());
        assert!(
            repo.get_by_email("ada@example.com")
                .await
                .unwrap()
                .is_some()
        );
        assert!(repo.get_by_username("ada").await.unwrap().is_some());
        assert!(repo.get_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email_and_username() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("ada@example.com", "ada")).await.unwrap();

        let same_email = repo.create(user("ada@example.com", "ada2")).await;
        assert!(matches!(same_email, Err(RepoError::Duplicate(_))));

        let same_username = repo.create(user("ada2@example.com", "ada")).await;
        assert!(matches!(same_username, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn update_requires_an_existing_record() {
        let repo = InMemoryUserRepository::new();

        let missing = repo.update(user("ada@example.com", "ada")).await;
        assert!(matches!(missing, Err(RepoError::NotFound)));

        let created = repo.create(user("ada@example.com", "ada")).await.unwrap();
        let mut changed = created.clone();
        changed.first_name = "Augusta".to_string();

        let updated = repo.update(changed).await.unwrap();
        assert_eq!(updated.first_name, "Augusta");
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("ada@example.com", "ada")).await.unwrap();

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(created.id).await,
            Err(RepoError::NotFound)
        ));
    }
}
