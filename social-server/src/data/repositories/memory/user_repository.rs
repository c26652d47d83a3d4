use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::data::user_repository::{NewUser, ProfilePatch, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::stats::UserStats;
use crate::domain::user::{AuthorSummary, User};

#[derive(Default)]
struct UserCollection {
    last_id: i64,
    users: BTreeMap<i64, UserCredentials>,
}

impl UserCollection {
    fn find(&self, predicate: impl Fn(&User) -> bool) -> Option<UserCredentials> {
        self.users
            .values()
            .find(|creds| predicate(&creds.user))
            .cloned()
    }
}

/// Users kept in process memory. Email and username are unique.
#[derive(Default)]
pub(crate) struct MemoryUserRepository {
    collection: RwLock<UserCollection>,
}

impl MemoryUserRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut collection = self.collection.write().await;

        if collection.find(|user| user.email == input.email).is_some() {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }
        if collection
            .find(|user| user.username == input.username)
            .is_some()
        {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }

        collection.last_id += 1;
        let user = User {
            id: collection.last_id,
            name: input.name,
            last_name: input.last_name,
            email: input.email,
            username: input.username,
            birth_date: input.birth_date,
            bio: input.bio,
            profile_image_url: input.profile_image_url,
            role: input.role,
            active: true,
            created_at: Utc::now(),
        };
        collection.users.insert(
            user.id,
            UserCredentials {
                user: user.clone(),
                password_hash: input.password_hash,
            },
        );
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self
            .collection
            .read()
            .await
            .users
            .get(&id)
            .map(|creds| creds.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .collection
            .read()
            .await
            .find(|user| user.username == username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self.collection.read().await.find(|user| user.email == email))
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .collection
            .read()
            .await
            .find(|user| user.email == login || user.username == login))
    }

    async fn update_profile(
        &self,
        id: i64,
        patch: ProfilePatch,
    ) -> Result<Option<User>, DomainError> {
        let mut collection = self.collection.write().await;
        let Some(creds) = collection.users.get_mut(&id) else {
            return Ok(None);
        };

        let user = &mut creds.user;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(bio) = patch.bio {
            user.bio = Some(bio);
        }
        if let Some(url) = patch.profile_image_url {
            user.profile_image_url = Some(url);
        }
        Ok(Some(user.clone()))
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Option<User>, DomainError> {
        let mut collection = self.collection.write().await;
        Ok(collection.users.get_mut(&id).map(|creds| {
            creds.user.active = active;
            creds.user.clone()
        }))
    }

    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let collection = self.collection.read().await;
        Ok(collection
            .users
            .values()
            .rev()
            .map(|creds| creds.user.clone())
            .collect())
    }

    async fn find_authors(&self, ids: &[i64]) -> Result<Vec<AuthorSummary>, DomainError> {
        let collection = self.collection.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| collection.users.get(id))
            .map(|creds| creds.user.summary())
            .collect())
    }

    async fn user_stats(&self) -> Result<UserStats, DomainError> {
        let collection = self.collection.read().await;
        let total_users = collection.users.len() as i64;
        let active_users = collection
            .users
            .values()
            .filter(|creds| creds.user.active)
            .count() as i64;
        Ok(UserStats {
            total_users,
            active_users,
        })
    }
}
