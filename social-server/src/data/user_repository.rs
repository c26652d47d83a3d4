use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::error::DomainError;
use crate::domain::stats::UserStats;
use crate::domain::user::{AuthorSummary, Role, User};

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) password_hash: String,
    pub(crate) birth_date: NaiveDate,
    pub(crate) bio: Option<String>,
    pub(crate) profile_image_url: Option<String>,
    pub(crate) role: Role,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ProfilePatch {
    pub(crate) name: Option<String>,
    pub(crate) last_name: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) profile_image_url: Option<String>,
}

/// User storage plus the directory lookup used to populate authors.
#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserCredentials>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError>;
    /// Matches either the email or the username.
    async fn find_by_login(&self, login: &str) -> Result<Option<UserCredentials>, DomainError>;
    async fn update_profile(&self, id: i64, patch: ProfilePatch)
    -> Result<Option<User>, DomainError>;
    async fn set_active(&self, id: i64, active: bool) -> Result<Option<User>, DomainError>;
    async fn list_users(&self) -> Result<Vec<User>, DomainError>;
    /// Unknown ids are skipped.
    async fn find_authors(&self, ids: &[i64]) -> Result<Vec<AuthorSummary>, DomainError>;
    async fn user_stats(&self) -> Result<UserStats, DomainError>;
}

pub(crate) type DynUserRepository = Arc<dyn UserRepository>;

#[async_trait]
impl<T: UserRepository + ?Sized> UserRepository for Arc<T> {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        (**self).create_user(input).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        (**self).find_by_username(username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        (**self).find_by_email(email).await
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<UserCredentials>, DomainError> {
        (**self).find_by_login(login).await
    }

    async fn update_profile(
        &self,
        id: i64,
        patch: ProfilePatch,
    ) -> Result<Option<User>, DomainError> {
        (**self).update_profile(id, patch).await
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Option<User>, DomainError> {
        (**self).set_active(id, active).await
    }

    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        (**self).list_users().await
    }

    async fn find_authors(&self, ids: &[i64]) -> Result<Vec<AuthorSummary>, DomainError> {
        (**self).find_authors(ids).await
    }

    async fn user_stats(&self) -> Result<UserStats, DomainError> {
        (**self).user_stats().await
    }
}
