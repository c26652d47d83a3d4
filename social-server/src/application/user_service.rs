use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::credentials::{ensure_identity_available, hash_password, new_user};
use crate::data::user_repository::{ProfilePatch, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{RegisterRequest, Role, UpdateProfileRequest, User};

pub(crate) const SEED_ADMIN_EMAIL: &str = "admin@redsocial.com";
pub(crate) const SEED_ADMIN_USERNAME: &str = "admin";

/// Bootstrap admin settings. Seeding is disabled while `secret` is `None`.
#[derive(Debug, Clone)]
pub(crate) struct AdminSeed {
    pub(crate) secret: Option<String>,
    pub(crate) password: String,
}

pub(crate) struct UserService<R: UserRepository> {
    repo: R,
    seed: AdminSeed,
}

impl<R: UserRepository> UserService<R> {
    pub(crate) fn new(repo: R, seed: AdminSeed) -> Self {
        Self { repo, seed }
    }

    pub(crate) async fn me(&self, user_id: i64) -> Result<User, DomainError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))
    }

    pub(crate) async fn update_profile(
        &self,
        user_id: i64,
        req: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let req = req.validate()?;
        let patch = ProfilePatch {
            name: req.name,
            last_name: req.last_name,
            bio: req.bio,
            profile_image_url: req.profile_image_url,
        };

        let user = self
            .repo
            .update_profile(user_id, patch)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;
        info!(user_id, "profile updated");
        Ok(user)
    }

    pub(crate) async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.repo.list_users().await
    }

    pub(crate) async fn create_user(
        &self,
        req: RegisterRequest,
        role: Role,
    ) -> Result<User, DomainError> {
        let req = req.validate(Utc::now().date_naive())?;
        ensure_identity_available(&self.repo, &req.email, &req.username).await?;

        let password_hash = hash_password(&req.password)?;
        let user = self
            .repo
            .create_user(new_user(req, password_hash, role))
            .await?;
        info!(user_id = user.id, role = role.as_str(), "user created by admin");
        Ok(user)
    }

    pub(crate) async fn deactivate(&self, user_id: i64) -> Result<User, DomainError> {
        self.set_active(user_id, false).await
    }

    pub(crate) async fn activate(&self, user_id: i64) -> Result<User, DomainError> {
        self.set_active(user_id, true).await
    }

    pub(crate) async fn seed_admin(&self, secret: &str) -> Result<User, DomainError> {
        let Some(expected) = self.seed.secret.as_deref() else {
            warn!("admin seed requested but ADMIN_SEED_SECRET is not configured");
            return Err(DomainError::forbidden("admin seeding is disabled"));
        };
        if secret != expected {
            warn!("admin seed requested with a wrong secret");
            return Err(DomainError::forbidden("invalid seed secret"));
        }

        let birth_date = NaiveDate::from_ymd_opt(1990, 1, 1)
            .ok_or_else(|| DomainError::Unexpected("invalid seed birth date".to_string()))?;
        let req = RegisterRequest {
            name: "Admin".to_string(),
            last_name: "Sistema".to_string(),
            email: SEED_ADMIN_EMAIL.to_string(),
            username: SEED_ADMIN_USERNAME.to_string(),
            password: self.seed.password.clone(),
            birth_date,
            bio: Some("Administrador del sistema".to_string()),
            profile_image_url: None,
        };

        self.create_user(req, Role::Admin).await
    }

    async fn set_active(&self, user_id: i64, active: bool) -> Result<User, DomainError> {
        let user = self
            .repo
            .set_active(user_id, active)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;
        info!(user_id, active, "user activation changed");
        Ok(user)
    }
}
