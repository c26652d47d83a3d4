use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::credentials::{
    DUMMY_PASSWORD_HASH, ensure_identity_available, hash_password, new_user, verify_password,
};
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, Role, User};
use crate::infrastructure::jwt::JwtService;

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    jwt: Arc<JwtService>,
}

impl<R: UserRepository> AuthService<R> {
    pub(crate) fn new(repo: R, jwt: Arc<JwtService>) -> Self {
        Self { repo, jwt }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate(Utc::now().date_naive())?;
        ensure_identity_available(&self.repo, &req.email, &req.username).await?;

        let password_hash = hash_password(&req.password)?;
        let user = self
            .repo
            .create_user(new_user(req, password_hash, Role::User))
            .await?;
        info!(user_id = user.id, username = %user.username, "user registered");

        let access_token = self.issue_token(&user)?;
        Ok(AuthResult { user, access_token })
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.repo.find_by_login(&req.login).await? {
            Some(user_creds) => user_creds,
            None => {
                // same argon2 cost whether or not the user exists
                match verify_password(&req.password, DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                return Err(DomainError::InvalidCredentials);
            }
        };

        verify_password(&req.password, &user_creds.password_hash)?;

        if !user_creds.user.active {
            debug!(user_id = user_creds.user.id, "login rejected: account deactivated");
            return Err(DomainError::forbidden("account is deactivated"));
        }

        let access_token = self.issue_token(&user_creds.user)?;
        Ok(AuthResult {
            user: user_creds.user,
            access_token,
        })
    }

    fn issue_token(&self, user: &User) -> Result<String, DomainError> {
        self.jwt
            .generate_token(user)
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }
}
