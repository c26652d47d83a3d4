use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{RegisterRequest, Role};

/// Hash of an unknown password, verified when the login does not match any user
/// so both branches cost one argon2 run.
pub(crate) const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

pub(crate) fn hash_password(raw_password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2()?
        .hash_password(raw_password.as_bytes(), &salt)
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;
    Ok(password_hash.to_string())
}

pub(crate) fn verify_password(raw_password: &str, password_hash: &str) -> Result<(), DomainError> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|err| DomainError::Unexpected(err.to_string()))?;
    argon2()?
        .verify_password(raw_password.as_bytes(), &parsed_hash)
        .map_err(|err| match err {
            PasswordHashError::Password => DomainError::InvalidCredentials,
            _ => DomainError::Unexpected(err.to_string()),
        })
}

/// Fails with `AlreadyExists` when the email or the username is taken.
pub(crate) async fn ensure_identity_available<R: UserRepository>(
    repo: &R,
    email: &str,
    username: &str,
) -> Result<(), DomainError> {
    if repo.find_by_email(email).await?.is_some() {
        return Err(DomainError::AlreadyExists("email".to_string()));
    }
    if repo.find_by_username(username).await?.is_some() {
        return Err(DomainError::AlreadyExists("username".to_string()));
    }
    Ok(())
}

/// `req` must already be validated.
pub(crate) fn new_user(req: RegisterRequest, password_hash: String, role: Role) -> NewUser {
    NewUser {
        name: req.name,
        last_name: req.last_name,
        email: req.email,
        username: req.username,
        password_hash,
        birth_date: req.birth_date,
        bio: req.bio,
        profile_image_url: req.profile_image_url,
        role,
    }
}

fn argon2() -> Result<Argon2<'static>, DomainError> {
    let params =
        Params::new(19 * 1024, 2, 1, None).map_err(|err| DomainError::Unexpected(err.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}
