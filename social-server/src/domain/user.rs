use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::DomainError;

pub(crate) const MIN_AGE_YEARS: u32 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    pub(crate) fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            _ => Err(DomainError::Validation {
                field: "role",
                message: "must be one of user, moderator, admin",
            }),
        }
    }

    /// Moderators and admins may remove posts they do not own.
    pub(crate) fn can_moderate(self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) birth_date: NaiveDate,
    pub(crate) bio: Option<String>,
    pub(crate) profile_image_url: Option<String>,
    pub(crate) role: Role,
    pub(crate) active: bool,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            name: self.name.clone(),
            last_name: self.last_name.clone(),
            username: self.username.clone(),
            profile_image_url: self.profile_image_url.clone(),
        }
    }
}

/// Display projection of a user referenced by a post or comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AuthorSummary {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) last_name: String,
    pub(crate) username: String,
    pub(crate) profile_image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct RegisterRequest {
    pub(crate) name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) birth_date: NaiveDate,
    pub(crate) bio: Option<String>,
    pub(crate) profile_image_url: Option<String>,
}

impl RegisterRequest {
    pub(crate) fn validate(self, today: NaiveDate) -> Result<Self, DomainError> {
        let name = normalize_person_name("name", &self.name)?;
        let last_name = normalize_person_name("last_name", &self.last_name)?;
        let email = normalize_email(&self.email)?;
        let username = normalize_register_username(&self.username)?;
        validate_password_strength(&self.password)?;
        validate_min_age(self.birth_date, today)?;
        let bio = normalize_optional_text("bio", self.bio, 500)?;
        let profile_image_url =
            normalize_optional_text("profile_image_url", self.profile_image_url, 2048)?;

        Ok(Self {
            name,
            last_name,
            email,
            username,
            password: self.password,
            birth_date: self.birth_date,
            bio,
            profile_image_url,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LoginRequest {
    /// Email or username.
    pub(crate) login: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let login = self.login.trim();
        if login.is_empty() || login.len() > 255 {
            return Err(DomainError::Validation {
                field: "login",
                message: "must be 1..255 chars",
            });
        }

        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        let login = if login.contains('@') {
            login.to_lowercase()
        } else {
            login.to_string()
        };
        Ok(Self {
            login,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct UpdateProfileRequest {
    pub(crate) name: Option<String>,
    pub(crate) last_name: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) profile_image_url: Option<String>,
}

impl UpdateProfileRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.name.is_none()
            && self.last_name.is_none()
            && self.bio.is_none()
            && self.profile_image_url.is_none()
        {
            return Err(DomainError::Validation {
                field: "profile",
                message: "at least one field must be provided",
            });
        }

        Ok(Self {
            name: self
                .name
                .map(|name| normalize_person_name("name", &name))
                .transpose()?,
            last_name: self
                .last_name
                .map(|last_name| normalize_person_name("last_name", &last_name))
                .transpose()?,
            bio: normalize_optional_text("bio", self.bio, 500)?,
            profile_image_url: normalize_optional_text(
                "profile_image_url",
                self.profile_image_url,
                2048,
            )?,
        })
    }
}

pub(crate) fn normalize_person_name(
    field: &'static str,
    value: &str,
) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > 100 {
        return Err(DomainError::Validation {
            field,
            message: "must be 1..100 chars",
        });
    }
    Ok(value.to_string())
}

fn normalize_register_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    if username.len() < 3 || username.len() > 64 {
        return Err(DomainError::Validation {
            field: "username",
            message: "must be 3..64 chars",
        });
    }
    if username.contains('@') {
        return Err(DomainError::Validation {
            field: "username",
            message: "must not contain '@'",
        });
    }
    Ok(username.to_string())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email)
}

pub(crate) fn validate_password_strength(password: &str) -> Result<(), DomainError> {
    let len = password.chars().count();
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(8..=128).contains(&len) || !has_uppercase || !has_digit {
        return Err(DomainError::Validation {
            field: "password",
            message: "must be 8..128 chars with at least one uppercase letter and one digit",
        });
    }
    Ok(())
}

fn validate_min_age(birth_date: NaiveDate, today: NaiveDate) -> Result<(), DomainError> {
    let age = today.years_since(birth_date).unwrap_or(0);
    if age < MIN_AGE_YEARS {
        return Err(DomainError::Validation {
            field: "birth_date",
            message: "user must be at least 13 years old",
        });
    }
    Ok(())
}

fn normalize_optional_text(
    field: &'static str,
    value: Option<String>,
    max_chars: usize,
) -> Result<Option<String>, DomainError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max_chars {
        return Err(DomainError::Validation {
            field,
            message: "must not be blank or too long",
        });
    }
    Ok(Some(value.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        LoginRequest, RegisterRequest, Role, UpdateProfileRequest, normalize_email,
        normalize_register_username, validate_password_strength,
    };
    use crate::domain::error::DomainError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn sample_register() -> RegisterRequest {
        RegisterRequest {
            name: "  Ana ".to_string(),
            last_name: "Pérez".to_string(),
            email: "  Ana@Example.COM ".to_string(),
            username: " ana_p ".to_string(),
            password: "Secret123".to_string(),
            birth_date: date(2000, 5, 20),
            bio: None,
            profile_image_url: None,
        }
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let value = normalize_email("  TeSt@Example.COM ").expect("must be valid");
        assert_eq!(value, "test@example.com");
    }

    #[test]
    fn register_username_rules_are_applied() {
        assert!(normalize_register_username("ab").is_err());
        assert!(normalize_register_username("a@b.com").is_err());
        assert!(normalize_register_username("valid_user").is_ok());
    }

    #[test]
    fn password_requires_uppercase_and_digit() {
        assert!(validate_password_strength("alllowercase1").is_err());
        assert!(validate_password_strength("NoDigitsHere").is_err());
        assert!(validate_password_strength("Sh0rt").is_err());
        assert!(validate_password_strength("Secret123").is_ok());
    }

    #[test]
    fn register_rejects_users_younger_than_thirteen() {
        let mut req = sample_register();
        req.birth_date = date(2012, 6, 2);

        let err = req
            .validate(date(2025, 6, 1))
            .expect_err("12 years old must be rejected");
        assert!(matches!(
            err,
            DomainError::Validation {
                field: "birth_date",
                ..
            }
        ));
    }

    #[test]
    fn register_accepts_thirteenth_birthday() {
        let mut req = sample_register();
        req.birth_date = date(2012, 6, 1);

        assert!(req.validate(date(2025, 6, 1)).is_ok());
    }

    #[test]
    fn register_normalizes_fields() {
        let validated = sample_register()
            .validate(date(2025, 1, 1))
            .expect("must validate");
        assert_eq!(validated.name, "Ana");
        assert_eq!(validated.email, "ana@example.com");
        assert_eq!(validated.username, "ana_p");
    }

    #[test]
    fn login_lowercases_email_but_keeps_username() {
        let by_email = LoginRequest {
            login: " Ana@Example.com ".to_string(),
            password: "x".to_string(),
        }
        .validate()
        .expect("must validate");
        assert_eq!(by_email.login, "ana@example.com");

        let by_username = LoginRequest {
            login: "Ana_P".to_string(),
            password: "x".to_string(),
        }
        .validate()
        .expect("must validate");
        assert_eq!(by_username.login, "Ana_P");
    }

    #[test]
    fn empty_profile_patch_is_rejected() {
        let err = UpdateProfileRequest::default()
            .validate()
            .expect_err("empty patch must fail");
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn only_moderators_and_admins_can_moderate() {
        assert!(!Role::User.can_moderate());
        assert!(Role::Moderator.can_moderate());
        assert!(Role::Admin.can_moderate());
        assert_eq!(Role::parse("moderator").expect("known role"), Role::Moderator);
        assert!(Role::parse("root").is_err());
    }
}
