use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use super::map_sqlx_error;
use crate::data::user_repository::{NewUser, ProfilePatch, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::stats::UserStats;
use crate::domain::user::{AuthorSummary, Role, User};

const USER_COLUMNS: &str = "id, name, last_name, email, username, birth_date, bio, \
     profile_image_url, role, active, created_at";

#[derive(Debug, Clone)]
pub(crate) struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_credentials(
        &self,
        condition: &str,
        value: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let row = sqlx::query_as::<_, UserCredentialsRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}, password_hash
            FROM users
            WHERE {condition}
            "#
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.map(|r| -> Result<UserCredentials, DomainError> {
            Ok(UserCredentials {
                password_hash: r.password_hash,
                user: r.user.try_into()?,
            })
        })
        .transpose()
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    last_name: String,
    email: String,
    username: String,
    birth_date: NaiveDate,
    bio: Option<String>,
    profile_image_url: Option<String>,
    role: String,
    active: bool,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserCredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: i64,
    name: String,
    last_name: String,
    username: String,
    profile_image_url: Option<String>,
}

#[derive(sqlx::FromRow)]
struct UserStatsRow {
    total_users: i64,
    active_users: i64,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .map_err(|err| DomainError::Unexpected(format!("stored user {}: {err}", row.id)))?;
        Ok(Self {
            id: row.id,
            name: row.name,
            last_name: row.last_name,
            email: row.email,
            username: row.username,
            birth_date: row.birth_date,
            bio: row.bio,
            profile_image_url: row.profile_image_url,
            role,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users
                (name, last_name, email, username, password_hash, birth_date, bio,
                 profile_image_url, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.username)
        .bind(&input.password_hash)
        .bind(input.birth_date)
        .bind(&input.bio)
        .bind(&input.profile_image_url)
        .bind(input.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        self.find_credentials("username = $1", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        self.find_credentials("email = $1", email).await
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<UserCredentials>, DomainError> {
        self.find_credentials("email = $1 OR username = $1", login)
            .await
    }

    async fn update_profile(
        &self,
        id: i64,
        patch: ProfilePatch,
    ) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                last_name = COALESCE($3, last_name),
                bio = COALESCE($4, bio),
                profile_image_url = COALESCE($5, profile_image_url)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.last_name)
        .bind(patch.bio)
        .bind(patch.profile_image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.map(User::try_from).transpose()
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET active = $2
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.map(User::try_from).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_authors(&self, ids: &[i64]) -> Result<Vec<AuthorSummary>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT id, name, last_name, username, profile_image_url
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| AuthorSummary {
                id: row.id,
                name: row.name,
                last_name: row.last_name,
                username: row.username,
                profile_image_url: row.profile_image_url,
            })
            .collect())
    }

    async fn user_stats(&self) -> Result<UserStats, DomainError> {
        let row = sqlx::query_as::<_, UserStatsRow>(
            r#"
            SELECT
                COUNT(*) AS total_users,
                COUNT(*) FILTER (WHERE active) AS active_users
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        Ok(UserStats {
            total_users: row.total_users,
            active_users: row.active_users,
        })
    }
}

fn map_user_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23505")
    {
        let resource = match db_err.constraint() {
            Some("users_username_key") => "username",
            Some("users_email_key") => "email",
            _ => "user",
        };
        return DomainError::AlreadyExists(resource.to_string());
    }
    map_sqlx_error(err)
}
