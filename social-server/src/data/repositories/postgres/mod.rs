pub(crate) mod post_repository;
pub(crate) mod user_repository;

use crate::domain::error::DomainError;

/// Connectivity failures surface as `Upstream`, everything else as `Unexpected`.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            DomainError::Upstream(err.to_string())
        }
        _ => DomainError::Unexpected(err.to_string()),
    }
}
