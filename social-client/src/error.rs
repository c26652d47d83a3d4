use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `social-client`.
pub enum SocialClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется авторизация (отсутствует/некорректен токен или неверный пароль).
    #[error("unauthorized")]
    Unauthorized,

    /// Операция запрещена: чужой пост, повторный лайк, нет роли администратора.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Запрошенный ресурс не найден или удалён.
    #[error("not found")]
    NotFound,

    /// Email или логин уже заняты.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Некорректный запрос или ошибка валидации.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Ошибка на стороне сервера (5xx): хранилище недоступно или внутренний сбой.
    #[error("server error: {0}")]
    Server(String),
}

/// Результат операций `social-client`.
pub type SocialClientResult<T> = Result<T, SocialClientError>;

impl SocialClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized,
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden(message),
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            reqwest::StatusCode::CONFLICT => Self::Conflict(message),
            status if status.is_server_error() => Self::Server(message),
            _ => Self::InvalidRequest(message),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::SocialClientError;

    #[test]
    fn statuses_map_to_variants() {
        assert!(matches!(
            SocialClientError::from_http_status(reqwest::StatusCode::UNAUTHORIZED, None),
            SocialClientError::Unauthorized
        ));
        assert!(matches!(
            SocialClientError::from_http_status(
                reqwest::StatusCode::FORBIDDEN,
                Some("forbidden: post already liked".to_string())
            ),
            SocialClientError::Forbidden(ref msg) if msg.contains("already liked")
        ));
        assert!(matches!(
            SocialClientError::from_http_status(reqwest::StatusCode::CONFLICT, None),
            SocialClientError::Conflict(_)
        ));
        assert!(matches!(
            SocialClientError::from_http_status(reqwest::StatusCode::BAD_REQUEST, None),
            SocialClientError::InvalidRequest(ref msg) if msg.contains("400")
        ));
    }

    #[test]
    fn server_failures_are_not_reported_as_bad_requests() {
        assert!(matches!(
            SocialClientError::from_http_status(
                reqwest::StatusCode::SERVICE_UNAVAILABLE,
                Some("storage unavailable: pool timed out".to_string())
            ),
            SocialClientError::Server(ref msg) if msg.contains("storage unavailable")
        ));
        assert!(matches!(
            SocialClientError::from_http_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, None),
            SocialClientError::Server(ref msg) if msg.contains("500")
        ));
    }
}
