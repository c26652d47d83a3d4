use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{SocialClientError, SocialClientResult};
use crate::models::{
    AuthResponse, Comment, CommentPage, Dashboard, ListPostsQuery, Post, PostPatch,
    ProfilePatch, Registration, User,
};

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    login: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePostRequestDto<'a> {
    title: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CommentTextDto<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct PaginationQuery {
    limit: usize,
    offset: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для работы с REST API `social-server`.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub fn new(base_url: impl Into<String>) -> SocialClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> SocialClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body
                .error
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        SocialClientError::from_http_status(status, Some(message))
    }

    /// отправляет готовый запрос и декодирует json-ответ или ошибку сервера
    async fn execute<TRes>(request: RequestBuilder) -> SocialClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(SocialClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(SocialClientError::from_reqwest)
    }

    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
        token: Option<&str>,
    ) -> SocialClientResult<TRes>
    where
        TReq: Serialize,
        TRes: DeserializeOwned,
    {
        Self::execute(self.request(method, path, token).json(body)).await
    }

    /// Регистрирует пользователя и возвращает JWT + данные пользователя.
    pub async fn register(&self, registration: &Registration) -> SocialClientResult<AuthResponse> {
        self.send_json(Method::POST, "/api/auth/register", registration, None)
            .await
    }

    /// Выполняет вход по email или логину.
    pub async fn login(&self, login: &str, password: &str) -> SocialClientResult<AuthResponse> {
        let payload = LoginRequestDto { login, password };
        self.send_json(Method::POST, "/api/auth/login", &payload, None)
            .await
    }

    /// Возвращает профиль текущего пользователя.
    pub async fn me(&self, token: &str) -> SocialClientResult<User> {
        Self::execute(self.request(Method::GET, "/api/users/me", Some(token))).await
    }

    /// Частично обновляет профиль текущего пользователя.
    pub async fn update_profile(
        &self,
        token: &str,
        patch: &ProfilePatch,
    ) -> SocialClientResult<User> {
        self.send_json(Method::PATCH, "/api/users/me", patch, Some(token))
            .await
    }

    /// Создаёт пост от имени авторизованного пользователя.
    ///
    /// Требует валидный JWT-токен.
    pub async fn create_post(
        &self,
        token: &str,
        title: &str,
        body: &str,
        image_url: Option<&str>,
    ) -> SocialClientResult<Post> {
        let payload = CreatePostRequestDto {
            title,
            body,
            image_url,
        };
        self.send_json(Method::POST, "/api/posts", &payload, Some(token))
            .await
    }

    /// Возвращает ленту постов с сортировкой, фильтром по автору и пагинацией.
    pub async fn list_posts(&self, query: &ListPostsQuery) -> SocialClientResult<Vec<Post>> {
        Self::execute(self.request(Method::GET, "/api/posts", None).query(query)).await
    }

    /// Получает пост по идентификатору.
    pub async fn get_post(&self, id: i64) -> SocialClientResult<Post> {
        Self::execute(self.request(Method::GET, &format!("/api/posts/{id}"), None)).await
    }

    /// Частично обновляет пост. Доступно только автору.
    pub async fn update_post(
        &self,
        token: &str,
        id: i64,
        patch: &PostPatch,
    ) -> SocialClientResult<Post> {
        self.send_json(
            Method::PATCH,
            &format!("/api/posts/{id}"),
            patch,
            Some(token),
        )
        .await
    }

    /// Удаляет пост (автор или модератор).
    pub async fn delete_post(&self, token: &str, id: i64) -> SocialClientResult<()> {
        let _: serde_json::Value = Self::execute(self.request(
            Method::DELETE,
            &format!("/api/posts/{id}"),
            Some(token),
        ))
        .await?;
        Ok(())
    }

    /// Ставит лайк посту.
    pub async fn like_post(&self, token: &str, id: i64) -> SocialClientResult<Post> {
        Self::execute(self.request(
            Method::POST,
            &format!("/api/posts/{id}/like"),
            Some(token),
        ))
        .await
    }

    /// Снимает лайк с поста.
    pub async fn unlike_post(&self, token: &str, id: i64) -> SocialClientResult<Post> {
        Self::execute(self.request(
            Method::DELETE,
            &format!("/api/posts/{id}/like"),
            Some(token),
        ))
        .await
    }

    /// Добавляет комментарий и возвращает пост целиком.
    pub async fn add_comment(&self, token: &str, post_id: i64, text: &str) -> SocialClientResult<Post> {
        self.send_json(
            Method::POST,
            &format!("/api/posts/{post_id}/comments"),
            &CommentTextDto { text },
            Some(token),
        )
        .await
    }

    /// Возвращает страницу комментариев поста, от новых к старым.
    pub async fn list_comments(
        &self,
        post_id: i64,
        limit: usize,
        offset: usize,
    ) -> SocialClientResult<CommentPage> {
        let request = self
            .request(Method::GET, &format!("/api/posts/{post_id}/comments"), None)
            .query(&PaginationQuery { limit, offset });
        Self::execute(request).await
    }

    /// Редактирует свой комментарий.
    pub async fn edit_comment(
        &self,
        token: &str,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> SocialClientResult<Comment> {
        self.send_json(
            Method::PATCH,
            &format!("/api/posts/{post_id}/comments/{comment_id}"),
            &CommentTextDto { text },
            Some(token),
        )
        .await
    }

    /// Возвращает счётчики панели администратора.
    pub async fn dashboard(&self, token: &str) -> SocialClientResult<Dashboard> {
        Self::execute(self.request(Method::GET, "/api/admin/stats", Some(token))).await
    }
}
