//! Клиентская библиотека для работы с social-server по HTTP.
//!
//! Предоставляет `SocialClient` поверх REST API (`reqwest`): регистрация и вход,
//! профиль, посты, лайки, комментарии и панель администратора.
//!
//! Клиент хранит JWT-токен после `register`/`login` и автоматически использует
//! его в защищённых операциях.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{SocialClientError, SocialClientResult};
pub use models::{
    Author, AuthResponse, Comment, CommentPage, Dashboard, ListPostsQuery, Post, PostPatch,
    ProfilePatch, Registration, SortBy, User,
};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Клиент социальной сети. Хранит JWT-токен текущего пользователя.
pub struct SocialClient {
    http: HttpClient,
    token: Option<String>,
}

impl SocialClient {
    /// Создаёт клиент для сервера с базовым URL, например `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> SocialClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Устанавливает JWT-токен вручную.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий JWT-токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый JWT-токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Регистрирует пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn register(
        &mut self,
        registration: &Registration,
    ) -> SocialClientResult<AuthResponse> {
        let result = self.http.register(registration).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Выполняет вход по email или логину и сохраняет JWT-токен в клиенте.
    pub async fn login(&mut self, login: &str, password: &str) -> SocialClientResult<AuthResponse> {
        let result = self.http.login(login, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Возвращает профиль текущего пользователя.
    ///
    /// Требует установленный JWT-токен.
    pub async fn me(&self) -> SocialClientResult<User> {
        self.http.me(self.require_token()?).await
    }

    /// Частично обновляет профиль текущего пользователя.
    ///
    /// Требует установленный JWT-токен.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> SocialClientResult<User> {
        self.http.update_profile(self.require_token()?, patch).await
    }

    /// Создаёт новый пост.
    ///
    /// Требует установленный JWT-токен.
    pub async fn create_post(
        &self,
        title: &str,
        body: &str,
        image_url: Option<&str>,
    ) -> SocialClientResult<Post> {
        self.http
            .create_post(self.require_token()?, title, body, image_url)
            .await
    }

    /// Возвращает ленту постов. Удалённые посты сервер не отдаёт.
    pub async fn list_posts(&self, query: &ListPostsQuery) -> SocialClientResult<Vec<Post>> {
        self.http.list_posts(query).await
    }

    /// Возвращает пост по идентификатору.
    pub async fn get_post(&self, id: i64) -> SocialClientResult<Post> {
        self.http.get_post(id).await
    }

    /// Частично обновляет пост по идентификатору.
    ///
    /// Требует установленный JWT-токен; менять пост может только автор.
    pub async fn update_post(&self, id: i64, patch: &PostPatch) -> SocialClientResult<Post> {
        self.http.update_post(self.require_token()?, id, patch).await
    }

    /// Удаляет пост по идентификатору.
    ///
    /// Требует установленный JWT-токен; удалить может автор или модератор.
    pub async fn delete_post(&self, id: i64) -> SocialClientResult<()> {
        self.http.delete_post(self.require_token()?, id).await
    }

    /// Ставит лайк. Повторный лайк возвращает `Forbidden`.
    pub async fn like_post(&self, id: i64) -> SocialClientResult<Post> {
        self.http.like_post(self.require_token()?, id).await
    }

    /// Снимает лайк. Без предыдущего лайка возвращает `Forbidden`.
    pub async fn unlike_post(&self, id: i64) -> SocialClientResult<Post> {
        self.http.unlike_post(self.require_token()?, id).await
    }

    /// Добавляет комментарий к посту.
    pub async fn add_comment(&self, post_id: i64, text: &str) -> SocialClientResult<Post> {
        self.http
            .add_comment(self.require_token()?, post_id, text)
            .await
    }

    /// Возвращает страницу комментариев поста.
    pub async fn list_comments(
        &self,
        post_id: i64,
        limit: usize,
        offset: usize,
    ) -> SocialClientResult<CommentPage> {
        self.http.list_comments(post_id, limit, offset).await
    }

    /// Редактирует свой комментарий.
    pub async fn edit_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> SocialClientResult<Comment> {
        self.http
            .edit_comment(self.require_token()?, post_id, comment_id, text)
            .await
    }

    /// Возвращает счётчики панели администратора. Нужна роль `admin`.
    pub async fn dashboard(&self) -> SocialClientResult<Dashboard> {
        self.http.dashboard(self.require_token()?).await
    }

    fn require_token(&self) -> SocialClientResult<&str> {
        self.token.as_deref().ok_or(SocialClientError::Unauthorized)
    }
}
