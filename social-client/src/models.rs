use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель пользователя.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Имя.
    pub name: String,
    /// Фамилия.
    pub last_name: String,
    /// Email (в нижнем регистре).
    pub email: String,
    /// Логин.
    pub username: String,
    /// Дата рождения.
    pub birth_date: NaiveDate,
    /// Описание профиля.
    pub bio: Option<String>,
    /// URL изображения профиля.
    pub profile_image_url: Option<String>,
    /// Роль: `user`, `moderator` или `admin`.
    pub role: String,
    /// `false`, если аккаунт деактивирован администратором.
    pub active: bool,
    /// Дата и время создания пользователя (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Краткие данные автора поста или комментария.
pub struct Author {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Имя.
    pub name: String,
    /// Фамилия.
    pub last_name: String,
    /// Логин.
    pub username: String,
    /// URL изображения профиля.
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Комментарий к посту.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Текст комментария.
    pub text: String,
    /// Идентификатор автора.
    pub author_id: i64,
    /// Автор; `None`, если пользователь больше не существует.
    pub author: Option<Author>,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// `true`, если текст редактировался.
    pub edited: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель поста.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок поста.
    pub title: String,
    /// Текст поста.
    pub body: String,
    /// URL изображения.
    pub image_url: Option<String>,
    /// Идентификатор автора.
    pub author_id: i64,
    /// Автор; `None`, если пользователь больше не существует.
    pub author: Option<Author>,
    /// Идентификаторы пользователей, поставивших лайк.
    pub likes: Vec<i64>,
    /// Количество лайков.
    pub like_count: usize,
    /// Комментарии в порядке добавления.
    pub comments: Vec<Comment>,
    /// Дата и время создания поста (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления поста (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Страница комментариев, от новых к старым.
pub struct CommentPage {
    /// Комментарии текущей страницы.
    pub items: Vec<Comment>,
    /// Общее количество комментариев у поста.
    pub total: usize,
    /// Смещение от начала.
    pub offset: usize,
    /// Размер страницы.
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ после успешной регистрации или входа.
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// Данные пользователя.
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Счётчики панели администратора.
pub struct Dashboard {
    /// Всего пользователей.
    pub total_users: i64,
    /// Активных пользователей.
    pub active_users: i64,
    /// Неудалённых постов.
    pub total_posts: i64,
    /// Удалённых постов.
    pub deleted_posts: i64,
    /// Комментариев у неудалённых постов.
    pub total_comments: i64,
    /// Лайков у неудалённых постов.
    pub total_likes: i64,
}

#[derive(Debug, Clone, Serialize)]
/// Данные для регистрации.
pub struct Registration {
    /// Имя.
    pub name: String,
    /// Фамилия.
    pub last_name: String,
    /// Email.
    pub email: String,
    /// Логин (3..64 символа, без `@`).
    pub username: String,
    /// Пароль: от 8 символов, минимум одна заглавная буква и одна цифра.
    pub password: String,
    /// Дата рождения; возраст должен быть не меньше 13 лет.
    pub birth_date: NaiveDate,
    /// Описание профиля.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// URL изображения профиля.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Частичное обновление поста: передаются только заданные поля.
pub struct PostPatch {
    /// Новый заголовок.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Новый текст.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Новый URL изображения.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Частичное обновление профиля.
pub struct ProfilePatch {
    /// Новое имя.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Новая фамилия.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Новое описание.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Новый URL изображения профиля.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Порядок сортировки ленты.
pub enum SortBy {
    /// Сначала новые.
    #[default]
    Date,
    /// Сначала популярные, затем новые.
    Likes,
}

#[derive(Debug, Clone, Serialize)]
/// Параметры запроса ленты постов.
pub struct ListPostsQuery {
    /// Порядок сортировки.
    pub sort_by: SortBy,
    /// Только посты этого автора.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    /// Размер страницы (1..=100).
    pub limit: u32,
    /// Смещение от начала.
    pub offset: u32,
}

impl Default for ListPostsQuery {
    fn default() -> Self {
        Self {
            sort_by: SortBy::Date,
            author_id: None,
            limit: 10,
            offset: 0,
        }
    }
}
