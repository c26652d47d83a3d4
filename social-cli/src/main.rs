use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use social_client::{
    AuthResponse, Comment, CommentPage, ListPostsQuery, Post, PostPatch, ProfilePatch,
    Registration, SocialClient, SocialClientError, SortBy, User,
};

const TOKEN_FILE: &str = ".social_token";
const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";
const SERVER_ENV: &str = "SOCIAL_SERVER";

#[derive(Debug, Parser)]
#[command(name = "social-cli", version, about = "CLI клиент для social-server")]
struct Cli {
    /// Адрес сервера. По умолчанию `SOCIAL_SERVER` или http://127.0.0.1:8080.
    #[arg(long, global = true)]
    server: Option<String>,

    /// Печатать ответ сервера как JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Date,
    Likes,
}

impl From<SortArg> for SortBy {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Date => SortBy::Date,
            SortArg::Likes => SortBy::Likes,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Дата рождения в формате YYYY-MM-DD.
        #[arg(long)]
        birth_date: NaiveDate,
        #[arg(long)]
        bio: Option<String>,
    },
    /// Вход по email или логину.
    Login {
        #[arg(long)]
        login: String,
        #[arg(long)]
        password: String,
    },
    /// Профиль текущего пользователя (требует токен).
    Me,
    /// Обновление профиля (требует токен).
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        profile_image_url: Option<String>,
    },
    /// Создание поста (требует токен).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Получение поста по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Обновление поста (требует токен). Меняются только переданные поля.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Удаление поста (требует токен).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Лента постов.
    List {
        #[arg(long, value_enum, default_value_t = SortArg::Date)]
        sort_by: SortArg,
        #[arg(long)]
        author_id: Option<i64>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Лайк поста (требует токен).
    Like {
        #[arg(long)]
        id: i64,
    },
    /// Снятие лайка (требует токен).
    Unlike {
        #[arg(long)]
        id: i64,
    },
    /// Добавление комментария (требует токен).
    Comment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        text: String,
    },
    /// Комментарии поста, от новых к старым.
    Comments {
        #[arg(long)]
        post_id: i64,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Редактирование своего комментария (требует токен).
    EditComment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        comment_id: i64,
        #[arg(long)]
        text: String,
    },
    /// Панель администратора (требует роль admin).
    Stats,
    /// Удаление сохранённого токена.
    Logout,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = resolve_server(cli.server, std::env::var(SERVER_ENV).ok());
    let mut client = SocialClient::new(server).map_err(map_client_error)?;
    let out = Output { json: cli.json };

    if let Some(token) = load_token().context("не удалось прочитать .social_token")? {
        client.set_token(token);
    }

    match cli.command {
        Command::Register {
            name,
            last_name,
            email,
            username,
            password,
            birth_date,
            bio,
        } => {
            let registration = Registration {
                name,
                last_name,
                email,
                username,
                password,
                birth_date,
                bio,
                profile_image_url: None,
            };
            let auth = client
                .register(&registration)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            out.auth("Регистрация успешна", &auth)?;
        }
        Command::Login { login, password } => {
            let auth = client
                .login(&login, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            out.auth("Вход выполнен", &auth)?;
        }
        Command::Me => {
            let user = client.me().await.map_err(map_client_error)?;
            out.user("Профиль", &user)?;
        }
        Command::UpdateProfile {
            name,
            last_name,
            bio,
            profile_image_url,
        } => {
            let patch = ProfilePatch {
                name,
                last_name,
                bio,
                profile_image_url,
            };
            let user = client
                .update_profile(&patch)
                .await
                .map_err(map_client_error)?;
            out.user("Профиль обновлён", &user)?;
        }
        Command::Create {
            title,
            body,
            image_url,
        } => {
            let post = client
                .create_post(&title, &body, image_url.as_deref())
                .await
                .map_err(map_client_error)?;
            out.post("Пост создан", &post)?;
        }
        Command::Get { id } => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            out.post("Пост", &post)?;
        }
        Command::Update {
            id,
            title,
            body,
            image_url,
        } => {
            let patch = PostPatch {
                title,
                body,
                image_url,
            };
            let post = client
                .update_post(id, &patch)
                .await
                .map_err(map_client_error)?;
            out.post("Пост обновлён", &post)?;
        }
        Command::Delete { id } => {
            client.delete_post(id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
        Command::List {
            sort_by,
            author_id,
            limit,
            offset,
        } => {
            let query = ListPostsQuery {
                sort_by: sort_by.into(),
                author_id,
                limit,
                offset,
            };
            let posts = client.list_posts(&query).await.map_err(map_client_error)?;
            out.list(&posts)?;
        }
        Command::Like { id } => {
            let post = client.like_post(id).await.map_err(map_client_error)?;
            out.post("Лайк поставлен", &post)?;
        }
        Command::Unlike { id } => {
            let post = client.unlike_post(id).await.map_err(map_client_error)?;
            out.post("Лайк снят", &post)?;
        }
        Command::Comment { post_id, text } => {
            let post = client
                .add_comment(post_id, &text)
                .await
                .map_err(map_client_error)?;
            out.post("Комментарий добавлен", &post)?;
        }
        Command::Comments {
            post_id,
            limit,
            offset,
        } => {
            let page = client
                .list_comments(post_id, limit, offset)
                .await
                .map_err(map_client_error)?;
            out.comments(&page)?;
        }
        Command::EditComment {
            post_id,
            comment_id,
            text,
        } => {
            let comment = client
                .edit_comment(post_id, comment_id, &text)
                .await
                .map_err(map_client_error)?;
            out.comment("Комментарий изменён", &comment)?;
        }
        Command::Stats => {
            let stats = client.dashboard().await.map_err(map_client_error)?;
            if out.json {
                print_json(&stats)?;
            } else {
                println!("Пользователей: {} (активных {})", stats.total_users, stats.active_users);
                println!("Постов: {} (удалённых {})", stats.total_posts, stats.deleted_posts);
                println!("Комментариев: {}", stats.total_comments);
                println!("Лайков: {}", stats.total_likes);
            }
        }
        Command::Logout => {
            remove_token().context("не удалось удалить токен")?;
            println!("Токен удалён");
        }
    }

    Ok(())
}

fn resolve_server(flag: Option<String>, env: Option<String>) -> String {
    let raw = flag
        .or(env)
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    normalize_server(raw)
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn persist_token(client: &SocialClient) -> io::Result<()> {
    if let Some(token) = client.get_token() {
        fs::write(TOKEN_FILE, token)?;
    }
    Ok(())
}

fn remove_token() -> io::Result<()> {
    if Path::new(TOKEN_FILE).exists() {
        fs::remove_file(TOKEN_FILE)?;
    }
    Ok(())
}

fn map_client_error(err: SocialClientError) -> anyhow::Error {
    let message = match err {
        SocialClientError::Unauthorized => {
            "требуется авторизация: выполните `social-cli login ...` или `social-cli register ...`"
                .to_string()
        }
        SocialClientError::Forbidden(message) => format!("операция запрещена: {message}"),
        SocialClientError::NotFound => "ресурс не найден".to_string(),
        SocialClientError::Conflict(message) => format!("конфликт: {message}"),
        SocialClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        SocialClientError::Server(message) => format!("ошибка сервера: {message}"),
        SocialClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("не удалось сериализовать ответ")?;
    println!("{rendered}");
    Ok(())
}

/// Печать ответов: человекочитаемо или JSON при `--json`.
struct Output {
    json: bool,
}

impl Output {
    fn auth(&self, title: &str, auth: &AuthResponse) -> Result<()> {
        if self.json {
            return print_json(auth);
        }
        println!("{title}");
        println!("token: {}", auth.access_token);
        print_user_fields(&auth.user);
        Ok(())
    }

    fn user(&self, title: &str, user: &User) -> Result<()> {
        if self.json {
            return print_json(user);
        }
        println!("{title}");
        print_user_fields(user);
        Ok(())
    }

    fn post(&self, title: &str, post: &Post) -> Result<()> {
        if self.json {
            return print_json(post);
        }
        println!("{title}");
        println!("id: {}", post.id);
        println!("title: {}", post.title);
        println!("body: {}", post.body);
        if let Some(image_url) = &post.image_url {
            println!("image_url: {image_url}");
        }
        println!("author: {}", author_label(post));
        println!("likes: {}", post.like_count);
        println!("comments: {}", post.comments.len());
        println!("created_at: {}", post.created_at);
        println!("updated_at: {}", post.updated_at);
        Ok(())
    }

    fn list(&self, posts: &[Post]) -> Result<()> {
        if self.json {
            return print_json(&posts);
        }
        println!("Постов: {}", posts.len());
        for post in posts {
            println!(
                "- [{}] {} ({}, лайков {}, комментариев {})",
                post.id,
                post.title,
                author_label(post),
                post.like_count,
                post.comments.len()
            );
        }
        Ok(())
    }

    fn comment(&self, title: &str, comment: &Comment) -> Result<()> {
        if self.json {
            return print_json(comment);
        }
        println!("{title}");
        println!("{}", comment_line(comment));
        Ok(())
    }

    fn comments(&self, page: &CommentPage) -> Result<()> {
        if self.json {
            return print_json(page);
        }
        println!(
            "Комментариев: {} (limit={}, offset={}, total={})",
            page.items.len(),
            page.limit,
            page.offset,
            page.total
        );
        for comment in &page.items {
            println!("{}", comment_line(comment));
        }
        Ok(())
    }
}

fn print_user_fields(user: &User) {
    println!("user:");
    println!("  id: {}", user.id);
    println!("  name: {} {}", user.name, user.last_name);
    println!("  username: {}", user.username);
    println!("  email: {}", user.email);
    println!("  role: {}", user.role);
    println!("  created_at: {}", user.created_at);
}

fn author_label(post: &Post) -> String {
    match &post.author {
        Some(author) => format!("@{}", author.username),
        None => format!("author_id={}", post.author_id),
    }
}

fn comment_line(comment: &Comment) -> String {
    let author = match &comment.author {
        Some(author) => format!("@{}", author.username),
        None => format!("author_id={}", comment.author_id),
    };
    let edited = if comment.edited { " (изменён)" } else { "" };
    format!(
        "- [{}] {author}: {}{edited} ({})",
        comment.id, comment.text, comment.created_at
    )
}
