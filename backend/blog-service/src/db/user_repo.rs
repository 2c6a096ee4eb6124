use crate::models::User;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, age, \
     profile_image, role, bookmarked_blogs, password_changed_at, token_version, created_at, updated_at";

/// Fields for a new account; `password_hash` is already hashed
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub age: Option<i32>,
    pub profile_image: Option<&'a str>,
}

pub async fn create_user(pool: &PgPool, user: NewUser<'_>) -> Result<User, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO users (username, email, password_hash, first_name, last_name, age, profile_image)
        VALUES ($1, LOWER($2), $3, $4, $5, $6, $7)
        RETURNING {USER_COLUMNS}
        "#
    );

    sqlx::query_as::<_, User>(&sql)
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.age)
        .bind(user.profile_image)
        .fetch_one(pool)
        .await
}

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<User>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Look up by email or username, case-insensitively
pub async fn find_by_login(pool: &PgPool, login: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1) OR LOWER(username) = LOWER($1) LIMIT 1"
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(login)
        .fetch_optional(pool)
        .await
}

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
        .bind(email)
        .fetch_one(pool)
        .await
}

pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(username) = LOWER($1))",
    )
    .bind(username)
    .fetch_one(pool)
    .await
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Store a new hash and bump the token version; returns the new version
pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r#"
        UPDATE users
        SET password_hash = $2,
            password_changed_at = NOW(),
            token_version = token_version + 1,
            updated_at = NOW()
        WHERE id = $1
        RETURNING token_version
        "#,
    )
    .bind(id)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}
