//! User queries

use common::models::User;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

fn row_to_user(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        github_id: row.get("github_id"),
        login: row.get("login"),
        avatar_url: row.get("avatar_url"),
        created_at: row.get("created_at"),
    }
}

/// Get user by GitHub login
pub async fn get_by_login(pool: &PgPool, login: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, github_id, login, avatar_url, created_at
        FROM users
        WHERE login = $1
        "#,
    )
    .bind(login)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(row_to_user))
}

/// List every registered user, oldest first
pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, github_id, login, avatar_url, created_at
        FROM users
        ORDER BY created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_user).collect())
}
