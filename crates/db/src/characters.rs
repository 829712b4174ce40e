//! Character queries

use std::str::FromStr;

use common::models::{Character, CharacterClass};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

fn row_to_character(row: &PgRow) -> Result<Character, sqlx::Error> {
    let class: String = row.get("class");
    let class = CharacterClass::from_str(&class).map_err(|e| sqlx::Error::Decode(e.into()))?;

    Ok(Character {
        id: row.get("id"),
        user_id: row.get("user_id"),
        class,
        level: row.get("level"),
        total_xp: row.get("total_xp"),
        current_xp: row.get("current_xp"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Get a user's character (1:1)
pub async fn get_for_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Character>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, class, level, total_xp, current_xp, created_at, updated_at
        FROM characters
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_character).transpose()
}
