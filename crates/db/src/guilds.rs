//! Guild and membership queries

use common::models::Guild;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

fn row_to_guild(row: &PgRow) -> Guild {
    Guild {
        id: row.get("id"),
        name: row.get("name"),
        owner_id: row.get("owner_id"),
        total_members: row.get("total_members"),
        total_xp: row.get("total_xp"),
        created_at: row.get("created_at"),
    }
}

/// Get a guild by ID
pub async fn get(pool: &PgPool, guild_id: Uuid) -> Result<Option<Guild>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, name, owner_id, total_members, total_xp, created_at
        FROM guilds
        WHERE id = $1
        "#,
    )
    .bind(guild_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(row_to_guild))
}

/// List guilds ordered by cached total XP
pub async fn list_by_xp(pool: &PgPool, limit: i32) -> Result<Vec<Guild>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, owner_id, total_members, total_xp, created_at
        FROM guilds
        ORDER BY total_xp DESC, name
        LIMIT $1
        "#,
    )
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_guild).collect())
}

/// Ids of every guild the user currently belongs to
pub async fn ids_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT guild_id
        FROM guild_members
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|r| r.get("guild_id")).collect())
}

/// Current members' character XP, re-queried from membership
pub async fn member_xp(pool: &PgPool, guild_id: Uuid) -> Result<Vec<i64>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT c.total_xp
        FROM guild_members gm
        JOIN characters c ON c.user_id = gm.user_id
        WHERE gm.guild_id = $1
        "#,
    )
    .bind(guild_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|r| r.get("total_xp")).collect())
}

/// Persist recomputed aggregates
pub async fn set_totals(
    pool: &PgPool,
    guild_id: Uuid,
    total_xp: i64,
    total_members: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE guilds
        SET total_xp = $2, total_members = $3
        WHERE id = $1
        "#,
    )
    .bind(guild_id)
    .bind(total_xp)
    .bind(total_members)
    .execute(pool)
    .await?;

    Ok(())
}
