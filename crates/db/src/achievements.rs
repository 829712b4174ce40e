//! Achievement queries

use common::models::{Achievement, AchievementGrant};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Look up an achievement definition by code
pub async fn get_by_code(pool: &PgPool, code: &str) -> Result<Option<Achievement>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT code, name, description, xp_reward
        FROM achievements
        WHERE code = $1
        "#,
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| Achievement {
        code: r.get("code"),
        name: r.get("name"),
        description: r.get("description"),
        xp_reward: r.get("xp_reward"),
    }))
}

/// Achievements a user has earned, newest first
pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<AchievementGrant>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, code, granted_at
        FROM achievement_grants
        WHERE user_id = $1
        ORDER BY granted_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| AchievementGrant {
            user_id: r.get("user_id"),
            code: r.get("code"),
            granted_at: r.get("granted_at"),
        })
        .collect())
}

/// Check whether a (user, code) grant already exists
pub async fn has_grant(pool: &PgPool, user_id: Uuid, code: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM achievement_grants
            WHERE user_id = $1 AND code = $2
        ) AS granted
        "#,
    )
    .bind(user_id)
    .bind(code)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<bool, _>("granted"))
}
