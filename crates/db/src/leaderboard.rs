//! Leaderboard queries

use std::str::FromStr;

use common::models::{CharacterClass, LeaderboardEntry};
use sqlx::{PgPool, Row};

/// Top characters by cumulative XP
pub async fn top_characters(
    pool: &PgPool,
    limit: i32,
) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT u.login, c.class, c.level, c.total_xp
        FROM characters c
        JOIN users u ON u.id = c.user_id
        ORDER BY c.total_xp DESC, u.login
        LIMIT $1
        "#,
    )
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let class: String = row.get("class");
            let class =
                CharacterClass::from_str(&class).map_err(|e| sqlx::Error::Decode(e.into()))?;
            Ok(LeaderboardEntry {
                rank: (idx + 1) as i32,
                login: row.get("login"),
                class,
                level: row.get("level"),
                total_xp: row.get("total_xp"),
            })
        })
        .collect()
}
