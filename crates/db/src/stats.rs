//! Per-user activity totals and baseline queries

use common::models::UserStatsRecord;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

fn row_to_stats(row: &PgRow) -> UserStatsRecord {
    UserStatsRecord {
        user_id: row.get("user_id"),
        total_commits: row.get("total_commits"),
        total_prs: row.get("total_prs"),
        total_issues: row.get("total_issues"),
        baseline_commits: row.get("baseline_commits"),
        baseline_prs: row.get("baseline_prs"),
        baseline_issues: row.get("baseline_issues"),
        last_sync_at: row.get("last_sync_at"),
    }
}

/// Fetch the stats row for a user, creating an empty never-synced one
/// on first access
pub async fn ensure(pool: &PgPool, user_id: Uuid) -> Result<UserStatsRecord, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO user_stats (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING user_id, total_commits, total_prs, total_issues,
                  baseline_commits, baseline_prs, baseline_issues, last_sync_at
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row_to_stats(&row))
}
