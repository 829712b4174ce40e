//! Postgres-backed implementation of the persistence seam

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use common::models::{Achievement, Character, Progress, User, UserStatsRecord};
use common::store::Store;
use common::{Error, Result};

use crate::{achievements, characters, guilds, stats, users};

/// `Store` over a Postgres pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(err: sqlx::Error) -> Error {
    Error::Database(err.to_string())
}

#[async_trait]
impl Store for PgStore {
    async fn user_by_login(&self, login: &str) -> Result<Option<User>> {
        users::get_by_login(&self.pool, login).await.map_err(db_err)
    }

    async fn all_users(&self) -> Result<Vec<User>> {
        users::list_all(&self.pool).await.map_err(db_err)
    }

    async fn character_for_user(&self, user_id: Uuid) -> Result<Option<Character>> {
        characters::get_for_user(&self.pool, user_id)
            .await
            .map_err(db_err)
    }

    async fn ensure_stats(&self, user_id: Uuid) -> Result<UserStatsRecord> {
        stats::ensure(&self.pool, user_id).await.map_err(db_err)
    }

    async fn commit_reconciliation(
        &self,
        user_id: Uuid,
        stats: &UserStatsRecord,
        progress: &Progress,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            r#"
            UPDATE user_stats
            SET total_commits = $2, total_prs = $3, total_issues = $4,
                baseline_commits = $5, baseline_prs = $6, baseline_issues = $7,
                last_sync_at = $8, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(stats.total_commits)
        .bind(stats.total_prs)
        .bind(stats.total_issues)
        .bind(stats.baseline_commits)
        .bind(stats.baseline_prs)
        .bind(stats.baseline_issues)
        .bind(stats.last_sync_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            UPDATE characters
            SET total_xp = $2, level = $3, current_xp = $4, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(progress.total_xp)
        .bind(progress.level)
        .bind(progress.current_xp)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }

    async fn guild_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        guilds::ids_for_user(&self.pool, user_id)
            .await
            .map_err(db_err)
    }

    async fn guild_member_xp(&self, guild_id: Uuid) -> Result<Vec<i64>> {
        guilds::member_xp(&self.pool, guild_id)
            .await
            .map_err(db_err)
    }

    async fn set_guild_totals(
        &self,
        guild_id: Uuid,
        total_xp: i64,
        total_members: i32,
    ) -> Result<()> {
        guilds::set_totals(&self.pool, guild_id, total_xp, total_members)
            .await
            .map_err(db_err)
    }

    async fn achievement_by_code(&self, code: &str) -> Result<Option<Achievement>> {
        achievements::get_by_code(&self.pool, code)
            .await
            .map_err(db_err)
    }

    async fn has_grant(&self, user_id: Uuid, code: &str) -> Result<bool> {
        achievements::has_grant(&self.pool, user_id, code)
            .await
            .map_err(db_err)
    }

    async fn record_grant(&self, user_id: Uuid, code: &str, progress: &Progress) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Conditional insert; losing a concurrent race shows up as
        // zero rows affected and nothing else is written.
        let inserted = sqlx::query(
            r#"
            INSERT INTO achievement_grants (user_id, code, granted_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, code) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(code)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await.map_err(db_err)?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE characters
            SET total_xp = $2, level = $3, current_xp = $4, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(progress.total_xp)
        .bind(progress.level)
        .bind(progress.current_xp)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(true)
    }
}
