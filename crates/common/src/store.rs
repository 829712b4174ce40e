//! The persistence seam
//!
//! Engine operations take an already-resolved `Store` handle; there are
//! no ambient clients. The Postgres implementation lives in the `db`
//! crate, tests use an in-memory map.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Achievement, Character, Progress, User, UserStatsRecord};
use crate::Result;

#[async_trait]
pub trait Store: Send + Sync {
    async fn user_by_login(&self, login: &str) -> Result<Option<User>>;

    /// Every registered user, for the bulk reconciliation pass
    async fn all_users(&self) -> Result<Vec<User>>;

    async fn character_for_user(&self, user_id: Uuid) -> Result<Option<Character>>;

    /// Fetch the user's stats record, creating an empty never-synced
    /// one if this is the first access
    async fn ensure_stats(&self, user_id: Uuid) -> Result<UserStatsRecord>;

    /// Persist the outcome of one reconciliation as a single write
    /// group: the new stats record (totals, baseline, last_sync_at)
    /// and the character's derived progress. Implementations must make
    /// this all-or-nothing; a failure leaves both rows untouched.
    async fn commit_reconciliation(
        &self,
        user_id: Uuid,
        stats: &UserStatsRecord,
        progress: &Progress,
    ) -> Result<()>;

    /// Ids of every guild the user currently belongs to
    async fn guild_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    /// Current members' character XP, re-queried from membership
    async fn guild_member_xp(&self, guild_id: Uuid) -> Result<Vec<i64>>;

    async fn set_guild_totals(
        &self,
        guild_id: Uuid,
        total_xp: i64,
        total_members: i32,
    ) -> Result<()>;

    async fn achievement_by_code(&self, code: &str) -> Result<Option<Achievement>>;

    async fn has_grant(&self, user_id: Uuid, code: &str) -> Result<bool>;

    /// Record an achievement grant and apply the character's new
    /// progress in one write group. Returns `false` without touching
    /// the character if the (user, code) pair already exists; the
    /// insert is conditional, which bounds the double-grant race.
    async fn record_grant(&self, user_id: Uuid, code: &str, progress: &Progress) -> Result<bool>;
}
