//! Guild aggregate maintenance
//!
//! Guild rows cache `total_xp` and `total_members`. The cache is never
//! incremented in place: every recalculation re-queries membership and
//! sums current member XP, so a stale aggregate is always correctable
//! by running the recalculation again.

use tracing::debug;
use uuid::Uuid;

use common::store::Store;
use common::Result;

/// Recomputed aggregate for one guild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuildTotals {
    pub total_xp: i64,
    pub total_members: i32,
}

/// Recompute and persist aggregates for every guild the user belongs
/// to. This is the mandatory post-step of any mutation to a
/// character's `total_xp`.
pub async fn recalculate_for_user(store: &dyn Store, user_id: Uuid) -> Result<()> {
    for guild_id in store.guild_ids_for_user(user_id).await? {
        recalculate_guild(store, guild_id).await?;
    }
    Ok(())
}

/// Recompute one guild's totals from current membership. A guild whose
/// last member just left resets to zero.
pub async fn recalculate_guild(store: &dyn Store, guild_id: Uuid) -> Result<GuildTotals> {
    let member_xp = store.guild_member_xp(guild_id).await?;
    let totals = GuildTotals {
        total_xp: member_xp.iter().sum(),
        total_members: member_xp.len() as i32,
    };
    store
        .set_guild_totals(guild_id, totals.total_xp, totals.total_members)
        .await?;
    debug!(
        %guild_id,
        total_xp = totals.total_xp,
        total_members = totals.total_members,
        "guild aggregates recalculated"
    );
    Ok(totals)
}
