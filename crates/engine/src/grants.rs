//! Achievement XP grants
//!
//! One-shot XP rewards tied to a named achievement code. "Already
//! granted" is an expected outcome, not an error.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use common::store::Store;
use common::{Error, Result};

use crate::{guilds, levels};

/// Result of a grant attempt
#[derive(Debug, Clone, Serialize)]
pub struct GrantOutcome {
    pub granted: bool,
    pub new_total_xp: i64,
    pub new_level: i32,
}

/// Grant a named achievement's XP reward to a user, at most once per
/// (user, code) pair.
pub async fn grant_achievement(
    store: &dyn Store,
    user_id: Uuid,
    code: &str,
) -> Result<GrantOutcome> {
    let achievement = store
        .achievement_by_code(code)
        .await?
        .ok_or_else(|| Error::AchievementNotFound(code.to_string()))?;
    let character = store
        .character_for_user(user_id)
        .await?
        .ok_or(Error::CharacterNotFound(user_id))?;

    if store.has_grant(user_id, code).await? {
        return Ok(GrantOutcome {
            granted: false,
            new_total_xp: character.total_xp,
            new_level: character.level,
        });
    }

    let progress = levels::progress_for_xp(character.total_xp + achievement.xp_reward);
    levels::verify(&progress)?;

    // The insert is conditional inside the store's write group; losing
    // a concurrent race turns this into the already-granted outcome.
    if !store.record_grant(user_id, code, &progress).await? {
        return Ok(GrantOutcome {
            granted: false,
            new_total_xp: character.total_xp,
            new_level: character.level,
        });
    }

    guilds::recalculate_for_user(store, user_id).await?;

    info!(%user_id, code, reward = achievement.xp_reward, "achievement granted");
    Ok(GrantOutcome {
        granted: true,
        new_total_xp: progress.total_xp,
        new_level: progress.level,
    })
}
