//! In-memory collaborators for engine tests
//!
//! A map-backed `Store` and a scripted `ActivitySource`, so the
//! reconciliation paths run without a database or network.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use common::models::{
    Achievement, ActivityStats, Character, CharacterClass, Guild, Progress, User, UserStatsRecord,
};
use common::source::{ActivitySource, SourceError};
use common::store::Store;
use common::{Error, Result};

use crate::levels;

#[derive(Default)]
struct MemoryInner {
    users: Vec<User>,
    characters: HashMap<Uuid, Character>,
    stats: HashMap<Uuid, UserStatsRecord>,
    guilds: HashMap<Uuid, Guild>,
    members: HashMap<Uuid, Vec<Uuid>>,
    achievements: HashMap<String, Achievement>,
    grants: Vec<(Uuid, String)>,
}

/// Map-backed store
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, login: &str, class: CharacterClass, created_at: DateTime<Utc>) -> Uuid {
        let user_id = Uuid::new_v4();
        let mut inner = self.inner.lock().unwrap();
        let github_id = inner.users.len() as i64 + 1;
        inner.users.push(User {
            id: user_id,
            github_id,
            login: login.to_string(),
            avatar_url: None,
            created_at,
        });
        inner.characters.insert(
            user_id,
            Character {
                id: Uuid::new_v4(),
                user_id,
                class,
                level: 1,
                total_xp: 0,
                current_xp: 0,
                created_at,
                updated_at: created_at,
            },
        );
        user_id
    }

    pub fn set_stats(&self, record: UserStatsRecord) {
        let mut inner = self.inner.lock().unwrap();
        inner.stats.insert(record.user_id, record);
    }

    pub fn stats(&self, user_id: Uuid) -> UserStatsRecord {
        self.inner.lock().unwrap().stats[&user_id].clone()
    }

    pub fn character(&self, user_id: Uuid) -> Character {
        self.inner.lock().unwrap().characters[&user_id].clone()
    }

    /// Poke a character straight to a total, keeping derived fields
    /// consistent
    pub fn set_character_xp(&self, user_id: Uuid, total_xp: i64) {
        let progress = levels::progress_for_xp(total_xp);
        let mut inner = self.inner.lock().unwrap();
        let character = inner.characters.get_mut(&user_id).unwrap();
        character.total_xp = progress.total_xp;
        character.level = progress.level;
        character.current_xp = progress.current_xp;
    }

    pub fn add_guild(&self, name: &str, owner_id: Uuid, member_ids: &[Uuid]) -> Uuid {
        let guild_id = Uuid::new_v4();
        let mut inner = self.inner.lock().unwrap();
        inner.guilds.insert(
            guild_id,
            Guild {
                id: guild_id,
                name: name.to_string(),
                owner_id,
                total_members: 0,
                total_xp: 0,
                created_at: Utc::now(),
            },
        );
        inner.members.insert(guild_id, member_ids.to_vec());
        guild_id
    }

    /// Overwrite a guild's cached aggregates, e.g. to simulate
    /// staleness
    pub fn set_guild_totals_raw(&self, guild_id: Uuid, total_xp: i64, total_members: i32) {
        let mut inner = self.inner.lock().unwrap();
        let guild = inner.guilds.get_mut(&guild_id).unwrap();
        guild.total_xp = total_xp;
        guild.total_members = total_members;
    }

    pub fn guild(&self, guild_id: Uuid) -> Guild {
        self.inner.lock().unwrap().guilds[&guild_id].clone()
    }

    pub fn add_achievement(&self, code: &str, name: &str, xp_reward: i64) {
        let mut inner = self.inner.lock().unwrap();
        inner.achievements.insert(
            code.to_string(),
            Achievement {
                code: code.to_string(),
                name: name.to_string(),
                description: String::new(),
                xp_reward,
            },
        );
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn user_by_login(&self, login: &str) -> Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.login == login).cloned())
    }

    async fn all_users(&self) -> Result<Vec<User>> {
        Ok(self.inner.lock().unwrap().users.clone())
    }

    async fn character_for_user(&self, user_id: Uuid) -> Result<Option<Character>> {
        Ok(self.inner.lock().unwrap().characters.get(&user_id).cloned())
    }

    async fn ensure_stats(&self, user_id: Uuid) -> Result<UserStatsRecord> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner
            .stats
            .entry(user_id)
            .or_insert_with(|| UserStatsRecord::empty(user_id))
            .clone())
    }

    async fn commit_reconciliation(
        &self,
        user_id: Uuid,
        stats: &UserStatsRecord,
        progress: &Progress,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let character = inner
            .characters
            .get_mut(&user_id)
            .ok_or(Error::CharacterNotFound(user_id))?;
        character.total_xp = progress.total_xp;
        character.level = progress.level;
        character.current_xp = progress.current_xp;
        character.updated_at = Utc::now();
        inner.stats.insert(user_id, stats.clone());
        Ok(())
    }

    async fn guild_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .members
            .iter()
            .filter(|(_, members)| members.contains(&user_id))
            .map(|(guild_id, _)| *guild_id)
            .collect())
    }

    async fn guild_member_xp(&self, guild_id: Uuid) -> Result<Vec<i64>> {
        let inner = self.inner.lock().unwrap();
        let members = inner.members.get(&guild_id).cloned().unwrap_or_default();
        Ok(members
            .iter()
            .filter_map(|user_id| inner.characters.get(user_id))
            .map(|c| c.total_xp)
            .collect())
    }

    async fn set_guild_totals(
        &self,
        guild_id: Uuid,
        total_xp: i64,
        total_members: i32,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let guild = inner
            .guilds
            .get_mut(&guild_id)
            .ok_or(Error::GuildNotFound(guild_id))?;
        guild.total_xp = total_xp;
        guild.total_members = total_members;
        Ok(())
    }

    async fn achievement_by_code(&self, code: &str) -> Result<Option<Achievement>> {
        Ok(self.inner.lock().unwrap().achievements.get(code).cloned())
    }

    async fn has_grant(&self, user_id: Uuid, code: &str) -> Result<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .grants
            .iter()
            .any(|(u, c)| *u == user_id && c == code))
    }

    async fn record_grant(&self, user_id: Uuid, code: &str, progress: &Progress) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        if inner.grants.iter().any(|(u, c)| *u == user_id && c == code) {
            return Ok(false);
        }
        inner.grants.push((user_id, code.to_string()));
        let character = inner
            .characters
            .get_mut(&user_id)
            .ok_or(Error::CharacterNotFound(user_id))?;
        character.total_xp = progress.total_xp;
        character.level = progress.level;
        character.current_xp = progress.current_xp;
        character.updated_at = Utc::now();
        Ok(true)
    }
}

/// Failure modes a scripted source can be told to produce
#[derive(Debug, Clone, Copy)]
pub enum FakeFailure {
    AuthExpired,
    RateLimited,
    NotFound,
    Unavailable,
}

impl FakeFailure {
    fn to_error(self, login: &str) -> SourceError {
        match self {
            FakeFailure::AuthExpired => SourceError::AuthExpired,
            FakeFailure::RateLimited => SourceError::RateLimited {
                retry_after_secs: 60,
            },
            FakeFailure::NotFound => SourceError::NotFound(login.to_string()),
            FakeFailure::Unavailable => SourceError::Unavailable("scripted outage".to_string()),
        }
    }
}

#[derive(Default)]
struct FakeSourceInner {
    lifetime: HashMap<String, ActivityStats>,
    windowed: HashMap<String, ActivityStats>,
    lifetime_failure: Option<FakeFailure>,
    windowed_failure: Option<FakeFailure>,
    lifetime_calls: u32,
    windowed_calls: u32,
}

/// Scripted activity source
#[derive(Default)]
pub struct FakeSource {
    inner: Mutex<FakeSourceInner>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_lifetime(&self, login: &str, stats: ActivityStats) {
        let mut inner = self.inner.lock().unwrap();
        inner.lifetime.insert(login.to_string(), stats);
    }

    pub fn set_windowed(&self, login: &str, stats: ActivityStats) {
        let mut inner = self.inner.lock().unwrap();
        inner.windowed.insert(login.to_string(), stats);
    }

    pub fn fail_lifetime(&self, failure: Option<FakeFailure>) {
        self.inner.lock().unwrap().lifetime_failure = failure;
    }

    pub fn fail_windowed(&self, failure: Option<FakeFailure>) {
        self.inner.lock().unwrap().windowed_failure = failure;
    }

    pub fn lifetime_calls(&self) -> u32 {
        self.inner.lock().unwrap().lifetime_calls
    }

    pub fn windowed_calls(&self) -> u32 {
        self.inner.lock().unwrap().windowed_calls
    }
}

#[async_trait]
impl ActivitySource for FakeSource {
    async fn lifetime_stats(&self, login: &str) -> std::result::Result<ActivityStats, SourceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.lifetime_calls += 1;
        if let Some(failure) = inner.lifetime_failure {
            return Err(failure.to_error(login));
        }
        inner
            .lifetime
            .get(login)
            .copied()
            .ok_or_else(|| SourceError::NotFound(login.to_string()))
    }

    async fn stats_in_range(
        &self,
        login: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> std::result::Result<ActivityStats, SourceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.windowed_calls += 1;
        if let Some(failure) = inner.windowed_failure {
            return Err(failure.to_error(login));
        }
        Ok(inner.windowed.get(login).copied().unwrap_or_default())
    }
}
