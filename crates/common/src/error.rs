//! Error types

use thiserror::Error;
use uuid::Uuid;

/// Main error type for GitQuest
#[derive(Error, Debug)]
pub enum Error {
    /// The activity source rejected the credential; the caller should
    /// force re-authentication. No partial state was persisted.
    #[error("GitHub credential expired or rejected")]
    CredentialExpired,

    /// Transient failure on a required fetch; retry later
    #[error("activity source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("rate limited by activity source, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Sync attempted before the minimum interval elapsed
    #[error("sync cooldown active, {remaining_secs} seconds remaining")]
    CooldownActive { remaining_secs: u64 },

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("no character for user {0}")]
    CharacterNotFound(Uuid),

    #[error("achievement not found: {0}")]
    AchievementNotFound(String),

    #[error("guild not found: {0}")]
    GuildNotFound(Uuid),

    /// Derived XP fields disagree; refused to persist
    #[error("XP invariant violation: {0}")]
    InvariantViolation(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
