//! The activity source seam
//!
//! The reconciliation engine never talks to GitHub directly; it takes
//! an `ActivitySource` handle. The production implementation lives in
//! the `github` crate, tests use a scripted fake.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::ActivityStats;

/// Failures of the external activity source
#[derive(Error, Debug)]
pub enum SourceError {
    /// The credential was rejected; distinct so the caller can force
    /// re-authentication
    #[error("credential rejected by the activity source")]
    AuthExpired,

    #[error("rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("identity not found: {0}")]
    NotFound(String),

    #[error("activity source unavailable: {0}")]
    Unavailable(String),
}

impl From<SourceError> for crate::Error {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::AuthExpired => crate::Error::CredentialExpired,
            SourceError::RateLimited { retry_after_secs } => {
                crate::Error::RateLimited { retry_after_secs }
            }
            SourceError::NotFound(login) => crate::Error::UserNotFound(login),
            SourceError::Unavailable(msg) => crate::Error::SourceUnavailable(msg),
        }
    }
}

/// Read-only view of a user's GitHub activity counts
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Lifetime activity totals for an identity
    async fn lifetime_stats(&self, login: &str) -> Result<ActivityStats, SourceError>;

    /// Activity restricted to a time range. Callers degrade a failure
    /// here to zero activity rather than aborting, so implementations
    /// should not retry aggressively.
    async fn stats_in_range(
        &self,
        login: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ActivityStats, SourceError>;
}
