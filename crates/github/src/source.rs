//! `ActivitySource` implementation over the GitHub client

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use common::models::ActivityStats;
use common::source::{ActivitySource, SourceError};

use crate::client::{ClientError, GitHubClient};

impl ClientError {
    fn into_source_error(self, login: &str) -> SourceError {
        match self {
            ClientError::Unauthorized => SourceError::AuthExpired,
            ClientError::RateLimited { retry_after } => SourceError::RateLimited {
                retry_after_secs: retry_after,
            },
            ClientError::NotFound(_) => SourceError::NotFound(login.to_string()),
            ClientError::Http(err) => SourceError::Unavailable(err.to_string()),
            ClientError::Api { status, message } => {
                SourceError::Unavailable(format!("status {}: {}", status, message))
            }
        }
    }
}

impl GitHubClient {
    async fn stats(
        &self,
        login: &str,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<ActivityStats, SourceError> {
        let commits = self
            .count_commits(login, range)
            .await
            .map_err(|e| e.into_source_error(login))?;
        let prs = self
            .count_prs(login, range)
            .await
            .map_err(|e| e.into_source_error(login))?;
        let issues = self
            .count_issues_resolved(login, range)
            .await
            .map_err(|e| e.into_source_error(login))?;
        Ok(ActivityStats::new(commits, prs, issues))
    }
}

#[async_trait]
impl ActivitySource for GitHubClient {
    async fn lifetime_stats(&self, login: &str) -> Result<ActivityStats, SourceError> {
        self.stats(login, None).await
    }

    async fn stats_in_range(
        &self,
        login: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ActivityStats, SourceError> {
        self.stats(login, Some((from, to))).await
    }
}
