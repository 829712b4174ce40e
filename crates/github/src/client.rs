//! GitHub REST API client for counting user activity
//!
//! Activity counts come from the search API (`total_count` only, one
//! result per page), which answers both lifetime and date-bounded
//! questions with the same qualifier syntax.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const API_BASE: &str = "https://api.github.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("credential rejected")]
    Unauthorized,
    #[error("rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Search response; only the count matters here
#[derive(Debug, Deserialize)]
struct SearchCount {
    total_count: i64,
}

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, token })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("gitquest/0.1"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(ref token) = self.token {
            if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, val);
            }
        }
        headers
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ClientError> {
        debug!("GET {}", url);
        let resp = self.client.get(url).headers(self.headers()).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(url.to_string()));
        }
        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ClientError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    async fn search_count(&self, endpoint: &str, query: &str) -> Result<i64, ClientError> {
        let url = format!("{}/search/{}?q={}&per_page=1", API_BASE, endpoint, query);
        let result: SearchCount = self.get(&url).await?;
        Ok(result.total_count.max(0))
    }

    /// Commits authored by the user, optionally bounded by author date
    pub async fn count_commits(
        &self,
        login: &str,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<i64, ClientError> {
        self.search_count("commits", &commit_query(login, range))
            .await
    }

    /// Pull requests opened by the user, optionally bounded by
    /// creation date
    pub async fn count_prs(
        &self,
        login: &str,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<i64, ClientError> {
        self.search_count("issues", &pr_query(login, range)).await
    }

    /// Issues the user opened that are now closed, optionally bounded
    /// by close date
    pub async fn count_issues_resolved(
        &self,
        login: &str,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<i64, ClientError> {
        self.search_count("issues", &issue_query(login, range)).await
    }
}

fn date_qualifier(name: &str, range: Option<(DateTime<Utc>, DateTime<Utc>)>) -> String {
    match range {
        Some((from, to)) => format!(
            "+{}:{}..{}",
            name,
            from.format("%Y-%m-%dT%H:%M:%SZ"),
            to.format("%Y-%m-%dT%H:%M:%SZ")
        ),
        None => String::new(),
    }
}

fn commit_query(login: &str, range: Option<(DateTime<Utc>, DateTime<Utc>)>) -> String {
    format!("author:{}{}", login, date_qualifier("author-date", range))
}

fn pr_query(login: &str, range: Option<(DateTime<Utc>, DateTime<Utc>)>) -> String {
    format!("author:{}+type:pr{}", login, date_qualifier("created", range))
}

fn issue_query(login: &str, range: Option<(DateTime<Utc>, DateTime<Utc>)>) -> String {
    format!(
        "author:{}+type:issue+is:closed{}",
        login,
        date_qualifier("closed", range)
    )
}
