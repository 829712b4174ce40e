//! Baseline reconciliation
//!
//! Decides how much of a user's lifetime GitHub activity counts toward
//! XP and keeps that decision consistent across repeated syncs. A
//! user's first sync establishes a baseline that absorbs everything
//! except a bounded retroactive window anchored at signup; later syncs
//! grant the incremental delta. Accounts whose baseline swallowed the
//! initial window (an early sync bug) are detected and repaired.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use common::models::{ActivityStats, User, UserStatsRecord};
use common::source::ActivitySource;
use common::store::Store;
use common::{Error, Result};

use crate::{guilds, levels, xp};

/// Tunables for the reconciliation procedure
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Minimum interval between two syncs of the same user. A throttle
    /// against double-sync races, not a lock.
    pub cooldown: Duration,
    /// Retroactive window granted at first sync, anchored at signup
    pub retro_window: Duration,
    /// Pause between users in the bulk pass, a courtesy to the
    /// source's rate limits
    pub pacing: std::time::Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::seconds(300),
            retro_window: Duration::days(7),
            pacing: std::time::Duration::from_millis(500),
        }
    }
}

impl ReconcilerConfig {
    pub fn from_config(config: &common::Config) -> Self {
        Self {
            cooldown: Duration::seconds(config.sync_cooldown_secs as i64),
            retro_window: Duration::days(config.retro_window_days),
            pacing: std::time::Duration::from_millis(config.bulk_pacing_ms),
        }
    }
}

/// Result of one user's reconciliation
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub xp_granted: i64,
    pub new_level: i32,
    pub leveled_up: bool,
    /// The activity that earned XP this sync
    pub activity: ActivityStats,
}

/// Per-user entry in the bulk reconciliation report
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub login: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp_granted: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// How a stats record classifies for the next sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    /// `last_sync_at` never set; establish the baseline
    FirstSync,
    /// A past sync absorbed everything into the baseline without
    /// granting the initial window; lower the baseline retroactively
    NeedsRepair,
    /// Steady state; grant the incremental delta
    Incremental,
}

fn classify(stats: &UserStatsRecord) -> SyncState {
    if stats.last_sync_at.is_none() {
        return SyncState::FirstSync;
    }
    if stats.baseline_commits == stats.total_commits
        && stats.baseline_prs == stats.total_prs
        && stats.total_commits > 0
    {
        return SyncState::NeedsRepair;
    }
    SyncState::Incremental
}

/// Reconciles persisted XP state against the activity source
pub struct Reconciler {
    source: Arc<dyn ActivitySource>,
    store: Arc<dyn Store>,
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(
        source: Arc<dyn ActivitySource>,
        store: Arc<dyn Store>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    /// Reconcile a single user by login. All persisted effects of a
    /// successful run land in one write group; any failure before that
    /// leaves no trace.
    pub async fn reconcile_user(&self, login: &str) -> Result<SyncOutcome> {
        let user = self
            .store
            .user_by_login(login)
            .await?
            .ok_or_else(|| Error::UserNotFound(login.to_string()))?;
        let character = self
            .store
            .character_for_user(user.id)
            .await?
            .ok_or(Error::CharacterNotFound(user.id))?;
        let stats = self.store.ensure_stats(user.id).await?;

        let now = Utc::now();
        self.check_cooldown(&stats, now)?;

        // Required fetch. Failures abort the sync with nothing
        // persisted; a timeout is a failure, never "zero activity".
        let totals = self.source.lifetime_stats(&user.login).await?;

        let state = classify(&stats);
        debug!(login = %user.login, ?state, "reconciling");

        let (new_stats, counted) = match state {
            SyncState::FirstSync => self.first_sync(&user, totals, now).await,
            SyncState::NeedsRepair => self.repair(&user, &stats, totals, now).await,
            SyncState::Incremental => incremental(&stats, totals, now),
        };

        let granted = xp::xp_for_activity(&counted, character.class);
        let progress = levels::progress_for_xp(character.total_xp + granted);
        levels::verify(&progress)?;

        self.store
            .commit_reconciliation(user.id, &new_stats, &progress)
            .await?;

        // Mandatory post-step of every XP mutation.
        guilds::recalculate_for_user(self.store.as_ref(), user.id).await?;

        if granted > 0 {
            info!(
                login = %user.login,
                granted,
                level = progress.level,
                "sync granted XP"
            );
        }

        Ok(SyncOutcome {
            xp_granted: granted,
            new_level: progress.level,
            leveled_up: progress.level > character.level,
            activity: counted,
        })
    }

    /// Reconcile every user sequentially, recording per-user outcomes.
    /// Individual failures never abort the batch.
    pub async fn reconcile_all(&self) -> Vec<SyncReport> {
        let users = match self.store.all_users().await {
            Ok(users) => users,
            Err(err) => {
                warn!(%err, "could not list users for bulk reconciliation");
                return Vec::new();
            }
        };

        info!(count = users.len(), "starting bulk reconciliation");
        let mut report = Vec::with_capacity(users.len());

        for (i, user) in users.iter().enumerate() {
            if i > 0 && !self.config.pacing.is_zero() {
                tokio::time::sleep(self.config.pacing).await;
            }
            match self.reconcile_user(&user.login).await {
                Ok(outcome) => report.push(SyncReport {
                    login: user.login.clone(),
                    success: true,
                    xp_granted: Some(outcome.xp_granted),
                    error: None,
                }),
                Err(err) => {
                    warn!(login = %user.login, %err, "bulk reconciliation entry failed");
                    report.push(SyncReport {
                        login: user.login.clone(),
                        success: false,
                        xp_granted: None,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        let succeeded = report.iter().filter(|r| r.success).count();
        info!(
            succeeded,
            failed = report.len() - succeeded,
            "bulk reconciliation finished"
        );
        report
    }

    fn check_cooldown(&self, stats: &UserStatsRecord, now: DateTime<Utc>) -> Result<()> {
        if let Some(last) = stats.last_sync_at {
            let elapsed = now - last;
            if elapsed < self.config.cooldown {
                let remaining_secs = (self.config.cooldown - elapsed).num_seconds().max(1) as u64;
                return Err(Error::CooldownActive { remaining_secs });
            }
        }
        Ok(())
    }

    /// First reconciliation: the baseline absorbs everything except
    /// the retroactive window anchored at signup.
    async fn first_sync(
        &self,
        user: &User,
        totals: ActivityStats,
        now: DateTime<Utc>,
    ) -> (UserStatsRecord, ActivityStats) {
        let from = user.created_at - self.config.retro_window;
        let window = self.windowed_or_zero(&user.login, from, now).await;
        let baseline = totals.saturating_delta(&window);
        let counted = totals.saturating_delta(&baseline);
        (updated_record(user.id, totals, baseline, now), counted)
    }

    /// Drift repair: recompute a trailing window from now and release
    /// that much activity from the baseline. The recomputed baseline
    /// is compared against the stored one; nothing is granted unless
    /// the baseline actually moves down, so re-running against
    /// identical source data is a no-op.
    async fn repair(
        &self,
        user: &User,
        stats: &UserStatsRecord,
        totals: ActivityStats,
        now: DateTime<Utc>,
    ) -> (UserStatsRecord, ActivityStats) {
        let from = now - self.config.retro_window;
        let window = self.windowed_or_zero(&user.login, from, now).await;
        let recomputed = totals.saturating_delta(&window);
        let stored = stats.baseline();

        // A repair only ever lowers the baseline. Activity the totals
        // gained since the last sync is released by the min() as well,
        // so post-sync deltas are not silently re-absorbed.
        let baseline = ActivityStats {
            commits: recomputed.commits.min(stored.commits),
            prs: recomputed.prs.min(stored.prs),
            issues: recomputed.issues.min(stored.issues),
        };
        let counted = totals.saturating_delta(&baseline);

        if baseline != stored {
            info!(
                login = %user.login,
                "repairing mis-baselined account, releasing {:?}",
                counted
            );
        }
        (updated_record(user.id, totals, baseline, now), counted)
    }

    async fn windowed_or_zero(
        &self,
        login: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ActivityStats {
        match self.source.stats_in_range(login, from, to).await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(login, %err, "windowed activity fetch failed, counting zero this sync");
                ActivityStats::default()
            }
        }
    }
}

/// Steady state: grant the simple incremental diff against the stored
/// totals; the baseline carries over untouched.
fn incremental(
    stats: &UserStatsRecord,
    totals: ActivityStats,
    now: DateTime<Utc>,
) -> (UserStatsRecord, ActivityStats) {
    let counted = totals.saturating_delta(&stats.totals());
    (
        updated_record(stats.user_id, totals, stats.baseline(), now),
        counted,
    )
}

fn updated_record(
    user_id: uuid::Uuid,
    totals: ActivityStats,
    baseline: ActivityStats,
    now: DateTime<Utc>,
) -> UserStatsRecord {
    // 0 <= baseline <= totals must hold even if the source corrected a
    // counter downward.
    let totals = ActivityStats::new(totals.commits.max(0), totals.prs.max(0), totals.issues.max(0));
    UserStatsRecord {
        user_id,
        total_commits: totals.commits,
        total_prs: totals.prs,
        total_issues: totals.issues,
        baseline_commits: baseline.commits.clamp(0, totals.commits),
        baseline_prs: baseline.prs.clamp(0, totals.prs),
        baseline_issues: baseline.issues.clamp(0, totals.issues),
        last_sync_at: Some(now),
    }
}
