//! Domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub github_id: i64,
    pub login: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Playable character classes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    Orc,
    Warrior,
    Mage,
}

impl CharacterClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Orc => "orc",
            CharacterClass::Warrior => "warrior",
            CharacterClass::Mage => "mage",
        }
    }
}

impl std::str::FromStr for CharacterClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orc" => Ok(CharacterClass::Orc),
            "warrior" => Ok(CharacterClass::Warrior),
            "mage" => Ok(CharacterClass::Mage),
            other => Err(format!("unknown character class: {}", other)),
        }
    }
}

/// A user's game character (1:1 with user)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: Uuid,
    pub user_id: Uuid,
    pub class: CharacterClass,
    pub level: i32,
    pub total_xp: i64,
    pub current_xp: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The derived XP/level trio. `level` and `current_xp` are a pure
/// function of `total_xp`; nothing persists one of these fields on its
/// own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progress {
    pub total_xp: i64,
    pub level: i32,
    pub current_xp: i64,
}

/// Kinds of GitHub activity that earn XP
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Commits,
    PullRequests,
    IssuesResolved,
}

/// Per-kind activity counters, either lifetime totals from the source
/// or a delta between two observations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ActivityStats {
    pub commits: i64,
    pub prs: i64,
    pub issues: i64,
}

impl ActivityStats {
    pub fn new(commits: i64, prs: i64, issues: i64) -> Self {
        Self {
            commits,
            prs,
            issues,
        }
    }

    /// Per-kind `self - older`, clamped at zero. External data
    /// corrections can make a counter regress; a regression never
    /// produces a negative delta.
    pub fn saturating_delta(&self, older: &ActivityStats) -> ActivityStats {
        ActivityStats {
            commits: (self.commits - older.commits).max(0),
            prs: (self.prs - older.prs).max(0),
            issues: (self.issues - older.issues).max(0),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.commits == 0 && self.prs == 0 && self.issues == 0
    }
}

/// The store's record of a user's last-known activity totals plus the
/// baseline excluded from XP. `last_sync_at = None` means the user has
/// never been reconciled, which is distinct from "reconciled with zero
/// activity".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsRecord {
    pub user_id: Uuid,
    pub total_commits: i64,
    pub total_prs: i64,
    pub total_issues: i64,
    pub baseline_commits: i64,
    pub baseline_prs: i64,
    pub baseline_issues: i64,
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl UserStatsRecord {
    /// A fresh, never-synced record
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            total_commits: 0,
            total_prs: 0,
            total_issues: 0,
            baseline_commits: 0,
            baseline_prs: 0,
            baseline_issues: 0,
            last_sync_at: None,
        }
    }

    pub fn totals(&self) -> ActivityStats {
        ActivityStats::new(self.total_commits, self.total_prs, self.total_issues)
    }

    pub fn baseline(&self) -> ActivityStats {
        ActivityStats::new(
            self.baseline_commits,
            self.baseline_prs,
            self.baseline_issues,
        )
    }
}

/// A guild of characters. `total_xp` and `total_members` are cached
/// aggregates, recomputed from membership on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guild {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub total_members: i32,
    pub total_xp: i64,
    pub created_at: DateTime<Utc>,
}

/// An achievement definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub code: String,
    pub name: String,
    pub description: String,
    pub xp_reward: i64,
}

/// A user's earned achievement, at most one per (user, code)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementGrant {
    pub user_id: Uuid,
    pub code: String,
    pub granted_at: DateTime<Utc>,
}

/// Character leaderboard entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: i32,
    pub login: String,
    pub class: CharacterClass,
    pub level: i32,
    pub total_xp: i64,
}
