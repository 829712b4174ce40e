//! Activity XP calculation
//!
//! Base rates are fixed constants, distinct from the class multiplier
//! table. XP is computed at grant time; it is never re-derived from the
//! current table.

use common::models::{ActivityKind, ActivityStats, CharacterClass};

use crate::classes;

pub const BASE_XP_PER_COMMIT: i64 = 10;
pub const BASE_XP_PER_PR: i64 = 50;
pub const BASE_XP_PER_ISSUE: i64 = 30;

pub fn base_rate(kind: ActivityKind) -> i64 {
    match kind {
        ActivityKind::Commits => BASE_XP_PER_COMMIT,
        ActivityKind::PullRequests => BASE_XP_PER_PR,
        ActivityKind::IssuesResolved => BASE_XP_PER_ISSUE,
    }
}

/// XP for `count` activities of one kind. Integer division floors;
/// fractional XP never rounds up.
pub fn xp_for(kind: ActivityKind, count: i64, class: CharacterClass) -> i64 {
    let count = count.max(0);
    count * base_rate(kind) * i64::from(classes::multiplier_percent(class, kind)) / 100
}

/// Total XP owed for an activity delta
pub fn xp_for_activity(delta: &ActivityStats, class: CharacterClass) -> i64 {
    xp_for(ActivityKind::Commits, delta.commits, class)
        + xp_for(ActivityKind::PullRequests, delta.prs, class)
        + xp_for(ActivityKind::IssuesResolved, delta.issues, class)
}
