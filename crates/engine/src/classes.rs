//! Class multiplier table
//!
//! Multipliers are expressed in integer percent so all XP math stays
//! exact. The table is static; changing it does not rewrite XP that
//! was already granted at the old rates.

use common::models::{ActivityKind, CharacterClass};

/// No class may exceed double the base rate on any axis
pub const MULTIPLIER_CAP_PERCENT: u32 = 200;

/// Per-class, per-activity multiplier in percent. Total function:
/// unlisted combinations earn the neutral 100.
pub fn multiplier_percent(class: CharacterClass, kind: ActivityKind) -> u32 {
    use ActivityKind::*;
    use CharacterClass::*;

    match (class, kind) {
        (Orc, Commits) => 130,
        (Orc, PullRequests) => 90,
        (Warrior, PullRequests) => 125,
        (Mage, Commits) => 80,
        (Mage, PullRequests) => 110,
        (Mage, IssuesResolved) => 140,
        _ => 100,
    }
}
