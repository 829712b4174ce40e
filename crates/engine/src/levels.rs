//! Level curve
//!
//! Level is a pure function of cumulative XP. The curve is quadratic:
//! reaching level `l` requires `100 * (l - 1)^2` XP, so
//! `level_for_xp(xp) = isqrt(xp / 100) + 1`. Integer arithmetic
//! throughout; there is no float drift at threshold boundaries.

use common::models::Progress;
use common::{Error, Result};

/// XP required to reach `level`. Strictly increasing, zero at level 1.
pub fn xp_threshold_for_level(level: i32) -> i64 {
    let l = i64::from(level.max(1)) - 1;
    100 * l * l
}

/// Level for a cumulative XP total, always >= 1
pub fn level_for_xp(total_xp: i64) -> i32 {
    let xp = total_xp.max(0) as u64;
    isqrt(xp / 100) as i32 + 1
}

/// XP progressed within the current level
pub fn current_xp_within_level(total_xp: i64, level: i32) -> i64 {
    total_xp.max(0) - xp_threshold_for_level(level)
}

/// The derived trio for a total. This is the only way `level` and
/// `current_xp` values come into existence.
pub fn progress_for_xp(total_xp: i64) -> Progress {
    let total_xp = total_xp.max(0);
    let level = level_for_xp(total_xp);
    Progress {
        total_xp,
        level,
        current_xp: current_xp_within_level(total_xp, level),
    }
}

/// Refuse to persist a trio that is not the image of its own total
pub fn verify(progress: &Progress) -> Result<()> {
    let expected = progress_for_xp(progress.total_xp);
    if *progress != expected {
        return Err(Error::InvariantViolation(format!(
            "level {} / current {} for total {} (expected level {} / current {})",
            progress.level,
            progress.current_xp,
            progress.total_xp,
            expected.level,
            expected.current_xp
        )));
    }
    Ok(())
}

fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let wide = n as u128;
    let mut x = (n as f64).sqrt() as u64;
    // The float seed can be off by one in either direction near
    // perfect squares; settle it exactly.
    while ((x + 1) as u128) * ((x + 1) as u128) <= wide {
        x += 1;
    }
    while (x as u128) * (x as u128) > wide {
        x -= 1;
    }
    x
}
