//! XP computation and reconciliation engine
//!
//! Converts raw GitHub activity counts into XP, applies class
//! multipliers, establishes a non-gameable baseline for new accounts,
//! derives level from cumulative XP, and keeps guild aggregates equal
//! to the sum of member XP.

pub mod classes;
pub mod grants;
pub mod guilds;
pub mod levels;
pub mod reconcile;
pub mod xp;

pub use grants::{grant_achievement, GrantOutcome};
pub use reconcile::{Reconciler, ReconcilerConfig, SyncOutcome, SyncReport};

#[cfg(test)]
mod testing;
