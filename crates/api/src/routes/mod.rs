pub mod achievements;
pub mod guilds;
pub mod health;
pub mod leaderboard;
pub mod recalc;
pub mod sync;
