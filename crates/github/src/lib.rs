//! GitHub activity source for GitQuest

pub mod client;
mod source;

pub use client::{ClientError, GitHubClient};
