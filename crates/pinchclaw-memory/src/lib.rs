//! `pinchclaw-memory` – persistent state that outlives a session.
//!
//! # Modules
//!
//! - [`leaderboard`] – [`Leaderboard`][leaderboard::Leaderboard]: a local
//!   SQLite table of the ten best finished runs.

pub mod leaderboard;

pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardError};
