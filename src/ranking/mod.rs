//! Leaderboard Ranking
//!
//! Turns the full participant set into an ordered leaderboard and answers
//! "top N plus where do I stand" queries.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────┐     ┌────────────────────┐     ┌──────────────┐
//! │ ParticipantRepository │────►│ LeaderboardService │◄────│ RankingEngine│
//! │ (snapshot fetch)      │     │ (orchestrator)     │     │ (pure)       │
//! └───────────────────────┘     └────────────────────┘     └──────────────┘
//! ```
//!
//! ## Ordering
//!
//! - Score descending; ranks are 1-based and unique
//! - Equal scores follow the configured [`TiePolicy`]
//! - The snapshot is not point-in-time consistent (see the repository docs)

mod engine;
mod entry;
mod service;

pub use engine::RankingEngine;
pub use entry::{RankedEntry, TiePolicy};
pub use service::LeaderboardService;
