//! Points Leaderboard
//!
//! Points tracking and ranking service over a key-value store. Participants
//! register, accrue points, and query a leaderboard that shows the top N
//! plus their own standing.
//!
//! ## Module Structure
//!
//! ```text
//! src/
//! ├── lib.rs         - Crate root with re-exports
//! ├── main.rs        - Server entrypoint
//! ├── config.rs      - Configuration management
//! ├── error.rs       - Error types
//! ├── database/      - Persistence
//! │   ├── store.rs        - Key-value adapter trait & timeout wrapper
//! │   ├── memory.rs       - In-memory adapter
//! │   ├── pool.rs         - PostgreSQL adapter
//! │   └── participants.rs - Participant repository
//! ├── ranking/       - Leaderboard ranking
//! │   ├── entry.rs   - Ranked entries & tie policy
//! │   ├── engine.rs  - Ordering, top-N, rank lookup
//! │   └── service.rs - Leaderboard orchestrator
//! ├── accounts/      - Login/registration & points
//! └── api/           - HTTP API endpoints
//! ```

pub mod accounts;
pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod ranking;

// Re-export main types for convenience
pub use accounts::{AccountService, LoginOutcome};
pub use api::{AppState, create_app};
pub use config::{LeaderboardConfig, StoreBackend};
pub use database::{
    KeyValueStore, MemoryStore, Participant, ParticipantRepository, PgKvStore, TimedStore,
};
pub use error::{AccountError, LeaderboardError, StoreError};
pub use ranking::{LeaderboardService, RankedEntry, RankingEngine, TiePolicy};
