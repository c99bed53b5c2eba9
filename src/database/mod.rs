//! Persistence Module
//!
//! Key-value store adapters and the participant repository built on them.

pub mod memory;
pub mod participants;
pub mod pool;
pub mod store;

pub use memory::MemoryStore;
pub use participants::{Participant, ParticipantRepository};
pub use pool::PgKvStore;
pub use store::{KeyValueStore, TimedStore};
