//! Leaderboard Service - Main Orchestrator
//!
//! Fetches a participant snapshot through the repository and runs it through
//! the ranking engine. Every query recomputes the ranking from scratch.

use tracing::{debug, info};

use crate::database::participants::ParticipantRepository;
use crate::error::Result;
use crate::ranking::engine::RankingEngine;
use crate::ranking::entry::RankedEntry;

#[derive(Clone)]
pub struct LeaderboardService {
    repository: ParticipantRepository,
    engine: RankingEngine,
}

impl LeaderboardService {
    pub fn new(repository: ParticipantRepository, engine: RankingEngine) -> Self {
        Self { repository, engine }
    }

    /// Full ranking over the current snapshot.
    pub async fn ranking(&self) -> Result<Vec<RankedEntry>> {
        let snapshot = self.repository.fetch_all().await?;
        Ok(self.engine.rank(&snapshot))
    }

    /// Top `top_n` entries plus the requester's own standing.
    ///
    /// When the requester is outside the window their entry is appended, so
    /// the result can hold `top_n + 1` rows. An unknown requester is not an
    /// error here; the result is just the top slice.
    pub async fn get_leaderboard(&self, requester: &str, top_n: usize) -> Result<Vec<RankedEntry>> {
        let ranked = self.ranking().await?;
        let view = self.engine.leaderboard_view(&ranked, requester, top_n);

        if view.len() > top_n.min(ranked.len()) {
            debug!(requester = %requester, "Requester appended below the top window");
        } else if self.engine.find_rank(&ranked, requester).is_none() {
            info!(requester = %requester, "Requester not present in ranking");
        }

        debug!(
            requester = %requester,
            top_n,
            population = ranked.len(),
            returned = view.len(),
            "Leaderboard computed"
        );

        Ok(view)
    }
}
