//! Ranking Engine
//!
//! Pure transformations over a participant snapshot: order it, cut the top
//! of the order, and locate a single participant's entry. Holds no state
//! between calls.

use crate::database::participants::Participant;
use crate::ranking::entry::{RankedEntry, TiePolicy};

#[derive(Debug, Clone, Copy, Default)]
pub struct RankingEngine {
    tie_policy: TiePolicy,
}

impl RankingEngine {
    pub fn new(tie_policy: TiePolicy) -> Self {
        Self { tie_policy }
    }

    /// Order the snapshot by score descending and assign ranks `1..=len`.
    ///
    /// Ranks are unique even when scores are equal; the tie policy decides
    /// which of the tied participants comes first.
    pub fn rank(&self, snapshot: &[Participant]) -> Vec<RankedEntry> {
        let mut ordered: Vec<&Participant> = snapshot.iter().collect();

        // `sort_by` is stable, so InputOrder only has to compare scores.
        match self.tie_policy {
            TiePolicy::InputOrder => ordered.sort_by(|a, b| b.score.cmp(&a.score)),
            TiePolicy::IdentifierAscending => ordered.sort_by(|a, b| {
                b.score
                    .cmp(&a.score)
                    .then_with(|| a.identifier.cmp(&b.identifier))
            }),
        }

        ordered
            .into_iter()
            .enumerate()
            .map(|(i, p)| RankedEntry::from_participant(p, i + 1))
            .collect()
    }

    /// First `min(n, len)` entries, order preserved.
    pub fn top_n(&self, ranked: &[RankedEntry], n: usize) -> Vec<RankedEntry> {
        ranked.iter().take(n).cloned().collect()
    }

    /// Entry for `identifier` anywhere in the full ranking.
    pub fn find_rank<'a>(&self, ranked: &'a [RankedEntry], identifier: &str) -> Option<&'a RankedEntry> {
        ranked.iter().find(|e| e.identifier == identifier)
    }

    /// Top `n` entries, plus the requester's own entry appended when it
    /// falls outside the window. An unranked requester adds nothing.
    pub fn leaderboard_view(&self, ranked: &[RankedEntry], requester: &str, n: usize) -> Vec<RankedEntry> {
        let mut view = self.top_n(ranked, n);

        if view.iter().any(|e| e.identifier == requester) {
            return view;
        }

        if let Some(own) = self.find_rank(ranked, requester) {
            view.push(own.clone());
        }

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participants(rows: &[(&str, u64)]) -> Vec<Participant> {
        rows.iter()
            .map(|(id, score)| Participant::new(*id, "").with_score(*score))
            .collect()
    }

    fn triples(entries: &[RankedEntry]) -> Vec<(&str, u64, usize)> {
        entries
            .iter()
            .map(|e| (e.identifier.as_str(), e.score, e.rank))
            .collect()
    }

    #[test]
    fn test_rank_monotonic_and_dense() {
        let engine = RankingEngine::default();
        let snapshot = participants(&[("c", 3), ("a", 9), ("e", 0), ("b", 9), ("d", 4)]);

        let ranked = engine.rank(&snapshot);

        assert_eq!(ranked.len(), snapshot.len());
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            assert!(pair[0].rank < pair[1].rank);
        }
        let ranks: Vec<usize> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, (1..=snapshot.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_input_order_ties_are_stable() {
        let engine = RankingEngine::new(TiePolicy::InputOrder);
        let ranked = engine.rank(&participants(&[("A", 10), ("B", 10), ("C", 5)]));
        assert_eq!(triples(&ranked), vec![("A", 10, 1), ("B", 10, 2), ("C", 5, 3)]);

        let ranked = engine.rank(&participants(&[("B", 10), ("A", 10), ("C", 5)]));
        assert_eq!(triples(&ranked), vec![("B", 10, 1), ("A", 10, 2), ("C", 5, 3)]);
    }

    #[test]
    fn test_identifier_ties_ignore_input_order() {
        let engine = RankingEngine::new(TiePolicy::IdentifierAscending);

        let forward = engine.rank(&participants(&[("A", 10), ("B", 10), ("C", 5)]));
        let reversed = engine.rank(&participants(&[("C", 5), ("B", 10), ("A", 10)]));

        assert_eq!(triples(&forward), vec![("A", 10, 1), ("B", 10, 2), ("C", 5, 3)]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_rank_empty_snapshot() {
        assert!(RankingEngine::default().rank(&[]).is_empty());
    }

    #[test]
    fn test_top_n_truncation() {
        let engine = RankingEngine::default();
        let ranked = engine.rank(&participants(&[("a", 5), ("b", 4), ("c", 3), ("d", 2), ("e", 1)]));

        assert_eq!(engine.top_n(&ranked, 2), ranked[..2].to_vec());
        assert_eq!(engine.top_n(&ranked, 100), ranked);
        assert!(engine.top_n(&ranked, 0).is_empty());
    }

    #[test]
    fn test_find_rank() {
        let engine = RankingEngine::default();
        let ranked = engine.rank(&participants(&[("a", 5), ("b", 4), ("c", 3)]));

        assert_eq!(engine.find_rank(&ranked, "c").map(|e| e.rank), Some(3));
        assert!(engine.find_rank(&ranked, "z").is_none());
    }

    #[test]
    fn test_leaderboard_view() {
        let engine = RankingEngine::default();
        let ranked = engine.rank(&participants(&[("A", 50), ("B", 40), ("C", 30), ("D", 20)]));

        assert_eq!(
            triples(&engine.leaderboard_view(&ranked, "D", 2)),
            vec![("A", 50, 1), ("B", 40, 2), ("D", 20, 4)]
        );
        assert_eq!(
            triples(&engine.leaderboard_view(&ranked, "A", 2)),
            vec![("A", 50, 1), ("B", 40, 2)]
        );
        assert_eq!(
            triples(&engine.leaderboard_view(&ranked, "Z", 2)),
            vec![("A", 50, 1), ("B", 40, 2)]
        );
        assert_eq!(
            triples(&engine.leaderboard_view(&ranked, "C", 0)),
            vec![("C", 30, 3)]
        );
    }
}
