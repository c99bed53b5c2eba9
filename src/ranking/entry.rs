//! Ranked Entry Types and Tie Policy
//!
//! A ranked entry is derived from one participant within one ranking
//! computation. It is never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::database::participants::Participant;

/// One row of a computed leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    #[serde(rename = "username")]
    pub identifier: String,

    #[serde(rename = "points")]
    pub score: u64,

    /// 1-based position in the ordering
    pub rank: usize,
}

impl RankedEntry {
    pub fn from_participant(participant: &Participant, rank: usize) -> Self {
        Self {
            identifier: participant.identifier.clone(),
            score: participant.score,
            rank,
        }
    }
}

/// How participants with equal scores are ordered relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// Equal scores keep the order they had in the snapshot. Snapshot order
    /// follows the store's key listing, so it can differ between calls.
    InputOrder,
    /// Equal scores are ordered by identifier, ascending.
    #[default]
    IdentifierAscending,
}

impl FromStr for TiePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "input" | "input_order" | "stable" => Ok(TiePolicy::InputOrder),
            "identifier" | "identifier_ascending" | "username" => {
                Ok(TiePolicy::IdentifierAscending)
            }
            other => Err(format!("unknown tie policy: {}", other)),
        }
    }
}

impl fmt::Display for TiePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiePolicy::InputOrder => write!(f, "input_order"),
            TiePolicy::IdentifierAscending => write!(f, "identifier_ascending"),
        }
    }
}
