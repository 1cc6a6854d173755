//! Competitor, OpponentRecord and CompetitorStats.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a competitor (used in slots, rankings and the ledger).
pub type CompetitorId = Uuid;

/// Result of a single match from one competitor's point of view.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Win,
    Loss,
}

impl MatchOutcome {
    /// The same result seen from the opponent's side.
    pub fn flipped(self) -> Self {
        match self {
            MatchOutcome::Win => MatchOutcome::Loss,
            MatchOutcome::Loss => MatchOutcome::Win,
        }
    }
}

/// One entry in a competitor's opponent history.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OpponentRecord {
    pub opponent_id: CompetitorId,
    /// Description of the match this was played in (e.g. "Loser Bracket Round 2").
    pub match_description: String,
    pub result: MatchOutcome,
}

/// Win/loss totals derived from the opponent history (for API / display).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CompetitorStats {
    pub wins: u32,
    pub losses: u32,
}

impl CompetitorStats {
    pub fn from_competitor(c: &Competitor) -> Self {
        c.opponents
            .iter()
            .fold(Self::default(), |mut stats, record| {
                match record.result {
                    MatchOutcome::Win => stats.wins += 1,
                    MatchOutcome::Loss => stats.losses += 1,
                }
                stats
            })
    }
}

/// A competitor entered into a fixture.
///
/// Display attributes (weight class, handedness, club, ...) are opaque to the engine;
/// only `id` takes part in bracket logic.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Who this competitor played, in order. Mutated only through the ledger.
    #[serde(default)]
    pub opponents: Vec<OpponentRecord>,
}

impl Competitor {
    /// Create a new competitor with the given name and no history.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            attributes: BTreeMap::new(),
            opponents: Vec::new(),
        }
    }

    /// Builder-style helper to attach a display attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Current stats as a separate struct (for API responses).
    pub fn stats(&self) -> CompetitorStats {
        CompetitorStats::from_competitor(self)
    }

    /// Opponents faced so far, in order of play (repeats included).
    pub fn opponent_ids(&self) -> Vec<CompetitorId> {
        self.opponents.iter().map(|r| r.opponent_id).collect()
    }
}
