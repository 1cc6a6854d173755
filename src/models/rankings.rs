//! Final placements.

use crate::models::competitor::CompetitorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placement keys reported for a finished bracket (1st through 8th).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
}

impl Placement {
    pub const ALL: [Placement; 8] = [
        Placement::First,
        Placement::Second,
        Placement::Third,
        Placement::Fourth,
        Placement::Fifth,
        Placement::Sixth,
        Placement::Seventh,
        Placement::Eighth,
    ];

    /// 1-based rank to placement key; None beyond eighth.
    pub fn from_rank(rank: usize) -> Option<Self> {
        rank.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn rank(self) -> usize {
        self as usize + 1
    }
}

/// Final standings of a completed bracket.
///
/// Serializes as `{"places": {"first": ..., "second": ...}, "ties": [["fifth", "sixth"]]}`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    /// Only as many keys as the bracket can earn are present.
    pub places: BTreeMap<Placement, CompetitorId>,
    /// Groups of placements shared by competitors eliminated in the same loser-bracket round.
    /// Inside a group keys follow the original seeding order.
    #[serde(default)]
    pub ties: Vec<Vec<Placement>>,
}

impl Rankings {
    pub fn get(&self, placement: Placement) -> Option<CompetitorId> {
        self.places.get(&placement).copied()
    }

    pub fn first(&self) -> Option<CompetitorId> {
        self.get(Placement::First)
    }

    pub fn second(&self) -> Option<CompetitorId> {
        self.get(Placement::Second)
    }

    pub fn placement_of(&self, competitor: CompetitorId) -> Option<Placement> {
        self.places
            .iter()
            .find(|(_, &c)| c == competitor)
            .map(|(&p, _)| p)
    }

    /// The tie group a placement belongs to, if it is shared.
    pub fn tie_group(&self, placement: Placement) -> Option<&[Placement]> {
        self.ties
            .iter()
            .find(|group| group.contains(&placement))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}
