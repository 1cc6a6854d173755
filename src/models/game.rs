//! Match, slots and the bracket/side/state enums.

use crate::models::competitor::CompetitorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a match: its index in the graph's match arena.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub usize);

impl MatchId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which part of the bracket a match belongs to. Drives the propagation rules.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bracket {
    Winner,
    Loser,
    /// Grand final and its reset.
    Placement,
}

/// Side of a match, as drawn by the rendering layer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Where a slot's competitor comes from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotSource {
    Competitor(CompetitorId),
    WinnerOf(MatchId),
    LoserOf(MatchId),
    /// Nobody will ever arrive here (bye).
    Empty,
}

/// A forward edge: the slot a result feeds into.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotRef {
    pub match_id: MatchId,
    pub side: Side,
}

/// One side of a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub source: SlotSource,
    /// Resolved competitor; None while the source match is undecided (or for empty slots).
    pub competitor: Option<CompetitorId>,
}

impl Slot {
    pub fn new(source: SlotSource) -> Self {
        Self {
            source,
            competitor: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.competitor.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.source == SlotSource::Empty
    }
}

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// At least one slot still unresolved.
    Waiting,
    /// Both slots resolved, no winner yet.
    Ready,
    Decided,
}

/// A single 1v1 match in the bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Round within its bracket, starting at 1.
    pub round: u32,
    /// Position within its round, starting at 1.
    pub match_number: u32,
    pub bracket: Bracket,
    pub slot_a: Slot,
    pub slot_b: Slot,
    /// None if not yet played.
    pub winner_id: Option<CompetitorId>,
    /// Exactly one live slot; auto-resolves and never reaches the ledger.
    pub is_bye: bool,
    pub description: String,
    /// Side each competitor was first drawn on. Kept stable across re-renders.
    pub display_side: BTreeMap<CompetitorId, Side>,
    /// Slot the winner advances to (None for the terminal match).
    pub winner_to: Option<SlotRef>,
    /// Slot the loser drops to (winner bracket and first grand final only).
    pub loser_to: Option<SlotRef>,
}

impl Match {
    pub fn new(
        id: MatchId,
        bracket: Bracket,
        round: u32,
        slot_a: SlotSource,
        slot_b: SlotSource,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            round,
            match_number: 0,
            bracket,
            slot_a: Slot::new(slot_a),
            slot_b: Slot::new(slot_b),
            winner_id: None,
            is_bye: false,
            description: description.into(),
            display_side: BTreeMap::new(),
            winner_to: None,
            loser_to: None,
        }
    }

    pub fn state(&self) -> MatchState {
        if self.winner_id.is_some() {
            MatchState::Decided
        } else if self.slot_a.is_resolved() && self.slot_b.is_resolved() {
            MatchState::Ready
        } else {
            MatchState::Waiting
        }
    }

    pub fn slot(&self, side: Side) -> &Slot {
        match side {
            Side::Left => &self.slot_a,
            Side::Right => &self.slot_b,
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::Left => &mut self.slot_a,
            Side::Right => &mut self.slot_b,
        }
    }

    /// Both competitors, once both slots are resolved.
    pub fn competitors(&self) -> Option<(CompetitorId, CompetitorId)> {
        Some((self.slot_a.competitor?, self.slot_b.competitor?))
    }

    /// The beaten competitor of a decided, contested match. Byes have no loser.
    pub fn loser_id(&self) -> Option<CompetitorId> {
        if self.is_bye {
            return None;
        }
        let winner = self.winner_id?;
        let (a, b) = self.competitors()?;
        Some(if winner == a { b } else { a })
    }

    pub fn involves(&self, competitor: CompetitorId) -> bool {
        self.slot_a.competitor == Some(competitor) || self.slot_b.competitor == Some(competitor)
    }
}
