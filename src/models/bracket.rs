//! BracketGraph (the match arena) and EngineError.

use crate::models::competitor::CompetitorId;
use crate::models::fixture::FixtureId;
use crate::models::game::{Bracket, Match, MatchId, MatchState, Side, SlotSource};
use serde::{Deserialize, Serialize};

/// Errors returned by the bracket engine. No variant leaves a partially mutated graph behind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineError {
    /// Empty competitor list, duplicate ids, or another malformed input.
    InvalidInput(String),
    /// No match with this id in the graph.
    UnknownMatch(MatchId),
    /// Match is waiting on another result or already decided.
    NotReady(MatchId),
    /// Reported winner is not one of the match's two competitors.
    InvalidWinner { match_id: MatchId, winner_id: CompetitorId },
    /// A later result depends on this one; undo that first.
    CannotUndo(MatchId),
    /// Undo requested for a match with no recorded result.
    NotDecided(MatchId),
    /// Rankings requested before the terminal match was decided.
    TournamentNotComplete,
    /// Ledger update names a competitor missing from the roster.
    UnknownCompetitor(CompetitorId),
    /// Graph handed back by the caller breaks a structural invariant.
    CorruptGraph(String),
    UnknownFixture(FixtureId),
    /// Fixture is paused (or completed) and does not accept this action.
    FixtureNotActive(FixtureId),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidInput(reason) => write!(f, "Invalid input: {}", reason),
            EngineError::UnknownMatch(id) => write!(f, "Match {} does not exist", id),
            EngineError::NotReady(id) => write!(f, "Match {} is not ready to be decided", id),
            EngineError::InvalidWinner { match_id, winner_id } => {
                write!(f, "{} is not playing in match {}", winner_id, match_id)
            }
            EngineError::CannotUndo(id) => {
                write!(f, "Match {} has later results depending on it; undo those first", id)
            }
            EngineError::NotDecided(id) => write!(f, "Match {} has no result to undo", id),
            EngineError::TournamentNotComplete => write!(f, "Tournament is not complete yet"),
            EngineError::UnknownCompetitor(id) => write!(f, "Competitor {} not found", id),
            EngineError::CorruptGraph(reason) => write!(f, "Corrupt bracket graph: {}", reason),
            EngineError::UnknownFixture(id) => write!(f, "Fixture {} not found", id),
            EngineError::FixtureNotActive(id) => write!(f, "Fixture {} is not active", id),
        }
    }
}

impl std::error::Error for EngineError {}

/// The full match graph for one double-elimination bracket.
///
/// Matches live in an arena (`matches[i].id == MatchId(i)`); slots refer to other matches by id,
/// and every source precedes its consumer, so arena order is a topological order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketGraph {
    /// Competitor ids in seeding order (index 0 is the top seed).
    pub competitors: Vec<CompetitorId>,
    pub matches: Vec<Match>,
    /// Number of winner-bracket rounds (log2 of the padded bracket size).
    pub winner_rounds: u32,
    /// Number of loser-bracket rounds; 0 when there is no loser bracket.
    pub loser_rounds: u32,
    /// Terminal match before any reset. For two competitors this is the lone final.
    pub grand_final: Option<MatchId>,
    /// Second grand final, appended only when the loser-bracket champion wins the first.
    pub reset_final: Option<MatchId>,
}

impl BracketGraph {
    pub fn get(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(id.index())
    }

    pub fn get_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.get_mut(id.index())
    }

    pub fn state_of(&self, id: MatchId) -> Option<MatchState> {
        self.get(id).map(Match::state)
    }

    /// Matches that can be reported right now, in arena order.
    pub fn ready_matches(&self) -> Vec<&Match> {
        self.matches
            .iter()
            .filter(|m| m.state() == MatchState::Ready)
            .collect()
    }

    /// Matches of one bracket half, in arena order.
    pub fn matches_in(&self, bracket: Bracket) -> Vec<&Match> {
        self.matches.iter().filter(|m| m.bracket == bracket).collect()
    }

    /// The match whose result ends the tournament.
    pub fn terminal(&self) -> Option<MatchId> {
        self.reset_final.or(self.grand_final)
    }

    pub fn is_complete(&self) -> bool {
        if self.matches.is_empty() {
            return self.competitors.len() == 1;
        }
        self.terminal()
            .and_then(|id| self.get(id))
            .map(|m| m.state() == MatchState::Decided)
            .unwrap_or(false)
    }

    /// Tournament winner, once complete.
    pub fn champion(&self) -> Option<CompetitorId> {
        if !self.is_complete() {
            return None;
        }
        match self.terminal() {
            Some(id) => self.get(id)?.winner_id,
            None => self.competitors.first().copied(),
        }
    }

    /// Real losses of a competitor. Byes never count.
    pub fn losses_of(&self, competitor: CompetitorId) -> u32 {
        self.matches
            .iter()
            .filter(|m| m.loser_id() == Some(competitor))
            .count() as u32
    }

    /// Out of the tournament: two losses, or beaten in a completed bracket's terminal match.
    pub fn is_eliminated(&self, competitor: CompetitorId) -> bool {
        self.losses_of(competitor) >= 2
            || (self.is_complete() && self.champion() != Some(competitor))
    }

    /// Position of a competitor in the seeding order.
    pub fn seed_of(&self, competitor: CompetitorId) -> Option<usize> {
        self.competitors.iter().position(|&c| c == competitor)
    }

    /// Structural check for graphs handed back by the caller (e.g. after deserialization).
    pub fn validate(&self) -> Result<(), EngineError> {
        let corrupt = |reason: String| Err(EngineError::CorruptGraph(reason));
        if self.competitors.is_empty() {
            return corrupt("no competitors".to_string());
        }
        for id in [self.grand_final, self.reset_final].into_iter().flatten() {
            if self.get(id).is_none() {
                return corrupt(format!("terminal match {} out of range", id));
            }
        }
        if let Some(reset) = self.reset_final {
            if reset.index() + 1 != self.matches.len() {
                return corrupt("reset final is not the last match".to_string());
            }
        }
        for (i, m) in self.matches.iter().enumerate() {
            if m.id != MatchId(i) {
                return corrupt(format!("match at index {} has id {}", i, m.id));
            }
            for side in [Side::Left, Side::Right] {
                let (source_id, feeds_from_winner) = match m.slot(side).source {
                    SlotSource::WinnerOf(s) => (s, true),
                    SlotSource::LoserOf(s) => (s, false),
                    _ => continue,
                };
                if source_id.index() >= i {
                    return corrupt(format!("match {} depends on later match {}", i, source_id));
                }
                let source = &self.matches[source_id.index()];
                let edge = if feeds_from_winner {
                    source.winner_to
                } else {
                    source.loser_to
                };
                if edge.map(|to| (to.match_id, to.side)) != Some((m.id, side)) {
                    return corrupt(format!("match {} has no edge to match {}", source_id, i));
                }
            }
            let terminal = Some(m.id) == self.grand_final || Some(m.id) == self.reset_final;
            if m.winner_to.is_none() && !terminal {
                return corrupt(format!("winner of match {} has nowhere to go", i));
            }
            if m.bracket == Bracket::Winner && !m.is_bye && !terminal && m.loser_to.is_none() {
                return corrupt(format!("loser of match {} has nowhere to drop", i));
            }
            for (to, expected) in [
                (m.winner_to, SlotSource::WinnerOf(m.id)),
                (m.loser_to, SlotSource::LoserOf(m.id)),
            ] {
                if let Some(to) = to {
                    match self.get(to.match_id) {
                        Some(target) if target.slot(to.side).source == expected => {}
                        _ => return corrupt(format!("dangling edge from match {}", i)),
                    }
                }
            }
        }
        Ok(())
    }
}
