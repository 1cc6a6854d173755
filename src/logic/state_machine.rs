//! Match lifecycle: Waiting → Ready → Decided, result propagation and undo.
//!
//! Every operation validates first and mutates second, so an error never leaves a
//! half-applied result in the graph.

use crate::models::{
    Bracket, BracketGraph, CompetitorId, EngineError, Match, MatchId, MatchState, Side, SlotRef,
    SlotSource,
};
use log::{debug, info};
use std::collections::BTreeSet;

/// Outcome of a reported result.
#[derive(Clone, Debug)]
pub struct Transition {
    /// Every match whose winner or slots changed, the reported one included.
    pub updated_matches: Vec<Match>,
    /// Matches that became ready because of this result.
    pub now_ready: Vec<Match>,
    /// True exactly when the terminal match (first grand final or reset) was decided.
    pub completed: bool,
}

/// Outcome of an undo.
#[derive(Clone, Debug)]
pub struct Reversal {
    pub updated_matches: Vec<Match>,
    /// Reset final removed because the result that created it was undone.
    pub removed_reset: Option<MatchId>,
}

impl BracketGraph {
    /// Record `winner_id` as the winner of a ready match and propagate both competitors forward.
    pub fn report_result(
        &mut self,
        match_id: MatchId,
        winner_id: CompetitorId,
    ) -> Result<Transition, EngineError> {
        let m = self
            .get(match_id)
            .ok_or(EngineError::UnknownMatch(match_id))?;
        if m.state() != MatchState::Ready {
            return Err(EngineError::NotReady(match_id));
        }
        let (a, b) = m.competitors().ok_or(EngineError::NotReady(match_id))?;
        let loser_id = if winner_id == a {
            b
        } else if winner_id == b {
            a
        } else {
            return Err(EngineError::InvalidWinner {
                match_id,
                winner_id,
            });
        };
        let (winner_to, loser_to) = (m.winner_to, m.loser_to);
        // Loser-bracket champion sits in slot B of the grand final.
        let forces_reset = Some(match_id) == self.grand_final
            && m.bracket == Bracket::Placement
            && self.reset_final.is_none()
            && winner_id == b;

        let mut touched = BTreeSet::from([match_id]);
        self.matches[match_id.index()].winner_id = Some(winner_id);
        debug!("match {}: {} beat {}", match_id, winner_id, loser_id);
        if let Some(to) = winner_to {
            self.fill_slot(to, winner_id, &mut touched);
        }
        if let Some(to) = loser_to {
            self.fill_slot(to, loser_id, &mut touched);
        }
        if forces_reset {
            self.append_reset(match_id, loser_id, winner_id, &mut touched);
        }

        let completed = self.is_complete();
        if completed {
            info!("bracket complete, champion {}", winner_id);
        }
        let updated_matches: Vec<Match> = touched
            .iter()
            .filter_map(|&id| self.get(id))
            .cloned()
            .collect();
        let now_ready = updated_matches
            .iter()
            .filter(|m| m.id != match_id && m.state() == MatchState::Ready)
            .cloned()
            .collect();
        Ok(Transition {
            updated_matches,
            now_ready,
            completed,
        })
    }

    /// Take back the result of a decided match.
    ///
    /// Byes that advanced only because of this result are reverted with it. Fails with
    /// `CannotUndo` while a real match fed by this result is decided.
    pub fn undo_result(&mut self, match_id: MatchId) -> Result<Reversal, EngineError> {
        let m = self
            .get(match_id)
            .ok_or(EngineError::UnknownMatch(match_id))?;
        if m.winner_id.is_none() {
            return Err(EngineError::NotDecided(match_id));
        }
        if m.is_bye {
            return Err(EngineError::CannotUndo(match_id));
        }
        let edges = [m.winner_to, m.loser_to];
        if edges.iter().flatten().any(|&to| self.blocks_undo(to)) {
            return Err(EngineError::CannotUndo(match_id));
        }
        let removes_reset = Some(match_id) == self.grand_final && self.reset_final.is_some();
        if removes_reset && self.reset_final.map(|r| r.index() + 1) != Some(self.matches.len()) {
            return Err(EngineError::CorruptGraph(
                "reset final is not the last match".to_string(),
            ));
        }

        let mut touched = BTreeSet::from([match_id]);
        self.matches[match_id.index()].winner_id = None;
        for to in edges.into_iter().flatten() {
            self.clear_slot(to, &mut touched);
        }
        let removed_reset = if removes_reset {
            self.remove_reset(match_id)
        } else {
            None
        };
        debug!("match {}: result undone", match_id);

        let updated_matches = touched
            .iter()
            .filter_map(|&id| self.get(id))
            .cloned()
            .collect();
        Ok(Reversal {
            updated_matches,
            removed_reset,
        })
    }

    /// Resolve a slot to a concrete competitor. Byes decide themselves and pass the competitor on.
    pub(crate) fn fill_slot(
        &mut self,
        to: SlotRef,
        competitor: CompetitorId,
        touched: &mut BTreeSet<MatchId>,
    ) {
        let Some(m) = self.get_mut(to.match_id) else {
            return;
        };
        m.slot_mut(to.side).competitor = Some(competitor);
        m.display_side.insert(competitor, to.side);
        touched.insert(to.match_id);
        if m.is_bye && m.winner_id.is_none() {
            m.winner_id = Some(competitor);
            let next = m.winner_to;
            debug!("match {}: bye, {} advances", to.match_id, competitor);
            if let Some(next) = next {
                self.fill_slot(next, competitor, touched);
            }
        }
    }

    /// Inverse of `fill_slot`.
    fn clear_slot(&mut self, to: SlotRef, touched: &mut BTreeSet<MatchId>) {
        let Some(m) = self.get_mut(to.match_id) else {
            return;
        };
        if let Some(c) = m.slot_mut(to.side).competitor.take() {
            m.display_side.remove(&c);
        }
        touched.insert(to.match_id);
        if m.is_bye && m.winner_id.take().is_some() {
            let next = m.winner_to;
            if let Some(next) = next {
                self.clear_slot(next, touched);
            }
        }
    }

    /// A decided real match downstream of `to` (looking through auto-advanced byes).
    fn blocks_undo(&self, to: SlotRef) -> bool {
        match self.get(to.match_id) {
            Some(m) if m.is_bye => {
                m.winner_id.is_some() && m.winner_to.map_or(false, |next| self.blocks_undo(next))
            }
            Some(m) => m.winner_id.is_some(),
            None => false,
        }
    }

    /// Second grand final: winner-bracket champion keeps the left side, as in the first one.
    fn append_reset(
        &mut self,
        grand_final: MatchId,
        winner_bracket_champion: CompetitorId,
        loser_bracket_champion: CompetitorId,
        touched: &mut BTreeSet<MatchId>,
    ) -> MatchId {
        let id = MatchId(self.matches.len());
        let mut reset = Match::new(
            id,
            Bracket::Placement,
            2,
            SlotSource::LoserOf(grand_final),
            SlotSource::WinnerOf(grand_final),
            "Grand Final Reset",
        );
        reset.match_number = 1;
        self.matches.push(reset);

        let left = SlotRef {
            match_id: id,
            side: Side::Left,
        };
        let right = SlotRef {
            match_id: id,
            side: Side::Right,
        };
        let gf = &mut self.matches[grand_final.index()];
        gf.loser_to = Some(left);
        gf.winner_to = Some(right);
        self.reset_final = Some(id);
        self.fill_slot(left, winner_bracket_champion, touched);
        self.fill_slot(right, loser_bracket_champion, touched);
        debug!("grand final {} went to the loser bracket: reset {} appended", grand_final, id);
        id
    }

    fn remove_reset(&mut self, grand_final: MatchId) -> Option<MatchId> {
        let reset = self.reset_final.take()?;
        self.matches.pop();
        if let Some(gf) = self.get_mut(grand_final) {
            gf.winner_to = None;
            gf.loser_to = None;
        }
        debug!("reset final {} removed", reset);
        Some(reset)
    }
}
