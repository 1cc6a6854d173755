//! Entry points for the surrounding application.
//!
//! Each call takes the caller's graph by reference and returns a new one; the caller persists it
//! and applies the ledger delta to its competitor records.

use crate::logic::generator::generate;
use crate::logic::ledger::LedgerDelta;
use crate::logic::rankings::compute_rankings;
use crate::models::{BracketGraph, Competitor, CompetitorId, EngineError, Match, MatchId, Rankings};
use serde::Serialize;

/// Everything the caller needs after a reported result.
#[derive(Clone, Debug, Serialize)]
pub struct ResultReport {
    pub graph: BracketGraph,
    pub updated_matches: Vec<Match>,
    pub now_ready: Vec<Match>,
    pub ledger_delta: Vec<LedgerDelta>,
    pub completed: bool,
    /// Present once the terminal match is decided.
    pub rankings: Option<Rankings>,
}

#[derive(Clone, Debug, Serialize)]
pub struct UndoReport {
    pub graph: BracketGraph,
    pub updated_matches: Vec<Match>,
    pub ledger_delta: Vec<LedgerDelta>,
}

/// Start a bracket for competitors in seeding order.
pub fn create_bracket(competitors: &[Competitor]) -> Result<BracketGraph, EngineError> {
    let graph = generate(competitors)?;
    log::info!(
        "bracket created for {} competitors ({} matches)",
        graph.competitors.len(),
        graph.matches.len()
    );
    Ok(graph)
}

pub fn report_result(
    graph: &BracketGraph,
    match_id: MatchId,
    winner_id: CompetitorId,
) -> Result<ResultReport, EngineError> {
    graph.validate()?;
    let mut next = graph.clone();
    let transition = next.report_result(match_id, winner_id)?;

    let decided = next
        .get(match_id)
        .ok_or(EngineError::UnknownMatch(match_id))?;
    let (player1, player2) = decided
        .competitors()
        .ok_or(EngineError::NotReady(match_id))?;
    let ledger_delta = vec![LedgerDelta::Recorded {
        player1,
        player2,
        description: decided.description.clone(),
        winner: winner_id,
    }];
    let rankings = if transition.completed {
        Some(compute_rankings(&next)?)
    } else {
        None
    };

    Ok(ResultReport {
        graph: next,
        updated_matches: transition.updated_matches,
        now_ready: transition.now_ready,
        ledger_delta,
        completed: transition.completed,
        rankings,
    })
}

pub fn undo_result(graph: &BracketGraph, match_id: MatchId) -> Result<UndoReport, EngineError> {
    graph.validate()?;
    let undone = graph
        .get(match_id)
        .ok_or(EngineError::UnknownMatch(match_id))?;
    let ledger_delta: Vec<LedgerDelta> = undone
        .competitors()
        .filter(|_| !undone.is_bye)
        .map(|(player1, player2)| LedgerDelta::Removed {
            player1,
            player2,
            description: undone.description.clone(),
        })
        .into_iter()
        .collect();

    let mut next = graph.clone();
    let reversal = next.undo_result(match_id)?;
    Ok(UndoReport {
        graph: next,
        updated_matches: reversal.updated_matches,
        ledger_delta,
    })
}

pub fn get_rankings(graph: &BracketGraph) -> Result<Rankings, EngineError> {
    compute_rankings(graph)
}
