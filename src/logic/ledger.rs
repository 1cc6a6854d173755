//! Opponent history ledger: who played whom, for display and audit only.
//!
//! Bracket logic never reads this data; a ledger that drifts out of sync cannot affect results.

use crate::models::{Competitor, CompetitorId, EngineError, MatchOutcome, OpponentRecord};
use serde::{Deserialize, Serialize};

/// Change to apply to the competitor roster after a result is reported or undone.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerDelta {
    Recorded {
        player1: CompetitorId,
        player2: CompetitorId,
        description: String,
        winner: CompetitorId,
    },
    Removed {
        player1: CompetitorId,
        player2: CompetitorId,
        description: String,
    },
}

impl LedgerDelta {
    pub fn apply(&self, competitors: &mut [Competitor]) -> Result<(), EngineError> {
        match self {
            LedgerDelta::Recorded {
                player1,
                player2,
                description,
                winner,
            } => record_result(competitors, *player1, *player2, description, *winner),
            LedgerDelta::Removed {
                player1,
                player2,
                description,
            } => remove_result(competitors, *player1, *player2, description).map(|_| ()),
        }
    }
}

fn position(competitors: &[Competitor], id: CompetitorId) -> Result<usize, EngineError> {
    competitors
        .iter()
        .position(|c| c.id == id)
        .ok_or(EngineError::UnknownCompetitor(id))
}

/// Append a mirrored pair of records, one per competitor.
pub fn record_result(
    competitors: &mut [Competitor],
    player1: CompetitorId,
    player2: CompetitorId,
    description: &str,
    winner_id: CompetitorId,
) -> Result<(), EngineError> {
    if player1 == player2 {
        return Err(EngineError::InvalidInput(format!(
            "{} cannot play against themselves",
            player1
        )));
    }
    let first = position(competitors, player1)?;
    let second = position(competitors, player2)?;
    let result = if winner_id == player1 {
        MatchOutcome::Win
    } else if winner_id == player2 {
        MatchOutcome::Loss
    } else {
        return Err(EngineError::InvalidInput(format!(
            "winner {} did not play in \"{}\"",
            winner_id, description
        )));
    };

    competitors[first].opponents.push(OpponentRecord {
        opponent_id: player2,
        match_description: description.to_string(),
        result,
    });
    competitors[second].opponents.push(OpponentRecord {
        opponent_id: player1,
        match_description: description.to_string(),
        result: result.flipped(),
    });
    Ok(())
}

/// Remove the most recent matching pair. Returns whether anything was removed.
///
/// Searches from the end so that repeated descriptions (several matches per round) undo the
/// latest occurrence.
pub fn remove_result(
    competitors: &mut [Competitor],
    player1: CompetitorId,
    player2: CompetitorId,
    description: &str,
) -> Result<bool, EngineError> {
    let first = position(competitors, player1)?;
    let second = position(competitors, player2)?;
    let removed_first = remove_last(&mut competitors[first].opponents, player2, description);
    let removed_second = remove_last(&mut competitors[second].opponents, player1, description);
    Ok(removed_first || removed_second)
}

fn remove_last(records: &mut Vec<OpponentRecord>, opponent: CompetitorId, description: &str) -> bool {
    match records
        .iter()
        .rposition(|r| r.opponent_id == opponent && r.match_description == description)
    {
        Some(i) => {
            records.remove(i);
            true
        }
        None => false,
    }
}
