//! Final standings from a completed bracket.

use crate::models::{
    Bracket, BracketGraph, CompetitorId, EngineError, Match, Placement, Rankings,
};

/// Walk a completed graph and assign placements 1st..8th.
///
/// Terminal winner and loser take first and second. Loser-bracket rounds are then walked
/// from the last to the first; everyone eliminated in the same round shares a tie group.
pub fn compute_rankings(graph: &BracketGraph) -> Result<Rankings, EngineError> {
    if !graph.is_complete() {
        return Err(EngineError::TournamentNotComplete);
    }

    let mut groups: Vec<Vec<CompetitorId>> = Vec::new();
    match graph.terminal().and_then(|id| graph.get(id)) {
        Some(terminal) => {
            groups.extend(terminal.winner_id.map(|w| vec![w]));
            groups.extend(terminal.loser_id().map(|l| vec![l]));
        }
        None => groups.extend(graph.competitors.first().map(|&c| vec![c])),
    }
    for round in (1..=graph.loser_rounds).rev() {
        let eliminated: Vec<CompetitorId> = graph
            .matches
            .iter()
            .filter(|m| m.bracket == Bracket::Loser && m.round == round)
            .filter_map(Match::loser_id)
            .collect();
        if !eliminated.is_empty() {
            groups.push(eliminated);
        }
    }

    Ok(assign_placements(graph, groups))
}

/// Hand out placement keys group by group. A group that does not fit before the eighth key
/// stops the walk; it is not split.
fn assign_placements(graph: &BracketGraph, groups: Vec<Vec<CompetitorId>>) -> Rankings {
    let mut rankings = Rankings::default();
    let mut rank = 1;
    for mut group in groups {
        let last = rank + group.len() - 1;
        if Placement::from_rank(last).is_none() {
            break;
        }
        group.sort_by_key(|&c| graph.seed_of(c).unwrap_or(usize::MAX));
        let keys: Vec<Placement> = (rank..=last).filter_map(Placement::from_rank).collect();
        for (&placement, &competitor) in keys.iter().zip(&group) {
            rankings.places.insert(placement, competitor);
        }
        if keys.len() > 1 {
            rankings.ties.push(keys);
        }
        rank = last + 1;
    }
    rankings
}
