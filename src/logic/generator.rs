//! Bracket generation: competitors in seeding order → initial match graph.
//!
//! 1. Pad N to the next power of two P and place seeds in standard order; slots past N are byes.
//! 2. Winner bracket: single-elimination tree over P slots (log2 P rounds).
//! 3. Loser bracket: round 1 pairs winner-round-1 losers; afterwards survivors alternate with
//!    losers dropping from the next winner round (2 * (log2 P - 1) rounds in total).
//! 4. Grand final between both champions (not created for N = 2, where the lone match decides).
//! 5. Dead slots are resolved statically: one live slot makes a bye, none removes the match.

use crate::logic::seeding::{bracket_size, seed_positions};
use crate::models::{
    Bracket, BracketGraph, Competitor, CompetitorId, EngineError, Match, MatchId, Side, SlotRef,
    SlotSource,
};
use std::collections::{BTreeSet, HashMap, HashSet};

/// How many live slots a match keeps once byes are taken into account.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Liveness {
    Void,
    Bye,
    Contested,
}

/// Matches under construction; ids are arena indices before pruning.
#[derive(Default)]
struct Draft {
    matches: Vec<Match>,
}

impl Draft {
    fn push(
        &mut self,
        bracket: Bracket,
        round: u32,
        slot_a: SlotSource,
        slot_b: SlotSource,
        description: String,
    ) -> MatchId {
        let id = MatchId(self.matches.len());
        self.matches
            .push(Match::new(id, bracket, round, slot_a, slot_b, description));
        id
    }
}

/// Build the initial bracket for competitors given in seeding order (index 0 = top seed).
///
/// Deterministic for a given input order. Byes are decided immediately.
pub fn generate(competitors: &[Competitor]) -> Result<BracketGraph, EngineError> {
    if competitors.is_empty() {
        return Err(EngineError::InvalidInput(
            "competitor list is empty".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(competitors.len());
    for c in competitors {
        if !seen.insert(c.id) {
            return Err(EngineError::InvalidInput(format!(
                "competitor {} ({}) is entered twice",
                c.id, c.name
            )));
        }
    }
    let ids: Vec<CompetitorId> = competitors.iter().map(|c| c.id).collect();

    if ids.len() == 1 {
        return Ok(BracketGraph {
            competitors: ids,
            matches: Vec::new(),
            winner_rounds: 0,
            loser_rounds: 0,
            grand_final: None,
            reset_final: None,
        });
    }

    let size = bracket_size(ids.len());
    let winner_rounds = size.trailing_zeros();
    let loser_rounds = 2 * (winner_rounds - 1);
    let mut draft = Draft::default();

    let entrant = |seed: usize| {
        ids.get(seed - 1)
            .map(|&c| SlotSource::Competitor(c))
            .unwrap_or(SlotSource::Empty)
    };
    let first_round: Vec<MatchId> = seed_positions(size)
        .chunks_exact(2)
        .map(|pair| {
            draft.push(
                Bracket::Winner,
                1,
                entrant(pair[0]),
                entrant(pair[1]),
                winner_label(1, winner_rounds),
            )
        })
        .collect();

    let mut winners = vec![first_round];
    for round in 2..=winner_rounds {
        let next: Vec<MatchId> = winners[winners.len() - 1]
            .chunks_exact(2)
            .map(|pair| {
                draft.push(
                    Bracket::Winner,
                    round,
                    SlotSource::WinnerOf(pair[0]),
                    SlotSource::WinnerOf(pair[1]),
                    winner_label(round, winner_rounds),
                )
            })
            .collect();
        winners.push(next);
    }

    let mut loser_final = None;
    let mut feed: Vec<(SlotSource, SlotSource)> = winners[0]
        .chunks_exact(2)
        .map(|pair| (SlotSource::LoserOf(pair[0]), SlotSource::LoserOf(pair[1])))
        .collect();
    for winner_round in 2..=winner_rounds {
        let odd_round = 2 * winner_round - 3;
        let even_round = odd_round + 1;
        let survivors: Vec<MatchId> = feed
            .into_iter()
            .map(|(a, b)| {
                draft.push(
                    Bracket::Loser,
                    odd_round,
                    a,
                    b,
                    loser_label(odd_round, loser_rounds),
                )
            })
            .collect();

        // Drop order flips every other round to keep recent opponents apart.
        let dropping = &winners[(winner_round - 1) as usize];
        let count = dropping.len();
        let merged: Vec<MatchId> = survivors
            .iter()
            .enumerate()
            .map(|(j, &survivor)| {
                let drop = if winner_round % 2 == 0 {
                    dropping[count - 1 - j]
                } else {
                    dropping[j]
                };
                draft.push(
                    Bracket::Loser,
                    even_round,
                    SlotSource::WinnerOf(survivor),
                    SlotSource::LoserOf(drop),
                    loser_label(even_round, loser_rounds),
                )
            })
            .collect();

        loser_final = merged.first().copied();
        feed = merged
            .chunks_exact(2)
            .map(|pair| (SlotSource::WinnerOf(pair[0]), SlotSource::WinnerOf(pair[1])))
            .collect();
    }

    let winner_final = winners[winners.len() - 1][0];
    let grand_final = match loser_final {
        Some(loser_final) => draft.push(
            Bracket::Placement,
            1,
            SlotSource::WinnerOf(winner_final),
            SlotSource::WinnerOf(loser_final),
            "Grand Final".to_string(),
        ),
        None => winner_final,
    };

    let (matches, remap) = prune(draft.matches);
    let grand_final = remap[grand_final.index()].ok_or_else(|| {
        EngineError::CorruptGraph("grand final lost both competitors".to_string())
    })?;

    let mut graph = BracketGraph {
        competitors: ids,
        matches,
        winner_rounds,
        loser_rounds,
        grand_final: Some(grand_final),
        reset_final: None,
    };
    link_forward_edges(&mut graph.matches);
    number_matches(&mut graph.matches);
    place_competitors(&mut graph);

    log::debug!(
        "generated bracket: {} competitors, {} matches ({} byes)",
        graph.competitors.len(),
        graph.matches.len(),
        graph.matches.iter().filter(|m| m.is_bye).count()
    );
    Ok(graph)
}

fn winner_label(round: u32, rounds: u32) -> String {
    if rounds == 1 {
        "Final".to_string()
    } else if round == rounds {
        "Winner Bracket Final".to_string()
    } else {
        format!("Winner Bracket Round {}", round)
    }
}

fn loser_label(round: u32, rounds: u32) -> String {
    if round == rounds {
        "Loser Bracket Final".to_string()
    } else {
        format!("Loser Bracket Round {}", round)
    }
}

/// Mark byes, drop matches nobody can reach, and renumber the survivors.
///
/// Returns the compacted arena and the old-index → new-id mapping (None for removed matches).
fn prune(mut matches: Vec<Match>) -> (Vec<Match>, Vec<Option<MatchId>>) {
    let mut liveness: Vec<Liveness> = Vec::with_capacity(matches.len());
    for m in &mut matches {
        for side in [Side::Left, Side::Right] {
            let slot = m.slot_mut(side);
            let live = match slot.source {
                SlotSource::Competitor(_) => true,
                SlotSource::Empty => false,
                SlotSource::WinnerOf(s) => liveness[s.index()] != Liveness::Void,
                SlotSource::LoserOf(s) => liveness[s.index()] == Liveness::Contested,
            };
            if !live {
                slot.source = SlotSource::Empty;
            }
        }
        let live = [&m.slot_a, &m.slot_b]
            .iter()
            .filter(|s| !s.is_empty())
            .count();
        m.is_bye = live == 1;
        liveness.push(match live {
            0 => Liveness::Void,
            1 => Liveness::Bye,
            _ => Liveness::Contested,
        });
    }

    let mut remap = Vec::with_capacity(matches.len());
    let mut next = 0;
    for l in &liveness {
        if *l == Liveness::Void {
            remap.push(None);
        } else {
            remap.push(Some(MatchId(next)));
            next += 1;
        }
    }

    let renumber = |source: SlotSource| match source {
        SlotSource::WinnerOf(s) => remap[s.index()]
            .map(SlotSource::WinnerOf)
            .unwrap_or(SlotSource::Empty),
        SlotSource::LoserOf(s) => remap[s.index()]
            .map(SlotSource::LoserOf)
            .unwrap_or(SlotSource::Empty),
        other => other,
    };
    let kept: Vec<Match> = matches
        .into_iter()
        .zip(&remap)
        .filter_map(|(mut m, new_id)| {
            m.id = (*new_id)?;
            m.slot_a.source = renumber(m.slot_a.source);
            m.slot_b.source = renumber(m.slot_b.source);
            Some(m)
        })
        .collect();
    (kept, remap)
}

/// Point every source match at the slot its winner / loser feeds.
fn link_forward_edges(matches: &mut [Match]) {
    for i in 0..matches.len() {
        for side in [Side::Left, Side::Right] {
            let to = SlotRef {
                match_id: MatchId(i),
                side,
            };
            let source = matches[i].slot(side).source;
            match source {
                SlotSource::WinnerOf(s) => matches[s.index()].winner_to = Some(to),
                SlotSource::LoserOf(s) => matches[s.index()].loser_to = Some(to),
                _ => {}
            }
        }
    }
}

/// 1-based position of each match within its bracket round.
fn number_matches(matches: &mut [Match]) {
    let mut counters: HashMap<(Bracket, u32), u32> = HashMap::new();
    for m in matches {
        let n = counters.entry((m.bracket, m.round)).or_insert(0);
        *n += 1;
        m.match_number = *n;
    }
}

/// Put seeded competitors into their round-1 slots; byes advance on the spot.
fn place_competitors(graph: &mut BracketGraph) {
    let mut touched = BTreeSet::new();
    for i in 0..graph.matches.len() {
        for side in [Side::Left, Side::Right] {
            let source = graph.matches[i].slot(side).source;
            if let SlotSource::Competitor(c) = source {
                let to = SlotRef {
                    match_id: MatchId(i),
                    side,
                };
                graph.fill_slot(to, c, &mut touched);
            }
        }
    }
}
