//! Shared helpers for the integration tests.
#![allow(dead_code)]

use bracket_engine::{generate, Bracket, BracketGraph, Competitor, CompetitorId, Match};

pub fn roster(n: usize) -> Vec<Competitor> {
    (0..n).map(|i| Competitor::new(format!("P{i}"))).collect()
}

pub fn bracket(n: usize) -> (Vec<Competitor>, BracketGraph) {
    let competitors = roster(n);
    let graph = generate(&competitors).unwrap();
    (competitors, graph)
}

/// Better seed wins.
pub fn favourite(graph: &BracketGraph, m: &Match) -> CompetitorId {
    let (a, b) = m.competitors().unwrap();
    if graph.seed_of(a) < graph.seed_of(b) {
        a
    } else {
        b
    }
}

/// Favourites win everywhere except the grand final(s), which the loser-bracket side takes.
pub fn underdog_grand_final(graph: &BracketGraph, m: &Match) -> CompetitorId {
    if m.bracket == Bracket::Placement {
        m.slot_b.competitor.unwrap()
    } else {
        favourite(graph, m)
    }
}

/// Report ready matches in arena order until nothing is ready.
pub fn play_out<F>(graph: &mut BracketGraph, mut pick: F)
where
    F: FnMut(&BracketGraph, &Match) -> CompetitorId,
{
    while let Some(m) = graph.ready_matches().first().map(|m| (*m).clone()) {
        let winner = pick(graph, &m);
        graph.report_result(m.id, winner).unwrap();
    }
}

pub fn find<'a>(graph: &'a BracketGraph, bracket: Bracket, round: u32, number: u32) -> &'a Match {
    graph
        .matches
        .iter()
        .find(|m| m.bracket == bracket && m.round == round && m.match_number == number)
        .unwrap()
}
