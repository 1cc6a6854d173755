//! Integration tests for bracket generation: seeding, byes, loser-bracket shape.

mod common;

use bracket_engine::{generate, Bracket, Competitor, EngineError, MatchState, SlotSource};
use common::{bracket, find, roster};

#[test]
fn generate_rejects_empty_roster() {
    assert!(matches!(generate(&[]), Err(EngineError::InvalidInput(_))));
}

#[test]
fn generate_rejects_duplicate_ids() {
    let mut competitors = roster(3);
    competitors[2].id = competitors[0].id;
    assert!(matches!(
        generate(&competitors),
        Err(EngineError::InvalidInput(_))
    ));
}

#[test]
fn single_competitor_has_no_matches_and_is_complete() {
    let (competitors, graph) = bracket(1);
    assert!(graph.matches.is_empty());
    assert!(graph.is_complete());
    assert_eq!(graph.champion(), Some(competitors[0].id));
}

#[test]
fn two_competitors_play_one_final() {
    let (competitors, graph) = bracket(2);
    assert_eq!(graph.matches.len(), 1);
    assert_eq!(graph.loser_rounds, 0);
    assert!(graph.matches_in(Bracket::Loser).is_empty());
    let m = &graph.matches[0];
    assert_eq!(graph.grand_final, Some(m.id));
    assert_eq!(m.description, "Final");
    assert_eq!(
        m.competitors(),
        Some((competitors[0].id, competitors[1].id))
    );
    assert_eq!(m.state(), MatchState::Ready);
}

#[test]
fn four_competitors_seed_one_against_four() {
    let competitors: Vec<Competitor> = ["A", "B", "C", "D"].into_iter().map(Competitor::new).collect();
    let graph = generate(&competitors).unwrap();
    let ids: Vec<_> = competitors.iter().map(|c| c.id).collect();

    let first = find(&graph, Bracket::Winner, 1, 1);
    let second = find(&graph, Bracket::Winner, 1, 2);
    assert_eq!(first.competitors(), Some((ids[0], ids[3])));
    assert_eq!(second.competitors(), Some((ids[1], ids[2])));

    // W1 x2, W2, L1, L2, grand final
    assert_eq!(graph.matches.len(), 6);
    assert_eq!(graph.loser_rounds, 2);
    assert!(graph.matches.iter().all(|m| !m.is_bye));
}

#[test]
fn three_competitors_get_one_bye_and_one_real_loser_match() {
    let (competitors, graph) = bracket(3);
    let top = competitors[0].id;

    let byes: Vec<_> = graph.matches.iter().filter(|m| m.is_bye).collect();
    assert_eq!(byes.len(), 2);
    let opening_bye = find(&graph, Bracket::Winner, 1, 1);
    assert!(opening_bye.is_bye);
    assert_eq!(opening_bye.winner_id, Some(top));
    assert_eq!(opening_bye.loser_id(), None);

    // Top seed already waits in the winner-bracket final.
    let winner_final = find(&graph, Bracket::Winner, 2, 1);
    assert_eq!(winner_final.slot_a.competitor, Some(top));
    assert_eq!(winner_final.state(), MatchState::Waiting);

    let real_loser_matches: Vec<_> = graph
        .matches_in(Bracket::Loser)
        .into_iter()
        .filter(|m| !m.is_bye)
        .collect();
    assert_eq!(real_loser_matches.len(), 1);
    assert_eq!(real_loser_matches[0].description, "Loser Bracket Final");
}

#[test]
fn contested_match_count_is_two_per_eliminated_competitor() {
    for n in 3..=70 {
        let (_, graph) = bracket(n);
        let contested = graph.matches.iter().filter(|m| !m.is_bye).count();
        assert_eq!(contested, 2 * n - 2, "n = {}", n);
    }
}

#[test]
fn generated_graphs_pass_validation_up_to_512() {
    for n in (1..=80).chain([100, 127, 128, 129, 255, 300, 511, 512]) {
        let (_, graph) = bracket(n);
        graph.validate().unwrap_or_else(|e| panic!("n = {}: {}", n, e));
    }
}

#[test]
fn loser_bracket_has_two_rounds_per_extra_winner_round() {
    for (n, winner_rounds) in [(3, 2), (4, 2), (5, 3), (8, 3), (9, 4), (16, 4), (17, 5)] {
        let (_, graph) = bracket(n);
        assert_eq!(graph.winner_rounds, winner_rounds);
        assert_eq!(graph.loser_rounds, 2 * (winner_rounds - 1));
    }
}

#[test]
fn byes_only_decided_in_opening_round_at_generation() {
    let (_, graph) = bracket(11);
    for m in &graph.matches {
        if m.state() == MatchState::Decided {
            assert!(m.is_bye);
            assert_eq!((m.bracket, m.round), (Bracket::Winner, 1));
        }
        if m.is_bye {
            let empty = [&m.slot_a, &m.slot_b].iter().filter(|s| s.is_empty()).count();
            assert_eq!(empty, 1);
        }
    }
}

#[test]
fn generation_is_deterministic() {
    let competitors = roster(13);
    assert_eq!(generate(&competitors).unwrap(), generate(&competitors).unwrap());
}

#[test]
fn first_drop_round_is_crossed() {
    let (_, graph) = bracket(8);
    let upper = find(&graph, Bracket::Winner, 2, 1).id;
    let lower = find(&graph, Bracket::Winner, 2, 2).id;
    assert_eq!(
        find(&graph, Bracket::Loser, 2, 1).slot_b.source,
        SlotSource::LoserOf(lower)
    );
    assert_eq!(
        find(&graph, Bracket::Loser, 2, 2).slot_b.source,
        SlotSource::LoserOf(upper)
    );
}

#[test]
fn descriptions_name_bracket_and_round() {
    let (_, graph) = bracket(8);
    assert_eq!(find(&graph, Bracket::Winner, 1, 1).description, "Winner Bracket Round 1");
    assert_eq!(find(&graph, Bracket::Winner, 3, 1).description, "Winner Bracket Final");
    assert_eq!(find(&graph, Bracket::Loser, 1, 2).description, "Loser Bracket Round 1");
    assert_eq!(find(&graph, Bracket::Loser, 4, 1).description, "Loser Bracket Final");
    assert_eq!(find(&graph, Bracket::Placement, 1, 1).description, "Grand Final");
}

#[test]
fn void_loser_matches_are_removed() {
    // Five entrants leave three byes in round 1; the lower loser-bracket pair has nobody.
    let (_, graph) = bracket(5);
    assert_eq!(graph.matches.iter().filter(|m| m.bracket == Bracket::Loser && m.round == 1).count(), 1);
    for (i, m) in graph.matches.iter().enumerate() {
        assert_eq!(m.id.index(), i);
        assert!(!(m.slot_a.is_empty() && m.slot_b.is_empty()));
    }
}
