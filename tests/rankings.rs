//! Integration tests for final placements and tie groups.

mod common;

use bracket_engine::{compute_rankings, get_rankings, EngineError, MatchId, Placement};
use common::{bracket, favourite, play_out, underdog_grand_final};

#[test]
fn rankings_refused_before_completion() {
    let (_, mut graph) = bracket(4);
    assert_eq!(get_rankings(&graph), Err(EngineError::TournamentNotComplete));
    graph
        .report_result(MatchId(0), graph.competitors[0])
        .unwrap();
    assert_eq!(
        compute_rankings(&graph),
        Err(EngineError::TournamentNotComplete)
    );
}

#[test]
fn single_competitor_is_first() {
    let (competitors, graph) = bracket(1);
    let rankings = get_rankings(&graph).unwrap();
    assert_eq!(rankings.len(), 1);
    assert_eq!(rankings.first(), Some(competitors[0].id));
    assert!(rankings.ties.is_empty());
}

#[test]
fn two_competitors_fill_first_and_second() {
    let (competitors, mut graph) = bracket(2);
    graph
        .report_result(MatchId(0), competitors[1].id)
        .unwrap();
    let rankings = get_rankings(&graph).unwrap();
    assert_eq!(rankings.len(), 2);
    assert_eq!(rankings.first(), Some(competitors[1].id));
    assert_eq!(rankings.second(), Some(competitors[0].id));
}

#[test]
fn favourites_finish_in_seed_order() {
    for n in [3, 4, 5] {
        let (competitors, mut graph) = bracket(n);
        play_out(&mut graph, favourite);
        let rankings = get_rankings(&graph).unwrap();
        assert_eq!(rankings.len(), n);
        assert!(rankings.ties.is_empty(), "n = {}", n);
        for (i, c) in competitors.iter().enumerate() {
            assert_eq!(
                rankings.get(Placement::from_rank(i + 1).unwrap()),
                Some(c.id),
                "n = {}",
                n
            );
        }
    }
}

#[test]
fn eight_competitors_share_fifth_and_seventh() {
    let (competitors, mut graph) = bracket(8);
    play_out(&mut graph, favourite);
    let rankings = get_rankings(&graph).unwrap();
    let ids: Vec<_> = competitors.iter().map(|c| c.id).collect();

    assert_eq!(rankings.len(), 8);
    for (placement, &id) in Placement::ALL.iter().zip(&ids) {
        assert_eq!(rankings.get(*placement), Some(id));
    }
    assert_eq!(
        rankings.ties,
        vec![
            vec![Placement::Fifth, Placement::Sixth],
            vec![Placement::Seventh, Placement::Eighth],
        ]
    );
    assert_eq!(
        rankings.tie_group(Placement::Sixth),
        Some(&[Placement::Fifth, Placement::Sixth][..])
    );
    assert_eq!(rankings.tie_group(Placement::Third), None);
    assert_eq!(rankings.placement_of(ids[6]), Some(Placement::Seventh));
}

#[test]
fn reset_final_decides_first_and_second() {
    let (competitors, mut graph) = bracket(4);
    play_out(&mut graph, underdog_grand_final);
    assert!(graph.reset_final.is_some());
    let rankings = get_rankings(&graph).unwrap();
    assert_eq!(rankings.first(), Some(competitors[1].id));
    assert_eq!(rankings.second(), Some(competitors[0].id));
    assert_eq!(rankings.get(Placement::Third), Some(competitors[2].id));
    assert_eq!(rankings.get(Placement::Fourth), Some(competitors[3].id));
}

#[test]
fn large_bracket_stops_at_eighth() {
    let (_, mut graph) = bracket(16);
    play_out(&mut graph, favourite);
    let rankings = get_rankings(&graph).unwrap();
    assert_eq!(rankings.len(), 8);
    assert!(rankings.get(Placement::Eighth).is_some());
    assert_eq!(rankings.first(), Some(graph.competitors[0]));
}

#[test]
fn placements_are_contiguous_and_distinct() {
    for n in 2..=40 {
        for pick in [favourite, underdog_grand_final] {
            let (_, mut graph) = bracket(n);
            play_out(&mut graph, pick);
            let rankings = get_rankings(&graph).unwrap();

            assert!(rankings.len() <= n.min(8));
            let keys: Vec<usize> = rankings.places.keys().map(|p| p.rank()).collect();
            assert_eq!(keys, (1..=keys.len()).collect::<Vec<_>>(), "n = {}", n);

            let mut placed: Vec<_> = rankings.places.values().collect();
            placed.sort();
            placed.dedup();
            assert_eq!(placed.len(), rankings.len());

            for group in &rankings.ties {
                assert!(group.len() > 1);
                for pair in group.windows(2) {
                    assert_eq!(pair[0].rank() + 1, pair[1].rank());
                }
                assert!(group.iter().all(|p| rankings.get(*p).is_some()));
            }
        }
    }
}

#[test]
fn rankings_serialize_with_snake_case_keys() {
    let (_, mut graph) = bracket(8);
    play_out(&mut graph, favourite);
    let json = serde_json::to_value(get_rankings(&graph).unwrap()).unwrap();
    assert!(json["places"]["first"].is_string());
    assert_eq!(json["ties"][0], serde_json::json!(["fifth", "sixth"]));
}
