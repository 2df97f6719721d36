//! End-to-end runs: full bracket, qualifying into battles, and degenerate
//! configurations.

use drift_tournament_web::{
    advance_qualifying, cast_battle_vote, record_qualifying_score, tournament_advance_battles,
    tournament_start, BattleOutcome, DriverId, Tournament, TournamentState, ROUND_FINAL,
};

/// Every judge votes for the left driver of the current battle, then the
/// battle is advanced. Returns the winner.
fn vote_left_and_advance(t: &mut Tournament) -> DriverId {
    let battle = t.battle(t.next_battle.unwrap()).unwrap();
    let left = battle.driver_left.unwrap();
    let judge_ids: Vec<_> = t.judges.iter().map(|j| j.id).collect();
    for judge_id in judge_ids {
        cast_battle_vote(t, judge_id, Some(left), false).unwrap();
    }
    match tournament_advance_battles(t).unwrap() {
        BattleOutcome::Advanced { winner } => winner,
        BattleOutcome::OneMoreTime => panic!("unanimous vote cannot tie"),
    }
}

fn finishing_position(t: &Tournament, name: &str) -> u32 {
    t.drivers
        .iter()
        .find(|d| d.name == name)
        .and_then(|d| d.finishing_position)
        .unwrap()
}

#[test]
fn eight_drivers_battle_through_a_three_round_bracket() {
    let mut t = Tournament::new("Championship Round", "organizer");
    t.set_qualifying(false, 0).unwrap();
    t.set_battles(true, 16).unwrap();
    for i in 1..=8 {
        t.add_driver(format!("D{i}")).unwrap();
    }
    for i in 1..=3 {
        t.add_judge(format!("J{i}"), 10.0).unwrap();
    }
    tournament_start(&mut t).unwrap();

    // 8-driver bracket: 4 + 2 + 1 battles, last one flagged as the final
    assert_eq!(t.state, TournamentState::Battles);
    assert_eq!(t.battles.len(), 7);
    let rounds: Vec<u32> = t.battles.iter().map(|b| b.round).collect();
    assert_eq!(rounds, vec![1, 1, 1, 1, 2, 2, ROUND_FINAL]);

    let mut advances = 0;
    while t.state == TournamentState::Battles {
        vote_left_and_advance(&mut t);
        advances += 1;
        // END is only reached when every battle has a winner
        let resolved = t.battles.iter().filter(|b| b.winner.is_some()).count();
        if t.state == TournamentState::End {
            assert_eq!(resolved, 7);
        } else {
            assert!(resolved < 7);
        }
    }
    assert_eq!(advances, 7);
    assert_eq!(t.next_battle, None);

    // left always won, so seeding order decides everything:
    // D1 beats D8, D4, D2; D2 beats D7, D3
    assert_eq!(finishing_position(&t, "D1"), 1);
    assert_eq!(finishing_position(&t, "D2"), 2);
    assert_eq!(finishing_position(&t, "D3"), 3);
    assert_eq!(finishing_position(&t, "D4"), 4);
    assert_eq!(finishing_position(&t, "D5"), 5);
    assert_eq!(finishing_position(&t, "D6"), 6);
    assert_eq!(finishing_position(&t, "D7"), 7);
    assert_eq!(finishing_position(&t, "D8"), 8);

    // total order over all real drivers
    let mut positions: Vec<u32> = t
        .real_drivers()
        .map(|d| d.finishing_position.unwrap())
        .collect();
    positions.sort_unstable();
    assert_eq!(positions, (1..=8).collect::<Vec<u32>>());
}

#[test]
fn qualifying_results_seed_the_bracket() {
    let mut t = Tournament::new("Round 2", "organizer");
    t.set_qualifying(true, 1).unwrap();
    t.set_battles(true, 16).unwrap();
    for name in ["A", "B", "C", "D"] {
        t.add_driver(name).unwrap();
    }
    t.add_judge("J", 100.0).unwrap();
    tournament_start(&mut t).unwrap();
    let judge_id = t.judges[0].id;

    // lap order follows registration: A, B, C, D
    for score in [90.0, 95.0, 70.0, 80.0] {
        record_qualifying_score(&mut t, judge_id, score).unwrap();
        advance_qualifying(&mut t).unwrap();
    }

    // B tops qualifying and draws the lowest seed in round 1
    assert_eq!(t.state, TournamentState::Battles);
    let pos = |name: &str| {
        t.drivers
            .iter()
            .find(|d| d.name == name)
            .and_then(|d| d.qualifying_position)
            .unwrap()
    };
    assert_eq!(pos("B"), 1);
    assert_eq!(pos("A"), 2);
    assert_eq!(pos("D"), 3);
    assert_eq!(pos("C"), 4);

    let id = |name: &str| t.drivers.iter().find(|d| d.name == name).unwrap().id;
    assert_eq!(t.battles[0].driver_left, Some(id("B")));
    assert_eq!(t.battles[0].driver_right, Some(id("C")));
    assert_eq!(t.battles[1].driver_left, Some(id("A")));
    assert_eq!(t.battles[1].driver_right, Some(id("D")));

    while t.state == TournamentState::Battles {
        vote_left_and_advance(&mut t);
    }

    // B beat C then A; round-1 losers rank by qualifying position
    assert_eq!(finishing_position(&t, "B"), 1);
    assert_eq!(finishing_position(&t, "A"), 2);
    assert_eq!(finishing_position(&t, "D"), 3);
    assert_eq!(finishing_position(&t, "C"), 4);
}

#[test]
fn disabling_both_phases_ends_the_tournament_at_start() {
    let mut t = Tournament::new("Meet & Greet", "organizer");
    t.set_qualifying(false, 0).unwrap();
    t.set_battles(false, 16).unwrap();
    for name in ["A", "B", "C"] {
        t.add_driver(name).unwrap();
    }
    tournament_start(&mut t).unwrap();

    assert_eq!(t.state, TournamentState::End);
    assert!(t.battles.is_empty());
    assert_eq!(finishing_position(&t, "A"), 1);
    assert_eq!(finishing_position(&t, "B"), 2);
    assert_eq!(finishing_position(&t, "C"), 3);
}

#[test]
fn rating_request_is_only_valid_once_ended() {
    let mut t = Tournament::new("Meet & Greet", "organizer");
    t.set_qualifying(false, 0).unwrap();
    t.set_battles(false, 16).unwrap();
    t.add_driver("A").unwrap();

    assert!(t.request_rating().is_err());
    tournament_start(&mut t).unwrap();
    t.request_rating().unwrap();
    assert!(t.rating_requested);
}
