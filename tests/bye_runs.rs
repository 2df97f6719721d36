//! Integration tests for bye auto-advancement: padding byes, withdrawals,
//! and chained bye matchups.

use drift_tournament_web::{
    advance_qualifying, auto_advance_bye_runs, record_qualifying_score, tournament_start,
    withdraw_driver, Tournament, TournamentState,
};

fn battles_tournament(drivers: usize, judges: usize) -> Tournament {
    let mut t = Tournament::new("Battle Night", "organizer");
    t.set_qualifying(false, 0).unwrap();
    t.set_battles(true, 16).unwrap();
    for i in 1..=drivers {
        t.add_driver(format!("D{i}")).unwrap();
    }
    for i in 1..=judges {
        t.add_judge(format!("J{i}"), 10.0).unwrap();
    }
    tournament_start(&mut t).unwrap();
    t
}

#[test]
fn padding_bye_is_skipped_at_seeding_with_synthesized_votes() {
    // 3 drivers pad to a 4-bracket: top seed draws the bye in round 1
    let mut t = battles_tournament(3, 3);
    assert_eq!(t.drivers.len(), 4);
    assert_eq!(t.battles.len(), 3);

    let d1 = t.drivers[0].id;
    let first = &t.battles[0];
    assert_eq!(first.winner, Some(d1));
    // one synthesized vote per judge, none of them OMT
    assert_eq!(first.votes.len(), 3);
    assert!(first.votes.iter().all(|v| v.winner == Some(d1) && !v.omt));

    // winner already propagated into the final; next up is the real matchup
    assert_eq!(t.battles[2].driver_left, Some(d1));
    assert_eq!(t.next_battle, Some(t.battles[1].id));
}

#[test]
fn one_withdrawal_can_chain_through_several_battles() {
    // bracket: D1 vs D4, D2 vs D3. Withdrawing D3 touches a later battle so
    // nothing advances yet; withdrawing D4 then resolves both round-1
    // battles in a single sweep.
    let mut t = battles_tournament(4, 1);
    let (d1, d2, d3, d4) = (
        t.drivers[0].id,
        t.drivers[1].id,
        t.drivers[2].id,
        t.drivers[3].id,
    );

    withdraw_driver(&mut t, d3).unwrap();
    assert_eq!(t.battles[0].winner, None);

    withdraw_driver(&mut t, d4).unwrap();
    assert_eq!(t.battles[0].winner, Some(d1));
    assert_eq!(t.battles[1].winner, Some(d2));

    // final has two real drivers, so the sweep stops there
    let final_battle = &t.battles[2];
    assert_eq!(final_battle.driver_left, Some(d1));
    assert_eq!(final_battle.driver_right, Some(d2));
    assert_eq!(final_battle.winner, None);
    assert_eq!(t.next_battle, Some(final_battle.id));
    assert_eq!(t.state, TournamentState::Battles);
}

#[test]
fn withdrawing_the_left_driver_advances_the_right() {
    let mut t = battles_tournament(2, 1);
    let (d1, d2) = (t.drivers[0].id, t.drivers[1].id);

    withdraw_driver(&mut t, d1).unwrap();

    assert_eq!(t.battles[0].winner, Some(d2));
    assert_eq!(t.battles[0].votes.len(), 1);
    assert_eq!(t.state, TournamentState::End);
    assert_eq!(t.driver(d2).unwrap().finishing_position, Some(1));
    // withdrawn drivers are byes and get no finishing position
    assert_eq!(t.driver(d1).unwrap().finishing_position, None);
}

#[test]
fn both_byes_fall_to_the_left_slot() {
    let mut t = battles_tournament(2, 1);
    let (d1, d2) = (t.drivers[0].id, t.drivers[1].id);

    // withdraw both without advancing in between, then sweep
    t.driver_mut(d1).unwrap().withdraw();
    t.driver_mut(d2).unwrap().withdraw();
    auto_advance_bye_runs(&mut t).unwrap();

    assert_eq!(t.battles[0].winner, Some(d1));
    assert_eq!(t.state, TournamentState::End);
}

#[test]
fn a_single_entrant_wins_outright() {
    let mut t = battles_tournament(1, 1);
    let d1 = t.drivers[0].id;

    assert_eq!(t.battles.len(), 1);
    assert_eq!(t.state, TournamentState::End);
    assert_eq!(t.battles[0].winner, Some(d1));
    assert_eq!(t.driver(d1).unwrap().finishing_position, Some(1));
}

#[test]
fn withdrawal_during_qualifying_skips_laps_and_seeding() {
    let mut t = Tournament::new("Club Night", "organizer");
    t.set_qualifying(true, 1).unwrap();
    t.set_battles(true, 16).unwrap();
    for name in ["A", "B", "C"] {
        t.add_driver(name).unwrap();
    }
    t.add_judge("J", 100.0).unwrap();
    tournament_start(&mut t).unwrap();
    let judge_id = t.judges[0].id;
    let c = t.drivers[2].id;

    record_qualifying_score(&mut t, judge_id, 80.0).unwrap(); // A
    advance_qualifying(&mut t).unwrap();
    withdraw_driver(&mut t, c).unwrap();
    record_qualifying_score(&mut t, judge_id, 70.0).unwrap(); // B
    advance_qualifying(&mut t).unwrap();

    // C's unscored lap no longer blocks completion, and C is not seeded
    assert_eq!(t.state, TournamentState::Battles);
    assert_eq!(t.battles.len(), 1);
    let battle = &t.battles[0];
    assert!(!battle.has_driver(c));
    assert_eq!(t.driver(c).unwrap().qualifying_position, None);
}
