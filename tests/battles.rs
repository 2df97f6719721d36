//! Integration tests for battle voting, resolution, and OMT tie-breaks.

use drift_tournament_web::{
    cast_battle_vote, commit_battle_winner, tournament_advance_battles, tournament_start, Battle,
    BattleOutcome, Bracket, DriverId, Tournament, TournamentDriver, TournamentError,
    TournamentJudge, TournamentState,
};

/// Battles-only tournament, already started.
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

fn current_sides(t: &Tournament) -> (DriverId, DriverId) {
    let b = t.battle(t.next_battle.unwrap()).unwrap();
    (b.driver_left.unwrap(), b.driver_right.unwrap())
}

#[test]
fn two_to_one_majority_resolves_the_battle() {
    let mut t = battles_tournament(4, 3);
    let (left, right) = current_sides(&t);
    let judges: Vec<_> = t.judges.iter().map(|j| j.id).collect();

    cast_battle_vote(&mut t, judges[0], Some(left), false).unwrap();
    cast_battle_vote(&mut t, judges[1], Some(left), false).unwrap();
    cast_battle_vote(&mut t, judges[2], Some(right), false).unwrap();

    let outcome = tournament_advance_battles(&mut t).unwrap();
    assert_eq!(outcome, BattleOutcome::Advanced { winner: left });
    assert_eq!(t.battles[0].winner, Some(left));
    assert_eq!(t.next_battle, Some(t.battles[1].id));
}

#[test]
fn split_vote_with_omt_requires_one_more_time() {
    let mut t = battles_tournament(4, 3);
    let (left, right) = current_sides(&t);
    let first = t.next_battle.unwrap();
    let judges: Vec<_> = t.judges.iter().map(|j| j.id).collect();

    cast_battle_vote(&mut t, judges[0], Some(left), false).unwrap();
    cast_battle_vote(&mut t, judges[1], Some(right), false).unwrap();
    cast_battle_vote(&mut t, judges[2], None, true).unwrap();

    let outcome = tournament_advance_battles(&mut t).unwrap();
    assert_eq!(outcome, BattleOutcome::OneMoreTime);
    // battle unresolved, votes wiped, pointer unchanged: re-judge it
    assert_eq!(t.battles[0].winner, None);
    assert!(t.battles[0].votes.is_empty());
    assert_eq!(t.next_battle, Some(first));

    // the re-run is decisive
    for judge_id in judges {
        cast_battle_vote(&mut t, judge_id, Some(left), false).unwrap();
    }
    let outcome = tournament_advance_battles(&mut t).unwrap();
    assert_eq!(outcome, BattleOutcome::Advanced { winner: left });
}

#[test]
fn omt_heavy_panel_does_not_resolve() {
    let mut t = battles_tournament(4, 3);
    let (left, _) = current_sides(&t);
    let judges: Vec<_> = t.judges.iter().map(|j| j.id).collect();

    cast_battle_vote(&mut t, judges[0], Some(left), false).unwrap();
    cast_battle_vote(&mut t, judges[1], None, true).unwrap();
    cast_battle_vote(&mut t, judges[2], None, true).unwrap();

    assert_eq!(
        tournament_advance_battles(&mut t).unwrap(),
        BattleOutcome::OneMoreTime
    );
}

#[test]
fn majority_with_one_omt_still_resolves() {
    let mut t = battles_tournament(4, 3);
    let (left, _) = current_sides(&t);
    let judges: Vec<_> = t.judges.iter().map(|j| j.id).collect();

    cast_battle_vote(&mut t, judges[0], Some(left), false).unwrap();
    cast_battle_vote(&mut t, judges[1], Some(left), false).unwrap();
    cast_battle_vote(&mut t, judges[2], None, true).unwrap();

    assert_eq!(
        tournament_advance_battles(&mut t).unwrap(),
        BattleOutcome::Advanced { winner: left }
    );
}

#[test]
fn advancing_before_all_judges_voted_fails_loudly() {
    let mut t = battles_tournament(4, 3);
    let (left, _) = current_sides(&t);
    let judges: Vec<_> = t.judges.iter().map(|j| j.id).collect();

    cast_battle_vote(&mut t, judges[0], Some(left), false).unwrap();
    cast_battle_vote(&mut t, judges[1], Some(left), false).unwrap();

    assert_eq!(
        tournament_advance_battles(&mut t),
        Err(TournamentError::JudgingIncomplete {
            voted: 2,
            judges: 3
        })
    );
}

#[test]
fn vote_must_name_a_driver_in_the_battle() {
    let mut t = battles_tournament(4, 3);
    let outsider = t.battles[1].driver_left.unwrap();
    let judge_id = t.judges[0].id;
    assert_eq!(
        cast_battle_vote(&mut t, judge_id, Some(outsider), false),
        Err(TournamentError::DriverNotFound(outsider))
    );
}

#[test]
fn revoting_replaces_the_previous_vote() {
    let mut t = battles_tournament(4, 3);
    let (left, right) = current_sides(&t);
    let judge_id = t.judges[0].id;

    cast_battle_vote(&mut t, judge_id, Some(right), false).unwrap();
    cast_battle_vote(&mut t, judge_id, Some(left), false).unwrap();

    let battle = t.battle(t.next_battle.unwrap()).unwrap();
    assert_eq!(battle.votes.len(), 1);
    assert_eq!(battle.votes[0].winner, Some(left));
}

#[test]
fn advance_is_rejected_once_the_tournament_ended() {
    let mut t = battles_tournament(2, 1);
    let (left, _) = current_sides(&t);
    let judge_id = t.judges[0].id;
    cast_battle_vote(&mut t, judge_id, Some(left), false).unwrap();
    tournament_advance_battles(&mut t).unwrap();

    assert_eq!(t.state, TournamentState::End);
    assert_eq!(
        tournament_advance_battles(&mut t),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn resolver_returns_none_on_an_even_split() {
    let driver_a = TournamentDriver::new("A", 1);
    let driver_b = TournamentDriver::new("B", 2);
    let judge_a = TournamentJudge::new("JA", 10.0);
    let judge_b = TournamentJudge::new("JB", 10.0);

    let mut battle = Battle::new(1, Bracket::Upper);
    battle.driver_left = Some(driver_a.id);
    battle.driver_right = Some(driver_b.id);
    battle.record_vote(judge_a.id, Some(driver_a.id), false);
    battle.record_vote(judge_b.id, Some(driver_b.id), false);

    assert_eq!(commit_battle_winner(&mut battle, 2), None);
    assert_eq!(battle.winner, None);

    battle.clear_votes();
    battle.record_vote(judge_a.id, Some(driver_b.id), false);
    battle.record_vote(judge_b.id, Some(driver_b.id), false);
    assert_eq!(commit_battle_winner(&mut battle, 2), Some(driver_b.id));
    assert_eq!(battle.winner, Some(driver_b.id));
}
