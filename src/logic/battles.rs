//! Battle phase: voting, resolution, advancement, and bye auto-advancement.

use crate::logic::seeding::seed_battles;
use crate::logic::standings::set_tournament_finishing_positions;
use crate::models::{
    Battle, BattleId, BattleOutcome, DriverId, JudgeId, Tournament, TournamentError,
    TournamentJudge, TournamentState,
};

/// Record one judge's vote on the current battle. Unless `omt`, the vote
/// must name one of the battle's two drivers. Re-submitting replaces the
/// judge's previous vote.
pub fn cast_battle_vote(
    tournament: &mut Tournament,
    judge_id: JudgeId,
    winner: Option<DriverId>,
    omt: bool,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Battles {
        return Err(TournamentError::InvalidState);
    }
    if tournament.judge(judge_id).is_none() {
        return Err(TournamentError::JudgeNotFound(judge_id));
    }
    let battle_id = tournament.next_battle.ok_or(TournamentError::InvalidState)?;
    let battle = tournament
        .battle_mut(battle_id)
        .ok_or(TournamentError::BattleNotFound(battle_id))?;
    if battle.winner.is_some() {
        return Err(TournamentError::InvalidState);
    }
    let winner = if omt { None } else { winner };
    if !omt {
        let voted = winner.ok_or(TournamentError::InvalidState)?;
        if !battle.has_driver(voted) {
            return Err(TournamentError::DriverNotFound(voted));
        }
    }
    battle.record_vote(judge_id, winner, omt);
    Ok(())
}

/// Precondition shared by every advance path: the full judge roster has
/// voted on the battle.
fn assert_all_judges_voted(
    battle: &Battle,
    judges: &[TournamentJudge],
) -> Result<(), TournamentError> {
    let voted = judges
        .iter()
        .filter(|j| battle.votes.iter().any(|v| v.judge_id == j.id))
        .count();
    if voted < judges.len() {
        return Err(TournamentError::JudgingIncomplete {
            voted,
            judges: judges.len(),
        });
    }
    Ok(())
}

/// Tally the votes on a battle. A driver wins only with a strict majority of
/// the full judge roster; OMT votes count toward no driver, so an even split
/// or an indecisive panel resolves nothing. On a win the battle's winner is
/// persisted and returned; `None` means a tie-break run is required and the
/// caller must clear the votes and re-judge.
///
/// Must not be called on an already-resolved battle; callers check
/// `battle.winner.is_none()` first.
pub fn commit_battle_winner(battle: &mut Battle, judge_count: usize) -> Option<DriverId> {
    let sides = [battle.driver_left, battle.driver_right];
    for candidate in sides.into_iter().flatten() {
        let votes = battle
            .votes
            .iter()
            .filter(|v| !v.omt && v.winner == Some(candidate))
            .count();
        if votes * 2 > judge_count {
            battle.winner = Some(candidate);
            return Some(candidate);
        }
    }
    None
}

/// Battles still needing a winner, in judging order: round asc (the final's
/// reserved number sorts last), bracket asc, then creation order.
fn next_unresolved_battle(tournament: &Tournament) -> Option<BattleId> {
    let mut order: Vec<usize> = (0..tournament.battles.len()).collect();
    order.sort_by_key(|&i| {
        let b = &tournament.battles[i];
        (b.round, b.bracket, i)
    });
    order
        .into_iter()
        .map(|i| &tournament.battles[i])
        .find(|b| b.winner.is_none())
        .map(|b| b.id)
}

/// Round and position-within-round of a battle (battles within a round are
/// stored in creation order).
fn battle_position(tournament: &Tournament, battle_id: BattleId) -> Option<(u32, usize)> {
    let round = tournament.battle(battle_id)?.round;
    let pos = tournament
        .battles
        .iter()
        .filter(|b| b.round == round)
        .position(|b| b.id == battle_id)?;
    Some((round, pos))
}

/// Place a resolved battle's winner into its next-round slot: battle `p` of
/// a round feeds battle `p / 2` one round up, left side when `p` is even.
fn propagate_winner(tournament: &mut Tournament, battle_id: BattleId, winner: DriverId) {
    let (round, pos) = match battle_position(tournament, battle_id) {
        Some(v) => v,
        None => return,
    };
    let mut rounds: Vec<u32> = tournament.battles.iter().map(|b| b.round).collect();
    rounds.sort_unstable();
    rounds.dedup();
    let next_round = match rounds.into_iter().find(|&r| r > round) {
        Some(r) => r,
        // the final feeds nothing
        None => return,
    };
    let target = tournament
        .battles
        .iter_mut()
        .filter(|b| b.round == next_round)
        .nth(pos / 2);
    if let Some(b) = target {
        if pos % 2 == 0 {
            b.driver_left = Some(winner);
        } else {
            b.driver_right = Some(winner);
        }
    }
}

/// Commit the current battle and move the pointer. Vote-count preconditions
/// are the caller's job. On the last battle the phase ends and final
/// standings are computed.
fn resolve_current_battle(tournament: &mut Tournament) -> Result<BattleOutcome, TournamentError> {
    let battle_id = tournament.next_battle.ok_or(TournamentError::InvalidState)?;
    let judge_count = tournament.judges.len();
    let battle = tournament
        .battle_mut(battle_id)
        .ok_or(TournamentError::BattleNotFound(battle_id))?;
    if battle.winner.is_some() {
        return Err(TournamentError::InvalidState);
    }
    match commit_battle_winner(battle, judge_count) {
        None => {
            battle.clear_votes();
            Ok(BattleOutcome::OneMoreTime)
        }
        Some(winner) => {
            propagate_winner(tournament, battle_id, winner);
            tournament.next_battle = next_unresolved_battle(tournament);
            if tournament.next_battle.is_none() {
                finish_battles(tournament);
            }
            Ok(BattleOutcome::Advanced { winner })
        }
    }
}

/// Enter the battle phase: seed the bracket, then skip any leading byes.
pub(crate) fn enter_battles(tournament: &mut Tournament) -> Result<(), TournamentError> {
    seed_battles(tournament)?;
    tournament.state = TournamentState::Battles;
    auto_advance_bye_runs(tournament)
}

/// End the battle phase: clear the pointer and compute final standings.
fn finish_battles(tournament: &mut Tournament) {
    tournament.next_battle = None;
    tournament.state = TournamentState::End;
    set_tournament_finishing_positions(tournament);
}

/// Advance the current battle: verify the full roster voted, commit the
/// winner (or clear the votes on a tie), move the pointer, then auto-advance
/// any bye matchups that follow.
pub fn tournament_advance_battles(
    tournament: &mut Tournament,
) -> Result<BattleOutcome, TournamentError> {
    if tournament.state != TournamentState::Battles {
        return Err(TournamentError::InvalidState);
    }
    let battle_id = tournament.next_battle.ok_or(TournamentError::InvalidState)?;
    let battle = tournament
        .battle(battle_id)
        .ok_or(TournamentError::BattleNotFound(battle_id))?;
    if battle.winner.is_some() {
        return Err(TournamentError::InvalidState);
    }
    assert_all_judges_voted(battle, &tournament.judges)?;
    let outcome = resolve_current_battle(tournament)?;
    if tournament.state == TournamentState::Battles {
        if let BattleOutcome::Advanced { .. } = outcome {
            auto_advance_bye_runs(tournament)?;
        }
    }
    Ok(outcome)
}

/// Skip over bye matchups: while the current battle has a bye on either
/// side, synthesize a unanimous judge vote for the surviving driver and
/// advance. Loops because the next battle may itself be a bye pairing —
/// byes chain through early rounds and reappear after withdrawals. Runs
/// after every advancement, not only at seeding time.
pub fn auto_advance_bye_runs(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Battles {
        return Ok(());
    }
    while let Some(battle_id) = tournament.next_battle {
        let battle = tournament
            .battle(battle_id)
            .ok_or(TournamentError::BattleNotFound(battle_id))?;
        let (left, right) = match (battle.driver_left, battle.driver_right) {
            (Some(l), Some(r)) => (l, r),
            // still waiting on a feeder battle; nothing to skip
            _ => return Ok(()),
        };
        let left_bye = tournament.driver(left).map_or(false, |d| d.is_bye);
        let right_bye = tournament.driver(right).map_or(false, |d| d.is_bye);
        if !left_bye && !right_bye {
            return Ok(());
        }
        // the real driver wins; both byes fall to the left slot
        let winner = if left_bye && !right_bye { right } else { left };
        let judge_ids: Vec<JudgeId> = tournament.judges.iter().map(|j| j.id).collect();
        let battle = tournament
            .battle_mut(battle_id)
            .ok_or(TournamentError::BattleNotFound(battle_id))?;
        battle.clear_votes();
        for judge_id in judge_ids {
            battle.record_vote(judge_id, Some(winner), false);
        }
        match resolve_current_battle(tournament)? {
            BattleOutcome::Advanced { .. } => {}
            // unanimous votes only fail to resolve with an empty roster
            BattleOutcome::OneMoreTime => return Ok(()),
        }
        if tournament.state != TournamentState::Battles {
            return Ok(());
        }
    }
    Ok(())
}

/// Withdraw a driver: they become a bye and auto-lose any remaining battles.
/// The bracket is re-walked immediately so a withdrawal in the current
/// matchup advances the opponent without waiting for votes.
pub fn withdraw_driver(
    tournament: &mut Tournament,
    driver_id: DriverId,
) -> Result<(), TournamentError> {
    if !matches!(
        tournament.state,
        TournamentState::Qualifying | TournamentState::Battles
    ) {
        return Err(TournamentError::InvalidState);
    }
    let driver = tournament
        .driver_mut(driver_id)
        .ok_or(TournamentError::DriverNotFound(driver_id))?;
    driver.withdraw();
    auto_advance_bye_runs(tournament)
}
