//! Qualifying phase: lap judging, the next-lap pointer, and position ranking.

use crate::logic::battles::enter_battles;
use crate::logic::scoring::lap_total;
use crate::logic::standings::set_tournament_finishing_positions;
use crate::models::{
    DriverId, JudgeId, LapId, Tournament, TournamentDriver, TournamentError, TournamentState,
};
use rand::Rng;

/// Record one judge's score for the current qualifying lap. Scores are
/// capped by the judge's `points`; re-submitting replaces the judge's
/// previous score.
pub fn record_qualifying_score(
    tournament: &mut Tournament,
    judge_id: JudgeId,
    score: f64,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Qualifying {
        return Err(TournamentError::InvalidState);
    }
    let max = tournament
        .judge(judge_id)
        .ok_or(TournamentError::JudgeNotFound(judge_id))?
        .points;
    if !(0.0..=max).contains(&score) {
        return Err(TournamentError::ScoreOutOfRange { max });
    }
    let lap_id = tournament
        .next_qualifying_lap
        .ok_or(TournamentError::InvalidState)?;
    let lap = tournament
        .lap_mut(lap_id)
        .ok_or(TournamentError::LapNotFound(lap_id))?;
    lap.record_score(judge_id, score);
    Ok(())
}

/// Set a lap's penalty (judging action; Qualifying only).
pub fn set_lap_penalty(
    tournament: &mut Tournament,
    lap_id: LapId,
    penalty: f64,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Qualifying {
        return Err(TournamentError::InvalidState);
    }
    let lap = tournament
        .lap_mut(lap_id)
        .ok_or(TournamentError::LapNotFound(lap_id))?;
    lap.penalty = penalty;
    Ok(())
}

/// The earliest lap nobody has scored yet: rounds ascending, registration
/// order within a round (the order the laps were created in).
pub(crate) fn next_unscored_lap(tournament: &Tournament) -> Option<LapId> {
    let mut drivers: Vec<&TournamentDriver> = tournament.real_drivers().collect();
    drivers.sort_by_key(|d| d.driver_number);
    for round in 1..=tournament.qualifying_laps {
        for driver in &drivers {
            if let Some(lap) = driver.laps.iter().find(|l| l.round == round) {
                if lap.is_unscored() {
                    return Some(lap.id);
                }
            }
        }
    }
    None
}

/// Move the next-lap pointer to the earliest unscored lap. When none remain
/// qualifying is complete: rank the field and hand over to battles, or end
/// the tournament if battles are disabled.
pub fn advance_qualifying(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Qualifying {
        return Err(TournamentError::InvalidState);
    }
    tournament.next_qualifying_lap = next_unscored_lap(tournament);
    if tournament.next_qualifying_lap.is_some() {
        return Ok(());
    }
    set_qualifying_positions(tournament);
    if tournament.enable_battles {
        enter_battles(tournament)
    } else {
        tournament.state = TournamentState::End;
        set_tournament_finishing_positions(tournament);
        Ok(())
    }
}

/// Rank all non-bye drivers and assign 1-based qualifying positions in one
/// pass: best lap total desc, then second best, then third (absent or not
/// fully judged laps count as -1, below any real score), then registration
/// number asc as the final deterministic tie-break.
pub fn set_qualifying_positions(tournament: &mut Tournament) {
    let judge_count = tournament.judges.len();
    let formula = tournament.score_formula;

    let mut ranked: Vec<(DriverId, [f64; 3], u32)> = tournament
        .real_drivers()
        .map(|d| {
            let mut totals: Vec<f64> = d
                .laps
                .iter()
                .filter_map(|lap| lap_total(lap, judge_count, formula))
                .collect();
            totals.sort_by(|a, b| b.total_cmp(a));
            let best = [
                totals.first().copied().unwrap_or(-1.0),
                totals.get(1).copied().unwrap_or(-1.0),
                totals.get(2).copied().unwrap_or(-1.0),
            ];
            (d.id, best, d.driver_number)
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.1[0]
            .total_cmp(&a.1[0])
            .then(b.1[1].total_cmp(&a.1[1]))
            .then(b.1[2].total_cmp(&a.1[2]))
            .then(a.2.cmp(&b.2))
    });

    let positions: Vec<(DriverId, u32)> = ranked
        .iter()
        .enumerate()
        .map(|(i, (id, _, _))| (*id, i as u32 + 1))
        .collect();
    for (id, position) in positions {
        if let Some(d) = tournament.driver_mut(id) {
            d.qualifying_position = Some(position);
        }
    }
}

/// Backfill every missing judge score with a random value up to that judge's
/// ceiling, then advance: runs the whole qualifying phase in one call (dry
/// runs and demo events).
pub fn fill_random_qualifying_scores(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Qualifying {
        return Err(TournamentError::InvalidState);
    }
    let judges: Vec<(JudgeId, f64)> = tournament.judges.iter().map(|j| (j.id, j.points)).collect();
    let mut rng = rand::thread_rng();
    for driver in tournament.drivers.iter_mut().filter(|d| !d.is_bye) {
        for lap in &mut driver.laps {
            for &(judge_id, points) in &judges {
                if !lap.scores.iter().any(|s| s.judge_id == judge_id) {
                    lap.record_score(judge_id, rng.gen_range(0.0..=points));
                }
            }
        }
    }
    advance_qualifying(tournament)
}
