//! RC drift tournament web app: library with models and the tournament engine.

pub mod logic;
pub mod models;

pub use logic::{
    advance_qualifying, auto_advance_bye_runs, cast_battle_vote, commit_battle_winner,
    fill_random_qualifying_scores, lap_total, record_qualifying_score, set_lap_penalty,
    set_qualifying_positions, set_tournament_finishing_positions, sort_by_inner_outer, sum_scores,
    tournament_advance_battles, tournament_start, withdraw_driver,
};
pub use models::{
    Battle, BattleId, BattleOutcome, BattleVote, Bracket, DriverId, JudgeId, Lap, LapId, LapScore,
    ScoreFormula, Tournament, TournamentDriver, TournamentError, TournamentId, TournamentJudge,
    TournamentState, ROUND_FINAL,
};
