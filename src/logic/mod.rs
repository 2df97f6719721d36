//! Tournament engine: scoring, seeding, qualifying, battles, standings.

mod battles;
mod qualifying;
mod scoring;
mod seeding;
mod setup;
mod standings;

pub use battles::{
    auto_advance_bye_runs, cast_battle_vote, commit_battle_winner, tournament_advance_battles,
    withdraw_driver,
};
pub use qualifying::{
    advance_qualifying, fill_random_qualifying_scores, record_qualifying_score, set_lap_penalty,
    set_qualifying_positions,
};
pub use scoring::{lap_total, sum_scores};
pub use seeding::sort_by_inner_outer;
pub use setup::tournament_start;
pub use standings::set_tournament_finishing_positions;
