//! Lap score aggregation: per-judge scores into one comparable total.

use crate::models::{Lap, LapScore, ScoreFormula};

/// Combine the raw per-judge scores for one lap under the given formula and
/// subtract the lap's penalty. Pure; no side effects.
///
/// `judge_count` is the tournament's judge roster size, which may exceed
/// `scores.len()` while judging is incomplete — callers establishing a
/// ranking must skip such laps (see [`lap_total`]).
pub fn sum_scores(
    scores: &[LapScore],
    judge_count: usize,
    formula: ScoreFormula,
    penalty: f64,
) -> f64 {
    let total: f64 = scores.iter().map(|s| s.score).sum();
    let combined = match formula {
        ScoreFormula::Sum => total,
        ScoreFormula::Average => {
            if judge_count == 0 {
                0.0
            } else {
                total / judge_count as f64
            }
        }
    };
    combined - penalty
}

/// Aggregate score for a lap, or None while the lap has fewer scores than
/// judges (not fully judged yet; ranked below any real score).
pub fn lap_total(lap: &Lap, judge_count: usize, formula: ScoreFormula) -> Option<f64> {
    if lap.scores.len() < judge_count {
        return None;
    }
    Some(sum_scores(&lap.scores, judge_count, formula, lap.penalty))
}
