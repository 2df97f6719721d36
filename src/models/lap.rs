//! Qualifying lap and per-judge lap scores.

use crate::models::judge::JudgeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a qualifying lap.
pub type LapId = Uuid;

/// One judge's raw score for one lap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LapScore {
    pub judge_id: JudgeId,
    pub score: f64,
}

/// A single qualifying attempt for one driver.
///
/// Laps are created at tournament start, one per attempt per driver; after
/// that only their scores (and penalty, during judging) change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub id: LapId,
    /// 1-based attempt number.
    pub round: u32,
    /// Numeric deduction applied to the combined score.
    pub penalty: f64,
    /// One score per judge; fewer means the lap is not fully judged yet.
    pub scores: Vec<LapScore>,
}

impl Lap {
    pub fn new(round: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            penalty: 0.0,
            scores: Vec::new(),
        }
    }

    /// Record one judge's score. Re-submitting replaces the judge's previous
    /// score so a double send cannot inflate the score count.
    pub fn record_score(&mut self, judge_id: JudgeId, score: f64) {
        match self.scores.iter_mut().find(|s| s.judge_id == judge_id) {
            Some(existing) => existing.score = score,
            None => self.scores.push(LapScore { judge_id, score }),
        }
    }

    /// Whether no judge has scored this lap yet (the "next lap" predicate).
    pub fn is_unscored(&self) -> bool {
        self.scores.is_empty()
    }
}
