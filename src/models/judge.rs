//! Tournament judge.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a judge (used on lap scores and battle votes).
pub type JudgeId = Uuid;

/// A judge assigned to the tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentJudge {
    pub id: JudgeId,
    pub name: String,
    /// Maximum score this judge may award for a single lap; also the ceiling
    /// for randomized score backfill.
    pub points: f64,
}

impl TournamentJudge {
    pub fn new(name: impl Into<String>, points: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            points,
        }
    }
}
