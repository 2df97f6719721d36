//! Battle (elimination matchup), BattleVote, and bracket metadata.

use crate::models::driver::DriverId;
use crate::models::judge::JudgeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a battle.
pub type BattleId = Uuid;

/// Round number reserved for the final.
pub const ROUND_FINAL: u32 = 1000;

/// Which elimination bracket a battle belongs to. The engine seeds the upper
/// bracket only; Lower exists for double-elimination formats.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Bracket {
    #[default]
    Upper,
    Lower,
}

/// One judge's vote on a battle: either a winner, or OMT ("one more time",
/// no decision, forcing a tie-break run).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BattleVote {
    pub judge_id: JudgeId,
    /// The driver this judge voted for; None when `omt` is set.
    pub winner: Option<DriverId>,
    pub omt: bool,
}

/// A single elimination matchup between two drivers.
///
/// Battles are created during seeding (round 1 filled, later rounds empty),
/// filled by winner propagation, and resolved exactly once. Re-resolution
/// requires clearing the votes first (OMT).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    pub id: BattleId,
    /// 1-based round; `ROUND_FINAL` marks the final.
    pub round: u32,
    pub bracket: Bracket,
    /// None until seeded / until the feeding battles resolve.
    pub driver_left: Option<DriverId>,
    pub driver_right: Option<DriverId>,
    /// None until resolved.
    pub winner: Option<DriverId>,
    /// One vote per judge; the full roster must vote before resolution.
    pub votes: Vec<BattleVote>,
}

impl Battle {
    pub fn new(round: u32, bracket: Bracket) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            bracket,
            driver_left: None,
            driver_right: None,
            winner: None,
            votes: Vec::new(),
        }
    }

    /// Record one judge's vote. Re-submitting replaces the judge's previous
    /// vote so a double send cannot inflate the voted-judge count.
    pub fn record_vote(&mut self, judge_id: JudgeId, winner: Option<DriverId>, omt: bool) {
        let vote = BattleVote {
            judge_id,
            winner,
            omt,
        };
        match self.votes.iter_mut().find(|v| v.judge_id == judge_id) {
            Some(existing) => *existing = vote,
            None => self.votes.push(vote),
        }
    }

    /// Clear all votes (OMT: the battle is re-judged from scratch).
    pub fn clear_votes(&mut self) {
        self.votes.clear();
    }

    /// Whether the given driver is one of the two sides.
    pub fn has_driver(&self, driver_id: DriverId) -> bool {
        self.driver_left == Some(driver_id) || self.driver_right == Some(driver_id)
    }
}

/// Result of advancing the current battle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum BattleOutcome {
    /// A winner was committed and the next battle (if any) is current.
    Advanced { winner: DriverId },
    /// The judges could not decide; votes were cleared, re-judge the battle.
    OneMoreTime,
}
