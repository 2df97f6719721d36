//! Tournament aggregate, TournamentState, ScoreFormula, and TournamentError.

use crate::models::battle::{Battle, BattleId};
use crate::models::driver::{DriverId, TournamentDriver};
use crate::models::judge::{JudgeId, TournamentJudge};
use crate::models::lap::{Lap, LapId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// No (non-bye) drivers registered; cannot start.
    NoDrivers,
    /// A judged phase is enabled but no judges are registered.
    NoJudges,
    /// A driver with this name already exists (names are unique, case-insensitive).
    DuplicateDriverName,
    /// Driver not found in this tournament.
    DriverNotFound(DriverId),
    /// Judge not found in this tournament.
    JudgeNotFound(JudgeId),
    /// Lap not found in this tournament.
    LapNotFound(LapId),
    /// Battle not found in this tournament.
    BattleNotFound(BattleId),
    /// Bracket size must be a power of two, at least 2.
    InvalidBracketSize(u32),
    /// Score outside the judge's allowed range.
    ScoreOutOfRange { max: f64 },
    /// Not every judge has voted on the current battle.
    JudgingIncomplete { voted: usize, judges: usize },
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::NoDrivers => write!(f, "Need at least one driver to start"),
            TournamentError::NoJudges => {
                write!(f, "Need at least one judge when qualifying or battles are enabled")
            }
            TournamentError::DuplicateDriverName => {
                write!(f, "A driver with this name already exists")
            }
            TournamentError::DriverNotFound(_) => write!(f, "Driver not found"),
            TournamentError::JudgeNotFound(_) => write!(f, "Judge not found"),
            TournamentError::LapNotFound(_) => write!(f, "Lap not found"),
            TournamentError::BattleNotFound(_) => write!(f, "Battle not found"),
            TournamentError::InvalidBracketSize(n) => {
                write!(f, "Bracket size must be a power of two, got {}", n)
            }
            TournamentError::ScoreOutOfRange { max } => {
                write!(f, "Score must be between 0 and {}", max)
            }
            TournamentError::JudgingIncomplete { voted, judges } => {
                write!(f, "Only {} of {} judges have voted", voted, judges)
            }
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Adding drivers and judges, adjusting settings; not started.
    #[default]
    Start,
    /// Judges score laps; the next-lap pointer walks every attempt.
    Qualifying,
    /// Elimination battles; the next-battle pointer walks the bracket.
    Battles,
    /// Tournament finished; finishing positions are set.
    End,
}

/// How per-judge lap scores combine into one comparable lap total.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFormula {
    /// Straight sum of all judge scores.
    #[default]
    Sum,
    /// Mean over the judge roster.
    Average,
}

/// Full tournament state: drivers, judges, battles, configuration, and phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Organizer identity (external); informational only.
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub state: TournamentState,
    /// Run a qualifying phase before battles.
    pub enable_qualifying: bool,
    /// Run an elimination battle phase.
    pub enable_battles: bool,
    /// Qualifying attempts per driver.
    pub qualifying_laps: u32,
    pub score_formula: ScoreFormula,
    /// Cap on the battle field (power of two); fewer entrants pad with byes.
    pub bracket_size: u32,
    /// Lap currently up for judging; only meaningful in Qualifying.
    pub next_qualifying_lap: Option<LapId>,
    /// Battle currently up for judging; only meaningful in Battles.
    pub next_battle: Option<BattleId>,
    pub archived: bool,
    /// Organizer asked for post-event driver ratings processing.
    pub rating_requested: bool,
    pub drivers: Vec<TournamentDriver>,
    pub judges: Vec<TournamentJudge>,
    pub battles: Vec<Battle>,
}

impl Tournament {
    /// Create a new tournament in Start state with no drivers or judges.
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            owner: owner.into(),
            created_at: Utc::now(),
            state: TournamentState::Start,
            enable_qualifying: true,
            enable_battles: true,
            qualifying_laps: 2,
            score_formula: ScoreFormula::Sum,
            bracket_size: 16,
            next_qualifying_lap: None,
            next_battle: None,
            archived: false,
            rating_requested: false,
            drivers: Vec::new(),
            judges: Vec::new(),
            battles: Vec::new(),
        }
    }

    /// Add a driver (only valid in Start). Names must be unique (case-insensitive).
    pub fn add_driver(&mut self, name: impl Into<String>) -> Result<DriverId, TournamentError> {
        if self.state != TournamentState::Start {
            return Err(TournamentError::InvalidState);
        }
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::InvalidState);
        }
        let is_duplicate = self
            .drivers
            .iter()
            .any(|d| d.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicateDriverName);
        }
        let driver = TournamentDriver::new(name_trimmed, self.next_driver_number());
        let id = driver.id;
        self.drivers.push(driver);
        Ok(id)
    }

    /// Remove a driver by id (only valid in Start).
    pub fn remove_driver(&mut self, driver_id: DriverId) -> Result<(), TournamentError> {
        if self.state != TournamentState::Start {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .drivers
            .iter()
            .position(|d| d.id == driver_id)
            .ok_or(TournamentError::DriverNotFound(driver_id))?;
        self.drivers.remove(idx);
        Ok(())
    }

    /// Add a judge with a maximum awardable score (only valid in Start).
    pub fn add_judge(
        &mut self,
        name: impl Into<String>,
        points: f64,
    ) -> Result<JudgeId, TournamentError> {
        if self.state != TournamentState::Start {
            return Err(TournamentError::InvalidState);
        }
        if points <= 0.0 {
            return Err(TournamentError::ScoreOutOfRange { max: points });
        }
        let judge = TournamentJudge::new(name, points);
        let id = judge.id;
        self.judges.push(judge);
        Ok(id)
    }

    /// Remove a judge by id (only valid in Start).
    pub fn remove_judge(&mut self, judge_id: JudgeId) -> Result<(), TournamentError> {
        if self.state != TournamentState::Start {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .judges
            .iter()
            .position(|j| j.id == judge_id)
            .ok_or(TournamentError::JudgeNotFound(judge_id))?;
        self.judges.remove(idx);
        Ok(())
    }

    /// Configure the qualifying phase (only valid in Start).
    pub fn set_qualifying(&mut self, enabled: bool, laps: u32) -> Result<(), TournamentError> {
        if self.state != TournamentState::Start {
            return Err(TournamentError::InvalidState);
        }
        if enabled && laps == 0 {
            return Err(TournamentError::InvalidState);
        }
        self.enable_qualifying = enabled;
        self.qualifying_laps = laps;
        Ok(())
    }

    /// Configure the battle phase (only valid in Start).
    pub fn set_battles(&mut self, enabled: bool, bracket_size: u32) -> Result<(), TournamentError> {
        if self.state != TournamentState::Start {
            return Err(TournamentError::InvalidState);
        }
        if enabled && (bracket_size < 2 || !bracket_size.is_power_of_two()) {
            return Err(TournamentError::InvalidBracketSize(bracket_size));
        }
        self.enable_battles = enabled;
        self.bracket_size = bracket_size;
        Ok(())
    }

    /// Set the lap score formula (only valid in Start).
    pub fn set_score_formula(&mut self, formula: ScoreFormula) -> Result<(), TournamentError> {
        if self.state != TournamentState::Start {
            return Err(TournamentError::InvalidState);
        }
        self.score_formula = formula;
        Ok(())
    }

    /// Archive / unarchive (hides the tournament from listings).
    pub fn set_archived(&mut self, archived: bool) {
        self.archived = archived;
    }

    /// Request post-event driver ratings processing (only once ended).
    pub fn request_rating(&mut self) -> Result<(), TournamentError> {
        if self.state != TournamentState::End {
            return Err(TournamentError::InvalidState);
        }
        self.rating_requested = true;
        Ok(())
    }

    /// Next free registration number (byes continue the same sequence).
    pub fn next_driver_number(&self) -> u32 {
        self.drivers.iter().map(|d| d.driver_number).max().unwrap_or(0) + 1
    }

    pub fn driver(&self, driver_id: DriverId) -> Option<&TournamentDriver> {
        self.drivers.iter().find(|d| d.id == driver_id)
    }

    pub fn driver_mut(&mut self, driver_id: DriverId) -> Option<&mut TournamentDriver> {
        self.drivers.iter_mut().find(|d| d.id == driver_id)
    }

    pub fn judge(&self, judge_id: JudgeId) -> Option<&TournamentJudge> {
        self.judges.iter().find(|j| j.id == judge_id)
    }

    pub fn battle(&self, battle_id: BattleId) -> Option<&Battle> {
        self.battles.iter().find(|b| b.id == battle_id)
    }

    pub fn battle_mut(&mut self, battle_id: BattleId) -> Option<&mut Battle> {
        self.battles.iter_mut().find(|b| b.id == battle_id)
    }

    /// Look up a lap across all drivers.
    pub fn lap(&self, lap_id: LapId) -> Option<&Lap> {
        self.drivers
            .iter()
            .flat_map(|d| d.laps.iter())
            .find(|l| l.id == lap_id)
    }

    /// Mutable lap lookup across all drivers.
    pub fn lap_mut(&mut self, lap_id: LapId) -> Option<&mut Lap> {
        self.drivers
            .iter_mut()
            .flat_map(|d| d.laps.iter_mut())
            .find(|l| l.id == lap_id)
    }

    /// Non-bye drivers (the ones that qualify, battle, and get ranked).
    pub fn real_drivers(&self) -> impl Iterator<Item = &TournamentDriver> {
        self.drivers.iter().filter(|d| !d.is_bye)
    }
}
