//! Tournament driver: a competitor entry (or a bye placeholder).

use crate::models::lap::Lap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a driver entry (used in battles and lookups).
pub type DriverId = Uuid;

/// A driver entered in the tournament.
///
/// Bye entries are placeholder drivers created during bracket seeding to pad
/// the field to a power of two; they hold no laps and auto-lose every battle
/// against a real driver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentDriver {
    pub id: DriverId,
    pub name: String,
    /// Stable ordinal assigned at registration; deterministic tie-break for
    /// ranking and seeding.
    pub driver_number: u32,
    pub is_bye: bool,
    /// Rank after qualifying (1-based); None until qualifying ends.
    pub qualifying_position: Option<u32>,
    /// Final rank (1-based); None until the tournament ends.
    pub finishing_position: Option<u32>,
    /// Qualifying attempts, created at tournament start.
    pub laps: Vec<Lap>,
}

impl TournamentDriver {
    /// Create a new driver with the given name and registration number.
    pub fn new(name: impl Into<String>, driver_number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            driver_number,
            is_bye: false,
            qualifying_position: None,
            finishing_position: None,
            laps: Vec::new(),
        }
    }

    /// Create a bye placeholder (bracket padding).
    pub fn bye(driver_number: u32) -> Self {
        Self {
            is_bye: true,
            ..Self::new("BYE", driver_number)
        }
    }

    /// Mark the driver as withdrawn: from here on the bracket treats them as
    /// a bye and the standings skip them.
    pub fn withdraw(&mut self) {
        self.is_bye = true;
    }
}
