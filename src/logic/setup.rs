//! Start transition: Start -> Qualifying, Battles, or straight to End.

use crate::logic::battles::enter_battles;
use crate::logic::qualifying::next_unscored_lap;
use crate::logic::standings::set_tournament_finishing_positions;
use crate::models::{Lap, Tournament, TournamentError, TournamentState};

/// Start the tournament. Qualifying enabled: create every driver's laps and
/// point at the first one. Otherwise, battles enabled: seed the bracket.
/// Neither: the tournament ends immediately with standings by registration
/// order.
pub fn tournament_start(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Start {
        return Err(TournamentError::InvalidState);
    }
    if tournament.real_drivers().next().is_none() {
        return Err(TournamentError::NoDrivers);
    }
    if (tournament.enable_qualifying || tournament.enable_battles) && tournament.judges.is_empty() {
        return Err(TournamentError::NoJudges);
    }

    if tournament.enable_qualifying {
        let rounds = tournament.qualifying_laps;
        for driver in tournament.drivers.iter_mut().filter(|d| !d.is_bye) {
            driver.laps = (1..=rounds).map(Lap::new).collect();
        }
        tournament.state = TournamentState::Qualifying;
        tournament.next_qualifying_lap = next_unscored_lap(tournament);
        Ok(())
    } else if tournament.enable_battles {
        enter_battles(tournament)
    } else {
        tournament.state = TournamentState::End;
        set_tournament_finishing_positions(tournament);
        Ok(())
    }
}
