//! Final standings: finishing positions once the tournament concludes.

use crate::models::{DriverId, Tournament};

/// Assign finishing positions to every non-bye driver. The bracket decides
/// first: the final's winner is 1st, its loser 2nd, then eliminated drivers
/// grouped by round reached (deepest first) with qualifying position as the
/// in-group tie-break. Drivers cut before the bracket follow on the same
/// key. With battles disabled the qualifying order is the finishing order;
/// with both phases disabled, registration order. Registration numbers are
/// unique, so the result is a total order.
pub fn set_tournament_finishing_positions(tournament: &mut Tournament) {
    let quali_key = |t: &Tournament, id: DriverId| -> (u32, u32) {
        t.driver(id)
            .map(|d| (d.qualifying_position.unwrap_or(u32::MAX), d.driver_number))
            .unwrap_or((u32::MAX, u32::MAX))
    };

    let mut order: Vec<DriverId> = Vec::new();

    if !tournament.battles.is_empty() {
        let mut rounds: Vec<u32> = tournament.battles.iter().map(|b| b.round).collect();
        rounds.sort_unstable();
        rounds.dedup();

        let final_winner = tournament
            .battles
            .iter()
            .filter(|b| Some(b.round) == rounds.last().copied())
            .find_map(|b| b.winner);
        order.extend(final_winner);

        for &round in rounds.iter().rev() {
            let mut losers: Vec<DriverId> = tournament
                .battles
                .iter()
                .filter(|b| b.round == round)
                .filter_map(|b| {
                    let winner = b.winner?;
                    [b.driver_left, b.driver_right]
                        .into_iter()
                        .flatten()
                        .find(|&d| d != winner)
                })
                .collect();
            losers.sort_by_key(|&id| quali_key(tournament, id));
            order.extend(losers);
        }
    }

    // cut before the bracket, or no battles at all
    let mut rest: Vec<DriverId> = tournament
        .real_drivers()
        .map(|d| d.id)
        .filter(|id| !order.contains(id))
        .collect();
    rest.sort_by_key(|&id| quali_key(tournament, id));
    order.extend(rest);

    let mut position = 0u32;
    for id in order {
        let is_real = tournament.driver(id).map_or(false, |d| !d.is_bye);
        if !is_real {
            continue;
        }
        position += 1;
        if let Some(d) = tournament.driver_mut(id) {
            d.finishing_position = Some(position);
        }
    }
}
