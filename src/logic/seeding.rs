//! Bracket seeding: inner-outer pairing order and battle creation.

use crate::models::{
    Battle, Bracket, DriverId, Tournament, TournamentDriver, TournamentError, ROUND_FINAL,
};

/// Bracket pairing order for a power-of-two field: consecutive pairs of the
/// output are the round-1 matchups, seed `i` meets seed `n - 1 - i`, and the
/// top two seeds land in opposite halves at every depth, so they cannot meet
/// before the final.
///
/// Input length must be a power of two; callers pad with byes beforehand.
/// Pure permutation: no randomness, no tie-breaking (break ties before
/// calling).
pub fn sort_by_inner_outer<T: Clone>(ordered: &[T]) -> Vec<T> {
    inner_outer_indices(ordered.len())
        .into_iter()
        .map(|i| ordered[i].clone())
        .collect()
}

/// The permutation underlying [`sort_by_inner_outer`], generated on indices
/// so the element type stays opaque. Halving recursion: the ordering for n
/// interleaves the ordering for n/2 with its mirror.
fn inner_outer_indices(n: usize) -> Vec<usize> {
    if n <= 2 {
        return (0..n).collect();
    }
    let inner = inner_outer_indices(n / 2);
    let mut out = Vec::with_capacity(n);
    for &seed in &inner {
        out.push(seed);
        out.push(n - 1 - seed);
    }
    out
}

/// Create the elimination bracket and point the tournament at its first
/// battle. Entrants are ordered by qualifying position when qualifying ran,
/// else by registration number; capped at `bracket_size`; padded with fresh
/// bye drivers to the next power of two (minimum 2). Round 1 is filled in
/// inner-outer order, later rounds are created empty, and the last round is
/// numbered `ROUND_FINAL`.
pub(crate) fn seed_battles(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let mut entrants: Vec<&TournamentDriver> = tournament.real_drivers().collect();
    if entrants.is_empty() {
        return Err(TournamentError::NoDrivers);
    }
    if tournament.enable_qualifying {
        entrants.sort_by_key(|d| (d.qualifying_position.unwrap_or(u32::MAX), d.driver_number));
    } else {
        entrants.sort_by_key(|d| d.driver_number);
    }
    entrants.truncate(tournament.bracket_size as usize);
    let mut ordered: Vec<DriverId> = entrants.iter().map(|d| d.id).collect();

    let size = ordered.len().next_power_of_two().max(2);
    while ordered.len() < size {
        let bye = TournamentDriver::bye(tournament.next_driver_number());
        ordered.push(bye.id);
        tournament.drivers.push(bye);
    }

    let seeded = sort_by_inner_outer(&ordered);

    let mut battles = Vec::with_capacity(size - 1);
    let mut matchups = size / 2;
    let mut round = 1;
    while matchups >= 1 {
        let round_no = if matchups == 1 { ROUND_FINAL } else { round };
        for m in 0..matchups {
            let mut battle = Battle::new(round_no, Bracket::Upper);
            if round == 1 {
                battle.driver_left = Some(seeded[2 * m]);
                battle.driver_right = Some(seeded[2 * m + 1]);
            }
            battles.push(battle);
        }
        matchups /= 2;
        round += 1;
    }

    tournament.next_battle = battles.first().map(|b| b.id);
    tournament.battles = battles;
    Ok(())
}
