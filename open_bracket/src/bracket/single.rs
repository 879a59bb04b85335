//! Single elimination builder.
//!
//! With `P` the largest power of two not above `N`, the `N - P` preliminary
//! matches come first and take the lowest-ranked entrants. Everyone else
//! starts in round two, filling open slots from the last round-two match
//! backwards.

use log::debug;

use super::errors::{BracketError, BracketResult};
use super::graph::build_origins;
use super::models::{Bracket, Match, MatchId, Slot};

/// Smallest bracket that can be built
pub const MIN_PLAYERS: usize = 2;

/// Smallest bracket that has two semifinals to feed a third place match
pub const MIN_PLAYERS_THIRD_PLACE: usize = 4;

pub fn build_single_elimination(player_count: usize, has_third_place: bool) -> BracketResult<Bracket> {
    if player_count < MIN_PLAYERS {
        return Err(BracketError::TooFewPlayers {
            count: player_count,
            min: MIN_PLAYERS,
        });
    }
    if has_third_place && player_count < MIN_PLAYERS_THIRD_PLACE {
        return Err(BracketError::ThirdPlaceNeedsFourPlayers(player_count));
    }

    let power_of_two = 1usize << player_count.ilog2();
    let preliminary = player_count - power_of_two;

    let mut matches: Vec<Match> = (0..preliminary)
        .map(|i| Match::new(Some(preliminary + i / 2)))
        .collect();
    let mut winners_rounds: Vec<Vec<MatchId>> = vec![(0..preliminary).collect()];

    let mut size = power_of_two / 2;
    while size >= 1 {
        let first = matches.len();
        let next_first = first + size;
        matches.extend((0..size).map(|i| Match::new((size > 1).then_some(next_first + i / 2))));
        winners_rounds.push((first..next_first).collect());
        size /= 2;
    }

    let round1_begin = player_count - preliminary * 2;
    for (i, m) in matches.iter_mut().take(preliminary).enumerate() {
        m.p1 = Some(round1_begin + i * 2);
        m.p2 = Some(round1_begin + i * 2 + 1);
    }

    let round2 = &winners_rounds[1];
    let mut open = round2
        .iter()
        .rev()
        .flat_map(|&id| [(id, Slot::P2), (id, Slot::P1)]);
    for entrant in (0..round1_begin).rev() {
        let Some((id, slot)) = open.next() else {
            return Err(BracketError::MatchFull(round2[0]));
        };
        *matches[id].slot_mut(slot) = Some(entrant);
    }

    if winners_rounds[0].is_empty() {
        winners_rounds.remove(0);
    }

    let third_place_match = if has_third_place {
        let semifinals = match winners_rounds.len().checked_sub(2) {
            Some(i) if winners_rounds[i].len() == 2 => winners_rounds[i].clone(),
            _ => return Err(BracketError::ThirdPlaceNeedsFourPlayers(player_count)),
        };
        let third = matches.len();
        matches.push(Match::new(None));
        for m in semifinals {
            matches[m].loser_next = Some(third);
        }
        Some(third)
    } else {
        None
    };

    let origins = build_origins(&matches, 0..matches.len());
    debug!(
        "built single elimination for {player_count} players: {} matches in {} rounds",
        matches.len(),
        winners_rounds.len()
    );
    Ok(Bracket {
        matches,
        winners_rounds,
        losers_rounds: Vec::new(),
        third_place_match,
        origins,
    })
}
