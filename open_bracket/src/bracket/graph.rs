//! Topology-agnostic match graph operations.
//!
//! These functions work on a bare match slice so builders can use them
//! before a [`Tournament`] exists. Failures are [`BracketError`]s: the graph
//! was corrupted by code, not by user input.

use log::debug;

use super::errors::{BracketError, BracketResult};
use super::models::{EntrantId, Match, MatchId, Origins, Slot, Tournament};

fn get_mut(matches: &mut [Match], id: MatchId) -> BracketResult<&mut Match> {
    matches.get_mut(id).ok_or(BracketError::UnknownMatch(id))
}

/// Place `entrant` into the first free slot of `target`
fn distribute(matches: &mut [Match], target: MatchId, entrant: EntrantId) -> BracketResult<()> {
    let next = get_mut(matches, target)?;
    if next.p1.is_none() {
        next.p1 = Some(entrant);
    } else if next.p2.is_none() {
        next.p2 = Some(entrant);
    } else {
        return Err(BracketError::MatchFull(target));
    }
    Ok(())
}

/// Check that `entrant` can be pulled back out of `target`
fn check_vacate(matches: &[Match], target: MatchId, entrant: EntrantId) -> BracketResult<()> {
    let next = matches.get(target).ok_or(BracketError::UnknownMatch(target))?;
    if !next.contains(entrant) {
        return Err(BracketError::EntrantNotInMatch {
            match_id: target,
            entrant,
        });
    }
    if next.is_decided() {
        return Err(BracketError::DownstreamDecided(target));
    }
    Ok(())
}

/// Remove `entrant` from a successor, clearing its scores
fn vacate(matches: &mut [Match], target: MatchId, entrant: EntrantId) -> BracketResult<()> {
    let next = get_mut(matches, target)?;
    if let Some(slot) = next.slot_of(entrant) {
        *next.slot_mut(slot) = None;
    }
    next.set_scores([None, None]);
    Ok(())
}

/// Record `slot` as the winner of `id` and push both entrants forward.
pub fn apply_win(matches: &mut [Match], id: MatchId, slot: Slot) -> BracketResult<()> {
    let current = get_mut(matches, id)?;
    let (Some(winner), Some(loser)) = (current.slot(slot), current.slot(slot.other())) else {
        return Err(BracketError::SlotsNotFilled(id));
    };
    current.winner = Some(winner);
    let (winner_next, loser_next) = (current.winner_next, current.loser_next);

    if let Some(next) = winner_next {
        distribute(matches, next, winner)?;
    }
    if let Some(next) = loser_next {
        distribute(matches, next, loser)?;
    }
    debug!("match {id}: entrant {winner} beat {loser}");
    Ok(())
}

/// Clear the result of `id` and pull both entrants back out of its
/// successors. Successors holding them must still be undecided; nothing
/// changes when one is not.
pub fn undo_win(matches: &mut [Match], id: MatchId) -> BracketResult<()> {
    let current = matches.get(id).ok_or(BracketError::UnknownMatch(id))?;
    let winner = current.winner.ok_or(BracketError::NotDecided(id))?;
    let loser = current.loser().ok_or(BracketError::SlotsNotFilled(id))?;
    let pulled = [(current.winner_next, winner), (current.loser_next, loser)];

    for (next, entrant) in pulled {
        if let Some(next) = next {
            check_vacate(matches, next, entrant)?;
        }
    }
    for (next, entrant) in pulled {
        if let Some(next) = next {
            vacate(matches, next, entrant)?;
        }
    }
    get_mut(matches, id)?.winner = None;
    debug!("match {id}: result undone");
    Ok(())
}

/// Reverse index over the successor edges of `ids`.
///
/// Each source appears once per target, sorted ascending.
pub fn build_origins(matches: &[Match], ids: impl IntoIterator<Item = MatchId>) -> Origins {
    let mut origins = Origins::new();
    for id in ids {
        let Some(m) = matches.get(id) else {
            continue;
        };
        for next in [m.winner_next, m.loser_next].into_iter().flatten() {
            let sources = origins.entry(next).or_default();
            if !sources.contains(&id) {
                sources.push(id);
            }
        }
    }
    for sources in origins.values_mut() {
        sources.sort_unstable();
    }
    origins
}

impl Tournament {
    /// See [`apply_win`]
    pub fn apply_win(&mut self, id: MatchId, slot: Slot) -> BracketResult<()> {
        apply_win(&mut self.matches, id, slot)
    }

    /// See [`undo_win`]
    pub fn undo_win(&mut self, id: MatchId) -> BracketResult<()> {
        undo_win(&mut self.matches, id)
    }

    /// Recompute the origins index from the live edges
    pub fn rebuild_origins(&mut self) {
        self.origins = build_origins(&self.matches, 0..self.matches.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 and 1 feed 2 through winner edges, losers of 0 and 1 meet in 3
    fn diamond() -> Vec<Match> {
        let mut matches = vec![
            Match::new(Some(2)),
            Match::new(Some(2)),
            Match::new(None),
            Match::new(None),
        ];
        matches[0].loser_next = Some(3);
        matches[1].loser_next = Some(3);
        (matches[0].p1, matches[0].p2) = (Some(0), Some(1));
        (matches[1].p1, matches[1].p2) = (Some(2), Some(3));
        matches
    }

    #[test]
    fn test_apply_win_propagates_both_entrants() {
        let mut matches = diamond();
        apply_win(&mut matches, 0, Slot::P2).unwrap();
        assert_eq!(matches[0].winner, Some(1));
        assert_eq!(matches[2].p1, Some(1));
        assert_eq!(matches[3].p1, Some(0));

        apply_win(&mut matches, 1, Slot::P1).unwrap();
        assert_eq!(matches[2].p2, Some(2));
        assert_eq!(matches[3].p2, Some(3));
    }

    #[test]
    fn test_apply_win_requires_both_slots() {
        let mut matches = diamond();
        assert_eq!(
            apply_win(&mut matches, 2, Slot::P1),
            Err(BracketError::SlotsNotFilled(2))
        );
        assert_eq!(matches[2].winner, None);
    }

    #[test]
    fn test_apply_win_rejects_third_entrant() {
        let mut matches = diamond();
        matches[2].p1 = Some(9);
        matches[2].p2 = Some(8);
        assert_eq!(
            apply_win(&mut matches, 0, Slot::P1),
            Err(BracketError::MatchFull(2))
        );
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut matches = diamond();
        apply_win(&mut matches, 1, Slot::P1).unwrap();
        let before = matches.clone();
        apply_win(&mut matches, 0, Slot::P1).unwrap();
        undo_win(&mut matches, 0).unwrap();
        assert_eq!(matches, before);
    }

    #[test]
    fn test_undo_refuses_decided_successor() {
        let mut matches = diamond();
        apply_win(&mut matches, 0, Slot::P1).unwrap();
        apply_win(&mut matches, 1, Slot::P1).unwrap();
        apply_win(&mut matches, 2, Slot::P1).unwrap();
        assert_eq!(
            undo_win(&mut matches, 0),
            Err(BracketError::DownstreamDecided(2))
        );
    }

    #[test]
    fn test_refused_undo_changes_nothing() {
        let mut matches = diamond();
        apply_win(&mut matches, 0, Slot::P1).unwrap();
        apply_win(&mut matches, 1, Slot::P1).unwrap();
        apply_win(&mut matches, 3, Slot::P1).unwrap();
        let before = matches.clone();
        assert_eq!(
            undo_win(&mut matches, 0),
            Err(BracketError::DownstreamDecided(3))
        );
        assert_eq!(matches, before);
    }

    #[test]
    fn test_undo_clears_downstream_scores() {
        let mut matches = diamond();
        apply_win(&mut matches, 0, Slot::P1).unwrap();
        apply_win(&mut matches, 1, Slot::P1).unwrap();
        matches[2].set_scores([Some(1), Some(0)]);
        undo_win(&mut matches, 1).unwrap();
        assert_eq!(matches[2].scores(), [None, None]);
        assert_eq!(matches[2].p2, None);
        assert_eq!(matches[2].p1, Some(0));
    }

    #[test]
    fn test_undo_requires_result() {
        let mut matches = diamond();
        assert_eq!(undo_win(&mut matches, 0), Err(BracketError::NotDecided(0)));
    }

    #[test]
    fn test_build_origins() {
        let matches = diamond();
        let origins = build_origins(&matches, 0..matches.len());
        assert_eq!(origins.get(&2), Some(&vec![0, 1]));
        assert_eq!(origins.get(&3), Some(&vec![0, 1]));
        assert!(!origins.contains_key(&0));

        let partial = build_origins(&matches, [1]);
        assert_eq!(partial.get(&2), Some(&vec![1]));
    }

    #[test]
    fn test_build_origins_single_entry_for_double_edge() {
        let mut matches = vec![Match::new(Some(1)), Match::new(None)];
        matches[0].loser_next = Some(1);
        let origins = build_origins(&matches, 0..2);
        assert_eq!(origins.get(&1), Some(&vec![0]));
    }
}
