//! Edit validation.
//!
//! Every check here runs against the live tournament before anything is
//! mutated. A passing edit can be applied by [`crate::changes`] without
//! leaving the bracket inconsistent.

use serde::de::DeserializeOwned;

use super::errors::{ValidationError, ValidationResult};
use crate::bracket::{EntrantId, Information, Match, MatchId, Tournament, TournamentStatus};
use crate::changes::Edit;

/// Parse caller-supplied JSON, mapping any failure to
/// [`ValidationError::InvalidFormat`]
pub fn parse<T: DeserializeOwned>(json: &str) -> ValidationResult<T> {
    Ok(serde_json::from_str(json)?)
}

/// Whether `entrant` may newly appear in match `id`.
///
/// It must have won a winner-edge origin, or come out of a decided
/// loser-edge origin it did not win.
fn is_justified(tournament: &Tournament, id: MatchId, entrant: EntrantId) -> bool {
    tournament
        .origins_of(id)
        .iter()
        .filter_map(|&source| tournament.matches.get(source))
        .any(|source| {
            let via_loser = source.loser_next == Some(id)
                && source.winner.is_some_and(|w| w != entrant);
            let via_winner = source.winner_next == Some(id) && source.winner == Some(entrant);
            via_loser || via_winner
        })
}

/// Validate replacing match `id` wholesale with `edited`.
///
/// Only the winner and the scores are editable. Changing the winner of a
/// match whose old winner or loser already sits in a successor is refused.
pub fn validate_match_edit(tournament: &Tournament, id: MatchId, edited: &Match) -> ValidationResult<()> {
    let current = tournament
        .matches
        .get(id)
        .ok_or(ValidationError::EditingFromNonExistingData)?;

    for (old, new) in [(current.p1, edited.p1), (current.p2, edited.p2)] {
        if let Some(entrant) = new
            && old != new
            && !is_justified(tournament, id, entrant)
        {
            return Err(ValidationError::SettingInvalidPlayers);
        }
    }

    if current.p1 != edited.p1
        || current.p2 != edited.p2
        || current.winner_next != edited.winner_next
        || current.loser_next != edited.loser_next
    {
        return Err(ValidationError::ModifyingUnmodifiableFields);
    }

    if edited.winner.is_some() {
        if !edited.is_ready() || tournament.is_moot(id) {
            return Err(ValidationError::SettingWinnerWhenNotReady);
        }
        if edited.loser().is_none() {
            return Err(ValidationError::SettingInvalidPlayers);
        }
    }
    check_consumed(tournament, current, edited.winner)
}

/// Refuse to move the result of `current` away from entrants a successor
/// already holds
fn check_consumed(tournament: &Tournament, current: &Match, winner: Option<EntrantId>) -> ValidationResult<()> {
    let Some(old_winner) = current.winner else {
        return Ok(());
    };
    if winner == Some(old_winner) {
        return Ok(());
    }
    let holds = |next: Option<MatchId>, entrant: Option<EntrantId>| {
        let next = next.and_then(|n| tournament.matches.get(n));
        matches!((next, entrant), (Some(next), Some(e)) if next.contains(e))
    };
    if holds(current.winner_next, Some(old_winner)) {
        return Err(ValidationError::ChangingConfirmedWinner);
    }
    if holds(current.loser_next, current.loser()) {
        return Err(ValidationError::ChangingConfirmedLoser);
    }
    Ok(())
}

/// Validate a name, score or winner edit against the live tournament.
///
/// Checks run in order: no-op, missing target, stale previous value, then
/// the checks specific to the edit.
pub fn validate_change(tournament: &Tournament, edit: &Edit) -> ValidationResult<()> {
    if edit.is_noop() {
        return Err(ValidationError::EditWithoutAnyEffect);
    }

    match edit {
        Edit::NameEdit {
            player_id,
            previous,
            ..
        } => {
            let name = tournament
                .players
                .get(*player_id)
                .ok_or(ValidationError::EditingFromNonExistingData)?;
            if name != previous {
                return Err(ValidationError::EditingFromIncorrectData);
            }
            Ok(())
        }
        Edit::ScoreEdit {
            match_id, previous, ..
        } => {
            let current = target(tournament, *match_id)?;
            if current.scores() != *previous {
                return Err(ValidationError::EditingFromIncorrectData);
            }
            Ok(())
        }
        Edit::WinnerEdit {
            match_id,
            previous,
            edited,
        } => {
            let current = target(tournament, *match_id)?;
            if current.winner != *previous {
                return Err(ValidationError::EditingFromIncorrectData);
            }
            validate_winner_change(tournament, *match_id, current, *edited)
        }
    }
}

fn target(tournament: &Tournament, id: MatchId) -> ValidationResult<&Match> {
    tournament
        .matches
        .get(id)
        .ok_or(ValidationError::EditingFromNonExistingData)
}

fn validate_winner_change(
    tournament: &Tournament,
    id: MatchId,
    current: &Match,
    edited: Option<EntrantId>,
) -> ValidationResult<()> {
    if !current.is_ready() || (edited.is_some() && tournament.is_moot(id)) {
        return Err(ValidationError::SettingWinnerWhenNotReady);
    }
    if let Some(entrant) = edited
        && !current.contains(entrant)
    {
        return Err(ValidationError::SettingInvalidPlayers);
    }

    let Some(old_winner) = current.winner else {
        return Ok(());
    };
    let old_loser = current
        .loser()
        .ok_or(ValidationError::EditingFromIncorrectData)?;

    // Undo is fine while the successor holding the entrant is undecided
    let decided_with = |next: Option<MatchId>, entrant: EntrantId| {
        next.and_then(|n| tournament.matches.get(n))
            .is_some_and(|next| next.is_decided() && next.contains(entrant))
    };
    if decided_with(current.winner_next, old_winner) {
        return Err(ValidationError::ChangingConfirmedWinner);
    }
    if decided_with(current.loser_next, old_loser) {
        return Err(ValidationError::ChangingConfirmedLoser);
    }
    Ok(())
}

/// Validate an information edit. `old` is `None` for a new tournament.
pub fn validate_information(old: Option<&Information>, edited: &Information) -> ValidationResult<()> {
    match old {
        Some(old) if old.organizer != edited.organizer => Err(ValidationError::NotImplemented),
        _ => Ok(()),
    }
}

pub fn validate_status_transition(old: TournamentStatus, edited: TournamentStatus) -> ValidationResult<()> {
    if edited < old {
        return Err(ValidationError::RevertingTournamentStatus);
    }
    Ok(())
}
