//! Validate-then-apply commit path.
//!
//! Edits are applied to a clone of the tournament which replaces the live
//! one only when every step succeeded, so a failing edit leaves nothing
//! behind.

use chrono::Utc;
use log::{info, warn};
use thiserror::Error;

use super::models::{CommittedEdit, Edit};
use crate::bracket::{BracketError, EntrantId, Match, MatchId, Tournament, UserId};
use crate::validation::{ValidationError, validate_change, validate_match_edit};

/// Commit errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeError {
    #[error("rejected: {0}")]
    Validation(#[from] ValidationError),
    #[error("bracket corrupted: {0}")]
    Bracket(#[from] BracketError),
}

/// Result type for commit operations
pub type ChangeResult<T> = Result<T, ChangeError>;

/// Move the result of `id` from its current winner to `winner`
fn reassign_winner(tournament: &mut Tournament, id: MatchId, winner: Option<EntrantId>) -> ChangeResult<()> {
    let current = tournament
        .matches
        .get(id)
        .ok_or(BracketError::UnknownMatch(id))?;
    if current.winner == winner {
        return Ok(());
    }
    if current.is_decided() {
        tournament.undo_win(id)?;
    }
    if let Some(entrant) = winner {
        let slot = tournament.matches[id]
            .slot_of(entrant)
            .ok_or(BracketError::EntrantNotInMatch { match_id: id, entrant })?;
        tournament.apply_win(id, slot)?;
    }
    Ok(())
}

fn apply(tournament: &mut Tournament, edit: &Edit) -> ChangeResult<()> {
    match edit {
        Edit::NameEdit {
            player_id, edited, ..
        } => {
            let name = tournament
                .players
                .get_mut(*player_id)
                .ok_or(ValidationError::EditingFromNonExistingData)?;
            name.clone_from(edited);
        }
        Edit::ScoreEdit {
            match_id, edited, ..
        } => {
            tournament
                .matches
                .get_mut(*match_id)
                .ok_or(BracketError::UnknownMatch(*match_id))?
                .set_scores(*edited);
        }
        Edit::WinnerEdit {
            match_id, edited, ..
        } => reassign_winner(tournament, *match_id, *edited)?,
    }
    Ok(())
}

/// Validate `edit`, apply it and stamp it for the change log.
///
/// A winner edit first undoes the previous result, pulling both entrants
/// back out of undecided successors, then propagates the new winner.
pub fn commit_edit(tournament: &mut Tournament, edit: Edit, referee: UserId) -> ChangeResult<CommittedEdit> {
    if let Err(err) = validate_change(tournament, &edit) {
        warn!("{} by {referee} rejected: {}", edit.kind(), err.code());
        return Err(err.into());
    }

    let mut next = tournament.clone();
    apply(&mut next, &edit)?;
    *tournament = next;

    info!("{} by {referee} committed", edit.kind());
    Ok(CommittedEdit {
        referee,
        date: Utc::now().timestamp(),
        edit,
    })
}

/// Validate and apply a wholesale replacement of match `id`.
///
/// Only the winner and scores of `edited` take effect; everything else was
/// checked to be unchanged.
pub fn commit_match(tournament: &mut Tournament, id: MatchId, edited: Match) -> ChangeResult<()> {
    if let Err(err) = validate_match_edit(tournament, id, &edited) {
        warn!("replacement of match {id} rejected: {}", err.code());
        return Err(err.into());
    }

    let mut next = tournament.clone();
    reassign_winner(&mut next, id, edited.winner)?;
    next.matches[id].set_scores(edited.scores());
    *tournament = next;

    info!("match {id} replaced");
    Ok(())
}
