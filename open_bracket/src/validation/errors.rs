//! Validation failure reasons.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a user-submitted edit was refused.
///
/// These are expected outcomes of bad input and are always raised before
/// anything is mutated. The serialized form is the variant name, which
/// doubles as the stable reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("p1, p2, winnerNext and loserNext can't be edited")]
    ModifyingUnmodifiableFields,
    #[error("edited item does not exist")]
    EditingFromNonExistingData,
    #[error("a started tournament can't go back to setup")]
    RevertingTournamentStatus,
    #[error("need both opponents before setting a winner")]
    SettingWinnerWhenNotReady,
    #[error("previous value does not match the current one")]
    EditingFromIncorrectData,
    #[error("winner already advanced to a later match")]
    ChangingConfirmedWinner,
    #[error("loser already advanced to a later match")]
    ChangingConfirmedLoser,
    #[error("entrant can't be in this match")]
    SettingInvalidPlayers,
    #[error("edit changes nothing")]
    EditWithoutAnyEffect,
    #[error("edit not supported")]
    NotImplemented,
    #[error("malformed input")]
    InvalidFormat,
}

impl ValidationError {
    /// Stable reason code for callers rendering their own messages
    pub fn code(self) -> &'static str {
        match self {
            ValidationError::ModifyingUnmodifiableFields => "ModifyingUnmodifiableFields",
            ValidationError::EditingFromNonExistingData => "EditingFromNonExistingData",
            ValidationError::RevertingTournamentStatus => "RevertingTournamentStatus",
            ValidationError::SettingWinnerWhenNotReady => "SettingWinnerWhenNotReady",
            ValidationError::EditingFromIncorrectData => "EditingFromIncorrectData",
            ValidationError::ChangingConfirmedWinner => "ChangingConfirmedWinner",
            ValidationError::ChangingConfirmedLoser => "ChangingConfirmedLoser",
            ValidationError::SettingInvalidPlayers => "SettingInvalidPlayers",
            ValidationError::EditWithoutAnyEffect => "EditWithoutAnyEffect",
            ValidationError::NotImplemented => "NotImplemented",
            ValidationError::InvalidFormat => "InvalidFormat",
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(_: serde_json::Error) -> Self {
        ValidationError::InvalidFormat
    }
}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;
