//! Bracket construction and graph error types.
//!
//! Everything here signals a bug in graph construction or propagation, never
//! bad user input. User-facing rejections live in [`crate::validation`].

use thiserror::Error;

use super::models::{EntrantId, MatchId};

/// Programming and invariant errors raised by builders and graph operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BracketError {
    #[error("too few players: need at least {min}, got {count}")]
    TooFewPlayers { count: usize, min: usize },

    #[error("too many players: at most {max} supported, got {count}")]
    TooManyPlayers { count: usize, max: usize },

    #[error("a third place match needs at least 4 players, got {0}")]
    ThirdPlaceNeedsFourPlayers(usize),

    #[error("match {0} does not exist")]
    UnknownMatch(MatchId),

    #[error("cannot win match {0} while an opponent slot is unset")]
    SlotsNotFilled(MatchId),

    #[error("more than two players joining match {0}")]
    MatchFull(MatchId),

    #[error("match {0} has no recorded winner")]
    NotDecided(MatchId),

    #[error("entrant {entrant} is not in match {match_id}")]
    EntrantNotInMatch { match_id: MatchId, entrant: EntrantId },

    #[error("match {0} is already decided and cannot lose an entrant")]
    DownstreamDecided(MatchId),

    #[error("losers bracket bye at match {0} has no real source")]
    MissingByeSource(MatchId),

    #[error("edge {from} -> {to} points at a pruned match")]
    DanglingEdge { from: MatchId, to: MatchId },

    #[error("malformed bracket topology: {0}")]
    MalformedTopology(String),
}

/// Result type for bracket operations
pub type BracketResult<T> = Result<T, BracketError>;
