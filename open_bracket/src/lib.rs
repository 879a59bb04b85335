//! # Open Bracket
//!
//! A single and double elimination tournament engine built around a
//! directed match progression graph.
//!
//! A tournament is created once from a roster and a format. Its matches
//! live in one array and refer to their successors by index. Reported
//! results propagate winners and losers forward, and every user edit is
//! validated against the live graph before it is applied, so a bracket can
//! never show an entrant who did not earn their place.
//!
//! ## Core Modules
//!
//! - [`bracket`]: wiring table, builders, win propagation and origins
//! - [`validation`]: edit validation with stable reason codes
//! - [`changes`]: edit records, the change log and the commit path
//!
//! ## Example
//!
//! ```
//! use open_bracket::{Edit, GUEST_USER, Setup, commit_edit, create_from_setup};
//!
//! let mut setup = Setup::new(1);
//! setup.players = (1..=5).map(|i| format!("Team {i}")).collect();
//! let mut tournament = create_from_setup(&setup).unwrap();
//! assert_eq!(tournament.matches.len(), 9);
//!
//! let id = tournament.ready_matches().next().unwrap();
//! let winner = tournament.matches[id].p1;
//! let edit = Edit::WinnerEdit { match_id: id, previous: None, edited: winner };
//! commit_edit(&mut tournament, edit, GUEST_USER).unwrap();
//! ```

/// Bracket construction and the match graph.
pub mod bracket;
pub use bracket::{
    BracketError, BracketResult, EntrantId, Information, Match, MatchId, Origins, Settings, Setup,
    Slot, Tournament, TournamentStatus, UserId, create_from_setup,
};

/// Edit records and committing them.
pub mod changes;
pub use changes::{ChangeError, ChangeLog, ChangeResult, CommittedEdit, Edit, GUEST_USER, commit_edit};

/// Edit validation engine.
pub mod validation;
pub use validation::{ValidationError, ValidationResult};
