//! Bracket construction and the match progression graph.
//!
//! This module provides:
//! - The canonical 64-seed double elimination wiring table
//! - Single and double elimination builders
//! - Win propagation, undo and the reverse origins index
//!
//! ## Example
//!
//! ```
//! use open_bracket::bracket::{Setup, Settings, Slot, create_from_setup};
//!
//! let mut setup = Setup::new(1);
//! setup.settings = Settings::SingleElimination { has_third_place: false };
//! setup.players = vec!["Ana".into(), "Bo".into(), "Cy".into(), "Di".into()];
//!
//! let mut tournament = create_from_setup(&setup).unwrap();
//! tournament.apply_win(0, Slot::P1).unwrap();
//! assert_eq!(tournament.matches[2].p1, Some(0));
//! ```

pub mod double;
pub mod errors;
pub mod graph;
pub mod models;
pub mod setup;
pub mod single;
pub mod topology;

pub use double::{MAX_PLAYERS, build_double_elimination};
pub use errors::{BracketError, BracketResult};
pub use graph::{apply_win, build_origins, undo_win};
pub use models::{
    Bracket, EntrantId, Information, Match, MatchId, Origins, Settings, Setup, Slot, Tournament,
    TournamentStatus, UserId,
};
pub use setup::{build_bracket, create_from_setup};
pub use single::{MIN_PLAYERS, MIN_PLAYERS_THIRD_PLACE, build_single_elimination};
pub use topology::{Label, Span, Topology, canonical};
