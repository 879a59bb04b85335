//! Edits and their commit path.
//!
//! ## Example
//!
//! ```
//! use open_bracket::bracket::{Setup, create_from_setup};
//! use open_bracket::changes::{ChangeLog, Edit, GUEST_USER, commit_edit};
//!
//! let mut setup = Setup::new(1);
//! setup.players = vec!["Ana".into(), "Bo".into()];
//! let mut tournament = create_from_setup(&setup).unwrap();
//! let mut log = ChangeLog::new();
//!
//! let first = tournament.ready_matches().next().unwrap();
//! let edit = Edit::WinnerEdit { match_id: first, previous: None, edited: Some(1) };
//! log.push(commit_edit(&mut tournament, edit, GUEST_USER).unwrap());
//! assert_eq!(tournament.matches[first].winner, Some(1));
//! ```

pub mod commit;
pub mod models;

pub use commit::{ChangeError, ChangeResult, commit_edit, commit_match};
pub use models::{ChangeLog, CommittedEdit, Edit, GUEST_USER};
