//! Edit validation engine.
//!
//! Validators decide whether a proposed edit is legal against the live
//! bracket. They never mutate; failures are [`ValidationError`]s with a
//! stable reason code.

pub mod errors;
pub mod validators;

pub use errors::{ValidationError, ValidationResult};
pub use validators::{
    parse, validate_change, validate_information, validate_match_edit, validate_status_transition,
};
