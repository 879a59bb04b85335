//! Structured logging configuration.
//!
//! The library logs through the `log` facade; the subscriber installed here
//! picks those records up alongside the CLI's own `tracing` events.

use open_bracket::{ChangeError, CommittedEdit, Edit};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with levels from `RUST_LOG` (default `info`)
///
/// # Example
///
/// ```no_run
/// logging::init();
/// tracing::info!("ready");
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::debug!("Structured logging initialized");
}

/// Log an accepted edit with structured data
pub fn log_edit_committed(tournament: &str, committed: &CommittedEdit) {
    tracing::info!(
        tournament = tournament,
        edit_type = committed.edit.kind(),
        match_id = committed.edit.match_id(),
        referee = committed.referee,
        date = committed.date,
        "Edit committed"
    );
}

/// Log a refused edit. Validation failures carry their reason code.
pub fn log_edit_rejected(tournament: &str, edit: &Edit, err: &ChangeError) {
    match err {
        ChangeError::Validation(reason) => tracing::warn!(
            tournament = tournament,
            edit_type = edit.kind(),
            match_id = edit.match_id(),
            reason = reason.code(),
            "Edit rejected"
        ),
        ChangeError::Bracket(bug) => tracing::error!(
            tournament = tournament,
            edit_type = edit.kind(),
            match_id = edit.match_id(),
            error = %bug,
            "Edit corrupted the bracket and was dropped"
        ),
    }
}
