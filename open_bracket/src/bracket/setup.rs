//! Starting a tournament from its setup.

use log::info;

use super::double::build_double_elimination;
use super::errors::BracketResult;
use super::models::{Bracket, Settings, Setup, Tournament};
use super::single::build_single_elimination;

/// Build the bracket `settings` asks for over `player_count` entrants
pub fn build_bracket(settings: Settings, player_count: usize) -> BracketResult<Bracket> {
    match settings {
        Settings::SingleElimination { has_third_place } => {
            build_single_elimination(player_count, has_third_place)
        }
        Settings::DoubleElimination { has_extra_match } => {
            build_double_elimination(player_count, has_extra_match)
        }
    }
}

/// Build the bracket and start the tournament.
///
/// The setup's status is ignored: the result is always started.
pub fn create_from_setup(setup: &Setup) -> BracketResult<Tournament> {
    let bracket = build_bracket(setup.settings, setup.players.len())?;
    info!(
        "starting \"{}\" with {} players and {} matches",
        setup.information.name,
        setup.players.len(),
        bracket.matches.len()
    );
    Ok(Tournament::from_bracket(
        setup.information.clone(),
        setup.settings,
        setup.players.clone(),
        bracket,
    ))
}
