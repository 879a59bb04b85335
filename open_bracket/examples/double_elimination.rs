//! Double Elimination Example
//!
//! Builds a six team bracket, plays it out and shows what edits are refused.

use open_bracket::bracket::{Settings, Tournament};
use open_bracket::{ChangeLog, Edit, GUEST_USER, Setup, commit_edit, create_from_setup};

fn describe(tournament: &Tournament, id: usize) -> String {
    let m = &tournament.matches[id];
    let name = |e: Option<usize>| e.map_or("?", |e| tournament.players[e].as_str());
    format!("#{id}: {} vs {}", name(m.p1), name(m.p2))
}

fn main() {
    println!("=== Double Elimination Example ===\n");

    let mut setup = Setup::new(1);
    setup.information.name = "Club night".to_string();
    setup.settings = Settings::DoubleElimination {
        has_extra_match: true,
    };
    setup.players = ["Ada", "Bea", "Cid", "Dot", "Eve", "Fay"]
        .map(String::from)
        .to_vec();

    let mut tournament = create_from_setup(&setup).expect("six players fit the table");
    println!(
        "{} players, {} matches after pruning byes",
        tournament.players.len(),
        tournament.matches.len()
    );
    for (round, ids) in tournament.winners_rounds.iter().enumerate() {
        println!("Winners round {}: {ids:?}", round + 1);
    }
    for (round, ids) in tournament.losers_rounds.iter().enumerate() {
        println!("Losers round {}: {ids:?}", round + 1);
    }

    // The first seed wins every match
    let mut log = ChangeLog::new();
    loop {
        let Some(id) = tournament.ready_matches().next() else {
            break;
        };
        let m = &tournament.matches[id];
        let winner = m.p1.min(m.p2);
        println!("{} -> {}", describe(&tournament, id), tournament.players[winner.unwrap_or(0)]);
        let edit = Edit::WinnerEdit {
            match_id: id,
            previous: None,
            edited: winner,
        };
        log.push(commit_edit(&mut tournament, edit, GUEST_USER).expect("ready match"));
    }

    let champion = tournament.champion().map(|e| tournament.players[e].clone());
    println!("\nChampion: {champion:?} after {} edits", log.len());

    // Rewriting the first result is refused: its entrants have moved on
    let first = &log.changes[0].edit;
    if let Edit::WinnerEdit {
        match_id, edited, ..
    } = first
    {
        let undo = Edit::WinnerEdit {
            match_id: *match_id,
            previous: *edited,
            edited: None,
        };
        match commit_edit(&mut tournament, undo, GUEST_USER) {
            Ok(_) => println!("undo accepted"),
            Err(err) => println!("undo refused: {err}"),
        }
    }

    let origins = tournament.origins_of(tournament.final_match().unwrap_or(0));
    println!("Final is fed by {origins:?}");
}
