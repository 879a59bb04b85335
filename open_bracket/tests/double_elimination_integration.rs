//! Double elimination end-to-end tests
//!
//! Build, play through and persist whole tournaments using the public API.

use open_bracket::bracket::{MatchId, Settings, Slot, Tournament, TournamentStatus, canonical};
use open_bracket::{
    BracketError, ChangeError, Edit, GUEST_USER, Setup, ValidationError, commit_edit,
    create_from_setup,
};

fn setup(players: usize, has_extra_match: bool) -> Setup {
    let mut setup = Setup::new(42);
    setup.information.name = "Winter open".to_string();
    setup.settings = Settings::DoubleElimination { has_extra_match };
    setup.players = (0..players).map(|i| format!("Team {i}")).collect();
    setup
}

/// Decide every ready match, always in favour of `pick`
fn play_all(tournament: &mut Tournament, pick: impl Fn(&Tournament, MatchId) -> Slot) {
    loop {
        let Some(id) = tournament.ready_matches().next() else {
            break;
        };
        let slot = pick(tournament, id);
        tournament.apply_win(id, slot).unwrap();
    }
}

/// Lower entrant index always wins
fn favourite(tournament: &Tournament, id: MatchId) -> Slot {
    let m = &tournament.matches[id];
    if m.p1 < m.p2 { Slot::P1 } else { Slot::P2 }
}

#[test]
fn test_canonical_table_is_consistent() {
    let topology = canonical().unwrap();
    assert_eq!(topology.seed_count(), 64);
    assert_eq!(topology.match_count(), 126);
}

#[test]
fn test_five_players_shrinks_to_real_matches() {
    let tournament = create_from_setup(&setup(5, false)).unwrap();
    assert_eq!(tournament.status, TournamentStatus::Started);
    assert_eq!(tournament.matches.len(), 8);

    let with_extra = create_from_setup(&setup(5, true)).unwrap();
    assert_eq!(with_extra.matches.len(), 9);

    // No entrant index outside the roster survives pruning
    for m in &with_extra.matches {
        for entrant in [m.p1, m.p2].into_iter().flatten() {
            assert!(entrant < 5);
        }
    }
}

#[test]
fn test_favourites_take_the_title() {
    for players in [2, 3, 5, 8, 13, 33, 64] {
        let mut tournament = create_from_setup(&setup(players, true)).unwrap();
        play_all(&mut tournament, favourite);
        let extra = tournament.final_match().unwrap();
        for (id, m) in tournament.matches.iter().enumerate() {
            assert_eq!(m.is_decided(), id != extra, "{players} players, match {id}");
        }
        assert!(tournament.is_moot(extra));
        assert_eq!(tournament.champion(), Some(0), "{players} players");
    }
}

#[test]
fn test_losers_bracket_champion_forces_extra_match() {
    let mut tournament = create_from_setup(&setup(4, true)).unwrap();
    let extra = tournament.final_match().unwrap();
    let grand_final = tournament.origins_of(extra)[0];

    // Favourites win everything except the grand final
    loop {
        let Some(id) = tournament.ready_matches().next() else {
            break;
        };
        let slot = if id == grand_final {
            favourite(&tournament, id).other()
        } else {
            favourite(&tournament, id)
        };
        tournament.apply_win(id, slot).unwrap();
    }

    let gf = &tournament.matches[grand_final];
    assert!(tournament.matches[extra].contains(gf.winner.unwrap()));
    assert!(tournament.matches[extra].contains(gf.loser().unwrap()));
    assert!(!tournament.is_moot(extra));
    assert_eq!(tournament.champion(), Some(0));
}

#[test]
fn test_reset_match_never_crowns_a_twice_beaten_entrant() {
    let mut tournament = create_from_setup(&setup(4, true)).unwrap();
    let extra = tournament.final_match().unwrap();
    let grand_final = tournament.grand_final().unwrap();

    // The unbeaten favourite takes the grand final; the reset is moot
    play_all(&mut tournament, favourite);
    assert_eq!(tournament.matches[grand_final].winner, Some(0));
    assert!(tournament.matches[extra].is_ready());
    assert!(!tournament.matches[extra].is_decided());
    assert_eq!(tournament.champion(), Some(0));

    let runner_up = tournament.matches[grand_final].loser().unwrap();
    let reset_win = Edit::WinnerEdit {
        match_id: extra,
        previous: None,
        edited: Some(runner_up),
    };
    assert_eq!(
        commit_edit(&mut tournament, reset_win, GUEST_USER),
        Err(ChangeError::Validation(ValidationError::SettingWinnerWhenNotReady))
    );
    assert_eq!(tournament.champion(), Some(0));
}

#[test]
fn test_every_entrant_loses_at_most_twice_before_the_final() {
    let mut tournament = create_from_setup(&setup(11, false)).unwrap();
    play_all(&mut tournament, |t, id| favourite(t, id).other());

    let mut losses = vec![0; 11];
    for m in &tournament.matches {
        losses[m.loser().unwrap()] += 1;
    }
    assert!(losses.iter().all(|&l| l <= 2));
    assert_eq!(losses.iter().filter(|&&l| l == 2).count(), 10);
}

#[test]
fn test_tournament_survives_json_round_trip() {
    let mut tournament = create_from_setup(&setup(6, true)).unwrap();
    let first = tournament.ready_matches().next().unwrap();
    tournament.apply_win(first, Slot::P2).unwrap();

    let json = serde_json::to_string(&tournament).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["settings"]["mode"], "de");
    assert_eq!(value["status"], "started");
    assert!(value["losersRounds"].is_array());
    assert!(value["origins"].is_object());

    let restored: Tournament = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, tournament);
}

#[test]
fn test_roster_limits() {
    assert_eq!(
        create_from_setup(&setup(65, false)),
        Err(BracketError::TooManyPlayers { count: 65, max: 64 })
    );
    assert_eq!(
        create_from_setup(&setup(1, false)),
        Err(BracketError::TooFewPlayers { count: 1, min: 2 })
    );
}
