//! Edit validation and commit tests against built tournaments

use open_bracket::bracket::{Settings, Slot};
use open_bracket::changes::{ChangeLog, commit_match};
use open_bracket::validation::{parse, validate_change, validate_match_edit};
use open_bracket::{
    ChangeError, Edit, GUEST_USER, Setup, Tournament, ValidationError, commit_edit,
    create_from_setup,
};

fn single(players: usize) -> Tournament {
    let mut setup = Setup::new(1);
    setup.settings = Settings::SingleElimination {
        has_third_place: true,
    };
    setup.players = (0..players).map(|i| format!("Player {i}")).collect();
    create_from_setup(&setup).unwrap()
}

fn rejected(err: ValidationError) -> Result<open_bracket::CommittedEdit, ChangeError> {
    Err(ChangeError::Validation(err))
}

#[test]
fn test_stale_score_rejected_whatever_the_new_value() {
    let mut tournament = single(4);
    tournament.matches[0].set_scores([Some(1), Some(1)]);

    for edited in [[Some(2), Some(1)], [None, None], [Some(0), Some(0)]] {
        let edit = Edit::ScoreEdit {
            match_id: 0,
            previous: [Some(0), Some(0)],
            edited,
        };
        let verdict = validate_change(&tournament, &edit);
        assert!(
            matches!(
                verdict,
                Err(ValidationError::EditingFromIncorrectData | ValidationError::EditWithoutAnyEffect)
            ),
            "{edited:?}"
        );
    }
}

#[test]
fn test_noop_always_rejected() {
    let tournament = single(4);
    let edits = [
        Edit::NameEdit {
            player_id: 0,
            previous: "Player 0".into(),
            edited: "Player 0".into(),
        },
        Edit::ScoreEdit {
            match_id: 1,
            previous: [Some(3), None],
            edited: [Some(3), None],
        },
        Edit::WinnerEdit {
            match_id: 7,
            previous: None,
            edited: None,
        },
    ];
    for edit in &edits {
        assert_eq!(
            validate_change(&tournament, edit),
            Err(ValidationError::EditWithoutAnyEffect)
        );
    }
}

#[test]
fn test_third_place_receives_semifinal_losers() {
    let mut tournament = single(4);
    let mut log = ChangeLog::new();
    for (match_id, winner) in [(0, 0), (1, 2)] {
        let edit = Edit::WinnerEdit {
            match_id,
            previous: None,
            edited: Some(winner),
        };
        log.push(commit_edit(&mut tournament, edit, 9).unwrap());
    }
    let third = tournament.third_place_match.unwrap();
    assert!(tournament.matches[third].contains(1));
    assert!(tournament.matches[third].contains(3));
    assert_eq!(log.len(), 2);
    assert!(log.changes.iter().all(|c| c.referee == 9));
}

#[test]
fn test_undo_blocked_once_final_is_decided() {
    let mut tournament = single(4);
    tournament.apply_win(0, Slot::P1).unwrap();
    tournament.apply_win(1, Slot::P1).unwrap();
    tournament.apply_win(3, Slot::P2).unwrap();

    // Loser of match 0 already decided the third place match
    let undo = Edit::WinnerEdit {
        match_id: 0,
        previous: Some(0),
        edited: None,
    };
    assert_eq!(
        commit_edit(&mut tournament, undo.clone(), GUEST_USER),
        rejected(ValidationError::ChangingConfirmedLoser)
    );

    tournament.apply_win(2, Slot::P1).unwrap();
    assert_eq!(
        commit_edit(&mut tournament, undo, GUEST_USER),
        rejected(ValidationError::ChangingConfirmedWinner)
    );
}

#[test]
fn test_parsed_edits_commit() {
    let mut tournament = single(5);
    let edit: Edit =
        parse(r#"{"type":"winnerEdit","matchId":0,"previous":null,"edited":4}"#).unwrap();
    let committed = commit_edit(&mut tournament, edit, GUEST_USER).unwrap();
    assert_eq!(committed.referee, GUEST_USER);
    assert_eq!(tournament.matches[1].p1, Some(4));

    let json = serde_json::to_value(&committed).unwrap();
    assert_eq!(json["edit"]["type"], "winnerEdit");
    assert_eq!(json["edit"]["matchId"], 0);

    assert_eq!(
        parse::<Edit>(r#"{"type":"bribe","matchId":0}"#),
        Err(ValidationError::InvalidFormat)
    );
}

#[test]
fn test_match_replacement() {
    let mut tournament = single(4);
    let mut edited = tournament.matches[1].clone();
    edited.p1 = Some(0);
    assert_eq!(
        validate_match_edit(&tournament, 1, &edited),
        Err(ValidationError::SettingInvalidPlayers)
    );

    let mut edited = tournament.matches[1].clone();
    edited.winner = Some(3);
    edited.set_scores([Some(0), Some(2)]);
    commit_match(&mut tournament, 1, edited).unwrap();
    assert_eq!(tournament.matches[2].p1, Some(3));
    assert_eq!(tournament.matches[3].p1, Some(2));

    let mut bad = tournament.matches[2].clone();
    bad.winner_next = Some(0);
    assert_eq!(
        commit_match(&mut tournament, 2, bad),
        Err(ChangeError::Validation(
            ValidationError::ModifyingUnmodifiableFields
        ))
    );
}
