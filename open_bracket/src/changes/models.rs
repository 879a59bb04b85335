//! Edit records and the change log.

use serde::{Deserialize, Serialize};

use crate::bracket::{EntrantId, MatchId, UserId};

/// Referee id recorded for unauthenticated callers
pub const GUEST_USER: UserId = -1;

/// A proposed change, carrying the value the caller saw and the value it wants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Edit {
    NameEdit {
        player_id: EntrantId,
        previous: String,
        edited: String,
    },
    ScoreEdit {
        match_id: MatchId,
        previous: [Option<u32>; 2],
        edited: [Option<u32>; 2],
    },
    WinnerEdit {
        match_id: MatchId,
        previous: Option<EntrantId>,
        edited: Option<EntrantId>,
    },
}

impl Edit {
    /// The proposed value equals the previous one
    pub fn is_noop(&self) -> bool {
        match self {
            Edit::NameEdit {
                previous, edited, ..
            } => previous == edited,
            Edit::ScoreEdit {
                previous, edited, ..
            } => previous == edited,
            Edit::WinnerEdit {
                previous, edited, ..
            } => previous == edited,
        }
    }

    /// Serialized type tag, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Edit::NameEdit { .. } => "nameEdit",
            Edit::ScoreEdit { .. } => "scoreEdit",
            Edit::WinnerEdit { .. } => "winnerEdit",
        }
    }

    /// Edited match, if this is a match edit
    pub fn match_id(&self) -> Option<MatchId> {
        match self {
            Edit::NameEdit { .. } => None,
            Edit::ScoreEdit { match_id, .. } | Edit::WinnerEdit { match_id, .. } => Some(*match_id),
        }
    }
}

/// An accepted edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedEdit {
    pub referee: UserId,
    /// Unix seconds
    pub date: i64,
    pub edit: Edit,
}

/// Append-only history of accepted edits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLog {
    pub changes: Vec<CommittedEdit>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, committed: CommittedEdit) {
        self.changes.push(committed);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Edits touching match `id`, oldest first
    pub fn for_match(&self, id: MatchId) -> impl Iterator<Item = &CommittedEdit> {
        self.changes
            .iter()
            .filter(move |c| c.edit.match_id() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_json_shape() {
        let edit: Edit = serde_json::from_str(
            r#"{"type":"scoreEdit","matchId":3,"previous":[null,null],"edited":[2,1]}"#,
        )
        .unwrap();
        assert_eq!(
            edit,
            Edit::ScoreEdit {
                match_id: 3,
                previous: [None, None],
                edited: [Some(2), Some(1)],
            }
        );

        let json = serde_json::to_value(Edit::NameEdit {
            player_id: 0,
            previous: "a".into(),
            edited: "b".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "nameEdit");
        assert_eq!(json["playerId"], 0);
    }

    #[test]
    fn test_unknown_edit_type_fails() {
        let parsed = serde_json::from_str::<Edit>(r#"{"type":"seedEdit","previous":1,"edited":2}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_noop_detection() {
        let edit = Edit::WinnerEdit {
            match_id: 0,
            previous: Some(1),
            edited: Some(1),
        };
        assert!(edit.is_noop());
        assert_eq!(edit.kind(), "winnerEdit");
    }

    #[test]
    fn test_change_log_filters_by_match() {
        let mut log = ChangeLog::new();
        for (match_id, referee) in [(1, 4), (2, GUEST_USER), (1, 5)] {
            log.push(CommittedEdit {
                referee,
                date: 0,
                edit: Edit::WinnerEdit {
                    match_id,
                    previous: None,
                    edited: Some(0),
                },
            });
        }
        let referees: Vec<_> = log.for_match(1).map(|c| c.referee).collect();
        assert_eq!(referees, vec![4, 5]);
        assert_eq!(log.len(), 3);
    }
}
