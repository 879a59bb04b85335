//! Bracket data models.
//!
//! All cross-match references are plain indices into the owning match
//! array, so converging edges need no shared ownership.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Index into a tournament's match array
pub type MatchId = usize;

/// Index into a tournament's roster
pub type EntrantId = usize;

/// Authenticated caller id
pub type UserId = i64;

/// Reverse edges: match id to the matches whose successor pointer targets it
pub type Origins = BTreeMap<MatchId, Vec<MatchId>>;

/// One of the two opponent positions in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    P1,
    P2,
}

impl Slot {
    pub fn other(self) -> Self {
        match self {
            Slot::P1 => Slot::P2,
            Slot::P2 => Slot::P1,
        }
    }
}

/// A node in the match progression graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub winner_next: Option<MatchId>,
    pub loser_next: Option<MatchId>,
    pub p1: Option<EntrantId>,
    pub p2: Option<EntrantId>,
    pub p1_score: Option<u32>,
    pub p2_score: Option<u32>,
    pub winner: Option<EntrantId>,
}

impl Match {
    /// Create an empty match feeding its winner into `winner_next`
    pub fn new(winner_next: Option<MatchId>) -> Self {
        Self {
            winner_next,
            ..Self::default()
        }
    }

    pub fn slot(&self, slot: Slot) -> Option<EntrantId> {
        match slot {
            Slot::P1 => self.p1,
            Slot::P2 => self.p2,
        }
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut Option<EntrantId> {
        match slot {
            Slot::P1 => &mut self.p1,
            Slot::P2 => &mut self.p2,
        }
    }

    /// Which slot currently holds `entrant`
    pub fn slot_of(&self, entrant: EntrantId) -> Option<Slot> {
        if self.p1 == Some(entrant) {
            Some(Slot::P1)
        } else if self.p2 == Some(entrant) {
            Some(Slot::P2)
        } else {
            None
        }
    }

    pub fn contains(&self, entrant: EntrantId) -> bool {
        self.slot_of(entrant).is_some()
    }

    /// Both opponent slots are set
    pub fn is_ready(&self) -> bool {
        self.p1.is_some() && self.p2.is_some()
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    /// The opponent of the recorded winner
    pub fn loser(&self) -> Option<EntrantId> {
        let winner = self.winner?;
        let slot = self.slot_of(winner)?;
        self.slot(slot.other())
    }

    pub fn scores(&self) -> [Option<u32>; 2] {
        [self.p1_score, self.p2_score]
    }

    pub fn set_scores(&mut self, scores: [Option<u32>; 2]) {
        [self.p1_score, self.p2_score] = scores;
    }
}

/// Format selection with its single boolean option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum Settings {
    #[serde(rename = "se", rename_all = "camelCase")]
    SingleElimination { has_third_place: bool },
    #[serde(rename = "de", rename_all = "camelCase")]
    DoubleElimination { has_extra_match: bool },
}

impl Default for Settings {
    fn default() -> Self {
        Settings::DoubleElimination {
            has_extra_match: true,
        }
    }
}

/// Tournament lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    Setup,
    Started,
}

/// Descriptive tournament information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Information {
    pub organizer: UserId,
    pub referees: Vec<UserId>,
    /// Unix seconds
    pub tournament_date: i64,
    pub name: String,
    pub description: String,
}

impl Information {
    pub fn new(organizer: UserId) -> Self {
        Self {
            organizer,
            referees: Vec::new(),
            tournament_date: Utc::now().timestamp(),
            name: String::new(),
            description: String::new(),
        }
    }
}

/// A tournament that has not been started yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    pub status: TournamentStatus,
    pub information: Information,
    pub settings: Settings,
    pub players: Vec<String>,
}

impl Setup {
    /// Empty double elimination setup owned by `organizer`
    pub fn new(organizer: UserId) -> Self {
        Self {
            status: TournamentStatus::Setup,
            information: Information::new(organizer),
            settings: Settings::default(),
            players: Vec::new(),
        }
    }
}

/// Builder output: the match graph and its groupings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bracket {
    pub matches: Vec<Match>,
    pub winners_rounds: Vec<Vec<MatchId>>,
    pub losers_rounds: Vec<Vec<MatchId>>,
    pub third_place_match: Option<MatchId>,
    pub origins: Origins,
}

/// A started tournament: roster plus match graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub status: TournamentStatus,
    pub settings: Settings,
    pub information: Information,
    pub players: Vec<String>,
    pub matches: Vec<Match>,
    pub winners_rounds: Vec<Vec<MatchId>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub losers_rounds: Vec<Vec<MatchId>>,
    #[serde(default)]
    pub third_place_match: Option<MatchId>,
    pub origins: Origins,
}

impl Tournament {
    /// Assemble a started tournament around a freshly built bracket
    pub fn from_bracket(
        information: Information,
        settings: Settings,
        players: Vec<String>,
        bracket: Bracket,
    ) -> Self {
        let Bracket {
            matches,
            winners_rounds,
            losers_rounds,
            third_place_match,
            origins,
        } = bracket;
        Self {
            status: TournamentStatus::Started,
            settings,
            information,
            players,
            matches,
            winners_rounds,
            losers_rounds,
            third_place_match,
            origins,
        }
    }

    /// Matches feeding `id`
    pub fn origins_of(&self, id: MatchId) -> &[MatchId] {
        self.origins.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Matches with both slots filled and no winner yet, skipping a moot
    /// reset match
    pub fn ready_matches(&self) -> impl Iterator<Item = MatchId> + '_ {
        self.matches
            .iter()
            .enumerate()
            .filter(|(id, m)| m.is_ready() && !m.is_decided() && !self.is_moot(*id))
            .map(|(id, _)| id)
    }

    /// Last winners-bracket match: the final, or the reset match when present
    pub fn final_match(&self) -> Option<MatchId> {
        self.winners_rounds.last()?.first().copied()
    }

    /// Grand final of a double elimination bracket with a reset match
    pub fn grand_final(&self) -> Option<MatchId> {
        let Settings::DoubleElimination {
            has_extra_match: true,
        } = self.settings
        else {
            return None;
        };
        self.origins_of(self.final_match()?).first().copied()
    }

    /// Grand final entrant that arrived from the winners bracket
    fn unbeaten_finalist(&self, grand_final: MatchId) -> Option<EntrantId> {
        self.origins_of(grand_final)
            .iter()
            .filter(|&&id| self.winners_rounds.iter().any(|round| round.contains(&id)))
            .filter_map(|&id| self.matches.get(id))
            .find(|m| m.winner_next == Some(grand_final))?
            .winner
    }

    /// The reset match is moot once the unbeaten finalist takes the grand
    /// final
    pub fn is_moot(&self, id: MatchId) -> bool {
        let Some(grand_final) = self.grand_final() else {
            return false;
        };
        if self.final_match() != Some(id) {
            return false;
        }
        let winner = self.matches.get(grand_final).and_then(|m| m.winner);
        winner.is_some() && winner == self.unbeaten_finalist(grand_final)
    }

    /// Winner of the final match once it is decided. The grand final
    /// winner when the reset match is moot.
    pub fn champion(&self) -> Option<EntrantId> {
        let last = self.final_match()?;
        let decisive = if self.is_moot(last) {
            self.grand_final()?
        } else {
            last
        };
        self.matches.get(decisive)?.winner
    }
}
