//! Declarative wiring of the standard 64-entrant double elimination bracket.
//!
//! Every entry pairs a contiguous target run of match identifiers with the
//! runs its entrants come from. Identifiers are 1-based: seeds `1..=64` and
//! matches `1..=126`. A run is walked from `first` to `last`, so a reversed
//! run (`first > last`) pairs sources to targets back to front. Losers rounds
//! use reversed runs so two entrants who just met in the winners bracket are
//! not paired again straight away.
//!
//! The table is data only. [`canonical`] checks it once and hands out the
//! checked copy; [`crate::bracket::double`] replays it.

use std::sync::LazyLock;

use super::errors::{BracketError, BracketResult};

/// Bumped whenever the wiring table below changes
pub const TOPOLOGY_VERSION: u32 = 2;

/// Where a run of identifiers comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// Raw entrant seed
    Player,
    Winners,
    Losers,
}

/// Inclusive run of 1-based identifiers, walked from `first` to `last`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub first: usize,
    pub last: usize,
}

impl Span {
    pub fn len(self) -> usize {
        self.first.abs_diff(self.last) + 1
    }

    pub fn is_ascending(self) -> bool {
        self.first <= self.last
    }

    /// Identifiers in walk order
    pub fn ids(self) -> impl Iterator<Item = usize> {
        let ascending = self.is_ascending();
        let first = self.first;
        (0..self.len()).map(move |i| if ascending { first + i } else { first - i })
    }
}

/// One feeder run of a [`MatchDesc`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub from: Label,
    pub span: Span,
}

/// A target run and the one or two runs feeding it.
///
/// With a single source, consecutive source identifiers pair up into one
/// target. With two sources, they are walked in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchDesc {
    pub sources: &'static [Source],
    pub target: Span,
}

pub type RoundDesc = &'static [MatchDesc];

/// Whole bracket: winners rounds then losers rounds, round 1 first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    pub winners: &'static [RoundDesc],
    pub losers: &'static [RoundDesc],
}

macro_rules! src {
    ($label:ident, $first:literal, $last:literal) => {
        Source {
            from: Label::$label,
            span: Span {
                first: $first,
                last: $last,
            },
        }
    };
}

macro_rules! desc {
    ([$($source:expr),+] => $first:literal, $last:literal) => {
        MatchDesc {
            sources: &[$($source),+],
            target: Span {
                first: $first,
                last: $last,
            },
        }
    };
}

macro_rules! seeds {
    ($a:literal, $b:literal => $target:literal) => {
        desc!([src!(Player, $a, $a), src!(Player, $b, $b)] => $target, $target)
    };
}

static WINNERS: &[RoundDesc] = &[
    &[
        seeds!(1, 64 => 1),
        seeds!(32, 33 => 2),
        seeds!(16, 49 => 3),
        seeds!(17, 48 => 4),
        seeds!(8, 57 => 5),
        seeds!(25, 40 => 6),
        seeds!(9, 56 => 7),
        seeds!(24, 41 => 8),
        seeds!(4, 61 => 9),
        seeds!(29, 36 => 10),
        seeds!(13, 52 => 11),
        seeds!(20, 45 => 12),
        seeds!(5, 60 => 13),
        seeds!(28, 37 => 14),
        seeds!(12, 53 => 15),
        seeds!(21, 44 => 16),
        seeds!(2, 63 => 17),
        seeds!(31, 34 => 18),
        seeds!(15, 50 => 19),
        seeds!(18, 47 => 20),
        seeds!(7, 58 => 21),
        seeds!(26, 39 => 22),
        seeds!(10, 55 => 23),
        seeds!(23, 42 => 24),
        seeds!(3, 62 => 25),
        seeds!(30, 35 => 26),
        seeds!(14, 51 => 27),
        seeds!(19, 46 => 28),
        seeds!(6, 59 => 29),
        seeds!(27, 38 => 30),
        seeds!(11, 54 => 31),
        seeds!(22, 43 => 32),
    ],
    &[desc!([src!(Winners, 1, 32)] => 49, 64)],
    &[desc!([src!(Winners, 49, 64)] => 89, 96)],
    &[desc!([src!(Winners, 89, 96)] => 109, 112)],
    &[desc!([src!(Winners, 109, 112)] => 119, 120)],
    &[desc!([src!(Winners, 119, 120)] => 124, 124)],
    // grand final
    &[desc!([src!(Winners, 124, 124), src!(Losers, 125, 125)] => 126, 126)],
];

static LOSERS: &[RoundDesc] = &[
    &[desc!([src!(Winners, 1, 32)] => 33, 48)],
    &[desc!([src!(Losers, 33, 48), src!(Winners, 64, 49)] => 80, 65)],
    &[desc!([src!(Losers, 80, 65)] => 88, 81)],
    &[
        desc!([src!(Losers, 88, 85), src!(Winners, 92, 89)] => 100, 97),
        desc!([src!(Losers, 84, 81), src!(Winners, 96, 93)] => 104, 101),
    ],
    &[
        desc!([src!(Losers, 100, 97)] => 106, 105),
        desc!([src!(Losers, 104, 101)] => 108, 107),
    ],
    &[
        desc!([src!(Losers, 106, 105), src!(Winners, 111, 112)] => 115, 116),
        desc!([src!(Losers, 108, 107), src!(Winners, 109, 110)] => 113, 114),
    ],
    &[
        desc!([src!(Losers, 115, 116)] => 118, 118),
        desc!([src!(Losers, 113, 114)] => 117, 117),
    ],
    &[
        desc!([src!(Losers, 118, 118), src!(Winners, 119, 119)] => 121, 121),
        desc!([src!(Losers, 117, 117), src!(Winners, 120, 120)] => 122, 122),
    ],
    &[desc!([src!(Losers, 121, 122)] => 123, 123)],
    &[desc!([src!(Losers, 123, 123), src!(Winners, 124, 124)] => 125, 125)],
];

static CANONICAL: LazyLock<BracketResult<Topology>> = LazyLock::new(|| {
    let topology = Topology::standard();
    topology.check()?;
    log::debug!(
        "bracket topology v{TOPOLOGY_VERSION}: {} seeds, {} matches",
        topology.seed_count(),
        topology.match_count()
    );
    Ok(topology)
});

/// The checked standard table. Computed on first use.
pub fn canonical() -> BracketResult<&'static Topology> {
    CANONICAL.as_ref().map_err(Clone::clone)
}

/// Whether `source` feeds a `bracket` target through its winner edge
pub fn feeds_winner(bracket: Label, source: Label) -> bool {
    bracket == Label::Winners || bracket == source
}

impl Topology {
    /// The unchecked standard table
    pub fn standard() -> Self {
        Self {
            winners: WINNERS,
            losers: LOSERS,
        }
    }

    fn descs(&self) -> impl Iterator<Item = (Label, &'static MatchDesc)> + '_ {
        let winners = self.winners.iter().flat_map(|r| r.iter().map(|d| (Label::Winners, d)));
        let losers = self.losers.iter().flat_map(|r| r.iter().map(|d| (Label::Losers, d)));
        winners.chain(losers)
    }

    pub fn match_count(&self) -> usize {
        self.descs().map(|(_, d)| d.target.len()).sum()
    }

    pub fn seed_count(&self) -> usize {
        self.winners.first().map_or(0, |round| round.len() * 2)
    }

    /// 1-based identifier of the match fed by both bracket finals
    pub fn grand_final(&self) -> Option<usize> {
        self.winners.last()?.first().map(|d| d.target.last)
    }

    /// Structural self-check.
    ///
    /// Verifies that seeds and match identifiers are each used exactly once,
    /// that every source run names identifiers of its own label and has the
    /// right length, and that no match feeds two winner or two loser edges.
    pub fn check(&self) -> BracketResult<()> {
        let fail = |msg: String| Err(BracketError::MalformedTopology(msg));

        let Some((first_round, later_rounds)) = self.winners.split_first() else {
            return fail("no winners rounds".into());
        };
        if self.losers.is_empty() {
            return fail("no losers rounds".into());
        }

        let seed_count = first_round.len() * 2;
        let mut seeds = vec![false; seed_count + 1];
        for (i, desc) in first_round.iter().enumerate() {
            if desc.target.first != i + 1 || desc.target.len() != 1 {
                return fail(format!("first round entry {i} is not match {}", i + 1));
            }
            if desc.sources.len() != 2 {
                return fail(format!("first round match {} needs two seeds", i + 1));
            }
            for source in desc.sources {
                if source.from != Label::Player || source.span.len() != 1 {
                    return fail(format!("first round match {} must be fed by single seeds", i + 1));
                }
                let seed = source.span.first;
                match seeds.get_mut(seed) {
                    Some(used) if seed > 0 && !*used => *used = true,
                    _ => return fail(format!("seed {seed} used twice or out of range")),
                }
            }
        }

        for (round, descs) in later_rounds.iter().enumerate() {
            if descs.len() != 1 {
                return fail(format!("winners round {} must have one entry", round + 2));
            }
        }
        for (round, descs) in self.losers.iter().enumerate() {
            if !(1..=2).contains(&descs.len()) {
                return fail(format!("losers round {} must have one or two entries", round + 1));
            }
        }

        let match_count = self.match_count();
        let mut labels: Vec<Option<Label>> = vec![None; match_count + 1];
        for (bracket, desc) in self.descs() {
            for id in desc.target.ids() {
                match labels.get_mut(id) {
                    Some(slot) if id > 0 && slot.is_none() => *slot = Some(bracket),
                    _ => return fail(format!("match {id} assigned twice or out of range")),
                }
            }
        }

        let grand_final = self.grand_final().unwrap_or(0);
        let mut winner_edges = vec![false; match_count + 1];
        let mut loser_edges = vec![false; match_count + 1];
        for (bracket, desc) in self.descs() {
            if desc.sources.iter().any(|s| s.from == Label::Player) {
                continue;
            }
            let expected = match desc.sources.len() {
                1 => desc.target.len() * 2,
                2 => desc.target.len(),
                n => return fail(format!("{n} sources feed match {}", desc.target.first)),
            };
            for source in desc.sources {
                if source.span.len() != expected {
                    return fail(format!(
                        "source {}..{} does not match target {}..{}",
                        source.span.first, source.span.last, desc.target.first, desc.target.last
                    ));
                }
                let edges = if feeds_winner(bracket, source.from) {
                    &mut winner_edges
                } else {
                    &mut loser_edges
                };
                for id in source.span.ids() {
                    if labels.get(id).copied().flatten() != Some(source.from) {
                        return fail(format!("match {id} is not a {:?} match", source.from));
                    }
                    if std::mem::replace(&mut edges[id], true) {
                        return fail(format!("match {id} feeds two targets on one edge"));
                    }
                }
            }
        }

        for id in 1..=match_count {
            if id != grand_final && !winner_edges[id] {
                return fail(format!("winner of match {id} goes nowhere"));
            }
            if labels[id] == Some(Label::Winners) && id != grand_final && !loser_edges[id] {
                return fail(format!("loser of winners match {id} goes nowhere"));
            }
        }
        if seeds.iter().skip(1).any(|used| !used) {
            return fail("not every seed is placed".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_sizes(rounds: &[RoundDesc]) -> Vec<usize> {
        rounds
            .iter()
            .map(|r| r.iter().map(|d| d.target.len()).sum())
            .collect()
    }

    #[test]
    fn test_canonical_passes_self_check() {
        let topology = canonical().unwrap();
        assert_eq!(topology.seed_count(), 64);
        assert_eq!(topology.match_count(), 126);
        assert_eq!(topology.grand_final(), Some(126));
    }

    #[test]
    fn test_round_sizes() {
        let topology = Topology::standard();
        assert_eq!(round_sizes(topology.winners), vec![32, 16, 8, 4, 2, 1, 1]);
        assert_eq!(
            round_sizes(topology.losers),
            vec![16, 16, 8, 8, 4, 4, 2, 2, 1, 1]
        );
    }

    #[test]
    fn test_first_round_seeds_sum_to_65() {
        for desc in Topology::standard().winners[0] {
            let sum: usize = desc.sources.iter().map(|s| s.span.first).sum();
            assert_eq!(sum, 65, "match {}", desc.target.first);
        }
    }

    #[test]
    fn test_every_identifier_assigned_once() {
        let topology = Topology::standard();
        let mut seen = vec![0usize; 127];
        for (_, desc) in topology.descs() {
            for id in desc.target.ids() {
                seen[id] += 1;
            }
        }
        assert!(seen[1..].iter().all(|&n| n == 1));
    }

    #[test]
    fn test_span_walks_backwards() {
        let span = Span { first: 80, last: 77 };
        assert_eq!(span.len(), 4);
        assert_eq!(span.ids().collect::<Vec<_>>(), vec![80, 79, 78, 77]);
    }

    #[test]
    fn test_feeds_winner() {
        assert!(feeds_winner(Label::Winners, Label::Losers));
        assert!(feeds_winner(Label::Losers, Label::Losers));
        assert!(!feeds_winner(Label::Losers, Label::Winners));
    }

    static DUPLICATE_SEED: &[RoundDesc] = &[
        &[seeds!(1, 4 => 1), seeds!(2, 4 => 2)],
        &[desc!([src!(Winners, 1, 2)] => 3, 3)],
    ];
    static SMALL_LOSERS: &[RoundDesc] = &[&[desc!([src!(Winners, 1, 2)] => 4, 4)]];

    #[test]
    fn test_rejects_duplicate_seed() {
        let topology = Topology {
            winners: DUPLICATE_SEED,
            losers: SMALL_LOSERS,
        };
        assert!(matches!(
            topology.check(),
            Err(BracketError::MalformedTopology(msg)) if msg.contains("seed 4")
        ));
    }

    static SMALL_WINNERS: &[RoundDesc] = &[
        &[seeds!(1, 4 => 1), seeds!(2, 3 => 2)],
        &[desc!([src!(Winners, 1, 2)] => 3, 3)],
        &[desc!([src!(Winners, 3, 3), src!(Losers, 5, 5)] => 6, 6)],
    ];
    static SMALL_LOSERS_FULL: &[RoundDesc] = &[
        &[desc!([src!(Winners, 1, 2)] => 4, 4)],
        &[desc!([src!(Losers, 4, 4), src!(Winners, 3, 3)] => 5, 5)],
    ];
    static OVERLAPPING_LOSERS: &[RoundDesc] = &[
        &[desc!([src!(Winners, 1, 2)] => 3, 3)],
        &[desc!([src!(Losers, 3, 3), src!(Winners, 3, 3)] => 5, 5)],
    ];
    static WRONG_LABEL_LOSERS: &[RoundDesc] = &[
        &[desc!([src!(Winners, 1, 2)] => 4, 4)],
        &[desc!([src!(Winners, 4, 4), src!(Winners, 3, 3)] => 5, 5)],
    ];

    #[test]
    fn test_small_table_is_consistent() {
        let topology = Topology {
            winners: SMALL_WINNERS,
            losers: SMALL_LOSERS_FULL,
        };
        assert_eq!(topology.check(), Ok(()));
        assert_eq!(topology.match_count(), 6);
    }

    #[test]
    fn test_rejects_overlapping_targets() {
        let topology = Topology {
            winners: SMALL_WINNERS,
            losers: OVERLAPPING_LOSERS,
        };
        assert!(matches!(
            topology.check(),
            Err(BracketError::MalformedTopology(msg)) if msg.contains("assigned twice")
        ));
    }

    #[test]
    fn test_rejects_source_with_wrong_label() {
        let topology = Topology {
            winners: SMALL_WINNERS,
            losers: WRONG_LABEL_LOSERS,
        };
        assert!(topology.check().is_err());
    }
}
