//! Double elimination builder.
//!
//! The full 64-seed table is always instantiated. Seeds beyond the roster are
//! pseudo-players: every match pairing one with a real entrant is won by the
//! real entrant through the normal [`apply_win`] path, and matches still
//! holding a pseudo-player afterwards are pruned and the survivors compacted.

use log::debug;

use super::errors::{BracketError, BracketResult};
use super::graph::{apply_win, build_origins};
use super::models::{Bracket, EntrantId, Match, MatchId, Origins, Slot};
use super::single::MIN_PLAYERS;
use super::topology::{self, Label, MatchDesc, feeds_winner};

/// Largest roster the standard table can seat
pub const MAX_PLAYERS: usize = 64;

pub fn build_double_elimination(player_count: usize, has_extra_match: bool) -> BracketResult<Bracket> {
    if player_count < MIN_PLAYERS {
        return Err(BracketError::TooFewPlayers {
            count: player_count,
            min: MIN_PLAYERS,
        });
    }
    if player_count > MAX_PLAYERS {
        return Err(BracketError::TooManyPlayers {
            count: player_count,
            max: MAX_PLAYERS,
        });
    }

    let topology = topology::canonical()?;
    let mut matches = vec![Match::default(); topology.match_count()];
    let mut winners_rounds: Vec<Vec<MatchId>> = vec![Vec::new(); topology.winners.len()];
    let mut losers_rounds: Vec<Vec<MatchId>> = vec![Vec::new(); topology.losers.len()];

    let Some((first_round, later_rounds)) = topology.winners.split_first() else {
        return Err(BracketError::MalformedTopology("no winners rounds".into()));
    };
    for desc in first_round.iter() {
        let [a, b] = desc.sources else {
            return Err(BracketError::MalformedTopology(format!(
                "match {} is not seeded",
                desc.target.first
            )));
        };
        let id = desc.target.first - 1;
        matches[id].p1 = Some(a.span.first - 1);
        matches[id].p2 = Some(b.span.first - 1);
        winners_rounds[0].push(id);
    }
    for (round, descs) in later_rounds.iter().enumerate() {
        for desc in descs.iter() {
            wire(&mut matches, desc, Label::Winners, &mut winners_rounds[round + 1])?;
        }
    }
    for (round, descs) in topology.losers.iter().enumerate() {
        for desc in descs.iter() {
            wire(&mut matches, desc, Label::Losers, &mut losers_rounds[round])?;
        }
    }

    let is_pseudo = |entrant: Option<EntrantId>| entrant.is_some_and(|e| e >= player_count);
    let mut origins = build_origins(&matches, 0..matches.len());
    let mut byes = 0;
    let mut rerouted = 0;

    for &id in winners_rounds.iter().flatten() {
        let m = &matches[id];
        let slot = if is_pseudo(m.p1) {
            Slot::P2
        } else if is_pseudo(m.p2) {
            Slot::P1
        } else {
            continue;
        };
        apply_win(&mut matches, id, slot)?;
        byes += 1;
    }

    for &id in losers_rounds.iter().flatten() {
        let m = &matches[id];
        let slot = if is_pseudo(m.p1) {
            Slot::P2
        } else if is_pseudo(m.p2) {
            Slot::P1
        } else {
            continue;
        };
        if m.slot(slot).is_some() {
            apply_win(&mut matches, id, slot)?;
            byes += 1;
        } else {
            reroute_bye(&mut matches, &mut origins, id, is_pseudo)?;
            rerouted += 1;
        }
    }

    let keep: Vec<bool> = matches
        .iter()
        .map(|m| !is_pseudo(m.p1) && !is_pseudo(m.p2))
        .collect();
    let Compacted {
        mut matches,
        remap,
    } = compact(matches, &keep)?;

    let mut winners_rounds = remap_rounds(winners_rounds, &remap);
    let losers_rounds = remap_rounds(losers_rounds, &remap);
    let mut origins = remap_origins(origins, &remap);

    if has_extra_match {
        let grand_final = topology
            .grand_final()
            .and_then(|id| remap.get(id - 1).copied().flatten())
            .ok_or_else(|| BracketError::MalformedTopology("grand final was pruned".into()))?;
        let extra = matches.len();
        matches.push(Match::new(None));
        matches[grand_final].winner_next = Some(extra);
        matches[grand_final].loser_next = Some(extra);
        winners_rounds.push(vec![extra]);
        origins.insert(extra, vec![grand_final]);
    }

    debug!(
        "built double elimination for {player_count} players: {} matches, {byes} byes, {rerouted} rerouted",
        matches.len()
    );
    Ok(Bracket {
        matches,
        winners_rounds,
        losers_rounds,
        third_place_match: None,
        origins,
    })
}

/// Point the sources of `desc` at its targets, one target at a time
fn wire(
    matches: &mut [Match],
    desc: &MatchDesc,
    bracket: Label,
    round: &mut Vec<MatchId>,
) -> BracketResult<()> {
    let mut feeds: Vec<_> = desc
        .sources
        .iter()
        .map(|source| (source.from, source.span.ids()))
        .collect();
    let feed_count = feeds.len();
    if feed_count == 0 {
        return Err(BracketError::MalformedTopology(format!(
            "match {} has no sources",
            desc.target.first
        )));
    }

    for target in desc.target.ids() {
        let target = target - 1;
        round.push(target);
        for k in 0..2 {
            let (from, ids) = &mut feeds[k % feed_count];
            let Some(source) = ids.next() else {
                return Err(BracketError::MalformedTopology(format!(
                    "sources for match {} ran out",
                    target + 1
                )));
            };
            let m = &mut matches[source - 1];
            if feeds_winner(bracket, *from) {
                m.winner_next = Some(target);
            } else {
                m.loser_next = Some(target);
            }
        }
    }
    Ok(())
}

/// A losers match has a pseudo-player in one slot and is still waiting for
/// its real entrant. That entrant gets the bye: its source is rewired to skip
/// straight to where this match would have sent its winner.
fn reroute_bye(
    matches: &mut [Match],
    origins: &mut Origins,
    id: MatchId,
    is_pseudo: impl Fn(Option<EntrantId>) -> bool,
) -> BracketResult<()> {
    let next = matches[id]
        .winner_next
        .ok_or(BracketError::MissingByeSource(id))?;
    let sibling = origins
        .get(&id)
        .and_then(|sources| {
            sources
                .iter()
                .copied()
                .find(|&s| !is_pseudo(matches[s].p1) && !is_pseudo(matches[s].p2))
        })
        .ok_or(BracketError::MissingByeSource(id))?;

    let source = &mut matches[sibling];
    if source.loser_next == Some(id) {
        source.loser_next = Some(next);
    } else if source.winner_next == Some(id) {
        source.winner_next = Some(next);
    } else {
        return Err(BracketError::MissingByeSource(id));
    }

    if let Some(sources) = origins.get_mut(&id) {
        sources.retain(|&s| s != sibling);
    }
    let sources = origins.entry(next).or_default();
    if !sources.contains(&sibling) {
        sources.push(sibling);
    }
    debug!("losers bye at match {id}: match {sibling} now feeds match {next}");
    Ok(())
}

struct Compacted {
    matches: Vec<Match>,
    /// Old index to new index, `None` for pruned matches
    remap: Vec<Option<MatchId>>,
}

fn compact(matches: Vec<Match>, keep: &[bool]) -> BracketResult<Compacted> {
    let mut remap = vec![None; matches.len()];
    let mut kept = Vec::new();
    for (id, m) in matches.into_iter().enumerate() {
        if keep[id] {
            remap[id] = Some(kept.len());
            kept.push(m);
        }
    }

    let relink = |from: MatchId, to: Option<MatchId>| {
        to.map(|to| remap[to].ok_or(BracketError::DanglingEdge { from, to }))
            .transpose()
    };
    for (id, m) in kept.iter_mut().enumerate() {
        m.winner_next = relink(id, m.winner_next)?;
        m.loser_next = relink(id, m.loser_next)?;
    }
    Ok(Compacted {
        matches: kept,
        remap,
    })
}

fn remap_rounds(rounds: Vec<Vec<MatchId>>, remap: &[Option<MatchId>]) -> Vec<Vec<MatchId>> {
    rounds
        .into_iter()
        .map(|round| round.into_iter().filter_map(|id| remap[id]).collect::<Vec<_>>())
        .filter(|round| !round.is_empty())
        .collect()
}

fn remap_origins(origins: Origins, remap: &[Option<MatchId>]) -> Origins {
    origins
        .into_iter()
        .filter_map(|(target, sources)| {
            let target = remap[target]?;
            let mut sources: Vec<_> = sources.into_iter().filter_map(|s| remap[s]).collect();
            sources.sort_unstable();
            (!sources.is_empty()).then_some((target, sources))
        })
        .collect()
}
