//! Command line shell around the open_bracket engine.
//!
//! Tournaments are JSON documents in a data directory. Every edit is
//! validated by the engine before the document is replaced.

mod config;
mod logging;
mod store;

use std::path::{Path, PathBuf};

use anyhow::{Context, Error, bail};
use open_bracket::{
    Edit, Match, Setup, Tournament, UserId,
    changes::{commit_edit, commit_match},
    create_from_setup,
    validation::parse,
};
use pico_args::Arguments;
use tracing::info;

use config::CliConfig;
use store::Store;

const HELP: &str = "\
Build and referee single and double elimination brackets

USAGE:
  ob_cli [OPTIONS] <COMMAND> <NAME> [ARGS]

COMMANDS:
  new    <NAME> --roster FILE [--title TEXT]   Start a tournament, one entrant per line
  edit   <NAME> --edit JSON                     Commit a nameEdit, scoreEdit or winnerEdit
  match  <NAME> --id N --match JSON             Replace a match after validation
  show   <NAME>                                 Print rounds, matches and origins
  log    <NAME>                                 Print the change log

OPTIONS:
  --data-dir   DIR      Document directory      [default: env OB_DATA_DIR or .]
  --format     de|se    Format for new          [default: env OB_DEFAULT_FORMAT or de]
  --referee    ID       Referee for edits       [default: env OB_REFEREE_ID or -1]

FLAGS:
  -h, --help            Print help information

ENVIRONMENT:
  OB_EXTRA_MATCH        Add a reset match to double elimination (default true)
  OB_THIRD_PLACE        Add a third place match to single elimination (default false)
  RUST_LOG              Log filter (default info)
";

struct Args {
    command: String,
    name: String,
    data_dir: Option<PathBuf>,
    format: Option<String>,
    referee: Option<UserId>,
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        data_dir: pargs.opt_value_from_str("--data-dir")?,
        format: pargs.opt_value_from_str("--format")?,
        referee: pargs.opt_value_from_str("--referee")?,
        command: pargs.subcommand()?.context("missing command, see --help")?,
        name: pargs.free_from_str().context("missing tournament name")?,
    };

    logging::init();

    let config = CliConfig::from_env(args.data_dir, args.format, args.referee)?;
    config.validate()?;
    let store = Store::new(&config.data_dir);

    match args.command.as_str() {
        "new" => {
            let roster: PathBuf = pargs.value_from_str("--roster")?;
            let title: Option<String> = pargs.opt_value_from_str("--title")?;
            finish(pargs)?;
            new_tournament(&store, &config, &args.name, &roster, title)
        }
        "edit" => {
            let raw: String = pargs.value_from_str("--edit")?;
            finish(pargs)?;
            edit(&store, config.referee, &args.name, &raw)
        }
        "match" => {
            let id: usize = pargs.value_from_str("--id")?;
            let raw: String = pargs.value_from_str("--match")?;
            finish(pargs)?;
            replace_match(&store, &args.name, id, &raw)
        }
        "show" => {
            finish(pargs)?;
            show(&store.load_tournament(&args.name)?);
            Ok(())
        }
        "log" => {
            finish(pargs)?;
            let changes = store.load_changes(&args.name)?;
            println!("{}", serde_json::to_string_pretty(&changes)?);
            Ok(())
        }
        other => bail!("unknown command '{other}', see --help"),
    }
}

fn finish(pargs: Arguments) -> Result<(), Error> {
    let rest = pargs.finish();
    if !rest.is_empty() {
        bail!("unexpected arguments: {rest:?}");
    }
    Ok(())
}

fn new_tournament(
    store: &Store,
    config: &CliConfig,
    name: &str,
    roster: &Path,
    title: Option<String>,
) -> Result<(), Error> {
    let raw = std::fs::read_to_string(roster)
        .with_context(|| format!("reading roster {}", roster.display()))?;

    let mut setup = Setup::new(config.referee);
    setup.settings = config.settings()?;
    setup.information.name = title.unwrap_or_else(|| name.to_string());
    setup.players = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    let tournament = create_from_setup(&setup)?;
    store.create(name, &tournament)?;
    info!(
        tournament = name,
        players = tournament.players.len(),
        matches = tournament.matches.len(),
        "Tournament created"
    );
    show(&tournament);
    Ok(())
}

fn edit(store: &Store, referee: UserId, name: &str, raw: &str) -> Result<(), Error> {
    let edit: Edit = parse(raw)?;
    let mut tournament = store.load_tournament(name)?;

    match commit_edit(&mut tournament, edit.clone(), referee) {
        Ok(committed) => {
            logging::log_edit_committed(name, &committed);
            store.commit(name, &tournament, committed)?;
            Ok(())
        }
        Err(err) => {
            logging::log_edit_rejected(name, &edit, &err);
            Err(err.into())
        }
    }
}

fn replace_match(store: &Store, name: &str, id: usize, raw: &str) -> Result<(), Error> {
    let edited: Match = parse(raw)?;
    let mut tournament = store.load_tournament(name)?;
    commit_match(&mut tournament, id, edited)?;
    store.save_tournament(name, &tournament)?;
    info!(tournament = name, match_id = id, "Match replaced");
    Ok(())
}

fn show(tournament: &Tournament) {
    let entrant = |e: Option<usize>| match e {
        Some(e) => tournament.players.get(e).map_or("?", String::as_str),
        None => "-",
    };
    let print_rounds = |label: &str, rounds: &[Vec<usize>]| {
        for (round, ids) in rounds.iter().enumerate() {
            println!("{label} round {}", round + 1);
            for &id in ids {
                let Some(m) = tournament.matches.get(id) else {
                    println!("  #{id:<3} missing from the document");
                    continue;
                };
                let result = m.winner.map_or(String::new(), |w| format!("  won by {}", entrant(Some(w))));
                let moot = if tournament.is_moot(id) { "  (not needed)" } else { "" };
                println!(
                    "  #{id:<3} {} vs {}{result}{moot}  <- {:?}",
                    entrant(m.p1),
                    entrant(m.p2),
                    tournament.origins_of(id)
                );
            }
        }
    };

    let date = chrono::DateTime::from_timestamp(tournament.information.tournament_date, 0)
        .map_or_else(String::new, |d| d.format("%Y-%m-%d").to_string());
    println!("{} {date}", tournament.information.name);
    print_rounds("Winners", &tournament.winners_rounds);
    print_rounds("Losers", &tournament.losers_rounds);
    if let Some((id, m)) = tournament
        .third_place_match
        .and_then(|id| Some((id, tournament.matches.get(id)?)))
    {
        println!("Third place #{id}: {} vs {}", entrant(m.p1), entrant(m.p2));
    }
    if let Some(champion) = tournament.champion() {
        println!("Champion: {}", entrant(Some(champion)));
    }
}
