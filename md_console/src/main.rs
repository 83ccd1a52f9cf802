//! Operator console for running a match_day tournament.
//!
//! The console is the display surface for the engine: it renders the
//! bracket table and the live scoreboard, raises score and pause events
//! into the core, and rings the terminal bell when regulation expires.

mod tui_app;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use match_day::{Director, Format};
use pico_args::Arguments;

use tui_app::TuiApp;

const HELP: &str = "\
Run a single-event tournament from the terminal

USAGE:
  md_console [OPTIONS]

OPTIONS:
  --teams PATH         Roster file, one team per line  [default: placeholder names]
  --count N            Placeholder roster size when no file is given  [default: 4]
  --format FORMAT      round_robin | single_elimination  [default: round_robin]
  --load PATH          Resume from a snapshot file
  --save PATH          Snapshot path for the save key  [default: tournament.json]

FLAGS:
  -h, --help           Print help information

KEYS:
  g  generate bracket      n  start next match      s  save snapshot
  1  point for home        2  point for away        space  pause/resume
  f  switch format         q  quit / leave the live match
";

struct Args {
    teams: Option<PathBuf>,
    count: usize,
    format: Format,
    load: Option<PathBuf>,
    save: PathBuf,
}

fn main() -> Result<()> {
    env_logger::builder().format_target(false).init();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        teams: pargs.opt_value_from_str("--teams")?,
        count: pargs.value_from_str("--count").unwrap_or(4),
        format: pargs
            .opt_value_from_str("--format")?
            .unwrap_or(Format::RoundRobin),
        load: pargs.opt_value_from_str("--load")?,
        save: pargs
            .opt_value_from_str("--save")?
            .unwrap_or_else(|| PathBuf::from("tournament.json")),
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("unrecognized arguments: {remaining:?}");
    }

    let director = match &args.load {
        Some(path) => Director::load(path)
            .with_context(|| format!("failed to load snapshot {}", path.display()))?,
        None => {
            let roster = match &args.teams {
                Some(path) => read_roster(path)?,
                None => (1..=args.count).map(|i| format!("Team {i}")).collect(),
            };
            Director::new(roster, args.format)
        }
    };

    info!(
        "console starting: {} participants, {} format",
        director.roster().len(),
        director.format()
    );

    let terminal = ratatui::init();
    let result = TuiApp::new(director, args.save).run(terminal);
    ratatui::restore();
    result
}

fn read_roster(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster file {}", path.display()))?;
    let roster: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    if roster.is_empty() {
        anyhow::bail!("roster file {} has no teams", path.display());
    }
    Ok(roster)
}
