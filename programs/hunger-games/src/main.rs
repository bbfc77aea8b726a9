mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::fs::{self, File};
use std::io::{stdout, BufWriter, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use cli::{default_roster, roster_from_flags, Args};
use hunt_logic::{parse_roster, SeededRng, Tournament, TournamentConfig, Verdict};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut entries = roster_from_flags(&args)?;
    if let Some(path) = &args.roster {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading roster {}", path.display()))?;
        let parsed = parse_roster(&json)
            .with_context(|| format!("parsing roster {}", path.display()))?;
        entries.extend(parsed);
    }
    if entries.is_empty() {
        info!("no players given, seating the default roster");
        entries = default_roster()?;
    }

    let seed = args.seed.unwrap_or_else(clock_seed);
    info!("seed {}", seed);

    let config = TournamentConfig {
        min_rounds: args.min_rounds,
        average_rounds: args.average_rounds,
        end_early: args.end_early,
        verbose: !args.quiet,
        seed: SeededRng::seed_from_u64(seed),
        ..TournamentConfig::default()
    };

    let sink: Box<dyn Write> = match &args.log_filename {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(stdout()),
    };

    let report = Tournament::new(entries, config, Some(sink))
        .context("setting up the tournament")?
        .run()
        .context("playing the tournament")?;

    if let Some(err) = &report.sink_error {
        warn!("transcript incomplete: {}", err);
    }

    if args.log_filename.is_some() {
        match &report.verdict {
            Verdict::EveryoneStarved => println!("Everyone starved"),
            Verdict::Winner(uid) => println!("The winner is: {}", uid),
            Verdict::Tie(uids) => println!("Tied for the lead: {}", uids.join(", ")),
        }
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
