//! Command-line flags and roster assembly

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use hunt_logic::{Choice, PlayerEntry, RosterEntry, StrategySpec};

#[derive(Debug, Parser)]
#[command(name = "hunger-games", version)]
#[command(about = "Run a Hunger Games tournament of iterated multi-player Prisoner's Dilemma bots")]
pub struct Args {
    /// Number of Pushovers (always hunt)
    #[arg(long, default_value_t = 0)]
    pub pushover: u32,

    /// Number of Freeloaders (always slack)
    #[arg(long, default_value_t = 0)]
    pub freeloader: u32,

    /// Number of Alternators
    #[arg(long, default_value_t = 0)]
    pub alternator: u32,

    /// Number of MaxRepHunters
    #[arg(long, default_value_t = 0)]
    pub max_rep_hunter: u32,

    /// Number of FairHunters
    #[arg(long, default_value_t = 0)]
    pub fair_hunter: u32,

    /// Number of AverageHunters
    #[arg(long, default_value_t = 0)]
    pub avg_hunter: u32,

    /// Number of copies of the player under test
    #[arg(long, default_value_t = 0)]
    pub player: u32,

    /// Random hunters as COUNT,P_HUNT (repeatable)
    #[arg(long, value_name = "COUNT,P_HUNT")]
    pub random: Vec<String>,

    /// Bounded hunters as COUNT,LOWER,UPPER (repeatable)
    #[arg(long, value_name = "COUNT,LOWER,UPPER")]
    pub bounded_hunter: Vec<String>,

    /// Fixed-threshold hunters as COUNT,THRESHOLD,h|s (repeatable)
    #[arg(long, value_name = "COUNT,THRESHOLD,h|s")]
    pub fixed_threshold: Vec<String>,

    /// JSON roster file, seated after any bots given by flag
    #[arg(long)]
    pub roster: Option<PathBuf>,

    /// Only print eliminations and the final result
    #[arg(short, long)]
    pub quiet: bool,

    #[arg(long, default_value_t = 300)]
    pub min_rounds: u32,

    /// Mean game length; must exceed --min-rounds
    #[arg(long, default_value_t = 1000)]
    pub average_rounds: u32,

    /// Stop as soon as the player under test starves
    #[arg(long)]
    pub end_early: bool,

    /// Write the transcript here instead of stdout
    #[arg(long)]
    pub log_filename: Option<PathBuf>,

    /// Seed for every random draw; taken from the clock when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Seat every bot named on the command line
pub fn roster_from_flags(args: &Args) -> Result<Vec<PlayerEntry>> {
    let mut roster = Vec::new();
    let simple = [
        (args.pushover, StrategySpec::Pushover),
        (args.freeloader, StrategySpec::Freeloader),
        (args.alternator, StrategySpec::Alternator),
        (args.max_rep_hunter, StrategySpec::MaxRepHunter),
        (args.fair_hunter, StrategySpec::FairHunter),
        (args.avg_hunter, StrategySpec::AverageHunter),
    ];
    for (count, spec) in simple {
        roster.push(counted(spec, count));
    }

    let mut player = counted(StrategySpec::Nasty, args.player);
    player.under_test = true;
    roster.push(player);

    for value in &args.random {
        let fields = split_csv(value, 2, "--random")?;
        roster.push(counted(
            StrategySpec::Random {
                p_hunt: parse_field(&fields[1], "--random")?,
            },
            parse_field(&fields[0], "--random")?,
        ));
    }
    for value in &args.bounded_hunter {
        let fields = split_csv(value, 3, "--bounded-hunter")?;
        roster.push(counted(
            StrategySpec::BoundedHunter {
                lower: parse_field(&fields[1], "--bounded-hunter")?,
                upper: parse_field(&fields[2], "--bounded-hunter")?,
            },
            parse_field(&fields[0], "--bounded-hunter")?,
        ));
    }
    for value in &args.fixed_threshold {
        let fields = split_csv(value, 3, "--fixed-threshold")?;
        roster.push(counted(
            StrategySpec::FixedThreshold {
                threshold: parse_field(&fields[1], "--fixed-threshold")?,
                first: parse_choice(&fields[2])?,
            },
            parse_field(&fields[0], "--fixed-threshold")?,
        ));
    }

    seat(roster)
}

/// Roster used when nothing is given on the command line
pub fn default_roster() -> Result<Vec<PlayerEntry>> {
    let mut player = RosterEntry::new(StrategySpec::Nasty);
    player.under_test = true;

    let mut roster = vec![player];
    roster.extend(
        [
            StrategySpec::Pushover,
            StrategySpec::Freeloader,
            StrategySpec::Alternator,
            StrategySpec::MaxRepHunter,
            StrategySpec::FairHunter,
            StrategySpec::AverageHunter,
            StrategySpec::Random { p_hunt: 0.2 },
            StrategySpec::Random { p_hunt: 0.8 },
            StrategySpec::BoundedHunter { lower: 0.7, upper: 1.0 },
            StrategySpec::FixedThreshold { threshold: 0.5, first: Choice::Hunt },
            StrategySpec::FixedThreshold { threshold: 0.45, first: Choice::Slack },
            StrategySpec::FixedThreshold { threshold: 0.55, first: Choice::Hunt },
        ]
        .into_iter()
        .map(RosterEntry::new),
    );
    seat(roster)
}

fn counted(spec: StrategySpec, count: u32) -> RosterEntry {
    let mut entry = RosterEntry::new(spec);
    entry.count = count;
    entry
}

fn seat(roster: Vec<RosterEntry>) -> Result<Vec<PlayerEntry>> {
    let mut entries = Vec::new();
    for entry in roster {
        entries.extend(entry.into_entries()?);
    }
    Ok(entries)
}

fn split_csv(value: &str, expected: usize, flag: &str) -> Result<Vec<String>> {
    let fields: Vec<String> = value.split(',').map(|s| s.trim().to_string()).collect();
    if fields.len() != expected {
        bail!("{} expects {} comma-separated values, got {:?}", flag, expected, value);
    }
    Ok(fields)
}

fn parse_field<T>(field: &str, flag: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    field
        .parse()
        .with_context(|| format!("{}: cannot parse {:?}", flag, field))
}

fn parse_choice(field: &str) -> Result<Choice> {
    match field {
        "h" => Ok(Choice::Hunt),
        "s" => Ok(Choice::Slack),
        other => bail!("--fixed-threshold: first choice must be h or s, got {:?}", other),
    }
}
