//! JSON roster descriptions
//!
//! A roster is a list of entries such as
//! `{"strategy": "Random", "p_hunt": 0.2, "count": 3}`; entries with a count
//! above one are numbered from 0 so every player keeps a unique uid.

use serde::{Deserialize, Serialize};

use crate::bots::{
    Alternator, AntiSocial, AverageHunter, BoundedHunter, FairHunter, FixedThreshold, Freeloader,
    MaxRepHunter, Nasty, Pushover, RandomHunter,
};
use crate::detective::Detective;
use crate::error::ConfigError;
use crate::player::PlayerEntry;
use crate::strategy::{Choice, Strategy};

/// A strategy and its tunable parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy")]
pub enum StrategySpec {
    Pushover,
    Freeloader,
    Nasty,
    Alternator,
    MaxRepHunter,
    FairHunter,
    AverageHunter,
    Random {
        p_hunt: f64,
    },
    BoundedHunter {
        lower: f64,
        upper: f64,
    },
    FixedThreshold {
        threshold: f64,
        first: Choice,
    },
    RandomAntiSocial {
        p_hunt: f64,
        antisocial_threshold: f64,
        evil_threshold: f64,
    },
    FairHunterAntiSocial {
        antisocial_threshold: f64,
        evil_threshold: f64,
    },
    GenerousTitForTatDetective {
        p_hunt: f64,
        antisocial_threshold: f64,
        evil_threshold: f64,
        p_generosity: f64,
    },
    PavlovDetective {
        p_hunt: f64,
        antisocial_threshold: f64,
        evil_threshold: f64,
    },
    GuardedPavlovDetective {
        p_hunt: f64,
        antisocial_threshold: f64,
        evil_threshold: f64,
    },
}

impl StrategySpec {
    /// Build the strategy, validating every probability and threshold
    pub fn build(&self) -> Result<Box<dyn Strategy>, ConfigError> {
        let strategy: Box<dyn Strategy> = match *self {
            StrategySpec::Pushover => Box::new(Pushover),
            StrategySpec::Freeloader => Box::new(Freeloader),
            StrategySpec::Nasty => Box::new(Nasty),
            StrategySpec::Alternator => Box::new(Alternator::default()),
            StrategySpec::MaxRepHunter => Box::new(MaxRepHunter),
            StrategySpec::FairHunter => Box::new(FairHunter),
            StrategySpec::AverageHunter => Box::new(AverageHunter),
            StrategySpec::Random { p_hunt } => Box::new(RandomHunter::new(p_hunt)?),
            StrategySpec::BoundedHunter { lower, upper } => {
                Box::new(BoundedHunter::new(lower, upper)?)
            }
            StrategySpec::FixedThreshold { threshold, first } => {
                Box::new(FixedThreshold::new(threshold, first)?)
            }
            StrategySpec::RandomAntiSocial {
                p_hunt,
                antisocial_threshold,
                evil_threshold,
            } => Box::new(AntiSocial::random(p_hunt, antisocial_threshold, evil_threshold)?),
            StrategySpec::FairHunterAntiSocial {
                antisocial_threshold,
                evil_threshold,
            } => Box::new(AntiSocial::fair(antisocial_threshold, evil_threshold)?),
            StrategySpec::GenerousTitForTatDetective {
                p_hunt,
                antisocial_threshold,
                evil_threshold,
                p_generosity,
            } => Box::new(Detective::generous_tit_for_tat(
                p_hunt,
                antisocial_threshold,
                evil_threshold,
                p_generosity,
            )?),
            StrategySpec::PavlovDetective {
                p_hunt,
                antisocial_threshold,
                evil_threshold,
            } => Box::new(Detective::pavlov(p_hunt, antisocial_threshold, evil_threshold)?),
            StrategySpec::GuardedPavlovDetective {
                p_hunt,
                antisocial_threshold,
                evil_threshold,
            } => Box::new(Detective::guarded_pavlov(
                p_hunt,
                antisocial_threshold,
                evil_threshold,
            )?),
        };
        Ok(strategy)
    }
}

/// One line of a roster file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub spec: StrategySpec,
    /// Copies of this entry to seat
    #[serde(default = "one")]
    pub count: u32,
    /// Explicit disambiguator; only valid for a single copy
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub logging: bool,
    /// Whether this is the entrant whose elimination can end the game early
    #[serde(default)]
    pub under_test: bool,
}

fn one() -> u32 {
    1
}

impl RosterEntry {
    pub fn new(spec: StrategySpec) -> Self {
        Self {
            spec,
            count: 1,
            id: None,
            logging: false,
            under_test: false,
        }
    }

    /// Expand into seated entries, numbering copies when there is more than one
    pub fn into_entries(self) -> Result<Vec<PlayerEntry>, ConfigError> {
        if self.count > 1 && self.id.is_some() {
            return Err(ConfigError::BadRosterEntry(format!(
                "{:?}: an explicit id needs count 1 (got {})",
                self.spec, self.count
            )));
        }

        (0..self.count)
            .map(|copy| {
                let mut entry = PlayerEntry::boxed(self.spec.build()?).with_logging(self.logging);
                if let Some(id) = self.id {
                    entry = entry.with_id(id);
                } else if self.count > 1 {
                    entry = entry.with_id(copy);
                }
                if self.under_test {
                    entry = entry.under_test();
                }
                Ok(entry)
            })
            .collect()
    }
}

/// Parse a JSON array of roster entries
pub fn parse_roster(json: &str) -> Result<Vec<PlayerEntry>, ConfigError> {
    let entries: Vec<RosterEntry> = serde_json::from_str(json)
        .map_err(|e| ConfigError::BadRosterEntry(format!("invalid roster: {}", e)))?;

    let mut players = Vec::new();
    for entry in entries {
        players.extend(entry.into_entries()?);
    }
    Ok(players)
}
