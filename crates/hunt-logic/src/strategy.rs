//! Strategy interface and the per-contest decision rules strategies share

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::random::SeededRng;

/// A choice in a single contest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    Hunt,
    Slack,
}

impl Choice {
    pub fn is_hunt(self) -> bool {
        self == Choice::Hunt
    }

    pub fn flipped(self) -> Self {
        match self {
            Choice::Hunt => Choice::Slack,
            Choice::Slack => Choice::Hunt,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Hunt => write!(f, "h"),
            Choice::Slack => write!(f, "s"),
        }
    }
}

/// The pair of choices played in one contest, seen from one side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicePair {
    pub mine: Choice,
    pub theirs: Choice,
}

/// Everything a strategy may look at when choosing for a round
#[derive(Clone, Copy, Debug)]
pub struct RoundContext {
    /// 1-based round number
    pub round: u32,
    pub food: i64,
    pub reputation: f64,
    /// Total hunts needed this round for the collective bonus
    pub threshold: u64,
    /// Emit diagnostic log events for this player
    pub logging: bool,
}

/// End-of-round notice delivered to every surviving player
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundAward {
    /// Bonus food each player received (0 when the threshold was missed)
    pub bonus: i64,
    pub threshold: u64,
    pub total_hunts: u64,
}

/// A pluggable player behaviour.
///
/// `choose_all` must return exactly one choice per entry of `opponents`, in
/// the same order. The engine rejects any other length.
pub trait Strategy {
    /// Display name; joined with the optional player id to form the uid
    fn name(&self) -> String;

    fn choose_all(
        &mut self,
        ctx: &RoundContext,
        opponents: &[f64],
        rng: &mut SeededRng,
    ) -> Vec<Choice>;

    /// Per-contest food deltas, aligned with the `opponents` of the last call
    fn on_outcomes(&mut self, _payoffs: &[i64]) {}

    fn on_round_end(&mut self, _award: &RoundAward) {}
}

// ── Stateless rules used when an opponent has no known history ─────────

/// Slack against opponents that hunt too much or too little, otherwise hunt
/// with a fixed probability (or with the opponent's own reputation).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AntiSocialRule {
    pub hunt_probability: HuntProbability,
    pub antisocial_threshold: f64,
    pub evil_threshold: f64,
}

/// Where the anti-social rule takes its hunt probability from
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum HuntProbability {
    Fixed(f64),
    OpponentReputation,
}

impl AntiSocialRule {
    pub fn new(
        hunt_probability: HuntProbability,
        antisocial_threshold: f64,
        evil_threshold: f64,
    ) -> Result<Self, ConfigError> {
        if let HuntProbability::Fixed(p) = hunt_probability {
            ConfigError::check_unit("p_hunt", p)?;
        }
        Ok(Self {
            hunt_probability,
            antisocial_threshold: ConfigError::check_unit(
                "antisocial_threshold",
                antisocial_threshold,
            )?,
            evil_threshold: ConfigError::check_unit("evil_threshold", evil_threshold)?,
        })
    }

    pub fn execute(&self, round: u32, opponent_rep: f64, rng: &mut SeededRng) -> Choice {
        if round == 1 {
            return Choice::Hunt;
        }
        if opponent_rep >= self.antisocial_threshold || opponent_rep < self.evil_threshold {
            return Choice::Slack;
        }
        let p = match self.hunt_probability {
            HuntProbability::Fixed(p) => p,
            HuntProbability::OpponentReputation => opponent_rep,
        };
        if rng.chance(p) {
            Choice::Hunt
        } else {
            Choice::Slack
        }
    }
}

// ── Rules that need the opponent's last move ───────────────────

/// Decision rule applied once an opponent's previous contest is known
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum HistoryRule {
    /// Copy the opponent's last move, forgiving a slack with probability `generosity`
    GenerousTitForTat { generosity: f64 },
    /// Win-stay, lose-switch
    Pavlov,
    /// Pavlov, but always slack against opponents below `evil_threshold`
    GuardedPavlov { evil_threshold: f64 },
}

impl HistoryRule {
    pub fn validate(self) -> Result<Self, ConfigError> {
        match self {
            HistoryRule::GenerousTitForTat { generosity } => {
                ConfigError::check_unit("p_generosity", generosity)?;
            }
            HistoryRule::GuardedPavlov { evil_threshold } => {
                ConfigError::check_unit("evil_threshold", evil_threshold)?;
            }
            HistoryRule::Pavlov => {}
        }
        Ok(self)
    }

    pub fn execute(
        &self,
        round: u32,
        last: ChoicePair,
        opponent_rep: f64,
        rng: &mut SeededRng,
    ) -> Choice {
        if round == 1 {
            return Choice::Hunt;
        }
        match *self {
            HistoryRule::GenerousTitForTat { generosity } => {
                execute_generous_tit_for_tat(last, generosity, rng)
            }
            HistoryRule::Pavlov => execute_pavlov(last),
            HistoryRule::GuardedPavlov { evil_threshold } => {
                if opponent_rep < evil_threshold {
                    Choice::Slack
                } else {
                    execute_pavlov(last)
                }
            }
        }
    }

    /// Short tag used in strategy names
    pub fn tag(&self) -> &'static str {
        match self {
            HistoryRule::GenerousTitForTat { .. } => "GeT",
            HistoryRule::Pavlov => "Pav",
            HistoryRule::GuardedPavlov { .. } => "Pav2",
        }
    }
}

fn execute_generous_tit_for_tat(last: ChoicePair, generosity: f64, rng: &mut SeededRng) -> Choice {
    match last.theirs {
        Choice::Hunt => Choice::Hunt,
        Choice::Slack => {
            if generosity > 0.0 && rng.chance(generosity) {
                Choice::Hunt
            } else {
                Choice::Slack
            }
        }
    }
}

/// A win is any contest where the opponent hunted: keep the same move.
/// A loss (opponent slacked) switches.
fn execute_pavlov(last: ChoicePair) -> Choice {
    match last.theirs {
        Choice::Hunt => last.mine,
        Choice::Slack => last.mine.flipped(),
    }
}
