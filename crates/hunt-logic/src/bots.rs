//! Catalogue of simple strategies with little or no internal state

use crate::error::ConfigError;
use crate::random::SeededRng;
use crate::strategy::{AntiSocialRule, Choice, HuntProbability, RoundContext, Strategy};

/// Always hunts.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pushover;

impl Strategy for Pushover {
    fn name(&self) -> String {
        "Pushover".to_string()
    }

    fn choose_all(
        &mut self,
        _: &RoundContext,
        opponents: &[f64],
        _: &mut SeededRng,
    ) -> Vec<Choice> {
        vec![Choice::Hunt; opponents.len()]
    }
}

/// Always slacks.
#[derive(Clone, Copy, Debug, Default)]
pub struct Freeloader;

impl Strategy for Freeloader {
    fn name(&self) -> String {
        "Freeloader".to_string()
    }

    fn choose_all(
        &mut self,
        _: &RoundContext,
        opponents: &[f64],
        _: &mut SeededRng,
    ) -> Vec<Choice> {
        vec![Choice::Slack; opponents.len()]
    }
}

/// The default entrant under test: slacks against everyone.
#[derive(Clone, Copy, Debug, Default)]
pub struct Nasty;

impl Strategy for Nasty {
    fn name(&self) -> String {
        "Nasty".to_string()
    }

    fn choose_all(
        &mut self,
        _: &RoundContext,
        opponents: &[f64],
        _: &mut SeededRng,
    ) -> Vec<Choice> {
        vec![Choice::Slack; opponents.len()]
    }
}

/// Alternates hunt and slack contest by contest, carrying over between rounds.
#[derive(Clone, Copy, Debug)]
pub struct Alternator {
    last: Choice,
}

impl Default for Alternator {
    fn default() -> Self {
        Self { last: Choice::Slack }
    }
}

impl Strategy for Alternator {
    fn name(&self) -> String {
        "Alternator".to_string()
    }

    fn choose_all(
        &mut self,
        _: &RoundContext,
        opponents: &[f64],
        _: &mut SeededRng,
    ) -> Vec<Choice> {
        opponents
            .iter()
            .map(|_| {
                self.last = self.last.flipped();
                self.last
            })
            .collect()
    }
}

/// Hunts only with the opponents holding the highest reputation.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxRepHunter;

impl Strategy for MaxRepHunter {
    fn name(&self) -> String {
        "MaxRepHunter".to_string()
    }

    fn choose_all(
        &mut self,
        _: &RoundContext,
        opponents: &[f64],
        _: &mut SeededRng,
    ) -> Vec<Choice> {
        let best = opponents.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        opponents
            .iter()
            .map(|rep| if *rep == best { Choice::Hunt } else { Choice::Slack })
            .collect()
    }
}

/// Hunts with a fixed probability.
#[derive(Clone, Copy, Debug)]
pub struct RandomHunter {
    p_hunt: f64,
}

impl RandomHunter {
    pub fn new(p_hunt: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            p_hunt: ConfigError::check_unit("p_hunt", p_hunt)?,
        })
    }
}

impl Strategy for RandomHunter {
    fn name(&self) -> String {
        format!("Random{}", self.p_hunt)
    }

    fn choose_all(
        &mut self,
        _: &RoundContext,
        opponents: &[f64],
        rng: &mut SeededRng,
    ) -> Vec<Choice> {
        opponents.iter().map(|_| hunt_if(rng.chance(self.p_hunt))).collect()
    }
}

/// Hunts with the same probability each opponent has shown.
#[derive(Clone, Copy, Debug, Default)]
pub struct FairHunter;

impl Strategy for FairHunter {
    fn name(&self) -> String {
        "FairHunter".to_string()
    }

    fn choose_all(
        &mut self,
        _: &RoundContext,
        opponents: &[f64],
        rng: &mut SeededRng,
    ) -> Vec<Choice> {
        opponents.iter().map(|rep| hunt_if(rng.chance(*rep))).collect()
    }
}

/// Hunts whenever the opponent's reputation lies in `[lower, upper]`.
#[derive(Clone, Copy, Debug)]
pub struct BoundedHunter {
    lower: f64,
    upper: f64,
}

impl BoundedHunter {
    pub fn new(lower: f64, upper: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            lower: ConfigError::check_unit("lower", lower)?,
            upper: ConfigError::check_unit("upper", upper)?,
        })
    }
}

impl Strategy for BoundedHunter {
    fn name(&self) -> String {
        format!("BoundedHunter{}-{}", self.lower, self.upper)
    }

    fn choose_all(
        &mut self,
        _: &RoundContext,
        opponents: &[f64],
        _: &mut SeededRng,
    ) -> Vec<Choice> {
        opponents
            .iter()
            .map(|rep| hunt_if(self.lower <= *rep && *rep <= self.upper))
            .collect()
    }
}

/// Tracks the table's average reputation, spreading its hunts at random.
#[derive(Clone, Copy, Debug, Default)]
pub struct AverageHunter;

impl Strategy for AverageHunter {
    fn name(&self) -> String {
        "AverageHunter".to_string()
    }

    fn choose_all(
        &mut self,
        _: &RoundContext,
        opponents: &[f64],
        rng: &mut SeededRng,
    ) -> Vec<Choice> {
        if opponents.is_empty() {
            return Vec::new();
        }
        let average = opponents.iter().sum::<f64>() / opponents.len() as f64;
        opponents.iter().map(|_| hunt_if(rng.chance(average))).collect()
    }
}

/// Ignores `m`: hunts when the opponent's reputation reaches `threshold`,
/// and plays a fixed choice on the first round.
#[derive(Clone, Copy, Debug)]
pub struct FixedThreshold {
    threshold: f64,
    first: Choice,
}

impl FixedThreshold {
    pub fn new(threshold: f64, first: Choice) -> Result<Self, ConfigError> {
        Ok(Self {
            threshold: ConfigError::check_unit("threshold", threshold)?,
            first,
        })
    }
}

impl Strategy for FixedThreshold {
    fn name(&self) -> String {
        format!("FixedThreshold{}{}", self.threshold, self.first)
    }

    fn choose_all(
        &mut self,
        ctx: &RoundContext,
        opponents: &[f64],
        _: &mut SeededRng,
    ) -> Vec<Choice> {
        opponents
            .iter()
            .map(|rep| {
                if ctx.round == 1 {
                    self.first
                } else {
                    hunt_if(*rep >= self.threshold)
                }
            })
            .collect()
    }
}

/// Random or fair hunting that always slacks against the extremes.
#[derive(Clone, Copy, Debug)]
pub struct AntiSocial {
    rule: AntiSocialRule,
}

impl AntiSocial {
    /// Hunts with fixed probability `p_hunt` between the two thresholds
    pub fn random(
        p_hunt: f64,
        antisocial_threshold: f64,
        evil_threshold: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            rule: AntiSocialRule::new(
                HuntProbability::Fixed(p_hunt),
                antisocial_threshold,
                evil_threshold,
            )?,
        })
    }

    /// Hunts with the opponent's reputation as probability between the thresholds
    pub fn fair(antisocial_threshold: f64, evil_threshold: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            rule: AntiSocialRule::new(
                HuntProbability::OpponentReputation,
                antisocial_threshold,
                evil_threshold,
            )?,
        })
    }
}

impl Strategy for AntiSocial {
    fn name(&self) -> String {
        let rule = &self.rule;
        match rule.hunt_probability {
            HuntProbability::Fixed(p) => format!(
                "RandomAntiSocial{}_{}_{}",
                p, rule.antisocial_threshold, rule.evil_threshold
            ),
            HuntProbability::OpponentReputation => format!(
                "FairHunterAntiSocial{}_{}",
                rule.antisocial_threshold, rule.evil_threshold
            ),
        }
    }

    fn choose_all(
        &mut self,
        ctx: &RoundContext,
        opponents: &[f64],
        rng: &mut SeededRng,
    ) -> Vec<Choice> {
        opponents
            .iter()
            .map(|rep| self.rule.execute(ctx.round, *rep, rng))
            .collect()
    }
}

fn hunt_if(hunt: bool) -> Choice {
    if hunt {
        Choice::Hunt
    } else {
        Choice::Slack
    }
}
