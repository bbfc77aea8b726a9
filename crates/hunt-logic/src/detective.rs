//! Detective strategies: track opponents through the reshuffle and play a
//! history rule against those recognised.

use log::debug;

use crate::error::ConfigError;
use crate::forecast::{ForecastBook, History};
use crate::random::SeededRng;
use crate::strategy::{AntiSocialRule, Choice, HistoryRule, HuntProbability, RoundContext, Strategy};

/// Random anti-social play against strangers, `rule` against recognised opponents
#[derive(Clone, Debug)]
pub struct Detective {
    rule: HistoryRule,
    fallback: AntiSocialRule,
    book: ForecastBook,
}

impl Detective {
    pub fn new(rule: HistoryRule, fallback: AntiSocialRule) -> Result<Self, ConfigError> {
        Ok(Self {
            rule: rule.validate()?,
            fallback,
            book: ForecastBook::new(),
        })
    }

    /// Generous tit-for-tat detective
    pub fn generous_tit_for_tat(
        p_hunt: f64,
        antisocial_threshold: f64,
        evil_threshold: f64,
        generosity: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            HistoryRule::GenerousTitForTat { generosity },
            fixed_fallback(p_hunt, antisocial_threshold, evil_threshold)?,
        )
    }

    /// Win-stay, lose-switch detective
    pub fn pavlov(
        p_hunt: f64,
        antisocial_threshold: f64,
        evil_threshold: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            HistoryRule::Pavlov,
            fixed_fallback(p_hunt, antisocial_threshold, evil_threshold)?,
        )
    }

    /// Pavlov detective that still slacks against low-reputation opponents it knows
    pub fn guarded_pavlov(
        p_hunt: f64,
        antisocial_threshold: f64,
        evil_threshold: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            HistoryRule::GuardedPavlov { evil_threshold },
            fixed_fallback(p_hunt, antisocial_threshold, evil_threshold)?,
        )
    }

    pub fn book(&self) -> &ForecastBook {
        &self.book
    }

    fn choose_one(&self, round: u32, rep: f64, history: History, rng: &mut SeededRng) -> Choice {
        if round == 1 {
            return Choice::Hunt;
        }
        match history {
            History::Known(last) => self.rule.execute(round, last, rep, rng),
            History::Unknown => self.fallback.execute(round, rep, rng),
        }
    }
}

fn fixed_fallback(
    p_hunt: f64,
    antisocial_threshold: f64,
    evil_threshold: f64,
) -> Result<AntiSocialRule, ConfigError> {
    AntiSocialRule::new(
        HuntProbability::Fixed(p_hunt),
        antisocial_threshold,
        evil_threshold,
    )
}

impl Strategy for Detective {
    fn name(&self) -> String {
        let p_hunt = match self.fallback.hunt_probability {
            HuntProbability::Fixed(p) => p,
            HuntProbability::OpponentReputation => 0.0,
        };
        let base = format!(
            "RAS{}{}_{}_{}",
            self.rule.tag(),
            p_hunt,
            self.fallback.antisocial_threshold,
            self.fallback.evil_threshold
        );
        match self.rule {
            HistoryRule::GenerousTitForTat { generosity } => format!("{}_{}", base, generosity),
            _ => base,
        }
    }

    fn choose_all(
        &mut self,
        ctx: &RoundContext,
        opponents: &[f64],
        rng: &mut SeededRng,
    ) -> Vec<Choice> {
        let histories = self.book.begin_round(opponents);

        if ctx.logging {
            let known = histories.iter().filter(|h| matches!(h, History::Known(_))).count();
            debug!(
                "round {}: {} of {} opponents recognised",
                ctx.round,
                known,
                opponents.len()
            );
        }

        opponents
            .iter()
            .zip(histories)
            .map(|(rep, history)| self.choose_one(ctx.round, *rep, history, rng))
            .collect()
    }

    fn on_outcomes(&mut self, payoffs: &[i64]) {
        self.book.record_outcomes(payoffs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastInterval;

    fn ctx(round: u32) -> RoundContext {
        RoundContext {
            round,
            food: 300,
            reputation: 0.5,
            threshold: 1,
            logging: true,
        }
    }

    fn make_rng() -> SeededRng {
        SeededRng::new(&[42u8; 32], 0)
    }

    #[test]
    fn test_names() {
        let gtft = Detective::generous_tit_for_tat(0.5, 0.8, 0.2, 0.1).unwrap();
        assert_eq!(gtft.name(), "RASGeT0.5_0.8_0.2_0.1");
        let pav = Detective::pavlov(0.5, 0.8, 0.2).unwrap();
        assert_eq!(pav.name(), "RASPav0.5_0.8_0.2");
        let pav2 = Detective::guarded_pavlov(0.5, 0.8, 0.2).unwrap();
        assert_eq!(pav2.name(), "RASPav20.5_0.8_0.2");
    }

    #[test]
    fn test_rejects_out_of_range_parameters() {
        assert!(Detective::generous_tit_for_tat(0.5, 0.8, 0.2, 1.1).is_err());
        assert!(Detective::pavlov(-0.5, 0.8, 0.2).is_err());
        assert!(Detective::guarded_pavlov(0.5, 0.8, 7.0).is_err());
    }

    #[test]
    fn test_round_one_always_hunts() {
        let mut detective = Detective::pavlov(0.0, 0.0, 1.0).unwrap();
        let mut rng = make_rng();
        let choices = detective.choose_all(&ctx(1), &[0.0, 0.0, 0.0], &mut rng);
        assert_eq!(choices, vec![Choice::Hunt; 3]);
    }

    #[test]
    fn test_tit_for_tat_against_recognised_slacker() {
        // fallback would always hunt in the band; history says slack
        let mut detective = Detective::generous_tit_for_tat(1.0, 1.0, 0.0, 0.0).unwrap();
        let mut rng = make_rng();

        detective.choose_all(&ctx(1), &[0.0], &mut rng);
        detective.on_outcomes(&[-3]);
        let choices = detective.choose_all(&ctx(2), &[0.0], &mut rng);
        assert_eq!(choices, vec![Choice::Slack]);
    }

    #[test]
    fn test_unrecognised_opponents_use_fallback() {
        let mut detective = Detective::generous_tit_for_tat(1.0, 1.0, 0.0, 0.0).unwrap();
        let mut rng = make_rng();

        detective.choose_all(&ctx(1), &[0.0, 0.0], &mut rng);
        detective.on_outcomes(&[-3, -3]);
        // two identical [0, 1] forecasts cannot be told apart
        let choices = detective.choose_all(&ctx(2), &[0.0, 0.0], &mut rng);
        assert_eq!(choices, vec![Choice::Hunt, Choice::Hunt]);
    }

    #[test]
    fn test_forecasts_rebuilt_each_round() {
        let mut detective = Detective::pavlov(0.5, 0.8, 0.2).unwrap();
        let mut rng = make_rng();
        detective.choose_all(&ctx(1), &[0.0, 0.0], &mut rng);
        detective.on_outcomes(&[0, 0]);
        detective.choose_all(&ctx(2), &[1.0, 0.5], &mut rng);

        let records = detective.book().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].interval, ForecastInterval { low: 0.5, high: 1.0 });
        assert_eq!(records[1].interval, ForecastInterval { low: 0.25, high: 0.75 });
        assert_eq!(detective.book().contests_so_far(), 4);
    }
}
