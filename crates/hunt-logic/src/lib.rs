//! Hunt Logic for the Hunger Games
//!
//! Round engine for an iterated, multi-player Prisoner's Dilemma: every
//! surviving player meets every other player each round, food moves by a
//! fixed payoff table, and a collective bonus rewards enough hunting.
//! Detective strategies re-identify anonymous opponents across rounds from
//! their published reputations alone.

mod bots;
mod detective;
mod error;
mod forecast;
mod game;
mod ledger;
mod player;
mod random;
mod roster;
mod strategy;
mod tournament;
mod transcript;

pub use bots::{
    Alternator, AntiSocial, AverageHunter, BoundedHunter, FairHunter, FixedThreshold, Freeloader,
    MaxRepHunter, Nasty, Pushover, RandomHunter,
};
pub use detective::Detective;
pub use error::{ConfigError, GameError, TranscriptError};
pub use forecast::{
    identify, ForecastBook, ForecastInterval, ForecastRecord, History, Identification,
};
pub use game::{bonus_for, BonusThreshold, RoundSummary};
pub use ledger::Ledger;
pub use player::{sort_standings, Player, PlayerEntry, PlayerId, Standing};
pub use random::SeededRng;
pub use roster::{parse_roster, RosterEntry, StrategySpec};
pub use strategy::{
    AntiSocialRule, Choice, ChoicePair, HistoryRule, HuntProbability, RoundAward, RoundContext,
    Strategy,
};
pub use tournament::{
    Elimination, EndReason, RoundStatus, Tournament, TournamentConfig, TournamentReport, Verdict,
};
pub use transcript::Transcript;

/// Payoff table for a single contest, from `mine`'s side
pub fn payout(mine: Choice, theirs: Choice) -> i64 {
    match (mine, theirs) {
        (Choice::Hunt, Choice::Hunt) => 0,
        (Choice::Hunt, Choice::Slack) => -3,
        (Choice::Slack, Choice::Hunt) => 1,
        (Choice::Slack, Choice::Slack) => -2,
    }
}

/// Invert [`payout`]: the four payoffs are distinct, so each names its pair
pub fn decode_payout(value: i64) -> Option<ChoicePair> {
    let (mine, theirs) = match value {
        0 => (Choice::Hunt, Choice::Hunt),
        -3 => (Choice::Hunt, Choice::Slack),
        1 => (Choice::Slack, Choice::Hunt),
        -2 => (Choice::Slack, Choice::Slack),
        _ => return None,
    };
    Some(ChoicePair { mine, theirs })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH: [Choice; 2] = [Choice::Hunt, Choice::Slack];

    #[test]
    fn test_payout_matrix() {
        assert_eq!(payout(Choice::Hunt, Choice::Hunt), 0);
        assert_eq!(payout(Choice::Hunt, Choice::Slack), -3);
        assert_eq!(payout(Choice::Slack, Choice::Hunt), 1);
        assert_eq!(payout(Choice::Slack, Choice::Slack), -2);
    }

    #[test]
    fn test_pair_welfare() {
        for a in BOTH {
            for b in BOTH {
                let welfare = payout(a, b) + payout(b, a);
                let expected = match (a, b) {
                    (Choice::Hunt, Choice::Hunt) => 0,
                    (Choice::Slack, Choice::Slack) => -4,
                    _ => -2,
                };
                assert_eq!(welfare, expected, "{:?}/{:?}", a, b);
            }
        }
    }

    #[test]
    fn test_payout_decodes_back() {
        for value in [0, -3, 1, -2] {
            let pair = decode_payout(value).unwrap();
            assert_eq!(payout(pair.mine, pair.theirs), value);
        }
        for a in BOTH {
            for b in BOTH {
                assert_eq!(decode_payout(payout(a, b)), Some(ChoicePair { mine: a, theirs: b }));
            }
        }
    }

    #[test]
    fn test_unknown_payout_does_not_decode() {
        assert_eq!(decode_payout(2), None);
        assert_eq!(decode_payout(-1), None);
    }
}
