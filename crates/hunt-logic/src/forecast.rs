//! Re-identification of anonymous opponents across reputation reshuffles
//!
//! Seating is reshuffled every round, so an opponent can only be recognised
//! by its reputation. After a round with reputations known, each opponent's
//! reputation can move only within a narrow interval during the next round:
//! it will have hunted somewhere between none and all of its new contests.
//! Matching next round's reputations against those intervals (and repeating
//! once a match removes a candidate) recovers who is who. Payoffs are
//! invertible, so the choices played against each opponent are known too.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::decode_payout;
use crate::strategy::ChoicePair;

/// Closed interval of reputations an opponent may present next round
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastInterval {
    pub low: f64,
    pub high: f64,
}

impl ForecastInterval {
    pub const UNBOUNDED: ForecastInterval = ForecastInterval { low: 0.0, high: 1.0 };

    /// Interval for an opponent at `reputation` after `contests_so_far`
    /// contests that will play `contests_next` more.
    ///
    /// A zero reputation gives no usable hunt count, so it widens to `[0, 1]`.
    pub fn forecast(reputation: f64, contests_so_far: u64, contests_next: u64) -> Self {
        let total = contests_so_far + contests_next;
        if reputation == 0.0 || total == 0 {
            return Self::UNBOUNDED;
        }
        // hunts are integral; rounding strips the error of the published ratio
        let hunts = (reputation * contests_so_far as f64).round();
        Self {
            low: hunts / total as f64,
            high: (hunts + contests_next as f64) / total as f64,
        }
    }

    pub fn contains(&self, reputation: f64) -> bool {
        self.low <= reputation && reputation <= self.high
    }
}

/// What is known about an opponent's last contest against us
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum History {
    #[default]
    Unknown,
    Known(ChoicePair),
}

/// One opponent as seen at the start of a round
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub reputation: f64,
    pub interval: ForecastInterval,
    /// Filled in from the payoffs once the round has been played
    pub history: History,
}

/// Result of matching actual reputations against forecast records
#[derive(Clone, Debug, PartialEq)]
pub struct Identification {
    /// For each actual reputation, the index of the record it was matched to
    pub matches: Vec<Option<usize>>,
    /// Full scans over the records before reaching the fixed point
    pub passes: usize,
}

impl Identification {
    pub fn matched_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_some()).count()
    }
}

/// Match each record to the single remaining reputation inside its interval.
///
/// Every scan claims the uniquely-placed reputations, which may leave other
/// intervals with a single candidate on the next scan. Stops when a scan
/// claims nothing, or nothing is left to claim.
pub fn identify(actual: &[f64], records: &[ForecastRecord]) -> Identification {
    let mut matches: Vec<Option<usize>> = vec![None; actual.len()];
    let mut record_done = vec![false; records.len()];
    let mut remaining = actual.len();
    let mut unmatched_records = records.len();
    let mut passes = 0;

    while remaining > 0 && unmatched_records > 0 {
        passes += 1;
        let mut progress = false;

        for (r, record) in records.iter().enumerate() {
            if record_done[r] {
                continue;
            }
            let candidates: Vec<usize> = actual
                .iter()
                .enumerate()
                .filter(|(i, rep)| matches[*i].is_none() && record.interval.contains(**rep))
                .map(|(i, _)| i)
                .collect();

            if let [only] = candidates[..] {
                matches[only] = Some(r);
                record_done[r] = true;
                remaining -= 1;
                unmatched_records -= 1;
                progress = true;
            }
        }

        if !progress {
            break;
        }
    }

    Identification { matches, passes }
}

/// Forecast records and contest count carried by a detective between rounds
#[derive(Clone, Debug, Default)]
pub struct ForecastBook {
    records: Vec<ForecastRecord>,
    contests_so_far: u64,
}

impl ForecastBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    pub fn contests_so_far(&self) -> u64 {
        self.contests_so_far
    }

    /// Start a round: recover last-round histories for the opponents now
    /// listed, then forecast their reputations for the round about to play.
    ///
    /// Returns one history per entry of `opponents`, in order.
    pub fn begin_round(&mut self, opponents: &[f64]) -> Vec<History> {
        let identification = identify(opponents, &self.records);
        debug!(
            "identified {} of {} opponents in {} passes",
            identification.matched_count(),
            opponents.len(),
            identification.passes
        );

        let histories = identification
            .matches
            .iter()
            .map(|m| m.map_or(History::Unknown, |r| self.records[r].history))
            .collect();

        let contests_next = opponents.len() as u64;
        self.records = opponents
            .iter()
            .map(|&reputation| ForecastRecord {
                reputation,
                interval: ForecastInterval::forecast(
                    reputation,
                    self.contests_so_far,
                    contests_next,
                ),
                history: History::Unknown,
            })
            .collect();
        self.contests_so_far += contests_next;

        histories
    }

    /// Attach the choice pair decoded from each payoff to its record
    pub fn record_outcomes(&mut self, payoffs: &[i64]) {
        for (record, payoff) in self.records.iter_mut().zip(payoffs) {
            record.history = decode_payout(*payoff).map_or(History::Unknown, History::Known);
        }
    }
}
