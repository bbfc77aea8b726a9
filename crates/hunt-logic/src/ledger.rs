//! Per-player reputation bookkeeping

use serde::{Deserialize, Serialize};

/// Running hunt and contest counters for one player
///
/// Only integer counters are stored; reputation is derived on demand so it
/// never accumulates rounding drift.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    hunts: u64,
    opportunities: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one round: `hunts` hunt choices over `contests` contests.
    ///
    /// Hunts beyond the contest count are clamped so `hunts <= opportunities`
    /// holds even for a misbehaving caller.
    pub fn record_round(&mut self, hunts: u64, contests: u64) {
        self.opportunities += contests;
        self.hunts += hunts.min(contests);
    }

    pub fn hunts(&self) -> u64 {
        self.hunts
    }

    pub fn opportunities(&self) -> u64 {
        self.opportunities
    }

    /// Lifetime fraction of hunts; 0 before any contest
    pub fn reputation(&self) -> f64 {
        if self.opportunities == 0 {
            0.0
        } else {
            self.hunts as f64 / self.opportunities as f64
        }
    }
}
