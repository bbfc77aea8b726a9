//! Tournament entrants: identity, food, ledger and their strategy

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;
use crate::random::SeededRng;
use crate::strategy::Strategy;

/// Stable identity of an entrant
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId {
    pub name: String,
    /// Disambiguates several entrants sharing a strategy name
    pub id: Option<u32>,
}

impl PlayerId {
    pub fn new(name: impl Into<String>, id: Option<u32>) -> Self {
        Self { name: name.into(), id }
    }

    /// `Name` or `Name[id]`
    pub fn uid(&self) -> String {
        match self.id {
            Some(id) => format!("{}[{}]", self.name, id),
            None => self.name.clone(),
        }
    }

    /// `Name` or `Name00042`, used to order ties
    pub fn sort_key(&self) -> String {
        match self.id {
            Some(id) => format!("{}{:05}", self.name, id),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uid())
    }
}

/// Builder for one roster entry
pub struct PlayerEntry {
    strategy: Box<dyn Strategy>,
    id: Option<u32>,
    logging: bool,
    under_test: bool,
}

impl PlayerEntry {
    pub fn new(strategy: impl Strategy + 'static) -> Self {
        Self::boxed(Box::new(strategy))
    }

    pub fn boxed(strategy: Box<dyn Strategy>) -> Self {
        Self {
            strategy,
            id: None,
            logging: false,
            under_test: false,
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// Mark this entrant as the one whose elimination ends an early-exit game
    pub fn under_test(mut self) -> Self {
        self.under_test = true;
        self
    }

    pub(crate) fn into_player(self, food: i64, rng: SeededRng) -> Player {
        Player {
            id: PlayerId::new(self.strategy.name(), self.id),
            strategy: self.strategy,
            food,
            ledger: Ledger::new(),
            rng,
            logging: self.logging,
            under_test: self.under_test,
        }
    }
}

/// An entrant seated in a running tournament
pub struct Player {
    id: PlayerId,
    pub(crate) strategy: Box<dyn Strategy>,
    pub(crate) food: i64,
    pub(crate) ledger: Ledger,
    pub(crate) rng: SeededRng,
    logging: bool,
    under_test: bool,
}

impl Player {
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn food(&self) -> i64 {
        self.food
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn reputation(&self) -> f64 {
        self.ledger.reputation()
    }

    pub fn logging(&self) -> bool {
        self.logging
    }

    pub fn is_under_test(&self) -> bool {
        self.under_test
    }

    pub fn standing(&self) -> Standing {
        Standing {
            uid: self.id.uid(),
            sort_key: self.id.sort_key(),
            food: self.food,
            reputation: self.reputation(),
        }
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("food", &self.food)
            .field("ledger", &self.ledger)
            .finish()
    }
}

/// Snapshot of an entrant for reports and transcripts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub uid: String,
    pub sort_key: String,
    pub food: i64,
    pub reputation: f64,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:.3}", self.uid, self.food, self.reputation)
    }
}

/// Order by food descending, ties by sort key
pub fn sort_standings(standings: &mut [Standing]) {
    standings.sort_by(|a, b| b.food.cmp(&a.food).then_with(|| a.sort_key.cmp(&b.sort_key)));
}
