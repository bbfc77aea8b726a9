//! Error types for tournament construction and play

use std::io;

use thiserror::Error;

/// Caller mistakes caught before any round is played
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be at least 0 and at most 1 (got {value})")]
    OutOfUnitRange { field: &'static str, value: f64 },

    #[error("average_rounds ({average_rounds}) must be greater than min_rounds ({min_rounds})")]
    RoundsOrder { min_rounds: u32, average_rounds: u32 },

    #[error("a tournament needs at least 2 players (got {count})")]
    NotEnoughPlayers { count: usize },

    #[error("invalid roster entry: {0}")]
    BadRosterEntry(String),
}

impl ConfigError {
    /// Reject probabilities and thresholds outside [0, 1] (NaN included)
    pub fn check_unit(field: &'static str, value: f64) -> Result<f64, ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::OutOfUnitRange { field, value })
        }
    }
}

/// Failures while driving a tournament
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A strategy returned a choice vector that does not line up with its opponents
    #[error("strategy for {player} returned {got} choices for {expected} opponents")]
    StrategyContract {
        player: String,
        expected: usize,
        got: usize,
    },

    #[error("tournament has already finished")]
    Finished,
}

/// Failure of the transcript sink; never changes the game outcome
#[derive(Debug, Error)]
#[error("transcript sink failed: {0}")]
pub struct TranscriptError(#[from] pub io::Error);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_unit_bounds() {
        assert_eq!(ConfigError::check_unit("p_hunt", 0.0), Ok(0.0));
        assert_eq!(ConfigError::check_unit("p_hunt", 1.0), Ok(1.0));
        assert!(ConfigError::check_unit("p_hunt", -0.01).is_err());
        assert!(ConfigError::check_unit("p_hunt", 1.01).is_err());
        assert!(ConfigError::check_unit("p_hunt", f64::NAN).is_err());
    }

    #[test]
    fn test_messages_name_the_field() {
        let err = ConfigError::check_unit("evil_threshold", 2.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "evil_threshold must be at least 0 and at most 1 (got 2)"
        );
    }
}
