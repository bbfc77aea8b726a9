//! Round execution engine

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::payout;
use crate::player::Player;
use crate::random::SeededRng;
use crate::strategy::{Choice, RoundAward, RoundContext};

/// How the collective-bonus threshold `m` is chosen each round
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusThreshold {
    /// Uniform in [1, P·(P−1))
    #[default]
    Random,
    /// The same `m` every round
    Fixed(u64),
}

impl BonusThreshold {
    fn draw(self, player_count: usize, rng: &mut SeededRng) -> u64 {
        match self {
            BonusThreshold::Random => {
                let p = player_count as u64;
                rng.next_range_between(1, p * p.saturating_sub(1))
            }
            BonusThreshold::Fixed(m) => m,
        }
    }
}

/// Bonus every player receives when the threshold is met
pub fn bonus_for(player_count: usize) -> i64 {
    2 * (player_count as i64 - 1)
}

/// Result of a single round
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub threshold: u64,
    pub total_hunts: u64,
    /// Bonus awarded to each player (0 when the threshold was missed)
    pub bonus: i64,
}

impl RoundSummary {
    pub fn bonus_awarded(&self) -> bool {
        self.bonus > 0
    }
}

/// Play one round over the seated players.
///
/// Seats are reshuffled first; every strategy sees the reputations from
/// before the round so all choices are simultaneous.
pub(crate) fn play_round(
    players: &mut [Player],
    round: u32,
    threshold_mode: BonusThreshold,
    rng: &mut SeededRng,
) -> Result<RoundSummary, GameError> {
    let count = players.len();
    let threshold = threshold_mode.draw(count, rng);

    rng.shuffle(players);
    let reputations: Vec<f64> = players.iter().map(Player::reputation).collect();

    // Row i holds player i's choice against seat j; the own seat stays empty
    let mut choices: Vec<Vec<Option<Choice>>> = Vec::with_capacity(count);
    for (i, player) in players.iter_mut().enumerate() {
        let opponents: Vec<f64> = reputations
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, rep)| *rep)
            .collect();
        let ctx = RoundContext {
            round,
            food: player.food,
            reputation: reputations[i],
            threshold,
            logging: player.logging(),
        };

        let picked = player.strategy.choose_all(&ctx, &opponents, &mut player.rng);
        if picked.len() != opponents.len() {
            return Err(GameError::StrategyContract {
                player: player.id().uid(),
                expected: opponents.len(),
                got: picked.len(),
            });
        }

        let mut row: Vec<Option<Choice>> = picked.into_iter().map(Some).collect();
        row.insert(i, None);
        choices.push(row);
    }

    let mut payoffs: Vec<Vec<i64>> = vec![Vec::with_capacity(count.saturating_sub(1)); count];
    for i in 0..count {
        for j in 0..count {
            if let (Some(mine), Some(theirs)) = (choices[i][j], choices[j][i]) {
                payoffs[i].push(payout(mine, theirs));
            }
        }
    }

    let hunts: Vec<u64> = choices
        .iter()
        .map(|row| row.iter().flatten().filter(|c| c.is_hunt()).count() as u64)
        .collect();
    let total_hunts: u64 = hunts.iter().sum();

    let bonus = if total_hunts >= threshold { bonus_for(count) } else { 0 };
    let award = RoundAward {
        bonus,
        threshold,
        total_hunts,
    };

    let contests = count as u64 - 1;
    for ((player, own_payoffs), own_hunts) in players.iter_mut().zip(&payoffs).zip(&hunts) {
        let delta = own_payoffs.iter().sum::<i64>() + bonus;
        player.food += delta;
        player.ledger.record_round(*own_hunts, contests);
        player.strategy.on_outcomes(own_payoffs);
        player.strategy.on_round_end(&award);
    }

    Ok(RoundSummary {
        round,
        threshold,
        total_hunts,
        bonus,
    })
}
