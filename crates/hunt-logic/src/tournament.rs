//! Tournament controller: repeated rounds, eliminations and the verdict

use std::io::Write;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GameError, TranscriptError};
use crate::game::{play_round, BonusThreshold, RoundSummary};
use crate::player::{sort_standings, Player, PlayerEntry, Standing};
use crate::random::SeededRng;
use crate::transcript::Transcript;

/// Food each player starts with per opponent
const FOOD_PER_OPPONENT: i64 = 300;

/// Game-wide parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub min_rounds: u32,
    /// Mean game length; must exceed `min_rounds`
    pub average_rounds: u32,
    /// End as soon as the player under test starves
    pub end_early: bool,
    pub verbose: bool,
    pub seed: [u8; 32],
    pub bonus_threshold: BonusThreshold,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            min_rounds: 300,
            average_rounds: 1000,
            end_early: false,
            verbose: true,
            seed: [0u8; 32],
            bonus_threshold: BonusThreshold::Random,
        }
    }
}

impl TournamentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.average_rounds <= self.min_rounds {
            return Err(ConfigError::RoundsOrder {
                min_rounds: self.min_rounds,
                average_rounds: self.average_rounds,
            });
        }
        Ok(())
    }

    /// Round limit: `min_rounds` plus an exponential tail with the configured mean
    fn draw_max_rounds(&self, rng: &mut SeededRng) -> u32 {
        let mean = f64::from(self.average_rounds - self.min_rounds);
        let tail = rng.next_exponential(mean).floor();
        self.min_rounds.saturating_add(tail.min(f64::from(u32::MAX)) as u32)
    }
}

/// Why the game stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TooFewPlayers,
    RoundLimit,
    PlayerUnderTestEliminated,
}

/// What a call to `play_round` left behind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStatus {
    Continue,
    Finished(EndReason),
}

/// Outcome among the survivors
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    EveryoneStarved,
    Winner(String),
    /// Several survivors share the highest food
    Tie(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elimination {
    pub uid: String,
    pub round: u32,
}

/// Final record of a tournament
#[derive(Debug, Serialize)]
pub struct TournamentReport {
    pub rounds_played: u32,
    pub max_rounds: u32,
    pub end_reason: Option<EndReason>,
    pub verdict: Verdict,
    /// Survivors by food descending
    pub survivors: Vec<Standing>,
    pub eliminations: Vec<Elimination>,
    /// Transcript failure, if any; the rest of the report stands regardless
    #[serde(skip)]
    pub sink_error: Option<TranscriptError>,
}

pub struct Tournament {
    players: Vec<Player>,
    config: TournamentConfig,
    round: u32,
    max_rounds: u32,
    rng: SeededRng,
    transcript: Transcript,
    eliminations: Vec<Elimination>,
    last_round: Option<RoundSummary>,
    ended: Option<EndReason>,
    /// Set when a round failed part way; seats and strategy state are then unusable
    aborted: bool,
}

impl Tournament {
    /// Seat the roster and draw the round limit.
    ///
    /// Fails before any round if the configuration or roster is unusable.
    pub fn new(
        entries: Vec<PlayerEntry>,
        config: TournamentConfig,
        sink: Option<Box<dyn Write>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if entries.len() < 2 {
            return Err(ConfigError::NotEnoughPlayers {
                count: entries.len(),
            });
        }

        let mut rng = SeededRng::new(&config.seed, 0);
        let max_rounds = config.draw_max_rounds(&mut rng);
        let start_food = FOOD_PER_OPPONENT * (entries.len() as i64 - 1);

        let players: Vec<Player> = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                entry.into_player(start_food, SeededRng::new(&config.seed, i as u32 + 1))
            })
            .collect();

        let mut transcript = Transcript::new(sink, config.verbose);
        transcript.detail(format!(
            "Game parameters:\n # players: {}\n verbose: {}\n min_rounds: {}\n \
             average_rounds: {}\n end_early: {}\n",
            players.len(),
            config.verbose,
            config.min_rounds,
            config.average_rounds,
            config.end_early
        ));
        info!(
            "tournament seated {} players, {} food each, round limit {}",
            players.len(),
            start_food,
            max_rounds
        );

        Ok(Self {
            players,
            config,
            round: 0,
            max_rounds,
            rng,
            transcript,
            eliminations: Vec::new(),
            last_round: None,
            ended: None,
            aborted: false,
        })
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn eliminations(&self) -> &[Elimination] {
        &self.eliminations
    }

    pub fn last_round(&self) -> Option<&RoundSummary> {
        self.last_round.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.ended.is_some() || self.aborted
    }

    /// Play the next round and evaluate termination
    pub fn play_round(&mut self) -> Result<RoundStatus, GameError> {
        if self.is_finished() {
            return Err(GameError::Finished);
        }

        let round = self.round + 1;
        self.transcript.detail("");
        self.transcript.detail(format!("Begin Round {}:", round));

        let summary = match play_round(
            &mut self.players,
            round,
            self.config.bonus_threshold,
            &mut self.rng,
        ) {
            Ok(summary) => summary,
            Err(err) => {
                self.aborted = true;
                warn!("round {} aborted: {}", round, err);
                return Err(err);
            }
        };
        self.round = round;

        self.transcript.detail(format!(
            "There were {} hunts of {} needed for bonus",
            summary.total_hunts, summary.threshold
        ));
        if summary.bonus_awarded() {
            self.transcript.detail(format!(
                "Cooperation Threshold Achieved. Bonus of {} awarded to each player",
                summary.bonus
            ));
        }
        if self.transcript.is_verbose() {
            for standing in self.standings() {
                self.transcript.line(format!(
                    "Player {} now has {} food and a reputation of {:.3}",
                    standing.uid, standing.food, standing.reputation
                ));
            }
        }
        debug!(
            "round {}: m={} hunts={} bonus={}",
            summary.round, summary.threshold, summary.total_hunts, summary.bonus
        );
        self.last_round = Some(summary);

        let under_test_starved = self.remove_starved();
        let status = match self.end_reason(under_test_starved) {
            Some(reason) => {
                self.ended = Some(reason);
                self.transcript.line("");
                self.transcript
                    .line(format!("Game Completed after {} rounds", self.round));
                info!("game over after {} rounds: {:?}", self.round, reason);
                RoundStatus::Finished(reason)
            }
            None => RoundStatus::Continue,
        };
        Ok(status)
    }

    /// Play to completion and produce the report
    pub fn run(mut self) -> Result<TournamentReport, GameError> {
        self.transcript.line("Playing the game to the end:");
        while let RoundStatus::Continue = self.play_round()? {}
        Ok(self.finish())
    }

    /// Close the transcript and report the current state
    pub fn finish(mut self) -> TournamentReport {
        let survivors = self.standings();
        let verdict = verdict_for(&survivors);

        match &verdict {
            Verdict::EveryoneStarved => self.transcript.line("Everyone starved"),
            Verdict::Winner(uid) => self.transcript.line(format!("The winner is: {}", uid)),
            Verdict::Tie(uids) => self
                .transcript
                .line(format!("Tied for the lead: {}", uids.join(", "))),
        }
        if survivors.len() > 1 {
            self.transcript.line("Multiple survivors:");
            let listing: Vec<String> = survivors.iter().map(Standing::to_string).collect();
            self.transcript.line(format!("[{}]", listing.join(", ")));
        }

        let sink_error = self.transcript.finish();
        TournamentReport {
            rounds_played: self.round,
            max_rounds: self.max_rounds,
            end_reason: self.ended,
            verdict,
            survivors,
            eliminations: std::mem::take(&mut self.eliminations),
            sink_error,
        }
    }

    /// Current players by food descending, ties by sort key
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self.players.iter().map(Player::standing).collect();
        sort_standings(&mut standings);
        standings
    }

    /// Drop every player at or below zero food; true if the player under test was among them
    fn remove_starved(&mut self) -> bool {
        let round = self.round;
        let mut under_test_starved = false;

        for player in self.players.iter().filter(|p| p.food() <= 0) {
            let uid = player.id().uid();
            self.transcript.line(format!(
                "{} has starved and been eliminated in round {}",
                uid, round
            ));
            info!("{} eliminated in round {}", uid, round);
            under_test_starved |= player.is_under_test();
            self.eliminations.push(Elimination { uid, round });
        }
        self.players.retain(|p| p.food() > 0);

        under_test_starved
    }

    fn end_reason(&self, under_test_starved: bool) -> Option<EndReason> {
        if self.players.len() < 2 {
            Some(EndReason::TooFewPlayers)
        } else if self.round > self.max_rounds {
            Some(EndReason::RoundLimit)
        } else if under_test_starved && self.config.end_early {
            Some(EndReason::PlayerUnderTestEliminated)
        } else {
            None
        }
    }
}

fn verdict_for(survivors: &[Standing]) -> Verdict {
    let Some(leader) = survivors.first() else {
        return Verdict::EveryoneStarved;
    };
    let leaders: Vec<String> = survivors
        .iter()
        .take_while(|s| s.food == leader.food)
        .map(|s| s.uid.clone())
        .collect();
    if leaders.len() == 1 {
        Verdict::Winner(leader.uid.clone())
    } else {
        Verdict::Tie(leaders)
    }
}
