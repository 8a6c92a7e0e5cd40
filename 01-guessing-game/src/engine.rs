//! Round state machine: target selection, guess evaluation, attempt accounting and hints.
//!
//! A round moves NotStarted -> InProgress -> {Won, Lost}. `start_new_round` is the only way
//! into InProgress and is allowed from any state; `submit_guess` is the only way out.
//! Terminal outcomes are ordinary return values; errors mean the caller used the engine
//! in the wrong state.

use std::time::Duration;

use tracing::{debug, info};

use crate::clock::{GameClock, Stopwatch};
use crate::models::{DifficultyLevel, GameError, GuessOutcome, Result, RoundStatus, MAX_TARGET, MIN_TARGET};
use crate::random::{RandomSource, SystemRandom};

/// Smallest hint buffer, inclusive.
pub const HINT_BUFFER_MIN: i32 = 5;
/// Largest hint buffer, exclusive.
pub const HINT_BUFFER_MAX: i32 = 16;

#[derive(Debug, Clone)]
struct RoundState {
    difficulty: DifficultyLevel,
    target: i32,
    max_attempts: u32,
    attempts_used: u32,
    is_over: bool,
    is_won: bool,
}

impl RoundState {
    fn status(&self) -> RoundStatus {
        match (self.is_over, self.is_won) {
            (false, _) => RoundStatus::InProgress,
            (true, true) => RoundStatus::Won,
            (true, false) => RoundStatus::Lost,
        }
    }
}

/// Owns the current round plus its injected random source and clock.
#[derive(Debug)]
pub struct GameEngine<R = SystemRandom, C = Stopwatch> {
    rng: R,
    clock: C,
    round: Option<RoundState>,
}

impl<R: RandomSource, C: GameClock> GameEngine<R, C> {
    pub fn new(rng: R, clock: C) -> Self {
        Self { rng, clock, round: None }
    }

    /// Discards any previous round and begins a fresh one.
    pub fn start_new_round(&mut self, difficulty: DifficultyLevel) {
        let target = self.rng.next_in_range(MIN_TARGET, MAX_TARGET + 1);
        let max_attempts = difficulty.max_attempts();
        self.round = Some(RoundState { difficulty, target, max_attempts, attempts_used: 0, is_over: false, is_won: false });
        self.clock.reset();
        self.clock.start();
        info!(%difficulty, max_attempts, "round started");
    }

    /// Scores one guess. Any integer is accepted; range checking belongs to the caller.
    pub fn submit_guess(&mut self, guess: i32) -> Result<GuessOutcome> {
        let round = self.active_round_mut("cannot guess")?;
        round.attempts_used += 1;
        let attempts = round.attempts_used;

        let outcome = if guess == round.target {
            round.is_won = true;
            round.is_over = true;
            GuessOutcome::Correct
        } else if round.attempts_used >= round.max_attempts {
            round.is_over = true;
            GuessOutcome::OutOfAttempts
        } else if guess < round.target {
            GuessOutcome::TooLow
        } else {
            GuessOutcome::TooHigh
        };

        debug!(guess, attempts, ?outcome, "guess scored");
        if outcome.is_terminal() {
            self.clock.stop();
            info!(?outcome, attempts, elapsed_ms = self.clock.elapsed().as_millis() as u64, "round finished");
        }
        Ok(outcome)
    }

    /// Range around the target, widened by a fresh random buffer on each call and clamped
    /// to the guessable range. Does not consume an attempt.
    pub fn hint_range(&mut self) -> Result<(i32, i32)> {
        let target = self.active_round_mut("cannot give a hint")?.target;
        let buffer = self.rng.next_in_range(HINT_BUFFER_MIN, HINT_BUFFER_MAX);
        let lower = (target - buffer).max(MIN_TARGET);
        let upper = (target + buffer).min(MAX_TARGET);
        debug!(buffer, lower, upper, "hint issued");
        Ok((lower, upper))
    }

    fn active_round_mut(&mut self, action: &str) -> Result<&mut RoundState> {
        match self.round.as_mut() {
            None => Err(GameError::InvalidState(format!("{action}: no round has been started"))),
            Some(r) if r.is_over => Err(GameError::InvalidState(format!("{action}: the round is already over"))),
            Some(r) => Ok(r),
        }
    }

    pub fn status(&self) -> RoundStatus {
        self.round.as_ref().map_or(RoundStatus::NotStarted, RoundState::status)
    }

    pub fn difficulty(&self) -> Option<DifficultyLevel> { self.round.as_ref().map(|r| r.difficulty) }

    pub fn attempts_used(&self) -> u32 { self.round.as_ref().map_or(0, |r| r.attempts_used) }

    pub fn remaining_attempts(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.max_attempts - r.attempts_used)
    }

    pub fn max_attempts(&self) -> u32 { self.round.as_ref().map_or(0, |r| r.max_attempts) }

    pub fn is_over(&self) -> bool { self.round.as_ref().is_some_and(|r| r.is_over) }

    pub fn is_won(&self) -> bool { self.round.as_ref().is_some_and(|r| r.is_won) }

    /// The secret number, or `None` before the first round.
    pub fn target(&self) -> Option<i32> { self.round.as_ref().map(|r| r.target) }

    pub fn elapsed(&self) -> Duration { self.clock.elapsed() }

    pub fn clock(&self) -> &C { &self.clock }

    pub fn clock_mut(&mut self) -> &mut C { &mut self.clock }

    pub fn random(&self) -> &R { &self.rng }
}

impl Default for GameEngine {
    fn default() -> Self { Self::new(SystemRandom::new(), Stopwatch::new()) }
}
