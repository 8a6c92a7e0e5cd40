//! Console front end. Reads commands line by line, drives the engine and prints colored feedback.
//! Generic over reader and writer so whole sessions can be scripted in tests.

use std::{
    io::{BufRead, Write},
    sync::Arc,
    time::Duration,
};

use colored::*;
use tracing::warn;

use crate::clock::GameClock;
use crate::engine::GameEngine;
use crate::models::{now, DifficultyLevel, GameError, GuessOutcome, Result, MAX_TARGET, MIN_TARGET};
use crate::random::RandomSource;
use crate::repository::{record_if_best, HighScoreStore};

/// One line of player input during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Hint,
    Guess(i32),
    Invalid,
}

impl Command {
    /// `hint` in any case, or a whole number within the guessable range.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.eq_ignore_ascii_case("hint") {
            return Command::Hint;
        }
        match input.parse::<i32>() {
            Ok(n) if (MIN_TARGET..=MAX_TARGET).contains(&n) => Command::Guess(n),
            _ => Command::Invalid,
        }
    }
}

/// `mm:ss.fff`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}.{:03}", secs / 60, secs % 60, elapsed.subsec_millis())
}

fn input_err(e: std::io::Error) -> GameError { GameError::Input(e.to_string()) }

pub struct ConsoleUi<R, W, G, C> {
    engine: GameEngine<G, C>,
    store: Arc<dyn HighScoreStore>,
    input: R,
    output: W,
}

impl<R, W, G, C> ConsoleUi<R, W, G, C>
where
    R: BufRead,
    W: Write,
    G: RandomSource,
    C: GameClock,
{
    pub fn new(engine: GameEngine<G, C>, store: Arc<dyn HighScoreStore>, input: R, output: W) -> Self {
        Self { engine, store, input, output }
    }

    pub fn engine(&self) -> &GameEngine<G, C> { &self.engine }

    pub fn into_output(self) -> W { self.output }

    /// Runs menus and rounds until the player exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        self.say(format!("{}", "=== Number Guessing Game ===".bold().blue()))?;
        self.say("Welcome to the Number Guessing Game!")?;
        self.say("1. Play Game")?;
        self.say("2. Exit")?;

        loop {
            let Some(choice) = self.prompt("Choose an option:")? else { return Ok(()) };
            match choice.trim() {
                "1" => break,
                "2" => return self.say("Thank you for playing! Goodbye!"),
                _ => self.say(format!("{}", "Please enter 1 or 2.".red()))?,
            }
        }

        loop {
            let Some(difficulty) = self.choose_difficulty()? else { return Ok(()) };
            if !self.play_round(difficulty)? {
                return Ok(());
            }
            if !self.ask_play_again()? {
                return self.say("Thank you for playing! Goodbye!");
            }
            self.say("")?;
        }
    }

    fn choose_difficulty(&mut self) -> Result<Option<DifficultyLevel>> {
        self.say("Please select the difficulty level:")?;
        for d in DifficultyLevel::ALL {
            self.say(format!("{}. {} ({} chances)", d.menu_number(), d, d.max_attempts()))?;
        }
        loop {
            let Some(line) = self.prompt("Difficulty:")? else { return Ok(None) };
            match line.parse::<DifficultyLevel>() {
                Ok(d) => return Ok(Some(d)),
                Err(_) => self.say(format!("{}", "Please choose 1, 2 or 3.".red()))?,
            }
        }
    }

    /// Plays one round; `false` when input ended before the round finished.
    fn play_round(&mut self, difficulty: DifficultyLevel) -> Result<bool> {
        self.engine.start_new_round(difficulty);
        self.say("Let's start the game!")?;
        self.say(format!("I'm thinking of a number between {MIN_TARGET} and {MAX_TARGET}."))?;
        self.say(format!("You have {} chances to guess the correct number.", self.engine.remaining_attempts()))?;

        while !self.engine.is_over() {
            let Some(line) = self.prompt("Enter your guess (or type 'hint'):")? else { return Ok(false) };
            match Command::parse(&line) {
                Command::Hint => {
                    let (low, high) = self.engine.hint_range()?;
                    self.say(format!("{}", format!("Hint: The number is between {low} and {high}.").yellow()))?;
                }
                Command::Invalid => {
                    self.say(format!("{}", format!("Invalid input! Please enter a number between {MIN_TARGET} and {MAX_TARGET}.").red()))?;
                }
                Command::Guess(guess) => match self.engine.submit_guess(guess)? {
                    GuessOutcome::TooLow => {
                        self.say(format!("{}", format!("Incorrect! The number is higher than {guess}.").red()))?;
                    }
                    GuessOutcome::TooHigh => {
                        self.say(format!("{}", format!("Incorrect! The number is lower than {guess}.").red()))?;
                    }
                    GuessOutcome::Correct => self.handle_win()?,
                    GuessOutcome::OutOfAttempts => self.handle_loss()?,
                },
            }
        }
        Ok(true)
    }

    fn handle_win(&mut self) -> Result<()> {
        let attempts = self.engine.attempts_used();
        let elapsed = format_elapsed(self.engine.elapsed());

        let update = match record_if_best(self.store.as_ref(), attempts, now()) {
            Ok(update) => Some(update),
            Err(GameError::CorruptData(reason)) => {
                warn!(%reason, "stored high score is unreadable; replacing it");
                self.say(format!("{}", "The saved high score could not be read and will be replaced.".yellow()))?;
                match self.store.save(attempts, now()) {
                    Ok(()) => None,
                    Err(e) => return self.report_save_failure(e),
                }
            }
            Err(e) => return self.report_save_failure(e),
        };

        let message = match update {
            Some(u) if !u.is_new_record => format!(
                "Congratulations! You have guessed the correct number in {attempts} attempts. Time taken: {elapsed}. Well done!"
            ),
            _ => format!("New High Score! You guessed the number in {attempts} attempts. Time taken: {elapsed}"),
        };
        self.say(format!("{}", message.green()))
    }

    fn report_save_failure(&mut self, e: GameError) -> Result<()> {
        warn!(error = %e, "could not update high score");
        let attempts = self.engine.attempts_used();
        self.say(format!("{}", format!("You guessed the number in {attempts} attempts, but the high score could not be saved.").green()))
    }

    fn handle_loss(&mut self) -> Result<()> {
        let target = self.engine.target().unwrap_or_default();
        self.say(format!("{}", format!("Game Over! You used all your attempts. The number was {target}.").red()))
    }

    fn ask_play_again(&mut self) -> Result<bool> {
        loop {
            let Some(line) = self.prompt("Do you want to play again? (y/n) [y]:")? else { return Ok(false) };
            match line.trim().to_ascii_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say(format!("{}", "Please answer y or n.".red()))?,
            }
        }
    }

    /// Prints `text` and reads one line; `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text} ").map_err(input_err)?;
        self.output.flush().map_err(input_err)?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(input_err)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref()).map_err(input_err)
    }
}
