// Console entrypoint. Loads configuration, sets up logging, wires the engine and high score store, then hands off to the UI.

use std::io;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use guessing_game::clock::Stopwatch;
use guessing_game::config::AppConfig;
use guessing_game::engine::GameEngine;
use guessing_game::random::SystemRandom;
use guessing_game::repository::StoreFactory;
use guessing_game::ui::ConsoleUi;

fn main() -> anyhow::Result<()> {
    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Logs go to stderr so they never interleave with prompts; override with RUST_LOG.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(io::stderr).compact().init();

    colored::control::set_override(cfg.color);

    let rng = match cfg.seed {
        Some(seed) => {
            tracing::info!(seed, "using seeded random source");
            SystemRandom::seeded(seed)
        }
        None => SystemRandom::new(),
    };
    let engine = GameEngine::new(rng, Stopwatch::new());
    let store = StoreFactory::file(&cfg.data_dir);

    let stdin = io::stdin();
    let mut ui = ConsoleUi::new(engine, store, stdin.lock(), io::stdout());
    ui.run().context("game session failed")?;
    Ok(())
}
