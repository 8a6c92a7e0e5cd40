// Library crate exposing the game modules so integration tests and the binary share code.
pub mod models;
pub mod random;
pub mod clock;
pub mod engine;
pub mod repository;
pub mod config;
pub mod ui;
