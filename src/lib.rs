//! game-rental - bootstraps the GameRental MySQL schema and runs its reports.
//!
//! This library exposes the core modules to the binary and integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod output;
pub mod reports;
pub mod safety;
pub mod schema;
