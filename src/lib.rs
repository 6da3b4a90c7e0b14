pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod tui;

pub use error::{LeagueError, Result};
