//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The board is a square torus: the snake leaves one edge and re-enters on the other.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{ConfigError, GameConfig, MAX_GRID_SIZE};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use state::{GameState, Phase, Position, Snake};
