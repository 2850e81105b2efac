use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::action::Direction;
use super::state::Position;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("grid size must be greater than zero")]
    EmptyGrid,

    #[error("grid size {grid_size} exceeds the maximum of {max}")]
    GridTooLarge { grid_size: usize, max: usize },

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("initial snake must have at least one segment")]
    EmptySnake,

    #[error("position ({x}, {y}) is outside the {grid_size}x{grid_size} grid")]
    OutOfBounds { x: i32, y: i32, grid_size: usize },

    #[error("initial snake repeats cell ({x}, {y})")]
    DuplicateSegment { x: i32, y: i32 },
}

/// Largest board side accepted; keeps every cell index inside `i32`
pub const MAX_GRID_SIZE: usize = 1024;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square, wrap-around board
    pub grid_size: usize,
    /// Milliseconds between two ticks
    pub tick_interval_ms: u64,
    /// Points awarded per food eaten
    pub food_increment: u32,
    /// Starting body, head first
    pub initial_snake: Vec<Position>,
    pub initial_direction: Direction,
    pub initial_food: Position,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            tick_interval_ms: 100,
            food_increment: 10,
            initial_snake: vec![
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10),
            ],
            initial_direction: Direction::Right,
            initial_food: Position::new(15, 15),
        }
    }
}

impl GameConfig {
    /// Load a JSON config file; missing fields fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn contains(&self, pos: Position) -> bool {
        let Ok(size) = i32::try_from(self.grid_size) else {
            return false;
        };
        (0..size).contains(&pos.x) && (0..size).contains(&pos.y)
    }

    /// Check the invariants the engine relies on.
    ///
    /// The initial food is allowed on the snake, matching the respawn rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                grid_size: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.initial_snake.is_empty() {
            return Err(ConfigError::EmptySnake);
        }

        let mut seen = HashSet::new();
        for &pos in self.initial_snake.iter().chain(std::iter::once(&self.initial_food)) {
            if !self.contains(pos) {
                return Err(ConfigError::OutOfBounds {
                    x: pos.x,
                    y: pos.y,
                    grid_size: self.grid_size,
                });
            }
        }
        for &pos in &self.initial_snake {
            if !seen.insert(pos) {
                return Err(ConfigError::DuplicateSegment { x: pos.x, y: pos.y });
            }
        }

        Ok(())
    }
}
