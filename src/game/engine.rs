use super::{
    action::Direction,
    config::GameConfig,
    state::{GameState, Phase, Position, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Cell where the head ran into the body, set only on the tick that ends the game
    pub collision: Option<Position>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game is over after this step
    pub terminated: bool,
    /// Score after this step
    pub score: u32,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    /// True only for the tick that moved the game from Running to GameOver
    pub fn ended_game(&self) -> bool {
        self.info.collision.is_some()
    }
}

/// Owns one game session and advances it one tick at a time.
///
/// The engine never fails: every transition is a total function of the
/// current state, the heading and the food RNG.
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Same as [`GameEngine::new`] with a fixed food sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let state = Self::initial_state(&config);
        Self { config, state, rng }
    }

    fn initial_state(config: &GameConfig) -> GameState {
        let snake = Snake::new(config.initial_snake.clone(), config.initial_direction);
        GameState::new(snake, config.initial_food, config.grid_size)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current snapshot for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Heading the next tick will use
    pub fn direction(&self) -> Direction {
        self.state.snake.direction
    }

    /// Queue a new heading for the next tick.
    ///
    /// A request to reverse the current heading is ignored, as is any request
    /// once the game is over. Returns whether the heading was taken.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.state.is_over() || self.state.snake.direction.is_opposite(requested) {
            return false;
        }
        self.state.snake.direction = requested;
        true
    }

    /// Execute one step of the game
    pub fn tick(&mut self) -> StepResult {
        if self.state.is_over() {
            return StepResult {
                terminated: true,
                score: self.state.score,
                info: StepInfo {
                    ate_food: false,
                    collision: None,
                },
            };
        }

        let new_head = self
            .state
            .snake
            .head()
            .stepped(self.state.snake.direction, self.state.grid_size);

        // The tail has not moved yet, so stepping onto it also counts.
        if self.state.snake.occupies(new_head) {
            self.state.phase = Phase::GameOver;
            self.state.steps += 1;
            debug!(x = new_head.x, y = new_head.y, score = self.state.score, "snake hit itself");

            return StepResult {
                terminated: true,
                score: self.state.score,
                info: StepInfo {
                    ate_food: false,
                    collision: Some(new_head),
                },
            };
        }

        let ate_food = new_head == self.state.food;
        self.state.snake.advance(new_head, ate_food);

        if ate_food {
            self.state.score += self.config.food_increment;
            self.state.food = self.spawn_food();
            debug!(
                score = self.state.score,
                length = self.state.snake.len(),
                "food eaten"
            );
        }

        self.state.steps += 1;

        StepResult {
            terminated: false,
            score: self.state.score,
            info: StepInfo {
                ate_food,
                collision: None,
            },
        }
    }

    /// Reset the game to its initial configuration, from either phase
    pub fn restart(&mut self) -> &GameState {
        self.state = Self::initial_state(&self.config);
        &self.state
    }

    /// Pick a cell uniformly over the whole board.
    ///
    /// Cells under the snake are not excluded.
    fn spawn_food(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.config.grid_size) as i32;
        let y = self.rng.gen_range(0..self.config.grid_size) as i32;
        Position::new(x, y)
    }
}
