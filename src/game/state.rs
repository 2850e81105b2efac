use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move one cell in `direction` on a toroidal board of side `grid_size`.
    ///
    /// Leaving one edge re-enters from the opposite edge.
    pub fn stepped(&self, direction: Direction, grid_size: usize) -> Self {
        let (dx, dy) = direction.delta();
        let size = grid_size as i32;
        Self {
            x: (self.x + dx).rem_euclid(size),
            y: (self.y + dy).rem_euclid(size),
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0. Never empty.
    pub body: Vec<Position>,
    /// Heading the next tick moves in
    pub direction: Direction,
}

impl Snake {
    pub fn new(body: Vec<Position>, direction: Direction) -> Self {
        debug_assert!(!body.is_empty(), "snake needs at least one segment");
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// True if any segment, head and tail included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Push a new head; the tail stays when growing, otherwise it is dropped.
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Lifecycle of a game: `Running` until the head hits the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver,
}

/// Complete game state, handed to the renderer as a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_size: usize,
    pub score: u32,
    pub steps: u32,
    pub phase: Phase,
}

impl GameState {
    pub fn new(snake: Snake, food: Position, grid_size: usize) -> Self {
        Self {
            snake,
            food,
            grid_size,
            score: 0,
            steps: 0,
            phase: Phase::Running,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_cell_snake() -> Snake {
        Snake::new(
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Direction::Right,
        )
    }

    #[test]
    fn test_position_step() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.stepped(Direction::Right, 20), Position::new(6, 5));
        assert_eq!(pos.stepped(Direction::Left, 20), Position::new(4, 5));
        assert_eq!(pos.stepped(Direction::Down, 20), Position::new(5, 6));
        assert_eq!(pos.stepped(Direction::Up, 20), Position::new(5, 4));
    }

    #[test]
    fn test_position_wraps_around() {
        assert_eq!(
            Position::new(19, 7).stepped(Direction::Right, 20),
            Position::new(0, 7)
        );
        assert_eq!(
            Position::new(0, 7).stepped(Direction::Left, 20),
            Position::new(19, 7)
        );
        assert_eq!(
            Position::new(3, 0).stepped(Direction::Up, 20),
            Position::new(3, 19)
        );
        assert_eq!(
            Position::new(3, 19).stepped(Direction::Down, 20),
            Position::new(3, 0)
        );
    }

    #[test]
    fn test_snake_accessors() {
        let snake = three_cell_snake();
        assert_eq!(snake.len(), 3);
        assert!(!snake.is_empty());
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(3, 5));
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = three_cell_snake();

        snake.advance(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));

        snake.advance(Position::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(7, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));
    }

    #[test]
    fn test_occupancy_includes_head_and_tail() {
        let state = GameState::new(three_cell_snake(), Position::new(10, 10), 20);
        assert!(state.is_occupied_by_snake(Position::new(5, 5)));
        assert!(state.is_occupied_by_snake(Position::new(3, 5)));
        assert!(!state.is_occupied_by_snake(Position::new(10, 10)));
        assert!(!state.is_over());
    }
}
