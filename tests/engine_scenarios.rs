use rand::{Rng, SeedableRng, rngs::StdRng};
use snake_arcade::game::{Direction, GameConfig, GameEngine, Phase, Position};

fn initial_body() -> Vec<Position> {
    vec![Position::new(10, 10), Position::new(9, 10), Position::new(8, 10)]
}

#[test]
fn straight_run_without_input() {
    let mut engine = GameEngine::with_seed(GameConfig::default(), 42);

    for _ in 0..5 {
        let result = engine.tick();
        assert!(!result.terminated);
        assert!(!result.info.ate_food);
    }

    let state = engine.state();
    assert_eq!(state.snake.head(), Position::new(15, 10));
    assert_eq!(state.snake.len(), 3);
    assert_eq!(state.score, 0);
    assert_eq!(state.food, Position::new(15, 15));
}

#[test]
fn food_on_the_path_grows_the_snake_once() {
    let config = GameConfig {
        initial_food: Position::new(15, 10),
        ..GameConfig::default()
    };
    let mut engine = GameEngine::with_seed(config, 42);

    for _ in 0..4 {
        engine.tick();
    }
    let result = engine.tick();

    assert!(result.info.ate_food);
    assert_eq!(engine.state().score, 10);
    assert_eq!(engine.state().snake.head(), Position::new(15, 10));
    assert_eq!(engine.state().snake.len(), 4);
    let food = engine.state().food;
    assert!((0..20).contains(&food.x) && (0..20).contains(&food.y));

    // Eating is the first draw from the seeded generator: x, then y
    let mut rng = StdRng::seed_from_u64(42);
    let x = rng.gen_range(0..20usize) as i32;
    let y = rng.gen_range(0..20usize) as i32;
    assert_eq!(food, Position::new(x, y));

    // Unless the fresh food landed right in front, the tail drop resumes
    if food != Position::new(16, 10) {
        let result = engine.tick();
        assert!(!result.info.ate_food);
        assert_eq!(engine.state().snake.len(), 4);
        assert_eq!(engine.state().score, 10);
    }
}

#[test]
fn wraps_from_right_edge_to_left_edge() {
    let config = GameConfig {
        initial_snake: vec![Position::new(19, 3), Position::new(18, 3), Position::new(17, 3)],
        initial_food: Position::new(5, 5),
        ..GameConfig::default()
    };
    let mut engine = GameEngine::with_seed(config, 0);

    engine.tick();

    assert_eq!(engine.state().snake.head(), Position::new(0, 3));
    assert_eq!(engine.state().phase, Phase::Running);
}

#[test]
fn reverse_request_keeps_heading() {
    let mut engine = GameEngine::with_seed(GameConfig::default(), 0);

    engine.set_direction(Direction::Left);
    engine.tick();

    assert_eq!(engine.direction(), Direction::Right);
    assert_eq!(engine.state().snake.head(), Position::new(11, 10));
}

#[test]
fn two_turns_between_ticks_end_the_game_and_freeze_it() {
    let mut engine = GameEngine::with_seed(GameConfig::default(), 0);

    engine.set_direction(Direction::Down);
    engine.set_direction(Direction::Left);
    let result = engine.tick();

    assert!(result.terminated);
    assert_eq!(result.info.collision, Some(Position::new(9, 10)));
    assert_eq!(engine.state().phase, Phase::GameOver);
    assert_eq!(engine.state().snake.body, initial_body());

    let frozen = engine.state().clone();
    for _ in 0..10 {
        engine.set_direction(Direction::Up);
        assert!(engine.tick().terminated);
    }
    assert_eq!(engine.state(), &frozen);

    let state = engine.restart();
    assert_eq!(state.snake.body, initial_body());
    assert_eq!(state.score, 0);
    assert_eq!(state.phase, Phase::Running);
}
