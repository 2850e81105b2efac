use std::time::{Duration, Instant};

/// Per-process counters shown in the header
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub games_played: u32,
    /// Whether the last finished game beat the player's max score
    pub last_game_new_best: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            games_played: 0,
            last_game_new_best: false,
        }
    }

    /// Refresh the clock; it stops while the game is over
    pub fn update(&mut self, running: bool) {
        if running {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.last_game_new_best = false;
    }

    pub fn on_game_over(&mut self, new_best: bool) {
        self.games_played += 1;
        self.last_game_new_best = new_best;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_game_over_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(true);
        assert_eq!(metrics.games_played, 1);
        assert!(metrics.last_game_new_best);

        metrics.on_game_start();
        assert!(!metrics.last_game_new_best);

        metrics.on_game_over(false);
        assert_eq!(metrics.games_played, 2);
        assert!(!metrics.last_game_new_best);
    }

    #[test]
    fn test_clock_freezes_when_not_running() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update(true);
        let frozen = metrics.elapsed_time;
        assert!(frozen.as_millis() >= 50);

        std::thread::sleep(Duration::from_millis(20));
        metrics.update(false);
        assert_eq!(metrics.elapsed_time, frozen);

        metrics.on_game_start();
        metrics.update(true);
        assert!(metrics.elapsed_time.as_millis() < 50);
    }
}
