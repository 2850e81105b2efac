use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{debug, info, warn};

use crate::game::{GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Hud, Renderer};
use crate::session::PlayerSession;

/// How long to wait on exit for score writes still in flight
const PENDING_WRITE_GRACE: Duration = Duration::from_secs(2);

/// Interactive play: keyboard in, one tick task, full redraws out
pub struct HumanMode {
    engine: GameEngine,
    session: PlayerSession,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    pending_writes: Vec<JoinHandle<()>>,
}

impl HumanMode {
    pub fn new(config: GameConfig, session: PlayerSession) -> Self {
        Self::with_engine(GameEngine::new(config), session)
    }

    pub fn with_engine(engine: GameEngine, session: PlayerSession) -> Self {
        Self {
            engine,
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_writes: Vec::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;
        self.flush_pending_writes().await;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.engine.config().tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        info!(
            email = %self.session.email(),
            tick_ms = self.engine.config().tick_interval_ms,
            "game loop started"
        );

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.on_tick();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update(!self.engine.state().is_over());
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.engine.state(), &hud);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn hud(&self) -> Hud<'_> {
        Hud {
            player: self.session.email().as_str(),
            max_score: self.session.max_score(),
            elapsed: self.metrics.format_time(),
            games_played: self.metrics.games_played,
            new_best: self.metrics.last_game_new_best,
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.apply(action);
        }
    }

    fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn(direction) => {
                if self.engine.set_direction(direction) {
                    debug!(?direction, "heading changed");
                }
            }
            KeyAction::Restart => self.restart(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    /// One period of the scheduler; a finished game is left untouched
    fn on_tick(&mut self) {
        if self.engine.state().is_over() {
            return;
        }

        let result = self.engine.tick();
        if result.ended_game() {
            let report = self.session.finish_game(result.score);
            self.metrics.on_game_over(report.new_best);
            if let Some(write) = report.write {
                self.pending_writes.retain(|handle| !handle.is_finished());
                self.pending_writes.push(write);
            }
        }
    }

    fn restart(&mut self) {
        self.engine.restart();
        self.metrics.on_game_start();
        debug!("game restarted");
    }

    async fn flush_pending_writes(&mut self) {
        for write in self.pending_writes.drain(..) {
            match timeout(PENDING_WRITE_GRACE, write).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(error = %err, "score write task failed"),
                Err(_) => warn!("gave up waiting for a score write"),
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
