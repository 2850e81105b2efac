use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, Position};

/// Everything around the board that is not part of the game state
pub struct Hud<'a> {
    pub player: &'a str,
    pub max_score: u32,
    pub elapsed: String,
    pub games_played: u32,
    pub new_best: bool,
}

/// Redraws the whole frame from a snapshot on every call
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, hud: &Hud) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, hud), chunks[0]);

        // Keep the board visible after game over, with the panel underneath
        if state.is_over() {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(7)])
                .split(chunks[1]);
            frame.render_widget(self.render_grid(state), split[0]);
            frame.render_widget(self.render_game_over(state, hud), split[1]);
        } else {
            frame.render_widget(self.render_grid(state), chunks[1]);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(state.grid_size);

        for y in 0..state.grid_size {
            let mut spans = Vec::with_capacity(state.grid_size);

            for x in 0..state.grid_size {
                let pos = Position::new(x as i32, y as i32);

                // Snake cells are painted over food that spawned beneath them
                let cell = if pos == state.snake.head() {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::LightGreen)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.occupies(pos) {
                    Span::styled("■ ", Style::default().fg(Color::Green))
                } else if pos == state.food {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled("· ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Thick)
                    .border_style(Style::default().fg(Color::Gray))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats<'a>(&self, state: &GameState, hud: &Hud<'a>) -> Paragraph<'a> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![
            Line::from(vec![
                Span::styled("Player: ", label),
                Span::styled(hud.player, value.add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
                Span::raw("    "),
                Span::styled("Max score: ", label),
                Span::styled(hud.max_score.to_string(), value),
                Span::raw("    "),
                Span::styled("Ticks: ", label),
                Span::styled(state.steps.to_string(), value),
                Span::raw("    "),
                Span::styled("Time: ", label),
                Span::styled(hud.elapsed.clone(), value),
                Span::raw("    "),
                Span::styled("Games: ", label),
                Span::styled(hud.games_played.to_string(), value),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, hud: &Hud) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if hud.new_best {
            text.push(Line::from(Span::styled(
                "New max score!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction as Heading, GameConfig, GameEngine};
    use ratatui::{Terminal, backend::TestBackend};

    fn hud(new_best: bool) -> Hud<'static> {
        Hud {
            player: "ana@example.com",
            max_score: 40,
            elapsed: "00:07".to_string(),
            games_played: 2,
            new_best,
        }
    }

    fn draw(state: &GameState, hud: &Hud) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, state, hud))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_running_frame() {
        let engine = GameEngine::with_seed(GameConfig::default(), 1);
        let screen = draw(engine.state(), &hud(false));

        assert!(screen.contains("ana@example.com"));
        assert!(screen.contains("Max score: 40"));
        assert!(screen.contains("Score: 0"));
        assert!(screen.contains("●"));
        assert_eq!(screen.matches('■').count(), 3);
        assert!(!screen.contains("GAME OVER"));
    }

    #[test]
    fn test_game_over_frame() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        engine.set_direction(Heading::Up);
        engine.set_direction(Heading::Left);
        assert!(engine.tick().ended_game());

        let screen = draw(engine.state(), &hud(true));
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("New max score!"));

        let screen = draw(engine.state(), &hud(false));
        assert!(!screen.contains("New max score!"));
    }
}
