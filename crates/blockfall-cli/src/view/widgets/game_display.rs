use blockfall_engine::{GameState, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::view::widgets::{PieceDisplay, PlayfieldDisplay, StatsDisplay, color, style};

/// The whole game screen: stats on the left, the playfield in the center
/// and the next piece on the right, with a popup while paused or over.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    game: &'a GameState,
}

impl<'a> GameDisplay<'a> {
    pub fn new(game: &'a GameState) -> Self {
        Self { game }
    }

    /// Rows needed to draw the whole screen.
    pub fn height(&self) -> u16 {
        self.playfield().height()
    }

    fn border_color(&self) -> ratatui::style::Color {
        match self.game.session_state() {
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        }
    }

    fn panel(&self, title: &'a str) -> Block<'a> {
        Block::bordered()
            .title(Line::from(title).centered())
            .padding(Padding::horizontal(1))
            .border_style(self.border_color())
            .style(style::DEFAULT)
    }

    fn playfield(&self) -> PlayfieldDisplay<'a> {
        let widget = PlayfieldDisplay::new(self.game.playfield(), self.game.catalog())
            .falling_piece(self.game.falling_piece())
            .block(
                Block::bordered()
                    .border_style(self.border_color())
                    .style(style::DEFAULT),
            );
        if self.game.session_state().is_playing() {
            widget.ghost(self.game.ghost_piece())
        } else {
            widget
        }
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let playfield = self.playfield();
        let next_panel = PieceDisplay::new(self.game.catalog())
            .piece(self.game.next_piece())
            .block(self.panel("NEXT"));
        let stats_panel = StatsDisplay::new(self.game.stats()).block(self.panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(stats_panel.width()),
            Constraint::Length(playfield.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(stats_panel.height())]).areas(left_column);
        let [playfield_area] =
            Layout::vertical([Constraint::Length(playfield.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let playfield_width = playfield.width();
        stats_panel.render(stats_area, buf);
        playfield.render(playfield_area, buf);
        next_panel.render(next_area, buf);

        let popup = match self.game.session_state() {
            SessionState::Playing => None,
            SessionState::Paused => Some(("PAUSED", style::PAUSED_POPUP)),
            SessionState::GameOver => Some(("GAME OVER", style::GAME_OVER_POPUP)),
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                playfield_area.centered(Constraint::Length(playfield_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use blockfall_engine::{GameConfig, PieceSeed};

    use super::*;

    fn screen_text(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(game: &GameState) -> String {
        let display = GameDisplay::new(game);
        let area = Rect::new(0, 0, 80, display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        screen_text(&buf)
    }

    #[test]
    fn test_popup_follows_session_state() {
        let now = Instant::now();
        let config = GameConfig {
            seed: Some(PieceSeed::from_u64(5)),
            ..GameConfig::default()
        };
        let mut game = GameState::new(config, now).unwrap();
        let text = render(&game);
        assert!(text.contains("NEXT"));
        assert!(text.contains("SCORE:"));
        assert!(!text.contains("PAUSED"));

        game.toggle_pause(now).unwrap();
        assert!(render(&game).contains("PAUSED"));

        game.toggle_pause(now).unwrap();
        while !game.is_game_over() {
            game.hard_drop(now).unwrap();
        }
        assert!(render(&game).contains("GAME OVER"));
    }

    #[test]
    fn test_height_fits_playfield_and_border() {
        let game = GameState::new(GameConfig::default(), Instant::now()).unwrap();
        assert_eq!(GameDisplay::new(&game).height(), 22);
    }
}
