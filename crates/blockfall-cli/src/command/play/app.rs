use std::time::Instant;

use blockfall_engine::{ActionError, GameState, SessionState};
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    tui::{App, RenderMode, Runtime},
    view::widgets::{GameDisplay, KeyBinding, KeyBindingDisplay},
};

const TICK_RATE: f64 = 60.0;

/// Player intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    TogglePause,
    Restart,
    Quit,
}

impl Action {
    fn from_key(code: KeyCode) -> Option<Self> {
        let action = match code {
            KeyCode::Left => Self::MoveLeft,
            KeyCode::Right => Self::MoveRight,
            KeyCode::Down => Self::SoftDrop,
            KeyCode::Up | KeyCode::Char('x') => Self::Rotate,
            KeyCode::Char(' ') => Self::HardDrop,
            KeyCode::Char('p') => Self::TogglePause,
            KeyCode::Char('r') => Self::Restart,
            KeyCode::Char('q') | KeyCode::Esc => Self::Quit,
            _ => return None,
        };
        Some(action)
    }
}

const PLAYING_BINDINGS: &[KeyBinding] = &[
    KeyBinding::new(&["←", "→"], "Move"),
    KeyBinding::new(&["↓"], "Soft Drop"),
    KeyBinding::new(&["↑", "X"], "Rotate"),
    KeyBinding::new(&["Space"], "Hard Drop"),
    KeyBinding::new(&["P"], "Pause"),
    KeyBinding::new(&["Q"], "Quit"),
];
const PAUSED_BINDINGS: &[KeyBinding] = &[
    KeyBinding::new(&["P"], "Resume"),
    KeyBinding::new(&["Q"], "Quit"),
];
const GAME_OVER_BINDINGS: &[KeyBinding] = &[
    KeyBinding::new(&["R"], "Restart"),
    KeyBinding::new(&["Q"], "Quit"),
];

#[derive(Debug)]
pub struct PlayApp {
    game: GameState,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(game: GameState) -> Self {
        Self {
            game,
            is_exiting: false,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    fn apply(&mut self, action: Action, now: Instant) {
        let result: Result<(), ActionError> = match action {
            Action::MoveLeft => self.game.try_move_left(),
            Action::MoveRight => self.game.try_move_right(),
            Action::Rotate => self.game.try_rotate(),
            Action::SoftDrop => self.game.soft_drop(now).map(|_| ()),
            Action::HardDrop => self.game.hard_drop(now).map(|_| ()),
            Action::TogglePause => self.game.toggle_pause(now).map(|_| ()),
            Action::Restart => {
                if self.game.is_game_over() {
                    self.game.reset(now);
                }
                Ok(())
            }
            Action::Quit => {
                self.is_exiting = true;
                Ok(())
            }
        };
        if let Err(err) = result {
            tracing::trace!(?action, %err, "action rejected");
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(TICK_RATE);
        runtime.set_render_mode(RenderMode::interval_from_rate(TICK_RATE));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        if let Some(key) = event.as_key_press_event()
            && let Some(action) = Action::from_key(key.code)
        {
            self.apply(action, Instant::now());
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let bindings = match self.game.session_state() {
            SessionState::Playing => PLAYING_BINDINGS,
            SessionState::Paused => PAUSED_BINDINGS,
            SessionState::GameOver => GAME_OVER_BINDINGS,
        };
        let game_display = GameDisplay::new(&self.game);
        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(game_display.height()), Constraint::Length(1)])
                .areas(frame.area());
        frame.render_widget(game_display, main_area);
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        if self.game.session_state().is_playing() {
            _ = self.game.advance_time(Instant::now());
        }
    }
}
