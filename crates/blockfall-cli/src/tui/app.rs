use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Runtime;

/// Interface between the terminal runtime and a screen.
///
/// `Runtime::run()` drives implementors until `should_exit()` returns true.
pub trait App {
    /// Called once before the first event. Configure tick and render rates here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles key presses, resizes and other terminal events.
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances the application on every tick.
    fn update(&mut self, runtime: &mut Runtime);
}
