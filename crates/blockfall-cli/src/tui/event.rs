use crossterm::event::Event as CrosstermEvent;

/// Events produced by the event loop.
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// Time to advance the game.
    Tick,
    /// Time to redraw the screen.
    Render,
    /// Key input, resize and other terminal events.
    Crossterm(CrosstermEvent),
}
