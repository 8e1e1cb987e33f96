use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// When the event loop emits render events.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Redraw at a fixed interval.
    Interval(Duration),
    /// Redraw after every tick or terminal event.
    #[default]
    OnDirty,
}

impl RenderMode {
    /// `Interval` mode from a frame rate in frames per second.
    #[must_use]
    pub fn interval_from_rate(rate: f64) -> Self {
        Self::Interval(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Multiplexes tick, render and terminal events.
///
/// A disabled tick interval produces no tick events.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub(super) fn new() -> Self {
        let now = Instant::now();
        // Both schedules start overdue so the first tick and render fire immediately.
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: past_time,
            last_render: past_time,
            dirty: true,
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Blocks until the next tick, render or terminal event.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= tick_interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            let do_render = match self.render_mode {
                RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
                RenderMode::OnDirty => self.dirty,
            };
            if do_render {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.next_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn next_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = match self.render_mode {
            RenderMode::Interval(interval) => Some(self.last_render + interval),
            RenderMode::OnDirty => self.dirty.then_some(now),
        };
        let next_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_loop_waits_only_for_input() {
        let mut events = EventLoop::new();
        events.dirty = false;
        assert_eq!(events.next_timeout(Instant::now()), None);
    }

    #[test]
    fn test_timeout_targets_next_tick() {
        let now = Instant::now();
        let mut events = EventLoop::new();
        events.set_tick_interval(Some(Duration::from_millis(20)));
        events.set_render_mode(RenderMode::Interval(Duration::from_millis(50)));
        events.last_tick = now;
        events.last_render = now;
        assert_eq!(events.next_timeout(now), Some(Duration::from_millis(20)));

        events.last_tick = now.checked_sub(Duration::from_millis(30)).unwrap_or(now);
        assert_eq!(events.next_timeout(now), Some(Duration::ZERO));
    }

    #[test]
    fn test_dirty_loop_renders_without_waiting() {
        let now = Instant::now();
        let events = EventLoop::new();
        assert_eq!(events.next_timeout(now), Some(Duration::ZERO));
    }
}
