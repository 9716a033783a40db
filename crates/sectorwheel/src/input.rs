use crate::geometry::Point;
use std::time::{Duration, Instant};

pub const DEFAULT_MIN_CLICK: Duration = Duration::ZERO;
pub const DEFAULT_MAX_CLICK: Duration = Duration::from_millis(1000);

/// Accepted press-to-release durations, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickWindow {
    pub min: Duration,
    pub max: Duration,
}

impl ClickWindow {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn accepts(&self, held: Duration) -> bool {
        (self.min..=self.max).contains(&held)
    }
}

impl Default for ClickWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CLICK, DEFAULT_MAX_CLICK)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub position: Point,
    pub held: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum PressState {
    #[default]
    Idle,
    Pressed {
        at: Instant,
        position: Point,
    },
}

/// Turns pointer down/up pairs into clicks, dropping touches that are too
/// quick (accidental) or too long (holds and drags).
#[derive(Debug, Clone, Default)]
pub struct ClickDecoder {
    window: ClickWindow,
    state: PressState,
}

impl ClickDecoder {
    pub fn new(window: ClickWindow) -> Self {
        Self {
            window,
            state: PressState::Idle,
        }
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.state, PressState::Pressed { .. })
    }

    pub fn press(&mut self, position: Point, at: Instant) {
        self.state = PressState::Pressed { at, position };
    }

    /// Always returns the decoder to idle. The click carries the press
    /// position, not the release position.
    pub fn release(&mut self, at: Instant) -> Option<Click> {
        let PressState::Pressed {
            at: pressed_at,
            position,
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };

        let held = at.saturating_duration_since(pressed_at);
        if self.window.accepts(held) {
            Some(Click { position, held })
        } else {
            log::debug!("discarding press held for {:?}", held);
            None
        }
    }

    pub fn cancel(&mut self) {
        self.state = PressState::Idle;
    }
}
