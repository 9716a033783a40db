//! Open/close transitions.
//!
//! A transition is plain data: where it started, which way it runs and how
//! long it has left. Progress is always recomputed from elapsed wall-clock
//! time, so a late or skipped tick lands on the same value a punctual one
//! would have.

use palette::{Mix, Srgba};
use std::time::{Duration, Instant};
use strum::Display as StrumDisplay;

pub const OPEN: f64 = 1.0;
pub const CLOSED: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum Direction {
    Opening,
    Closing,
}

impl Direction {
    pub fn toward(active: bool) -> Self {
        if active { Self::Opening } else { Self::Closing }
    }

    pub fn target(&self) -> f64 {
        match self {
            Self::Opening => OPEN,
            Self::Closing => CLOSED,
        }
    }
}

/// Progress after `elapsed` of a run that started at `from` and needs
/// `remaining` to reach the end of `direction`.
pub fn progress_at(from: f64, elapsed: Duration, remaining: Duration, direction: Direction) -> f64 {
    let target = direction.target();
    if elapsed >= remaining {
        return target;
    }
    let t = elapsed.as_secs_f64() / remaining.as_secs_f64();
    (from + (target - from) * t).clamp(CLOSED, OPEN)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub started_at: Instant,
    pub direction: Direction,
    pub from: f64,
    pub remaining: Duration,
}

impl Transition {
    /// `full` is the time a complete 0 -> 1 run takes; a run starting part
    /// way gets the proportional share.
    pub fn start(now: Instant, from: f64, direction: Direction, full: Duration) -> Self {
        let from = from.clamp(CLOSED, OPEN);
        let distance = (direction.target() - from).abs();
        Self {
            started_at: now,
            direction,
            from,
            remaining: full.mul_f64(distance),
        }
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn progress_at(&self, now: Instant) -> f64 {
        progress_at(self.from, self.elapsed(now), self.remaining, self.direction)
    }

    pub fn is_finished_at(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.remaining
    }
}

pub fn radius_delta(progress: f64, increasing_offset: f64) -> f64 {
    progress.clamp(CLOSED, OPEN) * increasing_offset
}

/// Component-wise RGBA interpolation from `closed` (0) to `open` (1).
pub fn blend(closed: Srgba<f64>, open: Srgba<f64>, progress: f64) -> Srgba<f64> {
    closed.mix(open, progress.clamp(CLOSED, OPEN))
}
