use crate::animation::{self, CLOSED, Direction, OPEN, Transition};
use crate::geometry::{self, AngleRange, Point};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Color handle, resolved by the host's resource provider.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ColorRef(String);

crate::impl_string_newtype!(ColorRef);

/// Icon handle, passed through to the drawing backend untouched.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconRef(String);

crate::impl_string_newtype!(IconRef);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorInfo {
    pub closed_color: ColorRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_color: Option<ColorRef>,
    pub icon: IconRef,
}

impl SectorInfo {
    pub fn new(closed_color: impl Into<ColorRef>, icon: impl Into<IconRef>) -> Self {
        Self {
            closed_color: closed_color.into(),
            open_color: None,
            icon: icon.into(),
        }
    }

    pub fn with_open_color(mut self, open_color: impl Into<ColorRef>) -> Self {
        self.open_color = Some(open_color.into());
        self
    }

    pub fn open_color(&self) -> &ColorRef {
        self.open_color.as_ref().unwrap_or(&self.closed_color)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    index: usize,
    range: AngleRange,
    is_active: bool,
    progress: f64,
    transition: Option<Transition>,
    info: Rc<SectorInfo>,
    icon_anchor: Point,
}

impl Sector {
    pub fn new(index: usize, sector_count: usize, info: Rc<SectorInfo>) -> Self {
        Self {
            index,
            range: geometry::angle_range_of(index, sector_count),
            is_active: false,
            progress: CLOSED,
            transition: None,
            info,
            icon_anchor: Point::default(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn range(&self) -> AngleRange {
        self.range
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn info(&self) -> &SectorInfo {
        &self.info
    }

    pub fn icon_anchor(&self) -> Point {
        self.icon_anchor
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn current_radius(&self, base_radius: f64, increasing_offset: f64) -> f64 {
        base_radius + animation::radius_delta(self.progress, increasing_offset)
    }

    /// Flips the sector and starts moving toward the new state from wherever
    /// it is now. Returns the new activation flag.
    pub fn toggle(&mut self, now: Instant, duration: Duration) -> bool {
        self.advance(now);
        self.is_active = !self.is_active;
        let direction = Direction::toward(self.is_active);
        let transition = Transition::start(now, self.progress, direction, duration);

        log::debug!(
            "sector {} {} from {:.3} over {:?}",
            self.index,
            direction,
            self.progress,
            transition.remaining
        );

        self.transition = Some(transition);
        self.advance(now);
        self.is_active
    }

    /// Re-evaluates progress at `now`. Returns `true` if the sector was
    /// moving, i.e. it needs a redraw.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };

        if transition.is_finished_at(now) {
            self.progress = if self.is_active { OPEN } else { CLOSED };
            self.transition = None;
        } else {
            self.progress = transition.progress_at(now);
        }
        true
    }

    pub fn reanchor(&mut self, center: Point, radius: f64, coefficient: f64) {
        self.icon_anchor = geometry::icon_anchor(self.range, center, radius, coefficient);
    }
}
