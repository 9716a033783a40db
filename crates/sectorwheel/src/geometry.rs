//! Angle math for the wheel.
//!
//! One convention is used throughout: angle 0 points along the positive X
//! axis and angles grow clockwise on screen (Y grows downwards). Hit-testing,
//! wedge drawing and icon placement all go through this module.

pub const FULL_CIRCLE: f64 = 360.0;
pub const MIN_ICON_OFFSET: f64 = 0.1;
pub const MAX_ICON_OFFSET: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub origin: Point,
    pub size: Size,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }
}

/// Angular extent of one sector, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    pub start: f64,
    pub sweep: f64,
}

impl AngleRange {
    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }

    pub fn bisector(&self) -> f64 {
        self.start + self.sweep / 2.0
    }

    /// Start-inclusive, end-exclusive.
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start && angle < self.end()
    }
}

pub fn sweep_angle(sector_count: usize) -> f64 {
    FULL_CIRCLE / sector_count.max(1) as f64
}

pub fn angle_range_of(index: usize, sector_count: usize) -> AngleRange {
    let sweep = sweep_angle(sector_count);
    AngleRange {
        start: index as f64 * sweep,
        sweep,
    }
}

/// Angle of `pointer` around `center`, normalized to `[0, 360)`.
pub fn pointer_angle(pointer: Point, center: Point) -> f64 {
    let raw = (center.y - pointer.y)
        .atan2(center.x - pointer.x)
        .to_degrees()
        + 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    let angle = raw.rem_euclid(FULL_CIRCLE);
    if angle >= FULL_CIRCLE { 0.0 } else { angle }
}

/// Half-open intervals: an angle on a boundary belongs to the sector that
/// starts there.
pub fn sector_index_for_angle(angle: f64, sector_count: usize) -> usize {
    let last = sector_count.max(1) - 1;
    let slot = (angle / sweep_angle(sector_count)).floor();
    if slot <= 0.0 {
        0
    } else {
        (slot as usize).min(last)
    }
}

pub fn sector_index_at(pointer: Point, center: Point, sector_count: usize) -> usize {
    sector_index_for_angle(pointer_angle(pointer, center), sector_count)
}

/// Icon center on the bisector of `range`, `radius * coefficient` away from
/// `center`.
pub fn icon_anchor(range: AngleRange, center: Point, radius: f64, coefficient: f64) -> Point {
    let angle = (90.0 - range.bisector()).to_radians();
    let distance = radius * coefficient;
    Point::new(
        center.x + distance * angle.sin(),
        center.y + distance * angle.cos(),
    )
}

pub fn is_valid_icon_offset(coefficient: f64) -> bool {
    (MIN_ICON_OFFSET..=MAX_ICON_OFFSET).contains(&coefficient)
}
