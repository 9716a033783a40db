use crate::error::WidgetError;
use crate::geometry;
use crate::input::{ClickWindow, DEFAULT_MAX_CLICK, DEFAULT_MIN_CLICK};
use crate::sector::SectorInfo;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(200);
pub const DEFAULT_ICON_OFFSET: f64 = 0.6;
/// By default an open sector grows by a third of the base radius.
pub const DEFAULT_OFFSET_DIVISOR: f64 = 3.0;

/// Everything a host can set on the widget.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub sector_count: usize,
    /// `None` sizes the wheel from the space the host offers.
    pub base_radius: Option<f64>,
    /// `None` means a third of the base radius.
    pub increasing_offset: Option<f64>,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "animation_duration_ms")]
    pub animation_duration: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "min_click_duration_ms")]
    pub min_click_duration: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "max_click_duration_ms")]
    pub max_click_duration: Duration,
    pub icon_offset_coefficient: f64,
    pub sector_infos: Vec<SectorInfo>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sector_count: 1,
            base_radius: None,
            increasing_offset: None,
            animation_duration: DEFAULT_ANIMATION_DURATION,
            min_click_duration: DEFAULT_MIN_CLICK,
            max_click_duration: DEFAULT_MAX_CLICK,
            icon_offset_coefficient: DEFAULT_ICON_OFFSET,
            sector_infos: Vec::new(),
        }
    }
}

/// Validated options. Only [`Options::validate`] builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sector_count: usize,
    pub base_radius: Option<f64>,
    pub increasing_offset: Option<f64>,
    pub animation_duration: Duration,
    pub click_window: ClickWindow,
    pub icon_offset_coefficient: f64,
}

impl Settings {
    /// Open growth for a given base radius.
    pub fn offset_for(&self, base_radius: f64) -> f64 {
        self.increasing_offset
            .unwrap_or(base_radius / DEFAULT_OFFSET_DIVISOR)
    }

    pub fn check_sector_infos(&self, infos: &[SectorInfo]) -> Result<(), WidgetError> {
        if infos.len() < self.sector_count {
            return Err(WidgetError::InsufficientData {
                supplied: infos.len(),
                required: self.sector_count,
            });
        }
        Ok(())
    }
}

impl Options {
    pub fn with_sectors(sector_count: usize, sector_infos: Vec<SectorInfo>) -> Self {
        Self {
            sector_count,
            sector_infos,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<Settings, WidgetError> {
        if self.sector_count == 0 {
            return Err(WidgetError::invalid("sector_count", "must be at least 1"));
        }

        if let Some(radius) = self.base_radius
            && !(radius.is_finite() && radius > 0.0)
        {
            return Err(WidgetError::invalid(
                "base_radius",
                format!("must be positive, got {radius}"),
            ));
        }

        if let Some(offset) = self.increasing_offset
            && !(offset.is_finite() && offset >= 0.0)
        {
            return Err(WidgetError::invalid(
                "increasing_offset",
                format!("must be non-negative, got {offset}"),
            ));
        }

        if self.min_click_duration > self.max_click_duration {
            return Err(WidgetError::invalid(
                "min_click_duration_ms",
                format!(
                    "{:?} is longer than max_click_duration_ms {:?}",
                    self.min_click_duration, self.max_click_duration
                ),
            ));
        }

        if !geometry::is_valid_icon_offset(self.icon_offset_coefficient) {
            return Err(WidgetError::invalid(
                "icon_offset_coefficient",
                format!(
                    "must be within {}..={}, got {}",
                    geometry::MIN_ICON_OFFSET,
                    geometry::MAX_ICON_OFFSET,
                    self.icon_offset_coefficient
                ),
            ));
        }

        let settings = Settings {
            sector_count: self.sector_count,
            base_radius: self.base_radius,
            increasing_offset: self.increasing_offset,
            animation_duration: self.animation_duration,
            click_window: ClickWindow::new(self.min_click_duration, self.max_click_duration),
            icon_offset_coefficient: self.icon_offset_coefficient,
        };

        // an empty list means the infos arrive later through set_sector_infos
        if !self.sector_infos.is_empty() {
            settings.check_sector_infos(&self.sector_infos)?;
        }

        Ok(settings)
    }
}
