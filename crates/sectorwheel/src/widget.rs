use crate::error::WidgetError;
use crate::geometry::{self, Bounds, Point, Size};
use crate::input::ClickDecoder;
use crate::options::{DEFAULT_OFFSET_DIVISOR, Options, Settings};
use crate::render::{self, DrawCommand, Frame, ResourceProvider};
use crate::sector::{Sector, SectorInfo};
use std::rc::Rc;
use std::time::Instant;

type ToggleCallback = Box<dyn FnMut(usize, bool, &SectorInfo)>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Metrics {
    base_radius: f64,
    increasing_offset: f64,
}

impl Metrics {
    fn footprint(&self) -> Size {
        Size::square((self.base_radius + self.increasing_offset) * 2.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputAction {
    pub should_redraw: bool,
    pub toggled: Option<usize>,
}

/// The radial selector: owns the sectors and ties input, animation and
/// drawing together. Everything runs on the caller's thread.
pub struct Widget {
    settings: Settings,
    metrics: Option<Metrics>,
    center: Point,
    sectors: Vec<Sector>,
    decoder: ClickDecoder,
    on_toggle: Option<ToggleCallback>,
}

impl Widget {
    pub fn new(options: Options) -> Result<Self, WidgetError> {
        let settings = options.validate()?;
        let mut widget = Self {
            decoder: ClickDecoder::new(settings.click_window),
            settings: settings.clone(),
            metrics: None,
            center: Point::default(),
            sectors: Vec::new(),
            on_toggle: None,
        };
        widget.apply(settings, options.sector_infos);
        Ok(widget)
    }

    /// Replaces the whole configuration. On error nothing is drawn until a
    /// valid configuration arrives.
    pub fn configure(&mut self, options: Options) -> Result<Size, WidgetError> {
        match options.validate() {
            Ok(settings) => {
                self.apply(settings, options.sector_infos);
                Ok(self.size())
            }
            Err(e) => {
                self.fail_closed(&e);
                Err(e)
            }
        }
    }

    fn apply(&mut self, settings: Settings, infos: Vec<SectorInfo>) {
        self.metrics = settings.base_radius.map(|base_radius| Metrics {
            base_radius,
            increasing_offset: settings.offset_for(base_radius),
        });
        self.decoder = ClickDecoder::new(settings.click_window);
        self.settings = settings;
        self.rebuild(infos);
    }

    /// Picks a radius for the space the host offers, unless one was
    /// configured explicitly.
    pub fn measure(&mut self, available: Size) -> Result<Size, WidgetError> {
        if self.settings.base_radius.is_some() {
            return Ok(self.size());
        }

        let half = available.min_side() / 2.0;
        let base_radius = match self.settings.increasing_offset {
            Some(offset) => half - offset,
            None => half * DEFAULT_OFFSET_DIVISOR / (DEFAULT_OFFSET_DIVISOR + 1.0),
        };

        if !(base_radius.is_finite() && base_radius > 0.0) {
            self.metrics = None;
            return Err(WidgetError::invalid(
                "base_radius",
                format!(
                    "no room for the wheel in {}x{}",
                    available.width, available.height
                ),
            ));
        }

        self.metrics = Some(Metrics {
            base_radius,
            increasing_offset: self.settings.offset_for(base_radius),
        });
        self.reanchor_all();
        Ok(self.size())
    }

    pub fn layout(&mut self, bounds: Bounds) {
        self.center = bounds.center();
        self.reanchor_all();
    }

    /// Replaces every sector at once. Extra infos beyond the sector count are
    /// ignored.
    pub fn set_sector_infos(&mut self, infos: Vec<SectorInfo>) -> Result<(), WidgetError> {
        if let Err(e) = self.settings.check_sector_infos(&infos) {
            self.fail_closed(&e);
            return Err(e);
        }
        self.rebuild(infos);
        Ok(())
    }

    pub fn on_sector_toggle(&mut self, callback: impl FnMut(usize, bool, &SectorInfo) + 'static) {
        self.on_toggle = Some(Box::new(callback));
    }

    pub fn pointer_down(&mut self, position: Point, at: Instant) {
        self.decoder.press(position, at);
    }

    pub fn pointer_up(&mut self, at: Instant) -> InputAction {
        let Some(click) = self.decoder.release(at) else {
            return InputAction::default();
        };

        let Some(index) = self.sector_at(click.position) else {
            log::debug!("click at {:?} missed the wheel", click.position);
            return InputAction::default();
        };

        match self.toggle_sector(index, at) {
            Some(_) => InputAction {
                should_redraw: true,
                toggled: Some(index),
            },
            None => InputAction::default(),
        }
    }

    pub fn pointer_cancel(&mut self) {
        self.decoder.cancel();
    }

    /// Returns the sector's new activation flag, or `None` if there is no
    /// such sector.
    pub fn toggle_sector(&mut self, index: usize, now: Instant) -> Option<bool> {
        let sector = self.sectors.get_mut(index)?;
        let active = sector.toggle(now, self.settings.animation_duration);

        if let Some(metrics) = self.metrics {
            reanchor(sector, self.center, metrics, self.settings.icon_offset_coefficient);
        }
        if let Some(callback) = self.on_toggle.as_mut() {
            callback(index, active, sector.info());
        }
        Some(active)
    }

    /// The sector under `point`, if `point` lies within that sector's current
    /// (possibly expanded) radius.
    pub fn sector_at(&self, point: Point) -> Option<usize> {
        let metrics = self.metrics?;
        if self.sectors.is_empty() {
            return None;
        }

        let index = geometry::sector_index_at(point, self.center, self.sectors.len());
        let radius =
            self.sectors[index].current_radius(metrics.base_radius, metrics.increasing_offset);
        (point.distance_to(self.center) <= radius).then_some(index)
    }

    /// Advances every running transition. Returns `true` if anything moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut moved = false;
        for sector in &mut self.sectors {
            if sector.advance(now) {
                if let Some(metrics) = self.metrics {
                    reanchor(sector, self.center, metrics, self.settings.icon_offset_coefficient);
                }
                moved = true;
            }
        }
        moved
    }

    pub fn render<R: ResourceProvider + ?Sized>(
        &mut self,
        frame_time: Instant,
        resources: &R,
    ) -> Vec<DrawCommand> {
        self.tick(frame_time);

        let Some(metrics) = self.metrics else {
            return Vec::new();
        };
        let frame = Frame {
            center: self.center,
            base_radius: metrics.base_radius,
            increasing_offset: metrics.increasing_offset,
        };
        render::render_sectors(&self.sectors, &frame, resources)
    }

    pub fn is_animating(&self) -> bool {
        self.sectors.iter().any(Sector::is_animating)
    }

    /// Square footprint: room for a fully opened sector on every side.
    pub fn size(&self) -> Size {
        self.metrics.map(|m| m.footprint()).unwrap_or_default()
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    fn rebuild(&mut self, infos: Vec<SectorInfo>) {
        let count = self.settings.sector_count;
        self.sectors = infos
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(index, info)| Sector::new(index, count, Rc::new(info)))
            .collect();
        self.reanchor_all();
        log::debug!("built {} sectors", self.sectors.len());
    }

    fn reanchor_all(&mut self) {
        let Some(metrics) = self.metrics else {
            return;
        };
        for sector in &mut self.sectors {
            reanchor(sector, self.center, metrics, self.settings.icon_offset_coefficient);
        }
    }

    fn fail_closed(&mut self, error: &WidgetError) {
        log::warn!("Rejected wheel configuration: {}", error);
        self.sectors.clear();
        self.decoder.cancel();
    }
}

fn reanchor(sector: &mut Sector, center: Point, metrics: Metrics, coefficient: f64) {
    let radius = sector.current_radius(metrics.base_radius, metrics.increasing_offset);
    sector.reanchor(center, radius, coefficient);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorRef;
    use crate::animation::{CLOSED, OPEN};
    use crate::geometry::angle_range_of;
    use palette::Srgba;
    use std::cell::RefCell;
    use std::time::Duration;

    type Events = Rc<RefCell<Vec<(usize, bool, SectorInfo)>>>;

    struct Swatches;

    impl ResourceProvider for Swatches {
        fn color(&self, color: &ColorRef) -> Srgba<f64> {
            match color.as_str() {
                "red" => Srgba::new(1.0, 0.0, 0.0, 1.0),
                "green" => Srgba::new(0.0, 1.0, 0.0, 1.0),
                _ => Srgba::new(0.0, 0.0, 0.0, 1.0),
            }
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn infos(n: usize) -> Vec<SectorInfo> {
        (0..n)
            .map(|i| SectorInfo::new("red", format!("icon-{i}")).with_open_color("green"))
            .collect()
    }

    fn wheel(count: usize) -> (Widget, Events) {
        let options = Options {
            base_radius: Some(90.0),
            ..Options::with_sectors(count, infos(count))
        };
        let mut widget = Widget::new(options).unwrap();
        widget.layout(Bounds::new(0.0, 0.0, 240.0, 240.0));

        let events: Events = Rc::default();
        let sink = events.clone();
        widget.on_sector_toggle(move |index, active, info| {
            sink.borrow_mut().push((index, active, info.clone()))
        });
        (widget, events)
    }

    fn tap(widget: &mut Widget, at: Point, when: Instant) -> InputAction {
        widget.pointer_down(at, when);
        widget.pointer_up(when + ms(80))
    }

    fn sector_center(widget: &Widget, index: usize) -> Point {
        geometry::icon_anchor(
            angle_range_of(index, widget.sectors().len()),
            widget.center(),
            90.0,
            0.5,
        )
    }

    #[test]
    fn test_size_and_center() {
        let (widget, _) = wheel(4);
        assert_eq!(widget.size(), Size::square(240.0));
        assert_eq!(widget.center(), Point::new(120.0, 120.0));
        assert_eq!(widget.sectors().len(), 4);
    }

    #[test]
    fn test_tap_toggles_sector_open_then_closed() {
        let t0 = Instant::now();
        let (mut widget, events) = wheel(4);
        let point = sector_center(&widget, 2);

        let action = tap(&mut widget, point, t0);
        assert_eq!(action.toggled, Some(2));
        assert!(action.should_redraw);
        assert_eq!(*events.borrow(), vec![(2, true, infos(4)[2].clone())]);

        tap(&mut widget, point, t0 + ms(1000));
        assert_eq!(
            *events.borrow(),
            vec![
                (2, true, infos(4)[2].clone()),
                (2, false, infos(4)[2].clone())
            ]
        );
        assert!(!widget.sectors()[2].is_active());
    }

    #[test]
    fn test_press_duration_filter() {
        let t0 = Instant::now();
        let options = Options {
            base_radius: Some(90.0),
            min_click_duration: ms(40),
            max_click_duration: ms(1000),
            ..Options::with_sectors(4, infos(4))
        };
        let mut widget = Widget::new(options).unwrap();
        widget.layout(Bounds::new(0.0, 0.0, 240.0, 240.0));
        let point = sector_center(&widget, 1);

        widget.pointer_down(point, t0);
        assert_eq!(widget.pointer_up(t0 + ms(10)), InputAction::default());

        widget.pointer_down(point, t0);
        assert_eq!(widget.pointer_up(t0 + ms(1500)), InputAction::default());
        assert!(!widget.sectors()[1].is_active());

        widget.pointer_down(point, t0);
        assert_eq!(widget.pointer_up(t0 + ms(500)).toggled, Some(1));
    }

    #[test]
    fn test_taps_outside_are_ignored() {
        let t0 = Instant::now();
        let (mut widget, events) = wheel(4);

        // 100px out at 45 degrees: past the closed radius of sector 0
        let outside = Point::new(120.0 + 100.0 / 2f64.sqrt(), 120.0 + 100.0 / 2f64.sqrt());
        assert_eq!(tap(&mut widget, outside, t0), InputAction::default());
        assert_eq!(tap(&mut widget, Point::new(500.0, 500.0), t0), InputAction::default());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_open_sector_extends_its_envelope() {
        let t0 = Instant::now();
        let (mut widget, events) = wheel(4);

        widget.toggle_sector(0, t0);
        widget.tick(t0 + ms(500));
        assert_eq!(widget.sectors()[0].progress(), OPEN);

        let in_open = Point::new(120.0 + 100.0 / 2f64.sqrt(), 120.0 + 100.0 / 2f64.sqrt());
        assert_eq!(widget.sector_at(in_open), Some(0));

        // same distance, but sector 1 is still closed
        let in_closed = Point::new(120.0 - 100.0 / 2f64.sqrt(), 120.0 + 100.0 / 2f64.sqrt());
        assert_eq!(widget.sector_at(in_closed), None);

        events.borrow_mut().clear();
        assert_eq!(tap(&mut widget, in_open, t0 + ms(600)).toggled, Some(0));
        assert!(!events.borrow()[0].1);
    }

    #[test]
    fn test_single_sector_takes_any_tap_inside() {
        let t0 = Instant::now();
        let (mut widget, events) = wheel(1);

        for (i, point) in [
            Point::new(120.0, 40.0),
            Point::new(200.0, 120.0),
            Point::new(121.0, 121.0),
            Point::new(60.0, 180.0),
        ]
        .into_iter()
        .enumerate()
        {
            let action = tap(&mut widget, point, t0 + ms(1000 * i as u64));
            assert_eq!(action.toggled, Some(0), "{point:?}");
        }
        assert_eq!(events.borrow().len(), 4);
    }

    #[test]
    fn test_animation_drives_radius_and_color() {
        let t0 = Instant::now();
        let (mut widget, _) = wheel(4);

        widget.toggle_sector(3, t0);
        assert!(widget.is_animating());

        let commands = widget.render(t0 + ms(100), &Swatches);
        assert_eq!(commands.len(), 8);
        match &commands[6] {
            DrawCommand::Wedge {
                radius,
                range,
                color,
                center,
            } => {
                assert!((radius - 105.0).abs() < 1e-9);
                assert_eq!(range.start, 270.0);
                assert!((color.red - 0.5).abs() < 1e-9);
                assert!((color.green - 0.5).abs() < 1e-9);
                assert_eq!(*center, Point::new(120.0, 120.0));
            }
            other => panic!("expected a wedge, got {other:?}"),
        }
        match &commands[7] {
            DrawCommand::Icon {
                icon,
                anchor,
                sector_radius,
            } => {
                assert_eq!(icon.as_str(), "icon-3");
                assert!((sector_radius - 105.0).abs() < 1e-9);
                assert!((anchor.distance_to(widget.center()) - 105.0 * 0.6).abs() < 1e-9);
            }
            other => panic!("expected an icon, got {other:?}"),
        }
        match &commands[0] {
            DrawCommand::Wedge { radius, color, .. } => {
                assert_eq!(*radius, 90.0);
                assert_eq!(color.red, 1.0);
            }
            other => panic!("expected a wedge, got {other:?}"),
        }

        assert!(widget.tick(t0 + ms(250)));
        assert!(!widget.is_animating());
        assert!(!widget.tick(t0 + ms(300)));
    }

    #[test]
    fn test_reverse_mid_flight_is_continuous() {
        let t0 = Instant::now();
        let (mut widget, _) = wheel(4);

        widget.toggle_sector(1, t0);
        widget.tick(t0 + ms(120));
        let before = widget.sectors()[1].progress();

        assert_eq!(widget.toggle_sector(1, t0 + ms(120)), Some(false));
        assert!((widget.sectors()[1].progress() - before).abs() < 1e-9);

        let mut previous = before;
        for step in 1..=30 {
            widget.tick(t0 + ms(120 + step * 5));
            let p = widget.sectors()[1].progress();
            assert!(p <= previous);
            previous = p;
        }
        assert_eq!(previous, CLOSED);
    }

    #[test]
    fn test_insufficient_infos_fail_closed() {
        let (mut widget, _) = wheel(4);
        assert_eq!(
            widget.set_sector_infos(infos(2)),
            Err(WidgetError::InsufficientData {
                supplied: 2,
                required: 4
            })
        );
        assert!(widget.sectors().is_empty());
        assert!(widget.render(Instant::now(), &Swatches).is_empty());
        assert_eq!(widget.sector_at(Point::new(120.0, 100.0)), None);

        widget.set_sector_infos(infos(6)).unwrap();
        assert_eq!(widget.sectors().len(), 4);
    }

    #[test]
    fn test_set_sector_infos_is_idempotent() {
        let (mut widget, _) = wheel(5);
        widget.set_sector_infos(infos(5)).unwrap();
        let first = widget.sectors().to_vec();
        widget.set_sector_infos(infos(5)).unwrap();
        assert_eq!(widget.sectors(), first.as_slice());
    }

    #[test]
    fn test_reconfigure_replaces_everything() {
        let (mut widget, _) = wheel(4);
        widget.toggle_sector(0, Instant::now());

        let size = widget
            .configure(Options {
                base_radius: Some(60.0),
                increasing_offset: Some(10.0),
                ..Options::with_sectors(3, infos(3))
            })
            .unwrap();
        assert_eq!(size, Size::square(140.0));
        assert_eq!(widget.sectors().len(), 3);
        assert!(widget.sectors().iter().all(|s| !s.is_active()));

        let err = widget.configure(Options {
            icon_offset_coefficient: 2.0,
            ..Options::with_sectors(3, infos(3))
        });
        assert!(matches!(err, Err(WidgetError::InvalidConfiguration { .. })));
        assert!(widget.sectors().is_empty());
    }

    #[test]
    fn test_measure_fits_available_space() {
        let mut widget = Widget::new(Options::with_sectors(4, infos(4))).unwrap();
        assert_eq!(widget.size(), Size::default());
        assert!(widget.render(Instant::now(), &Swatches).is_empty());

        let size = widget.measure(Size::new(400.0, 300.0)).unwrap();
        assert!((size.width - 300.0).abs() < 1e-9);
        widget.layout(Bounds::new(0.0, 0.0, 400.0, 300.0));
        assert_eq!(widget.render(Instant::now(), &Swatches).len(), 8);

        widget
            .configure(Options {
                increasing_offset: Some(50.0),
                ..Options::with_sectors(4, infos(4))
            })
            .unwrap();
        assert_eq!(widget.measure(Size::new(400.0, 300.0)), Ok(Size::square(300.0)));
        assert!(widget.measure(Size::new(80.0, 80.0)).is_err());
    }

    #[test]
    fn test_remeasure_keeps_sector_state() {
        let mut widget = Widget::new(Options::with_sectors(4, infos(4))).unwrap();
        widget.measure(Size::new(200.0, 200.0)).unwrap();
        widget.layout(Bounds::new(0.0, 0.0, 200.0, 200.0));
        let t0 = Instant::now();
        assert_eq!(widget.toggle_sector(1, t0), Some(true));

        let grown = widget.measure(Size::new(600.0, 400.0)).unwrap();
        widget.layout(Bounds::new(0.0, 0.0, 600.0, 400.0));
        assert!((grown.width - 400.0).abs() < 1e-9);
        assert!(widget.sectors()[1].is_active());
        assert_eq!(widget.center(), Point::new(300.0, 200.0));
    }

    #[test]
    fn test_explicit_radius_ignores_available_space() {
        let (mut widget, _) = wheel(2);
        assert_eq!(widget.measure(Size::new(10.0, 10.0)), Ok(Size::square(240.0)));
    }

    #[test]
    fn test_icons_never_land_in_the_wrong_sector() {
        let t0 = Instant::now();
        for count in 1..=9 {
            let (mut widget, _) = wheel(count);
            for index in 0..count {
                widget.toggle_sector(index, t0);
            }
            widget.tick(t0 + ms(70));
            for sector in widget.sectors() {
                assert_eq!(widget.sector_at(sector.icon_anchor()), Some(sector.index()));
            }
        }
    }
}
