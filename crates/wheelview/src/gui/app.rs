use crate::config::{self, WindowConfig};
use crate::events::AppEvent;
use crate::gui::icons::IconCache;
use crate::gui::theme::{self, Theme};
use crate::gui::view;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use sectorwheel::{Bounds, Point, Size, Widget};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

pub struct AppModel {
    pub wheel: Rc<RefCell<Widget>>,
    pub icons: Rc<IconCache>,
    pub window: WindowConfig,
    pub config_path: PathBuf,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
    ticking: Rc<Cell<bool>>,
}

#[derive(Debug)]
pub enum AppMsg {
    PointerDown(Point, Instant),
    PointerUp(Instant),
    PointerCancel,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Widget,
        WindowConfig,
        PathBuf,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some(model.window.title.as_str()),
            set_default_size: (model.window.width, model.window.height),

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "wheel-drawing-area",

                add_controller = gtk::GestureClick {
                    set_button: 0,
                    connect_pressed[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::PointerDown(Point::new(x, y), Instant::now()));
                    },
                    connect_released[sender] => move |_, _, _, _| {
                        sender.input(AppMsg::PointerUp(Instant::now()));
                    },
                    connect_cancel[sender] => move |_, _| {
                        sender.input(AppMsg::PointerCancel);
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (mut wheel, window, config_path, rx) = init;

        theme::load_css();

        wheel.on_sector_toggle(|index, active, info| {
            log::info!(
                "Sector {} {} ({})",
                index,
                if active { "opened" } else { "closed" },
                info.icon
            );
        });

        let model = AppModel {
            wheel: Rc::new(RefCell::new(wheel)),
            icons: Rc::new(IconCache::new()),
            window,
            config_path,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
            ticking: Rc::new(Cell::new(false)),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.fit_content();

        let wheel_draw = model.wheel.clone();
        let icons_draw = model.icons.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let theme = Theme::from_context(drawing_area.style_context());
                let commands = wheel_draw.borrow_mut().render(Instant::now(), &theme);
                if let Err(e) = view::draw(cr, &commands, &icons_draw) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let wheel_resize = model.wheel.clone();
        widgets
            .drawing_area
            .connect_resize(move |drawing_area, width, height| {
                fit_to_area(&mut wheel_resize.borrow_mut(), width, height);
                drawing_area.queue_draw();
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::PointerDown(point, at) => {
                self.wheel.borrow_mut().pointer_down(point, at);
            }
            AppMsg::PointerUp(at) => {
                let action = self.wheel.borrow_mut().pointer_up(at);
                if action.should_redraw {
                    self.drawing_area.queue_draw();
                    self.start_ticking();
                }
            }
            AppMsg::PointerCancel => self.wheel.borrow_mut().pointer_cancel(),
            AppMsg::ConfigReload => match config::load_config(&self.config_path) {
                Ok(new_config) => {
                    self.reconfigure(new_config);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

impl AppModel {
    fn reconfigure(&mut self, new_config: config::Config) {
        {
            let mut wheel = self.wheel.borrow_mut();
            match wheel.configure(new_config.wheel) {
                Ok(_) => {
                    let (width, height) = self.drawing_size();
                    fit_to_area(&mut wheel, width, height);
                }
                Err(e) => log::error!("Wheel configuration rejected: {}", e),
            }
        }

        self.root.set_title(Some(new_config.window.title.as_str()));
        self.window = new_config.window;
        self.icons.clear();
        self.fit_content();
        self.drawing_area.queue_draw();
    }

    /// Allocated size, or the configured window size before the first
    /// allocation.
    fn drawing_size(&self) -> (i32, i32) {
        match (self.drawing_area.width(), self.drawing_area.height()) {
            (w, h) if w > 0 && h > 0 => (w, h),
            _ => (self.window.width, self.window.height),
        }
    }

    /// Pins the minimum size to the footprint of an explicit radius. An
    /// adaptive wheel follows the window instead, so it can shrink again.
    fn fit_content(&self) {
        let wheel = self.wheel.borrow();
        let Size { width, height } = if wheel.settings().base_radius.is_some() {
            wheel.size()
        } else {
            Size::default()
        };
        self.drawing_area.set_content_width(width.ceil() as i32);
        self.drawing_area.set_content_height(height.ceil() as i32);
    }

    /// Redraws on every frame until no sector is moving.
    fn start_ticking(&self) {
        if self.ticking.replace(true) {
            return;
        }

        let wheel = self.wheel.clone();
        let ticking = self.ticking.clone();
        self.drawing_area.add_tick_callback(move |drawing_area, _| {
            drawing_area.queue_draw();
            let mut wheel = wheel.borrow_mut();
            wheel.tick(Instant::now());
            if wheel.is_animating() {
                glib::ControlFlow::Continue
            } else {
                ticking.set(false);
                glib::ControlFlow::Break
            }
        });
    }
}

/// Re-measures the wheel against the space it was given and recenters it.
pub fn fit_to_area(wheel: &mut Widget, width: i32, height: i32) -> Size {
    let bounds = Bounds::new(0.0, 0.0, width as f64, height as f64);
    if let Err(e) = wheel.measure(bounds.size) {
        log::warn!("Wheel does not fit in {}x{}: {}", width, height, e);
    }
    wheel.layout(bounds);
    wheel.size()
}
