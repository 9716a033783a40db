use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::{Srgb, Srgba, WithAlpha};
use sectorwheel::{ColorRef, ResourceProvider};
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Colors that can be named directly in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, StrumDisplay)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NamedColor {
    HoloBlueDark,
    HoloBlueLight,
    HoloBlueBright,
    HoloGreenDark,
    HoloGreenLight,
    HoloRedDark,
    HoloRedLight,
    HoloOrangeDark,
    HoloOrangeLight,
    HoloPurple,
    DarkerGray,
    White,
    Black,
}

impl NamedColor {
    pub fn srgba(&self) -> Srgba<f64> {
        let (r, g, b): (u8, u8, u8) = match self {
            Self::HoloBlueDark => (0x00, 0x99, 0xcc),
            Self::HoloBlueLight => (0x33, 0xb5, 0xe5),
            Self::HoloBlueBright => (0x00, 0xdd, 0xff),
            Self::HoloGreenDark => (0x66, 0x99, 0x00),
            Self::HoloGreenLight => (0x99, 0xcc, 0x00),
            Self::HoloRedDark => (0xcc, 0x00, 0x00),
            Self::HoloRedLight => (0xff, 0x44, 0x44),
            Self::HoloOrangeDark => (0xff, 0x88, 0x00),
            Self::HoloOrangeLight => (0xff, 0xbb, 0x33),
            Self::HoloPurple => (0xaa, 0x66, 0xcc),
            Self::DarkerGray => (0xaa, 0xaa, 0xaa),
            Self::White => (0xff, 0xff, 0xff),
            Self::Black => (0x00, 0x00, 0x00),
        };
        Srgb::new(r, g, b).into_format::<f64>().with_alpha(1.0)
    }
}

/// Named colors and hex codes. Needs no display connection.
pub fn resolve_static(color: &ColorRef) -> Option<Srgba<f64>> {
    let name = color.trim();
    if let Ok(named) = NamedColor::from_str(name) {
        return Some(named.srgba());
    }
    name.strip_prefix('#')
        .and_then(|hex| Srgb::<u8>::from_str(hex).ok())
        .map(|rgb| rgb.into_format::<f64>().with_alpha(1.0))
}

/// Resolves config colors for the wheel, falling back to the GTK theme for
/// names it does not know.
pub struct Theme {
    context: gtk::StyleContext,
}

impl Theme {
    pub fn from_context(context: gtk::StyleContext) -> Self {
        Self { context }
    }

    fn lookup_color(&self, name: &str) -> Option<Srgba<f64>> {
        self.context.lookup_color(name).map(|c| {
            Srgba::new(
                c.red() as f64,
                c.green() as f64,
                c.blue() as f64,
                c.alpha() as f64,
            )
        })
    }
}

impl ResourceProvider for Theme {
    fn color(&self, color: &ColorRef) -> Srgba<f64> {
        resolve_static(color)
            .or_else(|| self.lookup_color(color))
            .unwrap_or_else(|| {
                log::debug!("Unknown color '{}'", color);
                Srgba::new(0.5, 0.5, 0.5, 1.0)
            })
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.wheel-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
