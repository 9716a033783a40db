//! Radial sector selector: a circle split into equal wedges that open and
//! close with an animated transition when tapped.
//!
//! The crate is backend-agnostic. A host calls [`Widget::configure`] (or
//! [`Widget::measure`]) for sizing, [`Widget::layout`] once it knows where the
//! widget sits, forwards pointer events, and on every frame turns
//! [`Widget::render`] output into pixels.

pub mod animation;
pub mod error;
pub mod geometry;
pub mod input;
mod macros;
pub mod options;
pub mod render;
pub mod sector;
pub mod widget;

pub use animation::{Direction, Transition};
pub use error::WidgetError;
pub use geometry::{AngleRange, Bounds, Point, Size};
pub use input::{Click, ClickDecoder, ClickWindow};
pub use options::{Options, Settings};
pub use render::{DrawCommand, ResourceProvider};
pub use sector::{ColorRef, IconRef, Sector, SectorInfo};
pub use widget::{InputAction, Widget};
