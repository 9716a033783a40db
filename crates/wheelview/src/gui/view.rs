use super::icons::IconCache;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use sectorwheel::{AngleRange, DrawCommand, Point};

/// Icon edge length relative to the sector's current radius.
pub const ICON_FILL: f64 = 0.3;

pub fn draw(cr: &Context, commands: &[DrawCommand], icons: &IconCache) -> Result<(), cairo::Error> {
    for command in commands {
        match command {
            DrawCommand::Wedge {
                center,
                radius,
                range,
                color,
            } => draw_wedge(cr, *center, *radius, *range, *color)?,
            DrawCommand::Icon {
                icon,
                anchor,
                sector_radius,
            } => {
                if let Some(pixbuf) = icons.get(icon) {
                    draw_icon(cr, &pixbuf, *anchor, *sector_radius)?;
                }
            }
        }
    }
    Ok(())
}

fn draw_wedge(
    cr: &Context,
    center: Point,
    radius: f64,
    range: AngleRange,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.move_to(center.x, center.y);
    // cairo angles run clockwise from the positive X axis, like the wheel's
    cr.arc(
        center.x,
        center.y,
        radius,
        range.start.to_radians(),
        range.end().to_radians(),
    );
    cr.close_path();
    cr.fill()
}

fn draw_icon(
    cr: &Context,
    pixbuf: &Pixbuf,
    anchor: Point,
    sector_radius: f64,
) -> Result<(), cairo::Error> {
    let longest = pixbuf.width().max(pixbuf.height()).max(1) as f64;
    let icon_scale = sector_radius * ICON_FILL / longest;
    let (iw, ih) = (
        pixbuf.width() as f64 * icon_scale,
        pixbuf.height() as f64 * icon_scale,
    );

    cr.save()?;
    cr.translate(anchor.x - iw / 2.0, anchor.y - ih / 2.0);
    cr.scale(icon_scale, icon_scale);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    cr.paint()?;
    cr.restore()
}
