use crate::animation;
use crate::geometry::{AngleRange, Point};
use crate::sector::{ColorRef, IconRef, Sector};
use palette::Srgba;

/// Resolves color handles into paint. Supplied by the host.
pub trait ResourceProvider {
    fn color(&self, color: &ColorRef) -> Srgba<f64>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled pie slice from the center out to `radius`.
    Wedge {
        center: Point,
        radius: f64,
        range: AngleRange,
        color: Srgba<f64>,
    },
    Icon {
        icon: IconRef,
        anchor: Point,
        sector_radius: f64,
    },
}

pub(crate) struct Frame {
    pub center: Point,
    pub base_radius: f64,
    pub increasing_offset: f64,
}

/// One wedge and one icon per sector, in index order.
pub(crate) fn render_sectors<R: ResourceProvider + ?Sized>(
    sectors: &[Sector],
    frame: &Frame,
    resources: &R,
) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(sectors.len() * 2);

    for sector in sectors {
        let info = sector.info();
        let radius = sector.current_radius(frame.base_radius, frame.increasing_offset);
        let color = animation::blend(
            resources.color(&info.closed_color),
            resources.color(info.open_color()),
            sector.progress(),
        );

        commands.push(DrawCommand::Wedge {
            center: frame.center,
            radius,
            range: sector.range(),
            color,
        });
        commands.push(DrawCommand::Icon {
            icon: info.icon.clone(),
            anchor: sector.icon_anchor(),
            sector_radius: radius,
        });
    }

    commands
}
