//! Background layer: fill, gridlines, axes and ticks.

use crate::geom::{Axes, Point, ScreenPoint, ScreenRect, Size};
use crate::render::{Color, LineSegment, LineStyle, RectStyle, RenderCommand, RenderList};
use crate::transform::Transform;
use crate::view::{Range, Viewport};

/// Upper bound on guide lines per family and axis; denser guides are skipped.
const MAX_GUIDES: usize = 10_000;
const TICK_LENGTH_MAJOR: f64 = 10.0;
const TICK_LENGTH_MINOR: f64 = 5.0;
const GRID_WIDTH: f32 = 1.0;
const AXIS_WIDTH: f32 = 1.5;

/// Visibility and logical spacing of one family of guides (ticks or grid).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guides {
    /// Whether the guides are drawn on each axis.
    pub visible: Axes<bool>,
    /// Spacing between guides in logical units.
    pub spacing: Axes<f64>,
}

impl Guides {
    fn positions(self, window: Viewport) -> Axes<Vec<f64>> {
        let along = |visible: bool, range: Range, spacing: f64| {
            if visible {
                range.multiples(spacing, MAX_GUIDES).collect()
            } else {
                Vec::new()
            }
        };
        Axes::new(
            along(self.visible.x, window.x, self.spacing.x),
            along(self.visible.y, window.y, self.spacing.y),
        )
    }
}

/// Everything the background layer of a plot depends on besides the transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Decorations {
    pub fill: Color,
    pub axis_color: Color,
    pub major_grid_color: Color,
    pub minor_grid_color: Color,
    pub major_grid: Guides,
    pub minor_grid: Guides,
    pub major_ticks: Guides,
    pub minor_ticks: Guides,
}

/// A render list that only fills the surface.
pub(crate) fn fill_only(size: Size, fill: Color) -> RenderList {
    let mut render = RenderList::new();
    render.push(RenderCommand::Rect {
        rect: ScreenRect::from_size(size),
        style: RectStyle::filled(fill),
    });
    render
}

/// Build the background layer.
///
/// Drawing order is fill, minor grid, major grid, axes, minor ticks, major
/// ticks. Axes pass through the origin pixel, clamped to the surface.
pub(crate) fn build(decor: &Decorations, transform: &Transform) -> RenderList {
    let mut render = fill_only(transform.size(), decor.fill);
    let Some(window) = transform.visible_window() else {
        return render;
    };
    let rect = ScreenRect::from_size(transform.size());

    let grids = [
        (decor.minor_grid, decor.minor_grid_color),
        (decor.major_grid, decor.major_grid_color),
    ];
    for (guides, color) in grids {
        push_grid(&mut render, guides, color, window, transform, rect);
    }

    let origin = transform.origin();
    let axis = ScreenPoint::new(
        origin.x.clamp(rect.min.x, rect.max.x),
        origin.y.clamp(rect.min.y, rect.max.y),
    );
    render.push(RenderCommand::LineSegments {
        segments: vec![
            LineSegment::new(
                ScreenPoint::new(rect.min.x, axis.y),
                ScreenPoint::new(rect.max.x, axis.y),
            ),
            LineSegment::new(
                ScreenPoint::new(axis.x, rect.min.y),
                ScreenPoint::new(axis.x, rect.max.y),
            ),
        ],
        style: LineStyle {
            color: decor.axis_color,
            width: AXIS_WIDTH,
        },
    });

    let ticks = [
        (decor.minor_ticks, TICK_LENGTH_MINOR),
        (decor.major_ticks, TICK_LENGTH_MAJOR),
    ];
    for (guides, length) in ticks {
        push_ticks(&mut render, guides, length, decor.axis_color, window, transform, axis);
    }
    render
}

fn push_grid(
    render: &mut RenderList,
    guides: Guides,
    color: Color,
    window: Viewport,
    transform: &Transform,
    rect: ScreenRect,
) {
    let positions = guides.positions(window);
    let mut segments = Vec::with_capacity(positions.x.len() + positions.y.len());
    for value in positions.x {
        let x = transform.to_pixel(Point::new(value, 0.0)).x;
        segments.push(LineSegment::new(
            ScreenPoint::new(x, rect.min.y),
            ScreenPoint::new(x, rect.max.y),
        ));
    }
    for value in positions.y {
        let y = transform.to_pixel(Point::new(0.0, value)).y;
        segments.push(LineSegment::new(
            ScreenPoint::new(rect.min.x, y),
            ScreenPoint::new(rect.max.x, y),
        ));
    }
    if !segments.is_empty() {
        render.push(RenderCommand::LineSegments {
            segments,
            style: LineStyle {
                color,
                width: GRID_WIDTH,
            },
        });
    }
}

fn push_ticks(
    render: &mut RenderList,
    guides: Guides,
    length: f64,
    color: Color,
    window: Viewport,
    transform: &Transform,
    axis: ScreenPoint,
) {
    let half = length * 0.5;
    let positions = guides.positions(window);
    let mut segments = Vec::with_capacity(positions.x.len() + positions.y.len());
    for value in positions.x {
        let x = transform.to_pixel(Point::new(value, 0.0)).x;
        segments.push(LineSegment::new(
            ScreenPoint::new(x, axis.y - half),
            ScreenPoint::new(x, axis.y + half),
        ));
    }
    for value in positions.y {
        let y = transform.to_pixel(Point::new(0.0, value)).y;
        segments.push(LineSegment::new(
            ScreenPoint::new(axis.x - half, y),
            ScreenPoint::new(axis.x + half, y),
        ));
    }
    if !segments.is_empty() {
        render.push(RenderCommand::LineSegments {
            segments,
            style: LineStyle {
                color,
                width: GRID_WIDTH,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Origin;

    fn guides(visible: bool, spacing: f64) -> Guides {
        Guides {
            visible: Axes::splat(visible),
            spacing: Axes::splat(spacing),
        }
    }

    fn decorations() -> Decorations {
        Decorations {
            fill: Color::WHITE,
            axis_color: Color::BLACK,
            major_grid_color: Color::rgb8(200, 200, 200),
            minor_grid_color: Color::rgb8(235, 235, 235),
            major_grid: guides(true, 1.0),
            minor_grid: guides(false, 0.2),
            major_ticks: guides(true, 1.0),
            minor_ticks: guides(false, 0.2),
        }
    }

    fn transform(size: Size) -> Transform {
        let limits = Viewport::new(Range::new(-10.0, 10.0), Range::new(-10.0, 10.0));
        Transform::new(size, limits, Origin::Auto)
    }

    fn segment_counts(render: &RenderList) -> Vec<usize> {
        render
            .commands()
            .iter()
            .filter_map(|command| match command {
                RenderCommand::LineSegments { segments, .. } => Some(segments.len()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn default_layout() {
        let render = build(&decorations(), &transform(Size::new(100.0, 100.0)));
        assert!(matches!(
            render.commands()[0],
            RenderCommand::Rect { style, .. } if style.fill == Color::WHITE
        ));
        // major grid, axes, major ticks
        assert_eq!(segment_counts(&render), vec![42, 2, 42]);
    }

    #[test]
    fn axes_pass_through_origin() {
        let render = build(&decorations(), &transform(Size::new(200.0, 100.0)));
        let axes = render
            .commands()
            .iter()
            .find_map(|command| match command {
                RenderCommand::LineSegments { segments, style } if style.width == AXIS_WIDTH => {
                    Some(segments.clone())
                }
                _ => None,
            })
            .expect("axes drawn");
        assert_eq!(axes[0].start, ScreenPoint::new(0.0, 50.0));
        assert_eq!(axes[1].start, ScreenPoint::new(100.0, 0.0));
    }

    #[test]
    fn off_surface_origin_is_clamped() {
        let limits = Viewport::new(Range::new(5.0, 10.0), Range::new(5.0, 10.0));
        let transform = Transform::new(Size::new(50.0, 50.0), limits, Origin::Auto);
        let render = build(&decorations(), &transform);
        let axes = render
            .commands()
            .iter()
            .find_map(|command| match command {
                RenderCommand::LineSegments { segments, style } if style.width == AXIS_WIDTH => {
                    Some(segments.clone())
                }
                _ => None,
            })
            .expect("axes drawn");
        assert_eq!(axes[0].start.y, 50.0);
        assert_eq!(axes[1].start.x, 0.0);
    }

    #[test]
    fn minor_guides_draw_under_major() {
        let mut decor = decorations();
        decor.minor_grid = guides(true, 0.5);
        let render = build(&decor, &transform(Size::new(100.0, 100.0)));
        let counts = segment_counts(&render);
        assert_eq!(counts, vec![82, 42, 2, 42]);
    }

    #[test]
    fn dense_guides_are_skipped() {
        let mut decor = decorations();
        decor.major_grid = guides(true, 1e-6);
        let render = build(&decor, &transform(Size::new(100.0, 100.0)));
        assert_eq!(segment_counts(&render), vec![2, 42]);
    }

    #[test]
    fn empty_surface_is_only_filled() {
        let render = build(&decorations(), &transform(Size::default()));
        assert_eq!(render.commands().len(), 1);
    }
}
