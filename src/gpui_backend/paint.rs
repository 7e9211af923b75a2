use gpui::{
    BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, Window, point, px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{
    Color, LineSegment, LineStyle, MarkerShape, MarkerStyle, RectStyle, RenderCommand, RenderList,
};

/// Replay `list` into `bounds`, clipped to them.
pub(crate) fn paint_list(list: &RenderList, bounds: Bounds<Pixels>, window: &mut Window) {
    let offset = ScreenPoint::new(
        f64::from(f32::from(bounds.origin.x)),
        f64::from(f32::from(bounds.origin.y)),
    );
    window.with_content_mask(Some(ContentMask { bounds }), |window| {
        for command in list.commands() {
            match command {
                RenderCommand::LineSegments { segments, style } => {
                    paint_lines(window, offset, segments, *style);
                }
                RenderCommand::Points { points, style } => {
                    paint_points(window, offset, points, *style);
                }
                RenderCommand::Rect { rect, style } => {
                    paint_rect(window, offset, *rect, *style);
                }
                RenderCommand::GroupBegin(_) | RenderCommand::GroupEnd => {}
            }
        }
    });
}

fn at(offset: ScreenPoint, x: f64, y: f64) -> gpui::Point<Pixels> {
    point(px((offset.x + x) as f32), px((offset.y + y) as f32))
}

fn paint_lines(
    window: &mut Window,
    offset: ScreenPoint,
    segments: &[LineSegment],
    style: LineStyle,
) {
    if segments.is_empty() {
        return;
    }
    let mut builder = PathBuilder::stroke(px(style.width.max(0.5)));
    for segment in segments {
        builder.move_to(at(offset, segment.start.x, segment.start.y));
        builder.line_to(at(offset, segment.end.x, segment.end.y));
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn paint_points(
    window: &mut Window,
    offset: ScreenPoint,
    points: &[ScreenPoint],
    style: MarkerStyle,
) {
    let half = f64::from(style.size.max(2.0)) * 0.5;
    match style.shape {
        MarkerShape::Circle | MarkerShape::Square => {
            let corner = if style.shape == MarkerShape::Circle {
                px(half as f32)
            } else {
                px(0.0)
            };
            for pt in points {
                let bounds = Bounds::from_corners(
                    at(offset, pt.x - half, pt.y - half),
                    at(offset, pt.x + half, pt.y + half),
                );
                window.paint_quad(quad(
                    bounds,
                    Corners::all(corner),
                    to_rgba(style.color),
                    Edges::all(px(0.0)),
                    to_rgba(style.color),
                    BorderStyle::default(),
                ));
            }
        }
        MarkerShape::Cross => {
            if points.is_empty() {
                return;
            }
            let mut builder = PathBuilder::stroke(px(1.0));
            for pt in points {
                builder.move_to(at(offset, pt.x - half, pt.y));
                builder.line_to(at(offset, pt.x + half, pt.y));
                builder.move_to(at(offset, pt.x, pt.y - half));
                builder.line_to(at(offset, pt.x, pt.y + half));
            }
            if let Ok(path) = builder.build() {
                window.paint_path(path, to_rgba(style.color));
            }
        }
    }
}

fn paint_rect(window: &mut Window, offset: ScreenPoint, rect: ScreenRect, style: RectStyle) {
    let bounds = Bounds::from_corners(
        at(offset, rect.min.x, rect.min.y),
        at(offset, rect.max.x, rect.max.y),
    );
    window.paint_quad(quad(
        bounds,
        Corners::all(px(0.0)),
        to_rgba(style.fill),
        Edges::all(px(style.stroke_width)),
        to_rgba(style.stroke),
        BorderStyle::default(),
    ));
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}
