//! Rendering primitives and clipping helpers.
//!
//! These types are backend-agnostic: each layer of an entity is described by a
//! [`RenderList`] that hosts replay onto their drawing surfaces.

pub(crate) mod background;
pub(crate) mod foreground;

pub use background::Guides;

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::transform::Transform;

/// RGBA color.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Parse a CSS-like color string.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `transparent` and a handful of
    /// color names.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex);
        }
        let color = match text.to_ascii_lowercase().as_str() {
            "transparent" => Self::TRANSPARENT,
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::rgb8(255, 0, 0),
            "green" => Self::rgb8(0, 128, 0),
            "blue" => Self::rgb8(0, 0, 255),
            "orange" => Self::rgb8(255, 165, 0),
            "purple" => Self::rgb8(128, 0, 128),
            "grey" | "gray" => Self::rgb8(128, 128, 128),
            _ => return None,
        };
        Some(color)
    }

    /// Parse a color, logging and falling back on failure.
    pub(crate) fn parse_or(text: &str, fallback: Self, property: &str) -> Self {
        Self::parse(text).unwrap_or_else(|| {
            tracing::warn!(property, value = text, "unrecognised color, using fallback");
            fallback
        })
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let short = |s: &str| channel(s).map(|v| v * 17);
    let (r, g, b, a) = match hex.len() {
        3 => (short(&hex[0..1])?, short(&hex[1..2])?, short(&hex[2..3])?, 255),
        6 => (
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ),
        8 => (
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        ),
        _ => return None,
    };
    Some(Color::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ))
}

/// Line stroke styling.
///
/// The width is expressed in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Marker shape for point markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Circle marker.
    Circle,
    /// Square marker.
    Square,
    /// Cross marker.
    Cross,
}

/// Marker styling.
///
/// Marker sizes are expressed in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Marker color.
    pub color: Color,
    /// Marker size in pixels.
    pub size: f32,
    /// Marker shape.
    pub shape: MarkerShape,
}

/// Rectangle styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width.
    pub stroke_width: f32,
}

impl RectStyle {
    /// A fill with no stroke.
    pub fn filled(fill: Color) -> Self {
        Self {
            fill,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
        }
    }
}

/// A line segment in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Segment start.
    pub start: ScreenPoint,
    /// Segment end.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Create a new line segment.
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }

    /// Segment length in pixels.
    pub fn length(&self) -> f64 {
        (self.end.x - self.start.x).hypot(self.end.y - self.start.y)
    }
}

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Start a named group of commands (one per trace on the foreground).
    GroupBegin(String),
    /// End the innermost group.
    GroupEnd,
    /// Draw line segments.
    LineSegments {
        /// Segments to draw.
        segments: Vec<LineSegment>,
        /// Styling for the segments.
        style: LineStyle,
    },
    /// Draw point markers.
    Points {
        /// Marker centres.
        points: Vec<ScreenPoint>,
        /// Marker styling.
        style: MarkerStyle,
    },
    /// Draw a rectangle.
    Rect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Rectangle styling.
        style: RectStyle,
    },
}

/// Ordered render commands for one layer.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Check whether the list draws nothing.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Names of the top-level groups, in drawing order.
    pub fn groups(&self) -> Vec<&str> {
        let mut depth = 0usize;
        let mut names = Vec::new();
        for command in &self.commands {
            match command {
                RenderCommand::GroupBegin(name) => {
                    if depth == 0 {
                        names.push(name.as_str());
                    }
                    depth += 1;
                }
                RenderCommand::GroupEnd => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        names
    }

    /// Commands inside the first top-level group named `name`.
    pub fn group(&self, name: &str) -> Option<&[RenderCommand]> {
        let start = self
            .commands
            .iter()
            .position(|command| matches!(command, RenderCommand::GroupBegin(n) if n == name))?;
        let mut depth = 0usize;
        for (offset, command) in self.commands[start + 1..].iter().enumerate() {
            match command {
                RenderCommand::GroupBegin(_) => depth += 1,
                RenderCommand::GroupEnd if depth == 0 => {
                    return Some(&self.commands[start + 1..start + 1 + offset]);
                }
                RenderCommand::GroupEnd => depth -= 1,
                _ => {}
            }
        }
        Some(&self.commands[start + 1..])
    }
}

/// Build clipped line segments from consecutive logical points.
///
/// Pairs containing a non-finite point are skipped, which breaks the line.
pub(crate) fn build_line_segments(
    points: &[Point],
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<LineSegment>,
) {
    out.clear();
    if points.len() < 2 {
        return;
    }
    for window in points.windows(2) {
        let Some(start) = transform.data_to_screen(window[0]) else {
            continue;
        };
        let Some(end) = transform.data_to_screen(window[1]) else {
            continue;
        };
        if let Some((clipped_start, clipped_end)) = clip_segment(start, end, clip) {
            out.push(LineSegment::new(clipped_start, clipped_end));
        }
    }
}

/// Build marker positions for logical points that land inside `clip`.
pub(crate) fn build_scatter_points(
    points: &[Point],
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<ScreenPoint>,
) {
    out.clear();
    for point in points {
        let Some(screen) = transform.data_to_screen(*point) else {
            continue;
        };
        if clip.contains(screen) {
            out.push(screen);
        }
    }
}

/// Split segments into dashes of `on` pixels separated by `off` pixels.
///
/// The dash phase carries across segments that share an endpoint so a
/// polyline keeps an even pattern.
pub(crate) fn dash_segments(segments: &[LineSegment], on: f64, off: f64) -> Vec<LineSegment> {
    let mut out = Vec::new();
    if on <= 0.0 || off < 0.0 {
        return segments.to_vec();
    }
    let period = on + off;
    let mut phase = 0.0_f64;
    let mut previous_end: Option<ScreenPoint> = None;
    for segment in segments {
        if previous_end != Some(segment.start) {
            phase = 0.0;
        }
        previous_end = Some(segment.end);
        let length = segment.length();
        if length <= 0.0 {
            continue;
        }
        let dx = (segment.end.x - segment.start.x) / length;
        let dy = (segment.end.y - segment.start.y) / length;
        let at = |distance: f64| {
            ScreenPoint::new(segment.start.x + dx * distance, segment.start.y + dy * distance)
        };
        let mut travelled = 0.0_f64;
        while travelled < length {
            let remaining = length - travelled;
            if phase < on {
                let step = (on - phase).min(remaining);
                out.push(LineSegment::new(at(travelled), at(travelled + step)));
                travelled += step;
                phase += step;
            } else {
                let step = (period - phase).min(remaining);
                travelled += step;
                phase += step;
            }
            if phase >= period {
                phase = 0.0;
            }
        }
    }
    out
}

fn clip_segment(
    mut start: ScreenPoint,
    mut end: ScreenPoint,
    rect: ScreenRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    const LEFT: u8 = 1;
    const RIGHT: u8 = 2;
    const TOP: u8 = 4;
    const BOTTOM: u8 = 8;

    let mut out_start = region_code(start, rect, LEFT, RIGHT, TOP, BOTTOM);
    let mut out_end = region_code(end, rect, LEFT, RIGHT, TOP, BOTTOM);

    loop {
        if (out_start | out_end) == 0 {
            return Some((start, end));
        }
        if (out_start & out_end) != 0 {
            return None;
        }

        let out_code = if out_start != 0 { out_start } else { out_end };
        let (mut x, mut y) = (0.0_f64, 0.0_f64);

        if (out_code & TOP) != 0 {
            x = start.x + (end.x - start.x) * (rect.min.y - start.y) / (end.y - start.y);
            y = rect.min.y;
        } else if (out_code & BOTTOM) != 0 {
            x = start.x + (end.x - start.x) * (rect.max.y - start.y) / (end.y - start.y);
            y = rect.max.y;
        } else if (out_code & RIGHT) != 0 {
            y = start.y + (end.y - start.y) * (rect.max.x - start.x) / (end.x - start.x);
            x = rect.max.x;
        } else if (out_code & LEFT) != 0 {
            y = start.y + (end.y - start.y) * (rect.min.x - start.x) / (end.x - start.x);
            x = rect.min.x;
        }

        let new_point = ScreenPoint::new(x, y);
        if out_code == out_start {
            start = new_point;
            out_start = region_code(start, rect, LEFT, RIGHT, TOP, BOTTOM);
        } else {
            end = new_point;
            out_end = region_code(end, rect, LEFT, RIGHT, TOP, BOTTOM);
        }
    }
}

fn region_code(
    point: ScreenPoint,
    rect: ScreenRect,
    left: u8,
    right: u8,
    top: u8,
    bottom: u8,
) -> u8 {
    let mut code = 0;
    if point.x < rect.min.x {
        code |= left;
    } else if point.x > rect.max.x {
        code |= right;
    }
    if point.y < rect.min.y {
        code |= top;
    } else if point.y > rect.max.y {
        code |= bottom;
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Size;
    use crate::transform::Origin;
    use crate::view::{Range, Viewport};

    fn unit_transform() -> Transform {
        let limits = Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0));
        Transform::new(Size::new(10.0, 10.0), limits, Origin::Auto)
    }

    #[test]
    fn clip_segment_inside() {
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 10.0));
        let start = ScreenPoint::new(2.0, 2.0);
        let end = ScreenPoint::new(8.0, 8.0);
        let clipped = clip_segment(start, end, rect).expect("segment should clip");
        assert_eq!(clipped.0, start);
        assert_eq!(clipped.1, end);
    }

    #[test]
    fn clip_segment_crossing_edge() {
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 10.0));
        let clipped = clip_segment(ScreenPoint::new(5.0, 5.0), ScreenPoint::new(15.0, 5.0), rect)
            .expect("segment should clip");
        assert_eq!(clipped.1, ScreenPoint::new(10.0, 5.0));
        assert!(
            clip_segment(ScreenPoint::new(11.0, 0.0), ScreenPoint::new(20.0, 5.0), rect).is_none()
        );
    }

    #[test]
    fn build_segments_with_transform() {
        let transform = unit_transform();
        let rect = ScreenRect::from_size(transform.size());
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let mut out = Vec::new();
        build_line_segments(&points, &transform, rect, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].start, ScreenPoint::new(0.0, 10.0));
        assert_eq!(out[0].end, ScreenPoint::new(10.0, 0.0));
    }

    #[test]
    fn non_finite_points_break_lines() {
        let transform = unit_transform();
        let rect = ScreenRect::from_size(transform.size());
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.2, 0.2),
            Point::new(0.4, f64::NAN),
            Point::new(0.6, 0.6),
            Point::new(0.8, 0.8),
        ];
        let mut out = Vec::new();
        build_line_segments(&points, &transform, rect, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn dashes_follow_pattern() {
        let segment = LineSegment::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(20.0, 0.0));
        let dashes = dash_segments(&[segment], 4.0, 4.0);
        let starts: Vec<f64> = dashes.iter().map(|dash| dash.start.x).collect();
        assert_eq!(starts, vec![0.0, 8.0, 16.0]);
        assert!(dashes.iter().all(|dash| (dash.length() - 4.0).abs() < 1e-9));
    }

    #[test]
    fn dash_phase_carries_across_joined_segments() {
        let first = LineSegment::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(3.0, 0.0));
        let second = LineSegment::new(ScreenPoint::new(3.0, 0.0), ScreenPoint::new(10.0, 0.0));
        let dashes = dash_segments(&[first, second], 4.0, 4.0);
        assert_eq!(dashes.len(), 3);
        assert_eq!(dashes[1].end, ScreenPoint::new(4.0, 0.0));
        assert_eq!(dashes[2].start, ScreenPoint::new(8.0, 0.0));
    }

    #[test]
    fn parses_colors() {
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse("#000000"), Some(Color::BLACK));
        assert_eq!(Color::parse("#00000000"), Some(Color::TRANSPARENT));
        assert_eq!(Color::parse("Transparent"), Some(Color::TRANSPARENT));
        assert!(Color::parse("#12").is_none());
        assert!(Color::parse("chartreuse-ish").is_none());
    }

    #[test]
    fn groups_are_addressable() {
        let mut list = RenderList::new();
        list.push(RenderCommand::GroupBegin("a".into()));
        list.push(RenderCommand::Points {
            points: vec![ScreenPoint::new(1.0, 1.0)],
            style: MarkerStyle {
                color: Color::BLACK,
                size: 2.0,
                shape: MarkerShape::Square,
            },
        });
        list.push(RenderCommand::GroupEnd);
        list.push(RenderCommand::GroupBegin("b".into()));
        list.push(RenderCommand::GroupEnd);
        assert_eq!(list.groups(), vec!["a", "b"]);
        assert_eq!(list.group("a").map(<[_]>::len), Some(1));
        assert_eq!(list.group("b").map(<[_]>::len), Some(0));
        assert!(list.group("c").is_none());
    }
}
