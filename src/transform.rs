//! Coordinate transforms between logical units and surface pixels.
//!
//! The grid scale is always `size / span` per axis. The origin pixel comes
//! from the [`Origin`] policy; under [`Origin::Auto`] it is placed so that the
//! surface spans exactly the axis limits.

use crate::defaults::{ORIGIN_AUTO, ORIGIN_CENTRE};
use crate::geom::{Axes, Point, ScreenPoint, Size};
use crate::property::{PropertyStore, Stored, Value};
use crate::view::{Range, Viewport};

/// Placement policy for the pixel position of logical `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Origin {
    /// Derived from the axis limits.
    Auto,
    /// Geometric centre of the surface.
    Centre,
    /// Explicit pixel position.
    Pixel(Axes<f64>),
}

impl Origin {
    /// Read the origin policy stored under `key`.
    pub(crate) fn from_store(store: &PropertyStore, key: &str) -> Self {
        match store.get(key) {
            Some(Stored::Single(Value::Text(text))) if text == ORIGIN_AUTO => Self::Auto,
            Some(Stored::Single(Value::Text(text))) if text == ORIGIN_CENTRE => Self::Centre,
            Some(Stored::Axes(pair)) => match (pair.x.as_number(), pair.y.as_number()) {
                (Some(x), Some(y)) => Self::Pixel(Axes::new(x, y)),
                _ => Self::Centre,
            },
            _ => Self::Centre,
        }
    }

    /// Resolve to a pixel position without axis limits.
    ///
    /// [`Origin::Auto`] falls back to the top-left corner.
    pub fn resolve(self, size: Size) -> Axes<f64> {
        match self {
            Self::Auto => Axes::new(0.0, 0.0),
            Self::Centre => Axes::new(size.width * 0.5, size.height * 0.5),
            Self::Pixel(pixel) => pixel,
        }
    }
}

/// Mapping between logical units and pixels for one surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    size: Size,
    scale: Axes<f64>,
    origin: Axes<f64>,
}

impl Transform {
    /// Derive the transform for a surface size, axis limits and origin policy.
    pub fn new(size: Size, limits: Viewport, origin: Origin) -> Self {
        let scale = Axes::new(
            grid_scale(size.width, limits.x),
            grid_scale(size.height, limits.y),
        );
        let origin = match origin {
            Origin::Auto => Axes::new(-limits.x.min * scale.x, limits.y.max * scale.y),
            other => other.resolve(size),
        };
        Self {
            size,
            scale,
            origin,
        }
    }

    /// Surface size the transform was derived for.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Pixels per logical unit on each axis.
    pub fn scale(&self) -> Axes<f64> {
        self.scale
    }

    /// Pixel position of logical `(0, 0)`.
    pub fn origin(&self) -> Axes<f64> {
        self.origin
    }

    /// Map a logical point to pixels.
    pub fn to_pixel(&self, point: Point) -> ScreenPoint {
        ScreenPoint::new(
            self.origin.x + point.x * self.scale.x,
            self.origin.y - point.y * self.scale.y,
        )
    }

    /// Map a pixel position back to logical units.
    ///
    /// Returns `None` while either scale is zero.
    pub fn to_logical(&self, pixel: ScreenPoint) -> Option<Point> {
        if self.scale.x == 0.0 || self.scale.y == 0.0 {
            return None;
        }
        Some(Point::new(
            (pixel.x - self.origin.x) / self.scale.x,
            (self.origin.y - pixel.y) / self.scale.y,
        ))
    }

    /// Map a logical point to pixels, rejecting non-finite input.
    pub fn data_to_screen(&self, point: Point) -> Option<ScreenPoint> {
        if !point.is_finite() {
            return None;
        }
        let pixel = self.to_pixel(point);
        (pixel.x.is_finite() && pixel.y.is_finite()).then_some(pixel)
    }

    /// Logical window covered by the surface.
    pub fn visible_window(&self) -> Option<Viewport> {
        let top_left = self.to_logical(ScreenPoint::new(0.0, 0.0))?;
        let bottom_right = self.to_logical(ScreenPoint::new(self.size.width, self.size.height))?;
        Some(Viewport::new(
            Range::new(top_left.x, bottom_right.x),
            Range::new(bottom_right.y, top_left.y),
        ))
    }
}

fn grid_scale(pixels: f64, range: Range) -> f64 {
    let span = range.span();
    if pixels <= 0.0 || !span.is_finite() || span <= 0.0 {
        0.0
    } else {
        pixels / span
    }
}
