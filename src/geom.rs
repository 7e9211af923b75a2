//! Geometric primitives used by the plotting pipeline.
//!
//! [`Point`] is a logical (data-space) coordinate. [`ScreenPoint`],
//! [`ScreenRect`] and [`Size`] are pixel-space types with the origin at the
//! top-left corner of a drawing surface and rows increasing downward.

/// A point in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X value in logical units.
    pub x: f64,
    /// Y value in logical units.
    pub y: f64,
}

impl Point {
    /// Create a new logical point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Column in pixels.
    pub x: f64,
    /// Row in pixels.
    pub y: f64,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Rectangle anchored at the top-left corner with the given size.
    pub fn from_size(size: Size) -> Self {
        Self::new(
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(size.width, size.height),
        )
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Check whether a point lies inside the rectangle (edges included).
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Pixel dimensions of a drawing surface or container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check whether the size covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A value per axis.
///
/// Axis-scoped properties (tick visibility, grid spacing, ...) are stored as
/// pairs so they can differ between the horizontal and vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Axes<T> {
    /// Horizontal axis value.
    pub x: T,
    /// Vertical axis value.
    pub y: T,
}

impl<T> Axes<T> {
    /// Create a pair from separate values.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Map both values.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Axes<U> {
        Axes {
            x: f(self.x),
            y: f(self.y),
        }
    }
}

impl<T: Clone> Axes<T> {
    /// Use the same value on both axes.
    pub fn splat(value: T) -> Self {
        Self {
            x: value.clone(),
            y: value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_from_size_spans_surface() {
        let rect = ScreenRect::from_size(Size::new(40.0, 30.0));
        assert!(rect.is_valid());
        assert_eq!(rect.width(), 40.0);
        assert_eq!(rect.height(), 30.0);
        assert!(rect.contains(ScreenPoint::new(40.0, 0.0)));
        assert!(!rect.contains(ScreenPoint::new(40.5, 0.0)));
    }

    #[test]
    fn axes_splat_and_map() {
        let pair = Axes::splat(2.0).map(|v| v * 3.0);
        assert_eq!(pair, Axes::new(6.0, 6.0));
    }
}
