//! Axis limits and visible windows.

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Evenly spaced samples across the range, endpoints included.
    pub fn samples(self, count: usize) -> impl Iterator<Item = f64> {
        let step = if count > 1 {
            self.span() / (count - 1) as f64
        } else {
            0.0
        };
        (0..count).map(move |i| self.min + step * i as f64)
    }

    /// Multiples of `spacing` that fall inside the range.
    ///
    /// Returns an empty iterator when the spacing is not positive or would
    /// produce more than `limit` values.
    pub fn multiples(self, spacing: f64, limit: usize) -> impl Iterator<Item = f64> {
        let (first, count) = if spacing > 0.0 && spacing.is_finite() && self.is_finite() {
            let first = (self.min / spacing).ceil();
            let last = (self.max / spacing).floor();
            let count = last - first + 1.0;
            if count.is_nan() || count < 1.0 || count > limit as f64 {
                (0.0, 0)
            } else {
                (first, count as usize)
            }
        } else {
            (0.0, 0)
        };
        (0..count).map(move |i| (first + i as f64) * spacing)
    }
}

/// Logical ranges on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// X axis range.
    pub x: Range,
    /// Y axis range.
    pub y: Range,
}

impl Viewport {
    /// Create a viewport from X and Y ranges.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }
}
