//! Trace data and per-trace styling.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::defaults::{self, Configurable, EntityKind, SetterTable};
use crate::error::Result;
use crate::geom::Point;
use crate::property::{FromValue, Options, PropertyDescriptor, PropertyStore, Value};
use crate::render::{Color, LineStyle, MarkerShape, MarkerStyle};
use crate::view::Range;

/// Scalar function `y = f(x)`.
pub type ExplicitFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;
/// Parametric curve `t -> (x, y)`.
pub type CurveFn = Arc<dyn Fn(f64) -> Point + Send + Sync>;

/// Data behind a trace.
///
/// Continuous variants hold the function itself; it is only evaluated when
/// the trace is rendered.
#[derive(Clone)]
pub enum Data {
    /// Continuous `y = f(x)`, sampled over the parameter range as `x`.
    Function(ExplicitFn),
    /// Continuous parametric curve.
    Parametric(CurveFn),
    /// Explicit points, drawn in order.
    Points(Vec<Point>),
    /// Explicit `(t, point)` pairs, drawn in order.
    ParametricPoints(Vec<(f64, Point)>),
}

/// Variant tag of [`Data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// Continuous `y = f(x)`.
    Function,
    /// Continuous parametric curve.
    Parametric,
    /// Discrete points.
    Points,
    /// Discrete parametric points.
    ParametricPoints,
}

impl Data {
    /// Continuous data from `y = f(x)`.
    pub fn function(function: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(function))
    }

    /// Continuous data from a parametric curve.
    pub fn parametric(curve: impl Fn(f64) -> Point + Send + Sync + 'static) -> Self {
        Self::Parametric(Arc::new(curve))
    }

    /// Discrete data from points.
    pub fn points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        Self::Points(points.into_iter().collect())
    }

    /// Discrete data from `(t, point)` pairs.
    pub fn parametric_points<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, Point)>,
    {
        Self::ParametricPoints(pairs.into_iter().collect())
    }

    /// Variant tag.
    pub fn kind(&self) -> DataKind {
        match self {
            Self::Function(_) => DataKind::Function,
            Self::Parametric(_) => DataKind::Parametric,
            Self::Points(_) => DataKind::Points,
            Self::ParametricPoints(_) => DataKind::ParametricPoints,
        }
    }

    /// Check whether the data is a function rather than stored points.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Parametric(_))
    }

    /// Points to draw.
    ///
    /// Continuous data is sampled at `samples` evenly spaced parameters
    /// across `range`; discrete data is returned as stored.
    pub fn geometry(&self, range: Range, samples: usize) -> Vec<Point> {
        match self {
            Self::Function(function) => range
                .samples(samples)
                .map(|x| Point::new(x, function(x)))
                .collect(),
            Self::Parametric(curve) => range.samples(samples).map(|t| curve(t)).collect(),
            Self::Points(points) => points.clone(),
            Self::ParametricPoints(pairs) => pairs.iter().map(|(_, point)| *point).collect(),
        }
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => write!(f, "Data::Function(..)"),
            Self::Parametric(_) => write!(f, "Data::Parametric(..)"),
            Self::Points(points) => write!(f, "Data::Points({} points)", points.len()),
            Self::ParametricPoints(pairs) => {
                write!(f, "Data::ParametricPoints({} points)", pairs.len())
            }
        }
    }
}

impl From<Vec<Point>> for Data {
    fn from(points: Vec<Point>) -> Self {
        Self::Points(points)
    }
}

/// Line pattern of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePattern {
    /// Continuous line.
    Solid,
    /// Long dashes.
    Dashed,
    /// Short dots.
    Dotted,
    /// No line.
    None,
}

impl LinePattern {
    /// Dash on/off lengths in pixels for a line of the given width.
    pub(crate) fn dash(self, width: f64) -> Option<(f64, f64)> {
        let unit = width.max(1.0);
        match self {
            Self::Dashed => Some((4.0 * unit, 3.0 * unit)),
            Self::Dotted => Some((unit, 2.0 * unit)),
            Self::Solid | Self::None => None,
        }
    }
}

impl FromValue for LinePattern {
    fn from_value(value: &Value) -> Option<Self> {
        match value.as_text()? {
            "solid" => Some(Self::Solid),
            "dashed" => Some(Self::Dashed),
            "dotted" => Some(Self::Dotted),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Marker drawn at each point of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// No marker.
    None,
    /// Filled circle.
    Circle,
    /// Filled square.
    Square,
    /// Cross.
    Cross,
}

impl MarkerKind {
    /// Shape to draw, `None` when markers are off.
    pub fn shape(self) -> Option<MarkerShape> {
        match self {
            Self::None => None,
            Self::Circle => Some(MarkerShape::Circle),
            Self::Square => Some(MarkerShape::Square),
            Self::Cross => Some(MarkerShape::Cross),
        }
    }
}

impl FromValue for MarkerKind {
    fn from_value(value: &Value) -> Option<Self> {
        match value.as_text()? {
            "none" => Some(Self::None),
            "circle" => Some(Self::Circle),
            "square" => Some(Self::Square),
            "cross" => Some(Self::Cross),
            _ => None,
        }
    }
}

const FALLBACK_TRACE_COLOR: Color = Color::rgb8(31, 119, 180);
/// Upper bound on sampled columns for continuous data.
const MAX_SAMPLE_COLUMNS: usize = 16_384;

/// One named data series owned by a plot.
#[derive(Debug, Clone)]
pub struct Trace {
    id: String,
    data: Data,
    props: PropertyStore,
}

static TRACE_SETTERS: Lazy<SetterTable<Trace>> = Lazy::new(|| {
    SetterTable::new().with_all(
        &[
            "traceColour",
            "traceStyle",
            "traceWidth",
            "markerColour",
            "markerStyle",
            "markerSize",
            "visibility",
            "parameterRange",
        ],
        Trace::assign,
    )
});

impl Configurable for Trace {
    const KIND: EntityKind = EntityKind::Trace;

    fn setters() -> &'static SetterTable<Self> {
        &TRACE_SETTERS
    }
}

impl Trace {
    /// Create a trace with every property at its default.
    pub(crate) fn new(id: impl Into<String>, data: Data) -> Result<Self> {
        Self::with_options(id, data, &Options::new())
    }

    /// Create a trace, taking properties from `options` where present.
    pub(crate) fn with_options(
        id: impl Into<String>,
        data: Data,
        options: &Options,
    ) -> Result<Self> {
        let mut trace = Self {
            id: id.into(),
            data,
            props: PropertyStore::new(),
        };
        defaults::setup_properties(&mut trace, EntityKind::Trace, options)?;
        Ok(trace)
    }

    fn assign(&mut self, descriptor: &PropertyDescriptor, args: &[Value]) -> Result<()> {
        self.props.assign(descriptor, args)?;
        Ok(())
    }

    /// Trace identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Trace data.
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Stored properties.
    pub fn properties(&self) -> &PropertyStore {
        &self.props
    }

    /// Check whether the trace is drawn.
    pub fn is_visible(&self) -> bool {
        self.props.value("visibility").unwrap_or(true)
    }

    /// Line pattern.
    pub fn line_pattern(&self) -> LinePattern {
        self.props.value("traceStyle").unwrap_or(LinePattern::Solid)
    }

    /// Marker kind.
    pub fn marker(&self) -> MarkerKind {
        self.props.value("markerStyle").unwrap_or(MarkerKind::None)
    }

    /// Parameter range sampled for continuous data.
    pub fn parameter_range(&self) -> Range {
        match self.props.array::<f64>("parameterRange").as_deref() {
            Some([min, max]) => Range::new(*min, *max),
            _ => Range::new(-10.0, 10.0),
        }
    }

    /// Resolved line styling.
    pub fn line_style(&self) -> LineStyle {
        let color = self
            .props
            .value::<String>("traceColour")
            .map(|text| Color::parse_or(&text, FALLBACK_TRACE_COLOR, "traceColour"))
            .unwrap_or(FALLBACK_TRACE_COLOR);
        let width = self.props.value::<f64>("traceWidth").unwrap_or(2.0);
        LineStyle {
            color,
            width: width as f32,
        }
    }

    /// Resolved marker styling, `None` when markers are off.
    pub fn marker_style(&self) -> Option<MarkerStyle> {
        let shape = self.marker().shape()?;
        let color = self
            .props
            .value::<String>("markerColour")
            .map(|text| Color::parse_or(&text, FALLBACK_TRACE_COLOR, "markerColour"))
            .unwrap_or(FALLBACK_TRACE_COLOR);
        let size = self.props.value::<f64>("markerSize").unwrap_or(5.0);
        Some(MarkerStyle {
            color,
            size: size as f32,
            shape,
        })
    }

    /// Points to draw for a foreground of the given pixel width.
    ///
    /// Continuous data is sampled once per pixel column plus one, with the
    /// column count capped for very wide surfaces.
    pub fn geometry(&self, pixel_width: f64) -> Vec<Point> {
        let columns = if pixel_width.is_finite() {
            pixel_width.round().clamp(2.0, MAX_SAMPLE_COLUMNS as f64) as usize
        } else {
            2
        };
        self.data.geometry(self.parameter_range(), columns.saturating_add(1))
    }

    pub(crate) fn set(&mut self, key: &str, args: &[Value]) -> Result<()> {
        defaults::apply(self, key, args)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::Error;

    #[test]
    fn defaults_are_applied() {
        let trace = Trace::new("t", Data::function(|x| x * x)).unwrap();
        assert!(trace.is_visible());
        assert_eq!(trace.line_pattern(), LinePattern::Solid);
        assert_eq!(trace.marker(), MarkerKind::None);
        assert!(trace.marker_style().is_none());
        assert_eq!(trace.parameter_range(), Range::new(-10.0, 10.0));
        assert_eq!(trace.line_style().width, 2.0);
    }

    #[test]
    fn options_override_defaults() {
        let options = Options::new()
            .with("traceStyle", "dashed")
            .with("markerStyle", "square")
            .with("markerColour", "#ff0000")
            .with("parameterRange", [0.0, 1.0]);
        let trace = Trace::with_options("t", Data::points(vec![]), &options).unwrap();
        assert_eq!(trace.line_pattern(), LinePattern::Dashed);
        let marker = trace.marker_style().unwrap();
        assert_eq!(marker.shape, MarkerShape::Square);
        assert_eq!(marker.color, Color::rgb8(255, 0, 0));
        assert_eq!(trace.parameter_range(), Range::new(0.0, 1.0));
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = Options::new().with("traceStyle", "wavy");
        let err = Trace::with_options("t", Data::points(vec![]), &options).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn continuous_data_is_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let trace = Trace::new(
            "lazy",
            Data::function(move |x| {
                counter.fetch_add(1, Ordering::Relaxed);
                x
            }),
        )
        .unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 0);
        let points = trace.geometry(100.0);
        assert_eq!(points.len(), 101);
        assert_eq!(calls.load(Ordering::Relaxed), 101);
        assert_eq!(points[0], Point::new(-10.0, -10.0));
        assert_eq!(points[100], Point::new(10.0, 10.0));
    }

    #[test]
    fn wide_surfaces_cap_the_sample_count() {
        let trace = Trace::new("wide", Data::function(|x| x)).unwrap();
        assert_eq!(trace.geometry(1e20).len(), MAX_SAMPLE_COLUMNS + 1);
        assert_eq!(trace.geometry(f64::INFINITY).len(), 3);
        assert_eq!(trace.geometry(0.0).len(), 3);
    }

    #[test]
    fn discrete_data_keeps_order() {
        let points = vec![Point::new(3.0, 1.0), Point::new(1.0, 2.0)];
        let trace = Trace::new("d", Data::points(points.clone())).unwrap();
        assert_eq!(trace.geometry(640.0), points);
        let pairs = Data::parametric_points([(0.5, Point::new(1.0, 1.0)), (0.1, Point::new(0.0, 0.0))]);
        assert_eq!(pairs.kind(), DataKind::ParametricPoints);
        assert_eq!(
            pairs.geometry(Range::new(0.0, 1.0), 10),
            vec![Point::new(1.0, 1.0), Point::new(0.0, 0.0)]
        );
    }

    #[test]
    fn parametric_curves_sample_the_parameter() {
        let data = Data::parametric(|t| Point::new(t.cos(), t.sin()));
        assert!(data.is_continuous());
        let points = data.geometry(Range::new(0.0, std::f64::consts::PI), 3);
        assert!((points[1].x).abs() < 1e-12);
        assert!((points[1].y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn set_validates_and_keeps_state_on_failure() {
        let mut trace = Trace::new("t", Data::points(vec![])).unwrap();
        trace.set("visibility", &[Value::Bool(false)]).unwrap();
        assert!(!trace.is_visible());
        let before = trace.properties().clone();
        assert!(trace.set("traceWidth", &[Value::Number(-1.0)]).is_err());
        assert_eq!(trace.properties(), &before);
    }
}
