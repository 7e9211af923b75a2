//! Per-kind default property tables and option dispatch.
//!
//! Each [`EntityKind`] owns a static descriptor table. An entity's full
//! property bundle is the merge of the tables along its lineage, with later
//! kinds overriding earlier ones. Options are routed to setters through an
//! explicit per-type [`SetterTable`].

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::error::{Result, ValidationError, ValidationKind};
use crate::property::{
    Constraint, Literal, Options, PropertyDescriptor, Shape, Value, ValueType,
};

/// Kinds of configurable entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A bare drawing-surface owner.
    Canvas,
    /// A canvas with axes, gridlines and traces.
    Plot,
    /// A data series owned by a plot.
    Trace,
}

impl EntityKind {
    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Canvas => "canvas",
            Self::Plot => "plot",
            Self::Trace => "trace",
        }
    }

    /// Descriptors declared directly by this kind.
    pub fn descriptors(self) -> &'static [PropertyDescriptor] {
        match self {
            Self::Canvas => CANVAS_PROPERTIES,
            Self::Plot => PLOT_PROPERTIES,
            Self::Trace => TRACE_PROPERTIES,
        }
    }

    /// Kinds whose tables make up this kind's bundle, base first.
    pub fn lineage(self) -> &'static [EntityKind] {
        match self {
            Self::Canvas => &[Self::Canvas],
            Self::Plot => &[Self::Canvas, Self::Plot],
            Self::Trace => &[Self::Trace],
        }
    }

    /// The merged bundle for this kind.
    pub fn bundle(self) -> &'static Bundle {
        match self {
            Self::Canvas => &CANVAS_BUNDLE,
            Self::Plot => &PLOT_BUNDLE,
            Self::Trace => &TRACE_BUNDLE,
        }
    }
}

/// Origin sentinel for the geometric centre of the surface.
pub const ORIGIN_CENTRE: &str = "centre";
/// Origin sentinel for an origin derived from the axis limits.
pub const ORIGIN_AUTO: &str = "auto";

const ORIGIN_SENTINELS: &[&str] = &[ORIGIN_CENTRE, ORIGIN_AUTO];

const LINE_STYLES: &[Literal] = &[
    Literal::Text("solid"),
    Literal::Text("dashed"),
    Literal::Text("dotted"),
    Literal::Text("none"),
];

const MARKER_STYLES: &[Literal] = &[
    Literal::Text("none"),
    Literal::Text("circle"),
    Literal::Text("square"),
    Literal::Text("cross"),
];

static CANVAS_PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::new(
        "origin",
        ValueType::Number,
        Shape::Axes,
        &[Literal::Text(ORIGIN_CENTRE)],
    )
    .with_sentinels(ORIGIN_SENTINELS),
    PropertyDescriptor::new(
        "backgroundColour",
        ValueType::String,
        Shape::Single,
        &[Literal::Text("#ffffff")],
    ),
];

static PLOT_PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::new("majorTicks", ValueType::Boolean, Shape::Axes, &[Literal::Bool(true)]),
    PropertyDescriptor::new("minorTicks", ValueType::Boolean, Shape::Axes, &[Literal::Bool(false)]),
    PropertyDescriptor::new(
        "majorTickSpacing",
        ValueType::Number,
        Shape::Axes,
        &[Literal::Number(1.0)],
    )
    .constrained(Constraint::Positive),
    PropertyDescriptor::new(
        "minorTickSpacing",
        ValueType::Number,
        Shape::Axes,
        &[Literal::Number(0.2)],
    )
    .constrained(Constraint::Positive),
    PropertyDescriptor::new(
        "majorGridlines",
        ValueType::Boolean,
        Shape::Axes,
        &[Literal::Bool(true)],
    ),
    PropertyDescriptor::new(
        "minorGridlines",
        ValueType::Boolean,
        Shape::Axes,
        &[Literal::Bool(false)],
    ),
    PropertyDescriptor::new(
        "majorGridSpacing",
        ValueType::Number,
        Shape::Axes,
        &[Literal::Number(1.0)],
    )
    .constrained(Constraint::Positive),
    PropertyDescriptor::new(
        "minorGridSpacing",
        ValueType::Number,
        Shape::Axes,
        &[Literal::Number(0.2)],
    )
    .constrained(Constraint::Positive),
    PropertyDescriptor::new(
        "xLims",
        ValueType::Number,
        Shape::Array(2),
        &[Literal::Number(-10.0), Literal::Number(10.0)],
    )
    .constrained(Constraint::Increasing),
    PropertyDescriptor::new(
        "yLims",
        ValueType::Number,
        Shape::Array(2),
        &[Literal::Number(-10.0), Literal::Number(10.0)],
    )
    .constrained(Constraint::Increasing),
    PropertyDescriptor::new(
        "axisColour",
        ValueType::String,
        Shape::Single,
        &[Literal::Text("#000000")],
    ),
    PropertyDescriptor::new(
        "majorGridColour",
        ValueType::String,
        Shape::Single,
        &[Literal::Text("#c8c8c8")],
    ),
    PropertyDescriptor::new(
        "minorGridColour",
        ValueType::String,
        Shape::Single,
        &[Literal::Text("#ebebeb")],
    ),
    // Applied after the limits so an explicit origin wins over the
    // origin the limits imply.
    PropertyDescriptor::new(
        "origin",
        ValueType::Number,
        Shape::Axes,
        &[Literal::Text(ORIGIN_AUTO)],
    )
    .with_sentinels(ORIGIN_SENTINELS),
];

static TRACE_PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::new(
        "traceColour",
        ValueType::String,
        Shape::Single,
        &[Literal::Text("#1f77b4")],
    ),
    PropertyDescriptor::new(
        "traceStyle",
        ValueType::String,
        Shape::Choice(LINE_STYLES),
        &[Literal::Text("solid")],
    ),
    PropertyDescriptor::new(
        "traceWidth",
        ValueType::Number,
        Shape::Single,
        &[Literal::Number(2.0)],
    )
    .constrained(Constraint::Positive),
    PropertyDescriptor::new(
        "markerColour",
        ValueType::String,
        Shape::Single,
        &[Literal::Text("#1f77b4")],
    ),
    PropertyDescriptor::new(
        "markerStyle",
        ValueType::String,
        Shape::Choice(MARKER_STYLES),
        &[Literal::Text("none")],
    ),
    PropertyDescriptor::new(
        "markerSize",
        ValueType::Number,
        Shape::Single,
        &[Literal::Number(5.0)],
    )
    .constrained(Constraint::Positive),
    PropertyDescriptor::new("visibility", ValueType::Boolean, Shape::Single, &[Literal::Bool(true)]),
    PropertyDescriptor::new(
        "parameterRange",
        ValueType::Number,
        Shape::Array(2),
        &[Literal::Number(-10.0), Literal::Number(10.0)],
    )
    .constrained(Constraint::Increasing),
];

/// Merged, ordered property table for an entity.
pub type Bundle = IndexMap<&'static str, &'static PropertyDescriptor>;

static CANVAS_BUNDLE: Lazy<Bundle> = Lazy::new(|| create(EntityKind::Canvas.lineage()));
static PLOT_BUNDLE: Lazy<Bundle> = Lazy::new(|| create(EntityKind::Plot.lineage()));
static TRACE_BUNDLE: Lazy<Bundle> = Lazy::new(|| create(EntityKind::Trace.lineage()));

/// Merge the default tables of `kinds`.
///
/// Later kinds override earlier ones; an overridden key moves to the
/// position it has in the later kind's table.
pub fn create(kinds: &[EntityKind]) -> Bundle {
    let mut bundle = Bundle::new();
    for kind in kinds {
        for descriptor in kind.descriptors() {
            bundle.shift_remove(descriptor.key);
            bundle.insert(descriptor.key, descriptor);
        }
    }
    bundle
}

/// Setter routine bound to a property key.
///
/// Receives the property's descriptor and the spread positional arguments.
pub type Setter<T> = fn(&mut T, &PropertyDescriptor, &[Value]) -> Result<()>;

/// Explicit mapping from property key to setter, built once per type.
pub struct SetterTable<T> {
    setters: IndexMap<&'static str, Setter<T>>,
}

impl<T> SetterTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            setters: IndexMap::new(),
        }
    }

    /// Bind a setter, builder style.
    pub fn with(mut self, key: &'static str, setter: Setter<T>) -> Self {
        self.setters.insert(key, setter);
        self
    }

    /// Bind one setter to several keys.
    pub fn with_all(mut self, keys: &[&'static str], setter: Setter<T>) -> Self {
        for key in keys {
            self.setters.insert(key, setter);
        }
        self
    }

    /// Look up the setter for a key.
    pub fn get(&self, key: &str) -> Option<Setter<T>> {
        self.setters.get(key).copied()
    }
}

impl<T> Default for SetterTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Types whose properties are initialised and updated from option mappings.
pub trait Configurable: Sized + 'static {
    /// Kind whose bundle describes this type.
    const KIND: EntityKind;

    /// Setter table for this type.
    fn setters() -> &'static SetterTable<Self>;
}

/// Initialise every property of `kind` on `instance`.
///
/// Each property takes its value from `options` when present and from the
/// registered default otherwise. Properties are applied in bundle order.
pub fn setup_properties<T: Configurable>(
    instance: &mut T,
    kind: EntityKind,
    options: &Options,
) -> Result<()> {
    let setters = T::setters();
    for (key, descriptor) in kind.bundle() {
        let Some(setter) = setters.get(key) else {
            tracing::debug!(property = key, kind = kind.name(), "no setter bound, skipping");
            continue;
        };
        match options.get(key) {
            Some(value) => setter(instance, descriptor, value.spread())?,
            None => setter(instance, descriptor, &descriptor.default_args())?,
        }
    }
    report_unknown(kind, options);
    Ok(())
}

/// Apply the recognised keys of `options` to `instance`.
///
/// Keys are applied in bundle order, not option order, so a plot's `origin`
/// lands after its limits just as it does at construction. Keys that are
/// not properties of `kind` are skipped, as are properties with no setter
/// bound on `T`.
pub fn merge_options<T: Configurable>(
    instance: &mut T,
    kind: EntityKind,
    options: &Options,
) -> Result<()> {
    let setters = T::setters();
    for (key, descriptor) in kind.bundle() {
        let Some(value) = options.get(key) else {
            continue;
        };
        let Some(setter) = setters.get(key) else {
            tracing::debug!(property = key, kind = kind.name(), "no setter bound, skipping");
            continue;
        };
        setter(instance, descriptor, value.spread())?;
    }
    report_unknown(kind, options);
    Ok(())
}

/// Set one property of `instance` by key.
///
/// Unlike [`merge_options`], an unknown key is an error.
pub fn apply<T: Configurable>(instance: &mut T, key: &str, args: &[Value]) -> Result<()> {
    let Some(descriptor) = T::KIND.bundle().get(key) else {
        return Err(ValidationError::new(
            key,
            ValidationKind::UnknownProperty {
                suggestion: suggest(T::KIND, key).map(str::to_string),
            },
        )
        .into());
    };
    match T::setters().get(key) {
        Some(setter) => setter(instance, descriptor, args),
        None => Err(ValidationError::new(
            key,
            ValidationKind::UnknownProperty { suggestion: None },
        )
        .into()),
    }
}

/// Closest known property key to `key`, if any is similar enough.
pub fn suggest(kind: EntityKind, key: &str) -> Option<&'static str> {
    let lowered = key.to_ascii_lowercase();
    kind.bundle()
        .keys()
        .map(|candidate| {
            (
                strsim::normalized_damerau_levenshtein(
                    &lowered,
                    &candidate.to_ascii_lowercase(),
                ),
                *candidate,
            )
        })
        .filter(|(score, _)| *score >= 0.8)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate)
}

fn report_unknown(kind: EntityKind, options: &Options) {
    let bundle = kind.bundle();
    for (key, _) in options.iter() {
        if bundle.contains_key(key) {
            continue;
        }
        match suggest(kind, key) {
            Some(candidate) => tracing::warn!(
                option = key,
                kind = kind.name(),
                "ignoring unrecognised option; did you mean `{candidate}`?"
            ),
            None => tracing::warn!(option = key, kind = kind.name(), "ignoring unrecognised option"),
        }
    }
}
