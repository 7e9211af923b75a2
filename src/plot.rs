//! Plot entity: axes, gridlines and a set of named traces.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::defaults::{self, Configurable, EntityKind, ORIGIN_AUTO, SetterTable};
use crate::entity::{Entity, Redraw, Responsive};
use crate::error::{Error, Result};
use crate::geom::{Axes, Size};
use crate::property::{Options, PropertyDescriptor, Value};
use crate::render::background::{self, Decorations};
use crate::render::{Color, Guides, RenderList, foreground};
use crate::surface::Layer;
use crate::trace::{Data, Trace};
use crate::transform::{Origin, Transform};
use crate::view::{Range, Viewport};

const DEFAULT_LIMITS: Range = Range {
    min: -10.0,
    max: 10.0,
};

/// A responsive 2D plot.
///
/// The transform is recomputed whenever the size, the limits or the origin
/// change, so [`Plot::grid_scale`] always reflects the current state.
#[derive(Debug)]
pub struct Plot {
    entity: Entity,
    traces: IndexMap<String, Trace>,
    transform: Transform,
}

static PLOT_SETTERS: Lazy<SetterTable<Plot>> = Lazy::new(|| {
    SetterTable::new()
        .with("origin", Plot::set_origin)
        .with_all(&["xLims", "yLims"], Plot::set_limits)
        .with_all(
            &[
                "backgroundColour",
                "majorTicks",
                "minorTicks",
                "majorTickSpacing",
                "minorTickSpacing",
                "majorGridlines",
                "minorGridlines",
                "majorGridSpacing",
                "minorGridSpacing",
                "axisColour",
                "majorGridColour",
                "minorGridColour",
            ],
            Plot::set_visual,
        )
});

impl Configurable for Plot {
    const KIND: EntityKind = EntityKind::Plot;

    fn setters() -> &'static SetterTable<Self> {
        &PLOT_SETTERS
    }
}

impl Plot {
    /// Create a plot seeded with `traces`, taking properties from `options`
    /// where present.
    ///
    /// Seed traces use default trace properties. Fails with
    /// [`Error::DuplicateId`] if `id` is taken or two seeds share an id.
    pub fn new<I, S>(id: impl Into<String>, traces: I, options: &Options) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Data)>,
        S: Into<String>,
    {
        let mut plot = Self {
            entity: Entity::new(id, EntityKind::Plot)?,
            traces: IndexMap::new(),
            transform: Transform::new(
                Size::default(),
                Viewport::new(DEFAULT_LIMITS, DEFAULT_LIMITS),
                Origin::Auto,
            ),
        };
        defaults::setup_properties(&mut plot, EntityKind::Plot, options)?;
        for (trace_id, data) in traces {
            let trace_id = trace_id.into();
            if plot.traces.contains_key(&trace_id) {
                return Err(Error::DuplicateId(trace_id));
            }
            let trace = Trace::new(trace_id.clone(), data)?;
            plot.traces.insert(trace_id, trace);
        }
        plot.refresh();
        Ok(plot)
    }

    /// Set one property. Sequences are spread across positional arguments.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        defaults::apply(self, key, value.spread())
    }

    /// Apply the recognised keys of `options`; unknown keys are skipped.
    ///
    /// An `origin` in `options` is applied after any limits, whatever the
    /// key order.
    pub fn merge_options(&mut self, options: &Options) -> Result<()> {
        defaults::merge_options(self, EntityKind::Plot, options)
    }

    /// Add a trace and redraw the foreground.
    pub fn add_data(&mut self, id: impl Into<String>, data: Data, options: &Options) -> Result<()> {
        let id = id.into();
        if self.traces.contains_key(&id) {
            return Err(Error::DuplicateId(id));
        }
        let trace = Trace::with_options(id.clone(), data, options)?;
        tracing::debug!(plot = %self.entity.id(), trace = %id, "trace added");
        self.traces.insert(id, trace);
        self.redraw(Redraw::Foreground);
        Ok(())
    }

    /// Remove a trace and redraw the foreground.
    pub fn remove_data(&mut self, id: &str) -> Result<Trace> {
        let trace = self
            .traces
            .shift_remove(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        tracing::debug!(plot = %self.entity.id(), trace = id, "trace removed");
        self.redraw(Redraw::Foreground);
        Ok(trace)
    }

    /// Set one property of a trace and redraw.
    pub fn set_trace(&mut self, id: &str, key: &str, value: impl Into<Value>) -> Result<()> {
        let trace = self
            .traces
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let value = value.into();
        trace.set(key, value.spread())?;
        self.redraw(Redraw::Full);
        Ok(())
    }

    /// Access a trace by id.
    pub fn trace(&self, id: &str) -> Option<&Trace> {
        self.traces.get(id)
    }

    /// Access all traces in insertion order.
    pub fn traces(&self) -> impl Iterator<Item = &Trace> {
        self.traces.values()
    }

    /// Axis limits.
    pub fn limits(&self) -> Viewport {
        let props = self.entity.properties();
        let range = |key: &str| match props.array::<f64>(key).as_deref() {
            Some([min, max]) => Range::new(*min, *max),
            _ => DEFAULT_LIMITS,
        };
        Viewport::new(range("xLims"), range("yLims"))
    }

    /// Origin placement policy.
    pub fn origin(&self) -> Origin {
        self.entity.origin()
    }

    /// Pixels per logical unit on each axis.
    pub fn grid_scale(&self) -> Axes<f64> {
        self.transform.scale()
    }

    /// Current coordinate transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Major tick visibility and spacing.
    pub fn major_ticks(&self) -> Guides {
        self.guides("majorTicks", "majorTickSpacing", 1.0)
    }

    /// Minor tick visibility and spacing.
    pub fn minor_ticks(&self) -> Guides {
        self.guides("minorTicks", "minorTickSpacing", 0.2)
    }

    /// Major gridline visibility and spacing.
    pub fn major_grid(&self) -> Guides {
        self.guides("majorGridlines", "majorGridSpacing", 1.0)
    }

    /// Minor gridline visibility and spacing.
    pub fn minor_grid(&self) -> Guides {
        self.guides("minorGridlines", "minorGridSpacing", 0.2)
    }

    fn guides(&self, visible: &str, spacing: &str, fallback: f64) -> Guides {
        let props = self.entity.properties();
        Guides {
            visible: props.axes(visible).unwrap_or(Axes::splat(false)),
            spacing: props.axes(spacing).unwrap_or(Axes::splat(fallback)),
        }
    }

    fn decorations(&self) -> Decorations {
        Decorations {
            fill: self.entity.background_colour(),
            axis_color: self.entity.color("axisColour", Color::BLACK),
            major_grid_color: self
                .entity
                .color("majorGridColour", Color::rgb8(200, 200, 200)),
            minor_grid_color: self
                .entity
                .color("minorGridColour", Color::rgb8(235, 235, 235)),
            major_grid: self.major_grid(),
            minor_grid: self.minor_grid(),
            major_ticks: self.major_ticks(),
            minor_ticks: self.minor_ticks(),
        }
    }

    fn set_origin(&mut self, descriptor: &PropertyDescriptor, args: &[Value]) -> Result<()> {
        self.entity.assign(descriptor, args)?;
        self.refresh();
        self.redraw(Redraw::Full);
        Ok(())
    }

    fn set_limits(&mut self, descriptor: &PropertyDescriptor, args: &[Value]) -> Result<()> {
        self.entity.assign(descriptor, args)?;
        if let Some(origin) = EntityKind::Plot.bundle().get("origin") {
            self.entity.assign(origin, &[Value::from(ORIGIN_AUTO)])?;
        }
        self.refresh();
        self.redraw(Redraw::Full);
        Ok(())
    }

    fn set_visual(&mut self, descriptor: &PropertyDescriptor, args: &[Value]) -> Result<()> {
        self.entity.assign(descriptor, args)?;
        self.redraw(Redraw::Full);
        Ok(())
    }
}

impl Responsive for Plot {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn refresh(&mut self) {
        self.transform = Transform::new(self.entity.size(), self.limits(), self.origin());
    }

    fn render(&self, layer: Layer) -> RenderList {
        match layer {
            Layer::Background => background::build(&self.decorations(), &self.transform),
            Layer::Foreground => foreground::build(self.traces.values(), &self.transform),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::surface::memory::MemoryContainer;

    fn plot(id: &str) -> Plot {
        Plot::new(id, Vec::<(String, Data)>::new(), &Options::new()).unwrap()
    }

    #[test]
    fn defaults() {
        let plot = plot("plot-defaults");
        assert_eq!(plot.limits(), Viewport::new(DEFAULT_LIMITS, DEFAULT_LIMITS));
        assert_eq!(plot.origin(), Origin::Auto);
        assert!(plot.major_ticks().visible.x);
        assert!(!plot.minor_grid().visible.y);
        assert_eq!(plot.minor_ticks().spacing, Axes::splat(0.2));
        assert_eq!(plot.grid_scale(), Axes::new(0.0, 0.0));
    }

    #[test]
    fn limits_drive_scale() {
        let mut container = MemoryContainer::new(Size::new(100.0, 100.0));
        let mut plot = plot("plot-scale");
        plot.show(&mut container);
        plot.set("xLims", [0.0, 10.0]).unwrap();
        plot.set("yLims", [-10.0, 0.0]).unwrap();
        assert_eq!(plot.grid_scale(), Axes::new(10.0, 10.0));
        assert_eq!(plot.transform().origin(), Axes::new(0.0, 0.0));
    }

    #[test]
    fn limits_reset_origin() {
        let mut plot = plot("plot-origin-reset");
        plot.set("origin", "centre").unwrap();
        assert_eq!(plot.origin(), Origin::Centre);
        plot.set("origin", [5.0, 6.0]).unwrap();
        assert_eq!(plot.origin(), Origin::Pixel(Axes::new(5.0, 6.0)));
        plot.set("xLims", [-1.0, 1.0]).unwrap();
        assert_eq!(plot.origin(), Origin::Auto);
    }

    #[test]
    fn explicit_origin_option_wins_over_limits() {
        let options = Options::new()
            .with("xLims", [0.0, 4.0])
            .with("origin", "centre");
        let plot = Plot::new("plot-origin-option", Vec::<(String, Data)>::new(), &options).unwrap();
        assert_eq!(plot.origin(), Origin::Centre);
    }

    #[test]
    fn merged_origin_wins_over_merged_limits() {
        let mut plot = plot("plot-origin-merge");
        let options = Options::new()
            .with("origin", "centre")
            .with("xLims", [0.0, 4.0]);
        plot.merge_options(&options).unwrap();
        assert_eq!(plot.origin(), Origin::Centre);
        assert_eq!(plot.limits().x, Range::new(0.0, 4.0));
    }

    #[test]
    fn extreme_spacings_and_limits_render() {
        let mut container = MemoryContainer::new(Size::new(100.0, 100.0));
        let mut plot = plot("plot-extreme");
        plot.show(&mut container);
        plot.set("majorGridSpacing", 1e-300).unwrap();
        plot.set("minorTickSpacing", 1e300).unwrap();
        plot.set("xLims", [-1e300, 1e300]).unwrap();
        let background = container.layer("plot-extreme", Layer::Background).unwrap();
        assert_eq!(background.draws, 4);
    }

    #[test]
    fn rejects_bad_limits() {
        let mut plot = plot("plot-bad-limits");
        assert!(plot.set("xLims", [1.0, 1.0]).is_err());
        assert!(plot.set("xLims", [0.0, 1.0, 2.0]).is_err());
        assert!(plot.set("majorTickSpacing", 0.0).is_err());
        assert_eq!(plot.limits(), Viewport::new(DEFAULT_LIMITS, DEFAULT_LIMITS));
    }

    #[test]
    fn axis_pairs_accept_one_or_two_values() {
        let mut plot = plot("plot-axes");
        plot.set("minorGridlines", true).unwrap();
        assert_eq!(plot.minor_grid().visible, Axes::splat(true));
        plot.set("majorGridSpacing", [2.0, 5.0]).unwrap();
        assert_eq!(plot.major_grid().spacing, Axes::new(2.0, 5.0));
        assert!(plot.set("majorGridSpacing", [1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn trace_management() {
        let mut plot = Plot::new(
            "plot-traces",
            [("seed", Data::function(|x| x))],
            &Options::new(),
        )
        .unwrap();
        plot.add_data("dots", Data::points(vec![Point::new(1.0, 1.0)]), &Options::new())
            .unwrap();
        let err = plot
            .add_data("dots", Data::points(vec![]), &Options::new())
            .unwrap_err();
        assert_eq!(err, Error::DuplicateId("dots".into()));

        let ids: Vec<&str> = plot.traces().map(Trace::id).collect();
        assert_eq!(ids, vec!["seed", "dots"]);

        plot.remove_data("seed").unwrap();
        assert_eq!(plot.remove_data("seed").unwrap_err(), Error::NotFound("seed".into()));
        assert_eq!(
            plot.set_trace("seed", "visibility", false).unwrap_err(),
            Error::NotFound("seed".into())
        );
        plot.set_trace("dots", "markerStyle", "cross").unwrap();
        assert!(plot.trace("dots").unwrap().marker_style().is_some());
    }

    #[test]
    fn invalid_trace_options_register_nothing() {
        let mut plot = plot("plot-invalid-trace");
        let options = Options::new().with("traceWidth", "wide");
        assert!(plot.add_data("t", Data::points(vec![]), &options).is_err());
        assert!(plot.trace("t").is_none());
    }

    #[test]
    fn duplicate_seed_ids_fail() {
        let seeds = [("a", Data::points(vec![])), ("a", Data::points(vec![]))];
        let err = Plot::new("plot-dup-seeds", seeds, &Options::new()).unwrap_err();
        assert_eq!(err, Error::DuplicateId("a".into()));
        assert!(!crate::registry::is_live("plot-dup-seeds"));
    }

    #[test]
    fn foreground_only_redraw_on_data_change() {
        let mut container = MemoryContainer::new(Size::new(50.0, 50.0));
        let mut plot = plot("plot-redraw-scope");
        plot.show(&mut container);
        plot.add_data("a", Data::function(|x| x), &Options::new())
            .unwrap();
        plot.remove_data("a").unwrap();
        let background = container.layer("plot-redraw-scope", Layer::Background).unwrap();
        let foreground = container.layer("plot-redraw-scope", Layer::Foreground).unwrap();
        assert_eq!(background.draws, 1);
        assert_eq!(foreground.draws, 3);
        assert!(foreground.frame.is_empty());
    }
}
