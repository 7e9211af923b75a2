//! Foreground layer: one command group per visible trace.

use crate::geom::ScreenRect;
use crate::render::{
    RenderCommand, RenderList, build_line_segments, build_scatter_points, dash_segments,
};
use crate::trace::{LinePattern, Trace};
use crate::transform::Transform;

/// Build the foreground layer.
///
/// Each visible trace contributes a group named after its id holding its
/// line (if any) followed by its markers (if any). Invisible traces
/// contribute nothing. An empty surface draws nothing.
pub(crate) fn build<'a, I>(traces: I, transform: &Transform) -> RenderList
where
    I: IntoIterator<Item = &'a Trace>,
{
    let mut render = RenderList::new();
    if transform.size().is_empty() {
        return render;
    }
    let clip = ScreenRect::from_size(transform.size());
    let mut segments = Vec::new();
    let mut markers = Vec::new();

    for trace in traces {
        if !trace.is_visible() {
            continue;
        }
        render.push(RenderCommand::GroupBegin(trace.id().to_string()));
        let geometry = trace.geometry(clip.width());

        let pattern = trace.line_pattern();
        if pattern != LinePattern::None {
            let style = trace.line_style();
            build_line_segments(&geometry, transform, clip, &mut segments);
            let drawn = match pattern.dash(f64::from(style.width)) {
                Some((on, off)) => dash_segments(&segments, on, off),
                None => std::mem::take(&mut segments),
            };
            if !drawn.is_empty() {
                render.push(RenderCommand::LineSegments {
                    segments: drawn,
                    style,
                });
            }
        }

        if let Some(style) = trace.marker_style() {
            build_scatter_points(&geometry, transform, clip, &mut markers);
            if !markers.is_empty() {
                render.push(RenderCommand::Points {
                    points: std::mem::take(&mut markers),
                    style,
                });
            }
        }
        render.push(RenderCommand::GroupEnd);
    }
    render
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Point, Size};
    use crate::property::{Options, Value};
    use crate::trace::Data;
    use crate::transform::Origin;
    use crate::view::{Range, Viewport};

    fn transform() -> Transform {
        let limits = Viewport::new(Range::new(-10.0, 10.0), Range::new(-10.0, 10.0));
        Transform::new(Size::new(200.0, 200.0), limits, Origin::Auto)
    }

    fn line_segments(commands: &[RenderCommand]) -> usize {
        commands
            .iter()
            .map(|command| match command {
                RenderCommand::LineSegments { segments, .. } => segments.len(),
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn continuous_trace_is_sampled_per_column() {
        let trace = Trace::new("line", Data::function(|x| 0.5 * x)).unwrap();
        let render = build([&trace], &transform());
        assert_eq!(render.groups(), vec!["line"]);
        let group = render.group("line").unwrap();
        // 201 samples across the width give 200 segments.
        assert_eq!(line_segments(group), 200);
    }

    #[test]
    fn invisible_traces_are_skipped() {
        let shown = Trace::new("shown", Data::points(vec![Point::new(0.0, 0.0)])).unwrap();
        let mut hidden = Trace::new("hidden", Data::function(|x| x)).unwrap();
        hidden.set("visibility", &[Value::Bool(false)]).unwrap();
        let render = build([&shown, &hidden], &transform());
        assert_eq!(render.groups(), vec!["shown"]);
    }

    #[test]
    fn markers_follow_the_line() {
        let options = Options::new()
            .with("markerStyle", "circle")
            .with("traceStyle", "none");
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(50.0, 0.0)];
        let trace = Trace::with_options("m", Data::points(points), &options).unwrap();
        let render = build([&trace], &transform());
        let group = render.group("m").unwrap();
        assert_eq!(group.len(), 1);
        match &group[0] {
            RenderCommand::Points { points, .. } => assert_eq!(points.len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn dashed_lines_are_split() {
        let across = || Data::points(vec![Point::new(-10.0, 0.0), Point::new(10.0, 0.0)]);
        let solid = Trace::new("solid", across()).unwrap();
        let dashed = Trace::with_options(
            "dashed",
            across(),
            &Options::new().with("traceStyle", "dashed"),
        )
        .unwrap();
        let render = build([&solid, &dashed], &transform());
        assert_eq!(line_segments(render.group("solid").unwrap()), 1);
        // 200 px at width 2: 8 px on, 6 px off.
        assert_eq!(line_segments(render.group("dashed").unwrap()), 15);
    }

    #[test]
    fn empty_surface_draws_nothing() {
        let trace = Trace::new("t", Data::function(|x| x)).unwrap();
        let limits = Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0));
        let transform = Transform::new(Size::default(), limits, Origin::Auto);
        assert!(build([&trace], &transform).is_empty());
    }
}
