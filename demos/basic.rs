//! Headless walkthrough: build a plot, show it in memory, resize it and
//! inspect what each layer drew.
//!
//! Run with `RUST_LOG=respplot=debug` to see the redraw protocol.

use std::error::Error;

use respplot::{
    Data, EntityKind, Layer, MemoryContainer, Options, Plot, Point, RenderCommand, Responsive,
    Size, registry,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = Options::from_json(
        r#"{ "xLims": [-4, 4], "yLims": [-2, 2], "minorGridlines": true, "majorGridSpacing": [1, 0.5] }"#,
    )?;

    let mut plot = Plot::new("demo", [("sine", Data::function(f64::sin))], &options)?;
    plot.add_data(
        "circle",
        Data::parametric(|t| Point::new(t.cos(), t.sin())),
        &Options::new()
            .with("parameterRange", [0.0, std::f64::consts::TAU])
            .with("traceStyle", "dashed")
            .with("traceColour", "#d62728"),
    )?;
    plot.add_data(
        "samples",
        Data::points((-3..=3).map(|i| Point::new(f64::from(i), f64::from(i) * 0.25))),
        &Options::new()
            .with("traceStyle", "none")
            .with("markerStyle", "square"),
    )?;

    let mut container = MemoryContainer::new(Size::new(640.0, 320.0));
    plot.show(&mut container);
    report(&container, &plot);

    container.set_size(Size::new(320.0, 320.0));
    plot.process_events();
    plot.set_trace("samples", "visibility", false)?;
    report(&container, &plot);

    println!("live plots: {:?}", registry::live(EntityKind::Plot));
    plot.dispose();
    println!("live plots after dispose: {:?}", registry::live(EntityKind::Plot));
    Ok(())
}

fn report(container: &MemoryContainer, plot: &Plot) {
    let scale = plot.grid_scale();
    println!(
        "size {:?}, scale ({:.1}, {:.1}) px/unit",
        plot.entity().size(),
        scale.x,
        scale.y
    );
    if let Some(foreground) = container.layer(plot.id(), Layer::Foreground) {
        for id in foreground.frame.groups() {
            let commands = foreground.frame.group(id).unwrap_or_default();
            let segments: usize = commands
                .iter()
                .map(|command| match command {
                    RenderCommand::LineSegments { segments, .. } => segments.len(),
                    RenderCommand::Points { points, .. } => points.len(),
                    _ => 0,
                })
                .sum();
            println!("  trace {id}: {segments} primitives");
        }
    }
}
