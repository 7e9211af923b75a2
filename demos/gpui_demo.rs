#[cfg(feature = "gpui")]
use std::time::Duration;

#[cfg(feature = "gpui")]
use gpui::{
    AppContext, Application, AsyncWindowContext, Bounds, Timer, WindowBounds, WindowOptions, px,
    size,
};

#[cfg(feature = "gpui")]
use respplot::{Data, GpuiPlotView, Options, Plot, Point};

#[cfg(feature = "gpui")]
fn main() {
    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(900.0), px(600.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |window, cx| {
            let plot_options = Options::new()
                .with("xLims", [-6.0, 6.0])
                .with("yLims", [-3.0, 3.0])
                .with("minorGridlines", true)
                .with("minorTicks", true);
            let plot = Plot::new(
                "gpui-demo",
                [("sine", Data::function(f64::sin))],
                &plot_options,
            )
            .expect("valid plot options");

            let view = GpuiPlotView::new(plot);
            let plot_handle = view.plot_handle();
            let view_handle = cx.new(|_| view);

            let view_for_task = view_handle.clone();
            window
                .spawn(cx, move |cx: &mut AsyncWindowContext| {
                    let mut cx = cx.clone();
                    async move {
                        let mut phase = 0.0_f64;
                        loop {
                            Timer::after(Duration::from_millis(33)).await;
                            phase += 0.05;
                            let offset = phase;
                            cx.update(|_, cx| {
                                view_for_task.update(cx, |_view, view_cx| {
                                    plot_handle.write(|plot| {
                                        let _ = plot.remove_data("orbit");
                                        let _ = plot.add_data(
                                            "orbit",
                                            Data::parametric(move |t| {
                                                Point::new(2.0 * (t + offset).cos(), (2.0 * t).sin())
                                            }),
                                            &Options::new()
                                                .with("parameterRange", [0.0, std::f64::consts::TAU])
                                                .with("traceStyle", "dotted")
                                                .with("traceColour", "#ff7f0e"),
                                        );
                                    });
                                    view_cx.notify();
                                });
                            })
                            .ok();
                        }
                    }
                })
                .detach();

            view_handle
        })
        .unwrap();
    });
}

#[cfg(not(feature = "gpui"))]
fn main() {
    eprintln!("Enable the gpui feature to run this example.");
}
