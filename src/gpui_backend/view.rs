use std::sync::Arc;

use gpui::prelude::*;
use gpui::{Window, canvas, div};
use parking_lot::RwLock;

use crate::entity::Responsive;
use crate::geom::Size;
use crate::plot::Plot;

use super::host::GpuiContainer;
use super::paint::paint_list;

/// A GPUI view that shows a [`Plot`].
///
/// The plot is attached to the view's container on construction. Layout
/// changes reach the plot as resize notifications, so it redraws through
/// the same protocol as any other host.
#[derive(Clone)]
pub struct GpuiPlotView {
    plot: Arc<RwLock<Plot>>,
    container: GpuiContainer,
}

impl GpuiPlotView {
    /// Wrap `plot` and show it on a fresh container.
    pub fn new(mut plot: Plot) -> Self {
        let mut container = GpuiContainer::default();
        plot.show(&mut container);
        Self {
            plot: Arc::new(RwLock::new(plot)),
            container,
        }
    }

    /// Get a handle for mutating the plot while the view is alive.
    pub fn plot_handle(&self) -> PlotHandle {
        PlotHandle {
            plot: Arc::clone(&self.plot),
        }
    }
}

impl Render for GpuiPlotView {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        let plot = Arc::clone(&self.plot);
        let container = self.container.clone();

        div().size_full().child(
            canvas(
                move |bounds, _window, _cx| {
                    container.notify_size(Size::new(
                        f64::from(f32::from(bounds.size.width)),
                        f64::from(f32::from(bounds.size.height)),
                    ));
                    plot.write().process_events();
                    container.snapshot()
                },
                move |bounds, (background, foreground), window, _cx| {
                    paint_list(&background, bounds, window);
                    paint_list(&foreground, bounds, window);
                },
            )
            .size_full(),
        )
    }
}

/// A handle for mutating a [`Plot`] held inside a [`GpuiPlotView`].
///
/// The handle clones cheaply and can be moved into async tasks. Callers
/// should notify the view after writing so it repaints.
#[derive(Clone)]
pub struct PlotHandle {
    plot: Arc<RwLock<Plot>>,
}

impl PlotHandle {
    /// Read the plot state.
    ///
    /// The plot is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&Plot) -> R) -> R {
        f(&self.plot.read())
    }

    /// Mutate the plot state.
    ///
    /// The plot is locked for the duration of the callback.
    pub fn write<R>(&self, f: impl FnOnce(&mut Plot) -> R) -> R {
        f(&mut self.plot.write())
    }
}
