//! GPUI host for respplot.
//!
//! [`GpuiPlotView`] shows a [`Plot`](crate::plot::Plot) on an in-window
//! container. Canvas bounds changes are queued as resize notifications and
//! applied through the plot's redraw protocol before each paint.

mod host;
mod paint;
mod view;

pub use view::{GpuiPlotView, PlotHandle};
