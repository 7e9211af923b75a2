//! respplot is a responsive 2D plotting core.
//!
//! Plots render continuous functions and discrete point sets onto a pair of
//! stacked drawing surfaces supplied by a host [`Container`]. Display state
//! lives in validated, typed properties; resize notifications and property
//! changes redraw the background (axes, ticks, gridlines) and foreground
//! (traces) layers synchronously.

#![forbid(unsafe_code)]

pub mod defaults;
pub mod entity;
pub mod error;
pub mod geom;
pub mod plot;
pub mod property;
pub mod registry;
pub mod render;
pub mod surface;
pub mod trace;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use defaults::EntityKind;
pub use entity::{Canvas, Entity, Lifecycle, Redraw, Responsive};
pub use error::{Error, Result, ValidationError, ValidationKind};
pub use geom::{Axes, Point, ScreenPoint, ScreenRect, Size};
pub use plot::Plot;
pub use property::{Options, Value, ValueType};
pub use render::{
    Color, Guides, LineSegment, LineStyle, MarkerShape, MarkerStyle, RectStyle, RenderCommand,
    RenderList,
};
pub use surface::memory::MemoryContainer;
pub use surface::{Container, Layer, ResizeObserver, Surface};
pub use trace::{Data, DataKind, LinePattern, MarkerKind, Trace};
pub use transform::{Origin, Transform};
pub use view::{Range, Viewport};

#[cfg(feature = "gpui")]
pub use gpui_backend::{GpuiPlotView, PlotHandle};
