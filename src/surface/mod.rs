//! Host-facing drawing surfaces and resize notifications.
//!
//! A [`Container`] is whatever the host embeds plots in. It hands out one
//! [`Surface`] per layer and a [`ResizeObserver`] that reports size changes.
//! The core never draws directly; it replays [`RenderList`]s onto surfaces.

pub mod memory;

use crate::geom::Size;
use crate::render::RenderList;

/// One of the two stacked layers an entity draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Axes, ticks and gridlines.
    Background,
    /// Trace data.
    Foreground,
}

/// A drawing surface owned by an attached entity.
pub trait Surface: Send + Sync {
    /// Layer this surface was created for.
    fn layer(&self) -> Layer;

    /// Match the surface to a new pixel size.
    fn resize(&mut self, size: Size);

    /// Replace the surface contents with `list`.
    fn draw(&mut self, list: RenderList);
}

/// Source of resize notifications for one entity.
pub trait ResizeObserver: Send + Sync {
    /// Next pending size, oldest first.
    fn poll(&mut self) -> Option<Size>;

    /// Stop observing. Pending notifications are dropped.
    fn disconnect(&mut self);
}

/// Host that entities are shown in.
pub trait Container {
    /// Current pixel size of the container.
    fn size(&self) -> Size;

    /// Create a surface for `owner` on `layer`.
    fn create_surface(&mut self, owner: &str, layer: Layer) -> Box<dyn Surface>;

    /// Start observing size changes on behalf of `owner`.
    fn observe(&mut self, owner: &str) -> Box<dyn ResizeObserver>;
}
