use std::sync::Arc;

use parking_lot::Mutex;

use crate::geom::Size;
use crate::render::RenderList;
use crate::surface::{Container, Layer, ResizeObserver, Surface};

#[derive(Debug, Default)]
struct Frames {
    size: Size,
    background: RenderList,
    foreground: RenderList,
    pending: Option<Size>,
    observed: bool,
}

/// Container backed by the frames a GPUI canvas paints.
#[derive(Debug, Clone, Default)]
pub(crate) struct GpuiContainer {
    frames: Arc<Mutex<Frames>>,
}

impl GpuiContainer {
    /// Record the canvas size, queueing a notification when it changed.
    pub(crate) fn notify_size(&self, size: Size) {
        let mut frames = self.frames.lock();
        if frames.size != size {
            frames.size = size;
            if frames.observed {
                frames.pending = Some(size);
            }
        }
    }

    /// Copies of the last background and foreground frames.
    pub(crate) fn snapshot(&self) -> (RenderList, RenderList) {
        let frames = self.frames.lock();
        (frames.background.clone(), frames.foreground.clone())
    }
}

impl Container for GpuiContainer {
    fn size(&self) -> Size {
        self.frames.lock().size
    }

    fn create_surface(&mut self, _owner: &str, layer: Layer) -> Box<dyn Surface> {
        Box::new(GpuiSurface {
            frames: Arc::clone(&self.frames),
            layer,
        })
    }

    fn observe(&mut self, _owner: &str) -> Box<dyn ResizeObserver> {
        self.frames.lock().observed = true;
        Box::new(GpuiObserver {
            frames: Arc::clone(&self.frames),
        })
    }
}

struct GpuiSurface {
    frames: Arc<Mutex<Frames>>,
    layer: Layer,
}

impl Surface for GpuiSurface {
    fn layer(&self) -> Layer {
        self.layer
    }

    // The canvas paints at whatever size GPUI lays it out at.
    fn resize(&mut self, _size: Size) {}

    fn draw(&mut self, list: RenderList) {
        let mut frames = self.frames.lock();
        match self.layer {
            Layer::Background => frames.background = list,
            Layer::Foreground => frames.foreground = list,
        }
    }
}

struct GpuiObserver {
    frames: Arc<Mutex<Frames>>,
}

impl ResizeObserver for GpuiObserver {
    fn poll(&mut self) -> Option<Size> {
        self.frames.lock().pending.take()
    }

    fn disconnect(&mut self) {
        let mut frames = self.frames.lock();
        frames.observed = false;
        frames.pending = None;
    }
}
