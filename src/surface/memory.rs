//! In-memory container that records what was drawn.
//!
//! Useful headless and in tests: every surface keeps the last render list it
//! received, and resize notifications are queued until the owner polls them.

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::geom::Size;
use crate::render::RenderList;

use super::{Container, Layer, ResizeObserver, Surface};

/// Snapshot of one surface created by a [`MemoryContainer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerRecord {
    /// Size the surface was last resized to.
    pub size: Size,
    /// Last render list drawn.
    pub frame: RenderList,
    /// Number of draws since the surface was created.
    pub draws: usize,
    /// Whether the owning entity still holds the surface.
    pub attached: bool,
}

#[derive(Debug, Default)]
struct Shared {
    size: Size,
    layers: IndexMap<(String, Layer), Slot>,
    observers: Vec<Watch>,
    serial: u64,
}

impl Shared {
    fn next_serial(&mut self) -> u64 {
        self.serial += 1;
        self.serial
    }
}

#[derive(Debug)]
struct Slot {
    serial: u64,
    record: LayerRecord,
}

#[derive(Debug)]
struct Watch {
    serial: u64,
    owner: String,
    pending: VecDeque<Size>,
}

/// A [`Container`] backed by shared memory.
///
/// Clones share state, so a test can keep one handle while an entity is
/// shown on another.
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryContainer {
    /// Create a container of the given size.
    pub fn new(size: Size) -> Self {
        let shared = Shared {
            size,
            ..Shared::default()
        };
        Self {
            shared: Arc::new(Mutex::new(shared)),
        }
    }

    /// Resize the container and notify every observer.
    pub fn set_size(&self, size: Size) {
        let mut shared = self.shared.lock();
        shared.size = size;
        for watch in &mut shared.observers {
            watch.pending.push_back(size);
        }
    }

    /// Snapshot of the surface `owner` holds on `layer`.
    pub fn layer(&self, owner: &str, layer: Layer) -> Option<LayerRecord> {
        self.shared
            .lock()
            .layers
            .get(&(owner.to_string(), layer))
            .map(|slot| slot.record.clone())
    }

    /// Number of connected observers.
    pub fn observer_count(&self) -> usize {
        self.shared.lock().observers.len()
    }

    /// Owners with a connected observer.
    pub fn observed(&self) -> Vec<String> {
        self.shared
            .lock()
            .observers
            .iter()
            .map(|watch| watch.owner.clone())
            .collect()
    }
}

impl Container for MemoryContainer {
    fn size(&self) -> Size {
        self.shared.lock().size
    }

    fn create_surface(&mut self, owner: &str, layer: Layer) -> Box<dyn Surface> {
        let mut shared = self.shared.lock();
        let serial = shared.next_serial();
        let record = LayerRecord {
            attached: true,
            ..LayerRecord::default()
        };
        shared
            .layers
            .insert((owner.to_string(), layer), Slot { serial, record });
        Box::new(MemorySurface {
            shared: Arc::clone(&self.shared),
            key: (owner.to_string(), layer),
            serial,
        })
    }

    fn observe(&mut self, owner: &str) -> Box<dyn ResizeObserver> {
        let mut shared = self.shared.lock();
        let serial = shared.next_serial();
        shared.observers.push(Watch {
            serial,
            owner: owner.to_string(),
            pending: VecDeque::new(),
        });
        Box::new(MemoryObserver {
            shared: Arc::clone(&self.shared),
            serial,
            connected: true,
        })
    }
}

struct MemorySurface {
    shared: Arc<Mutex<Shared>>,
    key: (String, Layer),
    serial: u64,
}

impl MemorySurface {
    fn with_record(&self, f: impl FnOnce(&mut LayerRecord)) {
        let mut shared = self.shared.lock();
        if let Some(slot) = shared.layers.get_mut(&self.key)
            && slot.serial == self.serial
        {
            f(&mut slot.record);
        }
    }
}

impl Surface for MemorySurface {
    fn layer(&self) -> Layer {
        self.key.1
    }

    fn resize(&mut self, size: Size) {
        self.with_record(|record| record.size = size);
    }

    fn draw(&mut self, list: RenderList) {
        self.with_record(|record| {
            record.frame = list;
            record.draws += 1;
        });
    }
}

impl Drop for MemorySurface {
    fn drop(&mut self) {
        self.with_record(|record| record.attached = false);
    }
}

struct MemoryObserver {
    shared: Arc<Mutex<Shared>>,
    serial: u64,
    connected: bool,
}

impl ResizeObserver for MemoryObserver {
    fn poll(&mut self) -> Option<Size> {
        if !self.connected {
            return None;
        }
        let mut shared = self.shared.lock();
        shared
            .observers
            .iter_mut()
            .find(|watch| watch.serial == self.serial)
            .and_then(|watch| watch.pending.pop_front())
    }

    fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        self.connected = false;
        let serial = self.serial;
        self.shared
            .lock()
            .observers
            .retain(|watch| watch.serial != serial);
    }
}

impl Drop for MemoryObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surfaces_record_draws() {
        let mut container = MemoryContainer::new(Size::new(10.0, 20.0));
        let mut surface = container.create_surface("a", Layer::Background);
        surface.resize(container.size());
        surface.draw(RenderList::new());
        surface.draw(RenderList::new());
        let record = container.layer("a", Layer::Background).unwrap();
        assert_eq!(record.size, Size::new(10.0, 20.0));
        assert_eq!(record.draws, 2);
        assert!(record.attached);
        drop(surface);
        assert!(!container.layer("a", Layer::Background).unwrap().attached);
        assert!(container.layer("a", Layer::Foreground).is_none());
    }

    #[test]
    fn replaced_surface_drop_leaves_new_record() {
        let mut container = MemoryContainer::default();
        let old = container.create_surface("a", Layer::Foreground);
        let _new = container.create_surface("a", Layer::Foreground);
        drop(old);
        assert!(container.layer("a", Layer::Foreground).unwrap().attached);
    }

    #[test]
    fn observers_queue_sizes_until_disconnected() {
        let mut container = MemoryContainer::default();
        let mut observer = container.observe("a");
        container.set_size(Size::new(1.0, 1.0));
        container.set_size(Size::new(2.0, 2.0));
        assert_eq!(observer.poll(), Some(Size::new(1.0, 1.0)));
        assert_eq!(observer.poll(), Some(Size::new(2.0, 2.0)));
        assert_eq!(observer.poll(), None);
        assert_eq!(container.observed(), vec!["a".to_string()]);

        observer.disconnect();
        container.set_size(Size::new(3.0, 3.0));
        assert_eq!(observer.poll(), None);
        assert_eq!(container.observer_count(), 0);
    }
}
