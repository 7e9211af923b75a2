//! Entity lifecycle and the resize-driven redraw protocol.
//!
//! An [`Entity`] owns the identity, properties and surfaces shared by every
//! drawable kind. Kinds embed one and implement [`Responsive`] to describe
//! what each layer shows; the default methods handle attachment, resizing
//! and redraw ordering.

use std::fmt;

use once_cell::sync::Lazy;

use crate::defaults::{self, Configurable, EntityKind, SetterTable};
use crate::error::Result;
use crate::geom::Size;
use crate::property::{Options, PropertyDescriptor, PropertyStore, Value};
use crate::registry;
use crate::render::{Color, RenderList, background};
use crate::surface::{Container, Layer, ResizeObserver, Surface};
use crate::transform::Origin;

/// Lifecycle state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, not shown yet. Properties are stored but nothing renders.
    Unattached,
    /// Shown in a container; owns a surface pair and a resize observer.
    Attached,
    /// Disposed; the identifier has been released.
    Disposed,
}

struct Attachment {
    background: Box<dyn Surface>,
    foreground: Box<dyn Surface>,
    observer: Box<dyn ResizeObserver>,
}

impl Attachment {
    fn surface_mut(&mut self, layer: Layer) -> &mut dyn Surface {
        match layer {
            Layer::Background => self.background.as_mut(),
            Layer::Foreground => self.foreground.as_mut(),
        }
    }
}

enum State {
    Unattached,
    Attached(Attachment),
    Disposed,
}

/// Identity, properties and surfaces of one drawable object.
pub struct Entity {
    id: String,
    kind: EntityKind,
    props: PropertyStore,
    size: Size,
    state: State,
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("size", &self.size)
            .field("lifecycle", &self.lifecycle())
            .finish_non_exhaustive()
    }
}

impl Entity {
    /// Claim `id` in the registry.
    pub(crate) fn new(id: impl Into<String>, kind: EntityKind) -> Result<Self> {
        let id = id.into();
        registry::register(&id, kind)?;
        Ok(Self {
            id,
            kind,
            props: PropertyStore::new(),
            size: Size::default(),
            state: State::Unattached,
        })
    }

    /// Identifier, unique among live entities.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Kind this entity was registered as.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Stored properties.
    pub fn properties(&self) -> &PropertyStore {
        &self.props
    }

    /// Current pixel size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        match self.state {
            State::Unattached => Lifecycle::Unattached,
            State::Attached(_) => Lifecycle::Attached,
            State::Disposed => Lifecycle::Disposed,
        }
    }

    /// Check whether the entity is shown in a container.
    pub fn is_attached(&self) -> bool {
        matches!(self.state, State::Attached(_))
    }

    /// Origin placement policy.
    pub fn origin(&self) -> Origin {
        Origin::from_store(&self.props, "origin")
    }

    /// Resolved background fill.
    pub fn background_colour(&self) -> Color {
        self.color("backgroundColour", Color::WHITE)
    }

    pub(crate) fn color(&self, key: &str, fallback: Color) -> Color {
        self.props
            .value::<String>(key)
            .map(|text| Color::parse_or(&text, fallback, key))
            .unwrap_or(fallback)
    }

    pub(crate) fn assign(
        &mut self,
        descriptor: &PropertyDescriptor,
        args: &[Value],
    ) -> Result<bool> {
        Ok(self.props.assign(descriptor, args)?)
    }

    /// Create surfaces and an observer on `container`.
    ///
    /// Returns `false` (and does nothing) for a disposed entity.
    pub(crate) fn attach(&mut self, container: &mut dyn Container) -> bool {
        match std::mem::replace(&mut self.state, State::Unattached) {
            State::Disposed => {
                self.state = State::Disposed;
                tracing::warn!(id = %self.id, "show called on a disposed entity");
                return false;
            }
            State::Attached(mut previous) => {
                previous.observer.disconnect();
                tracing::debug!(id = %self.id, "detached from previous container");
            }
            State::Unattached => {}
        }
        self.size = container.size();
        let mut background = container.create_surface(&self.id, Layer::Background);
        let mut foreground = container.create_surface(&self.id, Layer::Foreground);
        background.resize(self.size);
        foreground.resize(self.size);
        let observer = container.observe(&self.id);
        self.state = State::Attached(Attachment {
            background,
            foreground,
            observer,
        });
        tracing::debug!(
            id = %self.id,
            width = self.size.width,
            height = self.size.height,
            "attached"
        );
        true
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = size;
        if let State::Attached(attachment) = &mut self.state {
            attachment.background.resize(size);
            attachment.foreground.resize(size);
        }
    }

    pub(crate) fn present(&mut self, layer: Layer, list: RenderList) {
        if let State::Attached(attachment) = &mut self.state {
            attachment.surface_mut(layer).draw(list);
        }
    }

    pub(crate) fn poll_resize(&mut self) -> Option<Size> {
        match &mut self.state {
            State::Attached(attachment) => attachment.observer.poll(),
            _ => None,
        }
    }

    pub(crate) fn dispose(&mut self) {
        match std::mem::replace(&mut self.state, State::Disposed) {
            State::Disposed => return,
            State::Attached(mut attachment) => attachment.observer.disconnect(),
            State::Unattached => {}
        }
        registry::unregister(&self.id);
        tracing::debug!(id = %self.id, "disposed");
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Which layers a redraw touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Background then foreground.
    Full,
    /// Foreground only.
    Foreground,
}

/// Drawable kinds that follow the resize-driven redraw protocol.
pub trait Responsive {
    /// Shared entity state.
    fn entity(&self) -> &Entity;

    /// Shared entity state, mutably.
    fn entity_mut(&mut self) -> &mut Entity;

    /// Render one layer at the current size.
    fn render(&self, layer: Layer) -> RenderList;

    /// Recompute derived state after the size or a property changed.
    fn refresh(&mut self) {}

    /// Identifier of the entity.
    fn id(&self) -> &str {
        self.entity().id()
    }

    /// Re-render the layers named by `scope`. Does nothing unless attached.
    fn redraw(&mut self, scope: Redraw) {
        if !self.entity().is_attached() {
            return;
        }
        if scope == Redraw::Full {
            let background = self.render(Layer::Background);
            self.entity_mut().present(Layer::Background, background);
        }
        let foreground = self.render(Layer::Foreground);
        self.entity_mut().present(Layer::Foreground, foreground);
        tracing::debug!(id = %self.id(), ?scope, "redrawn");
    }

    /// Attach to `container`, draw both layers and start observing resizes.
    ///
    /// Showing a disposed entity logs a warning and does nothing.
    fn show(&mut self, container: &mut dyn Container) {
        if !self.entity_mut().attach(container) {
            return;
        }
        self.refresh();
        self.redraw(Redraw::Full);
    }

    /// Handle a resize notification.
    fn resize(&mut self, size: Size) {
        if self.entity().lifecycle() == Lifecycle::Disposed {
            return;
        }
        self.entity_mut().set_size(size);
        self.refresh();
        self.redraw(Redraw::Full);
    }

    /// Apply every pending resize notification in order.
    ///
    /// Returns how many were applied.
    fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(size) = self.entity_mut().poll_resize() {
            self.resize(size);
            applied += 1;
        }
        applied
    }

    /// Stop observing, drop both surfaces and release the identifier.
    fn dispose(&mut self) {
        self.entity_mut().dispose();
    }
}

/// A bare entity: a filled background and an empty foreground.
#[derive(Debug)]
pub struct Canvas {
    entity: Entity,
}

static CANVAS_SETTERS: Lazy<SetterTable<Canvas>> = Lazy::new(|| {
    SetterTable::new().with_all(&["origin", "backgroundColour"], Canvas::set_visual)
});

impl Configurable for Canvas {
    const KIND: EntityKind = EntityKind::Canvas;

    fn setters() -> &'static SetterTable<Self> {
        &CANVAS_SETTERS
    }
}

impl Canvas {
    /// Create a canvas, taking properties from `options` where present.
    pub fn new(id: impl Into<String>, options: &Options) -> Result<Self> {
        let mut canvas = Self {
            entity: Entity::new(id, EntityKind::Canvas)?,
        };
        defaults::setup_properties(&mut canvas, EntityKind::Canvas, options)?;
        Ok(canvas)
    }

    /// Set one property.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        defaults::apply(self, key, value.spread())
    }

    /// Apply the recognised keys of `options`.
    pub fn merge_options(&mut self, options: &Options) -> Result<()> {
        defaults::merge_options(self, EntityKind::Canvas, options)
    }

    fn set_visual(&mut self, descriptor: &PropertyDescriptor, args: &[Value]) -> Result<()> {
        self.entity.assign(descriptor, args)?;
        self.redraw(Redraw::Full);
        Ok(())
    }
}

impl Responsive for Canvas {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn render(&self, layer: Layer) -> RenderList {
        match layer {
            Layer::Background => {
                background::fill_only(self.entity.size(), self.entity.background_colour())
            }
            Layer::Foreground => RenderList::new(),
        }
    }
}
