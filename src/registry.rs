//! Process-wide registry of live entities.
//!
//! Identifiers are inserted when an entity is constructed and removed when it
//! is disposed (or dropped). Insertion fails if the identifier is taken.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::defaults::EntityKind;
use crate::error::{Error, Result};

static LIVE: Lazy<Mutex<IndexMap<String, EntityKind>>> = Lazy::new(Default::default);

pub(crate) fn register(id: &str, kind: EntityKind) -> Result<()> {
    let mut live = LIVE.lock();
    if live.contains_key(id) {
        return Err(Error::DuplicateId(id.to_string()));
    }
    live.insert(id.to_string(), kind);
    tracing::debug!(id, kind = kind.name(), "entity registered");
    Ok(())
}

pub(crate) fn unregister(id: &str) -> bool {
    let removed = LIVE.lock().shift_remove(id).is_some();
    if removed {
        tracing::debug!(id, "entity unregistered");
    }
    removed
}

/// Identifiers of all live entities of `kind`, in construction order.
///
/// Kinds derived from `kind` are included, so every live plot is also
/// listed as a canvas.
pub fn live(kind: EntityKind) -> Vec<String> {
    LIVE.lock()
        .iter()
        .filter(|(_, live_kind)| live_kind.lineage().contains(&kind))
        .map(|(id, _)| id.clone())
        .collect()
}

/// Check whether an identifier belongs to a live entity.
pub fn is_live(id: &str) -> bool {
    LIVE.lock().contains_key(id)
}

/// Kind of the live entity registered under `id`.
pub fn kind_of(id: &str) -> Option<EntityKind> {
    LIVE.lock().get(id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_duplicates() {
        register("registry-test-a", EntityKind::Canvas).unwrap();
        let err = register("registry-test-a", EntityKind::Plot).unwrap_err();
        assert_eq!(err, Error::DuplicateId("registry-test-a".into()));
        assert_eq!(kind_of("registry-test-a"), Some(EntityKind::Canvas));
        assert!(unregister("registry-test-a"));
        assert!(!unregister("registry-test-a"));
        assert!(!is_live("registry-test-a"));
    }

    #[test]
    fn live_filters_by_kind() {
        register("registry-test-plot", EntityKind::Plot).unwrap();
        register("registry-test-canvas", EntityKind::Canvas).unwrap();
        let plots = live(EntityKind::Plot);
        assert!(plots.contains(&"registry-test-plot".to_string()));
        assert!(!plots.contains(&"registry-test-canvas".to_string()));
        let canvases = live(EntityKind::Canvas);
        assert!(canvases.contains(&"registry-test-plot".to_string()));
        assert!(canvases.contains(&"registry-test-canvas".to_string()));
        assert!(!live(EntityKind::Trace).contains(&"registry-test-plot".to_string()));
        unregister("registry-test-plot");
        unregister("registry-test-canvas");
    }
}
