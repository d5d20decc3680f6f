use shimmer_common::{ResourceId, SlotId};

use crate::container::Container;
use crate::geometry::{GeometryError, TextGeometry};

/// Errors from container and lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("slot {0:?} is empty")]
    EmptySlot(SlotId),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// A resource whose lifetime the manager controls.
pub trait SceneResource {
    fn id(&self) -> ResourceId;
    /// Release owned buffers. Must be called exactly once.
    fn dispose(&mut self) -> Result<(), SceneError>;
    fn is_disposed(&self) -> bool;
}

impl SceneResource for TextGeometry {
    fn id(&self) -> ResourceId {
        TextGeometry::id(self)
    }

    fn dispose(&mut self) -> Result<(), SceneError> {
        Ok(TextGeometry::dispose(self)?)
    }

    fn is_disposed(&self) -> bool {
        TextGeometry::is_disposed(self)
    }
}

/// Outcome of a successful replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Id of the newly attached instance.
    pub attached: ResourceId,
    /// Id of the detached-and-disposed predecessor, if there was one.
    pub disposed: Option<ResourceId>,
}

/// Owns the single rebuildable resource slot.
///
/// `replace` is build-then-swap: the builder runs first, without access to
/// the manager or the container, so a failed build leaves the previous
/// instance attached and reentrancy is structurally impossible. Exactly 0 or
/// 1 instance is attached at any instant; a replaced instance is detached
/// from its slot and disposed exactly once.
#[derive(Debug, Default)]
pub struct LifecycleManager {
    slot: Option<SlotId>,
    rebuilds: u64,
    disposals: u64,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a new instance and swap it in.
    pub fn replace<R, F>(
        &mut self,
        container: &mut Container<R>,
        build: F,
    ) -> Result<ReplaceOutcome, SceneError>
    where
        R: SceneResource,
        F: FnOnce() -> Result<R, SceneError>,
    {
        // Build first. The container is not touched until this succeeds.
        let fresh = build()?;
        let attached = fresh.id();

        let disposed = match self.slot.take() {
            Some(slot) => {
                let mut old = container.remove(slot)?;
                old.dispose()?;
                self.disposals += 1;
                Some(SceneResource::id(&old))
            }
            None => None,
        };

        self.slot = Some(container.add(fresh));
        self.rebuilds += 1;
        tracing::debug!(?attached, ?disposed, "resource replaced");

        Ok(ReplaceOutcome { attached, disposed })
    }

    /// Detach and dispose the current instance, for orderly shutdown.
    pub fn dispose_current<R: SceneResource>(
        &mut self,
        container: &mut Container<R>,
    ) -> Result<Option<ResourceId>, SceneError> {
        match self.slot.take() {
            Some(slot) => {
                let mut old = container.remove(slot)?;
                old.dispose()?;
                self.disposals += 1;
                Ok(Some(SceneResource::id(&old)))
            }
            None => Ok(None),
        }
    }

    /// The currently attached instance, if any.
    pub fn current<'a, R>(&self, container: &'a Container<R>) -> Option<&'a R> {
        self.slot.and_then(|slot| container.get(slot))
    }

    pub fn slot(&self) -> Option<SlotId> {
        self.slot
    }

    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn disposals(&self) -> u64 {
        self.disposals
    }
}
