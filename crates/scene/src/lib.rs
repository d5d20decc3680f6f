//! Derived scene resources and their lifecycle.
//!
//! The expensive-to-construct resource here is [`TextGeometry`], an extruded
//! glyph mesh rebuilt from scratch whenever a contributing parameter changes.
//! [`Container`] owns attachment slots; [`LifecycleManager`] guarantees that
//! at most one instance is attached at any instant and that every replaced
//! instance is disposed exactly once.
//!
//! # Invariants
//! - Replacement is build-then-swap: a failed build leaves the previous
//!   instance attached and untouched.
//! - The container holds exactly 0 or 1 managed resource at any instant.

mod container;
mod geometry;
mod lifecycle;

pub use container::Container;
pub use geometry::{ExtrudeSettings, GeometryBuffers, GeometryError, TextGeometry};
pub use lifecycle::{LifecycleManager, ReplaceOutcome, SceneError, SceneResource};

pub fn crate_info() -> &'static str {
    "shimmer-scene v0.1.0"
}
