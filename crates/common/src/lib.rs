//! Shared identifiers and value types used across the shimmer workspace.
//!
//! # Invariants
//! - `ResourceId` is unique per live resource instance.
//! - `SlotId` is meaningful only to the container that issued it.

pub mod types;

pub use types::{Color, ResourceId, SlotId};
