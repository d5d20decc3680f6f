//! Startup asset pipeline: a fixed set of heterogeneous loads gated by a
//! completion barrier.
//!
//! Payloads are identified by content-addressed hashes and staged as they
//! arrive, in any order. Once every slot has resolved, the staging area is
//! sealed into an immutable [`AssetBundle`] that is handed to scene
//! initialization in one piece. Consumers never observe a half-loaded set.
//!
//! # Invariants
//! - The barrier's ready transition is observed exactly once.
//! - A bundle always carries all four slots; no slot is ever re-assigned.

mod barrier;
mod bundle;
mod loader;

pub use barrier::{AssetBarrier, BarrierError, BarrierState};
pub use bundle::{
    AssetBundle, AssetError, AssetId, AssetPayload, AssetSlot, AssetStaging, FilterMode, Glyph,
    GlyphSet, LoadedAsset, Texture,
};
pub use loader::{AssetLoader, GlyphSetLoader, StartupLoads, TextLoader, TextureLoader};

pub fn crate_info() -> &'static str {
    "shimmer-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}
