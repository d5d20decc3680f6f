//! Rendering adapter: renderer-agnostic interface over the live scene.
//!
//! # Invariants
//! - The renderer never mutates scene state; it reads a [`SceneFrame`] view.
//! - Uniforms are live fields: Direct-bound edits land here without a
//!   geometry rebuild.
//!
//! # Workaround
//! Ships a debug text renderer as a stand-in for a GPU backend. The trait is
//! stable; a GPU implementation can be swapped in without changing
//! consumers.

mod renderer;
mod uniforms;

pub use renderer::{DebugTextRenderer, RenderView, Renderer, SceneFrame};
pub use uniforms::{ShaderSources, ThinFilmUniforms, UniformKey};

pub fn crate_info() -> &'static str {
    "shimmer-render v0.1.0"
}
