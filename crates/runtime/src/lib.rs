//! Scene runtime: the single edit path from control interaction to live
//! state.
//!
//! [`SceneRuntime`] owns the parameter registry, the binding records, the
//! derived-resource lifecycle, and the time-integrated state, and dispatches
//! every edit synchronously: Direct bindings write into live fields, Rebuild
//! bindings trigger one build-then-swap replacement each, all in binding
//! registration order.
//!
//! # Invariants
//! - One `set_value` call triggers at most one rebuild per Rebuild binding;
//!   edits are never batched across calls.
//! - The container holds exactly one text geometry from initialization until
//!   shutdown.

mod runtime;

pub use runtime::{EditError, ParamHandles, SceneRuntime, SinkTarget};

pub fn crate_info() -> &'static str {
    "shimmer-runtime v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("runtime"));
    }
}
