//! Input collaborator: advances camera state from buffered device input.
//!
//! # Invariants
//! - Controllers only move the view; they never touch scene truth.
//! - `update()` runs once per frame on the shared execution sequence.

pub mod orbit;

pub use orbit::{InputController, OrbitController};

pub fn crate_info() -> &'static str {
    "shimmer-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
