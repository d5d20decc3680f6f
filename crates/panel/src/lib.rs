//! Control panel host.
//!
//! Presentation only: folders group controls for display, and each control
//! maps a widget label to a parameter handle plus an optional display range.
//! Interactions are forwarded to the runtime's edit path; the panel itself
//! never stores parameter values.

mod panel;

pub use panel::{Control, ControlPanel, Folder, PanelError};

pub fn crate_info() -> &'static str {
    "shimmer-panel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("panel"));
    }
}
