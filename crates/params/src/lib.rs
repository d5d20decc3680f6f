//! Parameter registry and control bindings.
//!
//! Parameters are named, typed values with optional numeric constraints,
//! owned by the registry and mutable only through its write path. Bindings
//! are explicit typed records connecting one parameter to one propagation
//! sink, in one of two modes: Direct (write the value into live state) or
//! Rebuild (invalidate a derived resource). Fan-out is delivered strictly in
//! binding-registration order.
//!
//! # Invariants
//! - A rejected write leaves the stored value unchanged.
//! - The stored value of a constrained numeric parameter is always inside
//!   its range and on its step grid.

mod binding;
mod registry;
mod value;

pub use binding::{Binding, BindingId, BindingMode, BindingSet};
pub use registry::{ParamError, ParamHandle, ParameterRegistry};
pub use value::{NumericRange, ParamKind, ParamValue};

pub fn crate_info() -> &'static str {
    "shimmer-params v0.1.0"
}
