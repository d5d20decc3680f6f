use crate::registry::ParamHandle;

/// Propagation mode for a control binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingMode {
    /// Write the new value straight into live state.
    Direct,
    /// Invalidate the derived resource, forcing a full rebuild and swap.
    Rebuild,
}

/// Identifier of one binding record. Issued in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u32);

/// A typed record connecting one parameter to one propagation sink.
#[derive(Debug, Clone)]
pub struct Binding<S> {
    pub id: BindingId,
    pub param: ParamHandle,
    pub mode: BindingMode,
    pub sink: S,
}

/// Ordered collection of bindings.
///
/// A parameter may fan out to several bindings; [`BindingSet::for_param`]
/// yields them in registration order, which is the delivery order the edit
/// dispatcher must honor. The sink type is chosen by the caller, so the set
/// carries no knowledge of what a sink does.
#[derive(Debug)]
pub struct BindingSet<S> {
    bindings: Vec<Binding<S>>,
}

impl<S> BindingSet<S> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Connect `param` to `sink` with the given propagation mode.
    pub fn bind(&mut self, param: ParamHandle, mode: BindingMode, sink: S) -> BindingId {
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(Binding {
            id,
            param,
            mode,
            sink,
        });
        id
    }

    /// All bindings for `param`, in registration order.
    pub fn for_param(&self, param: ParamHandle) -> impl Iterator<Item = &Binding<S>> {
        self.bindings.iter().filter(move |b| b.param == param)
    }

    /// All bindings, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding<S>> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<S> Default for BindingSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ParameterRegistry;
    use crate::value::ParamValue;

    #[test]
    fn fan_out_preserves_registration_order() {
        let mut registry = ParameterRegistry::new();
        let h = registry
            .register("message", ParamValue::Text("hi".into()))
            .unwrap();
        let other = registry.register("spin", ParamValue::Float(0.15)).unwrap();

        let mut set: BindingSet<&'static str> = BindingSet::new();
        set.bind(h, BindingMode::Direct, "first");
        set.bind(other, BindingMode::Direct, "unrelated");
        set.bind(h, BindingMode::Rebuild, "second");
        set.bind(h, BindingMode::Direct, "third");

        let sinks: Vec<_> = set.for_param(h).map(|b| b.sink).collect();
        assert_eq!(sinks, vec!["first", "second", "third"]);
    }

    #[test]
    fn modes_are_recorded_per_binding() {
        let mut registry = ParameterRegistry::new();
        let h = registry.register("height", ParamValue::Float(50.0)).unwrap();

        let mut set: BindingSet<u8> = BindingSet::new();
        set.bind(h, BindingMode::Rebuild, 0);

        let binding = set.for_param(h).next().unwrap();
        assert_eq!(binding.mode, BindingMode::Rebuild);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_set_yields_nothing() {
        let registry = {
            let mut r = ParameterRegistry::new();
            r.register("x", ParamValue::Bool(true)).unwrap();
            r
        };
        let h = registry.handle("x").unwrap();
        let set: BindingSet<u8> = BindingSet::default();
        assert_eq!(set.for_param(h).count(), 0);
        assert!(set.is_empty());
    }
}
