use std::collections::BTreeMap;

use crate::value::{NumericRange, ParamKind, ParamValue};

/// Handle to a registered parameter. Issued in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamHandle(pub(crate) u32);

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("unknown parameter handle {0:?}")]
    UnknownHandle(ParamHandle),
    #[error("parameter '{0}' is already registered")]
    DuplicateName(String),
    #[error("parameter '{name}' expects {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: ParamKind,
        got: ParamKind,
    },
    #[error("parameter '{name}' has no choice named '{value}'")]
    UnknownChoice { name: String, value: String },
}

#[derive(Debug)]
struct Param {
    name: String,
    value: ParamValue,
    range: Option<NumericRange>,
    choices: Option<Vec<String>>,
}

/// Owner of all named, typed, constrained parameter values.
///
/// Values are mutable only through [`ParameterRegistry::set_value`], which
/// validates the type, applies numeric constraints, and returns the value as
/// stored. A rejected write leaves the stored value untouched.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    params: Vec<Param>,
    by_name: BTreeMap<String, ParamHandle>,
}

impl ParameterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an unconstrained parameter.
    pub fn register(
        &mut self,
        name: &str,
        initial: ParamValue,
    ) -> Result<ParamHandle, ParamError> {
        self.insert(name, initial, None, None)
    }

    /// Register a numeric parameter. The initial value is subject to the
    /// range like any other write.
    pub fn register_number(
        &mut self,
        name: &str,
        initial: f32,
        range: NumericRange,
    ) -> Result<ParamHandle, ParamError> {
        self.insert(name, ParamValue::Float(range.apply(initial)), Some(range), None)
    }

    /// Register an integer parameter constrained to a range.
    pub fn register_int(
        &mut self,
        name: &str,
        initial: i64,
        range: NumericRange,
    ) -> Result<ParamHandle, ParamError> {
        let clamped = range.apply(initial as f32).round() as i64;
        self.insert(name, ParamValue::Int(clamped), Some(range), None)
    }

    /// Register an enumerated parameter with a fixed option list.
    pub fn register_choice(
        &mut self,
        name: &str,
        initial: &str,
        choices: Vec<String>,
    ) -> Result<ParamHandle, ParamError> {
        if !choices.iter().any(|c| c == initial) {
            return Err(ParamError::UnknownChoice {
                name: name.to_string(),
                value: initial.to_string(),
            });
        }
        self.insert(
            name,
            ParamValue::Choice(initial.to_string()),
            None,
            Some(choices),
        )
    }

    fn insert(
        &mut self,
        name: &str,
        value: ParamValue,
        range: Option<NumericRange>,
        choices: Option<Vec<String>>,
    ) -> Result<ParamHandle, ParamError> {
        if self.by_name.contains_key(name) {
            return Err(ParamError::DuplicateName(name.to_string()));
        }
        let handle = ParamHandle(self.params.len() as u32);
        self.params.push(Param {
            name: name.to_string(),
            value,
            range,
            choices,
        });
        self.by_name.insert(name.to_string(), handle);
        tracing::debug!(name, ?handle, "parameter registered");
        Ok(handle)
    }

    /// Look up a handle by parameter name.
    pub fn handle(&self, name: &str) -> Option<ParamHandle> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, handle: ParamHandle) -> Result<&str, ParamError> {
        self.param(handle).map(|p| p.name.as_str())
    }

    pub fn get(&self, handle: ParamHandle) -> Result<&ParamValue, ParamError> {
        self.param(handle).map(|p| &p.value)
    }

    pub fn range(&self, handle: ParamHandle) -> Result<Option<NumericRange>, ParamError> {
        self.param(handle).map(|p| p.range)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Controlled write path. Validates the kind, applies numeric
    /// constraints, stores, and returns the value as stored.
    pub fn set_value(
        &mut self,
        handle: ParamHandle,
        value: ParamValue,
    ) -> Result<ParamValue, ParamError> {
        let param = self
            .params
            .get_mut(handle.0 as usize)
            .ok_or(ParamError::UnknownHandle(handle))?;

        if value.kind() != param.value.kind() {
            return Err(ParamError::TypeMismatch {
                name: param.name.clone(),
                expected: param.value.kind(),
                got: value.kind(),
            });
        }

        let stored = match (&value, param.range) {
            (ParamValue::Float(v), Some(range)) => ParamValue::Float(range.apply(*v)),
            (ParamValue::Int(v), Some(range)) => {
                ParamValue::Int(range.apply(*v as f32).round() as i64)
            }
            (ParamValue::Choice(c), _) => {
                let known = param
                    .choices
                    .as_ref()
                    .is_some_and(|choices| choices.iter().any(|known| known == c));
                if !known {
                    return Err(ParamError::UnknownChoice {
                        name: param.name.clone(),
                        value: c.clone(),
                    });
                }
                value
            }
            _ => value,
        };

        tracing::debug!(name = %param.name, value = ?stored, "parameter written");
        param.value = stored.clone();
        Ok(stored)
    }

    fn param(&self, handle: ParamHandle) -> Result<&Param, ParamError> {
        self.params
            .get(handle.0 as usize)
            .ok_or(ParamError::UnknownHandle(handle))
    }
}
