//! Key/value parameter protocol shared by all distance measures.
//!
//! Each measure exposes its tunables under short, stable keys so that a
//! generic configuration layer (a JSON file, a grid search) can get and set
//! them without knowing which measure it is talking to.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::LcssError;

/// A single parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integer value, e.g. a window width.
    Int(i64),
    /// Real value, e.g. a tolerance.
    Float(f64),
}

impl ParamValue {
    /// Numeric value as `f64`. Integers widen losslessly for the ranges used here.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Integer value, or `None` for a real.
    #[must_use]
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(v),
            Self::Float(_) => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

/// Ordered set of named parameter values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet(BTreeMap<String, ParamValue>);

impl ParamSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ParamSet::insert`].
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, replacing any previous value.
    pub fn insert(&mut self, key: &str, value: impl Into<ParamValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Look up `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ParamValue> {
        self.0.get(key).copied()
    }

    /// Merge `other` into this set; keys in `other` win.
    pub fn extend(&mut self, other: &ParamSet) {
        self.0.extend(other.0.iter().map(|(k, v)| (k.clone(), *v)));
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ParamValue)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A component whose configuration can be read and written by key.
pub trait Parameterized {
    /// Current values of every parameter this component exposes.
    fn params(&self) -> ParamSet;

    /// Apply the parameters present in `params`, leaving the rest unchanged.
    ///
    /// Implementations validate the whole set before mutating anything, so a
    /// failed call leaves the component as it was.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LcssError::UnknownParameter`] | A key is not exposed by this component |
    /// | [`LcssError::ParameterType`] | A value has the wrong type for its key |
    /// | other | Component-specific validation failure |
    fn set_params(&mut self, params: &ParamSet) -> Result<(), LcssError>;
}
