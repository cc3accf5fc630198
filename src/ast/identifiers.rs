use crate::error::FunctionError;
use crate::functions::register_functions;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type Function = Arc<dyn Fn(&[f64]) -> Result<f64, FunctionError> + Send + Sync>;

/// What a name is bound to: a plain value or a callable.
#[derive(Clone)]
pub enum Identifier {
    Value(f64),
    Function(Function),
}

impl Identifier {
    /// Helper to get the value, if this is not a function
    pub fn as_value(&self) -> Option<f64> {
        if let Identifier::Value(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        if let Identifier::Function(function) = self {
            Some(function)
        } else {
            None
        }
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Identifier::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<f64> for Identifier {
    fn from(value: f64) -> Self {
        Identifier::Value(value)
    }
}

/// Names visible to one evaluation. Borrowed read-only by the evaluator.
#[derive(Debug, Clone, Default)]
pub struct Identifiers {
    entries: HashMap<String, Identifier>,
}

impl Identifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifiers pre-populated with the default math functions.
    pub fn with_defaults() -> Self {
        let mut identifiers = Self::new();
        register_functions(&mut identifiers);
        identifiers
    }

    /// Binds `name` to a value, replacing any previous binding.
    pub fn insert_value(&mut self, name: &str, value: f64) {
        self.entries
            .insert(name.to_string(), Identifier::Value(value));
    }

    /// Registers a function under `name`, replacing any previous binding.
    pub fn register_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[f64]) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.entries
            .insert(name.to_string(), Identifier::Function(Arc::new(function)));
    }

    pub fn with_value(mut self, name: &str, value: f64) -> Self {
        self.insert_value(name, value);
        self
    }

    pub fn with_function<F>(mut self, name: &str, function: F) -> Self
    where
        F: Fn(&[f64]) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.register_function(name, function);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Identifier> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> Extend<(K, f64)> for Identifiers {
    fn extend<I: IntoIterator<Item = (K, f64)>>(&mut self, iter: I) {
        self.entries.extend(
            iter.into_iter()
                .map(|(name, value)| (name.into(), Identifier::Value(value))),
        );
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Identifiers {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut identifiers = Self::new();
        identifiers.extend(iter);
        identifiers
    }
}

impl From<HashMap<String, f64>> for Identifiers {
    fn from(values: HashMap<String, f64>) -> Self {
        values.into_iter().collect()
    }
}
