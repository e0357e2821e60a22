//! Variable bindings used during numeric evaluation.

use std::collections::HashMap;
use std::f64::consts::{E, PI, TAU};

/// A set of variable bindings.
///
/// Evaluation looks up every symbol it encounters here; unbound symbols are reported as typed
/// errors rather than evaluating to anything. The mathematical constants `pi`, `e`, and `tau`
/// are preloaded.
#[derive(Clone, Debug)]
pub struct Bindings {
    vars: HashMap<String, f64>,
}

impl Bindings {
    /// Creates a new set of bindings containing the default constants.
    pub fn new() -> Self {
        let mut vars = HashMap::new();
        vars.insert(String::from("pi"), PI);
        vars.insert(String::from("e"), E);
        vars.insert(String::from("tau"), TAU);
        Self { vars }
    }

    /// Binds a variable to a value, replacing any existing binding with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.vars.insert(name.into(), value);
    }

    /// The value bound to the given name, if any.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    /// Returns true if the given name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// An iterator over the bound names, used to suggest corrections for typos.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::new()
    }
}
