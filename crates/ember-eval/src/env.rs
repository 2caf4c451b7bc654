//! Lexical environments.
//!
//! A scope maps names to values and optionally links to an enclosing
//! scope; lookup walks outward until found or exhausted.
//!
//! All scopes live in a single arena owned by the interpreter and
//! reference each other by [`EnvId`] index. Closures, class-body
//! environments, and bound methods hold `EnvId`s rather than owning
//! pointers, so the mutual references between classes, methods, and
//! scopes never form reference-counting cycles; the whole arena is
//! released when the interpreter is dropped.

use ember_util::{define_idx, FxHashMap, IndexVec};

use crate::value::Value;

define_idx!(
    /// Index of a scope in the interpreter's environment arena.
    EnvId
);

/// One lexical scope: a name→value map plus the enclosing scope link.
#[derive(Debug, Default)]
pub struct Scope {
    values: FxHashMap<String, Value>,
    enclosing: Option<EnvId>,
}

/// Arena of all scopes created during a run.
#[derive(Debug, Default)]
pub struct EnvArena {
    scopes: IndexVec<EnvId, Scope>,
}

impl EnvArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh scope with the given enclosing scope.
    pub fn alloc(&mut self, enclosing: Option<EnvId>) -> EnvId {
        self.scopes.push(Scope {
            values: FxHashMap::default(),
            enclosing,
        })
    }

    /// Defines `name` in `env` itself, shadowing any outer binding.
    pub fn define(&mut self, env: EnvId, name: impl Into<String>, value: Value) {
        self.scopes[env].values.insert(name.into(), value);
    }

    /// Reads `name`, walking outward through enclosing scopes.
    pub fn get(&self, env: EnvId, name: &str) -> Option<Value> {
        let mut current = Some(env);
        while let Some(id) = current {
            let scope = &self.scopes[id];
            if let Some(value) = scope.values.get(name) {
                return Some(value.clone());
            }
            current = scope.enclosing;
        }
        None
    }

    /// Reads `name` in `env` itself, without walking outward.
    pub fn get_local(&self, env: EnvId, name: &str) -> Option<Value> {
        self.scopes[env].values.get(name).cloned()
    }

    /// Updates an existing binding of `name`, walking outward. Returns
    /// false when no scope in the chain defines it; assignment never
    /// creates a binding.
    pub fn assign(&mut self, env: EnvId, name: &str, value: Value) -> bool {
        let mut current = Some(env);
        while let Some(id) = current {
            let scope = &mut self.scopes[id];
            if let Some(slot) = scope.values.get_mut(name) {
                *slot = value;
                return true;
            }
            current = scope.enclosing;
        }
        false
    }
}
