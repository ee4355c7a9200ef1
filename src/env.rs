// ABOUTME: Lexical scope chains: a binding table plus an optional outer scope.
//! Lexical scope chains: a binding table plus an optional outer scope.

use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Object>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new top-level environment with no outer scope.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// Creates a child environment whose lookups fall through to `outer`.
    pub fn with_outer(outer: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Binds `name` to `value` in this scope. Monkey has no distinct
    /// "mutate an existing binding" operation — every `let` binds fresh
    /// in the current scope, shadowing any outer binding of the same name.
    pub fn set(&self, name: &str, value: Object) {
        self.bindings
            .borrow_mut()
            .insert(name.to_string(), value);
    }

    /// Looks up `name` in this scope, then walks outward through enclosing
    /// scopes until found.
    pub fn get(&self, name: &str) -> Option<Object> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.get(name))
    }
}
