//! Runtime objects: closures, classes, and instances.

use std::rc::Rc;

use ember_par::ast::{ClassDecl, FunctionDecl};
use indexmap::IndexMap;

use crate::env::EnvId;
use crate::value::Value;

/// A user function: a declaration plus the environment that was current
/// when the declaration executed. Two functions produced from the same
/// declaration but different captured environments are distinct closures.
#[derive(Debug)]
pub struct Function {
    pub decl: Rc<FunctionDecl>,

    /// The captured environment. For methods this is the class-body
    /// environment; for bound methods it is a child of that environment
    /// with `self` defined.
    pub env: EnvId,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }

    pub fn name(&self) -> &str {
        &self.decl.name.lexeme
    }
}

/// A class object.
#[derive(Debug)]
pub struct ClassInfo {
    pub decl: Rc<ClassDecl>,
    pub superclass: Option<Rc<ClassInfo>>,

    /// Methods declared directly on this class, with the class-body
    /// environment captured.
    pub methods: IndexMap<String, Rc<Function>>,

    /// The class-body environment; contains `super` when a superclass
    /// exists. Field initializers evaluate in it at instantiation time.
    pub env: EnvId,

    /// Ancestors, nearest first, precomputed at class-creation time.
    /// Resolution order is the class itself followed by this list.
    pub ancestors: Vec<Rc<ClassInfo>>,
}

impl ClassInfo {
    pub fn name(&self) -> &str {
        &self.decl.name.lexeme
    }

    /// Looks up a method through the class chain (this class first, then
    /// ancestors). The result is unbound.
    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }
        for ancestor in &self.ancestors {
            if let Some(method) = ancestor.methods.get(name) {
                return Some(method.clone());
            }
        }
        None
    }

    /// A class's apparent arity is its chain-resolved `$init` arity, or 0
    /// when no constructor exists.
    pub fn arity(&self) -> usize {
        self.find_method("$init").map_or(0, |init| init.arity())
    }
}

/// An instance: a class reference plus a fields map. Each instantiation
/// produces a fresh map. Field names are exactly those declared via `var`
/// at class scope, transitively through the superclass chain; setting
/// never creates a new field.
#[derive(Debug)]
pub struct Instance {
    pub class: Rc<ClassInfo>,
    pub fields: IndexMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_lex::Lexer;
    use ember_par::{Parser, Stmt};

    fn parse_class(source: &str) -> Rc<ClassDecl> {
        let tokens = Lexer::new(source).tokenize().unwrap();
        let mut program = Parser::new(tokens).parse().unwrap();
        match program.pop().unwrap() {
            Stmt::Class(decl) => decl,
            other => panic!("Expected class declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_find_method_prefers_own_over_ancestor() {
        let base_decl = parse_class("class A { def get() { return 1; } }");
        let derived_decl = parse_class("class B < A { def get() { return 2; } }");

        let mut base_methods = IndexMap::new();
        base_methods.insert(
            "get".to_string(),
            Rc::new(Function {
                decl: base_decl.methods[0].clone(),
                env: crate::env::EnvId(0),
            }),
        );
        let base = Rc::new(ClassInfo {
            decl: base_decl,
            superclass: None,
            methods: base_methods,
            env: crate::env::EnvId(0),
            ancestors: Vec::new(),
        });

        let mut derived_methods = IndexMap::new();
        derived_methods.insert(
            "get".to_string(),
            Rc::new(Function {
                decl: derived_decl.methods[0].clone(),
                env: crate::env::EnvId(1),
            }),
        );
        let derived = Rc::new(ClassInfo {
            decl: derived_decl,
            superclass: Some(base.clone()),
            methods: derived_methods,
            env: crate::env::EnvId(1),
            ancestors: vec![base.clone()],
        });

        let found = derived.find_method("get").unwrap();
        assert!(Rc::ptr_eq(&found, &derived.methods["get"]));

        // Absent on the derived class, resolution falls back to the base.
        assert!(derived.find_method("missing").is_none());
        assert!(base.find_method("get").is_some());
    }

    #[test]
    fn test_class_arity_without_init_is_zero() {
        let decl = parse_class("class A {}");
        let class = ClassInfo {
            decl,
            superclass: None,
            methods: IndexMap::new(),
            env: crate::env::EnvId(0),
            ancestors: Vec::new(),
        };
        assert_eq!(class.arity(), 0);
    }
}
