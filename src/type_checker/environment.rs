//! Lexical scopes.
//!
//! Scopes live in an arena owned by a single `type_check` call and are
//! addressed by `ScopeId`. Entering a construct pushes a child record that
//! copies the parent's ambient context (loop, function, class) unless the
//! construct overrides it; leaving the construct truncates the arena back.
//! Entities survive their scope because they are shared with the typed tree.

use std::{collections::HashMap, rc::Rc};

use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Span,
};

use super::{
    entities::Entity,
    types::{built_in_type, built_in_type_names, ClassType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

#[derive(Debug)]
pub struct Environment {
    pub variable_lookup: HashMap<String, Rc<Entity>>,
    pub parent: Option<ScopeId>,
    pub in_loop: bool,
    /// Function, method or constructor whose body encloses this scope.
    pub function: Option<Rc<Entity>>,
    /// Class whose body encloses this scope; this is what `self` refers to.
    pub class: Option<Rc<ClassType>>,
}

impl Environment {
    fn new(parent: Option<ScopeId>) -> Self {
        Environment {
            variable_lookup: HashMap::new(),
            parent,
            in_loop: false,
            function: None,
            class: None,
        }
    }

    pub fn get_variable(&self, name: &str) -> Option<&Rc<Entity>> {
        self.variable_lookup.get(name)
    }
}

/// Ambient context a child scope replaces instead of inheriting.
#[derive(Debug, Default, Clone)]
pub struct ScopeOverrides {
    in_loop: Option<bool>,
    function: Option<Rc<Entity>>,
    class: Option<Rc<ClassType>>,
}

impl ScopeOverrides {
    pub fn in_loop(mut self, in_loop: bool) -> Self {
        self.in_loop = Some(in_loop);
        self
    }

    pub fn function(mut self, function: Rc<Entity>) -> Self {
        self.function = Some(function);
        self
    }

    pub fn class(mut self, class: Rc<ClassType>) -> Self {
        self.class = Some(class);
        self
    }
}

#[derive(Debug)]
pub struct Environments {
    environments: Vec<Environment>,
}

impl Environments {
    /// Creates an arena holding only a root scope with the built-in types.
    pub fn new() -> Self {
        let mut root = Environment::new(None);
        for name in built_in_type_names() {
            if let Some(built_in) = built_in_type(name) {
                root.variable_lookup
                    .insert(name.to_string(), Rc::new(Entity::Type(built_in)));
            }
        }

        Environments {
            environments: vec![root],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn get(&self, scope: ScopeId) -> &Environment {
        &self.environments[scope.0]
    }

    /// Number of live scopes.
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        entity: Rc<Entity>,
        span: &Span,
    ) -> Result<(), Error> {
        let environment = &mut self.environments[scope.0];
        if environment.variable_lookup.contains_key(name) {
            return Err(Error::at(
                ErrorImpl::DuplicateDeclaration {
                    name: name.to_string(),
                },
                span,
            ));
        }

        trace!(identifier = name, scope = scope.0, "declared");
        environment.variable_lookup.insert(name.to_string(), entity);
        Ok(())
    }

    /// Searches `scope` and then its ancestors for `name`.
    pub fn resolve(&self, scope: ScopeId, name: &str, span: &Span) -> Result<Rc<Entity>, Error> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let environment = &self.environments[id.0];
            if let Some(entity) = environment.get_variable(name) {
                trace!(identifier = name, scope = scope.0, found_in = id.0, "resolved");
                return Ok(Rc::clone(entity));
            }
            current = environment.parent;
        }

        Err(Error::at(
            ErrorImpl::UndeclaredIdentifier {
                name: name.to_string(),
            },
            span,
        ))
    }

    pub fn child(&mut self, scope: ScopeId, overrides: ScopeOverrides) -> ScopeId {
        let parent = &self.environments[scope.0];
        let mut environment = Environment::new(Some(scope));

        environment.in_loop = overrides.in_loop.unwrap_or(parent.in_loop);
        environment.function = overrides.function.or_else(|| parent.function.clone());
        environment.class = overrides.class.or_else(|| parent.class.clone());

        self.environments.push(environment);
        let id = ScopeId(self.environments.len() - 1);
        trace!(scope = id.0, parent = scope.0, "entered scope");
        id
    }

    /// Discards `scope` and everything opened after it. The root is kept.
    pub fn leave(&mut self, scope: ScopeId) {
        if scope.0 == 0 {
            return;
        }
        trace!(scope = scope.0, "left scope");
        self.environments.truncate(scope.0);
    }
}

impl Default for Environments {
    fn default() -> Self {
        Self::new()
    }
}
