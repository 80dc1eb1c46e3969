//! Type annotations as written in the source program.
//!
//! Annotations are unresolved: a named annotation is just a symbol until the
//! type checker looks it up in the current scope and turns it into a
//! `type_checker::types::Type`.

use std::fmt::Display;

use crate::Span;

/// Represents a symbolic type reference that needs resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolType {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotation {
    /// `int`, `booty`, a class name, ...
    Symbol(SymbolType),
    /// `[T]`
    Array { element: Box<TypeAnnotation> },
    /// `{K, V}`
    Map {
        key: Box<TypeAnnotation>,
        value: Box<TypeAnnotation>,
    },
    /// `(A, B) -> R`
    Function {
        parameters: Vec<TypeAnnotation>,
        return_type: Box<TypeAnnotation>,
    },
}

impl TypeAnnotation {
    pub fn named(name: &str) -> Self {
        TypeAnnotation::Symbol(SymbolType {
            name: name.to_string(),
            span: Span::null(),
        })
    }

    pub fn array(element: TypeAnnotation) -> Self {
        TypeAnnotation::Array {
            element: Box::new(element),
        }
    }

    pub fn map(key: TypeAnnotation, value: TypeAnnotation) -> Self {
        TypeAnnotation::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn function(parameters: Vec<TypeAnnotation>, return_type: TypeAnnotation) -> Self {
        TypeAnnotation::Function {
            parameters,
            return_type: Box::new(return_type),
        }
    }
}

impl Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeAnnotation::Symbol(symbol) => write!(f, "{}", symbol.name),
            TypeAnnotation::Array { element } => write!(f, "[{}]", element),
            TypeAnnotation::Map { key, value } => write!(f, "{{{}, {}}}", key, value),
            TypeAnnotation::Function {
                parameters,
                return_type,
            } => {
                let parameters = parameters
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<String>>()
                    .join(",");
                write!(f, "({})->{}", parameters, return_type)
            }
        }
    }
}
