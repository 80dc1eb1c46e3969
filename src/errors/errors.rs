use std::fmt::Display;

use thiserror::Error;

use crate::{Position, Span};

#[derive(Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Option<Position>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Option<Position>) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Error located at the start of `span`.
    pub fn at(error_impl: ErrorImpl, span: &Span) -> Self {
        Error::new(error_impl, Some(span.start.clone()))
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            ErrorImpl::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::NotABoolean { .. } => "NotABoolean",
            ErrorImpl::NotANumber { .. } => "NotANumber",
            ErrorImpl::NotAnInteger { .. } => "NotAnInteger",
            ErrorImpl::NotIterable { .. } => "NotIterable",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::NotAClass { .. } => "NotAClass",
            ErrorImpl::NotAType { .. } => "NotAType",
            ErrorImpl::NotAValue { .. } => "NotAValue",
            ErrorImpl::BreakOutsideLoop => "BreakOutsideLoop",
            ErrorImpl::SelfOutsideClass => "SelfOutsideClass",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::ReturnArityMismatch { .. } => "ReturnArityMismatch",
            ErrorImpl::ArgumentMismatch(_) => "ArgumentMismatch",
            ErrorImpl::UnknownMember { .. } => "UnknownMember",
            ErrorImpl::AmbiguousEmptyLiteral { .. } => "AmbiguousEmptyLiteral",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::DuplicateDeclaration { name } => ErrorTip::Suggestion(format!(
                "Identifier `{}` is already declared in this scope",
                name
            )),
            ErrorImpl::UndeclaredIdentifier { name } => ErrorTip::Suggestion(format!(
                "Identifier `{}` must be declared before it is used",
                name
            )),
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Cannot assign a {} to a {}",
                received, expected
            )),
            ErrorImpl::NotABoolean { found } => {
                ErrorTip::Suggestion(format!("Expected a boolean, found `{}`", found))
            }
            ErrorImpl::NotANumber { found } => {
                ErrorTip::Suggestion(format!("Expected a number, found `{}`", found))
            }
            ErrorImpl::NotAnInteger { found } => {
                ErrorTip::Suggestion(format!("Expected an integer, found `{}`", found))
            }
            ErrorImpl::NotIterable { found } => {
                ErrorTip::Suggestion(format!("Expected an array or map, found `{}`", found))
            }
            ErrorImpl::NotCallable { found } => {
                ErrorTip::Suggestion(format!("Call of non-function type `{}`", found))
            }
            ErrorImpl::NotAClass { found } => {
                ErrorTip::Suggestion(format!("Expected a class, found `{}`", found))
            }
            ErrorImpl::NotAType { name } => {
                ErrorTip::Suggestion(format!("`{}` is not a type", name))
            }
            ErrorImpl::NotAValue { name } => {
                ErrorTip::Suggestion(format!("`{}` is a type, not a value", name))
            }
            ErrorImpl::BreakOutsideLoop => {
                ErrorTip::Suggestion(String::from("Break can only appear in a loop"))
            }
            ErrorImpl::SelfOutsideClass => ErrorTip::Suggestion(String::from(
                "`self` can only be used inside a class",
            )),
            ErrorImpl::ReturnOutsideFunction => ErrorTip::Suggestion(String::from(
                "Return can only appear in a function",
            )),
            ErrorImpl::ReturnArityMismatch {
                function,
                expects_value: true,
            } => ErrorTip::Suggestion(format!("Function `{}` must return a value", function)),
            ErrorImpl::ReturnArityMismatch {
                function,
                expects_value: false,
            } => ErrorTip::Suggestion(format!(
                "Function `{}` is declared to return nothing",
                function
            )),
            ErrorImpl::ArgumentMismatch(mismatch) => ErrorTip::Suggestion(mismatch.to_string()),
            ErrorImpl::UnknownMember { class, member } => ErrorTip::Suggestion(format!(
                "Class `{}` has no member `{}`",
                class, member
            )),
            ErrorImpl::AmbiguousEmptyLiteral { literal } => ErrorTip::Suggestion(format!(
                "Cannot infer a type from an empty {} literal, declare the type explicitly",
                literal
            )),
            ErrorImpl::NestingTooDeep { .. } => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("identifier {name:?} already declared")]
    DuplicateDeclaration { name: String },
    #[error("identifier {name:?} not declared")]
    UndeclaredIdentifier { name: String },
    #[error("types do not match: cannot assign a {received} to a {expected}")]
    TypeMismatch { expected: String, received: String },
    #[error("expected a boolean, found {found}")]
    NotABoolean { found: String },
    #[error("expected a number, found {found}")]
    NotANumber { found: String },
    #[error("expected an integer, found {found}")]
    NotAnInteger { found: String },
    #[error("expected an array or map, found {found}")]
    NotIterable { found: String },
    #[error("call of non-function type {found}")]
    NotCallable { found: String },
    #[error("expected a class, found {found}")]
    NotAClass { found: String },
    #[error("{name:?} is not a type")]
    NotAType { name: String },
    #[error("{name:?} is a type, not a value")]
    NotAValue { name: String },
    #[error("break can only appear in a loop")]
    BreakOutsideLoop,
    #[error("self can only appear in a class")]
    SelfOutsideClass,
    #[error("return can only appear in a function")]
    ReturnOutsideFunction,
    #[error("return in function {function:?} does not match its return type (expects value: {expects_value})")]
    ReturnArityMismatch {
        function: String,
        expects_value: bool,
    },
    #[error("{0}")]
    ArgumentMismatch(ArgumentMismatch),
    #[error("class {class:?} has no member {member:?}")]
    UnknownMember { class: String, member: String },
    #[error("cannot infer the type of an empty {literal} literal")]
    AmbiguousEmptyLiteral { literal: String },
    #[error("nesting exceeds the limit of {limit}")]
    NestingTooDeep { limit: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgumentMismatch {
    #[error("{required} argument(s) required but {passed} passed")]
    Count { required: usize, passed: usize },
    #[error("argument {index}: cannot assign a {received} to a {expected}")]
    Type {
        index: usize,
        expected: String,
        received: String,
    },
}
