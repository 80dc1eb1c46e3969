//! Type checking and semantic analysis module.
//!
//! This module performs type checking and semantic analysis on the AST.
//! It transforms the untyped AST into a typed AST while:
//!
//! - Resolving every identifier to the entity that declared it
//! - Inferring and verifying the type of every expression
//! - Checking call arguments against function and constructor signatures
//! - Enforcing loop, function and class context for `break`, `return` and `self`
//! - Building class types from constructors, fields and methods
//!
//! Scopes live in an arena (`environment`) that the checker threads through
//! the walk explicitly.

pub mod entities;
pub mod environment;
pub mod type_checker;
pub mod typed_ast;
pub mod types;
