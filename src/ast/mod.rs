/// AST (Abstract Syntax Tree) module
/// Contains the syntax tree handed over by the parser
///
/// Submodules:
/// - ast: the `Program`, `Stmt` and `Expr` enums plus tree builders
/// - expressions: Definitions for the expression node kinds
/// - statements: Definitions for the statement node kinds
/// - types: Unresolved type annotations
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
