use std::slice::Iter;

use crate::Span;

use super::{ast::Expr, ast::Stmt, types::TypeAnnotation};

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl BlockStmt {
    pub fn new(body: Vec<Stmt>) -> Self {
        BlockStmt {
            body,
            span: Span::null(),
        }
    }

    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
}

/// A variable declaration. Without `explicit_type` the type is inferred from
/// the initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub identifier: String,
    pub explicit_type: Option<TypeAnnotation>,
    pub assigned_value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub param_type: TypeAnnotation,
    pub span: Span,
}

impl Parameter {
    pub fn new(name: &str, param_type: TypeAnnotation) -> Self {
        Parameter {
            name: name.to_string(),
            param_type,
            span: Span::null(),
        }
    }
}

/// Free functions and class methods share this node.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt {
    pub identifier: String,
    pub parameters: Vec<Parameter>,
    /// `None` means the function returns nothing.
    pub return_type: Option<TypeAnnotation>,
    pub body: BlockStmt,
    pub span: Span,
}

impl FnDeclStmt {
    pub fn new(
        identifier: &str,
        parameters: Vec<Parameter>,
        return_type: Option<TypeAnnotation>,
        body: Vec<Stmt>,
    ) -> Self {
        FnDeclStmt {
            identifier: identifier.to_string(),
            parameters,
            return_type,
            body: BlockStmt::new(body),
            span: Span::null(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    pub parameters: Vec<Parameter>,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclStmt {
    pub name: String,
    pub constructor: ConstructorDecl,
    pub methods: Vec<FnDeclStmt>,
    pub span: Span,
}

/// `<type> self.<field> = <initializer>`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclStmt {
    pub field_type: TypeAnnotation,
    pub field: String,
    pub initializer: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStmt {
    pub target: Expr,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub argument: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBranch {
    pub condition: Expr,
    pub body: BlockStmt,
}

/// `if` / `else if`* / `else`?
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub branches: Vec<ConditionalBranch>,
    pub alternate: Option<BlockStmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

/// Counted loop over `start until end`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub variable: String,
    pub start: Expr,
    pub end: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForEachStmt {
    pub variable: String,
    pub explicit_type: Option<TypeAnnotation>,
    pub iterable: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}
