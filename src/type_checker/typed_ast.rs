//! Typed Abstract Syntax Tree definitions.
//!
//! This module contains the typed variants of AST nodes produced by
//! the type checker. Each typed node has been validated and carries its
//! resolved information as plain, non-optional fields:
//!
//! - Every expression carries its `Type`
//! - Every identifier reference carries the `Entity` it resolved to
//! - Every declaration carries the `Entity` it created
//!
//! This typed AST is what the optimizer and code generator consume; they
//! never have to repeat any semantic reasoning.

use std::rc::Rc;

use crate::{
    ast::expressions::{BinaryOperator, LiteralKind, PrefixOperator},
    Span,
};

use super::{
    entities::Entity,
    types::{ClassType, FunctionType, Type},
};

#[derive(Debug, Clone)]
pub struct TypedProgram {
    pub body: Vec<TypedStmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedBlockStmt {
    pub body: Vec<TypedStmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypedStmt {
    VarDecl(TypedVarDeclStmt),
    FnDecl(TypedFnDeclStmt),
    ClassDecl(TypedClassDeclStmt),
    FieldDecl(TypedFieldDeclStmt),
    Assignment(TypedAssignmentStmt),
    Print(TypedPrintStmt),
    Expression(TypedExpressionStmt),
    If(TypedIfStmt),
    While(TypedWhileStmt),
    For(TypedForStmt),
    ForEach(TypedForEachStmt),
    Break(Span),
    Return(TypedReturnStmt),
}

impl TypedStmt {
    pub fn get_span(&self) -> &Span {
        match self {
            TypedStmt::VarDecl(stmt) => &stmt.span,
            TypedStmt::FnDecl(stmt) => &stmt.span,
            TypedStmt::ClassDecl(stmt) => &stmt.span,
            TypedStmt::FieldDecl(stmt) => &stmt.span,
            TypedStmt::Assignment(stmt) => &stmt.span,
            TypedStmt::Print(stmt) => &stmt.span,
            TypedStmt::Expression(stmt) => stmt.expression.get_span(),
            TypedStmt::If(stmt) => &stmt.span,
            TypedStmt::While(stmt) => &stmt.span,
            TypedStmt::For(stmt) => &stmt.span,
            TypedStmt::ForEach(stmt) => &stmt.span,
            TypedStmt::Break(span) => span,
            TypedStmt::Return(stmt) => &stmt.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypedVarDeclStmt {
    pub entity: Rc<Entity>,
    pub var_type: Type,
    pub assigned_value: TypedExpr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedFnDeclStmt {
    pub entity: Rc<Entity>,
    pub parameters: Vec<Rc<Entity>>,
    pub return_type: Type,
    pub body: TypedBlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedConstructor {
    pub entity: Rc<Entity>,
    pub parameters: Vec<Rc<Entity>>,
    pub body: TypedBlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedClassDeclStmt {
    pub entity: Rc<Entity>,
    pub class_type: Rc<ClassType>,
    pub constructor: TypedConstructor,
    pub methods: Vec<TypedFnDeclStmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedFieldDeclStmt {
    pub entity: Rc<Entity>,
    pub field_type: Type,
    pub initializer: TypedExpr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedAssignmentStmt {
    pub target: TypedExpr,
    pub value: TypedExpr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedPrintStmt {
    pub argument: TypedExpr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedExpressionStmt {
    pub expression: TypedExpr,
}

#[derive(Debug, Clone)]
pub struct TypedConditionalBranch {
    pub condition: TypedExpr,
    pub body: TypedBlockStmt,
}

#[derive(Debug, Clone)]
pub struct TypedIfStmt {
    pub branches: Vec<TypedConditionalBranch>,
    pub alternate: Option<TypedBlockStmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedWhileStmt {
    pub condition: TypedExpr,
    pub body: TypedBlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedForStmt {
    pub variable: Rc<Entity>,
    pub start: TypedExpr,
    pub end: TypedExpr,
    pub body: TypedBlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedForEachStmt {
    pub variable: Rc<Entity>,
    pub iterable: TypedExpr,
    pub body: TypedBlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedReturnStmt {
    pub value: Option<TypedExpr>,
    pub span: Span,
}

// Expressions

#[derive(Debug, Clone)]
pub enum TypedExpr {
    Literal(TypedLiteralExpr),
    Symbol(TypedSymbolExpr),
    SelfRef(TypedSelfExpr),
    Binary(TypedBinaryExpr),
    Prefix(TypedPrefixExpr),
    Conditional(TypedConditionalExpr),
    Call(TypedCallExpr),
    Subscript(TypedSubscriptExpr),
    Array(TypedArrayExpr),
    Map(TypedMapExpr),
    Member(TypedMemberExpr),
    MemberCall(TypedMemberCallExpr),
    New(TypedNewExpr),
}

impl TypedExpr {
    pub fn get_type(&self) -> &Type {
        match self {
            TypedExpr::Literal(expr) => &expr.expr_type,
            TypedExpr::Symbol(expr) => &expr.expr_type,
            TypedExpr::SelfRef(expr) => &expr.expr_type,
            TypedExpr::Binary(expr) => &expr.expr_type,
            TypedExpr::Prefix(expr) => &expr.expr_type,
            TypedExpr::Conditional(expr) => &expr.expr_type,
            TypedExpr::Call(expr) => &expr.expr_type,
            TypedExpr::Subscript(expr) => &expr.expr_type,
            TypedExpr::Array(expr) => &expr.expr_type,
            TypedExpr::Map(expr) => &expr.expr_type,
            TypedExpr::Member(expr) => &expr.expr_type,
            TypedExpr::MemberCall(expr) => &expr.expr_type,
            TypedExpr::New(expr) => &expr.expr_type,
        }
    }

    pub fn get_span(&self) -> &Span {
        match self {
            TypedExpr::Literal(expr) => &expr.span,
            TypedExpr::Symbol(expr) => &expr.span,
            TypedExpr::SelfRef(expr) => &expr.span,
            TypedExpr::Binary(expr) => &expr.span,
            TypedExpr::Prefix(expr) => &expr.span,
            TypedExpr::Conditional(expr) => &expr.span,
            TypedExpr::Call(expr) => &expr.span,
            TypedExpr::Subscript(expr) => &expr.span,
            TypedExpr::Array(expr) => &expr.span,
            TypedExpr::Map(expr) => &expr.span,
            TypedExpr::Member(expr) => &expr.span,
            TypedExpr::MemberCall(expr) => &expr.span,
            TypedExpr::New(expr) => &expr.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypedLiteralExpr {
    pub value: LiteralKind,
    pub expr_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedSymbolExpr {
    pub value: String,
    pub entity: Rc<Entity>,
    pub expr_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedSelfExpr {
    pub class_type: Rc<ClassType>,
    pub expr_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedBinaryExpr {
    pub left: Box<TypedExpr>,
    pub operator: BinaryOperator,
    pub right: Box<TypedExpr>,
    pub expr_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedPrefixExpr {
    pub operator: PrefixOperator,
    pub right_expr: Box<TypedExpr>,
    pub expr_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedConditionalExpr {
    pub test: Box<TypedExpr>,
    pub consequent: Box<TypedExpr>,
    pub alternate: Box<TypedExpr>,
    pub expr_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedCallExpr {
    pub callee: Box<TypedExpr>,
    pub signature: FunctionType,
    pub arguments: Vec<TypedExpr>,
    pub expr_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedSubscriptExpr {
    pub array: Box<TypedExpr>,
    pub index: Box<TypedExpr>,
    pub expr_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedArrayExpr {
    pub elements: Vec<TypedExpr>,
    pub expr_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedMapEntry {
    pub key: TypedExpr,
    pub value: TypedExpr,
}

#[derive(Debug, Clone)]
pub struct TypedMapExpr {
    pub entries: Vec<TypedMapEntry>,
    pub expr_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedMemberExpr {
    pub object: Box<TypedExpr>,
    pub member: String,
    pub expr_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedMemberCallExpr {
    pub object: Box<TypedExpr>,
    pub method: String,
    pub signature: FunctionType,
    pub arguments: Vec<TypedExpr>,
    pub expr_type: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedNewExpr {
    pub class_type: Rc<ClassType>,
    pub arguments: Vec<TypedExpr>,
    pub expr_type: Type,
    pub span: Span,
}
