use crate::Span;

use super::{
    expressions::{
        ArrayExpr, BinaryExpr, BinaryOperator, CallExpr, ConditionalExpr, LiteralExpr,
        LiteralKind, MapEntry, MapExpr, MemberCallExpr, MemberExpr, NewExpr, PrefixExpr,
        PrefixOperator, SelfExpr, SubscriptExpr, SymbolExpr,
    },
    statements::{
        AssignmentStmt, BlockStmt, BreakStmt, ClassDeclStmt, ConditionalBranch,
        ConstructorDecl, ExpressionStmt, FieldDeclStmt, FnDeclStmt, ForEachStmt, ForStmt,
        IfStmt, Parameter, PrintStmt, ReturnStmt, VarDeclStmt, WhileStmt,
    },
    types::TypeAnnotation,
};

/// Root of a parsed program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program {
            body,
            span: Span::null(),
        }
    }
}

/// Statement
///
/// Every statement kind the parser can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    FnDecl(FnDeclStmt),
    ClassDecl(ClassDeclStmt),
    FieldDecl(FieldDeclStmt),
    Assignment(AssignmentStmt),
    Print(PrintStmt),
    Expression(ExpressionStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
    Break(BreakStmt),
    Return(ReturnStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::FnDecl(stmt) => &stmt.span,
            Stmt::ClassDecl(stmt) => &stmt.span,
            Stmt::FieldDecl(stmt) => &stmt.span,
            Stmt::Assignment(stmt) => &stmt.span,
            Stmt::Print(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::ForEach(stmt) => &stmt.span,
            Stmt::Break(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
        }
    }

    // Builders for trees that don't come from source text.

    pub fn var(identifier: &str, explicit_type: Option<TypeAnnotation>, value: Expr) -> Self {
        Stmt::VarDecl(VarDeclStmt {
            identifier: identifier.to_string(),
            explicit_type,
            assigned_value: value,
            span: Span::null(),
        })
    }

    pub fn function(
        identifier: &str,
        parameters: Vec<Parameter>,
        return_type: Option<TypeAnnotation>,
        body: Vec<Stmt>,
    ) -> Self {
        Stmt::FnDecl(FnDeclStmt::new(identifier, parameters, return_type, body))
    }

    pub fn class(
        name: &str,
        constructor_parameters: Vec<Parameter>,
        constructor_body: Vec<Stmt>,
        methods: Vec<FnDeclStmt>,
    ) -> Self {
        Stmt::ClassDecl(ClassDeclStmt {
            name: name.to_string(),
            constructor: ConstructorDecl {
                parameters: constructor_parameters,
                body: BlockStmt::new(constructor_body),
                span: Span::null(),
            },
            methods,
            span: Span::null(),
        })
    }

    pub fn field(field_type: TypeAnnotation, field: &str, initializer: Expr) -> Self {
        Stmt::FieldDecl(FieldDeclStmt {
            field_type,
            field: field.to_string(),
            initializer,
            span: Span::null(),
        })
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assignment(AssignmentStmt {
            target,
            value,
            span: Span::null(),
        })
    }

    pub fn print(argument: Expr) -> Self {
        Stmt::Print(PrintStmt {
            argument,
            span: Span::null(),
        })
    }

    pub fn expression(expression: Expr) -> Self {
        Stmt::Expression(ExpressionStmt {
            expression,
            span: Span::null(),
        })
    }

    pub fn if_else(branches: Vec<(Expr, Vec<Stmt>)>, alternate: Option<Vec<Stmt>>) -> Self {
        Stmt::If(IfStmt {
            branches: branches
                .into_iter()
                .map(|(condition, body)| ConditionalBranch {
                    condition,
                    body: BlockStmt::new(body),
                })
                .collect(),
            alternate: alternate.map(BlockStmt::new),
            span: Span::null(),
        })
    }

    pub fn while_loop(condition: Expr, body: Vec<Stmt>) -> Self {
        Stmt::While(WhileStmt {
            condition,
            body: BlockStmt::new(body),
            span: Span::null(),
        })
    }

    pub fn for_range(variable: &str, start: Expr, end: Expr, body: Vec<Stmt>) -> Self {
        Stmt::For(ForStmt {
            variable: variable.to_string(),
            start,
            end,
            body: BlockStmt::new(body),
            span: Span::null(),
        })
    }

    pub fn for_each(
        variable: &str,
        explicit_type: Option<TypeAnnotation>,
        iterable: Expr,
        body: Vec<Stmt>,
    ) -> Self {
        Stmt::ForEach(ForEachStmt {
            variable: variable.to_string(),
            explicit_type,
            iterable,
            body: BlockStmt::new(body),
            span: Span::null(),
        })
    }

    pub fn break_stmt() -> Self {
        Stmt::Break(BreakStmt { span: Span::null() })
    }

    pub fn return_stmt(value: Option<Expr>) -> Self {
        Stmt::Return(ReturnStmt {
            value,
            span: Span::null(),
        })
    }
}

/// Expression
///
/// Every expression kind the parser can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    Symbol(SymbolExpr),
    SelfRef(SelfExpr),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Conditional(ConditionalExpr),
    Call(CallExpr),
    Subscript(SubscriptExpr),
    Array(ArrayExpr),
    Map(MapExpr),
    Member(MemberExpr),
    MemberCall(MemberCallExpr),
    New(NewExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Literal(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::SelfRef(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Conditional(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::Subscript(expr) => &expr.span,
            Expr::Array(expr) => &expr.span,
            Expr::Map(expr) => &expr.span,
            Expr::Member(expr) => &expr.span,
            Expr::MemberCall(expr) => &expr.span,
            Expr::New(expr) => &expr.span,
        }
    }

    fn literal(value: LiteralKind) -> Self {
        Expr::Literal(LiteralExpr {
            value,
            span: Span::null(),
        })
    }

    pub fn int(value: i64) -> Self {
        Expr::literal(LiteralKind::Int(value))
    }

    pub fn double(value: f64) -> Self {
        Expr::literal(LiteralKind::Double(value))
    }

    pub fn string(value: &str) -> Self {
        Expr::literal(LiteralKind::String(value.to_string()))
    }

    pub fn boolean(value: bool) -> Self {
        Expr::literal(LiteralKind::Boolean(value))
    }

    pub fn symbol(name: &str) -> Self {
        Expr::Symbol(SymbolExpr {
            value: name.to_string(),
            span: Span::null(),
        })
    }

    pub fn self_ref() -> Self {
        Expr::SelfRef(SelfExpr { span: Span::null() })
    }

    pub fn binary(left: Expr, operator: BinaryOperator, right: Expr) -> Self {
        Expr::Binary(BinaryExpr {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            span: Span::null(),
        })
    }

    pub fn prefix(operator: PrefixOperator, right_expr: Expr) -> Self {
        Expr::Prefix(PrefixExpr {
            operator,
            right_expr: Box::new(right_expr),
            span: Span::null(),
        })
    }

    pub fn conditional(test: Expr, consequent: Expr, alternate: Expr) -> Self {
        Expr::Conditional(ConditionalExpr {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span: Span::null(),
        })
    }

    pub fn call(callee: Expr, arguments: Vec<Expr>) -> Self {
        Expr::Call(CallExpr {
            callee: Box::new(callee),
            arguments,
            span: Span::null(),
        })
    }

    pub fn subscript(array: Expr, index: Expr) -> Self {
        Expr::Subscript(SubscriptExpr {
            array: Box::new(array),
            index: Box::new(index),
            span: Span::null(),
        })
    }

    pub fn array(elements: Vec<Expr>) -> Self {
        Expr::Array(ArrayExpr {
            elements,
            span: Span::null(),
        })
    }

    pub fn map(entries: Vec<(Expr, Expr)>) -> Self {
        Expr::Map(MapExpr {
            entries: entries
                .into_iter()
                .map(|(key, value)| MapEntry { key, value })
                .collect(),
            span: Span::null(),
        })
    }

    pub fn member(object: Expr, member: &str) -> Self {
        Expr::Member(MemberExpr {
            object: Box::new(object),
            member: member.to_string(),
            span: Span::null(),
        })
    }

    pub fn member_call(object: Expr, method: &str, arguments: Vec<Expr>) -> Self {
        Expr::MemberCall(MemberCallExpr {
            object: Box::new(object),
            method: method.to_string(),
            arguments,
            span: Span::null(),
        })
    }

    pub fn new_object(class_name: &str, arguments: Vec<Expr>) -> Self {
        Expr::New(NewExpr {
            class_name: class_name.to_string(),
            arguments,
            span: Span::null(),
        })
    }
}
