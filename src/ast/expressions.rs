use std::fmt::Display;

use crate::Span;

use super::ast::Expr;

// LITERALS

/// Lexical category of a literal leaf, with its parsed value.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Int(i64),
    Double(f64),
    String(String),
    Boolean(bool),
}

/// Literal Expression
/// Represents a number, string or boolean literal in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: LiteralKind,
    pub span: Span,
}

/// Symbol Expression
/// An identifier reference, resolved through the scope chain.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

/// `self`
#[derive(Debug, Clone, PartialEq)]
pub struct SelfExpr {
    pub span: Span,
}

// OPERATORS

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    Percent,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Equals,
    NotEquals,
    And,
    Or,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Star => "*",
            BinaryOperator::Slash => "/",
            BinaryOperator::Power => "**",
            BinaryOperator::Percent => "%",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Negate,
    Not,
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefixOperator::Negate => write!(f, "-"),
            PrefixOperator::Not => write!(f, "not"),
        }
    }
}

// COMPOUND EXPRESSIONS

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOperator,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub operator: PrefixOperator,
    pub right_expr: Box<Expr>,
    pub span: Span,
}

/// `test ? consequent : alternate`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub test: Box<Expr>,
    pub consequent: Box<Expr>,
    pub alternate: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// `array[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptExpr {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapExpr {
    pub entries: Vec<MapEntry>,
    pub span: Span,
}

/// `object.member`
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub member: String,
    pub span: Span,
}

/// `object.method(arguments)`
#[derive(Debug, Clone, PartialEq)]
pub struct MemberCallExpr {
    pub object: Box<Expr>,
    pub method: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// `new Class(arguments)`
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub class_name: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}
