use std::rc::Rc;

use tracing::{debug, instrument};

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        expressions::{
            ArrayExpr, BinaryExpr, BinaryOperator, CallExpr, ConditionalExpr, LiteralExpr,
            LiteralKind, MapExpr, MemberCallExpr, MemberExpr, NewExpr, PrefixExpr, PrefixOperator,
            SelfExpr, SubscriptExpr, SymbolExpr,
        },
        statements::{
            BlockStmt, ClassDeclStmt, FieldDeclStmt, FnDeclStmt, ForEachStmt, ForStmt, IfStmt,
            ReturnStmt, VarDeclStmt,
        },
        types::TypeAnnotation,
    },
    errors::errors::{ArgumentMismatch, Error, ErrorImpl},
    Span,
};

use super::{
    entities::{Entity, Function, Variable},
    environment::{Environments, ScopeId, ScopeOverrides},
    typed_ast::{
        TypedArrayExpr, TypedAssignmentStmt, TypedBinaryExpr, TypedBlockStmt, TypedCallExpr,
        TypedClassDeclStmt, TypedConditionalBranch, TypedConditionalExpr, TypedConstructor,
        TypedExpr, TypedExpressionStmt, TypedFieldDeclStmt, TypedFnDeclStmt, TypedForEachStmt,
        TypedForStmt, TypedIfStmt, TypedLiteralExpr, TypedMapEntry, TypedMapExpr,
        TypedMemberCallExpr, TypedMemberExpr, TypedNewExpr, TypedPrefixExpr, TypedPrintStmt,
        TypedProgram, TypedReturnStmt, TypedSelfExpr, TypedStmt, TypedSubscriptExpr,
        TypedSymbolExpr, TypedVarDeclStmt, TypedWhileStmt,
    },
    types::{ClassType, FunctionType, Type},
};

// Every nested node checks for this much headroom and, when short, continues
// on a fresh heap-allocated segment of the larger size.
const RED_ZONE: usize = 64 * 1024;
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Knobs for a single `type_check_with_options` call.
#[derive(Debug, Clone)]
pub struct TypeCheckOptions {
    /// Deepest statement/expression nesting accepted before giving up with
    /// `NestingTooDeep`.
    pub max_depth: usize,
}

impl Default for TypeCheckOptions {
    fn default() -> Self {
        TypeCheckOptions { max_depth: 256 }
    }
}

#[derive(Debug)]
pub struct TypeChecker {
    pub environments: Environments,
    options: TypeCheckOptions,
    depth: usize,
}

impl TypeChecker {
    pub fn new(options: TypeCheckOptions) -> Self {
        TypeChecker {
            environments: Environments::new(),
            options,
            depth: 0,
        }
    }

    fn enter(&mut self, span: &Span) -> Result<(), Error> {
        if self.depth >= self.options.max_depth {
            return Err(Error::at(
                ErrorImpl::NestingTooDeep {
                    limit: self.options.max_depth,
                },
                span,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Turns a written annotation into a semantic type.
    pub fn convert_type(&self, annotation: &TypeAnnotation, scope: ScopeId) -> Result<Type, Error> {
        match annotation {
            TypeAnnotation::Symbol(symbol) => {
                let entity = self.environments.resolve(scope, &symbol.name, &symbol.span)?;
                entity.as_type().ok_or_else(|| {
                    Error::at(
                        ErrorImpl::NotAType {
                            name: symbol.name.clone(),
                        },
                        &symbol.span,
                    )
                })
            }
            TypeAnnotation::Array { element } => Ok(Type::array(self.convert_type(element, scope)?)),
            TypeAnnotation::Map { key, value } => Ok(Type::map(
                self.convert_type(key, scope)?,
                self.convert_type(value, scope)?,
            )),
            TypeAnnotation::Function {
                parameters,
                return_type,
            } => {
                let parameters = parameters
                    .iter()
                    .map(|parameter| self.convert_type(parameter, scope))
                    .collect::<Result<Vec<Type>, Error>>()?;
                Ok(Type::function(
                    parameters,
                    self.convert_type(return_type, scope)?,
                ))
            }
        }
    }
}

fn type_mismatch(expected: &Type, received: &Type, span: &Span) -> Error {
    Error::at(
        ErrorImpl::TypeMismatch {
            expected: expected.to_string(),
            received: received.to_string(),
        },
        span,
    )
}

fn check_boolean(expr: &TypedExpr) -> Result<(), Error> {
    if expr.get_type().is_boolean() {
        Ok(())
    } else {
        Err(Error::at(
            ErrorImpl::NotABoolean {
                found: expr.get_type().to_string(),
            },
            expr.get_span(),
        ))
    }
}

fn check_integer(expr: &TypedExpr) -> Result<(), Error> {
    if expr.get_type().is_integer() {
        Ok(())
    } else {
        Err(Error::at(
            ErrorImpl::NotAnInteger {
                found: expr.get_type().to_string(),
            },
            expr.get_span(),
        ))
    }
}

fn check_numeric(expr: &TypedExpr) -> Result<(), Error> {
    if expr.get_type().is_numeric() {
        Ok(())
    } else {
        Err(Error::at(
            ErrorImpl::NotANumber {
                found: expr.get_type().to_string(),
            },
            expr.get_span(),
        ))
    }
}

/// Type shared by two sibling expressions, checked in either order.
fn check_same_type(expected: &TypedExpr, received: &TypedExpr) -> Result<Type, Error> {
    expected
        .get_type()
        .common_type(received.get_type())
        .ok_or_else(|| {
            type_mismatch(
                expected.get_type(),
                received.get_type(),
                received.get_span(),
            )
        })
}

fn check_assignable(value: &TypedExpr, target: &Type) -> Result<(), Error> {
    if value.get_type().is_assignable_to(target) {
        Ok(())
    } else {
        Err(type_mismatch(target, value.get_type(), value.get_span()))
    }
}

fn class_of(expr: &TypedExpr) -> Result<Rc<ClassType>, Error> {
    match expr.get_type() {
        Type::Class(class) => Ok(Rc::clone(class)),
        other => Err(Error::at(
            ErrorImpl::NotAClass {
                found: other.to_string(),
            },
            expr.get_span(),
        )),
    }
}

fn type_check_arguments(
    type_checker: &mut TypeChecker,
    signature: &FunctionType,
    arguments: &[Expr],
    span: &Span,
    scope: ScopeId,
) -> Result<Vec<TypedExpr>, Error> {
    let arguments = arguments
        .iter()
        .map(|argument| type_check_expr(type_checker, argument, scope))
        .collect::<Result<Vec<TypedExpr>, Error>>()?;

    if arguments.len() != signature.parameters.len() {
        return Err(Error::at(
            ErrorImpl::ArgumentMismatch(ArgumentMismatch::Count {
                required: signature.parameters.len(),
                passed: arguments.len(),
            }),
            span,
        ));
    }

    for (index, (argument, parameter)) in arguments.iter().zip(signature.parameters.iter()).enumerate() {
        if !argument.get_type().is_assignable_to(parameter) {
            return Err(Error::at(
                ErrorImpl::ArgumentMismatch(ArgumentMismatch::Type {
                    index,
                    expected: parameter.to_string(),
                    received: argument.get_type().to_string(),
                }),
                argument.get_span(),
            ));
        }
    }

    Ok(arguments)
}

fn type_check_literal(literal: &LiteralExpr) -> TypedExpr {
    let expr_type = match literal.value {
        LiteralKind::Int(_) => Type::INT,
        LiteralKind::Double(_) => Type::DOUBLE,
        LiteralKind::String(_) => Type::STRING,
        LiteralKind::Boolean(_) => Type::BOOLEAN,
    };

    TypedExpr::Literal(TypedLiteralExpr {
        value: literal.value.clone(),
        expr_type,
        span: literal.span.clone(),
    })
}

fn type_check_symbol(
    type_checker: &TypeChecker,
    symbol: &SymbolExpr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    let entity = type_checker
        .environments
        .resolve(scope, &symbol.value, &symbol.span)?;
    let expr_type = entity.value_type().ok_or_else(|| {
        Error::at(
            ErrorImpl::NotAValue {
                name: symbol.value.clone(),
            },
            &symbol.span,
        )
    })?;

    Ok(TypedExpr::Symbol(TypedSymbolExpr {
        value: symbol.value.clone(),
        entity,
        expr_type,
        span: symbol.span.clone(),
    }))
}

fn type_check_self(
    type_checker: &TypeChecker,
    self_expr: &SelfExpr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    let class_type = type_checker
        .environments
        .get(scope)
        .class
        .clone()
        .ok_or_else(|| Error::at(ErrorImpl::SelfOutsideClass, &self_expr.span))?;

    Ok(TypedExpr::SelfRef(TypedSelfExpr {
        expr_type: Type::Class(Rc::clone(&class_type)),
        class_type,
        span: self_expr.span.clone(),
    }))
}

fn type_check_binary(
    type_checker: &mut TypeChecker,
    binary: &BinaryExpr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    let left = type_check_expr(type_checker, &binary.left, scope)?;
    let right = type_check_expr(type_checker, &binary.right, scope)?;
    let operator = binary.operator;

    let expr_type = match operator {
        BinaryOperator::Plus => {
            if !left.get_type().is_numeric() && !left.get_type().is_string() {
                return Err(Error::at(
                    ErrorImpl::NotANumber {
                        found: left.get_type().to_string(),
                    },
                    left.get_span(),
                ));
            }
            check_same_type(&left, &right)?
        }
        BinaryOperator::Minus
        | BinaryOperator::Star
        | BinaryOperator::Slash
        | BinaryOperator::Power
        | BinaryOperator::Percent => {
            check_numeric(&left)?;
            check_same_type(&left, &right)?
        }
        BinaryOperator::Less
        | BinaryOperator::LessEquals
        | BinaryOperator::Greater
        | BinaryOperator::GreaterEquals => {
            check_numeric(&left)?;
            check_same_type(&left, &right)?;
            Type::BOOLEAN
        }
        BinaryOperator::Equals | BinaryOperator::NotEquals => {
            check_same_type(&left, &right)?;
            Type::BOOLEAN
        }
        BinaryOperator::And | BinaryOperator::Or => {
            check_boolean(&left)?;
            check_boolean(&right)?;
            Type::BOOLEAN
        }
    };

    Ok(TypedExpr::Binary(TypedBinaryExpr {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        expr_type,
        span: binary.span.clone(),
    }))
}

fn type_check_prefix(
    type_checker: &mut TypeChecker,
    prefix: &PrefixExpr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    let right_expr = type_check_expr(type_checker, &prefix.right_expr, scope)?;
    let expr_type = match prefix.operator {
        PrefixOperator::Negate => {
            check_numeric(&right_expr)?;
            right_expr.get_type().clone()
        }
        PrefixOperator::Not => {
            check_boolean(&right_expr)?;
            Type::BOOLEAN
        }
    };

    Ok(TypedExpr::Prefix(TypedPrefixExpr {
        operator: prefix.operator,
        right_expr: Box::new(right_expr),
        expr_type,
        span: prefix.span.clone(),
    }))
}

fn type_check_conditional(
    type_checker: &mut TypeChecker,
    conditional: &ConditionalExpr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    let test = type_check_expr(type_checker, &conditional.test, scope)?;
    check_boolean(&test)?;
    let consequent = type_check_expr(type_checker, &conditional.consequent, scope)?;
    let alternate = type_check_expr(type_checker, &conditional.alternate, scope)?;
    let expr_type = check_same_type(&consequent, &alternate)?;

    Ok(TypedExpr::Conditional(TypedConditionalExpr {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
        expr_type,
        span: conditional.span.clone(),
    }))
}

fn type_check_call(
    type_checker: &mut TypeChecker,
    call: &CallExpr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    let callee = type_check_expr(type_checker, &call.callee, scope)?;
    let signature = match callee.get_type() {
        Type::Function(signature) => signature.clone(),
        other => {
            return Err(Error::at(
                ErrorImpl::NotCallable {
                    found: other.to_string(),
                },
                callee.get_span(),
            ))
        }
    };
    let arguments =
        type_check_arguments(type_checker, &signature, &call.arguments, &call.span, scope)?;

    Ok(TypedExpr::Call(TypedCallExpr {
        callee: Box::new(callee),
        expr_type: (*signature.return_type).clone(),
        signature,
        arguments,
        span: call.span.clone(),
    }))
}

fn type_check_subscript(
    type_checker: &mut TypeChecker,
    subscript: &SubscriptExpr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    let array = type_check_expr(type_checker, &subscript.array, scope)?;
    let index = type_check_expr(type_checker, &subscript.index, scope)?;
    check_integer(&index)?;
    let expr_type = match array.get_type() {
        Type::Array(element) => (**element).clone(),
        other => {
            return Err(Error::at(
                ErrorImpl::NotIterable {
                    found: other.to_string(),
                },
                array.get_span(),
            ))
        }
    };

    Ok(TypedExpr::Subscript(TypedSubscriptExpr {
        array: Box::new(array),
        index: Box::new(index),
        expr_type,
        span: subscript.span.clone(),
    }))
}

fn type_check_array(
    type_checker: &mut TypeChecker,
    array: &ArrayExpr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    let elements = array
        .elements
        .iter()
        .map(|element| type_check_expr(type_checker, element, scope))
        .collect::<Result<Vec<TypedExpr>, Error>>()?;

    let mut element_type = Type::ANY;
    for element in elements.iter() {
        element_type = element_type.common_type(element.get_type()).ok_or_else(|| {
            type_mismatch(&element_type, element.get_type(), element.get_span())
        })?;
    }

    Ok(TypedExpr::Array(TypedArrayExpr {
        elements,
        expr_type: Type::array(element_type),
        span: array.span.clone(),
    }))
}

fn type_check_map(
    type_checker: &mut TypeChecker,
    map: &MapExpr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    let mut key_type = Type::ANY;
    let mut value_type = Type::ANY;
    let mut entries = vec![];
    for entry in map.entries.iter() {
        let key = type_check_expr(type_checker, &entry.key, scope)?;
        let value = type_check_expr(type_checker, &entry.value, scope)?;
        key_type = key_type
            .common_type(key.get_type())
            .ok_or_else(|| type_mismatch(&key_type, key.get_type(), key.get_span()))?;
        value_type = value_type
            .common_type(value.get_type())
            .ok_or_else(|| type_mismatch(&value_type, value.get_type(), value.get_span()))?;
        entries.push(TypedMapEntry { key, value });
    }

    Ok(TypedExpr::Map(TypedMapExpr {
        entries,
        expr_type: Type::map(key_type, value_type),
        span: map.span.clone(),
    }))
}

fn type_check_member(
    type_checker: &mut TypeChecker,
    member: &MemberExpr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    let object = type_check_expr(type_checker, &member.object, scope)?;
    let class = class_of(&object)?;
    let expr_type = class.get_field(&member.member).ok_or_else(|| {
        Error::at(
            ErrorImpl::UnknownMember {
                class: class.name.clone(),
                member: member.member.clone(),
            },
            &member.span,
        )
    })?;

    Ok(TypedExpr::Member(TypedMemberExpr {
        object: Box::new(object),
        member: member.member.clone(),
        expr_type,
        span: member.span.clone(),
    }))
}

fn type_check_member_call(
    type_checker: &mut TypeChecker,
    member_call: &MemberCallExpr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    let object = type_check_expr(type_checker, &member_call.object, scope)?;
    let class = class_of(&object)?;
    let signature = class.get_method(&member_call.method).ok_or_else(|| {
        Error::at(
            ErrorImpl::UnknownMember {
                class: class.name.clone(),
                member: member_call.method.clone(),
            },
            &member_call.span,
        )
    })?;
    let arguments = type_check_arguments(
        type_checker,
        &signature,
        &member_call.arguments,
        &member_call.span,
        scope,
    )?;

    Ok(TypedExpr::MemberCall(TypedMemberCallExpr {
        object: Box::new(object),
        method: member_call.method.clone(),
        expr_type: (*signature.return_type).clone(),
        signature,
        arguments,
        span: member_call.span.clone(),
    }))
}

fn type_check_new(
    type_checker: &mut TypeChecker,
    new_expr: &NewExpr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    let entity = type_checker
        .environments
        .resolve(scope, &new_expr.class_name, &new_expr.span)?;
    let class_type = match &*entity {
        Entity::Class(class) => Rc::clone(class),
        _ => {
            return Err(Error::at(
                ErrorImpl::NotAClass {
                    found: new_expr.class_name.clone(),
                },
                &new_expr.span,
            ))
        }
    };
    let arguments = type_check_arguments(
        type_checker,
        &class_type.constructor(),
        &new_expr.arguments,
        &new_expr.span,
        scope,
    )?;

    Ok(TypedExpr::New(TypedNewExpr {
        expr_type: Type::Class(Rc::clone(&class_type)),
        class_type,
        arguments,
        span: new_expr.span.clone(),
    }))
}

pub fn type_check_expr(
    type_checker: &mut TypeChecker,
    ast: &Expr,
    scope: ScopeId,
) -> Result<TypedExpr, Error> {
    type_checker.enter(ast.get_span())?;
    let typed = stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
        check_expr(type_checker, ast, scope)
    });
    type_checker.exit();
    typed
}

fn check_expr(type_checker: &mut TypeChecker, ast: &Expr, scope: ScopeId) -> Result<TypedExpr, Error> {
    match ast {
        Expr::Literal(literal) => Ok(type_check_literal(literal)),
        Expr::Symbol(symbol) => type_check_symbol(type_checker, symbol, scope),
        Expr::SelfRef(self_expr) => type_check_self(type_checker, self_expr, scope),
        Expr::Binary(binary) => type_check_binary(type_checker, binary, scope),
        Expr::Prefix(prefix) => type_check_prefix(type_checker, prefix, scope),
        Expr::Conditional(conditional) => type_check_conditional(type_checker, conditional, scope),
        Expr::Call(call) => type_check_call(type_checker, call, scope),
        Expr::Subscript(subscript) => type_check_subscript(type_checker, subscript, scope),
        Expr::Array(array) => type_check_array(type_checker, array, scope),
        Expr::Map(map) => type_check_map(type_checker, map, scope),
        Expr::Member(member) => type_check_member(type_checker, member, scope),
        Expr::MemberCall(member_call) => type_check_member_call(type_checker, member_call, scope),
        Expr::New(new_expr) => type_check_new(type_checker, new_expr, scope),
    }
}

/// An inferred type still holding `any` came from an empty literal.
fn ambiguous_literal(inferred: &Type, span: &Span) -> Error {
    let literal = match inferred {
        Type::Map(_, _) => "map",
        _ => "array",
    };
    Error::at(
        ErrorImpl::AmbiguousEmptyLiteral {
            literal: literal.to_string(),
        },
        span,
    )
}

fn type_check_var_decl(
    type_checker: &mut TypeChecker,
    var_decl: &VarDeclStmt,
    scope: ScopeId,
) -> Result<TypedStmt, Error> {
    let assigned_value = type_check_expr(type_checker, &var_decl.assigned_value, scope)?;

    let var_type = match &var_decl.explicit_type {
        Some(annotation) => {
            let declared = type_checker.convert_type(annotation, scope)?;
            check_assignable(&assigned_value, &declared)?;
            declared
        }
        None => {
            let inferred = assigned_value.get_type().clone();
            if inferred.contains_any() {
                return Err(ambiguous_literal(&inferred, assigned_value.get_span()));
            }
            inferred
        }
    };

    let entity = Rc::new(Entity::Variable(Variable {
        name: var_decl.identifier.clone(),
        var_type: var_type.clone(),
    }));
    type_checker
        .environments
        .declare(scope, &var_decl.identifier, Rc::clone(&entity), &var_decl.span)?;
    debug!(variable = %var_decl.identifier, var_type = %var_type, "declared variable");

    Ok(TypedStmt::VarDecl(TypedVarDeclStmt {
        entity,
        var_type,
        assigned_value,
        span: var_decl.span.clone(),
    }))
}

/// Checks a free function or, with `method_of`, a class method.
///
/// The name is bound in `scope` (and the method appended to its class)
/// before the body is analyzed, so the body may call itself.
fn type_check_function(
    type_checker: &mut TypeChecker,
    fn_decl: &FnDeclStmt,
    method_of: Option<&Rc<ClassType>>,
    scope: ScopeId,
) -> Result<TypedFnDeclStmt, Error> {
    let return_type = match &fn_decl.return_type {
        Some(annotation) => type_checker.convert_type(annotation, scope)?,
        None => Type::NONE,
    };
    let parameter_types = fn_decl
        .parameters
        .iter()
        .map(|parameter| type_checker.convert_type(&parameter.param_type, scope))
        .collect::<Result<Vec<Type>, Error>>()?;

    let function = Function {
        name: fn_decl.identifier.clone(),
        parameter_types: parameter_types.clone(),
        return_type: return_type.clone(),
    };
    let signature = function.signature();
    let entity = Rc::new(Entity::Function(function));

    let body_scope = type_checker.environments.child(
        scope,
        ScopeOverrides::default()
            .in_loop(false)
            .function(Rc::clone(&entity)),
    );

    let mut parameters = vec![];
    for (parameter, param_type) in fn_decl.parameters.iter().zip(parameter_types) {
        let parameter_entity = Rc::new(Entity::Parameter(Variable {
            name: parameter.name.clone(),
            var_type: param_type,
        }));
        type_checker.environments.declare(
            body_scope,
            &parameter.name,
            Rc::clone(&parameter_entity),
            &parameter.span,
        )?;
        parameters.push(parameter_entity);
    }

    if let Some(class) = method_of {
        if !class.add_method(&fn_decl.identifier, signature) {
            return Err(Error::at(
                ErrorImpl::DuplicateDeclaration {
                    name: fn_decl.identifier.clone(),
                },
                &fn_decl.span,
            ));
        }
    }
    type_checker
        .environments
        .declare(scope, &fn_decl.identifier, Rc::clone(&entity), &fn_decl.span)?;
    debug!(function = %fn_decl.identifier, method = method_of.is_some(), "declared function");

    let body = type_check_block(type_checker, &fn_decl.body, body_scope)?;
    type_checker.environments.leave(body_scope);

    Ok(TypedFnDeclStmt {
        entity,
        parameters,
        return_type,
        body,
        span: fn_decl.span.clone(),
    })
}

fn type_check_class(
    type_checker: &mut TypeChecker,
    class_decl: &ClassDeclStmt,
    scope: ScopeId,
) -> Result<TypedStmt, Error> {
    let class_type = ClassType::new(&class_decl.name);
    debug!(class = %class_decl.name, "checking class");

    let class_scope = type_checker
        .environments
        .child(scope, ScopeOverrides::default().class(Rc::clone(&class_type)));

    // Constructor
    let constructor_decl = &class_decl.constructor;
    let parameter_types = constructor_decl
        .parameters
        .iter()
        .map(|parameter| type_checker.convert_type(&parameter.param_type, class_scope))
        .collect::<Result<Vec<Type>, Error>>()?;
    let constructor = Function {
        name: class_decl.name.clone(),
        parameter_types: parameter_types.clone(),
        return_type: Type::NONE,
    };
    class_type.set_constructor(constructor.signature());
    let constructor_entity = Rc::new(Entity::Function(constructor));

    let constructor_scope = type_checker.environments.child(
        class_scope,
        ScopeOverrides::default()
            .in_loop(false)
            .function(Rc::clone(&constructor_entity)),
    );
    let mut parameters = vec![];
    for (parameter, param_type) in constructor_decl.parameters.iter().zip(parameter_types) {
        let parameter_entity = Rc::new(Entity::Parameter(Variable {
            name: parameter.name.clone(),
            var_type: param_type,
        }));
        type_checker.environments.declare(
            constructor_scope,
            &parameter.name,
            Rc::clone(&parameter_entity),
            &parameter.span,
        )?;
        parameters.push(parameter_entity);
    }
    let constructor_body = type_check_block(type_checker, &constructor_decl.body, constructor_scope)?;
    type_checker.environments.leave(constructor_scope);

    let mut methods = vec![];
    for method in class_decl.methods.iter() {
        methods.push(type_check_function(
            type_checker,
            method,
            Some(&class_type),
            class_scope,
        )?);
    }
    type_checker.environments.leave(class_scope);

    let entity = Rc::new(Entity::Class(Rc::clone(&class_type)));
    type_checker
        .environments
        .declare(scope, &class_decl.name, Rc::clone(&entity), &class_decl.span)?;
    debug!(class = %class_decl.name, fields = ?class_type.field_names(), methods = ?class_type.method_names(), "declared class");

    Ok(TypedStmt::ClassDecl(TypedClassDeclStmt {
        entity,
        class_type,
        constructor: TypedConstructor {
            entity: constructor_entity,
            parameters,
            body: constructor_body,
            span: constructor_decl.span.clone(),
        },
        methods,
        span: class_decl.span.clone(),
    }))
}

fn type_check_field(
    type_checker: &mut TypeChecker,
    field_decl: &FieldDeclStmt,
    scope: ScopeId,
) -> Result<TypedStmt, Error> {
    let class = type_checker
        .environments
        .get(scope)
        .class
        .clone()
        .ok_or_else(|| Error::at(ErrorImpl::SelfOutsideClass, &field_decl.span))?;

    let initializer = type_check_expr(type_checker, &field_decl.initializer, scope)?;
    let field_type = type_checker.convert_type(&field_decl.field_type, scope)?;
    check_assignable(&initializer, &field_type)?;

    if !class.add_field(&field_decl.field, field_type.clone()) {
        return Err(Error::at(
            ErrorImpl::DuplicateDeclaration {
                name: field_decl.field.clone(),
            },
            &field_decl.span,
        ));
    }
    let entity = Rc::new(Entity::Field(Variable {
        name: field_decl.field.clone(),
        var_type: field_type.clone(),
    }));
    type_checker
        .environments
        .declare(scope, &field_decl.field, Rc::clone(&entity), &field_decl.span)?;
    debug!(class = %class.name, field = %field_decl.field, "declared field");

    Ok(TypedStmt::FieldDecl(TypedFieldDeclStmt {
        entity,
        field_type,
        initializer,
        span: field_decl.span.clone(),
    }))
}

fn type_check_if(
    type_checker: &mut TypeChecker,
    if_stmt: &IfStmt,
    scope: ScopeId,
) -> Result<TypedStmt, Error> {
    let mut branches = vec![];
    for branch in if_stmt.branches.iter() {
        let condition = type_check_expr(type_checker, &branch.condition, scope)?;
        check_boolean(&condition)?;
        let body = type_check_child_block(type_checker, &branch.body, scope, ScopeOverrides::default())?;
        branches.push(TypedConditionalBranch { condition, body });
    }

    let alternate = match &if_stmt.alternate {
        Some(block) => Some(type_check_child_block(
            type_checker,
            block,
            scope,
            ScopeOverrides::default(),
        )?),
        None => None,
    };

    Ok(TypedStmt::If(TypedIfStmt {
        branches,
        alternate,
        span: if_stmt.span.clone(),
    }))
}

fn type_check_for(
    type_checker: &mut TypeChecker,
    for_stmt: &ForStmt,
    scope: ScopeId,
) -> Result<TypedStmt, Error> {
    let start = type_check_expr(type_checker, &for_stmt.start, scope)?;
    check_integer(&start)?;
    let end = type_check_expr(type_checker, &for_stmt.end, scope)?;
    check_integer(&end)?;

    let body_scope = type_checker
        .environments
        .child(scope, ScopeOverrides::default().in_loop(true));
    let variable = Rc::new(Entity::Variable(Variable {
        name: for_stmt.variable.clone(),
        var_type: Type::INT,
    }));
    type_checker.environments.declare(
        body_scope,
        &for_stmt.variable,
        Rc::clone(&variable),
        &for_stmt.span,
    )?;
    let body = type_check_block(type_checker, &for_stmt.body, body_scope)?;
    type_checker.environments.leave(body_scope);

    Ok(TypedStmt::For(TypedForStmt {
        variable,
        start,
        end,
        body,
        span: for_stmt.span.clone(),
    }))
}

fn type_check_for_each(
    type_checker: &mut TypeChecker,
    for_each: &ForEachStmt,
    scope: ScopeId,
) -> Result<TypedStmt, Error> {
    let iterable = type_check_expr(type_checker, &for_each.iterable, scope)?;
    let element_type = match iterable.get_type() {
        Type::Array(element) => (**element).clone(),
        Type::Map(_, value) => (**value).clone(),
        other => {
            return Err(Error::at(
                ErrorImpl::NotIterable {
                    found: other.to_string(),
                },
                iterable.get_span(),
            ))
        }
    };

    let var_type = match &for_each.explicit_type {
        Some(annotation) => {
            let declared = type_checker.convert_type(annotation, scope)?;
            if !element_type.is_assignable_to(&declared) {
                return Err(type_mismatch(&declared, &element_type, iterable.get_span()));
            }
            declared
        }
        None if element_type.contains_any() => {
            return Err(ambiguous_literal(iterable.get_type(), iterable.get_span()));
        }
        None => element_type,
    };

    let body_scope = type_checker
        .environments
        .child(scope, ScopeOverrides::default().in_loop(true));
    let variable = Rc::new(Entity::Variable(Variable {
        name: for_each.variable.clone(),
        var_type,
    }));
    type_checker.environments.declare(
        body_scope,
        &for_each.variable,
        Rc::clone(&variable),
        &for_each.span,
    )?;
    let body = type_check_block(type_checker, &for_each.body, body_scope)?;
    type_checker.environments.leave(body_scope);

    Ok(TypedStmt::ForEach(TypedForEachStmt {
        variable,
        iterable,
        body,
        span: for_each.span.clone(),
    }))
}

fn type_check_return(
    type_checker: &mut TypeChecker,
    return_stmt: &ReturnStmt,
    scope: ScopeId,
) -> Result<TypedStmt, Error> {
    let function = type_checker
        .environments
        .get(scope)
        .function
        .clone()
        .ok_or_else(|| Error::at(ErrorImpl::ReturnOutsideFunction, &return_stmt.span))?;
    let return_type = match &*function {
        Entity::Function(function) => function.return_type.clone(),
        _ => Type::NONE,
    };

    let value = match &return_stmt.value {
        None if !return_type.is_none() => {
            return Err(Error::at(
                ErrorImpl::ReturnArityMismatch {
                    function: function.get_name().to_string(),
                    expects_value: true,
                },
                &return_stmt.span,
            ))
        }
        None => None,
        Some(_) if return_type.is_none() => {
            return Err(Error::at(
                ErrorImpl::ReturnArityMismatch {
                    function: function.get_name().to_string(),
                    expects_value: false,
                },
                &return_stmt.span,
            ))
        }
        Some(value) => {
            let value = type_check_expr(type_checker, value, scope)?;
            check_assignable(&value, &return_type)?;
            Some(value)
        }
    };

    Ok(TypedStmt::Return(TypedReturnStmt {
        value,
        span: return_stmt.span.clone(),
    }))
}

pub fn type_check_stmt(
    type_checker: &mut TypeChecker,
    ast: &Stmt,
    scope: ScopeId,
) -> Result<TypedStmt, Error> {
    type_checker.enter(ast.get_span())?;
    let typed = stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
        check_stmt(type_checker, ast, scope)
    });
    type_checker.exit();
    typed
}

fn check_stmt(type_checker: &mut TypeChecker, ast: &Stmt, scope: ScopeId) -> Result<TypedStmt, Error> {
    match ast {
        Stmt::VarDecl(var_decl) => type_check_var_decl(type_checker, var_decl, scope),
        Stmt::FnDecl(fn_decl) => Ok(TypedStmt::FnDecl(type_check_function(
            type_checker,
            fn_decl,
            None,
            scope,
        )?)),
        Stmt::ClassDecl(class_decl) => type_check_class(type_checker, class_decl, scope),
        Stmt::FieldDecl(field_decl) => type_check_field(type_checker, field_decl, scope),
        Stmt::Assignment(assignment) => {
            let value = type_check_expr(type_checker, &assignment.value, scope)?;
            let target = type_check_expr(type_checker, &assignment.target, scope)?;
            check_assignable(&value, target.get_type())?;

            Ok(TypedStmt::Assignment(TypedAssignmentStmt {
                target,
                value,
                span: assignment.span.clone(),
            }))
        }
        Stmt::Print(print) => Ok(TypedStmt::Print(TypedPrintStmt {
            argument: type_check_expr(type_checker, &print.argument, scope)?,
            span: print.span.clone(),
        })),
        Stmt::Expression(expression) => Ok(TypedStmt::Expression(TypedExpressionStmt {
            expression: type_check_expr(type_checker, &expression.expression, scope)?,
        })),
        Stmt::If(if_stmt) => type_check_if(type_checker, if_stmt, scope),
        Stmt::While(while_stmt) => {
            let condition = type_check_expr(type_checker, &while_stmt.condition, scope)?;
            check_boolean(&condition)?;
            let body = type_check_child_block(
                type_checker,
                &while_stmt.body,
                scope,
                ScopeOverrides::default().in_loop(true),
            )?;

            Ok(TypedStmt::While(TypedWhileStmt {
                condition,
                body,
                span: while_stmt.span.clone(),
            }))
        }
        Stmt::For(for_stmt) => type_check_for(type_checker, for_stmt, scope),
        Stmt::ForEach(for_each) => type_check_for_each(type_checker, for_each, scope),
        Stmt::Break(break_stmt) => {
            if type_checker.environments.get(scope).in_loop {
                Ok(TypedStmt::Break(break_stmt.span.clone()))
            } else {
                Err(Error::at(ErrorImpl::BreakOutsideLoop, &break_stmt.span))
            }
        }
        Stmt::Return(return_stmt) => type_check_return(type_checker, return_stmt, scope),
    }
}

/// Checks the statements of `ast` directly in `scope`.
pub fn type_check_block(
    type_checker: &mut TypeChecker,
    ast: &BlockStmt,
    scope: ScopeId,
) -> Result<TypedBlockStmt, Error> {
    let mut typed_ast = TypedBlockStmt {
        body: vec![],
        span: ast.span.clone(),
    };
    for stmt in ast.iter() {
        typed_ast.body.push(type_check_stmt(type_checker, stmt, scope)?);
    }

    Ok(typed_ast)
}

fn type_check_child_block(
    type_checker: &mut TypeChecker,
    ast: &BlockStmt,
    scope: ScopeId,
    overrides: ScopeOverrides,
) -> Result<TypedBlockStmt, Error> {
    let child = type_checker.environments.child(scope, overrides);
    let block = type_check_block(type_checker, ast, child)?;
    type_checker.environments.leave(child);
    Ok(block)
}

pub fn type_check(program: &Program) -> Result<TypedProgram, Error> {
    type_check_with_options(program, &TypeCheckOptions::default())
}

/// Resolves and type checks `program`, stopping at the first error.
///
/// Every call works on a fresh scope arena whose root only knows the
/// built-in types.
#[instrument(skip_all, fields(statements = program.body.len(), max_depth = options.max_depth))]
pub fn type_check_with_options(
    program: &Program,
    options: &TypeCheckOptions,
) -> Result<TypedProgram, Error> {
    let mut type_checker = TypeChecker::new(options.clone());
    let root = type_checker.environments.root();

    let mut body = vec![];
    for stmt in program.body.iter() {
        body.push(type_check_stmt(&mut type_checker, stmt, root)?);
    }
    debug!(statements = body.len(), "type check finished");

    Ok(TypedProgram {
        body,
        span: program.span.clone(),
    })
}
