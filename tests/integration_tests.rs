//! Integration tests for end-to-end semantic analysis.
//!
//! These tests build programs the way a parser would hand them over and
//! verify that the checker accepts valid programs, decorates them with
//! types and entities, and rejects invalid ones with the right error.

use pirates_analyzer::{
    ast::{
        ast::{Expr, Program, Stmt},
        expressions::{BinaryOperator, PrefixOperator},
        statements::{FnDeclStmt, Parameter},
        types::TypeAnnotation,
    },
    errors::errors::{ArgumentMismatch, Error, ErrorImpl},
    type_checker::{
        entities::Entity,
        type_checker::{type_check, type_check_with_options, TypeCheckOptions},
        typed_ast::{TypedExpr, TypedProgram, TypedStmt},
        types::Type,
    },
};

fn named(name: &str) -> TypeAnnotation {
    TypeAnnotation::named(name)
}

fn check(body: Vec<Stmt>) -> Result<TypedProgram, Error> {
    type_check(&Program::new(body))
}

fn check_ok(body: Vec<Stmt>) -> TypedProgram {
    match check(body) {
        Ok(program) => program,
        Err(error) => panic!("expected program to type check, got {}", error),
    }
}

fn check_err(body: Vec<Stmt>) -> Error {
    match check(body) {
        Ok(_) => panic!("expected a type error"),
        Err(error) => error,
    }
}

fn int_param(name: &str) -> Parameter {
    Parameter::new(name, named("int"))
}

/// `ship S { build(int x) { int self.y = x } <methods> }`
fn class_with_field_y(methods: Vec<FnDeclStmt>) -> Stmt {
    Stmt::class(
        "S",
        vec![int_param("x")],
        vec![Stmt::field(named("int"), "y", Expr::symbol("x"))],
        methods,
    )
}

// Declarations and scopes

#[test]
fn test_literal_declarations_are_inferred() {
    let program = check_ok(vec![
        Stmt::var("a", None, Expr::int(1)),
        Stmt::var("b", None, Expr::double(1.2)),
        Stmt::var("c", None, Expr::boolean(false)),
        Stmt::var("d", None, Expr::string("please work")),
    ]);

    let types: Vec<String> = program
        .body
        .iter()
        .map(|stmt| match stmt {
            TypedStmt::VarDecl(decl) => decl.var_type.to_string(),
            _ => panic!("expected a variable declaration"),
        })
        .collect();
    assert_eq!(types, vec!["int", "doubloon", "booty", "shanty"]);
}

#[test]
fn test_symbol_carries_its_entity() {
    let program = check_ok(vec![
        Stmt::var("x", None, Expr::int(1)),
        Stmt::print(Expr::symbol("x")),
    ]);

    let TypedStmt::VarDecl(declaration) = &program.body[0] else {
        panic!("expected a variable declaration");
    };
    let TypedStmt::Print(print) = &program.body[1] else {
        panic!("expected a print statement");
    };
    let TypedExpr::Symbol(symbol) = &print.argument else {
        panic!("expected a symbol");
    };

    assert!(std::rc::Rc::ptr_eq(&symbol.entity, &declaration.entity));
    assert!(symbol.expr_type.is_integer());
}

#[test]
fn test_redeclaration_in_same_scope_fails() {
    let error = check_err(vec![
        Stmt::var("x", Some(named("shanty")), Expr::string("five")),
        Stmt::var("x", Some(named("shanty")), Expr::string("four")),
    ]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::DuplicateDeclaration {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_shadowing_in_nested_block_is_allowed() {
    check_ok(vec![
        Stmt::var("x", None, Expr::int(1)),
        Stmt::while_loop(
            Expr::boolean(false),
            vec![Stmt::var("x", None, Expr::string("inner"))],
        ),
        Stmt::assign(Expr::symbol("x"), Expr::int(2)),
    ]);
}

#[test]
fn test_outer_variable_keeps_its_type_in_nested_block() {
    let error = check_err(vec![
        Stmt::var("x", None, Expr::int(1)),
        Stmt::while_loop(
            Expr::boolean(true),
            vec![Stmt::assign(Expr::symbol("x"), Expr::string("shanty"))],
        ),
    ]);

    assert_eq!(error.get_error_name(), "TypeMismatch");
    assert_eq!(
        error.get_tip().to_string(),
        "Cannot assign a shanty to a int"
    );
}

#[test]
fn test_initializer_cannot_see_its_own_variable() {
    let error = check_err(vec![Stmt::var("x", None, Expr::symbol("x"))]);

    assert_eq!(error.get_error_name(), "UndeclaredIdentifier");
}

#[test]
fn test_undeclared_identifier() {
    let error = check_err(vec![Stmt::print(Expr::symbol("x"))]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::UndeclaredIdentifier {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_assigning_wrong_type_to_declared_variable() {
    let error = check_err(vec![
        Stmt::var("x", Some(named("int")), Expr::int(5)),
        Stmt::assign(Expr::symbol("x"), Expr::string("five")),
    ]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::TypeMismatch {
            expected: "int".to_string(),
            received: "shanty".to_string(),
        }
    );
}

#[test]
fn test_assigning_wrong_array_type() {
    let error = check_err(vec![
        Stmt::var(
            "x",
            None,
            Expr::array(vec![Expr::int(1), Expr::int(2), Expr::int(3)]),
        ),
        Stmt::assign(Expr::symbol("x"), Expr::array(vec![Expr::boolean(true)])),
    ]);

    assert_eq!(
        error.get_tip().to_string(),
        "Cannot assign a [booty] to a [int]"
    );
}

#[test]
fn test_assign_to_array_element() {
    check_ok(vec![
        Stmt::var("a", None, Expr::array(vec![Expr::int(1), Expr::int(2)])),
        Stmt::assign(
            Expr::subscript(Expr::symbol("a"), Expr::int(1)),
            Expr::int(100),
        ),
    ]);
}

#[test]
fn test_assigning_to_a_type_name_fails() {
    let error = check_err(vec![Stmt::assign(Expr::symbol("int"), Expr::int(1))]);

    assert_eq!(error.get_error_name(), "NotAValue");
}

#[test]
fn test_annotation_must_name_a_type() {
    let error = check_err(vec![
        Stmt::var("x", None, Expr::int(1)),
        Stmt::var("y", Some(named("x")), Expr::int(2)),
    ]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::NotAType {
            name: "x".to_string()
        }
    );
}

// Empty literals

#[test]
fn test_inferred_empty_array_is_ambiguous() {
    let error = check_err(vec![Stmt::var("x", None, Expr::array(vec![]))]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::AmbiguousEmptyLiteral {
            literal: "array".to_string()
        }
    );
}

#[test]
fn test_inferred_empty_map_is_ambiguous() {
    let error = check_err(vec![Stmt::var("x", None, Expr::map(vec![]))]);

    assert_eq!(error.get_error_name(), "AmbiguousEmptyLiteral");
}

#[test]
fn test_empty_literals_with_declared_types() {
    let program = check_ok(vec![
        Stmt::var("fruits", Some(TypeAnnotation::array(named("int"))), Expr::array(vec![])),
        Stmt::var(
            "b",
            Some(TypeAnnotation::map(named("shanty"), named("shanty"))),
            Expr::map(vec![]),
        ),
    ]);

    let TypedStmt::VarDecl(fruits) = &program.body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(fruits.var_type.to_string(), "[int]");
    assert_eq!(fruits.assigned_value.get_type().to_string(), "[any]");
}

#[test]
fn test_empty_literal_element_in_any_position() {
    let nested = || TypeAnnotation::array(TypeAnnotation::array(named("int")));
    let program = check_ok(vec![
        Stmt::var(
            "a",
            Some(nested()),
            Expr::array(vec![Expr::array(vec![Expr::int(1)]), Expr::array(vec![])]),
        ),
        Stmt::var(
            "b",
            Some(nested()),
            Expr::array(vec![Expr::array(vec![]), Expr::array(vec![Expr::int(1)])]),
        ),
        Stmt::var(
            "c",
            None,
            Expr::map(vec![
                (Expr::string("hold"), Expr::array(vec![Expr::int(3)])),
                (Expr::string("deck"), Expr::array(vec![])),
            ]),
        ),
    ]);

    for (index, expected) in [(0, "[[int]]"), (1, "[[int]]"), (2, "{shanty : [int]}")] {
        let TypedStmt::VarDecl(declaration) = &program.body[index] else {
            panic!("expected a variable declaration");
        };
        assert_eq!(declaration.assigned_value.get_type().to_string(), expected);
    }
}

#[test]
fn test_mixed_literal_elements_still_mismatch() {
    let error = check_err(vec![Stmt::var(
        "a",
        None,
        Expr::array(vec![
            Expr::array(vec![]),
            Expr::array(vec![Expr::int(1)]),
            Expr::array(vec![Expr::string("1")]),
        ]),
    )]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::TypeMismatch {
            expected: "[int]".to_string(),
            received: "[shanty]".to_string(),
        }
    );
}

// Operators

#[test]
fn test_arithmetic_and_relations() {
    check_ok(vec![
        Stmt::var(
            "x",
            None,
            Expr::binary(
                Expr::binary(Expr::int(2), BinaryOperator::Star, Expr::int(3)),
                BinaryOperator::Plus,
                Expr::binary(
                    Expr::int(5),
                    BinaryOperator::Power,
                    Expr::prefix(PrefixOperator::Negate, Expr::int(3)),
                ),
            ),
        ),
        Stmt::print(Expr::binary(
            Expr::binary(Expr::int(1), BinaryOperator::LessEquals, Expr::int(2)),
            BinaryOperator::And,
            Expr::binary(Expr::double(3.5), BinaryOperator::Less, Expr::double(1.2)),
        )),
        Stmt::print(Expr::binary(
            Expr::string("gold"),
            BinaryOperator::Plus,
            Expr::string("doubloons"),
        )),
    ]);
}

#[test]
fn test_plus_with_mixed_types() {
    let error = check_err(vec![Stmt::var(
        "x",
        None,
        Expr::binary(Expr::int(1), BinaryOperator::Plus, Expr::string("1")),
    )]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::TypeMismatch {
            expected: "int".to_string(),
            received: "shanty".to_string(),
        }
    );
}

#[test]
fn test_arithmetic_on_booleans() {
    let error = check_err(vec![Stmt::print(Expr::binary(
        Expr::boolean(false),
        BinaryOperator::Minus,
        Expr::int(1),
    ))]);
    assert_eq!(error.get_error_name(), "NotANumber");

    let error = check_err(vec![Stmt::print(Expr::binary(
        Expr::boolean(false),
        BinaryOperator::Plus,
        Expr::int(1),
    ))]);
    assert_eq!(error.get_error_name(), "NotANumber");
}

#[test]
fn test_relations_on_strings() {
    let error = check_err(vec![Stmt::print(Expr::binary(
        Expr::string("x"),
        BinaryOperator::Greater,
        Expr::string("y"),
    ))]);

    assert_eq!(error.get_error_name(), "NotANumber");
}

#[test]
fn test_equality_requires_equivalent_types() {
    check_ok(vec![Stmt::print(Expr::binary(
        Expr::array(vec![Expr::int(1)]),
        BinaryOperator::Equals,
        Expr::array(vec![Expr::int(5), Expr::int(8)]),
    ))]);
    check_ok(vec![Stmt::print(Expr::binary(
        Expr::array(vec![]),
        BinaryOperator::NotEquals,
        Expr::array(vec![Expr::int(1)]),
    ))]);

    let error = check_err(vec![Stmt::print(Expr::binary(
        Expr::int(2),
        BinaryOperator::Equals,
        Expr::double(2.0),
    ))]);
    assert_eq!(
        error.get_error(),
        &ErrorImpl::TypeMismatch {
            expected: "int".to_string(),
            received: "doubloon".to_string(),
        }
    );
}

#[test]
fn test_conditional_arms_share_a_type_in_either_order() {
    let program = check_ok(vec![
        Stmt::var(
            "a",
            None,
            Expr::conditional(
                Expr::boolean(true),
                Expr::array(vec![]),
                Expr::array(vec![Expr::int(1)]),
            ),
        ),
        Stmt::var(
            "b",
            None,
            Expr::conditional(
                Expr::boolean(false),
                Expr::array(vec![Expr::int(1)]),
                Expr::array(vec![]),
            ),
        ),
    ]);

    for stmt in program.body.iter() {
        let TypedStmt::VarDecl(declaration) = stmt else {
            panic!("expected a variable declaration");
        };
        assert_eq!(declaration.var_type.to_string(), "[int]");
    }
}

#[test]
fn test_logical_operators_require_booleans() {
    let error = check_err(vec![Stmt::print(Expr::binary(
        Expr::boolean(false),
        BinaryOperator::Or,
        Expr::int(1),
    ))]);
    assert_eq!(error.get_error_name(), "NotABoolean");

    let error = check_err(vec![Stmt::print(Expr::prefix(
        PrefixOperator::Not,
        Expr::int(2),
    ))]);
    assert_eq!(error.get_error_name(), "NotABoolean");

    let error = check_err(vec![Stmt::print(Expr::prefix(
        PrefixOperator::Negate,
        Expr::boolean(true),
    ))]);
    assert_eq!(error.get_error_name(), "NotANumber");
}

#[test]
fn test_conditional_expression() {
    let program = check_ok(vec![Stmt::var(
        "x",
        None,
        Expr::conditional(Expr::boolean(true), Expr::double(1.0), Expr::double(0.0)),
    )]);
    let TypedStmt::VarDecl(declaration) = &program.body[0] else {
        panic!("expected a variable declaration");
    };
    assert!(declaration.var_type.is_numeric());

    let error = check_err(vec![Stmt::print(Expr::conditional(
        Expr::int(1),
        Expr::int(2),
        Expr::int(3),
    ))]);
    assert_eq!(error.get_error_name(), "NotABoolean");

    let error = check_err(vec![Stmt::print(Expr::conditional(
        Expr::boolean(true),
        Expr::int(1),
        Expr::boolean(true),
    ))]);
    assert_eq!(
        error.get_error(),
        &ErrorImpl::TypeMismatch {
            expected: "int".to_string(),
            received: "booty".to_string(),
        }
    );
}

// Arrays and maps

#[test]
fn test_nested_array_subscripts() {
    let x = Expr::symbol("x");
    let access = Expr::subscript(
        Expr::subscript(Expr::subscript(x, Expr::int(0)), Expr::int(0)),
        Expr::int(0),
    );
    let program = check_ok(vec![
        Stmt::var(
            "x",
            None,
            Expr::array(vec![Expr::array(vec![Expr::array(vec![Expr::int(1)])])]),
        ),
        Stmt::print(Expr::binary(access, BinaryOperator::Plus, Expr::int(2))),
    ]);

    let TypedStmt::Print(print) = &program.body[1] else {
        panic!("expected a print statement");
    };
    assert!(print.argument.get_type().is_integer());
}

#[test]
fn test_array_elements_must_agree() {
    let error = check_err(vec![Stmt::print(Expr::array(vec![
        Expr::int(3),
        Expr::double(3.0),
    ]))]);

    assert_eq!(error.get_error_name(), "TypeMismatch");
}

#[test]
fn test_subscript_index_must_be_integer() {
    let error = check_err(vec![
        Stmt::var("a", None, Expr::array(vec![Expr::int(1)])),
        Stmt::print(Expr::subscript(Expr::symbol("a"), Expr::boolean(false))),
    ]);

    assert_eq!(error.get_error_name(), "NotAnInteger");
}

#[test]
fn test_subscript_of_non_array() {
    let error = check_err(vec![
        Stmt::var("a", None, Expr::int(1)),
        Stmt::print(Expr::subscript(Expr::symbol("a"), Expr::int(0))),
    ]);

    assert_eq!(error.get_error_name(), "NotIterable");
}

#[test]
fn test_map_keys_and_values_must_agree() {
    let error = check_err(vec![Stmt::print(Expr::map(vec![
        (Expr::string("Gold"), Expr::int(15)),
        (Expr::string("Dragons"), Expr::string("101")),
    ]))]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::TypeMismatch {
            expected: "int".to_string(),
            received: "shanty".to_string(),
        }
    );
}

#[test]
fn test_nested_maps_as_arguments() {
    let parameter_type = TypeAnnotation::map(
        TypeAnnotation::map(named("int"), named("int")),
        TypeAnnotation::map(named("shanty"), named("shanty")),
    );
    check_ok(vec![
        Stmt::function(
            "f",
            vec![Parameter::new("x", parameter_type)],
            Some(named("none")),
            vec![],
        ),
        Stmt::expression(Expr::call(
            Expr::symbol("f"),
            vec![Expr::map(vec![(
                Expr::map(vec![(Expr::int(1), Expr::int(2))]),
                Expr::map(vec![(Expr::string("hello"), Expr::string("hola"))]),
            )])],
        )),
    ]);
}

// Loops

#[test]
fn test_for_each_over_array() {
    let program = check_ok(vec![
        Stmt::var(
            "y",
            Some(TypeAnnotation::array(named("int"))),
            Expr::array(vec![Expr::int(2), Expr::int(3), Expr::int(4)]),
        ),
        Stmt::for_each("x", None, Expr::symbol("y"), vec![Stmt::print(Expr::symbol("x"))]),
    ]);

    let TypedStmt::ForEach(for_each) = &program.body[1] else {
        panic!("expected a for-each loop");
    };
    assert!(for_each
        .variable
        .value_type()
        .is_some_and(|ty| ty.is_integer()));
}

#[test]
fn test_for_each_over_map_binds_values() {
    let program = check_ok(vec![
        Stmt::var(
            "a",
            Some(TypeAnnotation::map(named("shanty"), named("int"))),
            Expr::map(vec![
                (Expr::string("Gold"), Expr::int(15)),
                (Expr::string("Dragons"), Expr::int(101)),
            ]),
        ),
        Stmt::for_each(
            "location",
            None,
            Expr::symbol("a"),
            vec![Stmt::print(Expr::symbol("location"))],
        ),
    ]);

    let TypedStmt::ForEach(for_each) = &program.body[1] else {
        panic!("expected a for-each loop");
    };
    assert!(for_each
        .variable
        .value_type()
        .is_some_and(|ty| ty.is_integer()));
}

#[test]
fn test_for_each_with_explicit_type() {
    let error = check_err(vec![
        Stmt::var("y", None, Expr::array(vec![Expr::int(2)])),
        Stmt::for_each("x", Some(named("shanty")), Expr::symbol("y"), vec![]),
    ]);

    assert_eq!(error.get_error_name(), "TypeMismatch");
}

#[test]
fn test_for_each_over_empty_literal_needs_a_type() {
    let error = check_err(vec![Stmt::for_each(
        "x",
        None,
        Expr::array(vec![]),
        vec![Stmt::print(Expr::symbol("x"))],
    )]);
    assert_eq!(
        error.get_error(),
        &ErrorImpl::AmbiguousEmptyLiteral {
            literal: "array".to_string()
        }
    );

    let error = check_err(vec![Stmt::for_each("x", None, Expr::map(vec![]), vec![])]);
    assert_eq!(
        error.get_error(),
        &ErrorImpl::AmbiguousEmptyLiteral {
            literal: "map".to_string()
        }
    );

    let program = check_ok(vec![Stmt::for_each(
        "x",
        Some(named("int")),
        Expr::array(vec![]),
        vec![Stmt::print(Expr::symbol("x"))],
    )]);
    let TypedStmt::ForEach(for_each) = &program.body[0] else {
        panic!("expected a for-each loop");
    };
    assert!(for_each
        .variable
        .value_type()
        .is_some_and(|ty| ty.is_integer()));
}

#[test]
fn test_for_each_over_non_iterable() {
    let error = check_err(vec![
        Stmt::var("a", None, Expr::boolean(true)),
        Stmt::for_each("i", Some(named("int")), Expr::symbol("a"), vec![]),
    ]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::NotIterable {
            found: "booty".to_string()
        }
    );
}

#[test]
fn test_counted_loop() {
    let program = check_ok(vec![Stmt::for_range(
        "i",
        Expr::int(0),
        Expr::int(10),
        vec![Stmt::print(Expr::symbol("i")), Stmt::break_stmt()],
    )]);

    let TypedStmt::For(for_stmt) = &program.body[0] else {
        panic!("expected a counted loop");
    };
    assert!(matches!(&*for_stmt.variable, Entity::Variable(_)));
}

#[test]
fn test_counted_loop_bounds_must_be_integers() {
    let error = check_err(vec![Stmt::for_range(
        "i",
        Expr::double(0.5),
        Expr::int(2),
        vec![],
    )]);

    assert_eq!(error.get_error_name(), "NotAnInteger");

    // A type name is not a value at all, so it never reaches the integer check.
    let error = check_err(vec![Stmt::for_range(
        "i",
        Expr::symbol("shanty"),
        Expr::int(2),
        vec![],
    )]);
    assert_eq!(
        error.get_error(),
        &ErrorImpl::NotAValue {
            name: "shanty".to_string()
        }
    );
}

#[test]
fn test_loop_tests_must_be_boolean() {
    let error = check_err(vec![Stmt::while_loop(Expr::int(1), vec![])]);
    assert_eq!(error.get_error_name(), "NotABoolean");

    let error = check_err(vec![Stmt::if_else(
        vec![(Expr::int(1), vec![])],
        Some(vec![]),
    )]);
    assert_eq!(error.get_error_name(), "NotABoolean");
}

// Control context

#[test]
fn test_break_outside_loop() {
    let error = check_err(vec![Stmt::break_stmt()]);
    assert_eq!(error.get_error(), &ErrorImpl::BreakOutsideLoop);

    let error = check_err(vec![Stmt::if_else(
        vec![(Expr::boolean(true), vec![Stmt::break_stmt()])],
        None,
    )]);
    assert_eq!(error.get_error(), &ErrorImpl::BreakOutsideLoop);
}

#[test]
fn test_break_in_nested_if_inside_loop() {
    check_ok(vec![Stmt::while_loop(
        Expr::boolean(false),
        vec![Stmt::if_else(
            vec![(Expr::boolean(true), vec![Stmt::break_stmt()])],
            None,
        )],
    )]);
}

#[test]
fn test_break_inside_function_inside_loop() {
    let error = check_err(vec![Stmt::while_loop(
        Expr::boolean(true),
        vec![Stmt::function("f", vec![], None, vec![Stmt::break_stmt()])],
    )]);

    assert_eq!(error.get_error(), &ErrorImpl::BreakOutsideLoop);
}

#[test]
fn test_return_outside_function() {
    let error = check_err(vec![Stmt::return_stmt(None)]);
    assert_eq!(error.get_error(), &ErrorImpl::ReturnOutsideFunction);

    let error = check_err(vec![Stmt::if_else(
        vec![(Expr::boolean(true), vec![Stmt::return_stmt(None)])],
        None,
    )]);
    assert_eq!(error.get_error(), &ErrorImpl::ReturnOutsideFunction);
}

#[test]
fn test_returns_in_nested_branches() {
    check_ok(vec![Stmt::function(
        "f",
        vec![],
        Some(named("none")),
        vec![Stmt::if_else(
            vec![
                (Expr::boolean(true), vec![Stmt::return_stmt(None)]),
                (
                    Expr::binary(Expr::int(3), BinaryOperator::Equals, Expr::int(4)),
                    vec![Stmt::return_stmt(None)],
                ),
            ],
            Some(vec![Stmt::return_stmt(None)]),
        )],
    )]);
}

#[test]
fn test_return_arity() {
    let error = check_err(vec![Stmt::function(
        "f",
        vec![],
        Some(named("shanty")),
        vec![Stmt::return_stmt(None)],
    )]);
    assert_eq!(
        error.get_error(),
        &ErrorImpl::ReturnArityMismatch {
            function: "f".to_string(),
            expects_value: true,
        }
    );

    let error = check_err(vec![Stmt::function(
        "evenOrOdd",
        vec![int_param("x")],
        None,
        vec![Stmt::return_stmt(Some(Expr::binary(
            Expr::binary(Expr::symbol("x"), BinaryOperator::Percent, Expr::int(2)),
            BinaryOperator::Equals,
            Expr::int(0),
        )))],
    )]);
    assert_eq!(
        error.get_error(),
        &ErrorImpl::ReturnArityMismatch {
            function: "evenOrOdd".to_string(),
            expects_value: false,
        }
    );
}

#[test]
fn test_return_type_mismatch() {
    let error = check_err(vec![Stmt::function(
        "f",
        vec![],
        Some(named("int")),
        vec![Stmt::return_stmt(Some(Expr::boolean(false)))],
    )]);

    assert_eq!(
        error.get_tip().to_string(),
        "Cannot assign a booty to a int"
    );
}

// Functions

#[test]
fn test_recursive_function() {
    check_ok(vec![Stmt::function(
        "S",
        vec![int_param("x"), int_param("y")],
        Some(named("int")),
        vec![
            Stmt::if_else(
                vec![(
                    Expr::binary(Expr::symbol("x"), BinaryOperator::Equals, Expr::int(0)),
                    vec![Stmt::return_stmt(Some(Expr::int(0)))],
                )],
                None,
            ),
            Stmt::return_stmt(Some(Expr::call(
                Expr::symbol("S"),
                vec![
                    Expr::binary(Expr::symbol("x"), BinaryOperator::Minus, Expr::int(1)),
                    Expr::symbol("y"),
                ],
            ))),
        ],
    )]);
}

#[test]
fn test_duplicate_parameters() {
    let error = check_err(vec![Stmt::function(
        "S",
        vec![Parameter::new("x", named("booty")), int_param("x")],
        None,
        vec![],
    )]);

    assert_eq!(error.get_error_name(), "DuplicateDeclaration");
}

#[test]
fn test_argument_count_mismatch() {
    let error = check_err(vec![
        Stmt::function("f", vec![int_param("x")], Some(named("int")), vec![
            Stmt::return_stmt(Some(Expr::symbol("x"))),
        ]),
        Stmt::print(Expr::call(Expr::symbol("f"), vec![])),
    ]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::ArgumentMismatch(ArgumentMismatch::Count {
            required: 1,
            passed: 0
        })
    );
    assert_eq!(error.to_string(), "1 argument(s) required but 0 passed");
}

#[test]
fn test_argument_type_mismatch() {
    let error = check_err(vec![
        Stmt::function("f", vec![int_param("x")], None, vec![]),
        Stmt::expression(Expr::call(Expr::symbol("f"), vec![Expr::boolean(true)])),
    ]);

    let message = error.to_string();
    assert!(message.contains("booty"), "{}", message);
    assert!(message.contains("int"), "{}", message);
    assert_eq!(error.get_error_name(), "ArgumentMismatch");
}

#[test]
fn test_functions_are_values() {
    let program = check_ok(vec![
        Stmt::function(
            "f",
            vec![int_param("x"), Parameter::new("y", named("booty"))],
            Some(named("int")),
            vec![Stmt::return_stmt(Some(Expr::symbol("x")))],
        ),
        Stmt::var("g", None, Expr::symbol("f")),
        Stmt::print(Expr::call(
            Expr::symbol("g"),
            vec![Expr::int(1), Expr::boolean(true)],
        )),
        Stmt::assign(Expr::symbol("f"), Expr::symbol("g")),
        Stmt::var("h", None, Expr::array(vec![Expr::symbol("g"), Expr::symbol("f")])),
    ]);

    let TypedStmt::VarDecl(g) = &program.body[1] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(g.var_type.to_string(), "(int,booty)->int");
}

#[test]
fn test_function_typed_parameter() {
    check_ok(vec![
        Stmt::function("double", vec![int_param("x")], Some(named("int")), vec![
            Stmt::return_stmt(Some(Expr::binary(
                Expr::symbol("x"),
                BinaryOperator::Star,
                Expr::int(2),
            ))),
        ]),
        Stmt::function(
            "apply",
            vec![
                Parameter::new(
                    "f",
                    TypeAnnotation::function(vec![named("int")], named("int")),
                ),
                int_param("x"),
            ],
            Some(named("int")),
            vec![Stmt::return_stmt(Some(Expr::call(
                Expr::symbol("f"),
                vec![Expr::symbol("x")],
            )))],
        ),
        Stmt::print(Expr::call(
            Expr::symbol("apply"),
            vec![Expr::symbol("double"), Expr::int(4)],
        )),
    ]);
}

#[test]
fn test_call_of_uncallable() {
    let error = check_err(vec![
        Stmt::var("x", None, Expr::int(1)),
        Stmt::print(Expr::call(Expr::symbol("x"), vec![])),
    ]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::NotCallable {
            found: "int".to_string()
        }
    );
}

#[test]
fn test_nested_functions_see_outer_parameters() {
    check_ok(vec![Stmt::function(
        "T",
        vec![int_param("x")],
        None,
        vec![
            Stmt::var("y", None, Expr::int(1)),
            Stmt::function("S", vec![int_param("z")], None, vec![Stmt::print(
                Expr::binary(Expr::symbol("z"), BinaryOperator::Plus, Expr::symbol("x")),
            )]),
        ],
    )]);
}

// Classes

#[test]
fn test_class_with_method_reading_field() {
    let program = check_ok(vec![
        class_with_field_y(vec![FnDeclStmt::new(
            "getY",
            vec![],
            Some(named("int")),
            vec![Stmt::return_stmt(Some(Expr::member(Expr::self_ref(), "y")))],
        )]),
        Stmt::var("p", Some(named("S")), Expr::new_object("S", vec![Expr::int(1)])),
        Stmt::var("c", None, Expr::member_call(Expr::symbol("p"), "getY", vec![])),
    ]);

    let TypedStmt::ClassDecl(class) = &program.body[0] else {
        panic!("expected a class declaration");
    };
    assert_eq!(class.class_type.field_names(), vec!["y".to_string()]);
    assert_eq!(class.class_type.method_names(), vec!["getY".to_string()]);

    let TypedStmt::VarDecl(c) = &program.body[2] else {
        panic!("expected a variable declaration");
    };
    assert!(c.var_type.is_integer());
}

#[test]
fn test_self_in_nested_contexts_inside_method() {
    check_ok(vec![class_with_field_y(vec![FnDeclStmt::new(
        "T",
        vec![],
        None,
        vec![Stmt::for_range(
            "x",
            Expr::int(0),
            Expr::int(10),
            vec![Stmt::if_else(
                vec![(
                    Expr::boolean(true),
                    vec![Stmt::print(Expr::member(Expr::self_ref(), "y"))],
                )],
                None,
            )],
        )],
    )])]);
}

#[test]
fn test_method_can_call_itself() {
    check_ok(vec![class_with_field_y(vec![FnDeclStmt::new(
        "countdown",
        vec![int_param("n")],
        Some(named("int")),
        vec![Stmt::return_stmt(Some(Expr::member_call(
            Expr::self_ref(),
            "countdown",
            vec![Expr::binary(Expr::symbol("n"), BinaryOperator::Minus, Expr::int(1))],
        )))],
    )])]);
}

#[test]
fn test_self_outside_class() {
    let error = check_err(vec![
        class_with_field_y(vec![]),
        Stmt::var("x", None, Expr::new_object("S", vec![Expr::int(1)])),
        Stmt::print(Expr::member(Expr::self_ref(), "y")),
    ]);

    assert_eq!(error.get_error(), &ErrorImpl::SelfOutsideClass);
}

#[test]
fn test_unknown_field() {
    let error = check_err(vec![class_with_field_y(vec![FnDeclStmt::new(
        "f",
        vec![],
        None,
        vec![Stmt::print(Expr::member(Expr::self_ref(), "g"))],
    )])]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::UnknownMember {
            class: "S".to_string(),
            member: "g".to_string(),
        }
    );
}

#[test]
fn test_unknown_method() {
    let error = check_err(vec![
        Stmt::class("S", vec![], vec![], vec![]),
        Stmt::var("x", None, Expr::new_object("S", vec![])),
        Stmt::print(Expr::member_call(Expr::symbol("x"), "Y", vec![])),
    ]);

    assert_eq!(error.get_error_name(), "UnknownMember");
}

#[test]
fn test_member_access_on_non_class() {
    let error = check_err(vec![
        Stmt::var("x", None, Expr::int(3)),
        Stmt::print(Expr::member(Expr::symbol("x"), "y")),
    ]);

    assert_eq!(error.get_error_name(), "NotAClass");
}

#[test]
fn test_constructor_arity() {
    let error = check_err(vec![
        class_with_field_y(vec![]),
        Stmt::var("x", None, Expr::new_object("S", vec![])),
    ]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::ArgumentMismatch(ArgumentMismatch::Count {
            required: 1,
            passed: 0
        })
    );
}

#[test]
fn test_new_of_undeclared_class() {
    let error = check_err(vec![
        Stmt::class("S", vec![], vec![], vec![]),
        Stmt::var("x", Some(named("T")), Expr::new_object("T", vec![])),
    ]);

    assert_eq!(error.get_error_name(), "UndeclaredIdentifier");
}

#[test]
fn test_new_of_non_class() {
    let error = check_err(vec![
        Stmt::var("T", None, Expr::int(1)),
        Stmt::print(Expr::new_object("T", vec![])),
    ]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::NotAClass {
            found: "T".to_string()
        }
    );
}

#[test]
fn test_object_assigned_to_wrong_type() {
    let error = check_err(vec![
        Stmt::class("S", vec![], vec![], vec![]),
        Stmt::var("x", Some(named("int")), Expr::new_object("S", vec![])),
    ]);

    assert_eq!(
        error.get_tip().to_string(),
        "Cannot assign a S to a int"
    );
}

#[test]
fn test_collections_of_objects() {
    check_ok(vec![
        Stmt::class("S", vec![], vec![Stmt::field(named("int"), "x", Expr::int(1))], vec![]),
        Stmt::var(
            "x",
            None,
            Expr::array(vec![Expr::new_object("S", vec![]), Expr::new_object("S", vec![])]),
        ),
        Stmt::var(
            "m",
            Some(TypeAnnotation::map(named("int"), named("S"))),
            Expr::map(vec![
                (Expr::int(1), Expr::new_object("S", vec![])),
                (Expr::int(2), Expr::new_object("S", vec![])),
            ]),
        ),
        Stmt::function("f", vec![Parameter::new("s", named("S"))], None, vec![]),
    ]);
}

#[test]
fn test_class_cannot_mention_itself_in_constructor() {
    let error = check_err(vec![Stmt::class(
        "S",
        vec![int_param("x"), Parameter::new("y", named("S"))],
        vec![],
        vec![],
    )]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::UndeclaredIdentifier {
            name: "S".to_string()
        }
    );
}

#[test]
fn test_field_outside_class() {
    let error = check_err(vec![Stmt::field(named("int"), "y", Expr::int(1))]);

    assert_eq!(error.get_error(), &ErrorImpl::SelfOutsideClass);
}

#[test]
fn test_method_updates_field() {
    check_ok(vec![
        Stmt::class(
            "Rectangle",
            vec![
                Parameter::new("h", named("doubloon")),
                int_param("w"),
            ],
            vec![
                Stmt::field(named("doubloon"), "height", Expr::symbol("h")),
                Stmt::field(named("int"), "width", Expr::symbol("w")),
            ],
            vec![
                FnDeclStmt::new(
                    "getWidth",
                    vec![],
                    Some(named("int")),
                    vec![Stmt::return_stmt(Some(Expr::member(Expr::self_ref(), "width")))],
                ),
                FnDeclStmt::new(
                    "setWidth",
                    vec![int_param("newWidth")],
                    Some(named("none")),
                    vec![Stmt::assign(
                        Expr::member(Expr::self_ref(), "width"),
                        Expr::symbol("newWidth"),
                    )],
                ),
            ],
        ),
        Stmt::var(
            "p",
            Some(named("Rectangle")),
            Expr::new_object("Rectangle", vec![Expr::double(3.0), Expr::int(4)]),
        ),
        Stmt::print(Expr::member_call(Expr::symbol("p"), "getWidth", vec![])),
        Stmt::expression(Expr::member_call(Expr::symbol("p"), "setWidth", vec![Expr::int(15)])),
    ]);
}

#[test]
fn test_classes_with_the_same_name_are_distinct() {
    let error = check_err(vec![
        Stmt::class("S", vec![], vec![], vec![]),
        Stmt::var("outer", None, Expr::new_object("S", vec![])),
        Stmt::while_loop(
            Expr::boolean(true),
            vec![
                Stmt::class("S", vec![], vec![], vec![]),
                Stmt::var("inner", Some(named("S")), Expr::symbol("outer")),
            ],
        ),
    ]);

    assert_eq!(
        error.get_error(),
        &ErrorImpl::TypeMismatch {
            expected: "S".to_string(),
            received: "S".to_string(),
        }
    );
}

// Options

#[test]
fn test_nesting_limit() {
    let mut expr = Expr::int(1);
    for _ in 0..10 {
        expr = Expr::binary(Expr::int(1), BinaryOperator::Plus, expr);
    }
    let program = Program::new(vec![Stmt::print(expr)]);

    let error = match type_check_with_options(&program, &TypeCheckOptions { max_depth: 4 }) {
        Ok(_) => panic!("expected nesting error"),
        Err(error) => error,
    };
    assert_eq!(error.get_error(), &ErrorImpl::NestingTooDeep { limit: 4 });

    assert!(type_check(&program).is_ok());
}

/// `print(1 + (1 + (... + 1)))` with `operators` additions.
fn nested_sum(operators: usize) -> Program {
    let mut expr = Expr::int(1);
    for _ in 0..operators {
        expr = Expr::binary(Expr::int(1), BinaryOperator::Plus, expr);
    }
    Program::new(vec![Stmt::print(expr)])
}

#[test]
fn test_default_nesting_limit_is_reachable() {
    let limit = TypeCheckOptions::default().max_depth;

    // The print statement and the innermost literal add two levels.
    assert!(type_check(&nested_sum(limit - 2)).is_ok());

    let error = match type_check(&nested_sum(limit - 1)) {
        Ok(_) => panic!("expected nesting error"),
        Err(error) => error,
    };
    assert_eq!(error.get_error(), &ErrorImpl::NestingTooDeep { limit });
}

#[test]
fn test_independent_runs_share_no_state() {
    let body = vec![Stmt::var("x", None, Expr::int(1))];

    assert!(check(body.clone()).is_ok());
    assert!(check(body).is_ok());
}

#[test]
fn test_typed_tree_uses_resolved_types() {
    let program = check_ok(vec![Stmt::var(
        "x",
        Some(named("booty")),
        Expr::binary(Expr::int(1), BinaryOperator::Less, Expr::int(2)),
    )]);

    let TypedStmt::VarDecl(declaration) = &program.body[0] else {
        panic!("expected a variable declaration");
    };
    assert!(matches!(declaration.var_type, Type::Scalar(_)));
    assert!(declaration.assigned_value.get_type().is_boolean());
}
