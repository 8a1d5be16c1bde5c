//! Integration tests for the resolution pipeline
//!
//! Each test builds a small syntax tree the way a parser would have
//! produced it, wires up the solvers, and resolves through the public
//! facade:
//! - name resolution and shadowing
//! - method-call resolution, scoped and unscoped
//! - generics round-trips
//! - lambda placeholder behavior
//! - unsolved vs. unsupported failure modes

use std::rc::Rc;

use javasym::ast::{Ast, AstBuilder, BinOp, LiteralKind, NodeId, Span, TypeRef};
use javasym::decl::library::core_types;
use javasym::error::ResolveError;
use javasym::solver::{AstTypeSolver, CombinedTypeSolver, LibraryTypeSolver};
use javasym::SymbolResolver;

fn sp() -> Span {
    Span::empty()
}

/// Source-tree solver backed by the core-library registry.
fn solver_for(ast: &Rc<Ast>) -> CombinedTypeSolver {
    let mut combined = CombinedTypeSolver::new();
    combined.add(AstTypeSolver::new(Rc::clone(ast)));
    combined.add(LibraryTypeSolver::new(core_types()));
    combined
}

/// `class A { int f(String s) { return s.length(); } }`
///
/// Returns the tree, the `s.length()` call and the `s` name node.
fn length_call_fixture() -> (Rc<Ast>, NodeId, NodeId) {
    let mut b = AstBuilder::new();
    let s = b.name("s", Span::new(40, 41));
    let call = b.method_call(Some(s), "length", vec![], Span::new(40, 50));
    let ret = b.return_stmt(Some(call), Span::new(33, 51));
    let body = b.block(vec![ret], Span::new(31, 53));
    let param = b.param("s", TypeRef::named("String"), Span::new(16, 24));
    let f = b.method_decl("f", vec![], vec![param], TypeRef::int(), Some(body), Span::new(10, 53));
    let class = b.class_decl("A", vec![], vec![f], Span::new(0, 55));
    b.compilation_unit(None, vec![], vec![class], Span::new(0, 55));
    (Rc::new(b.finish()), call, s)
}

/// `class A { List<String> list; int g() { list.stream().map(x -> x.length()); } }`
///
/// Returns the tree, the lambda node and the `x` use inside its body.
fn stream_map_fixture() -> (Rc<Ast>, NodeId, NodeId) {
    let mut b = AstBuilder::new();
    let x_use = b.name("x", sp());
    let lambda_body = b.method_call(Some(x_use), "length", vec![], sp());
    let lambda = b.lambda(vec!["x".to_string()], lambda_body, sp());

    let list = b.name("list", sp());
    let stream = b.method_call(Some(list), "stream", vec![], sp());
    let map = b.method_call(Some(stream), "map", vec![lambda], sp());
    let stmt = b.expr_stmt(map, sp());
    let body = b.block(vec![stmt], sp());

    let g = b.method_decl("g", vec![], vec![], TypeRef::int(), Some(body), sp());
    let declarator = b.var_declarator("list", None, sp());
    let field = b.field_decl(
        TypeRef::generic("List", vec![TypeRef::named("String")]),
        vec![declarator],
        sp(),
    );
    let class = b.class_decl("A", vec![], vec![field, g], sp());
    b.compilation_unit(None, vec![], vec![class], sp());
    (Rc::new(b.finish()), lambda, x_use)
}

// ============================================
// End-to-end method call resolution
// ============================================

#[test]
fn test_length_call_resolves_to_primitive_int() {
    let (ast, call, _) = length_call_fixture();
    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let usage = resolver.get_type(&ast, call).unwrap();
    assert!(usage.is_primitive());
    assert_eq!(usage.type_name().unwrap(), "int");
}

#[test]
fn test_parameter_resolves_to_declared_type() {
    let (ast, _, s) = length_call_fixture();
    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let usage = resolver.get_type(&ast, s).unwrap();
    assert!(usage.is_reference_type());
    assert_eq!(usage.type_name().unwrap(), "String");
}

#[test]
fn test_solve_call_finds_library_method() {
    let (ast, call, _) = length_call_fixture();
    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let reference = resolver.solve_call(&ast, call).unwrap();
    assert!(reference.is_solved());
    let method = reference.corresponding_declaration();
    assert_eq!(method.name(), "length");
    assert_eq!(method.declaring_type(), "java.lang.String");
}

#[test]
fn test_unscoped_call_resolves_in_enclosing_class() {
    // class A { String label; String id(String v) { ... } int g() { id(label); } }
    let mut b = AstBuilder::new();
    let label_use = b.name("label", sp());
    let call = b.method_call(None, "id", vec![label_use], sp());
    let stmt = b.expr_stmt(call, sp());
    let body = b.block(vec![stmt], sp());
    let g = b.method_decl("g", vec![], vec![], TypeRef::int(), Some(body), sp());

    let v = b.param("v", TypeRef::named("String"), sp());
    let id = b.method_decl("id", vec![], vec![v], TypeRef::named("String"), None, sp());

    let declarator = b.var_declarator("label", None, sp());
    let field = b.field_decl(TypeRef::named("String"), vec![declarator], sp());

    let class = b.class_decl("A", vec![], vec![field, id, g], sp());
    b.compilation_unit(None, vec![], vec![class], sp());
    let ast = Rc::new(b.finish());

    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let usage = resolver.get_type(&ast, call).unwrap();
    assert_eq!(usage.type_name().unwrap(), "String");
}

// ============================================
// Determinism
// ============================================

#[test]
fn test_resolution_is_deterministic() {
    let (ast, call, s) = length_call_fixture();
    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let first = resolver.get_type(&ast, call).unwrap();
    let second = resolver.get_type(&ast, call).unwrap();
    assert_eq!(first, second);

    let first = resolver.solve_name(&ast, s).unwrap();
    let second = resolver.solve_name(&ast, s).unwrap();
    assert!(first.is_solved() && second.is_solved());
    assert_eq!(
        first.corresponding_declaration().name(),
        second.corresponding_declaration().name()
    );
}

// ============================================
// Shadowing
// ============================================

#[test]
fn test_local_shadows_field_end_to_end() {
    // class A { int x; int f() { String x = ..; x; } }
    let mut b = AstBuilder::new();
    let field_x = b.var_declarator("x", None, sp());
    let field = b.field_decl(TypeRef::int(), vec![field_x], sp());

    let local_x = b.var_declarator("x", None, sp());
    let local = b.local_decl(TypeRef::named("String"), vec![local_x], sp());
    let x_use = b.name("x", sp());
    let stmt = b.expr_stmt(x_use, sp());
    let body = b.block(vec![local, stmt], sp());
    let f = b.method_decl("f", vec![], vec![], TypeRef::int(), Some(body), sp());
    let class = b.class_decl("A", vec![], vec![field, f], sp());
    b.compilation_unit(None, vec![], vec![class], sp());
    let ast = Rc::new(b.finish());

    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    // The local's String, never the field's int.
    let usage = resolver.get_type(&ast, x_use).unwrap();
    assert_eq!(usage.type_name().unwrap(), "String");
    assert!(!usage.is_primitive());
}

// ============================================
// Generics round-trip
// ============================================

#[test]
fn test_generic_conversion_round_trip() {
    // class A { Map<String, Integer> table; }
    let mut b = AstBuilder::new();
    let declarator = b.var_declarator("table", None, sp());
    let field = b.field_decl(
        TypeRef::generic(
            "Map",
            vec![TypeRef::named("String"), TypeRef::named("Integer")],
        ),
        vec![declarator],
        sp(),
    );
    let class = b.class_decl("A", vec![], vec![field], sp());
    b.compilation_unit(None, vec![], vec![class], sp());
    let ast = Rc::new(b.finish());

    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let usage = resolver.get_type(&ast, declarator).unwrap();
    assert_eq!(usage.type_name().unwrap(), "Map");

    let args = usage.parameters();
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].type_name().unwrap(), "String");
    assert_eq!(args[1].type_name().unwrap(), "Integer");

    let base = usage.base_type().unwrap();
    assert_eq!(base.type_name().unwrap(), "Map");
    assert!(base.parameters().is_empty());
}

// ============================================
// Lambda placeholder
// ============================================

#[test]
fn test_lambda_type_comes_from_matched_signature() {
    let (ast, lambda, _) = stream_map_fixture();
    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    // map's declared parameter 0 is Function<T, R>; resolving the lambda
    // must terminate and hand that usage back, re-anchored at the lambda.
    let usage = resolver.get_type(&ast, lambda).unwrap();
    assert_eq!(usage.type_name().unwrap(), "Function");
    assert_eq!(usage.parameters().len(), 2);
    assert!(usage.is_function_or_predicate());
    assert_eq!(usage.context().unwrap(), lambda);
}

#[test]
fn test_lambda_parameter_resolves_without_recursion() {
    let (ast, _, x_use) = stream_map_fixture();
    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    // x is Function<T, R>'s first type argument: the stream's element
    // parameter T, unsubstituted.
    let usage = resolver.get_type(&ast, x_use).unwrap();
    assert!(usage.is_type_variable());
    assert_eq!(usage.as_type_parameter().unwrap().name(), "T");
}

#[test]
fn test_lambda_outside_call_argument_is_unsupported() {
    // A lambda used as a call scope, not an argument: `(x -> x).apply(y)`.
    let mut b = AstBuilder::new();
    let x_use = b.name("x", sp());
    let lambda = b.lambda(vec!["x".to_string()], x_use, sp());
    let y_use = b.name("y", sp());
    let call = b.method_call(Some(lambda), "apply", vec![y_use], sp());
    let stmt = b.expr_stmt(call, sp());
    let body = b.block(vec![stmt], sp());
    let f = b.method_decl("f", vec![], vec![], TypeRef::int(), Some(body), sp());
    let class = b.class_decl("A", vec![], vec![f], sp());
    b.compilation_unit(None, vec![], vec![class], sp());
    let ast = Rc::new(b.finish());

    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let err = resolver.get_type(&ast, lambda).unwrap_err();
    assert!(err.is_unsupported());
}

// ============================================
// Failure modes
// ============================================

#[test]
fn test_unsolved_name_propagates() {
    let mut b = AstBuilder::new();
    let ghost = b.name("ghost", Span::new(5, 10));
    let stmt = b.expr_stmt(ghost, sp());
    let body = b.block(vec![stmt], sp());
    let f = b.method_decl("f", vec![], vec![], TypeRef::int(), Some(body), sp());
    let class = b.class_decl("A", vec![], vec![f], sp());
    b.compilation_unit(None, vec![], vec![class], sp());
    let ast = Rc::new(b.finish());

    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let reference = resolver.solve_name(&ast, ghost).unwrap();
    assert!(!reference.is_solved());

    let err = resolver.get_type(&ast, ghost).unwrap_err();
    assert!(err.is_unsolved());
    match err {
        ResolveError::UnsolvedSymbol { name, .. } => assert_eq!(name, "ghost"),
        other => panic!("expected UnsolvedSymbol, got {other:?}"),
    }
}

#[test]
fn test_unsolved_argument_fails_the_enclosing_call() {
    // s.concat(ghost): typing the argument fails, so the call fails too.
    let mut b = AstBuilder::new();
    let s = b.name("s", sp());
    let ghost = b.name("ghost", sp());
    let call = b.method_call(Some(s), "concat", vec![ghost], sp());
    let stmt = b.expr_stmt(call, sp());
    let body = b.block(vec![stmt], sp());
    let param = b.param("s", TypeRef::named("String"), sp());
    let f = b.method_decl("f", vec![], vec![param], TypeRef::int(), Some(body), sp());
    let class = b.class_decl("A", vec![], vec![f], sp());
    b.compilation_unit(None, vec![], vec![class], sp());
    let ast = Rc::new(b.finish());

    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let err = resolver.get_type(&ast, call).unwrap_err();
    assert!(err.is_unsolved());
}

#[test]
fn test_unsupported_node_is_not_unsolved() {
    let mut b = AstBuilder::new();
    let one = b.literal(LiteralKind::Int(1), sp());
    let two = b.literal(LiteralKind::Int(2), sp());
    let sum = b.binary(one, BinOp::Add, two, sp());
    let stmt = b.expr_stmt(sum, sp());
    let body = b.block(vec![stmt], sp());
    let f = b.method_decl("f", vec![], vec![], TypeRef::int(), Some(body), sp());
    let class = b.class_decl("A", vec![], vec![f], sp());
    b.compilation_unit(None, vec![], vec![class], sp());
    let ast = Rc::new(b.finish());

    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let err = resolver.get_type(&ast, sum).unwrap_err();
    assert!(err.is_unsupported());
    assert!(!err.is_unsolved());

    // Literals have no rule either, and fail the same way.
    let err = resolver.get_type(&ast, one).unwrap_err();
    assert!(err.is_unsupported());
}

// ============================================
// Object creation and source types
// ============================================

#[test]
fn test_object_creation_of_source_class() {
    // package demo; class B {} class A { int f() { new B(); } }
    let mut b = AstBuilder::new();
    let class_b = b.class_decl("B", vec![], vec![], sp());
    let new_b = b.object_creation(TypeRef::named("B"), vec![], sp());
    let stmt = b.expr_stmt(new_b, sp());
    let body = b.block(vec![stmt], sp());
    let f = b.method_decl("f", vec![], vec![], TypeRef::int(), Some(body), sp());
    let class_a = b.class_decl("A", vec![], vec![f], sp());
    b.compilation_unit(Some("demo".to_string()), vec![], vec![class_b, class_a], sp());
    let ast = Rc::new(b.finish());

    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let usage = resolver.get_type(&ast, new_b).unwrap();
    assert_eq!(usage.type_name().unwrap(), "B");
}

#[test]
fn test_field_access_resolves_through_receiver() {
    // class A { Integer n; int f() { n.MAX_VALUE; } }
    let mut b = AstBuilder::new();
    let n_use = b.name("n", sp());
    let access = b.field_access(n_use, "MAX_VALUE", sp());
    let stmt = b.expr_stmt(access, sp());
    let body = b.block(vec![stmt], sp());
    let f = b.method_decl("f", vec![], vec![], TypeRef::int(), Some(body), sp());
    let declarator = b.var_declarator("n", None, sp());
    let field = b.field_decl(TypeRef::named("Integer"), vec![declarator], sp());
    let class = b.class_decl("A", vec![], vec![field, f], sp());
    b.compilation_unit(None, vec![], vec![class], sp());
    let ast = Rc::new(b.finish());

    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let usage = resolver.get_type(&ast, access).unwrap();
    assert!(usage.is_primitive());
    assert_eq!(usage.type_name().unwrap(), "int");
}

#[test]
fn test_missing_field_is_unsolved() {
    let mut b = AstBuilder::new();
    let s_use = b.name("s", sp());
    let access = b.field_access(s_use, "nope", sp());
    let stmt = b.expr_stmt(access, sp());
    let body = b.block(vec![stmt], sp());
    let param = b.param("s", TypeRef::named("String"), sp());
    let f = b.method_decl("f", vec![], vec![param], TypeRef::int(), Some(body), sp());
    let class = b.class_decl("A", vec![], vec![f], sp());
    b.compilation_unit(None, vec![], vec![class], sp());
    let ast = Rc::new(b.finish());

    let solver = solver_for(&ast);
    let resolver = SymbolResolver::new(&solver);

    let err = resolver.get_type(&ast, access).unwrap_err();
    assert!(err.is_unsolved());
}

// ============================================
// Serialized trees
// ============================================

#[test]
fn test_resolution_after_json_round_trip() {
    let (ast, call, _) = length_call_fixture();
    let json = serde_json::to_string(&*ast).unwrap();
    let reloaded: Rc<Ast> = Rc::new(serde_json::from_str(&json).unwrap());

    let solver = solver_for(&reloaded);
    let resolver = SymbolResolver::new(&solver);

    let usage = resolver.get_type(&reloaded, call).unwrap();
    assert_eq!(usage.type_name().unwrap(), "int");
}
