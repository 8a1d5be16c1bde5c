//! Declarations read from a syntax tree
//!
//! Thin views over arena nodes: each declaration holds the shared tree and
//! the node it describes, and converts declared syntactic types on demand
//! through the resolver. Constructing one of these on a node of the wrong
//! kind is a programming error and panics.

use std::rc::Rc;

use crate::ast::{Ast, NodeId, NodeKind, TypeRef};
use crate::error::{ResolveError, Result};
use crate::resolve::SymbolResolver;
use crate::solver::TypeSolver;
use crate::symbol::{SymbolReference, TypeParamDecl};
use crate::usage::TypeUsage;

use super::{MethodDeclaration, TypeDeclaration, ValueDeclaration};

/// A class or interface declared in source.
#[derive(Debug)]
pub struct AstClassDeclaration {
    ast: Rc<Ast>,
    node: NodeId,
}

impl AstClassDeclaration {
    pub fn new(ast: Rc<Ast>, node: NodeId) -> Self {
        assert!(
            matches!(ast.kind(node), NodeKind::ClassDecl { .. }),
            "node {node} is not a class declaration"
        );
        Self { ast, node }
    }

    fn class(&self) -> (&str, &[String], &[NodeId]) {
        match self.ast.kind(self.node) {
            NodeKind::ClassDecl {
                name,
                type_params,
                members,
            } => (name, type_params, members),
            _ => unreachable!("checked at construction"),
        }
    }
}

impl TypeDeclaration for AstClassDeclaration {
    fn name(&self) -> &str {
        self.class().0
    }

    fn qualified_name(&self) -> String {
        let name = self.class().0;
        let unit = self
            .ast
            .enclosing(self.node, |k| matches!(k, NodeKind::CompilationUnit { .. }));
        let package = unit.and_then(|u| match self.ast.kind(u) {
            NodeKind::CompilationUnit { package, .. } => package.clone(),
            _ => None,
        });
        match package {
            Some(package) => format!("{package}.{name}"),
            None => name.to_string(),
        }
    }

    fn type_params(&self) -> Vec<TypeParamDecl> {
        let qualified = self.qualified_name();
        self.class()
            .1
            .iter()
            .map(|p| TypeParamDecl::new(p, qualified.clone()))
            .collect()
    }

    fn field(&self, name: &str) -> SymbolReference<Rc<dyn ValueDeclaration>> {
        for member in self.class().2 {
            let NodeKind::FieldDecl { declarators, .. } = self.ast.kind(*member) else {
                continue;
            };
            for declarator in declarators {
                if let NodeKind::VarDeclarator {
                    name: declared_name,
                    ..
                } = self.ast.kind(*declarator)
                {
                    if declared_name == name {
                        return SymbolReference::solved(Rc::new(AstVariableDeclaration::new(
                            Rc::clone(&self.ast),
                            *declarator,
                        ))
                            as Rc<dyn ValueDeclaration>);
                    }
                }
            }
        }
        SymbolReference::unsolved()
    }

    fn solve_method(
        &self,
        name: &str,
        arg_types: &[TypeUsage],
        _solver: &dyn TypeSolver,
    ) -> Result<SymbolReference<Rc<dyn MethodDeclaration>>> {
        for member in self.class().2 {
            let NodeKind::MethodDecl {
                name: method_name,
                params,
                ..
            } = self.ast.kind(*member)
            else {
                continue;
            };
            if method_name == name && params.len() == arg_types.len() {
                return Ok(SymbolReference::solved(Rc::new(AstMethodDeclaration::new(
                    Rc::clone(&self.ast),
                    *member,
                ))
                    as Rc<dyn MethodDeclaration>));
            }
        }
        Ok(SymbolReference::unsolved())
    }
}

/// A method declared in source.
pub struct AstMethodDeclaration {
    ast: Rc<Ast>,
    node: NodeId,
}

impl AstMethodDeclaration {
    pub fn new(ast: Rc<Ast>, node: NodeId) -> Self {
        assert!(
            matches!(ast.kind(node), NodeKind::MethodDecl { .. }),
            "node {node} is not a method declaration"
        );
        Self { ast, node }
    }

    fn method(&self) -> (&str, &[NodeId], &TypeRef) {
        match self.ast.kind(self.node) {
            NodeKind::MethodDecl {
                name,
                params,
                return_ty,
                ..
            } => (name, params, return_ty),
            _ => unreachable!("checked at construction"),
        }
    }
}

impl MethodDeclaration for AstMethodDeclaration {
    fn name(&self) -> &str {
        self.method().0
    }

    fn declaring_type(&self) -> String {
        self.ast
            .enclosing(self.node, |k| matches!(k, NodeKind::ClassDecl { .. }))
            .map(|class| AstClassDeclaration::new(Rc::clone(&self.ast), class).qualified_name())
            .unwrap_or_default()
    }

    fn arity(&self) -> usize {
        self.method().1.len()
    }

    fn return_type(&self, solver: &dyn TypeSolver) -> Result<TypeUsage> {
        let return_ty = self.method().2.clone();
        SymbolResolver::new(solver).convert_to_usage(&self.ast, &return_ty, self.node)
    }

    fn param_type(&self, index: usize, solver: &dyn TypeSolver) -> Result<TypeUsage> {
        let params = self.method().1;
        let param = *params.get(index).ok_or_else(|| {
            ResolveError::unsupported(format!("parameter {index} of method `{}`", self.name()))
        })?;
        match self.ast.kind(param) {
            NodeKind::Param { ty, .. } => {
                SymbolResolver::new(solver).convert_to_usage(&self.ast, &ty.clone(), param)
            }
            _ => unreachable!("method params are Param nodes"),
        }
    }
}

/// A field or local variable, identified by its declarator node. The
/// declared type lives on the enclosing field or local declaration.
pub struct AstVariableDeclaration {
    ast: Rc<Ast>,
    declarator: NodeId,
}

impl AstVariableDeclaration {
    pub fn new(ast: Rc<Ast>, declarator: NodeId) -> Self {
        assert!(
            matches!(ast.kind(declarator), NodeKind::VarDeclarator { .. }),
            "node {declarator} is not a variable declarator"
        );
        Self { ast, declarator }
    }
}

impl ValueDeclaration for AstVariableDeclaration {
    fn name(&self) -> &str {
        match self.ast.kind(self.declarator) {
            NodeKind::VarDeclarator { name, .. } => name,
            _ => unreachable!("checked at construction"),
        }
    }

    fn type_usage(&self, solver: &dyn TypeSolver) -> Result<TypeUsage> {
        let parent = self.ast.parent(self.declarator).ok_or_else(|| {
            ResolveError::unsupported("declarator without an enclosing declaration")
        })?;
        let ty = match self.ast.kind(parent) {
            NodeKind::FieldDecl { ty, .. } | NodeKind::LocalDecl { ty, .. } => ty.clone(),
            other => {
                return Err(ResolveError::unsupported(format!(
                    "declarator inside {}",
                    other.label()
                )))
            }
        };
        SymbolResolver::new(solver).convert_to_usage(&self.ast, &ty, parent)
    }
}

/// A method parameter.
pub struct AstParamDeclaration {
    ast: Rc<Ast>,
    node: NodeId,
}

impl AstParamDeclaration {
    pub fn new(ast: Rc<Ast>, node: NodeId) -> Self {
        assert!(
            matches!(ast.kind(node), NodeKind::Param { .. }),
            "node {node} is not a parameter"
        );
        Self { ast, node }
    }
}

impl ValueDeclaration for AstParamDeclaration {
    fn name(&self) -> &str {
        match self.ast.kind(self.node) {
            NodeKind::Param { name, .. } => name,
            _ => unreachable!("checked at construction"),
        }
    }

    fn type_usage(&self, solver: &dyn TypeSolver) -> Result<TypeUsage> {
        let ty = match self.ast.kind(self.node) {
            NodeKind::Param { ty, .. } => ty.clone(),
            _ => unreachable!("checked at construction"),
        };
        SymbolResolver::new(solver).convert_to_usage(&self.ast, &ty, self.node)
    }
}

/// A lambda parameter. Its type is never written in source; it derives
/// from the lambda's own resolved usage, which in turn comes from the
/// enclosing call's matched signature.
pub struct AstLambdaParamDeclaration {
    ast: Rc<Ast>,
    lambda: NodeId,
    index: usize,
}

impl AstLambdaParamDeclaration {
    pub fn new(ast: Rc<Ast>, lambda: NodeId, index: usize) -> Self {
        assert!(
            matches!(ast.kind(lambda), NodeKind::Lambda { .. }),
            "node {lambda} is not a lambda"
        );
        Self { ast, lambda, index }
    }
}

impl ValueDeclaration for AstLambdaParamDeclaration {
    fn name(&self) -> &str {
        match self.ast.kind(self.lambda) {
            NodeKind::Lambda { params, .. } => &params[self.index],
            _ => unreachable!("checked at construction"),
        }
    }

    fn type_usage(&self, solver: &dyn TypeSolver) -> Result<TypeUsage> {
        let usage = SymbolResolver::new(solver).get_type(&self.ast, self.lambda)?;
        match usage.parameters().get(self.index) {
            Some(param) => Ok(param.clone()),
            None => Err(ResolveError::unsupported(
                "lambda parameter type requires a generic functional interface",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, Span};
    use crate::decl::library::core_types;
    use crate::solver::{AstTypeSolver, CombinedTypeSolver, LibraryTypeSolver};

    fn sp() -> Span {
        Span::empty()
    }

    /// `package demo; class Box<T> { T value; String label; T unwrap(int n) { .. } }`
    fn fixture() -> (Rc<Ast>, NodeId) {
        let mut b = AstBuilder::new();
        let value = b.var_declarator("value", None, sp());
        let value_field = b.field_decl(TypeRef::named("T"), vec![value], sp());
        let label = b.var_declarator("label", None, sp());
        let label_field = b.field_decl(TypeRef::named("String"), vec![label], sp());
        let n = b.param("n", TypeRef::int(), sp());
        let unwrap = b.method_decl(
            "unwrap",
            vec![],
            vec![n],
            TypeRef::named("T"),
            None,
            sp(),
        );
        let class = b.class_decl(
            "Box",
            vec!["T".to_string()],
            vec![value_field, label_field, unwrap],
            sp(),
        );
        b.compilation_unit(Some("demo".to_string()), vec![], vec![class], sp());
        (Rc::new(b.finish()), class)
    }

    fn solver_for(ast: &Rc<Ast>) -> CombinedTypeSolver {
        let mut combined = CombinedTypeSolver::new();
        combined.add(AstTypeSolver::new(Rc::clone(ast)));
        combined.add(LibraryTypeSolver::new(core_types()));
        combined
    }

    #[test]
    fn test_class_names() {
        let (ast, class) = fixture();
        let decl = AstClassDeclaration::new(Rc::clone(&ast), class);
        assert_eq!(decl.name(), "Box");
        assert_eq!(decl.qualified_name(), "demo.Box");
        let params = decl.type_params();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name(), "T");
        assert_eq!(params[0].container(), "demo.Box");
    }

    #[test]
    fn test_field_lookup_and_types() {
        let (ast, class) = fixture();
        let solver = solver_for(&ast);
        let decl = AstClassDeclaration::new(Rc::clone(&ast), class);

        let label = decl.field("label");
        assert!(label.is_solved());
        let usage = label
            .corresponding_declaration()
            .type_usage(&solver)
            .unwrap();
        assert_eq!(usage.type_name().unwrap(), "String");

        let value = decl.field("value");
        let usage = value
            .corresponding_declaration()
            .type_usage(&solver)
            .unwrap();
        assert!(usage.is_type_variable());
        assert_eq!(usage.as_type_parameter().unwrap().container(), "demo.Box");

        assert!(!decl.field("missing").is_solved());
    }

    #[test]
    fn test_method_lookup_and_signature() {
        let (ast, class) = fixture();
        let solver = solver_for(&ast);
        let decl = AstClassDeclaration::new(Rc::clone(&ast), class);

        let evidence = [TypeUsage::Primitive(crate::ast::PrimitiveKind::Int)];
        let unwrap = decl.solve_method("unwrap", &evidence, &solver).unwrap();
        assert!(unwrap.is_solved());

        let method = unwrap.corresponding_declaration();
        assert_eq!(method.name(), "unwrap");
        assert_eq!(method.arity(), 1);
        assert_eq!(method.declaring_type(), "demo.Box");

        let param = method.param_type(0, &solver).unwrap();
        assert!(param.is_primitive());
        let ret = method.return_type(&solver).unwrap();
        assert!(ret.is_type_variable());
    }

    #[test]
    fn test_method_arity_mismatch_unsolved() {
        let (ast, class) = fixture();
        let solver = solver_for(&ast);
        let decl = AstClassDeclaration::new(Rc::clone(&ast), class);
        let unwrap = decl.solve_method("unwrap", &[], &solver).unwrap();
        assert!(!unwrap.is_solved());
    }
}
