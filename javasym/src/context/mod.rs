//! Scope contexts
//!
//! [`context_for`] gives the scope at a tree position. Lookups walk the
//! parent chain outward, innermost scope first: locals declared earlier in
//! the enclosing blocks, lambda parameters, method parameters, the
//! enclosing class's fields and type parameters, the compilation unit's own
//! classes and imports, and finally the type solver. Shadowing falls out of
//! the walk order. "Not found" is an unsolved reference, never an error.

use std::rc::Rc;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::decl::source::{
    AstClassDeclaration, AstLambdaParamDeclaration, AstParamDeclaration, AstVariableDeclaration,
};
use crate::decl::{MethodDeclaration, TypeDeclaration, ValueDeclaration};
use crate::error::Result;
use crate::resolve::SymbolResolver;
use crate::solver::TypeSolver;
use crate::symbol::{SymbolReference, TypeParamDecl};
use crate::usage::TypeUsage;

/// The scope context at `node`.
pub fn context_for(ast: &Rc<Ast>, node: NodeId) -> AstContext {
    AstContext {
        ast: Rc::clone(ast),
        node,
    }
}

/// Scope-ordered lookup anchored at one tree position.
pub struct AstContext {
    ast: Rc<Ast>,
    node: NodeId,
}

impl AstContext {
    /// Resolves a bare identifier to the innermost value declaration that
    /// binds it.
    pub fn solve_symbol(&self, name: &str) -> SymbolReference<Rc<dyn ValueDeclaration>> {
        let mut child = self.node;
        while let Some(parent) = self.ast.parent(child) {
            match self.ast.kind(parent) {
                NodeKind::Block { stmts } => {
                    if let Some(declarator) = self.local_before(stmts, child, name) {
                        return SymbolReference::solved(Rc::new(AstVariableDeclaration::new(
                            Rc::clone(&self.ast),
                            declarator,
                        ))
                            as Rc<dyn ValueDeclaration>);
                    }
                }
                NodeKind::Lambda { params, .. } => {
                    if let Some(index) = params.iter().position(|p| p == name) {
                        return SymbolReference::solved(Rc::new(AstLambdaParamDeclaration::new(
                            Rc::clone(&self.ast),
                            parent,
                            index,
                        ))
                            as Rc<dyn ValueDeclaration>);
                    }
                }
                NodeKind::MethodDecl { params, .. } => {
                    for param in params {
                        if let NodeKind::Param {
                            name: param_name, ..
                        } = self.ast.kind(*param)
                        {
                            if param_name == name {
                                return SymbolReference::solved(Rc::new(
                                    AstParamDeclaration::new(Rc::clone(&self.ast), *param),
                                )
                                    as Rc<dyn ValueDeclaration>);
                            }
                        }
                    }
                }
                NodeKind::ClassDecl { .. } => {
                    let class = AstClassDeclaration::new(Rc::clone(&self.ast), parent);
                    let field = class.field(name);
                    if field.is_solved() {
                        return field;
                    }
                }
                _ => {}
            }
            child = parent;
        }
        SymbolReference::unsolved()
    }

    /// The declarator of the innermost local named `name` declared before
    /// `upto` in `stmts`, if any.
    fn local_before(&self, stmts: &[NodeId], upto: NodeId, name: &str) -> Option<NodeId> {
        let mut found = None;
        for stmt in stmts {
            if *stmt == upto {
                break;
            }
            let NodeKind::LocalDecl { declarators, .. } = self.ast.kind(*stmt) else {
                continue;
            };
            for declarator in declarators {
                if let NodeKind::VarDeclarator {
                    name: declared_name,
                    ..
                } = self.ast.kind(*declarator)
                {
                    if declared_name == name {
                        found = Some(*declarator);
                    }
                }
            }
        }
        found
    }

    /// Resolves a type-parameter name visible at this position: the
    /// enclosing method's generic parameters first, then each enclosing
    /// class's.
    pub fn solve_type_param(&self, name: &str) -> Option<TypeParamDecl> {
        for ancestor in std::iter::once(self.node).chain(self.ast.ancestors(self.node)) {
            match self.ast.kind(ancestor) {
                NodeKind::MethodDecl {
                    name: method_name,
                    type_params,
                    ..
                } => {
                    if type_params.iter().any(|p| p == name) {
                        let class = self.enclosing_class_of(ancestor);
                        let container = match class {
                            Some(class) => format!("{}.{method_name}", class.qualified_name()),
                            None => method_name.clone(),
                        };
                        return Some(TypeParamDecl::new(name, container));
                    }
                }
                NodeKind::ClassDecl { type_params, .. } => {
                    if type_params.iter().any(|p| p == name) {
                        let class = AstClassDeclaration::new(Rc::clone(&self.ast), ancestor);
                        return Some(TypeParamDecl::new(name, class.qualified_name()));
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Resolves a type name: the compilation unit's own classes, then its
    /// imports, then the solver.
    pub fn solve_type(
        &self,
        name: &str,
        solver: &dyn TypeSolver,
    ) -> SymbolReference<Rc<dyn TypeDeclaration>> {
        let unit = self
            .ast
            .enclosing(self.node, |k| matches!(k, NodeKind::CompilationUnit { .. }));
        if let Some(unit) = unit {
            if let NodeKind::CompilationUnit { imports, types, .. } = self.ast.kind(unit) {
                for class in types {
                    if let NodeKind::ClassDecl {
                        name: class_name, ..
                    } = self.ast.kind(*class)
                    {
                        if class_name == name {
                            return SymbolReference::solved(Rc::new(AstClassDeclaration::new(
                                Rc::clone(&self.ast),
                                *class,
                            ))
                                as Rc<dyn TypeDeclaration>);
                        }
                    }
                }
                for import in imports {
                    if import.simple_name() == name {
                        let reference = solver.solve_type(&import.path);
                        if reference.is_solved() {
                            return reference;
                        }
                    }
                }
            }
        }
        solver.solve_type(name)
    }

    /// Method resolution at this position. For a call with a scope
    /// expression the receiver's type decides; otherwise the enclosing
    /// class is searched.
    pub fn solve_method(
        &self,
        name: &str,
        arg_types: &[TypeUsage],
        solver: &dyn TypeSolver,
    ) -> Result<SymbolReference<Rc<dyn MethodDeclaration>>> {
        if let NodeKind::MethodCall {
            scope: Some(scope), ..
        } = self.ast.kind(self.node)
        {
            let receiver = SymbolResolver::new(solver).get_type(&self.ast, *scope)?;
            return receiver.solve_method(name, arg_types, solver);
        }
        match self
            .ast
            .enclosing(self.node, |k| matches!(k, NodeKind::ClassDecl { .. }))
        {
            Some(class) => AstClassDeclaration::new(Rc::clone(&self.ast), class)
                .solve_method(name, arg_types, solver),
            None => Ok(SymbolReference::unsolved()),
        }
    }

    /// Human-readable description of the nearest enclosing declaration,
    /// for diagnostics.
    pub fn describe(&self) -> Option<String> {
        for ancestor in std::iter::once(self.node).chain(self.ast.ancestors(self.node)) {
            match self.ast.kind(ancestor) {
                NodeKind::MethodDecl { name, .. } => return Some(format!("method `{name}`")),
                NodeKind::ClassDecl { name, .. } => return Some(format!("class `{name}`")),
                _ => {}
            }
        }
        None
    }

    fn enclosing_class_of(&self, node: NodeId) -> Option<AstClassDeclaration> {
        self.ast
            .enclosing(node, |k| matches!(k, NodeKind::ClassDecl { .. }))
            .map(|class| AstClassDeclaration::new(Rc::clone(&self.ast), class))
    }
}
