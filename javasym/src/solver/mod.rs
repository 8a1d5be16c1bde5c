//! Type solver strategies
//!
//! A [`TypeSolver`] maps a type name to its declaration. The resolver
//! threads one solver handle through every call and never cares where
//! declarations come from: the source tree ([`AstTypeSolver`]), the
//! built-in library registry ([`LibraryTypeSolver`]), or an ordered
//! composition of both ([`CombinedTypeSolver`]).

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::decl::library::{LibraryTypeDeclaration, LibraryTypes};
use crate::decl::source::AstClassDeclaration;
use crate::decl::TypeDeclaration;
use crate::symbol::SymbolReference;

/// Pluggable strategy mapping a bare or qualified type name to a type
/// declaration. "Not found" is an unsolved reference, never an error.
pub trait TypeSolver {
    fn solve_type(&self, name: &str) -> SymbolReference<Rc<dyn TypeDeclaration>>;
}

/// Solves names against the top-level classes of one or more syntax trees.
pub struct AstTypeSolver {
    asts: Vec<Rc<Ast>>,
    by_name: HashMap<String, (usize, NodeId)>,
}

impl AstTypeSolver {
    pub fn new(ast: Rc<Ast>) -> Self {
        let mut solver = Self {
            asts: Vec::new(),
            by_name: HashMap::new(),
        };
        solver.add(ast);
        solver
    }

    /// Adds another tree; its classes are indexed by simple and qualified
    /// name. Earlier trees win on collisions.
    pub fn add(&mut self, ast: Rc<Ast>) {
        let tree_index = self.asts.len();
        for id in ast.ids() {
            let NodeKind::ClassDecl { name, .. } = ast.kind(id) else {
                continue;
            };
            self.by_name
                .entry(name.clone())
                .or_insert((tree_index, id));
            if let Some(package) = enclosing_package(&ast, id) {
                self.by_name
                    .entry(format!("{package}.{name}"))
                    .or_insert((tree_index, id));
            }
        }
        self.asts.push(ast);
    }
}

fn enclosing_package(ast: &Ast, class: NodeId) -> Option<String> {
    let unit = ast.enclosing(class, |k| matches!(k, NodeKind::CompilationUnit { .. }))?;
    match ast.kind(unit) {
        NodeKind::CompilationUnit { package, .. } => package.clone(),
        _ => None,
    }
}

impl TypeSolver for AstTypeSolver {
    fn solve_type(&self, name: &str) -> SymbolReference<Rc<dyn TypeDeclaration>> {
        match self.by_name.get(name) {
            Some((tree, id)) => SymbolReference::solved(Rc::new(AstClassDeclaration::new(
                Rc::clone(&self.asts[*tree]),
                *id,
            )) as Rc<dyn TypeDeclaration>),
            None => SymbolReference::unsolved(),
        }
    }
}

/// Solves names against an in-memory library registry.
pub struct LibraryTypeSolver {
    types: LibraryTypes,
}

impl LibraryTypeSolver {
    pub fn new(types: LibraryTypes) -> Self {
        Self { types }
    }
}

impl TypeSolver for LibraryTypeSolver {
    fn solve_type(&self, name: &str) -> SymbolReference<Rc<dyn TypeDeclaration>> {
        match self.types.lookup(name) {
            Some(ty) => {
                SymbolReference::solved(Rc::new(LibraryTypeDeclaration::new(ty))
                    as Rc<dyn TypeDeclaration>)
            }
            None => SymbolReference::unsolved(),
        }
    }
}

/// Tries child solvers in insertion order; the first solved answer wins.
#[derive(Default)]
pub struct CombinedTypeSolver {
    solvers: Vec<Box<dyn TypeSolver>>,
}

impl CombinedTypeSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, solver: impl TypeSolver + 'static) {
        self.solvers.push(Box::new(solver));
    }
}

impl TypeSolver for CombinedTypeSolver {
    fn solve_type(&self, name: &str) -> SymbolReference<Rc<dyn TypeDeclaration>> {
        for solver in &self.solvers {
            let reference = solver.solve_type(name);
            if reference.is_solved() {
                return reference;
            }
        }
        SymbolReference::unsolved()
    }
}
