//! Declaration model
//!
//! Traits describing the named definitions the resolver hands back:
//! types, methods, and values (fields, parameters, locals). Two families
//! implement them: declarations read from a syntax tree ([`source`]) and
//! declarations from an in-memory library registry ([`library`]), the
//! stand-in for precompiled class metadata.

pub mod library;
pub mod source;

use std::rc::Rc;

use crate::error::Result;
use crate::solver::TypeSolver;
use crate::symbol::{SymbolReference, TypeParamDecl};
use crate::usage::TypeUsage;

/// The named definition of a class or interface.
pub trait TypeDeclaration: std::fmt::Debug {
    /// Simple name, e.g. `List`.
    fn name(&self) -> &str;

    /// Qualified name, e.g. `java.util.List`.
    fn qualified_name(&self) -> String;

    /// Declared generic parameters, in declaration order.
    fn type_params(&self) -> Vec<TypeParamDecl>;

    /// Looks up a field by name. Unsolved when absent.
    fn field(&self, name: &str) -> SymbolReference<Rc<dyn ValueDeclaration>>;

    /// Resolves a method scoped to this type by name and argument-type
    /// evidence. Matching is name plus arity; a lambda placeholder
    /// argument is compatible with any parameter. No overload scoring.
    fn solve_method(
        &self,
        name: &str,
        arg_types: &[TypeUsage],
        solver: &dyn TypeSolver,
    ) -> Result<SymbolReference<Rc<dyn MethodDeclaration>>>;
}

/// The declaration of a method.
pub trait MethodDeclaration {
    fn name(&self) -> &str;

    /// Qualified name of the declaring type.
    fn declaring_type(&self) -> String;

    fn arity(&self) -> usize;

    /// The declared return type as a usage. Generic parameter names in the
    /// signature resolve to type-variable usages, unsubstituted.
    fn return_type(&self, solver: &dyn TypeSolver) -> Result<TypeUsage>;

    /// The declared type of the parameter at `index`.
    fn param_type(&self, index: usize, solver: &dyn TypeSolver) -> Result<TypeUsage>;
}

/// The declaration of a value: a field, parameter, or local variable.
pub trait ValueDeclaration {
    fn name(&self) -> &str;

    /// The declared type of this value as a usage.
    fn type_usage(&self, solver: &dyn TypeSolver) -> Result<TypeUsage>;
}
