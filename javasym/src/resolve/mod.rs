//! Resolution facade
//!
//! [`SymbolResolver`] answers "what does this node refer to, and what type
//! does it have" by dispatching on the node's kind. The dispatch is closed:
//! every supported kind has an explicit rule below, and anything else is
//! rejected with an unsupported-construct error so that gaps surface
//! instead of degrading silently.
//!
//! Resolution recurses freely (typing a method call types its arguments,
//! which may be calls or lambdas themselves), so the entry point grows the
//! stack on demand rather than trusting the AST to be shallow. The one
//! deliberate cycle-breaker: a lambda argument is represented by a
//! placeholder while its enclosing call is being resolved, because the
//! lambda's own type depends on that very call's matched signature.

use std::rc::Rc;

use crate::ast::{Ast, NodeId, NodeKind, TypeRef};
use crate::context::context_for;
use crate::decl::{MethodDeclaration, TypeDeclaration, ValueDeclaration};
use crate::error::{ResolveError, Result};
use crate::solver::TypeSolver;
use crate::symbol::SymbolReference;
use crate::usage::TypeUsage;

const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// Stateless resolution over one type solver handle.
///
/// Cheap to construct; recursive and nested resolutions share the same
/// solver reference.
pub struct SymbolResolver<'a> {
    type_solver: &'a dyn TypeSolver,
}

impl<'a> SymbolResolver<'a> {
    pub fn new(type_solver: &'a dyn TypeSolver) -> Self {
        Self { type_solver }
    }

    /// Resolves a bare name expression to its value declaration.
    pub fn solve_name(
        &self,
        ast: &Rc<Ast>,
        node: NodeId,
    ) -> Result<SymbolReference<Rc<dyn ValueDeclaration>>> {
        match ast.kind(node) {
            NodeKind::Name { name } => Ok(context_for(ast, node).solve_symbol(name)),
            other => Err(ResolveError::unsupported_at(
                format!("symbol resolution on {}", other.label()),
                ast.span(node),
            )),
        }
    }

    /// Computes the type usage of an expression or declarator node.
    ///
    /// Fails with an unsolved-symbol error when a required name has no
    /// binding, and with an unsupported-construct error when the node's
    /// kind has no resolution rule.
    pub fn get_type(&self, ast: &Rc<Ast>, node: NodeId) -> Result<TypeUsage> {
        // Grow stack if we're running low
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.get_type_inner(ast, node)
        })
    }

    fn get_type_inner(&self, ast: &Rc<Ast>, node: NodeId) -> Result<TypeUsage> {
        match ast.kind(node) {
            NodeKind::Name { name } => {
                let context = context_for(ast, node);
                let reference = context.solve_symbol(name);
                if !reference.is_solved() {
                    return Err(ResolveError::unsolved_in(
                        name,
                        context.describe(),
                        Some(ast.span(node)),
                    ));
                }
                reference
                    .corresponding_declaration()
                    .type_usage(self.type_solver)
            }

            NodeKind::MethodCall { name, .. } => {
                // The type of a call is the declared return type of the
                // resolved callee.
                let reference = self.solve_call(ast, node)?;
                if !reference.is_solved() {
                    return Err(ResolveError::unsolved_in(
                        name,
                        context_for(ast, node).describe(),
                        Some(ast.span(node)),
                    ));
                }
                reference
                    .corresponding_declaration()
                    .return_type(self.type_solver)
            }

            NodeKind::Lambda { .. } => {
                let parent = ast.parent(node).ok_or_else(|| {
                    ResolveError::unsupported_at("lambda without a parent node", ast.span(node))
                })?;
                let NodeKind::MethodCall {
                    name: call_name, ..
                } = ast.kind(parent)
                else {
                    return Err(ResolveError::unsupported_at(
                        "lambda outside a method call argument",
                        ast.span(node),
                    ));
                };
                let position = ast.arg_position(parent, node).ok_or_else(|| {
                    ResolveError::unsupported_at(
                        "lambda is not a direct call argument",
                        ast.span(node),
                    )
                })?;
                // Resolving the enclosing call sees this lambda as a
                // placeholder, so this does not recurse back here.
                let reference = self.solve_call(ast, parent)?;
                if !reference.is_solved() {
                    return Err(ResolveError::unsolved_in(
                        call_name,
                        context_for(ast, parent).describe(),
                        Some(ast.span(parent)),
                    ));
                }
                let usage = reference
                    .corresponding_declaration()
                    .param_type(position, self.type_solver)?;
                Ok(usage.with_context(node))
            }

            NodeKind::VarDeclarator { .. } => {
                let parent = ast.parent(node).ok_or_else(|| {
                    ResolveError::unsupported_at(
                        "declarator without an enclosing declaration",
                        ast.span(node),
                    )
                })?;
                match ast.kind(parent) {
                    NodeKind::FieldDecl { ty, .. } => self.convert_to_usage(ast, ty, parent),
                    other => Err(ResolveError::unsupported_at(
                        format!("variable declarator inside {}", other.label()),
                        ast.span(node),
                    )),
                }
            }

            NodeKind::FieldAccess { scope, field } => {
                let receiver = self.get_type(ast, *scope)?;
                let TypeUsage::Declared(declared) = &receiver else {
                    return Err(ResolveError::unsupported_at(
                        format!("field access on {receiver}"),
                        ast.span(node),
                    ));
                };
                let reference = declared.declaration().field(field);
                if !reference.is_solved() {
                    return Err(ResolveError::unsolved_in(
                        field,
                        Some(format!("type `{}`", declared.declaration().name())),
                        Some(ast.span(node)),
                    ));
                }
                reference
                    .corresponding_declaration()
                    .type_usage(self.type_solver)
            }

            NodeKind::ObjectCreation { ty, .. } => {
                // No constructor overload resolution at this layer; the
                // created type is the converted syntactic type.
                self.convert_to_usage(ast, ty, node)
            }

            other => Err(ResolveError::unsupported_at(
                format!("no resolution rule for {}", other.label()),
                ast.span(node),
            )),
        }
    }

    /// Resolves the callee of a method call from its argument-type
    /// evidence.
    ///
    /// Arguments are typed in source order, except that a lambda argument
    /// contributes [`TypeUsage::LambdaPlaceholder`]: its real type depends
    /// on the signature this very resolution is about to pick, and the
    /// placeholder breaks that cycle while still letting arity matching
    /// and the other, already-typed arguments decide.
    pub fn solve_call(
        &self,
        ast: &Rc<Ast>,
        call: NodeId,
    ) -> Result<SymbolReference<Rc<dyn MethodDeclaration>>> {
        let NodeKind::MethodCall { name, args, .. } = ast.kind(call) else {
            return Err(ResolveError::unsupported_at(
                format!("method resolution on {}", ast.kind(call).label()),
                ast.span(call),
            ));
        };
        let mut evidence = Vec::with_capacity(args.len());
        for arg in args {
            if matches!(ast.kind(*arg), NodeKind::Lambda { .. }) {
                evidence.push(TypeUsage::LambdaPlaceholder);
            } else {
                evidence.push(self.get_type(ast, *arg)?);
            }
        }
        context_for(ast, call).solve_method(name, &evidence, self.type_solver)
    }

    /// Converts a syntactic type to a usage in the scope of `context_node`.
    pub fn convert_to_usage(
        &self,
        ast: &Rc<Ast>,
        ty: &TypeRef,
        context_node: NodeId,
    ) -> Result<TypeUsage> {
        match ty {
            TypeRef::Reference { elem, array_dims } => {
                if *array_dims > 0 {
                    return Err(ResolveError::unsupported_at(
                        "array type",
                        ast.span(context_node),
                    ));
                }
                self.convert_to_usage(ast, elem, context_node)
            }
            TypeRef::Primitive(kind) => Ok(TypeUsage::Primitive(*kind)),
            TypeRef::ClassOrInterface { name, type_args } => {
                let context = context_for(ast, context_node);
                if type_args.is_empty() {
                    if let Some(param) = context.solve_type_param(name) {
                        return Ok(TypeUsage::TypeVariable(param));
                    }
                }
                let reference = context.solve_type(name, self.type_solver);
                if !reference.is_solved() {
                    return Err(ResolveError::unsolved_in(
                        name,
                        context.describe(),
                        Some(ast.span(context_node)),
                    ));
                }
                let decl = Rc::clone(reference.corresponding_declaration());
                let mut args = Vec::with_capacity(type_args.len());
                for arg in type_args {
                    args.push(self.convert_to_usage(ast, arg, context_node)?);
                }
                Ok(TypeUsage::applied(decl, args))
            }
        }
    }

    /// Resolves a syntactic type to its bare declaration, without
    /// type-argument assembly.
    pub fn convert(
        &self,
        ast: &Rc<Ast>,
        ty: &TypeRef,
        context_node: NodeId,
    ) -> Result<Rc<dyn TypeDeclaration>> {
        match ty {
            TypeRef::Reference { elem, array_dims } => {
                if *array_dims > 0 {
                    return Err(ResolveError::unsupported_at(
                        "array type",
                        ast.span(context_node),
                    ));
                }
                self.convert(ast, elem, context_node)
            }
            TypeRef::Primitive(kind) => Err(ResolveError::unsupported_at(
                format!("`{kind}` has no type declaration"),
                ast.span(context_node),
            )),
            TypeRef::ClassOrInterface { name, .. } => {
                let context = context_for(ast, context_node);
                let reference = context.solve_type(name, self.type_solver);
                if !reference.is_solved() {
                    return Err(ResolveError::unsolved_in(
                        name,
                        context.describe(),
                        Some(ast.span(context_node)),
                    ));
                }
                Ok(Rc::clone(reference.corresponding_declaration()))
            }
        }
    }
}
