//! Type usages
//!
//! A [`TypeUsage`] describes a type as it appears at one use site, as
//! opposed to its declaration: `List<String>` at a field, `T` inside a
//! generic class, the not-yet-known type of a lambda argument. The enum is
//! closed; adding a variant is a compile-checked extension of every
//! operation below.
//!
//! Operations that are not meaningful for a variant fail with an
//! unsupported-construct error instead of returning a default, so modeling
//! gaps surface at the point they are hit rather than propagating wrong
//! types.

use std::rc::Rc;

use crate::ast::{NodeId, PrimitiveKind};
use crate::decl::{MethodDeclaration, TypeDeclaration};
use crate::error::{ResolveError, Result};
use crate::solver::TypeSolver;
use crate::symbol::{SymbolReference, TypeParamDecl};

/// A type at a use site.
#[derive(Clone)]
pub enum TypeUsage {
    /// Application of a declared type, possibly with type arguments:
    /// `String`, `Map<String, Integer>`.
    Declared(DeclaredType),
    /// Reference to a generic type parameter. Carries identity only; it has
    /// no resolvable shape of its own.
    TypeVariable(TypeParamDecl),
    /// Stand-in for a lambda argument whose type depends on the call-site
    /// position, used while collecting argument-type evidence.
    LambdaPlaceholder,
    /// A primitive: `int`, `boolean`, ...
    Primitive(PrimitiveKind),
}

/// Payload of [`TypeUsage::Declared`].
#[derive(Clone)]
pub struct DeclaredType {
    decl: Rc<dyn TypeDeclaration>,
    type_args: Vec<TypeUsage>,
    /// Node at which this usage was formed, when recorded.
    context: Option<NodeId>,
}

impl DeclaredType {
    pub fn new(decl: Rc<dyn TypeDeclaration>, type_args: Vec<TypeUsage>) -> Self {
        Self {
            decl,
            type_args,
            context: None,
        }
    }

    pub fn declaration(&self) -> &Rc<dyn TypeDeclaration> {
        &self.decl
    }
}

impl TypeUsage {
    /// A declared application without type arguments.
    pub fn of(decl: Rc<dyn TypeDeclaration>) -> Self {
        TypeUsage::Declared(DeclaredType::new(decl, Vec::new()))
    }

    /// A declared application with type arguments, in source order.
    pub fn applied(decl: Rc<dyn TypeDeclaration>, type_args: Vec<TypeUsage>) -> Self {
        TypeUsage::Declared(DeclaredType::new(decl, type_args))
    }

    /// Records the node this usage was formed at. No-op for variants that
    /// carry no context.
    pub fn with_context(mut self, node: NodeId) -> Self {
        if let TypeUsage::Declared(declared) = &mut self {
            declared.context = Some(node);
        }
        self
    }

    // -- classification -----------------------------------------------------

    /// Whether this usage is an array. Not answerable for type variables
    /// and lambda placeholders, which carry no shape.
    pub fn is_array(&self) -> Result<bool> {
        match self {
            TypeUsage::Declared(_) | TypeUsage::Primitive(_) => Ok(false),
            TypeUsage::TypeVariable(_) => {
                Err(ResolveError::unsupported("is_array on a type variable"))
            }
            TypeUsage::LambdaPlaceholder => {
                Err(ResolveError::unsupported("is_array on a lambda placeholder"))
            }
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeUsage::Primitive(_))
    }

    pub fn is_reference_type(&self) -> bool {
        matches!(self, TypeUsage::Declared(_))
    }

    pub fn is_type_variable(&self) -> bool {
        matches!(self, TypeUsage::TypeVariable(_))
    }

    pub fn is_function_or_predicate(&self) -> bool {
        match self {
            TypeUsage::LambdaPlaceholder => true,
            TypeUsage::Declared(declared) => declared
                .decl
                .qualified_name()
                .starts_with("java.util.function."),
            _ => false,
        }
    }

    // -- partial accessors --------------------------------------------------

    /// Canonical (simple) name. Fails for variants without one.
    pub fn type_name(&self) -> Result<&str> {
        match self {
            TypeUsage::Declared(declared) => Ok(declared.decl.name()),
            TypeUsage::Primitive(kind) => Ok(kind.keyword()),
            TypeUsage::TypeVariable(_) => {
                Err(ResolveError::unsupported("type_name on a type variable"))
            }
            TypeUsage::LambdaPlaceholder => Err(ResolveError::unsupported(
                "type_name on a lambda placeholder",
            )),
        }
    }

    /// The non-generic root of this usage: the declared application with
    /// its type arguments stripped.
    pub fn base_type(&self) -> Result<TypeUsage> {
        match self {
            TypeUsage::Declared(declared) => Ok(TypeUsage::Declared(DeclaredType {
                decl: Rc::clone(&declared.decl),
                type_args: Vec::new(),
                context: declared.context,
            })),
            other => Err(ResolveError::unsupported(format!(
                "base_type on {}",
                other.variant_label()
            ))),
        }
    }

    /// The node this usage was formed at, where recorded.
    pub fn context(&self) -> Result<NodeId> {
        match self {
            TypeUsage::Declared(DeclaredType {
                context: Some(node),
                ..
            }) => Ok(*node),
            _ => Err(ResolveError::unsupported("usage carries no context")),
        }
    }

    /// Method resolution scoped to this type.
    pub fn solve_method(
        &self,
        name: &str,
        arg_types: &[TypeUsage],
        solver: &dyn TypeSolver,
    ) -> Result<SymbolReference<Rc<dyn MethodDeclaration>>> {
        match self {
            TypeUsage::Declared(declared) => declared.decl.solve_method(name, arg_types, solver),
            other => Err(ResolveError::unsupported(format!(
                "method resolution on {}",
                other.variant_label()
            ))),
        }
    }

    /// Ordered type-argument usages; empty when none.
    pub fn parameters(&self) -> &[TypeUsage] {
        match self {
            TypeUsage::Declared(declared) => &declared.type_args,
            _ => &[],
        }
    }

    /// Downcast to a type-parameter reference.
    pub fn as_type_parameter(&self) -> Result<&TypeParamDecl> {
        match self {
            TypeUsage::TypeVariable(param) => Ok(param),
            other => Err(ResolveError::unsupported(format!(
                "as_type_parameter on {}",
                other.variant_label()
            ))),
        }
    }

    fn variant_label(&self) -> &'static str {
        match self {
            TypeUsage::Declared(_) => "a declared type",
            TypeUsage::TypeVariable(_) => "a type variable",
            TypeUsage::LambdaPlaceholder => "a lambda placeholder",
            TypeUsage::Primitive(_) => "a primitive",
        }
    }
}

impl std::fmt::Display for TypeUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeUsage::Declared(declared) => {
                write!(f, "{}", declared.decl.name())?;
                if !declared.type_args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in declared.type_args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeUsage::TypeVariable(param) => write!(f, "{param}"),
            TypeUsage::LambdaPlaceholder => write!(f, "<lambda>"),
            TypeUsage::Primitive(kind) => write!(f, "{kind}"),
        }
    }
}

impl std::fmt::Debug for TypeUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeUsage::Declared(declared) => f
                .debug_struct("Declared")
                .field("type", &declared.decl.qualified_name())
                .field("type_args", &declared.type_args)
                .field("context", &declared.context)
                .finish(),
            TypeUsage::TypeVariable(param) => f.debug_tuple("TypeVariable").field(param).finish(),
            TypeUsage::LambdaPlaceholder => f.write_str("LambdaPlaceholder"),
            TypeUsage::Primitive(kind) => f.debug_tuple("Primitive").field(kind).finish(),
        }
    }
}

/// Structural equality: declared applications compare by qualified name and
/// type arguments; the forming context is ignored.
impl PartialEq for TypeUsage {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeUsage::Declared(a), TypeUsage::Declared(b)) => {
                a.decl.qualified_name() == b.decl.qualified_name() && a.type_args == b.type_args
            }
            (TypeUsage::TypeVariable(a), TypeUsage::TypeVariable(b)) => a == b,
            (TypeUsage::LambdaPlaceholder, TypeUsage::LambdaPlaceholder) => true,
            (TypeUsage::Primitive(a), TypeUsage::Primitive(b)) => a == b,
            _ => false,
        }
    }
}
