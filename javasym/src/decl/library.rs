//! Library-backed declarations
//!
//! An in-memory registry of type signatures standing in for precompiled
//! class metadata: the resolver needs `String`, `List`, `Stream` and
//! friends to answer realistic lookups, but nothing here reads class files.
//! Member signatures are stored as unresolved [`TypeRef`]s and resolved
//! lazily against the active [`TypeSolver`], so registry types may refer to
//! each other (and to source types) freely.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::TypeRef;
use crate::error::{ResolveError, Result};
use crate::solver::TypeSolver;
use crate::symbol::{SymbolReference, TypeParamDecl};
use crate::usage::TypeUsage;

use super::{MethodDeclaration, TypeDeclaration, ValueDeclaration};

/// A registry of library type signatures, keyed by qualified name with a
/// simple-name alias.
#[derive(Debug, Default)]
pub struct LibraryTypes {
    by_qualified: HashMap<String, Rc<LibraryType>>,
    by_simple: HashMap<String, String>,
}

impl LibraryTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ty: LibraryType) {
        let ty = Rc::new(ty);
        self.by_simple
            .insert(ty.name.clone(), ty.qualified.clone());
        self.by_qualified.insert(ty.qualified.clone(), ty);
    }

    /// Looks up by qualified name first, then by simple name.
    pub fn lookup(&self, name: &str) -> Option<Rc<LibraryType>> {
        if let Some(ty) = self.by_qualified.get(name) {
            return Some(Rc::clone(ty));
        }
        let qualified = self.by_simple.get(name)?;
        self.by_qualified.get(qualified).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_qualified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_qualified.is_empty()
    }
}

/// One library type: qualified name, generic parameters, member signatures.
#[derive(Debug)]
pub struct LibraryType {
    qualified: String,
    name: String,
    type_params: Vec<String>,
    fields: Vec<LibraryField>,
    methods: Vec<LibraryMethod>,
}

#[derive(Debug)]
struct LibraryField {
    name: String,
    ty: TypeRef,
}

#[derive(Debug)]
struct LibraryMethod {
    name: String,
    /// Method-level generic parameters, e.g. the `R` of `Stream.map`.
    type_params: Vec<String>,
    params: Vec<TypeRef>,
    ret: TypeRef,
}

impl LibraryType {
    pub fn new(qualified: impl Into<String>) -> Self {
        let qualified = qualified.into();
        let name = qualified
            .rsplit('.')
            .next()
            .unwrap_or(&qualified)
            .to_string();
        Self {
            qualified,
            name,
            type_params: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn type_param(mut self, name: impl Into<String>) -> Self {
        self.type_params.push(name.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(LibraryField {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn method(mut self, name: impl Into<String>, params: Vec<TypeRef>, ret: TypeRef) -> Self {
        self.methods.push(LibraryMethod {
            name: name.into(),
            type_params: Vec::new(),
            params,
            ret,
        });
        self
    }

    /// A method with its own generic parameters.
    pub fn generic_method(
        mut self,
        name: impl Into<String>,
        type_params: Vec<&str>,
        params: Vec<TypeRef>,
        ret: TypeRef,
    ) -> Self {
        self.methods.push(LibraryMethod {
            name: name.into(),
            type_params: type_params.into_iter().map(String::from).collect(),
            params,
            ret,
        });
        self
    }
}

/// Resolves a stored signature type against the active solver. Names bound
/// by the method's or the owner's generic parameters become type-variable
/// usages, unsubstituted; everything else goes through the solver.
fn signature_to_usage(
    ty: &TypeRef,
    owner: &Rc<LibraryType>,
    method: Option<&LibraryMethod>,
    solver: &dyn TypeSolver,
) -> Result<TypeUsage> {
    match ty {
        TypeRef::Reference { elem, array_dims } => {
            if *array_dims > 0 {
                return Err(ResolveError::unsupported("array type in signature"));
            }
            signature_to_usage(elem, owner, method, solver)
        }
        TypeRef::Primitive(kind) => Ok(TypeUsage::Primitive(*kind)),
        TypeRef::ClassOrInterface { name, type_args } => {
            if type_args.is_empty() {
                if let Some(m) = method {
                    if m.type_params.iter().any(|p| p == name) {
                        let container = format!("{}.{}", owner.qualified, m.name);
                        return Ok(TypeUsage::TypeVariable(TypeParamDecl::new(name, container)));
                    }
                }
                if owner.type_params.iter().any(|p| p == name) {
                    return Ok(TypeUsage::TypeVariable(TypeParamDecl::new(
                        name,
                        owner.qualified.clone(),
                    )));
                }
            }
            let reference = solver.solve_type(name);
            if !reference.is_solved() {
                return Err(ResolveError::unsolved(name));
            }
            let decl = Rc::clone(reference.corresponding_declaration());
            let mut args = Vec::with_capacity(type_args.len());
            for arg in type_args {
                args.push(signature_to_usage(arg, owner, method, solver)?);
            }
            Ok(TypeUsage::applied(decl, args))
        }
    }
}

/// [`TypeDeclaration`] over a registry entry.
#[derive(Debug)]
pub struct LibraryTypeDeclaration {
    ty: Rc<LibraryType>,
}

impl LibraryTypeDeclaration {
    pub fn new(ty: Rc<LibraryType>) -> Self {
        Self { ty }
    }
}

impl TypeDeclaration for LibraryTypeDeclaration {
    fn name(&self) -> &str {
        &self.ty.name
    }

    fn qualified_name(&self) -> String {
        self.ty.qualified.clone()
    }

    fn type_params(&self) -> Vec<TypeParamDecl> {
        self.ty
            .type_params
            .iter()
            .map(|p| TypeParamDecl::new(p, self.ty.qualified.clone()))
            .collect()
    }

    fn field(&self, name: &str) -> SymbolReference<Rc<dyn ValueDeclaration>> {
        match self.ty.fields.iter().position(|f| f.name == name) {
            Some(index) => SymbolReference::solved(Rc::new(LibraryFieldDeclaration {
                ty: Rc::clone(&self.ty),
                index,
            }) as Rc<dyn ValueDeclaration>),
            None => SymbolReference::unsolved(),
        }
    }

    fn solve_method(
        &self,
        name: &str,
        arg_types: &[TypeUsage],
        _solver: &dyn TypeSolver,
    ) -> Result<SymbolReference<Rc<dyn MethodDeclaration>>> {
        let found = self
            .ty
            .methods
            .iter()
            .position(|m| m.name == name && m.params.len() == arg_types.len());
        match found {
            Some(index) => Ok(SymbolReference::solved(Rc::new(LibraryMethodDeclaration {
                ty: Rc::clone(&self.ty),
                index,
            })
                as Rc<dyn MethodDeclaration>)),
            None => Ok(SymbolReference::unsolved()),
        }
    }
}

/// [`MethodDeclaration`] over one method signature of a registry entry.
pub struct LibraryMethodDeclaration {
    ty: Rc<LibraryType>,
    index: usize,
}

impl LibraryMethodDeclaration {
    fn method(&self) -> &LibraryMethod {
        &self.ty.methods[self.index]
    }
}

impl MethodDeclaration for LibraryMethodDeclaration {
    fn name(&self) -> &str {
        &self.method().name
    }

    fn declaring_type(&self) -> String {
        self.ty.qualified.clone()
    }

    fn arity(&self) -> usize {
        self.method().params.len()
    }

    fn return_type(&self, solver: &dyn TypeSolver) -> Result<TypeUsage> {
        let method = self.method();
        signature_to_usage(&method.ret, &self.ty, Some(method), solver)
    }

    fn param_type(&self, index: usize, solver: &dyn TypeSolver) -> Result<TypeUsage> {
        let method = self.method();
        let ty = method.params.get(index).ok_or_else(|| {
            ResolveError::unsupported(format!(
                "parameter {index} of {}.{}",
                self.ty.qualified, method.name
            ))
        })?;
        signature_to_usage(ty, &self.ty, Some(method), solver)
    }
}

/// [`ValueDeclaration`] over one field of a registry entry.
pub struct LibraryFieldDeclaration {
    ty: Rc<LibraryType>,
    index: usize,
}

impl ValueDeclaration for LibraryFieldDeclaration {
    fn name(&self) -> &str {
        &self.ty.fields[self.index].name
    }

    fn type_usage(&self, solver: &dyn TypeSolver) -> Result<TypeUsage> {
        signature_to_usage(&self.ty.fields[self.index].ty, &self.ty, None, solver)
    }
}

/// The core-library subset shipped with the crate: enough of `java.lang`,
/// `java.util` and `java.util.stream` for realistic resolution scenarios.
pub fn core_types() -> LibraryTypes {
    let mut lib = LibraryTypes::new();

    lib.insert(
        LibraryType::new("java.lang.Object")
            .method("hashCode", vec![], TypeRef::int())
            .method("equals", vec![TypeRef::named("Object")], TypeRef::boolean())
            .method("toString", vec![], TypeRef::named("String")),
    );

    lib.insert(
        LibraryType::new("java.lang.String")
            .method("length", vec![], TypeRef::int())
            .method("isEmpty", vec![], TypeRef::boolean())
            .method(
                "charAt",
                vec![TypeRef::int()],
                TypeRef::primitive(crate::ast::PrimitiveKind::Char),
            )
            .method(
                "concat",
                vec![TypeRef::named("String")],
                TypeRef::named("String"),
            )
            .method(
                "substring",
                vec![TypeRef::int(), TypeRef::int()],
                TypeRef::named("String"),
            ),
    );

    lib.insert(
        LibraryType::new("java.lang.Integer")
            .field("MAX_VALUE", TypeRef::int())
            .method("intValue", vec![], TypeRef::int()),
    );

    lib.insert(
        LibraryType::new("java.util.List")
            .type_param("T")
            .method("size", vec![], TypeRef::int())
            .method("isEmpty", vec![], TypeRef::boolean())
            .method("get", vec![TypeRef::int()], TypeRef::named("T"))
            .method("add", vec![TypeRef::named("T")], TypeRef::boolean())
            .method(
                "stream",
                vec![],
                TypeRef::generic("Stream", vec![TypeRef::named("T")]),
            ),
    );

    lib.insert(
        LibraryType::new("java.util.ArrayList")
            .type_param("T")
            .method("size", vec![], TypeRef::int())
            .method("get", vec![TypeRef::int()], TypeRef::named("T"))
            .method("add", vec![TypeRef::named("T")], TypeRef::boolean())
            .method(
                "stream",
                vec![],
                TypeRef::generic("Stream", vec![TypeRef::named("T")]),
            ),
    );

    lib.insert(
        LibraryType::new("java.util.Map")
            .type_param("K")
            .type_param("V")
            .method("size", vec![], TypeRef::int())
            .method("isEmpty", vec![], TypeRef::boolean())
            .method("get", vec![TypeRef::named("Object")], TypeRef::named("V"))
            .method(
                "put",
                vec![TypeRef::named("K"), TypeRef::named("V")],
                TypeRef::named("V"),
            )
            .method(
                "containsKey",
                vec![TypeRef::named("Object")],
                TypeRef::boolean(),
            ),
    );

    lib.insert(
        LibraryType::new("java.util.HashMap")
            .type_param("K")
            .type_param("V")
            .method("size", vec![], TypeRef::int())
            .method("get", vec![TypeRef::named("Object")], TypeRef::named("V"))
            .method(
                "put",
                vec![TypeRef::named("K"), TypeRef::named("V")],
                TypeRef::named("V"),
            ),
    );

    lib.insert(
        LibraryType::new("java.util.stream.Stream")
            .type_param("T")
            .generic_method(
                "map",
                vec!["R"],
                vec![TypeRef::generic(
                    "Function",
                    vec![TypeRef::named("T"), TypeRef::named("R")],
                )],
                TypeRef::generic("Stream", vec![TypeRef::named("R")]),
            )
            .method(
                "filter",
                vec![TypeRef::generic("Predicate", vec![TypeRef::named("T")])],
                TypeRef::generic("Stream", vec![TypeRef::named("T")]),
            )
            .method(
                "count",
                vec![],
                TypeRef::primitive(crate::ast::PrimitiveKind::Long),
            ),
    );

    lib.insert(
        LibraryType::new("java.util.function.Function")
            .type_param("T")
            .type_param("R")
            .method("apply", vec![TypeRef::named("T")], TypeRef::named("R")),
    );

    lib.insert(
        LibraryType::new("java.util.function.Predicate")
            .type_param("T")
            .method("test", vec![TypeRef::named("T")], TypeRef::boolean()),
    );

    lib
}
