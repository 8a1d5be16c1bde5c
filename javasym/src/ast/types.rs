//! Syntactic type references
//!
//! A [`TypeRef`] is a type exactly as written in source: `List<String>`,
//! `int`, `T`. Nothing here is resolved; turning a `TypeRef` into a
//! resolved type usage is the job of the conversion routines in
//! [`crate::resolve`].

use serde::{Deserialize, Serialize};

/// A type as written in source, prior to any resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    /// A named class or interface reference, possibly with type arguments:
    /// `String`, `List<String>`, `Map<K, V>`. Whether the name denotes a
    /// declared type or a visible type parameter is decided at conversion
    /// time, not here.
    ClassOrInterface {
        name: String,
        type_args: Vec<TypeRef>,
    },
    /// A primitive keyword: `int`, `boolean`, ...
    Primitive(PrimitiveKind),
    /// A reference wrapper carrying array dimensions. `array_dims == 0`
    /// is a plain wrapper and unwraps to the element type; conversion of
    /// an actual array (`array_dims > 0`) is not modeled.
    Reference {
        elem: Box<TypeRef>,
        array_dims: usize,
    },
}

impl TypeRef {
    /// A named reference without type arguments.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::ClassOrInterface {
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    /// A named reference with type arguments.
    pub fn generic(name: impl Into<String>, type_args: Vec<TypeRef>) -> Self {
        TypeRef::ClassOrInterface {
            name: name.into(),
            type_args,
        }
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive(kind)
    }

    pub fn int() -> Self {
        TypeRef::Primitive(PrimitiveKind::Int)
    }

    pub fn boolean() -> Self {
        TypeRef::Primitive(PrimitiveKind::Boolean)
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::ClassOrInterface { name, type_args } => {
                write!(f, "{name}")?;
                if !type_args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in type_args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeRef::Primitive(kind) => write!(f, "{kind}"),
            TypeRef::Reference { elem, array_dims } => {
                write!(f, "{elem}")?;
                for _ in 0..*array_dims {
                    write!(f, "[]")?;
                }
                Ok(())
            }
        }
    }
}

/// Primitive type keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

impl PrimitiveKind {
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// An import declaration of a compilation unit: `import java.util.List;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDecl {
    /// Fully qualified imported name, e.g. `java.util.List`.
    pub path: String,
}

impl ImportDecl {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The simple name an import makes visible: the last path segment.
    pub fn simple_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }
}
