//! Lookup results and generic type parameters

/// Outcome of a symbol, type, or method lookup.
///
/// Every resolution operation returns one of these instead of an optional
/// declaration: `Unsolved` is an ordinary answer ("just not found"), never
/// an error. Reading the declaration out of an unsolved reference is a
/// programming error and panics; callers check [`is_solved`] first.
///
/// [`is_solved`]: SymbolReference::is_solved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolReference<D> {
    Solved(D),
    Unsolved,
}

impl<D> SymbolReference<D> {
    pub fn solved(declaration: D) -> Self {
        Self::Solved(declaration)
    }

    pub fn unsolved() -> Self {
        Self::Unsolved
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }

    /// The found declaration. Panics if the reference is unsolved.
    pub fn corresponding_declaration(&self) -> &D {
        match self {
            Self::Solved(declaration) => declaration,
            Self::Unsolved => {
                panic!("corresponding_declaration() called on an unsolved reference")
            }
        }
    }
}

/// A generic type parameter: a name plus the declaration that introduced it.
///
/// A type parameter carries no shape of its own; two parameters are the
/// same parameter exactly when both name and declaring container match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParamDecl {
    name: String,
    /// Qualified name of the declaring type or method, e.g.
    /// `java.util.List` for its `T`.
    container: String,
}

impl TypeParamDecl {
    pub fn new(name: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            container: container.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn container(&self) -> &str {
        &self.container
    }
}

impl std::fmt::Display for TypeParamDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solved_reference() {
        let reference = SymbolReference::solved("decl");
        assert!(reference.is_solved());
        assert_eq!(*reference.corresponding_declaration(), "decl");
    }

    #[test]
    fn test_unsolved_reference() {
        let reference: SymbolReference<&str> = SymbolReference::unsolved();
        assert!(!reference.is_solved());
    }

    #[test]
    #[should_panic(expected = "unsolved reference")]
    fn test_unsolved_declaration_access_panics() {
        let reference: SymbolReference<&str> = SymbolReference::unsolved();
        let _ = reference.corresponding_declaration();
    }

    #[test]
    fn test_type_param_identity() {
        let a = TypeParamDecl::new("T", "java.util.List");
        let b = TypeParamDecl::new("T", "java.util.List");
        let c = TypeParamDecl::new("T", "java.util.Map");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
