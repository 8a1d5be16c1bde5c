//! Error types and reporting

use crate::ast::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Resolution failure.
///
/// The two variants are deliberately distinct: an unsolved symbol is the
/// expected outcome of resolving code that refers to something outside the
/// visible set, while an unsupported construct is a modeling gap whose fix
/// is a new resolution rule. Neither is caught internally; both propagate
/// to the original caller.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("unsolved symbol `{name}`")]
    UnsolvedSymbol {
        name: String,
        /// Description of the scope the lookup started from, when known.
        scope: Option<String>,
        span: Option<Span>,
    },

    #[error("unsupported construct: {construct}")]
    Unsupported {
        construct: String,
        span: Option<Span>,
    },
}

impl ResolveError {
    pub fn unsolved(name: impl Into<String>) -> Self {
        Self::UnsolvedSymbol {
            name: name.into(),
            scope: None,
            span: None,
        }
    }

    pub fn unsolved_in(
        name: impl Into<String>,
        scope: Option<String>,
        span: Option<Span>,
    ) -> Self {
        Self::UnsolvedSymbol {
            name: name.into(),
            scope,
            span,
        }
    }

    pub fn unsupported(construct: impl Into<String>) -> Self {
        Self::Unsupported {
            construct: construct.into(),
            span: None,
        }
    }

    pub fn unsupported_at(construct: impl Into<String>, span: Span) -> Self {
        Self::Unsupported {
            construct: construct.into(),
            span: Some(span),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnsolvedSymbol { span, .. } | Self::Unsupported { span, .. } => *span,
        }
    }

    pub fn is_unsolved(&self) -> bool {
        matches!(self, Self::UnsolvedSymbol { .. })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// Report error with ariadne
pub fn report_error(filename: &str, source: &str, error: &ResolveError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = match error {
        ResolveError::UnsolvedSymbol { .. } => "Unsolved symbol",
        ResolveError::Unsupported { .. } => "Unsupported construct",
    };

    if let Some(span) = error.span() {
        Report::build(ReportKind::Error, (filename, span.start..span.end))
            .with_message(format!("{kind} error"))
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_message(error.to_string())
                    .with_color(Color::Red),
            )
            .finish()
            .print((filename, Source::from(source)))
            .unwrap();
    } else {
        Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{kind}: {error}"))
            .finish()
            .print((filename, Source::from(source)))
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsolved_carries_name() {
        let err = ResolveError::unsolved("foo");
        assert!(err.is_unsolved());
        assert!(err.to_string().contains("foo"));
        assert_eq!(err.span(), None);
    }

    #[test]
    fn test_unsolved_in_carries_scope_and_span() {
        let err = ResolveError::unsolved_in(
            "foo",
            Some("method f".to_string()),
            Some(Span::new(3, 6)),
        );
        assert_eq!(err.span(), Some(Span::new(3, 6)));
        match err {
            ResolveError::UnsolvedSymbol { scope, .. } => {
                assert_eq!(scope.as_deref(), Some("method f"));
            }
            _ => panic!("expected UnsolvedSymbol"),
        }
    }

    #[test]
    fn test_unsupported_is_distinguishable() {
        let err = ResolveError::unsupported_at("binary expression", Span::new(0, 4));
        assert!(err.is_unsupported());
        assert!(!err.is_unsolved());
        assert_eq!(err.span(), Some(Span::new(0, 4)));
    }
}
