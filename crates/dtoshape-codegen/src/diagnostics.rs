use std::fmt;

/// Recoverable problem met during a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A declared type could not be looked up through the provider.
    UnresolvedTypeReference,
    /// A type shape the resolver does not handle.
    UnsupportedConstruct,
}

impl DiagnosticKind {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnresolvedTypeReference => "unresolved type reference",
            DiagnosticKind::UnsupportedConstruct => "unsupported construct",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Problem reported by the resolver before owner context is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: DiagnosticKind,
    pub detail: String,
}

impl Issue {
    pub fn unresolved(detail: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::UnresolvedTypeReference,
            detail: detail.into(),
        }
    }

    pub fn unsupported(detail: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::UnsupportedConstruct,
            detail: detail.into(),
        }
    }
}

/// Diagnostic attached to a conversion result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Qualified name of the type being expanded.
    pub owner: String,
    /// Field being resolved, if the problem is field-scoped.
    pub field: Option<String>,
    pub detail: String,
}

impl Diagnostic {
    pub(crate) fn from_issue(issue: Issue, owner: &str, field: Option<&str>) -> Self {
        Self {
            kind: issue.kind,
            owner: owner.to_string(),
            field: field.map(str::to_string),
            detail: issue.detail,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}.{}: {}: {}", self.owner, field, self.kind, self.detail),
            None => write!(f, "{}: {}: {}", self.owner, self.kind, self.detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_field() {
        let d = Diagnostic::from_issue(Issue::unresolved("com.acme.Gone"), "com.acme.Order", Some("gone"));
        assert_eq!(
            d.to_string(),
            "com.acme.Order.gone: unresolved type reference: com.acme.Gone"
        );
    }

    #[test]
    fn test_display_without_field() {
        let d = Diagnostic::from_issue(Issue::unsupported("deep"), "com.acme.Order", None);
        assert_eq!(d.to_string(), "com.acme.Order: unsupported construct: deep");
    }
}
