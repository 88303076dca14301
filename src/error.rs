//! Parse diagnostics. Every variant is fatal to the current parse call.

/// The single diagnostic returned by a failed parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: unexpected end of input")]
    UnexpectedEndOfInput { line: usize },
    #[error("line {line}: nested namespaces detected")]
    NestedNamespaceDetected { line: usize },
    #[error("line {line}: unexpected token {found:?}, expected {expected}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },
    #[error("line {line}: expected identifier, found {found:?}")]
    ExpectedIdentifier { found: String, line: usize },
    /// Capability outside the catalog, or a `deriving` clause where none is allowed.
    #[error("line {line}: unknown deriving {deriving:?}")]
    UnknownDeriving { deriving: String, line: usize },
}

impl ParseError {
    pub(crate) fn unexpected(expected: impl Into<String>, found: impl Into<String>, line: usize) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            line,
        }
    }

    /// Source line (1-based) the diagnostic points at.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedEndOfInput { line }
            | ParseError::NestedNamespaceDetected { line }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::ExpectedIdentifier { line, .. }
            | ParseError::UnknownDeriving { line, .. } => *line,
        }
    }
}
