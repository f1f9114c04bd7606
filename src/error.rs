use thiserror::Error;

/// Errors produced while reading a test log.
///
/// `line` is 1-based; it is `0` when a payload is parsed on its own.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read log: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: missing {field}")]
    MissingField { field: &'static str, line: usize },
    #[error("line {line}: `{token}` is not a valid number")]
    BadNumber { token: String, line: usize },
    #[error("line {line}: expected edge as `src,dst,weight`, got `{token}`")]
    BadEdge { token: String, line: usize },
    #[error("line {line}: RESULT without a preceding TEST")]
    ResultWithoutTest { line: usize },
}

impl ParseError {
    /// Re-tags an error from a standalone payload parse with its line in the log.
    pub(crate) fn at_line(self, at: usize) -> Self {
        match self {
            ParseError::MissingField { field, .. } => ParseError::MissingField { field, line: at },
            ParseError::BadNumber { token, .. } => ParseError::BadNumber { token, line: at },
            ParseError::BadEdge { token, .. } => ParseError::BadEdge { token, line: at },
            ParseError::ResultWithoutTest { .. } => ParseError::ResultWithoutTest { line: at },
            other => other,
        }
    }
}
