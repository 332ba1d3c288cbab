use thiserror::Error;

/// Error produced by the tokenizer when it meets a character that cannot start
/// or continue a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unexpected character '{found}' at position {position}")]
pub struct TokenizeError {
    pub found: char,
    /// Zero-based character offset into the input.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedCharacter { found: char, position: usize },

    #[error("Malformed expression at position {position}: {reason}")]
    MalformedExpression { position: usize, reason: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Numeric overflow")]
    NumericOverflow,
}

/// The class of an [`EvalError`], without its payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnexpectedCharacter,
    MalformedExpression,
    DivisionByZero,
    NumericOverflow,
}

impl EvalError {
    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        EvalError::MalformedExpression {
            position,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::UnexpectedCharacter { .. } => ErrorKind::UnexpectedCharacter,
            EvalError::MalformedExpression { .. } => ErrorKind::MalformedExpression,
            EvalError::DivisionByZero => ErrorKind::DivisionByZero,
            EvalError::NumericOverflow => ErrorKind::NumericOverflow,
        }
    }

    /// Character offset the error points at, for the kinds that carry one.
    pub fn position(&self) -> Option<usize> {
        match self {
            EvalError::UnexpectedCharacter { position, .. }
            | EvalError::MalformedExpression { position, .. } => Some(*position),
            EvalError::DivisionByZero | EvalError::NumericOverflow => None,
        }
    }
}

impl From<TokenizeError> for EvalError {
    fn from(value: TokenizeError) -> Self {
        EvalError::UnexpectedCharacter {
            found: value.found,
            position: value.position,
        }
    }
}
