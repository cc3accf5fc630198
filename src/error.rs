use crate::ast::OperatorKey;
use std::fmt;
use thiserror::Error;

/// Error raised by a caller-supplied operator or identifier function.
pub type FunctionError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

/// What the parser was looking for when it hit an unexpected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Operand,
    Operator,
    ClosingParen,
    CommaOrClosingParen,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Expected::Operand => "a number, identifier, '(' or prefix operator",
            Expected::Operator => "a binary or postfix operator",
            Expected::ClosingParen => "an operator or ')'",
            Expected::CommaOrClosingParen => "an operator, ',' or ')'",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("unknown token '{text}' at position {position}")]
    UnknownToken { text: String, position: usize },

    #[error("unexpected {found} at position {position}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: Expected,
        position: usize,
    },

    #[error("unmatched '(' at position {position}")]
    UnmatchedParen { position: usize },

    #[error("unexpected trailing input '{text}' at position {position}")]
    TrailingInput { text: String, position: usize },

    #[error("expression nested too deeply at position {position}")]
    NestingTooDeep { position: usize },

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("'{0}' is a value and cannot be called")]
    NotCallable(String),

    #[error("'{0}' is a function and cannot be used as a value")]
    NotAValue(String),

    #[error("call to '{name}' failed: {source}")]
    CallFailed {
        name: String,
        #[source]
        source: FunctionError,
    },

    #[error("operator {operator} failed: {source}")]
    OperatorFailed {
        operator: OperatorKey,
        #[source]
        source: FunctionError,
    },

    #[error("operator {0} is not registered")]
    UnregisteredOperator(OperatorKey),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Rejected operator definitions, reported when an operator table is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TableError {
    #[error("operator text must not be empty")]
    EmptySymbol,

    #[error("'{0}' is not a valid operator: use only symbol characters or a single word")]
    InvalidSymbol(String),

    #[error("operator {0} is registered more than once")]
    DuplicateOperator(OperatorKey),
}
