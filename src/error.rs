// ABOUTME: Error types for reading and evaluating Lisp expressions

use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_THREE: &str = "3";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";

/// Errors produced by the reader while turning text into a `Value` tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error at position {position}: {kind}")]
pub struct ParseError {
    pub position: usize,
    pub kind: ParseErrorKind,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unmatched closing paren")]
    UnmatchedParen,
    #[error("unexpected end of input inside a list")]
    UnterminatedList,
    #[error("unexpected end of input inside a string literal")]
    UnterminatedString,
    #[error("no expression found")]
    EmptyInput,
    #[error("malformed input: {0}")]
    Malformed(String),
}

impl ParseError {
    pub fn new(position: usize, kind: ParseErrorKind) -> Self {
        ParseError { position, kind }
    }
}

/// Errors produced by the evaluator.
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// Wrong number of arguments to a Procedure or Builtin.
    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    ArityError {
        function: String,
        expected: String,
        actual: usize,
    },

    /// A builtin received an argument of a disallowed tag.
    #[error("{function}: {message}")]
    TypeError { function: String, message: String },

    /// The head of a combination is not a callable value.
    #[error("not callable: {0}")]
    NotCallable(String),

    /// The value pool is saturated.
    #[error("value pool exhausted")]
    PoolExhausted,

    /// A symbol had no binding anywhere in the environment chain. Only
    /// raised when strict mode is enabled (`config::set_strict`); by
    /// default unbound symbols resolve to Nil.
    #[error("unbound symbol: {0}")]
    UnboundSymbol(String),
}

impl EvalError {
    pub fn arity(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::ArityError {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    pub fn type_error(function: &str, message: impl Into<String>) -> Self {
        EvalError::TypeError {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
