use thiserror::Error;

use crate::{evaluator::EvalError, lexer::LexError, parser::ParseError, schema::SchemaError};

/// Any error the crate can return, for callers that do not care which
/// stage failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
