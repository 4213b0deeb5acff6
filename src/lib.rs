pub mod ast;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod schema;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Program, Token};
pub use error::{Error, Result};
pub use evaluator::{Decisions, EvalContext, EvalError, Evaluator, UnresolvedOperand};
pub use interpreter::Interpreter;
pub use lexer::{LexError, Lexer, Position};
pub use parser::{ParseError, Parser};
pub use registry::Registry;
pub use schema::{Coercion, Component, SchemaError, VarType, Variable};
pub use value::Value;
