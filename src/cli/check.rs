//! Check SFL scripts

use std::path::PathBuf;

use super::{CliError, load_schema};
use crate::{Program, parser};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The SFL script to check
    pub script: String,
    /// Spider schema to resolve names against
    pub schema: Option<PathBuf>,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax is valid; no schema was given
    SyntaxValid(Program),
    /// Syntax is valid and every name resolves in the schema
    SchemaValid(Program),
}

impl CheckResult {
    pub fn program(&self) -> &Program {
        match self {
            CheckResult::SyntaxValid(program) | CheckResult::SchemaValid(program) => program,
        }
    }
}

/// Execute an sfl check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let Some(path) = &options.schema else {
        return Ok(CheckResult::SyntaxValid(parser::parse(&options.script)?));
    };

    let registry = load_schema(path, &options.script)?;
    registry.validate()?;
    Ok(CheckResult::SchemaValid(
        registry.interpreter().program().clone(),
    ))
}
