use log::info;

use crate::{
    ast::Program,
    evaluator::{Decisions, EvalContext, EvalError, Evaluator},
    parser::{self, ParseError},
    registry::Registry,
};

/// Ties the parser and the evaluator together for one script.
///
/// The script is parsed once by [`Interpreter::set`]; every call to
/// [`Interpreter::output`] evaluates the same tree without changing it.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    program: Program,
}

impl Interpreter {
    /// Lex and parse `script`. An empty script filters nothing.
    pub fn set(script: &str) -> Result<Self, ParseError> {
        let program = parser::parse(script)?;
        info!(
            "Parsed the filter script: {} component block(s), {} assignment(s)",
            program.filtered_components().count(),
            program.assigned_variables().count()
        );
        Ok(Interpreter { program })
    }

    /// The parsed script
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Snapshot the registry's components and variables for evaluation.
    pub fn feed<'a>(&self, registry: &'a Registry) -> EvalContext<'a> {
        registry.context()
    }

    pub fn output(&self, ctx: &EvalContext<'_>) -> Result<Decisions, EvalError> {
        Evaluator::new(*ctx).evaluate(&self.program)
    }

    /// Resolve every name and assignment against `ctx` without evaluating
    /// any attribute value.
    pub fn check(&self, ctx: &EvalContext<'_>) -> Result<(), EvalError> {
        Evaluator::new(*ctx).check(&self.program)
    }
}
