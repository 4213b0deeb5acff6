//! CLI support for scrape-filter
//!
//! Plays the spider's role against a JSON schema and JSON items so a filter
//! script can be checked, inspected and tried out without a live spider.

mod check;
mod docs;
mod filter;
mod schema;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use filter::{FilterOptions, FilterSummary, Item, execute_filter, filter_items};
pub use schema::{AttributeDecl, ComponentDecl, SchemaFile, VariableDecl, load_schema};

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    #[error("Schema error: {0}")]
    Schema(#[from] crate::SchemaError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid item on line {line}: {source}")]
    Item {
        line: usize,
        #[source]
        source: Box<CliError>,
    },

    #[error("Cannot read the schema file {}: {source}", .path.display())]
    SchemaFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unknown variable type '{type_name}' for the variable '{variable}'")]
    UnknownType { variable: String, type_name: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON lines to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'sfl docs' to see available categories.")]
    UnknownCategory(String),
}
