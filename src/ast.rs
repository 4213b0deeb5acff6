//! # Scrape Filter Language - Syntax Tree
//!
//! This module defines the syntax tree for SFL, the small expression language
//! an operator uses to tell a spider which scraped components to keep and
//! which run parameters to use.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Comparators and boolean combinators
//! - **[program]** - Clauses, conditions, terms and factors
//!
//! ## Quick Start
//!
//! ```text
//! post { score > 100 and score < 1000 } comment { not (author == "deleted") } @limit = 50
//! ```
//!
//! Keeps posts scoring between 100 and 1000, drops comments by deleted
//! authors and sets the spider's `limit` variable to 50.
//!
//! ## Core Concepts
//!
//! ### Clauses
//!
//! A script is a sequence of clauses, each one of:
//!
//! - **Filter block** `name { condition }` - decides whether items of the
//!   component `name` (or its one-letter symbol) are kept
//! - **Assignment** `@name = literal` - sets a spider variable
//!
//! ### Conditions
//!
//! Inside a block, bare identifiers are attributes of the enclosing
//! component. Terms may chain comparators (`0 < score < 100`) and are joined
//! with `and` / `or`, folded strictly left to right:
//!
//! ```text
//! title == "a" or title == "b" and score > 10
//! // means ((title == "a" or title == "b") and score > 10)
//! ```
//!
//! ### Defaults
//!
//! Components without a block are always kept; variables without an
//! assignment keep their declared default.
pub mod operators;
pub mod program;
pub mod tokens;

pub use operators::{Comparator, Logic};
pub use program::{Clause, Condition, Factor, Literal, Program, Term};
pub use tokens::Token;
