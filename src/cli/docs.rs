//! Documentation content for the sfl CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Variables,
    Schema,
    Evaluation,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "variables" | "variable" | "vars" => Some(Self::Variables),
            "schema" | "schemas" => Some(Self::Schema),
            "evaluation" | "eval" | "rules" => Some(Self::Evaluation),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"SFL DOCUMENTATION

The Scrape Filter Language tells a spider which scraped items to keep and sets
the spider's run parameters. A script is a list of component blocks and
variable assignments:

  post { score > 100 and score < 1000 } comment { not (author == "deleted") } @limit = 50

DOCUMENTATION CATEGORIES

  syntax            Blocks, assignments, literals and identifiers
  operators         Comparison, membership and logical operators
  variables         Assigning typed run parameters with @name = value
  schema            Declaring a spider's components and variables in JSON
  evaluation        Left-to-right rules, defaults and missing values

QUICK REFERENCE

  name { ... }      Filter block for a component (name or one-letter symbol)
  @name = value     Variable assignment
  < <= > >= == !=   Comparators (chainable: 0 < score < 100)
  in, not in        Substring or list membership
  and, or, not      Logic (no precedence, strictly left to right)
  ( ... )           Grouping

Run 'sfl doc <category>' for detailed documentation.
Run 'sfl detail --schema <file>' to list what a spider can filter on.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Variables) => Ok(VARIABLES_DOC),
        Some(DocCategory::Schema) => Ok(SCHEMA_DOC),
        Some(DocCategory::Evaluation) => Ok(EVALUATION_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Blocks and Assignments

COMPONENT BLOCKS
  component { condition }
    Keep an item of the component only when the condition holds.
    The component is named by its full name or its one-letter symbol.

    Example:
      post { score >= 10 }
      p { score >= 10 }

    Constraints:
      - Identifiers inside a block are attributes of that component
      - A block may appear more than once; all of them must pass
      - Components without a block are always kept

VARIABLE ASSIGNMENTS
  @name = literal
    Set a run parameter declared by the spider.

    Example:
      @limit = 50
      @sort = "top"

LITERALS
  "text" or 'text'  String, no escape sequences
  42                Integer
  4.2               Float (digits on both sides of the dot)
  True, False       Boolean (case-sensitive)

  A string may contain the other quote character:
    author == "O'Brien"

IDENTIFIERS
  Letters, digits and underscores, not starting with a digit.
  and, or, not, in, True and False are reserved.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Comparison, Membership and Logic

COMPARISON OPERATORS
  ==    Equal
  !=    Not equal
  <     Less than
  >     Greater than
  <=    Less than or equal
  >=    Greater than or equal

  Examples:
    score >= 18
    author == "deleted"

  Constraints:
    - Integers and floats compare exactly: 10 == 10.0
    - Values of different types are never equal
    - Ordering works on numbers, strings and booleans; anything else is an error

CHAINED COMPARISONS
  0 < score < 100
    Means 0 < score and score < 100. Evaluation stops at the first
    comparison that fails.

MEMBERSHIP
  "cat" in title        Substring test
  flair in "a, b"       Substring test
  not in                Negated membership

LOGICAL OPERATORS
  and, or               Combine terms, strictly left to right
  not                   Negates the whole comparison chain that follows it

  Examples:
    not author == "deleted"
    not (score < 10 or score > 100)
"#;

const VARIABLES_DOC: &str = r#"VARIABLES - Typed Run Parameters

  @name = literal
    Variables are declared by the spider with a type and a default.
    The script's literal is converted to that type.

TYPES
  string      Any literal, converted to text
  integer     Integers, whole floats and numeric strings
  float       Numbers and numeric strings
  boolean     True, False, 1 or 0 (also as "True", "1", ...)
  list        A string split on commas, each part trimmed

  Example:
    @limit = 50
    @sections = "hot, rising"

  Constraints:
    - Unknown variables are an error
    - A literal the type cannot accept is an error naming the variable
    - The last assignment wins
    - Unassigned variables keep their default
"#;

const SCHEMA_DOC: &str = r#"SCHEMA - Declaring a Spider

A schema file lists what a spider scrapes and what it can be told:

  {
    "spider": "reddit",
    "components": [
      { "name": "post", "symbol": "p", "info": "A user post",
        "attributes": [ { "name": "score", "info": "Upvotes" } ] }
    ],
    "variables": [
      { "name": "limit", "type": "integer", "default": 5, "info": "Posts to fetch" }
    ]
  }

  Constraints:
    - Names are identifiers of at least two characters
    - A symbol is a single letter, unique across components
    - Component, attribute (per component) and variable names are unique

ITEMS
  'sfl filter' reads one item per line:

    {"component": "post", "attributes": {"score": 60, "title": "cats"}}

  and writes the items the script keeps, in the same shape.
"#;

const EVALUATION_DOC: &str = r#"EVALUATION - How a Script Decides

ORDER
  and/or have no precedence:
    title == "a" or title == "b" and score > 10
  means
    (title == "a" or title == "b") and score > 10

DEFAULTS
  - A component without a block is kept
  - A variable without an assignment keeps the spider's default

MISSING VALUES
  An attribute the spider did not fill for the current item is skipped:
  the comparison using it is ignored and the rest of the condition decides.
  When nothing in a block can be decided, the item is kept.
  Run with -v debug to see every skipped comparison.

ERRORS
  Unknown components, attributes and variables, and comparisons between
  incompatible types, stop the run with a message naming the culprit.
"#;
