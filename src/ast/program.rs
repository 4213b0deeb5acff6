use std::fmt;

use crate::{
    ast::{Comparator, Logic},
    lexer::Position,
};

/// A parsed SFL script.
///
/// Built once by the parser and never mutated afterwards; every evaluation
/// borrows it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub clauses: Vec<Clause>,
}

/// One top-level statement of a script.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Component filter block
    ///
    /// # Example
    /// ```text
    /// post { score > 100 and score < 1000 }
    /// ```
    Filter {
        /// Component name or symbol, as written
        component: String,
        condition: Condition,
        position: Position,
    },

    /// Variable assignment
    ///
    /// # Example
    /// ```text
    /// @limit = 50
    /// ```
    Assign {
        /// Variable name without the `@` prefix
        variable: String,
        value: Literal,
        position: Position,
    },
}

/// `term { ("and" | "or") term }`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub first: Term,
    pub rest: Vec<(Logic, Term)>,
}

/// `["not"] factor { comparator factor }`
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// Negates the whole comparator chain, not its first comparison
    pub negated: bool,
    pub first: Factor,
    pub chain: Vec<(Comparator, Factor)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Factor {
    Literal(Literal),

    /// Attribute of the component whose block encloses it
    Attribute(String),

    /// Parenthesised sub-condition
    Group(Box<Condition>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Program {
    /// Names (or symbols) of every component that has a filter block, in
    /// script order. A component filtered twice is listed twice.
    pub fn filtered_components(&self) -> impl Iterator<Item = &str> {
        self.clauses.iter().filter_map(|clause| match clause {
            Clause::Filter { component, .. } => Some(component.as_str()),
            Clause::Assign { .. } => None,
        })
    }

    /// Names of every assigned variable, in script order.
    pub fn assigned_variables(&self) -> impl Iterator<Item = &str> {
        self.clauses.iter().filter_map(|clause| match clause {
            Clause::Assign { variable, .. } => Some(variable.as_str()),
            Clause::Filter { .. } => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl Condition {
    pub fn single(term: Term) -> Self {
        Condition {
            first: term,
            rest: vec![],
        }
    }

    /// All terms in evaluation order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, term)| term))
    }
}

impl Term {
    pub fn factor(factor: Factor) -> Self {
        Term {
            negated: false,
            first: factor,
            chain: vec![],
        }
    }

    /// All factors in evaluation order.
    pub fn factors(&self) -> impl Iterator<Item = &Factor> {
        std::iter::once(&self.first).chain(self.chain.iter().map(|(_, factor)| factor))
    }
}

// Tree dump used by `sfl check --tree`. One node per line, children
// indented by four spaces.

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "program")?;
        for clause in &self.clauses {
            clause.write_tree(f, 1)?;
        }
        Ok(())
    }
}

fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = depth * 4)
}

impl Clause {
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        indent(f, depth)?;
        match self {
            Clause::Filter {
                component,
                condition,
                ..
            } => {
                writeln!(f, "filter {}", component)?;
                condition.write_tree(f, depth + 1)
            }
            Clause::Assign {
                variable, value, ..
            } => writeln!(f, "assign @{} = {}", variable, value),
        }
    }
}

impl Condition {
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        if self.rest.is_empty() {
            return self.first.write_tree(f, depth);
        }
        indent(f, depth)?;
        writeln!(f, "eval")?;
        self.first.write_tree(f, depth + 1)?;
        for (logic, term) in &self.rest {
            indent(f, depth + 1)?;
            writeln!(f, "{}", logic)?;
            term.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl Term {
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        if !self.negated && self.chain.is_empty() {
            return self.first.write_tree(f, depth);
        }
        indent(f, depth)?;
        if self.negated {
            writeln!(f, "not term")?;
        } else {
            writeln!(f, "term")?;
        }
        self.first.write_tree(f, depth + 1)?;
        for (comparator, factor) in &self.chain {
            indent(f, depth + 1)?;
            writeln!(f, "{}", comparator)?;
            factor.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl Factor {
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Factor::Literal(literal) => {
                indent(f, depth)?;
                writeln!(f, "{}", literal)
            }
            Factor::Attribute(name) => {
                indent(f, depth)?;
                writeln!(f, "attribute {}", name)
            }
            Factor::Group(condition) => {
                indent(f, depth)?;
                writeln!(f, "group")?;
                condition.write_tree(f, depth + 1)
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{}\"", s),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::Boolean(true) => write!(f, "True"),
            Literal::Boolean(false) => write!(f, "False"),
        }
    }
}
