use std::fmt;

/// Comparison operators allowed between two factors of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Substring or list membership (`in`)
    In,
    /// Negated membership (`not in`)
    NotIn,
}

/// Boolean combinators joining terms of a condition.
///
/// There is no precedence between the two: a condition folds its terms
/// strictly left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Comparator::LessThan => "<",
            Comparator::LessEqual => "<=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterEqual => ">=",
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
            Comparator::In => "in",
            Comparator::NotIn => "not in",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::And => f.write_str("and"),
            Logic::Or => f.write_str("or"),
        }
    }
}
