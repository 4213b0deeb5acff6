use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Number with a fractional part
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 0.5
    /// ```
    Float(f64),

    /// Integer
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 1000
    /// ```
    Integer(i64),

    /// String literal enclosed in matching single or double quotes
    ///
    /// No escape processing: everything up to the closing quote is kept as is.
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'say "hi"'
    /// "O'Brien"
    /// ```
    String(String),

    /// Boolean values (capitalised)
    ///
    /// # Examples
    /// ```text
    /// True
    /// False
    /// ```
    Boolean(bool),

    // Identifiers and References
    /// Component, component symbol or attribute name
    ///
    /// Must start with an ASCII letter or underscore, followed by ASCII
    /// letters, digits or underscores.
    ///
    /// # Examples
    /// ```text
    /// post
    /// score
    /// tweet_user
    /// ```
    Identifier(String),

    /// Variable reference, stored without its `@` prefix
    ///
    /// # Examples
    /// ```text
    /// @limit          // Storable("limit")
    /// @skip_comments  // Storable("skip_comments")
    /// ```
    Storable(String),

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    /// Membership / substring operator (word)
    ///
    /// # Examples
    /// ```text
    /// "cat" in title
    /// "deleted" not in author
    /// ```
    In,

    /// Assignment of a literal to a variable
    ///
    /// # Examples
    /// ```text
    /// @limit = 50
    /// ```
    Assign,

    // Logical
    /// Logical AND (word, not symbol)
    And,

    /// Logical OR (word, not symbol)
    Or,

    /// Negation (word), also the first half of `not in`
    Not,

    // Delimiters
    /// Opens a component block
    LBrace,

    /// Closes a component block
    RBrace,

    /// Left parenthesis for grouping
    LParen,

    /// Right parenthesis
    RParen,

    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Float(n) => write!(f, "number {}", n),
            Token::Integer(n) => write!(f, "number {}", n),
            Token::String(s) => write!(f, "string \"{}\"", s),
            Token::Boolean(true) => write!(f, "True"),
            Token::Boolean(false) => write!(f, "False"),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::Storable(name) => write!(f, "variable '@{}'", name),
            Token::EqEq => write!(f, "'=='"),
            Token::NotEq => write!(f, "'!='"),
            Token::Lt => write!(f, "'<'"),
            Token::Gt => write!(f, "'>'"),
            Token::LtEq => write!(f, "'<='"),
            Token::GtEq => write!(f, "'>='"),
            Token::In => write!(f, "'in'"),
            Token::Assign => write!(f, "'='"),
            Token::And => write!(f, "'and'"),
            Token::Or => write!(f, "'or'"),
            Token::Not => write!(f, "'not'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
