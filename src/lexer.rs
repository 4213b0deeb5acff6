use std::fmt;

use thiserror::Error;

use crate::ast::Token;

/// Location of a character in the script.
///
/// `offset` counts chars from the start of the input; `line` and `column`
/// are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A token paired with the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: Position,
}

/// Errors raised while tokenizing a script. Each carries the offending text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Unexpected character '{text}' at {position}")]
    UnexpectedChar { text: String, position: Position },

    #[error("Unterminated string {text} at {position}: missing closing quote")]
    UnterminatedString { text: String, position: Position },

    #[error("Invalid number '{text}' at {position}")]
    InvalidNumber { text: String, position: Position },

    #[error("Invalid variable reference '{text}' at {position}: expected '@' followed by a name")]
    InvalidStorable { text: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedChar { position, .. }
            | LexError::UnterminatedString { position, .. }
            | LexError::InvalidNumber { position, .. }
            | LexError::InvalidStorable { position, .. } => *position,
        }
    }

    /// The offending substring of the script.
    pub fn text(&self) -> &str {
        match self {
            LexError::UnexpectedChar { text, .. }
            | LexError::UnterminatedString { text, .. }
            | LexError::InvalidNumber { text, .. }
            | LexError::InvalidStorable { text, .. } => text,
        }
    }
}

fn is_word_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn here(&self) -> Position {
        Position {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_word_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.here();
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == quote {
                return Ok(result);
            }
            result.push(ch);
        }

        Err(LexError::UnterminatedString {
            text: format!("{}{}", quote, result),
            position: start,
        })
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.here();
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // `123abc` is neither a number nor an identifier
        if self.current_char().is_some_and(is_word_char) {
            number.push_str(&self.read_word());
            return Err(LexError::InvalidNumber {
                text: number,
                position: start,
            });
        }

        let invalid = |number: String| LexError::InvalidNumber {
            text: number,
            position: start,
        };

        if is_float {
            number
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| invalid(number))
        } else {
            number
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| invalid(number))
        }
    }

    fn read_storable(&mut self) -> Result<Token, LexError> {
        let start = self.here();
        self.advance(); // Consume '@'

        match self.current_char() {
            Some(ch) if is_word_start(ch) => Ok(Token::Storable(self.read_word())),
            _ => Err(LexError::InvalidStorable {
                text: format!("@{}", self.read_word()),
                position: start,
            }),
        }
    }

    /// Consume `second` if it follows the current char, yielding `double`,
    /// otherwise just the current char, yielding `single`.
    fn one_or_two(&mut self, second: char, double: Token, single: Token) -> Token {
        if self.peek_char(1) == Some(second) {
            self.advance();
            self.advance();
            double
        } else {
            self.advance();
            single
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('{') => {
                self.advance();
                Token::LBrace
            }
            Some('}') => {
                self.advance();
                Token::RBrace
            }
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some('<') => self.one_or_two('=', Token::LtEq, Token::Lt),
            Some('>') => self.one_or_two('=', Token::GtEq, Token::Gt),
            Some('=') => self.one_or_two('=', Token::EqEq, Token::Assign),
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::NotEq
                } else {
                    return Err(LexError::UnexpectedChar {
                        text: "!".to_string(),
                        position: self.here(),
                    });
                }
            }
            Some('"') => Token::String(self.read_string('"')?),
            Some('\'') => Token::String(self.read_string('\'')?),
            Some('@') => self.read_storable()?,
            Some(ch) if is_word_start(ch) => {
                let word = self.read_word();

                match word.as_str() {
                    "True" => Token::Boolean(true),
                    "False" => Token::Boolean(false),
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "in" => Token::In,
                    _ => Token::Identifier(word),
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) => {
                return Err(LexError::UnexpectedChar {
                    text: ch.to_string(),
                    position: self.here(),
                });
            }
        };

        Ok(token)
    }

    /// Tokenize the whole input, keeping the position of every token.
    ///
    /// The last element is always `Token::Eof`.
    pub fn tokenize_spanned(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let position = self.here();
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(Spanned { token, position });
            if done {
                return Ok(tokens);
            }
        }
    }
}

/// Tokenize an SFL script. The result always ends with `Token::Eof`.
///
/// ```
/// use scrape_filter::{ast::Token, lexer::tokenize};
///
/// let tokens = tokenize("@limit = 50").unwrap();
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Storable("limit".to_string()),
///         Token::Assign,
///         Token::Integer(50),
///         Token::Eof,
///     ]
/// );
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Ok(Lexer::new(source)
        .tokenize_spanned()?
        .into_iter()
        .map(|spanned| spanned.token)
        .collect())
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or not in True False");
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Not);
    assert_eq!(lexer.next_token().unwrap(), Token::In);
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(true));
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(false));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_block() {
    let mut lexer = Lexer::new("post { score >= 5 }");
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("post".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::LBrace);
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("score".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::GtEq);
    assert_eq!(lexer.next_token().unwrap(), Token::Integer(5));
    assert_eq!(lexer.next_token().unwrap(), Token::RBrace);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_positions_track_lines() {
    let tokens = Lexer::new("post {\n  score > 1\n}").tokenize_spanned().unwrap();
    let score = &tokens[2];
    assert_eq!(score.token, Token::Identifier("score".to_string()));
    assert_eq!(score.position.line, 2);
    assert_eq!(score.position.column, 3);
    assert_eq!(score.position.offset, 9);
}
