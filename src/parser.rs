use std::mem;

use thiserror::Error;

use crate::{
    ast::{Clause, Comparator, Condition, Factor, Literal, Logic, Program, Term, Token},
    lexer::{LexError, Lexer, Position, Spanned},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Expected {expected}, got {found} at {position}")]
    UnexpectedToken {
        expected: String,
        found: Token,
        position: Position,
    },

    #[error(
        "The variable '@{variable}' at {position} must be assigned a string, \
        a number or a boolean, got {found}"
    )]
    InvalidAssignment {
        variable: String,
        found: Token,
        position: Position,
    },
}

/// Recursive-descent parser over a fully tokenized script.
///
/// ```text
/// prog       ::= expr EOF
/// expr       ::= { identifier "{" eval "}" | storable "=" (string | number | boolean) }
/// eval       ::= term { ("and" | "or") term }
/// term       ::= ["not"] factor { comparator factor }
/// comparator ::= "<" | "<=" | ">" | ">=" | "==" | "!=" | ["not"] "in"
/// factor     ::= string | number | boolean | identifier | "(" eval ")"
/// ```
pub struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Spanned>) -> Self {
        if tokens.last().is_none_or(|last| last.token != Token::Eof) {
            let position = tokens.last().map(|last| last.position).unwrap_or_default();
            tokens.push(Spanned {
                token: Token::Eof,
                position,
            });
        }
        Parser { tokens, cursor: 0 }
    }

    /// Build a parser from bare tokens. Error positions will all point at
    /// the start of the script.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Parser::new(
            tokens
                .into_iter()
                .map(|token| Spanned {
                    token,
                    position: Position::default(),
                })
                .collect(),
        )
    }

    pub fn from_source(source: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize_spanned()?;
        Ok(Parser::new(tokens))
    }

    fn current(&self) -> &Token {
        &self.tokens[self.cursor].token
    }

    fn position(&self) -> Position {
        self.tokens[self.cursor].position
    }

    fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.cursor + offset).min(last)].token
    }

    fn advance(&mut self) {
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
    }

    /// Take the current token out of the stream and advance.
    fn take(&mut self) -> Token {
        let token = mem::replace(&mut self.tokens[self.cursor].token, Token::Eof);
        self.advance();
        token
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(self.current()) == mem::discriminant(token)
    }

    fn accept(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.accept(&expected) {
            Ok(())
        } else {
            Err(self.unexpected(expected.to_string()))
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: self.current().clone(),
            position: self.position(),
        }
    }

    /// Parse the whole token stream into a program.
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let mut clauses = vec![];

        loop {
            match self.current() {
                Token::Identifier(_) => clauses.push(self.parse_filter()?),
                Token::Storable(_) => clauses.push(self.parse_assignment()?),
                Token::Eof => break,
                _ => {
                    return Err(self.unexpected(
                        "a component block, a variable assignment or end of input",
                    ));
                }
            }
        }

        Ok(Program { clauses })
    }

    fn parse_filter(&mut self) -> Result<Clause, ParseError> {
        let position = self.position();
        let component = match self.take() {
            Token::Identifier(name) => name,
            _ => unreachable!("parse_filter called off an identifier"),
        };

        self.expect(Token::LBrace)?;
        let condition = self.parse_condition()?;
        self.expect(Token::RBrace)?;

        Ok(Clause::Filter {
            component,
            condition,
            position,
        })
    }

    fn parse_assignment(&mut self) -> Result<Clause, ParseError> {
        let position = self.position();
        let variable = match self.take() {
            Token::Storable(name) => name,
            _ => unreachable!("parse_assignment called off a storable"),
        };

        self.expect(Token::Assign)?;

        let value = match self.current() {
            Token::String(_) | Token::Integer(_) | Token::Float(_) | Token::Boolean(_) => {
                self.take_literal()
            }
            found => {
                return Err(ParseError::InvalidAssignment {
                    variable,
                    found: found.clone(),
                    position: self.position(),
                });
            }
        };

        Ok(Clause::Assign {
            variable,
            value,
            position,
        })
    }

    fn take_literal(&mut self) -> Literal {
        match self.take() {
            Token::String(s) => Literal::String(s),
            Token::Integer(n) => Literal::Integer(n),
            Token::Float(n) => Literal::Float(n),
            Token::Boolean(b) => Literal::Boolean(b),
            other => unreachable!("take_literal called off {:?}", other),
        }
    }

    /// eval ::= term { ("and" | "or") term }
    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let first = self.parse_term()?;
        let mut rest = vec![];

        loop {
            let logic = match self.current() {
                Token::And => Logic::And,
                Token::Or => Logic::Or,
                _ => break,
            };
            self.advance();
            rest.push((logic, self.parse_term()?));
        }

        Ok(Condition { first, rest })
    }

    /// term ::= ["not"] factor { comparator factor }
    fn parse_term(&mut self) -> Result<Term, ParseError> {
        let negated = self.accept(&Token::Not);
        let first = self.parse_factor()?;
        let mut chain = vec![];

        while let Some(comparator) = self.parse_comparator()? {
            chain.push((comparator, self.parse_factor()?));
        }

        Ok(Term {
            negated,
            first,
            chain,
        })
    }

    fn parse_comparator(&mut self) -> Result<Option<Comparator>, ParseError> {
        let comparator = match self.current() {
            Token::Lt => Comparator::LessThan,
            Token::LtEq => Comparator::LessEqual,
            Token::Gt => Comparator::GreaterThan,
            Token::GtEq => Comparator::GreaterEqual,
            Token::EqEq => Comparator::Equal,
            Token::NotEq => Comparator::NotEqual,
            Token::In => Comparator::In,
            Token::Not => {
                // Between two factors `not` can only start `not in`
                if *self.peek(1) != Token::In {
                    self.advance();
                    return Err(self.unexpected(Token::In.to_string()));
                }
                self.advance();
                Comparator::NotIn
            }
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(comparator))
    }

    /// factor ::= string | number | boolean | identifier | "(" eval ")"
    fn parse_factor(&mut self) -> Result<Factor, ParseError> {
        match self.current() {
            Token::String(_) | Token::Integer(_) | Token::Float(_) | Token::Boolean(_) => {
                Ok(Factor::Literal(self.take_literal()))
            }
            Token::Identifier(_) => match self.take() {
                Token::Identifier(name) => Ok(Factor::Attribute(name)),
                _ => unreachable!(),
            },
            Token::LParen => {
                self.advance();
                let condition = self.parse_condition()?;
                self.expect(Token::RParen)?;
                Ok(Factor::Group(Box::new(condition)))
            }
            _ => Err(self.unexpected("a string, a number, a boolean, an attribute or '('")),
        }
    }
}

/// Lex and parse a script in one go.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::from_source(source)?.parse()
}
