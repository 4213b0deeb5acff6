// tests/lexer_tests.rs

use scrape_filter::ast::Token;
use scrape_filter::lexer::{LexError, Lexer, tokenize};

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("{", Token::LBrace),
        ("}", Token::RBrace),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("<", Token::Lt),
        (">", Token::Gt),
        ("=", Token::Assign),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_two_char_tokens() {
    let test_cases = vec![
        ("==", Token::EqEq),
        ("!=", Token::NotEq),
        ("<=", Token::LtEq),
        (">=", Token::GtEq),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_operators_without_spaces() {
    let tokens = tokenize("score>=5").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Identifier("score".to_string()),
            Token::GtEq,
            Token::Integer(5),
            Token::Eof,
        ]
    );
}

#[test]
fn test_lone_bang_is_an_error() {
    let err = tokenize("score ! 5").unwrap_err();
    assert!(matches!(err, LexError::UnexpectedChar { .. }));
    assert_eq!(err.text(), "!");
    assert_eq!(err.position().column, 7);
}

#[test]
fn test_unknown_character() {
    let err = tokenize("post { score > 5; }").unwrap_err();
    assert_eq!(err.text(), ";");
}

// ============================================================================
// Words
// ============================================================================

#[test]
fn test_keywords_and_identifiers() {
    let tokens = tokenize("not author in tags and True or False").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Not,
            Token::Identifier("author".to_string()),
            Token::In,
            Token::Identifier("tags".to_string()),
            Token::And,
            Token::Boolean(true),
            Token::Or,
            Token::Boolean(false),
            Token::Eof,
        ]
    );
}

#[test]
fn test_booleans_are_case_sensitive() {
    let tokens = tokenize("true TRUE").unwrap();
    assert_eq!(tokens[0], Token::Identifier("true".to_string()));
    assert_eq!(tokens[1], Token::Identifier("TRUE".to_string()));
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let tokens = tokenize("android order index notable").unwrap();
    for token in &tokens[..4] {
        assert!(matches!(token, Token::Identifier(_)), "got {:?}", token);
    }
}

#[test]
fn test_identifier_with_digits_and_underscores() {
    let tokens = tokenize("_up_votes2").unwrap();
    assert_eq!(tokens[0], Token::Identifier("_up_votes2".to_string()));
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_numbers() {
    let test_cases = vec![
        ("0", Token::Integer(0)),
        ("42", Token::Integer(42)),
        ("2.5", Token::Float(2.5)),
        ("100.0", Token::Float(100.0)),
    ];

    for (input, expected) in test_cases {
        let tokens = tokenize(input).unwrap();
        assert_eq!(tokens, vec![expected, Token::Eof], "Failed for input: {}", input);
    }
}

#[test]
fn test_number_followed_by_letters() {
    let err = tokenize("score > 123abc").unwrap_err();
    assert!(matches!(err, LexError::InvalidNumber { .. }));
    assert_eq!(err.text(), "123abc");
}

#[test]
fn test_integer_overflow() {
    let err = tokenize("99999999999999999999").unwrap_err();
    assert!(matches!(err, LexError::InvalidNumber { .. }));
}

#[test]
fn test_trailing_dot_ends_number() {
    let err = tokenize("5.").unwrap_err();
    assert!(matches!(err, LexError::UnexpectedChar { .. }));
    assert_eq!(err.text(), ".");
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_strings() {
    let test_cases = vec![
        ("\"hello\"", "hello"),
        ("'hello'", "hello"),
        ("\"O'Brien\"", "O'Brien"),
        ("'say \"hi\"'", "say \"hi\""),
        ("\"\"", ""),
        ("\"two words\"", "two words"),
    ];

    for (input, expected) in test_cases {
        let tokens = tokenize(input).unwrap();
        assert_eq!(
            tokens,
            vec![Token::String(expected.to_string()), Token::Eof],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_no_escape_processing() {
    let tokens = tokenize(r#""a\nb""#).unwrap();
    assert_eq!(tokens[0], Token::String("a\\nb".to_string()));
}

#[test]
fn test_unterminated_string() {
    let err = tokenize("author == \"O'Brien").unwrap_err();
    assert!(matches!(err, LexError::UnterminatedString { .. }));
    assert_eq!(err.text(), "\"O'Brien");
    assert_eq!(err.position().column, 11);
}

#[test]
fn test_mismatched_quotes() {
    let err = tokenize("title == 'cats\"").unwrap_err();
    assert!(matches!(err, LexError::UnterminatedString { .. }));
}

// ============================================================================
// Variables
// ============================================================================

#[test]
fn test_storable() {
    let tokens = tokenize("@limit = 50").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Storable("limit".to_string()),
            Token::Assign,
            Token::Integer(50),
            Token::Eof,
        ]
    );
}

#[test]
fn test_bare_at_sign() {
    let test_cases = vec!["@ = 5", "@5 = 5", "@"];

    for input in test_cases {
        let err = tokenize(input).unwrap_err();
        assert!(
            matches!(err, LexError::InvalidStorable { .. }),
            "Failed for input: {}",
            input
        );
    }
}

// ============================================================================
// Whole scripts
// ============================================================================

#[test]
fn test_full_script() {
    let script = r#"post { score > 100 and score < 1000 }
comment { not (author == "deleted") }
@limit = 50"#;
    let tokens = tokenize(script).unwrap();

    assert_eq!(tokens.len(), 23);
    assert_eq!(tokens[0], Token::Identifier("post".to_string()));
    assert_eq!(tokens[12], Token::Not);
    assert_eq!(tokens[19], Token::Storable("limit".to_string()));
    assert_eq!(tokens.last(), Some(&Token::Eof));
}

#[test]
fn test_empty_input() {
    assert_eq!(tokenize("").unwrap(), vec![Token::Eof]);
    assert_eq!(tokenize("  \n\t ").unwrap(), vec![Token::Eof]);
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new("x1");
    lexer.next_token().unwrap();
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_spanned_positions() {
    let tokens = Lexer::new("p { a1 }\n@limit = 5").tokenize_spanned().unwrap();
    let storable = &tokens[4];
    assert_eq!(storable.token, Token::Storable("limit".to_string()));
    assert_eq!(storable.position.line, 2);
    assert_eq!(storable.position.column, 1);
    assert_eq!(storable.position.offset, 9);
}
