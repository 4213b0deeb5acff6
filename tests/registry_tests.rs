// tests/registry_tests.rs

use scrape_filter::evaluator::EvalError;
use scrape_filter::{Error, ParseError, Registry, SchemaError, Value, VarType};

fn empty() -> Registry {
    Registry::new("", "reddit").unwrap()
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_declare_and_look_up() {
    let mut registry = empty();
    registry
        .add_component("post", Some('p'), "A user post")
        .unwrap()
        .add_component("comment", None, "")
        .unwrap();
    registry.add_attribute("p", "score", "Upvotes").unwrap();

    let post = registry.get("p").unwrap();
    assert_eq!(post.name(), "post");
    assert_eq!(post.symbol(), Some('p'));
    assert_eq!(post.attribute("score").unwrap().info(), "Upvotes");
    assert!(post.attribute("score").unwrap().value().is_none());

    assert_eq!(registry.get("comment").unwrap().symbol(), None);
    assert!(registry.get("c").is_none());
    assert!(registry.get("video").is_none());
}

#[test]
fn test_duplicate_component() {
    let mut registry = empty();
    registry.add_component("post", Some('p'), "").unwrap();
    assert_eq!(
        registry.add_component("post", Some('q'), "").unwrap_err(),
        SchemaError::DuplicateComponent("post".to_string())
    );
}

#[test]
fn test_duplicate_symbol() {
    let mut registry = empty();
    registry.add_component("post", Some('p'), "").unwrap();
    let err = registry.add_component("poll", Some('p'), "").unwrap_err();
    assert_eq!(
        err,
        SchemaError::DuplicateSymbol {
            symbol: 'p',
            existing: "post".to_string(),
        }
    );
    assert!(err.to_string().contains("post"));
}

#[test]
fn test_duplicate_attribute() {
    let mut registry = empty();
    registry.add_component("post", None, "").unwrap();
    registry.add_attribute("post", "score", "").unwrap();
    assert!(matches!(
        registry.add_attribute("post", "score", ""),
        Err(SchemaError::DuplicateAttribute { .. })
    ));
}

#[test]
fn test_same_attribute_on_two_components() {
    let mut registry = empty();
    registry.add_component("post", None, "").unwrap();
    registry.add_component("comment", None, "").unwrap();
    registry.add_attribute("post", "score", "").unwrap();
    registry.add_attribute("comment", "score", "").unwrap();
}

#[test]
fn test_duplicate_variable() {
    let mut registry = empty();
    registry
        .add_variable("limit", VarType::Integer, 5, "")
        .unwrap();
    assert_eq!(
        registry
            .add_variable("limit", VarType::String, "x", "")
            .unwrap_err(),
        SchemaError::DuplicateVariable("limit".to_string())
    );
}

#[test]
fn test_invalid_names() {
    let test_cases = vec!["p", "2nd", "not", "in", "True", "has space", "dash-ed", ""];

    for name in test_cases {
        let mut registry = empty();
        assert!(
            registry.add_component(name, None, "").is_err(),
            "Failed for name: {:?}",
            name
        );
    }
}

#[test]
fn test_invalid_symbol() {
    let mut registry = empty();
    assert!(matches!(
        registry.add_component("post", Some('1'), ""),
        Err(SchemaError::InvalidSymbol { .. })
    ));
    assert!(matches!(
        registry.add_component("post", Some('_'), ""),
        Err(SchemaError::InvalidSymbol { .. })
    ));
}

#[test]
fn test_attribute_on_unknown_component() {
    let mut registry = empty();
    assert_eq!(
        registry.add_attribute("video", "duration", "").unwrap_err(),
        SchemaError::UnknownComponent("video".to_string())
    );
}

#[test]
fn test_variable_default_is_coerced() {
    let mut registry = empty();
    registry
        .add_variable("limit", VarType::Integer, "25", "")
        .unwrap()
        .add_variable("nsfw", VarType::Boolean, "False", "")
        .unwrap()
        .add_variable("ratio", VarType::Float, 1, "")
        .unwrap()
        .add_variable("sections", VarType::List, "hot,new", "")
        .unwrap()
        .add_variable("author", VarType::String, Value::Null, "")
        .unwrap();

    assert_eq!(registry.variable("limit").unwrap(), &Value::Integer(25));
    assert_eq!(registry.variable("nsfw").unwrap(), &Value::Boolean(false));
    assert_eq!(registry.variable("ratio").unwrap(), &Value::Float(1.0));
    assert_eq!(
        registry.variable("sections").unwrap(),
        &Value::from(vec!["hot", "new"])
    );
    assert_eq!(registry.variable("author").unwrap(), &Value::Null);
}

#[test]
fn test_invalid_default() {
    let mut registry = empty();
    let err = registry
        .add_variable("limit", VarType::Integer, "lots", "")
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDefault { .. }));
    assert!(err.to_string().contains("limit"));
}

// ============================================================================
// Attribute values
// ============================================================================

#[test]
fn test_set_attr_values() {
    let mut registry = empty();
    registry.add_component("post", Some('p'), "").unwrap();
    registry.add_attribute("post", "score", "").unwrap();
    registry.add_attribute("post", "title", "").unwrap();

    registry
        .set_attr_values("p", [("score", Value::from(3)), ("title", Value::from("cats"))])
        .unwrap();
    registry.set_attr_values("post", [("score", 4)]).unwrap();

    let post = registry.get("post").unwrap();
    assert_eq!(post.attribute("score").unwrap().value(), Some(&Value::Integer(4)));
    assert_eq!(post.attribute("title").unwrap().value(), Some(&Value::from("cats")));

    registry.clear_attr_values();
    assert!(registry.get("post").unwrap().attribute("title").unwrap().value().is_none());
}

#[test]
fn test_set_unknown_attribute_changes_nothing() {
    let mut registry = empty();
    registry.add_component("post", None, "").unwrap();
    registry.add_attribute("post", "score", "").unwrap();

    let err = registry
        .set_attr_values("post", [("score", 1), ("upvotes", 2)])
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownAttribute {
            component: "post".to_string(),
            attribute: "upvotes".to_string(),
        }
    );
    assert!(registry.get("post").unwrap().attribute("score").unwrap().value().is_none());
}

#[test]
fn test_set_on_unknown_component() {
    let mut registry = empty();
    assert!(matches!(
        registry.set_attr_values("post", [("score", 1)]),
        Err(SchemaError::UnknownComponent(_))
    ));
}

#[test]
fn test_should_scrape_unknown_component() {
    let registry = empty();
    assert!(matches!(
        registry.should_scrape("post"),
        Err(EvalError::UnboundIdentifier { .. })
    ));
    assert!(matches!(
        registry.variable("limit"),
        Err(EvalError::UnboundIdentifier { .. })
    ));
}

#[test]
fn test_declarations_after_evaluation_are_seen() {
    let mut registry = Registry::new("@limit = 3", "reddit").unwrap();
    assert!(registry.decisions().is_err());

    registry
        .add_variable("limit", VarType::Integer, 5, "")
        .unwrap();
    assert_eq!(registry.variable("limit").unwrap(), &Value::Integer(3));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_syntax_errors_surface_at_construction() {
    assert!(matches!(
        Registry::new("post { score > }", "reddit"),
        Err(ParseError::UnexpectedToken { .. })
    ));
}

#[test]
fn test_validate() {
    let mut registry = Registry::new("p { score > 5 and (title == 'x') } @limit = 4", "reddit").unwrap();
    registry.add_component("post", Some('p'), "").unwrap();
    registry.add_attribute("post", "score", "").unwrap();
    registry.add_attribute("post", "title", "").unwrap();
    registry
        .add_variable("limit", VarType::Integer, 5, "")
        .unwrap();

    registry.validate().unwrap();
}

#[test]
fn test_validate_finds_names_in_groups() {
    let mut registry = Registry::new("post { score > 5 or (upvotes > 3) }", "reddit").unwrap();
    registry.add_component("post", None, "").unwrap();
    registry.add_attribute("post", "score", "").unwrap();

    let err = registry.validate().unwrap_err();
    assert!(err.to_string().contains("upvotes"));
}

#[test]
fn test_validate_checks_assignments() {
    let mut registry = Registry::new("@limit = True", "reddit").unwrap();
    registry
        .add_variable("limit", VarType::Integer, 5, "")
        .unwrap();

    assert!(matches!(
        registry.validate(),
        Err(EvalError::TypeCoercion { .. })
    ));
}

#[test]
fn test_crate_error_wraps_every_stage() {
    fn run() -> scrape_filter::Result<bool> {
        let mut registry = Registry::new("post { score > 5 }", "reddit")?;
        registry.add_component("post", None, "")?;
        registry.add_attribute("post", "score", "")?;
        registry.set_attr_values("post", [("score", 10)])?;
        Ok(registry.should_scrape("post")?)
    }
    assert!(run().unwrap());

    let err: Error = Registry::new("post {", "reddit").unwrap_err().into();
    assert!(matches!(err, Error::Parse(_)));
}

// ============================================================================
// Detail
// ============================================================================

#[test]
fn test_detail() {
    let mut registry = empty();
    registry.add_component("post", Some('p'), "A user post").unwrap();
    registry.add_attribute("post", "score", "Upvotes").unwrap();
    registry.add_attribute("post", "title", "").unwrap();
    registry
        .add_variable("limit", VarType::Integer, 5, "Posts to fetch")
        .unwrap();

    let expected = "\
Spider: reddit

Components:
post (p):
    A user post
    score:
        Info : Upvotes
    title:
        Info : (No info available)

Variables:
@limit:
    Input type    : integer
    Default value : 5
    Info          : Posts to fetch
";
    assert_eq!(registry.detail(), expected);
}

#[test]
fn test_detail_without_declarations() {
    assert_eq!(empty().detail(), "Spider: reddit\n");
}
