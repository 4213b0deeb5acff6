// tests/filter_scenarios.rs
//
// Whole-run scenarios: a spider declares its schema, the operator passes a
// script, and items stream through.

use std::{fs, path::PathBuf};

use scrape_filter::cli::{
    self, CheckOptions, CheckResult, CliError, FilterOptions, SchemaFile, filter_items,
};
use scrape_filter::{Registry, Value, VarType};

const REDDIT_SCHEMA: &str = r#"{
    "spider": "reddit",
    "components": [
        { "name": "post", "symbol": "p", "info": "A submission",
          "attributes": [
            { "name": "score", "info": "Upvotes minus downvotes" },
            { "name": "title" },
            { "name": "flair" },
            { "name": "is_video" }
          ] },
        { "name": "comment", "symbol": "c",
          "attributes": [ { "name": "author" }, { "name": "score" } ] },
        { "name": "user", "symbol": "u",
          "attributes": [ { "name": "karma" } ] }
    ],
    "variables": [
        { "name": "limit", "type": "integer", "default": 5, "info": "Posts to fetch" },
        { "name": "sort", "type": "string", "default": "hot" },
        { "name": "nsfw", "type": "boolean", "default": false }
    ]
}"#;

fn reddit(script: &str) -> Registry {
    SchemaFile::from_json(REDDIT_SCHEMA)
        .unwrap()
        .into_registry(script)
        .unwrap()
}

/// Write the schema where `execute_*` can read it
fn schema_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("sfl-{}-{}.json", name, std::process::id()));
    fs::write(&path, REDDIT_SCHEMA).unwrap();
    path
}

// ============================================================================
// Spider API
// ============================================================================

#[test]
fn test_keep_and_drop_with_variable() {
    let mut registry = Registry::new("post { score > 50 } @limit = 10", "reddit").unwrap();
    registry.add_component("post", Some('p'), "").unwrap();
    registry.add_attribute("post", "score", "").unwrap();
    registry
        .add_variable("limit", VarType::Integer, 5, "")
        .unwrap();

    registry.set_attr_values("post", [("score", 60)]).unwrap();
    assert!(registry.should_scrape("post").unwrap());
    assert_eq!(registry.variable("limit").unwrap(), &Value::Integer(10));

    registry.set_attr_values("post", [("score", 10)]).unwrap();
    assert!(!registry.should_scrape("post").unwrap());
    assert_eq!(registry.variable("limit").unwrap(), &Value::Integer(10));
}

#[test]
fn test_apostrophe_in_double_quotes() {
    let mut registry = reddit(r#"comment { author == "O'Brien" }"#);

    registry
        .set_attr_values("comment", [("author", "O'Brien")])
        .unwrap();
    assert!(registry.should_scrape("comment").unwrap());

    registry
        .set_attr_values("comment", [("author", "OBrien")])
        .unwrap();
    assert!(!registry.should_scrape("comment").unwrap());
}

#[test]
fn test_unterminated_quote_fails_before_scraping() {
    let err = SchemaFile::from_json(REDDIT_SCHEMA)
        .unwrap()
        .into_registry(r#"comment { author == "O'Brien }"#)
        .unwrap_err();
    assert!(matches!(err, CliError::Parse(_)));
}

#[test]
fn test_reddit_run() {
    let script = r#"
        p { score > 100 and score < 1000 and not is_video }
        c { not (author == "deleted") and score >= 0 }
        @limit = 50
        @sort = "top"
    "#;
    let mut registry = reddit(script);
    registry.validate().unwrap();

    let posts = vec![
        (500, false, true),
        (500, true, false),
        (5000, false, false),
        (50, false, false),
    ];
    for (score, is_video, expected) in posts {
        registry
            .set_attr_values(
                "p",
                [("score", Value::from(score)), ("is_video", Value::from(is_video))],
            )
            .unwrap();
        assert_eq!(
            registry.should_scrape("post").unwrap(),
            expected,
            "score={} is_video={}",
            score,
            is_video
        );
    }

    registry
        .set_attr_values("c", [("author", Value::from("deleted")), ("score", Value::from(2))])
        .unwrap();
    assert!(!registry.should_scrape("comment").unwrap());

    // Not filtered at all
    assert!(registry.should_scrape("user").unwrap());

    assert_eq!(registry.variable("limit").unwrap(), &Value::Integer(50));
    assert_eq!(registry.variable("sort").unwrap(), &Value::from("top"));
    assert_eq!(registry.variable("nsfw").unwrap(), &Value::Boolean(false));
}

#[test]
fn test_one_evaluation_serves_many_queries() {
    let mut registry = reddit("p { score > 1 } c { score > 1 } @limit = 2");
    registry.set_attr_values("post", [("score", 5)]).unwrap();

    let first = registry.decisions().unwrap() as *const _;
    registry.should_scrape("post").unwrap();
    registry.should_scrape("comment").unwrap();
    registry.variable("limit").unwrap();
    let second = registry.decisions().unwrap() as *const _;

    assert_eq!(first, second);
}

#[test]
fn test_registry_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();

    let registry = reddit("p { score > 1 }");
    std::thread::scope(|scope| {
        scope.spawn(|| assert!(registry.should_scrape("user").unwrap()));
    });
}

// ============================================================================
// CLI
// ============================================================================

#[test]
fn test_filter_json_lines() {
    let mut registry = reddit(r#"p { "cat" in title } @limit = 3"#);
    let input = r#"{"component": "post", "attributes": {"title": "My cat", "score": 3}}
{"component": "post", "attributes": {"title": "My dog"}}
{"component": "user", "attributes": {"karma": 10}}
{"component": "post", "attributes": {"score": 8}}"#;

    let summary = filter_items(&mut registry, input).unwrap();

    // The last post has no title, so nothing can be decided and it is kept
    assert_eq!(summary.kept.len(), 3);
    assert_eq!(summary.dropped, 1);
    assert_eq!(summary.kept[1].component, "user");
    assert_eq!(summary.variables["limit"], Value::Integer(3));
}

#[test]
fn test_execute_check() {
    let schema = schema_file("check");

    let result = cli::execute_check(&CheckOptions {
        script: "p { score > 1 }".to_string(),
        schema: Some(schema.clone()),
    })
    .unwrap();
    assert!(matches!(result, CheckResult::SchemaValid(_)));
    assert!(result.program().to_string().contains("attribute score"));

    let err = cli::execute_check(&CheckOptions {
        script: "p { karma > 1 }".to_string(),
        schema: Some(schema),
    })
    .unwrap_err();
    assert!(matches!(err, CliError::Eval(_)));
}

#[test]
fn test_execute_check_without_schema() {
    let result = cli::execute_check(&CheckOptions {
        script: "anything { at_all > 1 }".to_string(),
        schema: None,
    })
    .unwrap();
    assert!(matches!(result, CheckResult::SyntaxValid(_)));
}

#[test]
fn test_execute_filter() {
    let summary = cli::execute_filter(&FilterOptions {
        script: "u { karma >= 100 }".to_string(),
        schema: schema_file("filter"),
        input: Some(
            "{\"component\": \"user\", \"attributes\": {\"karma\": 99}}\n\
             {\"component\": \"user\", \"attributes\": {\"karma\": 100}}"
                .to_string(),
        ),
    })
    .unwrap();

    assert_eq!(summary.kept.len(), 1);
    assert_eq!(summary.kept[0].attributes["karma"], 100);
}

#[test]
fn test_execute_filter_needs_input() {
    let err = cli::execute_filter(&FilterOptions {
        script: String::new(),
        schema: schema_file("noinput"),
        input: None,
    })
    .unwrap_err();
    assert!(matches!(err, CliError::NoInput));
}

#[test]
fn test_missing_schema_file() {
    let err = cli::load_schema(&PathBuf::from("/nonexistent/sfl/schema.json"), "").unwrap_err();
    assert!(matches!(err, CliError::SchemaFile { .. }));
}

#[test]
fn test_detail_from_schema() {
    let detail = reddit("").detail();
    assert!(detail.starts_with("Spider: reddit\n"));
    assert!(detail.contains("post (p):\n    A submission\n"));
    assert!(detail.contains("        Info : Upvotes minus downvotes\n"));
    assert!(detail.contains("@nsfw:\n    Input type    : boolean\n    Default value : False\n"));
}
