use chrono::{TimeZone, Utc};
use recommendations_wall::validation::{
    COMMENT_MAX_CHARS, ReviewRules, TITLE_MAX_CHARS, validate_submission,
};
use serde_json::{Value, json};

fn valid_body() -> Value {
    json!({
        "title": "The Matrix",
        "tag": "Movie",
        "stars": 5,
        "comment": "Mind-bending action!"
    })
}

fn with(field: &str, value: Value) -> Value {
    let mut body = valid_body();
    body[field] = value;
    body
}

#[test]
fn test_valid_submission() {
    let now = Utc.with_ymd_and_hms(2025, 11, 11, 14, 30, 0).unwrap();
    let review = validate_submission(&valid_body(), &ReviewRules::default(), now).unwrap();

    assert_eq!(review.title, "The Matrix");
    assert_eq!(review.tag, "Movie");
    assert_eq!(review.stars, 5);
    assert_eq!(review.comment, "Mind-bending action!");
    assert_eq!(review.timestamp, now);
}

#[test]
fn test_ids_are_fresh() {
    let rules = ReviewRules::default();
    let first = rules.validate(&valid_body()).unwrap();
    let second = rules.validate(&valid_body()).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn test_client_id_and_timestamp_are_ignored() {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let mut body = valid_body();
    body["id"] = json!("00000000-0000-0000-0000-000000000000");
    body["timestamp"] = json!("1999-01-01T00:00:00Z");

    let review = validate_submission(&body, &ReviewRules::default(), now).unwrap();
    assert_ne!(review.id.to_string(), "00000000-0000-0000-0000-000000000000");
    assert_eq!(review.timestamp, now);
}

#[test]
fn test_stars_out_of_range() {
    let rules = ReviewRules::default();
    for stars in [json!(0), json!(6), json!(-1), json!("five"), json!(4.5), json!(true)] {
        let err = rules.validate(&with("stars", stars.clone())).unwrap_err();
        assert!(err.has_field("stars"), "stars {stars} should be rejected");
        assert_eq!(err.errors.len(), 1);
    }
}

#[test]
fn test_stars_numeric_string() {
    let review = ReviewRules::default()
        .validate(&with("stars", json!(" 4 ")))
        .unwrap();
    assert_eq!(review.stars, 4);
}

#[test]
fn test_missing_fields_are_all_reported() {
    let err = ReviewRules::default().validate(&json!({})).unwrap_err();
    for field in ["title", "tag", "stars", "comment"] {
        assert!(err.has_field(field), "missing {field} not reported");
    }
    assert_eq!(err.errors.len(), 4);
}

#[test]
fn test_wrong_types() {
    let rules = ReviewRules::default();

    let err = rules.validate(&with("title", json!(42))).unwrap_err();
    assert_eq!(err.errors[0].field, "title");
    assert_eq!(err.errors[0].message, "must be a string");

    let err = rules.validate(&with("comment", json!(["a"]))).unwrap_err();
    assert!(err.has_field("comment"));

    let err = rules.validate(&json!(["not", "an", "object"])).unwrap_err();
    assert!(err.has_field("body"));
}

#[test]
fn test_blank_text_is_rejected() {
    let rules = ReviewRules::default();
    let err = rules.validate(&with("title", json!("   "))).unwrap_err();
    assert!(err.has_field("title"));

    let err = rules.validate(&with("comment", json!("\u{0}\u{1}"))).unwrap_err();
    assert!(err.has_field("comment"));
}

#[test]
fn test_length_bounds() {
    let rules = ReviewRules::default();

    let title = "a".repeat(TITLE_MAX_CHARS);
    assert!(rules.validate(&with("title", json!(title))).is_ok());
    let title = "a".repeat(TITLE_MAX_CHARS + 1);
    assert!(rules.validate(&with("title", json!(title))).is_err());

    let comment = "b".repeat(COMMENT_MAX_CHARS + 1);
    let err = rules.validate(&with("comment", json!(comment))).unwrap_err();
    assert!(err.has_field("comment"));

    // surrounding whitespace does not count
    let padded = format!("  {}  ", "c".repeat(COMMENT_MAX_CHARS));
    assert!(rules.validate(&with("comment", json!(padded))).is_ok());
}

#[test]
fn test_text_is_trimmed() {
    let review = ReviewRules::default()
        .validate(&with("title", json!("  Dune \n")))
        .unwrap();
    assert_eq!(review.title, "Dune");
}

#[test]
fn test_unexpected_field_is_rejected() {
    let err = ReviewRules::default()
        .validate(&with("rating", json!(5)))
        .unwrap_err();
    assert_eq!(err.errors.len(), 1);
    assert_eq!(err.errors[0].field, "rating");
    assert_eq!(err.errors[0].message, "unexpected field");
}

#[test]
fn test_personal_information_is_rejected() {
    let rules = ReviewRules::default();
    assert!(
        rules
            .validate(&with("comment", json!("write me: me@example.com")))
            .unwrap_err()
            .has_field("comment")
    );
    assert!(
        rules
            .validate(&with("title", json!("555-123-4567")))
            .unwrap_err()
            .has_field("title")
    );
}

#[test]
fn test_markup_is_escaped() {
    let review = ReviewRules::default()
        .validate(&with("comment", json!("<script>alert(1)</script> great")))
        .unwrap();
    assert_eq!(
        review.comment,
        "&lt;script&gt;alert(1)&lt;/script&gt; great"
    );
    assert!(!review.comment.contains('<'));
}

#[test]
fn test_tag_allowlist() {
    let rules = ReviewRules::with_allowed_tags(["Movie", "Book", "Game", "Other"]);

    let review = rules.validate(&with("tag", json!("movie"))).unwrap();
    assert_eq!(review.tag, "Movie");

    let err = rules.validate(&with("tag", json!("Recipe"))).unwrap_err();
    assert!(err.has_field("tag"));
    assert!(err.errors[0].message.contains("Movie, Book, Game, Other"));
}

#[test]
fn test_free_text_tag_without_allowlist() {
    let review = ReviewRules::default()
        .validate(&with("tag", json!("Recipe")))
        .unwrap();
    assert_eq!(review.tag, "Recipe");
}
