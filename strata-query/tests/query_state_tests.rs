use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use strata_query::{QueryError, QueryState};

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

fn params_for<'a>(params: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

fn query_object(params: &[(String, String)]) -> Value {
    serde_json::from_str(param(params, "query").expect("query param present")).unwrap()
}

// ── Filter accumulation ─────────────────────────────────────────

#[test]
fn reapplied_equality_overwrites() {
    let mut state = QueryState::new("product");
    state.where_equals("title", "first").where_equals("title", "second");
    assert_eq!(query_object(&state.to_params()), json!({"title": "second"}));
}

#[test]
fn comparison_operators_share_operand_container() {
    let mut state = QueryState::new("product");
    state.greater_than("price", 10).less_than("price", 100);

    let query = query_object(&state.to_params());
    assert_eq!(query["price"]["$gt"], json!(10));
    assert_eq!(query["price"]["$lt"], json!(100));
}

#[test]
fn same_comparison_twice_replaces_value() {
    let mut state = QueryState::new("product");
    state.less_than("price", 50).less_than("price", 25);
    assert_eq!(query_object(&state.to_params()), json!({"price": {"$lt": 25}}));
}

#[test]
fn membership_and_existence() {
    let mut state = QueryState::new("product");
    state
        .contained_in("color", vec![json!("red"), json!("blue")])
        .not_contained_in("size", vec![json!("xs")])
        .exists("sku")
        .not_exists("discontinued_at");

    let query = query_object(&state.to_params());
    assert_eq!(query["color"], json!({"$in": ["red", "blue"]}));
    assert_eq!(query["size"], json!({"$nin": ["xs"]}));
    assert_eq!(query["sku"], json!({"$exists": true}));
    assert_eq!(query["discontinued_at"], json!({"$exists": false}));
}

#[test]
fn subquery_embeds_as_string_not_object() {
    let mut sub = QueryState::new("brand");
    sub.where_equals("title", "Apple Inc");

    let mut state = QueryState::new("product");
    state.where_in("brand", &sub);

    let query = query_object(&state.to_params());
    assert_eq!(query["brand"]["$in_query"], json!("{\"title\":\"Apple Inc\"}"));
}

#[test]
fn or_combines_child_filters_only() {
    let mut cheap = QueryState::new("product");
    cheap.less_than("price", 10).limit(3); // pagination must not leak

    let mut premium = QueryState::new("product");
    premium.greater_than("price", 1000).only(["title"]);

    let mut state = QueryState::new("product");
    state.or(&[cheap, premium]);

    let params = state.to_params();
    assert_eq!(
        query_object(&params),
        json!({"$or": [
            {"price": {"$lt": 10}},
            {"price": {"$gt": 1000}}
        ]})
    );
    assert_eq!(param(&params, "limit"), None);
    assert!(params_for(&params, "only[BASE][]").is_empty());
}

// ── Projection ──────────────────────────────────────────────────

#[test]
fn only_accumulates_union() {
    let mut state = QueryState::new("product");
    state.only(["a"]).only(["b"]);
    assert_eq!(params_for(&state.to_params(), "only[BASE][]"), vec!["a", "b"]);
}

#[test]
fn scoped_only_auto_includes_reference() {
    let mut state = QueryState::new("product");
    state.only_with_reference(["x"], "category");

    let params = state.to_params();
    assert_eq!(params_for(&params, "include[]"), vec!["category"]);
    assert_eq!(param(&params, "only"), Some(r#"{"category":["x"]}"#));
}

#[test]
fn include_reference_order_preserved() {
    let mut state = QueryState::new("product");
    state
        .include_reference("related")
        .include_reference("author")
        .include_reference("related");
    assert_eq!(
        params_for(&state.to_params(), "include[]"),
        vec!["related", "author"]
    );
}

// ── Sort, pagination, toggles ───────────────────────────────────

#[test]
fn sort_is_last_set_wins_and_exclusive() {
    let mut state = QueryState::new("product");
    state.order_by_ascending("price").order_by_descending("updated_at");

    let params = state.to_params();
    assert_eq!(param(&params, "desc"), Some("updated_at"));
    assert_eq!(param(&params, "asc"), None);
}

#[test]
fn pagination_and_locale() {
    let mut state = QueryState::new("product");
    state.limit(20).skip(40).locale("fr-fr");

    let params = state.to_params();
    assert_eq!(param(&params, "limit"), Some("20"));
    assert_eq!(param(&params, "skip"), Some("40"));
    assert_eq!(param(&params, "locale"), Some("fr-fr"));
}

#[test]
fn feature_toggles() {
    let mut state = QueryState::new("product");
    state
        .include_count()
        .include_content_type()
        .include_fallback()
        .include_embedded_items()
        .include_reference_content_type_uid();

    let params = state.to_params();
    assert_eq!(param(&params, "include_count"), Some("true"));
    assert_eq!(param(&params, "include_content_type"), Some("true"));
    assert_eq!(param(&params, "include_fallback"), Some("true"));
    assert_eq!(param(&params, "include_embedded_items[]"), Some("BASE"));
    assert_eq!(param(&params, "include_reference_content_type_uid"), Some("true"));
}

#[test]
fn raw_params_merge_last() {
    let mut state = QueryState::new("product");
    state.include_count().add_param("custom_flag", "yes");

    let params = state.to_params();
    let last = params.last().unwrap();
    assert_eq!(last.0, "custom_flag");
    assert_eq!(last.1, "yes");
}

// ── Empty query and validation ──────────────────────────────────

#[test]
fn empty_filter_emits_no_query_parameter() {
    let state = QueryState::new("product");
    assert_eq!(param(&state.to_params(), "query"), None);
}

#[test]
fn empty_field_defers_validation_error() {
    let mut state = QueryState::new("product");
    state.where_equals("", "value");
    assert!(matches!(state.validate(), Err(QueryError::InvalidArgument(_))));
}

#[test]
fn first_deferred_error_wins() {
    let mut state = QueryState::new("product");
    state.where_equals("", "value").less_than(" ", 3);
    let err = state.validate().unwrap_err();
    match err {
        QueryError::InvalidArgument(message) => assert!(message.contains("where_equals")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_content_type_fails_validation() {
    let state = QueryState::new("");
    assert_eq!(state.validate(), Err(QueryError::MissingContentType));
}

#[test]
fn builder_remains_usable_after_serialization() {
    let mut state = QueryState::new("product");
    state.where_equals("status", "published").limit(5);

    let first = state.to_params();
    state.skip(10);
    let second = state.to_params();

    assert_eq!(param(&first, "skip"), None);
    assert_eq!(param(&second, "skip"), Some("10"));
    assert_eq!(param(&second, "limit"), Some("5"));
}
