use serde_json::json;
use strata_delivery::{DeliveryError, RetryPolicy, Stack, StackConfig};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_stack(server: &MockServer) -> Stack {
    let config = StackConfig {
        host: Some(server.uri()),
        retry: RetryPolicy {
            max_attempts: 1,
            base_delay_ms: 1,
        },
        ..StackConfig::new("key_1", "token_1", "production")
    };
    Stack::new(config).unwrap()
}

fn entries_body(uids: &[&str]) -> serde_json::Value {
    json!({
        "entries": uids.iter().map(|uid| json!({"uid": uid, "title": uid})).collect::<Vec<_>>()
    })
}

// ── find ────────────────────────────────────────────────────────

#[tokio::test]
async fn find_serializes_filters_and_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/product/entries"))
        .and(header("api_key", "key_1"))
        .and(header("access_token", "token_1"))
        .and(query_param("environment", "production"))
        .and(query_param("query", r#"{"price":{"$gt":10,"$lt":100}}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries_body(&["blt_1"])))
        .expect(1)
        .mount(&server)
        .await;

    let stack = test_stack(&server);
    let mut query = stack.content_type("product").query();
    query.greater_than("price", 10).less_than("price", 100);

    let result = query.find().await.unwrap();
    assert_eq!(result.entries().len(), 1);
    assert_eq!(result.entries()[0].content_type_uid(), "product");
}

#[tokio::test]
async fn unfiltered_find_sends_no_query_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/product/entries"))
        .and(query_param_is_missing("query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries_body(&["a", "b", "c"])))
        .expect(1)
        .mount(&server)
        .await;

    let stack = test_stack(&server);
    let result = stack.content_type("product").query().find().await.unwrap();
    assert_eq!(result.entries().len(), 3);
}

#[tokio::test]
async fn find_with_projection_and_references() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/product/entries"))
        .and(query_param("only[BASE][]", "title"))
        .and(query_param("include[]", "category"))
        .and(query_param("only", r#"{"category":["name"]}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries_body(&["blt_1"])))
        .expect(1)
        .mount(&server)
        .await;

    let stack = test_stack(&server);
    let mut query = stack.content_type("product").query();
    query.only(["title"]).only_with_reference(["name"], "category");

    query.find().await.unwrap();
}

#[tokio::test]
async fn find_with_count_returns_total() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/product/entries"))
        .and(query_param("include_count", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{"uid": "blt_1"}],
            "count": 57
        })))
        .mount(&server)
        .await;

    let stack = test_stack(&server);
    let mut query = stack.content_type("product").query();
    query.include_count();

    let result = query.find().await.unwrap();
    assert_eq!(result.count(), Some(57));
}

// ── find_one limit restoration ──────────────────────────────────

#[tokio::test]
async fn find_one_forces_limit_then_find_uses_original() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/product/entries"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries_body(&["only_one"])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/product/entries"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries_body(&["a", "b"])))
        .expect(1)
        .mount(&server)
        .await;

    let stack = test_stack(&server);
    let mut query = stack.content_type("product").query();
    query.limit(5);

    let one = query.find_one().await.unwrap();
    assert_eq!(one.uid(), Some("only_one"));

    // the builder's own limit survived the find_one call
    let all = query.find().await.unwrap();
    assert_eq!(all.entries().len(), 2);
}

#[tokio::test]
async fn find_one_with_no_match_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/product/entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": []})))
        .mount(&server)
        .await;

    let stack = test_stack(&server);
    let err = stack.content_type("product").query().find_one().await.unwrap_err();
    assert!(matches!(err, DeliveryError::Remote { status: 404, .. }));
}

// ── count ───────────────────────────────────────────────────────

#[tokio::test]
async fn count_only_reads_numeric_entries_field() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/product/entries"))
        .and(query_param("count", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let stack = test_stack(&server);
    let count = stack.content_type("product").query().count().await.unwrap();
    assert_eq!(count, 42);
}

// ── error paths ─────────────────────────────────────────────────

#[tokio::test]
async fn remote_error_carries_body_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/product/entries"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error_message": "The environment is invalid",
            "error_code": 141,
            "errors": {"environment": ["is not valid"]}
        })))
        .mount(&server)
        .await;

    let stack = test_stack(&server);
    let err = stack.content_type("product").query().find().await.unwrap_err();
    match err {
        DeliveryError::Remote {
            status,
            message,
            code,
            details,
        } => {
            assert_eq!(status, 422);
            assert_eq!(message, "The environment is invalid");
            assert_eq!(code, Some(141));
            assert!(details.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn deferred_validation_error_issues_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": []})))
        .expect(0)
        .mount(&server)
        .await;

    let stack = test_stack(&server);
    let mut query = stack.content_type("product").query();
    query.where_equals("", "anything");

    let err = query.find().await.unwrap_err();
    assert!(matches!(err, DeliveryError::Validation(_)));
}

#[tokio::test]
async fn empty_content_type_is_a_configuration_error() {
    let server = MockServer::start().await;
    let stack = test_stack(&server);

    let err = stack.content_type("").query().find().await.unwrap_err();
    assert!(matches!(err, DeliveryError::Configuration(_)));
}

// ── call-scoped headers ─────────────────────────────────────────

#[tokio::test]
async fn call_header_overrides_stack_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/product/entries"))
        .and(header("access_token", "override_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": []})))
        .expect(1)
        .mount(&server)
        .await;

    let stack = test_stack(&server);
    let mut query = stack.content_type("product").query();
    query.header("access_token", "override_token");

    query.find().await.unwrap();
}
