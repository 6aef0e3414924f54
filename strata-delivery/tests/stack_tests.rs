use serde_json::json;
use strata_delivery::{
    DeliveryError, LivePreviewConfig, Region, RetryPolicy, Stack, StackConfig,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn base_config() -> StackConfig {
    StackConfig {
        retry: RetryPolicy {
            max_attempts: 1,
            base_delay_ms: 1,
        },
        ..StackConfig::new("key_1", "token_1", "production")
    }
}

// ── Construction ────────────────────────────────────────────────

#[test]
fn stack_requires_all_credentials() {
    for config in [
        StackConfig::new("", "token", "env"),
        StackConfig::new("key", "", "env"),
        StackConfig::new("key", "token", ""),
    ] {
        assert!(matches!(
            Stack::new(config),
            Err(DeliveryError::Configuration(_))
        ));
    }
}

#[test]
fn config_defaults() {
    let config = StackConfig::default();
    assert_eq!(config.region, Region::Us);
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.retry.max_attempts, 3);
    assert!(config.live_preview.is_none());
    assert_eq!(config.delivery_base_url(), "https://cdn.strata.io");
}

#[test]
fn config_serde_roundtrip() {
    let config = StackConfig {
        region: Region::Eu,
        branch: Some("develop".to_string()),
        ..base_config()
    };
    let json = serde_json::to_string(&config).unwrap();
    let deserialized: StackConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.region, Region::Eu);
    assert_eq!(deserialized.branch.as_deref(), Some("develop"));
    assert_eq!(deserialized.delivery_base_url(), "https://eu-cdn.strata.io");
}

// ── Content type listing ────────────────────────────────────────

#[tokio::test]
async fn content_types_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types"))
        .and(header("api_key", "key_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content_types": [{"uid": "article"}, {"uid": "product"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stack = Stack::new(StackConfig {
        host: Some(server.uri()),
        ..base_config()
    })
    .unwrap();

    let types = stack.content_types().await.unwrap();
    assert_eq!(types.len(), 2);
    assert_eq!(types[0]["uid"], json!("article"));
}

#[tokio::test]
async fn content_type_schema_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/article"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content_type": {"uid": "article", "schema": [{"uid": "title"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stack = Stack::new(StackConfig {
        host: Some(server.uri()),
        ..base_config()
    })
    .unwrap();

    let schema = stack.content_type("article").fetch().await.unwrap();
    assert_eq!(schema["uid"], json!("article"));
}

// ── Branch header ───────────────────────────────────────────────

#[tokio::test]
async fn branch_header_is_sent_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types"))
        .and(header("branch", "develop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content_types": []})))
        .expect(1)
        .mount(&server)
        .await;

    let stack = Stack::new(StackConfig {
        host: Some(server.uri()),
        branch: Some("develop".to_string()),
        ..base_config()
    })
    .unwrap();

    stack.content_types().await.unwrap();
}

// ── Live preview routing ────────────────────────────────────────

#[tokio::test]
async fn active_live_preview_routes_to_preview_host_with_swapped_headers() {
    let preview_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/product/entries"))
        .and(header("api_key", "key_1"))
        .and(header("live_preview", "hash_123"))
        .and(header("authorization", "preview_token_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": []})))
        .expect(1)
        .mount(&preview_server)
        .await;

    let stack = Stack::new(StackConfig {
        // delivery host deliberately unreachable: the request must not go there
        host: Some("http://127.0.0.1:9".to_string()),
        live_preview: Some(LivePreviewConfig {
            enabled: true,
            preview_token: "preview_token_1".to_string(),
            host: preview_server.uri(),
            hash: Some("hash_123".to_string()),
        }),
        ..base_config()
    })
    .unwrap();

    stack.content_type("product").query().find().await.unwrap();
}

#[tokio::test]
async fn preview_without_hash_uses_delivery_host() {
    let delivery_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/content_types/product/entries"))
        .and(header("access_token", "token_1"))
        .and(query_param("environment", "production"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": []})))
        .expect(1)
        .mount(&delivery_server)
        .await;

    let stack = Stack::new(StackConfig {
        host: Some(delivery_server.uri()),
        live_preview: Some(LivePreviewConfig {
            enabled: true,
            preview_token: "preview_token_1".to_string(),
            host: "http://127.0.0.1:9".to_string(),
            hash: None,
        }),
        ..base_config()
    })
    .unwrap();

    stack.content_type("product").query().find().await.unwrap();
}
