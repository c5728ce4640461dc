//! End-to-end tests of the HTTP API against mock SearXNG instances

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use searxng_api::config::Settings;
use searxng_api::web::{create_router, AppState};
use searxng_api::ResponseCache;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn searxng_results(n: usize) -> Value {
    let results: Vec<_> = (0..n)
        .map(|i| {
            json!({
                "title": format!("Result {}", i),
                "url": format!("https://example.org/{}", i),
                "content": format!("snippet {}", i),
                "engine": "duckduckgo",
                "score": 1.0,
                "thumbnail": format!("https://img.example.org/{}.jpg", i),
            })
        })
        .collect();
    json!({ "query": "q", "number_of_results": 1000, "results": results })
}

async fn healthy_searxng(results: usize) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(searxng_results(results)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;
    server
}

async fn broken_searxng() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    server
}

fn app(instances: &[&MockServer], cache: ResponseCache) -> Router {
    let mut settings = Settings::default();
    settings.upstream.instances = instances.iter().map(|s| s.uri()).collect();
    settings.upstream.search_timeout = 2.0;
    settings.upstream.health_timeout = 1.0;
    create_router(AppState::new(settings, cache).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_repeated_search_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("categories", "general"))
        .respond_with(ResponseTemplate::new(200).set_body_json(searxng_results(4)))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&[&server], ResponseCache::memory());

    let (status, first) = get(&app, "/search?q=cache%20test&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["cached"], false);
    assert_eq!(first["query"], "cache test");

    let (_, second) = get(&app, "/search?q=cache%20test&limit=1").await;
    assert_eq!(second["cached"], true);
    assert_eq!(first["results"], second["results"]);
}

#[tokio::test]
async fn test_query_is_echoed_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "  padded query "))
        .respond_with(ResponseTemplate::new(200).set_body_json(searxng_results(1)))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&[&server], ResponseCache::disabled());

    let (status, body) = get(&app, "/search?q=%20%20padded%20query%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "  padded query ");
}

#[tokio::test]
async fn test_limit_truncates_in_upstream_order() {
    let server = healthy_searxng(10).await;
    let app = app(&[&server], ResponseCache::memory());

    let (status, body) = get(&app, "/search?q=python%20tutorial&limit=3").await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<_> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Result 0", "Result 1", "Result 2"]);
    assert_eq!(body["total"], 1000);
    assert_eq!(body["engines"], json!(["duckduckgo"]));
}

#[tokio::test]
async fn test_thumbnails_only_on_images() {
    let server = healthy_searxng(25).await;
    let app = app(&[&server], ResponseCache::disabled());

    let (status, images) = get(&app, "/images?q=cat").await;
    assert_eq!(status, StatusCode::OK);
    let results = images["results"].as_array().unwrap();
    assert_eq!(results.len(), 20);
    assert!(results.iter().all(|r| r["thumbnail"].is_string()));

    for endpoint in ["/search", "/news", "/videos"] {
        let (status, body) = get(&app, &format!("{}?q=cat", endpoint)).await;
        assert_eq!(status, StatusCode::OK);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 10);
        assert!(results.iter().all(|r| r.get("thumbnail").is_none()));
    }
}

#[tokio::test]
async fn test_failing_instance_falls_back() {
    let bad = broken_searxng().await;
    let good = healthy_searxng(2).await;
    let app = app(&[&bad, &good], ResponseCache::disabled());

    for _ in 0..5 {
        let (status, body) = get(&app, "/news?q=technology").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_all_instances_failing_is_503() {
    let a = broken_searxng().await;
    let b = broken_searxng().await;
    let app = app(&[&a, &b], ResponseCache::memory());

    let (status, body) = get(&app, "/videos?q=music").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Search service unavailable");

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| e.as_str().unwrap().ends_with("HTTP 500")));
}

#[tokio::test]
async fn test_validation_happens_before_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(searxng_results(1)))
        .expect(0)
        .mount(&server)
        .await;
    let app = app(&[&server], ResponseCache::memory());

    for uri in [
        "/search",
        "/search?q=",
        "/search?q=x&limit=0",
        "/search?q=x&limit=101",
        "/search?q=x&safesearch=3",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert!(body["detail"].is_string());
    }

    let (status, _) = get(&app, "/search?q=x&limit=many").await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_health_reports_upstream_state() {
    let good = healthy_searxng(0).await;
    let (status, body) = get(&app(&[&good], ResponseCache::memory()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["searxng"], "healthy");
    assert_eq!(body["redis"], "memory");

    let bad = broken_searxng().await;
    let (status, body) = get(&app(&[&bad], ResponseCache::disabled()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["searxng"], "unhealthy");
    assert_eq!(body["redis"], "disabled");
}

#[tokio::test]
async fn test_index_and_stats() {
    let server = healthy_searxng(1).await;
    let app = app(&[&server], ResponseCache::memory());

    let (status, index) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(index["cache"], "memory");
    assert_eq!(index["instances"], 1);
    assert_eq!(index["version"], searxng_api::VERSION);
    assert!(index["endpoints"].as_array().unwrap().len() >= 5);

    get(&app, "/search?q=stats").await;
    let (status, stats) = get(&app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_searches"], 1);
    assert_eq!(stats["instances"][server.uri()]["successes"], 1);
}
