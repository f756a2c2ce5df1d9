//! Tests for the HTTP source module

use super::*;
use crate::config::HttpSourceConfig;
use crate::error::Error;
use crate::fetch::PageFetcher;
use crate::pagination::{PageOffset, PaginationConfig, StopCondition};
use crate::types::StringMap;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source(server: &MockServer) -> HttpSourceConfig {
    HttpSourceConfig::new(server.uri())
        .with_path("/users")
        .with_records_path("data")
        .with_pagination(PaginationConfig::offset(2))
}

// ============================================================================
// Record Extraction
// ============================================================================

#[test]
fn test_extract_records_root_array() {
    let records = extract_records(&json!([1, 2, 3]), None).unwrap();
    assert_eq!(records, vec![json!(1), json!(2), json!(3)]);
}

#[test]
fn test_extract_records_nested_path() {
    let body = json!({"data": {"items": [{"id": 1}]}});
    let records = extract_records(&body, Some("$.data.items")).unwrap();
    assert_eq!(records, vec![json!({"id": 1})]);
}

#[test]
fn test_extract_records_null_is_empty() {
    let records = extract_records(&json!({"data": null}), Some("data")).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_extract_records_errors() {
    assert!(matches!(
        extract_records(&json!({"data": []}), Some("items")),
        Err(Error::RecordExtraction { .. })
    ));
    assert!(matches!(
        extract_records(&json!({"data": "nope"}), Some("data")),
        Err(Error::RecordExtraction { .. })
    ));
}

// ============================================================================
// Rate Limiter
// ============================================================================

#[test]
fn test_rate_limiter_config_default() {
    let config = RateLimiterConfig::default();
    assert_eq!(config.requests_per_second, 10);
    assert_eq!(config.burst_size, 10);
}

#[tokio::test]
async fn test_rate_limiter_allows_burst_then_throttles() {
    let limiter = RateLimiter::new(&RateLimiterConfig::new(1, 3));
    for _ in 0..3 {
        assert!(limiter.try_acquire());
    }
    assert!(!limiter.try_acquire());
}

#[tokio::test]
async fn test_rate_limiter_zero_values_are_usable() {
    let limiter = RateLimiter::new(&RateLimiterConfig::new(0, 0));
    limiter.wait().await;
}

// ============================================================================
// Fetcher
// ============================================================================

#[test]
fn test_fetcher_rejects_invalid_source() {
    let result = HttpPageFetcher::new(HttpSourceConfig::new("not a url"));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_fetch_offset_pages_until_short_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1}, {"id": 2}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 3}]
        })))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(source(&server)).unwrap();
    let query = StringMap::new();

    let first = fetcher.fetch_page(&query, 0).await.unwrap();
    assert_eq!(first.items, vec![json!({"id": 1}), json!({"id": 2})]);
    assert_eq!(first.next_offset, PageOffset::Available(2));

    let second = fetcher.fetch_page(&query, 2).await.unwrap();
    assert_eq!(second.items, vec![json!({"id": 3})]);
    assert_eq!(second.next_offset, PageOffset::Completed);
}

#[tokio::test]
async fn test_fetch_page_number_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = HttpSourceConfig::new(server.uri())
        .with_path("items")
        .with_pagination(PaginationConfig::page_number(1));
    let fetcher = HttpPageFetcher::new(config).unwrap();
    assert_eq!(fetcher.initial_offset(), 1);

    let query = StringMap::new();
    let first = fetcher.fetch_page(&query, 1).await.unwrap();
    assert_eq!(first.next_offset, PageOffset::Available(2));
    let second = fetcher.fetch_page(&query, 2).await.unwrap();
    assert!(second.is_empty());
    assert_eq!(second.next_offset, PageOffset::Completed);
}

#[tokio::test]
async fn test_fetch_stop_condition_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1}, {"id": 2}],
            "has_more": false
        })))
        .mount(&server)
        .await;

    let config = source(&server).with_stop_condition(StopCondition::field("has_more", false));
    let fetcher = HttpPageFetcher::new(config).unwrap();

    let page = fetcher.fetch_page(&StringMap::new(), 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page.next_offset, PageOffset::Completed);
}

#[tokio::test]
async fn test_fetch_stop_condition_total_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 3}, {"id": 4}],
            "meta": {"total": 4}
        })))
        .mount(&server)
        .await;

    let config = source(&server).with_stop_condition(StopCondition::total_count("meta.total"));
    let fetcher = HttpPageFetcher::new(config).unwrap();

    let page = fetcher.fetch_page(&StringMap::new(), 2).await.unwrap();
    assert_eq!(page.next_offset, PageOffset::Completed);
}

#[tokio::test]
async fn test_fetch_sends_headers_and_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("Authorization", "Bearer secret"))
        .and(query_param("status", "active"))
        .and(query_param("team", "core"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = source(&server)
        .with_header("Authorization", "Bearer secret")
        .with_param("status", "active");
    let fetcher = HttpPageFetcher::new(config).unwrap();

    let mut query = StringMap::new();
    query.insert("team".to_string(), "core".to_string());
    let page = fetcher.fetch_page(&query, 0).await.unwrap();
    assert!(page.is_empty());
    assert_eq!(page.next_offset, PageOffset::Completed);
}

#[tokio::test]
async fn test_fetch_paginator_params_win() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("offset", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(source(&server).with_param("offset", "99")).unwrap();
    let mut query = StringMap::new();
    query.insert("offset".to_string(), "42".to_string());
    fetcher.fetch_page(&query, 4).await.unwrap();
}

#[tokio::test]
async fn test_fetch_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(source(&server)).unwrap();
    let err = fetcher.fetch_page(&StringMap::new(), 0).await.unwrap_err();
    match &err {
        Error::HttpStatus { status, body } => {
            assert_eq!(*status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_fetch_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = source(&server).with_timeout(Duration::from_millis(50));
    let fetcher = HttpPageFetcher::new(config).unwrap();
    let err = fetcher.fetch_page(&StringMap::new(), 0).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 50 }));
}

#[tokio::test]
async fn test_fetch_invalid_records_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 1}})))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(source(&server)).unwrap();
    let err = fetcher.fetch_page(&StringMap::new(), 0).await.unwrap_err();
    assert!(matches!(err, Error::RecordExtraction { .. }));
}
