//! Integration tests for PollenClient against a mock HTTP server.

use std::time::Duration;

use pollenwatch_core::{FetchOutcome, POLLEN_SOURCE_LABEL, PollenClient, RetryPolicy};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quick_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        backoff: vec![Duration::from_millis(10); 3],
        rate_limit_pause: Duration::from_millis(25),
    }
}

fn test_client(server: &MockServer) -> PollenClient {
    PollenClient::new(Some("test-key".to_string()))
        .expect("explicit key must construct")
        .with_base_url(server.uri())
        .with_policy(quick_policy())
        .with_min_request_interval(Duration::ZERO)
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "dailyInfo": [
            {
                "pollenTypeInfo": [
                    {
                        "code": "GRASS",
                        "indexInfo": { "value": 3 },
                        "healthRecommendations": ["Avoid outdoor activity"]
                    },
                    {
                        "code": "TREE",
                        "indexInfo": { "value": 2 },
                        "healthRecommendations": []
                    },
                    {
                        "code": "WEED",
                        "indexInfo": { "value": 4 },
                        "healthRecommendations": ["Keep windows closed"]
                    }
                ]
            }
        ]
    })
}

#[tokio::test]
async fn fetch_reduces_the_daily_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("key", "test-key"))
        .and(query_param("location.latitude", "33.749"))
        .and(query_param("location.longitude", "-84.388"))
        .and(query_param("days", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let outcome = test_client(&server).fetch().await;

    match outcome {
        FetchOutcome::Fetched {
            observation,
            source,
        } => {
            assert_eq!(observation.grass_index, 3);
            assert_eq!(observation.tree_index, 2);
            assert_eq!(observation.weed_index, 4);
            assert_eq!(
                observation.health_recommendations,
                vec![
                    "Grass: Avoid outdoor activity".to_string(),
                    "Weed: Keep windows closed".to_string(),
                ]
            );
            assert_eq!(source, POLLEN_SOURCE_LABEL);
        }
        FetchOutcome::Unavailable { reason } => panic!("expected data, got: {reason}"),
    }
}

#[tokio::test]
async fn empty_daily_forecast_is_terminal_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "dailyInfo": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server).fetch().await;

    match outcome {
        FetchOutcome::Unavailable { reason } => {
            assert_eq!(reason, "No pollen data available in API response");
        }
        FetchOutcome::Fetched { .. } => panic!("expected no data"),
    }
}

#[tokio::test]
async fn missing_daily_forecast_field_is_also_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server).fetch().await;

    assert!(!outcome.is_fetched());
}

#[tokio::test]
async fn rate_limited_then_success_yields_an_observation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let outcome = test_client(&server).fetch().await;

    assert!(outcome.is_fetched(), "got: {}", outcome.describe());
}

#[tokio::test]
async fn timeout_on_every_attempt_exhausts_three_tries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body())
                .set_delay(Duration::from_secs(2)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server).with_request_timeout(Duration::from_millis(100));
    let outcome = client.fetch().await;

    match outcome {
        FetchOutcome::Unavailable { reason } => {
            assert!(reason.contains("timed out"), "got: {reason}");
            assert!(reason.contains("3 attempts"), "got: {reason}");
        }
        FetchOutcome::Fetched { .. } => panic!("expected exhaustion"),
    }
}
