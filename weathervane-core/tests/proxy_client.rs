//! ProxyClient against a mock pass-through endpoint.

mod common;

use std::sync::Arc;

use weathervane_core::{
    AcquisitionOrchestrator, CycleStatus, Endpoint, FailureReason, Language, Location,
    LocationResolver, Phase, Theme, WeatherClient, client::proxy::ProxyClient,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::current_payload;

fn client_for(server: &MockServer) -> ProxyClient {
    ProxyClient::new(format!("{}/api/weather", server.uri()))
}

#[tokio::test]
async fn forwards_city_and_parses_openweather_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("city", "Izmir"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_payload(
            "Izmir",
            "TR",
            "Clear",
            "açık",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let current = client_for(&server)
        .fetch_current(&Location::city("Izmir"), Language::En)
        .await
        .unwrap();

    assert_eq!(current.name, "Izmir");
    assert_eq!(current.reading.description, "açık");
}

#[tokio::test]
async fn missing_city_answer_is_status_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"No city found!"}"#))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_current(&Location::city(""), Language::En)
        .await
        .unwrap_err();

    assert_eq!(err.endpoint, Endpoint::Current);
    assert!(matches!(
        err.reason,
        FailureReason::Status { status: 400, ref body } if body.contains("No city found")
    ));
}

#[tokio::test]
async fn upstream_error_is_status_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"error":"Veri çekilemedi"}"#))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_current(&Location::city("Izmir"), Language::En)
        .await
        .unwrap_err();

    assert!(matches!(err.reason, FailureReason::Status { status: 500, .. }));
}

#[tokio::test]
async fn orchestrator_on_proxy_is_ready_without_daily_samples() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("city", "Istanbul"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_payload(
            "Istanbul",
            "TR",
            "Rain",
            "hafif yağmur",
        )))
        .mount(&server)
        .await;

    let mut orch = AcquisitionOrchestrator::new(
        Arc::new(client_for(&server)),
        LocationResolver::without_geolocation(),
        Language::En,
        Theme::Dark,
    );

    assert_eq!(orch.start().await, Ok(CycleStatus::Ready));
    assert_eq!(orch.phase(), Phase::Ready);
    assert_eq!(orch.snapshot().current.as_ref().unwrap().name, "Istanbul");
    assert!(orch.snapshot().daily.is_empty());
    assert!(!orch.published().forecast_available);
}
