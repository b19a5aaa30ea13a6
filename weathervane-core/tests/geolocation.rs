//! IP geolocation against a mock lookup service.

use weathervane_core::{
    DEFAULT_CITY, GeolocationUnavailable, Location, LocationResolver,
    location::{GeolocationSource, IpGeolocation},
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn lookup_answering(template: ResponseTemplate) -> (MockServer, IpGeolocation) {
    let server = MockServer::start().await;
    Mock::given(method("GET")).and(path("/json")).respond_with(template).mount(&server).await;
    let source = IpGeolocation::with_endpoint(format!("{}/json", server.uri()));
    (server, source)
}

#[tokio::test]
async fn successful_lookup_yields_coordinates() {
    let (_server, source) = lookup_answering(ResponseTemplate::new(200).set_body_json(
        serde_json::json!({ "status": "success", "lat": 38.42, "lon": 27.14, "city": "Izmir" }),
    ))
    .await;

    let position = source.position().await.unwrap();
    assert_eq!((position.lat, position.lon), (38.42, 27.14));

    let location = LocationResolver::new(source).resolve().await;
    assert_eq!(location, Location::coords(38.42, 27.14));
}

#[tokio::test]
async fn refused_lookup_is_unavailable() {
    let (_server, source) = lookup_answering(ResponseTemplate::new(200).set_body_json(
        serde_json::json!({ "status": "fail", "message": "private range" }),
    ))
    .await;

    let err = source.position().await.unwrap_err();
    assert_eq!(err, GeolocationUnavailable::Failed("private range".into()));
}

#[tokio::test]
async fn server_error_falls_back_to_default_city() {
    let (_server, source) = lookup_answering(ResponseTemplate::new(503)).await;

    let location = LocationResolver::new(source).resolve().await;
    assert_eq!(location, Location::city(DEFAULT_CITY));
}

#[tokio::test]
async fn out_of_range_coordinates_fall_back() {
    let (_server, source) = lookup_answering(ResponseTemplate::new(200).set_body_json(
        serde_json::json!({ "status": "success", "lat": 123.0, "lon": 27.14 }),
    ))
    .await;

    let location = LocationResolver::new(source).resolve().await;
    assert_eq!(location, Location::city(DEFAULT_CITY));
}
