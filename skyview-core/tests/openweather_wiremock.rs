//! OpenWeather provider against a mock HTTP server.

use skyview_core::{
    Config, ErrorState, FetchError, LocationQuery, OpenWeatherProvider, WeatherController,
    WeatherProvider, fetch_weather,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn geocode_paris() -> serde_json::Value {
    serde_json::json!([{
        "name": "Paris",
        "local_names": { "fr": "Paris" },
        "lat": 48.8588897,
        "lon": 2.3200410,
        "country": "FR",
        "state": "Ile-de-France"
    }])
}

fn current_paris() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.32, "lat": 48.8589 },
        "weather": [{ "id": 801, "main": "Clouds", "description": "few clouds", "icon": "02d" }],
        "base": "stations",
        "main": { "temp": 18.4, "feels_like": 17.9, "pressure": 1018, "humidity": 64 },
        "visibility": 10000,
        "wind": { "speed": 3.6, "deg": 250 },
        "clouds": { "all": 20 },
        "dt": 1705320000,
        "sys": { "country": "FR" },
        "name": "Palais-Royal",
        "cod": 200
    })
}

fn forecast_paris() -> serde_json::Value {
    let entry = |dt_txt: &str, temp: f64| {
        serde_json::json!({
            "dt": 0,
            "main": { "temp": temp, "feels_like": temp, "pressure": 1016, "humidity": 70 },
            "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
            "clouds": { "all": 90 },
            "wind": { "speed": 4.2, "deg": 200 },
            "visibility": 10000,
            "pop": 0.3,
            "dt_txt": dt_txt
        })
    };
    serde_json::json!({
        "cod": "200",
        "cnt": 4,
        "list": [
            entry("2024-01-15 18:00:00", 9.0),
            entry("2024-01-15 21:00:00", 7.5),
            entry("2024-01-16 00:00:00", 6.0),
            entry("2024-01-16 03:00:00", 5.2)
        ],
        "city": { "name": "Paris", "country": "FR" }
    })
}

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    let config = Config {
        api_key: Some("TEST_KEY".into()),
        geo_base_url: server.uri(),
        api_base_url: server.uri(),
        timeout_secs: Some(5),
    };
    OpenWeatherProvider::from_config("TEST_KEY".into(), &config).expect("Failed to create provider")
}

async fn mount_paris(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Paris"))
        .and(query_param("limit", "1"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_paris()))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_paris()))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_paris()))
        .expect(1)
        .mount(server)
        .await;
}

fn query(s: &str) -> LocationQuery {
    LocationQuery::parse(s).expect("valid query")
}

// ============================================================================
// Success scenarios
// ============================================================================

#[tokio::test]
async fn test_fetch_weather_paris() {
    let server = MockServer::start().await;
    mount_paris(&server).await;

    let provider = provider_for(&server);
    let report = fetch_weather(&provider, &query("Paris")).await;
    assert!(report.is_ok(), "Expected success, got: {report:?}");

    let report = report.unwrap();
    assert_eq!(report.current.name, "Paris");
    assert_eq!(report.current.country, "FR");
    assert!((report.current.temp - 18.4).abs() < 0.01);
    assert!((report.current.visibility - 10.0).abs() < 0.01);
    assert_eq!(report.current.pressure, 1018.0);
    assert_eq!(report.current.cloudiness, 20.0);
    assert_eq!(report.forecast.len(), 4);
    assert_eq!(report.forecast[0].dt_txt, "2024-01-15 18:00:00");
}

#[tokio::test]
async fn test_geocode_sends_coordinates_downstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Oslo", "lat": 59.9, "lon": 10.75, "country": "NO" }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "59.9"))
        .and(query_param("lon", "10.75"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_paris()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let places = provider.geocode(&query("Oslo")).await.unwrap();
    let current = provider.current(places[0].lat, places[0].lon).await;
    assert!(current.is_ok(), "Expected success, got: {current:?}");
}

#[tokio::test]
async fn test_controller_end_to_end() {
    let server = MockServer::start().await;
    mount_paris(&server).await;

    let mut controller = WeatherController::new(provider_for(&server));
    controller.submit_query("Paris").await;

    assert_eq!(controller.error(), None);
    assert!(!controller.is_loading());

    let cards = controller.day_cards();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].temp_rounded, 9);
    assert_eq!(cards[0].main.as_deref(), Some("Rain"));

    assert!(controller.select_day("2024-01-16"));
    let series = controller.selected_series().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[1].time, "03:00");
}

// ============================================================================
// Error scenarios
// ============================================================================

#[tokio::test]
async fn test_no_geocode_match_is_location_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_paris()))
        .expect(0)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let result = fetch_weather(&provider, &query("Qwzxy123")).await;
    assert!(matches!(result, Err(FetchError::LocationNotFound(_))));
}

#[tokio::test]
async fn test_unauthorized_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"cod":401,"message":"Invalid API key."}"#),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let result = provider.geocode(&query("Paris")).await;

    match result {
        Err(FetchError::Status { endpoint, status, body }) => {
            assert_eq!(endpoint, "geocode");
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("Expected status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_forecast_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let result = provider.forecast(48.85, 2.35).await;
    assert!(matches!(result, Err(FetchError::Parse { endpoint: "forecast", .. })));
}

#[tokio::test]
async fn test_controller_unknown_location_scenario() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let mut controller = WeatherController::new(provider_for(&server));
    controller.submit_query("Qwzxy123").await;

    assert_eq!(controller.error(), Some(ErrorState::FetchFailure));
    assert!(controller.current().is_none());
    assert!(controller.forecast().is_empty());
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_server_error_during_current_step() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_paris()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_paris()))
        .expect(0)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let result = fetch_weather(&provider, &query("Paris")).await;
    assert!(matches!(result, Err(FetchError::Status { endpoint: "current", status: 503, .. })));
}
