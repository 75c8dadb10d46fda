//! Lookup scenarios against a scripted network client.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::json;
use weather_core::{
    ClientError, Coordinates, FetchError, FixedLocation, GeolocationError, KeyValueStore,
    LookupSession, MemoryStore, NetworkClient, PlaceQuery, RecentSearchesStore, Renderer, Units,
    WeatherFetchOrchestrator, WeatherReport,
    client::{CurrentConditionsRaw, ForecastRaw},
    geolocation::Geolocation,
};

const HOUR: i64 = 3600;
// 2024-10-14T00:00:00Z
const MIDNIGHT: i64 = 1_728_864_000;

#[derive(Debug, Default)]
struct ScriptedClient {
    current: Option<serde_json::Value>,
    forecast: Option<serde_json::Value>,
    current_delay: Option<Duration>,
    current_calls: AtomicUsize,
    forecast_calls: AtomicUsize,
    seen_queries: parking_lot::Mutex<Vec<(PlaceQuery, Units, String)>>,
}

impl ScriptedClient {
    fn answering(current: serde_json::Value, forecast: serde_json::Value) -> Self {
        Self { current: Some(current), forecast: Some(forecast), ..Self::default() }
    }

    fn not_found() -> Self {
        Self { forecast: Some(forecast_json(0)), ..Self::default() }
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: &serde_json::Value) -> Result<T, ClientError> {
    serde_json::from_value(value.clone()).map_err(|err| ClientError::Malformed(err.to_string()))
}

#[async_trait]
impl NetworkClient for ScriptedClient {
    async fn get_current(
        &self,
        query: &PlaceQuery,
        units: Units,
        credential: &str,
    ) -> Result<CurrentConditionsRaw, ClientError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_queries.lock().push((query.clone(), units, credential.to_string()));
        if let Some(delay) = self.current_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.current {
            Some(value) => decode(value),
            None => Err(ClientError::NotFound),
        }
    }

    async fn get_forecast(
        &self,
        _query: &PlaceQuery,
        _units: Units,
        _credential: &str,
    ) -> Result<ForecastRaw, ClientError> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        match &self.forecast {
            Some(value) => decode(value),
            None => Err(ClientError::NotFound),
        }
    }
}

fn answering(name: &str, timezone: i32) -> ScriptedClient {
    ScriptedClient::answering(current_json(name), forecast_json(timezone))
}

fn london() -> PlaceQuery {
    PlaceQuery::by_name("London").expect("valid")
}

fn current_json(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "dt": MIDNIGHT + 9 * HOUR,
        "timezone": 3600,
        "main": { "temp": 15.0, "humidity": 60 },
        "weather": [{ "description": "clear sky" }],
        "wind": { "speed": 3.0 }
    })
}

/// Five days at 3-hour steps; temperature is the UTC hour of the sample.
fn forecast_json(timezone: i32) -> serde_json::Value {
    let list: Vec<_> = (0..40)
        .map(|i| {
            let dt = MIDNIGHT + i * 3 * HOUR;
            json!({
                "dt": dt,
                "main": { "temp": ((i * 3) % 24) as f64, "humidity": 70 },
                "weather": [{ "description": "light rain" }],
                "wind": { "speed": 4.5 }
            })
        })
        .collect();

    json!({ "city": { "name": "London", "timezone": timezone }, "list": list })
}

type Orchestrator = WeatherFetchOrchestrator<Arc<ScriptedClient>, Arc<MemoryStore>>;

fn orchestrator(client: ScriptedClient) -> (Orchestrator, Arc<ScriptedClient>, Arc<MemoryStore>) {
    let client = Arc::new(client);
    let storage = Arc::new(MemoryStore::new());
    let orch = WeatherFetchOrchestrator::new(
        Arc::clone(&client),
        RecentSearchesStore::new(Arc::clone(&storage)),
        "TEST_KEY",
    );
    (orch, client, storage)
}

#[tokio::test]
async fn london_lookup_returns_current_and_five_noon_samples() {
    let (orch, client, _) = orchestrator(answering("London", 3600));

    let query = london();
    let report = orch.fetch_and_report(&query).await.expect("lookup succeeds");

    assert_eq!(report.current.place_name, "London");
    assert_eq!(report.current.temperature_c, 15.0);
    assert_eq!(report.current.description, "clear sky");
    assert_eq!(report.current.humidity_pct, 60);
    assert_eq!(report.current.wind_speed_mps, 3.0);
    assert_eq!(report.current.observed_at_local, "Mon, Oct 14, 2024");

    // At +01:00 the 12:00Z sample is 13:00 local, the closest to noon.
    assert_eq!(report.forecast.len(), 5);
    assert!(report.forecast.iter().all(|e| e.temperature_c == 12.0));
    let labels: Vec<_> = report.forecast.iter().map(|e| e.date_label.as_str()).collect();
    assert_eq!(
        labels,
        ["Mon, Oct 14", "Tue, Oct 15", "Wed, Oct 16", "Thu, Oct 17", "Fri, Oct 18"]
    );

    assert_eq!(report.recent_searches.first().map(String::as_str), Some("London"));
    assert_eq!(orch.recent().load(), vec!["London".to_string()]);

    let seen = client.seen_queries.lock();
    assert_eq!(seen[0], (query.clone(), Units::Metric, "TEST_KEY".to_string()));
}

#[tokio::test]
async fn unknown_place_short_circuits_before_forecast() {
    let (orch, client, _) = orchestrator(ScriptedClient::not_found());
    orch.recent().record("Paris");

    let query = PlaceQuery::by_name("Zzzznotacity").expect("valid");
    let err = orch.fetch_and_report(&query).await.unwrap_err();

    assert_eq!(err, FetchError::PlaceNotFound);
    assert_eq!(client.current_calls.load(Ordering::SeqCst), 1);
    assert_eq!(client.forecast_calls.load(Ordering::SeqCst), 0);
    assert_eq!(orch.recent().load(), vec!["Paris".to_string()]);
}

#[tokio::test]
async fn coordinate_lookup_records_resolved_name() {
    let (orch, _, _) = orchestrator(answering("Hyderabad", 19_800));

    let report = orch
        .fetch_and_report(&PlaceQuery::by_coordinates(17.385, 78.4867))
        .await
        .expect("lookup succeeds");

    assert_eq!(report.current.place_name, "Hyderabad");
    assert_eq!(orch.recent().load(), vec!["Hyderabad".to_string()]);
}

#[tokio::test]
async fn invalid_name_makes_no_request() {
    let (orch, client, _) = orchestrator(answering("London", 0));

    let err = orch.fetch_and_report(&PlaceQuery::ByName("Paris!".into())).await.unwrap_err();

    assert!(matches!(err, FetchError::InvalidInput(_)));
    assert_eq!(client.current_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn repeated_lookup_is_stable_and_does_not_grow_recent() {
    let (orch, _, _) = orchestrator(answering("London", 0));
    let query = london();

    let first = orch.fetch_and_report(&query).await.expect("first");
    let second = orch.fetch_and_report(&query).await.expect("second");

    assert_eq!(first.current, second.current);
    assert_eq!(first.forecast, second.forecast);
    assert_eq!(second.recent_searches, vec!["London".to_string()]);
}

#[tokio::test]
async fn malformed_forecast_is_reported_and_not_recorded() {
    let (orch, _, _) = orchestrator(ScriptedClient::answering(
        current_json("London"),
        json!({ "city": { "name": "London" }, "list": "nope" }),
    ));

    let err = orch.fetch_and_report(&london()).await.unwrap_err();

    assert!(matches!(err, FetchError::MalformedResponse(_)));
    assert!(orch.recent().load().is_empty());
}

#[tokio::test]
async fn out_of_range_current_humidity_is_malformed() {
    let mut current = current_json("London");
    current["main"]["humidity"] = json!(250);
    let (orch, _, _) = orchestrator(ScriptedClient::answering(current, forecast_json(0)));

    let err = orch.fetch_and_report(&london()).await.unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse(_)));
}

#[tokio::test]
async fn slow_request_times_out() {
    let client = ScriptedClient {
        current_delay: Some(Duration::from_millis(500)),
        ..ScriptedClient::answering(current_json("London"), forecast_json(0))
    };
    let (orch, _, _) = orchestrator(client);
    let orch = orch.with_request_timeout(Duration::from_millis(20));

    let err = orch.fetch_and_report(&london()).await.unwrap_err();
    assert_eq!(err, FetchError::Timeout);
}

#[derive(Debug)]
struct DeniedLocation;

#[async_trait]
impl Geolocation for DeniedLocation {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Denied)
    }
}

#[tokio::test]
async fn denied_geolocation_is_a_network_failure_without_requests() {
    let (orch, client, _) = orchestrator(answering("London", 0));

    let err = orch.fetch_for_location(&DeniedLocation).await.unwrap_err();

    assert!(matches!(err, FetchError::NetworkFailure(_)));
    assert_eq!(client.current_calls.load(Ordering::SeqCst), 0);
}

#[derive(Debug, Default)]
struct RecordingRenderer {
    events: Vec<String>,
}

impl Renderer for RecordingRenderer {
    fn show_loading(&mut self) {
        self.events.push("loading".into());
    }

    fn show_idle(&mut self) {
        self.events.push("idle".into());
    }

    fn show_report(&mut self, report: &WeatherReport) {
        self.events.push(format!("report:{}", report.current.place_name));
    }

    fn show_error(&mut self, error: &FetchError) {
        self.events.push(format!("error:{}", error.user_message()));
    }

    fn show_recent(&mut self, recent: &[String]) {
        self.events.push(format!("recent:{}", recent.join(",")));
    }
}

#[tokio::test]
async fn session_toggles_loading_around_successful_lookup() {
    let (orch, _, _) = orchestrator(answering("London", 0));
    let mut session = LookupSession::new(&orch, RecordingRenderer::default());

    session.search("  London ").await.expect("lookup succeeds");

    assert_eq!(session.renderer().events, ["loading", "report:London", "recent:London", "idle"]);
}

#[tokio::test]
async fn session_reports_invalid_input_without_loading() {
    let (orch, _, _) = orchestrator(answering("London", 0));
    let mut session = LookupSession::new(&orch, RecordingRenderer::default());

    assert!(session.search("").await.is_err());
    assert_eq!(session.renderer().events, ["error:Please enter a city name"]);
}

#[tokio::test]
async fn session_maps_not_found_and_restores_idle() {
    let (orch, _, _) = orchestrator(ScriptedClient::not_found());
    let mut session = LookupSession::new(&orch, RecordingRenderer::default());

    assert!(session.select_recent("Atlantis").await.is_err());
    assert_eq!(
        session.into_renderer().events,
        ["loading", "error:City not found. Please try another location.", "idle"]
    );
}

#[tokio::test]
async fn session_uses_location_and_refreshes_recent() {
    let (orch, _, storage) = orchestrator(answering("Hyderabad", 19_800));
    storage.set_string(weather_core::recent::STORAGE_KEY, r#"["Paris"]"#).expect("seed");
    let mut session = LookupSession::new(&orch, RecordingRenderer::default());

    session.refresh_recent();
    let here = FixedLocation(Coordinates { lat: 17.385, lon: 78.4867 });
    session.use_location(&here).await.expect("lookup succeeds");

    assert_eq!(
        session.renderer().events,
        ["recent:Paris", "loading", "report:Hyderabad", "recent:Hyderabad,Paris", "idle"]
    );
}
