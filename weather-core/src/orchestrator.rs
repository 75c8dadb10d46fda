//! Runs one lookup end to end: validate, fetch current conditions, fetch the
//! forecast, reduce it to days, remember the place.

use std::{future::Future, time::Duration};

use tracing::{debug, info, warn};

use crate::{
    client::{CurrentConditionsRaw, NetworkClient},
    error::{ClientError, FetchError},
    forecast::{self, checked_fields, local_time, utc_offset},
    geolocation::Geolocation,
    model::{CurrentConditions, PlaceQuery, Units, WeatherReport},
    recent::RecentSearchesStore,
    storage::KeyValueStore,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_FORECAST_DAYS: usize = 5;

#[derive(Debug)]
pub struct WeatherFetchOrchestrator<C, S> {
    client: C,
    recent: RecentSearchesStore<S>,
    api_key: String,
    units: Units,
    request_timeout: Duration,
    forecast_days: usize,
}

impl<C: NetworkClient, S: KeyValueStore> WeatherFetchOrchestrator<C, S> {
    pub fn new(client: C, recent: RecentSearchesStore<S>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            recent,
            api_key: api_key.into(),
            units: Units::Metric,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            forecast_days: DEFAULT_FORECAST_DAYS,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_forecast_days(mut self, days: usize) -> Self {
        self.forecast_days = days;
        self
    }

    pub fn recent(&self) -> &RecentSearchesStore<S> {
        &self.recent
    }

    /// Look up current conditions and the daily forecast for `query`.
    ///
    /// Current conditions are requested first; an unknown place stops there
    /// and the forecast endpoint is never called. The place is recorded in
    /// recent searches only after both payloads validate.
    pub async fn fetch_and_report(&self, query: &PlaceQuery) -> Result<WeatherReport, FetchError> {
        query.validate()?;

        debug!(%query, "fetching current conditions");
        let current_raw = self
            .bounded(self.client.get_current(query, self.units, &self.api_key))
            .await
            .inspect_err(|err| debug!(%query, error = %err, "current conditions failed"))?;

        debug!(%query, "fetching forecast");
        let forecast_raw = self
            .bounded(self.client.get_forecast(query, self.units, &self.api_key))
            .await
            .inspect_err(|err| debug!(%query, error = %err, "forecast failed"))?;

        let current = current_conditions(&current_raw)?;
        let forecast = forecast::daily_series(&forecast_raw, self.forecast_days)?;

        // Coordinate lookups are remembered by the name the upstream resolved.
        let place = match query {
            PlaceQuery::ByName(name) => name.trim(),
            PlaceQuery::ByCoordinates(_) => current.place_name.as_str(),
        };
        let recent_searches = self.recent.record(place);

        info!(
            place,
            temperature_c = current.temperature_c,
            forecast_days = forecast.len(),
            "weather lookup succeeded"
        );

        Ok(WeatherReport { current, forecast, recent_searches })
    }

    /// Resolve the device location first, then look it up by coordinates.
    pub async fn fetch_for_location<G>(&self, geolocation: &G) -> Result<WeatherReport, FetchError>
    where
        G: Geolocation + ?Sized,
    {
        let coordinates = geolocation.locate().await.map_err(|err| {
            warn!(error = %err, "geolocation failed");
            FetchError::from(err)
        })?;

        self.fetch_and_report(&PlaceQuery::ByCoordinates(coordinates)).await
    }

    async fn bounded<T>(
        &self,
        request: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, FetchError> {
        match tokio::time::timeout(self.request_timeout, request).await {
            Ok(result) => result.map_err(FetchError::from),
            Err(_) => Err(FetchError::Timeout),
        }
    }
}

fn current_conditions(raw: &CurrentConditionsRaw) -> Result<CurrentConditions, FetchError> {
    if raw.name.trim().is_empty() {
        return Err(FetchError::MalformedResponse("current conditions have no place name".into()));
    }
    let (temperature_c, humidity_pct, wind_speed_mps, description) =
        checked_fields(&raw.main, &raw.weather, &raw.wind)?;
    let observed = local_time(raw.dt, utc_offset(raw.timezone)?)?;

    Ok(CurrentConditions {
        place_name: raw.name.clone(),
        observed_at_local: observed.format("%a, %b %-d, %Y").to_string(),
        temperature_c,
        description,
        humidity_pct,
        wind_speed_mps,
    })
}
