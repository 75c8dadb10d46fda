use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::ClientError,
    model::{PlaceQuery, Units},
};

use super::{CurrentConditionsRaw, ForecastRaw, NetworkClient};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url: base_url.into().trim_end_matches('/').to_string(), http })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &PlaceQuery,
        units: Units,
        credential: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut params = query.location_params();
        params.push(("units", units.as_str().to_string()));
        params.push(("appid", credential.to_string()));

        debug!(%url, %query, "requesting OpenWeather {endpoint}");

        let res = self.http.get(&url).query(&params).send().await.map_err(transport_error)?;

        let status = res.status();
        let body = res.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|err| {
            ClientError::Malformed(format!("OpenWeather {endpoint} JSON: {err}"))
        })
    }
}

#[async_trait]
impl NetworkClient for OpenWeatherClient {
    async fn get_current(
        &self,
        query: &PlaceQuery,
        units: Units,
        credential: &str,
    ) -> Result<CurrentConditionsRaw, ClientError> {
        self.fetch("weather", query, units, credential).await
    }

    async fn get_forecast(
        &self,
        query: &PlaceQuery,
        units: Units,
        credential: &str,
    ) -> Result<ForecastRaw, ClientError> {
        self.fetch("forecast", query, units, credential).await
    }
}

/// Any client error means the lookup cannot succeed for this place, so it is
/// reported as not found; OpenWeather answers 400 for input it cannot geocode.
fn classify_status(status: StatusCode, body: &str) -> ClientError {
    if status.is_client_error() {
        debug!(status = status.as_u16(), body = %truncate_body(body), "upstream client error");
        ClientError::NotFound
    } else {
        ClientError::Status(status.as_u16(), truncate_body(body))
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        // The URL carries the API key.
        ClientError::Transport(err.without_url().to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
