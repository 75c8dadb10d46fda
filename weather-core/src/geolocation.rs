use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{error::GeolocationError, model::Coordinates};

pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json";

/// One-shot "where am I" request.
#[async_trait]
pub trait Geolocation: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Coordinates supplied up front, e.g. from the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl Geolocation for FixedLocation {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        let Coordinates { lat, lon } = self.0;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(GeolocationError::Unavailable(format!(
                "coordinates out of range: {lat}, {lon}"
            )));
        }
        Ok(self.0)
    }
}

/// Approximate location from the caller's public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocation {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: Option<String>,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpGeolocation {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { url: url.into(), http })
    }
}

#[async_trait]
impl Geolocation for IpGeolocation {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        debug!(url = %self.url, "requesting IP geolocation");

        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|err| GeolocationError::Unavailable(err.to_string()))?;

        let status = res.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED {
            return Err(GeolocationError::Denied);
        }
        if !status.is_success() {
            return Err(GeolocationError::Unavailable(format!("status {status}")));
        }

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|err| GeolocationError::Unavailable(format!("unreadable response: {err}")))?;

        if body.status.as_deref().is_some_and(|s| s != "success") {
            return Err(GeolocationError::Unavailable(
                body.message.unwrap_or_else(|| "lookup failed".to_string()),
            ));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates { lat, lon }),
            _ => Err(GeolocationError::Unavailable("response had no coordinates".into())),
        }
    }
}
