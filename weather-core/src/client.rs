use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::ClientError,
    model::{PlaceQuery, Units},
};

pub mod openweather;

pub use openweather::OpenWeatherClient;

#[derive(Debug, Clone, Deserialize)]
pub struct MainRaw {
    pub temp: f64,
    pub humidity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherRaw {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindRaw {
    pub speed: f64,
}

/// Current conditions payload as the upstream sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditionsRaw {
    pub name: String,
    pub dt: i64,
    /// Shift in seconds from UTC for the resolved place.
    #[serde(default)]
    pub timezone: Option<i32>,
    pub main: MainRaw,
    pub weather: Vec<WeatherRaw>,
    pub wind: WindRaw,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CityRaw {
    pub name: String,
    #[serde(default)]
    pub timezone: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastItemRaw {
    pub dt: i64,
    pub main: MainRaw,
    pub weather: Vec<WeatherRaw>,
    pub wind: WindRaw,
}

/// Forecast timeline payload, typically 3-hour steps over five days.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRaw {
    pub city: CityRaw,
    pub list: Vec<ForecastItemRaw>,
}

/// Capability to fetch raw weather payloads for a place.
#[async_trait]
pub trait NetworkClient: Send + Sync + Debug {
    async fn get_current(
        &self,
        query: &PlaceQuery,
        units: Units,
        credential: &str,
    ) -> Result<CurrentConditionsRaw, ClientError>;

    async fn get_forecast(
        &self,
        query: &PlaceQuery,
        units: Units,
        credential: &str,
    ) -> Result<ForecastRaw, ClientError>;
}

#[async_trait]
impl<T: NetworkClient + ?Sized> NetworkClient for std::sync::Arc<T> {
    async fn get_current(
        &self,
        query: &PlaceQuery,
        units: Units,
        credential: &str,
    ) -> Result<CurrentConditionsRaw, ClientError> {
        (**self).get_current(query, units, credential).await
    }

    async fn get_forecast(
        &self,
        query: &PlaceQuery,
        units: Units,
        credential: &str,
    ) -> Result<ForecastRaw, ClientError> {
        (**self).get_forecast(query, units, credential).await
    }
}
