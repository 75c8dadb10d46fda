use std::{fmt, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FetchError, InvalidInput};

/// Place names may only contain letters, whitespace and hyphens.
static PLACE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s-]+$").expect("place name pattern compiles"));

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Where to look the weather up.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceQuery {
    ByName(String),
    ByCoordinates(Coordinates),
}

impl PlaceQuery {
    /// Build a name query from free text, trimming surrounding whitespace.
    ///
    /// The name must be non-empty and match the allowed character set
    /// (letters, whitespace, hyphens).
    pub fn by_name(input: &str) -> Result<Self, FetchError> {
        let name = validate_place_name(input)?;
        Ok(Self::ByName(name.to_string()))
    }

    pub fn by_coordinates(lat: f64, lon: f64) -> Self {
        Self::ByCoordinates(Coordinates { lat, lon })
    }

    /// Re-check a query that may have been constructed directly.
    pub fn validate(&self) -> Result<(), FetchError> {
        match self {
            PlaceQuery::ByName(name) => validate_place_name(name).map(|_| ()),
            PlaceQuery::ByCoordinates(_) => Ok(()),
        }
    }

    /// Query-string pairs that locate this place for the upstream API.
    pub fn location_params(&self) -> Vec<(&'static str, String)> {
        match self {
            PlaceQuery::ByName(name) => vec![("q", name.trim().to_string())],
            PlaceQuery::ByCoordinates(c) => {
                vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())]
            }
        }
    }
}

impl fmt::Display for PlaceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceQuery::ByName(name) => f.write_str(name),
            PlaceQuery::ByCoordinates(c) => write!(f, "{:.4}, {:.4}", c.lat, c.lon),
        }
    }
}

/// Returns the trimmed name when it is acceptable as a place query.
pub fn validate_place_name(input: &str) -> Result<&str, FetchError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(FetchError::InvalidInput(InvalidInput::Empty));
    }
    if !PLACE_NAME_PATTERN.is_match(name) {
        return Err(FetchError::InvalidInput(InvalidInput::DisallowedCharacters));
    }
    Ok(name)
}

/// Unit system sent to the upstream API. Only metric is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Metric,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub place_name: String,
    pub observed_at_local: String,
    pub temperature_c: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

/// One representative sample for a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub date_label: String,
    pub temperature_c: f64,
    pub wind_speed_mps: f64,
    pub humidity_pct: u8,
    pub description: String,
}

/// Chronologically ascending, one entry per calendar day.
pub type ForecastSeries = Vec<ForecastEntry>;

/// Everything a successful lookup hands back to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: ForecastSeries,
    /// Recent searches after this lookup was recorded.
    pub recent_searches: Vec<String>,
}
