//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Place queries, validation and the lookup error taxonomy
//! - The recent-searches cache over a string key-value store
//! - The network client capability and its OpenWeather implementation
//! - The fetch orchestrator and the renderer-facing lookup session
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod forecast;
pub mod geolocation;
pub mod model;
pub mod orchestrator;
pub mod recent;
pub mod session;
pub mod storage;

pub use client::{NetworkClient, OpenWeatherClient};
pub use config::Config;
pub use error::{ClientError, FetchError, GeolocationError, InvalidInput, StorageError};
pub use geolocation::{FixedLocation, Geolocation, IpGeolocation};
pub use model::{
    Coordinates, CurrentConditions, ForecastEntry, ForecastSeries, PlaceQuery, Units,
    WeatherReport,
};
pub use orchestrator::WeatherFetchOrchestrator;
pub use recent::{MAX_RECENT, RecentSearchesStore};
pub use session::{LookupSession, Renderer};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
