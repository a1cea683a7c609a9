//! Core library for the `skyboard` weather dashboard.
//!
//! This crate defines:
//! - Shared domain models (locations, conditions, forecast samples, snapshots)
//! - The OpenWeather client behind the geocoding/weather service traits
//! - Fetching and normalizing a snapshot for a city or a coordinate pair
//! - Per-day forecast aggregation and display formatting
//! - The sequence-tagged snapshot cell the presentation layer reads from
//! - Configuration and recent-search persistence
//!
//! It is used by `skyboard-cli`, but can also be reused by other front ends.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod history;
pub mod model;
pub mod provider;
pub mod state;

#[cfg(test)]
mod testing;

pub use aggregate::ForecastAggregator;
pub use config::Config;
pub use dashboard::{Dashboard, DashboardView, FetchOutcome};
pub use error::{ErrorKind, WeatherError};
pub use fetcher::WeatherFetcher;
pub use format::DisplayFormatter;
pub use history::RecentSearches;
pub use model::{
    CurrentConditions, DaySummary, DisplayUnit, ForecastSample, Location, PlaceSuggestion,
    WeatherSnapshot,
};
pub use provider::{GeocodingService, WeatherService, openweather::OpenWeatherClient};
pub use state::SnapshotCell;
