use crate::{
    Config,
    error::Result,
    model::{CurrentConditions, ForecastSample, GeoMatch, Location, LocationQuery, ReversePlace},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Current conditions together with the location the upstream resolved the query to.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentReport {
    pub conditions: CurrentConditions,
    pub location: Location,
}

#[async_trait]
pub trait GeocodingService: Send + Sync + Debug {
    async fn direct_search(&self, query: &str, limit: u8) -> Result<Vec<GeoMatch>>;

    async fn reverse_search(
        &self,
        latitude: f64,
        longitude: f64,
        limit: u8,
    ) -> Result<Vec<ReversePlace>>;
}

#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    /// Fails with `LocationNotFound` when a city query has no match.
    async fn current_conditions(&self, query: &LocationQuery) -> Result<CurrentReport>;

    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastSample>>;
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `skyboard configure` or set SKYBOARD_API_KEY."
        )
    })?;

    let mut client = OpenWeatherClient::with_timeout(api_key, config.request_timeout())?;

    if let Some(url) = &config.endpoints.weather_base_url {
        client = client.with_weather_base_url(url);
    }
    if let Some(url) = &config.endpoints.geocode_base_url {
        client = client.with_geocode_base_url(url);
    }

    Ok(client)
}
