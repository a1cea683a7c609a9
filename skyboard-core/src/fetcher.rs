use std::sync::Arc;

use crate::{
    error::{Result, WeatherError},
    model::{Location, LocationQuery, PlaceSuggestion, WeatherSnapshot},
    provider::{GeocodingService, WeatherService, openweather::OpenWeatherClient},
};

/// Queries shorter than this never reach the geocoder.
pub const MIN_SUGGEST_QUERY_CHARS: usize = 2;
pub const SUGGESTION_LIMIT: u8 = 5;

/// Resolves a location and assembles a full [`WeatherSnapshot`] for it.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    geocoder: Arc<dyn GeocodingService>,
    weather: Arc<dyn WeatherService>,
}

impl WeatherFetcher {
    pub fn new(geocoder: Arc<dyn GeocodingService>, weather: Arc<dyn WeatherService>) -> Self {
        Self { geocoder, weather }
    }

    pub fn from_client(client: OpenWeatherClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client)
    }

    pub async fn fetch_by_city(&self, city: &str) -> Result<WeatherSnapshot> {
        let city = validate_city(city)?;

        let report = self
            .weather
            .current_conditions(&LocationQuery::City(city.to_string()))
            .await?;

        // The echoed coordinate is canonical even when the name was ambiguous.
        let raw_forecast = self
            .weather
            .forecast(report.location.latitude, report.location.longitude)
            .await?;

        tracing::info!(
            city,
            resolved = %report.location.name,
            samples = raw_forecast.len(),
            "Fetched weather by city"
        );

        Ok(WeatherSnapshot { location: report.location, current: report.conditions, raw_forecast })
    }

    pub async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot> {
        validate_coordinates(latitude, longitude)?;

        let location = self.resolve_place(latitude, longitude).await;

        let report = self
            .weather
            .current_conditions(&LocationQuery::Coordinates { latitude, longitude })
            .await?;

        let raw_forecast = self
            .weather
            .forecast(report.location.latitude, report.location.longitude)
            .await?;

        tracing::info!(
            latitude,
            longitude,
            place = %location.name,
            samples = raw_forecast.len(),
            "Fetched weather by coordinates"
        );

        Ok(WeatherSnapshot { location, current: report.conditions, raw_forecast })
    }

    /// Place suggestions for a partially typed query.
    ///
    /// A geocoder failure is returned as an error rather than an empty list.
    pub async fn suggest(&self, query: &str) -> Result<Vec<PlaceSuggestion>> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let matches = self.geocoder.direct_search(query, SUGGESTION_LIMIT).await?;
        Ok(matches.into_iter().map(PlaceSuggestion::from).collect())
    }

    /// Reverse geocoding may fail without failing the fetch.
    async fn resolve_place(&self, latitude: f64, longitude: f64) -> Location {
        match self.geocoder.reverse_search(latitude, longitude, 1).await {
            Ok(places) => match places.into_iter().next() {
                Some(place) if !place.name.trim().is_empty() => Location {
                    name: place.name,
                    country_code: place.country.filter(|c| !c.is_empty()),
                    latitude,
                    longitude,
                },
                _ => {
                    tracing::warn!(latitude, longitude, "Reverse geocoding found no place");
                    Location::placeholder(latitude, longitude)
                }
            },
            Err(err) => {
                tracing::warn!(latitude, longitude, error = %err, "Reverse geocoding failed");
                Location::placeholder(latitude, longitude)
            }
        }
    }
}

pub(crate) fn validate_city(city: &str) -> Result<&str> {
    let city = city.trim();
    if city.is_empty() {
        return Err(WeatherError::InvalidInput("Please enter a city name".to_string()));
    }
    Ok(city)
}

pub(crate) fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
    let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
    if lat_ok && lon_ok {
        Ok(())
    } else {
        Err(WeatherError::InvalidInput(format!(
            "Invalid coordinates: {latitude}, {longitude}"
        )))
    }
}
