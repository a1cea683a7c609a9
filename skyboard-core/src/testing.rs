//! In-process stand-ins for the upstream services, used by unit tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    error::{Result, WeatherError},
    model::{CurrentConditions, ForecastSample, GeoMatch, Location, LocationQuery, ReversePlace},
    provider::{CurrentReport, GeocodingService, WeatherService},
};

// 2026-10-16T00:00:00Z
pub const BASE_TS: i64 = 1_792_108_800;

pub fn report(name: &str, country: Option<&str>, temp: f64, lat: f64, lon: f64) -> CurrentReport {
    CurrentReport {
        conditions: CurrentConditions {
            timestamp_utc: BASE_TS + 36_000,
            temperature_celsius: temp,
            humidity_percent: 70,
            wind_speed_mps: 3.0,
            pressure_hpa: 1015,
            condition_code: 800,
            condition_icon_key: "01d".into(),
            sunrise_utc: BASE_TS + 21_900,
            sunset_utc: BASE_TS + 63_000,
            description: "clear sky".into(),
            utc_offset_seconds: 0,
        },
        location: Location {
            name: name.into(),
            country_code: country.map(str::to_string),
            latitude: lat,
            longitude: lon,
        },
    }
}

/// Two days of eight 3-hourly samples.
pub fn two_day_forecast() -> Vec<ForecastSample> {
    (0..16)
        .map(|i| ForecastSample {
            timestamp_utc: BASE_TS + i * 10_800,
            temperature_celsius: 10.0 + i as f64,
            condition_code: if i % 3 == 0 { 500 } else { 800 },
            condition_icon_key: if i % 3 == 0 { "10d".into() } else { "01d".into() },
        })
        .collect()
}

fn upstream_failure(endpoint: &'static str) -> WeatherError {
    WeatherError::Upstream { endpoint, status: 500, message: "internal error".into() }
}

#[derive(Debug)]
pub struct FakeWeather {
    pub cities: HashMap<String, CurrentReport>,
    pub by_coordinates: Option<CurrentReport>,
    pub forecast: Vec<ForecastSample>,
    pub fail_forecast: bool,
    pub delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeWeather {
    fn default() -> Self {
        Self {
            cities: HashMap::new(),
            by_coordinates: None,
            forecast: two_day_forecast(),
            fail_forecast: false,
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeWeather {
    pub fn with_city(mut self, key: &str, report: CurrentReport) -> Self {
        self.cities.insert(key.to_lowercase(), report);
        self
    }

    pub fn with_coordinates(mut self, report: CurrentReport) -> Self {
        self.by_coordinates = Some(report);
        self
    }

    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_lowercase(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl WeatherService for FakeWeather {
    async fn current_conditions(&self, query: &LocationQuery) -> Result<CurrentReport> {
        match query {
            LocationQuery::City(city) => {
                self.calls.lock().push(format!("current:{city}"));
                let key = city.to_lowercase();
                if let Some(delay) = self.delays.get(&key) {
                    tokio::time::sleep(*delay).await;
                }
                self.cities
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| WeatherError::LocationNotFound(city.clone()))
            }
            LocationQuery::Coordinates { latitude, longitude } => {
                self.calls.lock().push(format!("current:{latitude},{longitude}"));
                self.by_coordinates.clone().ok_or_else(|| upstream_failure("weather"))
            }
        }
    }

    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastSample>> {
        self.calls.lock().push(format!("forecast:{latitude},{longitude}"));
        if self.fail_forecast {
            return Err(upstream_failure("forecast"));
        }
        Ok(self.forecast.clone())
    }
}

#[derive(Debug)]
pub struct FakeGeocoder {
    /// `None` makes reverse lookups fail.
    pub reverse: Option<Vec<ReversePlace>>,
    /// `None` makes direct lookups fail.
    pub direct: Option<Vec<GeoMatch>>,
    calls: Mutex<usize>,
}

impl Default for FakeGeocoder {
    fn default() -> Self {
        Self {
            reverse: Some(Vec::new()),
            direct: Some(vec![GeoMatch {
                name: "London".into(),
                state: Some("England".into()),
                country: Some("GB".into()),
                latitude: 51.5073,
                longitude: -0.1276,
            }]),
            calls: Mutex::new(0),
        }
    }
}

impl FakeGeocoder {
    pub fn failing() -> Self {
        Self { reverse: None, ..Self::default() }
    }

    pub fn without_suggestions() -> Self {
        Self { direct: None, ..Self::default() }
    }

    pub fn with_place(name: &str, country: Option<&str>) -> Self {
        Self {
            reverse: Some(vec![ReversePlace {
                name: name.into(),
                country: country.map(str::to_string),
            }]),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl GeocodingService for FakeGeocoder {
    async fn direct_search(&self, _query: &str, limit: u8) -> Result<Vec<GeoMatch>> {
        *self.calls.lock() += 1;
        match &self.direct {
            Some(matches) => Ok(matches.iter().take(limit as usize).cloned().collect()),
            None => Err(upstream_failure("direct geocoding")),
        }
    }

    async fn reverse_search(
        &self,
        _latitude: f64,
        _longitude: f64,
        limit: u8,
    ) -> Result<Vec<ReversePlace>> {
        *self.calls.lock() += 1;
        match &self.reverse {
            Some(places) => Ok(places.iter().take(limit as usize).cloned().collect()),
            None => Err(upstream_failure("reverse geocoding")),
        }
    }
}
