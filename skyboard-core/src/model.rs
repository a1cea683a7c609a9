use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Name shown when coordinates could not be resolved to a place.
pub const PLACEHOLDER_LOCATION_NAME: &str = "Your Location";

/// A resolved place. Built once by the fetcher, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Stand-in used when reverse geocoding fails for device coordinates.
    pub fn placeholder(latitude: f64, longitude: f64) -> Self {
        Self {
            name: PLACEHOLDER_LOCATION_NAME.to_string(),
            country_code: None,
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub timestamp_utc: i64,
    pub temperature_celsius: f64,
    pub humidity_percent: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: u32,
    pub condition_code: u16,
    pub condition_icon_key: String,
    pub sunrise_utc: i64,
    pub sunset_utc: i64,
    pub description: String,
    /// Offset of the observed location from UTC, as reported upstream.
    pub utc_offset_seconds: i32,
}

/// One raw point of the 3-hourly forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp_utc: i64,
    pub temperature_celsius: f64,
    pub condition_code: u16,
    pub condition_icon_key: String,
}

/// Everything the presentation layer needs for one location at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
    pub raw_forecast: Vec<ForecastSample>,
}

/// Derived per-day forecast summary. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub calendar_day_label: String,
    pub date_label: String,
    pub max_temperature_celsius: f64,
    pub min_temperature_celsius: f64,
    pub dominant_condition_code: u16,
    pub dominant_condition_icon_key: String,
}

/// Query accepted by the current-conditions endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
}

/// A direct geocoding hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMatch {
    pub name: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// A reverse geocoding hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReversePlace {
    pub name: String,
    pub country: Option<String>,
}

/// Autocomplete entry derived from a [`GeoMatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSuggestion {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoMatch> for PlaceSuggestion {
    fn from(m: GeoMatch) -> Self {
        let mut label = m.name;
        for part in [m.state, m.country].into_iter().flatten() {
            if !part.is_empty() {
                label.push_str(", ");
                label.push_str(&part);
            }
        }

        Self { label, latitude: m.latitude, longitude: m.longitude }
    }
}

/// Display-only unit preference. Stored data stays metric regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl DisplayUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "celsius",
            DisplayUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplayUnit::Celsius => DisplayUnit::Fahrenheit,
            DisplayUnit::Fahrenheit => DisplayUnit::Celsius,
        }
    }
}

impl std::fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DisplayUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "celsius" | "c" | "metric" => Ok(DisplayUnit::Celsius),
            "fahrenheit" | "f" | "imperial" => Ok(DisplayUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}
