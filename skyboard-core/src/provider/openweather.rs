use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::{Result, WeatherError},
    model::{CurrentConditions, ForecastSample, GeoMatch, Location, LocationQuery, ReversePlace},
};

use super::{CurrentReport, GeocodingService, WeatherService};

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// OpenWeatherMap client covering both the weather and geocoding APIs.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
    weather_base_url: String,
    geocode_base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_client(api_key, Client::new())
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::from_client(api_key, http))
    }

    fn from_client(api_key: impl Into<String>, http: Client) -> Self {
        Self {
            api_key: api_key.into(),
            http,
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            geocode_base_url: DEFAULT_GEOCODE_BASE_URL.to_string(),
        }
    }

    pub fn with_weather_base_url(mut self, url: &str) -> Self {
        self.weather_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_geocode_base_url(mut self, url: &str) -> Self {
        self.geocode_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn weather_base_url(&self) -> &str {
        &self.weather_base_url
    }

    pub fn geocode_base_url(&self) -> &str {
        &self.geocode_base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!(endpoint, url = %url, "Sending OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Upstream {
                endpoint,
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        // OpenWeather sometimes reports failures in a 200 body via `cod`.
        if let Some(code) = embedded_error_code(&body) {
            return Err(WeatherError::Upstream {
                endpoint,
                status: code,
                message: upstream_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::InvalidResponse {
            endpoint,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl WeatherService for OpenWeatherClient {
    async fn current_conditions(&self, query: &LocationQuery) -> Result<CurrentReport> {
        let mut params = vec![("units", "metric".to_string())];
        match query {
            LocationQuery::City(city) => params.push(("q", city.clone())),
            LocationQuery::Coordinates { latitude, longitude } => {
                params.push(("lat", latitude.to_string()));
                params.push(("lon", longitude.to_string()));
            }
        }

        let url = format!("{}/weather", self.weather_base_url);
        let result = self.get_json::<OwCurrentResponse>("weather", url, &params).await;
        let parsed = match (query, result) {
            // Only a city lookup can miss; a coordinate 404 stays a network failure.
            (LocationQuery::City(city), Err(WeatherError::Upstream { status, .. }))
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                return Err(WeatherError::LocationNotFound(city.clone()));
            }
            (_, other) => other?,
        };

        parsed.into_report()
    }

    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastSample>> {
        let url = format!("{}/forecast", self.weather_base_url);
        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("units", "metric".to_string()),
        ];

        let parsed: OwForecastResponse = self.get_json("forecast", url, &params).await?;

        parsed
            .list
            .into_iter()
            .map(|entry| {
                let weather = first_weather(entry.weather, "forecast")?;
                Ok(ForecastSample {
                    timestamp_utc: entry.dt,
                    temperature_celsius: entry.main.temp,
                    condition_code: weather.id,
                    condition_icon_key: weather.icon,
                })
            })
            .collect()
    }
}

#[async_trait]
impl GeocodingService for OpenWeatherClient {
    async fn direct_search(&self, query: &str, limit: u8) -> Result<Vec<GeoMatch>> {
        let url = format!("{}/direct", self.geocode_base_url);
        let params = [("q", query.to_string()), ("limit", limit.to_string())];

        let parsed: Vec<OwGeoEntry> = self.get_json("direct geocoding", url, &params).await?;

        Ok(parsed
            .into_iter()
            .map(|e| GeoMatch {
                name: e.name,
                state: e.state,
                country: e.country,
                latitude: e.lat,
                longitude: e.lon,
            })
            .collect())
    }

    async fn reverse_search(
        &self,
        latitude: f64,
        longitude: f64,
        limit: u8,
    ) -> Result<Vec<ReversePlace>> {
        let url = format!("{}/reverse", self.geocode_base_url);
        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("limit", limit.to_string()),
        ];

        let parsed: Vec<OwGeoEntry> = self.get_json("reverse geocoding", url, &params).await?;

        Ok(parsed
            .into_iter()
            .map(|e| ReversePlace { name: e.name, country: e.country })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u16,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    coord: OwCoord,
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
    dt: i64,
    sys: OwSys,
    #[serde(default)]
    timezone: i32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct OwStatusBody {
    cod: Option<serde_json::Value>,
}

impl OwCurrentResponse {
    fn into_report(self) -> Result<CurrentReport> {
        let weather = first_weather(self.weather, "weather")?;

        let conditions = CurrentConditions {
            timestamp_utc: self.dt,
            temperature_celsius: self.main.temp,
            humidity_percent: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            pressure_hpa: self.main.pressure,
            condition_code: weather.id,
            condition_icon_key: weather.icon,
            sunrise_utc: self.sys.sunrise,
            sunset_utc: self.sys.sunset,
            description: weather.description,
            utc_offset_seconds: self.timezone,
        };

        let location = Location {
            name: self.name,
            country_code: self.sys.country.filter(|c| !c.is_empty()),
            latitude: self.coord.lat,
            longitude: self.coord.lon,
        };

        Ok(CurrentReport { conditions, location })
    }
}

fn first_weather(weather: Vec<OwWeather>, endpoint: &'static str) -> Result<OwWeather> {
    weather.into_iter().next().ok_or_else(|| WeatherError::InvalidResponse {
        endpoint,
        reason: "missing weather condition entry".to_string(),
    })
}

/// Non-2xx `cod` carried in an otherwise successful response body.
fn embedded_error_code(body: &str) -> Option<u16> {
    let cod = serde_json::from_str::<OwStatusBody>(body).ok()?.cod?;
    let code = match cod {
        serde_json::Value::Number(n) => u16::try_from(n.as_u64()?).ok()?,
        serde_json::Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (!(200..300).contains(&code)).then_some(code)
}

fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<OwErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
