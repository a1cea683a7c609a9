use chrono::TimeZone;
use parking_lot::Mutex;

use crate::{
    aggregate::ForecastAggregator,
    error::Result,
    fetcher::{WeatherFetcher, validate_city, validate_coordinates},
    format::{self, CurrentView, DayView, DisplayFormatter},
    history::RecentSearches,
    model::{DaySummary, DisplayUnit, WeatherSnapshot},
    state::SnapshotCell,
};

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Displayed,
    /// A newer request was issued while this one was in flight.
    Superseded,
}

/// Formatted dashboard contents for the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub current: CurrentView,
    pub days: Vec<DayView>,
}

/// Owns the displayed snapshot, the unit preference and the recent searches.
#[derive(Debug)]
pub struct Dashboard {
    fetcher: WeatherFetcher,
    snapshot: SnapshotCell,
    unit: Mutex<DisplayUnit>,
    recent: Mutex<RecentSearches>,
}

impl Dashboard {
    pub fn new(fetcher: WeatherFetcher, unit: DisplayUnit) -> Self {
        Self {
            fetcher,
            snapshot: SnapshotCell::new(),
            unit: Mutex::new(unit),
            recent: Mutex::new(RecentSearches::default()),
        }
    }

    pub fn with_recent(self, recent: RecentSearches) -> Self {
        *self.recent.lock() = recent;
        self
    }

    pub fn fetcher(&self) -> &WeatherFetcher {
        &self.fetcher
    }

    /// Errors leave the previous snapshot in place.
    pub async fn search(&self, city: &str) -> Result<FetchOutcome> {
        let city = validate_city(city)?;
        let ticket = self.snapshot.begin();
        tracing::debug!(city, ticket = ticket.sequence(), "Starting city search");

        let snapshot = self.fetcher.fetch_by_city(city).await?;
        let label = format::location_label(&snapshot.location);

        if !self.snapshot.commit(ticket, snapshot) {
            return Ok(FetchOutcome::Superseded);
        }
        self.recent.lock().record(&label);
        Ok(FetchOutcome::Displayed)
    }

    pub async fn locate(&self, latitude: f64, longitude: f64) -> Result<FetchOutcome> {
        validate_coordinates(latitude, longitude)?;
        let ticket = self.snapshot.begin();
        tracing::debug!(
            latitude,
            longitude,
            ticket = ticket.sequence(),
            "Starting location lookup"
        );

        let snapshot = self.fetcher.fetch_by_coordinates(latitude, longitude).await?;

        if self.snapshot.commit(ticket, snapshot) {
            Ok(FetchOutcome::Displayed)
        } else {
            Ok(FetchOutcome::Superseded)
        }
    }

    pub fn unit(&self) -> DisplayUnit {
        *self.unit.lock()
    }

    pub fn set_unit(&self, unit: DisplayUnit) {
        *self.unit.lock() = unit;
    }

    pub fn snapshot(&self) -> Option<WeatherSnapshot> {
        self.snapshot.current()
    }

    pub fn recent_searches(&self) -> RecentSearches {
        self.recent.lock().clone()
    }

    pub fn forecast_days<Tz: TimeZone>(&self, tz: Tz) -> Vec<DaySummary>
    where
        Tz::Offset: std::fmt::Display,
    {
        self.snapshot
            .current()
            .map(|s| ForecastAggregator::new(tz).aggregate(&s.raw_forecast))
            .unwrap_or_default()
    }

    /// Formats the current snapshot in the current unit, or `None` before the first fetch.
    pub fn view<Tz: TimeZone>(&self, tz: Tz) -> Option<DashboardView>
    where
        Tz::Offset: std::fmt::Display,
    {
        let snapshot = self.snapshot.current()?;
        let days = ForecastAggregator::new(tz.clone()).aggregate(&snapshot.raw_forecast);
        let formatter = DisplayFormatter::new(self.unit(), tz);

        Some(DashboardView {
            current: formatter.current(&snapshot.location, &snapshot.current),
            days: days.iter().map(|d| formatter.day(d)).collect(),
        })
    }
}
