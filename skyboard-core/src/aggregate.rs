//! Collapses the raw 3-hourly forecast series into per-day summaries.

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::model::{DaySummary, ForecastSample};

/// Number of calendar days a summary covers.
pub const FORECAST_DAYS: usize = 5;

/// Groups forecast samples by calendar day in `tz`.
#[derive(Debug, Clone)]
pub struct ForecastAggregator<Tz: TimeZone> {
    tz: Tz,
    max_days: usize,
}

impl<Tz: TimeZone> ForecastAggregator<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz, max_days: FORECAST_DAYS }
    }

    pub fn with_max_days(mut self, max_days: usize) -> Self {
        self.max_days = max_days;
        self
    }

    /// Buckets keep the order in which each day was first seen; anything past
    /// `max_days` buckets is dropped.
    pub fn aggregate(&self, samples: &[ForecastSample]) -> Vec<DaySummary>
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut buckets: Vec<Bucket<'_>> = Vec::new();

        for sample in samples {
            let Some(utc) = DateTime::from_timestamp(sample.timestamp_utc, 0) else {
                tracing::warn!(
                    timestamp = sample.timestamp_utc,
                    "Skipping forecast sample with invalid timestamp"
                );
                continue;
            };
            let local = utc.with_timezone(&self.tz);
            let date = local.date_naive();

            match buckets.iter_mut().find(|b| b.date == date) {
                Some(bucket) => bucket.samples.push(sample),
                None => {
                    if buckets.len() == self.max_days {
                        continue;
                    }
                    buckets.push(Bucket {
                        date,
                        day_label: local.format("%a").to_string(),
                        date_label: local.format("%b %-d").to_string(),
                        samples: vec![sample],
                    });
                }
            }
        }

        buckets.into_iter().map(Bucket::summarize).collect()
    }
}

struct Bucket<'a> {
    date: NaiveDate,
    day_label: String,
    date_label: String,
    samples: Vec<&'a ForecastSample>,
}

impl Bucket<'_> {
    fn summarize(self) -> DaySummary {
        let (min, max) = self.samples.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), s| (min.min(s.temperature_celsius), max.max(s.temperature_celsius)),
        );

        let code = dominant_condition(self.samples.iter().map(|s| s.condition_code))
            .unwrap_or_default();

        let icon = self
            .samples
            .iter()
            .find(|s| s.condition_code == code)
            .map(|s| s.condition_icon_key.clone())
            .unwrap_or_default();

        DaySummary {
            date: self.date,
            calendar_day_label: self.day_label,
            date_label: self.date_label,
            max_temperature_celsius: max,
            min_temperature_celsius: min,
            dominant_condition_code: code,
            dominant_condition_icon_key: icon,
        }
    }
}

/// Most frequent code; ties go to the code seen first.
pub fn dominant_condition(codes: impl IntoIterator<Item = u16>) -> Option<u16> {
    let mut counts: Vec<(u16, usize)> = Vec::new();
    for code in codes {
        match counts.iter_mut().find(|(c, _)| *c == code) {
            Some((_, n)) => *n += 1,
            None => counts.push((code, 1)),
        }
    }

    let mut best: Option<(u16, usize)> = None;
    for (code, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((code, n));
        }
    }
    best.map(|(code, _)| code)
}

/// Convenience over [`ForecastAggregator`] with the default five-day cap.
pub fn aggregate<Tz: TimeZone>(samples: &[ForecastSample], tz: Tz) -> Vec<DaySummary>
where
    Tz::Offset: std::fmt::Display,
{
    ForecastAggregator::new(tz).aggregate(samples)
}
