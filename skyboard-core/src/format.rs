//! Presentation strings. Stored values are metric; conversion happens here only.

use chrono::{DateTime, TimeZone};

use crate::model::{CurrentConditions, DaySummary, DisplayUnit, Location};

const MPS_TO_KMH: f64 = 3.6;
const MPS_TO_MPH: f64 = 2.237;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// `"15°"` in Celsius, `"59°"` in Fahrenheit for the same stored value.
pub fn temperature(celsius: f64, unit: DisplayUnit) -> String {
    let value = match unit {
        DisplayUnit::Celsius => celsius,
        DisplayUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
    };
    format!("{}°", round(value))
}

/// Km/h alongside Celsius, mph alongside Fahrenheit.
pub fn wind_speed(mps: f64, unit: DisplayUnit) -> String {
    match unit {
        DisplayUnit::Celsius => format!("{} km/h", round(mps * MPS_TO_KMH)),
        DisplayUnit::Fahrenheit => format!("{} mph", round(mps * MPS_TO_MPH)),
    }
}

pub fn humidity(percent: u8) -> String {
    format!("{percent}%")
}

pub fn pressure(hpa: u32) -> String {
    format!("{hpa} hPa")
}

/// 12-hour clock, e.g. `"06:05 AM"`. Unrepresentable timestamps render as `"--:--"`.
pub fn clock_time<Tz: TimeZone>(timestamp_utc: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp(timestamp_utc, 0) {
        Some(utc) => utc.with_timezone(tz).format("%I:%M %p").to_string(),
        None => "--:--".to_string(),
    }
}

/// Headline date, e.g. `"Friday, October 16"`.
pub fn long_date<Tz: TimeZone>(timestamp_utc: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp(timestamp_utc, 0) {
        Some(utc) => utc.with_timezone(tz).format("%A, %B %-d").to_string(),
        None => String::new(),
    }
}

/// `"London, GB"`, or just the name when no country is known.
pub fn location_label(location: &Location) -> String {
    match location.country_code.as_deref() {
        Some(cc) if !cc.is_empty() => format!("{}, {}", location.name, cc),
        _ => location.name.clone(),
    }
}

/// Weather-icons class for an upstream condition code and icon key.
pub fn icon_class(condition_code: u16, icon_key: &str) -> &'static str {
    let night = icon_key.contains('n');

    if condition_code == 800 {
        return if night { "wi-night-clear" } else { "wi-day-sunny" };
    }

    match condition_code / 100 {
        2 => "wi-thunderstorm",
        3 | 5 => {
            if night { "wi-night-alt-rain" } else { "wi-day-rain" }
        }
        6 => {
            if night { "wi-night-alt-snow" } else { "wi-day-snow" }
        }
        7 => "wi-fog",
        8 => {
            if night { "wi-night-alt-cloudy" } else { "wi-day-cloudy" }
        }
        _ => {
            if night { "wi-night-clear" } else { "wi-day-sunny" }
        }
    }
}

/// Formatted current conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentView {
    pub location: String,
    pub date: String,
    pub temperature: String,
    pub description: String,
    pub icon: &'static str,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub sunrise: String,
    pub sunset: String,
}

/// Formatted forecast day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub day: String,
    pub date: String,
    pub icon: &'static str,
    pub max: String,
    pub min: String,
}

/// Turns the metric model into display strings for one unit and clock.
#[derive(Debug, Clone)]
pub struct DisplayFormatter<Tz: TimeZone> {
    unit: DisplayUnit,
    tz: Tz,
}

impl<Tz: TimeZone> DisplayFormatter<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    pub fn new(unit: DisplayUnit, tz: Tz) -> Self {
        Self { unit, tz }
    }

    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    pub fn current(&self, location: &Location, current: &CurrentConditions) -> CurrentView {
        CurrentView {
            location: location_label(location),
            date: long_date(current.timestamp_utc, &self.tz),
            temperature: temperature(current.temperature_celsius, self.unit),
            description: current.description.clone(),
            icon: icon_class(current.condition_code, &current.condition_icon_key),
            humidity: humidity(current.humidity_percent),
            wind: wind_speed(current.wind_speed_mps, self.unit),
            pressure: pressure(current.pressure_hpa),
            sunrise: clock_time(current.sunrise_utc, &self.tz),
            sunset: clock_time(current.sunset_utc, &self.tz),
        }
    }

    pub fn day(&self, summary: &DaySummary) -> DayView {
        DayView {
            day: summary.calendar_day_label.clone(),
            date: summary.date_label.clone(),
            icon: icon_class(
                summary.dominant_condition_code,
                &summary.dominant_condition_icon_key,
            ),
            max: temperature(summary.max_temperature_celsius, self.unit),
            min: temperature(summary.min_temperature_celsius, self.unit),
        }
    }
}

// Integer display value. `as` saturates, and `-0.4` rounds to `0`, not `-0`.
fn round(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn london() -> (Location, CurrentConditions) {
        let location = Location {
            name: "London".into(),
            country_code: Some("GB".into()),
            latitude: 51.5085,
            longitude: -0.1257,
        };
        let current = CurrentConditions {
            // 2026-10-16T10:00:00Z
            timestamp_utc: 1_792_144_800,
            temperature_celsius: 15.0,
            humidity_percent: 81,
            wind_speed_mps: 5.0,
            pressure_hpa: 1012,
            condition_code: 803,
            condition_icon_key: "04d".into(),
            // 06:05Z and 17:30Z
            sunrise_utc: 1_792_130_700,
            sunset_utc: 1_792_171_800,
            description: "broken clouds".into(),
            utc_offset_seconds: 3600,
        };
        (location, current)
    }

    #[test]
    fn london_fifteen_degrees_in_both_units() {
        let (location, current) = london();

        let c = DisplayFormatter::new(DisplayUnit::Celsius, Utc).current(&location, &current);
        assert_eq!(c.temperature, "15°");

        let f = DisplayFormatter::new(DisplayUnit::Fahrenheit, Utc).current(&location, &current);
        assert_eq!(f.temperature, "59°");
    }

    #[test]
    fn current_view_fields() {
        let (location, current) = london();
        let view = DisplayFormatter::new(DisplayUnit::Celsius, Utc).current(&location, &current);

        assert_eq!(view.location, "London, GB");
        assert_eq!(view.date, "Friday, October 16");
        assert_eq!(view.humidity, "81%");
        assert_eq!(view.wind, "18 km/h");
        assert_eq!(view.pressure, "1012 hPa");
        assert_eq!(view.sunrise, "06:05 AM");
        assert_eq!(view.sunset, "05:30 PM");
        assert_eq!(view.icon, "wi-day-cloudy");
    }

    #[test]
    fn clock_follows_time_zone() {
        let (_, current) = london();
        let plus1 = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(clock_time(current.sunrise_utc, &plus1), "07:05 AM");
    }

    #[test]
    fn wind_in_mph_for_fahrenheit() {
        assert_eq!(wind_speed(5.0, DisplayUnit::Fahrenheit), "11 mph");
        assert_eq!(wind_speed(0.0, DisplayUnit::Celsius), "0 km/h");
    }

    #[test]
    fn conversion_round_trip_within_tolerance() {
        for tenths in -500..=500 {
            let c = tenths as f64 / 10.0;
            let back = fahrenheit_to_celsius(celsius_to_fahrenheit(c));
            assert!((back - c).abs() < 1e-9, "{c} came back as {back}");
        }
    }

    #[test]
    fn toggling_unit_leaves_stored_data_alone() {
        let (location, current) = london();
        let before = current.clone();

        let mut unit = DisplayUnit::Celsius;
        let first = DisplayFormatter::new(unit, Utc).current(&location, &current);
        for _ in 0..7 {
            unit = unit.toggled();
            let _ = DisplayFormatter::new(unit, Utc).current(&location, &current);
        }
        unit = unit.toggled();
        let again = DisplayFormatter::new(unit, Utc).current(&location, &current);

        assert_eq!(unit, DisplayUnit::Celsius);
        assert_eq!(first, again);
        assert_eq!(current, before);
    }

    #[test]
    fn small_negatives_do_not_render_minus_zero() {
        assert_eq!(temperature(-0.4, DisplayUnit::Celsius), "0°");
        assert_eq!(temperature(-17.9, DisplayUnit::Fahrenheit), "0°");
    }

    #[test]
    fn location_label_without_country() {
        let loc = Location::placeholder(1.0, 2.0);
        assert_eq!(location_label(&loc), "Your Location");
    }

    #[test]
    fn icon_classes() {
        assert_eq!(icon_class(800, "01d"), "wi-day-sunny");
        assert_eq!(icon_class(800, "01n"), "wi-night-clear");
        assert_eq!(icon_class(211, "11d"), "wi-thunderstorm");
        assert_eq!(icon_class(301, "09n"), "wi-night-alt-rain");
        assert_eq!(icon_class(500, "10d"), "wi-day-rain");
        assert_eq!(icon_class(601, "13n"), "wi-night-alt-snow");
        assert_eq!(icon_class(741, "50d"), "wi-fog");
        assert_eq!(icon_class(804, "04n"), "wi-night-alt-cloudy");
        assert_eq!(icon_class(999, ""), "wi-day-sunny");
    }

    #[test]
    fn day_view_uses_unit() {
        let summary = DaySummary {
            date: chrono::NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            calendar_day_label: "Sat".into(),
            date_label: "Oct 17".into(),
            max_temperature_celsius: 22.0,
            min_temperature_celsius: 18.0,
            dominant_condition_code: 500,
            dominant_condition_icon_key: "10d".into(),
        };

        let view = DisplayFormatter::new(DisplayUnit::Fahrenheit, Utc).day(&summary);
        assert_eq!(view.day, "Sat");
        assert_eq!(view.date, "Oct 17");
        assert_eq!(view.max, "72°");
        assert_eq!(view.min, "64°");
        assert_eq!(view.icon, "wi-day-rain");
    }
}
