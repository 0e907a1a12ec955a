use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{
    classify::{Scene, parse_timezone, time_of_day},
    model::WeatherReport,
};

/// Display text for every field a report writes, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFields {
    pub location_name: String,
    pub timestamp: String,
    pub current: Option<CurrentFields>,
    pub today: Option<TodayFields>,
    pub scene: Option<Scene>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentFields {
    pub temperature: String,
    pub feels_like: String,
    pub conditions: String,
    pub humidity: String,
    pub wind_speed: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayFields {
    pub temp_max: String,
    pub temp_min: String,
}

/// Map a report onto display text as seen at `now`.
pub fn render(report: &WeatherReport, now: DateTime<Utc>) -> DisplayFields {
    let tz = parse_timezone(&report.timezone);
    let time = time_of_day(now, tz);

    let (current, scene) = match &report.current_conditions {
        Some(c) => (
            Some(CurrentFields {
                temperature: celsius(c.temp),
                feels_like: format!("Feels like {}", celsius(c.feelslike)),
                conditions: c.conditions.clone(),
                humidity: format!("{}%", whole(c.humidity)),
                wind_speed: format!("{} km/h", whole(c.windspeed)),
            }),
            Some(Scene::new(c.classification_text(), time)),
        ),
        None => (None, None),
    };

    let today = report.today().map(|d| TodayFields {
        temp_max: celsius(d.tempmax),
        temp_min: celsius(d.tempmin),
    });

    DisplayFields {
        location_name: report.resolved_address.clone(),
        timestamp: format_timestamp(now, tz),
        current,
        today,
        scene,
    }
}

/// Long form, e.g. "Tuesday, January 16, 2024 at 07:05 PM".
pub fn format_timestamp(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).format("%A, %B %-d, %Y at %I:%M %p").to_string()
}

/// Shown in place of a reading the station did not report.
pub const MISSING_VALUE: &str = "--";

fn celsius(value: Option<f64>) -> String {
    format!("{}°C", whole(value))
}

fn whole(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING_VALUE.to_string(), |v| round_half_up(v).to_string())
}

/// Nearest whole number with halves rounded up (-2.5 -> -2), never "-0".
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
