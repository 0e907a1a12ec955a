//! Mapping from condition text and local time to cosmetic classes.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Local hour at which night starts (inclusive).
pub const NIGHT_STARTS_AT: u32 = 20;
/// Local hour at which day starts (inclusive).
pub const DAY_STARTS_AT: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCategory {
    Clear,
    Rain,
    Cloudy,
    Snow,
    Storm,
    Fog,
    Default,
}

/// Checked top to bottom, first match wins.
const RULES: &[(&[&str], WeatherCategory)] = &[
    (&["clear", "sunny"], WeatherCategory::Clear),
    (&["rain"], WeatherCategory::Rain),
    (&["cloud"], WeatherCategory::Cloudy),
    (&["snow"], WeatherCategory::Snow),
    (&["storm", "thunder"], WeatherCategory::Storm),
    (&["fog", "mist"], WeatherCategory::Fog),
];

impl WeatherCategory {
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();
        RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| text.contains(n)))
            .map(|(_, category)| *category)
            .unwrap_or(WeatherCategory::Default)
    }

    pub fn as_class(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "weather-clear",
            WeatherCategory::Rain => "weather-rain",
            WeatherCategory::Cloudy => "weather-cloudy",
            WeatherCategory::Snow => "weather-snow",
            WeatherCategory::Storm => "weather-storm",
            WeatherCategory::Fog => "weather-fog",
            WeatherCategory::Default => "weather-default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        if is_night_hour(hour) { TimeOfDay::Night } else { TimeOfDay::Day }
    }

    pub fn is_night(&self) -> bool {
        matches!(self, TimeOfDay::Night)
    }

    pub fn as_class(&self) -> &'static str {
        match self {
            TimeOfDay::Day => "day",
            TimeOfDay::Night => "night",
        }
    }
}

/// Night window: 20:00 through 05:59 local time.
pub fn is_night_hour(hour: u32) -> bool {
    hour >= NIGHT_STARTS_AT || hour < DAY_STARTS_AT
}

/// Parse an IANA timezone name, falling back to UTC for unknown names.
pub fn parse_timezone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!(timezone = name, "unknown timezone, falling back to UTC");
        Tz::UTC
    })
}

pub fn local_hour(now: DateTime<Utc>, tz: Tz) -> u32 {
    now.with_timezone(&tz).hour()
}

pub fn time_of_day(now: DateTime<Utc>, tz: Tz) -> TimeOfDay {
    TimeOfDay::from_hour(local_hour(now, tz))
}

pub fn background_class(category: WeatherCategory, time: TimeOfDay) -> String {
    format!("{} {}", category.as_class(), time.as_class())
}

/// Animated overlays. Both are recomputed on every render, never accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Effects {
    pub rain: bool,
    pub sun_rays: bool,
}

impl Effects {
    pub const RAIN_CLASS: &'static str = "has-rain-effect";
    pub const SUN_RAYS_CLASS: &'static str = "has-sun-rays-effect";

    pub fn for_conditions(text: &str, time: TimeOfDay) -> Self {
        let text = text.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| text.contains(n));

        Self {
            rain: has(&["rain", "storm", "thunder"]),
            sun_rays: !time.is_night() && has(&["clear", "sunny"]),
        }
    }

    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::new();
        if self.rain {
            classes.push(Self::RAIN_CLASS);
        }
        if self.sun_rays {
            classes.push(Self::SUN_RAYS_CLASS);
        }
        classes
    }
}

/// Everything cosmetic derived from one set of current conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub category: WeatherCategory,
    pub time_of_day: TimeOfDay,
    pub background_class: String,
    pub effects: Effects,
}

impl Scene {
    pub fn new(conditions_text: &str, time_of_day: TimeOfDay) -> Self {
        let category = WeatherCategory::classify(conditions_text);
        Self {
            category,
            time_of_day,
            background_class: background_class(category, time_of_day),
            effects: Effects::for_conditions(conditions_text, time_of_day),
        }
    }
}
