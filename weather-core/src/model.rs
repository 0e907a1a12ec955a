use serde::{Deserialize, Serialize};

/// Location used on page load when nothing else is configured.
pub const DEFAULT_LOCATION: &str = "London,UK";

/// A trimmed, non-empty free-text location, e.g. "London,UK".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Trim `raw` and reject it if nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_string())) }
    }

    pub fn default_location() -> Self {
        Self(DEFAULT_LOCATION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed timeline response. Field names follow the Visual Crossing JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub resolved_address: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub current_conditions: Option<CurrentConditions>,
    #[serde(default)]
    pub days: Vec<DailyForecast>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl WeatherReport {
    /// Index 0 of `days` is today.
    pub fn today(&self) -> Option<&DailyForecast> {
        self.days.first()
    }
}

/// Measurements are optional: stations report `null` for readings they lack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub feelslike: Option<f64>,
    #[serde(default)]
    pub conditions: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub windspeed: Option<f64>,
}

impl CurrentConditions {
    /// Text the background and effects are derived from: the icon code when
    /// present, otherwise the human-readable conditions.
    pub fn classification_text(&self) -> &str {
        match self.icon.as_deref() {
            Some(icon) if !icon.is_empty() => icon,
            _ => &self.conditions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub tempmax: Option<f64>,
    #[serde(default)]
    pub tempmin: Option<f64>,
    #[serde(default)]
    pub conditions: String,
}
