use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{
    error::FetchError,
    model::{LocationQuery, WeatherReport},
};

/// Visual Crossing timeline endpoint; the location is appended as a path segment.
pub const DEFAULT_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

const UNIT_GROUP: &str = "metric";
const CONTENT_TYPE: &str = "json";
const INCLUDE: &str = "current";

/// Everything except the characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// Single attempt, no retry. Callers reject empty locations themselves.
    async fn fetch(&self, location: &LocationQuery) -> Result<WeatherReport, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ClientConfig {
    pub fn new(api_key: String) -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), api_key }
    }
}

#[derive(Debug, Clone)]
pub struct VisualCrossingClient {
    config: ClientConfig,
    http: Client,
}

impl VisualCrossingClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config, http: Client::new() }
    }

    /// Full request URL for `location`, API key included.
    pub fn request_url(&self, location: &LocationQuery) -> String {
        self.url_with_key(location, &encode_component(&self.config.api_key))
    }

    fn redacted_url(&self, location: &LocationQuery) -> String {
        self.url_with_key(location, "***")
    }

    fn url_with_key(&self, location: &LocationQuery, key: &str) -> String {
        format!(
            "{}/{}?unitGroup={UNIT_GROUP}&key={key}&contentType={CONTENT_TYPE}&include={INCLUDE}",
            self.config.base_url.trim_end_matches('/'),
            encode_component(location.as_str()),
        )
    }
}

#[async_trait]
impl WeatherClient for VisualCrossingClient {
    async fn fetch(&self, location: &LocationQuery) -> Result<WeatherReport, FetchError> {
        debug!(url = %self.redacted_url(location), "requesting weather");

        let res = self.http.get(self.request_url(location)).send().await.map_err(|e| {
            warn!(%location, error = %e, "weather request failed before a response");
            FetchError::Network(e)
        })?;

        let status = res.status();
        if !status.is_success() {
            warn!(%location, status = status.as_u16(), "weather request rejected");
            return Err(FetchError::Http { status: status.as_u16() });
        }

        let body = res.text().await.map_err(FetchError::Network)?;
        let report = parse_report(&body)?;
        log_summary(&report);

        Ok(report)
    }
}

/// Parse a response body, rejecting reports without an address or a forecast day.
pub fn parse_report(body: &str) -> Result<WeatherReport, FetchError> {
    let report: WeatherReport = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, body = %truncate_body(body), "weather response is not a valid report");
        FetchError::Parse(e.to_string())
    })?;

    if report.resolved_address.trim().is_empty() {
        return Err(FetchError::Parse("response has an empty resolvedAddress".into()));
    }
    if report.days.is_empty() {
        return Err(FetchError::Parse("response contains no daily forecast".into()));
    }

    Ok(report)
}

fn log_summary(report: &WeatherReport) {
    if let Some(current) = &report.current_conditions {
        debug!(
            address = %report.resolved_address,
            temp = ?current.temp,
            feelslike = ?current.feelslike,
            conditions = %current.conditions,
            windspeed = ?current.windspeed,
            "current conditions"
        );
    }
    if let Some(today) = report.today() {
        debug!(
            tempmax = ?today.tempmax,
            tempmin = ?today.tempmin,
            conditions = %today.conditions,
            "today's forecast"
        );
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
