//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The Visual Crossing timeline client
//! - Classification of conditions into backgrounds and effects
//! - A presenter that drives the client and writes to an abstract view
//!
//! It is used by `weather-cli`, but any front-end that implements
//! [`ViewPort`] can reuse it.

pub mod classify;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod presenter;
pub mod render;
pub mod view;

pub use classify::{Effects, Scene, TimeOfDay, WeatherCategory};
pub use client::{ClientConfig, VisualCrossingClient, WeatherClient};
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use error::FetchError;
pub use model::{CurrentConditions, DailyForecast, LocationQuery, WeatherReport};
pub use presenter::{LoadOrigin, LoadOutcome, WeatherPresenter};
pub use render::{DisplayFields, render};
pub use view::{MemoryView, ViewPort, ViewSnapshot};
